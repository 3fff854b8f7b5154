//! Persistence boundary.
//!
//! The engine and service consume the key-value store only through
//! [`GameStore`]; the trait promises atomicity at single-key granularity and
//! nothing more. [`MemoryStore`] is the in-process implementation used by
//! tests and local play.

use std::collections::HashMap;
use std::sync::RwLock;

use terraplan_protocol::{
    region_key, CurrentState, GameConfig, GameId, GameInfo, GameStatus, Player, PlayerId, Region,
};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("no game stored under {0}")]
    MissingGame(GameId),
    #[error("no player stored under {0}")]
    MissingPlayer(PlayerId),
    #[error("no current state stored for game {0}")]
    MissingState(GameId),
    #[error("no plan stored for player {0}")]
    MissingPlan(PlayerId),
    #[error("store internal error: {0}")]
    Internal(String),
}

/// Abstract repository for one game world per [`GameId`].
///
/// Implementations must be safe to share across tasks; callers are
/// responsible for serializing multi-step read-modify-write sequences (the
/// service holds a per-game lock across plan execution).
pub trait GameStore: Send + Sync {
    fn create_game(
        &self,
        game: &GameId,
        info: &GameInfo,
        config: &GameConfig,
    ) -> Result<(), StoreError>;
    fn get_game_info(&self, game: &GameId) -> Result<GameInfo, StoreError>;
    fn update_game_status(&self, game: &GameId, status: GameStatus) -> Result<(), StoreError>;
    /// Advance the turn index modulo the player count. Returns the new index
    /// and whether the order wrapped to the first player (a new round).
    fn increment_turn(&self, game: &GameId) -> Result<(usize, bool), StoreError>;
    fn set_game_winner(&self, game: &GameId, winner: &PlayerId) -> Result<(), StoreError>;
    fn get_game_config(&self, game: &GameId) -> Result<GameConfig, StoreError>;

    fn get_game_players(&self, game: &GameId) -> Result<Vec<Player>, StoreError>;
    fn add_player_to_game(&self, game: &GameId, player: &Player) -> Result<(), StoreError>;
    fn get_player(&self, game: &GameId, player: &PlayerId) -> Result<Player, StoreError>;
    fn save_player(&self, game: &GameId, player: &Player) -> Result<(), StoreError>;
    fn update_player_budget(
        &self,
        game: &GameId,
        player: &PlayerId,
        budget: i64,
    ) -> Result<(), StoreError>;
    /// Add `delta` to the player's budget (clamped at zero); returns the new
    /// budget.
    fn increment_player_budget(
        &self,
        game: &GameId,
        player: &PlayerId,
        delta: i64,
    ) -> Result<i64, StoreError>;

    /// Regions are sparse: an address that was never written reads back as
    /// unowned wasteland bounded by the game's configured max deposit.
    fn get_region(&self, game: &GameId, row: i64, col: i64) -> Result<Region, StoreError>;
    fn update_region(&self, game: &GameId, region: &Region) -> Result<(), StoreError>;
    fn get_all_regions(&self, game: &GameId) -> Result<Vec<Region>, StoreError>;
    fn get_territory_size(&self, game: &GameId) -> Result<(i64, i64), StoreError>;

    fn get_current_state(&self, game: &GameId) -> Result<CurrentState, StoreError>;
    fn update_current_position(&self, game: &GameId, row: i64, col: i64)
        -> Result<(), StoreError>;
    fn update_current_player(&self, game: &GameId, state: &CurrentState)
        -> Result<(), StoreError>;

    fn save_player_plan(
        &self,
        game: &GameId,
        player: &PlayerId,
        text: &str,
    ) -> Result<(), StoreError>;
    fn get_player_plan(&self, game: &GameId, player: &PlayerId) -> Result<String, StoreError>;

    /// Bulk-delete the world data of a finished game. Game info survives so
    /// the outcome stays queryable.
    fn delete_game_data(&self, game: &GameId) -> Result<(), StoreError>;
}

#[derive(Debug)]
struct GameData {
    info: GameInfo,
    config: GameConfig,
    /// Join order matters: it is the turn order.
    players: Vec<Player>,
    regions: HashMap<String, Region>,
    current: Option<CurrentState>,
    plans: HashMap<PlayerId, String>,
}

/// In-process store over a read-write lock, one entry per game.
#[derive(Default)]
pub struct MemoryStore {
    games: RwLock<HashMap<GameId, GameData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(
        &self,
        game: &GameId,
        f: impl FnOnce(&GameData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let games = self
            .games
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let data = games
            .get(game)
            .ok_or_else(|| StoreError::MissingGame(game.clone()))?;
        f(data)
    }

    fn write<T>(
        &self,
        game: &GameId,
        f: impl FnOnce(&mut GameData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut games = self
            .games
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let data = games
            .get_mut(game)
            .ok_or_else(|| StoreError::MissingGame(game.clone()))?;
        f(data)
    }
}

impl GameStore for MemoryStore {
    fn create_game(
        &self,
        game: &GameId,
        info: &GameInfo,
        config: &GameConfig,
    ) -> Result<(), StoreError> {
        let mut games = self
            .games
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        games.insert(
            game.clone(),
            GameData {
                info: info.clone(),
                config: config.clone(),
                players: Vec::new(),
                regions: HashMap::new(),
                current: None,
                plans: HashMap::new(),
            },
        );
        Ok(())
    }

    fn get_game_info(&self, game: &GameId) -> Result<GameInfo, StoreError> {
        self.read(game, |data| Ok(data.info.clone()))
    }

    fn update_game_status(&self, game: &GameId, status: GameStatus) -> Result<(), StoreError> {
        self.write(game, |data| {
            data.info.status = status;
            data.info.updated_at_ms = crate::engine::now_ms();
            Ok(())
        })
    }

    fn increment_turn(&self, game: &GameId) -> Result<(usize, bool), StoreError> {
        self.write(game, |data| {
            let count = data.players.len().max(1);
            let next = (data.info.current_turn + 1) % count;
            let wrapped = next == 0;
            data.info.current_turn = next;
            if wrapped {
                data.info.round += 1;
            }
            data.info.updated_at_ms = crate::engine::now_ms();
            Ok((next, wrapped))
        })
    }

    fn set_game_winner(&self, game: &GameId, winner: &PlayerId) -> Result<(), StoreError> {
        self.write(game, |data| {
            data.info.winner = Some(winner.clone());
            data.info.updated_at_ms = crate::engine::now_ms();
            Ok(())
        })
    }

    fn get_game_config(&self, game: &GameId) -> Result<GameConfig, StoreError> {
        self.read(game, |data| Ok(data.config.clone()))
    }

    fn get_game_players(&self, game: &GameId) -> Result<Vec<Player>, StoreError> {
        self.read(game, |data| Ok(data.players.clone()))
    }

    fn add_player_to_game(&self, game: &GameId, player: &Player) -> Result<(), StoreError> {
        self.write(game, |data| {
            data.players.push(player.clone());
            Ok(())
        })
    }

    fn get_player(&self, game: &GameId, player: &PlayerId) -> Result<Player, StoreError> {
        self.read(game, |data| {
            data.players
                .iter()
                .find(|p| &p.id == player)
                .cloned()
                .ok_or_else(|| StoreError::MissingPlayer(player.clone()))
        })
    }

    fn save_player(&self, game: &GameId, player: &Player) -> Result<(), StoreError> {
        self.write(game, |data| {
            match data.players.iter_mut().find(|p| p.id == player.id) {
                Some(slot) => {
                    *slot = player.clone();
                    Ok(())
                }
                None => Err(StoreError::MissingPlayer(player.id.clone())),
            }
        })
    }

    fn update_player_budget(
        &self,
        game: &GameId,
        player: &PlayerId,
        budget: i64,
    ) -> Result<(), StoreError> {
        self.write(game, |data| {
            match data.players.iter_mut().find(|p| &p.id == player) {
                Some(slot) => {
                    slot.budget = budget.max(0);
                    Ok(())
                }
                None => Err(StoreError::MissingPlayer(player.clone())),
            }
        })
    }

    fn increment_player_budget(
        &self,
        game: &GameId,
        player: &PlayerId,
        delta: i64,
    ) -> Result<i64, StoreError> {
        self.write(game, |data| {
            match data.players.iter_mut().find(|p| &p.id == player) {
                Some(slot) => {
                    slot.adjust_budget(delta);
                    Ok(slot.budget)
                }
                None => Err(StoreError::MissingPlayer(player.clone())),
            }
        })
    }

    fn get_region(&self, game: &GameId, row: i64, col: i64) -> Result<Region, StoreError> {
        self.read(game, |data| {
            Ok(data
                .regions
                .get(&region_key(row, col))
                .cloned()
                .unwrap_or_else(|| Region::wasteland(row, col, data.config.max_deposit)))
        })
    }

    fn update_region(&self, game: &GameId, region: &Region) -> Result<(), StoreError> {
        self.write(game, |data| {
            data.regions.insert(region.key(), region.clone());
            Ok(())
        })
    }

    fn get_all_regions(&self, game: &GameId) -> Result<Vec<Region>, StoreError> {
        self.read(game, |data| Ok(data.regions.values().cloned().collect()))
    }

    fn get_territory_size(&self, game: &GameId) -> Result<(i64, i64), StoreError> {
        self.read(game, |data| Ok((data.config.rows, data.config.cols)))
    }

    fn get_current_state(&self, game: &GameId) -> Result<CurrentState, StoreError> {
        self.read(game, |data| {
            data.current
                .clone()
                .ok_or_else(|| StoreError::MissingState(game.clone()))
        })
    }

    fn update_current_position(
        &self,
        game: &GameId,
        row: i64,
        col: i64,
    ) -> Result<(), StoreError> {
        self.write(game, |data| match data.current.as_mut() {
            Some(state) => {
                state.row = row;
                state.col = col;
                Ok(())
            }
            None => Err(StoreError::MissingState(game.clone())),
        })
    }

    fn update_current_player(
        &self,
        game: &GameId,
        state: &CurrentState,
    ) -> Result<(), StoreError> {
        self.write(game, |data| {
            data.current = Some(state.clone());
            Ok(())
        })
    }

    fn save_player_plan(
        &self,
        game: &GameId,
        player: &PlayerId,
        text: &str,
    ) -> Result<(), StoreError> {
        self.write(game, |data| {
            data.plans.insert(player.clone(), text.to_string());
            Ok(())
        })
    }

    fn get_player_plan(&self, game: &GameId, player: &PlayerId) -> Result<String, StoreError> {
        self.read(game, |data| {
            data.plans
                .get(player)
                .cloned()
                .ok_or_else(|| StoreError::MissingPlan(player.clone()))
        })
    }

    fn delete_game_data(&self, game: &GameId) -> Result<(), StoreError> {
        self.write(game, |data| {
            data.players.clear();
            data.regions.clear();
            data.plans.clear();
            data.current = None;
            Ok(())
        })
    }
}
