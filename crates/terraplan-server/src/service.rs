//! Game orchestration: lobby, turn discipline, plan execution.
//!
//! Every mutating call on a running game goes through a per-game async mutex,
//! so two plans for the same game can never interleave even when the store
//! itself only guarantees single-key atomicity.

use std::collections::HashMap;
use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use terraplan_lang::parse_plan;
use terraplan_protocol::{
    CurrentState, ExecutionResult, GameConfig, GameId, GameInfo, GameStatus, Player, PlayerId,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::engine::{now_ms, GameEngine};
use crate::environment::PlanEnvironment;
use crate::error::GameError;
use crate::notify::Notification;
use crate::store::GameStore;
use crate::turn::advance_turn;

const GAME_CODE_LEN: usize = 6;
const NOTIFY_CAPACITY: usize = 256;

pub struct GameService {
    store: Arc<dyn GameStore>,
    locks: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
    notify: broadcast::Sender<Notification>,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        let (notify, _) = broadcast::channel(NOTIFY_CAPACITY);
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
            notify,
        }
    }

    /// Receive lifecycle notifications. Lagging subscribers drop messages,
    /// they never block the game.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notify.subscribe()
    }

    fn publish(&self, notification: Notification) {
        // Nobody listening is fine.
        let _ = self.notify.send(notification);
    }

    async fn game_lock(&self, game: &GameId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(game.clone()).or_default().clone()
    }

    /// Open a lobby with a fresh join code.
    ///
    /// City centers go on the grid diagonal, so the roster can never exceed
    /// the diagonal's span: beyond that, interpolation would land two cities
    /// on the same tile.
    pub async fn create_game(
        &self,
        config: GameConfig,
        max_players: usize,
    ) -> Result<GameId, GameError> {
        let max = config.rows.min(config.cols) as usize;
        if max_players < 2 || max_players > max {
            return Err(GameError::UnsupportedPlayerCount {
                requested: max_players,
                max,
            });
        }
        let game = GameId::new(random_code());
        let now = now_ms();
        let info = GameInfo {
            status: GameStatus::WaitingForPlayers,
            max_players,
            current_turn: 0,
            round: 0,
            winner: None,
            created_at_ms: now,
            updated_at_ms: now,
        };
        self.store.create_game(&game, &info, &config)?;
        info!(%game, max_players, "game created");
        self.publish(Notification::GameCreated { game: game.clone() });
        Ok(game)
    }

    /// Seat a player in a waiting lobby. City placement happens at start.
    pub async fn add_player(
        &self,
        game: &GameId,
        player_id: &PlayerId,
        name: &str,
    ) -> Result<(), GameError> {
        let lock = self.game_lock(game).await;
        let _guard = lock.lock().await;

        let info = self.store.get_game_info(game)?;
        if info.status != GameStatus::WaitingForPlayers {
            return Err(GameError::GameAlreadyStarted);
        }
        let players = self.store.get_game_players(game)?;
        if players.len() >= info.max_players {
            return Err(GameError::GameIsFull);
        }
        if players.iter().any(|p| &p.id == player_id) {
            return Err(GameError::PlayerAlreadyJoined(player_id.clone()));
        }

        let config = self.store.get_game_config(game)?;
        self.store.add_player_to_game(
            game,
            &Player {
                id: player_id.clone(),
                name: name.to_string(),
                budget: config.initial_budget,
                city_row: 0,
                city_col: 0,
            },
        )?;
        info!(%game, player = %player_id, "player joined");
        self.publish(Notification::PlayerJoined {
            game: game.clone(),
            player: player_id.clone(),
            name: name.to_string(),
        });
        Ok(())
    }

    /// Place city centers and open play. Requires at least two players.
    pub async fn start_game(&self, game: &GameId) -> Result<(), GameError> {
        let lock = self.game_lock(game).await;
        let _guard = lock.lock().await;

        let info = self.store.get_game_info(game)?;
        if info.status != GameStatus::WaitingForPlayers {
            return Err(GameError::GameAlreadyStarted);
        }
        let mut players = self.store.get_game_players(game)?;
        if players.len() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }

        let config = self.store.get_game_config(game)?;
        let positions = city_positions(&config, players.len());
        for (player, (row, col)) in players.iter_mut().zip(positions) {
            player.city_row = row;
            player.city_col = col;
            self.store.save_player(game, player)?;

            let mut city = self.store.get_region(game, row, col)?;
            city.owner = Some(player.id.clone());
            city.deposit = config.city_deposit.min(city.max_deposit);
            self.store.update_region(game, &city)?;
        }

        let first = &players[0];
        self.store.update_current_player(
            game,
            &CurrentState {
                player_id: first.id.clone(),
                row: first.city_row,
                col: first.city_col,
            },
        )?;
        self.store
            .update_game_status(game, GameStatus::InProgress)?;

        info!(%game, players = players.len(), "game started");
        self.publish(Notification::GameStarted {
            game: game.clone(),
            players: players.iter().map(|p| p.id.clone()).collect(),
        });
        Ok(())
    }

    /// Parse and run one plan for the player whose turn it is, then rotate
    /// the turn or finish the game.
    ///
    /// Plan failures (parse errors, runaway loops) surface as [`GameError::Plan`]
    /// and leave the turn with the same player; whatever actions ran before
    /// the failure keep their effects.
    pub async fn execute_plan(
        &self,
        game: &GameId,
        player_id: &PlayerId,
        source: &str,
    ) -> Result<ExecutionResult, GameError> {
        let lock = self.game_lock(game).await;
        let _guard = lock.lock().await;

        let info = self.store.get_game_info(game)?;
        if info.status != GameStatus::InProgress {
            return Err(GameError::InvalidGameState(info.status));
        }
        let current = self.store.get_current_state(game)?;
        if &current.player_id != player_id {
            return Err(GameError::NotYourTurn(player_id.clone()));
        }

        // Persist only once the text is known to parse, so a rejected
        // submission never clobbers the player's last good plan.
        let plan = parse_plan(source)?;
        self.store.save_player_plan(game, player_id, source)?;

        let config = self.store.get_game_config(game)?;
        let engine = GameEngine::new(self.store.clone(), game.clone())?;
        let seed = plan_seed(&info, player_id);
        let mut env = PlanEnvironment::new(engine, player_id.clone(), seed);

        if let Err(err) = plan.execute(&mut env) {
            warn!(%game, player = %player_id, %err, "plan aborted");
            return Err(err.into());
        }
        debug!(%game, player = %player_id, "plan executed");
        self.publish(Notification::PlanExecuted {
            game: game.clone(),
            player: player_id.clone(),
        });

        let survivors: Vec<Player> = self
            .store
            .get_game_players(game)?
            .into_iter()
            .filter(|p| !p.is_eliminated())
            .collect();
        if survivors.len() == 1 {
            let winner = &survivors[0].id;
            // Capture the cursor before the world goes away.
            let final_state = self.store.get_current_state(game)?;
            self.store.set_game_winner(game, winner)?;
            self.store.update_game_status(game, GameStatus::Finished)?;
            // The world is deleted in bulk at game end; the GameInfo summary
            // (status, winner, round) survives.
            self.store.delete_game_data(game)?;
            info!(%game, %winner, "game finished");
            self.publish(Notification::GameFinished {
                game: game.clone(),
                winner: Some(winner.clone()),
            });
            return Ok(ExecutionResult {
                game_id: game.clone(),
                player_id: player_id.clone(),
                events: env.into_events(),
                final_state,
            });
        }

        let advance = advance_turn(self.store.as_ref(), game, &config)?;
        self.publish(Notification::TurnAdvanced {
            game: game.clone(),
            next_player: advance.next_player,
            round: advance.round,
        });

        let final_state = self.store.get_current_state(game)?;
        Ok(ExecutionResult {
            game_id: game.clone(),
            player_id: player_id.clone(),
            events: env.into_events(),
            final_state,
        })
    }

    /// Stop a game early without declaring a winner.
    pub async fn abort_game(&self, game: &GameId) -> Result<(), GameError> {
        let lock = self.game_lock(game).await;
        let _guard = lock.lock().await;

        let info = self.store.get_game_info(game)?;
        if info.status.is_terminal() {
            return Err(GameError::InvalidGameState(info.status));
        }
        self.store.update_game_status(game, GameStatus::Aborted)?;
        info!(%game, "game aborted");
        self.publish(Notification::GameFinished {
            game: game.clone(),
            winner: None,
        });
        Ok(())
    }

    pub fn game_info(&self, game: &GameId) -> Result<GameInfo, GameError> {
        Ok(self.store.get_game_info(game)?)
    }

    pub fn player_plan(&self, game: &GameId, player: &PlayerId) -> Result<String, GameError> {
        Ok(self.store.get_player_plan(game, player)?)
    }

    /// Drop the world of a terminal game, keeping its summary record.
    pub async fn remove_game(&self, game: &GameId) -> Result<(), GameError> {
        let lock = self.game_lock(game).await;
        let _guard = lock.lock().await;

        let info = self.store.get_game_info(game)?;
        if !info.status.is_terminal() {
            return Err(GameError::InvalidGameState(info.status));
        }
        self.store.delete_game_data(game)?;
        self.locks.lock().await.remove(game);
        info!(%game, "game data removed");
        Ok(())
    }
}

fn random_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GAME_CODE_LEN)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

/// Deterministic per-turn seed: stable for a replay of the same turn, fresh
/// between turns.
fn plan_seed(info: &GameInfo, player: &PlayerId) -> u64 {
    let mut seed = info.created_at_ms as u64;
    seed ^= info.round.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    seed ^= (info.current_turn as u64).wrapping_shl(17);
    for b in player.as_str().bytes() {
        seed = seed.wrapping_mul(31).wrapping_add(b as u64);
    }
    seed
}

/// Spread city centers down the diagonal so no two start adjacent on the
/// default grids.
fn city_positions(config: &GameConfig, count: usize) -> Vec<(i64, i64)> {
    let span = |extent: i64, i: usize| {
        if count == 1 {
            1
        } else {
            1 + i as i64 * (extent - 1) / (count as i64 - 1)
        }
    };
    (0..count)
        .map(|i| (span(config.rows, i), span(config.cols, i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_positions_spread_across_the_diagonal() {
        let config = GameConfig::default();
        assert_eq!(city_positions(&config, 2), vec![(1, 1), (10, 10)]);
        assert_eq!(city_positions(&config, 4), vec![(1, 1), (4, 4), (7, 7), (10, 10)]);
    }

    #[test]
    fn city_positions_stay_distinct_up_to_the_grid_span() {
        let config = GameConfig::default();
        for count in 2..=config.rows.min(config.cols) as usize {
            let positions = city_positions(&config, count);
            let mut seen = positions.clone();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), count, "collision for {count} players: {positions:?}");
        }
    }

    #[test]
    fn game_codes_are_short_and_uppercase() {
        let code = random_code();
        assert_eq!(code.len(), GAME_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!code.chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn plan_seed_varies_by_turn_and_player() {
        let mut info = GameInfo {
            status: GameStatus::InProgress,
            max_players: 2,
            current_turn: 0,
            round: 0,
            winner: None,
            created_at_ms: 1_000,
            updated_at_ms: 1_000,
        };
        let alice = PlayerId::new("alice");
        let bob = PlayerId::new("bob");
        let base = plan_seed(&info, &alice);
        assert_eq!(plan_seed(&info, &alice), base);
        assert_ne!(plan_seed(&info, &bob), base);
        info.current_turn = 1;
        assert_ne!(plan_seed(&info, &alice), base);
    }
}
