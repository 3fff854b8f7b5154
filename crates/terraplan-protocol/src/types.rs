use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// One tile of the territory.
///
/// Regions are sparse: tiles that were never touched are not persisted and
/// read back as unowned wasteland with an empty deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub row: i64,
    pub col: i64,
    pub deposit: i64,
    pub max_deposit: i64,
    pub owner: Option<PlayerId>,
}

impl Region {
    pub fn wasteland(row: i64, col: i64, max_deposit: i64) -> Self {
        Self {
            row,
            col,
            deposit: 0,
            max_deposit,
            owner: None,
        }
    }

    /// Storage key for the sparse region map.
    pub fn key(&self) -> String {
        region_key(self.row, self.col)
    }

    /// Add to the deposit, clamped to `[0, max_deposit]`. Returns the amount
    /// actually applied (may be smaller than requested near the bounds).
    pub fn adjust_deposit(&mut self, delta: i64) -> i64 {
        let before = self.deposit;
        self.deposit = (self.deposit + delta).clamp(0, self.max_deposit);
        self.deposit - before
    }

    pub fn remaining_capacity(&self) -> i64 {
        self.max_deposit - self.deposit
    }

    pub fn is_owned_by(&self, player: &PlayerId) -> bool {
        self.owner.as_ref() == Some(player)
    }
}

pub fn region_key(row: i64, col: i64) -> String {
    format!("{row}:{col}")
}

/// Sentinel city-center row for an eliminated player.
pub const ELIMINATED: i64 = -1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub budget: i64,
    pub city_row: i64,
    pub city_col: i64,
}

impl Player {
    pub fn is_eliminated(&self) -> bool {
        self.city_row == ELIMINATED
    }

    pub fn eliminate(&mut self) {
        self.city_row = ELIMINATED;
        self.city_col = ELIMINATED;
    }

    /// Budget never goes below zero.
    pub fn adjust_budget(&mut self, delta: i64) {
        self.budget = (self.budget + delta).max(0);
    }
}

/// Immutable per-game settings, fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: i64,
    pub cols: i64,
    pub initial_budget: i64,
    /// Deposit seeded into (and guaranteed at) a city-center region.
    pub city_deposit: i64,
    pub relocation_cost: i64,
    pub interest_percent: i64,
    pub max_deposit: i64,
    pub plan_time_secs: u32,
    pub move_time_secs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            initial_budget: 100,
            city_deposit: 50,
            relocation_cost: 10,
            interest_percent: 5,
            max_deposit: 100,
            plan_time_secs: 30,
            move_time_secs: 5,
        }
    }
}

impl GameConfig {
    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        (1..=self.rows).contains(&row) && (1..=self.cols).contains(&col)
    }
}

/// Game lifecycle. `Finished`, `Aborted` and `Error` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameStatus {
    #[default]
    WaitingForPlayers,
    InProgress,
    Finished,
    Aborted,
    Error,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::Finished | GameStatus::Aborted | GameStatus::Error
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub status: GameStatus,
    pub max_players: usize,
    /// Index into the join-ordered player list.
    pub current_turn: usize,
    /// Completed wraps of the turn order.
    pub round: u64,
    pub winner: Option<PlayerId>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// The acting player's cursor for the turn in progress. Distinct from the
/// player's city-center coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentState {
    pub player_id: PlayerId,
    pub row: i64,
    pub col: i64,
}
