use serde::{Deserialize, Serialize};

use crate::{CurrentState, Direction, GameId, PlayerId};

/// One entry of the per-plan event log. Every environment call — action or
/// query, success or failure — appends exactly one event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    #[serde(flatten)]
    pub data: EventData,
    pub at_ms: i64,
}

/// Closed event payload set mirroring each environment operation. Action
/// variants carry the achieved value, whether the action succeeded, and the
/// actor's cursor position at call time; query variants carry the value read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventData {
    Relocate {
        amount: i64,
        success: bool,
        row: i64,
        col: i64,
    },
    Move {
        dir: Direction,
        success: bool,
        row: i64,
        col: i64,
    },
    Invest {
        amount: i64,
        success: bool,
        row: i64,
        col: i64,
    },
    Collect {
        amount: i64,
        success: bool,
        row: i64,
        col: i64,
    },
    Shoot {
        dir: Direction,
        damage: i64,
        success: bool,
        row: i64,
        col: i64,
    },
    Opponent {
        score: i64,
        row: i64,
        col: i64,
    },
    Nearby {
        dir: Direction,
        score: i64,
        row: i64,
        col: i64,
    },
    Done {
        row: i64,
        col: i64,
    },
    Rows {
        value: i64,
        row: i64,
        col: i64,
    },
    Cols {
        value: i64,
        row: i64,
        col: i64,
    },
    CurrentRow {
        value: i64,
        row: i64,
        col: i64,
    },
    CurrentCol {
        value: i64,
        row: i64,
        col: i64,
    },
    Budget {
        value: i64,
        row: i64,
        col: i64,
    },
    Deposit {
        value: i64,
        row: i64,
        col: i64,
    },
    Interest {
        value: i64,
        row: i64,
        col: i64,
    },
    MaxDeposit {
        value: i64,
        row: i64,
        col: i64,
    },
    Random {
        value: i64,
        row: i64,
        col: i64,
    },
}

/// Outcome of one plan submission — the stable contract a transport layer
/// serializes to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub events: Vec<GameEvent>,
    pub final_state: CurrentState,
}
