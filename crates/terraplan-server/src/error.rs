use terraplan_lang::LangError;
use terraplan_protocol::{GameId, GameStatus, PlayerId};

use crate::store::StoreError;

/// Game-rule and orchestration failures. All variants except `Store` are
/// client-caused; `Store` wraps unexpected persistence faults.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GameError {
    #[error("game {0} not found")]
    GameNotFound(GameId),
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("game has already started")]
    GameAlreadyStarted,
    #[error("game is full")]
    GameIsFull,
    #[error("grid holds at most {max} city centers, requested {requested}")]
    UnsupportedPlayerCount { requested: usize, max: usize },
    #[error("player {0} already joined")]
    PlayerAlreadyJoined(PlayerId),
    #[error("not enough players to start")]
    NotEnoughPlayers,
    #[error("operation not allowed while game is {0:?}")]
    InvalidGameState(GameStatus),
    #[error("no plan stored for player {0}")]
    PlanNotFound(PlayerId),
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("plan error: {0}")]
    Plan(#[from] LangError),
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingGame(id) => GameError::GameNotFound(id),
            StoreError::MissingPlayer(id) => GameError::PlayerNotFound(id),
            StoreError::MissingPlan(id) => GameError::PlanNotFound(id),
            other => GameError::Store(other),
        }
    }
}
