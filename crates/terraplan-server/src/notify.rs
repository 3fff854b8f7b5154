//! Lifecycle notifications broadcast by the service. Subscribers (a push
//! transport, a spectator feed, the simulator) receive them over a tokio
//! broadcast channel; serialization uses the same tagged shape as game
//! events.

use serde::{Deserialize, Serialize};
use terraplan_protocol::{GameId, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    GameCreated {
        game: GameId,
    },
    PlayerJoined {
        game: GameId,
        player: PlayerId,
        name: String,
    },
    GameStarted {
        game: GameId,
        players: Vec<PlayerId>,
    },
    PlanExecuted {
        game: GameId,
        player: PlayerId,
    },
    TurnAdvanced {
        game: GameId,
        next_player: PlayerId,
        round: u64,
    },
    GameFinished {
        game: GameId,
        winner: Option<PlayerId>,
    },
}
