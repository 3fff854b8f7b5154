//! Compact encoding helpers for the boundary with the transport layer.
//!
//! MessagePack for the wire, JSON for logs and tooling.

use rmp_serde::{decode, encode};
use thiserror::Error;

use crate::{ExecutionResult, GameEvent};

#[derive(Debug, Error)]
pub enum WireError {
    #[error("encode error: {0}")]
    Encode(#[from] encode::Error),
    #[error("decode error: {0}")]
    Decode(#[from] decode::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn serialize_result(result: &ExecutionResult) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec_named(result)?)
}

pub fn deserialize_result(bytes: &[u8]) -> Result<ExecutionResult, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_events(events: &[GameEvent]) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec_named(events)?)
}

pub fn deserialize_events(bytes: &[u8]) -> Result<Vec<GameEvent>, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn result_to_json(result: &ExecutionResult) -> Result<String, WireError> {
    Ok(serde_json::to_string_pretty(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CurrentState, Direction, EventData, GameId, PlayerId};

    fn sample_result() -> ExecutionResult {
        ExecutionResult {
            game_id: GameId::new("ABC123"),
            player_id: PlayerId::new("alice"),
            events: vec![
                GameEvent {
                    data: EventData::Move {
                        dir: Direction::Down,
                        success: true,
                        row: 2,
                        col: 2,
                    },
                    at_ms: 1,
                },
                GameEvent {
                    data: EventData::Budget {
                        value: 99,
                        row: 3,
                        col: 2,
                    },
                    at_ms: 2,
                },
            ],
            final_state: CurrentState {
                player_id: PlayerId::new("alice"),
                row: 3,
                col: 2,
            },
        }
    }

    #[test]
    fn result_wire_roundtrip() {
        let result = sample_result();
        let bytes = serialize_result(&result).unwrap();
        let decoded = deserialize_result(&bytes).unwrap();
        assert_eq!(decoded, result);
    }

    #[test]
    fn events_wire_roundtrip() {
        let result = sample_result();
        let bytes = serialize_events(&result.events).unwrap();
        let decoded = deserialize_events(&bytes).unwrap();
        assert_eq!(decoded, result.events);
    }
}
