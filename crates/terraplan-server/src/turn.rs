//! Turn rotation and end-of-round interest.

use terraplan_protocol::{CurrentState, GameConfig, GameId};
use tracing::debug;

use crate::error::GameError;
use crate::store::GameStore;

/// What advancing the turn produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnAdvance {
    pub next_player: terraplan_protocol::PlayerId,
    pub new_round: bool,
    pub round: u64,
}

/// Hand the turn to the next surviving player, accruing interest every time
/// the rotation wraps past the end of the roster. The cursor resets to the
/// incoming player's city center.
///
/// Callers must ensure at least one player is still alive.
pub fn advance_turn(
    store: &dyn GameStore,
    game: &GameId,
    config: &GameConfig,
) -> Result<TurnAdvance, GameError> {
    let players = store.get_game_players(game)?;
    let mut new_round = false;

    for _ in 0..players.len() {
        let (index, wrapped) = store.increment_turn(game)?;
        if wrapped {
            new_round = true;
            accrue_interest(store, game, config)?;
        }
        let candidate = &players[index];
        if candidate.is_eliminated() {
            continue;
        }
        store.update_current_player(
            game,
            &CurrentState {
                player_id: candidate.id.clone(),
                row: candidate.city_row,
                col: candidate.city_col,
            },
        )?;
        let round = store.get_game_info(game)?.round;
        debug!(%game, player = %candidate.id, round, "turn advanced");
        return Ok(TurnAdvance {
            next_player: candidate.id.clone(),
            new_round,
            round,
        });
    }

    Err(GameError::NotEnoughPlayers)
}

/// Grow every owned, non-empty deposit by the configured percentage,
/// integer-truncated and clamped to the region cap.
pub fn accrue_interest(
    store: &dyn GameStore,
    game: &GameId,
    config: &GameConfig,
) -> Result<(), GameError> {
    for mut region in store.get_all_regions(game)? {
        if region.owner.is_none() || region.deposit <= 0 {
            continue;
        }
        let gain = region.deposit * config.interest_percent / 100;
        if gain > 0 {
            region.adjust_deposit(gain);
            store.update_region(game, &region)?;
        }
    }
    Ok(())
}
