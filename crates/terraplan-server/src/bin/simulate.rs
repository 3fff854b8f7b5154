//! Local two-player simulation: scripted plans, full lifecycle, event logs
//! printed as JSON. Useful for eyeballing rule behavior without a client.
//!
//! `RUST_LOG=debug cargo run --bin terraplan-sim` shows every engine step.

use std::sync::Arc;

use terraplan_protocol::{wire, GameConfig, PlayerId};
use terraplan_server::store::MemoryStore;
use terraplan_server::{GameError, GameService};
use tracing::info;
use tracing_subscriber::EnvFilter;

const MAX_ROUNDS: u64 = 20;

/// Expand outward from the city, bank the growth, probe for the opponent.
const OPENING: &str = "\
# claim and grow a second region
move up
invest 15
x = deposit
if (x) then collect 5 else invest 5
";

const PRESSURE: &str = "\
# scout, then push whichever way looks hostile
score = opponent
if (score) then shoot up 10 else invest 10
move upright
invest 8
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let store = Arc::new(MemoryStore::new());
    let service = GameService::new(store);
    let mut notifications = service.subscribe();

    let game = service.create_game(GameConfig::default(), 2).await?;
    let alice = PlayerId::new("alice");
    let bob = PlayerId::new("bob");
    service.add_player(&game, &alice, "Alice").await?;
    service.add_player(&game, &bob, "Bob").await?;
    service.start_game(&game).await?;

    let players = [&alice, &bob];
    let plans = [OPENING, PRESSURE];

    'rounds: for round in 0..MAX_ROUNDS {
        for (player, plan) in players.into_iter().zip(plans) {
            let info = service.game_info(&game)?;
            if info.status.is_terminal() {
                break 'rounds;
            }
            match service.execute_plan(&game, player, plan).await {
                Ok(result) => {
                    println!("{}", wire::result_to_json(&result)?);
                }
                Err(GameError::Plan(err)) => {
                    info!(round, %player, %err, "plan rejected, turn stays");
                }
                Err(GameError::NotYourTurn(_)) => continue,
                Err(other) => return Err(other.into()),
            }
        }
    }

    while let Ok(notification) = notifications.try_recv() {
        info!(?notification, "lifecycle");
    }

    let info = service.game_info(&game)?;
    info!(status = ?info.status, winner = ?info.winner, round = info.round, "simulation over");
    Ok(())
}
