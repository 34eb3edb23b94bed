//! Tile Cascade Demo
//!
//! Plays a built-in level by always taking the first hint, then replays the
//! recorded swaps from the same seed and checks the final state hash.
//!
//! Usage: `tile-cascade [LEVEL_ID] [SEED]`

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tile_cascade::{
    Position, Session, VERSION, DEFAULT_MIN_MATCH, BASE_SCORE_PER_TILE,
    game::{
        config::EngineConfig,
        events::{total_delay_ms, CascadeEventData},
        level::builtin,
    },
};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let level_id: u32 = match args.next() {
        Some(arg) => arg.parse().with_context(|| format!("invalid level id: {arg}"))?,
        None => 1,
    };
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse().with_context(|| format!("invalid seed: {arg}"))?,
        None => 12345,
    };

    info!("Tile Cascade v{}", VERSION);
    info!("Min match: {}, base points per tile: {}", DEFAULT_MIN_MATCH, BASE_SCORE_PER_TILE);

    demo_stage(level_id, seed)
}

/// Play one stage greedily and verify it replays identically.
fn demo_stage(level_id: u32, seed: u64) -> Result<()> {
    let level = builtin(level_id)?;
    info!("=== Starting Stage {} ({}) ===", level.id, level.name);
    info!(
        "Grid {}x{}, {} kinds, {} obstacles, {} moves, target {}",
        level.grid_size,
        level.grid_size,
        level.tile_kind_count,
        level.obstacle_count(),
        level.move_limit,
        level.target_score
    );
    info!("Seed: {}", seed);

    let mut session = Session::start(level.clone(), EngineConfig::default(), seed)?;
    info!("Initial Board Hash: {}", hex::encode(session.grid().compute_hash()));

    let mut swaps: Vec<(Position, Position)> = Vec::new();
    let mut animation_ms = 0;

    while !session.is_over() {
        let Some((a, b)) = session.hint() else {
            bail!("board has no legal move but the stage is still running");
        };
        let outcome = session.play(a, b)?;
        swaps.push((a, b));

        let events = session.controller_mut().take_events();
        animation_ms += total_delay_ms(&events);
        for event in &events {
            match &event.data {
                CascadeEventData::SpecialSpawned { pos, special, .. } => {
                    info!("  Special {:?} created at {}", special, pos);
                }
                CascadeEventData::SpecialTriggered { pos, effect } => {
                    info!("  Special {:?} fired at {}", effect, pos);
                }
                CascadeEventData::Reshuffled { attempts } => {
                    info!("  Board reshuffled after {} attempt(s)", attempts);
                }
                _ => {}
            }
        }

        info!(
            "Move {}: {} <-> {} | {} pass(es), +{} points | score {} | {} moves left",
            swaps.len(),
            a,
            b,
            outcome.final_combo,
            outcome.points,
            session.score(),
            session.moves_remaining()
        );
        session.clear_combo();
    }

    // Print final results
    info!("=== Stage Results ===");
    info!("Outcome: {:?}", session.outcome());
    info!("Score: {} / {}", session.score(), level.target_score);
    info!("Lives: {}", session.lives());
    info!("Animation time: {} ms", animation_ms);
    let hash = session.state_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let mut replay = Session::start(level, EngineConfig::default(), seed)?;
    for (a, b) in &swaps {
        replay.play(*a, *b)?;
        replay.clear_combo();
    }
    let replay_hash = replay.state_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
        Ok(())
    } else {
        bail!("DETERMINISM FAILURE: Hashes differ!")
    }
}
