//! Game Logic Module
//!
//! The tile-matching rule engine. 100% deterministic given its injected
//! random and id sources.
//!
//! ## Module Structure
//!
//! - `tile`, `grid`: Tile entity and bounds-checked grid container
//! - `matcher`: Run detection, merging and special classification
//! - `resolve`: Removal-set expansion (effects, obstacles, spawns)
//! - `gravity`: Column compaction and refill
//! - `cascade`: Swap validation and the resolve loop
//! - `hint`: Legal-move search
//! - `board`: Initial generation and reshuffles
//! - `session`: Caller-side score, moves and lives
//! - `events`: Cascade events for rendering and replay

pub mod tile;
pub mod grid;
pub mod config;
pub mod level;
pub mod matcher;
pub mod resolve;
pub mod gravity;
pub mod scoring;
pub mod hint;
pub mod board;
pub mod events;
pub mod cascade;
pub mod session;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export key types
pub use tile::{SpecialEffect, Tile, TileKind};
pub use grid::{Grid, GridError, Position};
pub use config::{ConfigError, EngineConfig, NoMatchPolicy, SpecialPolicy};
pub use level::LevelConfig;
pub use matcher::{find_matches, Match};
pub use hint::{find_hint, is_board_playable};
pub use events::{CascadeEvent, CascadeEventData};
pub use cascade::{BoardStatus, CascadeController, Phase, SwapError, SwapOutcome};
pub use session::{Session, StageOutcome};
