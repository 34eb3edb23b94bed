//! # Tile Cascade
//!
//! Deterministic rule engine for a match-3 tile puzzle: swaps in, settled
//! boards and scores out. No rendering, input or timers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       TILE CASCADE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Injected random source (Xorshift128+)     │
//! │  ├── ids.rs      - Injected tile id source                   │
//! │  └── hash.rs     - Board hashing for replay checks           │
//! │                                                              │
//! │  game/           - Rule engine (deterministic)               │
//! │  ├── grid.rs     - Tiles, positions, bounds-checked grid     │
//! │  ├── matcher.rs  - Run detection and special classification  │
//! │  ├── resolve.rs  - Effect expansion and removal              │
//! │  ├── gravity.rs  - Column compaction and refill              │
//! │  ├── cascade.rs  - Swap → resolve → settle state machine     │
//! │  ├── hint.rs     - Legal-move search                         │
//! │  ├── board.rs    - Generation and reshuffles                 │
//! │  └── session.rs  - Score, moves, lives, stage outcome        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The engine is **100% deterministic**:
//! - No floating-point arithmetic
//! - No HashMap (BTreeMap/BTreeSet for sorted iteration)
//! - No system time dependencies
//! - All randomness and tile ids come from injected sources
//!
//! Given the same level, seed and swaps, a session produces the same boards
//! and scores on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::rng::{DeterministicRng, RandomSource};
pub use core::ids::{IdSource, SequentialIds, TileId};
pub use game::grid::{Grid, Position};
pub use game::tile::{SpecialEffect, Tile, TileKind};
pub use game::cascade::{CascadeController, SwapOutcome};
pub use game::session::Session;
pub use game::events::{COMBO_DISPLAY_MS, FALL_MS, MATCH_MS, SWAP_MS, TILE_APPEAR_MS};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default grid side length
pub const DEFAULT_GRID_SIZE: usize = 6;

/// Default minimum run length
pub const DEFAULT_MIN_MATCH: usize = 3;

/// Points per cleared tile before the combo multiplier
pub const BASE_SCORE_PER_TILE: u64 = 10;

/// Default moves per stage
pub const INITIAL_MOVES: u32 = 30;

/// Lives at the start of a session
pub const INITIAL_LIVES: u32 = 3;
