//! Core deterministic primitives.
//!
//! Randomness, identity and hashing capabilities injected into the engine.

pub mod rng;
pub mod ids;
pub mod hash;

// Re-export core types
pub use rng::{DeterministicRng, RandomSource};
pub use ids::{IdSource, SequentialIds, TileId};
pub use hash::{StateHash, StateHasher};
