//! Tile Identity
//!
//! Tile ids are handed out by an injected [`IdSource`] owned by the session,
//! never by global counters, so independent sessions (and tests) each get
//! their own deterministic id stream.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Unique tile identifier.
///
/// Stable while a physical tile moves around the grid. Refill and special
/// spawns always receive a fresh id; ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u64);

impl TileId {
    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile-{}", self.0)
    }
}

/// Capability that allocates fresh tile ids.
pub trait IdSource {
    /// Allocate the next unused id.
    fn next_id(&mut self) -> TileId;
}

/// Monotonic counter id source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Start counting from zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `next` (e.g. when resuming a recorded board).
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Number of ids handed out so far (when started at zero).
    pub fn issued(&self) -> u64 {
        self.next
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> TileId {
        let id = TileId(self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_are_fresh() {
        let mut ids = SequentialIds::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_independent_sources_do_not_share_state() {
        let mut first = SequentialIds::new();
        let mut second = SequentialIds::new();
        first.next_id();
        first.next_id();
        assert_eq!(second.next_id(), TileId(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(TileId(7).to_string(), "tile-7");
        assert_eq!(SequentialIds::starting_at(40).next_id().to_string(), "tile-40");
    }
}
