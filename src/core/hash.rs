//! Grid Hashing for Verification
//!
//! Provides deterministic hashing of board state for:
//! - Replay validation (same seed + same swaps = same hash)
//! - Cheap before/after comparison of grids
//! - Layout comparison that ignores tile identity

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for board state.
///
/// Wraps SHA-256. Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for a full grid (ids included).
    pub fn for_grid() -> Self {
        Self::new(b"TILE_CASCADE_GRID_V1")
    }

    /// Create hasher for a kind layout (ids ignored).
    pub fn for_layout() -> Self {
        Self::new(b"TILE_CASCADE_LAYOUT_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with raw bytes (e.g. a nested hash).
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute a grid hash.
///
/// Called by `Grid::compute_hash()` and `Grid::layout_hash()`. The closure adds
/// the cell data after the common header.
pub fn compute_grid_hash<F>(mut hasher: StateHasher, size: usize, add_cells: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    // Always hash dimensions first
    hasher.update_u32(size as u32);

    add_cells(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
