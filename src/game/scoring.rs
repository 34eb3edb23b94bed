//! Pass scoring.
//!
//! Points for one resolving pass are `cleared x base x (combo + 1)`, where
//! `combo` counts the passes already resolved in this cascade.

/// Multiplier applied to a pass resolved after `combo` earlier passes.
#[inline]
pub fn combo_multiplier(combo: u32) -> u64 {
    u64::from(combo) + 1
}

/// Points for a pass that cleared `cleared` cells.
pub fn pass_points(cleared: usize, base_points_per_tile: u64, combo: u32) -> u64 {
    (cleared as u64)
        .saturating_mul(base_points_per_tile)
        .saturating_mul(combo_multiplier(combo))
}
