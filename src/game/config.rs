//! Engine Configuration
//!
//! Tunable rule tables: scoring base, effect footprints, refill rarity,
//! special-spawn policy and the no-match swap policy. Loaded from JSON with
//! per-field defaults; every table is validated before the engine uses it.

use serde::{Serialize, Deserialize};

use crate::game::grid::GridError;
use crate::game::level::MAX_GRID_SIZE;
use crate::game::tile::{SpecialEffect, BASIC_KIND_COUNT};

/// Basis points in one whole (100% = 10_000).
pub const BASIS_POINTS: u32 = 10_000;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Grid side length out of range.
    #[error("grid size {size} out of range {min}..={max}")]
    GridSize {
        /// Requested size
        size: usize,
        /// Smallest allowed
        min: usize,
        /// Largest allowed
        max: usize,
    },

    /// Minimum match length must fit in a row.
    #[error("minimum match length {len} must be within 3..={size}")]
    MinMatchLength {
        /// Requested length
        len: usize,
        /// Grid side length
        size: usize,
    },

    /// Too few or too many tile kinds.
    #[error("tile kind count {count} out of range 3..={max}")]
    TileKindCount {
        /// Requested count
        count: u8,
        /// Largest allowed
        max: u8,
    },

    /// Obstacle mask is not `size x size`.
    #[error("obstacle mask must be {expected}x{expected}")]
    MaskDimensions {
        /// Grid side length
        expected: usize,
    },

    /// A level needs at least one move.
    #[error("move limit must be at least 1")]
    MoveLimit,

    /// Rarity tiers sum past 100%.
    #[error("rarity tiers sum to {total} basis points (max {max})")]
    RarityOverflow {
        /// Sum of tiers
        total: u32,
        /// Limit
        max: u32,
    },

    /// Refresh weight above 100%.
    #[error("refresh common weight {percent}% exceeds 100%")]
    RefreshPercent {
        /// Configured weight
        percent: u32,
    },

    /// Refresh common kind not available in the level.
    #[error("refresh common kind {kind} not in 1..={count}")]
    CommonKind {
        /// Configured kind
        kind: u8,
        /// Level kind count
        count: u8,
    },

    /// Reshuffle budget of zero.
    #[error("max reshuffle attempts must be at least 1")]
    ReshuffleAttempts,

    /// Area-burst radius outside `1..max`.
    #[error("burst radius {radius} out of range 1..{max}")]
    BurstRadius {
        /// Configured radius
        radius: usize,
        /// Exclusive upper bound (largest grid side)
        max: usize,
    },

    /// No built-in level with this id.
    #[error("no built-in level {0}")]
    UnknownLevel(u32),

    /// Starting board does not fit the level.
    #[error("invalid board: {0}")]
    Board(#[from] GridError),

    /// Malformed JSON.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// NO-MATCH POLICY
// =============================================================================

/// What happens to a legal swap that forms no match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchPolicy {
    /// Undo the swap; no move consumed.
    #[default]
    Revert,
    /// Keep the swap and consume a move.
    FreeMove,
}

// =============================================================================
// SPECIAL SPAWN POLICY
// =============================================================================

/// Geometry of a merged match group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchShape {
    /// Single horizontal run
    Horizontal,
    /// Single vertical run
    Vertical,
    /// Horizontal and vertical runs crossing (L, T, plus)
    Bent,
}

/// Which shapes a rule applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeFilter {
    /// Every shape
    Any,
    /// Horizontal or vertical
    Straight,
    /// Horizontal only
    Horizontal,
    /// Vertical only
    Vertical,
    /// Bent only
    Bent,
}

impl ShapeFilter {
    /// Does this filter accept `shape`?
    pub fn accepts(self, shape: MatchShape) -> bool {
        match self {
            ShapeFilter::Any => true,
            ShapeFilter::Straight => shape != MatchShape::Bent,
            ShapeFilter::Horizontal => shape == MatchShape::Horizontal,
            ShapeFilter::Vertical => shape == MatchShape::Vertical,
            ShapeFilter::Bent => shape == MatchShape::Bent,
        }
    }
}

/// One row of the spawn table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialRule {
    /// Shapes this rule applies to
    pub shape: ShapeFilter,
    /// Minimum group size
    pub min_size: usize,
    /// Effect spawned
    pub effect: SpecialEffect,
}

/// Ordered table mapping match geometry to a spawned special.
///
/// The first rule whose shape and size accept the group wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialPolicy {
    /// Rules in priority order
    pub rules: Vec<SpecialRule>,
}

impl Default for SpecialPolicy {
    fn default() -> Self {
        let rule = |shape, min_size, effect| SpecialRule { shape, min_size, effect };
        Self {
            rules: vec![
                rule(ShapeFilter::Straight, 6, SpecialEffect::BoardRefresh),
                rule(ShapeFilter::Straight, 5, SpecialEffect::LineClear),
                rule(ShapeFilter::Bent, 5, SpecialEffect::AreaBurst),
                rule(ShapeFilter::Horizontal, 4, SpecialEffect::RowClear),
                rule(ShapeFilter::Vertical, 4, SpecialEffect::ColumnClear),
            ],
        }
    }
}

impl SpecialPolicy {
    /// Policy that never spawns specials.
    pub fn none() -> Self {
        Self { rules: Vec::new() }
    }

    /// Effect for a group of `size` tiles with the given shape.
    pub fn classify(&self, shape: MatchShape, size: usize) -> SpecialEffect {
        self.rules
            .iter()
            .find(|rule| rule.shape.accepts(shape) && size >= rule.min_size)
            .map_or(SpecialEffect::None, |rule| rule.effect)
    }
}

// =============================================================================
// REFILL RARITY
// =============================================================================

/// One rarity tier: chance (in basis points) of a refill tile carrying `effect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityTier {
    /// Effect carried
    pub effect: SpecialEffect,
    /// Width of this tier in basis points
    pub basis_points: u32,
}

/// Cumulative thresholds over one uniform draw in `[0, 10_000)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityTable {
    /// Tiers in threshold order
    pub tiers: Vec<RarityTier>,
}

impl Default for RarityTable {
    fn default() -> Self {
        // 0.1%, 0.5%, 1%, 1.5%, 2%
        let tier = |effect, basis_points| RarityTier { effect, basis_points };
        Self {
            tiers: vec![
                tier(SpecialEffect::BoardRefresh, 10),
                tier(SpecialEffect::AreaBurst, 50),
                tier(SpecialEffect::ColumnClear, 100),
                tier(SpecialEffect::LineClear, 150),
                tier(SpecialEffect::RowClear, 200),
            ],
        }
    }
}

impl RarityTable {
    /// Table that never produces specials.
    pub fn none() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Sum of all tiers.
    pub fn total(&self) -> u32 {
        self.tiers.iter().map(|t| t.basis_points).sum()
    }

    /// Effect for a uniform roll in `[0, 10_000)`.
    pub fn effect_for_roll(&self, roll: u32) -> SpecialEffect {
        let mut threshold = 0;
        for tier in &self.tiers {
            threshold += tier.basis_points;
            if roll < threshold {
                return tier.effect;
            }
        }
        SpecialEffect::None
    }
}

// =============================================================================
// BOARD REFRESH
// =============================================================================

/// Weighted redraw used by the board-refresh effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// The two designated common kinds
    pub common_kinds: [u8; 2],
    /// Chance (percent) of landing on a common kind
    pub common_percent: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            common_kinds: [1, 2],
            common_percent: 70,
        }
    }
}

// =============================================================================
// ENGINE CONFIG
// =============================================================================

/// Rule tables for the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Points per cleared tile before the combo multiplier
    pub base_points_per_tile: u64,
    /// Half-width of the area-burst window (1 = 3x3)
    pub burst_radius: usize,
    /// Board-refresh redraw weights
    pub refresh: RefreshConfig,
    /// Refill special rarity
    pub rarity: RarityTable,
    /// Special spawn table
    pub specials: SpecialPolicy,
    /// No-match swap handling
    pub no_match: NoMatchPolicy,
    /// Consecutive reshuffle failures before the board is unplayable
    pub max_reshuffle_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_points_per_tile: crate::BASE_SCORE_PER_TILE,
            burst_radius: 1,
            refresh: RefreshConfig::default(),
            rarity: RarityTable::default(),
            specials: SpecialPolicy::default(),
            no_match: NoMatchPolicy::default(),
            max_reshuffle_attempts: 10,
        }
    }
}

impl EngineConfig {
    /// Plain rules: no refill specials, no spawned specials.
    ///
    /// Useful for scripted boards where only matches should clear tiles.
    pub fn plain() -> Self {
        Self {
            rarity: RarityTable::none(),
            specials: SpecialPolicy::none(),
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the tables against a level's kind count.
    pub fn validate(&self, tile_kind_count: u8) -> Result<(), ConfigError> {
        let total = self.rarity.total();
        if total > BASIS_POINTS {
            return Err(ConfigError::RarityOverflow { total, max: BASIS_POINTS });
        }
        if self.refresh.common_percent > 100 {
            return Err(ConfigError::RefreshPercent {
                percent: self.refresh.common_percent,
            });
        }
        let count = tile_kind_count.min(BASIC_KIND_COUNT);
        for &kind in &self.refresh.common_kinds {
            if kind == 0 || kind > count {
                return Err(ConfigError::CommonKind { kind, count });
            }
        }
        if self.max_reshuffle_attempts == 0 {
            return Err(ConfigError::ReshuffleAttempts);
        }
        if self.burst_radius == 0 || self.burst_radius >= MAX_GRID_SIZE {
            return Err(ConfigError::BurstRadius {
                radius: self.burst_radius,
                max: MAX_GRID_SIZE,
            });
        }
        Ok(())
    }
}
