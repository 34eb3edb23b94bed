//! Level Configuration
//!
//! Static per-level content consumed once at session start, plus the
//! built-in stage catalog.

use serde::{Serialize, Deserialize};

use crate::game::config::ConfigError;
use crate::game::grid::Position;
use crate::game::tile::BASIC_KIND_COUNT;

/// Smallest supported grid side.
pub const MIN_GRID_SIZE: usize = 3;

/// Largest supported grid side.
pub const MAX_GRID_SIZE: usize = 16;

/// Number of stages in the built-in catalog.
pub const CATALOG_SIZE: u32 = 100;

/// Grid side used by generated stages (4 and up).
pub const GENERATED_GRID_SIZE: usize = 8;

/// Read-only level definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Stage number
    pub id: u32,

    /// Display name
    pub name: String,

    /// Side length N of the square grid
    pub grid_size: usize,

    /// Minimum run length that counts as a match
    pub min_match_length: usize,

    /// Moves available
    pub move_limit: u32,

    /// Score needed to clear the stage
    pub target_score: u64,

    /// `true` where an obstacle starts. Empty means no obstacles.
    #[serde(default)]
    pub obstacle_mask: Vec<Vec<bool>>,

    /// Basic kinds in play (`1..=tile_kind_count`)
    pub tile_kind_count: u8,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Stage 1".to_string(),
            grid_size: crate::DEFAULT_GRID_SIZE,
            min_match_length: crate::DEFAULT_MIN_MATCH,
            move_limit: crate::INITIAL_MOVES,
            target_score: 800,
            obstacle_mask: Vec::new(),
            tile_kind_count: BASIC_KIND_COUNT,
        }
    }
}

impl LevelConfig {
    /// Parse and validate a level from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let level: LevelConfig = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Check dimensions and ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::GridSize {
                size: self.grid_size,
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }
        if self.min_match_length < 3 || self.min_match_length > self.grid_size {
            return Err(ConfigError::MinMatchLength {
                len: self.min_match_length,
                size: self.grid_size,
            });
        }
        if !(3..=BASIC_KIND_COUNT).contains(&self.tile_kind_count) {
            return Err(ConfigError::TileKindCount {
                count: self.tile_kind_count,
                max: BASIC_KIND_COUNT,
            });
        }
        if !self.obstacle_mask.is_empty()
            && (self.obstacle_mask.len() != self.grid_size
                || self.obstacle_mask.iter().any(|row| row.len() != self.grid_size))
        {
            return Err(ConfigError::MaskDimensions { expected: self.grid_size });
        }
        if self.move_limit == 0 {
            return Err(ConfigError::MoveLimit);
        }
        Ok(())
    }

    /// Does the mask place an obstacle at `pos`?
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacle_mask
            .get(pos.row)
            .and_then(|row| row.get(pos.col))
            .copied()
            .unwrap_or(false)
    }

    /// Number of obstacles in the mask.
    pub fn obstacle_count(&self) -> usize {
        self.obstacle_mask.iter().flatten().filter(|&&o| o).count()
    }
}

// =============================================================================
// OBSTACLE LAYOUTS
// =============================================================================

/// Named obstacle arrangements used by the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleLayout {
    /// No obstacles
    Empty,
    /// Vertical wall through the middle
    Wall,
    /// One obstacle in each corner
    Corners,
}

impl ObstacleLayout {
    /// Build a `size x size` mask.
    pub fn mask(self, size: usize) -> Vec<Vec<bool>> {
        let mut mask = vec![vec![false; size]; size];
        if size == 0 {
            return mask;
        }
        match self {
            ObstacleLayout::Empty => {}
            ObstacleLayout::Wall => {
                if size >= 8 {
                    // Two columns wide, two rows of clearance top and bottom
                    for row in mask.iter_mut().take(size - 2).skip(2) {
                        row[size / 2 - 1] = true;
                        row[size / 2] = true;
                    }
                } else {
                    for row in mask.iter_mut().take(size - 1).skip(1) {
                        row[size / 2] = true;
                    }
                }
            }
            ObstacleLayout::Corners => {
                let last = size - 1;
                mask[0][0] = true;
                mask[0][last] = true;
                mask[last][0] = true;
                mask[last][last] = true;
            }
        }
        mask
    }

    /// Layout the catalog assigns to a generated stage.
    fn for_generated(id: u32) -> Self {
        match id % 3 {
            1 => ObstacleLayout::Corners,
            2 => ObstacleLayout::Wall,
            _ => ObstacleLayout::Empty,
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Built-in stage by id (`1..=100`).
pub fn builtin(id: u32) -> Result<LevelConfig, ConfigError> {
    let (name, grid_size, layout, target_score, move_limit) = match id {
        1 => ("Candy Plains".to_string(), 6, ObstacleLayout::Empty, 800, 30),
        2 => ("Sugar Cave".to_string(), 6, ObstacleLayout::Wall, 1400, 26),
        3 => ("Caramel Cliff".to_string(), 6, ObstacleLayout::Corners, 2000, 24),
        4..=CATALOG_SIZE => (
            format!("Stage {}", id),
            GENERATED_GRID_SIZE,
            ObstacleLayout::for_generated(id),
            2000 + u64::from(id - 3) * 800,
            25u32.saturating_sub((id - 4) / 8).max(15),
        ),
        _ => return Err(ConfigError::UnknownLevel(id)),
    };

    Ok(LevelConfig {
        id,
        name,
        grid_size,
        min_match_length: crate::DEFAULT_MIN_MATCH,
        move_limit,
        target_score,
        obstacle_mask: layout.mask(grid_size),
        tile_kind_count: BASIC_KIND_COUNT,
    })
}

/// Every built-in stage in order.
pub fn catalog() -> Vec<LevelConfig> {
    (1..=CATALOG_SIZE).filter_map(|id| builtin(id).ok()).collect()
}
