//! Cascade Controller
//!
//! Turns one player swap into a fully settled board.
//!
//! ```text
//! Idle ──swap──► Validating ──match──► Resolving ──settled──► Idle
//!                    │                   ▲    │
//!                    └──no match─► Idle  └────┘ resolve → gravity → refill → re-detect
//! ```
//!
//! The controller is the only component with cross-cutting state (the combo
//! count). Everything it calls is a pure function of its inputs. Callers that
//! animate can drive the discrete steps ([`CascadeController::begin_swap`],
//! [`CascadeController::step`]) and await each event's delay in between;
//! [`CascadeController::request_swap`] runs the whole thing at once.

use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::core::ids::{IdSource, SequentialIds};
use crate::core::rng::{DeterministicRng, RandomSource};
use crate::game::board::{generate_grid, reshuffle, Reshuffle};
use crate::game::config::{ConfigError, EngineConfig, NoMatchPolicy};
use crate::game::events::{CascadeEvent, CascadeEventData};
use crate::game::gravity::{apply_gravity, refill};
use crate::game::grid::{Grid, GridError, Position};
use crate::game::hint::{find_hint, is_board_playable};
use crate::game::level::LevelConfig;
use crate::game::matcher::{find_matches, has_match, Match};
use crate::game::resolve::{resolve, Spawn};
use crate::game::scoring::pass_points;

/// Controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Awaiting a swap
    Idle,
    /// Checking a swap
    Validating,
    /// Matches pending; call `step()`
    Resolving,
}

/// Playability of the board after a settle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardStatus {
    /// At least one legal move
    Playable,
    /// Was dead; a reshuffle found a playable arrangement
    Reshuffled {
        /// Shuffles tried
        attempts: u32,
    },
    /// Every reshuffle failed. Terminal; the caller decides what it means.
    Unplayable {
        /// Shuffles tried
        attempts: u32,
    },
}

impl BoardStatus {
    /// Did the reshuffle budget run out?
    pub fn is_unplayable(self) -> bool {
        matches!(self, BoardStatus::Unplayable { .. })
    }
}

/// Rejected swap. The board is untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    /// Position outside the grid
    #[error("position {pos} is outside the {size}x{size} grid")]
    OutOfBounds {
        /// Offending position
        pos: Position,
        /// Grid side length
        size: usize,
    },

    /// Positions are not 4-adjacent
    #[error("{a} and {b} are not adjacent")]
    NotAdjacent {
        /// First position
        a: Position,
        /// Second position
        b: Position,
    },

    /// Obstacles never move
    #[error("obstacle at {0} cannot be swapped")]
    Obstacle(Position),

    /// A previous swap is still resolving
    #[error("a cascade is already in progress")]
    CascadeInProgress,

    /// The session is over
    #[error("the session has ended")]
    SessionEnded,
}

/// How a validated swap proceeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapStart {
    /// No match; swap undone, no move consumed
    Reverted,
    /// No match; swap kept and a move consumed (free-move policy)
    Kept,
    /// Matches pending; the controller is `Resolving`
    Cascading,
}

/// What one resolving pass did.
#[derive(Clone, Debug)]
pub struct PassReport {
    /// Combo after this pass (1 for the first pass)
    pub combo: u32,
    /// Groups resolved
    pub matches: Vec<Match>,
    /// Every removed cell, spawn cells included
    pub removed: BTreeSet<Position>,
    /// Scored cells
    pub cleared: usize,
    /// Points awarded for this pass
    pub points: u64,
    /// Obstacles destroyed by adjacency
    pub obstacles_destroyed: usize,
    /// Specials created by matches
    pub spawned: Vec<Spawn>,
    /// Did a board refresh fire?
    pub refreshed: bool,
    /// Tiles moved by gravity
    pub falls: usize,
    /// Cells filled with new tiles
    pub refilled: Vec<Position>,
}

/// Result of [`CascadeController::request_swap`].
#[derive(Clone, Debug)]
pub struct SwapOutcome {
    /// Swap stayed on the board
    pub accepted: bool,
    /// Moves the caller should deduct (0 or 1)
    pub moves_consumed: u32,
    /// Points earned by the whole cascade
    pub points: u64,
    /// Number of resolving passes
    pub final_combo: u32,
    /// Per-pass detail
    pub passes: Vec<PassReport>,
    /// Settled board
    pub grid: Grid,
    /// Board playability after settling
    pub board: BoardStatus,
}

/// Drives swaps through detection, resolution, gravity and refill until the
/// board settles.
pub struct CascadeController<R: RandomSource, I: IdSource> {
    level: LevelConfig,
    config: EngineConfig,
    grid: Grid,
    rng: R,
    ids: I,
    phase: Phase,
    pending: Vec<Match>,
    combo: u32,
    cascade_points: u64,
    board: BoardStatus,
    ended: bool,
    events: Vec<CascadeEvent>,
}

impl CascadeController<DeterministicRng, SequentialIds> {
    /// Seeded controller for a player attempt at `level`.
    pub fn for_session(level: LevelConfig, config: EngineConfig, player_seed: u64) -> Result<Self, ConfigError> {
        let rng = DeterministicRng::for_session(level.id, player_seed);
        Self::new(level, config, rng, SequentialIds::new())
    }
}

impl<R: RandomSource, I: IdSource> CascadeController<R, I> {
    /// Validate the configuration and generate a ready starting board.
    pub fn new(level: LevelConfig, config: EngineConfig, mut rng: R, mut ids: I) -> Result<Self, ConfigError> {
        level.validate()?;
        config.validate(level.tile_kind_count)?;

        let grid = generate_grid(&level, &mut rng, &mut ids);
        let mut controller = Self::assemble(level, config, grid, rng, ids);
        controller.board = controller.settle_board();
        Ok(controller)
    }

    /// Start from a prepared board, used as given.
    ///
    /// The board must be full, sized for the level and use only the level's
    /// kinds. No settle or reshuffle is run.
    pub fn with_grid(level: LevelConfig, config: EngineConfig, grid: Grid, rng: R, ids: I) -> Result<Self, ConfigError> {
        level.validate()?;
        config.validate(level.tile_kind_count)?;
        if grid.size() != level.grid_size {
            return Err(GridError::WrongDimensions {
                expected: level.grid_size,
                rows: grid.size(),
                cols: grid.size(),
            }
            .into());
        }
        grid.validate(level.tile_kind_count)?;

        Ok(Self::assemble(level, config, grid, rng, ids))
    }

    fn assemble(level: LevelConfig, config: EngineConfig, grid: Grid, rng: R, ids: I) -> Self {
        Self {
            level,
            config,
            grid,
            rng,
            ids,
            phase: Phase::Idle,
            pending: Vec::new(),
            combo: 0,
            cascade_points: 0,
            board: BoardStatus::Playable,
            ended: false,
            events: Vec::new(),
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Current board.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current state.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Passes resolved by the current (or last) cascade.
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Board status from the last settle.
    pub fn board_status(&self) -> BoardStatus {
        self.board
    }

    /// Level being played.
    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    /// Rule tables.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Matches waiting for the next `step()`.
    pub fn pending_matches(&self) -> &[Match] {
        &self.pending
    }

    /// Has the session been closed?
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Reject all further swaps.
    pub fn end_session(&mut self) {
        self.ended = true;
    }

    /// First legal move on the current board.
    pub fn hint(&self) -> Option<(Position, Position)> {
        find_hint(&self.grid, self.level.min_match_length)
    }

    /// Does any legal move exist?
    pub fn is_playable(&self) -> bool {
        is_board_playable(&self.grid, self.level.min_match_length)
    }

    /// Drain the event log.
    pub fn take_events(&mut self) -> Vec<CascadeEvent> {
        std::mem::take(&mut self.events)
    }

    fn push_event(&mut self, data: CascadeEventData) {
        self.events.push(CascadeEvent::new(self.combo, data));
    }

    // =========================================================================
    // SWAP
    // =========================================================================

    /// Validate and apply a swap without resolving it.
    ///
    /// On [`SwapStart::Cascading`] the controller is `Resolving` until
    /// [`step`](Self::step) returns `None`.
    pub fn begin_swap(&mut self, a: Position, b: Position) -> Result<SwapStart, SwapError> {
        if self.ended {
            return Err(SwapError::SessionEnded);
        }
        if self.phase != Phase::Idle {
            return Err(SwapError::CascadeInProgress);
        }
        let size = self.grid.size();
        for pos in [a, b] {
            if !self.grid.in_bounds(pos) {
                return Err(SwapError::OutOfBounds { pos, size });
            }
        }
        if !a.is_adjacent(b) {
            return Err(SwapError::NotAdjacent { a, b });
        }
        for pos in [a, b] {
            if self.grid.is_obstacle(pos) {
                return Err(SwapError::Obstacle(pos));
            }
        }

        self.phase = Phase::Validating;
        self.combo = 0;
        self.cascade_points = 0;

        let swapped = self
            .grid
            .swapped(a, b)
            .map_err(|_| SwapError::OutOfBounds { pos: a, size })?;
        let min_len = self.level.min_match_length;

        // A swapped special always fires from where it lands
        let mut matches: Vec<Match> = [a, b]
            .into_iter()
            .filter_map(|pos| {
                let tile = swapped.tile(pos).filter(|t| t.is_special())?;
                tile.matchable_kind().map(|kind| Match::trigger(pos, kind))
            })
            .collect();
        let triggers = matches.len();
        matches.extend(find_matches(&swapped, min_len, &[a, b], &self.config.specials));

        if matches.is_empty() {
            self.phase = Phase::Idle;
            return Ok(match self.config.no_match {
                NoMatchPolicy::Revert => {
                    debug!(%a, %b, "Swap formed no match; reverted");
                    self.events.push(CascadeEvent::swap_reverted(a, b));
                    SwapStart::Reverted
                }
                NoMatchPolicy::FreeMove => {
                    debug!(%a, %b, "Swap formed no match; kept as free move");
                    self.grid = swapped;
                    self.events.push(CascadeEvent::swapped(a, b));
                    self.board = self.settle_board();
                    SwapStart::Kept
                }
            });
        }

        debug!(%a, %b, groups = matches.len() - triggers, triggers, "Swap accepted");
        self.grid = swapped;
        self.events.push(CascadeEvent::swapped(a, b));
        self.pending = matches;
        self.phase = Phase::Resolving;
        Ok(SwapStart::Cascading)
    }

    /// Run one resolving pass: resolve, gravity, refill, re-detect.
    ///
    /// Returns `None` when nothing is pending. After the last pass the
    /// controller settles the board and returns to `Idle`.
    pub fn step(&mut self) -> Option<PassReport> {
        if self.phase != Phase::Resolving {
            return None;
        }

        let matches = std::mem::take(&mut self.pending);
        let kinds = self.level.tile_kind_count;

        let resolution = resolve(&self.grid, &matches, &self.config, kinds, &mut self.rng, &mut self.ids);
        let (fallen, falls) = apply_gravity(&resolution.grid);
        let (filled, refilled) = refill(&fallen, kinds, &self.config.rarity, &mut self.rng, &mut self.ids);

        let points = pass_points(resolution.cleared, self.config.base_points_per_tile, self.combo);
        self.combo += 1;
        self.cascade_points += points;
        self.grid = filled;

        for m in &matches {
            self.push_event(CascadeEventData::Matched {
                kind: m.kind,
                positions: m.positions.iter().copied().collect(),
                special: m.special,
            });
        }
        for &(pos, effect) in &resolution.triggered {
            self.push_event(CascadeEventData::SpecialTriggered { pos, effect });
        }
        if let Some(source) = resolution.refreshed {
            self.push_event(CascadeEventData::BoardRefreshed { source });
        }
        if !resolution.obstacles_destroyed.is_empty() {
            self.push_event(CascadeEventData::ObstaclesDestroyed {
                positions: resolution.obstacles_destroyed.iter().copied().collect(),
            });
        }
        let spawn_cells: BTreeSet<Position> = resolution.spawned.iter().map(|s| s.pos).collect();
        self.push_event(CascadeEventData::Cleared {
            positions: resolution.removed.difference(&spawn_cells).copied().collect(),
            points,
        });
        for spawn in &resolution.spawned {
            self.push_event(CascadeEventData::SpecialSpawned {
                pos: spawn.pos,
                id: spawn.id,
                kind: spawn.kind,
                special: spawn.special,
            });
        }
        self.push_event(CascadeEventData::Dropped { drops: falls.clone() });
        self.push_event(CascadeEventData::Refilled { positions: refilled.clone() });
        self.push_event(CascadeEventData::ComboAdvanced { combo: self.combo });

        debug!(
            combo = self.combo,
            cleared = resolution.cleared,
            points,
            obstacles = resolution.obstacles_destroyed.len(),
            spawned = resolution.spawned.len(),
            "Resolved pass"
        );

        let report = PassReport {
            combo: self.combo,
            matches,
            cleared: resolution.cleared,
            points,
            obstacles_destroyed: resolution.obstacles_destroyed.len(),
            spawned: resolution.spawned,
            refreshed: resolution.refreshed.is_some(),
            falls: falls.len(),
            refilled,
            removed: resolution.removed,
        };

        let next = find_matches(&self.grid, self.level.min_match_length, &[], &self.config.specials);
        if next.is_empty() {
            self.finish();
        } else {
            self.pending = next;
        }

        Some(report)
    }

    /// Validate a swap and run its cascade to completion.
    pub fn request_swap(&mut self, a: Position, b: Position) -> Result<SwapOutcome, SwapError> {
        let start = self.begin_swap(a, b)?;

        let mut passes = Vec::new();
        while let Some(report) = self.step() {
            passes.push(report);
        }

        let (accepted, moves_consumed) = match start {
            SwapStart::Reverted => (false, 0),
            SwapStart::Kept | SwapStart::Cascading => (true, 1),
        };

        Ok(SwapOutcome {
            accepted,
            moves_consumed,
            points: passes.iter().map(|p| p.points).sum(),
            final_combo: passes.len() as u32,
            passes,
            grid: self.grid.clone(),
            board: self.board,
        })
    }

    // =========================================================================
    // SETTLE
    // =========================================================================

    fn finish(&mut self) {
        self.events
            .push(CascadeEvent::settled(self.combo, self.cascade_points, self.combo));
        self.push_event(CascadeEventData::ComboReset);
        self.phase = Phase::Idle;
        self.board = self.settle_board();
    }

    /// Reshuffle a dead (or run-bearing) board.
    fn settle_board(&mut self) -> BoardStatus {
        let min_len = self.level.min_match_length;
        if !has_match(&self.grid, min_len) && is_board_playable(&self.grid, min_len) {
            return BoardStatus::Playable;
        }

        match reshuffle(&self.grid, min_len, self.config.max_reshuffle_attempts, &mut self.rng) {
            Reshuffle::Ready { grid, attempts } => {
                info!(attempts, "No legal move; board reshuffled");
                self.grid = grid;
                self.push_event(CascadeEventData::Reshuffled { attempts });
                BoardStatus::Reshuffled { attempts }
            }
            Reshuffle::Exhausted { attempts } => {
                warn!(attempts, "No legal move after reshuffling; board unplayable");
                self.push_event(CascadeEventData::Unplayable { attempts });
                BoardStatus::Unplayable { attempts }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::is_ready;
    use crate::game::events::EventPhase;
    use crate::game::fixtures::{base_rows, grid_from, kind_five_rows};
    use crate::game::level::builtin;
    use crate::game::tile::{SpecialEffect, TileKind};

    type Controller = CascadeController<DeterministicRng, SequentialIds>;

    fn controller(grid: Grid, config: EngineConfig) -> Controller {
        CascadeController::with_grid(
            LevelConfig::default(),
            config,
            grid,
            DeterministicRng::new(2024),
            SequentialIds::starting_at(10_000),
        )
        .unwrap()
    }

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_invalid_swaps_leave_board_untouched() {
        let mut rows = kind_five_rows();
        rows[0][0] = 99;
        let mut c = controller(grid_from(&rows), EngineConfig::default());
        let before = c.grid().compute_hash();

        assert_eq!(
            c.request_swap(p(1, 1), p(1, 3)).unwrap_err(),
            SwapError::NotAdjacent { a: p(1, 1), b: p(1, 3) }
        );
        assert!(matches!(c.request_swap(p(1, 1), p(2, 2)), Err(SwapError::NotAdjacent { .. })));
        assert_eq!(
            c.request_swap(p(5, 5), p(5, 6)).unwrap_err(),
            SwapError::OutOfBounds { pos: p(5, 6), size: 6 }
        );
        assert_eq!(c.request_swap(p(0, 1), p(0, 0)).unwrap_err(), SwapError::Obstacle(p(0, 0)));

        assert_eq!(c.grid().compute_hash(), before);
        assert!(c.take_events().is_empty());
    }

    #[test]
    fn test_no_match_swap_reverts_by_default() {
        let mut c = controller(grid_from(&kind_five_rows()), EngineConfig::default());
        let before = c.grid().clone();

        let outcome = c.request_swap(p(0, 0), p(0, 1)).unwrap();
        assert!(!outcome.accepted);
        assert_eq!(outcome.moves_consumed, 0);
        assert_eq!(outcome.points, 0);
        assert_eq!(outcome.final_combo, 0);
        assert_eq!(c.grid(), &before);

        let events = c.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], CascadeEvent::swap_reverted(p(0, 0), p(0, 1)));
    }

    #[test]
    fn test_no_match_swap_as_free_move() {
        let config = EngineConfig {
            no_match: NoMatchPolicy::FreeMove,
            ..EngineConfig::default()
        };
        let mut c = controller(grid_from(&kind_five_rows()), config);

        let outcome = c.request_swap(p(0, 0), p(0, 1)).unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.moves_consumed, 1);
        assert_eq!(outcome.final_combo, 0);
        assert!(outcome.passes.is_empty());
        assert_eq!(outcome.board, BoardStatus::Playable);
        assert_eq!(c.grid().matchable_kind(p(0, 0)), Some(2));
        assert_eq!(c.grid().matchable_kind(p(0, 1)), Some(1));
    }

    #[test]
    fn test_kind_five_run_scores_thirty() {
        let grid = grid_from(&kind_five_rows());
        let mut c = controller(grid, EngineConfig::plain());

        let outcome = c.request_swap(p(2, 3), p(2, 4)).unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.moves_consumed, 1);

        let first = &outcome.passes[0];
        assert_eq!(first.combo, 1);
        assert_eq!(first.removed, BTreeSet::from([p(2, 1), p(2, 2), p(2, 3)]));
        assert_eq!(first.cleared, 3);
        assert_eq!(first.points, 30);
        assert_eq!(first.falls, 6);
        assert_eq!(first.refilled, vec![p(0, 1), p(0, 2), p(0, 3)]);

        assert_eq!(outcome.final_combo as usize, outcome.passes.len());
        assert!(outcome.points >= 30);
        assert!(!has_match(&outcome.grid, 3));
        assert!(outcome.grid.is_full());
    }

    #[test]
    fn test_row_clear_special_swap() {
        let mut grid = grid_from(&base_rows());
        if let Some(tile) = grid.tile_mut(p(2, 2)) {
            tile.special = SpecialEffect::RowClear;
        }
        let mut c = controller(grid, EngineConfig::plain());

        let outcome = c.request_swap(p(2, 2), p(1, 2)).unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.moves_consumed, 1);

        let first = &outcome.passes[0];
        let row: BTreeSet<Position> = (0..6).map(|col| p(1, col)).collect();
        assert_eq!(first.removed, row);
        assert_eq!(first.cleared, 6);
        assert_eq!(first.points, 60);
        assert!(!has_match(c.grid(), 3));
    }

    #[test]
    fn test_discrete_steps_and_in_progress_rejection() {
        let mut c = controller(grid_from(&kind_five_rows()), EngineConfig::plain());
        assert_eq!(c.begin_swap(p(2, 3), p(2, 4)).unwrap(), SwapStart::Cascading);
        assert_eq!(c.phase(), Phase::Resolving);
        assert_eq!(c.pending_matches().len(), 1);

        assert_eq!(c.request_swap(p(0, 0), p(0, 1)).unwrap_err(), SwapError::CascadeInProgress);

        let mut passes = 0;
        let mut points = 0;
        while let Some(report) = c.step() {
            passes += 1;
            points += report.points;
            assert_eq!(report.combo, passes);
        }
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.combo(), passes);
        assert!(c.step().is_none());

        let events = c.take_events();
        assert_eq!(events[0], CascadeEvent::swapped(p(2, 3), p(2, 4)));
        assert_eq!(events[0].phase, EventPhase::Swap);
        assert!(events.contains(&CascadeEvent::settled(passes, points, passes)));
        assert!(events.iter().any(|e| e.data == CascadeEventData::ComboReset));
    }

    #[test]
    fn test_ended_session_rejects_swaps() {
        let mut c = controller(grid_from(&kind_five_rows()), EngineConfig::default());
        c.end_session();
        assert_eq!(c.request_swap(p(2, 3), p(2, 4)).unwrap_err(), SwapError::SessionEnded);
    }

    #[test]
    fn test_dead_board_reshuffles_after_free_move() {
        let config = EngineConfig {
            no_match: NoMatchPolicy::FreeMove,
            max_reshuffle_attempts: 50,
            ..EngineConfig::default()
        };
        let mut c = controller(grid_from(&base_rows()), config);

        let outcome = c.request_swap(p(0, 0), p(0, 1)).unwrap();
        assert!(matches!(outcome.board, BoardStatus::Reshuffled { .. }));
        assert!(is_ready(c.grid(), 3));
        assert!(c.is_playable());
        assert!(c
            .take_events()
            .iter()
            .any(|e| matches!(e.data, CascadeEventData::Reshuffled { .. })));
    }

    #[test]
    fn test_unplayable_board_is_signalled() {
        // Rows sealed off by obstacles; no arrangement of {1,1,1,2,3,3} has a move
        let rows: Vec<Vec<u8>> = vec![vec![1, 2, 1], vec![99, 99, 99], vec![3, 1, 3]];
        let grid = Grid::from_codes(&rows, &mut SequentialIds::new()).unwrap();
        let level = LevelConfig {
            grid_size: 3,
            tile_kind_count: 3,
            ..LevelConfig::default()
        };
        let config = EngineConfig {
            no_match: NoMatchPolicy::FreeMove,
            max_reshuffle_attempts: 3,
            ..EngineConfig::default()
        };
        let mut c = CascadeController::with_grid(
            level,
            config,
            grid,
            DeterministicRng::new(5),
            SequentialIds::starting_at(100),
        )
        .unwrap();

        let outcome = c.request_swap(p(0, 0), p(0, 1)).unwrap();
        assert_eq!(outcome.board, BoardStatus::Unplayable { attempts: 3 });
        assert!(outcome.board.is_unplayable());
        assert_eq!(c.grid().matchable_kind(p(0, 0)), Some(2));
    }

    #[test]
    fn test_with_grid_rejects_bad_boards() {
        let small = Grid::from_codes(&[[1u8, 2, 3], [4, 5, 6], [7, 8, 9]], &mut SequentialIds::new()).unwrap();
        let result = Controller::with_grid(
            LevelConfig::default(),
            EngineConfig::default(),
            small,
            DeterministicRng::new(1),
            SequentialIds::new(),
        );
        assert!(matches!(result, Err(ConfigError::Board(GridError::WrongDimensions { .. }))));

        let mut holey = grid_from(&base_rows());
        holey.take(p(3, 3)).unwrap();
        let result = Controller::with_grid(
            LevelConfig::default(),
            EngineConfig::default(),
            holey,
            DeterministicRng::new(1),
            SequentialIds::new(),
        );
        assert!(matches!(result, Err(ConfigError::Board(_))));
    }

    #[test]
    fn test_new_board_is_ready_and_deterministic() {
        for id in [1, 2, 3, 7] {
            let level = builtin(id).unwrap();
            let a = Controller::for_session(level.clone(), EngineConfig::default(), 42).unwrap();
            let b = Controller::for_session(level.clone(), EngineConfig::default(), 42).unwrap();
            assert!(is_ready(a.grid(), level.min_match_length));
            assert!(!a.board_status().is_unplayable());
            assert_eq!(a.grid().compute_hash(), b.grid().compute_hash());
            for (_, tile) in a.grid().tiles() {
                if tile.kind != TileKind::Obstacle {
                    assert_eq!(tile.special, SpecialEffect::None);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_cascade() {
        let play = || {
            let mut c = Controller::for_session(builtin(4).unwrap(), EngineConfig::default(), 7).unwrap();
            let mut total = 0;
            for _ in 0..5 {
                let Some((a, b)) = c.hint() else { break };
                total += c.request_swap(a, b).unwrap().points;
            }
            (total, c.grid().compute_hash())
        };
        assert_eq!(play(), play());
    }
}
