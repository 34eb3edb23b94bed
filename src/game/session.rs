//! Session
//!
//! Caller-side counters around a [`CascadeController`]. The engine only
//! reports deltas (points, moves consumed, combo); the session applies them and
//! decides when a stage is cleared or failed.

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::core::hash::{StateHash, StateHasher};
use crate::core::ids::{IdSource, SequentialIds};
use crate::core::rng::{DeterministicRng, RandomSource};
use crate::game::cascade::{CascadeController, SwapError, SwapOutcome};
use crate::game::config::{ConfigError, EngineConfig};
use crate::game::grid::{Grid, Position};
use crate::game::level::LevelConfig;
use crate::INITIAL_LIVES;

/// How a stage ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageOutcome {
    /// Target score reached
    Cleared,
    /// Moves ran out below target; costs a life
    Failed,
    /// Reshuffles could not produce a legal move
    BoardUnplayable,
}

/// One player's run at a stage.
pub struct Session<R: RandomSource, I: IdSource> {
    controller: CascadeController<R, I>,
    score: u64,
    moves_remaining: u32,
    combo: u32,
    lives: u32,
    best_score: u64,
    outcome: Option<StageOutcome>,
}

impl Session<DeterministicRng, SequentialIds> {
    /// Start `level` with a board seeded from `player_seed`.
    pub fn start(level: LevelConfig, config: EngineConfig, player_seed: u64) -> Result<Self, ConfigError> {
        let controller = CascadeController::for_session(level, config, player_seed)?;
        Ok(Self::new(controller))
    }

    /// Replay the stage on a fresh board.
    ///
    /// Lives and best score carry over. Returns `false` (and changes nothing)
    /// when no lives are left.
    pub fn retry(&mut self, player_seed: u64) -> Result<bool, ConfigError> {
        if self.lives == 0 {
            return Ok(false);
        }
        let level = self.controller.level().clone();
        let config = self.controller.config().clone();
        let moves = level.move_limit;
        self.controller = CascadeController::for_session(level, config, player_seed)?;
        self.moves_remaining = moves;
        self.score = 0;
        self.combo = 0;
        self.outcome = None;
        self.check_board();
        Ok(true)
    }
}

impl<R: RandomSource, I: IdSource> Session<R, I> {
    /// Wrap a controller with fresh counters.
    pub fn new(controller: CascadeController<R, I>) -> Self {
        let mut session = Self {
            moves_remaining: controller.level().move_limit,
            controller,
            score: 0,
            combo: 0,
            lives: INITIAL_LIVES,
            best_score: 0,
            outcome: None,
        };
        session.check_board();
        session
    }

    /// Play one swap and apply its result.
    pub fn play(&mut self, a: Position, b: Position) -> Result<SwapOutcome, SwapError> {
        let outcome = self.controller.request_swap(a, b)?;
        if outcome.accepted {
            self.moves_remaining = self.moves_remaining.saturating_sub(outcome.moves_consumed);
            self.score += outcome.points;
            self.best_score = self.best_score.max(self.score);
            self.combo = outcome.final_combo;
            self.check_outcome();
        }
        Ok(outcome)
    }

    /// Reset the displayed combo (after the combo banner delay).
    pub fn clear_combo(&mut self) {
        self.combo = 0;
    }

    fn check_board(&mut self) {
        if self.controller.board_status().is_unplayable() {
            self.finish(StageOutcome::BoardUnplayable);
        }
    }

    fn check_outcome(&mut self) {
        let target = self.controller.level().target_score;
        if self.score >= target {
            self.finish(StageOutcome::Cleared);
        } else if self.controller.board_status().is_unplayable() {
            self.finish(StageOutcome::BoardUnplayable);
        } else if self.moves_remaining == 0 {
            self.lives = self.lives.saturating_sub(1);
            self.finish(StageOutcome::Failed);
        }
    }

    fn finish(&mut self, outcome: StageOutcome) {
        info!(
            level = self.controller.level().id,
            ?outcome,
            score = self.score,
            target = self.controller.level().target_score,
            moves_remaining = self.moves_remaining,
            lives = self.lives,
            "Stage finished"
        );
        self.outcome = Some(outcome);
        self.controller.end_session();
    }

    /// Current score.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Moves left.
    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    /// Combo shown to the player.
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Lives left.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Highest score reached in this session, across retries.
    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Stage result, once decided.
    pub fn outcome(&self) -> Option<StageOutcome> {
        self.outcome
    }

    /// Is the stage over?
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Current board.
    pub fn grid(&self) -> &Grid {
        self.controller.grid()
    }

    /// First legal move.
    pub fn hint(&self) -> Option<(Position, Position)> {
        self.controller.hint()
    }

    /// Underlying engine.
    pub fn controller(&self) -> &CascadeController<R, I> {
        &self.controller
    }

    /// Underlying engine (for draining events or stepping manually).
    pub fn controller_mut(&mut self) -> &mut CascadeController<R, I> {
        &mut self.controller
    }

    /// Hash of board and counters, for replay comparison.
    pub fn state_hash(&self) -> StateHash {
        let mut hasher = StateHasher::new(b"TILE_CASCADE_SESSION_V1");
        hasher.update_bytes(&self.controller.grid().compute_hash());
        hasher.update_u64(self.score);
        hasher.update_u32(self.moves_remaining);
        hasher.update_u32(self.lives);
        hasher.update_u32(self.combo);
        hasher.update_bool(self.outcome.is_some());
        hasher.finalize()
    }
}
