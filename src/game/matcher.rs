//! Match Detection
//!
//! Scans rows left-to-right and columns top-to-bottom for maximal runs of one
//! basic kind, merges same-kind runs that cross into single groups, and
//! classifies each group against the [`SpecialPolicy`] table.
//!
//! Obstacles and empty cells break runs. Trigger positions only influence
//! output order and spawn placement, never which cells match.

use std::collections::BTreeSet;

use crate::game::config::{MatchShape, SpecialPolicy};
use crate::game::grid::{Grid, Position};
use crate::game::tile::SpecialEffect;

/// A group of same-kind positions to be cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// Basic kind shared by every position
    pub kind: u8,

    /// Member positions (row-major order)
    pub positions: BTreeSet<Position>,

    /// Effect spawned by this group
    pub special: SpecialEffect,

    /// Cell that receives the spawned tile (set iff `special` is an effect)
    pub spawn: Option<Position>,
}

impl Match {
    /// Synthetic single-cell match used to fire a swapped special tile.
    pub fn trigger(pos: Position, kind: u8) -> Self {
        Self {
            kind,
            positions: BTreeSet::from([pos]),
            special: SpecialEffect::None,
            spawn: None,
        }
    }

    /// Number of member positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false for detected matches.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// =============================================================================
// SEGMENT SCAN
// =============================================================================

#[derive(Debug)]
struct Group {
    kind: u8,
    positions: BTreeSet<Position>,
    horizontal: bool,
    vertical: bool,
    crossings: BTreeSet<Position>,
}

impl Group {
    fn absorb(&mut self, other: Group) {
        self.crossings.extend(self.positions.intersection(&other.positions).copied());
        self.crossings.extend(other.crossings);
        self.positions.extend(other.positions);
        self.horizontal |= other.horizontal;
        self.vertical |= other.vertical;
    }

    fn shape(&self) -> MatchShape {
        match (self.horizontal, self.vertical) {
            (true, true) => MatchShape::Bent,
            (true, false) => MatchShape::Horizontal,
            _ => MatchShape::Vertical,
        }
    }
}

/// Collect every run of length `>= min_len`, rows first then columns.
fn scan_segments(grid: &Grid, min_len: usize) -> Vec<Group> {
    let size = grid.size();
    let mut segments = Vec::new();

    for horizontal in [true, false] {
        for line in 0..size {
            let at = |i: usize| {
                if horizontal {
                    Position::new(line, i)
                } else {
                    Position::new(i, line)
                }
            };

            let mut i = 0;
            while i < size {
                let Some(kind) = grid.matchable_kind(at(i)) else {
                    i += 1;
                    continue;
                };
                let start = i;
                while i < size && grid.matchable_kind(at(i)) == Some(kind) {
                    i += 1;
                }
                if i - start >= min_len {
                    segments.push(Group {
                        kind,
                        positions: (start..i).map(at).collect(),
                        horizontal,
                        vertical: !horizontal,
                        crossings: BTreeSet::new(),
                    });
                }
            }
        }
    }

    segments
}

/// Union same-kind segments sharing a position. Group order follows the
/// earliest member segment.
fn merge_segments(segments: Vec<Group>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::with_capacity(segments.len());

    for segment in segments {
        let mut merged = segment;
        let mut slot = None;
        let mut i = 0;
        while i < groups.len() {
            if groups[i].kind == merged.kind && !groups[i].positions.is_disjoint(&merged.positions) {
                let existing = groups.remove(i);
                merged.absorb(existing);
                slot.get_or_insert(i);
            } else {
                i += 1;
            }
        }
        match slot {
            Some(index) => groups.insert(index, merged),
            None => groups.push(merged),
        }
    }

    groups
}

// =============================================================================
// DETECTION
// =============================================================================

/// Find every match group on the grid.
///
/// Groups that contain a trigger come first; the rest keep scan order. The
/// spawn cell is the first trigger inside the group, else the first crossing
/// cell, else the group's first position.
pub fn find_matches(
    grid: &Grid,
    min_len: usize,
    triggers: &[Position],
    policy: &SpecialPolicy,
) -> Vec<Match> {
    let groups = merge_segments(scan_segments(grid, min_len));

    let (mut triggered, rest): (Vec<Match>, Vec<Match>) = groups
        .into_iter()
        .map(|group| {
            let special = policy.classify(group.shape(), group.positions.len());
            let spawn = if special.is_special() {
                triggers
                    .iter()
                    .find(|pos| group.positions.contains(*pos))
                    .or_else(|| group.crossings.first())
                    .or_else(|| group.positions.first())
                    .copied()
            } else {
                None
            };
            Match {
                kind: group.kind,
                positions: group.positions,
                special,
                spawn,
            }
        })
        .partition(|m| triggers.iter().any(|pos| m.positions.contains(pos)));

    triggered.extend(rest);
    triggered
}

/// Does the grid contain any run of length `>= min_len`?
pub fn has_match(grid: &Grid, min_len: usize) -> bool {
    !scan_segments(grid, min_len).is_empty()
}

/// Would placing `kind` at `pos` complete a run, given the current neighbours?
///
/// The cell at `pos` itself is ignored. Used while generating boards so no
/// run exists before the first swap.
pub fn would_create_match(grid: &Grid, pos: Position, kind: u8, min_len: usize) -> bool {
    let size = grid.size();
    let same = |row: usize, col: usize| grid.matchable_kind(Position::new(row, col)) == Some(kind);

    let left = (0..pos.col).rev().take_while(|&c| same(pos.row, c)).count();
    let right = (pos.col + 1..size).take_while(|&c| same(pos.row, c)).count();
    if left + right + 1 >= min_len {
        return true;
    }

    let up = (0..pos.row).rev().take_while(|&r| same(r, pos.col)).count();
    let down = (pos.row + 1..size).take_while(|&r| same(r, pos.col)).count();
    up + down + 1 >= min_len
}
