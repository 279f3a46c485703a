//! Point rules.
//!
//! A segment (row or column) scores from the counts of the six standard
//! kinds it holds. Six identical tiles in one segment is an instant win,
//! represented by [`Score::Win`], which dominates any finite total.

use crate::board::{Board, Team};
use crate::tile::STANDARD_KINDS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Points awarded when all six standard kinds appear exactly once
const ALL_DIFFERENT_POINTS: u32 = 6;

/// Segment points threatening an instant win (five of a kind)
pub const HAZARD_POINTS: u32 = 7;

/// Score of a segment or a team.
///
/// `Points(_) < Win` for every finite value, so `max`/comparisons treat the
/// win sentinel as dominating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Score {
    Points(u32),
    /// Win of sixes
    Win,
}

impl Score {
    pub const ZERO: Score = Score::Points(0);

    pub fn is_win(self) -> bool {
        self == Score::Win
    }

    /// Finite points, or `None` for the win sentinel
    pub fn points(self) -> Option<u32> {
        match self {
            Score::Points(p) => Some(p),
            Score::Win => None,
        }
    }

    /// Signed difference `self - before`. A win saturates to `i64::MAX`.
    pub fn gain_over(self, before: Score) -> i64 {
        match (self, before) {
            (Score::Win, Score::Win) => 0,
            (Score::Win, _) => i64::MAX,
            (_, Score::Win) => i64::MIN,
            (Score::Points(after), Score::Points(before)) => after as i64 - before as i64,
        }
    }
}

impl Default for Score {
    fn default() -> Self {
        Score::ZERO
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        match (self, rhs) {
            (Score::Points(a), Score::Points(b)) => Score::Points(a + b),
            _ => Score::Win,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Points(p) => write!(f, "{p}"),
            Score::Win => f.write_str("WIN"),
        }
    }
}

/// Score one segment from its six standard-kind counts
pub fn segment_score(counts: &[u32; STANDARD_KINDS]) -> Score {
    if counts.iter().all(|c| *c == 1) {
        return Score::Points(ALL_DIFFERENT_POINTS);
    }

    let mut points = 0;
    for &count in counts {
        points += match count {
            2 => 1,
            3 => 3,
            4 => 5,
            5 => 7,
            c if c >= 6 => return Score::Win,
            _ => 0,
        };
    }
    Score::Points(points)
}

/// Score of the segment with the given index for `team`
pub fn board_segment_score(board: &Board, index: usize, team: Team) -> Score {
    segment_score(&board.occurrences_at_segment(index, team).standard())
}

/// Scores of all of a team's segments, in index order
pub fn segment_scores(board: &Board, team: Team) -> Vec<Score> {
    (0..board.size())
        .map(|i| board_segment_score(board, i, team))
        .collect()
}

/// Sum of a team's segment scores; any winning segment makes the team win
pub fn team_score(board: &Board, team: Team) -> Score {
    segment_scores(board, team)
        .into_iter()
        .fold(Score::ZERO, |total, s| total + s)
}
