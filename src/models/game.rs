//! Match (game), its set scores and result, and the scoring mode.

use serde::{Deserialize, Serialize};

/// Team display name. Used as a lookup key, so duplicate names collide.
pub type TeamId = String;

/// Scores of one set: `[team1, team2]`, `None` when not entered yet.
pub type SetScore = [Option<u32>; 2];

/// Number of set slots stored per match (best of 3).
pub const SET_SLOTS: usize = 3;

/// Which side of a match a score belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

impl Side {
    /// Index of this side within a [`SetScore`].
    pub fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }
}

/// Rule set of the group stage.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScoringMode {
    /// Best of 3 sets, ranked by match points (3/0, 2/1).
    Standard,
    /// Exactly 2 sets, ranked by sets won ("set points").
    Shortened,
}

impl ScoringMode {
    pub fn from_shortened(shortened: bool) -> Self {
        if shortened {
            ScoringMode::Shortened
        } else {
            ScoringMode::Standard
        }
    }

    /// How many of the stored set slots are actually played.
    pub fn playable_sets(self) -> usize {
        match self {
            ScoringMode::Standard => SET_SLOTS,
            ScoringMode::Shortened => 2,
        }
    }
}

/// Result of a match, recomputed from `sets` on every edit.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub sets: [SetScore; SET_SLOTS],
    pub team1_sets_won: u32,
    pub team2_sets_won: u32,
    /// Standard mode only.
    pub team1_match_points: u32,
    pub team2_match_points: u32,
    /// Shortened mode only: one point per set won.
    pub team1_set_points: u32,
    pub team2_set_points: u32,
    /// Always `-team2_point_diff`.
    pub team1_point_diff: i64,
    pub team2_point_diff: i64,
    pub is_complete: bool,
}

impl MatchResult {
    /// Match points or set points for one side, depending on the mode.
    pub fn points_for(&self, side: Side, mode: ScoringMode) -> u32 {
        match (mode, side) {
            (ScoringMode::Standard, Side::One) => self.team1_match_points,
            (ScoringMode::Standard, Side::Two) => self.team2_match_points,
            (ScoringMode::Shortened, Side::One) => self.team1_set_points,
            (ScoringMode::Shortened, Side::Two) => self.team2_set_points,
        }
    }

    pub fn point_diff_for(&self, side: Side) -> i64 {
        match side {
            Side::One => self.team1_point_diff,
            Side::Two => self.team2_point_diff,
        }
    }
}

/// A single group match. Teams and referee are fixed at generation; only
/// `results` changes afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub team1: TeamId,
    pub team2: TeamId,
    /// None when referees are not assigned or nobody is free.
    pub referee: Option<TeamId>,
    pub results: MatchResult,
}

impl GameMatch {
    pub fn new(team1: impl Into<TeamId>, team2: impl Into<TeamId>, referee: Option<TeamId>) -> Self {
        Self {
            team1: team1.into(),
            team2: team2.into(),
            referee,
            results: MatchResult::default(),
        }
    }

    /// Team on the given side.
    pub fn team(&self, side: Side) -> &TeamId {
        match side {
            Side::One => &self.team1,
            Side::Two => &self.team2,
        }
    }

    /// True when `team` plays in this match.
    pub fn involves(&self, team: &str) -> bool {
        self.team1 == team || self.team2 == team
    }
}
