//! TeamStanding: one row of a group table.

use crate::models::game::ScoringMode;
use serde::{Deserialize, Serialize};

/// Derived per-team totals for a group. Never persisted.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub team_name: String,
    pub match_points: u32,
    pub set_points: u32,
    pub games_played: u32,
    pub point_difference: i64,
}

impl TeamStanding {
    /// All-zero row for a team that has not played yet.
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            ..Self::default()
        }
    }

    /// Count one completed match for this team. Only the metric of the active
    /// mode moves; the other stays at 0.
    pub fn record_game(&mut self, points: u32, point_diff: i64, mode: ScoringMode) {
        self.games_played += 1;
        self.point_difference += point_diff;
        match mode {
            ScoringMode::Standard => self.match_points += points,
            ScoringMode::Shortened => self.set_points += points,
        }
    }
}
