//! Referee assignment: least-loaded free team, seed order breaks ties.

use crate::logic::fixtures::Pairing;
use crate::models::TeamId;
use std::collections::HashMap;

/// Running referee load for one group. Created before the group's fixtures are
/// built, threaded through every [`assign_referee`] call, dropped afterwards.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RefereeCounts {
    counts: HashMap<TeamId, u32>,
}

impl RefereeCounts {
    /// Every roster member starts at zero.
    pub fn for_roster(roster: &[TeamId]) -> Self {
        Self {
            counts: roster.iter().map(|t| (t.clone(), 0)).collect(),
        }
    }

    /// Matches refereed so far (0 for unknown teams).
    pub fn count(&self, team: &str) -> u32 {
        self.counts.get(team).copied().unwrap_or(0)
    }

    fn increment(&mut self, team: &str) {
        *self.counts.entry(team.to_string()).or_insert(0) += 1;
    }
}

/// Pick the referee for `pairing` among the other roster teams.
///
/// Chooses the lowest current count; ties go to the earliest roster entry.
/// The chosen team's count is incremented. Returns `None` when nobody besides
/// the two playing teams is in the roster.
pub fn assign_referee(pairing: &Pairing, roster: &[TeamId], counts: &mut RefereeCounts) -> Option<TeamId> {
    let (team1, team2) = pairing;
    let chosen = roster
        .iter()
        .filter(|t| *t != team1 && *t != team2)
        // min_by_key keeps the first of equal minima, i.e. roster order.
        .min_by_key(|t| counts.count(t))?
        .clone();
    counts.increment(&chosen);
    Some(chosen)
}
