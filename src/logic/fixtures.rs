//! Round-robin fixtures for one group (circle method).

use crate::models::TeamId;

/// Two teams meeting in one match: (team 1, team 2).
pub type Pairing = (TeamId, TeamId);

/// One round of the circle schedule.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Round {
    pub pairings: Vec<Pairing>,
    /// Team drawn against the empty slot this round (odd group sizes only).
    pub bye: Option<TeamId>,
}

/// Full schedule for `teams`, grouped by round.
///
/// Odd group sizes get an empty slot appended; whoever is paired with it sits
/// the round out. Position 0 stays fixed and the last position moves to index 1
/// after every round.
pub fn fixture_rounds(teams: &[TeamId]) -> Vec<Round> {
    if teams.len() < 2 {
        return Vec::new();
    }

    let mut slots: Vec<Option<&TeamId>> = teams.iter().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }
    let n = slots.len();
    let mut order: Vec<usize> = (0..n).collect();
    let mut rounds = Vec::with_capacity(n - 1);

    for _ in 0..n - 1 {
        let mut round = Round::default();
        for i in 0..n / 2 {
            match (slots[order[i]], slots[order[n - 1 - i]]) {
                (Some(a), Some(b)) => round.pairings.push((a.clone(), b.clone())),
                (Some(t), None) | (None, Some(t)) => round.bye = Some(t.clone()),
                (None, None) => {}
            }
        }
        rounds.push(round);

        if n > 2 {
            if let Some(last) = order.pop() {
                order.insert(1, last);
            }
        }
    }

    rounds
}

/// Every pairing of the group in schedule order, byes dropped.
///
/// Each unordered pair of teams appears exactly once: `n * (n - 1) / 2`
/// matches for `n` teams, none for fewer than two.
pub fn generate_fixtures(teams: &[TeamId]) -> Vec<Pairing> {
    fixture_rounds(teams)
        .into_iter()
        .flat_map(|round| round.pairings)
        .collect()
}
