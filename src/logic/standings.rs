//! Group standings from completed matches.

use crate::models::{Group, ScoringMode, Side, TeamStanding};

/// Ranked table for one group.
///
/// Every roster team gets a row, played or not. Only completed matches count.
/// Sorted by the active metric (match points, or set points in shortened mode)
/// then point difference, both descending; equal rows keep roster order.
pub fn compute_standings(group: &Group, mode: ScoringMode) -> Vec<TeamStanding> {
    let mut table: Vec<TeamStanding> = Vec::with_capacity(group.teams.len());
    for team in &group.teams {
        if team.is_empty() || table.iter().any(|s| &s.team_name == team) {
            continue;
        }
        table.push(TeamStanding::new(team.clone()));
    }

    for game in group.matches.iter().filter(|m| m.results.is_complete) {
        for side in [Side::One, Side::Two] {
            let team = game.team(side);
            match table.iter_mut().find(|s| &s.team_name == team) {
                Some(row) => row.record_game(
                    game.results.points_for(side, mode),
                    game.results.point_diff_for(side),
                    mode,
                ),
                None => log::warn!(
                    "{}: team '{}' has a result but is not in the roster; skipped",
                    group.name,
                    team
                ),
            }
        }
    }

    let primary = |s: &TeamStanding| match mode {
        ScoringMode::Standard => s.match_points,
        ScoringMode::Shortened => s.set_points,
    };
    // sort_by is stable.
    table.sort_by(|a, b| {
        primary(b)
            .cmp(&primary(a))
            .then(b.point_difference.cmp(&a.point_difference))
    });
    table
}
