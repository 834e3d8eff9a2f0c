//! CSV views of a group: standings table and match schedule.

use crate::models::{GameMatch, Group, ScoringMode, TeamStanding, TournamentError};

fn export_err(e: impl std::fmt::Display) -> TournamentError {
    TournamentError::Export(e.to_string())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, TournamentError> {
    let bytes = writer.into_inner().map_err(|e| export_err(e.error()))?;
    String::from_utf8(bytes).map_err(export_err)
}

/// Positive differences are shown with a leading `+`.
pub fn format_diff(diff: i64) -> String {
    if diff > 0 {
        format!("+{}", diff)
    } else {
        diff.to_string()
    }
}

/// `Team,Pts,Played,Diff`, one row per standing in the given order. `Pts` is
/// the metric the mode ranks by.
pub fn standings_csv(standings: &[TeamStanding], mode: ScoringMode) -> Result<String, TournamentError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Team", "Pts", "Played", "Diff"]).map_err(export_err)?;
    for s in standings {
        let points = match mode {
            ScoringMode::Standard => s.match_points,
            ScoringMode::Shortened => s.set_points,
        };
        wtr.write_record([
            s.team_name.clone(),
            points.to_string(),
            s.games_played.to_string(),
            format_diff(s.point_difference),
        ])
        .map_err(export_err)?;
    }
    finish(wtr)
}

/// Set scores entered so far, e.g. `25-20 18-25`.
fn result_summary(game: &GameMatch) -> String {
    game.results
        .sets
        .iter()
        .filter_map(|set| match set {
            [Some(a), Some(b)] => Some(format!("{}-{}", a, b)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `Match,Team 1,Team 2,Referee,Result` in schedule order.
pub fn schedule_csv(group: &Group) -> Result<String, TournamentError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Match", "Team 1", "Team 2", "Referee", "Result"])
        .map_err(export_err)?;
    for (i, game) in group.matches.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            game.team1.clone(),
            game.team2.clone(),
            game.referee.clone().unwrap_or_default(),
            result_summary(game),
        ])
        .map_err(export_err)?;
    }
    finish(wtr)
}
