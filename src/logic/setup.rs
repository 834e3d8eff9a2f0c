//! Setup: validate the configuration and generate groups, fixtures and referees.

use crate::logic::fixtures::generate_fixtures;
use crate::logic::referee::{assign_referee, RefereeCounts};
use crate::logic::seeding::snake_seed;
use crate::models::{GameMatch, Group, TeamId, Tournament, TournamentError};
use serde::{Deserialize, Serialize};

/// Inputs of the setup screen.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub num_teams: usize,
    /// Seed order: best team first.
    pub team_names: Vec<TeamId>,
    pub num_groups: usize,
    #[serde(default)]
    pub assign_refs: bool,
    #[serde(default)]
    pub shorten_group_stage: bool,
}

/// Split a multi-line text field into team names: one per line, trimmed,
/// blank lines dropped.
pub fn parse_team_names(raw: &str) -> Vec<TeamId> {
    raw.lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// "Group A" .. "Group Z", then "Group AA", "Group AB", ..
pub fn group_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.reverse();
    format!("Group {}", letters.into_iter().collect::<String>())
}

fn validate(config: &TournamentConfig) -> Result<Vec<TeamId>, TournamentError> {
    if config.num_teams < 2 {
        return Err(TournamentError::NotEnoughTeams);
    }
    if config.num_groups < 1 {
        return Err(TournamentError::NotEnoughGroups);
    }
    if config.num_groups > config.num_teams {
        return Err(TournamentError::TooManyGroups {
            teams: config.num_teams,
            groups: config.num_groups,
        });
    }
    let teams: Vec<TeamId> = config
        .team_names
        .iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    if teams.is_empty() {
        return Err(TournamentError::MissingTeamNames);
    }
    if teams.len() != config.num_teams {
        return Err(TournamentError::TeamCountMismatch {
            expected: config.num_teams,
            received: teams.len(),
        });
    }
    Ok(teams)
}

/// Build one group: fixtures in schedule order, referees if requested.
fn build_group(index: usize, teams: Vec<TeamId>, assign_refs: bool) -> Group {
    let mut counts = RefereeCounts::for_roster(&teams);
    let matches = generate_fixtures(&teams)
        .into_iter()
        .map(|pairing| {
            let referee = if assign_refs {
                assign_referee(&pairing, &teams, &mut counts)
            } else {
                None
            };
            GameMatch::new(pairing.0, pairing.1, referee)
        })
        .collect();
    Group {
        name: group_name(index),
        teams,
        matches,
    }
}

/// Validate `config` and generate the whole group stage. Nothing is built when
/// validation fails.
pub fn generate_tournament(config: &TournamentConfig) -> Result<Tournament, TournamentError> {
    let teams = validate(config)?;

    let seeded = snake_seed(&teams, config.num_groups);
    if seeded.is_empty() {
        return Err(TournamentError::SeedingFailed);
    }

    let mut tournament = Tournament::new(
        teams,
        config.num_groups,
        config.assign_refs,
        config.shorten_group_stage,
    );
    tournament.groups = seeded
        .into_iter()
        .enumerate()
        .map(|(i, group_teams)| build_group(i, group_teams, config.assign_refs))
        .collect();

    for group in &tournament.groups {
        log::debug!("{}: {} teams, {} matches", group.name, group.teams.len(), group.matches.len());
    }
    log::info!(
        "Generated tournament {}: {} teams in {} groups, {} matches (referees: {}, shortened: {})",
        tournament.id,
        tournament.num_teams,
        tournament.groups.len(),
        tournament.match_count(),
        tournament.assign_refs,
        tournament.shorten_group_stage
    );
    Ok(tournament)
}
