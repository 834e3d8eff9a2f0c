//! Typed boundary between persisted JSON and the tournament model.
//!
//! Loading is strict: serde rejects missing or mistyped fields, then
//! [`Tournament::validate`] checks the invariants the engine relies on. A
//! document that fails either step never reaches the engine.

use crate::logic::fixtures::generate_fixtures;
use crate::logic::scoring::score_match;
use crate::models::{Group, TeamId, Tournament};

/// Why a persisted document was rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// Not JSON, or JSON of the wrong shape.
    Json(String),
    /// Well-formed but inconsistent.
    Invalid(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Json(msg) => write!(f, "Invalid tournament data format: {}", msg),
            DecodeError::Invalid(msg) => write!(f, "Invalid tournament data: {}", msg),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Json(e.to_string())
    }
}

fn invalid(msg: String) -> DecodeError {
    DecodeError::Invalid(msg)
}

impl Tournament {
    /// Decode and validate a persisted document.
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let tournament: Tournament = serde_json::from_str(json)?;
        tournament.validate()?;
        Ok(tournament)
    }

    pub fn to_json(&self) -> Result<String, DecodeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check the invariants of a whole document.
    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.team_names.len() != self.num_teams {
            return Err(invalid(format!(
                "numTeams is {} but {} team names are stored",
                self.num_teams,
                self.team_names.len()
            )));
        }
        if self.team_names.iter().any(|t| t.trim().is_empty()) {
            return Err(invalid("blank team name".to_string()));
        }
        if self.groups.len() != self.num_groups {
            return Err(invalid(format!(
                "numGroups is {} but {} groups are stored",
                self.num_groups,
                self.groups.len()
            )));
        }
        let mut rostered: Vec<&TeamId> = self.groups.iter().flat_map(|g| &g.teams).collect();
        let mut named: Vec<&TeamId> = self.team_names.iter().collect();
        rostered.sort();
        named.sort();
        if rostered != named {
            return Err(invalid("group rosters do not partition teamNames".to_string()));
        }
        for group in &self.groups {
            self.validate_group(group)?;
        }
        Ok(())
    }

    fn validate_group(&self, group: &Group) -> Result<(), DecodeError> {
        let mode = self.scoring_mode();
        let in_roster = |team: &str| group.teams.iter().any(|t| t == team);

        for (i, game) in group.matches.iter().enumerate() {
            let label = format!("{} match {}", group.name, i + 1);
            if !in_roster(game.team1.as_str()) || !in_roster(game.team2.as_str()) {
                return Err(invalid(format!("{}: team not in group roster", label)));
            }
            if game.team1 == game.team2 {
                return Err(invalid(format!("{}: team paired with itself", label)));
            }
            if let Some(referee) = &game.referee {
                if !self.assign_refs {
                    return Err(invalid(format!("{}: referee set but assignRefs is off", label)));
                }
                if !in_roster(referee.as_str()) || game.involves(referee) {
                    return Err(invalid(format!("{}: referee '{}' is not eligible", label, referee)));
                }
            }
            if game.results != score_match(game.results.sets, mode) {
                return Err(invalid(format!("{}: stored result does not match its set scores", label)));
            }
        }

        // Every roster pair plays exactly once, in whichever orientation.
        let mut stored: Vec<(&str, &str)> = group
            .matches
            .iter()
            .map(|g| unordered(&g.team1, &g.team2))
            .collect();
        let fixtures = generate_fixtures(&group.teams);
        let mut expected: Vec<(&str, &str)> = fixtures.iter().map(|(a, b)| unordered(a, b)).collect();
        stored.sort_unstable();
        expected.sort_unstable();
        if stored != expected {
            return Err(invalid(format!(
                "{}: matches do not cover each roster pair exactly once",
                group.name
            )));
        }
        Ok(())
    }
}

fn unordered<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
