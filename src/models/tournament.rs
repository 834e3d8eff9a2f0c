//! Tournament root aggregate and TournamentError.

use crate::models::game::{GameMatch, ScoringMode, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Fewer than 2 teams requested.
    NotEnoughTeams,
    /// Fewer than 1 group requested.
    NotEnoughGroups,
    /// More groups than teams.
    TooManyGroups { teams: usize, groups: usize },
    /// No team names given at all.
    MissingTeamNames,
    /// Number of names does not match the requested team count.
    TeamCountMismatch { expected: usize, received: usize },
    /// Seeding produced no groups for an otherwise valid configuration.
    SeedingFailed,
    /// No group at this index.
    GroupNotFound(usize),
    /// No match at this index within the group.
    MatchNotFound { group: usize, index: usize },
    /// Set index beyond the stored set slots.
    SetOutOfRange(usize),
    /// Set exists in storage but is not played in the current mode.
    SetNotPlayed(usize),
    /// Score input that is not a non-negative integer.
    InvalidScore(String),
    /// Writing a CSV view failed.
    Export(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::NotEnoughTeams => write!(f, "Please enter at least 2 teams"),
            TournamentError::NotEnoughGroups => write!(f, "Please enter at least 1 group"),
            TournamentError::TooManyGroups { teams, groups } => {
                write!(f, "Cannot have more groups ({}) than teams ({})", groups, teams)
            }
            TournamentError::MissingTeamNames => write!(f, "Please enter team names"),
            TournamentError::TeamCountMismatch { expected, received } => {
                write!(f, "Expected {} teams, received {}", expected, received)
            }
            TournamentError::SeedingFailed => write!(f, "Could not generate groups based on inputs"),
            TournamentError::GroupNotFound(i) => write!(f, "Group {} not found", i),
            TournamentError::MatchNotFound { group, index } => {
                write!(f, "Match {} not found in group {}", index, group)
            }
            TournamentError::SetOutOfRange(i) => write!(f, "Set {} does not exist", i),
            TournamentError::SetNotPlayed(i) => {
                write!(f, "Set {} is not played in the shortened group stage", i)
            }
            TournamentError::InvalidScore(raw) => {
                write!(f, "Invalid score '{}': must be a non-negative whole number", raw)
            }
            TournamentError::Export(msg) => write!(f, "Export failed: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament (also the storage key).
pub type TournamentId = Uuid;

/// One group of the round-robin stage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    /// Seeding order; referee tie-breaks follow it.
    pub teams: Vec<TeamId>,
    /// Schedule order.
    pub matches: Vec<GameMatch>,
}

/// Full tournament document. Persisted and reloaded as a whole.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub created_at: DateTime<Utc>,
    pub num_teams: usize,
    pub team_names: Vec<TeamId>,
    pub num_groups: usize,
    pub assign_refs: bool,
    pub shorten_group_stage: bool,
    pub groups: Vec<Group>,
}

impl Tournament {
    /// Empty tournament shell; `generate_tournament` fills in the groups.
    pub fn new(team_names: Vec<TeamId>, num_groups: usize, assign_refs: bool, shorten_group_stage: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            num_teams: team_names.len(),
            team_names,
            num_groups,
            assign_refs,
            shorten_group_stage,
            groups: Vec::new(),
        }
    }

    pub fn scoring_mode(&self) -> ScoringMode {
        ScoringMode::from_shortened(self.shorten_group_stage)
    }

    pub fn group(&self, index: usize) -> Result<&Group, TournamentError> {
        self.groups.get(index).ok_or(TournamentError::GroupNotFound(index))
    }

    pub fn group_mut(&mut self, index: usize) -> Result<&mut Group, TournamentError> {
        self.groups.get_mut(index).ok_or(TournamentError::GroupNotFound(index))
    }

    /// Mutable match lookup by (group, match) coordinate.
    pub fn match_mut(&mut self, group: usize, index: usize) -> Result<&mut GameMatch, TournamentError> {
        self.group_mut(group)?
            .matches
            .get_mut(index)
            .ok_or(TournamentError::MatchNotFound { group, index })
    }

    /// Total scheduled matches across all groups.
    pub fn match_count(&self) -> usize {
        self.groups.iter().map(|g| g.matches.len()).sum()
    }
}
