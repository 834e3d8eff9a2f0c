//! Data structures for the group stage: teams, groups, matches, standings.

mod game;
mod standing;
mod tournament;

pub use game::{GameMatch, MatchResult, ScoringMode, SetScore, Side, TeamId, SET_SLOTS};
pub use standing::TeamStanding;
pub use tournament::{Group, Tournament, TournamentError, TournamentId};
