//! Volleyball group stage organizer: library with models, engine and storage.

pub mod logic;
pub mod models;
pub mod storage;

pub use logic::{
    assign_referee, compute_standings, fixture_rounds, format_diff, generate_fixtures,
    generate_tournament, group_name, parse_score_input, parse_team_names, record_set_score,
    schedule_csv, score_match, snake_seed, standings_csv, DecodeError, Pairing, RefereeCounts,
    Round, TournamentConfig,
};
pub use models::{
    GameMatch, Group, MatchResult, ScoringMode, SetScore, Side, TeamId, TeamStanding, Tournament,
    TournamentError, TournamentId, SET_SLOTS,
};
pub use storage::{JsonFileStore, MemoryStore, StorageError, TournamentStore};
