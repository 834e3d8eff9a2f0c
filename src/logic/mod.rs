//! Group stage engine: seeding, fixtures, referees, scoring, standings, setup.

mod decode;
mod export;
mod fixtures;
mod referee;
mod scoring;
mod seeding;
mod setup;
mod standings;

pub use decode::DecodeError;
pub use export::{format_diff, schedule_csv, standings_csv};
pub use fixtures::{fixture_rounds, generate_fixtures, Pairing, Round};
pub use referee::{assign_referee, RefereeCounts};
pub use scoring::{parse_score_input, record_set_score, score_match};
pub use seeding::snake_seed;
pub use setup::{generate_tournament, group_name, parse_team_names, TournamentConfig};
pub use standings::compute_standings;
