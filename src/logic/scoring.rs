//! Match scoring under both rule sets, and the single-score edit turn.

use crate::models::{MatchResult, ScoringMode, SetScore, Side, Tournament, TournamentError, SET_SLOTS};

/// Both scores of a set, if the set has been played.
fn played(set: &SetScore) -> Option<(u32, u32)> {
    match *set {
        [Some(a), Some(b)] => Some((a, b)),
        _ => None,
    }
}

/// Running totals while walking the sets of one match.
#[derive(Default)]
struct Tally {
    sets1: u32,
    sets2: u32,
    points1: i64,
    points2: i64,
}

impl Tally {
    fn add(&mut self, (a, b): (u32, u32)) {
        self.points1 += i64::from(a);
        self.points2 += i64::from(b);
        // Equal scores count towards the points but give no set.
        if a > b {
            self.sets1 += 1;
        } else if b > a {
            self.sets2 += 1;
        }
    }

    fn into_result(self, sets: [SetScore; SET_SLOTS], is_complete: bool) -> MatchResult {
        MatchResult {
            sets,
            team1_sets_won: self.sets1,
            team2_sets_won: self.sets2,
            team1_point_diff: self.points1 - self.points2,
            team2_point_diff: self.points2 - self.points1,
            is_complete,
            ..MatchResult::default()
        }
    }
}

/// Recompute a match result from its raw set scores.
///
/// Standard: sets are read in order until one side has two; the first unplayed
/// set stops the walk, so a later set entered before an earlier one is ignored
/// and the match stays incomplete. Match points 3/0 for 2-0, 2/1 for 2-1.
///
/// Shortened: only the first two sets count and the third is cleared. The
/// match is complete once both sets have a score pair, whatever those scores
/// are (a tied set is accepted). One set point per set won.
pub fn score_match(sets: [SetScore; SET_SLOTS], mode: ScoringMode) -> MatchResult {
    match mode {
        ScoringMode::Standard => score_standard(sets),
        ScoringMode::Shortened => score_shortened(sets),
    }
}

fn score_standard(sets: [SetScore; SET_SLOTS]) -> MatchResult {
    let mut tally = Tally::default();
    let mut is_complete = false;

    for set in &sets {
        let Some(scores) = played(set) else {
            break;
        };
        tally.add(scores);
        if tally.sets1 == 2 || tally.sets2 == 2 {
            is_complete = true;
            break;
        }
    }

    let (mp1, mp2) = match (is_complete, tally.sets1, tally.sets2) {
        (true, 2, 0) => (3, 0),
        (true, 2, 1) => (2, 1),
        (true, 1, 2) => (1, 2),
        (true, 0, 2) => (0, 3),
        _ => (0, 0),
    };

    MatchResult {
        team1_match_points: mp1,
        team2_match_points: mp2,
        ..tally.into_result(sets, is_complete)
    }
}

fn score_shortened(mut sets: [SetScore; SET_SLOTS]) -> MatchResult {
    let playable = ScoringMode::Shortened.playable_sets();
    for set in sets.iter_mut().skip(playable) {
        *set = [None, None];
    }

    let mut tally = Tally::default();
    let mut played_sets = 0;
    for scores in sets.iter().take(playable).filter_map(played) {
        tally.add(scores);
        played_sets += 1;
    }

    let is_complete = played_sets == playable;
    let (sp1, sp2) = (tally.sets1, tally.sets2);
    MatchResult {
        team1_set_points: sp1,
        team2_set_points: sp2,
        ..tally.into_result(sets, is_complete)
    }
}

/// Parse one raw score field. Blank means "not entered".
///
/// Anything else must be a non-negative whole number; the caller keeps the
/// previous value on error.
pub fn parse_score_input(raw: &str) -> Result<Option<u32>, TournamentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| TournamentError::InvalidScore(raw.to_string()))
}

/// One interactive edit: store a single score and rescore that match.
///
/// Returns the recomputed result. Standings of the group are derived on demand
/// by the caller afterwards.
pub fn record_set_score(
    tournament: &mut Tournament,
    group: usize,
    match_index: usize,
    set: usize,
    side: Side,
    score: Option<u32>,
) -> Result<MatchResult, TournamentError> {
    let mode = tournament.scoring_mode();
    if set >= SET_SLOTS {
        return Err(TournamentError::SetOutOfRange(set));
    }
    if set >= mode.playable_sets() {
        return Err(TournamentError::SetNotPlayed(set));
    }

    let game = tournament.match_mut(group, match_index)?;
    let mut sets = game.results.sets;
    sets[set][side.index()] = score;
    game.results = score_match(sets, mode);

    log::debug!(
        "Scored {} vs {} (set {}): {}-{} sets, complete={}",
        game.team1,
        game.team2,
        set + 1,
        game.results.team1_sets_won,
        game.results.team2_sets_won,
        game.results.is_complete
    );
    Ok(game.results.clone())
}
