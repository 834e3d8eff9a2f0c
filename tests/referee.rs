//! Integration tests for referee assignment across a group's fixtures.

use volley_tournament_web::{assign_referee, generate_fixtures, RefereeCounts, TeamId};

fn roster(n: usize) -> Vec<TeamId> {
    (0..n).map(|i| char::from(b'A' + i as u8).to_string()).collect()
}

/// Assign referees to every fixture of a group in schedule order.
fn referee_group(teams: &[TeamId]) -> (Vec<Option<TeamId>>, RefereeCounts) {
    let mut counts = RefereeCounts::for_roster(teams);
    let refs = generate_fixtures(teams)
        .iter()
        .map(|pairing| assign_referee(pairing, teams, &mut counts))
        .collect();
    (refs, counts)
}

fn spread(teams: &[TeamId], counts: &RefereeCounts) -> u32 {
    let loads: Vec<u32> = teams.iter().map(|t| counts.count(t)).collect();
    loads.iter().max().unwrap() - loads.iter().min().unwrap()
}

#[test]
fn four_team_group_assignments_follow_load_then_seed_order() {
    let teams = roster(4);
    let (refs, counts) = referee_group(&teams);
    let refs: Vec<_> = refs.into_iter().map(Option::unwrap).collect();
    assert_eq!(refs, vec!["B", "A", "D", "C", "C", "A"]);
    assert_eq!(counts.count("A"), 2);
    assert_eq!(counts.count("B"), 1);
}

#[test]
fn referee_never_plays_in_the_match() {
    for n in 3..=10 {
        let teams = roster(n);
        let fixtures = generate_fixtures(&teams);
        let (refs, _) = referee_group(&teams);
        for ((a, b), r) in fixtures.iter().zip(refs) {
            let r = r.expect("a free team exists in groups of 3+");
            assert!(r != *a && r != *b);
            assert!(teams.contains(&r));
        }
    }
}

#[test]
fn no_referee_without_a_free_team() {
    let teams = roster(2);
    let mut counts = RefereeCounts::for_roster(&teams);
    let pairing = ("A".to_string(), "B".to_string());
    assert_eq!(assign_referee(&pairing, &teams, &mut counts), None);
    assert_eq!(counts.count("A"), 0);
}

#[test]
fn ties_go_to_earliest_seed() {
    let teams = roster(5);
    let mut counts = RefereeCounts::for_roster(&teams);
    let pairing = ("A".to_string(), "C".to_string());
    assert_eq!(assign_referee(&pairing, &teams, &mut counts).as_deref(), Some("B"));
    assert_eq!(assign_referee(&pairing, &teams, &mut counts).as_deref(), Some("D"));
    assert_eq!(assign_referee(&pairing, &teams, &mut counts).as_deref(), Some("E"));
    assert_eq!(assign_referee(&pairing, &teams, &mut counts).as_deref(), Some("B"));
}

#[test]
fn load_is_balanced_within_one() {
    for n in (3..=16).filter(|n| *n != 5) {
        let teams = roster(n);
        let (refs, counts) = referee_group(&teams);
        let total: u32 = teams.iter().map(|t| counts.count(t)).sum();
        assert_eq!(total as usize, refs.len());
        assert!(spread(&teams, &counts) <= 1, "n={n}");
    }
}

#[test]
fn five_team_group_greedy_spread_is_two() {
    // Greedy choice cannot balance the last match of a 5-team schedule: the
    // least-loaded team plays in it.
    let teams = roster(5);
    let (refs, counts) = referee_group(&teams);
    let refs: Vec<_> = refs.into_iter().map(Option::unwrap).collect();
    assert_eq!(refs, vec!["A", "B", "C", "D", "E", "A", "B", "C", "D", "A"]);
    assert_eq!(spread(&teams, &counts), 2);
}

#[test]
fn counts_are_per_group() {
    let first = roster(4);
    let (_, counts) = referee_group(&first);
    let fresh = RefereeCounts::for_roster(&first);
    assert_ne!(counts, fresh);
    assert_eq!(fresh.count("A"), 0);
}
