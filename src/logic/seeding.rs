//! Snake seeding: distribute a ranked list into groups.

/// Distribute `teams` (best seed first) into `num_groups` groups in
/// boustrophedon order: 0, 1, .., G-1, G-1, .., 1, 0, 0, 1, ..
///
/// Group sizes differ by at most one and relative input order is kept within
/// each group. Returns an empty `Vec` when `teams` is empty or `num_groups` is
/// not in `1..=teams.len()`; callers treat that as a configuration error.
pub fn snake_seed<T: Clone>(teams: &[T], num_groups: usize) -> Vec<Vec<T>> {
    if teams.is_empty() || num_groups == 0 || num_groups > teams.len() {
        return Vec::new();
    }

    let mut groups: Vec<Vec<T>> = vec![Vec::new(); num_groups];
    let mut index = 0usize;
    let mut forward = true;

    for team in teams {
        groups[index].push(team.clone());
        // At either end the direction flips and the same group receives the next seed.
        match (forward, index) {
            (true, i) if i + 1 == num_groups => forward = false,
            (false, 0) => forward = true,
            (true, _) => index += 1,
            (false, _) => index -= 1,
        }
    }

    groups
}
