//! "Did you mean ...?" hints for misspelled names.

/// Levenshtein distance, case-insensitive.
fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            row[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }
    prev[b.len()]
}

/// The candidate closest to `name`, if it is close enough to be a typo.
pub(crate) fn closest<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let limit = (name.chars().count() / 3).max(2);
    candidates
        .into_iter()
        .map(|c| (distance(name, c), c))
        .filter(|&(d, _)| d <= limit)
        .min_by_key(|&(d, _)| d)
        .map(|(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        assert_eq!(distance("move", "move"), 0);
        assert_eq!(distance("mvoe", "move"), 2);
        assert_eq!(distance("turnleft", "turnLeft"), 0);
        assert_eq!(distance("", "abc"), 3);
    }

    #[test]
    fn closest_finds_typos() {
        let names = ["move", "turnLeft", "turnRight", "putBeeper"];
        assert_eq!(closest("turnLft", names), Some("turnLeft"));
        assert_eq!(closest("TurnRight", names), Some("turnRight"));
        assert_eq!(closest("mvoe", names), Some("move"));
        assert_eq!(closest("jump", names), None);
    }
}
