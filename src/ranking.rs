// 🏆 Ranker - top-N entries of a tally

use crate::aggregate::Tally;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub key: String,
    pub count: u64,
}

/// Entries in descending count order, at most N long
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedList {
    entries: Vec<RankedEntry>,
}

impl RankedList {
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }
}

/// The `n` most frequent keys. Ties on count are broken by key, ascending
/// (byte-wise), so the result never depends on hash order.
pub fn top_n(tally: &Tally, n: usize) -> RankedList {
    let mut entries: Vec<RankedEntry> = tally
        .iter()
        .map(|(key, count)| RankedEntry {
            key: key.to_string(),
            count,
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    entries.truncate(n);

    RankedList { entries }
}

/// Every key of the tally, ranked
pub fn rank_all(tally: &Tally) -> RankedList {
    top_n(tally, tally.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tally {
        vec![("Rust", 7), ("Go", 3), ("Python", 9), ("C", 3), ("Zig", 1)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_top_n_descending() {
        let ranked = top_n(&sample(), 3);
        let keys: Vec<&str> = ranked.keys().collect();

        assert_eq!(keys, vec!["Python", "Rust", "C"]);
        assert_eq!(ranked.entries()[0].count, 9);
    }

    #[test]
    fn test_ties_broken_by_key() {
        let ranked = rank_all(&sample());
        let keys: Vec<&str> = ranked.keys().collect();

        // Go and C both have 3
        assert_eq!(keys, vec!["Python", "Rust", "C", "Go", "Zig"]);
    }

    #[test]
    fn test_length_is_min_of_n_and_keys() {
        let t = sample();
        for n in 0..8 {
            assert_eq!(top_n(&t, n).len(), n.min(t.len()));
        }
    }

    #[test]
    fn test_excluded_counts_never_exceed_included() {
        let t = sample();
        let ranked = top_n(&t, 2);
        let min_included = ranked.entries().iter().map(|e| e.count).min().unwrap();

        for (key, count) in t.iter() {
            if !ranked.keys().any(|k| k == key) {
                assert!(count <= min_included);
            }
        }
    }

    #[test]
    fn test_empty_tally() {
        assert!(top_n(&Tally::new(), 5).is_empty());
    }
}
