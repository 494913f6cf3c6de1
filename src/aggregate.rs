// 📊 Aggregator - group rows by key and count
// Shared by country, education, branch, language/DBMS and sentiment tallies

use crate::errors::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// TALLY
// ============================================================================

/// Category key → count. Iteration order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tally {
    counts: HashMap<String, u64>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &str) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: &str, count: u64) {
        match self.counts.get_mut(key) {
            Some(existing) => *existing += count,
            None => {
                self.counts.insert(key.to_string(), count);
            }
        }
    }

    /// Count for `key`, 0 when the key was never seen
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Add every count of `other` into `self`
    pub fn merge(&mut self, other: &Tally) {
        for (key, count) in other.iter() {
            self.add(key, count);
        }
    }

    /// Fold partial tallies into one. Order of the parts does not matter.
    pub fn merge_all<'a, I>(parts: I) -> Tally
    where
        I: IntoIterator<Item = &'a Tally>,
    {
        let mut merged = Tally::new();
        for part in parts {
            merged.merge(part);
        }
        merged
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Tally {
    fn from_iter<T: IntoIterator<Item = (K, u64)>>(iter: T) -> Self {
        let mut tally = Tally::new();
        for (key, count) in iter {
            let key: String = key.into();
            tally.add(&key, count);
        }
        tally
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Count keys over the rows that pass `predicate`.
///
/// `key_fn` may yield zero, one or many keys per row; each key is incremented
/// independently.
pub fn tally<'a, R, K, I, S, P>(rows: &'a [R], key_fn: K, predicate: P) -> Tally
where
    K: Fn(&'a R) -> I,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    P: Fn(&R) -> bool,
{
    let mut result = Tally::new();
    for row in rows.iter().filter(|r| predicate(r)) {
        for key in key_fn(row) {
            result.increment(key.as_ref());
        }
    }
    result
}

/// One tally per fixed period bucket, indexed by `period_fn`.
///
/// A row whose period falls outside `0..bucket_count` is a caller error and
/// aborts the whole aggregation.
pub fn tally_by_period<'a, R, F, K, I, S>(
    rows: &'a [R],
    bucket_count: usize,
    period_fn: F,
    key_fn: K,
) -> Result<Vec<Tally>, AnalysisError>
where
    F: Fn(&R) -> i64,
    K: Fn(&'a R) -> I,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut buckets = vec![Tally::new(); bucket_count];
    for row in rows {
        let index = period_fn(row);
        let bucket = usize::try_from(index)
            .ok()
            .and_then(|i| buckets.get_mut(i))
            .ok_or(AnalysisError::OutOfRangePeriod {
                index,
                bucket_count,
            })?;
        for key in key_fn(row) {
            bucket.increment(key.as_ref());
        }
    }
    Ok(buckets)
}

/// One tally per distinct period, for open-ended period sets (e.g. calendar months).
/// The map iterates in ascending period order.
pub fn tally_by_key<'a, R, P, F, K, I, S>(rows: &'a [R], period_fn: F, key_fn: K) -> BTreeMap<P, Tally>
where
    P: Ord,
    F: Fn(&R) -> P,
    K: Fn(&'a R) -> I,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut periods: BTreeMap<P, Tally> = BTreeMap::new();
    for row in rows {
        let bucket = periods.entry(period_fn(row)).or_default();
        for key in key_fn(row) {
            bucket.increment(key.as_ref());
        }
    }
    periods
}

// ============================================================================
// TESTS
// ============================================================================
