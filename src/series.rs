// 📈 Series Aligner
// Per-period tallies → one labelled series per key on a shared period axis

use crate::aggregate::Tally;
use crate::lexicon::Sentiment;
use crate::review::MonthlySentiment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// Period index on the shared axis
    pub x: usize,
    pub y: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<Point>,
}

impl Series {
    pub fn values(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.y).collect()
    }
}

/// Union of the keys seen in any period
pub fn union_keys(period_tallies: &[Tally]) -> BTreeSet<String> {
    period_tallies
        .iter()
        .flat_map(|t| t.keys().map(str::to_string))
        .collect()
}

/// One series per key, with exactly one point per period.
///
/// A key missing from a period contributes 0 there. When `keys_of_interest`
/// is `None`, every key seen in any period gets a series. Series come out in
/// ascending key order.
pub fn align(period_tallies: &[Tally], keys_of_interest: Option<&BTreeSet<String>>) -> Vec<Series> {
    let owned;
    let keys = match keys_of_interest {
        Some(keys) => keys,
        None => {
            owned = union_keys(period_tallies);
            &owned
        }
    };

    keys.iter()
        .map(|key| Series {
            label: key.clone(),
            points: period_tallies
                .iter()
                .enumerate()
                .map(|(x, tally)| Point { x, y: tally.get(key) })
                .collect(),
        })
        .collect()
}

/// Positive, Negative and Neutral series over the months, in that order
pub fn sentiment_series(months: &[MonthlySentiment]) -> Vec<Series> {
    Sentiment::ALL
        .iter()
        .map(|sentiment| Series {
            label: sentiment.title().to_string(),
            points: months
                .iter()
                .enumerate()
                .map(|(x, m)| Point {
                    x,
                    y: m.counts.get(*sentiment),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::SentimentCounts;
    use crate::review::MonthKey;

    fn periods() -> Vec<Tally> {
        vec![
            vec![("Bachelor's", 4), ("Master's", 2)].into_iter().collect(),
            vec![("Master's", 3)].into_iter().collect(),
            vec![("PhD", 1), ("Bachelor's", 5)].into_iter().collect(),
        ]
    }

    #[test]
    fn test_align_defaults_missing_to_zero() {
        let series = align(&periods(), None);
        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();

        assert_eq!(labels, vec!["Bachelor's", "Master's", "PhD"]);
        assert_eq!(series[0].values(), vec![4, 0, 5]);
        assert_eq!(series[1].values(), vec![2, 3, 0]);
        assert_eq!(series[2].values(), vec![0, 0, 1]);
    }

    #[test]
    fn test_every_series_spans_every_period() {
        let input = periods();
        for s in align(&input, None) {
            assert_eq!(s.points.len(), input.len());
            let xs: Vec<usize> = s.points.iter().map(|p| p.x).collect();
            assert_eq!(xs, vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_explicit_keys_include_unseen() {
        let keys: BTreeSet<String> = ["PhD", "Bootcamp"].iter().map(|s| s.to_string()).collect();
        let series = align(&periods(), Some(&keys));

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Bootcamp");
        assert_eq!(series[0].values(), vec![0, 0, 0]);
        assert_eq!(series[1].values(), vec![0, 0, 1]);
    }

    #[test]
    fn test_align_empty_tallies() {
        let empty = vec![Tally::new(), Tally::new()];
        assert!(align(&empty, None).is_empty());

        let keys: BTreeSet<String> = ["x".to_string()].into_iter().collect();
        assert_eq!(align(&empty, Some(&keys))[0].values(), vec![0, 0]);
    }

    #[test]
    fn test_sentiment_series_slot_order() {
        let months = vec![
            MonthlySentiment {
                month: MonthKey::new(2023, 5),
                counts: SentimentCounts {
                    positive: 2,
                    negative: 1,
                    neutral: 0,
                },
            },
            MonthlySentiment {
                month: MonthKey::new(2023, 6),
                counts: SentimentCounts {
                    positive: 0,
                    negative: 0,
                    neutral: 1,
                },
            },
        ];

        let series = sentiment_series(&months);

        assert_eq!(series[0].label, "Positive");
        assert_eq!(series[0].values(), vec![2, 0]);
        assert_eq!(series[1].label, "Negative");
        assert_eq!(series[1].values(), vec![1, 0]);
        assert_eq!(series[2].label, "Neutral");
        assert_eq!(series[2].values(), vec![0, 1]);
    }
}
