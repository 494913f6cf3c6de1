// 💬 Lexicon Scorer
// Keyword-count sentiment heuristic. Weighted towards POSITIVE on purpose:
// a text with no negative hits is never NEGATIVE.

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const BUILTIN_LEXICON: &str = include_str!("../assets/lexicon.json");

/// pos/neg ratio above which a text is POSITIVE
pub const POSITIVE_RATIO: f64 = 1.25;

/// pos/neg ratio below which a text is NEGATIVE
pub const NEGATIVE_RATIO: f64 = 0.75;

// ============================================================================
// SENTIMENT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Slot order used by every array view of sentiment counts
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Key used when tallying
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
        }
    }

    /// Human-readable name for chart legends
    pub fn title(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SENTIMENT COUNTS
// ============================================================================

/// One named counter per sentiment label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl SentimentCounts {
    pub fn record(&mut self, sentiment: Sentiment) {
        *self.slot_mut(sentiment) += 1;
    }

    pub fn get(&self, sentiment: Sentiment) -> u64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    /// Counts in POSITIVE, NEGATIVE, NEUTRAL order
    pub fn as_array(&self) -> [u64; 3] {
        [self.positive, self.negative, self.neutral]
    }

    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }

    fn slot_mut(&mut self, sentiment: Sentiment) -> &mut u64 {
        match sentiment {
            Sentiment::Positive => &mut self.positive,
            Sentiment::Negative => &mut self.negative,
            Sentiment::Neutral => &mut self.neutral,
        }
    }
}

// ============================================================================
// SCORE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LexiconScore {
    pub positive: usize,
    pub negative: usize,
}

impl LexiconScore {
    pub fn sentiment(&self) -> Sentiment {
        if self.negative == 0 {
            return if self.positive == 0 {
                Sentiment::Neutral
            } else {
                Sentiment::Positive
            };
        }

        let ratio = self.positive as f64 / self.negative as f64;
        if ratio > POSITIVE_RATIO {
            Sentiment::Positive
        } else if ratio < NEGATIVE_RATIO {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// No keyword of either list matched
    pub fn is_unmatched(&self) -> bool {
        self.positive == 0 && self.negative == 0
    }
}

// ============================================================================
// LEXICON
// ============================================================================

/// Positive and negative keyword phrases. Order and duplicates are kept:
/// a keyword listed twice counts twice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Lexicon {
    pub fn new(positive: Vec<String>, negative: Vec<String>) -> Self {
        Lexicon {
            positive: drop_empty(positive, "positive"),
            negative: drop_empty(negative, "negative"),
        }
    }

    /// Keyword lists shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_LEXICON).context("Failed to parse built-in lexicon")
    }

    /// Load lexicon from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read lexicon file: {:?}", path.as_ref()))?;

        Self::from_json(&content).context("Failed to parse lexicon JSON")
    }

    fn from_json(content: &str) -> Result<Self> {
        let raw: Lexicon = serde_json::from_str(content)?;
        Ok(Lexicon::new(raw.positive, raw.negative))
    }

    /// Count keyword occurrences in `text`, which must already be lowercased
    pub fn score(&self, text: &str) -> LexiconScore {
        LexiconScore {
            positive: count_all(text, &self.positive),
            negative: count_all(text, &self.negative),
        }
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        self.score(text).sentiment()
    }

    pub fn positive(&self) -> &[String] {
        &self.positive
    }

    pub fn negative(&self) -> &[String] {
        &self.negative
    }
}

/// Sum of non-overlapping occurrences of every keyword
fn count_all(text: &str, keywords: &[String]) -> usize {
    keywords
        .iter()
        .map(|kw| text.matches(kw.as_str()).count())
        .sum()
}

fn drop_empty(keywords: Vec<String>, list: &str) -> Vec<String> {
    let before = keywords.len();
    let kept: Vec<String> = keywords.into_iter().filter(|k| !k.is_empty()).collect();
    if kept.len() != before {
        tracing::warn!(list, dropped = before - kept.len(), "empty lexicon keywords dropped");
    }
    kept
}

// ============================================================================
// TESTS
// ============================================================================
