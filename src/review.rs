// ⭐ Review Record Model
// A product review with its sentiment fixed at construction time

use crate::errors::IngestError;
use crate::lexicon::{Lexicon, LexiconScore, Sentiment, SentimentCounts};
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column order of the review file
pub const REVIEW_COLUMNS: [&str; 8] = [
    "id",
    "username",
    "content",
    "score",
    "likes",
    "createdVersion",
    "createdOn",
    "currentVersion",
];

/// `createdOn` format, 24-hour clock
pub const CREATED_ON_FORMAT: &str = "%m/%d/%Y %H:%M";

// ============================================================================
// MONTH KEY
// ============================================================================

/// Calendar (year, month) period bucket. Orders by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        MonthKey { year, month }
    }

    pub fn of(timestamp: &NaiveDateTime) -> Self {
        MonthKey {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Sentiment counts for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySentiment {
    pub month: MonthKey,
    pub counts: SentimentCounts,
}

// ============================================================================
// REVIEW
// ============================================================================

/// `content` is read-only; the keyword hits and sentiment derived from it are
/// fixed when the review is built.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub username: String,
    content: String,
    pub score: i64,
    pub likes: i64,
    pub created_version: String,
    pub created_on: NaiveDateTime,
    pub current_version: String,
    keyword_hits: LexiconScore,
    sentiment: Sentiment,
}

impl Review {
    /// Build a review; sentiment is scored once from the lowercased content
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        username: String,
        content: String,
        score: i64,
        likes: i64,
        created_version: String,
        created_on: NaiveDateTime,
        current_version: String,
        lexicon: &Lexicon,
    ) -> Self {
        let keyword_hits = lexicon.score(&content.to_lowercase());
        Review {
            id,
            username,
            content,
            score,
            likes,
            created_version,
            created_on,
            current_version,
            keyword_hits,
            sentiment: keyword_hits.sentiment(),
        }
    }

    /// Map one raw row (in `REVIEW_COLUMNS` order). `line` is only used for error reporting.
    pub fn from_row<S: AsRef<str>>(
        fields: &[S],
        lexicon: &Lexicon,
        source_name: &str,
        line: u64,
    ) -> Result<Self, IngestError> {
        if fields.len() != REVIEW_COLUMNS.len() {
            return Err(IngestError::malformed(
                source_name,
                line,
                format!(
                    "expected {} fields, found {}",
                    REVIEW_COLUMNS.len(),
                    fields.len()
                ),
            ));
        }

        let field = |i: usize| fields[i].as_ref();
        let malformed = |reason: String| IngestError::malformed(source_name, line, reason);

        let id = Uuid::parse_str(field(0).trim())
            .map_err(|e| malformed(format!("invalid id {:?}: {}", field(0), e)))?;
        let score = parse_int(field(3)).map_err(|e| malformed(format!("invalid score: {}", e)))?;
        let likes = parse_int(field(4)).map_err(|e| malformed(format!("invalid likes: {}", e)))?;
        let created_on = NaiveDateTime::parse_from_str(field(6), CREATED_ON_FORMAT)
            .map_err(|e| malformed(format!("invalid createdOn {:?}: {}", field(6), e)))?;

        Ok(Review::new(
            id,
            field(1).to_string(),
            field(2).to_string(),
            score,
            likes,
            field(5).to_string(),
            created_on,
            field(7).to_string(),
            lexicon,
        ))
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Keyword counts from the lexicon the review was built with
    pub fn keyword_hits(&self) -> LexiconScore {
        self.keyword_hits
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::of(&self.created_on)
    }
}

fn parse_int(value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("{:?} ({})", value, e))
}

// ============================================================================
// TESTS
// ============================================================================
