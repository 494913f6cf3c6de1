// 🧾 Chart-ready report and JSON export
// The only shapes handed to renderers: tallies, rankings and aligned series

use crate::aggregate::Tally;
use crate::errors::IngestError;
use crate::lexicon::SentimentCounts;
use crate::ranking::RankedList;
use crate::review::{MonthlySentiment, Review};
use crate::series::Series;
use crate::survey::SurveyField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Popularity {
    pub field: SurveyField,
    pub year: i32,
    pub ranked: RankedList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyReport {
    /// Period axis shared by every by-year series
    pub years: Vec<i32>,
    pub loaded: usize,
    pub excluded: usize,
    pub valid: usize,
    pub countries: Tally,
    pub top_countries: RankedList,
    pub education_by_year: Vec<Series>,
    pub main_branch_by_year: Vec<Series>,
    pub popularity: Vec<Popularity>,
}

impl SurveyReport {
    pub fn popularity_for(&self, field: SurveyField, year: i32) -> Option<&RankedList> {
        self.popularity
            .iter()
            .find(|p| p.field == field && p.year == year)
            .map(|p| &p.ranked)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewReport {
    pub reviews: usize,
    pub totals: SentimentCounts,
    /// Reviews with no keyword hit at all
    pub unmatched: usize,
    pub months: Vec<MonthlySentiment>,
    /// Positive, Negative, Neutral over `months`
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surveys: Option<SurveyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<ReviewReport>,
}

impl Report {
    pub fn new(surveys: Option<SurveyReport>, reviews: Option<ReviewReport>) -> Self {
        Report {
            generated_at: Utc::now(),
            surveys,
            reviews,
        }
    }

    pub fn to_json(&self) -> Result<String, IngestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), IngestError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Dump typed reviews (sentiment included) as pretty JSON
pub fn export_reviews_json(reviews: &[Review]) -> Result<String, IngestError> {
    Ok(serde_json::to_string_pretty(reviews)?)
}
