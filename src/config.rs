// ⚙️ Analysis Configuration
// Year range, ranking depth, input locations and optional asset overrides

use crate::conform::ConformTable;
use crate::lexicon::Lexicon;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// First supported survey year (period index 0)
    pub base_year: i32,

    /// Number of consecutive survey years
    pub year_count: usize,

    /// Depth of popularity rankings
    pub top_n: usize,

    /// SQLite database holding one `data_<year>` table per survey year
    pub survey_db: PathBuf,

    /// Review CSV (with header row)
    pub reviews_csv: PathBuf,

    /// Keyword lists; the embedded lexicon is used when unset
    pub lexicon_path: Option<PathBuf>,

    /// Conform rules; the embedded table is used when unset
    pub conform_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            base_year: 2021,
            year_count: 3,
            top_n: 5,
            survey_db: PathBuf::from("data/github.db"),
            reviews_csv: PathBuf::from("data/chatgpt_reviews.csv"),
            lexicon_path: None,
            conform_path: None,
        }
    }
}

impl AnalysisConfig {
    /// Load config from JSON file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Survey years in period order
    pub fn years(&self) -> Vec<i32> {
        (0..self.year_count as i32).map(|i| self.base_year + i).collect()
    }

    pub fn last_year(&self) -> i32 {
        self.base_year + self.year_count as i32 - 1
    }

    pub fn supports_year(&self, year: i32) -> bool {
        self.period_index(year) >= 0 && (self.period_index(year) as usize) < self.year_count
    }

    /// Bucket index of `year`; may be out of range
    pub fn period_index(&self, year: i32) -> i64 {
        year as i64 - self.base_year as i64
    }

    pub fn load_lexicon(&self) -> Result<Lexicon> {
        match &self.lexicon_path {
            Some(path) => Lexicon::from_file(path),
            None => Lexicon::builtin(),
        }
    }

    pub fn load_conform_table(&self) -> Result<ConformTable> {
        match &self.conform_path {
            Some(path) => ConformTable::from_file(path),
            None => ConformTable::builtin(),
        }
    }
}
