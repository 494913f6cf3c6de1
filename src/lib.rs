// Survey Tally - Core Library
// Survey and review ingestion, conform, tallies, rankings and chart-ready series

pub mod aggregate;
pub mod config;
pub mod conform;
pub mod db;
pub mod errors;
pub mod lexicon;
pub mod logging;
pub mod pipeline;
pub mod ranking;
pub mod report;
pub mod review;
pub mod series;
pub mod survey;

// Re-export commonly used types
pub use aggregate::{tally, tally_by_key, tally_by_period, Tally};
pub use config::AnalysisConfig;
pub use conform::{ConformField, ConformRule, ConformTable};
pub use db::{load_reviews, load_survey, load_survey_partition, open_survey_database, read_reviews};
pub use errors::{AnalysisError, IngestError};
pub use lexicon::{Lexicon, LexiconScore, Sentiment, SentimentCounts};
pub use pipeline::{ReviewPipeline, SurveyDataset, SurveyPipeline};
pub use ranking::{rank_all, top_n, RankedEntry, RankedList};
pub use report::{export_reviews_json, Popularity, Report, ReviewReport, SurveyReport};
pub use review::{MonthKey, MonthlySentiment, Review};
pub use series::{align, sentiment_series, union_keys, Point, Series};
pub use survey::{SurveyField, SurveyPartition, SurveyRecord, NULL_LABEL};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
