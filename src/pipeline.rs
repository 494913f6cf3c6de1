// 🔄 Pipeline Orchestrator
// partitions → validate → conform → aggregate → rank/align → report

use crate::aggregate::{tally, tally_by_key, tally_by_period, Tally};
use crate::config::AnalysisConfig;
use crate::conform::ConformTable;
use crate::errors::AnalysisError;
use crate::lexicon::{Lexicon, Sentiment, SentimentCounts};
use crate::ranking::{top_n, RankedList};
use crate::report::{Popularity, ReviewReport, SurveyReport};
use crate::review::{MonthlySentiment, Review};
use crate::series::{align, sentiment_series};
use crate::survey::{SurveyField, SurveyPartition, SurveyRecord};

// ============================================================================
// SURVEY PIPELINE
// ============================================================================

pub struct SurveyPipeline {
    config: AnalysisConfig,
    conform: ConformTable,
}

impl SurveyPipeline {
    pub fn new(config: AnalysisConfig, conform: ConformTable) -> Self {
        SurveyPipeline { config, conform }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Build the valid, conformed subset from the loaded partitions.
    ///
    /// Partitions are concatenated in the order given. Invalid records are
    /// dropped (stable) and counted; survivors are conformed exactly once.
    pub fn prepare(&self, partitions: Vec<SurveyPartition>) -> Result<SurveyDataset, AnalysisError> {
        let mut loaded = 0;
        let mut records = Vec::new();

        for partition in partitions {
            if !self.config.supports_year(partition.year) {
                return Err(AnalysisError::OutOfRangePeriod {
                    index: self.config.period_index(partition.year),
                    bucket_count: self.config.year_count,
                });
            }
            if let Some(stray) = partition.records.iter().find(|r| r.year() != partition.year) {
                return Err(AnalysisError::YearMismatch {
                    expected: partition.year,
                    found: stray.year(),
                });
            }

            loaded += partition.records.len();
            records.extend(partition.records);
        }

        records.retain(SurveyRecord::validate);
        let excluded = loaded - records.len();

        for record in records.iter_mut() {
            record.conform(&self.conform);
        }

        tracing::info!(loaded, valid = records.len(), excluded, "survey records prepared");

        Ok(SurveyDataset {
            config: self.config.clone(),
            records,
            loaded,
            excluded,
        })
    }
}

// ============================================================================
// SURVEY DATASET (valid subset)
// ============================================================================

#[derive(Debug, Clone)]
pub struct SurveyDataset {
    config: AnalysisConfig,
    records: Vec<SurveyRecord>,
    loaded: usize,
    excluded: usize,
}

impl SurveyDataset {
    pub fn records(&self) -> &[SurveyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records received before validation
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Records dropped by validation
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// Respondents per country over every year
    pub fn countries(&self) -> Tally {
        self.field_tally(SurveyField::Country, None)
    }

    /// One education-level tally per configured year
    pub fn education_by_year(&self) -> Result<Vec<Tally>, AnalysisError> {
        self.by_year(SurveyField::EducationLevel)
    }

    /// One main-branch tally per configured year
    pub fn main_branches_by_year(&self) -> Result<Vec<Tally>, AnalysisError> {
        self.by_year(SurveyField::MainBranch)
    }

    pub fn main_branches(&self, year: i32) -> Tally {
        self.field_tally(SurveyField::MainBranch, Some(year))
    }

    /// Tally `field` over the records of `year`, or over every record when `year` is `None`
    pub fn field_tally(&self, field: SurveyField, year: Option<i32>) -> Tally {
        tally(
            &self.records,
            |r| field.tokens(r),
            |r| year.map_or(true, |y| r.year() == y),
        )
    }

    pub fn popular(&self, field: SurveyField, year: Option<i32>, n: usize) -> RankedList {
        top_n(&self.field_tally(field, year), n)
    }

    pub fn report(&self, n: usize) -> Result<SurveyReport, AnalysisError> {
        let countries = self.countries();
        let top_countries = top_n(&countries, n);

        let popularity = self
            .config
            .years()
            .into_iter()
            .flat_map(|year| {
                SurveyField::MULTI_VALUED.into_iter().map(move |field| (field, year))
            })
            .map(|(field, year)| Popularity {
                field,
                year,
                ranked: self.popular(field, Some(year), n),
            })
            .collect();

        Ok(SurveyReport {
            years: self.config.years(),
            loaded: self.loaded,
            excluded: self.excluded,
            valid: self.records.len(),
            countries,
            top_countries,
            education_by_year: align(&self.education_by_year()?, None),
            main_branch_by_year: align(&self.main_branches_by_year()?, None),
            popularity,
        })
    }

    fn by_year(&self, field: SurveyField) -> Result<Vec<Tally>, AnalysisError> {
        tally_by_period(
            &self.records,
            self.config.year_count,
            |r| self.config.period_index(r.year()),
            |r| field.tokens(r),
        )
    }
}

// ============================================================================
// REVIEW PIPELINE
// ============================================================================

pub struct ReviewPipeline {
    lexicon: Lexicon,
}

impl ReviewPipeline {
    pub fn new(lexicon: Lexicon) -> Self {
        ReviewPipeline { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Sentiment counts per calendar month, ascending by month
    pub fn sentiment_by_month(&self, reviews: &[Review]) -> Vec<MonthlySentiment> {
        tally_by_key(reviews, Review::month, |r| [r.sentiment().label()])
            .into_iter()
            .map(|(month, tally)| MonthlySentiment {
                month,
                counts: counts_from_tally(&tally),
            })
            .collect()
    }

    pub fn totals(&self, reviews: &[Review]) -> SentimentCounts {
        let mut counts = SentimentCounts::default();
        for review in reviews {
            counts.record(review.sentiment());
        }
        counts
    }

    /// Reviews that matched no keyword of the lexicon they were scored with
    pub fn unmatched<'a>(&self, reviews: &'a [Review]) -> Vec<&'a Review> {
        reviews
            .iter()
            .filter(|r| r.keyword_hits().is_unmatched())
            .collect()
    }

    pub fn report(&self, reviews: &[Review]) -> ReviewReport {
        let months = self.sentiment_by_month(reviews);
        let series = sentiment_series(&months);

        ReviewReport {
            reviews: reviews.len(),
            totals: self.totals(reviews),
            unmatched: self.unmatched(reviews).len(),
            months,
            series,
        }
    }
}

fn counts_from_tally(tally: &Tally) -> SentimentCounts {
    SentimentCounts {
        positive: tally.get(Sentiment::Positive.label()),
        negative: tally.get(Sentiment::Negative.label()),
        neutral: tally.get(Sentiment::Neutral.label()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
