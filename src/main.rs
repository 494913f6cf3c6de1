use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use survey_tally::logging::init_logging;
use survey_tally::{
    export_reviews_json, load_reviews, load_survey, open_survey_database, AnalysisConfig,
    RankedList, Report, Review, ReviewPipeline, ReviewReport, SurveyField, SurveyPipeline,
    SurveyReport,
};

#[derive(Parser)]
#[command(name = "survey-tally")]
#[command(about = "Developer-survey and review analytics: tallies and chart-ready series")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    inputs: InputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// JSON config file (missing keys keep their defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database with one data_<year> table per survey year
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Review CSV file
    #[arg(long, global = true)]
    reviews: Option<PathBuf>,

    /// Keyword lexicon JSON (defaults to the built-in lists)
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,

    /// Conform rules JSON (defaults to the built-in table)
    #[arg(long, global = true)]
    conform: Option<PathBuf>,

    /// Ranking depth
    #[arg(long, global = true)]
    top: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Country, education, main-branch and popularity tallies over the survey years
    Surveys,
    /// Sentiment by month over the review file
    Reviews {
        /// Print reviews that matched no keyword
        #[arg(long)]
        unmatched: bool,
        /// Write the typed reviews (with sentiment) as JSON
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Both analyses, optionally written as one JSON report
    Report {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = resolve_config(&cli.inputs)?;

    match cli.command {
        Commands::Surveys => {
            let report = run_surveys(&config)?;
            print_survey_report(&report, config.top_n);
        }
        Commands::Reviews { unmatched, export } => {
            let pipeline = ReviewPipeline::new(config.load_lexicon()?);
            let reviews = load_reviews(&config.reviews_csv, pipeline.lexicon())
                .with_context(|| format!("Failed to load reviews from {:?}", config.reviews_csv))?;

            print_review_report(&pipeline.report(&reviews));

            if unmatched {
                print_unmatched(&pipeline.unmatched(&reviews));
            }
            if let Some(path) = export {
                std::fs::write(&path, export_reviews_json(&reviews)?)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("✓ Reviews exported to {}", path.display());
            }
        }
        Commands::Report { output } => {
            let surveys = run_surveys(&config)?;
            let reviews = run_reviews(&config)?;
            let report = Report::new(Some(surveys), Some(reviews));

            match output {
                Some(path) => {
                    report.write_json(&path)?;
                    println!("✓ Report written to {}", path.display());
                }
                None => println!("{}", report.to_json()?),
            }
        }
    }

    Ok(())
}

fn resolve_config(inputs: &InputArgs) -> Result<AnalysisConfig> {
    let mut config = match &inputs.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(db) = &inputs.db {
        config.survey_db = db.clone();
    }
    if let Some(reviews) = &inputs.reviews {
        config.reviews_csv = reviews.clone();
    }
    if let Some(lexicon) = &inputs.lexicon {
        config.lexicon_path = Some(lexicon.clone());
    }
    if let Some(conform) = &inputs.conform {
        config.conform_path = Some(conform.clone());
    }
    if let Some(top) = inputs.top {
        config.top_n = top;
    }

    Ok(config)
}

fn run_surveys(config: &AnalysisConfig) -> Result<SurveyReport> {
    let conn = open_survey_database(&config.survey_db)
        .with_context(|| format!("Failed to open survey database {:?}", config.survey_db))?;
    let partitions = load_survey(&conn, &config.years())?;

    let pipeline = SurveyPipeline::new(config.clone(), config.load_conform_table()?);
    let dataset = pipeline.prepare(partitions)?;
    info!(valid = dataset.len(), excluded = dataset.excluded(), "survey dataset ready");

    Ok(dataset.report(config.top_n)?)
}

fn run_reviews(config: &AnalysisConfig) -> Result<ReviewReport> {
    let pipeline = ReviewPipeline::new(config.load_lexicon()?);
    let reviews = load_reviews(&config.reviews_csv, pipeline.lexicon())
        .with_context(|| format!("Failed to load reviews from {:?}", config.reviews_csv))?;

    Ok(pipeline.report(&reviews))
}

// ============================================================================
// Console output
// ============================================================================

fn print_survey_report(report: &SurveyReport, top: usize) {
    println!("📋 Survey records");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Loaded:   {}", report.loaded);
    println!("   Valid:    {}", report.valid);
    println!("   Excluded: {}", report.excluded);

    println!("\n🌍 Top {} countries ({} distinct)", top, report.countries.len());
    print_ranked(&report.top_countries);

    let years: Vec<String> = report.years.iter().map(|y| y.to_string()).collect();
    println!("\n🎓 Education level by year [{}]", years.join(", "));
    for series in &report.education_by_year {
        println!("   {:?}  {}", series.values(), series.label);
    }

    println!("\n🧭 Main branch by year [{}]", years.join(", "));
    for series in &report.main_branch_by_year {
        println!("   {:?}  {}", series.values(), series.label);
    }

    for year in &report.years {
        println!("\n🏆 Most popular in {}", year);
        for field in SurveyField::MULTI_VALUED {
            if let Some(ranked) = report.popularity_for(field, *year) {
                println!("   {}", field);
                print_ranked(ranked);
            }
        }
    }
}

fn print_ranked(ranked: &RankedList) {
    if ranked.is_empty() {
        println!("      (none)");
    }
    for (i, entry) in ranked.entries().iter().enumerate() {
        println!("      {}. {} ({})", i + 1, entry.key, entry.count);
    }
}

fn print_review_report(report: &ReviewReport) {
    println!("💬 Review sentiment");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Reviews:   {}", report.reviews);
    println!(
        "   Positive:  {}  Negative: {}  Neutral: {}",
        report.totals.positive, report.totals.negative, report.totals.neutral
    );
    println!("   Unmatched: {}", report.unmatched);

    println!("\n📅 By month [positive, negative, neutral]");
    for month in &report.months {
        println!("   {}  {:?}", month.month, month.counts.as_array());
    }
}

fn print_unmatched(reviews: &[&Review]) {
    println!("\n🔍 Reviews with no keyword hit ({})", reviews.len());
    for review in reviews {
        println!("   {}", review.content());
    }
}
