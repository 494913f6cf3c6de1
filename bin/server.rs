// Survey Tally - Web Server
// Read-only JSON API over the precomputed report

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use survey_tally::logging::init_logging;
use survey_tally::{
    load_reviews, load_survey, open_survey_database, top_n, AnalysisConfig, MonthlySentiment,
    RankedList, Report, ReviewPipeline, SentimentCounts, Series, SurveyDataset, SurveyField,
    SurveyPipeline,
};

/// Shared application state, computed once at startup
#[derive(Clone)]
struct AppState {
    surveys: Arc<SurveyDataset>,
    report: Arc<Report>,
    top_n: usize,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Deserialize)]
struct TopQuery {
    top: Option<usize>,
}

#[derive(Serialize)]
struct SentimentResponse {
    totals: SentimentCounts,
    months: Vec<MonthlySentiment>,
    series: Vec<Series>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/report - Full chart-ready report
async fn get_report(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.as_ref().clone()))
}

/// GET /api/surveys/countries?top=N - Country ranking
async fn get_countries(State(state): State<AppState>, Query(query): Query<TopQuery>) -> impl IntoResponse {
    let n = query.top.unwrap_or(state.top_n);
    Json(ApiResponse::ok(top_n(&state.surveys.countries(), n)))
}

/// GET /api/surveys/popular/:field/:year?top=N - Popularity of one field in one year
async fn get_popular(
    State(state): State<AppState>,
    Path((field, year)): Path<(String, i32)>,
    Query(query): Query<TopQuery>,
) -> impl IntoResponse {
    let Some(field) = SurveyField::from_name(&field) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<RankedList>::err(format!("unknown field: {}", field))),
        )
            .into_response();
    };

    let n = query.top.unwrap_or(state.top_n);
    let ranked = state.surveys.popular(field, Some(year), n);
    (StatusCode::OK, Json(ApiResponse::ok(ranked))).into_response()
}

/// GET /api/reviews/sentiment - Sentiment by month
async fn get_sentiment(State(state): State<AppState>) -> impl IntoResponse {
    match &state.report.reviews {
        Some(reviews) => (
            StatusCode::OK,
            Json(ApiResponse::ok(SentimentResponse {
                totals: reviews.totals,
                months: reviews.months.clone(),
                series: reviews.series.clone(),
            })),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<SentimentResponse>::err("no review data loaded".to_string())),
        )
            .into_response(),
    }
}

// ============================================================================
// Main Server
// ============================================================================

fn build_state(config: &AnalysisConfig) -> anyhow::Result<AppState> {
    let conn = open_survey_database(&config.survey_db)?;
    let partitions = load_survey(&conn, &config.years())?;
    let surveys = SurveyPipeline::new(config.clone(), config.load_conform_table()?).prepare(partitions)?;

    let review_pipeline = ReviewPipeline::new(config.load_lexicon()?);
    let reviews = load_reviews(&config.reviews_csv, review_pipeline.lexicon())?;

    let report = Report::new(
        Some(surveys.report(config.top_n)?),
        Some(review_pipeline.report(&reviews)),
    );

    Ok(AppState {
        surveys: Arc::new(surveys),
        report: Arc::new(report),
        top_n: config.top_n,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    let state = build_state(&config)?;
    tracing::info!(valid = state.surveys.len(), "report computed");

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/report", get(get_report))
        .route("/surveys/countries", get(get_countries))
        .route("/surveys/popular/:field/:year", get(get_popular))
        .route("/reviews/sentiment", get(get_sentiment))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
