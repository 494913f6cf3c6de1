// 🗄️ Ingestion - SQLite survey partitions and CSV reviews
// Rows are mapped in the documented column order; the first malformed row aborts the load.

use crate::errors::IngestError;
use crate::lexicon::Lexicon;
use crate::review::Review;
use crate::survey::{SurveyPartition, SurveyRecord, SURVEY_COLUMNS};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::io::Read;
use std::path::Path;
use std::time::Instant;

/// Table holding the responses of one survey year
pub fn survey_table(year: i32) -> String {
    format!("data_{}", year)
}

/// Open the survey database read-only
pub fn open_survey_database(path: &Path) -> Result<Connection, IngestError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    Ok(conn)
}

// ============================================================================
// SURVEY PARTITIONS
// ============================================================================

/// Load every record of one survey year
pub fn load_survey_partition(conn: &Connection, year: i32) -> Result<SurveyPartition, IngestError> {
    let started = Instant::now();
    let table = survey_table(year);
    let query = format!("SELECT {} FROM {}", SURVEY_COLUMNS.join(", "), table);

    let mut stmt = conn.prepare(&query)?;
    let mut rows = stmt.query([])?;

    let mut records = Vec::new();
    let mut line: u64 = 0;
    while let Some(row) = rows.next()? {
        line += 1;
        let mut fields = Vec::with_capacity(SURVEY_COLUMNS.len());
        for (i, column) in SURVEY_COLUMNS.iter().enumerate() {
            let value = cell_to_string(row.get_ref(i)?).map_err(|reason| {
                IngestError::malformed(&table, line, format!("{}: {}", column, reason))
            })?;
            fields.push(value);
        }
        records.push(SurveyRecord::from_row(year, fields)?);
    }

    tracing::debug!(
        table = %table,
        rows = records.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "survey partition loaded"
    );

    Ok(SurveyPartition::new(year, records))
}

/// Load one partition per year, in the order given
pub fn load_survey(conn: &Connection, years: &[i32]) -> Result<Vec<SurveyPartition>, IngestError> {
    years
        .iter()
        .map(|year| load_survey_partition(conn, *year))
        .collect()
}

/// SQL NULL is absent; numbers are rendered as text
fn cell_to_string(value: ValueRef<'_>) -> Result<Option<String>, String> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i.to_string())),
        ValueRef::Real(f) => Ok(Some(f.to_string())),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Some(s.to_string()))
            .map_err(|e| format!("invalid UTF-8 ({})", e)),
        ValueRef::Blob(_) => Err("unexpected blob value".to_string()),
    }
}

// ============================================================================
// REVIEWS
// ============================================================================

/// Load the review CSV (header row skipped)
pub fn load_reviews(csv_path: &Path, lexicon: &Lexicon) -> Result<Vec<Review>, IngestError> {
    let started = Instant::now();
    let file = std::fs::File::open(csv_path)?;
    let source_name = csv_path.display().to_string();

    let reviews = read_reviews(file, lexicon, &source_name)?;

    tracing::info!(
        source = %source_name,
        reviews = reviews.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "reviews loaded"
    );

    Ok(reviews)
}

/// Parse reviews from any reader holding a headed CSV document
pub fn read_reviews<R: Read>(reader: R, lexicon: &Lexicon, source_name: &str) -> Result<Vec<Review>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut reviews = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields: Vec<&str> = record.iter().collect();
        reviews.push(Review::from_row(&fields, lexicon, source_name, line)?);
    }

    Ok(reviews)
}

// ============================================================================
// TESTS
// ============================================================================
