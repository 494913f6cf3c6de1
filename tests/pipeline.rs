// End-to-end: files on disk → ingestion → pipeline → report

use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;
use survey_tally::{
    load_reviews, load_survey, open_survey_database, AnalysisConfig, Lexicon, MonthKey, Report,
    ReviewPipeline, SurveyField, SurveyPipeline,
};

const DEV: &str = "I am a developer by profession";

fn seed_survey_db(path: &Path) {
    let conn = Connection::open(path).unwrap();

    // (main branch, country, education, languages)
    let rows: [(i32, [(&str, Option<&str>, &str, &str); 3]); 3] = [
        (
            2021,
            [
                (DEV, Some("Republic of Korea"), "Bachelor's", "Rust;Python"),
                ("I am a student who is learning to code", Some("Chile"), "Secondary", "Python"),
                (DEV, None, "Master's", "Go"),
            ],
        ),
        (
            2022,
            [
                (DEV, Some("South Korea"), "Master's", "Rust"),
                (DEV, None, "Bachelor's", "C"),
                (DEV, Some("Germany"), "Master's", "Rust;Go"),
            ],
        ),
        (
            2023,
            [
                (DEV, None, "PhD", "Zig"),
                ("I am learning to code", Some("Chile"), "Secondary", "Python;Rust"),
                (DEV, Some("Chile"), "Bachelor's", "Rust"),
            ],
        ),
    ];

    for (year, records) in rows {
        conn.execute(
            &format!(
                "CREATE TABLE data_{} (
                    YearsCode TEXT, MainBranch TEXT, Country TEXT, EdLevel TEXT,
                    LanguageHaveWorkedWith TEXT, LanguageWantToWorkWith TEXT,
                    DatabaseHaveWorkedWith TEXT, DatabaseWantToWorkWith TEXT, Age TEXT
                )",
                year
            ),
            [],
        )
        .unwrap();

        for (branch, country, edu, langs) in records {
            conn.execute(
                &format!("INSERT INTO data_{} VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)", year),
                params!["3", branch, country, edu, langs, None::<String>, "SQLite", "PostgreSQL", "18-24"],
            )
            .unwrap();
        }
    }
}

#[test]
fn test_survey_scenario_three_years() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("github.db");
    seed_survey_db(&db_path);

    let config = AnalysisConfig {
        survey_db: db_path.clone(),
        ..AnalysisConfig::default()
    };
    let conn = open_survey_database(&config.survey_db).unwrap();
    let partitions = load_survey(&conn, &config.years()).unwrap();
    assert_eq!(partitions.len(), 3);

    let pipeline = SurveyPipeline::new(config.clone(), config.load_conform_table().unwrap());
    let dataset = pipeline.prepare(partitions).unwrap();

    assert_eq!(dataset.len(), 6);
    assert_eq!(dataset.excluded(), 3);

    let countries = dataset.countries();
    assert_eq!(countries.total(), 6);
    assert_eq!(countries.get("South Korea"), 2);
    assert_eq!(countries.get("Chile"), 3);

    let report = dataset.report(config.top_n).unwrap();
    assert_eq!(report.years, vec![2021, 2022, 2023]);

    // Conform merged the 2021 wording into the 2023 label
    let learning = report
        .main_branch_by_year
        .iter()
        .find(|s| s.label == "I am learning to code")
        .unwrap();
    assert_eq!(learning.values(), vec![1, 0, 1]);

    let secondary = report
        .education_by_year
        .iter()
        .find(|s| s.label == "Secondary")
        .unwrap();
    assert_eq!(secondary.values(), vec![1, 0, 1]);

    let rust_2022 = report
        .popularity_for(SurveyField::LanguagesWorkedWith, 2022)
        .unwrap();
    assert_eq!(rust_2022.entries()[0].key, "Rust");
    assert_eq!(rust_2022.entries()[0].count, 2);

    // Null column contributes nothing
    assert!(report
        .popularity_for(SurveyField::LanguagesInterestedIn, 2021)
        .unwrap()
        .is_empty());
}

#[test]
fn test_review_scenario_two_months() {
    let dir = tempfile::tempdir().unwrap();

    let lexicon_path = dir.path().join("lexicon.json");
    fs::write(
        &lexicon_path,
        r#"{"positive": ["excellent", "amazing"], "negative": ["terrible", "bad"]}"#,
    )
    .unwrap();

    let csv_path = dir.path().join("reviews.csv");
    fs::write(
        &csv_path,
        "\
id,username,content,score,likes,createdVersion,createdOn,currentVersion
0d6a1a28-5a8e-4a4c-9d8b-111111111111,a,Excellent and amazing,5,0,1.0,03/04/2023 09:00,1.0
0d6a1a28-5a8e-4a4c-9d8b-222222222222,b,it was terrible and bad,1,2,1.0,03/15/2023 17:45,1.0
0d6a1a28-5a8e-4a4c-9d8b-333333333333,c,opens fine,3,0,1.0,04/01/2023 00:00,1.0
0d6a1a28-5a8e-4a4c-9d8b-444444444444,d,AMAZING,5,9,1.0,03/31/2023 23:59,1.0
",
    )
    .unwrap();

    let config = AnalysisConfig {
        reviews_csv: csv_path,
        lexicon_path: Some(lexicon_path),
        ..AnalysisConfig::default()
    };

    let pipeline = ReviewPipeline::new(config.load_lexicon().unwrap());
    let reviews = load_reviews(&config.reviews_csv, pipeline.lexicon()).unwrap();
    let months = pipeline.sentiment_by_month(&reviews);

    let summary: Vec<(MonthKey, [u64; 3])> = months.iter().map(|m| (m.month, m.counts.as_array())).collect();
    assert_eq!(
        summary,
        vec![
            (MonthKey::new(2023, 3), [2, 1, 0]),
            (MonthKey::new(2023, 4), [0, 0, 1]),
        ]
    );

    let report = Report::new(None, Some(pipeline.report(&reviews)));
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["reviews"]["reviews"], 4);
    assert_eq!(json["reviews"]["series"][0]["label"], "Positive");
}

#[test]
fn test_malformed_review_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("reviews.csv");
    fs::write(
        &csv_path,
        "\
id,username,content,score,likes,createdVersion,createdOn,currentVersion
0d6a1a28-5a8e-4a4c-9d8b-111111111111,a,fine,5,0,1.0,2023-03-04 09:00,1.0
",
    )
    .unwrap();

    let err = load_reviews(&csv_path, &Lexicon::default()).unwrap_err();
    assert!(err.to_string().contains("line 2"), "{}", err);
}

#[test]
fn test_missing_database_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(open_survey_database(&dir.path().join("absent.db")).is_err());
}
