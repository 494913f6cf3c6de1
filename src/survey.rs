// 📋 Survey Record Model
// One developer-survey response, plus validation and conform

use crate::conform::{ConformField, ConformTable};
use crate::errors::IngestError;
use serde::{Deserialize, Serialize};

/// Column order the ingestion layer must supply, one entry per row field
pub const SURVEY_COLUMNS: [&str; 9] = [
    "YearsCode",
    "MainBranch",
    "Country",
    "EdLevel",
    "LanguageHaveWorkedWith",
    "LanguageWantToWorkWith",
    "DatabaseHaveWorkedWith",
    "DatabaseWantToWorkWith",
    "Age",
];

/// Main branch label that marks a respondent as out of population
pub const EXCLUDED_MAIN_BRANCH: &str = "None of these";

/// Tally key for a null single-valued field, so it still shows up as its own category
pub const NULL_LABEL: &str = "None";

// ============================================================================
// SURVEY RECORD
// ============================================================================

/// Survey response. Fields are read-only except `country` and `main_branch`,
/// which `conform` may rewrite once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    year: i32,
    years_of_experience: Option<String>,
    main_branch: Option<String>,
    country: Option<String>,
    education_level: Option<String>,
    languages_worked_with: Option<String>,
    languages_interested_in: Option<String>,
    dbms_worked_with: Option<String>,
    dbms_interested_in: Option<String>,
    age: Option<String>,

    #[serde(default)]
    conformed: bool,
}

impl SurveyRecord {
    /// Map one raw row (in `SURVEY_COLUMNS` order) to a record for `year`
    pub fn from_row(year: i32, fields: Vec<Option<String>>) -> Result<Self, IngestError> {
        if fields.len() != SURVEY_COLUMNS.len() {
            return Err(IngestError::malformed(
                &format!("data_{}", year),
                0,
                format!(
                    "expected {} fields, found {}",
                    SURVEY_COLUMNS.len(),
                    fields.len()
                ),
            ));
        }

        let mut it = fields.into_iter();
        let mut next = || it.next().flatten();

        Ok(SurveyRecord {
            year,
            years_of_experience: next(),
            main_branch: next(),
            country: next(),
            education_level: next(),
            languages_worked_with: next(),
            languages_interested_in: next(),
            dbms_worked_with: next(),
            dbms_interested_in: next(),
            age: next(),
            conformed: false,
        })
    }

    /// A record is valid iff it has a country and its main branch is not "None of these"
    pub fn validate(&self) -> bool {
        self.country.is_some() && self.main_branch.as_deref() != Some(EXCLUDED_MAIN_BRANCH)
    }

    /// Canonicalize `country` and `main_branch` through `table`.
    ///
    /// Each field is looked up once, so rules never chain. Only the first call
    /// has any effect.
    pub fn conform(&mut self, table: &ConformTable) {
        if self.conformed {
            return;
        }
        self.conformed = true;

        if let Some(canonical) = self
            .country
            .as_deref()
            .and_then(|c| table.canonical(ConformField::Country, c))
        {
            self.country = Some(canonical.to_string());
        }

        if let Some(canonical) = self
            .main_branch
            .as_deref()
            .and_then(|b| table.canonical(ConformField::MainBranch, b))
        {
            self.main_branch = Some(canonical.to_string());
        }
    }

    pub fn is_conformed(&self) -> bool {
        self.conformed
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn years_of_experience(&self) -> Option<&str> {
        self.years_of_experience.as_deref()
    }

    pub fn main_branch(&self) -> Option<&str> {
        self.main_branch.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn education_level(&self) -> Option<&str> {
        self.education_level.as_deref()
    }

    pub fn languages_worked_with(&self) -> Option<&str> {
        self.languages_worked_with.as_deref()
    }

    pub fn languages_interested_in(&self) -> Option<&str> {
        self.languages_interested_in.as_deref()
    }

    pub fn dbms_worked_with(&self) -> Option<&str> {
        self.dbms_worked_with.as_deref()
    }

    pub fn dbms_interested_in(&self) -> Option<&str> {
        self.dbms_interested_in.as_deref()
    }

    pub fn age(&self) -> Option<&str> {
        self.age.as_deref()
    }
}

// ============================================================================
// TALLYABLE FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyField {
    Country,
    EducationLevel,
    MainBranch,
    LanguagesWorkedWith,
    LanguagesInterestedIn,
    DbmsWorkedWith,
    DbmsInterestedIn,
}

impl SurveyField {
    /// Fields ranked in the popularity report
    pub const MULTI_VALUED: [SurveyField; 4] = [
        SurveyField::LanguagesWorkedWith,
        SurveyField::LanguagesInterestedIn,
        SurveyField::DbmsWorkedWith,
        SurveyField::DbmsInterestedIn,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SurveyField::Country => "country",
            SurveyField::EducationLevel => "education_level",
            SurveyField::MainBranch => "main_branch",
            SurveyField::LanguagesWorkedWith => "languages_worked_with",
            SurveyField::LanguagesInterestedIn => "languages_interested_in",
            SurveyField::DbmsWorkedWith => "dbms_worked_with",
            SurveyField::DbmsInterestedIn => "dbms_interested_in",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            SurveyField::Country,
            SurveyField::EducationLevel,
            SurveyField::MainBranch,
            SurveyField::LanguagesWorkedWith,
            SurveyField::LanguagesInterestedIn,
            SurveyField::DbmsWorkedWith,
            SurveyField::DbmsInterestedIn,
        ]
        .into_iter()
        .find(|f| f.name() == name)
    }

    /// Semicolon-delimited fields
    pub fn is_multi_valued(&self) -> bool {
        Self::MULTI_VALUED.contains(self)
    }

    pub fn value<'a>(&self, record: &'a SurveyRecord) -> Option<&'a str> {
        match self {
            SurveyField::Country => record.country(),
            SurveyField::EducationLevel => record.education_level(),
            SurveyField::MainBranch => record.main_branch(),
            SurveyField::LanguagesWorkedWith => record.languages_worked_with(),
            SurveyField::LanguagesInterestedIn => record.languages_interested_in(),
            SurveyField::DbmsWorkedWith => record.dbms_worked_with(),
            SurveyField::DbmsInterestedIn => record.dbms_interested_in(),
        }
    }

    /// Tally keys this field contributes for `record`.
    ///
    /// Single-valued fields always yield exactly one key (`NULL_LABEL` for null).
    /// Multi-valued fields yield one key per non-empty token and nothing for null.
    pub fn tokens<'a>(&self, record: &'a SurveyRecord) -> Vec<&'a str> {
        match (self.value(record), self.is_multi_valued()) {
            (None, true) => Vec::new(),
            (None, false) => vec![NULL_LABEL],
            (Some(v), true) => v.split(';').filter(|t| !t.is_empty()).collect(),
            (Some(v), false) => vec![v],
        }
    }
}

impl std::fmt::Display for SurveyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// PARTITION
// ============================================================================

/// All records loaded from one survey year
#[derive(Debug, Clone, Default)]
pub struct SurveyPartition {
    pub year: i32,
    pub records: Vec<SurveyRecord>,
}

impl SurveyPartition {
    pub fn new(year: i32, records: Vec<SurveyRecord>) -> Self {
        SurveyPartition { year, records }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conform::ConformRule;

    fn row(branch: Option<&str>, country: Option<&str>, langs: Option<&str>) -> Vec<Option<String>> {
        vec![
            Some("10".to_string()),
            branch.map(String::from),
            country.map(String::from),
            Some("Bachelor's degree".to_string()),
            langs.map(String::from),
            None,
            Some("PostgreSQL;SQLite".to_string()),
            None,
            Some("25-34 years old".to_string()),
        ]
    }

    fn record(branch: Option<&str>, country: Option<&str>) -> SurveyRecord {
        SurveyRecord::from_row(2022, row(branch, country, Some("Rust;Python"))).unwrap()
    }

    #[test]
    fn test_from_row_column_order() {
        let r = record(Some("I am a developer by profession"), Some("Germany"));

        assert_eq!(r.year(), 2022);
        assert_eq!(r.years_of_experience(), Some("10"));
        assert_eq!(r.main_branch(), Some("I am a developer by profession"));
        assert_eq!(r.country(), Some("Germany"));
        assert_eq!(r.education_level(), Some("Bachelor's degree"));
        assert_eq!(r.languages_worked_with(), Some("Rust;Python"));
        assert_eq!(r.languages_interested_in(), None);
        assert_eq!(r.dbms_worked_with(), Some("PostgreSQL;SQLite"));
        assert_eq!(r.dbms_interested_in(), None);
        assert_eq!(r.age(), Some("25-34 years old"));
        assert!(!r.is_conformed());
    }

    #[test]
    fn test_from_row_wrong_arity() {
        let err = SurveyRecord::from_row(2021, vec![None; 8]).unwrap_err();
        assert!(err.to_string().contains("expected 9 fields, found 8"));
    }

    #[test]
    fn test_validate() {
        assert!(record(Some("I am a developer by profession"), Some("Germany")).validate());
        assert!(!record(Some("I am a developer by profession"), None).validate());
        assert!(!record(Some("None of these"), Some("Germany")).validate());
        assert!(!record(Some("None of these"), None).validate());
        // Null main branch does not gate validity
        assert!(record(None, Some("Germany")).validate());
    }

    #[test]
    fn test_conform_rewrites_both_fields() {
        let table = ConformTable::builtin().unwrap();
        let mut r = record(
            Some("I am a student who is learning to code"),
            Some("Democratic People's Republic of Korea"),
        );

        r.conform(&table);

        assert_eq!(r.country(), Some("North Korea"));
        assert_eq!(r.main_branch(), Some("I am learning to code"));
        assert!(r.is_conformed());
    }

    #[test]
    fn test_conform_leaves_unknown_labels() {
        let table = ConformTable::builtin().unwrap();
        let mut r = record(Some("I am a developer by profession"), Some("Germany"));
        let before = r.clone();

        r.conform(&table);

        assert_eq!(r.country(), before.country());
        assert_eq!(r.main_branch(), before.main_branch());
    }

    #[test]
    fn test_conform_is_idempotent_and_never_chains() {
        // A → B and B → C: a single application must stop at B
        let table = ConformTable::from_rules(vec![
            ConformRule {
                id: "a".to_string(),
                field: ConformField::Country,
                from: "A".to_string(),
                to: "B".to_string(),
                description: None,
            },
            ConformRule {
                id: "b".to_string(),
                field: ConformField::Country,
                from: "B".to_string(),
                to: "C".to_string(),
                description: None,
            },
        ]);
        let mut r = record(None, Some("A"));

        r.conform(&table);
        assert_eq!(r.country(), Some("B"));

        let once = r.clone();
        r.conform(&table);
        assert_eq!(r, once);
    }

    #[test]
    fn test_tokens() {
        let r = SurveyRecord::from_row(2021, row(None, Some("Chile"), Some("Rust;;Go"))).unwrap();

        assert_eq!(SurveyField::Country.tokens(&r), vec!["Chile"]);
        assert_eq!(SurveyField::LanguagesWorkedWith.tokens(&r), vec!["Rust", "Go"]);
        assert!(SurveyField::LanguagesInterestedIn.tokens(&r).is_empty());
        assert_eq!(SurveyField::MainBranch.tokens(&r), vec![NULL_LABEL]);
    }

    #[test]
    fn test_tokens_empty_list_and_null_education() {
        let mut fields = row(Some("I am a developer by profession"), Some("Chile"), Some(""));
        fields[3] = None;
        let r = SurveyRecord::from_row(2021, fields).unwrap();

        // "" and ";;" carry no category
        assert!(SurveyField::LanguagesWorkedWith.tokens(&r).is_empty());
        assert_eq!(SurveyField::EducationLevel.tokens(&r), vec!["None"]);
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in SurveyField::MULTI_VALUED {
            assert_eq!(SurveyField::from_name(field.name()), Some(field));
            assert!(field.is_multi_valued());
        }
        assert!(!SurveyField::Country.is_multi_valued());
        assert_eq!(SurveyField::from_name("salary"), None);
    }
}
