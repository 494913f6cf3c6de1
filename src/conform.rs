// 🏷️ Conform Rules - Rules as Data
// Canonicalization of survey labels whose wording changed between survey years

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN_RULES: &str = include_str!("../assets/conform.json");

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// Survey fields that conform is allowed to rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConformField {
    Country,
    MainBranch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformRule {
    /// Rule ID for tracking
    pub id: String,

    pub field: ConformField,

    /// Exact label to replace (no wildcards, no case folding)
    pub from: String,

    /// Canonical label
    pub to: String,

    #[serde(default)]
    pub description: Option<String>,
}

// ============================================================================
// CONFORM TABLE
// ============================================================================

/// Static lookup from alias label to canonical label, one map per field.
#[derive(Debug, Clone, Default)]
pub struct ConformTable {
    country: HashMap<String, String>,
    main_branch: HashMap<String, String>,
}

impl ConformTable {
    /// Create an empty table (conform becomes a no-op)
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonicalization table shipped with the crate
    pub fn builtin() -> Result<Self> {
        let rules: Vec<ConformRule> =
            serde_json::from_str(BUILTIN_RULES).context("Failed to parse built-in conform rules")?;
        Ok(Self::from_rules(rules))
    }

    /// Load rules from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read conform rules file: {:?}", path.as_ref()))?;

        let rules: Vec<ConformRule> =
            serde_json::from_str(&content).context("Failed to parse conform rules JSON")?;

        Ok(Self::from_rules(rules))
    }

    /// Build the table from a list of rules. The first rule for a given label wins.
    pub fn from_rules(rules: Vec<ConformRule>) -> Self {
        let mut table = Self::new();
        for rule in rules {
            let map = table.map_mut(rule.field);
            if map.contains_key(&rule.from) {
                tracing::warn!(rule = %rule.id, from = %rule.from, "duplicate conform rule ignored");
                continue;
            }
            map.insert(rule.from, rule.to);
        }
        table
    }

    /// Canonical label for `value`, if `value` is exactly one of the table's keys
    pub fn canonical(&self, field: ConformField, value: &str) -> Option<&str> {
        self.map(field).get(value).map(String::as_str)
    }

    /// Number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.country.len() + self.main_branch.len()
    }

    fn map(&self, field: ConformField) -> &HashMap<String, String> {
        match field {
            ConformField::Country => &self.country,
            ConformField::MainBranch => &self.main_branch,
        }
    }

    fn map_mut(&mut self, field: ConformField) -> &mut HashMap<String, String> {
        match field {
            ConformField::Country => &mut self.country,
            ConformField::MainBranch => &mut self.main_branch,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
