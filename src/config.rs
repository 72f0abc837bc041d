//! Planner configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! reproduce the classic single-grade planner; a user file only needs the keys
//! it wants to change.
//!
//! ## Config File Location
//!
//! `config.toml` is read from the config directory: `--config <dir>` when
//! given, otherwise the source directory (or the source file's parent).
//!
//! ```text
//! planner/
//! ├── config.toml        # Optional overrides
//! ├── week1.txt
//! └── week2.txt
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [document]
//! grades = ["Nursery", "LKG", "UKG"]  # Every grade gets an entry, in this order
//! grade = "Nursery"                   # The grade parsed lessons go into
//! month = 1                           # Month key the days are filed under
//!
//! [parser]
//! days_per_week = 5      # Day offset per week: Week 2 / Day 1 -> day "6"
//! separator_width = 80   # Dashes needed for a line to close a day
//!
//! [output]
//! lessons_file = "lessons.json"
//! week_files = true      # Also write week<N>_lessons.json per parsed week
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Planner configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// Shape of the generated document.
    pub document: DocumentConfig,
    /// Header grammar knobs.
    pub parser: ParserConfig,
    /// Output file names.
    pub output: OutputConfig,
}

impl PlannerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let doc = &self.document;
        if doc.grades.is_empty() {
            return Err(ConfigError::Validation(
                "document.grades must not be empty".into(),
            ));
        }
        for (i, grade) in doc.grades.iter().enumerate() {
            if grade.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "document.grades entries must not be blank".into(),
                ));
            }
            if doc.grades[..i].contains(grade) {
                return Err(ConfigError::Validation(format!(
                    "document.grades lists \"{grade}\" twice"
                )));
            }
        }
        if !doc.grades.contains(&doc.grade) {
            return Err(ConfigError::Validation(format!(
                "document.grade \"{}\" is not one of document.grades",
                doc.grade
            )));
        }
        if doc.month == 0 {
            return Err(ConfigError::Validation(
                "document.month must be at least 1".into(),
            ));
        }
        if self.parser.days_per_week == 0 {
            return Err(ConfigError::Validation(
                "parser.days_per_week must be at least 1".into(),
            ));
        }
        if self.parser.separator_width == 0 {
            return Err(ConfigError::Validation(
                "parser.separator_width must be at least 1".into(),
            ));
        }
        let file = self.output.lessons_file.trim();
        if file.is_empty() || file.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "output.lessons_file must be a plain file name".into(),
            ));
        }
        Ok(())
    }
}

/// Which grade and month the parsed days land in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Grade names emitted as top-level keys, in order. Unpopulated grades are
    /// written as empty placeholders.
    pub grades: Vec<String>,
    /// The grade that receives parsed lessons.
    pub grade: String,
    /// Month key for parsed days.
    pub month: u32,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            grades: vec!["Nursery".into(), "LKG".into(), "UKG".into()],
            grade: "Nursery".into(),
            month: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// School days per planner week; drives the day-key offset.
    pub days_per_week: u32,
    /// Minimum run of leading dashes that forms a separator line.
    pub separator_width: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            days_per_week: 5,
            separator_width: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// File name of the merged document inside the output directory.
    pub lessons_file: String,
    /// Write `week<N>_lessons.json` for every parsed week.
    pub week_files: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            lessons_file: "lessons.json".into(),
            week_files: true,
        }
    }
}

/// File name of the per-week document.
pub fn week_file_name(week: u32) -> String {
    format!("week{week}_lessons.json")
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PlannerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, arrays included.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PlannerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PlannerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, falling back to
/// stock defaults when the file is absent.
pub fn load_config(dir: &Path) -> Result<PlannerConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    if overlay.is_some() {
        tracing::debug!(dir = %dir.display(), "loading {CONFIG_FILE}");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Lesson Planner Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file next to the planner text (or pass --config <dir>).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Document shape
# ---------------------------------------------------------------------------
[document]
# Top-level grade keys, in output order. Grades other than `grade` are
# written as empty placeholders: { "months": {} }.
grades = ["Nursery", "LKG", "UKG"]

# The grade that receives the parsed lessons.
grade = "Nursery"

# Month key the parsed days are filed under.
month = 1

# ---------------------------------------------------------------------------
# Parser
# ---------------------------------------------------------------------------
[parser]
# School days per planner week. "Day N" inside "Week W" is stored under
# day key N + (W - 1) * days_per_week, so Week 2 / Day 1 becomes "6".
days_per_week = 5

# Number of leading dashes a line needs to close the current day.
separator_width = 80

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Merged document, written inside the output directory.
lessons_file = "lessons.json"

# Also write week<N>_lessons.json ({ "week": N, ...grades }) per parsed week.
week_files = true
"##
}
