//! Source discovery, assembly, and output writing.
//!
//! A source is either one planner text file or a directory of them. Each file
//! is parsed on its own (so every file starts at week 1 until its own week
//! marker) and the resulting plans are merged, in path order, into a single
//! [`LessonDocument`].
//!
//! ## Output
//!
//! ```text
//! <output>/
//! ├── lessons.json           # every parsed week merged
//! ├── week1_lessons.json     # { "week": 1, ...grades } for week 1 only
//! └── week2_lessons.json
//! ```
//!
//! JSON is pretty-printed with two-space indentation and no trailing newline.
//! Because all maps are insertion-ordered, identical input produces
//! byte-identical files.

use crate::config::{self, ConfigError, PlannerConfig};
use crate::parse::{self, WeekPlan};
use crate::types::{LessonDocument, WeekDocument};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No planner .txt files found in {0}")]
    NoSources(PathBuf),
}

const SOURCE_EXTENSION: &str = "txt";

/// One parsed planner file.
#[derive(Debug, Clone)]
pub struct SourcePlan {
    pub source: PathBuf,
    pub plan: WeekPlan,
}

/// Everything a build produced, before anything is written.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub sources: Vec<SourcePlan>,
    /// All plans merged into one document.
    pub document: LessonDocument,
}

impl BuildResult {
    /// Assemble parsed plans into the merged document.
    pub fn assemble(sources: Vec<SourcePlan>, config: &PlannerConfig) -> Self {
        let document =
            LessonDocument::from_plans(sources.iter().map(|s| &s.plan), &config.document);
        Self { sources, document }
    }

    /// Documents per detected week, in first-seen order. Plans that share a
    /// week number are merged.
    pub fn week_documents(&self, config: &PlannerConfig) -> Vec<WeekDocument> {
        let mut weeks: IndexMap<u32, Vec<&WeekPlan>> = IndexMap::new();
        for source in &self.sources {
            weeks.entry(source.plan.week).or_default().push(&source.plan);
        }
        weeks
            .into_iter()
            .map(|(week, plans)| {
                WeekDocument::new(week, LessonDocument::from_plans(plans, &config.document))
            })
            .collect()
    }

    /// Distinct week numbers across all sources.
    pub fn week_count(&self) -> usize {
        let mut weeks: Vec<u32> = self.sources.iter().map(|s| s.plan.week).collect();
        weeks.sort_unstable();
        weeks.dedup();
        weeks.len()
    }

    /// Days in the merged document. A key repeated across sources counts once.
    pub fn day_count(&self) -> usize {
        self.document.day_count()
    }

    pub fn lesson_count(&self) -> usize {
        self.sources.iter().map(|s| s.plan.lesson_count()).sum()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.sources.iter().map(|s| s.plan.diagnostics.len()).sum()
    }
}

/// The directory whose `config.toml` applies to a source: the source itself
/// when it is a directory, otherwise its parent.
pub fn default_config_dir(source: &Path) -> PathBuf {
    if source.is_dir() {
        return source.to_path_buf();
    }
    match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Load the config for a build: `config_dir` when given, else the source's.
pub fn load_config_for(
    source: &Path,
    config_dir: Option<&Path>,
) -> Result<PlannerConfig, BuildError> {
    let dir = config_dir.map_or_else(|| default_config_dir(source), Path::to_path_buf);
    Ok(config::load_config(&dir)?)
}

/// List planner files under `path`.
///
/// A file is returned as-is whatever its extension. A directory is walked
/// recursively for `.txt` files, skipping hidden entries, sorted by path.
pub fn discover_sources(path: &Path) -> Result<Vec<PathBuf>, BuildError> {
    if !path.is_dir() {
        if !path.exists() {
            return Err(BuildError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut sources = Vec::new();
    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && has_source_extension(entry.path()) {
            sources.push(entry.into_path());
        }
    }

    if sources.is_empty() {
        return Err(BuildError::NoSources(path.to_path_buf()));
    }
    sources.sort();
    Ok(sources)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

/// Parse one planner file.
pub fn parse_source(path: &Path, config: &PlannerConfig) -> Result<SourcePlan, BuildError> {
    let text = fs::read_to_string(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let plan = parse::parse(&text, &config.parser);
    tracing::info!(
        source = %path.display(),
        week = plan.week,
        days = plan.days.len(),
        lessons = plan.lesson_count(),
        "parsed planner"
    );
    for diagnostic in &plan.diagnostics {
        tracing::debug!(source = %path.display(), "{diagnostic}");
    }
    Ok(SourcePlan {
        source: path.to_path_buf(),
        plan,
    })
}

/// Discover, parse, and assemble every planner file under `source`.
pub fn build(source: &Path, config: &PlannerConfig) -> Result<BuildResult, BuildError> {
    let sources = discover_sources(source)?
        .iter()
        .map(|path| parse_source(path, config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BuildResult::assemble(sources, config))
}

/// Write `lessons.json` and, when enabled, one week file per detected week.
///
/// Returns the written paths in write order.
pub fn write_outputs(
    result: &BuildResult,
    out_dir: &Path,
    config: &PlannerConfig,
) -> Result<Vec<PathBuf>, BuildError> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let lessons_path = out_dir.join(&config.output.lessons_file);
    write_json(&lessons_path, &result.document)?;
    written.push(lessons_path);

    if config.output.week_files {
        for week_doc in result.week_documents(config) {
            let week_path = out_dir.join(config::week_file_name(week_doc.week));
            write_json(&week_path, &week_doc)?;
            written.push(week_path);
        }
    }

    Ok(written)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), BuildError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), "wrote");
    Ok(())
}
