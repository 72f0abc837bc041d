//! The lesson document written to `lessons.json`.
//!
//! ```text
//! {
//!   "Nursery": { "months": { "1": { "days": { "6": { "lessons": [ ... ] } } } } },
//!   "LKG":     { "months": {} },
//!   "UKG":     { "months": {} }
//! }
//! ```
//!
//! All maps are insertion-ordered so the JSON lists grades in configured order
//! and days in the order the planner introduced them.

use crate::config::DocumentConfig;
use crate::parse::WeekPlan;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One section of a day's plan.
///
/// `video` and `doc` are placeholders filled in by hand after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonEntry {
    pub title: String,
    /// Section body in the `^label:^` / `* bullet` markup (see [`crate::markup`]).
    pub content: String,
    #[serde(default)]
    pub video: String,
    #[serde(default)]
    pub doc: String,
}

impl LessonEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            video: String::new(),
            doc: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub lessons: Vec<LessonEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Month {
    pub days: IndexMap<String, Day>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub months: IndexMap<String, Month>,
}

/// Grade name → grade. Serialized as a bare JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonDocument {
    pub grades: IndexMap<String, Grade>,
}

impl LessonDocument {
    /// An empty placeholder for every configured grade.
    pub fn empty(config: &DocumentConfig) -> Self {
        Self {
            grades: config
                .grades
                .iter()
                .map(|name| (name.clone(), Grade::default()))
                .collect(),
        }
    }

    /// Assemble a document from parsed plans, in plan order.
    ///
    /// Only the configured target grade and month are populated, and the month
    /// exists even when no plan contributed a day. A day key
    /// seen in an earlier plan keeps its position and gains the new lessons.
    pub fn from_plans<'a>(
        plans: impl IntoIterator<Item = &'a WeekPlan>,
        config: &DocumentConfig,
    ) -> Self {
        let mut document = Self::empty(config);
        let month = document
            .grades
            .entry(config.grade.clone())
            .or_default()
            .months
            .entry(config.month.to_string())
            .or_default();

        for plan in plans {
            for (key, lessons) in &plan.days {
                month
                    .days
                    .entry(key.clone())
                    .or_default()
                    .lessons
                    .extend(lessons.iter().cloned());
            }
        }
        document
    }

    pub fn grade(&self, name: &str) -> Option<&Grade> {
        self.grades.get(name)
    }

    /// Lessons for a day key in the given grade and month.
    pub fn lessons(&self, grade: &str, month: u32, day: &str) -> Option<&[LessonEntry]> {
        self.grades
            .get(grade)?
            .months
            .get(&month.to_string())?
            .days
            .get(day)
            .map(|d| d.lessons.as_slice())
    }

    /// Day keys of a grade and month, in document order.
    pub fn day_keys(&self, grade: &str, month: u32) -> Vec<&str> {
        self.grades
            .get(grade)
            .and_then(|g| g.months.get(&month.to_string()))
            .map(|m| m.days.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Distinct days across every grade and month.
    pub fn day_count(&self) -> usize {
        self.grades
            .values()
            .flat_map(|g| g.months.values())
            .map(|m| m.days.len())
            .sum()
    }
}

/// `lessons.json` with the detected week number injected first:
/// `{ "week": 2, "Nursery": {...}, "LKG": {...}, "UKG": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekDocument {
    pub week: u32,
    #[serde(flatten)]
    pub document: LessonDocument,
}

impl WeekDocument {
    pub fn new(week: u32, document: LessonDocument) -> Self {
        Self { week, document }
    }
}
