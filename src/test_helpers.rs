//! Shared test utilities for the lesson-planner test suite.
//!
//! Fixture loading, lookups that panic with a clear message on a miss, and a
//! shape assertion for parsed plans.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let plan = parse(&fixture_text("week1.txt"), &ParserConfig::default());
//! assert_day_shape(&plan, &[
//!     ("1", &["Circle Time: Welcome Song", "Literacy: ...", "Numeracy: ..."]),
//!     ("2", &["Circle Time: Welcome Song", "Literacy: ...", "Numeracy: ..."]),
//! ]);
//! ```

use std::path::{Path, PathBuf};

use crate::parse::WeekPlan;
use crate::types::LessonEntry;

// =========================================================================
// Fixtures
// =========================================================================

/// Directory holding the planner text fixtures.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/weeks")
}

/// Read a planner fixture by file name.
pub fn fixture_text(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("fixture {} unreadable: {e}", path.display()))
}

// =========================================================================
// Plan lookups
// =========================================================================

/// Lessons of a day. Panics if the day key is missing.
pub fn find_day<'a>(plan: &'a WeekPlan, key: &str) -> &'a [LessonEntry] {
    plan.days.get(key).map(Vec::as_slice).unwrap_or_else(|| {
        let keys = day_keys(plan);
        panic!("day '{key}' not found. Available: {keys:?}")
    })
}

/// Day keys in plan order.
pub fn day_keys(plan: &WeekPlan) -> Vec<&str> {
    plan.days.keys().map(String::as_str).collect()
}

/// Lesson titles of a day, in order.
pub fn lesson_titles<'a>(plan: &'a WeekPlan, key: &str) -> Vec<&'a str> {
    find_day(plan, key)
        .iter()
        .map(|l| l.title.as_str())
        .collect()
}

/// Assert the full day/lesson layout of a plan.
///
/// Each entry is `(day key, lesson titles)`.
pub fn assert_day_shape(plan: &WeekPlan, expected: &[(&str, &[&str])]) {
    let expected_keys: Vec<&str> = expected.iter().map(|(k, _)| *k).collect();
    assert_eq!(day_keys(plan), expected_keys, "day keys mismatch");

    for (key, titles) in expected {
        assert_eq!(
            lesson_titles(plan, key),
            titles.to_vec(),
            "lesson titles of day '{key}' mismatch"
        );
    }
}
