//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines (pure, testable)
//! and a `print_*` wrapper that writes them to stdout. Logs go to stderr
//! through `tracing`; these functions are the user-facing summary.
//!
//! ## Build / Check
//!
//! ```text
//! Week 2 (planner/week2.txt)
//!     Day 6 (4 lessons)
//!         001 Circle Time: Introduction to Fine Motor Rhyme
//!         002 Literacy: Introduction to Forward Slanting Line
//!     Day 7 (3 lessons)
//!         ...
//!
//! Diagnostics
//!     planner/week1.txt line 33: dropped text outside a section: Notes for...
//!
//! Parsed 2 weeks, 7 days, 25 lessons
//! ```
//!
//! ## Show
//!
//! ```text
//! Day 6
//! 001 Circle Time: Introduction to Fine Motor Rhyme
//!     CONCEPT: Initial engagement through rhythm...
//!     • 1. Visualisation: Show real-life objects...
//!         • nested item
//! ```
//!
//! Emphasized runs are upper-cased since the terminal has no bold we can rely on.

use crate::build::BuildResult;
use crate::markup::{self, Block, Segment};
use crate::types::LessonEntry;
use std::path::{Path, PathBuf};

const DIAGNOSTIC_WIDTH: usize = 60;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `Day 6 (4 lessons)`, singular for one.
fn day_header(key: &str, count: usize) -> String {
    format!("Day {key} ({})", plural(count, "lesson", "lessons"))
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

// ============================================================================
// Build / Check
// ============================================================================

/// Summary of every parsed source: weeks, days, and lesson titles, followed
/// by diagnostics and totals.
pub fn format_build_output(result: &BuildResult) -> Vec<String> {
    let mut lines = Vec::new();

    for source in &result.sources {
        let plan = &source.plan;
        lines.push(format!(
            "Week {} ({})",
            plan.week,
            display_path(&source.source)
        ));
        if plan.days.is_empty() {
            lines.push(format!("{}(no days)", indent(1)));
        }
        for (key, lessons) in &plan.days {
            lines.push(format!("{}{}", indent(1), day_header(key, lessons.len())));
            for (i, lesson) in lessons.iter().enumerate() {
                lines.push(format!(
                    "{}{} {}",
                    indent(2),
                    format_index(i + 1),
                    lesson.title
                ));
            }
        }
    }

    if result.diagnostic_count() > 0 {
        lines.push(String::new());
        lines.push("Diagnostics".to_string());
        for source in &result.sources {
            for diagnostic in &source.plan.diagnostics {
                lines.push(format!(
                    "{}{} {}",
                    indent(1),
                    display_path(&source.source),
                    truncate(&diagnostic.to_string(), DIAGNOSTIC_WIDTH)
                ));
            }
        }
    }

    let weeks = result.week_count();
    lines.push(String::new());
    lines.push(format!(
        "Parsed {}, {}, {}",
        plural(weeks, "week", "weeks"),
        plural(result.day_count(), "day", "days"),
        plural(result.lesson_count(), "lesson", "lessons"),
    ));
    lines
}

pub fn print_build_output(result: &BuildResult) {
    for line in format_build_output(result) {
        println!("{}", line);
    }
}

/// One line per written file.
pub fn format_written(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| format!("Wrote {}", display_path(p)))
        .collect()
}

pub fn print_written(paths: &[PathBuf]) {
    for line in format_written(paths) {
        println!("{}", line);
    }
}

// ============================================================================
// Show
// ============================================================================

/// Render a day's lessons with their content as terminal text.
pub fn format_day(key: &str, lessons: &[LessonEntry]) -> Vec<String> {
    let mut lines = vec![format!("Day {key}")];
    for (i, lesson) in lessons.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), lesson.title));
        for block in markup::parse_content(&lesson.content) {
            lines.push(format_block(&block));
        }
    }
    lines
}

pub fn print_day(key: &str, lessons: &[LessonEntry]) {
    for line in format_day(key, lessons) {
        println!("{}", line);
    }
}

fn format_block(block: &Block) -> String {
    match block {
        Block::Paragraph(segments) => format!("{}{}", indent(1), render_segments(segments)),
        Block::Bullet { level, segments } => {
            format!("{}• {}", indent(*level), render_segments(segments))
        }
    }
}

fn render_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| {
            if s.bold {
                s.text.to_uppercase()
            } else {
                s.text.clone()
            }
        })
        .collect()
}
