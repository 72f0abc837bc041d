//! # Lesson Planner
//!
//! Turns a school's curriculum planner, exported from a word processor as
//! plain text, into the nested grade → month → day JSON document a lesson
//! viewer reads. The text file is the data source: week markers, day headers,
//! and roman-numeral section headers carry all the structure.
//!
//! # Architecture: Read, Parse, Assemble, Write
//!
//! ```text
//! 1. Read      planner.txt | planner/*.txt  →  text per source
//! 2. Parse     text                         →  WeekPlan (days, lessons, diagnostics)
//! 3. Assemble  WeekPlan...                  →  LessonDocument (grade/month/day)
//! 4. Write     LessonDocument               →  src/lessons.json, src/weekN_lessons.json
//! ```
//!
//! Parsing is a pure function of the text and the parser config, so tests
//! exercise the line state machine without touching the filesystem. Only
//! [`build`] reads and writes files.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`headers`] | Line classification: week markers, day headers, section headers, separators |
//! | [`markup`] | Content line formatting (`^label:^`, `*`, `**`) and the matching reader |
//! | [`parse`] | Line-oriented state machine producing a [`parse::WeekPlan`] per source |
//! | [`types`] | Serialized document types (`LessonEntry`, `LessonDocument`, `WeekDocument`) |
//! | [`config`] | `config.toml` loading, stock defaults, merging, and validation |
//! | [`build`] | Source discovery, parsing, assembly, and JSON output |
//! | [`output`] | CLI output formatting for build, check, and show |
//!
//! # Design Decisions
//!
//! ## Insertion-Ordered Keys
//!
//! Grades, months, and days are stored in [`indexmap::IndexMap`] so the JSON
//! keeps the order in which they were first seen. Day `"10"` follows day `"9"`
//! instead of sorting before `"2"`.
//!
//! ## Day Numbering Across Weeks
//!
//! Day headers restart at 1 every week. The emitted key is
//! `(week - 1) * days_per_week + day`, so week 2 day 1 becomes day `"6"` with
//! the default five-day week.
//!
//! ## Lenient Input
//!
//! Malformed planner text never fails a build. Lines that cannot be placed are
//! dropped and reported as [`parse::Diagnostic`]s, which `check` prints.

pub mod build;
pub mod config;
pub mod headers;
pub mod markup;
pub mod output;
pub mod parse;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
