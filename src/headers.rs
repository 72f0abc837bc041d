//! Line classification for the planner header grammar.
//!
//! Planner documents are plain text with four kinds of structural lines. Every
//! other line is content. Matching is done against the raw line, so an indented
//! `Day 1:` is content, not a header.
//!
//! ```text
//! Detailed Daily Planner: Week 2      week marker
//! Day 1: Introduction to Blue         day header
//! I. Circle Time: Fine Motor Rhyme    section header (roman numeral)
//! --------------------------------    separator (closes the day)
//! • Concept: counting fingers         content
//! ```
//!
//! Headers are checked in that priority order. A header whose number does not
//! fit in a `u32` is not a header at all and falls through to content.

use regex::Regex;
use std::sync::LazyLock;

static WEEK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Detailed Daily Planner: Week (\d+)").unwrap());

static DAY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Day\s+(\d+):\s+(.+)").unwrap());

static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[IVX]+\. (.+)").unwrap());

/// One classified planner line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    /// `Detailed Daily Planner: Week <n>`
    Week(u32),
    /// `Day <n>: <title>`. The title is informational only; lessons are keyed by number.
    Day { number: u32, title: &'a str },
    /// `<roman>. <title>` with the title trimmed. May be empty for `"IV.  "`.
    Section(&'a str),
    /// A run of dashes at least as long as the configured width.
    Separator,
    /// Anything else, including blank lines.
    Text(&'a str),
}

/// Classify a raw line.
///
/// `separator_width` is the minimum number of leading dashes that closes a day.
pub fn classify_line(line: &str, separator_width: usize) -> LineKind<'_> {
    if let Some(week) = WEEK_MARKER
        .captures(line)
        .and_then(|caps| caps[1].parse::<u32>().ok())
    {
        return LineKind::Week(week);
    }

    if let Some(caps) = DAY_HEADER.captures(line)
        && let Ok(number) = caps[1].parse::<u32>()
    {
        let title = caps.get(2).map_or("", |m| m.as_str().trim());
        return LineKind::Day { number, title };
    }

    if let Some(title) = SECTION_HEADER.captures(line).and_then(|caps| caps.get(1)) {
        return LineKind::Section(title.as_str().trim());
    }

    if is_separator(line, separator_width) {
        return LineKind::Separator;
    }

    LineKind::Text(line)
}

/// True when the line opens with at least `width` dashes.
///
/// Trailing characters after the run are ignored; authored planners often
/// leave a stray space after the rule.
pub fn is_separator(line: &str, width: usize) -> bool {
    width > 0 && line.chars().take_while(|&c| c == '-').count() >= width
}

/// Day key for a day number inside a week: `number + (week - 1) * days_per_week`.
///
/// Computed in signed arithmetic so a `Week 0` marker produces the negative
/// keys authors would get by hand instead of wrapping.
pub fn day_key(number: u32, week: u32, days_per_week: u32) -> String {
    let offset = (i64::from(week) - 1) * i64::from(days_per_week);
    (i64::from(number) + offset).to_string()
}
