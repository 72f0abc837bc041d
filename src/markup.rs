//! The lesson content markup convention.
//!
//! Lesson `content` is plain text with two markers, small enough to hand-edit
//! inside `lessons.json`:
//!
//! - `^...^` wraps an emphasized run (the label of a label line).
//! - A line starting with one or more `*` followed by whitespace is a bullet;
//!   the number of stars is its nesting level.
//!
//! ```text
//! ^Learning Goal:^ Recognize the shape Circle.
//! * 1. Tracing & Colouring: trace and colour the outline.
//! ** a blue jay
//! Revisit: Review Left and Right
//! ```
//!
//! The writer side ([`format_line`], [`format_section`]) turns raw planner
//! lines into this form. The reader side ([`parse_content`], [`parse_inline`])
//! turns it back into blocks for display.

use regex::Regex;
use std::sync::LazyLock;

/// Marker that opens a label line in the planner.
pub const BULLET: char = '•';

/// Marker for a second-level item in the planner.
pub const SUB_BULLET: char = '◦';

/// Toggles emphasis inside lesson content.
pub const EMPHASIS: char = '^';

static BULLET_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\*+)\s+(.*)$").unwrap());

// ============================================================================
// Writer
// ============================================================================

/// Format one raw planner line.
///
/// - `• Label: rest` → `^Label:^ rest` (bullet stripped, split on the first colon)
/// - `• no colon` → `no colon`
/// - `1. Do the thing` → `* 1. Do the thing`
/// - `◦ nested` → `** nested`
/// - anything else → trimmed line
pub fn format_line(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.starts_with(BULLET) {
        format_label_line(trimmed)
    } else if is_enumerated(trimmed) {
        format_bullet_line(trimmed, 1)
    } else if let Some(rest) = trimmed.strip_prefix(SUB_BULLET) {
        format_bullet_line(rest, 2)
    } else {
        trimmed.to_string()
    }
}

/// Format the buffered lines of one section into lesson content.
///
/// Blank lines are skipped; the joined result is trimmed.
pub fn format_section<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line: &&str| !line.trim().is_empty())
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn format_label_line(line: &str) -> String {
    let cleaned = line.trim_start_matches(BULLET).trim();
    match cleaned.split_once(':') {
        Some((label, rest)) => format!(
            "{EMPHASIS}{}:{EMPHASIS} {}",
            label.trim(),
            rest.trim()
        ),
        None => cleaned.to_string(),
    }
}

fn format_bullet_line(content: &str, level: usize) -> String {
    format!("{} {}", "*".repeat(level), content.trim())
}

/// Digits or sub-bullet markers immediately followed by a period: `1.`, `12.`, `◦.`
fn is_enumerated(line: &str) -> bool {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit() || c == SUB_BULLET);
    rest.len() < line.len() && rest.starts_with('.')
}

// ============================================================================
// Reader
// ============================================================================

/// A run of text with uniform emphasis.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub bold: bool,
}

/// One displayed line of lesson content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Segment>),
    Bullet { level: usize, segments: Vec<Segment> },
}

impl Block {
    pub fn segments(&self) -> &[Segment] {
        match self {
            Block::Paragraph(segments) | Block::Bullet { segments, .. } => segments,
        }
    }
}

/// Parse lesson content into display blocks. Blank lines produce nothing.
pub fn parse_content(text: &str) -> Vec<Block> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match BULLET_LINE.captures(line) {
            Some(caps) => Block::Bullet {
                level: caps[1].len().max(1),
                segments: parse_inline(&caps[2]),
            },
            None => Block::Paragraph(parse_inline(line)),
        })
        .collect()
}

/// Split text on emphasis markers.
///
/// Each `^` flips emphasis. Empty runs are dropped, so `^^` is invisible and an
/// unclosed marker emphasizes the rest of the line.
pub fn parse_inline(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut bold = false;
    for (i, run) in text.split(EMPHASIS).enumerate() {
        if i > 0 {
            bold = !bold;
        }
        if !run.is_empty() {
            segments.push(Segment {
                text: run.to_string(),
                bold,
            });
        }
    }
    segments
}

/// Segment text with the markers removed.
pub fn plain_text(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}
