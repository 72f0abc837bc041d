//! The lesson parser.
//!
//! A single forward pass over the planner text. The parser keeps the active
//! week, day key, and section, and buffers the raw lines of the current
//! section. Every header or separator flushes the buffered section into the
//! day it belongs to:
//!
//! ```text
//! Detailed Daily Planner: Week 2     week = 2, offset = 5
//! Day 1: Blue and Body Structure     day  = "6"
//! I. Circle Time: Rhyme              section "Circle Time: Rhyme" opens
//! • Concept: counting fingers        buffered
//! II. Literacy: Slanting Line        flush "Circle Time: Rhyme" into day "6"
//! ...
//! --------------------------------   flush, close day "6"
//! ```
//!
//! ## Leniency
//!
//! The parser never fails. Lines outside a section, and sections outside a
//! day, are left out of the plan and reported as [`Diagnostic`]s. A repeated
//! day key appends to the existing day. Blank lines are skipped everywhere and
//! never change state. A section header with a blank title still yields an
//! empty lesson, but its body lines are dropped.

use crate::config::ParserConfig;
use crate::headers::{self, LineKind};
use crate::markup;
use crate::types::LessonEntry;
use indexmap::IndexMap;
use std::fmt;

/// Result of parsing one planner text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekPlan {
    /// Last week marker seen, or 1 when the text has none.
    pub week: u32,
    /// Day key → lessons, in first-seen order.
    pub days: IndexMap<String, Vec<LessonEntry>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl WeekPlan {
    pub fn lesson_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

/// Content the parser left out of the plan, or merged, with its 1-based line.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A content line with no open section.
    DroppedLine { line: usize, text: String },
    /// A section that closed while no day was open.
    DiscardedSection { line: usize, title: String },
    /// A day header whose key already has lessons.
    MergedDay { line: usize, key: String },
}

impl Diagnostic {
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::DroppedLine { line, .. }
            | Diagnostic::DiscardedSection { line, .. }
            | Diagnostic::MergedDay { line, .. } => *line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DroppedLine { line, text } => {
                write!(f, "line {line}: dropped text outside a section: {}", text.trim())
            }
            Diagnostic::DiscardedSection { line, title } => {
                write!(f, "line {line}: section \"{title}\" is not inside a day")
            }
            Diagnostic::MergedDay { line, key } => {
                write!(f, "line {line}: day {key} repeated, lessons appended")
            }
        }
    }
}

/// Line boundaries besides `\n` and `\r\n`: lone carriage returns and the
/// Unicode separators word processors emit.
const EXTRA_LINE_BREAKS: [char; 9] = [
    '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().flat_map(|line| line.split(EXTRA_LINE_BREAKS))
}

/// Parse planner text into a [`WeekPlan`].
pub fn parse(text: &str, config: &ParserConfig) -> WeekPlan {
    let mut parser = Parser::new(config);
    for (index, line) in split_lines(text).enumerate() {
        parser.feed(index + 1, line);
    }
    parser.finish()
}

struct OpenSection {
    title: String,
    line: usize,
    lines: Vec<String>,
}

struct Parser<'c> {
    config: &'c ParserConfig,
    week: u32,
    day: Option<String>,
    section: Option<OpenSection>,
    days: IndexMap<String, Vec<LessonEntry>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'c> Parser<'c> {
    fn new(config: &'c ParserConfig) -> Self {
        Self {
            config,
            week: 1,
            day: None,
            section: None,
            days: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) {
        if line.trim().is_empty() {
            return;
        }

        match headers::classify_line(line, self.config.separator_width) {
            LineKind::Week(week) => {
                self.flush();
                tracing::debug!(line = line_no, week, "week marker");
                self.week = week;
            }
            LineKind::Day { number, title } => {
                self.flush();
                let key = headers::day_key(number, self.week, self.config.days_per_week);
                tracing::debug!(line = line_no, day = number, %key, title, "day header");
                if self.days.contains_key(&key) {
                    self.diagnostics.push(Diagnostic::MergedDay {
                        line: line_no,
                        key: key.clone(),
                    });
                }
                self.day = Some(key);
            }
            LineKind::Section(title) => {
                self.flush();
                tracing::trace!(line = line_no, title, "section header");
                self.section = Some(OpenSection {
                    title: title.to_string(),
                    line: line_no,
                    lines: Vec::new(),
                });
            }
            LineKind::Separator => {
                self.flush();
                self.day = None;
            }
            LineKind::Text(text) => match &mut self.section {
                Some(section) if !section.title.is_empty() => {
                    section.lines.push(text.to_string())
                }
                _ => self.diagnostics.push(Diagnostic::DroppedLine {
                    line: line_no,
                    text: text.to_string(),
                }),
            },
        }
    }

    /// Close the open section. Without an open day the section is discarded.
    fn flush(&mut self) {
        let Some(section) = self.section.take() else {
            return;
        };
        let Some(day) = &self.day else {
            self.diagnostics.push(Diagnostic::DiscardedSection {
                line: section.line,
                title: section.title,
            });
            return;
        };

        let content = markup::format_section(&section.lines);
        self.days
            .entry(day.clone())
            .or_default()
            .push(LessonEntry::new(section.title, content));
    }

    fn finish(mut self) -> WeekPlan {
        self.flush();
        WeekPlan {
            week: self.week,
            days: self.days,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use pretty_assertions::assert_eq;

    fn rule() -> String {
        "-".repeat(80)
    }

    fn parse_default(text: &str) -> WeekPlan {
        parse(text, &ParserConfig::default())
    }

    #[test]
    fn single_section_example() {
        let text = format!("Day 1: X\nI. Topic\n• Goal: learn\n{}", rule());
        let plan = parse_default(&text);

        assert_eq!(
            plan.days["1"],
            vec![LessonEntry::new("Topic", "^Goal:^ learn")]
        );
        assert_eq!(plan.week, 1);
        assert!(plan.diagnostics.is_empty());
    }

    #[test]
    fn week_marker_offsets_day_keys() {
        let text = format!(
            "Detailed Daily Planner: Week 2\nDay 1: X\nI. Topic\n• Goal: learn\n{}",
            rule()
        );
        let plan = parse_default(&text);

        assert_eq!(day_keys(&plan), vec!["6"]);
        assert_eq!(plan.week, 2);
    }

    #[test]
    fn days_per_week_is_configurable() {
        let config = ParserConfig {
            days_per_week: 6,
            ..ParserConfig::default()
        };
        let plan = parse(
            "Detailed Daily Planner: Week 3\nDay 2: X\nI. Topic\nbody",
            &config,
        );
        assert_eq!(day_keys(&plan), vec!["14"]);
    }

    #[test]
    fn every_section_becomes_one_lesson_in_order() {
        let text = "Day 1: X\nI. First\na\nII. Second\nb\nIII. Third\nc\n";
        let plan = parse_default(text);
        assert_eq!(lesson_titles(&plan, "1"), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn section_without_body_has_empty_content() {
        let plan = parse_default("Day 1: X\nI. Empty\nII. Full\nbody\n");
        assert_eq!(find_day(&plan, "1")[0], LessonEntry::new("Empty", ""));
    }

    #[test]
    fn content_lines_are_formatted() {
        let text = "Day 1: X\nI. Literacy\n• Concept: slant\n    1. Trace it\n◦ nested\nplain note\n";
        let plan = parse_default(text);
        assert_eq!(
            find_day(&plan, "1")[0].content,
            "^Concept:^ slant\n* 1. Trace it\n** nested\nplain note"
        );
    }

    #[test]
    fn blank_lines_change_nothing() {
        let dense = format!("Day 1: X\nI. Topic\n• Goal: learn\nmore\n{}\n", rule());
        let spaced = format!(
            "\n\nDay 1: X\n\n   \nI. Topic\n\n• Goal: learn\n\t\nmore\n\n{}\n\n",
            rule()
        );
        let dense = parse_default(&dense);
        let spaced = parse_default(&spaced);
        assert_eq!(dense.days, spaced.days);
        assert!(spaced.diagnostics.is_empty());
    }

    #[test]
    fn text_after_final_separator_is_dropped() {
        let text = format!("Day 1: X\nI. Topic\nbody\n{}\ntrailing note\n", rule());
        let plan = parse_default(&text);

        assert_eq!(find_day(&plan, "1")[0].content, "body");
        assert_eq!(plan.lesson_count(), 1);
        assert_eq!(
            plan.diagnostics,
            vec![Diagnostic::DroppedLine {
                line: 5,
                text: "trailing note".into()
            }]
        );
    }

    #[test]
    fn section_after_separator_without_day_is_discarded() {
        let text = format!("Day 1: X\nI. Topic\nbody\n{}\nII. Orphan\nlost\n", rule());
        let plan = parse_default(&text);

        assert_eq!(lesson_titles(&plan, "1"), vec!["Topic"]);
        assert_eq!(
            plan.diagnostics,
            vec![Diagnostic::DiscardedSection {
                line: 5,
                title: "Orphan".into()
            }]
        );
    }

    #[test]
    fn preamble_section_does_not_leak_into_first_day() {
        let text = "I. Overview\nintro text\nDay 1: X\nI. Topic\nbody\n";
        let plan = parse_default(text);

        assert_eq!(find_day(&plan, "1"), &[LessonEntry::new("Topic", "body")]);
        assert_eq!(
            plan.diagnostics,
            vec![Diagnostic::DiscardedSection {
                line: 1,
                title: "Overview".into()
            }]
        );
    }

    #[test]
    fn lines_before_first_section_are_dropped() {
        let plan = parse_default("Day 1: X\norphan\nI. Topic\nbody\n");
        assert_eq!(find_day(&plan, "1")[0].content, "body");
        assert_eq!(plan.diagnostics.len(), 1);
        assert_eq!(plan.diagnostics[0].line(), 2);
    }

    #[test]
    fn day_header_closes_previous_section() {
        let plan = parse_default("Day 1: X\nI. A\na\nDay 2: Y\nstray\nI. B\nb\n");
        assert_eq!(lesson_titles(&plan, "1"), vec!["A"]);
        assert_eq!(lesson_titles(&plan, "2"), vec!["B"]);
        assert!(matches!(
            plan.diagnostics.as_slice(),
            [Diagnostic::DroppedLine { line: 5, .. }]
        ));
    }

    #[test]
    fn week_marker_keeps_open_day() {
        let plan = parse_default("Day 1: X\nI. A\na\nDetailed Daily Planner: Week 3\nI. B\nb\n");
        assert_eq!(lesson_titles(&plan, "1"), vec!["A", "B"]);
        assert_eq!(plan.week, 3);
    }

    #[test]
    fn repeated_day_appends_and_reports() {
        let text = "Day 1: X\nI. A\na\nDay 2: Y\nI. B\nb\nDay 1: Again\nI. C\nc\n";
        let plan = parse_default(text);

        assert_eq!(day_keys(&plan), vec!["1", "2"]);
        assert_eq!(lesson_titles(&plan, "1"), vec!["A", "C"]);
        assert_eq!(
            plan.diagnostics,
            vec![Diagnostic::MergedDay {
                line: 7,
                key: "1".into()
            }]
        );
    }

    #[test]
    fn repeated_header_without_lessons_is_not_a_merge() {
        let plan = parse_default("Day 1: X\nDay 1: X again\nI. A\na\n");
        assert_eq!(lesson_titles(&plan, "1"), vec!["A"]);
        assert!(plan.diagnostics.is_empty());
    }

    #[test]
    fn misnumbered_section_header_is_content() {
        let plan = parse_default("Day 1: X\nI. A\n. Literacy: Revisit\nII. B\nb\n");
        assert_eq!(lesson_titles(&plan, "1"), vec!["A", "B"]);
        assert_eq!(find_day(&plan, "1")[0].content, ". Literacy: Revisit");
    }

    #[test]
    fn blank_section_title_yields_empty_lesson() {
        let plan = parse_default("Day 1: X\nI. A\na\nII.  \nlost\n");
        assert_eq!(lesson_titles(&plan, "1"), vec!["A", ""]);
        assert_eq!(find_day(&plan, "1")[0].content, "a");
        assert_eq!(find_day(&plan, "1")[1], LessonEntry::new("", ""));
        assert_eq!(
            plan.diagnostics,
            vec![Diagnostic::DroppedLine {
                line: 5,
                text: "lost".into(),
            }]
        );
    }

    #[test]
    fn lone_carriage_returns_split_lines() {
        let plan = parse_default("Day 1: X\rI. A\ra\rb\r");
        assert_eq!(lesson_titles(&plan, "1"), vec!["A"]);
        assert_eq!(find_day(&plan, "1")[0].content, "a\nb");
    }

    #[test]
    fn crlf_keeps_line_numbers() {
        let plan = parse_default("stray\r\nDay 1: X\r\nI. A\r\na\r\nnote\r\n");
        assert_eq!(lesson_titles(&plan, "1"), vec!["A"]);
        assert_eq!(plan.diagnostics[0].line(), 1);
    }

    #[test]
    fn input_without_headers_is_empty() {
        let plan = parse_default("");
        assert_eq!(plan, WeekPlan {
            week: 1,
            ..WeekPlan::default()
        });
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = fixture_text("week2.txt");
        let first = serde_json::to_string_pretty(&parse_default(&text).days).unwrap();
        let second = serde_json::to_string_pretty(&parse_default(&text).days).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn diagnostics_display() {
        let d = Diagnostic::MergedDay {
            line: 9,
            key: "6".into(),
        };
        assert_eq!(d.to_string(), "line 9: day 6 repeated, lessons appended");
    }

    // =========================================================================
    // Fixture tests
    // =========================================================================

    #[test]
    fn week2_fixture_shape() {
        let plan = parse_default(&fixture_text("week2.txt"));

        assert_eq!(plan.week, 2);
        assert_day_shape(
            &plan,
            &[
                (
                    "6",
                    &[
                        "Circle Time: Introduction to Fine Motor Rhyme",
                        "Literacy: Introduction to Forward Slanting Line",
                        "Numeracy: Introduction to Number 1 and Colour Blue",
                        "General Awareness (EVS): Introduction to Parts of the Body",
                    ],
                ),
                (
                    "7",
                    &[
                        "Circle Time: Revisit Rhyme",
                        "Numeracy: Introduction to Left and Right",
                        "General Awareness (EVS): Revisit Parts of the Body",
                    ],
                ),
                (
                    "8",
                    &[
                        "Circle Time: Introduction to Social Language",
                        "Literacy: Introduction to Backwards Slanting Line and Synthesis",
                        "Numeracy: Introduction to Shape – Circle",
                        "General Awareness (EVS): Introduction to Face and Torso Parts",
                    ],
                ),
                (
                    "9",
                    &[
                        "Circle Time: Revisit Magic Words",
                        "Literacy: Revisit Backward slanting lines",
                        "Numeracy: Revisit colour red",
                        "General Awareness (EVS): Revisit Face and Torso Parts and Action Words",
                    ],
                ),
                (
                    "10",
                    &[
                        "Circle Time: Synthesis",
                        "Literacy: Synthesis of Strokes (A-B) and Curves",
                        "Numeracy: Synthesis of Concepts",
                        "Art and Craft: Activity – Paper Folding",
                    ],
                ),
            ],
        );
        assert!(plan.diagnostics.is_empty());
    }

    #[test]
    fn week2_fixture_content() {
        let plan = parse_default(&fixture_text("week2.txt"));

        let circle = &find_day(&plan, "6")[0];
        assert!(circle.content.starts_with(
            "^Concept:^ Initial engagement through rhythm and introducing counting through body parts.\n^Activity:^ Introduce the rhyme \"Ten Little Fingers\"."
        ));

        let literacy = &find_day(&plan, "6")[1];
        assert!(literacy.content.contains("^Detailed Procedure:^ \n* 1. Visualisation:"));

        // The unnumbered "Literacy" header folds into the circle time section
        let revisit = &find_day(&plan, "7")[0];
        assert!(revisit.content.contains("\n. Literacy: Revisiting to Forward Slanting Line\n"));

        // Last day has no closing separator and is still flushed
        let synthesis = &find_day(&plan, "10")[2];
        assert!(synthesis.content.contains("Recap Counting: Revisit Number  1"));
        assert!(synthesis.content.ends_with("red in colour"));
    }

    #[test]
    fn week1_fixture_drops_preamble_and_notes() {
        let plan = parse_default(&fixture_text("week1.txt"));

        assert_eq!(day_keys(&plan), vec!["1", "2"]);
        assert_eq!(plan.lesson_count(), 6);
        assert_eq!(
            find_day(&plan, "1")[1].content,
            "^Concept:^ The standing line is the first pre-writing stroke.\n\
             ^Detailed Procedure:^ \n\
             * 1. Demonstration: Draw a tall standing line on the board from top to bottom.\n\
             * 2. Air Writing: Children draw the line in the air with a pointed finger.\n\
             ** Repeat with the other hand."
        );

        let dropped: Vec<usize> = plan.diagnostics.iter().map(Diagnostic::line).collect();
        assert_eq!(dropped, vec![1, 2, 33]);
    }
}
