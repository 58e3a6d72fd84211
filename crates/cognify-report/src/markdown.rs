//! Markdown report generation for the profile screen.
//!
//! The generated report includes:
//!
//! - A summary table with level, XP and quiz counts
//! - An XP progress bar
//! - Mastered reels and reels that need review
//!
//! # Example
//!
//! ```rust
//! use cognify_report::{MarkdownGenerator, ProfileReport};
//!
//! let report = ProfileReport::builder().learner_name("Ada").build().unwrap();
//! let markdown = MarkdownGenerator::new(&report).generate();
//! assert!(markdown.contains("# Cognify Progress: Ada"));
//! ```

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::{ProfileReport, QuizRecord, XpSnapshot};

/// Width of the XP bar in characters.
const XP_BAR_WIDTH: u32 = 20;

/// Generates Markdown reports from learner progress.
pub struct MarkdownGenerator<'a> {
    report: &'a ProfileReport,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a new Markdown generator for the given report.
    #[must_use]
    pub const fn new(report: &'a ProfileReport) -> Self {
        Self { report }
    }

    /// Generates the complete Markdown report.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        self.write_title(&mut output);
        self.write_summary(&mut output);
        self.write_mastered(&mut output);
        self.write_needs_review(&mut output);
        self.write_footer(&mut output);

        output
    }

    fn write_title(&self, output: &mut String) {
        let _ = writeln!(
            output,
            "# Cognify Progress: {}\n",
            escape_markdown(&self.report.learner_name)
        );
    }

    /// Writes the summary table and XP bar.
    fn write_summary(&self, output: &mut String) {
        let xp = &self.report.xp;
        let counts = self.report.quiz_counts();

        let _ = writeln!(output, "## Summary\n");
        let _ = writeln!(output, "| Metric | Value |");
        let _ = writeln!(output, "|--------|-------|");
        let _ = writeln!(output, "| Level | {} |", xp.level);
        let _ = writeln!(
            output,
            "| XP | {} / {} |",
            xp.current_xp, xp.xp_to_next_level
        );
        let _ = writeln!(output, "| Quizzes Attempted | {} |", counts.total());
        let _ = writeln!(output, "| Quizzes Passed | {} |", counts.correct);
        let _ = writeln!(output, "| Needs Review | {} |", counts.incorrect);
        let _ = writeln!(output);
        let _ = writeln!(output, "`{}` {}%\n", xp_bar(xp), xp.percent());
    }

    fn write_mastered(&self, output: &mut String) {
        let _ = writeln!(output, "## Quizzes Passed\n");
        write_records(output, self.report.mastered(), "*No quizzes passed yet.*");
    }

    fn write_needs_review(&self, output: &mut String) {
        let _ = writeln!(output, "## Needs Review\n");
        write_records(
            output,
            self.report.needs_review(),
            "*Nothing to review. Nice work!*",
        );
    }

    fn write_footer(&self, output: &mut String) {
        let _ = writeln!(output, "---");
        let _ = writeln!(
            output,
            "*Generated by Cognify at {}*",
            format_timestamp(&self.report.generated_at)
        );
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn write_records<'r>(
    output: &mut String,
    records: impl Iterator<Item = &'r QuizRecord>,
    empty: &str,
) {
    let mut records = records.peekable();
    if records.peek().is_none() {
        let _ = writeln!(output, "{empty}\n");
        return;
    }

    let _ = writeln!(output, "| Reel | Quiz | Answered |");
    let _ = writeln!(output, "|------|------|----------|");
    for record in records {
        let reel = record.title.as_deref().map_or_else(
            || escape_markdown(&record.content_id),
            escape_markdown,
        );
        let _ = writeln!(
            output,
            "| {} | `{}` | {} |",
            reel,
            record.quiz_id.replace('`', "'"),
            format_timestamp(&record.answered_at)
        );
    }
    let _ = writeln!(output);
}

/// Renders the XP bar, e.g. `#####---------------`.
fn xp_bar(xp: &XpSnapshot) -> String {
    let filled = (xp.percent() * XP_BAR_WIDTH / 100).min(XP_BAR_WIDTH);
    let empty = XP_BAR_WIDTH - filled;
    format!(
        "{}{}",
        "#".repeat(filled as usize),
        "-".repeat(empty as usize)
    )
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Escapes characters that would break Markdown tables or formatting.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '*' | '_' | '`' | '#' | '[' | ']' | '\\' | '<' | '>' | '|' => {
                result.push('\\');
                result.push(ch);
            }
            '\n' => result.push_str("<br>"),
            _ => result.push(ch),
        }
    }

    result
}
