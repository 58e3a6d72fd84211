//! Cognify Progress Reports
//!
//! This crate turns a learner's stored progress into a report that can be
//! serialized to JSON for programmatic access or rendered to Markdown for the
//! profile screen.
//!
//! # Types
//!
//! - [`ProfileReport`] - The complete report for one learner
//! - [`XpSnapshot`] - Level and XP at generation time
//! - [`QuizRecord`] - The latest attempt on one reel's quiz
//!
//! # Generators
//!
//! - [`json::JsonGenerator`] - Compact or pretty JSON
//! - [`MarkdownGenerator`] - Human-readable Markdown
//!
//! # Example
//!
//! ```rust
//! use cognify_report::{ProfileReport, QuizRecord, XpSnapshot};
//! use cognify_report::json::JsonGenerator;
//!
//! let report = ProfileReport::builder()
//!     .learner_name("Ada")
//!     .xp(XpSnapshot { level: 2, current_xp: 10, xp_to_next_level: 200 })
//!     .quiz(QuizRecord::new("1", "sq1", true))
//!     .build()
//!     .unwrap();
//!
//! let json = JsonGenerator::new(&report).generate_pretty().unwrap();
//! assert!(json.contains("\"learner_name\": \"Ada\""));
//! ```

pub mod json;
mod markdown;

pub use markdown::MarkdownGenerator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the report to JSON.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to read or write report files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid report data.
    #[error("invalid report data: {0}")]
    InvalidData(String),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// XP Snapshot (local copy to avoid cross-crate dependency)
// ============================================================================

/// Level and XP of the learner when the report was generated.
///
/// Mirrors the feed crate's XP state so this crate does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpSnapshot {
    /// Current level.
    pub level: u32,
    /// XP inside the current level.
    pub current_xp: u32,
    /// XP needed to complete the current level.
    pub xp_to_next_level: u32,
}

impl Default for XpSnapshot {
    fn default() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            xp_to_next_level: 100,
        }
    }
}

impl XpSnapshot {
    /// Progress through the current level as a whole percentage.
    #[must_use]
    pub fn percent(&self) -> u32 {
        let threshold = u64::from(self.xp_to_next_level.max(1));
        let pct = u64::from(self.current_xp) * 100 / threshold;
        u32::try_from(pct.min(100)).unwrap_or(100)
    }
}

// ============================================================================
// QuizRecord
// ============================================================================

/// The latest quiz attempt on one reel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    /// Reel id.
    pub content_id: String,
    /// Quiz id the attempt was made against.
    pub quiz_id: String,
    /// Whether the attempt was correct.
    pub correctly_answered: bool,
    /// When the attempt happened.
    pub answered_at: DateTime<Utc>,
    /// Reel description, when the catalog still has the reel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl QuizRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(content_id: impl Into<String>, quiz_id: impl Into<String>, correct: bool) -> Self {
        Self::at_time(Utc::now(), content_id, quiz_id, correct)
    }

    /// Creates a record with a fixed timestamp.
    #[must_use]
    pub fn at_time(
        answered_at: DateTime<Utc>,
        content_id: impl Into<String>,
        quiz_id: impl Into<String>,
        correct: bool,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            quiz_id: quiz_id.into(),
            correctly_answered: correct,
            answered_at,
            title: None,
        }
    }

    /// Attaches the reel description.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

// ============================================================================
// ProfileReport
// ============================================================================

/// Progress report for one learner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Name entered during onboarding.
    pub learner_name: String,

    /// When the report was generated.
    pub generated_at: DateTime<Utc>,

    /// Level and XP.
    pub xp: XpSnapshot,

    /// Latest attempt per reel, ordered by reel id.
    pub quizzes: Vec<QuizRecord>,
}

impl ProfileReport {
    /// Creates a new report builder.
    #[must_use]
    pub fn builder() -> ProfileReportBuilder {
        ProfileReportBuilder::default()
    }

    /// Returns the attempt counts.
    #[must_use]
    pub fn quiz_counts(&self) -> QuizCounts {
        let correct = self
            .quizzes
            .iter()
            .filter(|q| q.correctly_answered)
            .count();
        QuizCounts {
            correct,
            incorrect: self.quizzes.len() - correct,
        }
    }

    /// Records whose latest attempt was correct.
    pub fn mastered(&self) -> impl Iterator<Item = &QuizRecord> {
        self.quizzes.iter().filter(|q| q.correctly_answered)
    }

    /// Records still waiting for a correct answer.
    pub fn needs_review(&self) -> impl Iterator<Item = &QuizRecord> {
        self.quizzes.iter().filter(|q| !q.correctly_answered)
    }
}

/// Quiz attempt counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizCounts {
    /// Reels answered correctly.
    pub correct: usize,
    /// Reels whose latest attempt was wrong.
    pub incorrect: usize,
}

impl QuizCounts {
    /// Returns the number of attempted reels.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.correct + self.incorrect
    }
}

// ============================================================================
// ProfileReportBuilder
// ============================================================================

/// Builder for constructing [`ProfileReport`] instances.
#[derive(Debug, Clone, Default)]
pub struct ProfileReportBuilder {
    learner_name: Option<String>,
    generated_at: Option<DateTime<Utc>>,
    xp: Option<XpSnapshot>,
    quizzes: Vec<QuizRecord>,
}

impl ProfileReportBuilder {
    /// Sets the learner name.
    #[must_use]
    pub fn learner_name(mut self, name: impl Into<String>) -> Self {
        self.learner_name = Some(name.into());
        self
    }

    /// Sets the generation time (defaults to now).
    #[must_use]
    pub const fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Sets the XP snapshot (defaults to a fresh level 1).
    #[must_use]
    pub const fn xp(mut self, xp: XpSnapshot) -> Self {
        self.xp = Some(xp);
        self
    }

    /// Adds a quiz record.
    #[must_use]
    pub fn quiz(mut self, record: QuizRecord) -> Self {
        self.quizzes.push(record);
        self
    }

    /// Sets all quiz records at once.
    #[must_use]
    pub fn quizzes(mut self, records: Vec<QuizRecord>) -> Self {
        self.quizzes = records;
        self
    }

    /// Builds the report.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidData` if the learner name is missing or
    /// blank, or if the XP snapshot has a zero threshold.
    pub fn build(self) -> Result<ProfileReport> {
        let learner_name = self
            .learner_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ReportError::InvalidData("learner_name is required".to_string()))?;

        let xp = self.xp.unwrap_or_default();
        if xp.xp_to_next_level == 0 {
            return Err(ReportError::InvalidData(
                "xp_to_next_level must be greater than 0".to_string(),
            ));
        }

        Ok(ProfileReport {
            learner_name,
            generated_at: self.generated_at.unwrap_or_else(Utc::now),
            xp,
            quizzes: self.quizzes,
        })
    }
}
