//! Reel content types.
//!
//! A [`ContentItem`] is one short-form reel (video or image) with an optional
//! [`Quiz`]. Items are immutable once fetched; the feed only ever clones them
//! into its queues.

use serde::{Deserialize, Serialize};

// ============================================================================
// Quiz
// ============================================================================

/// One answer option of a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Option id, unique within its quiz.
    pub id: String,
    /// Text shown to the user.
    pub text: String,
}

impl QuizOption {
    /// Creates a new option.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A single-answer multiple choice quiz attached to a reel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    /// Quiz id. Mastery is recorded against this id.
    pub id: String,
    /// The question.
    pub question_text: String,
    /// Options in display order.
    pub options: Vec<QuizOption>,
    /// Id of the correct option.
    pub correct_option_id: String,
}

impl Quiz {
    /// Returns `true` if `option_id` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option_id: &str) -> bool {
        self.correct_option_id == option_id
    }

    /// Returns the option at a zero-based display position.
    #[must_use]
    pub fn option_at(&self, position: usize) -> Option<&QuizOption> {
        self.options.get(position)
    }

    /// Returns `true` if the correct option id refers to one of the options.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.options.iter().any(|o| o.id == self.correct_option_id)
    }
}

// ============================================================================
// ContentItem
// ============================================================================

/// Media kind of a reel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A video clip (direct file or embed).
    #[default]
    Video,
    /// A still image.
    Image,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// Author of a reel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Display handle.
    pub name: String,
    /// Avatar image locator.
    pub avatar_url: String,
}

/// A reel in the content catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Unique content id.
    pub id: String,
    /// Video or image.
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    /// Media locator.
    pub source_url: String,
    /// Authoring user.
    #[serde(rename = "user")]
    pub author: Author,
    /// Caption.
    pub description: String,
    /// Like counter.
    #[serde(default)]
    pub likes: u64,
    /// Comment counter.
    #[serde(default)]
    pub comments: u64,
    /// Topic tags; the first one is shown as a badge.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional quiz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
}

impl ContentItem {
    /// Returns the badge tag (the first tag), if any.
    #[must_use]
    pub fn badge(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    /// Returns `true` if the source is an archive.org embed rather than a file.
    #[must_use]
    pub fn is_embed(&self) -> bool {
        self.kind == MediaKind::Video && self.source_url.contains("archive.org/embed/")
    }

    /// Returns the description cut to at most `max_chars` characters.
    #[must_use]
    pub fn short_description(&self, max_chars: usize) -> &str {
        match self.description.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.description[..idx],
            None => &self.description,
        }
    }
}

/// Formats an engagement counter: values above 1000 become `1.9k`.
///
/// # Examples
///
/// ```
/// use cognify_feed::format_count;
///
/// assert_eq!(format_count(950), "950");
/// assert_eq!(format_count(1850), "1.9k");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_count(count: u64) -> String {
    if count > 1000 {
        format!("{:.1}k", count as f64 / 1000.0)
    } else {
        count.to_string()
    }
}
