//! Quiz progress records and mastery checks.
//!
//! Progress is keyed by content id and remembers only the latest attempt.
//! A reel counts as mastered when its latest attempt was correct *and* was made
//! against the quiz the reel currently carries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentItem;

/// Latest quiz attempt for one reel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgressEntry {
    /// Quiz the attempt was made against.
    pub quiz_id: String,
    /// Whether the attempt was correct.
    pub correctly_answered: bool,
    /// When the attempt was recorded.
    pub answered_at: DateTime<Utc>,
}

impl QuizProgressEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(quiz_id: impl Into<String>, correctly_answered: bool) -> Self {
        Self {
            quiz_id: quiz_id.into(),
            correctly_answered,
            answered_at: Utc::now(),
        }
    }
}

/// Map of content id to its latest quiz attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizProgress {
    entries: BTreeMap<String, QuizProgressEntry>,
}

impl QuizProgress {
    /// Creates an empty progress map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Records an attempt, overwriting any previous one for the reel.
    pub fn record(&mut self, content_id: impl Into<String>, entry: QuizProgressEntry) {
        self.entries.insert(content_id.into(), entry);
    }

    /// Returns the latest attempt for a reel.
    #[must_use]
    pub fn get(&self, content_id: &str) -> Option<&QuizProgressEntry> {
        self.entries.get(content_id)
    }

    /// Iterates over `(content id, entry)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QuizProgressEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Number of reels with at least one attempt.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was attempted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of reels whose latest attempt was correct.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.entries.values().filter(|e| e.correctly_answered).count()
    }

    /// Returns `true` if `item` carries a quiz and its latest attempt answered
    /// that same quiz correctly.
    ///
    /// A quiz id mismatch (the reel's quiz changed since the attempt) does not
    /// count as mastered. Quiz-less reels are never mastered.
    #[must_use]
    pub fn is_mastered(&self, item: &ContentItem) -> bool {
        let Some(quiz) = &item.quiz else {
            return false;
        };
        self.get(&item.id)
            .is_some_and(|entry| entry.correctly_answered && entry.quiz_id == quiz.id)
    }

    /// Returns `true` if the "Take Quick Quiz" action should be offered.
    #[must_use]
    pub fn is_quiz_available(&self, item: &ContentItem) -> bool {
        item.quiz.is_some() && !self.is_mastered(item)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::content::{Author, MediaKind, Quiz, QuizOption};

    fn item(id: &str, quiz_id: Option<&str>) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            kind: MediaKind::Video,
            source_url: format!("/videos/{id}.mp4"),
            author: Author {
                name: "author".to_string(),
                avatar_url: "avatar".to_string(),
            },
            description: String::new(),
            likes: 0,
            comments: 0,
            tags: vec![],
            quiz: quiz_id.map(|q| Quiz {
                id: q.to_string(),
                question_text: "?".to_string(),
                options: vec![QuizOption::new("a", "A")],
                correct_option_id: "a".to_string(),
            }),
        }
    }

    #[test]
    fn test_record_overwrites() {
        let mut progress = QuizProgress::new();
        progress.record("1", QuizProgressEntry::new("sq1", false));
        progress.record("1", QuizProgressEntry::new("sq1", true));

        assert_eq!(progress.len(), 1);
        assert!(progress.get("1").unwrap().correctly_answered);
        assert_eq!(progress.correct_count(), 1);
    }

    #[test]
    fn test_mastery_requires_matching_quiz_id() {
        let mut progress = QuizProgress::new();
        progress.record("1", QuizProgressEntry::new("old-quiz", true));

        let reel = item("1", Some("sq1"));
        assert!(!progress.is_mastered(&reel));
        assert!(progress.is_quiz_available(&reel));

        progress.record("1", QuizProgressEntry::new("sq1", true));
        assert!(progress.is_mastered(&reel));
        assert!(!progress.is_quiz_available(&reel));
    }

    #[test]
    fn test_incorrect_attempt_is_not_mastery() {
        let mut progress = QuizProgress::new();
        progress.record("2", QuizProgressEntry::new("tq1", false));
        assert!(!progress.is_mastered(&item("2", Some("tq1"))));
    }

    #[test]
    fn test_quizless_reel_never_mastered() {
        let mut progress = QuizProgress::new();
        progress.record("3", QuizProgressEntry::new("anything", true));

        let reel = item("3", None);
        assert!(!progress.is_mastered(&reel));
        assert!(!progress.is_quiz_available(&reel));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut progress = QuizProgress::new();
        progress.record("1", QuizProgressEntry::new("sq1", true));

        let json = serde_json::to_string(&progress).unwrap();
        assert!(json.starts_with(r#"{"1":{"quizId":"sq1","correctlyAnswered":true"#));

        let restored: QuizProgress = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, progress);
    }
}
