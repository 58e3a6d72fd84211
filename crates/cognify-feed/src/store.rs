//! Progress persistence.
//!
//! The feed reads and writes learner state through the [`ProgressStore`]
//! trait: per-reel quiz outcomes, the XP tuple, and onboarding preferences.
//! Writes are single-field overwrites, so neither store needs transactions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};
use crate::profile::UserPreferences;
use crate::progress::{QuizProgress, QuizProgressEntry};
use crate::xp::XpState;

/// Current version of the progress file format.
pub const STORE_VERSION: u32 = 1;

/// Key-value persistence for learner progress.
pub trait ProgressStore {
    /// Latest quiz attempt per reel.
    fn quiz_progress(&self) -> &QuizProgress;

    /// Records a quiz attempt; the last write for a reel wins.
    fn record_quiz_attempt(&mut self, content_id: &str, quiz_id: &str, correct: bool)
        -> Result<()>;

    /// Stored XP, or `None` for a learner who never earned any.
    fn xp_state(&self) -> Option<XpState>;

    /// Overwrites the stored XP.
    fn set_xp_state(&mut self, xp: XpState) -> Result<()>;

    /// Onboarding preferences, if onboarding ran.
    fn preferences(&self) -> Option<&UserPreferences>;

    /// Overwrites the preferences.
    fn save_preferences(&mut self, preferences: &UserPreferences) -> Result<()>;

    /// Returns `true` once onboarding finished.
    fn onboarding_completed(&self) -> bool;

    /// Marks onboarding as finished.
    fn mark_onboarding_completed(&mut self) -> Result<()>;

    /// Removes everything.
    fn clear(&mut self) -> Result<()>;
}

/// Everything the stores persist, as one versioned document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDocument {
    /// File format version.
    pub version: u32,
    /// Onboarding preferences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
    /// Whether onboarding finished.
    #[serde(default)]
    pub onboarding_completed: bool,
    /// Latest quiz attempt per reel.
    #[serde(default)]
    pub quiz_progress: QuizProgress,
    /// XP tuple, absent until the first award.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<XpState>,
}

impl Default for ProgressDocument {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            preferences: None,
            onboarding_completed: false,
            quiz_progress: QuizProgress::new(),
            xp: None,
        }
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// A store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: ProgressDocument,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `document`.
    #[must_use]
    pub const fn with_document(document: ProgressDocument) -> Self {
        Self { document }
    }

    /// The underlying document.
    #[must_use]
    pub const fn document(&self) -> &ProgressDocument {
        &self.document
    }
}

impl ProgressStore for MemoryStore {
    fn quiz_progress(&self) -> &QuizProgress {
        &self.document.quiz_progress
    }

    fn record_quiz_attempt(
        &mut self,
        content_id: &str,
        quiz_id: &str,
        correct: bool,
    ) -> Result<()> {
        self.document
            .quiz_progress
            .record(content_id, QuizProgressEntry::new(quiz_id, correct));
        Ok(())
    }

    fn xp_state(&self) -> Option<XpState> {
        self.document.xp
    }

    fn set_xp_state(&mut self, xp: XpState) -> Result<()> {
        self.document.xp = Some(xp);
        Ok(())
    }

    fn preferences(&self) -> Option<&UserPreferences> {
        self.document.preferences.as_ref()
    }

    fn save_preferences(&mut self, preferences: &UserPreferences) -> Result<()> {
        self.document.preferences = Some(preferences.clone());
        Ok(())
    }

    fn onboarding_completed(&self) -> bool {
        self.document.onboarding_completed
    }

    fn mark_onboarding_completed(&mut self) -> Result<()> {
        self.document.onboarding_completed = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.document = ProgressDocument::default();
        Ok(())
    }
}

// ============================================================================
// JsonFileStore
// ============================================================================

/// A store backed by a JSON file, rewritten after every change.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::StoreCorrupted` if the file is not a valid progress
    /// document, or an I/O error if it cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<ProgressDocument>(&contents)
                .map_err(|e| FeedError::store_corrupted(&path, e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No progress file yet, starting fresh");
                ProgressDocument::default()
            }
            Err(e) => return Err(e.into()),
        };

        if document.version > STORE_VERSION {
            return Err(FeedError::store_corrupted(
                &path,
                format!(
                    "file version {} is newer than supported version {STORE_VERSION}",
                    document.version
                ),
            ));
        }

        if let Some(xp) = document.xp.filter(|xp| !xp.is_valid()) {
            return Err(FeedError::store_corrupted(
                &path,
                format!(
                    "invalid XP state: level {}, {}/{} XP",
                    xp.level, xp.current_xp, xp.xp_to_next_level
                ),
            ));
        }

        Ok(Self {
            path,
            inner: MemoryStore::with_document(document),
        })
    }

    /// Path of the progress file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self.inner.document())?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ProgressStore for JsonFileStore {
    fn quiz_progress(&self) -> &QuizProgress {
        self.inner.quiz_progress()
    }

    fn record_quiz_attempt(
        &mut self,
        content_id: &str,
        quiz_id: &str,
        correct: bool,
    ) -> Result<()> {
        self.inner.record_quiz_attempt(content_id, quiz_id, correct)?;
        self.flush()
    }

    fn xp_state(&self) -> Option<XpState> {
        self.inner.xp_state()
    }

    fn set_xp_state(&mut self, xp: XpState) -> Result<()> {
        self.inner.set_xp_state(xp)?;
        self.flush()
    }

    fn preferences(&self) -> Option<&UserPreferences> {
        self.inner.preferences()
    }

    fn save_preferences(&mut self, preferences: &UserPreferences) -> Result<()> {
        self.inner.save_preferences(preferences)?;
        self.flush()
    }

    fn onboarding_completed(&self) -> bool {
        self.inner.onboarding_completed()
    }

    fn mark_onboarding_completed(&mut self) -> Result<()> {
        self.inner.mark_onboarding_completed()?;
        self.flush()
    }

    fn clear(&mut self) -> Result<()> {
        self.inner.clear()?;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("cognify_store_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::remove_file(&path).ok();
        path
    }

    #[test]
    fn test_memory_store_last_write_wins() {
        let mut store = MemoryStore::new();
        store.record_quiz_attempt("1", "sq1", true).unwrap();
        store.record_quiz_attempt("1", "sq1", false).unwrap();

        let entry = store.quiz_progress().get("1").unwrap();
        assert!(!entry.correctly_answered);
        assert_eq!(entry.quiz_id, "sq1");
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let path = temp_path("persist.json");

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.record_quiz_attempt("7", "hq1", true).unwrap();
            store
                .set_xp_state(XpState {
                    level: 1,
                    current_xp: 20,
                    xp_to_next_level: 100,
                })
                .unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.quiz_progress().get("7").unwrap().correctly_answered);
        assert_eq!(store.xp_state().unwrap().current_xp, 20);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_store_missing_file_starts_fresh() {
        let path = temp_path("missing.json");
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.quiz_progress().is_empty());
        assert!(store.xp_state().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_corrupted_file() {
        let path = temp_path("corrupted.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, FeedError::StoreCorrupted { .. }));
        assert!(err.is_fatal());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_store_rejects_future_version() {
        let path = temp_path("future.json");
        std::fs::write(&path, r#"{"version": 99}"#).unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("newer than supported"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_store_rejects_invalid_xp() {
        let path = temp_path("bad_xp.json");
        std::fs::write(
            &path,
            r#"{"version": 1, "xp": {"level": 1, "currentXp": 0, "xpToNextLevel": 0}}"#,
        )
        .unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, FeedError::StoreCorrupted { .. }));
        assert!(err.to_string().contains("invalid XP state"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_store_clear_removes_file() {
        let path = temp_path("clear.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.mark_onboarding_completed().unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
        assert!(!store.onboarding_completed());
    }

    #[test]
    fn test_document_json_layout() {
        let mut store = MemoryStore::new();
        store.record_quiz_attempt("1", "sq1", true).unwrap();
        let json = serde_json::to_string(store.document()).unwrap();

        assert!(json.contains(r#""version":1"#));
        assert!(json.contains(r#""onboardingCompleted":false"#));
        assert!(json.contains(r#""quizProgress":{"1":"#));
        assert!(!json.contains(r#""xp""#));
    }
}
