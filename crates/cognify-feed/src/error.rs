//! Error types for the Cognify reel feed.
//!
//! This module defines the error hierarchy for feed operations, including
//! configuration loading, catalog fetching, progress persistence, onboarding
//! and feed state transitions.

use std::path::PathBuf;

/// A specialized `Result` type for Cognify feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Status shown when the content catalog cannot be fetched.
pub const CATALOG_UNAVAILABLE_MESSAGE: &str = "Could not load reels. Please try again later.";

/// Errors that can occur while driving the reel feed.
///
/// Error variants are organized by subsystem and include actionable suggestions
/// where possible. None of them is meant to reach the user verbatim: the view
/// layer renders [`FeedError::status_message`] in place of content.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your cognify.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Catalog Errors
    // ========================================================================
    /// The content source failed to deliver the catalog.
    #[error("Failed to fetch content catalog: {message}\n\nSuggestion: Reload the application; the catalog is not retried automatically")]
    CatalogFetchFailed {
        /// Description of the failure.
        message: String,
    },

    /// A catalog file could not be parsed or contains inconsistent items.
    #[error("Invalid catalog '{path}': {message}\n\nSuggestion: Check that every item has a unique id and every quiz references one of its options")]
    CatalogInvalid {
        /// Path to the catalog file (or `<built-in>`).
        path: PathBuf,
        /// Description of the inconsistency.
        message: String,
    },

    /// A content id referenced by a quiz outcome is not in the catalog.
    #[error("Content '{content_id}' not found in catalog")]
    MissingContent {
        /// The unknown content id.
        content_id: String,
    },

    // ========================================================================
    // Quiz Errors
    // ========================================================================
    /// The current reel has no quiz, or its quiz is already mastered.
    #[error("No quiz available for reel '{content_id}'")]
    QuizUnavailable {
        /// The reel the quiz was requested for.
        content_id: String,
    },

    /// The quiz interaction ended without an answer.
    #[error("Quiz interaction aborted: {message}")]
    QuizAborted {
        /// Why the interaction ended.
        message: String,
    },

    // ========================================================================
    // Onboarding Errors
    // ========================================================================
    /// Onboarding was submitted without a name.
    #[error("Please enter your name.")]
    NameRequired,

    // ========================================================================
    // Persistence Errors
    // ========================================================================
    /// Progress file contains malformed JSON that cannot be recovered.
    #[error("Corrupted progress file '{path}': {message}\n\nSuggestion: Remove the progress file to start fresh, or restore from backup")]
    StoreCorrupted {
        /// Path to the corrupted file.
        path: PathBuf,
        /// Description of the corruption.
        message: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // State Machine Errors
    // ========================================================================
    /// Invalid state transition attempted.
    #[error("Invalid state transition: cannot go from {from} to {to}")]
    InvalidStateTransition {
        /// The current phase.
        from: String,
        /// The attempted transition.
        to: String,
    },
}

impl FeedError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `CatalogFetchFailed` error.
    #[must_use]
    pub fn catalog_fetch(message: impl Into<String>) -> Self {
        Self::CatalogFetchFailed {
            message: message.into(),
        }
    }

    /// Creates a new `CatalogInvalid` error.
    #[must_use]
    pub fn catalog_invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CatalogInvalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `MissingContent` error.
    #[must_use]
    pub fn missing_content(content_id: impl Into<String>) -> Self {
        Self::MissingContent {
            content_id: content_id.into(),
        }
    }

    /// Creates a new `QuizUnavailable` error.
    #[must_use]
    pub fn quiz_unavailable(content_id: impl Into<String>) -> Self {
        Self::QuizUnavailable {
            content_id: content_id.into(),
        }
    }

    /// Creates a new `QuizAborted` error.
    #[must_use]
    pub fn quiz_aborted(message: impl Into<String>) -> Self {
        Self::QuizAborted {
            message: message.into(),
        }
    }

    /// Creates a new `StoreCorrupted` error.
    #[must_use]
    pub fn store_corrupted(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StoreCorrupted {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `InvalidStateTransition` error.
    #[must_use]
    pub fn invalid_transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Returns `true` if this error prevents the application from starting.
    ///
    /// Everything else degrades to a status message inside the feed.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
                | Self::StoreCorrupted { .. }
        )
    }

    /// Returns the user-facing status line for this error.
    #[must_use]
    pub fn status_message(&self) -> String {
        match self {
            Self::CatalogFetchFailed { .. } | Self::CatalogInvalid { .. } => {
                CATALOG_UNAVAILABLE_MESSAGE.to_string()
            }
            Self::QuizUnavailable { .. } => "This reel has no quiz to take.".to_string(),
            Self::QuizAborted { .. } => "Quiz closed without an answer.".to_string(),
            Self::NameRequired => self.to_string(),
            Self::InvalidStateTransition { .. } => "Please wait for the feed to catch up.".to_string(),
            Self::MissingContent { .. } => "Error loading current reel. Please refresh.".to_string(),
            _ => "Something went wrong. Please reload the application.".to_string(),
        }
    }
}
