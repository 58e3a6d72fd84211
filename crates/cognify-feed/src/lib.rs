//! Cognify reel feed
//!
//! The reel feed controller plus the collaborators it talks to: the content
//! catalog, the progress store and the quiz interaction. The controller keeps
//! a shuffled queue of reels, requeues missed quizzes near the learner's
//! position, drops mastered reels and awards XP for correct answers.

pub mod catalog;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod notice;
pub mod profile;
pub mod progress;
pub mod queue;
pub mod retry;
pub mod session;
pub mod store;
pub mod xp;

pub use catalog::{
    load_quick_picks, quick_picks, validate_catalog, BuiltinCatalog, ContentSource,
    JsonFileCatalog, NO_QUICK_PICKS_MESSAGE, QUICK_PICKS_MISSING_MESSAGE,
    QUICK_PICKS_UNAVAILABLE_MESSAGE,
};
pub use config::{Config, XP_FOR_LEVEL_UP, XP_PER_CORRECT_ANSWER};
pub use content::{format_count, Author, ContentItem, MediaKind, Quiz, QuizOption};
pub use controller::{
    FeedController, FeedEvent, FeedPhase, FeedStatus, FeedView, ReelView, RenderKey,
};
pub use error::{FeedError, Result, CATALOG_UNAVAILABLE_MESSAGE};
pub use notice::LevelUpNotice;
pub use profile::{
    complete_onboarding, reset_progress, Interest, UserPreferences, PREFERENCES_MISSING_MESSAGE,
};
pub use progress::{QuizProgress, QuizProgressEntry};
pub use queue::{build_queue, filter_mastered, preserve_position, refilter, Refiltered};
pub use retry::{RetryQueue, SpliceOutcome};
pub use session::{FeedSession, QuizInteraction};
pub use store::{JsonFileStore, MemoryStore, ProgressDocument, ProgressStore, STORE_VERSION};
pub use xp::{apply_correct_answer, XpAward, XpState};
