//! The reel feed controller.
//!
//! [`FeedController`] owns the displayed queue, the current position, the
//! retry queue and the learner's XP. It changes only through
//! [`FeedController::handle`], one [`FeedEvent`] at a time. The phase gates
//! which events are accepted:
//!
//! ```text
//!            QuizOpened              QuizAnswered
//!   Idle ──────────────▶ QuizOpen ──────────────▶ AdvanceRequested
//!    ▲  ◀──────────────     │                            │
//!    │     QuizCancelled    │                            │ AdvanceRequested
//!    └──────────────────────┴────────────────────────────┘
//! ```
//!
//! `Swipe`, `RefreshRequested` and the catalog events are only accepted while
//! `Idle`, so a quiz submission can trigger at most one advance.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::content::{ContentItem, Quiz};
use crate::error::{FeedError, Result, CATALOG_UNAVAILABLE_MESSAGE};
use crate::notice::LevelUpNotice;
use crate::queue::{build_queue, ids, preserve_position, refilter};
use crate::retry::{RetryQueue, SpliceOutcome};
use crate::store::ProgressStore;
use crate::xp::{apply_correct_answer, XpState};

// ============================================================================
// Phase, Status and Events
// ============================================================================

/// Where the controller is in the quiz/advance cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeedPhase {
    /// Showing a reel, ready for input.
    #[default]
    Idle,
    /// A quiz is open for the displayed reel.
    QuizOpen {
        /// Reel the quiz belongs to.
        content_id: String,
        /// The quiz being taken.
        quiz: Quiz,
    },
    /// A quiz outcome was processed; the next event must be an advance.
    AdvanceRequested,
}

impl fmt::Display for FeedPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::QuizOpen { content_id, .. } => write!(f, "quiz-open({content_id})"),
            Self::AdvanceRequested => write!(f, "advance-requested"),
        }
    }
}

/// What the feed view should show besides the current reel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedStatus {
    /// Waiting for the catalog.
    #[default]
    Loading,
    /// A reel is available.
    Ready,
    /// Every reel has been mastered, or the catalog is empty.
    Exhausted,
    /// The catalog could not be fetched.
    LoadFailed,
    /// The position was out of range and was reset.
    Correcting,
}

impl FeedStatus {
    /// Status line rendered in place of (or above) the reel.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("Loading reels..."),
            Self::Ready => None,
            Self::Exhausted => Some("You've seen all available reels! 🎉"),
            Self::LoadFailed => Some(CATALOG_UNAVAILABLE_MESSAGE),
            Self::Correcting => Some("Correcting reel display..."),
        }
    }
}

/// Inputs driving the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// The content source delivered the catalog.
    CatalogLoaded(Vec<ContentItem>),
    /// The content source failed.
    CatalogFailed(String),
    /// The learner opened the quiz of the displayed reel.
    QuizOpened,
    /// The quiz interaction finished.
    QuizAnswered {
        /// Whether the chosen option was correct.
        correct: bool,
    },
    /// The quiz was closed without an answer.
    QuizCancelled,
    /// Move on after a quiz outcome.
    AdvanceRequested,
    /// Move on without taking a quiz.
    Swipe,
    /// Reshuffle the catalog into a new queue.
    RefreshRequested,
}

impl FeedEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::CatalogLoaded(_) => "catalog-loaded",
            Self::CatalogFailed(_) => "catalog-failed",
            Self::QuizOpened => "quiz-opened",
            Self::QuizAnswered { .. } => "quiz-answered",
            Self::QuizCancelled => "quiz-cancelled",
            Self::AdvanceRequested => "advance",
            Self::Swipe => "swipe",
            Self::RefreshRequested => "refresh",
        }
    }
}

// ============================================================================
// View Types
// ============================================================================

/// Rendering identity of a queue slot.
///
/// The same reel can appear twice after a retry splice, so the id alone is
/// not unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderKey {
    /// Reel id.
    pub content_id: String,
    /// Slot in the queue.
    pub position: usize,
}

impl fmt::Display for RenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.content_id, self.position)
    }
}

/// The displayed reel and its quiz gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelView<'a> {
    /// The reel.
    pub item: &'a ContentItem,
    /// Rendering identity.
    pub key: RenderKey,
    /// Show the "Quiz Passed" badge.
    pub quiz_passed: bool,
    /// Offer "Take Quick Quiz".
    pub quiz_available: bool,
}

/// Everything the feed view needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedView<'a> {
    /// Current status.
    pub status: FeedStatus,
    /// The displayed reel, absent when the queue is empty.
    pub reel: Option<ReelView<'a>>,
    /// Learner XP.
    pub xp: XpState,
    /// Level-up notice that has not expired yet.
    pub notice: Option<&'a LevelUpNotice>,
}

// ============================================================================
// FeedController
// ============================================================================

/// Event-driven owner of the feed state.
///
/// Independent feeds need independent controllers; nothing is shared.
#[derive(Debug)]
pub struct FeedController<S> {
    store: S,
    config: Config,
    rng: StdRng,
    catalog: Vec<ContentItem>,
    queue: Vec<ContentItem>,
    position: usize,
    retry: RetryQueue,
    xp: XpState,
    phase: FeedPhase,
    status: FeedStatus,
    last_outcome: Option<bool>,
    notice: Option<LevelUpNotice>,
}

impl<S: ProgressStore> FeedController<S> {
    /// Creates a controller with an entropy-seeded shuffle.
    pub fn new(store: S, config: &Config) -> Self {
        Self::with_rng(store, config, StdRng::from_entropy())
    }

    /// Creates a controller with a caller-provided RNG.
    ///
    /// XP is read from the store once, here.
    pub fn with_rng(store: S, config: &Config, rng: StdRng) -> Self {
        let xp = store
            .xp_state()
            .unwrap_or_else(|| XpState::initial(config.initial_xp_to_next_level));
        Self {
            store,
            config: config.clone(),
            rng,
            catalog: Vec::new(),
            queue: Vec::new(),
            position: 0,
            retry: RetryQueue::new(),
            xp,
            phase: FeedPhase::Idle,
            status: FeedStatus::Loading,
            last_outcome: None,
            notice: None,
        }
    }

    /// Applies one event.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::InvalidStateTransition` if the event is not
    /// accepted in the current phase, and `FeedError::QuizUnavailable` when
    /// opening a quiz for a reel that has none to take. The state is left
    /// unchanged in both cases.
    pub fn handle(&mut self, event: FeedEvent) -> Result<()> {
        tracing::trace!(phase = %self.phase, event = event.name(), "Handling feed event");

        let idle = self.phase == FeedPhase::Idle;
        let quiz_open = matches!(self.phase, FeedPhase::QuizOpen { .. });

        match event {
            FeedEvent::CatalogLoaded(items) if idle => self.on_catalog_loaded(items),
            FeedEvent::CatalogFailed(message) if idle => self.on_catalog_failed(&message),
            FeedEvent::QuizOpened if idle => self.on_quiz_opened()?,
            FeedEvent::Swipe if idle => self.on_swipe(),
            FeedEvent::RefreshRequested if idle => self.on_refresh(),
            FeedEvent::QuizAnswered { correct } if quiz_open => self.on_quiz_answered(correct),
            FeedEvent::QuizCancelled if quiz_open => {
                tracing::debug!("Quiz closed without an answer");
                self.phase = FeedPhase::Idle;
            }
            FeedEvent::AdvanceRequested if self.phase == FeedPhase::AdvanceRequested => {
                self.advance();
            }
            event => return Err(FeedError::invalid_transition(&self.phase, event.name())),
        }

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn on_catalog_loaded(&mut self, items: Vec<ContentItem>) {
        tracing::info!(count = items.len(), "Catalog loaded");
        self.catalog = items;
        self.rebuild();
    }

    fn on_catalog_failed(&mut self, message: &str) {
        tracing::warn!(error = %message, "Failed to fetch catalog");
        self.catalog.clear();
        self.queue.clear();
        self.position = 0;
        self.status = FeedStatus::LoadFailed;
    }

    fn on_refresh(&mut self) {
        if self.status == FeedStatus::LoadFailed {
            tracing::debug!("Refresh ignored, catalog never loaded");
            return;
        }
        self.rebuild();
    }

    fn on_swipe(&mut self) {
        if self.status == FeedStatus::LoadFailed {
            tracing::debug!("Swipe ignored, catalog never loaded");
            return;
        }
        self.advance();
    }

    fn rebuild(&mut self) {
        let progress = self.store.quiz_progress();
        let queue = build_queue(&self.catalog, progress, &mut self.rng);
        self.position = preserve_position(&self.queue, self.position, &queue);
        self.queue = queue;
        self.refresh_status();
        self.log_queues();
    }

    fn on_quiz_opened(&mut self) -> Result<()> {
        let item = self
            .queue
            .get(self.position)
            .ok_or_else(|| FeedError::quiz_unavailable(""))?;

        let quiz = match &item.quiz {
            Some(quiz) if self.store.quiz_progress().is_quiz_available(item) => quiz.clone(),
            _ => return Err(FeedError::quiz_unavailable(&item.id)),
        };

        tracing::debug!(content_id = %item.id, quiz_id = %quiz.id, "Quiz opened");
        self.phase = FeedPhase::QuizOpen {
            content_id: item.id.clone(),
            quiz,
        };
        Ok(())
    }

    fn on_quiz_answered(&mut self, correct: bool) {
        let FeedPhase::QuizOpen { content_id, quiz } = std::mem::take(&mut self.phase) else {
            return;
        };

        tracing::info!(content_id = %content_id, quiz_id = %quiz.id, correct, "Quiz answered");
        if let Err(e) = self.store.record_quiz_attempt(&content_id, &quiz.id, correct) {
            tracing::warn!(error = %e, content_id = %content_id, "Failed to record quiz attempt");
        }

        if correct {
            self.award_xp();
            self.apply_mastery();
        } else {
            self.enqueue_retry(&content_id);
        }

        self.last_outcome = Some(correct);
        self.phase = FeedPhase::AdvanceRequested;
    }

    fn award_xp(&mut self) {
        let award = apply_correct_answer(self.xp, self.config.xp_per_correct_answer);
        self.xp = award.state;
        if let Err(e) = self.store.set_xp_state(award.state) {
            tracing::warn!(error = %e, "Failed to persist XP");
        }

        if let Some(message) = award.level_up_message() {
            tracing::info!(level = award.state.level, "Level up");
            self.notice = Some(LevelUpNotice::new(
                message,
                self.config.level_up_notice_duration(),
            ));
        }
    }

    fn apply_mastery(&mut self) {
        let progress = self.store.quiz_progress();
        let refiltered = refilter(&self.queue, self.position, progress);
        self.retry.retain(|item| !progress.is_mastered(item));

        self.queue = refiltered.queue;
        self.position = refiltered.position;
        self.refresh_status();
        self.log_queues();
    }

    fn enqueue_retry(&mut self, content_id: &str) {
        match self.catalog.iter().find(|item| item.id == content_id) {
            Some(item) => {
                self.retry.push(item.clone());
                self.log_queues();
            }
            None => {
                let e = FeedError::missing_content(content_id);
                tracing::debug!(error = %e, "Skipping retry");
            }
        }
    }

    fn advance(&mut self) {
        if !self.queue.is_empty() {
            let len = self.queue.len();
            let next = self.position + 1;
            match self.retry.splice_into(&mut self.queue, next) {
                SpliceOutcome::Inserted(at) => tracing::debug!(at, "Retry reel spliced"),
                SpliceOutcome::Appended(count) => tracing::debug!(count, "Retry reels appended"),
                SpliceOutcome::Untouched => {}
            }
            // Wrapping is decided against the length before any append.
            self.position = if next >= len { 0 } else { next };
        } else if !self.retry.is_empty() {
            self.queue = self.retry.take_all();
            self.position = 0;
        }

        self.last_outcome = None;
        self.phase = FeedPhase::Idle;
        self.refresh_status();
        self.log_queues();
    }

    fn refresh_status(&mut self) {
        self.status = if self.queue.is_empty() {
            FeedStatus::Exhausted
        } else {
            FeedStatus::Ready
        };
    }

    fn log_queues(&self) {
        tracing::debug!(
            queue = ?ids(&self.queue),
            retry = ?self.retry.ids(),
            position = self.position,
            "Reels queue updated"
        );
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Resets an out-of-range position to 0.
    ///
    /// Returns `true` if a correction was needed.
    pub fn reconcile(&mut self) -> bool {
        if self.queue.is_empty() || self.position < self.queue.len() {
            return false;
        }
        tracing::warn!(
            position = self.position,
            len = self.queue.len(),
            "Position past end of queue, resetting"
        );
        self.position = 0;
        self.status = FeedStatus::Correcting;
        true
    }

    /// Builds the frame to render, reconciling the position first.
    pub fn view(&mut self, now: DateTime<Utc>) -> FeedView<'_> {
        self.reconcile();

        let progress = self.store.quiz_progress();
        let reel = self.queue.get(self.position).map(|item| ReelView {
            item,
            key: RenderKey {
                content_id: item.id.clone(),
                position: self.position,
            },
            quiz_passed: item.quiz.is_some() && progress.is_mastered(item),
            quiz_available: progress.is_quiz_available(item),
        });

        FeedView {
            status: self.status,
            reel,
            xp: self.xp,
            notice: self.active_notice(now),
        }
    }

    /// The level-up notice, unless it has expired by `now`.
    #[must_use]
    pub fn active_notice(&self, now: DateTime<Utc>) -> Option<&LevelUpNotice> {
        self.notice.as_ref().filter(|notice| !notice.is_expired(now))
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The displayed reel.
    #[must_use]
    pub fn current(&self) -> Option<&ContentItem> {
        self.queue.get(self.position)
    }

    /// The quiz currently open, if any.
    #[must_use]
    pub const fn active_quiz(&self) -> Option<&Quiz> {
        match &self.phase {
            FeedPhase::QuizOpen { quiz, .. } => Some(quiz),
            _ => None,
        }
    }

    /// Returns `true` if `item`'s current quiz was answered correctly.
    #[must_use]
    pub fn is_quiz_passed(&self, item: &ContentItem) -> bool {
        self.store.quiz_progress().is_mastered(item)
    }

    /// The displayed queue.
    #[must_use]
    pub fn queue(&self) -> &[ContentItem] {
        &self.queue
    }

    /// Current position in the queue.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Reels waiting for reinsertion.
    #[must_use]
    pub const fn retry(&self) -> &RetryQueue {
        &self.retry
    }

    /// The full catalog as last loaded.
    #[must_use]
    pub fn catalog(&self) -> &[ContentItem] {
        &self.catalog
    }

    /// Learner XP.
    #[must_use]
    pub const fn xp(&self) -> XpState {
        self.xp
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &FeedPhase {
        &self.phase
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> FeedStatus {
        self.status
    }

    /// Outcome of the quiz awaiting its advance.
    #[must_use]
    pub const fn last_outcome(&self) -> Option<bool> {
        self.last_outcome
    }

    /// The progress store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the controller, returning its store.
    pub fn into_store(self) -> S {
        self.store
    }
}
