//! Async glue between the content source, the quiz interaction and the
//! controller.
//!
//! The controller itself never awaits. A [`FeedSession`] awaits the two
//! suspension points (catalog fetch and quiz answer) and feeds their results
//! back as events.

use async_trait::async_trait;

use crate::catalog::ContentSource;
use crate::content::Quiz;
use crate::controller::{FeedController, FeedEvent};
use crate::error::{FeedError, Result};
use crate::store::ProgressStore;

/// Presents a quiz and reports whether it was answered correctly.
#[async_trait]
pub trait QuizInteraction: Send {
    /// Runs the quiz to completion.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::QuizAborted` if the learner leaves without
    /// answering.
    async fn run(&mut self, quiz: &Quiz) -> Result<bool>;
}

/// A controller wired to its collaborators.
#[derive(Debug)]
pub struct FeedSession<C, S, Q> {
    source: C,
    controller: FeedController<S>,
    interaction: Q,
}

impl<C, S, Q> FeedSession<C, S, Q>
where
    C: ContentSource,
    S: ProgressStore,
    Q: QuizInteraction,
{
    /// Creates a session.
    pub const fn new(source: C, controller: FeedController<S>, interaction: Q) -> Self {
        Self {
            source,
            controller,
            interaction,
        }
    }

    /// Fetches the catalog and builds the first queue.
    ///
    /// A fetch failure is not an error here: the feed shows the
    /// catalog-unavailable status instead, and nothing is retried.
    ///
    /// # Errors
    ///
    /// Only returns an error if the controller rejects the catalog event.
    pub async fn load(&mut self) -> Result<()> {
        let event = match self.source.fetch_catalog().await {
            Ok(items) => FeedEvent::CatalogLoaded(items),
            Err(e) => FeedEvent::CatalogFailed(e.to_string()),
        };
        self.controller.handle(event)
    }

    /// Opens the displayed reel's quiz, awaits the answer and advances.
    ///
    /// Returns whether the answer was correct.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::QuizUnavailable` if the reel has no quiz to take,
    /// or the interaction's error if it was aborted (the feed is back to
    /// idle on the same reel in that case).
    pub async fn take_quiz(&mut self) -> Result<bool> {
        self.controller.handle(FeedEvent::QuizOpened)?;
        let quiz = self
            .controller
            .active_quiz()
            .cloned()
            .ok_or_else(|| FeedError::quiz_aborted("quiz closed before it was shown"))?;

        match self.interaction.run(&quiz).await {
            Ok(correct) => {
                self.controller.handle(FeedEvent::QuizAnswered { correct })?;
                self.controller.handle(FeedEvent::AdvanceRequested)?;
                Ok(correct)
            }
            Err(e) => {
                self.controller.handle(FeedEvent::QuizCancelled)?;
                Err(e)
            }
        }
    }

    /// Moves to the next reel without a quiz.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::InvalidStateTransition` outside the idle phase.
    pub fn swipe(&mut self) -> Result<()> {
        self.controller.handle(FeedEvent::Swipe)
    }

    /// Reshuffles the loaded catalog, keeping the current reel in view.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::InvalidStateTransition` outside the idle phase.
    pub fn refresh(&mut self) -> Result<()> {
        self.controller.handle(FeedEvent::RefreshRequested)
    }

    /// The controller.
    pub const fn controller(&self) -> &FeedController<S> {
        &self.controller
    }

    /// The controller, mutably.
    pub fn controller_mut(&mut self) -> &mut FeedController<S> {
        &mut self.controller
    }

    /// The quiz interaction, for front ends that share its input.
    pub fn interaction_mut(&mut self) -> &mut Q {
        &mut self.interaction
    }

    /// Consumes the session, returning the controller.
    pub fn into_controller(self) -> FeedController<S> {
        self.controller
    }
}
