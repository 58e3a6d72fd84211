//! Integration tests driving a full feed session over the fixture catalog.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use async_trait::async_trait;
use cognify_feed::{
    Config, FeedController, FeedError, FeedSession, FeedStatus, JsonFileCatalog, MemoryStore,
    ProgressStore, Quiz, QuizInteraction, Result,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Picks the correct option every time.
struct Expert {
    answered: Vec<String>,
}

#[async_trait]
impl QuizInteraction for Expert {
    async fn run(&mut self, quiz: &Quiz) -> Result<bool> {
        self.answered.push(quiz.id.clone());
        Ok(quiz.is_correct(&quiz.correct_option_id))
    }
}

/// Picks the first option, then gives up after `budget` quizzes.
struct Guesser {
    budget: usize,
}

#[async_trait]
impl QuizInteraction for Guesser {
    async fn run(&mut self, quiz: &Quiz) -> Result<bool> {
        if self.budget == 0 {
            return Err(FeedError::quiz_aborted("closed"));
        }
        self.budget -= 1;
        let first = quiz.option_at(0).unwrap();
        Ok(quiz.is_correct(&first.id))
    }
}

fn session<Q: QuizInteraction>(
    interaction: Q,
    seed: u64,
) -> FeedSession<JsonFileCatalog, MemoryStore, Q> {
    let config = Config::load_from_file(&fixture_path("cognify.json")).unwrap();
    let controller =
        FeedController::with_rng(MemoryStore::new(), &config, StdRng::seed_from_u64(seed));
    FeedSession::new(
        JsonFileCatalog::new(fixture_path("catalog.json")),
        controller,
        interaction,
    )
}

/// Swipes past reels without a quiz to take.
fn skip_to_quiz<Q: QuizInteraction>(session: &mut FeedSession<JsonFileCatalog, MemoryStore, Q>) {
    for _ in 0..session.controller().queue().len() {
        let feed = session.controller();
        if feed
            .current()
            .is_some_and(|item| feed.store().quiz_progress().is_quiz_available(item))
        {
            return;
        }
        session.swipe().unwrap();
    }
}

#[tokio::test]
async fn test_expert_masters_every_quiz() {
    let mut session = session(Expert { answered: Vec::new() }, 21);
    session.load().await.unwrap();
    assert_eq!(session.controller().status(), FeedStatus::Ready);

    for _ in 0..3 {
        skip_to_quiz(&mut session);
        assert!(session.take_quiz().await.unwrap());
    }

    let feed = session.controller();
    let ids: Vec<&str> = feed.queue().iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["r3"]);
    assert_eq!(feed.store().quiz_progress().correct_count(), 3);

    // 3 x 60 XP: level 2 at 120, then 80 of 200.
    let xp = feed.xp();
    assert_eq!((xp.level, xp.current_xp, xp.xp_to_next_level), (2, 80, 200));

    let mut answered = session.interaction_mut().answered.clone();
    answered.sort();
    assert_eq!(answered, vec!["bs1", "photo1", "pr1"]);
}

#[tokio::test]
async fn test_quiz_on_image_reel_is_unavailable() {
    let mut session = session(Expert { answered: Vec::new() }, 4);
    session.load().await.unwrap();

    for _ in 0..session.controller().queue().len() {
        if session.controller().current().unwrap().id == "r3" {
            break;
        }
        session.swipe().unwrap();
    }

    let err = session.take_quiz().await.unwrap_err();
    assert!(matches!(err, FeedError::QuizUnavailable { .. }));
    assert!(session.interaction_mut().answered.is_empty());
    session.swipe().unwrap();
}

#[tokio::test]
async fn test_guesser_builds_retry_queue_and_aborts() {
    let mut session = session(Guesser { budget: 1 }, 9);
    session.load().await.unwrap();
    skip_to_quiz(&mut session);

    let first = session.controller().current().unwrap().id.clone();
    let correct = session.take_quiz().await.unwrap();
    let feed = session.controller();
    let attempt = feed.store().quiz_progress().get(&first).unwrap();
    assert_eq!(attempt.correctly_answered, correct);

    skip_to_quiz(&mut session);
    let position = session.controller().position();
    let err = session.take_quiz().await.unwrap_err();
    assert!(matches!(err, FeedError::QuizAborted { .. }));
    assert_eq!(session.controller().position(), position);

    session.refresh().unwrap();
    assert_eq!(session.controller().status(), FeedStatus::Ready);
}

#[tokio::test]
async fn test_missing_catalog_shows_unavailable() {
    let config = Config::default();
    let controller =
        FeedController::with_rng(MemoryStore::new(), &config, StdRng::seed_from_u64(1));
    let mut session = FeedSession::new(
        JsonFileCatalog::new(fixture_path("absent.json")),
        controller,
        Expert { answered: Vec::new() },
    );

    session.load().await.unwrap();

    let feed = session.controller();
    assert_eq!(feed.status(), FeedStatus::LoadFailed);
    assert_eq!(
        feed.status().message(),
        Some(cognify_feed::CATALOG_UNAVAILABLE_MESSAGE)
    );

    session.refresh().unwrap();
    assert_eq!(session.controller().status(), FeedStatus::LoadFailed);
}
