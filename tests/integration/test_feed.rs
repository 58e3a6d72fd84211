//! Integration tests for the feed controller against fixture files and the
//! JSON progress store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use cognify_feed::{
    complete_onboarding, quick_picks, reset_progress, Config, ContentItem, ContentSource,
    FeedController, FeedError, FeedEvent, FeedStatus, JsonFileCatalog, JsonFileStore,
    ProgressStore, QuizProgressEntry,
};
use cognify_report::{MarkdownGenerator, ProfileReport, QuizRecord, XpSnapshot};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// A fresh progress file path under the temp directory.
fn state_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("cognify_integration");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::remove_file(&path).ok();
    path
}

fn fixture_config() -> Config {
    let config = Config::load_from_file(&fixture_path("cognify.json")).unwrap();
    config.validate().unwrap();
    config
}

async fn fixture_catalog() -> Vec<ContentItem> {
    JsonFileCatalog::new(fixture_path("catalog.json"))
        .fetch_catalog()
        .await
        .unwrap()
}

/// Answers the displayed reel's quiz and advances.
fn answer_current<S: ProgressStore>(feed: &mut FeedController<S>, correct: bool) -> String {
    let id = feed.current().unwrap().id.clone();
    feed.handle(FeedEvent::QuizOpened).unwrap();
    feed.handle(FeedEvent::QuizAnswered { correct }).unwrap();
    feed.handle(FeedEvent::AdvanceRequested).unwrap();
    id
}

/// Swipes until a reel with a quiz is displayed.
fn skip_to_quiz<S: ProgressStore>(feed: &mut FeedController<S>) {
    for _ in 0..feed.queue().len() {
        if feed.current().is_some_and(|item| item.quiz.is_some()) {
            return;
        }
        feed.handle(FeedEvent::Swipe).unwrap();
    }
    panic!("no reel with a quiz in the queue");
}

#[test]
fn test_config_fixture() {
    let config = fixture_config();

    assert_eq!(config.xp_per_correct_answer, 60);
    assert_eq!(config.initial_xp_to_next_level, 100);
    assert_eq!(config.catalog.as_deref(), Some("catalog.json"));
    assert_eq!(config.quick_picks, vec!["r4".to_string(), "r2".to_string()]);
}

#[tokio::test]
async fn test_catalog_fixture() {
    let items = fixture_catalog().await;

    assert_eq!(items.len(), 4);
    let image = items.iter().find(|item| item.id == "r3").unwrap();
    assert!(image.quiz.is_none());

    let picks = quick_picks(&items, &fixture_config().quick_picks).unwrap();
    let ids: Vec<&str> = picks.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["r4", "r2"]);
}

#[tokio::test]
async fn test_missing_catalog_file_fails_load() {
    let err = JsonFileCatalog::new(fixture_path("no-such-catalog.json"))
        .fetch_catalog()
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::CatalogFetchFailed { .. }));

    let store = JsonFileStore::open(state_path("missing_catalog.json")).unwrap();
    let mut feed = FeedController::with_rng(store, &fixture_config(), StdRng::seed_from_u64(1));
    feed.handle(FeedEvent::CatalogFailed(err.to_string())).unwrap();

    assert_eq!(feed.status(), FeedStatus::LoadFailed);
    assert!(feed.current().is_none());
}

#[tokio::test]
async fn test_progress_survives_restart() {
    let path = state_path("restart.json");
    let config = fixture_config();
    let items = fixture_catalog().await;

    let mastered = {
        let store = JsonFileStore::open(&path).unwrap();
        let mut feed = FeedController::with_rng(store, &config, StdRng::seed_from_u64(7));
        feed.handle(FeedEvent::CatalogLoaded(items.clone())).unwrap();
        skip_to_quiz(&mut feed);
        let id = answer_current(&mut feed, true);
        assert_eq!(feed.xp().current_xp, 60);
        id
    };

    let store = JsonFileStore::open(&path).unwrap();
    assert!(store.quiz_progress().get(&mastered).unwrap().correctly_answered);
    assert_eq!(store.xp_state().unwrap().current_xp, 60);

    let mut feed = FeedController::with_rng(store, &config, StdRng::seed_from_u64(8));
    feed.handle(FeedEvent::CatalogLoaded(items)).unwrap();
    assert_eq!(feed.queue().len(), 3);
    assert!(feed.queue().iter().all(|item| item.id != mastered));
    assert_eq!(feed.xp().current_xp, 60);

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_level_up_across_two_answers() {
    let path = state_path("level_up.json");
    let store = JsonFileStore::open(&path).unwrap();
    let mut feed = FeedController::with_rng(store, &fixture_config(), StdRng::seed_from_u64(3));
    feed.handle(FeedEvent::CatalogLoaded(fixture_catalog().await)).unwrap();

    skip_to_quiz(&mut feed);
    answer_current(&mut feed, true);
    skip_to_quiz(&mut feed);
    answer_current(&mut feed, true);

    let xp = feed.xp();
    assert_eq!(xp.level, 2);
    assert_eq!(xp.current_xp, 20);
    assert_eq!(xp.xp_to_next_level, 200);

    let notice = feed.active_notice(chrono::Utc::now()).unwrap();
    assert_eq!(notice.message, "Level Up! You reached Level 2!");

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_missed_quiz_comes_back_until_mastered() {
    let path = state_path("retry.json");
    let store = JsonFileStore::open(&path).unwrap();
    let mut feed = FeedController::with_rng(store, &fixture_config(), StdRng::seed_from_u64(11));
    feed.handle(FeedEvent::CatalogLoaded(fixture_catalog().await)).unwrap();
    skip_to_quiz(&mut feed);

    let missed = answer_current(&mut feed, false);
    let copies = feed.queue().iter().filter(|item| item.id == missed).count();
    assert_eq!(copies, 2);
    assert_eq!(feed.queue().len(), 5);
    assert!(!feed.store().quiz_progress().get(&missed).unwrap().correctly_answered);

    for _ in 0..feed.queue().len() {
        if feed.current().unwrap().id == missed {
            break;
        }
        feed.handle(FeedEvent::Swipe).unwrap();
    }
    assert_eq!(feed.current().unwrap().id, missed);
    answer_current(&mut feed, true);

    assert!(feed.queue().iter().all(|item| item.id != missed));
    assert!(feed.retry().is_empty());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_onboarding_report_and_reset() {
    let path = state_path("profile.json");
    let mut store = JsonFileStore::open(&path).unwrap();

    complete_onboarding(&mut store, "  Ada  ").unwrap();
    store.record_quiz_attempt("r2", "bs1", true).unwrap();
    store.record_quiz_attempt("r4", "pr1", false).unwrap();

    let store = JsonFileStore::open(&path).unwrap();
    assert!(store.onboarding_completed());
    let name = store.preferences().unwrap().name.clone();
    assert_eq!(name, "Ada");

    let quizzes = store
        .quiz_progress()
        .iter()
        .map(|(content_id, entry): (&str, &QuizProgressEntry)| {
            QuizRecord::at_time(entry.answered_at, content_id, &entry.quiz_id, entry.correctly_answered)
        })
        .collect();
    let report = ProfileReport::builder()
        .learner_name(name)
        .xp(XpSnapshot::default())
        .quizzes(quizzes)
        .build()
        .unwrap();
    let markdown = MarkdownGenerator::new(&report).generate();
    assert!(markdown.contains("# Cognify Progress: Ada"));
    assert!(markdown.contains("| Quizzes Passed | 1 |"));
    assert!(markdown.contains("| Needs Review | 1 |"));

    let mut store = store;
    reset_progress(&mut store).unwrap();
    assert!(!path.exists());
    let store = JsonFileStore::open(&path).unwrap();
    assert!(!store.onboarding_completed());
    assert!(store.quiz_progress().is_empty());
}
