//! Content sources.
//!
//! The feed treats the catalog as a read-only asynchronous provider. Two
//! sources ship with the crate: the built-in educational catalog (served after
//! a simulated delay) and a JSON file on disk.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::content::{Author, ContentItem, MediaKind, Quiz, QuizOption};
use crate::error::{FeedError, Result};

/// Status shown when configured quick picks are missing from the catalog.
pub const QUICK_PICKS_MISSING_MESSAGE: &str = "Could not find the specified quick picks.";

/// Status shown when the catalog behind the quick picks cannot be fetched.
pub const QUICK_PICKS_UNAVAILABLE_MESSAGE: &str =
    "Could not load quick picks. Please try again later.";

/// Status shown when no quick picks are configured.
pub const NO_QUICK_PICKS_MESSAGE: &str =
    "No quick picks available right now. Check back later or update your interests!";

/// Supplies the full catalog of reels.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetches every reel. Failures are not retried by the caller.
    async fn fetch_catalog(&self) -> Result<Vec<ContentItem>>;
}

#[async_trait]
impl<T: ContentSource + ?Sized> ContentSource for Box<T> {
    async fn fetch_catalog(&self) -> Result<Vec<ContentItem>> {
        (**self).fetch_catalog().await
    }
}

/// Checks catalog consistency: unique ids and well-formed quizzes.
///
/// # Errors
///
/// Returns `FeedError::CatalogInvalid` naming the first offending item.
pub fn validate_catalog(origin: &Path, items: &[ContentItem]) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id.as_str()) {
            return Err(FeedError::catalog_invalid(
                origin,
                format!("duplicate content id '{}'", item.id),
            ));
        }
        if let Some(quiz) = &item.quiz {
            if !quiz.is_well_formed() {
                return Err(FeedError::catalog_invalid(
                    origin,
                    format!(
                        "quiz '{}' on reel '{}' names unknown correct option '{}'",
                        quiz.id, item.id, quiz.correct_option_id
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Looks up the configured quick picks, preserving the requested order.
///
/// # Errors
///
/// Returns the status line to show when no picks are configured or any pick
/// is absent from the catalog.
pub fn quick_picks<'a>(
    catalog: &'a [ContentItem],
    ids: &[String],
) -> std::result::Result<Vec<&'a ContentItem>, &'static str> {
    if ids.is_empty() {
        return Err(NO_QUICK_PICKS_MESSAGE);
    }
    ids.iter()
        .map(|id| {
            catalog
                .iter()
                .find(|item| &item.id == id)
                .ok_or(QUICK_PICKS_MISSING_MESSAGE)
        })
        .collect()
}

/// Fetches the catalog and resolves the quick picks against it.
///
/// # Errors
///
/// Returns the status line to show when the fetch fails, or any error of
/// [`quick_picks`].
pub async fn load_quick_picks<C: ContentSource + ?Sized>(
    source: &C,
    ids: &[String],
) -> std::result::Result<Vec<ContentItem>, &'static str> {
    let catalog = source.fetch_catalog().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to load quick picks");
        QUICK_PICKS_UNAVAILABLE_MESSAGE
    })?;
    quick_picks(&catalog, ids).map(|picks| picks.into_iter().cloned().collect())
}

// ============================================================================
// Built-in catalog
// ============================================================================

fn quiz(id: &str, question: &str, options: &[&str], correct: usize) -> Quiz {
    let options: Vec<QuizOption> = options
        .iter()
        .enumerate()
        .map(|(i, text)| QuizOption::new(format!("{id}o{}", i + 1), *text))
        .collect();
    Quiz {
        id: id.to_string(),
        question_text: question.to_string(),
        correct_option_id: format!("{id}o{correct}"),
        options,
    }
}

#[allow(clippy::too_many_arguments)]
fn reel(
    id: &str,
    source_url: &str,
    author: (&str, &str),
    description: &str,
    likes: u64,
    comments: u64,
    tags: &[&str],
    quiz: Quiz,
) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        kind: MediaKind::Video,
        source_url: source_url.to_string(),
        author: Author {
            name: author.0.to_string(),
            avatar_url: format!("https://picsum.photos/seed/{}/40/40", author.1),
        },
        description: description.to_string(),
        likes,
        comments,
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        quiz: Some(quiz),
    }
}

static BUILTIN_CATALOG: Lazy<Vec<ContentItem>> = Lazy::new(|| {
    let science = quiz(
        "sq1",
        "Who developed the theory of relativity?",
        &["Isaac Newton", "Albert Einstein", "Galileo Galilei", "Nikola Tesla"],
        2,
    );
    let tech = quiz(
        "tq1",
        "What does 'Python' primarily refer to in data science?",
        &[
            "A type of snake",
            "A statistical method",
            "A programming language",
            "A data visualization tool",
        ],
        3,
    );
    let history = quiz(
        "hq1",
        "Which empire is known for its Pax Romana period?",
        &["Ottoman Empire", "Mongol Empire", "Persian Empire", "Roman Empire"],
        4,
    );
    let math = quiz(
        "mq1",
        "What is the derivative of x^2?",
        &["2x", "x", "x^3/3", "2"],
        1,
    );
    let gauss = quiz(
        "mq2",
        "A Gaussian distribution is also known as?",
        &["Poisson Distribution", "Binomial Distribution", "Normal Distribution"],
        3,
    );
    let clt = quiz(
        "mq4",
        "The Central Limit Theorem states that the sampling distribution of the mean will approximate a normal distribution as what increases?",
        &["Population variance", "Number of variables", "Sample size", "Standard deviation"],
        3,
    );

    vec![
        reel("1", "/videos/LLdiffusionmodel.mp4", ("physics.insight", "avatar_physics"),
            "Exploring diffusion models in deep learning. #AI #diffusion",
            1850, 120, &["Science"], science.clone()),
        reel("2", "/videos/aivoicecloning.mp4", ("coder.pete", "avatar_coder"),
            "AI voice cloning demo. #AI #voicecloning",
            2500, 210, &["Technology & Programming"], tech.clone()),
        reel("3", "/videos/areaunderparabola.mp4", ("math.magician", "avatar_math"),
            "Calculating area under a parabola. #math #calculus",
            1100, 75, &["Mathematics"], math.clone()),
        reel("4", "/videos/quantitativefinance.mp4", ("finance.guru", "avatar_finance"),
            "Introduction to quantitative finance. #finance #quant",
            950, 60, &["Technology & Programming"], tech),
        reel("5", "/videos/quantitativehedgefunds.mp4", ("hedgefund.insider", "avatar_hedge"),
            "How quantitative hedge funds work. #finance #hedgefunds",
            2200, 150, &["Science"], science.clone()),
        reel("6", "/videos/stoichiometry.mp4", ("chemistry.whiz", "avatar_chem"),
            "Stoichiometry explained! #chemistry #science",
            3100, 280, &["Science"], science),
        reel("7", "/videos/tutancamon.mp4", ("history.revealed", "avatar_chem"),
            "A brief look into the rise and fall of the Roman Empire. #history #ancientcivilizations",
            1100, 75, &["History"], history),
        reel("8", "https://picsum.photos/seed/math_calculus/400/700", ("math.magician", "avatar_math"),
            "Understanding the fundamentals of Calculus. Derivatives explained simply! #mathematics #education",
            950, 60, &["Mathematics"], math),
        reel("9", "https://picsum.photos/seed/gauss_distribution_example/400/700", ("stats.simplified", "avatar_stats"),
            "Understanding Gaussian Distribution (Normal Distribution) in statistics. #mathematics #statistics #science",
            1256, 88, &["Mathematics", "Science"], gauss),
        reel("10", "https://picsum.photos/seed/clt_meme_example/400/700", ("data.driven.decisions", "avatar_data"),
            "The Central Limit Theorem (CLT) visualized. Why is it so important? #mathematics #statistics #datascience",
            3021, 152, &["Mathematics", "Science", "Technology & Programming"], clt),
    ]
});

/// The built-in educational catalog.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    delay: Duration,
}

impl BuiltinCatalog {
    /// Creates a source that answers after `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Returns the catalog without waiting.
    #[must_use]
    pub fn items() -> &'static [ContentItem] {
        &BUILTIN_CATALOG
    }
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

#[async_trait]
impl ContentSource for BuiltinCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<ContentItem>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        tracing::debug!(items = BUILTIN_CATALOG.len(), "Built-in catalog served");
        Ok(BUILTIN_CATALOG.to_vec())
    }
}

// ============================================================================
// JSON file catalog
// ============================================================================

/// A catalog stored as a JSON array of reels.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the catalog file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContentSource for JsonFileCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<ContentItem>> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            FeedError::catalog_fetch(format!("cannot read '{}': {e}", self.path.display()))
        })?;
        let items: Vec<ContentItem> = serde_json::from_str(&contents)
            .map_err(|e| FeedError::catalog_invalid(&self.path, e.to_string()))?;
        validate_catalog(&self.path, &items)?;
        tracing::debug!(path = %self.path.display(), items = items.len(), "Catalog file loaded");
        Ok(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_consistent() {
        let items = BuiltinCatalog::items();
        assert_eq!(items.len(), 10);
        validate_catalog(Path::new("<built-in>"), items).unwrap();
        assert!(items.iter().all(|item| item.quiz.is_some()));
    }

    #[test]
    fn test_builtin_quiz_answers() {
        let items = BuiltinCatalog::items();
        let first = items[0].quiz.as_ref().unwrap();
        assert_eq!(first.id, "sq1");
        assert_eq!(first.correct_option_id, "sq1o2");
        assert_eq!(first.option_at(1).unwrap().text, "Albert Einstein");

        let clt = items[9].quiz.as_ref().unwrap();
        assert_eq!(clt.correct_option_id, "mq4o3");
    }

    #[test]
    fn test_validate_catalog_rejects_duplicates() {
        let mut items = BuiltinCatalog::items()[..2].to_vec();
        items[1].id = items[0].id.clone();
        let err = validate_catalog(Path::new("dup.json"), &items).unwrap_err();
        assert!(err.to_string().contains("duplicate content id '1'"));
    }

    #[test]
    fn test_validate_catalog_rejects_bad_quiz() {
        let mut items = BuiltinCatalog::items()[..1].to_vec();
        if let Some(quiz) = items[0].quiz.as_mut() {
            quiz.correct_option_id = "missing".to_string();
        }
        assert!(validate_catalog(Path::new("bad.json"), &items).is_err());
    }

    #[test]
    fn test_quick_picks_in_order() {
        let ids = vec!["7".to_string(), "6".to_string()];
        let picks = quick_picks(BuiltinCatalog::items(), &ids).unwrap();
        assert_eq!(picks[0].id, "7");
        assert_eq!(picks[1].id, "6");
        assert_eq!(picks[0].badge(), Some("History"));
    }

    #[test]
    fn test_quick_picks_missing() {
        let ids = vec!["7".to_string(), "404".to_string()];
        let err = quick_picks(BuiltinCatalog::items(), &ids).unwrap_err();
        assert_eq!(err, QUICK_PICKS_MISSING_MESSAGE);
    }

    #[test]
    fn test_quick_picks_none_configured() {
        let err = quick_picks(BuiltinCatalog::items(), &[]).unwrap_err();
        assert_eq!(err, NO_QUICK_PICKS_MESSAGE);
    }

    #[tokio::test]
    async fn test_load_quick_picks_fetch_failure() {
        let source = JsonFileCatalog::new("/nonexistent/cognify/catalog.json");
        let err = load_quick_picks(&source, &["7".to_string()]).await.unwrap_err();
        assert_eq!(err, QUICK_PICKS_UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_load_quick_picks_builtin() {
        let source = BuiltinCatalog::new(Duration::ZERO);
        let ids = vec!["6".to_string()];
        let picks = load_quick_picks(&source, &ids).await.unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].id, "6");
    }

    #[tokio::test]
    async fn test_builtin_fetch_without_delay() {
        let source = BuiltinCatalog::new(Duration::ZERO);
        let items = source.fetch_catalog().await.unwrap();
        assert_eq!(items.len(), 10);
    }

    #[tokio::test]
    async fn test_json_catalog_missing_file_is_fetch_failure() {
        let source = JsonFileCatalog::new("/nonexistent/catalog.json");
        let err = source.fetch_catalog().await.unwrap_err();
        assert!(matches!(err, FeedError::CatalogFetchFailed { .. }));
    }

    #[tokio::test]
    async fn test_json_catalog_round_trip() {
        let path = std::env::temp_dir().join("test_cognify_catalog.json");
        let json = serde_json::to_string(&BuiltinCatalog::items()[..3]).unwrap();
        std::fs::write(&path, json).unwrap();

        let items = JsonFileCatalog::new(&path).fetch_catalog().await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].id, "3");

        std::fs::remove_file(&path).ok();
    }
}
