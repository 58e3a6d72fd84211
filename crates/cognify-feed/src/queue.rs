//! Feed queue construction and position bookkeeping.
//!
//! A full build shuffles the catalog and drops mastered reels. A filter keeps
//! the existing order and only drops newly mastered reels. Either way the
//! caller keeps the learner on the same logical reel with
//! [`preserve_position`].

use rand::seq::SliceRandom;
use rand::Rng;

use crate::content::ContentItem;
use crate::progress::QuizProgress;

/// Shuffles `items` and removes every reel the learner has mastered.
///
/// Reels without a quiz are always kept.
pub fn build_queue<R>(items: &[ContentItem], progress: &QuizProgress, rng: &mut R) -> Vec<ContentItem>
where
    R: Rng + ?Sized,
{
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled.retain(|item| !progress.is_mastered(item));
    shuffled
}

/// Removes mastered reels from `queue`, preserving the relative order.
#[must_use]
pub fn filter_mastered(queue: &[ContentItem], progress: &QuizProgress) -> Vec<ContentItem> {
    queue
        .iter()
        .filter(|item| !progress.is_mastered(item))
        .cloned()
        .collect()
}

/// Finds where the reel shown at `old_index` of `old_queue` lives in
/// `new_queue`.
///
/// Falls back to clamping the old index into the new bounds when the reel is
/// gone, and to 0 for an empty queue.
#[must_use]
pub fn preserve_position(old_queue: &[ContentItem], old_index: usize, new_queue: &[ContentItem]) -> usize {
    if new_queue.is_empty() {
        return 0;
    }
    old_queue
        .get(old_index)
        .and_then(|current| new_queue.iter().position(|item| item.id == current.id))
        .unwrap_or_else(|| old_index.min(new_queue.len() - 1))
}

/// Result of re-applying the mastery filter to a live queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refiltered {
    /// The filtered queue.
    pub queue: Vec<ContentItem>,
    /// Position to display.
    pub position: usize,
}

/// Filters `queue` and carries the position over with [`preserve_position`].
///
/// When the displayed reel itself is filtered out the old index is clamped,
/// so the next advance still moves one past it.
#[must_use]
pub fn refilter(queue: &[ContentItem], position: usize, progress: &QuizProgress) -> Refiltered {
    let filtered = filter_mastered(queue, progress);
    let position = preserve_position(queue, position, &filtered);
    Refiltered {
        queue: filtered,
        position,
    }
}

/// Content ids of `items`, for logging.
#[must_use]
pub fn ids(items: &[ContentItem]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}
