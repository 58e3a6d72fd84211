//! Retry queue for reels whose quiz was answered incorrectly.
//!
//! Missed reels wait here until the next advance, which splices the head back
//! into the main queue one slot after the reel being advanced to. When the
//! advance wraps, everything still waiting is appended to the end instead.

use std::collections::VecDeque;

use crate::content::ContentItem;

/// How an advance consumed the retry queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceOutcome {
    /// Nothing was waiting, or the splice was skipped.
    Untouched,
    /// The head was inserted at the given index.
    Inserted(usize),
    /// This many reels were appended to the end of the main queue.
    Appended(usize),
}

/// FIFO of reels pending reinsertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryQueue {
    items: VecDeque<ContentItem>,
}

impl RetryQueue {
    /// Creates an empty retry queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Adds a missed reel at the tail.
    pub fn push(&mut self, item: ContentItem) {
        self.items.push_back(item);
    }

    /// The next reel to reinsert.
    #[must_use]
    pub fn head(&self) -> Option<&ContentItem> {
        self.items.front()
    }

    /// Number of waiting reels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if a reel with `content_id` is waiting.
    #[must_use]
    pub fn contains(&self, content_id: &str) -> bool {
        self.items.iter().any(|item| item.id == content_id)
    }

    /// Ids of the waiting reels, head first.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }

    /// Empties the queue, returning the reels in FIFO order.
    pub fn take_all(&mut self) -> Vec<ContentItem> {
        self.items.drain(..).collect()
    }

    /// Keeps only the reels for which `keep` returns `true`.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&ContentItem) -> bool,
    {
        self.items.retain(keep);
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Reinserts waiting reels into `queue` for an advance towards `next`.
    ///
    /// When `next` is inside the queue, the head goes to `next + 1` unless
    /// the reel at `next` is itself waiting or is the head. Otherwise the
    /// whole retry queue is appended.
    pub fn splice_into(&mut self, queue: &mut Vec<ContentItem>, next: usize) -> SpliceOutcome {
        if self.items.is_empty() {
            return SpliceOutcome::Untouched;
        }

        let Some(next_item) = queue.get(next) else {
            let count = self.items.len();
            queue.extend(self.take_all());
            return SpliceOutcome::Appended(count);
        };

        if self.contains(&next_item.id) {
            return SpliceOutcome::Untouched;
        }

        match self.items.pop_front() {
            Some(head) => {
                queue.insert(next + 1, head);
                SpliceOutcome::Inserted(next + 1)
            }
            None => SpliceOutcome::Untouched,
        }
    }
}
