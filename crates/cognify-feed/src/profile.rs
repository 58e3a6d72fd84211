//! User preferences, onboarding and progress reset.

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};
use crate::store::ProgressStore;

/// Status shown on the profile screen when no preferences are stored.
pub const PREFERENCES_MISSING_MESSAGE: &str = "Could not load user preferences.";

/// Topic a learner can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interest {
    /// Natural sciences.
    Science,
    /// Software and computing.
    #[serde(rename = "Technology & Programming")]
    TechnologyAndProgramming,
    /// Mathematics and statistics.
    Mathematics,
    /// History.
    History,
}

/// Preferences captured during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Display name.
    pub name: String,
    /// Followed topics. Onboarding no longer collects them, so this is
    /// usually empty.
    #[serde(default)]
    pub interests: Vec<Interest>,
}

/// Finishes onboarding with the given name.
///
/// The name is trimmed; the preferences are saved and onboarding is marked
/// complete.
///
/// # Errors
///
/// Returns `FeedError::NameRequired` for a blank name, or the store's error
/// if persisting fails.
pub fn complete_onboarding<S>(store: &mut S, name: &str) -> Result<UserPreferences>
where
    S: ProgressStore + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(FeedError::NameRequired);
    }

    let preferences = UserPreferences {
        name: name.to_string(),
        interests: Vec::new(),
    };
    store.save_preferences(&preferences)?;
    store.mark_onboarding_completed()?;
    tracing::info!(name = %preferences.name, "Onboarding completed");
    Ok(preferences)
}

/// Wipes preferences, quiz progress and XP.
pub fn reset_progress<S>(store: &mut S) -> Result<()>
where
    S: ProgressStore + ?Sized,
{
    store.clear()?;
    tracing::info!("Progress has been reset");
    Ok(())
}
