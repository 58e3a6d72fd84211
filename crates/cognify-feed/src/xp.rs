//! XP and leveling.
//!
//! Correct answers award a fixed amount of XP. Crossing the threshold levels
//! up, carries the overflow into the new level and doubles the threshold.

use serde::{Deserialize, Serialize};

use crate::config::XP_FOR_LEVEL_UP;

/// Level and XP of a learner.
///
/// After every update `current_xp < xp_to_next_level` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpState {
    /// Current level, starting at 1.
    pub level: u32,
    /// XP collected inside the current level.
    pub current_xp: u32,
    /// XP needed to complete the current level.
    pub xp_to_next_level: u32,
}

impl Default for XpState {
    fn default() -> Self {
        Self::initial(XP_FOR_LEVEL_UP)
    }
}

impl XpState {
    /// A fresh level-1 state with the given first threshold.
    ///
    /// A zero threshold is bumped to 1 so the state stays valid.
    #[must_use]
    pub fn initial(xp_to_next_level: u32) -> Self {
        Self {
            level: 1,
            current_xp: 0,
            xp_to_next_level: xp_to_next_level.max(1),
        }
    }

    /// Returns `true` if `level >= 1` and `current_xp < xp_to_next_level`.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.level >= 1 && self.current_xp < self.xp_to_next_level
    }

    /// Progress through the current level as a fraction in `0.0..1.0`.
    #[must_use]
    pub fn progress_ratio(&self) -> f64 {
        f64::from(self.current_xp) / f64::from(self.xp_to_next_level.max(1))
    }
}

/// Result of applying a correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    /// The state after the award.
    pub state: XpState,
    /// Number of levels gained (0 when no level-up happened).
    pub levels_gained: u32,
}

impl XpAward {
    /// Returns `true` if the award crossed at least one threshold.
    #[must_use]
    pub const fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }

    /// The notice text for a level-up, if one happened.
    #[must_use]
    pub fn level_up_message(&self) -> Option<String> {
        self.leveled_up()
            .then(|| format!("Level Up! You reached Level {}!", self.state.level))
    }
}

/// Applies one correct answer worth `xp_per_answer` to `state`.
///
/// Level-ups cascade: an award large enough to cross several thresholds
/// levels up several times, doubling the threshold each time.
///
/// # Examples
///
/// ```
/// use cognify_feed::{apply_correct_answer, XpState};
///
/// let before = XpState { level: 1, current_xp: 90, xp_to_next_level: 100 };
/// let award = apply_correct_answer(before, 20);
/// assert_eq!(award.state, XpState { level: 2, current_xp: 10, xp_to_next_level: 200 });
/// assert!(award.leveled_up());
/// ```
#[must_use]
pub fn apply_correct_answer(state: XpState, xp_per_answer: u32) -> XpAward {
    let mut level = state.level.max(1);
    let mut threshold = state.xp_to_next_level.max(1);
    let mut xp = state.current_xp.saturating_add(xp_per_answer);
    let mut levels_gained = 0;

    while xp >= threshold {
        xp -= threshold;
        level = level.saturating_add(1);
        threshold = threshold.saturating_mul(2);
        levels_gained += 1;
    }

    XpAward {
        state: XpState {
            level,
            current_xp: xp,
            xp_to_next_level: threshold,
        },
        levels_gained,
    }
}
