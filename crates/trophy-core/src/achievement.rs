//! Per-player progress toward one achievement definition.
//!
//! An [`Achievement`] pairs a shared, read-only
//! [`AchievementInfo`] with the mutable counters of one
//! player. The progress variant always mirrors the definition's variant; it
//! is chosen in [`Achievement::new`] and never changes.
//!
//! Once an achievement is unlocked it stays unlocked and its counters are
//! frozen: further increases and race-end resets are ignored.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::id::AchievementId;
use crate::info::{AchievementInfo, AchievementKind, CheckType, Goals};
use crate::saved::{SavedAchievement, SavedProgress};
use crate::TrophyError;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Counter state of an [`Achievement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// One counter.
    Single(u32),
    /// One counter per goal key of the definition.
    Map(BTreeMap<String, u32>),
}

impl Progress {
    /// Zeroed counters shaped after `goals`.
    fn zeroed(goals: &Goals) -> Self {
        match goals {
            Goals::Single { .. } => Progress::Single(0),
            Goals::Map { goals, .. } => {
                Progress::Map(goals.keys().map(|key| (key.clone(), 0)).collect())
            }
        }
    }

    /// The variant of these counters.
    pub fn kind(&self) -> AchievementKind {
        match self {
            Progress::Single(_) => AchievementKind::Single,
            Progress::Map(_) => AchievementKind::Map,
        }
    }

    /// Whether every counter is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Progress::Single(value) => *value == 0,
            Progress::Map(values) => values.values().all(|&v| v == 0),
        }
    }
}

// ---------------------------------------------------------------------------
// Achievement
// ---------------------------------------------------------------------------

/// One player's progress toward one definition.
#[derive(Debug, Clone)]
pub struct Achievement {
    info: Arc<AchievementInfo>,
    achieved: bool,
    progress: Progress,
}

impl Achievement {
    /// Create zero-progress state for `info`.
    pub fn new(info: Arc<AchievementInfo>) -> Self {
        let progress = Progress::zeroed(info.goals());
        Self {
            info,
            achieved: false,
            progress,
        }
    }

    /// ID of the underlying definition.
    pub fn id(&self) -> AchievementId {
        self.info.id()
    }

    /// The definition this progress belongs to.
    pub fn info(&self) -> &AchievementInfo {
        &self.info
    }

    /// Current counters.
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Whether the achievement has been unlocked.
    pub fn is_achieved(&self) -> bool {
        self.achieved
    }

    /// Advance the counter for `key` by `amount`.
    ///
    /// Single achievements ignore `key`. Map achievements only count keys
    /// that appear in the definition's goals. Returns `true` if this call
    /// unlocked the achievement.
    pub fn increase(&mut self, key: &str, amount: u32) -> bool {
        if self.achieved {
            return false;
        }
        match &mut self.progress {
            Progress::Single(value) => *value = value.saturating_add(amount),
            Progress::Map(values) => match values.get_mut(key) {
                Some(value) => *value = value.saturating_add(amount),
                None => {
                    tracing::debug!(
                        id = %self.info.id(),
                        key,
                        "ignoring progress for key not in the achievement's goals"
                    );
                    return false;
                }
            },
        }
        self.check()
    }

    /// Race-end hook: clear the counters if the definition asks for it and
    /// the achievement is not unlocked yet.
    pub fn on_race_end(&mut self) {
        if self.info.reset_after_race() && !self.achieved {
            self.progress = Progress::zeroed(self.info.goals());
        }
    }

    /// Re-evaluate completion. Returns `true` if the achievement was
    /// unlocked by this check.
    fn check(&mut self) -> bool {
        if self.achieved || !self.goals_met() {
            return false;
        }
        self.achieved = true;
        tracing::info!(
            id = %self.info.id(),
            title = self.info.title(),
            "achievement unlocked"
        );
        true
    }

    fn goals_met(&self) -> bool {
        match (self.info.goals(), &self.progress) {
            (Goals::Single { goal }, Progress::Single(value)) => value >= goal,
            (Goals::Map { goals, check }, Progress::Map(values)) => {
                let mut reached = goals
                    .iter()
                    .map(|(key, goal)| values.get(key).is_some_and(|value| value >= goal));
                match check {
                    CheckType::AllAtLeast => reached.all(|ok| ok),
                    CheckType::OneAtLeast => reached.any(|ok| ok),
                }
            }
            _ => false,
        }
    }

    /// Human-readable progress: `"3/5"` for a single achievement, and
    /// keys-at-goal over total keys for a map achievement.
    pub fn progress_string(&self) -> String {
        match (self.info.goals(), &self.progress) {
            (Goals::Single { goal }, Progress::Single(value)) => format!("{value}/{goal}"),
            (Goals::Map { goals, .. }, Progress::Map(values)) => {
                let done = goals
                    .iter()
                    .filter(|(key, goal)| values.get(*key).is_some_and(|value| value >= *goal))
                    .count();
                format!("{done}/{}", goals.len())
            }
            _ => String::new(),
        }
    }

    /// Overwrite this achievement's state with a persisted record.
    ///
    /// Map records may name keys that were removed from the definition;
    /// those are dropped. Keys missing from the record stay at zero.
    ///
    /// # Errors
    ///
    /// Returns [`TrophyError::ProgressMismatch`] if the record's payload is
    /// for the other variant. The current state is left untouched.
    pub fn load(&mut self, record: &SavedAchievement) -> Result<(), TrophyError> {
        let progress = match (&record.progress, self.info.goals()) {
            (SavedProgress::Single { value }, Goals::Single { .. }) => Progress::Single(*value),
            (SavedProgress::Map { values }, Goals::Map { goals, .. }) => Progress::Map(
                goals
                    .keys()
                    .map(|key| (key.clone(), values.get(key).copied().unwrap_or(0)))
                    .collect(),
            ),
            (saved, _) => {
                return Err(TrophyError::ProgressMismatch {
                    id: self.id(),
                    expected: self.info.kind(),
                    found: saved.kind(),
                });
            }
        };
        self.progress = progress;
        self.achieved = record.achieved;
        // A record saved before the goal was lowered may already satisfy it.
        if !self.achieved && self.goals_met() {
            self.achieved = true;
        }
        Ok(())
    }

    /// Persisted form of this achievement's state.
    pub fn save(&self) -> SavedAchievement {
        let progress = match &self.progress {
            Progress::Single(value) => SavedProgress::Single { value: *value },
            Progress::Map(values) => SavedProgress::Map {
                values: values.clone(),
            },
        };
        SavedAchievement {
            id: self.id(),
            achieved: self.achieved,
            progress,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
