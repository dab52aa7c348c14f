//! Per-player achievement aggregate.
//!
//! An [`AchievementsStatus`] owns exactly one [`Achievement`] per registered
//! definition for a single player. The registry builds it with a default
//! entry for every definition first and only then overlays persisted data
//! via [`AchievementsStatus::load`], so profiles saved before an achievement
//! existed still get a zero-progress entry for it.

use std::collections::BTreeMap;

use crate::achievement::Achievement;
use crate::id::AchievementId;
use crate::saved::SavedAchievements;
use crate::TrophyError;

// ---------------------------------------------------------------------------
// LoadReport
// ---------------------------------------------------------------------------

/// Summary of one [`AchievementsStatus::load`] call.
///
/// Records that cannot be applied are not errors: unknown IDs are expected
/// when an achievement was removed in a newer release, and mismatched
/// records keep their default progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records applied to an existing achievement.
    pub restored: usize,
    /// Records whose ID is not in this status, plus records that could not
    /// be decoded at all.
    pub ignored: usize,
    /// Records whose payload did not fit the definition.
    pub rejected: usize,
}

// ---------------------------------------------------------------------------
// AchievementsStatus
// ---------------------------------------------------------------------------

/// Every achievement of one player, indexed by ID.
#[derive(Debug, Clone, Default)]
pub struct AchievementsStatus {
    achievements: BTreeMap<AchievementId, Achievement>,
}

impl AchievementsStatus {
    /// Create an empty status.
    pub fn new() -> Self {
        Self {
            achievements: BTreeMap::new(),
        }
    }

    /// Insert an achievement under its ID.
    ///
    /// # Panics
    ///
    /// Panics if an achievement with the same ID is already present. The
    /// registry guarantees unique IDs, so this indicates a construction bug.
    pub fn add(&mut self, achievement: Achievement) {
        let id = achievement.id();
        if self.achievements.contains_key(&id) {
            panic!("achievement {id} is already present in this status");
        }
        self.achievements.insert(id, achievement);
    }

    /// Overlay persisted progress onto the achievements already present.
    pub fn load(&mut self, saved: &SavedAchievements) -> LoadReport {
        let mut report = LoadReport {
            ignored: saved.skipped_records(),
            ..LoadReport::default()
        };
        for record in &saved.achievements {
            let Some(achievement) = self.achievements.get_mut(&record.id) else {
                tracing::debug!(id = %record.id, "ignoring saved progress for unknown achievement");
                report.ignored += 1;
                continue;
            };
            match achievement.load(record) {
                Ok(()) => report.restored += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "keeping default progress");
                    report.rejected += 1;
                }
            }
        }
        report
    }

    /// Persisted form of every achievement, in ascending ID order.
    pub fn save(&self) -> SavedAchievements {
        SavedAchievements::new(self.achievements.values().map(Achievement::save).collect())
    }

    /// Race-end hook, forwarded to every achievement once.
    pub fn on_race_end(&mut self) {
        for achievement in self.achievements.values_mut() {
            achievement.on_race_end();
        }
    }

    /// Advance achievement `id` by `amount` under `key`.
    ///
    /// Returns `true` if this unlocked the achievement.
    ///
    /// # Errors
    ///
    /// Returns [`TrophyError::UnknownAchievement`] if `id` is not present.
    pub fn increase(
        &mut self,
        id: AchievementId,
        key: &str,
        amount: u32,
    ) -> Result<bool, TrophyError> {
        self.achievements
            .get_mut(&id)
            .map(|achievement| achievement.increase(key, amount))
            .ok_or(TrophyError::UnknownAchievement { id })
    }

    /// The achievement for `id`, or `None` if no definition has that ID.
    pub fn get(&self, id: AchievementId) -> Option<&Achievement> {
        self.achievements.get(&id)
    }

    /// Mutable access to the achievement for `id`.
    pub fn get_mut(&mut self, id: AchievementId) -> Option<&mut Achievement> {
        self.achievements.get_mut(&id)
    }

    /// Iterate achievements in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.values()
    }

    /// Number of achievements, one per registered definition.
    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    /// Whether the status holds no achievements.
    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }

    /// Number of unlocked achievements.
    pub fn achieved_count(&self) -> usize {
        self.achievements.values().filter(|a| a.is_achieved()).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::achievement::Progress;
    use crate::info::{AchievementInfo, CheckType, Goals};
    use crate::saved::{SavedAchievement, SavedProgress};

    fn single(id: u32, goal: u32, reset: bool) -> Achievement {
        Achievement::new(Arc::new(
            AchievementInfo::new(AchievementId(id), "", "", Goals::Single { goal })
                .unwrap()
                .with_reset_after_race(reset),
        ))
    }

    fn map(id: u32) -> Achievement {
        Achievement::new(Arc::new(AchievementInfo::new(
            AchievementId(id),
            "",
            "",
            Goals::Map {
                goals: [("trackA".to_owned(), 1)].into_iter().collect(),
                check: CheckType::AllAtLeast,
            },
        )
        .unwrap()))
    }

    fn status() -> AchievementsStatus {
        let mut status = AchievementsStatus::new();
        status.add(single(1, 5, false));
        status.add(map(2));
        status.add(single(3, 4, true));
        status
    }

    #[test]
    fn add_indexes_by_id() {
        let status = status();
        assert_eq!(status.len(), 3);
        assert!(!status.is_empty());
        assert!(status.get(AchievementId(2)).is_some());
        assert!(status.get(AchievementId(4)).is_none());
        let ids: Vec<u32> = status.iter().map(|a| a.id().0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "already present")]
    fn add_duplicate_panics() {
        let mut status = AchievementsStatus::new();
        status.add(single(1, 5, false));
        status.add(single(1, 2, false));
    }

    #[test]
    fn load_overlays_known_and_ignores_unknown() {
        let mut status = status();
        let saved = SavedAchievements::new(vec![
            SavedAchievement {
                id: AchievementId(1),
                achieved: false,
                progress: SavedProgress::Single { value: 3 },
            },
            SavedAchievement {
                id: AchievementId(99),
                achieved: true,
                progress: SavedProgress::Single { value: 1 },
            },
        ]);
        let report = status.load(&saved);
        assert_eq!(
            report,
            LoadReport {
                restored: 1,
                ignored: 1,
                rejected: 0
            }
        );
        assert_eq!(status.len(), 3);
        assert_eq!(
            status.get(AchievementId(1)).unwrap().progress(),
            &Progress::Single(3)
        );
        assert!(status.get(AchievementId(2)).unwrap().progress().is_zero());
        assert!(status.get(AchievementId(99)).is_none());
    }

    #[test]
    fn load_counts_rejected_records() {
        let mut status = status();
        let saved = SavedAchievements::new(vec![SavedAchievement {
            id: AchievementId(2),
            achieved: true,
            progress: SavedProgress::Single { value: 1 },
        }]);
        let report = status.load(&saved);
        assert_eq!(report.rejected, 1);
        assert!(!status.get(AchievementId(2)).unwrap().is_achieved());
    }

    #[test]
    fn load_counts_unreadable_records_as_ignored() {
        let mut status = status();
        let saved: SavedAchievements = serde_json::from_str(
            r#"{ "achievements": [{ "id": 1, "value": 3 }, { "id": 99, "count": 4 }] }"#,
        )
        .unwrap();
        let report = status.load(&saved);
        assert_eq!(
            report,
            LoadReport {
                restored: 1,
                ignored: 1,
                rejected: 0
            }
        );
        assert_eq!(
            status.get(AchievementId(1)).unwrap().progress(),
            &Progress::Single(3)
        );
    }

    #[test]
    fn save_then_load_reproduces_progress() {
        let mut original = status();
        original.increase(AchievementId(1), "", 2).unwrap();
        original.increase(AchievementId(2), "trackA", 1).unwrap();
        let saved = original.save();
        assert_eq!(saved.achievements.len(), 3);

        let mut restored = status();
        restored.load(&saved);
        assert_eq!(restored.save(), saved);
        assert_eq!(restored.achieved_count(), 1);
    }

    #[test]
    fn on_race_end_fans_out() {
        let mut status = status();
        status.increase(AchievementId(1), "", 2).unwrap();
        status.increase(AchievementId(3), "", 2).unwrap();
        status.on_race_end();
        assert_eq!(
            status.get(AchievementId(1)).unwrap().progress(),
            &Progress::Single(2)
        );
        assert!(status.get(AchievementId(3)).unwrap().progress().is_zero());
    }

    #[test]
    fn increase_unknown_id_is_error() {
        let mut status = status();
        let err = status.increase(AchievementId(42), "", 1).unwrap_err();
        assert!(matches!(err, TrophyError::UnknownAchievement { id } if id == AchievementId(42)));
    }

    #[test]
    fn increase_reports_unlock() {
        let mut status = status();
        assert!(!status.increase(AchievementId(1), "", 4).unwrap());
        assert!(status.increase(AchievementId(1), "", 1).unwrap());
        assert_eq!(status.achieved_count(), 1);
    }
}
