//! Persisted player progress.
//!
//! [`SavedAchievements`] is the serializable form of an
//! [`AchievementsStatus`](crate::status::AchievementsStatus). It is what the
//! player profile stores on disk and hands back when the profile is loaded:
//!
//! ```json
//! { "achievements": [
//!     { "id": 1, "achieved": false, "value": 3 },
//!     { "id": 2, "achieved": true,  "values": { "farm": 1, "lighthouse": 1 } }
//! ] }
//! ```
//!
//! Records are matched to definitions by ID only; a record for an ID the
//! current registry does not know is ignored on load. Records are decoded
//! one at a time, so a record this release cannot read (a payload shape it
//! does not know, an out-of-range ID) is skipped with a warning instead of
//! failing the whole document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::AchievementId;
use crate::info::AchievementKind;

/// All persisted achievement records of one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSavedAchievements")]
pub struct SavedAchievements {
    /// One record per achievement, in ascending ID order when produced by
    /// [`AchievementsStatus::save`](crate::status::AchievementsStatus::save).
    pub achievements: Vec<SavedAchievement>,
    #[serde(skip)]
    skipped: usize,
}

impl SavedAchievements {
    /// Wrap already-decoded records.
    pub fn new(achievements: Vec<SavedAchievement>) -> Self {
        Self {
            achievements,
            skipped: 0,
        }
    }

    /// Find the record for `id`, if any.
    pub fn get(&self, id: AchievementId) -> Option<&SavedAchievement> {
        self.achievements.iter().find(|record| record.id == id)
    }

    /// Number of records dropped while decoding because they could not be
    /// read at all.
    pub fn skipped_records(&self) -> usize {
        self.skipped
    }
}

#[derive(Deserialize)]
struct RawSavedAchievements {
    #[serde(default)]
    achievements: Vec<serde_json::Value>,
}

impl From<RawSavedAchievements> for SavedAchievements {
    fn from(raw: RawSavedAchievements) -> Self {
        let mut saved = SavedAchievements::default();
        for record in raw.achievements {
            match serde_json::from_value::<SavedAchievement>(record) {
                Ok(record) => saved.achievements.push(record),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable saved achievement record");
                    saved.skipped += 1;
                }
            }
        }
        saved
    }
}

/// The persisted progress of one achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAchievement {
    /// Which definition this record belongs to.
    pub id: AchievementId,
    /// Whether the achievement had been unlocked.
    #[serde(default)]
    pub achieved: bool,
    /// Counter values.
    #[serde(flatten)]
    pub progress: SavedProgress,
}

/// Variant-specific counter payload of a [`SavedAchievement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SavedProgress {
    /// Counter of a single achievement.
    Single {
        /// Counter value.
        value: u32,
    },
    /// Per-key counters of a map achievement.
    Map {
        /// Counter value per key.
        values: BTreeMap<String, u32>,
    },
}

impl SavedProgress {
    /// The variant this payload belongs to.
    pub fn kind(&self) -> AchievementKind {
        match self {
            SavedProgress::Single { .. } => AchievementKind::Single,
            SavedProgress::Map { .. } => AchievementKind::Map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_payload_shapes() {
        let json = r#"{ "achievements": [
            { "id": 1, "achieved": false, "value": 3 },
            { "id": 2, "achieved": true, "values": { "farm": 1 } }
        ] }"#;
        let saved: SavedAchievements = serde_json::from_str(json).unwrap();
        assert_eq!(saved.achievements.len(), 2);

        let first = saved.get(AchievementId(1)).unwrap();
        assert_eq!(first.progress, SavedProgress::Single { value: 3 });
        assert_eq!(first.progress.kind(), AchievementKind::Single);

        let second = saved.get(AchievementId(2)).unwrap();
        assert!(second.achieved);
        assert_eq!(second.progress.kind(), AchievementKind::Map);

        assert!(saved.get(AchievementId(3)).is_none());
    }

    #[test]
    fn achieved_defaults_to_false() {
        let record: SavedAchievement = serde_json::from_str(r#"{ "id": 5, "value": 0 }"#).unwrap();
        assert!(!record.achieved);
    }

    #[test]
    fn serialized_form_is_flat() {
        let record = SavedAchievement {
            id: AchievementId(1),
            achieved: false,
            progress: SavedProgress::Single { value: 3 },
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "id": 1, "achieved": false, "value": 3 })
        );
    }

    #[test]
    fn empty_document_has_no_records() {
        let saved: SavedAchievements = serde_json::from_str("{}").unwrap();
        assert!(saved.achievements.is_empty());
    }

    #[test]
    fn unreadable_record_is_skipped_not_fatal() {
        let json = r#"{ "achievements": [
            { "id": 1, "value": 3 },
            { "id": 99, "achieved": true, "count": 4 },
            { "id": 4294967296, "value": 1 },
            { "id": 2, "values": { "farm": 1 } }
        ] }"#;
        let saved: SavedAchievements = serde_json::from_str(json).unwrap();
        assert_eq!(saved.achievements.len(), 2);
        assert_eq!(saved.skipped_records(), 2);
        assert_eq!(
            saved.get(AchievementId(1)).unwrap().progress,
            SavedProgress::Single { value: 3 }
        );
        assert!(saved.get(AchievementId(99)).is_none());
    }

    #[test]
    fn skipped_count_is_not_persisted() {
        let json = r#"{ "achievements": [{ "id": 1, "value": 3 }, { "id": 2 }] }"#;
        let saved: SavedAchievements = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "achievements": [{ "id": 1, "achieved": false, "value": 3 }] })
        );
    }
}
