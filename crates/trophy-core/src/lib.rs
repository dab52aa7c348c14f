//! Trophy Core -- Achievement definitions and per-player progress.
//!
//! This crate holds the leaf types of the achievement system:
//!
//! - [`AchievementInfo`](info::AchievementInfo): the immutable definition of
//!   one achievement, parsed from an asset node. Two variants exist: a single
//!   counter against one goal, and a keyed set of counters against per-key
//!   goals.
//! - [`Achievement`](achievement::Achievement): one player's progress toward
//!   one definition.
//! - [`AchievementsStatus`](status::AchievementsStatus): every achievement
//!   of a single player, indexed by [`AchievementId`](id::AchievementId).
//! - [`SavedAchievements`](saved::SavedAchievements): the persisted form of
//!   a status.
//!
//! The registry that owns every definition lives in the `trophy-manager`
//! crate.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use trophy_core::prelude::*;
//!
//! let node = serde_json::json!({
//!     "type": "single",
//!     "id": 1,
//!     "title": "Strike!",
//!     "description": "Hit 3 karts with a bowling ball.",
//!     "goal": 3
//! });
//! let info = Arc::new(AchievementInfo::from_node(&node).unwrap());
//!
//! let mut status = AchievementsStatus::new();
//! status.add(Achievement::new(info));
//!
//! status.increase(AchievementId(1), "", 2).unwrap();
//! assert!(!status.get(AchievementId(1)).unwrap().is_achieved());
//! assert!(status.increase(AchievementId(1), "", 1).unwrap());
//! ```

#![deny(unsafe_code)]

pub mod achievement;
pub mod id;
pub mod info;
pub mod saved;
pub mod status;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why an asset node could not be turned into an
/// [`AchievementInfo`](info::AchievementInfo).
///
/// Both cases are content-level: the caller logs them and skips the node.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// The node's `type` attribute is not one of the known variants.
    #[error("non-existent achievement type '{found}' (expected 'single' or 'map')")]
    UnknownType {
        /// The type string found on the node (empty if it was missing).
        found: String,
    },

    /// The node has a known type but its remaining fields are unusable.
    #[error("invalid '{kind}' achievement definition (id {id:?}): {details}")]
    InvalidFields {
        /// The variant the node declared.
        kind: &'static str,
        /// The node's ID, if it could be read.
        id: Option<u32>,
        /// What was wrong.
        details: String,
    },
}

/// Errors produced by progress operations on a player's achievements.
#[derive(Debug, thiserror::Error)]
pub enum TrophyError {
    /// No achievement with this ID exists in the status.
    #[error("achievement {id} does not exist in this status")]
    UnknownAchievement {
        /// The requested ID.
        id: id::AchievementId,
    },

    /// Saved progress does not fit the achievement's definition.
    #[error("saved progress for achievement {id} is {found} but the definition is {expected}")]
    ProgressMismatch {
        /// The achievement the record was meant for.
        id: id::AchievementId,
        /// The definition's variant.
        expected: info::AchievementKind,
        /// The variant of the saved payload.
        found: info::AchievementKind,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::achievement::{Achievement, Progress};
    pub use crate::id::AchievementId;
    pub use crate::info::{AchievementInfo, AchievementKind, CheckType, Goals};
    pub use crate::saved::{SavedAchievement, SavedAchievements, SavedProgress};
    pub use crate::status::{AchievementsStatus, LoadReport};
    pub use crate::{DefinitionError, TrophyError};
}
