//! Trophy Manager -- Achievement registry, status factory and event routing.
//!
//! This crate builds on [`trophy_core`] to provide the process-wide side of
//! the achievement system:
//!
//! - [`AchievementsManager`](manager::AchievementsManager): parses the
//!   achievement asset once, owns every
//!   [`AchievementInfo`](trophy_core::info::AchievementInfo), creates a
//!   complete [`AchievementsStatus`](trophy_core::status::AchievementsStatus)
//!   for each player profile, and routes race-end events to the current
//!   player.
//! - [`AchievementsConfig`](config::AchievementsConfig): where the asset
//!   lives.
//! - [`PlayerManager`](player::PlayerManager): player profiles and the
//!   "current player" the manager dispatches to.
//!
//! The manager is an ordinary value: construct it once at startup and pass
//! references to whatever needs lookups. It is never mutated after
//! construction.
//!
//! # Quick Start
//!
//! ```
//! use trophy_manager::prelude::*;
//!
//! let asset = r#"{ "achievements": [
//!     { "type": "single", "id": 1, "title": "Strike!", "goal": 5 },
//!     { "type": "map", "id": 2, "title": "Explorer", "goals": { "trackA": 1 } }
//! ] }"#;
//! let manager = AchievementsManager::from_json_str(asset).unwrap();
//! assert_eq!(manager.len(), 2);
//!
//! let mut players = PlayerManager::new();
//! players.add_player("alice", &manager);
//! players.set_current_player("alice").unwrap();
//!
//! manager.on_race_end(&mut players).unwrap();
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod manager;
pub mod player;

use std::path::PathBuf;

/// Re-export the core crate for convenience.
pub use trophy_core;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by the manager and the player session.
///
/// Asset errors are structural and fatal to startup: without a catalogue no
/// player status can exist. Content-level problems inside the asset (bad
/// type, duplicate ID) are logged and skipped instead.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The asset file could not be read.
    #[error("failed to read achievement asset '{}': {source}", path.display())]
    AssetRead {
        /// The resolved asset path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The asset is not valid JSON.
    #[error("achievement asset is not valid JSON: {0}")]
    AssetParse(#[from] serde_json::Error),

    /// The asset is JSON but does not have the expected layout.
    #[error("malformed achievement asset: {0}")]
    MalformedAsset(String),

    /// A players document could not be written or read.
    #[error("invalid players document: {0}")]
    PlayersDocument(#[source] serde_json::Error),

    /// A race-end event arrived while no player was active.
    #[error("no current player to dispatch the race-end event to")]
    NoCurrentPlayer,

    /// A player name was not found in the session.
    #[error("player '{name}' does not exist")]
    UnknownPlayer {
        /// The requested name.
        name: String,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use trophy_core::prelude::*;

    pub use crate::config::AchievementsConfig;
    pub use crate::manager::{AchievementsManager, ParseReport};
    pub use crate::player::{
        CurrentPlayer, PlayerManager, PlayerProfile, SavedPlayers, SavedProfile,
    };
    pub use crate::ManagerError;
}
