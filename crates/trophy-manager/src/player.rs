//! Player profiles and the current-player session.
//!
//! The registry never decides who the current player is. It asks a
//! [`CurrentPlayer`] implementation, which [`PlayerManager`] provides for
//! the common case of a local list of profiles with one active at a time.

use serde::{Deserialize, Serialize};
use trophy_core::saved::SavedAchievements;
use trophy_core::status::AchievementsStatus;

use crate::manager::AchievementsManager;
use crate::ManagerError;

// ---------------------------------------------------------------------------
// CurrentPlayer
// ---------------------------------------------------------------------------

/// Access to the active player's achievements.
pub trait CurrentPlayer {
    /// The current player's status, or `None` if no player is active.
    fn current_achievements_mut(&mut self) -> Option<&mut AchievementsStatus>;
}

// ---------------------------------------------------------------------------
// PlayerProfile
// ---------------------------------------------------------------------------

/// Persisted form of a [`PlayerProfile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProfile {
    pub name: String,
    #[serde(default)]
    pub achievements: Option<SavedAchievements>,
}

/// One player and their achievement progress.
#[derive(Debug, Clone)]
pub struct PlayerProfile {
    name: String,
    achievements: AchievementsStatus,
}

impl PlayerProfile {
    /// A new player with zero progress on every registered achievement.
    pub fn new(name: impl Into<String>, manager: &AchievementsManager) -> Self {
        Self {
            name: name.into(),
            achievements: manager.create_achievements_status(None),
        }
    }

    /// Restore a player from its saved form.
    pub fn from_saved(saved: &SavedProfile, manager: &AchievementsManager) -> Self {
        Self {
            name: saved.name.clone(),
            achievements: manager.create_achievements_status(saved.achievements.as_ref()),
        }
    }

    /// Persisted form, with every achievement record included.
    pub fn save(&self) -> SavedProfile {
        SavedProfile {
            name: self.name.clone(),
            achievements: Some(self.achievements.save()),
        }
    }

    /// Unique name of this player.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This player's achievement progress.
    pub fn achievements(&self) -> &AchievementsStatus {
        &self.achievements
    }

    pub fn achievements_mut(&mut self) -> &mut AchievementsStatus {
        &mut self.achievements
    }
}

// ---------------------------------------------------------------------------
// PlayerManager
// ---------------------------------------------------------------------------

/// Persisted form of a [`PlayerManager`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPlayers {
    #[serde(default)]
    pub players: Vec<SavedProfile>,
    /// Name of the player that was active when saved.
    #[serde(default)]
    pub current: Option<String>,
}

/// All local players, with at most one of them current.
#[derive(Debug, Clone, Default)]
pub struct PlayerManager {
    players: Vec<PlayerProfile>,
    current: Option<usize>,
}

impl PlayerManager {
    /// An empty session with no players.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new player with zero progress. If a player with this name
    /// already exists it is returned unchanged.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        manager: &AchievementsManager,
    ) -> &mut PlayerProfile {
        let name = name.into();
        let slot = match self.position(&name) {
            Some(slot) => slot,
            None => {
                self.players.push(PlayerProfile::new(name, manager));
                self.players.len() - 1
            }
        };
        &mut self.players[slot]
    }

    /// Make `name` the current player.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownPlayer`] if no player has that name.
    pub fn set_current_player(&mut self, name: &str) -> Result<(), ManagerError> {
        let slot = self.position(name).ok_or_else(|| ManagerError::UnknownPlayer {
            name: name.to_owned(),
        })?;
        self.current = Some(slot);
        Ok(())
    }

    /// Deactivate the current player, if any.
    pub fn clear_current_player(&mut self) {
        self.current = None;
    }

    /// The active player, if any.
    pub fn current_player(&self) -> Option<&PlayerProfile> {
        self.current.map(|slot| &self.players[slot])
    }

    pub fn current_player_mut(&mut self) -> Option<&mut PlayerProfile> {
        self.current.map(|slot| &mut self.players[slot])
    }

    /// Look up a player by name.
    pub fn player(&self, name: &str) -> Option<&PlayerProfile> {
        self.position(name).map(|slot| &self.players[slot])
    }

    /// All players, in the order they were added.
    pub fn players(&self) -> &[PlayerProfile] {
        &self.players
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    /// Persisted form of every profile and the current player's name.
    pub fn save(&self) -> SavedPlayers {
        SavedPlayers {
            players: self.players.iter().map(PlayerProfile::save).collect(),
            current: self.current_player().map(|p| p.name.clone()),
        }
    }

    /// Rebuild every profile against `manager`. Duplicate names keep the
    /// first profile; a current name that no longer exists leaves no player
    /// active.
    pub fn from_saved(saved: &SavedPlayers, manager: &AchievementsManager) -> Self {
        let mut players = Self::new();
        for profile in &saved.players {
            if players.position(&profile.name).is_some() {
                tracing::warn!(name = %profile.name, "duplicate player profile -- keeping the first");
                continue;
            }
            players
                .players
                .push(PlayerProfile::from_saved(profile, manager));
        }
        if let Some(name) = &saved.current {
            if players.set_current_player(name).is_err() {
                tracing::warn!(name = %name, "saved current player does not exist");
            }
        }
        players
    }

    /// Serialize [`save`](Self::save) as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::PlayersDocument`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ManagerError> {
        serde_json::to_string_pretty(&self.save()).map_err(ManagerError::PlayersDocument)
    }

    /// Parse a players document and rebuild it against `manager`.
    ///
    /// Individual achievement records that cannot be read are skipped; only
    /// a document that is not a players document at all is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::PlayersDocument`] if `text` is not a valid
    /// players document.
    pub fn from_json(text: &str, manager: &AchievementsManager) -> Result<Self, ManagerError> {
        let saved: SavedPlayers =
            serde_json::from_str(text).map_err(ManagerError::PlayersDocument)?;
        Ok(Self::from_saved(&saved, manager))
    }
}

impl CurrentPlayer for PlayerManager {
    fn current_achievements_mut(&mut self) -> Option<&mut AchievementsStatus> {
        self.current_player_mut().map(PlayerProfile::achievements_mut)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trophy_core::id::AchievementId;

    fn manager() -> AchievementsManager {
        AchievementsManager::from_nodes(&[
            json!({ "type": "single", "id": 1, "goal": 5, "reset-after-race": true }),
            json!({ "type": "single", "id": 2, "goal": 2 }),
        ])
    }

    #[test]
    fn new_profile_has_complete_status() {
        let manager = manager();
        let profile = PlayerProfile::new("alice", &manager);
        assert_eq!(profile.name(), "alice");
        assert_eq!(profile.achievements().len(), manager.len());
    }

    #[test]
    fn add_player_is_idempotent_by_name() {
        let manager = manager();
        let mut players = PlayerManager::new();
        players
            .add_player("alice", &manager)
            .achievements_mut()
            .increase(AchievementId(2), "", 1)
            .unwrap();
        players.add_player("alice", &manager);
        assert_eq!(players.players().len(), 1);
        assert_eq!(
            players
                .player("alice")
                .unwrap()
                .achievements()
                .get(AchievementId(2))
                .unwrap()
                .progress_string(),
            "1/2"
        );
    }

    #[test]
    fn set_current_player_unknown_name() {
        let mut players = PlayerManager::new();
        let err = players.set_current_player("bob").unwrap_err();
        assert!(matches!(err, ManagerError::UnknownPlayer { ref name } if name == "bob"));
        assert!(players.current_player().is_none());
    }

    #[test]
    fn current_achievements_follow_current_player() {
        let manager = manager();
        let mut players = PlayerManager::new();
        players.add_player("alice", &manager);
        players.add_player("bob", &manager);
        assert!(players.current_achievements_mut().is_none());

        players.set_current_player("bob").unwrap();
        players
            .current_achievements_mut()
            .unwrap()
            .increase(AchievementId(2), "", 1)
            .unwrap();
        assert_eq!(
            players
                .player("bob")
                .unwrap()
                .achievements()
                .get(AchievementId(2))
                .unwrap()
                .progress_string(),
            "1/2"
        );
        assert!(players
            .player("alice")
            .unwrap()
            .achievements()
            .get(AchievementId(2))
            .unwrap()
            .progress()
            .is_zero());

        players.clear_current_player();
        assert!(players.current_player().is_none());
    }

    #[test]
    fn json_roundtrip_keeps_progress_and_current() {
        let manager = manager();
        let mut players = PlayerManager::new();
        players
            .add_player("alice", &manager)
            .achievements_mut()
            .increase(AchievementId(1), "", 3)
            .unwrap();
        players.add_player("bob", &manager);
        players.set_current_player("alice").unwrap();

        let text = players.to_json().unwrap();
        let restored = PlayerManager::from_json(&text, &manager).unwrap();
        assert_eq!(restored.players().len(), 2);
        assert_eq!(restored.current_player().unwrap().name(), "alice");
        assert_eq!(restored.save(), players.save());
    }

    #[test]
    fn invalid_players_document_is_error() {
        let manager = manager();
        let err = PlayerManager::from_json("[1, 2", &manager).unwrap_err();
        assert!(matches!(err, ManagerError::PlayersDocument(_)), "got {err:?}");
    }

    #[test]
    fn from_saved_skips_duplicate_names_and_missing_current() {
        let manager = manager();
        let saved = SavedPlayers {
            players: vec![
                SavedProfile {
                    name: "alice".to_owned(),
                    achievements: None,
                },
                SavedProfile {
                    name: "alice".to_owned(),
                    achievements: None,
                },
            ],
            current: Some("carol".to_owned()),
        };
        let players = PlayerManager::from_saved(&saved, &manager);
        assert_eq!(players.players().len(), 1);
        assert!(players.current_player().is_none());
    }
}
