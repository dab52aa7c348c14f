//! The achievement registry.
//!
//! [`AchievementsManager`] parses the achievement asset exactly once, when it
//! is constructed, and is read-only afterwards. It is the factory for
//! per-player [`AchievementsStatus`] values and the entry point for
//! gameplay events that concern the current player.
//!
//! # Parsing
//!
//! The asset is an object with an ordered `achievements` array. Each node is
//! turned into an [`AchievementInfo`] by its `type` attribute. Content
//! problems are logged and skipped so one broken entry does not take the
//! whole catalogue down:
//!
//! - unknown `type` or unusable fields: the node is skipped;
//! - duplicate ID: the later definition replaces the earlier one in place
//!   (last write wins) and the replaced definition is released.
//!
//! The duplicate summary compares registered entries with the definitions
//! actually constructed, not with the raw node count, so a node skipped for
//! an unknown type or bad fields is never reported as a duplicate ID.
//!
//! The outcome is summarised in a [`ParseReport`]. Structural problems
//! (unreadable file, invalid JSON, no `achievements` array) are returned as
//! [`ManagerError`]s instead.
//!
//! # Storage
//!
//! Definitions live in a contiguous `Vec<Arc<AchievementInfo>>` with an
//! ID-to-slot index. Iteration follows the order in which IDs first appear
//! in the asset. Statuses hold `Arc` handles to the definitions, so a status
//! never dangles even if it outlives the manager.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use trophy_core::achievement::Achievement;
use trophy_core::id::AchievementId;
use trophy_core::info::AchievementInfo;
use trophy_core::saved::SavedAchievements;
use trophy_core::status::AchievementsStatus;
use trophy_core::DefinitionError;

use crate::config::AchievementsConfig;
use crate::player::CurrentPlayer;
use crate::ManagerError;

// ---------------------------------------------------------------------------
// ParseReport
// ---------------------------------------------------------------------------

/// Summary of the asset parse that built an [`AchievementsManager`].
///
/// `nodes_processed - unknown_types.len() - invalid_nodes` definitions were
/// constructed; `registered` of them survived. The difference is the number
/// of duplicate IDs (last-write-wins replacements).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Number of asset nodes looked at.
    pub nodes_processed: usize,
    /// Number of definitions in the registry after parsing.
    pub registered: usize,
    /// The `type` values of nodes skipped for an unknown type.
    pub unknown_types: Vec<String>,
    /// Number of nodes skipped because their fields were unusable.
    pub invalid_nodes: usize,
    /// IDs that appeared more than once, once per replacement.
    pub duplicate_ids: Vec<AchievementId>,
}

impl ParseReport {
    /// Number of nodes that produced a definition.
    pub fn constructed(&self) -> usize {
        self.nodes_processed - self.unknown_types.len() - self.invalid_nodes
    }

    /// Whether any definition replaced an earlier one with the same ID.
    pub fn has_duplicates(&self) -> bool {
        self.registered < self.constructed()
    }
}

// ---------------------------------------------------------------------------
// AchievementsManager
// ---------------------------------------------------------------------------

/// Owns every achievement definition for the lifetime of the process.
#[derive(Debug)]
pub struct AchievementsManager {
    /// Definitions, in first-appearance order.
    infos: Vec<Arc<AchievementInfo>>,
    /// ID -> slot in `infos`.
    index: HashMap<AchievementId, usize>,
    parse_report: ParseReport,
}

impl AchievementsManager {
    /// Read and parse the asset named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::AssetRead`] if the file cannot be read, and
    /// the errors of [`from_json_str`](Self::from_json_str) otherwise.
    pub fn load(config: &AchievementsConfig) -> Result<Self, ManagerError> {
        let path = config.asset_path();
        let text = std::fs::read_to_string(path).map_err(|source| ManagerError::AssetRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "parsing achievement asset");
        Self::from_json_str(&text)
    }

    /// Parse an asset held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::AssetParse`] for invalid JSON and
    /// [`ManagerError::MalformedAsset`] if the root has no `achievements`
    /// array.
    pub fn from_json_str(text: &str) -> Result<Self, ManagerError> {
        let root: Value = serde_json::from_str(text)?;
        let nodes = root
            .get("achievements")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ManagerError::MalformedAsset(
                    "expected an object with an 'achievements' array".to_owned(),
                )
            })?;
        Ok(Self::from_nodes(nodes))
    }

    /// Build the registry from already-parsed asset nodes.
    pub fn from_nodes(nodes: &[Value]) -> Self {
        let mut manager = Self {
            infos: Vec::with_capacity(nodes.len()),
            index: HashMap::with_capacity(nodes.len()),
            parse_report: ParseReport::default(),
        };
        manager.parse_nodes(nodes);
        manager
    }

    fn parse_nodes(&mut self, nodes: &[Value]) {
        let mut report = ParseReport {
            nodes_processed: nodes.len(),
            ..ParseReport::default()
        };

        for node in nodes {
            match AchievementInfo::from_node(node) {
                Ok(info) => {
                    if let Some(id) = self.register(info) {
                        tracing::warn!(id = %id, "achievement id defined again, replacing earlier definition");
                        report.duplicate_ids.push(id);
                    }
                }
                Err(DefinitionError::UnknownType { found }) => {
                    tracing::error!(
                        achievement_type = %found,
                        "non-existent achievement type -- skipping, definitely results in unwanted behaviour"
                    );
                    report.unknown_types.push(found);
                }
                Err(e) => {
                    tracing::error!(error = %e, "skipping achievement definition");
                    report.invalid_nodes += 1;
                }
            }
        }

        report.registered = self.infos.len();
        if report.has_duplicates() {
            tracing::error!(
                constructed = report.constructed(),
                registered = report.registered,
                "multiple achievements with the same id"
            );
        }
        tracing::debug!(
            nodes = report.nodes_processed,
            registered = report.registered,
            "achievement registry built"
        );
        self.parse_report = report;
    }

    /// Store `info`, replacing any definition with the same ID. Returns the
    /// ID if a definition was replaced.
    fn register(&mut self, info: AchievementInfo) -> Option<AchievementId> {
        let id = info.id();
        match self.index.get(&id) {
            Some(&slot) => {
                // The previous Arc is dropped here.
                self.infos[slot] = Arc::new(info);
                Some(id)
            }
            None => {
                self.index.insert(id, self.infos.len());
                self.infos.push(Arc::new(info));
                None
            }
        }
    }

    /// Look up a definition by ID.
    pub fn get_achievement_info(&self, id: AchievementId) -> Option<&AchievementInfo> {
        self.index.get(&id).map(|&slot| &*self.infos[slot])
    }

    /// Build a complete status for one player.
    ///
    /// Every registered definition gets a zero-progress [`Achievement`]
    /// first; `saved`, if given, is overlaid afterwards. Definitions without
    /// saved data keep their defaults and saved records for unknown IDs are
    /// ignored.
    pub fn create_achievements_status(
        &self,
        saved: Option<&SavedAchievements>,
    ) -> AchievementsStatus {
        let mut status = AchievementsStatus::new();
        for info in &self.infos {
            status.add(Achievement::new(Arc::clone(info)));
        }

        if let Some(saved) = saved {
            let report = status.load(saved);
            tracing::debug!(
                restored = report.restored,
                ignored = report.ignored,
                rejected = report.rejected,
                "restored saved achievement progress"
            );
        }
        status
    }

    /// Race-end hook: forward to the current player's status.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoCurrentPlayer`] if `session` has no active
    /// player.
    pub fn on_race_end<P>(&self, session: &mut P) -> Result<(), ManagerError>
    where
        P: CurrentPlayer + ?Sized,
    {
        let status = session
            .current_achievements_mut()
            .ok_or(ManagerError::NoCurrentPlayer)?;
        status.on_race_end();
        Ok(())
    }

    /// Outcome of the asset parse.
    pub fn parse_report(&self) -> &ParseReport {
        &self.parse_report
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Whether no definition was registered.
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Iterate definitions in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &AchievementInfo> {
        self.infos.iter().map(|info| &**info)
    }

    /// Registered IDs in registry order.
    pub fn ids(&self) -> impl Iterator<Item = AchievementId> + '_ {
        self.infos.iter().map(|info| info.id())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
