//! Immutable achievement definitions.
//!
//! An [`AchievementInfo`] is built once from an asset node and never changes
//! afterwards. The asset node is a JSON object whose `type` attribute selects
//! the variant:
//!
//! ```json
//! { "type": "single", "id": 1, "title": "Strike!",
//!   "description": "Hit 10 karts with a bowling ball.", "goal": 10 }
//!
//! { "type": "map", "id": 2, "title": "Explorer",
//!   "description": "Finish every track once.",
//!   "goals": { "farm": 1, "lighthouse": 1 }, "check-type": "all-at-least" }
//! ```
//!
//! Both variants also accept `reset-after-race` (counters are cleared at the
//! end of every race unless the achievement was already unlocked) and
//! `secret` (hidden from listings until unlocked).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::AchievementId;
use crate::DefinitionError;

// ---------------------------------------------------------------------------
// AchievementKind
// ---------------------------------------------------------------------------

/// The variant tag of a definition (and of the progress built from it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementKind {
    /// One counter against one goal.
    Single,
    /// A keyed set of counters, each against its own goal.
    Map,
}

impl AchievementKind {
    /// The `type` attribute value used in asset files.
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementKind::Single => "single",
            AchievementKind::Map => "map",
        }
    }
}

impl fmt::Display for AchievementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckType
// ---------------------------------------------------------------------------

/// How a map achievement decides it is complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckType {
    /// Every key must reach its goal.
    #[default]
    AllAtLeast,
    /// One key reaching its goal is enough.
    OneAtLeast,
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

/// Variant-specific goal data of a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Goals {
    /// A single counter must reach `goal`.
    Single {
        /// Target value. Always positive.
        goal: u32,
    },
    /// Each key's counter is measured against its own goal.
    Map {
        /// Per-key target values. Never empty, every value positive.
        goals: BTreeMap<String, u32>,
        /// Completion policy.
        check: CheckType,
    },
}

impl Goals {
    /// The variant tag for these goals.
    pub fn kind(&self) -> AchievementKind {
        match self {
            Goals::Single { .. } => AchievementKind::Single,
            Goals::Map { .. } => AchievementKind::Map,
        }
    }

    fn check(&self) -> Result<(), String> {
        match self {
            Goals::Single { goal: 0 } => Err("goal must be positive".to_owned()),
            Goals::Single { .. } => Ok(()),
            Goals::Map { goals, .. } if goals.is_empty() => {
                Err("goals must not be empty".to_owned())
            }
            Goals::Map { goals, .. } => match goals.iter().find(|(_, &goal)| goal == 0) {
                Some((key, _)) => Err(format!("goal for key '{key}' must be positive")),
                None => Ok(()),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Asset node layouts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SingleNode {
    id: u32,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    goal: u32,
    #[serde(default)]
    reset_after_race: bool,
    #[serde(default)]
    secret: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct MapNode {
    id: u32,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    goals: BTreeMap<String, u32>,
    #[serde(default)]
    check_type: CheckType,
    #[serde(default)]
    reset_after_race: bool,
    #[serde(default)]
    secret: bool,
}

// ---------------------------------------------------------------------------
// AchievementInfo
// ---------------------------------------------------------------------------

/// The immutable definition of one achievement.
///
/// Definitions are owned by the registry and shared read-only (behind an
/// `Arc`) with every per-player [`Achievement`](crate::achievement::Achievement)
/// built from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementInfo {
    id: AchievementId,
    title: String,
    description: String,
    goals: Goals,
    reset_after_race: bool,
    secret: bool,
}

impl AchievementInfo {
    /// Create a definition directly.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidFields`] if a goal is zero or map
    /// goals are empty.
    pub fn new(
        id: AchievementId,
        title: impl Into<String>,
        description: impl Into<String>,
        goals: Goals,
    ) -> Result<Self, DefinitionError> {
        goals
            .check()
            .map_err(|details| DefinitionError::InvalidFields {
                kind: goals.kind().as_str(),
                id: Some(id.0),
                details,
            })?;
        Ok(Self {
            id,
            title: title.into(),
            description: description.into(),
            goals,
            reset_after_race: false,
            secret: false,
        })
    }

    /// Clear this achievement's counters at every race end.
    pub fn with_reset_after_race(mut self, reset: bool) -> Self {
        self.reset_after_race = reset;
        self
    }

    /// Hide this achievement from listings until it is unlocked.
    pub fn with_secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    /// Build a definition from one asset node.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnknownType`] if `type` is missing or not
    /// `"single"`/`"map"`, and [`DefinitionError::InvalidFields`] if the
    /// remaining fields do not describe a usable definition.
    pub fn from_node(node: &serde_json::Value) -> Result<Self, DefinitionError> {
        match node.get("type").and_then(serde_json::Value::as_str) {
            Some("single") => Self::from_single_node(node),
            Some("map") => Self::from_map_node(node),
            other => Err(DefinitionError::UnknownType {
                found: other.unwrap_or_default().to_owned(),
            }),
        }
    }

    fn from_single_node(node: &serde_json::Value) -> Result<Self, DefinitionError> {
        let fields = SingleNode::deserialize(node)
            .map_err(|e| invalid(AchievementKind::Single, node, e.to_string()))?;
        let info = Self::new(
            AchievementId(fields.id),
            fields.title,
            fields.description,
            Goals::Single { goal: fields.goal },
        )?;
        Ok(info
            .with_reset_after_race(fields.reset_after_race)
            .with_secret(fields.secret))
    }

    fn from_map_node(node: &serde_json::Value) -> Result<Self, DefinitionError> {
        let fields = MapNode::deserialize(node)
            .map_err(|e| invalid(AchievementKind::Map, node, e.to_string()))?;
        let goals = Goals::Map {
            goals: fields.goals,
            check: fields.check_type,
        };
        let info = Self::new(AchievementId(fields.id), fields.title, fields.description, goals)?;
        Ok(info
            .with_reset_after_race(fields.reset_after_race)
            .with_secret(fields.secret))
    }

    /// Unique ID of this achievement.
    pub fn id(&self) -> AchievementId {
        self.id
    }

    /// Display title (untranslated).
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Display description (untranslated).
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Which variant this definition is.
    pub fn kind(&self) -> AchievementKind {
        self.goals.kind()
    }

    /// Goal data.
    pub fn goals(&self) -> &Goals {
        &self.goals
    }

    /// Whether progress is cleared at the end of each race.
    pub fn reset_after_race(&self) -> bool {
        self.reset_after_race
    }

    /// Whether the achievement is hidden until unlocked.
    pub fn is_secret(&self) -> bool {
        self.secret
    }

    /// Sum of all goal values.
    pub fn goal_total(&self) -> u64 {
        match &self.goals {
            Goals::Single { goal } => u64::from(*goal),
            Goals::Map { goals, .. } => goals.values().map(|&g| u64::from(g)).sum(),
        }
    }
}

fn invalid(kind: AchievementKind, node: &serde_json::Value, details: String) -> DefinitionError {
    DefinitionError::InvalidFields {
        kind: kind.as_str(),
        id: node
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .and_then(|raw| u32::try_from(raw).ok()),
        details,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
