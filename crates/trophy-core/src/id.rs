//! Achievement identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique numeric ID of an achievement definition.
///
/// IDs come from the asset file and are stable across releases, so they are
/// what persisted player progress is keyed by.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementId(pub u32);

impl fmt::Debug for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AchievementId({})", self.0)
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for AchievementId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&AchievementId(42)).unwrap();
        assert_eq!(json, "42");
        let back: AchievementId = serde_json::from_str("42").unwrap();
        assert_eq!(back, AchievementId(42));
    }

    #[test]
    fn debug_and_display() {
        assert_eq!(format!("{:?}", AchievementId(7)), "AchievementId(7)");
        assert_eq!(AchievementId(7).to_string(), "7");
        assert_eq!(format!("{:>3}", AchievementId(7)), "  7");
    }
}
