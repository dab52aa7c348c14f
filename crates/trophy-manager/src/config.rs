//! Manager configuration.

use std::path::{Path, PathBuf};

/// Environment variable that overrides [`AchievementsConfig::asset_path`].
pub const ASSET_PATH_ENV: &str = "TROPHY_ASSET_PATH";

/// Where the [`AchievementsManager`](crate::manager::AchievementsManager)
/// reads its achievement definitions from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementsConfig {
    /// Path of the JSON asset with the `achievements` array.
    pub asset_path: PathBuf,
}

impl Default for AchievementsConfig {
    /// Defaults to `data/achievements.json`, relative to the working
    /// directory.
    fn default() -> Self {
        Self {
            asset_path: PathBuf::from("data").join("achievements.json"),
        }
    }
}

impl AchievementsConfig {
    /// Default configuration, with the asset path taken from
    /// `TROPHY_ASSET_PATH` when it is set and non-empty.
    pub fn from_env() -> Self {
        match std::env::var_os(ASSET_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::default().with_asset_path(path),
            _ => Self::default(),
        }
    }

    /// Replace the asset path.
    pub fn with_asset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.asset_path = path.into();
        self
    }

    /// The configured asset path, relative paths resolved against the
    /// working directory at load time.
    pub fn asset_path(&self) -> &Path {
        &self.asset_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_data_dir() {
        let config = AchievementsConfig::default();
        assert_eq!(config.asset_path(), Path::new("data/achievements.json"));
    }

    #[test]
    fn with_asset_path_overrides() {
        let config = AchievementsConfig::default().with_asset_path("/tmp/a.json");
        assert_eq!(config.asset_path(), Path::new("/tmp/a.json"));
    }
}
