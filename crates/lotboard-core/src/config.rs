//! Board configuration.
//!
//! [`BoardConfig`] is stored as TOML, by default in `~/.lotboard/config.toml`.
//! Every section is optional; missing values fall back to the defaults of the
//! GEA-4 planning board.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, BoardResult};
use crate::project::Likelihood;

/// Default key of the scenario blob in the key-value store.
pub const DEFAULT_SCENARIO_KEY: &str = "dashboardScenarios";

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Buckets, highlight and initial filters.
    pub board: BoardSettings,

    /// Scenario persistence.
    pub storage: StorageSettings,
}

/// One likelihood bucket and the heading of its column group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketConfig {
    pub name: String,
    pub label: String,
}

impl BucketConfig {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    /// Recognized buckets in rank order. Feed rows with any other likelihood
    /// are dropped.
    pub buckets: Vec<BucketConfig>,

    /// Company whose cards the highlight toggle marks.
    pub highlight_company: String,

    /// Initial grid filter, applied when the catalog contains it.
    pub default_grid: Option<String>,

    /// Initial subtype filter, applied when the catalog contains it.
    pub default_subtype: Option<String>,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            buckets: vec![
                BucketConfig::new(Likelihood::HIGH, "Potential GEA-4 Bidders"),
                BucketConfig::new(Likelihood::LOW, "Potential GEA-4 Non-bidders"),
            ],
            highlight_company: "AboitizPower".to_string(),
            default_grid: Some("Luzon".to_string()),
            default_subtype: Some("Ground mounted".to_string()),
        }
    }
}

impl BoardSettings {
    /// Bucket names in rank order.
    pub fn ranking(&self) -> Vec<Likelihood> {
        self.buckets.iter().map(|b| Likelihood::new(&b.name)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Key under which all scenarios are stored as one blob.
    pub scenario_key: String,

    /// File backing the key-value store for the command line tool.
    pub store_path: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            scenario_key: DEFAULT_SCENARIO_KEY.to_string(),
            store_path: None,
        }
    }
}

impl StorageSettings {
    /// Configured store file, or `~/.lotboard/scenarios.json`.
    pub fn resolved_store_path(&self) -> Option<PathBuf> {
        self.store_path
            .clone()
            .or_else(|| BoardConfig::config_dir().map(|d| d.join("scenarios.json")))
    }
}

impl BoardConfig {
    /// Get the default config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".lotboard"))
    }

    /// Get the default config file path.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load configuration from the default location.
    ///
    /// Returns default config if file doesn't exist.
    pub fn load() -> BoardResult<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> BoardResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> BoardResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> BoardResult<()> {
        if self.board.buckets.is_empty() {
            return Err(BoardError::Config("at least one bucket is required".into()));
        }
        let mut seen = HashSet::new();
        for bucket in &self.board.buckets {
            if bucket.name.trim().is_empty() {
                return Err(BoardError::Config("bucket name cannot be empty".into()));
            }
            if !seen.insert(bucket.name.as_str()) {
                return Err(BoardError::Config(format!(
                    "bucket '{}' is listed twice",
                    bucket.name
                )));
            }
        }
        if self.storage.scenario_key.is_empty() {
            return Err(BoardError::Config("scenario_key cannot be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();
        assert_eq!(config.board.ranking(), vec![Likelihood::high(), Likelihood::low()]);
        assert_eq!(config.board.highlight_company, "AboitizPower");
        assert_eq!(config.storage.scenario_key, "dashboardScenarios");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_parsing() {
        let toml = r#"
            [board]
            highlight_company = "Other Co"

            [storage]
            scenario_key = "plans"
        "#;

        let config: BoardConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.board.highlight_company, "Other Co");
        assert_eq!(config.storage.scenario_key, "plans");

        // Defaults for unset values
        assert_eq!(config.board.buckets.len(), 2);
        assert_eq!(config.board.default_grid.as_deref(), Some("Luzon"));
    }

    #[test]
    fn test_custom_buckets_and_labels() {
        let toml = r#"
            [board]
            buckets = [
                { name = "Medium", label = "Maybe" },
                { name = "High", label = "Bidders" },
            ]
        "#;
        let config: BoardConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.board.ranking()[0], Likelihood::new("Medium"));
        assert_eq!(config.board.buckets[1].label, "Bidders");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = BoardConfig::default();
        config.board.default_subtype = Some("Rooftop".to_string());
        config.storage.store_path = Some(dir.path().join("store.json"));
        config.save_to(&path).unwrap();

        let loaded = BoardConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.storage.resolved_store_path(),
            Some(dir.path().join("store.json"))
        );
    }

    #[test]
    fn test_validation_rejects_duplicate_buckets() {
        let mut config = BoardConfig::default();
        config.board.buckets.push(BucketConfig::new("High", "Again"));
        assert!(matches!(config.validate(), Err(BoardError::Config(_))));

        config.board.buckets.clear();
        assert!(config.validate().is_err());
    }
}
