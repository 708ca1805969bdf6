//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configurations from YAML files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::calculation::XpAction;
use crate::error::{EngineError, EngineResult};

use super::types::{CarryoverConfig, CarryoverFile, EngineConfig, EngineMetadata, XpRewardsFile};

/// Loads and provides access to engine configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory and
/// validates them up front, so a bad cutoff date fails at startup rather
/// than on the first vacation request.
///
/// # Directory Structure
///
/// ```text
/// config/browo/
/// ├── engine.yaml       # Deployment metadata (required)
/// ├── carryover.yaml    # Vacation carryover cutoff (optional)
/// └── xp_rewards.yaml   # XP overrides per action (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use browo_engine::config::ConfigLoader;
/// use browo_engine::calculation::XpAction;
///
/// let loader = ConfigLoader::load("./config/browo").unwrap();
/// println!("Loaded: {}", loader.metadata().name);
/// println!("Quiz XP: {}", loader.xp_reward(XpAction::QuizPassed));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing
    /// - Any file contains invalid YAML or an unknown XP action
    /// - The carryover cutoff is not a valid date
    ///
    /// # Example
    ///
    /// ```no_run
    /// use browo_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/browo")?;
    /// # Ok::<(), browo_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<EngineMetadata>(&path.join("engine.yaml"))?;

        let carryover_file =
            Self::load_optional_yaml::<CarryoverFile>(&path.join("carryover.yaml"))?;
        let carryover = CarryoverConfig::try_from(carryover_file)?;

        let rewards_file =
            Self::load_optional_yaml::<XpRewardsFile>(&path.join("xp_rewards.yaml"))?;

        debug!(
            path = %path.display(),
            carryover_enabled = carryover.enabled(),
            reward_overrides = rewards_file.rewards.len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(metadata, carryover, rewards_file.rewards),
        })
    }

    /// Creates a loader from already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Creates a loader with default settings and no reward overrides.
    pub fn with_defaults() -> Self {
        Self::from_config(EngineConfig::new(
            EngineMetadata {
                name: "Browo Koordinator".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: String::new(),
            },
            CarryoverConfig::default(),
            BTreeMap::new(),
        ))
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads a YAML file, falling back to `T::default()` when it is absent.
    fn load_optional_yaml<T: serde::de::DeserializeOwned + Default>(
        path: &Path,
    ) -> EngineResult<T> {
        if !path.exists() {
            debug!(path = %path.display(), "Optional configuration file missing, using defaults");
            return Ok(T::default());
        }
        Self::load_yaml(path)
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the deployment metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        self.config.metadata()
    }

    /// Returns the validated carryover settings.
    pub fn carryover(&self) -> &CarryoverConfig {
        self.config.carryover()
    }

    /// Returns the XP granted for an action.
    pub fn xp_reward(&self, action: XpAction) -> u64 {
        self.config.xp_reward(action)
    }

    /// Returns the XP granted for an action given by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RewardNotFound`] for unknown action names.
    pub fn xp_reward_for(&self, action: &str) -> EngineResult<u64> {
        let action: XpAction = action.parse()?;
        Ok(self.xp_reward(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_path() -> &'static str {
        "./config/browo"
    }

    /// Creates an empty scratch directory unique to the calling test.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "browo-engine-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().name, "Browo Koordinator");
        assert_eq!(loader.metadata().version, "2025.1");
    }

    #[test]
    fn test_carryover_loaded_from_file() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert!(loader.carryover().enabled());
        assert_eq!(loader.carryover().cutoff_month(), 3);
        assert_eq!(loader.carryover().cutoff_day(), 31);
    }

    #[test]
    fn test_xp_reward_override_from_file() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(loader.xp_reward(XpAction::QuizPassed), 50);
        assert_eq!(loader.xp_reward(XpAction::VideoWatched), 10);
    }

    #[test]
    fn test_xp_reward_for_unknown_action_returns_error() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        match loader.xp_reward_for("unknown") {
            Err(EngineError::RewardNotFound { action }) => assert_eq!(action, "unknown"),
            _ => panic!("Expected RewardNotFound error"),
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_optional_files_fall_back_to_defaults() {
        let dir = scratch_dir("defaults");
        fs::write(dir.join("engine.yaml"), "name: Minimal\nversion: \"1\"\n").unwrap();

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.carryover(), &CarryoverConfig::default());
        assert_eq!(loader.xp_reward(XpAction::QuizPassed), 15);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_invalid_cutoff_fails_at_load_time() {
        let dir = scratch_dir("invalid-cutoff");
        fs::write(dir.join("engine.yaml"), "name: Broken\nversion: \"1\"\n").unwrap();
        fs::write(
            dir.join("carryover.yaml"),
            "enabled: true\ncutoff_month: 4\ncutoff_day: 31\n",
        )
        .unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::InvalidConfig { field, .. }) => assert_eq!(field, "cutoff_day"),
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let dir = scratch_dir("malformed");
        fs::write(dir.join("engine.yaml"), "name: [unclosed\n").unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("engine.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_with_defaults() {
        let loader = ConfigLoader::with_defaults();
        assert_eq!(loader.carryover(), &CarryoverConfig::default());
        assert_eq!(loader.xp_reward(XpAction::MonthStreak), 100);
    }
}
