//! Configuration file support for dietlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/dietlog/config.toml`.
//! The values here are only defaults: once a user saves a water goal,
//! glass size or goal weight, the stored value wins.

use crate::progress::DEFAULT_GOAL_KG;
use crate::types::WaterSettings;
use crate::water::{DEFAULT_GLASS_SIZE_ML, DEFAULT_GOAL_GLASSES, MIN_GLASS_SIZE_ML};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub water: WaterConfig,

    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub nutrition: NutritionConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Water tracker defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WaterConfig {
    #[serde(default = "default_goal_glasses")]
    pub default_goal_glasses: u32,

    #[serde(default = "default_glass_size_ml")]
    pub default_glass_size_ml: u32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            default_goal_glasses: default_goal_glasses(),
            default_glass_size_ml: default_glass_size_ml(),
        }
    }
}

impl WaterConfig {
    pub fn settings(&self) -> WaterSettings {
        WaterSettings {
            daily_goal_glasses: self.default_goal_glasses,
            glass_volume_ml: self.default_glass_size_ml,
        }
    }
}

/// Weight progress defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_goal_kg")]
    pub default_goal_kg: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            default_goal_kg: default_goal_kg(),
        }
    }
}

/// Calorie budget used when no user profile supplies one
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NutritionConfig {
    #[serde(default = "default_calorie_target")]
    pub daily_calorie_target: u32,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            daily_calorie_target: default_calorie_target(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("dietlog")
}

fn default_goal_glasses() -> u32 {
    DEFAULT_GOAL_GLASSES
}

fn default_glass_size_ml() -> u32 {
    DEFAULT_GLASS_SIZE_ML
}

fn default_goal_kg() -> f64 {
    DEFAULT_GOAL_KG
}

fn default_calorie_target() -> u32 {
    2000
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("dietlog").join("config.toml")
    }

    /// Reject defaults the ledgers would have to clamp
    pub fn validate(&self) -> Result<()> {
        if self.water.default_goal_glasses < 1 {
            return Err(Error::Config(
                "water.default_goal_glasses must be at least 1".into(),
            ));
        }
        if self.water.default_glass_size_ml < MIN_GLASS_SIZE_ML {
            return Err(Error::Config(format!(
                "water.default_glass_size_ml must be at least {}",
                MIN_GLASS_SIZE_ML
            )));
        }
        if !self.progress.default_goal_kg.is_finite() || self.progress.default_goal_kg <= 0.0 {
            return Err(Error::Config(
                "progress.default_goal_kg must be a positive number".into(),
            ));
        }
        if self.nutrition.daily_calorie_target < 1 {
            return Err(Error::Config(
                "nutrition.daily_calorie_target must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.water.default_goal_glasses, 8);
        assert_eq!(config.water.default_glass_size_ml, 250);
        assert_eq!(config.progress.default_goal_kg, 70.0);
        assert_eq!(config.nutrition.daily_calorie_target, 2000);
        assert!(config.data.data_dir.ends_with("dietlog"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[water]
default_glass_size_ml = 330
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.water.default_glass_size_ml, 330);
        assert_eq!(config.water.default_goal_glasses, 8); // default
        assert_eq!(config.water.settings().glass_volume_ml, 330);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("dietlog").join("config.toml");

        let mut config = Config::default();
        config.progress.default_goal_kg = 64.5;
        config.data.data_dir = temp_dir.path().join("data");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.progress.default_goal_kg, 64.5);
        assert_eq!(loaded.data.data_dir, temp_dir.path().join("data"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[water]\ndefault_glass_size_ml = 20\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let mut config = Config::default();
        config.progress.default_goal_kg = -2.0;
        assert!(config.validate().is_err());
    }
}
