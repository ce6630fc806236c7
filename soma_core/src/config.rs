//! Configuration file support for Soma.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/soma/config.toml`.

use crate::catalog::{get_default_catalog, Catalog, ExerciseCatalog, JsonCatalog};
use crate::{Error, Exercise, Result, WorkoutGoal};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub user: UserConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub routine: RoutineConfig,
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

impl DataConfig {
    pub fn state_path(&self) -> PathBuf {
        state_path(&self.data_dir)
    }

    pub fn routine_log_path(&self) -> PathBuf {
        routine_log_path(&self.data_dir)
    }
}

/// Physical state log inside a data directory
pub fn state_path(data_dir: &Path) -> PathBuf {
    data_dir.join("state").join("physical_state.jsonl")
}

/// Generated routine log inside a data directory
pub fn routine_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("routines").join("routines.jsonl")
}

/// Local user identity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_id")]
    pub id: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: default_user_id(),
        }
    }
}

/// Exercise catalog source
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// JSON catalog file; the built-in catalog is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    /// The catalog accessor this configuration selects
    pub fn source(&self) -> CatalogSource {
        match &self.path {
            Some(path) => CatalogSource::File(JsonCatalog::new(path)),
            None => CatalogSource::BuiltIn(get_default_catalog()),
        }
    }
}

/// Either the built-in catalog or a JSON file
#[derive(Clone, Debug)]
pub enum CatalogSource {
    BuiltIn(&'static Catalog),
    File(JsonCatalog),
}

impl ExerciseCatalog for CatalogSource {
    fn exercises(&self) -> Result<Vec<Exercise>> {
        match self {
            CatalogSource::BuiltIn(catalog) => catalog.exercises(),
            CatalogSource::File(catalog) => catalog.exercises(),
        }
    }
}

/// Defaults for routine requests
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoutineConfig {
    #[serde(default = "default_duration")]
    pub default_duration: u32,

    #[serde(default = "default_goals")]
    pub default_goals: Vec<WorkoutGoal>,
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            default_duration: default_duration(),
            default_goals: default_goals(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("soma")
}

fn home_dir() -> PathBuf {
    dirs::home_dir()
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_user_id() -> String {
    "local".into()
}

fn default_duration() -> u32 {
    30
}

fn default_goals() -> Vec<WorkoutGoal> {
    vec![WorkoutGoal::Strength, WorkoutGoal::Mobility]
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values no routine request could satisfy
    pub fn validate(&self) -> Result<()> {
        if self.user.id.trim().is_empty() {
            return Err(Error::Config("user.id must not be empty".into()));
        }
        let duration = self.routine.default_duration;
        if !(crate::validate::MIN_DURATION_MINUTES..=crate::validate::MAX_DURATION_MINUTES)
            .contains(&duration)
        {
            return Err(Error::Config(format!(
                "routine.default_duration {} is outside {}..={} minutes",
                duration,
                crate::validate::MIN_DURATION_MINUTES,
                crate::validate::MAX_DURATION_MINUTES
            )));
        }
        if self.routine.default_goals.is_empty() {
            return Err(Error::Config("routine.default_goals must not be empty".into()));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("soma").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
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
