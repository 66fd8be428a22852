//! Configuration primitives for the Imager profile service.
//!
//! Stored in a machine-readable TOML file located at
//! `<workspace root>/config/config.toml`. The workspace root is resolved from
//! `IMAGER_HOME` first and the OS data directory otherwise.
//!
//! The config carries the default attribute values applied to every
//! provisioned profile and the file names used by the stores.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{ProfileError, Result, StorageContext};
use crate::profiles::model::{PhotographyStyle, SocialStatus};

/// Standard relative path to the config file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the workspace root.
pub const HOME_ENV_VAR: &str = "IMAGER_HOME";

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImagerConfig {
    /// Attribute values given to newly provisioned profiles.
    #[serde(default)]
    pub profile_defaults: ProfileDefaults,
    /// File names for the profile, account, and event stores.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Default attribute values for provisioned profiles.
///
/// Enumerated values are kept as raw codes so a hand-edited config with an
/// unknown code is reported instead of silently replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDefaults {
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_age")]
    pub age: i32,
    #[serde(default = "default_camera_type")]
    pub camera_type: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_photography_style")]
    pub photography_style: String,
    #[serde(default = "default_social_status")]
    pub social_status: String,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            location: String::new(),
            age: default_age(),
            camera_type: default_camera_type(),
            job: String::new(),
            url: String::new(),
            photography_style: default_photography_style(),
            social_status: default_social_status(),
        }
    }
}

impl ProfileDefaults {
    pub fn photography_style(&self) -> Result<PhotographyStyle> {
        self.photography_style.parse()
    }

    pub fn social_status(&self) -> Result<SocialStatus> {
        self.social_status.parse()
    }
}

const fn default_age() -> i32 {
    18
}

fn default_camera_type() -> String {
    "Kodak".to_string()
}

fn default_photography_style() -> String {
    PhotographyStyle::default().code().to_string()
}

fn default_social_status() -> String {
    SocialStatus::default().code().to_string()
}

/// File names (relative to the data directory) for persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_profiles_file")]
    pub profiles_file: String,
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,
    #[serde(default = "default_events_file")]
    pub events_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            profiles_file: default_profiles_file(),
            accounts_file: default_accounts_file(),
            events_file: default_events_file(),
        }
    }
}

fn default_profiles_file() -> String {
    "profiles.json".to_string()
}

fn default_accounts_file() -> String {
    "accounts.json".to_string()
}

fn default_events_file() -> String {
    "events.jsonl".to_string()
}

/// Returns the root directory where Imager stores data.
///
/// Order of precedence:
/// 1. `IMAGER_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var(HOME_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| ProfileError::Config("unable to determine OS data directory".into()))?;
    Ok(base_dirs.data_dir().join("ImagerProfile"))
}

/// Convenience struct exposing important workspace paths.
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl WorkspacePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
            root,
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Creates the config and data directories if missing.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.config_dir)
            .storage_context(|| format!("failed creating config directory {:?}", self.config_dir))?;
        fs::create_dir_all(&self.data_dir)
            .storage_context(|| format!("failed creating data directory {:?}", self.data_dir))?;
        Ok(())
    }
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default(path: &Path) -> Result<ImagerConfig> {
    if !path.exists() {
        return Ok(ImagerConfig::default());
    }
    let data = fs::read_to_string(path)
        .storage_context(|| format!("failed to read config file {:?}", path))?;
    toml::from_str(&data)
        .map_err(|err| ProfileError::Config(format!("failed to parse {:?}: {err}", path)))
}

/// Persists the configuration to disk.
pub fn save(path: &Path, config: &ImagerConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .storage_context(|| format!("failed creating config directory {:?}", parent))?;
    }
    let data = toml::to_string_pretty(config)
        .map_err(|err| ProfileError::Config(format!("failed to encode config: {err}")))?;
    fs::write(path, data).storage_context(|| format!("failed writing config file {:?}", path))?;
    Ok(())
}
