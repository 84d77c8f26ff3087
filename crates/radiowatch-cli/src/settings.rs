//! Client configuration file handling.
//!
//! The config file is YAML at the per-user config dir. Values merge with
//! command-line flags in three tiers: explicit CLI flag > config-file value
//! > built-in default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration file errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode config: {0}")]
    Encode(#[from] serde_yaml::Error),

    #[error("No config directory available for this user")]
    NoConfigDir,

    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value} (expected true or false)")]
    InvalidValue { key: String, value: String },
}

/// Keys recognized in the config file. Unrecognized keys are dropped on
/// load; a non-mapping document is a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth_user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth_password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

/// Global flag values captured from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub basic_auth_user: Option<String>,
    pub basic_auth_password: Option<String>,
    pub json: bool,
    pub verbose: bool,
}

/// Effective configuration after the merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    pub host: Option<String>,
    pub basic_auth_user: Option<String>,
    pub basic_auth_password: Option<String>,
    pub json: bool,
    pub verbose: bool,
}

/// Default config file location.
pub fn default_path() -> Result<PathBuf, SettingsError> {
    directories::ProjectDirs::from("", "", "radiowatch")
        .map(|dirs| dirs.config_dir().join("config.yaml"))
        .ok_or(SettingsError::NoConfigDir)
}

/// Load the config file. A missing file yields defaults; a malformed or
/// non-mapping document is fatal.
pub fn load(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the config file, creating parent directories as needed.
pub fn save(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let text = serde_yaml::to_string(settings)?;

    std::fs::write(path, text).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge, per value: explicit CLI flag > config-file value > default.
pub fn resolve(file: &Settings, cli: &Overrides) -> Resolved {
    Resolved {
        host: cli.host.clone().or_else(|| file.host.clone()),
        basic_auth_user: cli
            .basic_auth_user
            .clone()
            .or_else(|| file.basic_auth_user.clone()),
        basic_auth_password: cli
            .basic_auth_password
            .clone()
            .or_else(|| file.basic_auth_password.clone()),
        json: cli.json || file.json.unwrap_or(false),
        verbose: cli.verbose || file.verbose.unwrap_or(false),
    }
}

/// Apply `config set KEY VALUE`.
pub fn set_key(settings: &mut Settings, key: &str, value: &str) -> Result<(), SettingsError> {
    match key {
        "host" => settings.host = Some(value.to_string()),
        "basic_auth_user" => settings.basic_auth_user = Some(value.to_string()),
        "basic_auth_password" => settings.basic_auth_password = Some(value.to_string()),
        "json" => settings.json = Some(parse_bool(key, value)?),
        "verbose" => settings.verbose = Some(parse_bool(key, value)?),
        _ => return Err(SettingsError::UnknownKey(key.to_string())),
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
