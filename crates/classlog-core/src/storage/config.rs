//! TOML-based application configuration.
//!
//! Stores:
//! - The mode and action catalogs presented during a session
//! - Reminder cadence and threshold
//! - Report endpoint, model and retry bound
//!
//! Configuration is stored at `~/.config/classlog/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::report::{DEFAULT_ENDPOINT, DEFAULT_MAX_ATTEMPTS, DEFAULT_MODEL};
use crate::session::{CatalogEntry, REMINDER_POLL_SECS, REMINDER_THRESHOLD_SECS};

/// Session catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_modes")]
    pub modes: Vec<CatalogEntry>,
    #[serde(default = "default_actions")]
    pub actions: Vec<CatalogEntry>,
}

/// Idle-engagement reminder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Seconds without a score update before the reminder fires.
    #[serde(default = "default_reminder_threshold")]
    pub threshold_secs: u64,
    /// Poll cadence while a session is active.
    #[serde(default = "default_reminder_poll")]
    pub poll_secs: u64,
}

/// Report client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/classlog/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

// Default functions
fn default_modes() -> Vec<CatalogEntry> {
    CatalogEntry::default_modes()
}
fn default_actions() -> Vec<CatalogEntry> {
    CatalogEntry::default_actions()
}
fn default_reminder_threshold() -> u64 {
    REMINDER_THRESHOLD_SECS
}
fn default_reminder_poll() -> u64 {
    REMINDER_POLL_SECS
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            modes: default_modes(),
            actions: default_actions(),
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            threshold_secs: default_reminder_threshold(),
            poll_secs: default_reminder_poll(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            reminder: ReminderConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    /// Path of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Persist the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Read a value by dotted path, e.g. `reminder.threshold_secs`.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let root = serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        let value = get_json_value_by_path(&root, key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        Ok(match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Set a scalar value by dotted path, parsed to match the existing
    /// value's type. Catalog arrays are edited in the file directly.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut root = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        set_json_value_by_path(&mut root, key, value)?;
        *self = serde_json::from_value(root).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

fn get_json_value_by_path<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_json_value_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::String(_) => serde_json::Value::String(value.to_string()),
                _ => {
                    return Err(invalid(format!(
                        "'{part}' is not a scalar; edit the configuration file directly"
                    )));
                }
            };
            obj.insert(part.to_string(), new_value);
        } else {
            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }
    }
    Ok(())
}
