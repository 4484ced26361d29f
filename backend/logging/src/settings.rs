//! Logging settings as read from a config file and the environment.
//!
//! Settings are loose, string-typed and all optional so they can live
//! inside a larger YAML or JSON config. Loading order:
//! defaults → file → `TOOLBELT_LOG_*` environment overrides. [`validate`]
//! reports problems before [`LoggingSettings::into_config`] builds a
//! typed [`LogConfig`].
//!
//! [`validate`]: LoggingSettings::validate

use crate::config::{ConsoleTarget, LogConfig, RenderMode};
use crate::error::LogError;
use crate::level::Severity;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use toolbelt_fs::FileSystem;
use tracing::{debug, info};

pub const ENV_LEVEL: &str = "TOOLBELT_LOG_LEVEL";
pub const ENV_FORMAT: &str = "TOOLBELT_LOG_FORMAT";
pub const ENV_FILE: &str = "TOOLBELT_LOG_FILE";
pub const ENV_PERSIST: &str = "TOOLBELT_LOG_PERSIST";

pub const DEFAULT_LEVEL: &str = "info";
pub const DEFAULT_FORMAT: &str = "plain";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSettings {
    /// `debug` | `info` | `warn` | `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// `plain` | `color` | `json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Defaults to true when `file` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redact_sensitive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console: Option<ConsoleTarget>,
}

/// A settings problem with the offending field.
#[derive(Debug, Error)]
#[error("Logging settings error at '{field}': {message}")]
pub struct SettingsIssue {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct SettingsReport {
    pub errors: Vec<SettingsIssue>,
    pub warnings: Vec<SettingsIssue>,
}

impl SettingsReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(SettingsIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(SettingsIssue {
            field: field.into(),
            message: message.into(),
        });
    }
}

impl LoggingSettings {
    /// Parse YAML (a superset of JSON).
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).context("Failed to parse logging settings")
    }

    /// Fill unset level and format with defaults.
    pub fn with_defaults(mut self) -> Self {
        self.level.get_or_insert_with(|| DEFAULT_LEVEL.to_string());
        self.format.get_or_insert_with(|| DEFAULT_FORMAT.to_string());
        self
    }

    /// Apply `TOOLBELT_LOG_*` overrides from the process environment.
    pub fn apply_env_overrides(self) -> Self {
        self.apply_env_overrides_with(&std::env::vars().collect())
    }

    /// Apply overrides from a provided map (useful for testing).
    pub fn apply_env_overrides_with(mut self, env: &HashMap<String, String>) -> Self {
        let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        if let Some(level) = get(ENV_LEVEL) {
            self.level = Some(level.to_string());
        }
        if let Some(format) = get(ENV_FORMAT) {
            self.format = Some(format.to_string());
        }
        if let Some(file) = get(ENV_FILE) {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(persist) = get(ENV_PERSIST) {
            self.persist = Some(matches!(
                persist.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ));
        }
        self
    }

    fn wants_persist(&self) -> bool {
        self.persist.unwrap_or(self.file.is_some())
    }

    /// Check every field and return all errors and warnings found.
    pub fn validate(&self) -> SettingsReport {
        let mut report = SettingsReport::default();

        if let Some(level) = &self.level {
            if let Err(e) = level.parse::<Severity>() {
                report.error("level", e.to_string());
            }
        }
        if let Some(format) = &self.format {
            if let Err(e) = format.parse::<RenderMode>() {
                report.error("format", e.to_string());
            }
        }

        let file_empty = self
            .file
            .as_ref()
            .map_or(true, |f| f.as_os_str().to_string_lossy().trim().is_empty());
        if self.wants_persist() && file_empty {
            report.error("file", "A log file path is required when persist is enabled");
        }
        if self.persist == Some(false) && !file_empty {
            report.warn("file", "Log file is set but persist is disabled; it will be ignored");
        }
        report
    }

    /// Build a [`LogConfig`] on `filesystem`. Unset fields take defaults.
    pub fn into_config(
        self,
        filesystem: Arc<dyn FileSystem>,
    ) -> std::result::Result<LogConfig, LogError> {
        let min_severity = match &self.level {
            Some(level) => level.parse()?,
            None => Severity::default(),
        };
        let render_mode = match &self.format {
            Some(format) => format.parse()?,
            None => RenderMode::default(),
        };
        let persist = self.wants_persist();

        Ok(LogConfig::builder(filesystem)
            .log_path(self.file.unwrap_or_default())
            .min_severity(min_severity)
            .render_mode(render_mode)
            .persist_to_disk(persist)
            .redact_sensitive(self.redact_sensitive.unwrap_or(false))
            .console(self.console.unwrap_or_default())
            .build())
    }
}

/// Load settings from a YAML/JSON file, then defaults and env overrides.
///
/// A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<LoggingSettings> {
    let settings = if path.exists() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read logging settings: {}", path.display()))?;
        let settings = LoggingSettings::from_yaml_str(&raw)
            .with_context(|| format!("Invalid logging settings at: {}", path.display()))?;
        info!(path = %path.display(), "Loaded logging settings");
        settings
    } else {
        debug!(path = %path.display(), "Logging settings file not found; using defaults");
        LoggingSettings::default()
    };
    Ok(settings.with_defaults().apply_env_overrides())
}
