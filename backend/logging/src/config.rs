//! Logger configuration.
//!
//! A [`LogConfig`] is built once through [`LogConfigBuilder`] and is
//! read-only afterwards. Clones share the same filesystem handle.

use crate::error::LogError;
use crate::level::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use toolbelt_fs::{FileSystem, OsFs};

/// How console output is rendered.
///
/// The file destination is always newline-delimited JSON; only the console
/// follows the render mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Plain,
    Color,
    Json,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Color => "color",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "color" | "colour" | "pretty" => Ok(Self::Color),
            "json" => Ok(Self::Json),
            _ => Err(LogError::UnknownRenderMode(s.to_string())),
        }
    }
}

/// Which standard stream receives console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    Stdout,
    #[default]
    Stderr,
}

/// Parameters for building a [`crate::Logger`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    filesystem: Arc<dyn FileSystem>,
    log_path: PathBuf,
    min_severity: Severity,
    render_mode: RenderMode,
    persist_to_disk: bool,
    redact_sensitive: bool,
    console: ConsoleTarget,
}

impl LogConfig {
    /// Config persisting to `log_path` at `Info`, plain console output.
    pub fn new(filesystem: Arc<dyn FileSystem>, log_path: impl Into<PathBuf>) -> Self {
        Self::builder(filesystem).log_path(log_path).build()
    }

    pub fn builder(filesystem: Arc<dyn FileSystem>) -> LogConfigBuilder {
        LogConfigBuilder::new(filesystem)
    }

    /// Console-only config on the real filesystem.
    pub fn console_only(min_severity: Severity, render_mode: RenderMode) -> Self {
        Self::builder(Arc::new(OsFs::new()))
            .persist_to_disk(false)
            .min_severity(min_severity)
            .render_mode(render_mode)
            .build()
    }

    pub fn filesystem(&self) -> &Arc<dyn FileSystem> {
        &self.filesystem
    }

    /// The path as supplied, before `.log` normalization.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn persist_to_disk(&self) -> bool {
        self.persist_to_disk
    }

    pub fn redact_sensitive(&self) -> bool {
        self.redact_sensitive
    }

    pub fn console(&self) -> ConsoleTarget {
        self.console
    }
}

/// Builder for [`LogConfig`].
#[derive(Debug, Clone)]
pub struct LogConfigBuilder {
    config: LogConfig,
}

impl LogConfigBuilder {
    fn new(filesystem: Arc<dyn FileSystem>) -> Self {
        Self {
            config: LogConfig {
                filesystem,
                log_path: PathBuf::new(),
                min_severity: Severity::Info,
                render_mode: RenderMode::Plain,
                persist_to_disk: true,
                redact_sensitive: false,
                console: ConsoleTarget::Stderr,
            },
        }
    }

    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_path = path.into();
        self
    }

    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.config.min_severity = severity;
        self
    }

    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.config.render_mode = mode;
        self
    }

    pub fn persist_to_disk(mut self, persist: bool) -> Self {
        self.config.persist_to_disk = persist;
        self
    }

    pub fn redact_sensitive(mut self, redact: bool) -> Self {
        self.config.redact_sensitive = redact;
        self
    }

    pub fn console(mut self, target: ConsoleTarget) -> Self {
        self.config.console = target;
        self
    }

    pub fn build(self) -> LogConfig {
        self.config
    }
}
