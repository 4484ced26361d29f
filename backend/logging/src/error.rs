use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring a logger or delivering a record.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("log path required when persisting to disk")]
    PathRequired,

    #[error("invalid log path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: &'static str },

    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write log record to {destination}: {source}")]
    Write {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to flush {destination}: {source}")]
    Flush {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode log record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no valid handlers available")]
    NoHandlers,

    #[error("unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("unknown render mode: {0}")]
    UnknownRenderMode(String),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),

    /// A message that was logged at error severity before being returned.
    #[error("{0}")]
    Logged(String),
}

pub type Result<T> = std::result::Result<T, LogError>;
