//! Structured multi-destination logging for the toolbelt packages.
//!
//! A [`LogConfig`] describes where records go and how the console renders
//! them. [`init_logging`] prepares the log file and builds a [`Logger`]
//! that fans every record out to a JSON file handler and a plain, colored
//! or JSON console handler. A process-wide slot ([`global`]) serves call
//! sites that cannot be handed a logger, and [`HandlerLayer`] routes
//! `tracing` events to the same destinations.

pub mod ansi;
pub mod bridge;
pub mod config;
pub mod error;
pub mod factory;
pub mod file;
pub mod global;
pub mod handler;
pub mod level;
pub mod logger;
pub mod record;
pub mod redact;
pub mod settings;

pub use bridge::HandlerLayer;
pub use config::{ConsoleTarget, LogConfig, LogConfigBuilder, RenderMode};
pub use error::{LogError, Result};
pub use factory::{
    configure_logger, configure_logger_with_console, init_logging, init_logging_with_console,
};
pub use file::{create_log_file, normalize_log_path, open_log_file};
pub use global::{
    init_global_logger, init_global_logger_with_console, log_and_return_error,
    logger as global_logger, set_global_logger, shutdown_global_logger,
};
pub use handler::{
    Destination, FanOutHandler, Handler, JsonHandler, PlainHandler, PrettyHandler, SharedBuffer,
};
pub use level::Severity;
pub use logger::{ColorLogger, DiscardHandler, Log, Logger, PlainLogger};
pub use record::{Attributes, LogRecord};
pub use redact::{redact_sensitive_data, RedactingHandler};
pub use settings::{load_settings, LoggingSettings, SettingsReport};
