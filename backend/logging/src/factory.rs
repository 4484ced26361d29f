//! Logger construction from a [`LogConfig`].
//!
//! The file destination (when persisting) always receives JSON. The
//! console destination follows the render mode: JSON, pretty/colored, or
//! plain text. All destinations are combined in one [`FanOutHandler`].

use crate::config::{ConsoleTarget, LogConfig, RenderMode};
use crate::error::Result;
use crate::file::{create_log_file, open_log_file};
use crate::handler::{
    Destination, FanOutHandler, Handler, JsonHandler, PlainHandler, PrettyHandler,
};
use crate::logger::{ColorLogger, Logger, PlainLogger};
use crate::redact::RedactingHandler;
use std::sync::Arc;
use tracing::debug;

/// Build a logger writing to the configured console stream and, when
/// persisting, to the log file. The file's parent directory must exist.
pub fn configure_logger(config: &LogConfig) -> Result<Logger> {
    let console = match config.console() {
        ConsoleTarget::Stdout => Destination::stdout(),
        ConsoleTarget::Stderr => Destination::stderr(),
    };
    configure_logger_with_console(config, console)
}

/// [`configure_logger`] with an explicit console destination.
pub fn configure_logger_with_console(config: &LogConfig, console: Destination) -> Result<Logger> {
    let mut handlers: Vec<Arc<dyn Handler>> = Vec::with_capacity(2);

    if config.persist_to_disk() {
        let (path, writer) = open_log_file(config)?;
        debug!(path = %path.display(), "Attaching JSON file handler");
        handlers.push(Arc::new(JsonHandler::new(
            Destination::file(&path, writer),
            config.min_severity(),
        )));
    }

    handlers.push(console_handler(config, console));

    let fan_out: Arc<dyn Handler> = Arc::new(FanOutHandler::new(handlers)?);
    let handler: Arc<dyn Handler> = if config.redact_sensitive() {
        Arc::new(RedactingHandler::new(fan_out))
    } else {
        fan_out
    };

    debug!(
        render_mode = %config.render_mode(),
        min_severity = %config.min_severity(),
        persist = config.persist_to_disk(),
        "Logger configured"
    );

    Ok(match config.render_mode() {
        RenderMode::Color => Logger::Color(ColorLogger::new(handler, config.min_severity())),
        RenderMode::Plain | RenderMode::Json => Logger::Plain(PlainLogger::new(handler)),
    })
}

fn console_handler(config: &LogConfig, console: Destination) -> Arc<dyn Handler> {
    let min = config.min_severity();
    match config.render_mode() {
        RenderMode::Json => Arc::new(JsonHandler::new(console, min)),
        RenderMode::Color => Arc::new(PrettyHandler::new(console, min)),
        RenderMode::Plain => Arc::new(PlainHandler::new(console, min)),
    }
}

/// Prepare the log file (when persisting) and build the logger.
pub fn init_logging(config: &LogConfig) -> Result<Logger> {
    if config.persist_to_disk() {
        create_log_file(config)?;
    }
    configure_logger(config)
}

/// [`init_logging`] with an explicit console destination.
pub fn init_logging_with_console(config: &LogConfig, console: Destination) -> Result<Logger> {
    if config.persist_to_disk() {
        create_log_file(config)?;
    }
    configure_logger_with_console(config, console)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;
    use crate::handler::SharedBuffer;
    use crate::level::Severity;
    use crate::logger::Log;
    use std::path::Path;
    use toolbelt_fs::MemFs;

    fn config(fs: &MemFs, path: &str, mode: RenderMode) -> LogConfig {
        LogConfig::builder(Arc::new(fs.clone()))
            .log_path(path)
            .render_mode(mode)
            .build()
    }

    #[test]
    fn configure_requires_existing_parent() {
        let fs = MemFs::new();
        let err = configure_logger_with_console(
            &config(&fs, "/nope/app", RenderMode::Plain),
            Destination::writer("buf", SharedBuffer::new()),
        )
        .unwrap_err();
        assert!(matches!(err, LogError::InvalidPath { .. }));
    }

    #[test]
    fn init_creates_directories_and_writes_both() {
        let fs = MemFs::new();
        let console = SharedBuffer::new();
        let logger = init_logging_with_console(
            &config(&fs, "/var/log/svc/run", RenderMode::Plain),
            Destination::writer("console", console.clone()),
        )
        .unwrap();

        logger.println(&[&"hello"]);

        let file = fs.read_to_string(Path::new("/var/log/svc/run.log")).unwrap();
        assert!(file.contains("\"msg\":\"hello\""));
        assert_eq!(console.contents(), "INFO: hello\n");
    }

    #[test]
    fn json_mode_uses_json_console_and_plain_facade() {
        let fs = MemFs::new();
        let console = SharedBuffer::new();
        let cfg = LogConfig::builder(Arc::new(fs))
            .persist_to_disk(false)
            .render_mode(RenderMode::Json)
            .build();
        let logger =
            configure_logger_with_console(&cfg, Destination::writer("c", console.clone())).unwrap();

        assert!(matches!(logger, Logger::Plain(_)));
        logger.error(&[&"bad"]);
        let parsed: serde_json::Value = serde_json::from_str(console.lines()[0].as_str()).unwrap();
        assert_eq!(parsed["level"], "ERROR");
    }

    #[test]
    fn color_mode_returns_color_logger() {
        let cfg = LogConfig::builder(Arc::new(MemFs::new()))
            .persist_to_disk(false)
            .render_mode(RenderMode::Color)
            .min_severity(Severity::Warn)
            .build();
        let logger =
            configure_logger_with_console(&cfg, Destination::writer("c", SharedBuffer::new()))
                .unwrap();
        assert!(matches!(logger, Logger::Color(_)));
        assert!(!logger.enabled(Severity::Info));
    }

    #[test]
    fn console_only_needs_no_path() {
        let cfg = LogConfig::builder(Arc::new(MemFs::new()))
            .persist_to_disk(false)
            .build();
        let console = Destination::writer("c", SharedBuffer::new());
        assert!(init_logging_with_console(&cfg, console).is_ok());
    }

    #[test]
    fn persisting_without_path_fails() {
        let cfg = LogConfig::builder(Arc::new(MemFs::new())).build();
        let console = Destination::writer("c", SharedBuffer::new());
        let err = init_logging_with_console(&cfg, console).unwrap_err();
        assert!(matches!(err, LogError::PathRequired));
    }

    #[test]
    fn redaction_applies_to_every_destination() {
        let fs = MemFs::new();
        let console = SharedBuffer::new();
        let cfg = LogConfig::builder(Arc::new(fs.clone()))
            .log_path("/secrets")
            .redact_sensitive(true)
            .build();
        let logger =
            init_logging_with_console(&cfg, Destination::writer("c", console.clone())).unwrap();
        logger.println(&[&"call +1-555-123-4567"]);

        assert!(console.contents().contains("[REDACTED_PHONE]"));
        let file = fs.read_to_string(Path::new("/secrets.log")).unwrap();
        assert!(file.contains("[REDACTED_PHONE]"));
        assert!(!file.contains("555-123-4567"));
    }
}
