//! Process-wide logger slot.
//!
//! A compatibility shim for code that cannot receive an `Arc<Logger>` by
//! parameter. Prefer building a logger at startup and passing it down.
//! Re-initialization is memory-safe (the slot is behind an `RwLock`, last
//! writer wins) but is only intended to happen once, at startup.

use crate::config::LogConfig;
use crate::error::{LogError, Result};
use crate::factory::{init_logging, init_logging_with_console};
use crate::handler::Destination;
use crate::level::Severity;
use crate::logger::{Log, Logger};
use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

static GLOBAL: RwLock<Option<Arc<Logger>>> = RwLock::new(None);
static DISCARD: Lazy<Arc<Logger>> = Lazy::new(|| Arc::new(Logger::discard()));

/// Build a logger from `config` and install it as the global logger.
pub fn init_global_logger(config: &LogConfig) -> Result<Arc<Logger>> {
    let logger = init_logging(config)?;
    Ok(set_global_logger(logger))
}

/// [`init_global_logger`] with an explicit console destination.
pub fn init_global_logger_with_console(
    config: &LogConfig,
    console: Destination,
) -> Result<Arc<Logger>> {
    let logger = init_logging_with_console(config, console)?;
    Ok(set_global_logger(logger))
}

/// Install an already built logger, replacing any previous one.
pub fn set_global_logger(logger: Logger) -> Arc<Logger> {
    let logger = Arc::new(logger);
    let mut slot = GLOBAL.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = Some(logger.clone());
    logger
}

/// The global logger, or a logger that discards everything when none has
/// been installed.
pub fn logger() -> Arc<Logger> {
    let slot = GLOBAL.read().unwrap_or_else(|poisoned| poisoned.into_inner());
    slot.clone().unwrap_or_else(|| DISCARD.clone())
}

pub fn is_initialized() -> bool {
    GLOBAL
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .is_some()
}

/// Remove the global logger and close its destinations.
pub fn shutdown_global_logger() -> Result<()> {
    let taken = GLOBAL
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take();
    match taken {
        Some(logger) => logger.close(),
        None => Ok(()),
    }
}

/// Log `message` at error severity, then hand it back as an error.
///
/// ```ignore
/// return Err(log_and_return_error(&*logger(), "config missing").into());
/// ```
pub fn log_and_return_error<L: Log + ?Sized>(logger: &L, message: impl Into<String>) -> LogError {
    let message = message.into();
    logger.log(Severity::Error, message.clone());
    LogError::Logged(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::SharedBuffer;
    use std::path::Path;
    use std::sync::Mutex;
    use toolbelt_fs::MemFs;

    // Tests in this module share the process-wide slot.
    static SLOT: Mutex<()> = Mutex::new(());

    #[test]
    fn uninitialized_global_discards() {
        let _guard = SLOT.lock().unwrap_or_else(|p| p.into_inner());
        shutdown_global_logger().unwrap();

        assert!(!is_initialized());
        let l = logger();
        assert!(l.is_discard());
        l.error(&[&"goes nowhere"]);
    }

    #[test]
    fn init_then_get_returns_same_logger() {
        let _guard = SLOT.lock().unwrap_or_else(|p| p.into_inner());
        let fs = MemFs::new();
        let console = SharedBuffer::new();
        let config = LogConfig::new(Arc::new(fs.clone()), "/global/app");

        let installed =
            init_global_logger_with_console(&config, Destination::writer("c", console.clone()))
                .unwrap();
        assert!(Arc::ptr_eq(&installed, &logger()));

        logger().println(&[&"via", &"global"]);
        assert_eq!(console.contents(), "INFO: via global\n");
        assert!(fs
            .read_to_string(Path::new("/global/app.log"))
            .unwrap()
            .contains("via global"));

        shutdown_global_logger().unwrap();
        assert!(logger().is_discard());
        logger().println(&[&"after shutdown"]);
        assert_eq!(console.lines().len(), 1);
    }

    #[test]
    fn failed_init_keeps_previous_logger() {
        let _guard = SLOT.lock().unwrap_or_else(|p| p.into_inner());
        shutdown_global_logger().unwrap();
        let previous = set_global_logger(Logger::discard());

        let config = LogConfig::new(Arc::new(MemFs::new()), "");
        assert!(matches!(init_global_logger(&config), Err(LogError::PathRequired)));
        assert!(Arc::ptr_eq(&previous, &logger()));
        shutdown_global_logger().unwrap();
    }

    #[test]
    fn log_and_return_error_logs_at_error() {
        let buf = SharedBuffer::new();
        let handler = Arc::new(crate::handler::PlainHandler::new(
            Destination::writer("buf", buf.clone()),
            Severity::Info,
        ));
        let logger = Logger::Plain(crate::logger::PlainLogger::new(handler));

        let err = log_and_return_error(&logger, "could not open config");
        assert_eq!(err.to_string(), "could not open config");
        assert!(matches!(err, LogError::Logged(_)));
        assert_eq!(buf.contents(), "ERROR: could not open config\n");
    }
}
