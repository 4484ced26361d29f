//! Logger facade.
//!
//! [`Log`] is the call-site API (`println`, `printf`, `error`, `errorf`,
//! `debug`, `debugf`, ...). [`PlainLogger`] and [`ColorLogger`] implement it
//! over a shared handler; [`Logger`] is what the factory hands out.
//!
//! Convenience methods never fail: a delivery error is reported on stderr
//! and the logger stays usable. Use [`Log::try_log`] to observe errors.

use crate::ansi;
use crate::error::Result;
use crate::handler::Handler;
use crate::level::Severity;
use crate::record::{Attributes, LogRecord};
use std::fmt::{self, Display};
use std::sync::Arc;

pub trait Log {
    /// The handler records are delivered to.
    fn handler(&self) -> &dyn Handler;

    fn enabled(&self, severity: Severity) -> bool {
        self.handler().enabled(severity)
    }

    /// Deliver a record and report the first destination error, if any.
    fn try_log(&self, record: &LogRecord) -> Result<()> {
        self.handler().handle(record)
    }

    fn log(&self, severity: Severity, message: String) {
        self.log_with(severity, message, Attributes::new());
    }

    /// Log `message` with structured attributes.
    fn log_with(&self, severity: Severity, message: String, attrs: Attributes) {
        if !self.enabled(severity) {
            return;
        }
        let record = LogRecord::new(severity, message).with_attrs(attrs);
        if let Err(e) = self.try_log(&record) {
            report_failure(&e);
        }
    }

    /// Info, arguments joined by single spaces.
    fn println(&self, args: &[&dyn Display]) {
        if self.enabled(Severity::Info) {
            self.log(Severity::Info, join_args(args));
        }
    }

    fn printf(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Severity::Info) {
            self.log(Severity::Info, args.to_string());
        }
    }

    fn warn(&self, args: &[&dyn Display]) {
        if self.enabled(Severity::Warn) {
            self.log(Severity::Warn, join_args(args));
        }
    }

    fn warnf(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Severity::Warn) {
            self.log(Severity::Warn, args.to_string());
        }
    }

    fn error(&self, args: &[&dyn Display]) {
        if self.enabled(Severity::Error) {
            self.log(Severity::Error, join_args(args));
        }
    }

    fn errorf(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Severity::Error) {
            self.log(Severity::Error, args.to_string());
        }
    }

    fn debug(&self, args: &[&dyn Display]) {
        if self.enabled(Severity::Debug) {
            self.log(Severity::Debug, join_args(args));
        }
    }

    fn debugf(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Severity::Debug) {
            self.log(Severity::Debug, args.to_string());
        }
    }
}

fn join_args(args: &[&dyn Display]) -> String {
    args.iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn report_failure(err: &crate::error::LogError) {
    eprintln!("logging: {err}");
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Forwards formatted text unchanged.
#[derive(Debug, Clone)]
pub struct PlainLogger {
    handler: Arc<dyn Handler>,
}

impl PlainLogger {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }
}

impl Log for PlainLogger {
    fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

/// Logger used with colored console output.
///
/// Messages are passed to the handler uncolored; per-record coloring is
/// done by the pretty handler alone. The accent picked from the minimum
/// severity is available through [`paint`](Self::paint) for call sites that
/// print a whole colored line themselves.
#[derive(Debug, Clone)]
pub struct ColorLogger {
    handler: Arc<dyn Handler>,
    accent: &'static str,
}

impl ColorLogger {
    pub fn new(handler: Arc<dyn Handler>, min_severity: Severity) -> Self {
        Self {
            handler,
            accent: ansi::accent_color(min_severity),
        }
    }

    pub fn accent(&self) -> &'static str {
        self.accent
    }

    /// `text` wrapped in this logger's accent color.
    pub fn paint(&self, text: &str) -> String {
        ansi::paint(self.accent, text)
    }
}

impl Log for ColorLogger {
    fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

/// Handler that accepts nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardHandler;

impl Handler for DiscardHandler {
    fn enabled(&self, _severity: Severity) -> bool {
        false
    }

    fn handle(&self, _record: &LogRecord) -> Result<()> {
        Ok(())
    }
}

static DISCARD: DiscardHandler = DiscardHandler;

/// A configured logger.
#[derive(Debug, Clone)]
pub enum Logger {
    Plain(PlainLogger),
    Color(ColorLogger),
    /// Drops every record. Returned by the global accessor before init.
    Discard,
}

impl Logger {
    pub fn discard() -> Self {
        Self::Discard
    }

    pub fn is_discard(&self) -> bool {
        matches!(self, Self::Discard)
    }

    /// A cloneable handle on the handler, for wiring into other subscribers.
    pub fn shared_handler(&self) -> Arc<dyn Handler> {
        match self {
            Self::Plain(l) => l.handler.clone(),
            Self::Color(l) => l.handler.clone(),
            Self::Discard => Arc::new(DiscardHandler),
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.handler().flush()
    }

    /// Flush and release every destination. Idempotent; later log calls
    /// become no-ops on closed destinations.
    pub fn close(&self) -> Result<()> {
        self.handler().close()
    }
}

impl Log for Logger {
    fn handler(&self) -> &dyn Handler {
        match self {
            Self::Plain(l) => l.handler(),
            Self::Color(l) => l.handler(),
            Self::Discard => &DISCARD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Destination, PlainHandler, SharedBuffer};

    fn plain(min: Severity) -> (Logger, SharedBuffer) {
        let buf = SharedBuffer::new();
        let handler = Arc::new(PlainHandler::new(Destination::writer("buf", buf.clone()), min));
        (Logger::Plain(PlainLogger::new(handler)), buf)
    }

    #[test]
    fn severity_mapping() {
        let (logger, buf) = plain(Severity::Debug);
        logger.println(&[&"a", &1]);
        logger.printf(format_args!("b={}", 2));
        logger.error(&[&"c"]);
        logger.errorf(format_args!("d{}", "!"));
        logger.debug(&[&"e", &'f']);
        logger.debugf(format_args!("{:>3}", 7));
        logger.warn(&[&"g"]);

        assert_eq!(
            buf.lines(),
            vec![
                "INFO: a 1",
                "INFO: b=2",
                "ERROR: c",
                "ERROR: d!",
                "DEBUG: e f",
                "DEBUG:   7",
                "WARN: g",
            ]
        );
    }

    #[test]
    fn filtered_calls_write_nothing() {
        let (logger, buf) = plain(Severity::Warn);
        logger.debug(&[&"x"]);
        logger.println(&[&"y"]);
        assert!(buf.contents().is_empty());
        logger.error(&[&"z"]);
        assert_eq!(buf.lines(), vec!["ERROR: z"]);
    }

    #[test]
    fn log_with_attributes() {
        let (logger, buf) = plain(Severity::Info);
        let attrs: Attributes = [("user", "ada")].into_iter().collect();
        logger.log_with(Severity::Info, "login".to_string(), attrs);
        assert_eq!(buf.contents(), "INFO: login user=ada\n");
    }

    #[test]
    fn color_logger_passes_text_uncolored() {
        let buf = SharedBuffer::new();
        let dest = Destination::writer("buf", buf.clone());
        let handler = Arc::new(PlainHandler::new(dest, Severity::Info));
        let logger = ColorLogger::new(handler, Severity::Info);
        logger.println(&[&"hello"]);

        assert_eq!(buf.contents(), "INFO: hello\n");
        assert_eq!(logger.accent(), ansi::GREEN);
        assert_eq!(ansi::strip_ansi(&logger.paint("line")), "line");
    }

    #[test]
    fn close_is_idempotent_and_silences_logger() {
        let (logger, buf) = plain(Severity::Info);
        logger.println(&[&"before"]);
        logger.close().unwrap();
        logger.close().unwrap();
        logger.println(&[&"after"]);
        assert_eq!(buf.lines(), vec!["INFO: before"]);
    }

    #[test]
    fn discard_logger_accepts_everything() {
        let logger = Logger::discard();
        assert!(logger.is_discard());
        assert!(!logger.enabled(Severity::Error));
        logger.error(&[&"ignored"]);
        logger.try_log(&LogRecord::new(Severity::Error, "ignored")).unwrap();
        logger.close().unwrap();
    }
}
