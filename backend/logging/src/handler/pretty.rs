//! Colorized terminal rendering.
//!
//! `[<time>] <LEVEL> <message> <attrs-json>` with the level and message
//! colored per severity. This is the only place log output is colored;
//! [`crate::ColorLogger`] hands text through unchanged. When the
//! destination is not a terminal (or color is disabled) the output is
//! exactly what [`PlainHandler`](super::PlainHandler) would write.

use super::plain::render_plain;
use super::{ordered_attrs_json, Destination, Handler};
use crate::ansi::{self, BOLD, DIM, RESET};
use crate::error::Result;
use crate::level::Severity;
use crate::record::LogRecord;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug)]
pub struct PrettyHandler {
    dest: Destination,
    min_severity: Severity,
    color: bool,
}

impl PrettyHandler {
    /// Colors only when `dest` is a terminal and `NO_COLOR` is unset.
    pub fn new(dest: Destination, min_severity: Severity) -> Self {
        let color = dest.is_terminal() && ansi::color_allowed();
        Self {
            dest,
            min_severity,
            color,
        }
    }

    /// Override color detection. Color is still never written to a
    /// non-terminal destination.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color && self.dest.is_terminal();
        self
    }

    pub fn colors_enabled(&self) -> bool {
        self.color
    }
}

impl Handler for PrettyHandler {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    fn handle(&self, record: &LogRecord) -> Result<()> {
        if !self.enabled(record.severity) {
            return Ok(());
        }
        let line = if self.color {
            render_pretty(record)
        } else {
            render_plain(record)
        };
        self.dest.write_record(line.as_bytes())
    }

    fn flush(&self) -> Result<()> {
        self.dest.flush()
    }

    fn close(&self) -> Result<()> {
        self.dest.close()
    }
}

/// The colored line for a terminal.
pub fn render_pretty(record: &LogRecord) -> String {
    let color = ansi::severity_color(record.severity);
    let mut line = format!(
        "{DIM}[{}]{RESET} {BOLD}{color}{:<5}{RESET} {color}{}{RESET}",
        record.time.format(TIME_FORMAT),
        record.severity.as_str(),
        record.message,
    );
    if !record.attrs.is_empty() {
        line.push(' ');
        line.push_str(&ordered_attrs_json(record));
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_ansi;
    use crate::handler::{PlainHandler, SharedBuffer};
    use chrono::{TimeZone, Utc};

    fn record() -> LogRecord {
        LogRecord::new(Severity::Warn, "cache miss")
            .at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
            .with_attr("key", "user:1")
    }

    #[test]
    fn terminal_output_is_colored() {
        let buf = SharedBuffer::new();
        let handler =
            PrettyHandler::new(Destination::terminal("tty", buf.clone()), Severity::Debug)
                .with_color(true);
        handler.handle(&record()).unwrap();

        let out = buf.contents();
        assert!(out.contains(ansi::YELLOW));
        assert_eq!(
            strip_ansi(&out),
            "[2024-01-02 03:04:05.000] WARN  cache miss {\"key\":\"user:1\"}\n"
        );
    }

    #[test]
    fn non_terminal_matches_plain_handler() {
        let pretty_buf = SharedBuffer::new();
        let plain_buf = SharedBuffer::new();
        let pretty_dest = Destination::writer("pipe", pretty_buf.clone());
        let pretty = PrettyHandler::new(pretty_dest, Severity::Info).with_color(true);
        let plain_dest = Destination::writer("pipe", plain_buf.clone());
        let plain = PlainHandler::new(plain_dest, Severity::Info);

        assert!(!pretty.colors_enabled());
        pretty.handle(&record()).unwrap();
        plain.handle(&record()).unwrap();

        assert!(!pretty_buf.contents().contains("\x1b["));
        assert_eq!(pretty_buf.contents(), plain_buf.contents());
    }

    #[test]
    fn color_can_be_disabled_on_terminal() {
        let buf = SharedBuffer::new();
        let handler = PrettyHandler::new(Destination::terminal("tty", buf.clone()), Severity::Info)
            .with_color(false);
        handler.handle(&record()).unwrap();
        assert_eq!(buf.contents(), "WARN: cache miss key=user:1\n");
    }
}
