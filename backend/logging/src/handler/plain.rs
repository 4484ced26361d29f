//! Plain text rendering: `LEVEL: message key=value ...`.

use super::{display_value, Destination, Handler};
use crate::error::Result;
use crate::level::Severity;
use crate::record::LogRecord;

#[derive(Debug)]
pub struct PlainHandler {
    dest: Destination,
    min_severity: Severity,
}

impl PlainHandler {
    pub fn new(dest: Destination, min_severity: Severity) -> Self {
        Self { dest, min_severity }
    }
}

impl Handler for PlainHandler {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    fn handle(&self, record: &LogRecord) -> Result<()> {
        if !self.enabled(record.severity) {
            return Ok(());
        }
        self.dest.write_record(render_plain(record).as_bytes())
    }

    fn flush(&self) -> Result<()> {
        self.dest.flush()
    }

    fn close(&self) -> Result<()> {
        self.dest.close()
    }
}

/// `"<LEVEL>: <message>"` followed by ` key=value` pairs and a newline.
pub fn render_plain(record: &LogRecord) -> String {
    let mut line = format!("{}: {}", record.severity, record.message);
    for (key, value) in record.attrs.iter() {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(&display_value(value));
    }
    line.push('\n');
    line
}
