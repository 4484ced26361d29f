//! Newline-delimited JSON rendering.

use super::{Destination, Handler};
use crate::error::Result;
use crate::level::Severity;
use crate::record::LogRecord;
use chrono::SecondsFormat;
use serde::ser::{Serialize, SerializeMap, Serializer};

const RESERVED_KEYS: [&str; 3] = ["time", "level", "msg"];

/// One JSON object per line: `time`, `level`, `msg`, then attributes as
/// sibling keys in insertion order.
#[derive(Debug)]
pub struct JsonHandler {
    dest: Destination,
    min_severity: Severity,
}

impl JsonHandler {
    pub fn new(dest: Destination, min_severity: Severity) -> Self {
        Self { dest, min_severity }
    }
}

impl Handler for JsonHandler {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    fn handle(&self, record: &LogRecord) -> Result<()> {
        if !self.enabled(record.severity) {
            return Ok(());
        }
        let line = render_json(record)?;
        self.dest.write_record(&line)
    }

    fn flush(&self) -> Result<()> {
        self.dest.flush()
    }

    fn close(&self) -> Result<()> {
        self.dest.close()
    }
}

/// Encode `record` as a single newline-terminated JSON object.
pub fn render_json(record: &LogRecord) -> Result<Vec<u8>> {
    let mut line = serde_json::to_vec(&JsonLine(record))?;
    line.push(b'\n');
    Ok(line)
}

struct JsonLine<'a>(&'a LogRecord);

impl Serialize for JsonLine<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let record = self.0;
        let mut map = serializer.serialize_map(Some(3 + record.attrs.len()))?;
        map.serialize_entry(
            "time",
            &record.time.to_rfc3339_opts(SecondsFormat::Nanos, true),
        )?;
        map.serialize_entry("level", record.severity.as_str())?;
        map.serialize_entry("msg", &record.message)?;
        for (key, value) in record.attrs.iter() {
            if RESERVED_KEYS.contains(&key) {
                map.serialize_entry(&renamed_key(record, key), value)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

/// Key for an attribute that would shadow an envelope key: `attr.` is
/// prepended until the name is free among the record's attributes.
fn renamed_key(record: &LogRecord, key: &str) -> String {
    let mut renamed = format!("attr.{key}");
    while record.attrs.get(&renamed).is_some() {
        renamed.insert_str(0, "attr.");
    }
    renamed
}
