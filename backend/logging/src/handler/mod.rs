//! Render handlers.
//!
//! A [`Handler`] turns a [`LogRecord`] into bytes for one [`Destination`].
//! Every handler drops records below its minimum severity before rendering.
//! [`FanOutHandler`] delivers one record to several handlers.

pub mod destination;
pub mod fanout;
pub mod json;
pub mod plain;
pub mod pretty;

pub use destination::{Destination, SharedBuffer};
pub use fanout::FanOutHandler;
pub use json::JsonHandler;
pub use plain::PlainHandler;
pub use pretty::PrettyHandler;

use crate::error::Result;
use crate::level::Severity;
use crate::record::LogRecord;
use std::fmt::Debug;

pub trait Handler: Send + Sync + Debug {
    /// Whether a record at `severity` would be rendered.
    fn enabled(&self, severity: Severity) -> bool;

    /// Render and write `record`. Records that are not [`enabled`](Self::enabled)
    /// are skipped and return `Ok`.
    fn handle(&self, record: &LogRecord) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Flush and release the underlying destination. Later records are dropped.
    fn close(&self) -> Result<()> {
        self.flush()
    }
}

/// Render a JSON value the way the text handlers show attribute values:
/// bare strings unless quoting is needed, JSON for everything else.
pub(crate) fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) if !needs_quotes(s) => s.clone(),
        other => other.to_string(),
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '=' || c == '"')
}

/// Attributes as a JSON object text, keys in insertion order.
pub(crate) fn ordered_attrs_json(record: &LogRecord) -> String {
    let fields: Vec<String> = record
        .attrs
        .iter()
        .map(|(k, v)| format!("{}:{}", serde_json::Value::from(k), v))
        .collect();
    format!("{{{}}}", fields.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_are_quoted_only_when_needed() {
        assert_eq!(display_value(&json!("plain")), "plain");
        assert_eq!(display_value(&json!("two words")), "\"two words\"");
        assert_eq!(display_value(&json!("")), "\"\"");
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&json!({"a": true})), "{\"a\":true}");
    }

    #[test]
    fn ordered_json_keeps_insertion_order() {
        let record = LogRecord::new(Severity::Info, "m")
            .with_attr("zeta", 1)
            .with_attr("alpha", "x");
        assert_eq!(ordered_attrs_json(&record), r#"{"zeta":1,"alpha":"x"}"#);
    }
}
