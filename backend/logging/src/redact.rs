//! Redaction of phone numbers, API keys and bearer tokens before rendering.

use crate::error::Result;
use crate::handler::Handler;
use crate::level::Severity;
use crate::record::LogRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

static TELEPHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});
static API_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});

pub const PHONE_PLACEHOLDER: &str = "[REDACTED_PHONE]";
pub const TOKEN_PLACEHOLDER: &str = "[REDACTED_TOKEN]";

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> Cow<'_, str> {
    let phones = TELEPHONE_RE.replace_all(input, PHONE_PLACEHOLDER);
    if !API_KEY_RE.is_match(&phones) {
        return phones;
    }
    Cow::Owned(API_KEY_RE.replace_all(&phones, TOKEN_PLACEHOLDER).into_owned())
}

fn redact_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            if let Cow::Owned(clean) = redact_sensitive_data(s) {
                *s = clean;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        Value::Object(map) => map.values_mut().for_each(redact_value),
        _ => {}
    }
}

/// Scrubs the message and every string attribute, then forwards to `inner`.
#[derive(Debug)]
pub struct RedactingHandler {
    inner: Arc<dyn Handler>,
}

impl RedactingHandler {
    pub fn new(inner: Arc<dyn Handler>) -> Self {
        Self { inner }
    }
}

impl Handler for RedactingHandler {
    fn enabled(&self, severity: Severity) -> bool {
        self.inner.enabled(severity)
    }

    fn handle(&self, record: &LogRecord) -> Result<()> {
        if !self.inner.enabled(record.severity) {
            return Ok(());
        }
        let mut clean = record.clone();
        if let Cow::Owned(message) = redact_sensitive_data(&record.message) {
            clean.message = message;
        }
        for (_, value) in clean.attrs.iter_mut() {
            redact_value(value);
        }
        self.inner.handle(&clean)
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    fn close(&self) -> Result<()> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Destination, JsonHandler, SharedBuffer};
    use serde_json::json;

    #[test]
    fn test_redaction() {
        let raw = "Sending to +1-555-123-4567 with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("+1-555-123-4567"));
        assert!(!clean.contains("Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(clean.contains(PHONE_PLACEHOLDER));
        assert!(clean.contains(TOKEN_PLACEHOLDER));
    }

    #[test]
    fn clean_text_is_borrowed() {
        assert!(matches!(redact_sensitive_data("nothing secret"), Cow::Borrowed(_)));
    }

    #[test]
    fn handler_scrubs_message_and_nested_attrs() {
        let buf = SharedBuffer::new();
        let dest = Destination::writer("buf", buf.clone());
        let inner = Arc::new(JsonHandler::new(dest, Severity::Info));
        let handler = RedactingHandler::new(inner);

        let key = format!("sk-{}", "a".repeat(40));
        let record = LogRecord::new(Severity::Info, format!("using {key}"))
            .with_attr("headers", json!({"auth": "Bearer abc.def"}))
            .with_attr("count", 2);
        handler.handle(&record).unwrap();

        let out = buf.contents();
        assert!(!out.contains(&key));
        assert!(!out.contains("abc.def"));
        assert!(out.contains("\"count\":2"));
        // The caller's record is untouched.
        assert!(record.message.contains(&key));
    }
}
