//! Log records and their structured attributes.

use crate::level::Severity;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Ordered key/value attributes with unique keys.
///
/// Inserting an existing key replaces its value in place, keeping the
/// original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, Value)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// One log event, created per log call.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub severity: Severity,
    pub time: DateTime<Utc>,
    pub message: String,
    pub attrs: Attributes,
}

impl LogRecord {
    /// A record stamped with the current UTC time.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            time: Utc::now(),
            message: message.into(),
            attrs: Attributes::new(),
        }
    }

    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key, value);
        self
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        for (k, v) in attrs.entries {
            self.attrs.insert(k, v);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_keep_insertion_order_and_unique_keys() {
        let mut attrs = Attributes::new();
        attrs.insert("zeta", 1);
        attrs.insert("alpha", "two");
        attrs.insert("zeta", 3);

        let keys: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(attrs.get("zeta"), Some(&Value::from(3)));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn record_builder_merges_attrs() {
        let extra: Attributes = [("user", "ada"), ("op", "read")].into_iter().collect();
        let record = LogRecord::new(Severity::Warn, "slow")
            .with_attr("op", "write")
            .with_attrs(extra);

        assert_eq!(record.severity, Severity::Warn);
        assert_eq!(record.attrs.get("op"), Some(&Value::from("read")));
        let keys: Vec<&str> = record.attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["op", "user"]);
    }
}
