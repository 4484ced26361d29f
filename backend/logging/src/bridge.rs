//! `tracing` integration.
//!
//! [`HandlerLayer`] turns `tracing` events into [`LogRecord`]s so that
//! `tracing::info!` call sites reach the same destinations as the facade.

use crate::error::{LogError, Result};
use crate::handler::Handler;
use crate::level::Severity;
use crate::logger::Logger;
use crate::record::{Attributes, LogRecord};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// A `tracing_subscriber` layer delivering events to a [`Handler`].
#[derive(Debug, Clone)]
pub struct HandlerLayer {
    handler: Arc<dyn Handler>,
}

impl HandlerLayer {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    pub fn from_logger(logger: &Logger) -> Self {
        Self::new(logger.shared_handler())
    }
}

impl<S: Subscriber> Layer<S> for HandlerLayer {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.handler.enabled(Severity::from(*metadata.level()))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = Severity::from(*metadata.level());
        if !self.handler.enabled(severity) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        // An event field named `target` wins over the callsite target.
        if visitor.attrs.get("target").is_none() {
            visitor.attrs.insert("target", metadata.target());
        }
        let message = visitor.message.unwrap_or_default();
        let record = LogRecord::new(severity, message).with_attrs(visitor.attrs);
        if let Err(e) = self.handler.handle(&record) {
            eprintln!("logging: {e}");
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    attrs: Attributes,
}

impl FieldVisitor {
    fn put(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else {
            self.attrs.insert(field.name(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, Value::from(format!("{value:?}")));
    }
}

impl Logger {
    /// Install this logger as the process-wide `tracing` subscriber.
    ///
    /// `RUST_LOG`, when set, further narrows what reaches the logger. Fails
    /// if a global subscriber is already installed.
    pub fn install_tracing(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env().ok();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(HandlerLayer::from_logger(self))
            .try_init()
            .map_err(|e| LogError::Subscriber(e.to_string()))
    }
}
