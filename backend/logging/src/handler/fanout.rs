//! Delivery of one record to several handlers.

use super::Handler;
use crate::error::{LogError, Result};
use crate::level::Severity;
use crate::record::LogRecord;
use std::sync::Arc;

/// Sends every record to every child handler.
///
/// A failing child never stops delivery to the others; the first error
/// encountered is returned once all children have been tried. The same
/// policy applies to `flush` and `close`.
#[derive(Debug, Clone)]
pub struct FanOutHandler {
    handlers: Vec<Arc<dyn Handler>>,
}

impl FanOutHandler {
    pub fn new(handlers: Vec<Arc<dyn Handler>>) -> Result<Self> {
        if handlers.is_empty() {
            return Err(LogError::NoHandlers);
        }
        Ok(Self { handlers })
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn each(&self, mut op: impl FnMut(&dyn Handler) -> Result<()>) -> Result<()> {
        let mut first_err = None;
        for handler in &self.handlers {
            if let Err(e) = op(handler.as_ref()) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl Handler for FanOutHandler {
    fn enabled(&self, severity: Severity) -> bool {
        self.handlers.iter().any(|h| h.enabled(severity))
    }

    fn handle(&self, record: &LogRecord) -> Result<()> {
        if !self.enabled(record.severity) {
            return Ok(());
        }
        self.each(|h| h.handle(record))
    }

    fn flush(&self) -> Result<()> {
        self.each(|h| h.flush())
    }

    fn close(&self) -> Result<()> {
        self.each(|h| h.close())
    }
}
