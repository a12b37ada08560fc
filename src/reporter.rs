//! The sink that receives finished spans.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::Error;
use crate::model::SpanRecord;

/// Receives each finished span exactly once.
///
/// Reporters are called synchronously on the thread whose mutation finished
/// the span, while that span's internal lock is held. Implementations should
/// hand the record off quickly rather than block, and must not call back
/// into the recorder for the same identity.
pub trait Reporter: Send + Sync + fmt::Debug {
    /// Accept a finished span.
    ///
    /// Delivery is fire-and-forget; implementations own their failure
    /// handling.
    fn report(&self, span: SpanRecord);
}

/// A reporter that discards every span.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReporter;

impl NoopReporter {
    /// Create a reporter that drops everything it receives.
    pub fn new() -> Self {
        NoopReporter
    }
}

impl Reporter for NoopReporter {
    fn report(&self, _span: SpanRecord) {}
}

/// A reporter that pretty-prints every span to stderr.
///
/// Intended for local debugging, not production use.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Create a reporter that prints received spans to stderr.
    pub fn new() -> Self {
        ConsoleReporter
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, span: SpanRecord) {
        eprintln!("{span:#?}");
    }
}

/// Stores finished spans in memory for later inspection.
///
/// Cloning is shallow: clones share the same backing storage, so one copy
/// can be handed to the recorder while another keeps access to everything
/// reported. Mostly useful in tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryReporter {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
}

impl InMemoryReporter {
    /// Create an empty in-memory reporter.
    pub fn new() -> Self {
        InMemoryReporter::default()
    }

    /// All spans reported so far, in reporting order.
    pub fn finished_spans(&self) -> Result<Vec<SpanRecord>, Error> {
        let spans = self.spans.lock().map_err(Error::from)?;
        Ok(spans.clone())
    }

    /// Discard every stored span.
    pub fn reset(&self) {
        if let Ok(mut spans) = self.spans.lock() {
            spans.clear();
        }
    }
}

impl Reporter for InMemoryReporter {
    fn report(&self, span: SpanRecord) {
        if let Ok(mut spans) = self.spans.lock() {
            spans.push(span);
        }
    }
}
