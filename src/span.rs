//! The public span handle.

use std::sync::Arc;

use crate::model::{Endpoint, SpanKind};
use crate::recorder::SpanRecorder;
use crate::trace_context::SpanContext;

/// A handle to one in-flight span.
///
/// The handle holds no span state of its own; every call forwards to the
/// recorder, which keeps state keyed by the span's context. Clones, and
/// independently created handles with an equal context, therefore address
/// the same span. All methods take `&self`, so a handle can be used from
/// any thread.
///
/// Dropping a handle does nothing; a span is only reported once one of the
/// finish methods is called.
///
/// Mutators return `&Self` so calls can be chained:
///
/// ```
/// # use std::sync::Arc;
/// # use zipkin_recorder::{
/// #     InMemoryReporter, Span, SpanContext, SpanId, SpanKind, SpanRecorder, TraceId,
/// # };
/// # fn main() -> Result<(), zipkin_recorder::Error> {
/// let recorder = Arc::new(
///     SpanRecorder::builder()
///         .with_service_name("frontend")
///         .with_reporter(InMemoryReporter::new())
///         .build()?,
/// );
/// let context = SpanContext::new(TraceId::from(1), SpanId::from(2), None);
///
/// let span = Span::new(context, recorder);
/// span.start().name("get /users").kind(SpanKind::Server);
/// span.tag("http.status_code", "200");
/// span.finish();
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Span {
    context: SpanContext,
    recorder: Arc<SpanRecorder>,
}

impl Span {
    /// Create a handle addressing `context` on `recorder`.
    pub fn new(context: SpanContext, recorder: Arc<SpanRecorder>) -> Self {
        Span { context, recorder }
    }

    /// Identity of the span this handle addresses.
    pub fn context(&self) -> SpanContext {
        self.context
    }

    /// Record the start of the operation at the current time.
    pub fn start(&self) -> &Self {
        self.start_with_timestamp(self.recorder.epoch_micros())
    }

    /// Record the start of the operation at an explicit time, in
    /// microseconds since the UNIX epoch.
    pub fn start_with_timestamp(&self, timestamp: u64) -> &Self {
        self.recorder.start(self.context, timestamp);
        self
    }

    /// Set the operation name, replacing any previous one.
    pub fn name(&self, name: impl Into<String>) -> &Self {
        self.recorder.name(self.context, name.into());
        self
    }

    /// Set the span kind, replacing any previous one.
    pub fn kind(&self, kind: SpanKind) -> &Self {
        self.recorder.kind(self.context, kind);
        self
    }

    /// Attach an annotation at the current time.
    pub fn annotate(&self, value: impl Into<String>) -> &Self {
        self.annotate_with_timestamp(self.recorder.epoch_micros(), value)
    }

    /// Attach an annotation at an explicit time.
    pub fn annotate_with_timestamp(&self, timestamp: u64, value: impl Into<String>) -> &Self {
        self.recorder.annotate(self.context, timestamp, value.into());
        self
    }

    /// Record a tag; a repeated key replaces the previous value. Empty
    /// values are allowed.
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty.
    pub fn tag(&self, key: impl Into<String>, value: impl Into<String>) -> &Self {
        let key = key.into();
        assert!(!key.is_empty(), "tag key is empty");
        self.recorder.tag(self.context, key, value.into());
        self
    }

    /// Record the remote side of the operation.
    pub fn remote_endpoint(&self, endpoint: Endpoint) -> &Self {
        self.recorder.remote_endpoint(self.context, endpoint);
        self
    }

    /// Finish the span at the current time.
    pub fn finish(&self) {
        self.finish_with_timestamp(self.recorder.epoch_micros());
    }

    /// Finish the span at an explicit time; the duration is computed from
    /// the start timestamp when one was recorded.
    pub fn finish_with_timestamp(&self, timestamp: u64) {
        self.recorder.finish(self.context, Some(timestamp), None);
    }

    /// Finish the span with an explicit duration in microseconds, which
    /// takes precedence over any computed value.
    pub fn finish_with_duration(&self, duration: u64) {
        self.recorder.finish(self.context, None, Some(duration));
    }
}
