//! # Zipkin Span Recorder
//!
//! An in-process span-lifecycle engine for Zipkin-style distributed
//! tracing. The [`SpanRecorder`] tracks every span the application has
//! started but not yet finished, accepts incremental mutations from any
//! thread, assigns wall-clock-anchored but monotonically derived
//! timestamps, and hands each finished span to a [`Reporter`] exactly once.
//!
//! Trace-context propagation, sampling, id generation and the transport of
//! reported spans are out of scope: identities arrive from the caller as
//! [`SpanContext`] values, and finished [`SpanRecord`]s leave through the
//! configured reporter.
//!
//! ## Quickstart
//!
//! ```
//! use std::sync::Arc;
//! use zipkin_recorder::{
//!     InMemoryReporter, Span, SpanContext, SpanId, SpanKind, SpanRecorder, TraceId,
//! };
//!
//! fn main() -> Result<(), zipkin_recorder::Error> {
//!     let reporter = InMemoryReporter::new();
//!     let recorder = Arc::new(
//!         SpanRecorder::builder()
//!             .with_service_name("frontend")
//!             .with_reporter(reporter.clone())
//!             .build()?,
//!     );
//!
//!     // Identities come from your propagation layer.
//!     let context = SpanContext::new(TraceId::from(0x0123), SpanId::from(0x4567), None);
//!
//!     let span = Span::new(context, recorder);
//!     span.start().name("get /users").kind(SpanKind::Server);
//!     span.annotate("cache miss");
//!     span.finish();
//!
//!     assert_eq!(reporter.finished_spans()?.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Timestamps
//!
//! The wall clock is consulted exactly once, when the recorder is built.
//! Every later timestamp is derived from a monotonic ticker against that
//! baseline, so spans sort correctly even when the system clock is stepped
//! mid-trace. Supply your own [`Clock`] and [`Ticker`] through the builder
//! to control time in tests.
//!
//! ## Known limitations
//!
//! A span that is started but never finished is kept in the recorder's
//! registry indefinitely, and a mutation arriving after a span was reported
//! silently starts a fresh span under the same identity. Both behaviors are
//! documented in detail on [`SpanRecorder`].
//!
//! ## Crate Feature Flags
//!
//! - `serialize`: derive `serde::Serialize` for the record model; ids
//!   render as lowercase hex and fields as camelCase.
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(test, deny(warnings))]

mod error;
mod model;
mod mutable_span;
mod recorder;
mod reporter;
mod span;
mod time;
mod trace_context;

pub use error::Error;
pub use model::{Annotation, Endpoint, SpanKind, SpanRecord};
pub use recorder::{SpanRecorder, SpanRecorderBuilder};
pub use reporter::{ConsoleReporter, InMemoryReporter, NoopReporter, Reporter};
pub use span::Span;
pub use time::{Clock, SystemClock, SystemTicker, Ticker};
pub use trace_context::{SpanContext, SpanId, TraceId};
