//! The span recording engine.
//!
//! [`SpanRecorder`] owns every span the process has started but not yet
//! finished. Mutations arrive from arbitrary threads, keyed by
//! [`SpanContext`]; the recorder looks up or lazily creates the span's
//! state, applies the mutation under that span's own lock and then checks
//! whether the span just became reportable:
//!
//! ```ascii
//!   handle/caller --mutation--> SpanRecorder --get-or-create--> registry
//!                                    |
//!                                    v
//!                        apply under the span's lock
//!                                    |
//!                         finished? --no--> return
//!                                    |
//!                                   yes
//!                                    |
//!                                    v
//!                  conditional registry removal --won--> Reporter
//! ```
//!
//! ## Timestamps
//!
//! The wall clock is read exactly once, when the recorder is built, and is
//! paired with a monotonic tick reading taken back to back with it. Every
//! later timestamp is the baseline plus the elapsed tick delta, so reported
//! times stay anchored to the epoch while wall-clock adjustments (NTP
//! steps, manual changes) cannot reorder them. The tick source must be
//! monotonic; that precondition is not checked.
//!
//! ## Completion
//!
//! A span is reported exactly once per state object: racing threads may all
//! observe the finished flag, but only the one whose conditional registry
//! removal succeeds converts the state and calls the reporter.
//!
//! Two behaviors are deliberate and worth knowing:
//!
//! - A mutation for an identity whose span was already reported silently
//!   starts a fresh state; finishing that state produces a second,
//!   independent record for the same identity.
//! - A span that is started but never finished stays in the registry for
//!   the recorder's whole lifetime. [`SpanRecorder::pending_spans`] makes
//!   the count observable.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use crate::error::Error;
use crate::model::{Endpoint, SpanKind};
use crate::mutable_span::MutableSpan;
use crate::reporter::Reporter;
use crate::time::{Clock, SystemClock, SystemTicker, Ticker};
use crate::trace_context::SpanContext;

const DEFAULT_SERVICE_NAME: &str = "unknown";

/// Records span mutations keyed by identity and reports each completed span
/// state exactly once.
///
/// All methods take `&self` and may be called concurrently from any thread.
/// Share the recorder through an [`Arc`]; the [`Span`](crate::Span) handle
/// does exactly that.
#[derive(Debug)]
pub struct SpanRecorder {
    local_endpoint: Endpoint,
    reporter: Box<dyn Reporter>,
    ticker: Box<dyn Ticker>,
    create_timestamp: u64,
    create_tick: u64,
    // TODO: bound this map so identities that are never finished cannot
    // grow it without limit; a time-to-live sweep would do.
    spans: DashMap<SpanContext, Arc<Mutex<MutableSpan>>>,
}

impl SpanRecorder {
    /// Start configuring a recorder.
    pub fn builder() -> SpanRecorderBuilder {
        SpanRecorderBuilder::default()
    }

    /// Current wall-clock time in microseconds since the UNIX epoch,
    /// derived from the construction baseline plus the elapsed monotonic
    /// tick delta, truncated to whole microseconds.
    pub fn epoch_micros(&self) -> u64 {
        self.create_timestamp + (self.ticker.tick_nanos() - self.create_tick) / 1000
    }

    /// Number of spans currently held in the registry.
    ///
    /// Started-but-never-finished spans are counted here forever; see the
    /// module docs.
    pub fn pending_spans(&self) -> usize {
        self.spans.len()
    }

    /// Set the start timestamp of the span, replacing any previous one.
    pub fn start(&self, context: SpanContext, timestamp: u64) {
        self.with_span(context, |span| span.start(timestamp));
    }

    /// Set the operation name, replacing any previous one.
    pub fn name(&self, context: SpanContext, name: String) {
        self.with_span(context, |span| span.name(name));
    }

    /// Set the span kind, replacing any previous one.
    pub fn kind(&self, context: SpanContext, kind: SpanKind) {
        self.with_span(context, |span| span.kind(kind));
    }

    /// Append a timestamped annotation; existing annotations are kept.
    pub fn annotate(&self, context: SpanContext, timestamp: u64, value: String) {
        self.with_span(context, |span| span.annotate(timestamp, value));
    }

    /// Record a tag, replacing the value if the key was already present.
    pub fn tag(&self, context: SpanContext, key: String, value: String) {
        self.with_span(context, |span| span.tag(key, value));
    }

    /// Record the remote side of the operation.
    pub fn remote_endpoint(&self, context: SpanContext, endpoint: Endpoint) {
        self.with_span(context, |span| span.remote_endpoint(endpoint));
    }

    /// Mark the span finished, recording an explicit finish timestamp, an
    /// explicit duration, both or neither.
    ///
    /// The reported duration is resolved deterministically: an explicit
    /// duration wins; otherwise finish minus start when both timestamps are
    /// known; otherwise the record carries none.
    pub fn finish(
        &self,
        context: SpanContext,
        finish_timestamp: Option<u64>,
        duration: Option<u64>,
    ) {
        self.with_span(context, |span| span.finish(finish_timestamp, duration));
    }

    /// Fetch or lazily create the state for `context`. Losers of a creation
    /// race adopt the winner's entry, so at most one live state exists per
    /// identity.
    fn state(&self, context: SpanContext) -> Arc<Mutex<MutableSpan>> {
        self.spans
            .entry(context)
            .or_insert_with(|| {
                Arc::new(Mutex::new(MutableSpan::new(
                    context,
                    self.local_endpoint.clone(),
                )))
            })
            .value()
            .clone()
    }

    /// Apply one mutation under the span's lock, then run the completion
    /// check. The registry shard guard is released before the span lock is
    /// taken; the two are never held together here.
    fn with_span<F>(&self, context: SpanContext, f: F)
    where
        F: FnOnce(&mut MutableSpan),
    {
        let span = self.state(context);
        let finished = match span.lock() {
            Ok(mut guard) => {
                f(&mut guard);
                guard.is_finished()
            }
            Err(_) => {
                log::debug!("skipping mutation of span {context:?}: poisoned lock");
                return;
            }
        };

        if finished {
            self.try_report(context, &span);
        }
    }

    /// Completion protocol. Under the span's lock, remove the registry
    /// entry on the condition that it still maps to this exact state; only
    /// the caller whose removal succeeds converts and reports. Racing
    /// finishers that lose the removal do nothing, which makes the report
    /// exactly-once per state object.
    fn try_report(&self, context: SpanContext, span: &Arc<Mutex<MutableSpan>>) {
        let guard = match span.lock() {
            Ok(guard) => guard,
            Err(_) => return,
        };

        let removed = self
            .spans
            .remove_if(&context, |_, current| Arc::ptr_eq(current, span));
        if removed.is_some() {
            self.reporter.report(guard.to_record());
        }
    }
}

impl Drop for SpanRecorder {
    fn drop(&mut self) {
        let pending = self.spans.len();
        if pending > 0 {
            log::debug!("span recorder dropped with {pending} unfinished span(s)");
        }
    }
}

/// Configures and builds a [`SpanRecorder`].
///
/// Obtained from [`SpanRecorder::builder`]. A reporter is required; the
/// clock, ticker and local endpoint have sensible defaults.
#[derive(Debug)]
pub struct SpanRecorderBuilder {
    service_name: String,
    service_addr: Option<SocketAddr>,
    local_endpoint: Option<Endpoint>,
    reporter: Option<Box<dyn Reporter>>,
    clock: Box<dyn Clock>,
    ticker: Box<dyn Ticker>,
}

impl Default for SpanRecorderBuilder {
    fn default() -> Self {
        SpanRecorderBuilder {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            service_addr: None,
            local_endpoint: None,
            reporter: None,
            clock: Box::new(SystemClock::new()),
            ticker: Box::new(SystemTicker::new()),
        }
    }
}

impl SpanRecorderBuilder {
    /// Name of the local service, stamped on every reported span's local
    /// endpoint. Defaults to `"unknown"`.
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Socket address of the local service.
    pub fn with_service_address(mut self, addr: SocketAddr) -> Self {
        self.service_addr = Some(addr);
        self
    }

    /// Use a fully built local endpoint, overriding the service name and
    /// address above.
    pub fn with_local_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.local_endpoint = Some(endpoint);
        self
    }

    /// The sink that receives each finished span. Required.
    pub fn with_reporter<R>(mut self, reporter: R) -> Self
    where
        R: Reporter + 'static,
    {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Wall clock consulted once at build time. Defaults to
    /// [`SystemClock`].
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    /// Monotonic tick source for all derived timestamps. Defaults to
    /// [`SystemTicker`].
    pub fn with_ticker<T>(mut self, ticker: T) -> Self
    where
        T: Ticker + 'static,
    {
        self.ticker = Box::new(ticker);
        self
    }

    /// Build the recorder, capturing the paired wall-clock and tick
    /// baseline that anchors every derived timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingReporter`] if no reporter was configured.
    pub fn build(self) -> Result<SpanRecorder, Error> {
        let reporter = self.reporter.ok_or(Error::MissingReporter)?;
        let local_endpoint = self
            .local_endpoint
            .unwrap_or_else(|| Endpoint::new(self.service_name, self.service_addr));

        // Both readings must describe the same instant; nothing runs
        // between them.
        let create_timestamp = self.clock.epoch_micros();
        let create_tick = self.ticker.tick_nanos();

        Ok(SpanRecorder {
            local_endpoint,
            reporter,
            ticker: self.ticker,
            create_timestamp,
            create_tick,
            spans: DashMap::new(),
        })
    }
}
