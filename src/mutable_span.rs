//! Mutable per-span state, private to the recorder.

use std::collections::HashMap;

use crate::model::{Annotation, Endpoint, SpanKind, SpanRecord};
use crate::trace_context::SpanContext;

/// Accumulates everything known about one in-flight span.
///
/// Carries no synchronization of its own; the recorder wraps each instance
/// in a dedicated mutex and applies every mutation inside that lock.
#[derive(Debug)]
pub(crate) struct MutableSpan {
    context: SpanContext,
    local_endpoint: Endpoint,
    name: Option<String>,
    kind: Option<SpanKind>,
    start_timestamp: Option<u64>,
    finish_timestamp: Option<u64>,
    duration: Option<u64>,
    remote_endpoint: Option<Endpoint>,
    annotations: Vec<Annotation>,
    tags: HashMap<String, String>,
    finished: bool,
}

impl MutableSpan {
    pub(crate) fn new(context: SpanContext, local_endpoint: Endpoint) -> Self {
        MutableSpan {
            context,
            local_endpoint,
            name: None,
            kind: None,
            start_timestamp: None,
            finish_timestamp: None,
            duration: None,
            remote_endpoint: None,
            annotations: Vec::new(),
            tags: HashMap::new(),
            finished: false,
        }
    }

    pub(crate) fn start(&mut self, timestamp: u64) {
        self.start_timestamp = Some(timestamp);
    }

    pub(crate) fn name(&mut self, name: String) {
        self.name = Some(name);
    }

    pub(crate) fn kind(&mut self, kind: SpanKind) {
        self.kind = Some(kind);
    }

    pub(crate) fn annotate(&mut self, timestamp: u64, value: String) {
        self.annotations.push(Annotation::new(timestamp, value));
    }

    pub(crate) fn tag(&mut self, key: String, value: String) {
        self.tags.insert(key, value);
    }

    pub(crate) fn remote_endpoint(&mut self, endpoint: Endpoint) {
        self.remote_endpoint = Some(endpoint);
    }

    /// Record whichever finish facts were supplied and mark the span
    /// finished. The flag is never cleared again; repeated calls merge
    /// their supplied parts last-write-wins.
    pub(crate) fn finish(&mut self, finish_timestamp: Option<u64>, duration: Option<u64>) {
        if let Some(timestamp) = finish_timestamp {
            self.finish_timestamp = Some(timestamp);
        }
        if let Some(duration) = duration {
            self.duration = Some(duration);
        }
        self.finished = true;
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    /// Freeze the accumulated state into a reportable record.
    ///
    /// Duration resolution: an explicitly supplied duration always wins;
    /// otherwise it is `finish - start` when both timestamps are known,
    /// saturating at zero; otherwise it is absent.
    pub(crate) fn to_record(&self) -> SpanRecord {
        let duration = self.duration.or_else(|| {
            match (self.start_timestamp, self.finish_timestamp) {
                (Some(start), Some(finish)) => Some(finish.saturating_sub(start)),
                _ => None,
            }
        });

        SpanRecord {
            context: self.context,
            name: self.name.clone(),
            kind: self.kind,
            timestamp: self.start_timestamp,
            duration,
            local_endpoint: self.local_endpoint.clone(),
            remote_endpoint: self.remote_endpoint.clone(),
            annotations: self.annotations.clone(),
            tags: self.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace_context::{SpanId, TraceId};
    use rstest::rstest;

    fn new_span() -> MutableSpan {
        MutableSpan::new(
            SpanContext::new(TraceId::from(1), SpanId::from(2), None),
            Endpoint::new("tests", None),
        )
    }

    #[rstest]
    #[case::explicit_duration_wins(Some(100), Some(900), Some(500), Some(500))]
    #[case::computed_from_timestamps(Some(100), Some(900), None, Some(800))]
    #[case::finish_before_start_saturates(Some(900), Some(100), None, Some(0))]
    #[case::no_start_no_duration(None, Some(900), None, None)]
    #[case::no_finish_no_duration(Some(100), None, None, None)]
    #[case::explicit_without_timestamps(None, None, Some(250), Some(250))]
    fn duration_merge(
        #[case] start: Option<u64>,
        #[case] finish: Option<u64>,
        #[case] explicit: Option<u64>,
        #[case] expected: Option<u64>,
    ) {
        let mut span = new_span();
        if let Some(start) = start {
            span.start(start);
        }
        span.finish(finish, explicit);

        let record = span.to_record();
        assert_eq!(record.duration, expected);
        assert_eq!(record.timestamp, start);
    }

    #[test]
    fn finished_is_irreversible() {
        let mut span = new_span();
        assert!(!span.is_finished());

        span.finish(None, None);
        assert!(span.is_finished());

        span.finish(Some(10), None);
        assert!(span.is_finished());
        assert_eq!(span.to_record().duration, None);
    }

    #[test]
    fn repeated_finish_merges_parts() {
        let mut span = new_span();
        span.start(100);
        span.finish(Some(900), None);
        span.finish(None, Some(5));

        // The explicit duration from the second call beats the computed one.
        assert_eq!(span.to_record().duration, Some(5));
    }

    #[test]
    fn annotations_keep_recording_order() {
        let mut span = new_span();
        span.annotate(3, "sent".to_string());
        span.annotate(1, "queued".to_string());
        span.annotate(2, "sent".to_string());

        let values: Vec<_> = span
            .to_record()
            .annotations
            .iter()
            .map(|a| (a.timestamp(), a.value().to_string()))
            .collect();
        assert_eq!(
            values,
            vec![
                (3, "sent".to_string()),
                (1, "queued".to_string()),
                (2, "sent".to_string())
            ]
        );
    }

    #[test]
    fn tags_last_write_wins() {
        let mut span = new_span();
        span.tag("http.status_code".to_string(), "200".to_string());
        span.tag("http.status_code".to_string(), "503".to_string());

        let record = span.to_record();
        assert_eq!(record.tags.len(), 1);
        assert_eq!(
            record.tags.get("http.status_code").map(String::as_str),
            Some("503")
        );
    }

    #[test]
    fn setters_overwrite() {
        let mut span = new_span();
        span.start(5);
        span.start(9);
        span.name("first".to_string());
        span.name("second".to_string());
        span.kind(SpanKind::Client);
        span.kind(SpanKind::Server);
        span.finish(None, None);

        let record = span.to_record();
        assert_eq!(record.timestamp, Some(9));
        assert_eq!(record.name.as_deref(), Some("second"));
        assert_eq!(record.kind, Some(SpanKind::Server));
    }
}
