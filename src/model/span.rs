use std::collections::HashMap;

use crate::model::{Annotation, Endpoint};
use crate::trace_context::SpanContext;

/// The relationship between the span and the remote side of the operation,
/// when the span describes one half of an RPC or messaging exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SpanKind {
    /// The span covers an outgoing request; timestamp and duration bound the
    /// send and the receipt of the response.
    Client,
    /// The span covers the server side of a request; timestamp and duration
    /// bound receipt and the send of the response.
    Server,
    /// The span covers production of a message to a remote broker.
    Producer,
    /// The span covers consumption of a message from a remote broker.
    Consumer,
}

/// A finished span in its final, immutable form.
///
/// Produced by the recorder exactly once per completed span state and handed
/// to the configured [`Reporter`](crate::Reporter). All timestamps are in
/// microseconds since the UNIX epoch; the duration is in microseconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "camelCase"))]
pub struct SpanRecord {
    /// Identity of the span within its trace.
    pub context: SpanContext,
    /// Operation name, if one was recorded.
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,
    /// Role of the span in a remote exchange, if one was recorded.
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub kind: Option<SpanKind>,
    /// Start time, if the span was explicitly started.
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub timestamp: Option<u64>,
    /// How long the operation took, per the recorder's merge policy.
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub duration: Option<u64>,
    /// The process that recorded the span.
    pub local_endpoint: Endpoint,
    /// The other side of the operation, when one was recorded.
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub remote_endpoint: Option<Endpoint>,
    /// Timestamped events, in recording order.
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "Vec::is_empty")
    )]
    pub annotations: Vec<Annotation>,
    /// Key-value metadata; for repeated keys the last write won.
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "HashMap::is_empty")
    )]
    pub tags: HashMap<String, String>,
}

#[cfg(all(test, feature = "serialize"))]
mod serialize_tests {
    use super::*;
    use crate::trace_context::{SpanId, TraceId};

    #[test]
    fn json_shape() {
        let record = SpanRecord {
            context: SpanContext::new(TraceId::from(1), SpanId::from(2), None),
            name: Some("get /users".to_string()),
            kind: Some(SpanKind::Server),
            timestamp: Some(1),
            duration: Some(10),
            local_endpoint: Endpoint::new("frontend", None),
            remote_endpoint: None,
            annotations: vec![Annotation::new(2, "cache miss")],
            tags: HashMap::new(),
        };

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            "{\"context\":{\"traceId\":\"00000000000000000000000000000001\",\
             \"spanId\":\"0000000000000002\"},\
             \"name\":\"get /users\",\
             \"kind\":\"SERVER\",\
             \"timestamp\":1,\
             \"duration\":10,\
             \"localEndpoint\":{\"serviceName\":\"frontend\"},\
             \"annotations\":[{\"timestamp\":2,\"value\":\"cache miss\"}]}"
        );
    }
}
