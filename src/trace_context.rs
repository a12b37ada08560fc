//! Span identity types.
//!
//! A span is identified by the triple of its trace id, its own span id and
//! the id of its parent span (absent for root spans). The triple is the key
//! under which the recorder keeps in-flight span state, so it is cheap to
//! copy, hashable and immutable.

use std::fmt;
use std::num::ParseIntError;

/// A 16-byte value which identifies a given trace.
///
/// The id is considered valid if it contains at least one non-zero byte.
#[derive(Clone, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
pub struct TraceId(u128);

impl TraceId {
    /// Invalid trace id (all zeroes).
    pub const INVALID: TraceId = TraceId(0);

    /// Create a trace id from its representation as a byte array.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        TraceId(u128::from_be_bytes(bytes))
    }

    /// Return the representation of this trace id as a byte array.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    /// Converts a string in base 16 to a trace id.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipkin_recorder::TraceId;
    ///
    /// assert!(TraceId::from_hex("42").is_ok());
    /// assert!(TraceId::from_hex("d5db91206d891ebbd2767b475655ba37").is_ok());
    ///
    /// assert!(TraceId::from_hex("not_hex").is_err());
    /// assert!(TraceId::from_hex("d5db91206d891ebbd2767b475655ba371").is_err()); // too long
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ParseIntError> {
        u128::from_str_radix(hex, 16).map(TraceId)
    }
}

impl From<u128> for TraceId {
    fn from(value: u128) -> Self {
        TraceId(value)
    }
}

impl fmt::Debug for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:032x}", self.0))
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:032x}", self.0))
    }
}

impl fmt::LowerHex for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(feature = "serialize")]
impl serde::Serialize for TraceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&format_args!("{:032x}", self.0))
    }
}

/// An 8-byte value which identifies a given span.
///
/// The id is considered valid if it contains at least one non-zero byte.
#[derive(Clone, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
pub struct SpanId(u64);

impl SpanId {
    /// Invalid span id (all zeroes).
    pub const INVALID: SpanId = SpanId(0);

    /// Create a span id from its representation as a byte array.
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        SpanId(u64::from_be_bytes(bytes))
    }

    /// Return the representation of this span id as a byte array.
    pub const fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Converts a string in base 16 to a span id.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipkin_recorder::SpanId;
    ///
    /// assert!(SpanId::from_hex("42").is_ok());
    /// assert!(SpanId::from_hex("d5db91206d891ebb").is_ok());
    ///
    /// assert!(SpanId::from_hex("not_hex").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ParseIntError> {
        u64::from_str_radix(hex, 16).map(SpanId)
    }
}

impl From<u64> for SpanId {
    fn from(value: u64) -> Self {
        SpanId(value)
    }
}

impl fmt::Debug for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:016x}", self.0))
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:016x}", self.0))
    }
}

impl fmt::LowerHex for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(feature = "serialize")]
impl serde::Serialize for SpanId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&format_args!("{:016x}", self.0))
    }
}

/// Immutable identity of one span within one trace.
///
/// Two mutations belong to the same span exactly when their contexts are
/// equal; the recorder uses the context as its registry key. The context
/// carries no sampling or propagation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "camelCase"))]
pub struct SpanContext {
    trace_id: TraceId,
    span_id: SpanId,
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "Option::is_none")
    )]
    parent_span_id: Option<SpanId>,
}

impl SpanContext {
    /// Construct a span context. Root spans have no parent.
    pub fn new(trace_id: TraceId, span_id: SpanId, parent_span_id: Option<SpanId>) -> Self {
        SpanContext {
            trace_id,
            span_id,
            parent_span_id,
        }
    }

    /// The id of the trace this span belongs to.
    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// The id of this span.
    pub fn span_id(&self) -> SpanId {
        self.span_id
    }

    /// The id of the parent span, if this is not a root span.
    pub fn parent_span_id(&self) -> Option<SpanId> {
        self.parent_span_id
    }

    /// Returns `true` if the trace id and the span id are both valid.
    pub fn is_valid(&self) -> bool {
        self.trace_id != TraceId::INVALID && self.span_id != SpanId::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    fn trace_id_test_data() -> Vec<(TraceId, &'static str, [u8; 16])> {
        vec![
            (TraceId(0), "00000000000000000000000000000000", [0; 16]),
            (TraceId(42), "0000000000000000000000000000002a", [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 42]),
            (TraceId(276252481549705782112643735469157540688), "cfd44aeaa33b9ad54585404711f46350", [207, 212, 74, 234, 163, 59, 154, 213, 69, 133, 64, 71, 17, 244, 99, 80]),
        ]
    }

    #[rustfmt::skip]
    fn span_id_test_data() -> Vec<(SpanId, &'static str, [u8; 8])> {
        vec![
            (SpanId(0), "0000000000000000", [0; 8]),
            (SpanId(42), "000000000000002a", [0, 0, 0, 0, 0, 0, 0, 42]),
            (SpanId(14978759494251739654), "cfdf3e662ee27a06", [207, 223, 62, 102, 46, 226, 122, 6]),
        ]
    }

    #[test]
    fn formatting_and_byte_round_trips() {
        for (id, hex, bytes) in trace_id_test_data() {
            assert_eq!(format!("{id}"), hex);
            assert_eq!(format!("{id:032x}"), hex);
            assert_eq!(id.to_bytes(), bytes);
            assert_eq!(TraceId::from_hex(hex), Ok(id));
            assert_eq!(TraceId::from_bytes(bytes), id);
        }
        for (id, hex, bytes) in span_id_test_data() {
            assert_eq!(format!("{id}"), hex);
            assert_eq!(format!("{id:016x}"), hex);
            assert_eq!(id.to_bytes(), bytes);
            assert_eq!(SpanId::from_hex(hex), Ok(id));
            assert_eq!(SpanId::from_bytes(bytes), id);
        }
    }

    #[test]
    fn context_validity() {
        let valid = SpanContext::new(TraceId::from(1), SpanId::from(1), None);
        assert!(valid.is_valid());

        assert!(!SpanContext::new(TraceId::INVALID, SpanId::from(1), None).is_valid());
        assert!(!SpanContext::new(TraceId::from(1), SpanId::INVALID, None).is_valid());
    }

    #[test]
    fn context_equality_covers_parent() {
        let trace = TraceId::from(7);
        let root = SpanContext::new(trace, SpanId::from(1), None);
        let child = SpanContext::new(trace, SpanId::from(2), Some(SpanId::from(1)));

        assert_ne!(root, child);
        assert_eq!(child, SpanContext::new(trace, SpanId::from(2), Some(SpanId::from(1))));
    }
}
