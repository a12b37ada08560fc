/// A timestamped event explaining a point in a span's lifetime.
///
/// Annotations are reported in the exact order they were recorded; the
/// recorder never reorders or deduplicates them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Annotation {
    timestamp: u64,
    value: String,
}

impl Annotation {
    /// Create an annotation from an epoch-microsecond timestamp and a value.
    pub fn new(timestamp: u64, value: impl Into<String>) -> Self {
        Annotation {
            timestamp,
            value: value.into(),
        }
    }

    /// When the event happened, in microseconds since the UNIX epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// What happened at the timestamp.
    pub fn value(&self) -> &str {
        &self.value
    }
}
