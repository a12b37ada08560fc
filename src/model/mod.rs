//! The reportable span model.
//!
//! These are the immutable shapes handed to a [`Reporter`](crate::Reporter)
//! when a span finishes. With the `serialize` feature enabled they
//! serialize to camelCase JSON, with ids rendered as lowercase hex.

mod annotation;
mod endpoint;
mod span;

pub use annotation::Annotation;
pub use endpoint::Endpoint;
pub use span::{SpanKind, SpanRecord};
