//! Errors returned by this crate.

use std::sync::PoisonError;

use thiserror::Error;

/// Errors returned by the recorder builder and the stock reporters.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A reporter is required before a recorder can be built.
    #[error("span reporter must be configured before building the recorder")]
    MissingReporter,

    /// Failure that does not fit any other variant.
    #[error("{0}")]
    Other(String),
}

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Error::Other(err.to_string())
    }
}
