//! Error types for tree construction.
//!
//! Validation failures (`InvalidInput`, `UnsupportedMetric`) are raised
//! synchronously before any worker starts. Failures observed while workers
//! run are reported as `ConcurrencyFailure` or `Cancelled`; in every case the
//! build is abandoned and no partially built tree is returned.

use thiserror::Error;

/// Errors produced while validating input or building a BK-tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The word list is too short, or contains an empty, non-alphabetic or
    /// duplicate word.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The metric identifier did not match any supported metric.
    #[error("Unsupported metric: '{0}'. Valid metrics: levenshtein (lev), hamming (ham), jaccard (jac), jaro-winkler (jar)")]
    UnsupportedMetric(String),

    /// A worker terminated abnormally, the worker pool could not be started,
    /// or the insertion phase lost track of a word.
    #[error("Concurrency failure: {0}")]
    ConcurrencyFailure(String),

    /// The build was cancelled through its `CancellationToken`.
    #[error("Build cancelled before completion")]
    Cancelled,
}

impl BuildError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn worker(chunk: usize, reason: impl std::fmt::Display) -> Self {
        Self::ConcurrencyFailure(format!("worker for chunk {chunk}: {reason}"))
    }

    /// True for failures that happened after workers were started.
    pub fn is_concurrency_failure(&self) -> bool {
        matches!(self, Self::ConcurrencyFailure(_) | Self::Cancelled)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BuildError>;
