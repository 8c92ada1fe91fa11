//! Build configuration.
//!
//! The degree of parallelism is an explicit value rather than something the
//! builder reads from the host, so tests can pin it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Lists at or below this many words are processed as a single chunk.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

/// Emit a progress event every this many inserted words.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

/// Shared flag for cooperative cancellation.
///
/// Workers check it between words; once raised, the build returns
/// [`BuildError::Cancelled`](crate::BuildError::Cancelled).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Configuration for a tree build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Number of chunks (and worker threads) for large inputs
    pub parallelism: usize,
    /// Inputs with at most this many words are built on the calling thread
    pub parallel_threshold: usize,
    /// Inserted-word interval between progress events (0 disables them)
    pub progress_interval: usize,
    #[serde(skip)]
    pub cancel: Option<CancellationToken>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            parallelism: available_parallelism(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            cancel: None,
        }
    }
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single chunk, calling thread only.
    pub fn sequential() -> Self {
        Self::default().with_parallelism(1)
    }

    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

/// Host parallelism, falling back to 1 when it cannot be queried.
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
