//! BK-tree (Burkhard-Keller tree) construction
//!
//! A BK-tree keys every edge by the distance between the two words it
//! joins; no node has two children at the same distance. Building one
//! from a word list runs in two phases separated by a full join:
//!
//! 1. **Root distances.** The list is partitioned into chunks and every
//!    word's distance to the root (the first word) is computed
//!    independently. Each worker fills a local list; the lists are merged
//!    into a read-only [`DistanceCache`] once all workers have joined.
//! 2. **Insertion.** Workers walk the tree from the root for every word of
//!    their chunk, reusing the cached root distance at the first level and
//!    computing the rest on the way down. Attachment is serialized per node
//!    by [`SharedTree`].
//!
//! A word moves from pending, to having its root distance cached, to being
//! inserted. Insertion refuses a word that is missing from the cache, and
//! the build only succeeds once every word has been inserted exactly once.
//!
//! Concurrent builds may produce different tree shapes; a build on a single
//! chunk is deterministic.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use ahash::AHashMap;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::node::TreeNode;
use super::partition::partition_with_threshold;
use super::threadsafe::{SharedTree, ROOT};
use crate::algorithms::{EditDistance, Metric};
use crate::config::BuildConfig;
use crate::error::{BuildError, Result};
use crate::wordlist;

/// Distance from every non-root word to the root.
///
/// Written once per word during the first phase, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DistanceCache<'w> {
    distances: AHashMap<&'w str, usize>,
}

impl<'w> DistanceCache<'w> {
    fn from_parts(parts: Vec<Vec<(&'w str, usize)>>) -> Self {
        let capacity = parts.iter().map(Vec::len).sum();
        let mut distances = AHashMap::with_capacity(capacity);
        for (word, distance) in parts.into_iter().flatten() {
            distances.insert(word, distance);
        }
        Self { distances }
    }

    pub fn get(&self, word: &str) -> Option<usize> {
        self.distances.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// A completed tree and its statistics.
#[derive(Debug)]
pub struct BuildOutput {
    pub root: TreeNode,
    /// Edges on the longest root-to-leaf path
    pub max_depth: usize,
    /// Root plus every attached word
    pub node_count: usize,
    /// Name of the metric the tree was built with
    pub metric: &'static str,
    /// Number of chunks the word list was split into
    pub chunks: usize,
}

impl BuildOutput {
    pub fn stats(&self) -> BuildStats {
        BuildStats {
            metric: self.metric,
            root: self.root.name.clone(),
            node_count: self.node_count,
            max_depth: self.max_depth,
            chunks: self.chunks,
        }
    }
}

/// Serializable summary for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub metric: &'static str,
    pub root: String,
    pub node_count: usize,
    pub max_depth: usize,
    pub chunks: usize,
}

/// Builds BK-trees with a fixed metric and configuration.
///
/// # Example
/// ```
/// use bkgen::{BkTreeBuilder, Metric};
///
/// let words = ["book", "books", "boo", "cake", "cook"];
/// let output = BkTreeBuilder::new(Metric::Levenshtein).build(&words).unwrap();
/// assert_eq!(output.node_count, 5);
/// assert_eq!(output.root.name, "book");
/// ```
#[derive(Clone)]
pub struct BkTreeBuilder {
    metric: Arc<dyn EditDistance>,
    config: BuildConfig,
}

impl BkTreeBuilder {
    /// Builder for one of the built-in metrics.
    pub fn new(metric: Metric) -> Self {
        Self::with_metric(metric)
    }

    /// Builder for a metric given by name (`lev`, `ham`, `jac`, `jar`, ...).
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse::<Metric>().map(Self::new)
    }

    /// Builder for any [`EditDistance`] implementation.
    pub fn with_metric<T: EditDistance + 'static>(metric: T) -> Self {
        Self::with_metric_arc(Arc::new(metric))
    }

    /// Builder sharing an existing metric instance.
    pub fn with_metric_arc(metric: Arc<dyn EditDistance>) -> Self {
        Self {
            metric,
            config: BuildConfig::default(),
        }
    }

    #[must_use]
    pub fn config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    pub fn metric_name(&self) -> &'static str {
        self.metric.name()
    }

    /// Build a tree rooted at `words[0]`.
    ///
    /// Input is validated before any worker starts. Either every word ends
    /// up in the tree or an error is returned.
    pub fn build<S: AsRef<str>>(&self, words: &[S]) -> Result<BuildOutput> {
        wordlist::validate(words)?;
        let words: Vec<&str> = words.iter().map(AsRef::as_ref).collect();

        let started = Instant::now();
        let metric = self.metric_name();
        info!(words = words.len(), metric, root = words[ROOT], "Building BK-tree");

        let slots: Vec<usize> = (1..words.len()).collect();
        let chunks = partition_with_threshold(
            &slots,
            self.config.parallelism,
            self.config.parallel_threshold,
        );
        debug!(
            chunks = chunks.len(),
            largest = chunks.iter().map(Vec::len).max().unwrap_or(0),
            smallest = chunks.iter().map(Vec::len).min().unwrap_or(0),
            "Partitioned word list"
        );

        let pool = if chunks.len() > 1 {
            Some(build_pool(chunks.len())?)
        } else {
            None
        };

        let cache = self.root_distances(&words, &chunks, pool.as_ref())?;
        debug!(cached = cache.len(), "Root distances computed");

        let tree = SharedTree::new(&words);
        let deepest = self.insert_all(&tree, &cache, &chunks, pool.as_ref())?;

        let inserted = tree.attached();
        if inserted != slots.len() {
            return Err(BuildError::ConcurrencyFailure(format!(
                "{inserted} of {} words were inserted",
                slots.len()
            )));
        }

        let root = tree.into_tree().ok_or_else(|| {
            BuildError::ConcurrencyFailure("tree arena was empty after insertion".to_string())
        })?;
        let max_depth = root.max_depth();
        if max_depth != deepest {
            return Err(BuildError::ConcurrencyFailure(format!(
                "tree depth {max_depth} does not match deepest insertion {deepest}"
            )));
        }
        let node_count = inserted + 1;

        info!(
            node_count,
            max_depth,
            metric,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "BK-tree built"
        );

        Ok(BuildOutput {
            root,
            max_depth,
            node_count,
            metric,
            chunks: chunks.len(),
        })
    }

    /// First phase: every word's distance to the root.
    fn root_distances<'w>(
        &self,
        words: &[&'w str],
        chunks: &[Vec<usize>],
        pool: Option<&ThreadPool>,
    ) -> Result<DistanceCache<'w>> {
        let root = words[ROOT];
        let metric = &*self.metric;

        let parts = self.run_phase(chunks, pool, |_, chunk, stop| {
            let mut local = Vec::with_capacity(chunk.len());
            for &slot in chunk {
                if self.config.is_cancelled() {
                    return Err(BuildError::Cancelled);
                }
                if stop.load(Ordering::Acquire) {
                    break;
                }
                let word = words[slot];
                local.push((word, metric.distance(word, root)));
            }
            Ok(local)
        })?;

        Ok(DistanceCache::from_parts(parts))
    }

    /// Second phase: walk-and-attach for every word.
    ///
    /// Returns the depth of the deepest placement.
    fn insert_all(
        &self,
        tree: &SharedTree<'_>,
        cache: &DistanceCache<'_>,
        chunks: &[Vec<usize>],
        pool: Option<&ThreadPool>,
    ) -> Result<usize> {
        let metric = &*self.metric;
        let total = tree.len() - 1;
        let interval = self.config.progress_interval;
        let processed = AtomicUsize::new(0);
        let deepest = AtomicUsize::new(0);

        self.run_phase(chunks, pool, |index, chunk, stop| {
            for &slot in chunk {
                if self.config.is_cancelled() {
                    return Err(BuildError::Cancelled);
                }
                if stop.load(Ordering::Acquire) {
                    break;
                }
                let word = tree.word(slot);
                let root_distance = cache.get(word).ok_or_else(|| {
                    BuildError::worker(index, format!("word '{word}' has no cached root distance"))
                })?;
                let placement = tree.insert(slot, root_distance, metric);
                trace!(
                    word,
                    parent = tree.word(placement.parent),
                    weight = placement.weight,
                    depth = placement.depth,
                    "Attached"
                );
                deepest.fetch_max(placement.depth, Ordering::Relaxed);

                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if interval > 0 && done % interval == 0 {
                    info!(
                        inserted = done,
                        total,
                        depth = deepest.load(Ordering::Relaxed),
                        "Insertion progress"
                    );
                }
            }
            Ok(())
        })?;

        Ok(deepest.into_inner())
    }

    /// Run `work` over every chunk, on `pool` when given and on the calling
    /// thread otherwise, and join all of them.
    ///
    /// A panicking worker becomes a `ConcurrencyFailure`. The first failure
    /// raises `stop` so the remaining workers wind down early; the reported
    /// error is the first one in chunk order.
    fn run_phase<T, F>(
        &self,
        chunks: &[Vec<usize>],
        pool: Option<&ThreadPool>,
        work: F,
    ) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize, &[usize], &AtomicBool) -> Result<T> + Sync,
    {
        let stop = AtomicBool::new(false);

        let run = |(index, chunk): (usize, &Vec<usize>)| -> Result<T> {
            let result = panic::catch_unwind(AssertUnwindSafe(|| work(index, chunk, &stop)))
                .unwrap_or_else(|payload| Err(BuildError::worker(index, panic_message(&*payload))));
            if result.is_err() {
                stop.store(true, Ordering::Release);
            }
            result
        };

        let results: Vec<Result<T>> = match pool {
            Some(pool) => pool.install(|| chunks.par_iter().enumerate().map(&run).collect()),
            None => chunks.iter().enumerate().map(&run).collect(),
        };

        let outcome = results.into_iter().collect::<Result<Vec<T>>>();
        if let Err(BuildError::Cancelled) = &outcome {
            warn!("BK-tree build cancelled");
        }
        outcome
    }
}

/// Build a tree with a built-in metric and the default configuration.
pub fn build<S: AsRef<str>>(words: &[S], metric: Metric) -> Result<BuildOutput> {
    BkTreeBuilder::new(metric).build(words)
}

/// Build a tree with a built-in metric and an explicit configuration.
pub fn build_with_config<S: AsRef<str>>(
    words: &[S],
    metric: Metric,
    config: BuildConfig,
) -> Result<BuildOutput> {
    BkTreeBuilder::new(metric).config(config).build(words)
}

fn build_pool(threads: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("bkgen-worker-{i}"))
        .build()
        .map_err(|e| BuildError::ConcurrencyFailure(format!("could not start worker pool: {e}")))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}
