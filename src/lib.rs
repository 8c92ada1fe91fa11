//! bkgen - concurrent BK-tree construction
//!
//! Indexes a vocabulary of words into a Burkhard-Keller tree under a
//! selectable string metric.
//!
//! # Features
//! - Four built-in metrics: Levenshtein, length-tolerant Hamming, letter-set
//!   Jaccard score and Jaro-Winkler score, all returning integer weights
//! - Two-phase parallel build (root distances, then insertion) over
//!   round-robin chunks
//! - Per-node locking that keeps at most one child per weight under
//!   concurrent insertion
//! - Cooperative cancellation and fail-fast error reporting
//!
//! # Example
//! ```
//! use bkgen::{build, Metric, WordList};
//!
//! let words = WordList::parse("cook book books boo cake").unwrap();
//! let output = build(words.as_slice(), Metric::Levenshtein).unwrap();
//!
//! assert_eq!(output.root.name, "boo");
//! assert_eq!(output.node_count, 5);
//! assert!(output.root.find_weight_collision().is_none());
//! ```

pub mod algorithms;
pub mod config;
pub mod error;
pub mod indexing;
pub mod wordlist;

pub use algorithms::{EditDistance, Metric};
pub use config::{BuildConfig, CancellationToken};
pub use error::{BuildError, Result};
pub use indexing::{
    build, build_with_config, partition, BkTreeBuilder, BuildOutput, BuildStats, DistanceCache,
    TreeNode,
};
pub use wordlist::WordList;
