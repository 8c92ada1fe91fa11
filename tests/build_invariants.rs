//! Invariant tests for concurrent tree construction.
//!
//! These run many builds with varying chunk counts to catch races:
//! - No node has two children at the same weight
//! - Every word is present exactly once (node_count == word count)
//! - Single-chunk builds are reproducible edge-for-edge

use bkgen::algorithms::levenshtein;
use bkgen::{
    build_with_config, BkTreeBuilder, BuildConfig, BuildError, CancellationToken, EditDistance,
    Metric, TreeNode,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

fn assert_valid(root: &TreeNode, words: &[String]) {
    assert!(
        root.find_weight_collision().is_none(),
        "weight collision: {:?}",
        root.find_weight_collision()
    );
    let names: Vec<&str> = root.iter().map(|(n, _)| n.name.as_str()).collect();
    let unique: HashSet<&str> = names.iter().copied().collect();
    assert_eq!(names.len(), words.len(), "node count differs from word count");
    assert_eq!(unique.len(), words.len(), "a word appears twice");
    assert!(words.iter().all(|w| unique.contains(w.as_str())));
}

/// Deterministic pseudo-random vocabulary so failures reproduce.
fn vocabulary(n: usize, seed: u64) -> Vec<String> {
    let mut state = seed | 1;
    let mut seen = HashSet::new();
    let mut words = Vec::with_capacity(n);
    while words.len() < n {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let len = 2 + (state % 7) as usize;
        let word: String = (0..len)
            .map(|i| (b'a' + ((state >> (i * 5)) % 26) as u8) as char)
            .collect();
        if seen.insert(word.clone()) {
            words.push(word);
        }
    }
    words.sort();
    words
}

#[test]
fn repeated_parallel_builds_keep_invariant() {
    let words = vocabulary(2500, 0x5eed);
    for trial in 0..100 {
        let parallelism = 1 + trial % 16;
        let metric = Metric::ALL[trial % Metric::ALL.len()];
        let config = BuildConfig::new().with_parallelism(parallelism);
        let output = build_with_config(&words, metric, config).unwrap();

        assert_eq!(output.node_count, words.len(), "trial {trial} ({metric})");
        assert_eq!(output.chunks, parallelism);
        assert_eq!(output.max_depth, output.root.max_depth());
        assert_valid(&output.root, &words);
    }
}

#[test]
fn sequential_builds_are_isomorphic() {
    let words = vocabulary(1800, 42);
    for metric in Metric::ALL {
        let first = build_with_config(&words, metric, BuildConfig::sequential()).unwrap();
        let second = build_with_config(&words, metric, BuildConfig::sequential()).unwrap();
        assert_eq!(first.root.edges(), second.root.edges(), "{metric}");
    }
}

#[test]
fn small_lists_use_one_chunk() {
    let words = vocabulary(1000, 7);
    let config = BuildConfig::new().with_parallelism(8);
    let output = build_with_config(&words, Metric::Levenshtein, config).unwrap();
    assert_eq!(output.chunks, 1);
    assert_eq!(output.node_count, 1000);
}

#[test]
fn root_is_first_word() {
    let words = vocabulary(50, 3);
    let output = build_with_config(&words, Metric::Hamming, BuildConfig::sequential()).unwrap();
    assert_eq!(output.root.name, words[0]);
    assert_eq!(output.root.weight, 0);
}

#[test]
fn edge_weights_match_metric() {
    let words = vocabulary(1200, 11);
    for metric in Metric::ALL {
        let config = BuildConfig::new().with_parallelism(4);
        let output = build_with_config(&words, metric, config).unwrap();
        for (node, _) in output.root.iter() {
            for child in &node.children {
                assert_eq!(child.weight, metric.distance(&child.name, &node.name));
            }
        }
    }
}

#[test]
fn cancellation_aborts_whole_build() {
    let words = vocabulary(3000, 99);
    let token = CancellationToken::new();
    token.cancel();
    let config = BuildConfig::new()
        .with_parallelism(4)
        .with_cancellation(token);
    assert_eq!(
        build_with_config(&words, Metric::Levenshtein, config).unwrap_err(),
        BuildError::Cancelled
    );
}

/// Levenshtein that raises a cancellation token on its `trip_at`-th call.
struct CancelAfter {
    calls: AtomicUsize,
    trip_at: usize,
    token: CancellationToken,
}

impl EditDistance for CancelAfter {
    fn distance(&self, a: &str, b: &str) -> usize {
        if self.calls.fetch_add(1, Ordering::Relaxed) + 1 == self.trip_at {
            self.token.cancel();
        }
        levenshtein(a, b)
    }

    fn name(&self) -> &'static str {
        "cancel_after"
    }
}

#[test]
fn cancellation_while_running_aborts_build() {
    let words = vocabulary(3000, 7);
    // 100 trips during root distances, 4000 during insertion (after 2999 root calls)
    for trip_at in [100, 4000] {
        let token = CancellationToken::new();
        let metric = CancelAfter {
            calls: AtomicUsize::new(0),
            trip_at,
            token: token.clone(),
        };
        let builder = BkTreeBuilder::with_metric(metric).config(
            BuildConfig::new()
                .with_parallelism(4)
                .with_cancellation(token.clone()),
        );

        assert_eq!(builder.build(&words).unwrap_err(), BuildError::Cancelled, "trip at {trip_at}");
        assert!(token.is_cancelled());
    }
}

#[test]
fn unsupported_metric_rejected_before_build() {
    assert!(matches!(
        "soundex".parse::<Metric>(),
        Err(BuildError::UnsupportedMetric(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn random_lists_and_chunk_counts(
        words in prop::collection::hash_set("[a-z]{2,8}", 2..400),
        parallelism in 1usize..12,
        metric_index in 0usize..4,
    ) {
        let mut words: Vec<String> = words.into_iter().collect();
        words.sort();
        let metric = Metric::ALL[metric_index];
        let config = BuildConfig::new()
            .with_parallelism(parallelism)
            .with_parallel_threshold(0);

        let output = build_with_config(&words, metric, config).unwrap();

        prop_assert_eq!(output.node_count, words.len());
        prop_assert_eq!(output.chunks, parallelism.min(words.len() - 1));
        prop_assert!(output.root.find_weight_collision().is_none());
        prop_assert_eq!(output.root.len(), words.len());
    }
}
