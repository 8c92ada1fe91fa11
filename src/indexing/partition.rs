//! Work partitioning for the parallel build phases.
//!
//! Items are dealt round-robin, so chunk sizes differ by at most one.
//! Order inside a chunk follows the input order, which only affects the
//! incidental shape of the tree, never its validity.

use crate::config::DEFAULT_PARALLEL_THRESHOLD;

/// Split `items` into `target_parallelism` round-robin chunks.
///
/// Uses the default threshold: inputs of at most 1000 items come back as a
/// single chunk.
pub fn partition<T: Clone>(items: &[T], target_parallelism: usize) -> Vec<Vec<T>> {
    partition_with_threshold(items, target_parallelism, DEFAULT_PARALLEL_THRESHOLD)
}

/// Split `items` round-robin, or return one chunk when
/// `items.len() <= threshold`.
///
/// The chunk count is clamped to `1..=items.len()`, so no chunk is ever
/// empty unless `items` itself is.
pub fn partition_with_threshold<T: Clone>(
    items: &[T],
    target_parallelism: usize,
    threshold: usize,
) -> Vec<Vec<T>> {
    if items.len() <= threshold {
        return vec![items.to_vec()];
    }

    let num_chunks = target_parallelism.clamp(1, items.len());
    let base = items.len() / num_chunks;
    let mut chunks: Vec<Vec<T>> = (0..num_chunks)
        .map(|_| Vec::with_capacity(base + 1))
        .collect();

    for (item, slot) in items.iter().zip((0..num_chunks).cycle()) {
        chunks[slot].push(item.clone());
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_input_single_chunk() {
        let items: Vec<usize> = (0..1000).collect();
        let chunks = partition(&items, 8);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], items);
    }

    #[test]
    fn test_large_input_round_robin() {
        let items: Vec<usize> = (0..1003).collect();
        let chunks = partition(&items, 4);
        assert_eq!(chunks.len(), 4);
        assert_eq!(&chunks[0][..3], &[0, 4, 8]);
        assert_eq!(&chunks[3][..3], &[3, 7, 11]);

        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![251, 251, 251, 250]);
    }

    #[test]
    fn test_every_item_assigned_once() {
        let items: Vec<usize> = (0..5000).collect();
        let mut seen: Vec<usize> = partition(&items, 7).into_iter().flatten().collect();
        seen.sort_unstable();
        assert_eq!(seen, items);
    }

    #[test]
    fn test_parallelism_clamped() {
        let items: Vec<usize> = (0..5).collect();
        let chunks = partition_with_threshold(&items, 16, 0);
        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| c.len() == 1));

        let chunks = partition_with_threshold(&items, 0, 0);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<usize> = Vec::new();
        assert_eq!(partition(&items, 4), vec![Vec::<usize>::new()]);
    }
}
