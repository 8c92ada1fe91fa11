//! Per-node locked tree used while workers are inserting.
//!
//! Every word of the input owns one slot in a flat arena (slot 0 is the
//! root), and every slot carries its own `parking_lot::RwLock` over the map
//! from edge weight to child slot. The lock is created once per node for
//! the whole build and shared by all workers, so exclusion is scoped to the
//! node being mutated:
//!
//! - Looking up a child acquires a shared read lock on that node only
//! - Attaching a child acquires the exclusive write lock and re-checks the
//!   weight, because another worker may have attached one in between
//! - A worker that loses that race descends into the winner's slot and keeps
//!   walking instead of failing
//!
//! Contention is therefore limited to the top levels of the tree, where
//! most readers can proceed concurrently. Once all workers have joined, the
//! arena is turned into an owned [`TreeNode`] hierarchy.

use std::sync::atomic::{AtomicUsize, Ordering};

use ahash::AHashMap;
use parking_lot::RwLock;

use super::node::TreeNode;
use crate::algorithms::EditDistance;

/// Arena slot of the root word.
pub const ROOT: usize = 0;

/// Outcome of one attach attempt at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The word became the child at the requested weight.
    Attached,
    /// Another word already holds that weight; continue from its slot.
    Occupied(usize),
}

/// Where an inserted word ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub parent: usize,
    pub weight: usize,
    /// Edges from the root to the new node.
    pub depth: usize,
}

/// Thread-safe build arena.
///
/// All methods take `&self`; share it across workers by reference.
pub struct SharedTree<'w> {
    words: &'w [&'w str],
    children: Vec<RwLock<AHashMap<usize, usize>>>,
    attached: AtomicUsize,
}

impl<'w> SharedTree<'w> {
    /// Create an arena whose root is `words[0]`.
    pub fn new(words: &'w [&'w str]) -> Self {
        Self {
            words,
            children: (0..words.len()).map(|_| RwLock::new(AHashMap::new())).collect(),
            attached: AtomicUsize::new(0),
        }
    }

    pub fn word(&self, slot: usize) -> &'w str {
        self.words[slot]
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of words attached so far (the root is not counted).
    pub fn attached(&self) -> usize {
        self.attached.load(Ordering::Acquire)
    }

    /// Attach `word` under `parent` at `weight`, unless that weight is taken.
    ///
    /// Acquires a shared read lock on `parent`, and its exclusive write lock
    /// only when the weight is still free.
    pub fn attach_or_descend(&self, parent: usize, weight: usize, word: usize) -> Slot {
        let node = &self.children[parent];

        if let Some(&existing) = node.read().get(&weight) {
            return Slot::Occupied(existing);
        }

        let mut guard = node.write();
        match guard.get(&weight) {
            // Lost the race between dropping the read lock and taking the write lock
            Some(&existing) => Slot::Occupied(existing),
            None => {
                guard.insert(weight, word);
                self.attached.fetch_add(1, Ordering::AcqRel);
                Slot::Attached
            }
        }
    }

    /// Walk from the root and attach `word`.
    ///
    /// `root_distance` is the precomputed distance from the word to the root;
    /// every deeper level computes its distance with `metric`.
    pub fn insert<D: EditDistance + ?Sized>(
        &self,
        word: usize,
        root_distance: usize,
        metric: &D,
    ) -> Placement {
        let text = self.words[word];
        let mut current = ROOT;
        let mut distance = root_distance;
        let mut depth = 1;

        loop {
            match self.attach_or_descend(current, distance, word) {
                Slot::Attached => {
                    return Placement {
                        parent: current,
                        weight: distance,
                        depth,
                    };
                }
                Slot::Occupied(next) => {
                    current = next;
                    distance = metric.distance(text, self.words[next]);
                    depth += 1;
                }
            }
        }
    }

    /// Materialize the owned tree.
    ///
    /// Must only be called after every worker has joined. Slots that were
    /// never attached are not part of the result. Returns `None` for an
    /// empty arena.
    pub fn into_tree(self) -> Option<TreeNode> {
        if self.words.is_empty() {
            return None;
        }

        let words = self.words;
        let mut children: Vec<Vec<(usize, usize)>> = self
            .children
            .into_iter()
            .map(|lock| {
                let mut edges: Vec<(usize, usize)> = lock.into_inner().into_iter().collect();
                edges.sort_unstable();
                edges
            })
            .collect();

        // Pre-order slot list; reversed, every node follows all of its descendants.
        let mut weights = vec![0usize; words.len()];
        let mut preorder = Vec::with_capacity(words.len());
        let mut stack = vec![ROOT];
        while let Some(slot) = stack.pop() {
            preorder.push(slot);
            for &(weight, child) in &children[slot] {
                weights[child] = weight;
                stack.push(child);
            }
        }

        let mut built: Vec<Option<TreeNode>> = (0..words.len()).map(|_| None).collect();
        for &slot in preorder.iter().rev() {
            let mut node = TreeNode::new(words[slot], weights[slot]);
            node.children = std::mem::take(&mut children[slot])
                .into_iter()
                .filter_map(|(_, child)| built[child].take())
                .collect();
            built[slot] = Some(node);
        }

        built[ROOT].take()
    }
}
