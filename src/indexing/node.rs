//! Owned BK-tree nodes.
//!
//! A node exclusively owns its children. Among the children of one node all
//! weights are pairwise distinct; [`TreeNode::add_child`] is the only way
//! to grow a node and it does not check this, because the builder decides
//! placement before it materializes the owned tree.

/// A node of a completed BK-tree.
///
/// `weight` is the distance from this node to its parent. The root's weight
/// is 0 and carries no meaning.
#[derive(Debug)]
pub struct TreeNode {
    pub name: String,
    pub weight: usize,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a childless node.
    pub fn new(name: impl Into<String>, weight: usize) -> Self {
        Self {
            name: name.into(),
            weight,
            children: Vec::new(),
        }
    }

    /// Append a new child and return a reference to it.
    ///
    /// The caller must not reuse a weight already held by a sibling; debug
    /// builds assert it.
    pub fn add_child(&mut self, name: impl Into<String>, weight: usize) -> &mut TreeNode {
        debug_assert!(
            self.child_at(weight).is_none(),
            "'{}' already has a child at weight {weight}",
            self.name
        );
        self.children.push(TreeNode::new(name, weight));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The child attached at `weight`, if any.
    pub fn child_at(&self, weight: usize) -> Option<&TreeNode> {
        self.children.iter().find(|child| child.weight == weight)
    }

    /// Pre-order walk yielding `(node, depth)`; the root has depth 0.
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter {
            stack: vec![(self, 0)],
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a subtree contains at least its own root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Length in edges of the longest root-to-leaf path.
    pub fn max_depth(&self) -> usize {
        self.iter().map(|(_, depth)| depth).max().unwrap_or(0)
    }

    /// Every edge as `(parent name, weight, child name)`, sorted.
    ///
    /// Two trees with equal edge lists are isomorphic.
    pub fn edges(&self) -> Vec<(&str, usize, &str)> {
        let mut edges: Vec<_> = self
            .iter()
            .flat_map(|(node, _)| {
                node.children
                    .iter()
                    .map(move |child| (node.name.as_str(), child.weight, child.name.as_str()))
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// First node found with two children at the same weight, if any.
    pub fn find_weight_collision(&self) -> Option<(&str, usize)> {
        self.iter().find_map(|(node, _)| {
            let mut weights: Vec<usize> = node.children.iter().map(|c| c.weight).collect();
            weights.sort_unstable();
            weights
                .windows(2)
                .find(|pair| pair[0] == pair[1])
                .map(|pair| (node.name.as_str(), pair[0]))
        })
    }
}

impl Drop for TreeNode {
    // Degenerate inputs can produce near-linear trees tens of thousands of
    // levels deep; the derived drop glue would recurse once per level.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Iterator over `(node, depth)` pairs in pre-order.
pub struct TreeIter<'a> {
    stack: Vec<(&'a TreeNode, usize)>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = (&'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        // Reverse so children come out in weight order
        for child in node.children.iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((node, depth))
    }
}
