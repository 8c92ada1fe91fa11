//! Length-tolerant Hamming distance
//!
//! Classical Hamming distance counts differing positions and is only
//! defined for strings of equal length. The tree indexes words of arbitrary
//! length, so this variant extends it:
//!
//! - equal lengths: number of differing positions
//! - one string contained in the other: the length difference
//! - otherwise: the length difference plus the number of differing
//!   positions over the shared prefix of length `min(len_a, len_b)`
//!
//! The containment rule is checked first, so identical strings (and the
//! empty string against anything) take that branch.
//!
//! # Complexity
//! - Time: O(m*n) worst case for the containment check, O(n) otherwise
//! - Space: O(1)

use super::EditDistance;

/// Length-tolerant Hamming distance calculator
///
/// Stateless calculator - all instances are equivalent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hamming;

impl Hamming {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EditDistance for Hamming {
    fn distance(&self, a: &str, b: &str) -> usize {
        hamming_distance(a, b)
    }

    fn name(&self) -> &'static str {
        "hamming"
    }
}

/// Calculate the length-tolerant Hamming distance between two strings.
#[must_use]
pub fn hamming_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if b.contains(a) || a.contains(b) {
        return a_len.abs_diff(b_len);
    }

    // For equal lengths the difference is zero and this is plain Hamming.
    a_len.abs_diff(b_len) + mismatches(a, b)
}

/// Differing positions over the shared prefix (zip stops at the shorter).
#[inline]
fn mismatches(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).filter(|(ac, bc)| ac != bc).count()
}
