//! Levenshtein (edit) distance implementation
//!
//! Unit-cost insert/delete/substitute over Unicode scalar values. The
//! classic `(|a|+1) x (|b|+1)` dynamic-programming table is evaluated one
//! row at a time with integer cells, so results are exact.
//!
//! # Complexity
//! - Time: O(m*n)
//! - Space: O(min(m, n))

use smallvec::SmallVec;

use super::EditDistance;

/// Levenshtein distance calculator
///
/// Stateless calculator - all instances are equivalent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Levenshtein;

impl Levenshtein {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EditDistance for Levenshtein {
    fn distance(&self, a: &str, b: &str) -> usize {
        levenshtein(a, b)
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

/// Calculate the Levenshtein distance between two strings.
///
/// Case-sensitive: `"gap"` and `"Gap"` are one substitution apart.
#[inline]
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: SmallVec<[char; 32]> = a.chars().collect();
    let b_chars: SmallVec<[char; 32]> = b.chars().collect();

    dp_distance(&a_chars, &b_chars)
}

/// Row-by-row evaluation of the DP table.
///
/// `row[j]` holds `table[i][j]` for the source prefix processed so far.
/// Because the recurrence only reads the previous row and the cell to the
/// left, a single row plus the saved diagonal is enough.
#[inline]
fn dp_distance(a: &[char], b: &[char]) -> usize {
    let m = a.len();
    let n = b.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Shorter string on the column axis
    let (target, source) = if m < n { (a, b) } else { (b, a) };
    let n_target = target.len();

    // table[0][j] = j
    let mut row: SmallVec<[usize; 64]> = (0..=n_target).collect();

    for (i, &sc) in source.iter().enumerate() {
        // table[i][0] = i
        let mut diag = row[0];
        row[0] = i + 1;

        for j in 0..n_target {
            let top = row[j + 1];
            let left = row[j];

            row[j + 1] = if sc == target[j] {
                diag
            } else {
                1 + diag.min(top).min(left)
            };
            diag = top;
        }
    }

    row[n_target]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basic() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_levenshtein_insertion() {
        assert_eq!(levenshtein("pran", "prank"), 1);
    }

    #[test]
    fn test_levenshtein_case_sensitive() {
        assert_eq!(levenshtein("gap", "Gap"), 1);
    }

    #[test]
    fn test_levenshtein_input_order() {
        assert_eq!(levenshtein("hello", "mellow"), levenshtein("mellow", "hello"));
        assert_eq!(levenshtein("hello", "mellow"), 2);
    }

    #[test]
    fn test_levenshtein_complex_word() {
        assert_eq!(levenshtein("copyright", "modesty"), 8);
    }

    #[test]
    fn test_levenshtein_unicode() {
        assert_eq!(levenshtein("café", "cafe"), 1);
        assert_eq!(levenshtein("über", "uber"), 1);
    }

    #[test]
    fn test_levenshtein_trait() {
        let lev = Levenshtein::new();
        assert_eq!(lev.distance("flaw", "lawn"), 2);
        assert_eq!(lev.name(), "levenshtein");
    }
}
