//! Letter-set Jaccard score
//!
//! Compares the *sets* of letters of two words, ignoring order and
//! multiplicity: `|A ∩ B| / |A ∪ B|`, rounded to three decimals and scaled
//! by 1000.
//!
//! The scaled ratio grows with the number of shared letters, so by default
//! this is a similarity-like value (identical letter sets score 1000,
//! disjoint ones 0). Use [`JaccardScore::inverted`] for `1000 - score`
//! when lower must mean closer. Neither form satisfies the triangle
//! inequality.

use std::cmp::Ordering;

use ahash::AHashSet;

use super::EditDistance;

/// Scale applied to the rounded ratio.
pub const JACCARD_SCALE: usize = 1000;

/// Jaccard score calculator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JaccardScore {
    /// Return `1000 - score` instead of the raw scaled ratio.
    pub inverted: bool,
}

impl JaccardScore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance form: `1000 - score`, so identical letter sets give 0.
    #[must_use]
    pub fn inverted() -> Self {
        Self { inverted: true }
    }
}

impl EditDistance for JaccardScore {
    fn distance(&self, a: &str, b: &str) -> usize {
        if self.inverted {
            jaccard_distance(a, b)
        } else {
            jaccard_score(a, b)
        }
    }

    fn name(&self) -> &'static str {
        if self.inverted {
            "jaccard_inverted"
        } else {
            "jaccard"
        }
    }
}

/// Scaled letter-set Jaccard ratio: `floor(1000 * round(|A∩B| / |A∪B|, 3))`.
///
/// Returns 0 when the words share no letter (including when either is empty).
#[must_use]
pub fn jaccard_score(a: &str, b: &str) -> usize {
    let a_set: AHashSet<char> = a.chars().collect();
    let b_set: AHashSet<char> = b.chars().collect();

    let intersection = a_set.intersection(&b_set).count();
    if intersection == 0 {
        return 0;
    }
    let union = a_set.union(&b_set).count();

    let rounded = round_ratio(intersection, union) as f64 / 1000.0;

    // Truncation, matching the reference integer conversion
    (JACCARD_SCALE as f64 * rounded) as usize
}

/// `intersection / union` rounded to three decimals, in thousandths.
///
/// Rounds the nearest `f64` to the ratio, not the exact fraction: on an
/// exact half-way fraction the direction of the division's rounding error
/// decides, and only a representable half-way value goes to even.
fn round_ratio(intersection: usize, union: usize) -> usize {
    let scaled = intersection * 1000;
    let (quotient, remainder) = (scaled / union, scaled % union);

    match (2 * remainder).cmp(&union) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal => {
            let (i, u) = (intersection as f64, union as f64);
            // Exact residual of the division: sign tells which side of the tie it landed on
            let residual = (i / u).mul_add(u, -i);
            if residual > 0.0 || (residual == 0.0 && quotient % 2 == 1) {
                quotient + 1
            } else {
                quotient
            }
        }
    }
}

/// `1000 - jaccard_score(a, b)`.
#[must_use]
pub fn jaccard_distance(a: &str, b: &str) -> usize {
    JACCARD_SCALE - jaccard_score(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jaccard_disjoint() {
        assert_eq!(jaccard_score("abc", "xyz"), 0);
        assert_eq!(jaccard_score("", "abc"), 0);
    }

    #[test]
    fn test_jaccard_identical() {
        assert_eq!(jaccard_score("word", "word"), 1000);
        // same letter set, different order and multiplicity
        assert_eq!(jaccard_score("listen", "silent"), 1000);
        assert_eq!(jaccard_score("aab", "ab"), 1000);
    }

    #[test]
    fn test_jaccard_partial() {
        // {a, b} / {a, b, c, d}
        assert_eq!(jaccard_score("abc", "abd"), 500);
        // {b} / {a, b, c, d}
        assert_eq!(jaccard_score("ab", "bcd"), 250);
    }

    fn alphabet() -> Vec<char> {
        ('a'..='z').chain('A'..='Z').chain('а'..='я').collect()
    }

    /// Two words sharing one letter, with `union` distinct letters overall.
    fn one_shared(union: usize) -> (String, String) {
        let letters = alphabet();
        let split = 1 + union / 2;
        let a: String = std::iter::once(letters[0]).chain(letters[1..split].iter().copied()).collect();
        let b: String = std::iter::once(letters[0]).chain(letters[split..union].iter().copied()).collect();
        (a, b)
    }

    #[test]
    fn test_jaccard_half_way_ratios() {
        // 1/80 = 0.0125; the nearest f64 lies just above, so it rounds up
        let (a, b) = one_shared(80);
        assert_eq!(jaccard_score(&a, &b), 13);
        // 1/16 = 0.0625 is exact in binary and goes to even
        let (a, b) = one_shared(16);
        assert_eq!(jaccard_score(&a, &b), 62);
        // 1/40 = 0.025 needs no tie-break
        let (a, b) = one_shared(40);
        assert_eq!(jaccard_score(&a, &b), 25);
    }

    #[test]
    fn test_jaccard_symmetric() {
        assert_eq!(jaccard_score("banana", "bandana"), jaccard_score("bandana", "banana"));
    }

    #[test]
    fn test_jaccard_inverted() {
        let inverted = JaccardScore::inverted();
        assert_eq!(inverted.distance("word", "word"), 0);
        assert_eq!(inverted.distance("abc", "xyz"), 1000);
        assert_eq!(inverted.distance("abc", "abd"), 500);
        assert_eq!(JaccardScore::new().distance("abc", "abd"), 500);
    }
}
