//! Jaro and Jaro-Winkler scores
//!
//! Jaro similarity matches characters within a sliding window of
//! `floor(max(len_a, len_b) / 2) - 1`, counts half-transpositions among the
//! matched characters and averages three ratios. The Winkler variant boosts
//! the result for a shared prefix, but only when the Jaro similarity is
//! already above [`WINKLER_THRESHOLD`].
//!
//! For tree weights the similarity is rounded to four decimals and
//! inverted into `int(1000 * (1 - sim))`, so identical words weigh 0 and
//! words with no matching character weigh 1000.

use smallvec::SmallVec;

use super::EditDistance;

/// Jaro similarity above which the prefix boost is applied.
pub const WINKLER_THRESHOLD: f64 = 0.7;

/// Configuration for the Winkler prefix boost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JaroWinklerConfig {
    /// Prefix weight (typically 0.1, max 0.25)
    pub prefix_weight: f64,
    /// Maximum prefix length to consider (typically 4)
    pub max_prefix_length: usize,
    /// Boost only applies when Jaro similarity exceeds this
    pub threshold: f64,
}

impl Default for JaroWinklerConfig {
    fn default() -> Self {
        Self {
            prefix_weight: 0.1,
            max_prefix_length: 4,
            threshold: WINKLER_THRESHOLD,
        }
    }
}

/// Jaro-Winkler score calculator
///
/// Produces the inverted, scaled integer used as a tree weight.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JaroWinkler {
    config: JaroWinklerConfig,
}

impl JaroWinkler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: JaroWinklerConfig) -> Self {
        Self {
            config: JaroWinklerConfig {
                prefix_weight: config.prefix_weight.clamp(0.0, 0.25),
                ..config
            },
        }
    }

    #[must_use]
    pub fn config(&self) -> JaroWinklerConfig {
        self.config
    }

    /// Raw similarity in `[0.0, 1.0]`.
    #[must_use]
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        jaro_winkler_similarity_params(a, b, &self.config)
    }
}

impl EditDistance for JaroWinkler {
    fn distance(&self, a: &str, b: &str) -> usize {
        scale_inverted(self.similarity(a, b))
    }

    fn name(&self) -> &'static str {
        "jaro_winkler"
    }
}

/// Calculate Jaro similarity between two strings.
/// Returns a value between 0.0 and 1.0.
#[must_use]
pub fn jaro_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let a_chars: SmallVec<[char; 64]> = a.chars().collect();
    let b_chars: SmallVec<[char; 64]> = b.chars().collect();

    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    jaro_standard(&a_chars, &b_chars)
}

fn jaro_standard(a_chars: &[char], b_chars: &[char]) -> f64 {
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    // Match window. For max length 1 the reference window is -1, which can
    // only matter for two distinct single characters; those never match
    // with a window of 0 either.
    let match_distance = (a_len.max(b_len) / 2).saturating_sub(1);

    let mut a_matches: SmallVec<[bool; 64]> = smallvec::smallvec![false; a_len];
    let mut b_matches: SmallVec<[bool; 64]> = smallvec::smallvec![false; b_len];

    let mut matches = 0usize;

    for i in 0..a_len {
        let start = i.saturating_sub(match_distance);
        let end = (i + match_distance + 1).min(b_len);

        for j in start..end {
            if b_matches[j] || a_chars[i] != b_chars[j] {
                continue;
            }
            a_matches[i] = true;
            b_matches[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Matched characters appearing in a different order
    let mut transpositions = 0usize;
    let mut k = 0usize;
    for i in 0..a_len {
        if !a_matches[i] {
            continue;
        }
        while k < b_len && !b_matches[k] {
            k += 1;
        }
        if k >= b_len {
            break;
        }
        if a_chars[i] != b_chars[k] {
            transpositions += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    let t = (transpositions / 2) as f64;

    (m / a_len as f64 + m / b_len as f64 + (m - t) / m) / 3.0
}

/// Jaro-Winkler similarity with explicit parameters.
#[must_use]
pub fn jaro_winkler_similarity_params(a: &str, b: &str, config: &JaroWinklerConfig) -> f64 {
    let jaro_sim = jaro_similarity(a, b);

    if jaro_sim <= config.threshold {
        return jaro_sim;
    }

    let prefix_weight = config.prefix_weight.clamp(0.0, 0.25);
    let prefix_len = a
        .chars()
        .zip(b.chars())
        .take(config.max_prefix_length)
        .take_while(|(ac, bc)| ac == bc)
        .count();

    jaro_sim + prefix_len as f64 * prefix_weight * (1.0 - jaro_sim)
}

/// Jaro-Winkler similarity with the standard parameters
/// (weight 0.1, up to 4 prefix characters, threshold 0.7).
#[must_use]
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    jaro_winkler_similarity_params(a, b, &JaroWinklerConfig::default())
}

/// Tree weight derived from Jaro-Winkler: `int(1000 * (1 - round(sim, 4)))`.
#[must_use]
pub fn jaro_winkler_score(a: &str, b: &str) -> usize {
    scale_inverted(jaro_winkler_similarity(a, b))
}

#[inline]
fn scale_inverted(similarity: f64) -> usize {
    let rounded = (similarity * 10_000.0).round_ties_even() / 10_000.0;
    // Truncation, matching the reference integer conversion
    (1000.0 * (1.0 - rounded)).max(0.0) as usize
}
