//! String distance metrics used to key BK-tree edges.
//!
//! Each metric is a standalone function for composability, plus a stateless
//! calculator type implementing [`EditDistance`] so the builder can take any
//! of them (or a caller-supplied one) through the same seam.
//!
//! Only Levenshtein and the length-tolerant Hamming variant are true edit
//! distances. The Jaccard and Jaro-Winkler scores are similarity-derived
//! integers with no triangle inequality guarantee; the builder never relies
//! on it.

pub mod hamming;
pub mod jaccard;
pub mod jaro;
pub mod levenshtein;

pub use hamming::*;
pub use jaccard::*;
pub use jaro::*;
pub use levenshtein::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Trait for metrics that return integer edge weights.
pub trait EditDistance: Send + Sync {
    /// Integer dissimilarity score between `a` and `b`.
    fn distance(&self, a: &str, b: &str) -> usize;

    /// Name of the algorithm for logging
    fn name(&self) -> &'static str;
}

/// The built-in metrics a tree can be built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Levenshtein,
    Hamming,
    Jaccard,
    JaroWinkler,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Levenshtein,
        Metric::Hamming,
        Metric::Jaccard,
        Metric::JaroWinkler,
    ];

    /// Compute the distance between two words under this metric.
    #[inline]
    pub fn distance(&self, a: &str, b: &str) -> usize {
        match self {
            Metric::Levenshtein => levenshtein(a, b),
            Metric::Hamming => hamming_distance(a, b),
            Metric::Jaccard => jaccard_score(a, b),
            Metric::JaroWinkler => jaro_winkler_score(a, b),
        }
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Levenshtein => "levenshtein",
            Metric::Hamming => "hamming",
            Metric::Jaccard => "jaccard",
            Metric::JaroWinkler => "jaro_winkler",
        }
    }

    /// True for metrics that satisfy the triangle inequality.
    pub fn is_true_metric(&self) -> bool {
        matches!(self, Metric::Levenshtein | Metric::Hamming)
    }
}

impl EditDistance for Metric {
    fn distance(&self, a: &str, b: &str) -> usize {
        Metric::distance(self, a, b)
    }

    fn name(&self) -> &'static str {
        Metric::name(self)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses by case-insensitive three-letter prefix: `lev`, `ham`, `jac`, `jar`.
impl FromStr for Metric {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let prefix = normalized.get(..3).unwrap_or("");
        match prefix {
            "lev" => Ok(Metric::Levenshtein),
            "ham" => Ok(Metric::Hamming),
            "jac" => Ok(Metric::Jaccard),
            "jar" => Ok(Metric::JaroWinkler),
            _ => Err(BuildError::UnsupportedMetric(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_prefix_parsing() {
        assert_eq!("lev".parse::<Metric>().unwrap(), Metric::Levenshtein);
        assert_eq!("Levenshtein".parse::<Metric>().unwrap(), Metric::Levenshtein);
        assert_eq!("HAMMING".parse::<Metric>().unwrap(), Metric::Hamming);
        assert_eq!("jaccard".parse::<Metric>().unwrap(), Metric::Jaccard);
        assert_eq!("jaro-winkler".parse::<Metric>().unwrap(), Metric::JaroWinkler);
        assert_eq!(" jar ".parse::<Metric>().unwrap(), Metric::JaroWinkler);
    }

    #[test]
    fn test_metric_unsupported() {
        for bad in ["", "le", "cosine", "ja"] {
            assert_eq!(
                bad.parse::<Metric>(),
                Err(BuildError::UnsupportedMetric(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_metric_dispatch() {
        assert_eq!(Metric::Levenshtein.distance("kitten", "sitting"), 3);
        assert_eq!(Metric::Hamming.distance("karolin", "kathrin"), 3);
        assert_eq!(Metric::Jaccard.distance("abc", "xyz"), 0);
        assert_eq!(Metric::JaroWinkler.distance("same", "same"), 0);
    }

    #[test]
    fn test_metric_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
            assert_eq!(metric.to_string(), metric.name());
        }
        assert!(Metric::Levenshtein.is_true_metric());
        assert!(!Metric::Jaccard.is_true_metric());
    }
}
