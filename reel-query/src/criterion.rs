//! Numeric comparison predicates.
//!
//! # Modifier table
//!
//! The complete mapping from modifier to emitted SQL:
//!
//! | Modifier      | SQL                       | Parameters |
//! |---------------|---------------------------|------------|
//! | `Equals`      | `<col> = ?`               | 1          |
//! | `NotEquals`   | `<col> != ?`              | 1          |
//! | `GreaterThan` | `<col> > ?`               | 1          |
//! | `LessThan`    | `<col> < ?`               | 1          |
//! | `Between`     | `<col> BETWEEN ? AND ?`   | 2          |
//! | `NotBetween`  | `<col> NOT BETWEEN ? AND ?` | 2        |
//! | `IsNull`      | `<col> IS NULL`           | 0          |
//! | `NotNull`     | `<col> IS NOT NULL`       | 0          |
//!
//! `BETWEEN` is inclusive at both ends, SQL semantics. The two-parameter
//! modifiers require [`IntCriterion::value2`]; its absence is a typed
//! validation error, never a silently dropped binding.
//!
//! ```rust
//! use reel_query::{IntCriterion, Param};
//!
//! let criterion = IntCriterion::between(3, 5);
//! let fragment = criterion.fragment("videos.rating").unwrap();
//! assert_eq!(fragment.sql(), "videos.rating BETWEEN ? AND ?");
//! assert_eq!(fragment.params(), &[Param::Int(3), Param::Int(5)]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};
use crate::fragment::Fragment;

/// Comparison modifier for a numeric criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modifier {
    /// `= ?`
    Equals,
    /// `!= ?`
    NotEquals,
    /// `> ?`
    GreaterThan,
    /// `< ?`
    LessThan,
    /// `BETWEEN ? AND ?`
    Between,
    /// `NOT BETWEEN ? AND ?`
    NotBetween,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    NotNull,
}

/// A numeric comparison against one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntCriterion {
    /// The comparison value (lower bound for range modifiers).
    pub value: i64,
    /// Upper bound, required by `Between` and `NotBetween`.
    pub value2: Option<i64>,
    /// How to compare.
    pub modifier: Modifier,
}

impl IntCriterion {
    /// Create a single-value criterion.
    pub fn new(value: i64, modifier: Modifier) -> Self {
        Self {
            value,
            value2: None,
            modifier,
        }
    }

    /// Create an inclusive range criterion.
    pub fn between(low: i64, high: i64) -> Self {
        Self {
            value: low,
            value2: Some(high),
            modifier: Modifier::Between,
        }
    }

    /// Compile into a fragment against `column`.
    ///
    /// `column` must be a fixed identifier owned by the caller, not request
    /// input.
    pub fn fragment(&self, column: &str) -> QueryResult<Fragment> {
        let fragment = match self.modifier {
            Modifier::Equals => Fragment::new(format!("{column} = ?"), vec![self.value.into()]),
            Modifier::NotEquals => Fragment::new(format!("{column} != ?"), vec![self.value.into()]),
            Modifier::GreaterThan => Fragment::new(format!("{column} > ?"), vec![self.value.into()]),
            Modifier::LessThan => Fragment::new(format!("{column} < ?"), vec![self.value.into()]),
            Modifier::Between => {
                let high = self.upper_bound(column)?;
                Fragment::new(
                    format!("{column} BETWEEN ? AND ?"),
                    vec![self.value.into(), high.into()],
                )
            }
            Modifier::NotBetween => {
                let high = self.upper_bound(column)?;
                Fragment::new(
                    format!("{column} NOT BETWEEN ? AND ?"),
                    vec![self.value.into(), high.into()],
                )
            }
            Modifier::IsNull => Fragment::literal(format!("{column} IS NULL")),
            Modifier::NotNull => Fragment::literal(format!("{column} IS NOT NULL")),
        };
        Ok(fragment)
    }

    fn upper_bound(&self, column: &str) -> QueryResult<i64> {
        self.value2.ok_or_else(|| {
            QueryError::invalid_filter(column, "range modifier requires an upper bound")
        })
    }
}

/// Height class over a video's vertical resolution.
///
/// Buckets are disjoint and exhaustive over non-negative heights: each has
/// an inclusive lower bound and an exclusive upper bound. Compiled fragments
/// use literal ranges and bind no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resolution {
    /// Below 240p. Also the fallback for unrecognized bucket names.
    Below,
    /// 240p to 479p.
    Low,
    /// 480p to 719p.
    Standard,
    /// 720p to 1079p.
    StandardHd,
    /// 1080p to 2159p.
    FullHd,
    /// 2160p and up.
    FourK,
}

impl Resolution {
    /// Parse a bucket name; anything unrecognized maps to [`Resolution::Below`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "LOW" => Self::Low,
            "STANDARD" => Self::Standard,
            "STANDARD_HD" => Self::StandardHd,
            "FULL_HD" => Self::FullHd,
            "FOUR_K" => Self::FourK,
            _ => Self::Below,
        }
    }

    /// Inclusive lower bound and exclusive upper bound, in pixels.
    pub fn bounds(&self) -> (i64, Option<i64>) {
        match self {
            Self::Below => (0, Some(240)),
            Self::Low => (240, Some(480)),
            Self::Standard => (480, Some(720)),
            Self::StandardHd => (720, Some(1080)),
            Self::FullHd => (1080, Some(2160)),
            Self::FourK => (2160, None),
        }
    }

    /// Whether `height` falls in this bucket.
    pub fn contains(&self, height: i64) -> bool {
        let (low, high) = self.bounds();
        height >= low && high.is_none_or(|h| height < h)
    }

    /// Compile into a literal range fragment against `column`.
    pub fn fragment(&self, column: &str) -> Fragment {
        match self.bounds() {
            (0, Some(high)) => Fragment::literal(format!("{column} < {high}")),
            (low, Some(high)) => {
                Fragment::literal(format!("({column} >= {low} AND {column} < {high})"))
            }
            (low, None) => Fragment::literal(format!("{column} >= {low}")),
        }
    }

    /// All buckets, in ascending height order.
    pub const ALL: &'static [Resolution] = &[
        Self::Below,
        Self::Low,
        Self::Standard,
        Self::StandardHd,
        Self::FullHd,
        Self::FourK,
    ];
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::value::Param;

    #[test]
    fn test_modifier_table() {
        let cases = [
            (Modifier::Equals, "videos.rating = ?", 1),
            (Modifier::NotEquals, "videos.rating != ?", 1),
            (Modifier::GreaterThan, "videos.rating > ?", 1),
            (Modifier::LessThan, "videos.rating < ?", 1),
        ];
        for (modifier, sql, params) in cases {
            let f = IntCriterion::new(4, modifier).fragment("videos.rating").unwrap();
            assert_eq!(f.sql(), sql);
            assert_eq!(f.params().len(), params);
            f.verify().unwrap();
        }
    }

    #[test]
    fn test_between() {
        let f = IntCriterion::between(3, 5).fragment("videos.rating").unwrap();
        assert_eq!(f.sql(), "videos.rating BETWEEN ? AND ?");
        assert_eq!(f.params(), &[Param::Int(3), Param::Int(5)]);
    }

    #[test]
    fn test_not_between() {
        let criterion = IntCriterion {
            value: 10,
            value2: Some(20),
            modifier: Modifier::NotBetween,
        };
        let f = criterion.fragment("videos.duration").unwrap();
        assert_eq!(f.sql(), "videos.duration NOT BETWEEN ? AND ?");
        assert_eq!(f.params().len(), 2);
    }

    #[test]
    fn test_between_without_upper_bound_is_rejected() {
        let criterion = IntCriterion::new(3, Modifier::Between);
        let err = criterion.fragment("videos.rating").unwrap_err();
        assert!(matches!(err, crate::error::QueryError::InvalidFilter { .. }));
    }

    #[test]
    fn test_null_modifiers_bind_nothing() {
        let f = IntCriterion::new(0, Modifier::IsNull).fragment("videos.rating").unwrap();
        assert_eq!(f.sql(), "videos.rating IS NULL");
        assert!(f.params().is_empty());

        let f = IntCriterion::new(0, Modifier::NotNull).fragment("videos.rating").unwrap();
        assert_eq!(f.sql(), "videos.rating IS NOT NULL");
        assert!(f.params().is_empty());
    }

    // ========== Resolution Tests ==========

    #[test]
    fn test_resolution_from_name() {
        assert_eq!(Resolution::from_name("LOW"), Resolution::Low);
        assert_eq!(Resolution::from_name("STANDARD"), Resolution::Standard);
        assert_eq!(Resolution::from_name("STANDARD_HD"), Resolution::StandardHd);
        assert_eq!(Resolution::from_name("FULL_HD"), Resolution::FullHd);
        assert_eq!(Resolution::from_name("FOUR_K"), Resolution::FourK);
        assert_eq!(Resolution::from_name("8K_SOMEDAY"), Resolution::Below);
    }

    #[test]
    fn test_resolution_buckets_are_disjoint_and_exhaustive() {
        // Boundary heights plus representatives inside each bucket.
        let heights = [0, 239, 240, 479, 480, 719, 720, 1079, 1080, 2159, 2160, 4320];
        for height in heights {
            let matching: Vec<_> = Resolution::ALL
                .iter()
                .filter(|r| r.contains(height))
                .collect();
            assert_eq!(matching.len(), 1, "height {height} matched {matching:?}");
        }
    }

    #[test]
    fn test_resolution_boundaries() {
        assert!(Resolution::Standard.contains(480));
        assert!(!Resolution::Low.contains(480));
        assert!(Resolution::StandardHd.contains(720));
        assert!(Resolution::FourK.contains(2160));
        assert!(!Resolution::FullHd.contains(2160));
    }

    #[test]
    fn test_resolution_fragments_are_literal() {
        let f = Resolution::Standard.fragment("videos.height");
        assert_eq!(f.sql(), "(videos.height >= 480 AND videos.height < 720)");
        assert!(f.params().is_empty());

        let f = Resolution::Below.fragment("videos.height");
        assert_eq!(f.sql(), "videos.height < 240");

        let f = Resolution::FourK.fragment("videos.height");
        assert_eq!(f.sql(), "videos.height >= 2160");
    }
}
