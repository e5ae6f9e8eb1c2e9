//! Join-aware predicates: set membership over fan-out joins and
//! related-row existence tests.

use crate::fragment::{Bucket, Fragment};
use crate::value::Param;

/// The WHERE/HAVING pair compiled from an "ALL of these ids" filter.
///
/// Both halves must be applied to the same plan: the WHERE half narrows the
/// join to the candidate ids, the HAVING half requires every one of them to
/// be present. Either half alone matches too much.
#[derive(Debug, Clone, PartialEq)]
pub struct AllOf {
    /// `<match_column> IN (?, ...)`, one parameter per id.
    pub where_clause: Fragment,
    /// `count(distinct <match_column>) = N`, N literal.
    pub having_clause: Fragment,
}

/// Compile "must be joined to every id in `ids`" over a fan-out join.
///
/// This simulates set containment across a many-to-many join without a
/// self-join per element: restrict the joined id to the candidate set, then
/// require the distinct match count to equal the set size. Returns `None`
/// for an empty set, which is an absent filter and contributes nothing.
pub fn all_of(match_column: &str, ids: &[i64]) -> Option<AllOf> {
    if ids.is_empty() {
        return None;
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let where_clause = Fragment::new(
        format!("{match_column} IN ({placeholders})"),
        ids.iter().map(|id| Param::Int(*id)).collect(),
    );
    let having_clause = Fragment::literal(format!(
        "count(distinct {match_column}) = {}",
        ids.len()
    ));
    Some(AllOf {
        where_clause,
        having_clause,
    })
}

/// Compile a "has related rows" boolean.
///
/// `true` needs the post-aggregation count and lands in HAVING; `false`
/// tests the join column pre-aggregation and lands in WHERE. The two forms
/// are not equivalent and are deliberately not unified.
pub fn has_related(count_column: &str, join_column: &str, present: bool) -> (Bucket, Fragment) {
    if present {
        (
            Bucket::Having,
            Fragment::literal(format!("count({count_column}) > 0")),
        )
    } else {
        (
            Bucket::Where,
            Fragment::literal(format!("{join_column} IS NULL")),
        )
    }
}
