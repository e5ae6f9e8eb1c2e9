//! Sort resolution against an entity's allow-list.
//!
//! Only allow-listed column names ever reach SQL text. The lenient
//! [`resolve`] falls back to the entity's default key for unknown requests;
//! [`resolve_strict`] rejects them with a typed error instead. Both append
//! a stable primary-key tie-break whenever the sort key is not already the
//! primary key, so paginated traversal never skips or repeats rows on ties.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{QueryError, QueryResult};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9, oldest first).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0, newest first).
    Desc,
}

impl SortOrder {
    /// Get the SQL keyword for this sort order.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// The opposite direction.
    pub fn reversed(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// Resolve a requested sort key leniently.
///
/// An absent or unknown key resolves to `E::DEFAULT_SORT` without error.
pub fn resolve<E: Entity>(requested: Option<&str>, direction: SortOrder) -> String {
    let key = requested
        .filter(|key| E::SORTABLE.contains(key))
        .unwrap_or(E::DEFAULT_SORT);
    order_by::<E>(key, direction)
}

/// Resolve a requested sort key strictly.
///
/// An unknown key is a typed [`QueryError::UnknownSortKey`].
pub fn resolve_strict<E: Entity>(requested: &str, direction: SortOrder) -> QueryResult<String> {
    if !E::SORTABLE.contains(&requested) {
        return Err(QueryError::UnknownSortKey {
            entity: E::TABLE.to_string(),
            key: requested.to_string(),
        });
    }
    Ok(order_by::<E>(requested, direction))
}

fn order_by<E: Entity>(key: &str, direction: SortOrder) -> String {
    let mut sql = format!("ORDER BY {}.{} {}", E::TABLE, key, direction.as_sql());
    if key != E::PRIMARY_KEY {
        sql.push_str(&format!(", {}.{} ASC", E::TABLE, E::PRIMARY_KEY));
    }
    sql
}
