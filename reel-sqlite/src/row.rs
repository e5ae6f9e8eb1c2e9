//! Row-to-entity mapping.

use rusqlite::Row;

/// Map one result row to a concrete type.
///
/// Implementations return the driver's own result type so they slot
/// straight into `query_map` and `query_row` closures.
pub trait FromRow: Sized {
    /// Convert a row to this type.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Single-column integer rows (primary-key selections, counts).
impl FromRow for i64 {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        row.get(0)
    }
}
