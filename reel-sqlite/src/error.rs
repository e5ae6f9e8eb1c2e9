//! Storage-side error taxonomy.

use reel_query::QueryError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the SQLite store.
///
/// `Query` is the "bad input" side: the compiler rejected the filter or
/// options before anything was executed. Everything else is a storage
/// failure propagated untouched; nothing is retried at this layer, and an
/// empty result set is never an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver-level failure (connectivity, constraint violation, syntax).
    #[error("sqlite: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),

    /// The filter or options could not be compiled into SQL.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A write's read-back found no row for the given id.
    #[error("no `{table}` row with id {id}")]
    NotFound {
        /// Table that was read back.
        table: &'static str,
        /// Missing primary key.
        id: i64,
    },
}

impl StoreError {
    /// True for the "bad input" side of the taxonomy.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    /// True when the underlying driver reported "no rows".
    pub(crate) fn is_no_rows(&self) -> bool {
        matches!(
            self,
            Self::Sqlite(tokio_rusqlite::Error::Rusqlite(
                rusqlite::Error::QueryReturnedNoRows
            ))
        )
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(tokio_rusqlite::Error::Rusqlite(err))
    }
}
