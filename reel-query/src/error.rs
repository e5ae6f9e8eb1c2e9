//! Typed errors raised while compiling a filter into SQL.
//!
//! Everything here means "bad input", or an internal invariant caught before
//! execution. Storage-engine failures are a separate taxonomy owned by the
//! executor crate; the two are never mixed.
//!
//! ```rust
//! use reel_query::QueryError;
//!
//! let err = QueryError::invalid_filter("rating", "BETWEEN requires an upper bound");
//! assert!(err.to_string().contains("rating"));
//! ```

use thiserror::Error;

/// Result type for compiler operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors from filter compilation and statement assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A filter field carried a value the compiler cannot express.
    #[error("invalid filter on `{field}`: {reason}")]
    InvalidFilter {
        /// The offending filter field.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A requested sort key is outside the entity's allow-list.
    ///
    /// Only the strict resolver returns this; the lenient resolver falls
    /// back to the entity's default key instead.
    #[error("unknown sort key `{key}` for `{entity}`")]
    UnknownSortKey {
        /// The entity's table name.
        entity: String,
        /// The rejected key.
        key: String,
    },

    /// A fragment's `?` placeholders do not line up with its parameters.
    ///
    /// Internal invariant violation. Checked before execution so bindings
    /// are never silently truncated or padded.
    #[error("placeholder mismatch in `{sql}`: {placeholders} placeholders, {params} parameters")]
    PlaceholderMismatch {
        /// The offending fragment text.
        sql: String,
        /// Number of `?` placeholders in the fragment.
        placeholders: usize,
        /// Number of parameters the fragment carries.
        params: usize,
    },
}

impl QueryError {
    /// Create an `InvalidFilter` error.
    pub fn invalid_filter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFilter {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
