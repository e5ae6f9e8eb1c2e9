//! SQL fragments atomically paired with their bound parameters.

use crate::error::{QueryError, QueryResult};
use crate::value::Param;

/// Which clause of the assembled statement a predicate belongs to.
///
/// Predicates over an aggregate (a count across a fanned-out join) must be
/// evaluated post-grouping and land in `Having`; everything else is `Where`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Evaluated per joined row, before grouping.
    Where,
    /// Evaluated per group, after aggregation.
    Having,
}

/// One compiled boolean condition plus the parameters it binds.
///
/// A fragment owns its parameters, so accumulating, dropping or reordering
/// fragments can never desynchronize SQL text from bindings. The number of
/// `?` placeholders must equal the number of parameters; [`Fragment::verify`]
/// checks this and the plan runs it on every fragment before execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    sql: String,
    params: Vec<Param>,
}

impl Fragment {
    /// Create a fragment with bound parameters.
    pub fn new(sql: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Create a fragment with no parameters (literal ranges, NULL tests).
    pub fn literal(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound parameters, in placeholder order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Consume the fragment, returning its parameters.
    pub fn into_params(self) -> Vec<Param> {
        self.params
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholders(&self) -> usize {
        self.sql.matches('?').count()
    }

    /// Fail fast if placeholders and parameters do not line up.
    pub fn verify(&self) -> QueryResult<()> {
        let placeholders = self.placeholders();
        if placeholders != self.params.len() {
            return Err(QueryError::PlaceholderMismatch {
                sql: self.sql.clone(),
                placeholders,
                params: self.params.len(),
            });
        }
        Ok(())
    }
}
