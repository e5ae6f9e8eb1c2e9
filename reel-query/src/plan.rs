//! Clause accumulation and statement assembly.
//!
//! A [`QueryPlan`] is the transient intermediate representation threaded
//! through one query invocation: the base FROM/JOIN body plus tagged
//! WHERE/HAVING fragments. [`QueryPlan::assemble`] turns it into the two
//! executable statements of the two-phase fetch:
//!
//! - the id query, selecting distinct primary keys in sort order with
//!   pagination applied;
//! - the count query, wrapping the same grouped id selection in
//!   `SELECT COUNT(*)`, so the total reflects the distinct post-join row
//!   set and is independent of pagination.
//!
//! Grouping on the primary key is unconditional: the body's joins can fan
//! out, and DISTINCT alone does not collapse duplicate ids before a HAVING
//! aggregate is evaluated.

use tracing::debug;

use crate::entity::Entity;
use crate::error::QueryResult;
use crate::fragment::{Bucket, Fragment};
use crate::value::Param;

/// Accumulates predicate fragments for one query invocation.
///
/// Append-only; WHERE fragments are ANDed, HAVING fragments are ANDed.
/// Each fragment carries its own parameters, so emission order and binding
/// order can never drift apart.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    table: &'static str,
    primary_key: &'static str,
    body: String,
    where_clauses: Vec<Fragment>,
    having_clauses: Vec<Fragment>,
}

/// The two executable statements produced from one plan.
///
/// Both statements share `params`: WHERE parameters first, then HAVING
/// parameters, in append order. Sort and pagination contribute none.
#[derive(Debug, Clone)]
pub struct AssembledQuery {
    /// Distinct-primary-key selection with sort and pagination.
    pub id_sql: String,
    /// Count of the same logical result set, ignoring sort and pagination.
    pub count_sql: String,
    /// Positional parameters for both statements.
    pub params: Vec<Param>,
}

impl QueryPlan {
    /// Create a plan for `E` over the given FROM/JOIN body.
    ///
    /// The body starts at the table name (no `FROM` keyword) and must
    /// include every join the accumulated fragments reference.
    pub fn for_entity<E: Entity>(body: impl Into<String>) -> Self {
        Self {
            table: E::TABLE,
            primary_key: E::PRIMARY_KEY,
            body: body.into(),
            where_clauses: Vec::new(),
            having_clauses: Vec::new(),
        }
    }

    /// Append a fragment to the given bucket.
    pub fn push(&mut self, bucket: Bucket, fragment: Fragment) {
        match bucket {
            Bucket::Where => self.where_clauses.push(fragment),
            Bucket::Having => self.having_clauses.push(fragment),
        }
    }

    /// Append a WHERE fragment.
    pub fn push_where(&mut self, fragment: Fragment) {
        self.push(Bucket::Where, fragment);
    }

    /// Append a HAVING fragment.
    pub fn push_having(&mut self, fragment: Fragment) {
        self.push(Bucket::Having, fragment);
    }

    /// Whether any fragment has been accumulated.
    pub fn is_unfiltered(&self) -> bool {
        self.where_clauses.is_empty() && self.having_clauses.is_empty()
    }

    /// Assemble the id query and the count query.
    ///
    /// `sort_sql` and `pagination_sql` are appended to the id query only;
    /// pass empty strings to omit them. Every fragment's placeholder count
    /// is verified here, before anything reaches the storage engine.
    pub fn assemble(&self, sort_sql: &str, pagination_sql: &str) -> QueryResult<AssembledQuery> {
        for fragment in self.where_clauses.iter().chain(&self.having_clauses) {
            fragment.verify()?;
        }

        let pk = format!("{}.{}", self.table, self.primary_key);
        let mut base = format!("SELECT DISTINCT {pk} FROM {}", self.body);
        if !self.where_clauses.is_empty() {
            base.push_str(" WHERE ");
            base.push_str(&join_fragments(&self.where_clauses, " AND "));
        }
        base.push_str(" GROUP BY ");
        base.push_str(&pk);
        if !self.having_clauses.is_empty() {
            base.push_str(" HAVING ");
            base.push_str(&join_fragments(&self.having_clauses, " AND "));
        }

        let count_sql = count_wrapped(&base);

        let mut id_sql = base;
        if !sort_sql.is_empty() {
            id_sql.push(' ');
            id_sql.push_str(sort_sql);
        }
        if !pagination_sql.is_empty() {
            id_sql.push(' ');
            id_sql.push_str(pagination_sql);
        }

        let mut params = Vec::new();
        for fragment in self.where_clauses.iter().chain(&self.having_clauses) {
            params.extend_from_slice(fragment.params());
        }

        debug!(sql = %id_sql, params = params.len(), "assembled query");

        Ok(AssembledQuery {
            id_sql,
            count_sql,
            params,
        })
    }
}

/// Wrap an id-selecting statement in a distinct-row count.
pub fn count_wrapped(sql: &str) -> String {
    format!("SELECT COUNT(*) FROM ({sql})")
}

fn join_fragments(fragments: &[Fragment], separator: &str) -> String {
    fragments
        .iter()
        .map(Fragment::sql)
        .collect::<Vec<_>>()
        .join(separator)
}
