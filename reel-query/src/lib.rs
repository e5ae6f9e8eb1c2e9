//! # reel-query
//!
//! Filter-to-SQL compiler for the reel media catalog.
//!
//! This crate turns a structured, optional, multi-field filter description
//! into a pair of executable SQLite statements: a distinct-primary-key
//! selection (sorted, paginated) and a count of the same logical result set.
//! It is database-agnostic text generation only; execution lives in
//! `reel-sqlite`.
//!
//! The pieces:
//!
//! - predicate compilers ([`criterion`], [`search`], [`predicate`]) turn one
//!   filter field into a [`Fragment`], SQL text atomically paired with its
//!   bound parameters;
//! - the [`plan::QueryPlan`] accumulates fragments into WHERE and HAVING
//!   buckets and assembles the two statements;
//! - the [`sort`] resolver validates sort keys against a per-entity
//!   allow-list and appends a stable tie-break;
//! - [`pagination::Page`] derives LIMIT/OFFSET from 1-indexed pages.
//!
//! ## Example
//!
//! ```rust
//! use reel_query::{Entity, IntCriterion, Modifier, Param, QueryPlan};
//!
//! struct Track;
//!
//! impl Entity for Track {
//!     const TABLE: &'static str = "tracks";
//!     const PRIMARY_KEY: &'static str = "id";
//!     const COLUMNS: &'static [&'static str] = &["id", "title", "rating"];
//!     const SEARCHABLE: &'static [&'static str] = &["tracks.title"];
//!     const SORTABLE: &'static [&'static str] = &["title", "rating", "id"];
//!     const DEFAULT_SORT: &'static str = "title";
//! }
//!
//! let mut plan = QueryPlan::for_entity::<Track>("tracks");
//! let rating = IntCriterion::new(3, Modifier::GreaterThan);
//! plan.push_where(rating.fragment("tracks.rating").unwrap());
//!
//! let query = plan
//!     .assemble("ORDER BY tracks.title ASC", "LIMIT 10 OFFSET 0")
//!     .unwrap();
//! assert_eq!(
//!     query.id_sql,
//!     "SELECT DISTINCT tracks.id FROM tracks WHERE tracks.rating > ? \
//!      GROUP BY tracks.id ORDER BY tracks.title ASC LIMIT 10 OFFSET 0"
//! );
//! assert_eq!(query.params, vec![Param::Int(3)]);
//! ```

pub mod criterion;
pub mod entity;
pub mod error;
pub mod fragment;
pub mod options;
pub mod pagination;
pub mod plan;
pub mod predicate;
pub mod search;
pub mod sort;
pub mod value;

pub use criterion::{IntCriterion, Modifier, Resolution};
pub use entity::Entity;
pub use error::{QueryError, QueryResult};
pub use fragment::{Bucket, Fragment};
pub use options::FindOptions;
pub use pagination::Page;
pub use plan::{AssembledQuery, QueryPlan};
pub use sort::SortOrder;
pub use value::Param;
