//! Per-entity schema metadata consumed by the compiler.

/// Fixed schema facts about one queryable entity.
///
/// Everything here is static: the compiler only ever emits identifiers drawn
/// from these lists, never caller-supplied text, which makes identifier
/// injection structurally impossible.
pub trait Entity {
    /// Table name.
    const TABLE: &'static str;

    /// Primary-key column, unqualified.
    const PRIMARY_KEY: &'static str;

    /// All columns of the table, unqualified.
    const COLUMNS: &'static [&'static str];

    /// Qualified columns covered by free-text search.
    ///
    /// May include columns of joined tables (they must appear in the query
    /// body the plan is built over).
    const SEARCHABLE: &'static [&'static str];

    /// Sort-key allow-list: unqualified columns of `TABLE`.
    const SORTABLE: &'static [&'static str];

    /// Sort key applied when none is requested, or an unknown one is.
    const DEFAULT_SORT: &'static str;
}
