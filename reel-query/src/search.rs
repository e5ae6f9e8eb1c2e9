//! Free-text search predicates.
//!
//! A search term is compiled into one `LIKE` test per searchable column,
//! ORed together, with the term escaped so `%`, `_` and `\` only ever match
//! literally. The term itself travels as a bound parameter.

use crate::fragment::Fragment;
use crate::value::Param;

/// Escape LIKE metacharacters in a search term.
///
/// The emitted tests carry `ESCAPE '\'`, so a backslash in the output is
/// always an escape prefix.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Compile a search term into `(col1 LIKE ? ESCAPE '\' OR col2 LIKE ? ...)`.
///
/// One `%term%` parameter per column. `columns` are fixed qualified
/// identifiers owned by the entity definition, never request input.
pub fn across(columns: &[&str], term: &str) -> Fragment {
    debug_assert!(!columns.is_empty());
    let pattern = format!("%{}%", escape_like(term));
    let tests: Vec<String> = columns
        .iter()
        .map(|column| format!("{column} LIKE ? ESCAPE '\\'"))
        .collect();
    let params = columns
        .iter()
        .map(|_| Param::Text(pattern.clone()))
        .collect();
    Fragment::new(format!("({})", tests.join(" OR ")), params)
}
