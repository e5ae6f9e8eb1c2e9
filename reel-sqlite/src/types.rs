//! Parameter conversion between the compiler's values and the driver's.

use reel_query::Param;
use rusqlite::types::Value;

/// Convert one bound parameter to a SQLite value.
pub fn param_to_sql(param: &Param) -> Value {
    match param {
        Param::Null => Value::Null,
        Param::Bool(b) => Value::Integer(i64::from(*b)),
        Param::Int(i) => Value::Integer(*i),
        Param::Float(f) => Value::Real(*f),
        Param::Text(s) => Value::Text(s.clone()),
    }
}

/// Convert a full parameter list, preserving order.
pub fn params_to_sql(params: &[Param]) -> Vec<Value> {
    params.iter().map(param_to_sql).collect()
}
