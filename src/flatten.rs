//! Flattening of records into parameter-name keyed values.
use crate::core::{Record, Value};

/// Default parameter marker prepended to member names.
pub const PARAMETER_SIGIL: &str = "@";

/// Parameter names and values in declaration order.
pub type ParameterMap = Vec<(String, Value)>;

/// Flattens every readable member of `record` into `@Name -> value`.
///
/// Returns `None` for no record. Tabulation ignore markers do not apply here.
pub fn flatten(record: Option<&dyn Record>) -> Option<ParameterMap> {
    flatten_with(record, PARAMETER_SIGIL)
}

pub fn flatten_with(record: Option<&dyn Record>, sigil: &str) -> Option<ParameterMap> {
    let record = record?;
    let map = record
        .descriptor()
        .readable()
        .map(|member| (format!("{}{}", sigil, member.name), record.get(member.name)))
        .collect();
    Some(map)
}
