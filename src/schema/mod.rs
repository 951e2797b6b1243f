//! JSON Schema attribute tables
//!
//! Turns a schema subtree into an ordered, addressable table of attribute
//! rows, expanding `anyOf`/`oneOf`/`allOf` unions into identified variants.

pub mod flatten;
pub mod shape;
pub mod variants;

pub use flatten::{flatten, AttributeRow, Flattener, DEFAULT_MAX_DEPTH};
pub use shape::{literal_label, Nesting, SchemaNode, TypeKind, UnionKind};
pub use variants::{expand_variants, union_kind, VariantIdentity};

use serde_json::{Map, Value};

/// Path suffix appended when descending into array items
pub const ARRAY_ITEM_SUFFIX: &str = "[i]";

/// A keyword counts as declared when present and neither `null` nor `false`
pub(crate) fn declared<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields
        .get(key)
        .filter(|v| !matches!(v, Value::Null | Value::Bool(false)))
}

/// Child id for a named member: `key` at the root, `id.key` below it
pub fn member_id(parent_id: &str, key: &str) -> String {
    if parent_id.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent_id, key)
    }
}

/// Child id for array items
pub fn items_id(parent_id: &str) -> String {
    format!("{}{}", parent_id, ARRAY_ITEM_SUFFIX)
}

/// Display a scalar JSON value without quotes around strings
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
