//! Schema Node Classification
//!
//! Parses a raw JSON Schema node once into the facts the flattener and the
//! variant resolver branch on: the declared type, the union combinator and how
//! the node nests. Nothing here builds rows.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::declared;
use crate::error::{DocError, Result};

// =============================================================================
// Type Kind
// =============================================================================

/// Declared `type` of a schema node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    String,
    Boolean,
    Integer,
    Number,
    Null,
    Object,
    Array,
    /// Anything else, kept verbatim for display (type lists are joined with `|`)
    Other(String),
}

impl TypeKind {
    pub fn from_json_type(type_str: &str) -> Self {
        match type_str {
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "null" => Self::Null,
            "object" => Self::Object,
            "array" => Self::Array,
            other => Self::Other(other.to_string()),
        }
    }

    /// Parse the value of a `type` keyword
    pub fn parse(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::from_json_type(s),
            Value::Array(types) => Self::Other(
                types
                    .iter()
                    .map(|t| t.as_str().map(String::from).unwrap_or_else(|| t.to_string()))
                    .collect::<Vec<_>>()
                    .join(" | "),
            ),
            other => Self::Other(other.to_string()),
        }
    }

    /// String, boolean and integer nodes are leaves and never get their own page
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::String | Self::Boolean | Self::Integer)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Null => "null",
            Self::Object => "object",
            Self::Array => "array",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Union Kind
// =============================================================================

/// Polymorphic combinator of a union schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnionKind {
    #[serde(rename = "anyOf")]
    AnyOf,
    #[serde(rename = "oneOf")]
    OneOf,
    #[serde(rename = "allOf")]
    AllOf,
}

impl UnionKind {
    /// Lookup order when a node (illegally) declares several combinators
    pub const PRIORITY: [UnionKind; 3] = [UnionKind::AnyOf, UnionKind::OneOf, UnionKind::AllOf];

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::AnyOf => "anyOf",
            Self::OneOf => "oneOf",
            Self::AllOf => "allOf",
        }
    }

    /// Human label such as "Any of"
    pub fn literal(&self) -> String {
        literal_label(self.keyword())
    }

    /// First combinator present on the node, in priority order
    pub fn detect(node: &Map<String, Value>) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|kind| declared(node, kind.keyword()).is_some())
    }

    /// Every combinator present on the node, in priority order
    pub fn declared_in(node: &Map<String, Value>) -> Vec<Self> {
        Self::PRIORITY
            .into_iter()
            .filter(|kind| declared(node, kind.keyword()).is_some())
            .collect()
    }
}

impl fmt::Display for UnionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Render a combinator keyword as two words: the first three characters
/// capitalized, the remainder lowercased ("anyOf" -> "Any of").
pub fn literal_label(kind: &str) -> String {
    let head: String = kind.chars().take(3).collect();
    let tail: String = kind.chars().skip(3).collect();

    let mut head_chars = head.chars();
    let head = match head_chars.next() {
        Some(first) => first.to_uppercase().chain(head_chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    };

    format!("{} {}", head, tail.to_lowercase())
}

// =============================================================================
// Nesting
// =============================================================================

/// How a node's nested attributes are reached
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Nesting<'a> {
    /// Enum, primitive type, or array without `items`
    Leaf,
    /// Array node: descend once into `items` under `id[i]`
    Items(&'a Value),
    /// Named members: explicit `properties`, or the node itself when it
    /// implies an object without declaring any
    Members(&'a Map<String, Value>),
}

impl Nesting<'_> {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Nesting::Leaf)
    }
}

// =============================================================================
// Schema Node
// =============================================================================

/// A classified, borrowed view of one object-shaped schema node
#[derive(Debug, Clone)]
pub struct SchemaNode<'a> {
    raw: &'a Value,
    fields: &'a Map<String, Value>,
    type_kind: Option<TypeKind>,
    union: Option<UnionKind>,
    nesting: Nesting<'a>,
}

impl<'a> SchemaNode<'a> {
    /// Classify a node. Returns `Ok(None)` for nodes that are not objects.
    pub fn parse(raw: &'a Value) -> Result<Option<Self>> {
        let Some(fields) = raw.as_object() else {
            return Ok(None);
        };

        let type_kind = declared(fields, "type").map(TypeKind::parse);
        let union = UnionKind::detect(fields);
        let nesting = detect_nesting(fields, type_kind.as_ref())?;

        Ok(Some(Self {
            raw,
            fields,
            type_kind,
            union,
            nesting,
        }))
    }

    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    pub fn fields(&self) -> &'a Map<String, Value> {
        self.fields
    }

    pub fn type_kind(&self) -> Option<&TypeKind> {
        self.type_kind.as_ref()
    }

    pub fn union_kind(&self) -> Option<UnionKind> {
        self.union
    }

    pub fn nesting(&self) -> Nesting<'a> {
        self.nesting
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        declared(self.fields, key)
    }

    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Type shown in attribute tables
    pub fn type_label(&self) -> Option<String> {
        match (&self.type_kind, self.union) {
            (Some(kind), _) => Some(kind.to_string()),
            (None, None) if !self.nesting.is_leaf() => Some("object".to_string()),
            (None, Some(union)) => Some(union.keyword().to_string()),
            (None, None) => None,
        }
    }

    /// Member schemas of the union list
    pub fn union_variants(&self) -> Result<Option<&'a [Value]>> {
        let Some(kind) = self.union else {
            return Ok(None);
        };
        match self.get(kind.keyword()) {
            Some(Value::Array(items)) => Ok(Some(items.as_slice())),
            _ => Err(DocError::InvalidSchema(format!(
                "'{}' must list its variant schemas",
                kind
            ))),
        }
    }
}

fn detect_nesting<'a>(fields: &'a Map<String, Value>, type_kind: Option<&TypeKind>) -> Result<Nesting<'a>> {
    let is_object = type_kind == Some(&TypeKind::Object);
    let is_array = type_kind == Some(&TypeKind::Array);
    let items = declared(fields, "items");

    let leaf = declared(fields, "enum").is_some()
        || type_kind.map_or(false, TypeKind::is_primitive)
        || (is_array && items.is_none());

    // an explicit object type always nests, even alongside an enum
    if leaf && !is_object {
        return Ok(Nesting::Leaf);
    }

    if let Some(properties) = declared(fields, "properties") {
        return match properties {
            Value::Object(members) => Ok(Nesting::Members(members)),
            _ => Err(DocError::InvalidSchema(
                "'properties' must map names to schemas".to_string(),
            )),
        };
    }

    match (is_array, items) {
        (true, Some(items)) => Ok(Nesting::Items(items)),
        _ => Ok(Nesting::Members(fields)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: &Value) -> SchemaNode<'_> {
        SchemaNode::parse(value).unwrap().unwrap()
    }

    #[test]
    fn test_literal_labels() {
        assert_eq!(literal_label("anyOf"), "Any of");
        assert_eq!(literal_label("oneOf"), "One of");
        assert_eq!(literal_label("allOf"), "All of");
        assert_eq!(UnionKind::OneOf.literal(), "One of");
    }

    #[test]
    fn test_union_priority_when_ambiguous() {
        let schema = json!({ "allOf": [], "oneOf": [], "anyOf": [] });
        let fields = schema.as_object().unwrap();
        assert_eq!(UnionKind::detect(fields), Some(UnionKind::AnyOf));
        assert_eq!(UnionKind::declared_in(fields).len(), 3);

        let schema = json!({ "allOf": [], "oneOf": [] });
        assert_eq!(UnionKind::detect(schema.as_object().unwrap()), Some(UnionKind::OneOf));
    }

    #[test]
    fn test_null_combinator_is_absent() {
        let schema = json!({ "anyOf": null, "allOf": [{ "type": "string" }] });
        assert_eq!(UnionKind::detect(schema.as_object().unwrap()), Some(UnionKind::AllOf));
    }

    #[test]
    fn test_primitive_and_enum_are_leaves() {
        assert!(node(&json!({ "type": "string" })).nesting().is_leaf());
        assert!(node(&json!({ "type": "integer", "format": "int64" })).nesting().is_leaf());
        assert!(node(&json!({ "enum": ["a", "b"] })).nesting().is_leaf());
        assert!(node(&json!({ "type": "array" })).nesting().is_leaf());
    }

    #[test]
    fn test_object_type_nests_even_with_enum() {
        let schema = json!({ "type": "object", "enum": [{}] });
        assert!(matches!(node(&schema).nesting(), Nesting::Members(_)));
    }

    #[test]
    fn test_array_with_items_nests_into_items() {
        let schema = json!({ "type": "array", "items": { "type": "string" } });
        match node(&schema).nesting() {
            Nesting::Items(items) => assert_eq!(items, &json!({ "type": "string" })),
            other => panic!("Expected Items, got {:?}", other),
        }
    }

    #[test]
    fn test_untyped_node_self_nests() {
        let schema = json!({ "description": "anything", "additionalProperties": { "type": "string" } });
        match node(&schema).nesting() {
            Nesting::Members(members) => assert!(members.contains_key("additionalProperties")),
            other => panic!("Expected Members, got {:?}", other),
        }
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(node(&json!({ "type": "string" })).type_label().as_deref(), Some("string"));
        assert_eq!(node(&json!({ "properties": {} })).type_label().as_deref(), Some("object"));
        assert_eq!(node(&json!({ "oneOf": [] })).type_label().as_deref(), Some("oneOf"));
        assert_eq!(node(&json!({ "enum": [1, 2] })).type_label(), None);
        assert_eq!(
            node(&json!({ "type": ["string", "null"] })).type_label().as_deref(),
            Some("string | null")
        );
    }

    #[test]
    fn test_non_object_is_not_a_node() {
        assert!(SchemaNode::parse(&json!("string")).unwrap().is_none());
        assert!(SchemaNode::parse(&json!([1, 2])).unwrap().is_none());
    }

    #[test]
    fn test_malformed_properties_rejected() {
        let schema = json!({ "properties": ["a", "b"] });
        assert!(matches!(SchemaNode::parse(&schema), Err(DocError::InvalidSchema(_))));
    }

    #[test]
    fn test_union_variants_must_be_a_list() {
        let schema = json!({ "anyOf": { "type": "string" } });
        assert!(node(&schema).union_variants().is_err());
    }
}
