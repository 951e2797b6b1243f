//! Union Variant Resolution
//!
//! Assigns each member of an `anyOf`/`oneOf`/`allOf` list a stable id and
//! decides whether it deserves a page of its own.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::flatten::{AttributeRow, Flattener};
use super::shape::{SchemaNode, TypeKind, UnionKind};
use super::display_value;
use crate::error::{DocError, Result};

/// Combinator of a union node, if any
pub fn union_kind(node: &Value) -> Option<UnionKind> {
    node.as_object().and_then(UnionKind::detect)
}

/// How a variant got its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantIdentity {
    /// Object whose required `type` property is pinned to one enum value
    Named(String),
    /// String, boolean or integer member, by 1-based position
    Primitive(usize),
    /// Any other member, by 1-based position under its parent
    Synthetic { parent_id: String, index: usize },
}

impl VariantIdentity {
    pub fn classify(variant: &Map<String, Value>, index: usize, parent_id: &str) -> Self {
        if let Some(name) = discriminator(variant) {
            return Self::Named(name);
        }

        let primitive = variant
            .get("type")
            .map(TypeKind::parse)
            .map_or(false, |kind| kind.is_primitive());
        if primitive {
            return Self::Primitive(index);
        }

        Self::Synthetic {
            parent_id: parent_id.to_string(),
            index,
        }
    }

    pub fn id(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Primitive(index) => format!("primitive.{}", index),
            Self::Synthetic { parent_id, index } => format!("{}.{}", parent_id, index),
        }
    }

    /// Primitives are documented inline; everything else links to a page
    pub fn link_name(&self) -> Option<String> {
        match self {
            Self::Primitive(_) => None,
            _ => Some(self.id()),
        }
    }

    pub fn is_linkable(&self) -> bool {
        !matches!(self, Self::Primitive(_))
    }
}

/// The single `properties.type.enum` value of a discriminated object variant
fn discriminator(variant: &Map<String, Value>) -> Option<String> {
    if variant.get("type").and_then(Value::as_str) != Some("object") {
        return None;
    }

    let requires_type = variant
        .get("required")
        .and_then(Value::as_array)
        .map_or(false, |required| required.iter().any(|r| r.as_str() == Some("type")));
    if !requires_type {
        return None;
    }

    let values = variant
        .get("properties")?
        .as_object()?
        .get("type")?
        .as_object()?
        .get("enum")?
        .as_array()?;

    match values.as_slice() {
        [only] => Some(display_value(only)),
        _ => None,
    }
}

/// Expand the variants of a union node into rows, in declaration order.
/// Nodes without a combinator expand to nothing.
pub fn expand_variants(node: &Value, parent_id: &str) -> Result<Vec<AttributeRow>> {
    match SchemaNode::parse(node)? {
        Some(schema) => expand_node(&Flattener::default(), &schema, parent_id, 0),
        None => Ok(Vec::new()),
    }
}

pub(crate) fn expand_node(
    flattener: &Flattener,
    schema: &SchemaNode<'_>,
    parent_id: &str,
    depth: usize,
) -> Result<Vec<AttributeRow>> {
    let Some(variants) = schema.union_variants()? else {
        return Ok(Vec::new());
    };

    variants
        .iter()
        .enumerate()
        .map(|(position, variant)| {
            let index = position + 1;
            let Some(node) = SchemaNode::parse(variant)? else {
                return Err(DocError::InvalidSchema(format!(
                    "variant {} of '{}' is not a schema object",
                    index, parent_id
                )));
            };

            let identity = VariantIdentity::classify(node.fields(), index, parent_id);
            flattener.build_row(&node, &identity.id(), identity.link_name(), depth + 1)
        })
        .collect()
}
