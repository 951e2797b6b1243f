//! Attribute Table Flattening
//!
//! Walks one schema subtree into an ordered list of [`AttributeRow`]s, self
//! before children, children in declaration order. Ids are dotted paths;
//! array items append `[i]`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::shape::{Nesting, SchemaNode, UnionKind};
use super::{items_id, member_id, variants};
use crate::error::{DocError, Result};

/// Recursion limit used when no configuration is supplied
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// One row of an attribute table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRow {
    /// Dotted attribute path
    pub id: String,
    /// The schema node this row describes
    #[serde(rename = "raw_obj")]
    pub raw: Value,
    #[serde(rename = "type")]
    pub type_label: Option<String>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Value>,
    pub format: Option<String>,
    pub pattern: Option<String>,
    pub description: Option<String>,
    /// Set on union variants that get a page of their own
    pub link_name: Option<String>,
    pub xof: Option<UnionKind>,
    /// "Any of", "One of", "All of"
    pub xof_literal: Option<String>,
    pub xof_items: Option<Vec<AttributeRow>>,
}

impl AttributeRow {
    pub fn is_union(&self) -> bool {
        self.xof.is_some()
    }

    /// Variants of this row that spawn a free-type page
    pub fn linked_variants(&self) -> impl Iterator<Item = &AttributeRow> {
        self.xof_items
            .iter()
            .flatten()
            .filter(|item| item.link_name.is_some())
    }
}

/// Builds attribute tables with a bounded recursion depth
#[derive(Debug, Clone, Copy)]
pub struct Flattener {
    max_depth: usize,
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Flattener {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Flatten `node` into rows rooted at `id`.
    ///
    /// Non-object nodes produce no rows. The root call normally passes an
    /// empty id, in which case member ids carry no leading dot.
    pub fn flatten(&self, node: &Value, id: &str) -> Result<Vec<AttributeRow>> {
        let mut rows = Vec::new();
        self.flatten_into(node, id, 0, &mut rows)?;
        Ok(rows)
    }

    /// Build the single row for an object-shaped node
    pub fn row(&self, node: &Value, id: &str, link_name: Option<String>) -> Result<AttributeRow> {
        match SchemaNode::parse(node)? {
            Some(schema) => self.build_row(&schema, id, link_name, 0),
            None => Err(DocError::InvalidSchema(format!(
                "attribute '{}' is not a schema object",
                id
            ))),
        }
    }

    fn flatten_into(&self, node: &Value, id: &str, depth: usize, rows: &mut Vec<AttributeRow>) -> Result<()> {
        let Some(schema) = SchemaNode::parse(node)? else {
            return Ok(());
        };

        rows.push(self.build_row(&schema, id, None, depth)?);

        match schema.nesting() {
            Nesting::Leaf => {}
            Nesting::Items(items) => {
                self.flatten_into(items, &items_id(id), depth + 1, rows)?;
            }
            Nesting::Members(members) => {
                for (key, member) in members {
                    self.flatten_into(member, &member_id(id, key), depth + 1, rows)?;
                }
            }
        }

        Ok(())
    }

    pub(crate) fn build_row(
        &self,
        schema: &SchemaNode<'_>,
        id: &str,
        link_name: Option<String>,
        depth: usize,
    ) -> Result<AttributeRow> {
        if depth > self.max_depth {
            return Err(DocError::DepthLimitExceeded {
                path: id.to_string(),
                limit: self.max_depth,
            });
        }

        let xof = schema.union_kind();
        let xof_items = match xof {
            Some(_) => Some(variants::expand_node(self, schema, id, depth)?),
            None => None,
        };

        Ok(AttributeRow {
            id: id.to_string(),
            raw: schema.raw().clone(),
            type_label: schema.type_label(),
            enum_values: schema.get("enum").cloned(),
            format: schema.get_str("format").map(String::from),
            pattern: schema.get_str("pattern").map(String::from),
            description: schema.get_str("description").map(String::from),
            link_name,
            xof,
            xof_literal: xof.map(|kind| kind.literal()),
            xof_items,
        })
    }
}

/// Flatten with the default recursion limit
pub fn flatten(node: &Value, id: &str) -> Result<Vec<AttributeRow>> {
    Flattener::default().flatten(node, id)
}
