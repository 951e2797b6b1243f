//! Resource Pages
//!
//! One page per resource method. The page record carries the naming every
//! free-type page of the method hangs off: the base resource type, the link
//! back to the resource listing and the subpage link prefix.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::traits::ResolvedTrait;
use super::{Method, NamedParameter, Resource};
use crate::config::SiteConfig;
use crate::error::{DocError, Result};
use crate::pages::names::{collection_item_name, slugify, to_common_name, to_formal_name};

/// Marks a qualified URI: same method and path, different bodies
pub const QUALIFIER_MARKER: &str = "/qual-";

// =============================================================================
// Qualified URIs
// =============================================================================

/// A relative URI split from its `/qual-` qualifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedUri {
    pub uri: String,
    /// `"(by email)"` for `/users/qual-by-email`
    pub qualifier: Option<String>,
}

impl QualifiedUri {
    pub fn parse(relative_uri: &str) -> Self {
        let mut parts = relative_uri.split(QUALIFIER_MARKER);
        let uri = parts.next().unwrap_or(relative_uri).to_string();
        let qualifier = parts.next().map(|q| format!("({})", q.replace('-', " ")));
        Self { uri, qualifier }
    }

    pub fn qualifier_label(&self) -> &str {
        self.qualifier.as_deref().unwrap_or("")
    }

    pub fn is_qualified(&self) -> bool {
        self.qualifier.is_some()
    }
}

fn strip_qualifier(uri: &str) -> &str {
    uri.split(QUALIFIER_MARKER).next().unwrap_or(uri)
}

// =============================================================================
// Method Schemas
// =============================================================================

/// JSON schemas of the request bodies, then of every response's bodies
pub fn method_schemas(method: &Method) -> Result<Vec<Value>> {
    let responses = method.responses.iter().flat_map(|r| r.bodies.iter());
    method
        .bodies
        .iter()
        .chain(responses)
        .filter(|body| body.is_json())
        .filter_map(|body| body.schema.as_ref())
        .map(|schema| schema.parse())
        .collect()
}

/// `properties` of each schema, dropping schemas whose sorted property keys
/// were already seen. The first schema with a given key set wins.
pub fn unique_property_sets(schemas: &[Value], context: &str) -> Result<Vec<Map<String, Value>>> {
    let mut known: Vec<Vec<String>> = Vec::new();
    let mut sets = Vec::new();

    for schema in schemas {
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| DocError::missing_property("properties", context))?;

        let mut keys: Vec<String> = properties.keys().cloned().collect();
        keys.sort();
        if !known.contains(&keys) {
            known.push(keys);
            sets.push(properties.clone());
        }
    }

    Ok(sets)
}

// =============================================================================
// Resource Page
// =============================================================================

/// Reference record of one resource method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePage {
    pub key: String,
    /// Output file name
    pub name: String,
    pub slug: String,
    pub title: String,
    pub category: String,
    pub method: String,
    pub description: Option<String>,
    pub relative_uri: String,
    pub absolute_uri: String,
    /// Empty unless the URI carried `/qual-`
    pub uri_qualifier: String,
    /// Singular item type when a GET returns a collection
    pub collection_type: Option<String>,
    pub base_resource_type: String,
    pub resource_link: String,
    pub subpage_link_prefix: String,
    pub query_parameters: Vec<NamedParameter>,
    pub traits: Vec<ResolvedTrait>,
}

impl ResourcePage {
    /// Build the page of `method` on `resource`. `singular_name` is the
    /// singular resource name in effect for this resource.
    pub fn build(resource: &Resource, method: &Method, singular_name: &str, site: &SiteConfig) -> Self {
        let qualified = QualifiedUri::parse(&resource.relative_uri);
        let absolute_uri = resource.absolute_uri.as_deref().unwrap_or(&resource.relative_uri);

        let (slug, title) = match &qualified.qualifier {
            Some(qualifier) => {
                let title = if resource.title() == resource.relative_uri {
                    qualified.uri.clone()
                } else {
                    resource.title().to_string()
                };
                (slugify(&format!("{}-{}-{}", method.method, qualified.uri, qualifier)), title)
            }
            None => (
                slugify(&format!("{}-{}", method.method, resource.relative_uri)),
                resource.title().to_string(),
            ),
        };

        let collection_type = if method.method.to_uppercase().contains("GET") {
            collection_item_name(&qualified.uri).map(|name| to_formal_name(&name))
        } else {
            None
        };
        let base_resource_type = collection_type
            .clone()
            .unwrap_or_else(|| to_formal_name(singular_name));

        Self {
            key: format!("{}{}-information", site.key_prefix, slug),
            name: format!("{}.html", slug),
            title,
            category: "raml".to_string(),
            method: method.method.clone(),
            description: method.description.clone(),
            relative_uri: qualified.uri.clone(),
            absolute_uri: strip_qualifier(absolute_uri).to_string(),
            uri_qualifier: qualified.qualifier_label().to_string(),
            collection_type,
            resource_link: format!(
                "/{}resource-{}s.html",
                site.url_prefix,
                to_common_name(&base_resource_type)
            ),
            subpage_link_prefix: format!("/{}{}", site.url_prefix, base_resource_type),
            base_resource_type,
            query_parameters: method.query_parameters.clone(),
            traits: Vec::new(),
            slug,
        }
    }
}
