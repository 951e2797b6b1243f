//! API Description Model
//!
//! The parsed API description the generator consumes: resources, their
//! methods, request/response bodies carrying JSON Schemas, and the global
//! trait table. Accepts the RAML conventions of writing named entries either
//! as a mapping or as a sequence of single-key mappings.

pub mod resource;
pub mod traits;

pub use resource::{method_schemas, unique_property_sets, QualifiedUri, ResourcePage};
pub use traits::{resolve_is_parameters, substitute_parameters, ResolvedTrait, TraitResolution};

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{DocError, Result};

// =============================================================================
// Named Entries
// =============================================================================

/// Ordered `name -> value` entries
#[derive(Debug, Clone, PartialEq)]
pub struct NamedEntries<T>(Vec<(String, T)>);

impl<T> Default for NamedEntries<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> NamedEntries<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn push(&mut self, name: impl Into<String>, value: T) {
        self.0.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> IntoIterator for NamedEntries<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: DeserializeOwned + Default> NamedEntries<T> {
    /// Read a mapping, or a sequence of names and single-key mappings.
    /// A bare name or a `null` value yields `T::default()`.
    pub fn from_value(value: Value) -> std::result::Result<Self, serde_json::Error> {
        let mut entries = Self::new();
        match value {
            Value::Null => {}
            Value::Object(map) => entries.extend_from_map(map)?,
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::String(name) => entries.push(name, T::default()),
                        Value::Object(map) => entries.extend_from_map(map)?,
                        other => {
                            return Err(serde_json::Error::custom(format!(
                                "expected a name or a mapping, found {}",
                                other
                            )))
                        }
                    }
                }
            }
            other => {
                return Err(serde_json::Error::custom(format!(
                    "expected a mapping or a sequence, found {}",
                    other
                )))
            }
        }
        Ok(entries)
    }

    fn extend_from_map(&mut self, map: Map<String, Value>) -> std::result::Result<(), serde_json::Error> {
        for (name, value) in map {
            let value = match value {
                Value::Null => T::default(),
                value => serde_json::from_value(value)?,
            };
            self.push(name, value);
        }
        Ok(())
    }
}

impl<'de, T: DeserializeOwned + Default> Deserialize<'de> for NamedEntries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

impl<T: Serialize> Serialize for NamedEntries<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Entries whose key also names the entry itself (verb, media type, status)
trait Keyed: DeserializeOwned + Default {
    fn assign_key(&mut self, key: String);
}

fn keyed_entries<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Keyed,
{
    let entries = NamedEntries::<T>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|(key, mut entry)| {
            entry.assign_key(key);
            entry
        })
        .collect())
}

fn named_parameters<'de, D>(deserializer: D) -> std::result::Result<Vec<NamedParameter>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = NamedEntries::<Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|(name, node)| NamedParameter::from_node(name, &node, false))
        .collect())
}

// =============================================================================
// Root
// =============================================================================

/// A parsed API description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoot {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub base_uri: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Global trait table: name -> template
    #[serde(default)]
    pub traits: NamedEntries<Value>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl ApiRoot {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| DocError::InvalidDescription(e.to_string()))
    }

    pub fn trait_template(&self, name: &str) -> Option<&Value> {
        self.traits.get(name)
    }
}

/// A top-level resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub display_name: String,
    pub relative_uri: String,
    #[serde(default)]
    pub absolute_uri: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Methods keyed by verb
    #[serde(default, deserialize_with = "keyed_entries")]
    pub methods: Vec<Method>,
}

impl Resource {
    /// Display name, falling back to the relative URI
    pub fn title(&self) -> &str {
        if self.display_name.is_empty() {
            &self.relative_uri
        } else {
            &self.display_name
        }
    }
}

/// One HTTP method on a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Trait references: name -> argument map
    #[serde(default)]
    pub is: NamedEntries<Value>,
    #[serde(default, deserialize_with = "named_parameters")]
    pub query_parameters: Vec<NamedParameter>,
    /// Request bodies keyed by media type
    #[serde(default, deserialize_with = "keyed_entries")]
    pub bodies: Vec<Body>,
    /// Responses keyed by status code
    #[serde(default, deserialize_with = "keyed_entries")]
    pub responses: Vec<Response>,
}

impl Keyed for Method {
    fn assign_key(&mut self, key: String) {
        if self.method.is_empty() {
            self.method = key;
        }
    }
}

impl Method {
    pub fn query_parameter(&self, name: &str) -> Option<&NamedParameter> {
        self.query_parameters.iter().find(|p| p.name == name)
    }
}

/// A request or response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub schema: Option<SchemaSource>,
    #[serde(default)]
    pub example: Option<Value>,
}

impl Keyed for Body {
    fn assign_key(&mut self, key: String) {
        if self.media_type.is_empty() {
            self.media_type = key;
        }
    }
}

impl Body {
    pub fn is_json(&self) -> bool {
        self.media_type.contains("application/json")
    }
}

/// A response with its bodies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    pub status_code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "keyed_entries")]
    pub bodies: Vec<Body>,
}

impl Keyed for Response {
    fn assign_key(&mut self, key: String) {
        if self.status_code.is_empty() {
            self.status_code = key;
        }
    }
}

/// A body schema, inline or as an embedded JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaSource {
    Document(String),
    Inline(Value),
}

impl SchemaSource {
    pub fn parse(&self) -> Result<Value> {
        match self {
            Self::Document(text) => Ok(serde_json::from_str(text)?),
            Self::Inline(value) => Ok(value.clone()),
        }
    }
}

// =============================================================================
// Named Parameter
// =============================================================================

/// A query parameter declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub display_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub default: Option<Value>,
    pub example: Option<Value>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub repeat: Option<bool>,
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<Value>,
    pub pattern: Option<String>,
}

impl NamedParameter {
    /// A parameter carrying nothing but its name
    pub fn bare(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            param_type: "string".to_string(),
            display_name: name.clone(),
            name,
            description: None,
            required: false,
            default: None,
            example: None,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            repeat: None,
            enum_values: Vec::new(),
            pattern: None,
        }
    }

    /// Read a parameter declaration. A list node (several alternative
    /// types) is not supported and yields a bare parameter.
    pub fn from_node(name: impl Into<String>, node: &Value, required_by_default: bool) -> Self {
        let mut param = Self::bare(name);
        param.required = required_by_default;

        let Some(fields) = node.as_object() else {
            return param;
        };
        let present = |key: &str| fields.get(key).filter(|v| !v.is_null());
        let text = |key: &str| present(key).and_then(Value::as_str).map(String::from);

        if let Some(param_type) = text("type") {
            param.param_type = param_type;
        }
        if let Some(display_name) = text("displayName") {
            param.display_name = display_name;
        }
        if let Some(required) = present("required").and_then(Value::as_bool) {
            param.required = required;
        }
        param.description = text("description");
        param.default = present("default").cloned();
        param.example = present("example").cloned();
        param.min_length = present("minLength").and_then(Value::as_u64);
        param.max_length = present("maxLength").and_then(Value::as_u64);
        param.minimum = present("minimum").and_then(Value::as_f64);
        param.maximum = present("maximum").and_then(Value::as_f64);
        param.repeat = present("repeat").and_then(Value::as_bool);
        param.enum_values = present("enum")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        param.pattern = text("pattern");
        param
    }
}
