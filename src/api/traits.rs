//! Trait Resolution
//!
//! Methods pull shared fragments in by name (`is: [paged: {maxItems: 50}]`).
//! A referenced trait is copied out of the global table, its `<<param>>`
//! placeholders are replaced with the reference's arguments, and any query
//! parameters it declares are merged into the method.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::{ApiRoot, Method, NamedEntries, NamedParameter};
use crate::config::TraitMergePolicy;

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<<([^<>]+)>>$").expect("static regex"))
}

fn placeholder_name(value: &Value) -> Option<&str> {
    let text = value.as_str()?;
    placeholder().captures(text).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// A trait template with its placeholders substituted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTrait {
    pub name: String,
    pub body: Value,
    /// Placeholder names that had no matching argument
    pub unresolved: Vec<String>,
    /// Query parameters the trait declares
    pub query_parameters: Vec<String>,
}

/// Outcome of resolving a method's trait references
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraitResolution {
    pub resolved: Vec<ResolvedTrait>,
    /// Referenced names absent from the global trait table
    pub missing: Vec<String>,
}

/// Copy `template`, replacing every value that is exactly `<<name>>` with
/// `args[name]`. Substituted values are not walked again. Arguments that are
/// not a mapping substitute nothing.
pub fn substitute_parameters(template: &Value, args: &Value) -> Value {
    let mut resolved = template.clone();
    if let Some(args) = args.as_object() {
        substitute_in_place(&mut resolved, args);
    }
    resolved
}

fn substitute_in_place(node: &mut Value, args: &serde_json::Map<String, Value>) {
    let children: Box<dyn Iterator<Item = &mut Value>> = match node {
        Value::Object(map) => Box::new(map.values_mut()),
        Value::Array(items) => Box::new(items.iter_mut()),
        _ => return,
    };

    for child in children {
        let replacement = placeholder_name(child).and_then(|name| args.get(name));
        match replacement {
            Some(value) => *child = value.clone(),
            None => substitute_in_place(child, args),
        }
    }
}

/// Placeholder names still present in `node`, in document order
pub fn unresolved_placeholders(node: &Value) -> Vec<String> {
    let mut names = Vec::new();
    collect_placeholders(node, &mut names);
    names
}

fn collect_placeholders(node: &Value, names: &mut Vec<String>) {
    match node {
        Value::Object(map) => map.values().for_each(|v| collect_placeholders(v, names)),
        Value::Array(items) => items.iter().for_each(|v| collect_placeholders(v, names)),
        other => {
            if let Some(name) = placeholder_name(other) {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
    }
}

fn declared_query_parameters(name: &str, body: &Value) -> Vec<NamedParameter> {
    let Some(node) = body.get("queryParameters").filter(|v| !v.is_null()) else {
        return Vec::new();
    };
    match NamedEntries::<Value>::from_value(node.clone()) {
        Ok(entries) => entries
            .into_iter()
            .map(|(param, node)| NamedParameter::from_node(param, &node, false))
            .collect(),
        Err(e) => {
            warn!(trait_name = name, error = %e, "ignoring unreadable trait query parameters");
            Vec::new()
        }
    }
}

fn merge_query_parameter(method: &mut Method, param: NamedParameter, policy: TraitMergePolicy) {
    match method.query_parameters.iter_mut().find(|p| p.name == param.name) {
        Some(existing) => {
            if policy == TraitMergePolicy::TraitOverrides {
                *existing = param;
            }
        }
        None => method.query_parameters.push(param),
    }
}

/// Resolve every trait `method` references and merge their query parameters.
///
/// Unknown traits are skipped and reported in [`TraitResolution::missing`];
/// the global trait table is only read.
pub fn resolve_is_parameters(root: &ApiRoot, method: &mut Method, policy: TraitMergePolicy) -> TraitResolution {
    let mut resolution = TraitResolution::default();
    let references: Vec<(String, Value)> = method
        .is
        .iter()
        .map(|(name, args)| (name.to_string(), args.clone()))
        .collect();

    for (name, args) in references {
        let Some(template) = root.trait_template(&name) else {
            warn!(trait_name = %name, method = %method.method, "trait is not defined, skipping");
            resolution.missing.push(name);
            continue;
        };

        let body = substitute_parameters(template, &args);
        let params = declared_query_parameters(&name, &body);
        debug!(trait_name = %name, parameters = params.len(), "resolved trait");

        let query_parameters = params.iter().map(|p| p.name.clone()).collect();
        for param in params {
            merge_query_parameter(method, param, policy);
        }

        resolution.resolved.push(ResolvedTrait {
            unresolved: unresolved_placeholders(&body),
            name,
            body,
            query_parameters,
        });
    }

    resolution
}
