//! Parent Link Resolution
//!
//! Free-type pages hang off arbitrarily deep synthetic paths. The breadcrumb
//! of a page points at its nearest already-registered ancestor page: path
//! segments are peeled off the end of the name prefix until the remaining
//! grandparent is a known page, and only the peeled tail is kept. A generic
//! collection item (`resources[i]`) is re-anchored on the base resource.
//!
//! Correctness depends on depth-first creation: every ancestor of a page is
//! registered before the page's own link is computed.

use super::names::upcase_first;
use super::registry::PageNameRegistry;

/// Path segment marking the item of a resource collection
pub const COLLECTION_ITEM_SEGMENT: &str = "resources[i]";

/// Split at the last `.` that leaves both sides non-empty
fn split_last_segment(prefix: &str) -> Option<(&str, &str)> {
    prefix
        .rmatch_indices('.')
        .map(|(at, _)| at)
        .find(|&at| at > 0 && at + 1 < prefix.len())
        .map(|at| (&prefix[..at], &prefix[at + 1..]))
}

fn has_collection_item_segment(path: &str) -> bool {
    path.split('.').any(|segment| segment == COLLECTION_ITEM_SEGMENT)
}

fn ends_in_collection_item(path: &str) -> bool {
    path.len() > COLLECTION_ITEM_SEGMENT.len() + 1
        && path.ends_with(&format!(".{}", COLLECTION_ITEM_SEGMENT))
}

/// Peel segments off `prefix` until its grandparent is a registered page
pub fn resolve_ancestor(prefix: &str, base_resource: &str, registry: &PageNameRegistry) -> String {
    let Some((grandparent, child)) = split_last_segment(prefix) else {
        return prefix.to_string();
    };

    if registry.contains(grandparent) {
        if has_collection_item_segment(grandparent) {
            format!("{}.{}", base_resource, child)
        } else {
            child.to_string()
        }
    } else {
        format!("{}.{}", resolve_ancestor(grandparent, base_resource, registry), child)
    }
}

/// Breadcrumb link of a page created under `name_prefix`
pub fn resolve_parent(name_prefix: &str, base_resource: &str, registry: &PageNameRegistry) -> String {
    let ancestor = resolve_ancestor(name_prefix, base_resource, registry);
    if ancestor == name_prefix && ends_in_collection_item(name_prefix) {
        upcase_first(base_resource)
    } else {
        upcase_first(&ancestor)
    }
}

/// Base resource of a page: its first name segment, capitalized
pub fn parse_base(page_name: &str) -> String {
    let first = page_name.split('.').next().unwrap_or(page_name);
    upcase_first(first)
}
