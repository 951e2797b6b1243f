//! Page Naming
//!
//! String helpers shared by resource and free-type pages: first-letter casing,
//! slugs, url-safe file names and the resource name conventions of the API
//! description (plural display names, collection URIs, `cert` shorthand).

use regex::Regex;
use std::sync::OnceLock;

use crate::schema::ARRAY_ITEM_SUFFIX;

fn slug_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{M}\p{L}\p{Nd}]+").expect("static regex"))
}

fn plural_display_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^([A-Z]\w*)s$").expect("static regex"))
}

fn plural_collection_uri() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i).*/(.+)s$").expect("static regex"))
}

fn cert_short() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"cert(s*)").expect("static regex"))
}

fn cert_long() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"certificate(s*)").expect("static regex"))
}

fn transform_first(s: &str, f: impl Fn(char) -> String) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => f(first) + chars.as_str(),
        None => String::new(),
    }
}

pub fn upcase_first(s: &str) -> String {
    transform_first(s, |c| c.to_uppercase().collect())
}

pub fn downcase_first(s: &str) -> String {
    transform_first(s, |c| c.to_lowercase().collect())
}

/// Lowercase, collapse every run of non-alphanumerics to `-`, trim dashes
pub fn slugify(s: &str) -> String {
    slug_separator()
        .replace_all(s, "-")
        .trim_matches('-')
        .to_lowercase()
}

/// File-system friendly page name: `[i]` becomes `_i_`
pub fn url_safe(page_name: &str) -> String {
    page_name.replace(ARRAY_ITEM_SUFFIX, "_i_")
}

/// Singular resource name from a plural display name ("Users" -> "user")
pub fn singular_resource_name(display_name: &str) -> Option<String> {
    plural_display_name()
        .captures(display_name)
        .and_then(|caps| caps.get(1))
        .map(|m| downcase_first(m.as_str()))
}

/// Singular item name of a collection URI ("/users/{id}/transfers" -> "transfer")
pub fn collection_item_name(uri: &str) -> Option<String> {
    plural_collection_uri()
        .captures(uri)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Expand the `cert` shorthand to `certificate`
pub fn to_formal_name(name: &str) -> String {
    match cert_short().captures(name) {
        Some(caps) => format!("certificate{}", &caps[1]),
        None => name.to_string(),
    }
}

/// Shorten `certificate` back to `cert`
pub fn to_common_name(name: &str) -> String {
    match cert_long().captures(name) {
        Some(caps) => format!("cert{}", &caps[1]),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_letter_casing() {
        assert_eq!(upcase_first("user"), "User");
        assert_eq!(upcase_first("u"), "U");
        assert_eq!(upcase_first(""), "");
        assert_eq!(downcase_first("Users"), "users");
        assert_eq!(upcase_first("éclair"), "Éclair");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("get-/users/{userId}"), "get-users-userid");
        assert_eq!(slugify("post-/users-(by email)"), "post-users-by-email");
        assert_eq!(slugify("--Already--"), "already");
    }

    #[test]
    fn test_url_safe() {
        assert_eq!(url_safe("user.resources[i].card"), "user.resources_i_.card");
    }

    #[test]
    fn test_singular_resource_name() {
        assert_eq!(singular_resource_name("Users").as_deref(), Some("user"));
        assert_eq!(singular_resource_name("PaymentMethods").as_deref(), Some("paymentMethod"));
        assert_eq!(singular_resource_name("/users"), None);
        assert_eq!(singular_resource_name("Status"), Some("statu".to_string()));
    }

    #[test]
    fn test_collection_item_name() {
        assert_eq!(collection_item_name("/users").as_deref(), Some("user"));
        assert_eq!(collection_item_name("/users/{userId}/transfers").as_deref(), Some("transfer"));
        assert_eq!(collection_item_name("/users/{userId}"), None);
    }

    #[test]
    fn test_cert_names() {
        assert_eq!(to_formal_name("cert"), "certificate");
        assert_eq!(to_formal_name("certs"), "certificates");
        assert_eq!(to_formal_name("user"), "user");
        assert_eq!(to_common_name("certificate"), "cert");
        assert_eq!(to_common_name("certificates"), "certs");
        assert_eq!(to_common_name("user"), "user");
    }
}
