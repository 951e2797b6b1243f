//! Page Name Registry
//!
//! Append-only record of every free-type page name created during one
//! generation run, in creation order. Ancestor resolution reads it to find the
//! nearest visible page.

use std::collections::HashSet;

/// Ordered set of created page names
#[derive(Debug, Clone, Default)]
pub struct PageNameRegistry {
    order: Vec<String>,
    index: HashSet<String>,
}

impl PageNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a name. Returns `false` (and changes nothing) if it is already known.
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.index.contains(&name) {
            return false;
        }
        self.index.insert(name.clone());
        self.order.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Names in creation order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget everything registered after the first `len` names
    pub fn truncate(&mut self, len: usize) {
        for name in self.order.drain(len.min(self.order.len())..) {
            self.index.remove(&name);
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_preserves_order() {
        let mut registry = PageNameRegistry::new();
        assert!(registry.register("user.card.visa"));
        assert!(registry.register("user.card.visa.address.1"));
        assert_eq!(registry.names(), ["user.card.visa", "user.card.visa.address.1"]);
        assert!(registry.contains("user.card.visa"));
        assert!(!registry.contains("user.card"));
    }

    #[test]
    fn test_register_never_repeats() {
        let mut registry = PageNameRegistry::new();
        assert!(registry.register("a.b"));
        assert!(!registry.register("a.b"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_truncate_rolls_back() {
        let mut registry = PageNameRegistry::new();
        registry.register("a");
        registry.register("b");
        registry.register("c");
        registry.truncate(1);
        assert_eq!(registry.names(), ["a"]);
        assert!(!registry.contains("b"));
        assert!(registry.register("c"));
    }

    #[test]
    fn test_clear() {
        let mut registry = PageNameRegistry::new();
        registry.register("a");
        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.contains("a"));
    }
}
