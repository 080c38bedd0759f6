//! Rule Registry
//!
//! Simple in-memory mapping from rule names to element predicates.

use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::{Document, NodeId};
use crate::ruleset::{Predicate, RuleRef};

/// Registry of named validation predicates.
///
/// Ships with the single built-in rule `required`. Callers extend it with
/// [`register`](Self::register); inline [`RuleRef::Custom`] rules bypass it
/// entirely.
#[derive(Clone)]
pub struct RuleRegistry {
    methods: HashMap<String, Predicate>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("RuleRegistry").field("methods", &names).finish()
    }
}

impl RuleRegistry {
    /// Create a registry holding the built-in rules.
    pub fn new() -> Self {
        let mut methods: HashMap<String, Predicate> = HashMap::new();
        methods.insert("required".to_string(), Rc::new(required));
        Self { methods }
    }

    /// Register or replace a named predicate.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl Fn(&Document, NodeId) -> bool + 'static,
    ) {
        self.methods.insert(name.into(), Rc::new(predicate));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Resolve a rule reference to its predicate. `None` only for a named
    /// rule missing from the registry.
    pub fn resolve(&self, rule: &RuleRef) -> Option<Predicate> {
        match rule {
            RuleRef::Named(name) => self.methods.get(name).cloned(),
            RuleRef::Custom { validator, .. } => Some(Rc::clone(validator)),
        }
    }
}

/// Built-in `required` rule. A multi-select widget passes when it has at
/// least one selected entry; any other element when its raw value is
/// non-empty.
fn required(doc: &Document, node: NodeId) -> bool {
    match doc.selections(node) {
        Some(selections) => !selections.is_empty(),
        None => !doc.value(node).is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_required() {
        let registry = RuleRegistry::new();
        assert!(registry.contains("required"));
        assert!(!registry.contains("email"));

        let mut doc = Document::new();
        let input = doc.create_child(doc.root(), "input");
        let pred = registry.resolve(&RuleRef::named("required")).unwrap();
        assert!(!pred(&doc, input));
        doc.set_value(input, "x");
        assert!(pred(&doc, input));
    }

    #[test]
    fn test_required_multi_select() {
        let registry = RuleRegistry::new();
        let pred = registry.resolve(&RuleRef::named("required")).unwrap();

        let mut doc = Document::new();
        let select = doc.create_child(doc.root(), "select");
        doc.set_selections(select, vec![]);
        // Raw value is irrelevant for a multi-select widget.
        doc.set_value(select, "ignored");
        assert!(!pred(&doc, select));

        doc.set_selections(select, vec!["one".to_string()]);
        assert!(pred(&doc, select));
    }

    #[test]
    fn test_register_and_resolve_custom() {
        let mut registry = RuleRegistry::new();
        registry.register("always-fails", |_, _| false);
        assert!(registry.contains("always-fails"));

        let pred = registry.resolve(&RuleRef::named("always-fails")).unwrap();
        let doc = Document::new();
        assert!(!pred(&doc, doc.root()));

        assert!(registry.resolve(&RuleRef::named("missing")).is_none());

        let inline = RuleRef::custom("msg", |_, _| true);
        assert!(registry.resolve(&inline).is_some());
    }
}
