//! Validator
//!
//! Orchestrates binding setup, trigger dispatch, rule evaluation order, and
//! error-count aggregation over a host document.

use crate::dom::{Document, NodeId, Selector};
use crate::error::{Error, Result};
use crate::render;
use crate::rules::RuleRegistry;
use crate::ruleset::{RuleRef, RuleSet, RuleSetPatch};

use super::store::{BindingKey, ConfigStore, IdAllocator};

/// Data key tagging bound containers with their binding identifier.
const BINDING_TAG: &str = "validator-uid";

/// One delegated trigger registration. Stored explicitly instead of being
/// captured in a closure, so dispatch looks the binding up at fire time.
#[derive(Debug, Clone)]
struct ListenerRecord {
    container: NodeId,
    key: BindingKey,
    /// Index of the rule set whose selector gates delegation.
    rule_set_index: usize,
    event: String,
}

/// The validation engine. Owns its configuration store, identity allocator,
/// rule registry, and listener records; single-threaded by design.
#[derive(Debug, Default)]
pub struct Validator {
    store: ConfigStore,
    ids: IdAllocator,
    registry: RuleRegistry,
    listeners: Vec<ListenerRecord>,
}

impl Validator {
    /// Engine with the built-in rule registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a caller-prepared registry.
    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Extend the rule registry in place.
    pub fn registry_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    /// Bind rule sets to every container matched by `pattern`.
    ///
    /// An empty patch slice binds the single default rule set; otherwise each
    /// patch is merged independently over the default, yielding one rule set
    /// per patch. Named rules missing from the registry are rejected here.
    ///
    /// Rebinding a container accumulates listener records on top of the old
    /// ones; use [`unbind`](Self::unbind) first for a clean slate.
    pub fn bind(
        &mut self,
        doc: &mut Document,
        pattern: &str,
        patches: &[RuleSetPatch],
    ) -> Result<()> {
        let container_sel = Selector::parse(pattern)?;

        let rule_sets: Vec<RuleSet> = if patches.is_empty() {
            vec![RuleSet::default()]
        } else {
            patches
                .iter()
                .map(RuleSetPatch::resolve)
                .collect::<Result<_>>()?
        };

        for rule_set in &rule_sets {
            for rule in &rule_set.validations {
                if let RuleRef::Named(name) = rule {
                    if !self.registry.contains(name) {
                        return Err(Error::UnknownRule(name.clone()));
                    }
                }
            }
        }

        let id = self.ids.allocate();
        let key = BindingKey::new(pattern, id);
        let containers = doc.select(&container_sel);

        for &container in &containers {
            if doc.data(container, BINDING_TAG).is_some() {
                log::warn!(
                    "rebinding container under '{pattern}': previously attached \
                     trigger listeners remain active"
                );
            }
            doc.set_data(container, BINDING_TAG, &id.to_string());

            for (index, rule_set) in rule_sets.iter().enumerate() {
                for element in doc.find(container, &rule_set.selector) {
                    render::setup_tooltip(doc, element, rule_set);
                }
                for event in &rule_set.triggers {
                    self.listeners.push(ListenerRecord {
                        container,
                        key: key.clone(),
                        rule_set_index: index,
                        event: event.clone(),
                    });
                }
            }
        }

        log::debug!(
            "bound {} rule set(s) to {} container(s) as {key}",
            rule_sets.len(),
            containers.len()
        );
        self.store.put(key, rule_sets);
        Ok(())
    }

    /// Remove the binding from every container matched by `pattern`: store
    /// entry, listener records, and container tags. Unbound containers are
    /// skipped.
    pub fn unbind(&mut self, doc: &mut Document, pattern: &str) -> Result<()> {
        let container_sel = Selector::parse(pattern)?;
        let containers = doc.select(&container_sel);

        // Accumulated rebinds leave records under older identifiers; drop
        // every record this pattern produced for these containers.
        let mut stale_keys: Vec<BindingKey> = Vec::new();
        self.listeners.retain(|record| {
            let stale =
                record.key.pattern == pattern && containers.contains(&record.container);
            if stale && !stale_keys.contains(&record.key) {
                stale_keys.push(record.key.clone());
            }
            !stale
        });

        for &container in &containers {
            if let Some(id) = self.binding_id(doc, container) {
                let key = BindingKey::new(pattern, id);
                if !stale_keys.contains(&key) {
                    stale_keys.push(key);
                }
                doc.remove_data(container, BINDING_TAG);
            }
        }

        for key in stale_keys {
            self.store.remove(&key);
            log::debug!("unbound {key}");
        }
        Ok(())
    }

    /// Trigger pipeline: deliver an event fired on `target` to every
    /// matching listener record. The record's rule set gates delegation; the
    /// first rule set in the stored sequence whose matched set contains the
    /// target owns the evaluation.
    pub fn dispatch(&self, doc: &mut Document, event: &str, target: NodeId) {
        // Records are immutable during dispatch; collect the work first.
        let mut pending: Vec<(NodeId, BindingKey)> = Vec::new();
        for record in &self.listeners {
            if record.event != event || !doc.contains(record.container, target) {
                continue;
            }
            let Some(rule_sets) = self.store.get(&record.key) else {
                continue;
            };
            let Some(gate) = rule_sets.get(record.rule_set_index) else {
                continue;
            };
            if !doc.matches(target, &gate.selector) {
                continue;
            }
            pending.push((record.container, record.key.clone()));
        }

        for (container, key) in pending {
            log::trace!("'{event}' on element under {key}");
            let Some(rule_sets) = self.store.get(&key) else {
                continue;
            };
            for rule_set in rule_sets {
                if doc.find(container, &rule_set.selector).contains(&target) {
                    match self.evaluate(doc, target, rule_set) {
                        Some(failed) => render::show_error(doc, target, &failed, rule_set),
                        None => render::hide_error(doc, target, rule_set),
                    }
                    break;
                }
            }
        }
    }

    /// Evaluate every bound rule set over every matched element in every
    /// container matched by `pattern`. Returns the total number of invalid
    /// (rule set, element) outcomes. Unless `silent`, invalid elements get
    /// error rendering and valid elements are cleared.
    pub fn check(&self, doc: &mut Document, pattern: &str, silent: bool) -> Result<usize> {
        let container_sel = Selector::parse(pattern)?;
        let mut error_count = 0;

        for container in doc.select(&container_sel) {
            let rule_sets = self.lookup(doc, container, pattern)?;
            for rule_set in rule_sets {
                for element in doc.find(container, &rule_set.selector) {
                    match self.evaluate(doc, element, rule_set) {
                        Some(failed) => {
                            error_count += 1;
                            if !silent {
                                render::show_error(doc, element, &failed, rule_set);
                            }
                        }
                        None => {
                            if !silent {
                                render::hide_error(doc, element, rule_set);
                            }
                        }
                    }
                }
            }
        }

        log::debug!("check '{pattern}': {error_count} error(s)");
        Ok(error_count)
    }

    /// Same evaluation and side effects as [`check`](Self::check); reports
    /// whether any element ended invalid.
    pub fn has_errors(&self, doc: &mut Document, pattern: &str, silent: bool) -> Result<bool> {
        Ok(self.check(doc, pattern, silent)? > 0)
    }

    /// Clear all error indicators for every bound rule set without running
    /// any predicate.
    pub fn reset(&self, doc: &mut Document, pattern: &str) -> Result<()> {
        let container_sel = Selector::parse(pattern)?;
        for container in doc.select(&container_sel) {
            let rule_sets = self.lookup(doc, container, pattern)?;
            for rule_set in rule_sets {
                for element in doc.find(container, &rule_set.selector) {
                    render::hide_error(doc, element, rule_set);
                }
            }
        }
        Ok(())
    }

    /// Rule sequence evaluation, shared by dispatch and check: first failing
    /// rule wins, later rules never run. Returns the failing rule, `None`
    /// when the element is valid.
    fn evaluate(&self, doc: &Document, element: NodeId, rule_set: &RuleSet) -> Option<RuleRef> {
        for rule in &rule_set.validations {
            let Some(predicate) = self.registry.resolve(rule) else {
                // Bind rejects unknown names, so this only fires if the
                // registry shrank afterwards. Treated as vacuously passing.
                if let Some(name) = rule.name() {
                    log::warn!("skipping unresolvable rule '{name}'");
                }
                continue;
            };
            if !predicate(doc, element) {
                return Some(rule.clone());
            }
        }
        None
    }

    fn binding_id(&self, doc: &Document, container: NodeId) -> Option<u64> {
        doc.data(container, BINDING_TAG)?.parse().ok()
    }

    fn lookup(&self, doc: &Document, container: NodeId, pattern: &str) -> Result<&[RuleSet]> {
        let id = self
            .binding_id(doc, container)
            .ok_or_else(|| Error::NotBound(pattern.to_string()))?;
        self.store
            .get(&BindingKey::new(pattern, id))
            .ok_or_else(|| Error::NotBound(pattern.to_string()))
    }
}
