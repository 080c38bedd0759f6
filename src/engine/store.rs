//! Configuration Store and Identity Allocation
//!
//! Pure key-value storage for resolved rule-set sequences, keyed by the
//! container selector pattern plus a per-bind identifier.

use std::collections::HashMap;

use crate::ruleset::RuleSet;

/// Identifier issued once per `bind` call.
pub type BindingId = u64;

/// Monotonic identifier allocator. Identifiers are never released;
/// uniqueness within the allocator's lifetime is the whole contract.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: BindingId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> BindingId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Key for one binding: the container selector text plus the bind id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub pattern: String,
    pub id: BindingId,
}

impl BindingKey {
    pub fn new(pattern: &str, id: BindingId) -> Self {
        Self {
            pattern: pattern.to_string(),
            id,
        }
    }
}

impl std::fmt::Display for BindingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.pattern, self.id)
    }
}

/// Binding key → resolved rule-set sequence. Always a sequence, even for a
/// single rule set, so resolution stays uniform. Mutated only by bind and
/// unbind.
#[derive(Debug, Default)]
pub struct ConfigStore {
    entries: HashMap<BindingKey, Vec<RuleSet>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a sequence, replacing any previous entry under the same key.
    pub fn put(&mut self, key: BindingKey, rule_sets: Vec<RuleSet>) {
        self.entries.insert(key, rule_sets);
    }

    pub fn get(&self, key: &BindingKey) -> Option<&[RuleSet]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn remove(&mut self, key: &BindingKey) -> Option<Vec<RuleSet>> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
