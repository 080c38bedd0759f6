//! Rules File Schema
//!
//! TOML-declarable rule definitions and rule-set entries, converted into
//! registry registrations and [`RuleSetPatch`]es. A TOML file cannot carry
//! closures, so declarative rule kinds compile into predicates here.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::rules::RuleRegistry;
use crate::ruleset::{HighlightPatch, RuleRef, RuleSetPatch, TooltipPatch};

/// Root rules file structure (matches TOML).
///
/// ```toml
/// [[rule]]
/// name = "zip"
/// kind = "pattern"
/// regex = "^[0-9]{5}$"
///
/// [[ruleset]]
/// selector = "input.zip"
/// validations = ["required", "zip"]
/// [ruleset.messages]
/// zip = "Enter a 5-digit ZIP code"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesFile {
    pub rule: Vec<RuleDef>,
    pub ruleset: Vec<RuleSetDef>,
}

/// A declaratively defined named rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDef {
    pub name: String,
    #[serde(flatten)]
    pub kind: RuleKind,
}

/// Declarative rule kinds.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    /// Passes when the element value is non-empty.
    NonEmpty,
    /// Passes when the element value has at least `min` characters.
    MinLength { min: usize },
    /// Passes when the element value matches the regular expression.
    Pattern { regex: String },
}

/// One rule-set entry; validations are referenced by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuleSetDef {
    pub selector: Option<String>,
    pub triggers: Option<Vec<String>>,
    pub validations: Option<Vec<String>>,
    pub messages: Option<BTreeMap<String, String>>,
    pub tooltip: Option<TooltipPatch>,
    pub highlight: Option<HighlightPatch>,
}

impl RuleSetDef {
    /// Convert to a runtime patch; named validations resolve later at bind.
    pub fn into_patch(self) -> RuleSetPatch {
        RuleSetPatch {
            selector: self.selector,
            triggers: self.triggers,
            validations: self
                .validations
                .map(|names| names.into_iter().map(RuleRef::named).collect()),
            messages: self.messages,
            tooltip: self.tooltip,
            highlight: self.highlight,
        }
    }
}

impl RulesFile {
    /// Register every declared rule and return the rule-set patches.
    pub fn apply(self, registry: &mut RuleRegistry) -> Result<Vec<RuleSetPatch>> {
        for def in self.rule {
            let predicate = compile(&def)?;
            registry.register(def.name, move |doc, node| predicate(doc.value(node)));
        }
        Ok(self.ruleset.into_iter().map(RuleSetDef::into_patch).collect())
    }
}

/// Compile a declarative rule into a value predicate.
fn compile(def: &RuleDef) -> Result<Box<dyn Fn(&str) -> bool>> {
    match &def.kind {
        RuleKind::NonEmpty => Ok(Box::new(|value| !value.is_empty())),
        RuleKind::MinLength { min } => {
            let min = *min;
            Ok(Box::new(move |value| value.chars().count() >= min))
        }
        RuleKind::Pattern { regex } => {
            let compiled = regex::Regex::new(regex).map_err(|e| Error::RuleDef {
                name: def.name.clone(),
                reason: e.to_string(),
            })?;
            Ok(Box::new(move |value| compiled.is_match(value)))
        }
    }
}
