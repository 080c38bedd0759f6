//! Rule-Set Configuration
//!
//! Resolved validation policies and the partial configurations they are
//! merged from. Partials merge over a copy of the built-in default only,
//! never with each other.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

use crate::dom::selector::{AttrTest, Compound};
use crate::dom::{Document, NodeId, Selector};
use crate::error::Result;

/// Predicate over a matched element. Engine is single-threaded, so `Rc`.
pub type Predicate = Rc<dyn Fn(&Document, NodeId) -> bool>;

/// Reference to one validation rule in a rule sequence.
#[derive(Clone)]
pub enum RuleRef {
    /// Resolved through the rule registry at evaluation time.
    Named(String),
    /// Inline predicate carrying its own message; never touches the registry.
    Custom { validator: Predicate, message: String },
}

impl RuleRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn custom(
        message: impl Into<String>,
        validator: impl Fn(&Document, NodeId) -> bool + 'static,
    ) -> Self {
        Self::Custom {
            validator: Rc::new(validator),
            message: message.into(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Custom { .. } => None,
        }
    }
}

impl fmt::Debug for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Custom { message, .. } => {
                f.debug_struct("Custom").field("message", message).finish()
            }
        }
    }
}

/// Tooltip placement relative to the validated element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Top,
    Bottom,
    Left,
    Right,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// How the tooltip widget decides to show itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipTrigger {
    Manual,
    Hover,
    Focus,
}

/// Tooltip rendering options. Absent on a rule-set to disable tooltips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub placement: Placement,
    pub html: bool,
    pub trigger: TooltipTrigger,
    pub container: String,
}

impl Default for Tooltip {
    fn default() -> Self {
        Self {
            placement: Placement::Right,
            html: true,
            trigger: TooltipTrigger::Manual,
            container: "body".to_string(),
        }
    }
}

/// Where the error highlight class lands.
#[derive(Debug, Clone)]
pub enum AttachTarget {
    /// The validated element itself.
    SelfElement,
    /// The nearest self-or-ancestor element matching the selector.
    Closest(Selector),
}

/// Highlight class options.
#[derive(Debug, Clone)]
pub struct Highlight {
    pub class_name: String,
    pub attach_to: AttachTarget,
    pub active: bool,
}

impl Default for Highlight {
    fn default() -> Self {
        Self {
            class_name: "has-error".to_string(),
            attach_to: AttachTarget::Closest(Selector::from_parts(
                ".form-group",
                vec![Compound {
                    classes: vec!["form-group".to_string()],
                    ..Compound::default()
                }],
            )),
            active: true,
        }
    }
}

/// One resolved validation policy over a group of matched elements.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Which descendants of the bound container this policy governs.
    pub selector: Selector,
    /// Event names that re-evaluate the policy for the firing element.
    pub triggers: Vec<String>,
    /// Evaluated in order; the first failing rule decides the outcome.
    pub validations: Vec<RuleRef>,
    /// Rule name to display text, with a `base` fallback entry.
    pub messages: BTreeMap<String, String>,
    pub tooltip: Option<Tooltip>,
    pub highlight: Highlight,
}

impl Default for RuleSet {
    fn default() -> Self {
        let mut messages = BTreeMap::new();
        messages.insert("required".to_string(), "This field is required".to_string());
        messages.insert("base".to_string(), "Field is invalid".to_string());

        Self {
            selector: Selector::from_parts(
                "input[required]",
                vec![Compound {
                    tag: Some("input".to_string()),
                    attrs: vec![AttrTest {
                        name: "required".to_string(),
                        value: None,
                    }],
                    ..Compound::default()
                }],
            ),
            triggers: vec!["blur".to_string()],
            validations: vec![RuleRef::named("required")],
            messages,
            tooltip: Some(Tooltip::default()),
            highlight: Highlight::default(),
        }
    }
}

/// Partial tooltip settings, merged field-wise over the default tooltip.
/// `enabled: Some(false)` disables tooltip rendering entirely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TooltipPatch {
    pub enabled: Option<bool>,
    pub placement: Option<Placement>,
    pub html: Option<bool>,
    pub trigger: Option<TooltipTrigger>,
    pub container: Option<String>,
}

/// Partial highlight settings. `attach_to` accepts a selector or `"self"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HighlightPatch {
    pub class_name: Option<String>,
    pub attach_to: Option<String>,
    pub active: Option<bool>,
}

/// One partial rule-set configuration as supplied to `bind`.
#[derive(Debug, Clone, Default)]
pub struct RuleSetPatch {
    pub selector: Option<String>,
    pub triggers: Option<Vec<String>>,
    pub validations: Option<Vec<RuleRef>>,
    /// Merged entry-wise over the default message table.
    pub messages: Option<BTreeMap<String, String>>,
    pub tooltip: Option<TooltipPatch>,
    pub highlight: Option<HighlightPatch>,
}

impl RuleSetPatch {
    /// Merge this partial over a fresh copy of the default configuration.
    pub fn resolve(&self) -> Result<RuleSet> {
        let mut resolved = RuleSet::default();

        if let Some(selector) = &self.selector {
            resolved.selector = Selector::parse(selector)?;
        }
        if let Some(triggers) = &self.triggers {
            resolved.triggers = triggers.clone();
        }
        if let Some(validations) = &self.validations {
            resolved.validations = validations.clone();
        }
        if let Some(messages) = &self.messages {
            for (name, text) in messages {
                resolved.messages.insert(name.clone(), text.clone());
            }
        }
        if let Some(patch) = &self.tooltip {
            resolved.tooltip = if patch.enabled == Some(false) {
                None
            } else {
                let mut tooltip = Tooltip::default();
                if let Some(placement) = patch.placement {
                    tooltip.placement = placement;
                }
                if let Some(html) = patch.html {
                    tooltip.html = html;
                }
                if let Some(trigger) = patch.trigger {
                    tooltip.trigger = trigger;
                }
                if let Some(container) = &patch.container {
                    tooltip.container = container.clone();
                }
                Some(tooltip)
            };
        }
        if let Some(patch) = &self.highlight {
            if let Some(class_name) = &patch.class_name {
                resolved.highlight.class_name = class_name.clone();
            }
            if let Some(attach_to) = &patch.attach_to {
                resolved.highlight.attach_to = if attach_to == "self" {
                    AttachTarget::SelfElement
                } else {
                    AttachTarget::Closest(Selector::parse(attach_to)?)
                };
            }
            if let Some(active) = patch.active {
                resolved.highlight.active = active;
            }
        }

        Ok(resolved)
    }
}
