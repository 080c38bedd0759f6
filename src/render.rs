//! Render Adapter
//!
//! The side-effecting boundary between the engine and the host document:
//! highlight classes and tooltip state. All effects are idempotent.

use crate::dom::{Document, NodeId, TooltipState};
use crate::ruleset::{AttachTarget, RuleRef, RuleSet};

/// Install an empty, hidden tooltip on the element if the rule-set renders
/// tooltips. Called once per matched element at bind time.
pub fn setup_tooltip(doc: &mut Document, element: NodeId, rule_set: &RuleSet) {
    if let Some(tooltip) = &rule_set.tooltip {
        doc.set_tooltip(
            element,
            TooltipState {
                title: String::new(),
                placement: tooltip.placement.as_str().to_string(),
                visible: false,
            },
        );
    }
}

/// Mark the element invalid: highlight class on the attach target, tooltip
/// showing the resolved message.
pub fn show_error(doc: &mut Document, element: NodeId, failed: &RuleRef, rule_set: &RuleSet) {
    if let Some(target) = attach_target(doc, element, rule_set) {
        doc.add_class(target, &rule_set.highlight.class_name);
    }

    if let Some(tooltip) = &rule_set.tooltip {
        let title = resolve_message(failed, rule_set);
        doc.set_tooltip(
            element,
            TooltipState {
                title,
                placement: tooltip.placement.as_str().to_string(),
                visible: true,
            },
        );
    }
}

/// Clear any error indicators from the element. A no-op in effect when the
/// element is already clear.
pub fn hide_error(doc: &mut Document, element: NodeId, rule_set: &RuleSet) {
    if let Some(target) = attach_target(doc, element, rule_set) {
        doc.remove_class(target, &rule_set.highlight.class_name);
    }

    if rule_set.tooltip.is_some() {
        doc.remove_tooltip(element);
    }
}

/// The element receiving the highlight class, when highlighting is active.
fn attach_target(doc: &Document, element: NodeId, rule_set: &RuleSet) -> Option<NodeId> {
    if !rule_set.highlight.active {
        return None;
    }
    match &rule_set.highlight.attach_to {
        AttachTarget::SelfElement => Some(element),
        AttachTarget::Closest(selector) => doc.closest(element, selector),
    }
}

/// Display message precedence: inline custom message, then the rule's entry
/// in the message table, then the `base` entry, then empty.
fn resolve_message(failed: &RuleRef, rule_set: &RuleSet) -> String {
    match failed {
        RuleRef::Custom { message, .. } => message.clone(),
        RuleRef::Named(name) => rule_set
            .messages
            .get(name)
            .or_else(|| rule_set.messages.get("base"))
            .cloned()
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::{HighlightPatch, RuleSetPatch, TooltipPatch};

    fn fixture() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let group = doc.create_child(doc.root(), "div");
        doc.add_class(group, "form-group");
        let input = doc.create_child(group, "input");
        doc.set_attr(input, "required", "");
        (doc, group, input)
    }

    #[test]
    fn test_show_and_hide_error_on_ancestor() {
        let (mut doc, group, input) = fixture();
        let rs = RuleSet::default();

        show_error(&mut doc, input, &RuleRef::named("required"), &rs);
        assert!(doc.has_class(group, "has-error"));
        let tooltip = doc.tooltip(input).unwrap();
        assert!(tooltip.visible);
        assert_eq!(tooltip.title, "This field is required");

        hide_error(&mut doc, input, &rs);
        assert!(!doc.has_class(group, "has-error"));
        assert!(doc.tooltip(input).is_none());

        // Hiding an already-clear element stays clear.
        hide_error(&mut doc, input, &rs);
        assert!(!doc.has_class(group, "has-error"));
    }

    #[test]
    fn test_message_precedence() {
        let rs = RuleSet::default();
        let custom = RuleRef::custom("Inline wins", |_, _| false);
        assert_eq!(resolve_message(&custom, &rs), "Inline wins");
        assert_eq!(
            resolve_message(&RuleRef::named("required"), &rs),
            "This field is required"
        );
        // Unnamed entry falls back to base.
        assert_eq!(
            resolve_message(&RuleRef::named("zip"), &rs),
            "Field is invalid"
        );

        let mut bare = RuleSet::default();
        bare.messages.clear();
        assert_eq!(resolve_message(&RuleRef::named("zip"), &bare), "");
    }

    #[test]
    fn test_attach_to_self_and_inactive_highlight() {
        let (mut doc, group, input) = fixture();

        let rs = RuleSetPatch {
            highlight: Some(HighlightPatch {
                attach_to: Some("self".to_string()),
                ..HighlightPatch::default()
            }),
            ..RuleSetPatch::default()
        }
        .resolve()
        .unwrap();
        show_error(&mut doc, input, &RuleRef::named("required"), &rs);
        assert!(doc.has_class(input, "has-error"));
        assert!(!doc.has_class(group, "has-error"));
        hide_error(&mut doc, input, &rs);

        let rs = RuleSetPatch {
            highlight: Some(HighlightPatch {
                active: Some(false),
                ..HighlightPatch::default()
            }),
            ..RuleSetPatch::default()
        }
        .resolve()
        .unwrap();
        show_error(&mut doc, input, &RuleRef::named("required"), &rs);
        assert!(!doc.has_class(input, "has-error"));
        assert!(!doc.has_class(group, "has-error"));
    }

    #[test]
    fn test_tooltip_disabled_rule_set() {
        let (mut doc, _, input) = fixture();
        let rs = RuleSetPatch {
            tooltip: Some(TooltipPatch {
                enabled: Some(false),
                ..TooltipPatch::default()
            }),
            ..RuleSetPatch::default()
        }
        .resolve()
        .unwrap();

        setup_tooltip(&mut doc, input, &rs);
        assert!(doc.tooltip(input).is_none());
        show_error(&mut doc, input, &RuleRef::named("required"), &rs);
        assert!(doc.tooltip(input).is_none());
    }
}
