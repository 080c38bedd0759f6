//! End-to-end checks of the validation engine: evaluation order, silent
//! checks, reset behavior, and patch/binding independence.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use form_validator::dom::{Document, NodeId, Selector};
use form_validator::ruleset::{HighlightPatch, RuleSetPatch};
use form_validator::{RuleRef, Validator};

/// A form containing one `.form-group`-wrapped required input.
fn form_fixture(doc: &mut Document) -> (NodeId, NodeId, NodeId) {
    let form = doc.create_child(doc.root(), "form");
    let group = doc.create_child(form, "div");
    doc.add_class(group, "form-group");
    let input = doc.create_child(group, "input");
    doc.set_attr(input, "required", "");
    (form, group, input)
}

/// A custom rule that counts how often it is evaluated.
fn counting_rule(outcome: bool, message: &str) -> (RuleRef, Rc<Cell<usize>>) {
    let counter = Rc::new(Cell::new(0));
    let probe = Rc::clone(&counter);
    let rule = RuleRef::custom(message, move |_, _| {
        probe.set(probe.get() + 1);
        outcome
    });
    (rule, counter)
}

#[test]
fn test_required_field_scenario() {
    let mut doc = Document::new();
    let (_, group, input) = form_fixture(&mut doc);

    let mut validator = Validator::new();
    validator.bind(&mut doc, "form", &[]).unwrap();

    // Empty input: one error, highlight on the form-group ancestor.
    assert_eq!(validator.check(&mut doc, "form", false).unwrap(), 1);
    assert!(doc.has_class(group, "has-error"));
    let tooltip = doc.tooltip(input).unwrap();
    assert!(tooltip.visible);
    assert_eq!(tooltip.title, "This field is required");

    // Filled input: clean check removes the indicators.
    doc.set_value(input, "hello");
    assert_eq!(validator.check(&mut doc, "form", false).unwrap(), 0);
    assert!(!doc.has_class(group, "has-error"));
    assert!(doc.tooltip(input).is_none());
}

#[test]
fn test_short_circuit_stops_at_first_failure() {
    let mut doc = Document::new();
    form_fixture(&mut doc);

    let (failing, failing_count) = counting_rule(false, "first failure");
    let (later, later_count) = counting_rule(true, "never shown");

    let patch = RuleSetPatch {
        validations: Some(vec![failing, later]),
        ..RuleSetPatch::default()
    };

    let mut validator = Validator::new();
    validator.bind(&mut doc, "form", &[patch]).unwrap();
    assert_eq!(validator.check(&mut doc, "form", false).unwrap(), 1);

    // The rule after the failure never ran, and its message never rendered.
    assert_eq!(failing_count.get(), 1);
    assert_eq!(later_count.get(), 0);

    let input = doc
        .select(&Selector::parse("input[required]").unwrap())
        .pop()
        .unwrap();
    assert_eq!(doc.tooltip(input).unwrap().title, "first failure");
}

#[test]
fn test_silent_check_has_no_side_effects() {
    let mut doc = Document::new();
    let (_, group, input) = form_fixture(&mut doc);

    let mut validator = Validator::new();
    validator.bind(&mut doc, "form", &[]).unwrap();

    assert_eq!(validator.check(&mut doc, "form", true).unwrap(), 1);
    assert!(!doc.has_class(group, "has-error"));
    // Bind-time tooltip stays as installed: empty and hidden.
    assert!(!doc.tooltip(input).unwrap().visible);
}

#[test]
fn test_reset_clears_indicators_without_evaluating() {
    let mut doc = Document::new();
    let (_, group, input) = form_fixture(&mut doc);

    let (rule, count) = counting_rule(false, "bad");
    let patch = RuleSetPatch {
        validations: Some(vec![rule]),
        ..RuleSetPatch::default()
    };

    let mut validator = Validator::new();
    validator.bind(&mut doc, "form", &[patch]).unwrap();

    let fresh = validator.check(&mut doc, "form", true).unwrap();
    validator.check(&mut doc, "form", false).unwrap();
    assert!(doc.has_class(group, "has-error"));
    let evaluations_before_reset = count.get();

    validator.reset(&mut doc, "form").unwrap();
    assert!(!doc.has_class(group, "has-error"));
    assert!(doc.tooltip(input).is_none());
    // reset ran no predicate.
    assert_eq!(count.get(), evaluations_before_reset);

    // Stored configuration survives reset: the silent count is reproduced.
    assert_eq!(validator.check(&mut doc, "form", true).unwrap(), fresh);
}

#[test]
fn test_has_errors_agrees_with_check() {
    let mut doc = Document::new();
    let (_, _, input) = form_fixture(&mut doc);

    let mut validator = Validator::new();
    validator.bind(&mut doc, "form", &[]).unwrap();

    let count = validator.check(&mut doc, "form", true).unwrap();
    assert_eq!(
        validator.has_errors(&mut doc, "form", true).unwrap(),
        count > 0
    );

    doc.set_value(input, "value");
    let count = validator.check(&mut doc, "form", true).unwrap();
    assert_eq!(
        validator.has_errors(&mut doc, "form", true).unwrap(),
        count > 0
    );
    assert!(!validator.has_errors(&mut doc, "form", true).unwrap());
}

#[test]
fn test_patches_merge_independently_over_default() {
    let mut doc = Document::new();
    let form = doc.create_child(doc.root(), "form");
    let first = doc.create_child(form, "input");
    doc.set_attr(first, "required", "");
    let second = doc.create_child(form, "input");
    doc.add_class(second, "email");

    // Patch #2 overrides the base message for its own selector only.
    let patch_one = RuleSetPatch::default();
    let patch_two = RuleSetPatch {
        selector: Some("input.email".to_string()),
        validations: Some(vec![RuleRef::named("required")]),
        messages: Some(BTreeMap::from([(
            "required".to_string(),
            "Email is mandatory".to_string(),
        )])),
        highlight: Some(HighlightPatch {
            attach_to: Some("self".to_string()),
            ..HighlightPatch::default()
        }),
        ..RuleSetPatch::default()
    };

    let mut validator = Validator::new();
    validator
        .bind(&mut doc, "form", &[patch_one, patch_two])
        .unwrap();

    assert_eq!(validator.check(&mut doc, "form", false).unwrap(), 2);

    // Rule set #1 kept the default message; #2's override did not leak.
    assert_eq!(doc.tooltip(first).unwrap().title, "This field is required");
    assert_eq!(doc.tooltip(second).unwrap().title, "Email is mandatory");
    // And #1 kept the default attach target while #2 highlights itself.
    assert!(doc.has_class(second, "has-error"));
    assert!(!doc.has_class(first, "has-error"));
}

#[test]
fn test_same_pattern_on_two_documents_is_independent() {
    let mut doc_a = Document::new();
    let (_, _, input_a) = form_fixture(&mut doc_a);
    let mut doc_b = Document::new();
    form_fixture(&mut doc_b);

    let mut validator = Validator::new();
    validator.bind(&mut doc_a, "form", &[]).unwrap();
    validator.bind(&mut doc_b, "form", &[]).unwrap();

    // Distinct identifiers, independent entries: fixing container A's field
    // changes only A's outcome.
    doc_a.set_value(input_a, "done");
    assert_eq!(validator.check(&mut doc_a, "form", true).unwrap(), 0);
    assert_eq!(validator.check(&mut doc_b, "form", true).unwrap(), 1);

    // Rebinding B with a stricter policy leaves A's stored entry untouched.
    let always_fail = RuleRef::custom("strict", |_, _| false);
    let patch = RuleSetPatch {
        validations: Some(vec![always_fail]),
        ..RuleSetPatch::default()
    };
    validator.bind(&mut doc_b, "form", &[patch]).unwrap();
    assert_eq!(validator.check(&mut doc_b, "form", true).unwrap(), 1);
    assert_eq!(validator.check(&mut doc_a, "form", true).unwrap(), 0);
}

#[test]
fn test_element_matched_by_two_rule_sets_counts_twice() {
    let mut doc = Document::new();
    let form = doc.create_child(doc.root(), "form");
    let input = doc.create_child(form, "input");
    doc.set_attr(input, "required", "");
    doc.add_class(input, "strict");

    let patch_one = RuleSetPatch::default();
    let patch_two = RuleSetPatch {
        selector: Some("input.strict".to_string()),
        ..RuleSetPatch::default()
    };

    let mut validator = Validator::new();
    validator
        .bind(&mut doc, "form", &[patch_one, patch_two])
        .unwrap();

    assert_eq!(validator.check(&mut doc, "form", true).unwrap(), 2);
}
