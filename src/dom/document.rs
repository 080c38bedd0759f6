//! Document Tree
//!
//! Arena-backed element tree. Queries return nodes in document order
//! (preorder), matching what the engine expects from a host document.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use super::selector::{Compound, Selector};

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Tooltip state attached to an element by the render adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipState {
    pub title: String,
    pub placement: String,
    pub visible: bool,
}

#[derive(Debug, Default)]
struct Node {
    tag: String,
    id_attr: Option<String>,
    classes: BTreeSet<String>,
    attrs: BTreeMap<String, String>,
    value: String,
    /// Selected entries of a multi-select widget; `None` for plain inputs.
    selections: Option<Vec<String>>,
    data: BTreeMap<String, String>,
    tooltip: Option<TooltipState>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An element tree with selector queries.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with a single `body` root.
    pub fn new() -> Self {
        let root = Node {
            tag: "body".to_string(),
            ..Node::default()
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Create an element and append it to `parent`.
    pub fn create_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let child = self.create_element(tag);
        self.append_child(parent, child);
        child
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.nodes[node.0].id_attr = Some(id.to_string());
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attrs.get(name).map(String::as_str)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.remove(class);
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.contains(class)
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.nodes[node.0].value = value.to_string();
    }

    pub fn value(&self, node: NodeId) -> &str {
        &self.nodes[node.0].value
    }

    /// Mark the element as a multi-select widget with the given selections.
    pub fn set_selections(&mut self, node: NodeId, selections: Vec<String>) {
        self.nodes[node.0].selections = Some(selections);
    }

    /// Selected entries of a multi-select widget, if the element is one.
    pub fn selections(&self, node: NodeId) -> Option<&[String]> {
        self.nodes[node.0].selections.as_deref()
    }

    pub fn set_data(&mut self, node: NodeId, key: &str, value: &str) {
        self.nodes[node.0]
            .data
            .insert(key.to_string(), value.to_string());
    }

    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.nodes[node.0].data.get(key).map(String::as_str)
    }

    pub fn remove_data(&mut self, node: NodeId, key: &str) {
        self.nodes[node.0].data.remove(key);
    }

    pub fn set_tooltip(&mut self, node: NodeId, tooltip: TooltipState) {
        self.nodes[node.0].tooltip = Some(tooltip);
    }

    pub fn tooltip(&self, node: NodeId) -> Option<&TooltipState> {
        self.nodes[node.0].tooltip.as_ref()
    }

    pub fn tooltip_mut(&mut self, node: NodeId) -> Option<&mut TooltipState> {
        self.nodes[node.0].tooltip.as_mut()
    }

    pub fn remove_tooltip(&mut self, node: NodeId) {
        self.nodes[node.0].tooltip = None;
    }

    /// True when `node` is a strict descendant of `ancestor`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// True when the element matches any compound of the selector.
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector
            .compounds()
            .iter()
            .any(|c| self.matches_compound(node, c))
    }

    /// Nearest self-or-ancestor element matching the selector.
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.matches(n, selector) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// Matching elements anywhere in the document, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.find(self.root(), selector)
    }

    /// Matching strict descendants of `scope`, in document order.
    pub fn find(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut matched = Vec::new();
        self.walk(scope, &mut |node| {
            if node != scope && self.matches(node, selector) {
                matched.push(node);
            }
        });
        matched
    }

    fn walk(&self, node: NodeId, visit: &mut impl FnMut(NodeId)) {
        visit(node);
        for &child in &self.nodes[node.0].children {
            self.walk(child, visit);
        }
    }

    fn matches_compound(&self, node: NodeId, compound: &Compound) -> bool {
        let n = &self.nodes[node.0];
        if let Some(tag) = &compound.tag {
            if n.tag != *tag {
                return false;
            }
        }
        if let Some(id) = &compound.id {
            if n.id_attr.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !compound.classes.iter().all(|c| n.classes.contains(c)) {
            return false;
        }
        compound.attrs.iter().all(|test| match &test.value {
            Some(v) => n.attrs.get(&test.name) == Some(v),
            None => n.attrs.contains_key(&test.name),
        })
    }
}
