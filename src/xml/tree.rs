//! In-memory XML tree.
//!
//! `XmlElement` stores attributes in an `IndexMap` so document order is
//! preserved across parse/serialize round trips, matching what a user
//! sees in the text pane.

use indexmap::IndexMap;
use smol_str::SmolStr;

/// A node in the tree: a child element or a run of character data.
#[derive(Clone, Debug, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element: tag name, ordered attributes, ordered children.
#[derive(Clone, Debug, PartialEq)]
pub struct XmlElement {
    tag: SmolStr,
    attributes: IndexMap<SmolStr, String>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute assignment.
    pub fn with_attribute(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child appension.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.append_element(child);
        self
    }

    // ── Tag ─────────────────────────────────────────────────────────

    pub fn tag(&self) -> &str {
        &self.tag
    }

    // ── Attributes ──────────────────────────────────────────────────

    /// Attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set (or replace) an attribute. Insertion order is kept for new keys.
    pub fn set_attribute(&mut self, name: impl Into<SmolStr>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Remove an attribute, returning its previous value.
    ///
    /// Uses `shift_remove` so the relative order of the remaining
    /// attributes is unchanged.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    // ── Children ────────────────────────────────────────────────────

    /// All child nodes, in document order.
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Child elements only (text runs skipped), in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given tag.
    pub fn find_child(&self, tag: &str) -> Option<&XmlElement> {
        self.child_elements().find(|el| el.tag == tag)
    }

    pub fn find_child_mut(&mut self, tag: &str) -> Option<&mut XmlElement> {
        self.child_elements_mut().find(|el| el.tag == tag)
    }

    /// Append a child element.
    pub fn append_element(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Append a run of character data.
    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Insert a child node at `index` (clamped to the child count).
    pub fn insert_child(&mut self, index: usize, node: XmlNode) {
        let index = index.min(self.children.len());
        self.children.insert(index, node);
    }

    pub(crate) fn last_child_mut(&mut self) -> Option<&mut XmlNode> {
        self.children.last_mut()
    }

    /// Trim surrounding whitespace from text runs and drop runs that
    /// were whitespace only (element indentation).
    pub(crate) fn normalize_text(&mut self) {
        for node in &mut self.children {
            if let XmlNode::Text(t) = node {
                let trimmed = t.trim();
                if trimmed.len() != t.len() {
                    *t = trimmed.to_string();
                }
            }
        }
        self.children
            .retain(|node| !matches!(node, XmlNode::Text(t) if t.is_empty()));
    }

    /// Remove and return the child node at `index`.
    pub fn remove_child(&mut self, index: usize) -> Option<XmlNode> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    /// Remove the first child element with the given tag.
    pub fn remove_child_element(&mut self, tag: &str) -> Option<XmlElement> {
        let index = self.children.iter().position(|node| {
            matches!(node, XmlNode::Element(el) if el.tag == tag)
        })?;
        match self.children.remove(index) {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => unreachable!("position matched an element node"),
        }
    }

    /// Concatenated immediate character data of this element.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let XmlNode::Text(t) = node {
                out.push_str(t);
            }
        }
        out
    }
}
