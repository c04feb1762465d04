//! DOM Node
//!
//! Nodes link to each other through [`NodeId`]s into the tree arena
//! instead of pointers, so a node is a handful of `u32`s plus its data.

use crate::{DOMTokenList, ElementGeometry, NodeId};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::with_data(NodeData::Text(content.to_string()))
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Self::with_data(NodeData::Comment(content.to_string()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase local name
    tag: String,
    /// Attributes in source order, names lowercased
    attrs: Vec<(String, String)>,
    /// Parsed `class` attribute, kept in sync with `attrs`
    classes: DOMTokenList,
    /// Geometry written by layout and scrolling
    pub geometry: ElementGeometry,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            classes: DOMTokenList::new(),
            geometry: ElementGeometry::default(),
        }
    }

    /// Tag name (lowercase)
    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    /// Get attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Check attribute presence
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Set attribute value, replacing any previous value
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if name == "class" {
            self.classes.set_value(value);
        }
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name, value.to_string())),
        }
    }

    /// Remove attribute, returning its old value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        if name.eq_ignore_ascii_case("class") {
            self.classes = DOMTokenList::new();
        }
        Some(self.attrs.remove(pos).1)
    }

    /// Iterate attributes as `(name, value)`
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// The parsed class list
    pub fn class_list(&self) -> &DOMTokenList {
        &self.classes
    }

    /// Check class membership
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Add a class
    pub fn add_class(&mut self, class: &str) {
        if !self.classes.contains(class) {
            self.classes.add(&[class]);
            self.sync_class_attribute();
        }
    }

    /// Remove a class
    pub fn remove_class(&mut self, class: &str) {
        if self.classes.contains(class) {
            self.classes.remove(&[class]);
            self.sync_class_attribute();
        }
    }

    /// Toggle a class, returns whether it is now present
    pub fn toggle_class(&mut self, class: &str, force: Option<bool>) -> bool {
        let present = self.classes.toggle(class, force);
        self.sync_class_attribute();
        present
    }

    fn sync_class_attribute(&mut self) {
        let value = self.classes.value();
        match self.attrs.iter_mut().find(|(n, _)| n == "class") {
            Some((_, v)) => *v = value,
            None => self.attrs.push(("class".to_string(), value)),
        }
    }
}
