//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed; removing a node detaches it so existing
//! [`NodeId`]s stay valid for the lifetime of the tree.

use crate::{DomError, ElementData, Node, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text))
    }

    // ---------------------------------------------------------------------
    // Structure
    // ---------------------------------------------------------------------

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.get(parent).ok_or(DomError::NodeNotFound(parent))?;
        self.get(child).ok_or(DomError::NodeNotFound(child))?;
        if child == NodeId::ROOT || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) || reference == child {
                return Err(DomError::HierarchyRequest { parent, child: reference });
            }
        }

        self.detach(child);

        let prev = match reference {
            Some(reference) => self.nodes[reference.index()].prev_sibling,
            None => self.nodes[parent.index()].last_child,
        };
        let next = reference.unwrap_or(NodeId::NONE);

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
        Ok(())
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    /// Unlink a node from its parent. Returns false if it had none.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return false;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        true
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    fn link(&self, id: NodeId, pick: impl Fn(&Node) -> NodeId) -> Option<NodeId> {
        self.get(id).map(pick).filter(|n| n.is_valid())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.parent)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.first_child)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.last_child)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.next_sibling)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.prev_sibling)
    }

    /// Nearest previous sibling that is an element
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.prev_sibling(id);
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = self.prev_sibling(sibling);
        }
        None
    }

    /// Nearest next sibling that is an element
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(id);
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = self.next_sibling(sibling);
        }
        None
    }

    /// Direct children, all node kinds
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children { tree: self, next: self.first_child(id) }
    }

    /// Direct children that are elements
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(|&c| self.is_element(c))
    }

    /// Ancestors from the parent up to the document node
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: self.parent(id) }
    }

    /// Descendants in document (pre-)order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants { tree: self, scope: id, next: self.first_child(id) }
    }

    /// Inclusive containment check
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether the node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }

    // ---------------------------------------------------------------------
    // Elements
    // ---------------------------------------------------------------------

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id)?.as_element_mut()
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag_name)
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attribute(name)
    }

    /// Set an attribute. Returns false when `id` is not an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                el.set_attribute(name, value);
                true
            }
            None => false,
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)?.remove_attribute(name)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.add_class(class);
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.remove_class(class);
        }
    }

    /// First descendant of `scope` whose `id` attribute equals `id`
    pub fn find_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(scope)
            .find(|&node| self.element(node).and_then(ElementData::id) == Some(id))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        if let Some(own) = self.get(id).and_then(Node::as_text) {
            text.push_str(own);
        }
        for node in self.descendants(id) {
            if let Some(t) = self.get(node).and_then(Node::as_text) {
                text.push_str(t);
            }
        }
        text
    }

    /// Element following `node` in document order inside `scope`
    fn following_in(&self, node: NodeId, scope: NodeId) -> Option<NodeId> {
        if let Some(child) = self.first_child(node) {
            return Some(child);
        }
        let mut current = node;
        while current != scope {
            if let Some(sibling) = self.next_sibling(current) {
                return Some(sibling);
            }
            current = self.parent(current)?;
        }
        None
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
#[derive(Debug, Clone)]
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Iterator over ancestors, nearest first
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over a subtree
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    tree: &'a DomTree,
    scope: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.following_in(current, self.scope);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
        let ul = tree.create_element("ul");
        let a = tree.create_element("li");
        let b = tree.create_element("li");
        let c = tree.create_element("li");
        tree.append_child(tree.root(), ul).unwrap();
        for li in [a, b, c] {
            tree.append_child(ul, li).unwrap();
        }
        (ul, a, b, c)
    }

    #[test]
    fn test_append_links_siblings() {
        let mut tree = DomTree::new();
        let (ul, a, b, c) = list(&mut tree);

        assert_eq!(tree.children(ul).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.next_sibling(b), Some(c));
        assert_eq!(tree.last_child(ul), Some(c));
    }

    #[test]
    fn test_detach_middle_child() {
        let mut tree = DomTree::new();
        let (ul, a, b, c) = list(&mut tree);

        assert!(tree.detach(b));
        assert_eq!(tree.children(ul).collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(tree.parent(b), None);
        assert!(!tree.is_connected(b));
        assert!(!tree.detach(b));
    }

    #[test]
    fn test_insert_before_moves_node() {
        let mut tree = DomTree::new();
        let (ul, a, b, c) = list(&mut tree);

        tree.insert_before(ul, c, Some(a)).unwrap();
        assert_eq!(tree.children(ul).collect::<Vec<_>>(), vec![c, a, b]);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut tree = DomTree::new();
        let (ul, a, _, _) = list(&mut tree);

        assert!(matches!(
            tree.append_child(a, ul),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = DomTree::new();
        let (ul, a, b, c) = list(&mut tree);
        let span = tree.create_element("span");
        tree.append_child(a, span).unwrap();

        assert_eq!(tree.descendants(ul).collect::<Vec<_>>(), vec![a, span, b, c]);
        assert_eq!(tree.descendants(span).count(), 0);
    }

    #[test]
    fn test_find_by_id_is_scoped() {
        let mut tree = DomTree::new();
        let (ul, a, b, _) = list(&mut tree);
        tree.set_attribute(b, "id", "two");

        assert_eq!(tree.find_by_id(ul, "two"), Some(b));
        assert_eq!(tree.find_by_id(a, "two"), None);
    }
}
