//! Document - High-level document API
//!
//! Ties the tree to the services that need more than the tree: event
//! listeners, intersection observers, the viewport and window scroll.

use tracing::debug;

use crate::events::{Event, EventHandler, EventInit, ListenerId};
use crate::geometry::GeometryView;
use crate::observer::{IntersectionObserverInit, IntersectionObserverManager, IntersectionRecords, ObserverId};
use crate::{DOMRect, DomError, DomTree, ElementGeometry, NodeId};

/// Default viewport size
const DEFAULT_VIEWPORT: DOMRect = DOMRect { x: 0.0, y: 0.0, width: 1024.0, height: 768.0 };

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    events: EventHandler,
    observers: IntersectionObserverManager,
    viewport: DOMRect,
    /// Window scroll offset (x, y)
    window_scroll: (f64, f64),
    layout_dirty: bool,
    /// Milliseconds since the document was created
    time: f64,
}

impl Document {
    /// Create a document with `<html>`, `<head>` and `<body>`
    pub fn new() -> Self {
        let mut doc = Self::empty();
        let tree = &mut doc.tree;

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes always link cleanly.
        let _ = tree.append_child(NodeId::ROOT, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        doc
    }

    /// Create an empty document (no structure)
    pub fn empty() -> Self {
        Self {
            tree: DomTree::new(),
            events: EventHandler::new(),
            observers: IntersectionObserverManager::new(),
            viewport: DEFAULT_VIEWPORT,
            window_scroll: (0.0, 0.0),
            layout_dirty: true,
            time: 0.0,
        }
    }

    // ---------------------------------------------------------------------
    // Tree
    // ---------------------------------------------------------------------

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Mutable tree access; layout is considered stale afterwards
    pub fn tree_mut(&mut self) -> &mut DomTree {
        self.layout_dirty = true;
        &mut self.tree
    }

    /// The `<html>` element
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree.element_children(NodeId::ROOT).next()
    }

    pub fn head(&self) -> Option<NodeId> {
        self.child_of_html("head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.child_of_html("body")
    }

    fn child_of_html(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.tree
            .element_children(html)
            .find(|&c| self.tree.tag_name(c) == Some(tag))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.find_by_id(NodeId::ROOT, id)
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        self.tree.find_one(selector, NodeId::ROOT)
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.tree.find(selector, NodeId::ROOT)
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    pub fn on<F>(&mut self, node: NodeId, name: &str, callback: F) -> ListenerId
    where
        F: FnMut(&mut Event) + 'static,
    {
        self.events.on(node, name, callback)
    }

    pub fn one<F>(&mut self, node: NodeId, name: &str, callback: F) -> ListenerId
    where
        F: FnMut(&mut Event) + 'static,
    {
        self.events.one(node, name, callback)
    }

    pub fn on_delegate<F>(
        &mut self,
        node: NodeId,
        name: &str,
        selector: &str,
        callback: F,
    ) -> Result<ListenerId, DomError>
    where
        F: FnMut(&mut Event) + 'static,
    {
        self.events.on_delegate(node, name, selector, callback)
    }

    pub fn off(&mut self, node: NodeId, name: &str) -> usize {
        self.events.off(node, name)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.events.remove(id)
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.events.listener_count(node)
    }

    /// Dispatch an event at `node` and return it after propagation
    pub fn trigger(&mut self, node: NodeId, event_type: &str, init: EventInit) -> Event {
        debug!(node = %node, event_type, "dispatching event");
        self.events.dispatch(&self.tree, Event::new(event_type, node, init))
    }

    // ---------------------------------------------------------------------
    // Intersection observers
    // ---------------------------------------------------------------------

    pub fn create_intersection_observer(&mut self, init: IntersectionObserverInit) -> ObserverId {
        self.observers.create(init)
    }

    /// Returns false when the observer does not exist
    pub fn observe(&mut self, observer: ObserverId, target: NodeId) -> bool {
        match self.observers.get_mut(observer) {
            Some(o) => {
                o.observe(target);
                true
            }
            None => false,
        }
    }

    pub fn unobserve(&mut self, observer: ObserverId, target: NodeId) -> bool {
        match self.observers.get_mut(observer) {
            Some(o) => {
                o.unobserve(target);
                true
            }
            None => false,
        }
    }

    /// Disconnect an observer; unknown observers are ignored
    pub fn disconnect(&mut self, observer: ObserverId) -> bool {
        match self.observers.get_mut(observer) {
            Some(o) => {
                o.disconnect();
                true
            }
            None => false,
        }
    }

    /// Disconnect and drop an observer
    pub fn remove_intersection_observer(&mut self, observer: ObserverId) -> bool {
        self.observers.remove(observer).is_some()
    }

    pub fn intersection_observer(&self, observer: ObserverId) -> Option<&crate::IntersectionObserver> {
        self.observers.get(observer)
    }

    pub fn intersection_observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Recompute intersections against current geometry and collect
    /// the entries every observer queued
    pub fn take_intersection_records(&mut self) -> Vec<IntersectionRecords> {
        let view = GeometryView {
            tree: &self.tree,
            viewport: self.viewport,
            window_scroll: self.window_scroll,
        };
        self.observers.process(&view, self.time)
    }

    // ---------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------

    fn view(&self) -> GeometryView<'_> {
        GeometryView {
            tree: &self.tree,
            viewport: self.viewport,
            window_scroll: self.window_scroll,
        }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = DOMRect::from_xywh(0.0, 0.0, width, height);
        self.layout_dirty = true;
    }

    pub fn viewport(&self) -> DOMRect {
        self.viewport
    }

    pub fn window_scroll(&self) -> (f64, f64) {
        self.window_scroll
    }

    pub fn geometry(&self, node: NodeId) -> Option<&ElementGeometry> {
        self.tree.element(node).map(|el| &el.geometry)
    }

    /// Geometry access for layout; does not mark layout dirty
    pub fn geometry_mut(&mut self, node: NodeId) -> Option<&mut ElementGeometry> {
        self.tree.element_mut(node).map(|el| &mut el.geometry)
    }

    pub fn bounding_client_rect(&self, node: NodeId) -> DOMRect {
        self.view().bounding_client_rect(node)
    }

    pub fn offset_top(&self, node: NodeId) -> f64 {
        self.view().offset_top(node)
    }

    pub fn offset_height(&self, node: NodeId) -> f64 {
        self.view().offset_height(node)
    }

    pub fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        self.view().offset_parent(node)
    }

    pub fn scroll_top(&self, node: NodeId) -> f64 {
        self.geometry(node).map_or(0.0, |g| g.scroll_top)
    }

    /// Scroll an element; returns false for non-elements
    pub fn scroll_to(&mut self, node: NodeId, top: f64) -> bool {
        match self.geometry_mut(node) {
            Some(g) => {
                g.scroll_to(top);
                true
            }
            None => false,
        }
    }

    /// Scroll the window, clamped to the document height
    pub fn scroll_window_to(&mut self, top: f64) {
        let content_height = self
            .tree
            .element_children(NodeId::ROOT)
            .filter_map(|n| self.geometry(n))
            .map(|g| g.layout.bottom().max(g.scroll_height))
            .fold(0.0, f64::max);
        let max = (content_height - self.viewport.height).max(0.0);
        self.window_scroll.1 = top.clamp(0.0, max);
    }

    /// Scroll every scrolling ancestor, then the window, so the top of
    /// `node` lines up with the top of each
    pub fn scroll_into_view(&mut self, node: NodeId) {
        let scrollers: Vec<NodeId> = self
            .tree
            .ancestors(node)
            .filter(|&a| self.geometry(a).is_some_and(|g| g.scroll_container))
            .collect();

        for scroller in scrollers {
            let delta = self.bounding_client_rect(node).top() - self.bounding_client_rect(scroller).top();
            if let Some(g) = self.geometry_mut(scroller) {
                g.scroll_by(delta);
            }
        }

        let top = self.window_scroll.1 + self.bounding_client_rect(node).top();
        self.scroll_window_to(top);
    }

    // ---------------------------------------------------------------------
    // Layout and time
    // ---------------------------------------------------------------------

    pub fn needs_layout(&self) -> bool {
        self.layout_dirty
    }

    pub fn mark_layout_dirty(&mut self) {
        self.layout_dirty = true;
    }

    pub fn mark_layout_clean(&mut self) {
        self.layout_dirty = false;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
