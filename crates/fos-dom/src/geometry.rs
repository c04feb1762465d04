//! Geometry APIs
//!
//! DOMRect, getBoundingClientRect, and scroll/offset properties.
//!
//! Layout writes each element's border box in document coordinates (as if
//! nothing were scrolled) into [`ElementGeometry::layout`]. Client rects are
//! derived from that by subtracting the scroll offsets of every scrolling
//! ancestor and of the window.

use crate::{DomTree, NodeId};

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Check if point is inside
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Check if rects intersect; touching edges count
    pub fn intersects(&self, other: &DOMRect) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }

    /// Intersection rect; zero-sized when the rects only touch
    pub fn intersection(&self, other: &DOMRect) -> Option<DOMRect> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(DOMRect::from_xywh(x, y, right - x, bottom - y))
    }

    /// Move by an offset
    pub fn translate(&self, dx: f64, dy: f64) -> DOMRect {
        DOMRect::from_xywh(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow outward by edge sizes (negative sizes shrink)
    pub fn outset(&self, edges: &EdgeSizes) -> DOMRect {
        DOMRect::from_xywh(
            self.x - edges.left,
            self.y - edges.top,
            self.width + edges.left + edges.right,
            self.height + edges.top + edges.bottom,
        )
    }
}

/// Edge sizes (top, right, bottom, left)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Element geometry state
#[derive(Debug, Clone, Default)]
pub struct ElementGeometry {
    /// Border box in unscrolled document coordinates
    pub layout: DOMRect,
    /// Height of the scrollable content (at least the box height)
    pub scroll_height: f64,
    pub scroll_top: f64,
    pub scroll_left: f64,
    /// `overflow` clips and scrolls this element's content
    pub scroll_container: bool,
    /// `position` is not `static`; descendants measure offsets against it
    pub positioned: bool,
    /// Generates a box (`display` is not `none`)
    pub rendered: bool,
}

impl ElementGeometry {
    pub fn client_height(&self) -> f64 {
        self.layout.height
    }

    /// Largest valid `scroll_top`
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height()).max(0.0)
    }

    /// Scroll to position, clamped to the scrollable range
    pub fn scroll_to(&mut self, top: f64) {
        self.scroll_top = top.clamp(0.0, self.max_scroll_top());
    }

    /// Scroll by amount
    pub fn scroll_by(&mut self, dy: f64) {
        self.scroll_to(self.scroll_top + dy);
    }
}

/// Read-only geometry queries over a tree, the viewport and window scroll
#[derive(Debug, Clone, Copy)]
pub struct GeometryView<'a> {
    pub tree: &'a DomTree,
    pub viewport: DOMRect,
    pub window_scroll: (f64, f64),
}

impl GeometryView<'_> {
    pub fn geometry(&self, node: NodeId) -> Option<&ElementGeometry> {
        self.tree.element(node).map(|el| &el.geometry)
    }

    pub fn is_rendered(&self, node: NodeId) -> bool {
        self.geometry(node).is_some_and(|g| g.rendered)
    }

    /// Accumulated scroll offset applied to `node`'s box
    fn scroll_offset(&self, node: NodeId) -> (f64, f64) {
        let (mut dx, mut dy) = self.window_scroll;
        for ancestor in self.tree.ancestors(node) {
            if let Some(g) = self.geometry(ancestor) {
                dx += g.scroll_left;
                dy += g.scroll_top;
            }
        }
        (dx, dy)
    }

    /// getBoundingClientRect
    pub fn bounding_client_rect(&self, node: NodeId) -> DOMRect {
        let Some(g) = self.geometry(node) else {
            return DOMRect::default();
        };
        let (dx, dy) = self.scroll_offset(node);
        g.layout.translate(-dx, -dy)
    }

    /// Nearest positioned ancestor
    pub fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree
            .ancestors(node)
            .find(|&a| self.geometry(a).is_some_and(|g| g.positioned))
    }

    /// offsetTop: distance from the offset parent's top edge
    pub fn offset_top(&self, node: NodeId) -> f64 {
        let Some(g) = self.geometry(node) else {
            return 0.0;
        };
        let parent_top = self
            .offset_parent(node)
            .and_then(|p| self.geometry(p))
            .map_or(0.0, |p| p.layout.y);
        g.layout.y - parent_top
    }

    pub fn offset_height(&self, node: NodeId) -> f64 {
        self.geometry(node).map_or(0.0, |g| g.layout.height)
    }
}
