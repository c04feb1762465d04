//! Layout Tree
//!
//! Block flow: every element is a block placed under its previous sibling
//! and as wide as its parent's content box. Heights come from an explicit
//! `height` or from the content. Results are written back into each
//! element's [`ElementGeometry`](fos_dom::ElementGeometry) and recorded as
//! [`LayoutBox`]es.

use fos_dom::{DOMRect, Document, EdgeSizes, NodeId};

use crate::style::{resolve_edges, BlockStyle};
use crate::{BoxDimensions, LINE_HEIGHT};
use fos_css::Length;

/// Layout tree
#[derive(Debug, Default)]
pub struct LayoutTree {
    pub boxes: Vec<LayoutBox>,
    /// Height of all top-level content
    pub height: f64,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Box generated for `node`
    pub fn get(&self, node: NodeId) -> Option<&LayoutBox> {
        self.boxes.iter().find(|b| b.node == node)
    }

    /// Lay out the document inside a viewport-sized initial containing block
    pub fn build(doc: &mut Document) -> Self {
        let viewport = doc.viewport();
        let mut tree = Self::new();
        let containing = DOMRect::from_xywh(0.0, 0.0, viewport.width, 0.0);
        tree.height = tree.layout_children(doc, NodeId::ROOT, containing, Some(viewport.height));
        tree
    }

    /// Lay out the children of `parent` starting at the top of `content`.
    /// Returns the height they occupy.
    fn layout_children(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        content: DOMRect,
        parent_height: Option<f64>,
    ) -> f64 {
        let children: Vec<NodeId> = doc.tree().children(parent).collect();
        let mut cursor = content.y;

        for child in children {
            if let Some(text) = doc.tree().get(child).and_then(|n| n.as_text()) {
                if !text.trim().is_empty() {
                    cursor += LINE_HEIGHT;
                }
                continue;
            }
            let Some(style) = doc.tree().element(child).map(BlockStyle::of) else {
                continue;
            };

            if style.display_none {
                hide_subtree(doc, child, content.x, cursor);
                continue;
            }

            cursor = self.layout_block(doc, child, &style, content, cursor, parent_height);
        }

        cursor - content.y
    }

    /// Place one block at `cursor`; returns the cursor below its margin box
    fn layout_block(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        style: &BlockStyle,
        containing: DOMRect,
        cursor: f64,
        parent_height: Option<f64>,
    ) -> f64 {
        let margin = resolve_edges(&style.margin, containing.width);
        let padding = resolve_edges(&style.padding, containing.width);

        let width = (containing.width - margin.left - margin.right - padding.left - padding.right).max(0.0);
        let mut content = DOMRect::from_xywh(
            containing.x + margin.left + padding.left,
            cursor + margin.top + padding.top,
            width,
            0.0,
        );

        let explicit_height = match style.height {
            Some(Length::Px(h)) => Some(h.max(0.0)),
            Some(Length::Percent(p)) => parent_height.map(|h| (h * p / 100.0).max(0.0)),
            None => None,
        };

        let children_height = self.layout_children(doc, node, content, explicit_height);
        content.height = explicit_height.unwrap_or(children_height);

        let dimensions = BoxDimensions {
            content,
            padding,
            border: EdgeSizes::default(),
            margin,
        };
        let border_box = dimensions.border_box();
        let scroll_height = border_box
            .height
            .max(children_height + padding.top + padding.bottom);

        if let Some(g) = doc.geometry_mut(node) {
            let scroll_top = g.scroll_top;
            g.layout = border_box;
            g.scroll_height = scroll_height;
            g.scroll_container = style.scroll_container;
            g.positioned = style.positioned;
            g.rendered = true;
            if style.scroll_container {
                g.scroll_to(scroll_top);
            } else {
                g.scroll_top = 0.0;
                g.scroll_left = 0.0;
            }
        }

        self.boxes.push(LayoutBox {
            node,
            dimensions,
            scroll_container: style.scroll_container,
        });

        dimensions.margin_box().bottom()
    }
}

/// `display: none` subtree: no box, zero-size geometry at the insertion point
fn hide_subtree(doc: &mut Document, node: NodeId, x: f64, y: f64) {
    let nodes: Vec<NodeId> = std::iter::once(node)
        .chain(doc.tree().descendants(node))
        .collect();
    for n in nodes {
        if let Some(g) = doc.geometry_mut(n) {
            g.layout = DOMRect::from_xywh(x, y, 0.0, 0.0);
            g.scroll_height = 0.0;
            g.rendered = false;
        }
    }
}

/// A box in the layout tree
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub node: NodeId,
    pub dimensions: BoxDimensions,
    pub scroll_container: bool,
}
