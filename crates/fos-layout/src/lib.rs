//! fOS Layout Engine
//!
//! CSS box model and a block flow layout that feeds element geometry to
//! scrolling and intersection observers.

mod box_model;
mod layout_tree;
mod style;

use fos_dom::{Document, NodeId};

pub use box_model::BoxDimensions;
pub use layout_tree::{LayoutBox, LayoutTree};
pub use style::BlockStyle;

/// Height of one line of text
pub const LINE_HEIGHT: f64 = 20.0;

/// Perform layout on the whole document
pub fn layout(doc: &mut Document) -> LayoutTree {
    let tree = LayoutTree::build(doc);
    doc.mark_layout_clean();
    tracing::debug!(boxes = tree.len(), height = tree.height, "Performed layout");
    tree
}

/// Lay out the document if it changed since the last layout.
/// Returns the height of the laid out content.
pub fn reflow(doc: &mut Document) -> f64 {
    if doc.needs_layout() {
        return layout(doc).height;
    }
    doc.tree()
        .element_children(NodeId::ROOT)
        .filter_map(|n| doc.geometry(n))
        .map(|g| g.layout.bottom())
        .fold(0.0, f64::max)
}
