//! fOS DOM - Document Object Model
//!
//! Arena-based DOM tree plus the browser services UI components lean on:
//! selector queries, class lists, datasets, event dispatch, element geometry
//! and intersection observers.

mod node;
mod tree;
mod document;
pub mod classlist;
pub mod dataset;
pub mod events;
pub mod geometry;
pub mod observer;
pub mod selector;

use std::fmt;

pub use node::{Node, NodeData, ElementData};
pub use tree::{Ancestors, Children, Descendants, DomTree};
pub use document::Document;
pub use classlist::DOMTokenList;
pub use dataset::DOMStringMap;
pub use events::{Event, EventHandler, EventInit, ListenerId};
pub use geometry::{DOMRect, EdgeSizes, ElementGeometry};
pub use observer::{
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    IntersectionRecords, ObserverId, RootMargin,
};
pub use selector::SelectorList;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Build an ID from its raw arena index
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this ID points at a node (is not [`NodeId::NONE`])
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "node#{}", self.0)
        } else {
            f.write_str("node#none")
        }
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomError {
    #[error("'{0}' is not a valid selector")]
    InvalidSelector(String),

    #[error("'{0}' is not a valid root margin")]
    InvalidRootMargin(String),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
