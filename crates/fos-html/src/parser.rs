//! HTML5 Parser implementation
//!
//! Parses into html5ever's RcDom, then copies the tree into the arena DOM
//! and lays it out.

use fos_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a laid out Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        tracing::debug!(bytes = html.len(), "Parsing HTML document");

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty();
        self.convert_node(&dom.document, document.tree_mut(), NodeId::ROOT)?;
        fos_layout::layout(&mut document);

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse markup as the contents of `<body>`
    pub fn parse_fragment(&self, html: &str) -> Result<Document, ParseError> {
        self.parse(&format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>"))
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> Result<(), ParseError> {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent)?;
                }
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id)?;
                }
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    tree.set_attribute(id, &attr.name.local, &attr.value);
                }
                tree.append_child(parent, id)?;

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id)?;
                }
            }
            // Doctypes and processing instructions have no counterpart
            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
        }
        Ok(())
    }
}
