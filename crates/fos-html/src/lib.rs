//! fOS HTML Parser
//!
//! HTML5 parsing built on html5ever. Markup becomes a laid out
//! [`fos_dom::Document`].

mod parser;

use fos_dom::{Document, DomError};

pub use parser::HtmlParser;

/// Parse a complete HTML document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse markup meant for `<body>`
pub fn parse_fragment(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse_fragment(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build document: {0}")]
    Dom(#[from] DomError),
}
