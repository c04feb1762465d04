//! CSS Parser using lightningcss
//!
//! Parses declaration blocks into our internal representation.

use lightningcss::declaration::DeclarationBlock;
use lightningcss::properties::Property;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions};

use tracing::trace;

use crate::{CssError, Declaration, InlineStyle};

/// CSS Parser
#[derive(Debug, Default)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a declaration list such as `height: 200px; overflow-y: auto`
    pub fn parse_inline(&self, css: &str) -> Result<InlineStyle, CssError> {
        if css.trim().is_empty() {
            return Ok(InlineStyle::default());
        }

        let block = DeclarationBlock::parse_string(css, ParserOptions::default()).map_err(|e| {
            CssError::ParseError {
                line: e.location.line,
                message: format!("{:?}", e.kind),
            }
        })?;

        let mut style = InlineStyle::default();
        for decl in block.declarations.iter() {
            style.declarations.push(self.convert_declaration(decl, false)?);
        }
        for decl in block.important_declarations.iter() {
            style.declarations.push(self.convert_declaration(decl, true)?);
        }

        trace!(declarations = style.declarations.len(), "parsed inline style");
        Ok(style)
    }

    fn convert_declaration(&self, decl: &Property, important: bool) -> Result<Declaration, CssError> {
        let property = decl.property_id().name().to_ascii_lowercase();
        let value = decl
            .value_to_css_string(PrinterOptions::default())
            .map_err(|e| CssError::Serialize {
                property: property.clone(),
                message: format!("{:?}", e),
            })?;

        Ok(Declaration { property, value, important })
    }
}
