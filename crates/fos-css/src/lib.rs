//! fOS CSS - inline style parsing
//!
//! Parses `style` attribute contents with lightningcss and exposes the
//! handful of value types layout and widgets read back out of them.

mod parser;
pub mod values;

pub use parser::CssParser;
pub use values::{parse_time_ms, Edges, Length};

/// Parse the contents of a `style` attribute
pub fn parse_inline_style(css: &str) -> Result<InlineStyle, CssError> {
    CssParser::new().parse_inline(css)
}

/// CSS declaration (property: value)
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Lowercase property name, e.g. `overflow-y`
    pub property: String,
    /// Serialized value
    pub value: String,
    pub important: bool,
}

/// Declarations of one `style` attribute, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    pub declarations: Vec<Declaration>,
}

impl InlineStyle {
    /// Winning value for a property: `!important` beats normal, later beats earlier
    pub fn get(&self, property: &str) -> Option<&str> {
        let mut winner: Option<&Declaration> = None;
        for decl in self.declarations.iter().filter(|d| d.property == property) {
            if winner.is_none_or(|w| decl.important || !w.important) {
                winner = Some(decl);
            }
        }
        winner.map(|d| d.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// CSS parsing error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },

    #[error("Cannot serialize '{property}': {message}")]
    Serialize { property: String, message: String },
}
