//! Block style read from an element's `style` attribute

use fos_css::{parse_inline_style, Edges, InlineStyle, Length};
use fos_dom::{EdgeSizes, ElementData};
use tracing::warn;

const ZERO: Length = Length::Px(0.0);
const ZERO_EDGES: Edges = Edges { top: ZERO, right: ZERO, bottom: ZERO, left: ZERO };

/// Elements the user agent stylesheet hides
const HIDDEN_TAGS: &[&str] = &["head", "title", "meta", "link", "style", "script", "template", "noscript"];

/// The subset of computed style block flow looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    pub display_none: bool,
    /// `None` is `auto`
    pub height: Option<Length>,
    pub margin: Edges,
    pub padding: Edges,
    /// `overflow` clips and scrolls content
    pub scroll_container: bool,
    pub positioned: bool,
}

impl Default for BlockStyle {
    fn default() -> Self {
        Self {
            display_none: false,
            height: None,
            margin: ZERO_EDGES,
            padding: ZERO_EDGES,
            scroll_container: false,
            positioned: false,
        }
    }
}

impl BlockStyle {
    /// Style of an element; an unparsable `style` attribute counts as empty
    pub fn of(element: &ElementData) -> Self {
        if HIDDEN_TAGS.contains(&element.tag_name()) {
            return Self { display_none: true, ..Self::default() };
        }
        let Some(css) = element.get_attribute("style") else {
            return Self::default();
        };
        match parse_inline_style(css) {
            Ok(inline) => Self::from_inline(&inline),
            Err(err) => {
                warn!(tag = element.tag_name(), %err, "ignoring invalid style attribute");
                Self::default()
            }
        }
    }

    pub fn from_inline(style: &InlineStyle) -> Self {
        let overflow = style.get("overflow-y").or_else(|| style.get("overflow"));

        Self {
            display_none: style.get("display") == Some("none"),
            height: style.get("height").and_then(Length::parse),
            margin: edges(style, "margin"),
            padding: edges(style, "padding"),
            scroll_container: overflow
                .and_then(|v| v.split_whitespace().last())
                .is_some_and(|v| matches!(v, "auto" | "scroll" | "hidden")),
            positioned: style.get("position").is_some_and(|p| p != "static"),
        }
    }
}

/// Shorthand first, then any longhand sides on top
fn edges(style: &InlineStyle, property: &str) -> Edges {
    let mut edges = style.get(property).and_then(Edges::parse).unwrap_or(ZERO_EDGES);
    let side = |name: &str| style.get(&format!("{property}-{name}")).and_then(Length::parse);
    if let Some(v) = side("top") {
        edges.top = v;
    }
    if let Some(v) = side("right") {
        edges.right = v;
    }
    if let Some(v) = side("bottom") {
        edges.bottom = v;
    }
    if let Some(v) = side("left") {
        edges.left = v;
    }
    edges
}

/// Resolve edges; percentages refer to the containing block's width
pub fn resolve_edges(edges: &Edges, width: f64) -> EdgeSizes {
    EdgeSizes {
        top: edges.top.resolve(width),
        right: edges.right.resolve(width),
        bottom: edges.bottom.resolve(width),
        left: edges.left.resolve(width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_of(css: &str) -> BlockStyle {
        let mut el = ElementData::new("div");
        el.set_attribute("style", css);
        BlockStyle::of(&el)
    }

    #[test]
    fn test_scroll_container_and_position() {
        let style = style_of("height: 200px; overflow-y: auto; position: relative");

        assert_eq!(style.height, Some(Length::Px(200.0)));
        assert!(style.scroll_container);
        assert!(style.positioned);
    }

    #[test]
    fn test_longhand_overrides_shorthand() {
        let style = style_of("margin: 10px; margin-bottom: 30px");

        assert_eq!(style.margin.top, Length::Px(10.0));
        assert_eq!(style.margin.bottom, Length::Px(30.0));
    }

    #[test]
    fn test_invalid_style_falls_back_to_default() {
        assert_eq!(style_of("height: ;;; {"), BlockStyle::default());
        assert!(style_of("display: none").display_none);
    }

    #[test]
    fn test_head_is_hidden() {
        assert!(BlockStyle::of(&ElementData::new("head")).display_none);
    }
}
