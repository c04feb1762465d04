//! CSS Box Model

use fos_dom::{DOMRect, EdgeSizes};

/// Box dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxDimensions {
    pub content: DOMRect,
    pub padding: EdgeSizes,
    pub border: EdgeSizes,
    pub margin: EdgeSizes,
}

impl BoxDimensions {
    /// Get the area covered by content + padding
    pub fn padding_box(&self) -> DOMRect {
        self.content.outset(&self.padding)
    }

    /// Get the area covered by content + padding + border
    pub fn border_box(&self) -> DOMRect {
        self.padding_box().outset(&self.border)
    }

    /// Get the area covered by content + padding + border + margin
    pub fn margin_box(&self) -> DOMRect {
        self.border_box().outset(&self.margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxes_nest() {
        let edges = EdgeSizes { top: 5.0, right: 5.0, bottom: 5.0, left: 5.0 };
        let dims = BoxDimensions {
            content: DOMRect::from_xywh(20.0, 20.0, 100.0, 50.0),
            padding: edges,
            border: EdgeSizes::default(),
            margin: edges,
        };

        assert_eq!(dims.padding_box(), DOMRect::from_xywh(15.0, 15.0, 110.0, 60.0));
        assert_eq!(dims.border_box(), dims.padding_box());
        assert_eq!(dims.margin_box(), DOMRect::from_xywh(10.0, 10.0, 120.0, 70.0));
    }
}
