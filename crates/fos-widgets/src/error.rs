//! Widget errors

use fos_dom::{DomError, NodeId};

/// Errors raised while creating or driving components
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WidgetError {
    #[error("Target Container is not defined")]
    TargetNotDefined,

    #[error("{component}: Option \"{option}\" provided type \"{found}\" but expected type \"{expected}\".")]
    InvalidConfigType {
        component: String,
        option: String,
        found: &'static str,
        expected: String,
    },

    #[error("{element} already has a {existing} instance")]
    AlreadyInitialized { element: NodeId, existing: &'static str },

    #[error("{element} has no {expected} instance")]
    InstanceType { element: NodeId, expected: &'static str },

    #[error("{0} is not an element")]
    NotAnElement(NodeId),

    #[error(transparent)]
    Dom(#[from] DomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_error_message() {
        let err = WidgetError::InvalidConfigType {
            component: "SCROLLSPY".to_string(),
            option: "rootMargin".to_string(),
            found: "number",
            expected: "(string)".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "SCROLLSPY: Option \"rootMargin\" provided type \"number\" but expected type \"(string)\"."
        );
        assert_eq!(WidgetError::TargetNotDefined.to_string(), "Target Container is not defined");
    }
}
