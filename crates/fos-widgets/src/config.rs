//! Component configuration
//!
//! Options are layered defaults → `data-bs-*` attributes → caller
//! overrides, then checked against the component's declared types.

use std::collections::BTreeMap;
use std::fmt;

use fos_dom::{DOMStringMap, DomTree, NodeId};

use crate::WidgetError;

/// A single option value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Element(NodeId),
}

impl ConfigValue {
    /// Runtime type name used in type-check messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Number(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::Element(_) => "element",
        }
    }

    /// Interpret an attribute string: booleans, canonical numerals and
    /// null-ish values get their own variants, everything else stays text.
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "true" => return ConfigValue::Bool(true),
            "false" => return ConfigValue::Bool(false),
            "" | "null" => return ConfigValue::Null,
            _ => {}
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() && n.to_string() == raw && raw != "-0" => ConfigValue::Number(n),
            _ => ConfigValue::String(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => f.write_str("null"),
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Element(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<NodeId> for ConfigValue {
    fn from(value: NodeId) -> Self {
        ConfigValue::Element(value)
    }
}

/// Option map keyed by camelCase option name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config(BTreeMap<String, ConfigValue>);

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Config::set`]
    pub fn with(mut self, key: &str, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_str)
    }

    /// Overlay `other`; its values win
    pub fn merge(&mut self, other: Config) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every `data-bs-*` attribute of `element`, normalized
    pub fn from_data_attributes(tree: &DomTree, element: NodeId) -> Self {
        let Some(data) = tree.element(element) else {
            return Self::default();
        };
        let dataset = DOMStringMap::from_element(data);
        Self(
            dataset
                .with_prefix("bs")
                .into_iter()
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, raw)| (key, ConfigValue::normalize(raw)))
                .collect(),
        )
    }
}

/// Check every declared option against its type expression, e.g.
/// `("target", "(string|element)")`.
pub fn type_check(component: &str, config: &Config, types: &[(&str, &str)]) -> Result<(), WidgetError> {
    for &(option, expected) in types {
        let found = config.get(option).map_or("undefined", ConfigValue::type_name);
        let allowed = expected.trim_start_matches('(').trim_end_matches(')');
        if !allowed.split('|').any(|t| t == found) {
            return Err(WidgetError::InvalidConfigType {
                component: component.to_uppercase(),
                option: option.to_string(),
                found,
                expected: expected.to_string(),
            });
        }
    }
    Ok(())
}
