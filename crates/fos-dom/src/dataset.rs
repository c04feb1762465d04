//! DOMStringMap (dataset)
//!
//! `data-*` attribute access with camelCase keys.

use std::collections::BTreeMap;

use crate::ElementData;

/// DOMStringMap for data-* attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMStringMap {
    data: BTreeMap<String, String>,
}

impl DOMStringMap {
    /// Create empty string map
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the `data-*` attributes of an element
    pub fn from_element(element: &ElementData) -> Self {
        let mut data = BTreeMap::new();
        for (name, value) in element.attributes() {
            if let Some(key) = name.strip_prefix("data-") {
                data.insert(to_camel_case(key), value.to_string());
            }
        }
        Self { data }
    }

    /// Get value by camelCase key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|s| s.as_str())
    }

    /// Set value by camelCase key
    pub fn set(&mut self, key: &str, value: &str) {
        self.data.insert(key.to_string(), value.to_string());
    }

    /// Check if key exists
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate `(key, value)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries whose key starts with `prefix`, with the prefix stripped and
    /// the next letter lowercased (`bsRootMargin` -> `rootMargin` for `bs`).
    pub fn with_prefix(&self, prefix: &str) -> Vec<(String, &str)> {
        self.data
            .iter()
            .filter_map(|(key, value)| {
                let rest = key.strip_prefix(prefix)?;
                let mut chars = rest.chars();
                let pure = match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => String::new(),
                };
                Some((pure, value.as_str()))
            })
            .collect()
    }

    /// Convert a camelCase key to its attribute name
    pub fn to_attribute_name(key: &str) -> String {
        format!("data-{}", to_kebab_case(key))
    }
}

/// Convert kebab-case to camelCase
fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert camelCase to kebab-case
fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}
