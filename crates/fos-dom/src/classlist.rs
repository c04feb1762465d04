//! DOMTokenList (classList)
//!
//! Ordered set of whitespace-separated tokens backing an element's `class`
//! attribute.

use std::fmt;

/// Ordered, duplicate-free token list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string, dropping duplicates
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        for token in s.split_whitespace() {
            list.add(&[token]);
        }
        list
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at index
    pub fn item(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|s| s.as_str())
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add token(s); empty and duplicate tokens are ignored
    pub fn add(&mut self, tokens: &[&str]) {
        for token in tokens {
            if !token.is_empty() && !self.contains(token) {
                self.tokens.push(token.to_string());
            }
        }
    }

    /// Remove token(s)
    pub fn remove(&mut self, tokens: &[&str]) {
        self.tokens.retain(|t| !tokens.contains(&t.as_str()));
    }

    /// Toggle token, returns new state
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        let present = force.unwrap_or(!self.contains(token));
        if present {
            self.add(&[token]);
        } else {
            self.remove(&[token]);
        }
        present
    }

    /// Replace token in place
    pub fn replace(&mut self, old_token: &str, new_token: &str) -> bool {
        let Some(pos) = self.tokens.iter().position(|t| t == old_token) else {
            return false;
        };
        if self.contains(new_token) {
            self.tokens.remove(pos);
        } else {
            self.tokens[pos] = new_token.to_string();
        }
        true
    }

    /// Serialized value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    /// Reset from string
    pub fn set_value(&mut self, value: &str) {
        *self = Self::from_string(value);
    }

    /// Iterate over tokens
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }
}

impl fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}
