//! Selector engine
//!
//! Parses the CSS selector subset widgets use and runs the usual queries
//! (`find`, `find_one`, `closest`, `parents`, `prev`, ...) against a
//! [`DomTree`].
//!
//! Supported: selector lists, type and universal selectors, `#id`,
//! `.class`, attribute selectors (`[a]`, `=`, `~=`, `|=`, `^=`, `$=`, `*=`)
//! and the descendant and child combinators.

use std::str::FromStr;

use crate::{DomError, DomTree, NodeId};

/// A parsed, comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    selectors: Vec<ComplexSelector>,
}

/// Compounds joined by combinators, left to right
#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector {
    compounds: Vec<CompoundSelector>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct CompoundSelector {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeSelector>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttributeSelector {
    name: String,
    matcher: Option<(AttrOperator, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOperator {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, DomError> {
        Parser::new(input).parse_list()
    }

    /// Whether `node` matches any selector in the list
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.is_element(node) && self.selectors.iter().any(|s| s.matches(tree, node))
    }

    /// Matching descendants of `scope`, in document order
    pub fn find(&self, tree: &DomTree, scope: NodeId) -> Vec<NodeId> {
        tree.descendants(scope).filter(|&n| self.matches(tree, n)).collect()
    }

    /// First matching descendant of `scope`
    pub fn find_one(&self, tree: &DomTree, scope: NodeId) -> Option<NodeId> {
        tree.descendants(scope).find(|&n| self.matches(tree, n))
    }

    /// Matching direct children
    pub fn children(&self, tree: &DomTree, node: NodeId) -> Vec<NodeId> {
        tree.element_children(node).filter(|&n| self.matches(tree, n)).collect()
    }

    /// Matching ancestors, nearest first
    pub fn parents(&self, tree: &DomTree, node: NodeId) -> Vec<NodeId> {
        tree.ancestors(node)
            .take_while(|&a| tree.is_element(a))
            .filter(|&a| self.matches(tree, a))
            .collect()
    }

    /// Nearest previous element sibling that matches (zero or one node)
    pub fn prev(&self, tree: &DomTree, node: NodeId) -> Vec<NodeId> {
        let mut current = tree.prev_element_sibling(node);
        while let Some(sibling) = current {
            if self.matches(tree, sibling) {
                return vec![sibling];
            }
            current = tree.prev_element_sibling(sibling);
        }
        Vec::new()
    }

    /// Nearest next element sibling that matches (zero or one node)
    pub fn next(&self, tree: &DomTree, node: NodeId) -> Vec<NodeId> {
        let mut current = tree.next_element_sibling(node);
        while let Some(sibling) = current {
            if self.matches(tree, sibling) {
                return vec![sibling];
            }
            current = tree.next_element_sibling(sibling);
        }
        Vec::new()
    }

    /// Nearest inclusive ancestor that matches
    pub fn closest(&self, tree: &DomTree, node: NodeId) -> Option<NodeId> {
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .find(|&n| self.matches(tree, n))
    }
}

impl FromStr for SelectorList {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl ComplexSelector {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.matches_at(tree, node, self.compounds.len() - 1)
    }

    fn matches_at(&self, tree: &DomTree, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(tree, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|p| self.matches_at(tree, p, index - 1)),
            Combinator::Descendant => tree
                .ancestors(node)
                .any(|a| self.matches_at(tree, a, index - 1)),
        }
    }
}

impl CompoundSelector {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.ids.is_empty() && self.classes.is_empty() && self.attributes.is_empty()
    }

    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(el) = tree.element(node) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if tag != "*" && !el.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.ids.iter().all(|id| el.id() == Some(id.as_str()))
            && self.classes.iter().all(|c| el.has_class(c))
            && self.attributes.iter().all(|a| a.matches(el.get_attribute(&a.name)))
    }
}

impl AttributeSelector {
    fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let Some((op, expected)) = &self.matcher else {
            return true;
        };
        let expected = expected.as_str();
        match op {
            AttrOperator::Equals => value == expected,
            AttrOperator::Includes => value.split_whitespace().any(|t| t == expected),
            AttrOperator::DashMatch => {
                value == expected
                    || value.strip_prefix(expected).is_some_and(|rest| rest.starts_with('-'))
            }
            AttrOperator::Prefix => !expected.is_empty() && value.starts_with(expected),
            AttrOperator::Suffix => !expected.is_empty() && value.ends_with(expected),
            AttrOperator::Substring => !expected.is_empty() && value.contains(expected),
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, chars: input.chars().collect(), pos: 0 }
    }

    fn error(&self) -> DomError {
        DomError::InvalidSelector(self.input.to_string())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(&mut self) -> Result<SelectorList, DomError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                None => break,
                Some(_) => return Err(self.error()),
            }
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, DomError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.error()),
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }
        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, DomError> {
        let mut compound = CompoundSelector::default();
        if self.peek() == Some('*') {
            self.pos += 1;
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(is_ident_start) {
            compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.ids.push(self.parse_ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.parse_ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attributes.push(self.parse_attribute()?);
                }
                _ => break,
            }
        }
        if compound.is_empty() {
            return Err(self.error());
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String, DomError> {
        let mut ident = String::new();
        match self.peek() {
            Some('-') => {
                ident.push('-');
                self.pos += 1;
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    return Err(self.error());
                }
            }
            Some(c) if c.is_ascii_digit() => return Err(self.error()),
            _ => {}
        }
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                ident.push(self.bump().ok_or_else(|| self.error())?);
            } else if is_ident_char(c) {
                ident.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if ident.is_empty() || ident == "-" {
            return Err(self.error());
        }
        Ok(ident)
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, DomError> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let op = match self.bump() {
            Some(']') => return Ok(AttributeSelector { name, matcher: None }),
            Some('=') => AttrOperator::Equals,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                if self.bump() != Some('=') {
                    return Err(self.error());
                }
                match c {
                    '~' => AttrOperator::Includes,
                    '|' => AttrOperator::DashMatch,
                    '^' => AttrOperator::Prefix,
                    '$' => AttrOperator::Suffix,
                    _ => AttrOperator::Substring,
                }
            }
            _ => return Err(self.error()),
        };
        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.parse_quoted(quote)?
            }
            _ => self.parse_ident()?,
        };
        self.skip_whitespace();
        if self.bump() != Some(']') {
            return Err(self.error());
        }
        Ok(AttributeSelector { name, matcher: Some((op, value)) })
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, DomError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => value.push(self.bump().ok_or_else(|| self.error())?),
                Some(c) => value.push(c),
                None => return Err(self.error()),
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

// Convenience wrappers parsing the selector on every call.
impl DomTree {
    pub fn matches(&self, node: NodeId, selector: &str) -> Result<bool, DomError> {
        Ok(SelectorList::parse(selector)?.matches(self, node))
    }

    pub fn find(&self, selector: &str, scope: NodeId) -> Result<Vec<NodeId>, DomError> {
        Ok(SelectorList::parse(selector)?.find(self, scope))
    }

    pub fn find_one(&self, selector: &str, scope: NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(SelectorList::parse(selector)?.find_one(self, scope))
    }

    pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        Ok(SelectorList::parse(selector)?.closest(self, node))
    }
}
