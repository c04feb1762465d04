//! Value parsing for serialized declarations

/// A `px` or `%` length
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    /// Parse `12px`, `12.5%` or a unitless `0`
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(n) = token.strip_suffix("px") {
            return parse_number(n).map(Length::Px);
        }
        if let Some(n) = token.strip_suffix('%') {
            return parse_number(n).map(Length::Percent);
        }
        match parse_number(token) {
            Some(n) if n == 0.0 => Some(Length::Px(0.0)),
            _ => None,
        }
    }

    /// Resolve against a basis for percentages
    pub fn resolve(self, basis: f64) -> f64 {
        match self {
            Length::Px(v) => v,
            Length::Percent(p) => basis * p / 100.0,
        }
    }
}

/// Four box sides parsed from a `margin`/`padding` style shorthand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Edges {
    /// Parse one to four lengths in CSS order
    pub fn parse(value: &str) -> Option<Self> {
        let parts = value
            .split_whitespace()
            .map(Length::parse)
            .collect::<Option<Vec<_>>>()?;

        match parts.as_slice() {
            [a] => Some(Self { top: *a, right: *a, bottom: *a, left: *a }),
            [v, h] => Some(Self { top: *v, right: *h, bottom: *v, left: *h }),
            [t, h, b] => Some(Self { top: *t, right: *h, bottom: *b, left: *h }),
            [t, r, b, l] => Some(Self { top: *t, right: *r, bottom: *b, left: *l }),
            _ => None,
        }
    }
}

/// Parse a `<time>` into milliseconds; for a comma list the first entry counts
pub fn parse_time_ms(value: &str) -> Option<f64> {
    let first = value.split(',').next()?.trim();
    if let Some(n) = first.strip_suffix("ms") {
        return parse_number(n);
    }
    if let Some(n) = first.strip_suffix('s') {
        return parse_number(n).map(|s| s * 1000.0);
    }
    None
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
