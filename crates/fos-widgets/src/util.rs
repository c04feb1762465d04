//! Helpers shared by components

use fos_css::{parse_inline_style, parse_time_ms};
use fos_dom::{DomTree, NodeId};
use tracing::trace;

/// Selector an element points at: `data-bs-target`, else a usable `href`
pub fn get_selector(tree: &DomTree, element: NodeId) -> Option<String> {
    match tree.get_attribute(element, "data-bs-target") {
        Some(target) if !target.is_empty() && target != "#" => return Some(target.to_string()),
        _ => {}
    }

    let href = tree.get_attribute(element, "href")?;
    if !href.contains('#') && !href.starts_with('.') {
        return None;
    }
    let href = match href.split_once('#') {
        Some((before, after)) if !before.is_empty() => format!("#{after}"),
        _ => href.to_string(),
    };
    let href = href.trim();
    (!href.is_empty() && href != "#").then(|| href.to_string())
}

/// Element matched by [`get_selector`] anywhere in the document.
/// An unparsable selector matches nothing.
pub fn get_element_from_selector(tree: &DomTree, element: NodeId) -> Option<NodeId> {
    let selector = get_selector(tree, element)?;
    match tree.find_one(&selector, NodeId::ROOT) {
        Ok(found) => found,
        Err(err) => {
            trace!(%element, %err, "ignoring unusable target selector");
            None
        }
    }
}

/// Non-empty fragment of a URL, without the `#`
pub fn fragment(href: &str) -> Option<&str> {
    href.split_once('#').map(|(_, frag)| frag).filter(|frag| !frag.is_empty())
}

/// Transition duration plus delay from the inline style, in milliseconds
pub fn transition_duration_ms(tree: &DomTree, element: NodeId) -> f64 {
    let Some(css) = tree.get_attribute(element, "style") else {
        return 0.0;
    };
    let Ok(style) = parse_inline_style(css) else {
        return 0.0;
    };

    let (mut duration, mut delay) = (None, None);
    if let Some(shorthand) = style.get("transition") {
        // Only the first transition counts: its first time is the duration, the second the delay
        let first = shorthand.split(',').next().unwrap_or_default();
        let mut times = first.split_whitespace().filter_map(parse_time_ms);
        duration = times.next();
        delay = times.next();
    }
    if let Some(value) = style.get("transition-duration") {
        duration = parse_time_ms(value);
    }
    if let Some(value) = style.get("transition-delay") {
        delay = parse_time_ms(value);
    }

    let duration = duration.unwrap_or(0.0);
    let delay = delay.unwrap_or(0.0);
    if duration == 0.0 && delay == 0.0 {
        return 0.0;
    }
    duration + delay
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_with(attrs: &[(&str, &str)]) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let el = tree.create_element("a");
        for (name, value) in attrs {
            tree.set_attribute(el, name, value);
        }
        tree.append_child(tree.root(), el).unwrap();
        (tree, el)
    }

    #[test]
    fn test_get_selector() {
        let (tree, el) = element_with(&[("data-bs-target", ".alert-one")]);
        assert_eq!(get_selector(&tree, el).as_deref(), Some(".alert-one"));

        let (tree, el) = element_with(&[("href", "page.html#section")]);
        assert_eq!(get_selector(&tree, el).as_deref(), Some("#section"));

        let (tree, el) = element_with(&[("data-bs-target", "#"), ("href", "#")]);
        assert_eq!(get_selector(&tree, el), None);

        let (tree, el) = element_with(&[("href", "/docs")]);
        assert_eq!(get_selector(&tree, el), None);
    }

    #[test]
    fn test_fragment() {
        assert_eq!(fragment("#two"), Some("two"));
        assert_eq!(fragment("/page#three"), Some("three"));
        assert_eq!(fragment("#"), None);
        assert_eq!(fragment("/page"), None);
    }

    #[test]
    fn test_transition_duration() {
        let (tree, el) = element_with(&[("style", "transition-duration: 0.15s; transition-delay: 50ms")]);
        assert_eq!(transition_duration_ms(&tree, el), 200.0);

        let (tree, el) = element_with(&[("style", "transition: opacity 150ms linear")]);
        assert_eq!(transition_duration_ms(&tree, el), 150.0);

        let (tree, el) = element_with(&[("style", "transition: opacity 150ms, transform 300ms")]);
        assert_eq!(transition_duration_ms(&tree, el), 150.0);

        let (tree, el) = element_with(&[("style", "transition: opacity 150ms ease 20ms, transform 300ms")]);
        assert_eq!(transition_duration_ms(&tree, el), 170.0);

        let (tree, el) = element_with(&[("style", "transition-duration: 100ms, 400ms")]);
        assert_eq!(transition_duration_ms(&tree, el), 100.0);

        let (tree, el) = element_with(&[("style", "color: red")]);
        assert_eq!(transition_duration_ms(&tree, el), 0.0);
    }
}
