//! Edge case tests for fos-layout

use fos_dom::{Document, NodeId};
use fos_layout::{layout, reflow, LINE_HEIGHT};

fn element(doc: &mut Document, parent: NodeId, tag: &str, style: &str) -> NodeId {
    let tree = doc.tree_mut();
    let el = tree.create_element(tag);
    if !style.is_empty() {
        tree.set_attribute(el, "style", style);
    }
    tree.append_child(parent, el).unwrap();
    el
}

#[test]
fn test_blocks_stack_vertically() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let a = element(&mut doc, body, "div", "height: 40px");
    let b = element(&mut doc, body, "div", "height: 60px; margin-top: 10px");

    layout(&mut doc);

    assert_eq!(doc.geometry(a).unwrap().layout.y, 0.0);
    assert_eq!(doc.geometry(b).unwrap().layout.y, 50.0);
    assert_eq!(doc.geometry(body).unwrap().layout.height, 110.0);
    assert_eq!(doc.geometry(b).unwrap().layout.width, doc.viewport().width);
}

#[test]
fn test_text_takes_one_line() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let p = element(&mut doc, body, "p", "");
    let text = doc.tree_mut().create_text("Lorem ipsum");
    let blank = doc.tree_mut().create_text("   \n  ");
    doc.tree_mut().append_child(p, text).unwrap();
    doc.tree_mut().append_child(body, blank).unwrap();

    layout(&mut doc);

    assert_eq!(doc.geometry(p).unwrap().layout.height, LINE_HEIGHT);
    assert_eq!(doc.geometry(body).unwrap().layout.height, LINE_HEIGHT);
}

#[test]
fn test_scroll_container_measures_overflow() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let spy = element(&mut doc, body, "div", "height: 100px; overflow-y: scroll; padding: 5px");
    for _ in 0..3 {
        element(&mut doc, spy, "section", "height: 100px");
    }

    layout(&mut doc);
    let g = doc.geometry(spy).unwrap();

    assert!(g.scroll_container);
    assert_eq!(g.client_height(), 110.0);
    assert_eq!(g.scroll_height, 310.0);
    assert_eq!(g.max_scroll_top(), 200.0);
}

#[test]
fn test_scroll_offset_survives_reflow() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let spy = element(&mut doc, body, "div", "height: 100px; overflow: auto");
    let section = element(&mut doc, spy, "section", "height: 400px");
    layout(&mut doc);

    doc.scroll_to(spy, 250.0);
    doc.tree_mut().set_attribute(section, "style", "height: 200px");
    reflow(&mut doc);

    // Content shrank, so the old offset is clamped.
    assert_eq!(doc.scroll_top(spy), 100.0);
}

#[test]
fn test_display_none_takes_no_space() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let hidden = element(&mut doc, body, "div", "display: none; height: 50px");
    let inner = element(&mut doc, hidden, "div", "height: 20px");
    let shown = element(&mut doc, body, "div", "height: 30px");

    layout(&mut doc);

    assert!(!doc.geometry(hidden).unwrap().rendered);
    assert!(!doc.geometry(inner).unwrap().rendered);
    assert_eq!(doc.geometry(shown).unwrap().layout.y, 0.0);
}

#[test]
fn test_percent_height_needs_explicit_parent() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let outer = element(&mut doc, body, "div", "height: 200px");
    let half = element(&mut doc, outer, "div", "height: 50%");
    let auto = element(&mut doc, body, "div", "");
    let lost = element(&mut doc, auto, "div", "height: 50%");

    layout(&mut doc);

    assert_eq!(doc.geometry(half).unwrap().layout.height, 100.0);
    assert_eq!(doc.geometry(lost).unwrap().layout.height, 0.0);
}

#[test]
fn test_positioned_ancestor_is_offset_parent() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    element(&mut doc, body, "div", "height: 70px");
    let spy = element(&mut doc, body, "div", "position: relative; height: 100px; overflow: auto");
    element(&mut doc, spy, "div", "height: 40px");
    let section = element(&mut doc, spy, "div", "height: 40px");

    layout(&mut doc);

    assert_eq!(doc.offset_parent(section), Some(spy));
    assert_eq!(doc.offset_top(section), 40.0);
    assert_eq!(doc.geometry(section).unwrap().layout.y, 110.0);
}
