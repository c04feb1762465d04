//! ScrollSpy integration tests

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{DOMRect, DomError, IntersectionObserverEntry, NodeId, RootMargin};
use fos_widgets::{Component, ComponentType, Config, ScrollSpy, Ui, WidgetError};

const THREE_SECTIONS: &str = r##"
<nav id="navigation" class="navbar">
  <ul class="nav">
    <li class="nav-item"><a id="one-link" class="nav-link active" href="#one">One</a></li>
    <li class="nav-item"><a id="two-link" class="nav-link" href="#two">Two</a></li>
    <li class="nav-item"><a id="three-link" class="nav-link" href="#three">Three</a></li>
  </ul>
</nav>
<div id="content" style="position: relative; height: 200px; overflow-y: auto">
  <div id="spacer" style="height: 40px"></div>
  <div id="one" style="height: 80px"></div>
  <div id="two" style="height: 80px"></div>
  <div id="three" style="height: 80px"></div>
</div>
"##;

fn ui(html: &str) -> Ui {
    Ui::new(fos_html::parse_fragment(html).unwrap())
}

fn by_id(ui: &Ui, id: &str) -> NodeId {
    ui.document().get_element_by_id(id).unwrap()
}

fn active_ids(ui: &Ui, scope: &str) -> Vec<String> {
    let doc = ui.document();
    doc.query_selector_all(&format!("{scope} .active"))
        .unwrap()
        .into_iter()
        .map(|n| doc.tree().get_attribute(n, "id").unwrap_or_default().to_string())
        .collect()
}

fn spy_on(ui: &mut Ui, element: &str, target: &str) -> NodeId {
    let el = by_id(ui, element);
    ScrollSpy::new(ui, el, Some(Config::new().with("target", target))).unwrap();
    el
}

fn entry(target: NodeId, is_intersecting: bool, ratio: f64) -> IntersectionObserverEntry {
    IntersectionObserverEntry {
        target,
        bounding_client_rect: DOMRect::default(),
        intersection_rect: DOMRect::default(),
        root_bounds: DOMRect::default(),
        intersection_ratio: ratio,
        is_intersecting,
        time: 0.0,
    }
}

/// Hand a batch to the instance as its observer would
fn deliver(ui: &mut Ui, element: NodeId, entries: &[IntersectionObserverEntry]) -> bool {
    ui.with_instance::<ScrollSpy, _>(element, |spy, doc| {
        let observer = spy.observer_id().unwrap();
        spy.handle_intersections(doc, observer, entries)
    })
    .unwrap()
}

fn record_activations(ui: &mut Ui, element: NodeId) -> Rc<RefCell<Vec<Option<NodeId>>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    ui.document_mut()
        .on(element, "activate.bs.scrollspy", move |e| log.borrow_mut().push(e.related_target));
    seen
}

#[test]
fn test_sections_follow_link_order() {
    let mut ui = ui(r##"
        <nav id="navigation">
          <a id="empty" href="#">Top</a>
          <a id="three-link" href="#three">Three</a>
          <a id="missing-link" href="#missing">Missing</a>
          <a id="external" href="/elsewhere">Elsewhere</a>
          <a id="two-link" href="page.html#two">Two</a>
        </nav>
        <div id="content" style="height: 100px; overflow: auto">
          <div id="two">two</div>
          <div id="three">three</div>
        </div>
        <div id="outside"><div id="missing"></div></div>
    "##);
    let content = spy_on(&mut ui, "content", "#navigation");

    let spy = ScrollSpy::get_instance(&ui, content).unwrap();
    let links = [by_id(&ui, "three-link"), by_id(&ui, "missing-link"), by_id(&ui, "two-link")];
    let sections = [by_id(&ui, "three"), by_id(&ui, "two")];

    assert_eq!(spy.target_links(), links);
    assert_eq!(spy.observable_sections(), sections);
    assert_eq!(spy.config().target, by_id(&ui, "navigation"));
}

#[test]
fn test_refresh_is_idempotent() {
    let mut ui = ui(THREE_SECTIONS);
    let content = spy_on(&mut ui, "content", "#navigation");

    let (links, sections, observer) = {
        let spy = ScrollSpy::get_instance(&ui, content).unwrap();
        (spy.target_links().to_vec(), spy.observable_sections().to_vec(), spy.observer_id())
    };

    ui.with_instance::<ScrollSpy, _>(content, |spy, doc| spy.refresh(doc));
    ui.with_instance::<ScrollSpy, _>(content, |spy, doc| spy.refresh(doc));

    let spy = ScrollSpy::get_instance(&ui, content).unwrap();
    assert_eq!(spy.target_links(), links);
    assert_eq!(spy.observable_sections(), sections);
    assert_eq!(spy.observer_id(), observer);
    assert_eq!(ui.document().intersection_observer_count(), 1);

    let observer = ui.document().intersection_observer(observer.unwrap()).unwrap();
    assert_eq!(observer.targets().count(), 3);
    assert_eq!(observer.root(), Some(content));
    assert_eq!(observer.thresholds(), [0.0]);
}

#[test]
fn test_only_two_intersecting() {
    let mut ui = ui(THREE_SECTIONS);
    let content = spy_on(&mut ui, "content", "#navigation");
    let seen = record_activations(&mut ui, content);
    let two = by_id(&ui, "two");

    assert!(deliver(&mut ui, content, &[entry(two, true, 0.6)]));

    let two_link = by_id(&ui, "two-link");
    assert_eq!(active_ids(&ui, "#navigation"), ["two-link"]);
    assert_eq!(ScrollSpy::get_instance(&ui, content).unwrap().active_target(), Some(two_link));
    assert_eq!(*seen.borrow(), vec![Some(two_link)]);
}

#[test]
fn test_lowest_offset_wins() {
    let mut ui = ui(THREE_SECTIONS);
    let content = spy_on(&mut ui, "content", "#navigation");
    let one = by_id(&ui, "one");
    let two = by_id(&ui, "two");
    assert_eq!(ui.document().offset_top(one), 40.0);
    assert_eq!(ui.document().offset_top(two), 120.0);

    deliver(&mut ui, content, &[entry(two, true, 0.7), entry(one, false, 0.8)]);

    assert_eq!(active_ids(&ui, "#navigation"), ["one-link"]);
    let spy = ScrollSpy::get_instance(&ui, content).unwrap();
    assert_eq!(spy.visible_entries(), [("two".to_string(), 120.0), ("one".to_string(), 40.0)]);
}

#[test]
fn test_empty_visible_set_keeps_active_link() {
    let mut ui = ui(THREE_SECTIONS);
    let content = spy_on(&mut ui, "content", "#navigation");
    let two = by_id(&ui, "two");
    deliver(&mut ui, content, &[entry(two, true, 1.0)]);
    let seen = record_activations(&mut ui, content);

    assert!(deliver(&mut ui, content, &[entry(two, false, 0.0)]));

    let spy = ScrollSpy::get_instance(&ui, content).unwrap();
    assert!(spy.visible_entries().is_empty());
    assert_eq!(spy.active_target(), Some(by_id(&ui, "two-link")));
    assert_eq!(active_ids(&ui, "#navigation"), ["two-link"]);
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_section_without_link_keeps_active_link() {
    let mut ui = ui(THREE_SECTIONS);
    let content = spy_on(&mut ui, "content", "#navigation");
    let (one, two) = (by_id(&ui, "one"), by_id(&ui, "two"));
    deliver(&mut ui, content, &[entry(two, true, 1.0)]);
    let seen = record_activations(&mut ui, content);

    // Still observed, but no link points at the new id
    ui.document_mut().tree_mut().set_attribute(one, "id", "renamed");
    assert!(deliver(&mut ui, content, &[entry(one, true, 1.0), entry(two, false, 0.0)]));

    let spy = ScrollSpy::get_instance(&ui, content).unwrap();
    assert_eq!(spy.visible_entries(), [("renamed".to_string(), 40.0)]);
    assert_eq!(spy.active_target(), Some(by_id(&ui, "two-link")));
    assert_eq!(active_ids(&ui, "#navigation"), ["two-link"]);
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_at_most_one_active_link() {
    let mut ui = ui(THREE_SECTIONS);
    let content = spy_on(&mut ui, "content", "#navigation");
    let [one, two, three] = ["one", "two", "three"].map(|id| by_id(&ui, id));

    let batches = [
        vec![entry(three, true, 1.0)],
        vec![entry(one, true, 0.2), entry(two, true, 1.0)],
        vec![entry(one, false, 0.0)],
        vec![entry(two, false, 0.0), entry(three, false, 0.0)],
        vec![entry(three, false, 0.9)],
    ];
    let expected = ["three-link", "one-link", "two-link", "two-link", "three-link"];

    for (batch, expected) in batches.iter().zip(expected) {
        deliver(&mut ui, content, batch);
        assert_eq!(active_ids(&ui, "#navigation"), [expected]);
    }
}

#[test]
fn test_missing_target_fails_before_observing() {
    let mut ui = ui(THREE_SECTIONS);
    let content = by_id(&ui, "content");

    let err = ScrollSpy::new(&mut ui, content, Some(Config::new().with("target", "#nowhere"))).unwrap_err();

    assert_eq!(err, WidgetError::TargetNotDefined);
    assert_eq!(err.to_string(), "Target Container is not defined");
    assert_eq!(ui.document().intersection_observer_count(), 0);
    assert!(ui.registry().is_empty());
    assert!(ScrollSpy::get_instance(&ui, content).is_none());
}

#[test]
fn test_unusable_targets() {
    let mut ui = ui(THREE_SECTIONS);
    let content = by_id(&ui, "content");

    for target in ["", "###", "[unclosed"] {
        let result = ScrollSpy::new(&mut ui, content, Some(Config::new().with("target", target)));
        assert_eq!(result.unwrap_err(), WidgetError::TargetNotDefined);
    }
    let result = ScrollSpy::new(&mut ui, content, Some(Config::new().with("target", 3.0)));
    assert_eq!(result.unwrap_err(), WidgetError::TargetNotDefined);

    let result = ScrollSpy::new(&mut ui, NodeId::ROOT, Some(Config::new().with("target", "#navigation")));
    assert_eq!(result.unwrap_err(), WidgetError::NotAnElement(NodeId::ROOT));
}

#[test]
fn test_dispose_then_get_instance() {
    let mut ui = ui(THREE_SECTIONS);
    let content = spy_on(&mut ui, "content", "#navigation");
    assert!(ScrollSpy::get_instance(&ui, content).is_some());

    assert!(ui.dispose::<ScrollSpy>(content));

    assert!(ScrollSpy::get_instance(&ui, content).is_none());
    assert_eq!(ui.document().intersection_observer_count(), 0);
    assert!(!ui.dispose::<ScrollSpy>(content));
}

#[test]
fn test_one_instance_per_element() {
    let mut ui = ui(THREE_SECTIONS);
    let content = spy_on(&mut ui, "content", "#navigation");
    let observer = ScrollSpy::get_instance(&ui, content).unwrap().observer_id();

    let err = ScrollSpy::new(&mut ui, content, Some(Config::new().with("target", "#navigation"))).unwrap_err();
    assert_eq!(err, WidgetError::AlreadyInitialized { element: content, existing: "scrollspy" });
    assert_eq!(ui.document().intersection_observer_count(), 1);

    let existing = ScrollSpy::get_or_create_instance(&mut ui, content, None).unwrap();
    assert_eq!(existing.observer_id(), observer);
    assert_eq!(existing.data_key(), "bs.scrollspy");
}

#[test]
fn test_target_as_element() {
    let mut ui = ui(THREE_SECTIONS);
    let content = by_id(&ui, "content");
    let nav = by_id(&ui, "navigation");

    let spy = ScrollSpy::new(&mut ui, content, Some(Config::new().with("target", nav))).unwrap();

    assert_eq!(spy.config().target, nav);
    assert_eq!(spy.observable_sections().len(), 3);
}

#[test]
fn test_overrides_beat_data_attributes() {
    let mut ui = ui(r##"
        <nav id="first"><a href="#one">One</a></nav>
        <nav id="second"><a href="#one">One</a><a href="#two">Two</a></nav>
        <div id="content" data-bs-target="#first" data-bs-root-margin="0px 0px -40%">
          <div id="one"></div>
          <div id="two"></div>
        </div>
    "##);
    let content = by_id(&ui, "content");

    let spy = ScrollSpy::new(&mut ui, content, Some(Config::new().with("target", "#second"))).unwrap();

    assert_eq!(spy.target_links().len(), 2);
    assert_eq!(spy.config().root_margin, RootMargin::parse("0px 0px -40%").unwrap());
}

#[test]
fn test_type_check_message() {
    let mut ui = ui(r##"
        <nav id="nav"><a href="#one">One</a></nav>
        <div id="content" data-bs-target="#nav" data-bs-root-margin="10"><div id="one"></div></div>
    "##);
    let content = by_id(&ui, "content");

    let err = ScrollSpy::new(&mut ui, content, None).unwrap_err();

    assert_eq!(
        err.to_string(),
        "SCROLLSPY: Option \"rootMargin\" provided type \"number\" but expected type \"(string)\"."
    );
    assert_eq!(ui.document().intersection_observer_count(), 0);
}

#[test]
fn test_invalid_root_margin() {
    let mut ui = ui(THREE_SECTIONS);
    let content = by_id(&ui, "content");
    let config = Config::new().with("target", "#navigation").with("rootMargin", "10em");

    let err = ScrollSpy::new(&mut ui, content, Some(config)).unwrap_err();

    assert!(matches!(err, WidgetError::Dom(DomError::InvalidRootMargin(_))));
}

#[test]
fn test_refresh_picks_up_dom_changes() {
    let mut ui = ui(THREE_SECTIONS);
    let content = spy_on(&mut ui, "content", "#navigation");
    let two = by_id(&ui, "two");
    deliver(&mut ui, content, &[entry(two, true, 1.0)]);

    let nav_list = ui.document().query_selector("#navigation ul").unwrap().unwrap();
    let tree = ui.document_mut().tree_mut();
    tree.detach(two);
    let link = tree.create_element("a");
    tree.set_attribute(link, "href", "#four");
    tree.append_child(nav_list, link).unwrap();
    let four = tree.create_element("div");
    tree.set_attribute(four, "id", "four");
    tree.append_child(content, four).unwrap();

    ui.with_instance::<ScrollSpy, _>(content, |spy, doc| spy.refresh(doc));

    let spy = ScrollSpy::get_instance(&ui, content).unwrap();
    let sections = [by_id(&ui, "one"), by_id(&ui, "three"), four];
    assert_eq!(spy.observable_sections(), sections);
    assert_eq!(spy.target_links().len(), 4);
    assert!(spy.visible_entries().is_empty());
}

#[test]
fn test_activate_none_clears_markup() {
    let mut ui = ui(THREE_SECTIONS);
    let content = spy_on(&mut ui, "content", "#navigation");
    let seen = record_activations(&mut ui, content);
    let two_link = by_id(&ui, "two-link");

    ui.with_instance::<ScrollSpy, _>(content, |spy, doc| spy.activate(doc, Some(two_link)));
    ui.with_instance::<ScrollSpy, _>(content, |spy, doc| spy.activate(doc, Some(two_link)));
    assert_eq!(seen.borrow().len(), 1);

    ui.with_instance::<ScrollSpy, _>(content, |spy, doc| spy.activate(doc, None));

    assert!(active_ids(&ui, "#navigation").is_empty());
    assert_eq!(ScrollSpy::get_instance(&ui, content).unwrap().active_target(), None);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_activate_event_bubbles() {
    let mut ui = ui(THREE_SECTIONS);
    let content = spy_on(&mut ui, "content", "#navigation");
    let body = ui.document().body().unwrap();
    let seen = record_activations(&mut ui, body);
    let three_link = by_id(&ui, "three-link");

    ui.with_instance::<ScrollSpy, _>(content, |spy, doc| spy.activate(doc, Some(three_link)));

    assert_eq!(*seen.borrow(), vec![Some(three_link)]);
}

fn activate(ui: &mut Ui, element: NodeId, link: &str) {
    let link = by_id(ui, link);
    ui.with_instance::<ScrollSpy, _>(element, |spy, doc| spy.activate(doc, Some(link)));
}

#[test]
fn test_nested_nav_marks_parent_links() {
    let mut ui = ui(r##"
        <nav id="navbar-nested" class="navbar">
          <nav class="nav flex-column">
            <a class="nav-link" id="item-1-link" href="#item-1">Item 1</a>
            <nav class="nav flex-column">
              <a class="nav-link" id="item-1-1-link" href="#item-1-1">Item 1-1</a>
              <a class="nav-link" id="item-1-2-link" href="#item-1-2">Item 1-2</a>
            </nav>
            <a class="nav-link" id="item-2-link" href="#item-2">Item 2</a>
          </nav>
        </nav>
        <div id="content" style="height: 100px; overflow: auto">
          <h4 id="item-1">Item 1</h4>
          <h5 id="item-1-1">Item 1-1</h5>
          <h5 id="item-1-2">Item 1-2</h5>
          <h4 id="item-2">Item 2</h4>
        </div>
    "##);
    let content = spy_on(&mut ui, "content", "#navbar-nested");

    activate(&mut ui, content, "item-1-2-link");
    assert_eq!(active_ids(&ui, "#navbar-nested"), ["item-1-link", "item-1-2-link"]);

    activate(&mut ui, content, "item-2-link");
    assert_eq!(active_ids(&ui, "#navbar-nested"), ["item-2-link"]);
}

#[test]
fn test_nested_list_markup_marks_parent_nav_item() {
    let mut ui = ui(r##"
        <nav id="navigation">
          <ul class="nav">
            <li class="nav-item"><a class="nav-link" id="parent-link" href="#parent">Parent</a></li>
            <ul class="nav">
              <li class="nav-item"><a class="nav-link" id="child-link" href="#child">Child</a></li>
            </ul>
          </ul>
        </nav>
        <div id="content"><div id="parent"></div><div id="child"></div></div>
    "##);
    let content = spy_on(&mut ui, "content", "#navigation");

    activate(&mut ui, content, "child-link");

    assert_eq!(active_ids(&ui, "#navigation"), ["parent-link", "child-link"]);
}

#[test]
fn test_nested_list_group() {
    let mut ui = ui(r##"
        <div id="list">
          <div class="list-group">
            <a class="list-group-item" id="group-link" href="#group">Group</a>
            <div class="list-group">
              <a class="list-group-item" id="entry-link" href="#entry">Entry</a>
            </div>
          </div>
        </div>
        <div id="content"><div id="group"></div><div id="entry"></div></div>
    "##);
    let content = spy_on(&mut ui, "content", "#list");

    activate(&mut ui, content, "entry-link");

    assert_eq!(active_ids(&ui, "#list"), ["group-link", "entry-link"]);
}

#[test]
fn test_dropdown_item_marks_toggle() {
    let mut ui = ui(r##"
        <nav id="navbar">
          <ul class="nav">
            <li class="nav-item"><a class="nav-link" id="first-link" href="#first">First</a></li>
            <li class="nav-item dropdown">
              <a class="nav-link dropdown-toggle" id="toggle" href="#">Dropdown</a>
              <ul class="dropdown-menu">
                <li><a class="dropdown-item" id="third-link" href="#third">Third</a></li>
              </ul>
            </li>
          </ul>
        </nav>
        <div id="content"><div id="first"></div><div id="third"></div></div>
    "##);
    let content = spy_on(&mut ui, "content", "#navbar");
    assert_eq!(ScrollSpy::get_instance(&ui, content).unwrap().target_links().len(), 2);

    activate(&mut ui, content, "third-link");
    assert_eq!(active_ids(&ui, "#navbar"), ["toggle", "third-link"]);

    activate(&mut ui, content, "first-link");
    assert_eq!(active_ids(&ui, "#navbar"), ["first-link"]);
}

#[test]
fn test_data_api_on_load() {
    let mut ui = ui(r##"
        <nav id="navbar-example" class="nav">
          <a class="nav-link" id="one-link" href="#one">One</a>
          <a class="nav-link" id="two-link" href="#two">Two</a>
        </nav>
        <div id="spy" data-bs-spy="scroll" data-bs-target="#navbar-example" data-bs-root-margin="0px 0px -40%"
             style="position: relative; height: 100px; overflow-y: scroll">
          <div id="one" style="height: 100px"></div>
          <div id="two" style="height: 100px"></div>
        </div>
        <div id="broken" data-bs-spy="scroll" data-bs-target="#nowhere"></div>
    "##);

    assert_eq!(ui.load().unwrap(), 1);

    let spy_el = by_id(&ui, "spy");
    let spy = ScrollSpy::get_instance(&ui, spy_el).unwrap();
    assert_eq!(spy.config().target, by_id(&ui, "navbar-example"));
    assert_eq!(spy.config().root_margin.to_string(), "0px 0px -40% 0px");
    assert!(ScrollSpy::get_instance(&ui, by_id(&ui, "broken")).is_none());

    ui.run_intersection_observers();
    assert_eq!(active_ids(&ui, "#navbar-example"), ["one-link"]);

    // Bound elements are skipped on a second load
    assert_eq!(ui.load().unwrap(), 0);
    assert_eq!(ui.registry().len(), 1);
}
