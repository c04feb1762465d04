//! ScrollSpy
//!
//! Watches the sections inside a scroll container with an intersection
//! observer and keeps the `active` class of the matching navigation link
//! (and its parent nav items, list groups and dropdown toggles) in sync.

use std::any::Any;

use fos_dom::{
    Document, DomTree, ElementData, EventInit, IntersectionObserverEntry, IntersectionObserverInit,
    NodeId, ObserverId, RootMargin, SelectorList,
};
use tracing::{debug, trace, warn};

use crate::config::{type_check, Config, ConfigValue};
use crate::util::fragment;
use crate::{Component, ComponentType, Ui, WidgetError};

pub const NAME: &str = "scrollspy";
pub const DATA_KEY: &str = "bs.scrollspy";

pub const EVENT_ACTIVATE: &str = "activate.bs.scrollspy";

pub const CLASS_NAME_DROPDOWN_ITEM: &str = "dropdown-item";
pub const CLASS_NAME_ACTIVE: &str = "active";

pub const SELECTOR_DATA_SPY: &str = "[data-bs-spy=\"scroll\"]";
const SELECTOR_TARGET_LINKS: &str = "[href]";
const SELECTOR_NAV_LIST_GROUP: &str = ".nav, .list-group";
const SELECTOR_NAV_LINKS: &str = ".nav-link";
const SELECTOR_NAV_ITEMS: &str = ".nav-item";
const SELECTOR_LIST_ITEMS: &str = ".list-group-item";
const SELECTOR_DROPDOWN: &str = ".dropdown";
const SELECTOR_DROPDOWN_TOGGLE: &str = ".dropdown-toggle";

/// Declared option types
const DEFAULT_TYPE: &[(&str, &str)] = &[("target", "(string|element)"), ("rootMargin", "(string)")];

/// Option defaults, lowest priority layer
fn default_config() -> Config {
    Config::new().with("target", ConfigValue::Null).with("rootMargin", "0px")
}

/// Resolved configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSpyConfig {
    /// Navigation container holding the links
    pub target: NodeId,
    pub root_margin: RootMargin,
}

/// Selectors used while refreshing and activating
#[derive(Debug)]
struct Selectors {
    target_links: SelectorList,
    nav_list_group: SelectorList,
    nav_links_and_list_items: SelectorList,
    nav_links: SelectorList,
    nav_items: SelectorList,
    dropdown: SelectorList,
    dropdown_toggle: SelectorList,
}

impl Selectors {
    fn new() -> Result<Self, WidgetError> {
        Ok(Self {
            target_links: SelectorList::parse(SELECTOR_TARGET_LINKS)?,
            nav_list_group: SelectorList::parse(SELECTOR_NAV_LIST_GROUP)?,
            nav_links_and_list_items: SelectorList::parse(&format!(
                "{SELECTOR_NAV_LINKS}, {SELECTOR_LIST_ITEMS}"
            ))?,
            nav_links: SelectorList::parse(SELECTOR_NAV_LINKS)?,
            nav_items: SelectorList::parse(SELECTOR_NAV_ITEMS)?,
            dropdown: SelectorList::parse(SELECTOR_DROPDOWN)?,
            dropdown_toggle: SelectorList::parse(SELECTOR_DROPDOWN_TOGGLE)?,
        })
    }
}

/// The live subscription and the sections it currently sees
///
/// Entries are kept in first-recorded order; updating a section that is
/// already visible keeps its place.
#[derive(Debug)]
pub struct SectionObserver {
    id: ObserverId,
    visible_entries: Vec<(String, f64)>,
}

impl SectionObserver {
    fn new(id: ObserverId) -> Self {
        Self { id, visible_entries: Vec::new() }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// `(section id, offset top)` of every visible section
    pub fn visible_entries(&self) -> &[(String, f64)] {
        &self.visible_entries
    }

    fn clear(&mut self) {
        self.visible_entries.clear();
    }

    /// Fold a batch into the visible set and return the topmost section
    fn record(&mut self, doc: &Document, entries: &[IntersectionObserverEntry]) -> Option<&str> {
        for entry in entries {
            let key = doc
                .tree()
                .element(entry.target)
                .and_then(ElementData::id)
                .unwrap_or_default();

            if entry.is_intersecting || entry.intersection_ratio > 0.5 {
                let top = doc.offset_top(entry.target);
                match self.visible_entries.iter_mut().find(|(id, _)| id == key) {
                    Some(visible) => visible.1 = top,
                    None => self.visible_entries.push((key.to_string(), top)),
                }
            } else {
                self.visible_entries.retain(|(id, _)| id != key);
            }
        }
        self.first_visible()
    }

    /// Smallest offset wins; on a tie the earlier entry is kept
    fn first_visible(&self) -> Option<&str> {
        self.visible_entries
            .iter()
            .reduce(|best, entry| if entry.1 < best.1 { entry } else { best })
            .map(|(id, _)| id.as_str())
    }
}

/// ScrollSpy instance bound to a scroll container
#[derive(Debug)]
pub struct ScrollSpy {
    element: NodeId,
    config: ScrollSpyConfig,
    selectors: Selectors,
    target_links: Vec<NodeId>,
    observable_sections: Vec<NodeId>,
    active_target: Option<NodeId>,
    observer: Option<SectionObserver>,
}

impl ScrollSpy {
    /// Bind a ScrollSpy to `element`, resolve its configuration and start
    /// observing its sections
    pub fn new(ui: &mut Ui, element: NodeId, config: Option<Config>) -> Result<&mut Self, WidgetError> {
        if !ui.document().tree().is_element(element) {
            return Err(WidgetError::NotAnElement(element));
        }
        ui.registry().ensure_vacant(element)?;

        let config = Self::get_config(ui.document().tree(), element, config)?;
        let mut spy = Self {
            element,
            config,
            selectors: Selectors::new()?,
            target_links: Vec::new(),
            observable_sections: Vec::new(),
            active_target: None,
            observer: None,
        };
        spy.refresh(ui.document_mut());

        debug!(%element, target = %config.target, root_margin = %config.root_margin, "created scrollspy");
        ui.registry_mut().register(spy)
    }

    pub fn get_or_create_instance(
        ui: &mut Ui,
        element: NodeId,
        config: Option<Config>,
    ) -> Result<&mut Self, WidgetError> {
        if Self::get_instance(ui, element).is_none() {
            Self::new(ui, element, config)?;
        }
        Self::get_instance_mut(ui, element).ok_or(WidgetError::InstanceType { element, expected: NAME })
    }

    /// Defaults, then `data-bs-*` attributes, then `overrides`
    fn get_config(tree: &DomTree, element: NodeId, overrides: Option<Config>) -> Result<ScrollSpyConfig, WidgetError> {
        let mut config = default_config();
        config.merge(Config::from_data_attributes(tree, element));
        if let Some(overrides) = overrides {
            config.merge(overrides);
        }

        let target = match config.get("target") {
            Some(ConfigValue::Element(node)) if tree.is_element(*node) => Some(*node),
            Some(ConfigValue::String(selector)) => tree.find_one(selector, NodeId::ROOT).unwrap_or_else(|err| {
                trace!(%err, "target selector matches nothing");
                None
            }),
            _ => None,
        };
        let target = target.ok_or(WidgetError::TargetNotDefined)?;
        config.set("target", target);

        type_check(NAME, &config, DEFAULT_TYPE)?;

        let root_margin = RootMargin::parse(config.get_str("rootMargin").unwrap_or("0px"))?;
        Ok(ScrollSpyConfig { target, root_margin })
    }

    /// Re-read links and sections and re-subscribe the observer
    pub fn refresh(&mut self, doc: &mut Document) {
        let tree = doc.tree();
        self.target_links = self
            .selectors
            .target_links
            .find(tree, self.config.target)
            .into_iter()
            .filter(|&link| tree.get_attribute(link, "href").and_then(fragment).is_some())
            .collect();

        self.observable_sections = self
            .target_links
            .iter()
            .filter_map(|&link| {
                let id = tree.get_attribute(link, "href").and_then(fragment)?;
                tree.find_by_id(self.element, id)
            })
            .collect();

        fos_layout::reflow(doc);

        let observer = match self.observer.as_mut() {
            Some(observer) => {
                doc.disconnect(observer.id);
                observer.clear();
                observer.id
            }
            None => {
                let id = doc.create_intersection_observer(IntersectionObserverInit {
                    root: Some(self.element),
                    root_margin: self.config.root_margin,
                    thresholds: vec![0.0],
                });
                self.observer = Some(SectionObserver::new(id));
                id
            }
        };

        for &section in &self.observable_sections {
            doc.observe(observer, section);
        }

        debug!(
            element = %self.element,
            %observer,
            links = self.target_links.len(),
            sections = self.observable_sections.len(),
            "refreshed scrollspy"
        );
    }

    /// Make `target` the active link; `None` clears all active markup
    pub fn activate(&mut self, doc: &mut Document, target: Option<NodeId>) {
        if self.active_target == target {
            return;
        }

        self.clear_active_class(doc);
        let Some(target) = target else {
            self.active_target = None;
            return;
        };
        self.active_target = Some(target);

        let tree = doc.tree();
        let mut marked = vec![target];
        if tree.has_class(target, CLASS_NAME_DROPDOWN_ITEM) {
            if let Some(dropdown) = self.selectors.dropdown.closest(tree, target) {
                marked.extend(self.selectors.dropdown_toggle.find_one(tree, dropdown));
            }
        } else {
            // With both <ul> and <nav> markup the parent link is a previous
            // sibling of the nested nav or list group
            for list_group in self.selectors.nav_list_group.parents(tree, target) {
                marked.extend(self.selectors.nav_links_and_list_items.prev(tree, list_group));
                for nav_item in self.selectors.nav_items.prev(tree, list_group) {
                    marked.extend(self.selectors.nav_links.children(tree, nav_item));
                }
            }
        }

        let tree = doc.tree_mut();
        for &node in &marked {
            tree.add_class(node, CLASS_NAME_ACTIVE);
        }

        debug!(element = %self.element, %target, marked = marked.len(), "activated link");
        doc.trigger(
            self.element,
            EVENT_ACTIVATE,
            EventInit { related_target: Some(target), ..EventInit::default() },
        );
    }

    fn clear_active_class(&self, doc: &mut Document) {
        let tree = doc.tree();
        let active: Vec<NodeId> = tree
            .descendants(self.config.target)
            .filter(|&node| tree.has_class(node, CLASS_NAME_ACTIVE))
            .collect();
        if active.is_empty() {
            return;
        }
        let tree = doc.tree_mut();
        for node in active {
            tree.remove_class(node, CLASS_NAME_ACTIVE);
        }
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn config(&self) -> &ScrollSpyConfig {
        &self.config
    }

    pub fn target_links(&self) -> &[NodeId] {
        &self.target_links
    }

    pub fn observable_sections(&self) -> &[NodeId] {
        &self.observable_sections
    }

    pub fn active_target(&self) -> Option<NodeId> {
        self.active_target
    }

    pub fn observer_id(&self) -> Option<ObserverId> {
        self.observer.as_ref().map(SectionObserver::id)
    }

    pub fn visible_entries(&self) -> &[(String, f64)] {
        self.observer.as_ref().map(SectionObserver::visible_entries).unwrap_or_default()
    }
}

impl Component for ScrollSpy {
    fn element(&self) -> NodeId {
        self.element
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn data_key(&self) -> &'static str {
        DATA_KEY
    }

    fn dispose(&mut self, doc: &mut Document) {
        doc.off(self.element, ".bs.scrollspy");
        if let Some(observer) = self.observer.take() {
            doc.disconnect(observer.id);
            doc.remove_intersection_observer(observer.id);
        }
        self.target_links.clear();
        self.observable_sections.clear();
        self.active_target = None;
        debug!(element = %self.element, "disposed scrollspy");
    }

    fn handle_intersections(
        &mut self,
        doc: &mut Document,
        observer: ObserverId,
        entries: &[IntersectionObserverEntry],
    ) -> bool {
        let Some(section_observer) = self.observer.as_mut().filter(|o| o.id == observer) else {
            return false;
        };
        let Some(first_visible) = section_observer.record(doc, entries).map(str::to_string) else {
            trace!(element = %self.element, entries = entries.len(), "no visible section");
            return true;
        };

        let tree = doc.tree();
        let link = self
            .target_links
            .iter()
            .copied()
            .find(|&link| tree.get_attribute(link, "href").and_then(fragment) == Some(first_visible.as_str()));
        trace!(element = %self.element, section = %first_visible, ?link, "topmost visible section");

        // A section with no link pointing at it leaves the current link active
        if let Some(link) = link {
            self.activate(doc, Some(link));
        }
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentType for ScrollSpy {
    const NAME: &'static str = NAME;
    const DATA_KEY: &'static str = DATA_KEY;
}

/// Create a ScrollSpy for every `[data-bs-spy="scroll"]` element that has
/// none yet. Elements that fail to initialize are skipped.
pub fn init_data_api(ui: &mut Ui) -> Result<usize, WidgetError> {
    let spies = ui.document().query_selector_all(SELECTOR_DATA_SPY)?;
    let mut created = 0;
    for spy in spies {
        if ui.registry().contains(spy) {
            trace!(element = %spy, "already bound");
            continue;
        }
        match ScrollSpy::new(ui, spy, None) {
            Ok(_) => created += 1,
            Err(err) => warn!(element = %spy, %err, "skipping scrollspy"),
        }
    }
    Ok(created)
}
