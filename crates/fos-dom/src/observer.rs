//! Intersection Observer
//!
//! Tracks how much of each observed element is visible inside a root
//! (an ancestor scroll container, or the viewport when no root is given)
//! and queues an entry whenever that visibility crosses a threshold.
//!
//! Observers never call back on their own. The owning document computes
//! intersections in [`IntersectionObserverManager::process`] and hands the
//! queued entries out as [`IntersectionRecords`].

use std::fmt;
use std::str::FromStr;

use crate::geometry::GeometryView;
use crate::{DOMRect, DomError, EdgeSizes, NodeId};

/// Observer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u32);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// One side of a root margin
#[derive(Debug, Clone, Copy, PartialEq)]
enum MarginValue {
    Px(f64),
    Percent(f64),
}

impl MarginValue {
    fn parse(token: &str) -> Option<Self> {
        let (number, unit) = if let Some(n) = token.strip_suffix("px") {
            (n, "px")
        } else if let Some(n) = token.strip_suffix('%') {
            (n, "%")
        } else {
            return None;
        };
        let value: f64 = number.parse().ok().filter(|v: &f64| v.is_finite())?;
        Some(if unit == "px" { Self::Px(value) } else { Self::Percent(value) })
    }

    fn resolve(self, basis: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Percent(p) => basis * p / 100.0,
        }
    }
}

impl fmt::Display for MarginValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// Offsets growing (or, when negative, shrinking) the root's bounds
///
/// Accepts one to four `px` or `%` values in CSS margin order.
/// Percentages of the top and bottom sides resolve against the root's
/// height, left and right against its width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    top: MarginValue,
    right: MarginValue,
    bottom: MarginValue,
    left: MarginValue,
}

impl Default for RootMargin {
    fn default() -> Self {
        let zero = MarginValue::Px(0.0);
        Self { top: zero, right: zero, bottom: zero, left: zero }
    }
}

impl RootMargin {
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let invalid = || DomError::InvalidRootMargin(input.to_string());
        let values = input
            .split_whitespace()
            .map(MarginValue::parse)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        match values.as_slice() {
            [all] => Ok(Self { top: *all, right: *all, bottom: *all, left: *all }),
            [v, h] => Ok(Self { top: *v, right: *h, bottom: *v, left: *h }),
            [t, h, b] => Ok(Self { top: *t, right: *h, bottom: *b, left: *h }),
            [t, r, b, l] => Ok(Self { top: *t, right: *r, bottom: *b, left: *l }),
            _ => Err(invalid()),
        }
    }

    /// Resolve against the root bounds
    pub fn edges(&self, root: &DOMRect) -> EdgeSizes {
        EdgeSizes {
            top: self.top.resolve(root.height),
            right: self.right.resolve(root.width),
            bottom: self.bottom.resolve(root.height),
            left: self.left.resolve(root.width),
        }
    }

    /// Root bounds grown by this margin
    pub fn apply(&self, root: &DOMRect) -> DOMRect {
        root.outset(&self.edges(root))
    }
}

impl FromStr for RootMargin {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// IntersectionObserver options
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionObserverInit {
    /// Scroll container to measure against; `None` means the viewport
    pub root: Option<NodeId>,
    pub root_margin: RootMargin,
    pub thresholds: Vec<f64>,
}

impl Default for IntersectionObserverInit {
    fn default() -> Self {
        Self { root: None, root_margin: RootMargin::default(), thresholds: vec![0.0] }
    }
}

/// IntersectionObserverEntry
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionObserverEntry {
    pub target: NodeId,
    pub bounding_client_rect: DOMRect,
    pub intersection_rect: DOMRect,
    /// Root bounds with the root margin applied
    pub root_bounds: DOMRect,
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
    pub time: f64,
}

/// Last reported state of one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TargetState {
    threshold_index: i32,
    is_intersecting: bool,
}

/// IntersectionObserver
#[derive(Debug)]
pub struct IntersectionObserver {
    id: ObserverId,
    root: Option<NodeId>,
    root_margin: RootMargin,
    thresholds: Vec<f64>,
    targets: Vec<(NodeId, Option<TargetState>)>,
    pending: Vec<IntersectionObserverEntry>,
}

impl IntersectionObserver {
    fn new(id: ObserverId, init: IntersectionObserverInit) -> Self {
        let mut thresholds: Vec<f64> = init
            .thresholds
            .into_iter()
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, 1.0))
            .collect();
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        if thresholds.is_empty() {
            thresholds.push(0.0);
        }

        Self {
            id,
            root: init.root,
            root_margin: init.root_margin,
            thresholds,
            targets: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root_margin(&self) -> &RootMargin {
        &self.root_margin
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Start observing; observing the same target twice is a no-op
    pub fn observe(&mut self, target: NodeId) {
        if !self.is_observing(target) {
            self.targets.push((target, None));
        }
    }

    pub fn unobserve(&mut self, target: NodeId) {
        self.targets.retain(|(t, _)| *t != target);
        self.pending.retain(|e| e.target != target);
    }

    /// Stop observing everything and drop queued entries
    pub fn disconnect(&mut self) {
        self.targets.clear();
        self.pending.clear();
    }

    pub fn is_observing(&self, target: NodeId) -> bool {
        self.targets.iter().any(|(t, _)| *t == target)
    }

    /// Observed targets in observation order
    pub fn targets(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.targets.iter().map(|(t, _)| *t)
    }

    /// Drain queued entries
    pub fn take_records(&mut self) -> Vec<IntersectionObserverEntry> {
        std::mem::take(&mut self.pending)
    }

    /// Root bounds before the margin is applied
    fn root_rect(&self, view: &GeometryView<'_>) -> Option<DOMRect> {
        match self.root {
            None => Some(DOMRect::from_xywh(0.0, 0.0, view.viewport.width, view.viewport.height)),
            Some(root) if view.is_rendered(root) => Some(view.bounding_client_rect(root)),
            Some(_) => None,
        }
    }

    /// Visible part of `target` inside `root_bounds`, clipped by every
    /// scroll container between the two
    fn intersect(&self, view: &GeometryView<'_>, target: NodeId, root_bounds: &DOMRect) -> Option<DOMRect> {
        if !view.is_rendered(target) {
            return None;
        }
        let inside_root = match self.root {
            Some(root) => view.tree.ancestors(target).any(|a| a == root),
            None => view.tree.is_connected(target),
        };
        if !inside_root {
            return None;
        }

        let mut rect = view.bounding_client_rect(target);
        for ancestor in view.tree.ancestors(target) {
            if Some(ancestor) == self.root {
                break;
            }
            if view.geometry(ancestor).is_some_and(|g| g.scroll_container) {
                rect = rect.intersection(&view.bounding_client_rect(ancestor))?;
            }
        }
        rect.intersection(root_bounds)
    }

    fn threshold_index(&self, ratio: f64) -> i32 {
        self.thresholds.iter().take_while(|&&t| t <= ratio).count() as i32
    }

    /// Recompute every target and queue entries for those whose state changed
    fn update(&mut self, view: &GeometryView<'_>, time: f64) {
        let root_rect = self.root_rect(view);
        let root_bounds = root_rect
            .map(|r| self.root_margin.apply(&r))
            .unwrap_or_default();

        for i in 0..self.targets.len() {
            let target = self.targets[i].0;
            let bounding_client_rect = view.bounding_client_rect(target);
            let intersection = root_rect.and_then(|_| self.intersect(view, target, &root_bounds));

            let (intersection_rect, intersection_ratio, is_intersecting) = match intersection {
                Some(rect) => {
                    let target_area = bounding_client_rect.area();
                    let ratio = if target_area > 0.0 { rect.area() / target_area } else { 1.0 };
                    (rect, ratio, true)
                }
                None => (DOMRect::default(), 0.0, false),
            };
            let state = TargetState {
                threshold_index: if is_intersecting { self.threshold_index(intersection_ratio) } else { -1 },
                is_intersecting,
            };

            if self.targets[i].1 != Some(state) {
                self.targets[i].1 = Some(state);
                self.pending.push(IntersectionObserverEntry {
                    target,
                    bounding_client_rect,
                    intersection_rect,
                    root_bounds,
                    intersection_ratio,
                    is_intersecting,
                    time,
                });
            }
        }
    }
}

/// Entries delivered to one observer in a single pass
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionRecords {
    pub observer: ObserverId,
    pub root: Option<NodeId>,
    pub entries: Vec<IntersectionObserverEntry>,
}

/// Owns every observer of a document
#[derive(Debug, Default)]
pub struct IntersectionObserverManager {
    observers: Vec<IntersectionObserver>,
    next_id: u32,
}

impl IntersectionObserverManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, init: IntersectionObserverInit) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push(IntersectionObserver::new(id, init));
        id
    }

    pub fn get(&self, id: ObserverId) -> Option<&IntersectionObserver> {
        self.observers.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObserverId) -> Option<&mut IntersectionObserver> {
        self.observers.iter_mut().find(|o| o.id == id)
    }

    pub fn remove(&mut self, id: ObserverId) -> Option<IntersectionObserver> {
        let index = self.observers.iter().position(|o| o.id == id)?;
        Some(self.observers.remove(index))
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Update all observers and collect their queued entries, in creation order
    pub fn process(&mut self, view: &GeometryView<'_>, time: f64) -> Vec<IntersectionRecords> {
        let mut records = Vec::new();
        for observer in &mut self.observers {
            observer.update(view, time);
            let entries = observer.take_records();
            if !entries.is_empty() {
                records.push(IntersectionRecords { observer: observer.id, root: observer.root, entries });
            }
        }
        records
    }
}
