//! DOM Events
//!
//! Listener registry and bubbling dispatch.
//!
//! Listeners are registered under names of the form `type.namespace`. For
//! native event types (`click`, `load`, `transitionend`, ...) everything
//! after the first dot is a namespace used only for removal, so
//! `click.bs.alert.data-api` listens for `click`. Any other name is an
//! opaque custom type matched exactly, e.g. `activate.bs.scrollspy`.

use std::fmt;

use crate::{DomError, DomTree, NodeId, SelectorList};

/// Event types treated as native when splitting listener names
const NATIVE_EVENTS: &[&str] = &[
    "click", "dblclick", "mouseup", "mousedown", "contextmenu", "mousewheel", "mouseover",
    "mouseout", "mousemove", "selectstart", "selectend", "keydown", "keypress", "keyup",
    "orientationchange", "touchstart", "touchmove", "touchend", "touchcancel", "pointerdown",
    "pointermove", "pointerup", "pointerleave", "pointercancel", "gesturestart", "gesturechange",
    "gestureend", "focus", "blur", "change", "reset", "select", "submit", "focusin", "focusout",
    "load", "unload", "beforeunload", "resize", "move", "DOMContentLoaded", "readystatechange",
    "error", "abort", "scroll", "transitionend",
];

/// Split a listener name into its event type and namespace
fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.split_once('.') {
        Some((ty, ns)) if NATIVE_EVENTS.contains(&ty) => (ty, Some(ns)),
        _ => (name, None),
    }
}

/// Dispatch options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
    pub related_target: Option<NodeId>,
}

impl Default for EventInit {
    fn default() -> Self {
        Self { bubbles: true, cancelable: true, related_target: None }
    }
}

/// Event being dispatched
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub target: NodeId,
    /// Node whose listener is running
    pub current_target: NodeId,
    /// Element matched by a delegated listener's selector
    pub delegate_target: Option<NodeId>,
    pub related_target: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(event_type: &str, target: NodeId, init: EventInit) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            delegate_target: None,
            related_target: init.related_target,
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&mut Event)>;

struct Listener {
    id: ListenerId,
    node: NodeId,
    event_type: String,
    namespace: Option<String>,
    delegate: Option<SelectorList>,
    once: bool,
    callback: Callback,
}

impl Listener {
    fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace.as_deref().is_some_and(|ns| {
            ns == namespace
                || ns.strip_prefix(namespace).is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

/// Event listener registry
#[derive(Default)]
pub struct EventHandler {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(
        &mut self,
        node: NodeId,
        name: &str,
        delegate: Option<SelectorList>,
        once: bool,
        callback: Callback,
    ) -> ListenerId {
        let (event_type, namespace) = split_name(name);
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            node,
            event_type: event_type.to_string(),
            namespace: namespace.map(str::to_string),
            delegate,
            once,
            callback,
        });
        id
    }

    /// Add a listener
    pub fn on<F>(&mut self, node: NodeId, name: &str, callback: F) -> ListenerId
    where
        F: FnMut(&mut Event) + 'static,
    {
        self.add(node, name, None, false, Box::new(callback))
    }

    /// Add a listener that fires for descendants of `node` matching `selector`
    pub fn on_delegate<F>(
        &mut self,
        node: NodeId,
        name: &str,
        selector: &str,
        callback: F,
    ) -> Result<ListenerId, DomError>
    where
        F: FnMut(&mut Event) + 'static,
    {
        let delegate = SelectorList::parse(selector)?;
        Ok(self.add(node, name, Some(delegate), false, Box::new(callback)))
    }

    /// Add a listener removed after its first call
    pub fn one<F>(&mut self, node: NodeId, name: &str, callback: F) -> ListenerId
    where
        F: FnMut(&mut Event) + 'static,
    {
        self.add(node, name, None, true, Box::new(callback))
    }

    /// Remove listeners on `node` by `type`, `type.namespace` or `.namespace`.
    /// Returns the number removed.
    pub fn off(&mut self, node: NodeId, name: &str) -> usize {
        let before = self.listeners.len();
        if let Some(namespace) = name.strip_prefix('.') {
            self.listeners.retain(|l| !(l.node == node && l.in_namespace(namespace)));
        } else {
            let (event_type, namespace) = split_name(name);
            self.listeners.retain(|l| {
                !(l.node == node
                    && l.event_type == event_type
                    && namespace.is_none_or(|ns| l.in_namespace(ns)))
            });
        }
        before - self.listeners.len()
    }

    /// Remove a single listener
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        before != self.listeners.len()
    }

    /// Listeners registered on `node`
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.iter().filter(|l| l.node == node).count()
    }

    /// Dispatch `event` along its propagation path
    pub fn dispatch(&mut self, tree: &DomTree, mut event: Event) -> Event {
        let target = event.target;
        let path: Vec<NodeId> = if event.bubbles {
            std::iter::once(target).chain(tree.ancestors(target)).collect()
        } else {
            vec![target]
        };

        for node in path {
            let ids: Vec<ListenerId> = self
                .listeners
                .iter()
                .filter(|l| l.node == node && l.event_type == event.event_type)
                .map(|l| l.id)
                .collect();

            for id in ids {
                let Some(index) = self.listeners.iter().position(|l| l.id == id) else {
                    continue;
                };
                let delegate_target = match &self.listeners[index].delegate {
                    Some(selector) => match delegate_target(tree, selector, target, node) {
                        Some(matched) => Some(matched),
                        None => continue,
                    },
                    None => None,
                };
                event.current_target = node;
                event.delegate_target = delegate_target;
                (self.listeners[index].callback)(&mut event);
                if self.listeners[index].once {
                    self.listeners.remove(index);
                }
            }

            if event.propagation_stopped {
                break;
            }
        }

        event.current_target = target;
        event.delegate_target = None;
        event
    }
}

/// Nearest element from `target` up to (not including) `listener_node`
/// that matches the delegate selector
fn delegate_target(
    tree: &DomTree,
    selector: &SelectorList,
    target: NodeId,
    listener_node: NodeId,
) -> Option<NodeId> {
    std::iter::once(target)
        .chain(tree.ancestors(target))
        .take_while(|&n| n != listener_node)
        .find(|&n| selector.matches(tree, n))
}
