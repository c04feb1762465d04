//! Component runtime
//!
//! [`Ui`] owns the document and every component instance and plays the
//! role of the browser's event loop: it routes intersection batches to the
//! component rooted at the observer's element, fires timers on a virtual
//! clock and runs the data API for clicks and page load.

use std::time::Duration;

use fos_dom::{Document, Event, EventInit, NodeId};
use tracing::{debug, trace};

use crate::alert::{self, Alert};
use crate::{scrollspy, ComponentType, Registry, WidgetError};

/// Deferred work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    /// Fire `transitionend` unless the transition already finished
    EmulateTransitionEnd(NodeId),
}

#[derive(Debug)]
struct Timer {
    due: Duration,
    task: Task,
}

/// Document, component instances and a virtual clock
#[derive(Debug)]
pub struct Ui {
    document: Document,
    registry: Registry,
    timers: Vec<Timer>,
    now: Duration,
}

impl Ui {
    pub fn new(mut document: Document) -> Self {
        fos_layout::reflow(&mut document);
        Self { document, registry: Registry::new(), timers: Vec::new(), now: Duration::ZERO }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Run `f` with the `T` instance bound to `element` and the document
    pub fn with_instance<T, R>(&mut self, element: NodeId, f: impl FnOnce(&mut T, &mut Document) -> R) -> Option<R>
    where
        T: ComponentType,
    {
        let instance = self.registry.get_mut::<T>(element)?;
        Some(f(instance, &mut self.document))
    }

    /// Unregister and dispose the `T` instance bound to `element`
    pub fn dispose<T: ComponentType>(&mut self, element: NodeId) -> bool {
        if self.registry.get::<T>(element).is_none() {
            return false;
        }
        match self.registry.unregister(element) {
            Some(mut instance) => {
                instance.dispose(&mut self.document);
                debug!(%element, component = T::NAME, "disposed instance");
                true
            }
            None => false,
        }
    }

    /// Lay out if needed, compute intersections and hand every batch to
    /// the component bound to its observer's root. Returns the number of
    /// batches a component consumed.
    pub fn run_intersection_observers(&mut self) -> usize {
        fos_layout::reflow(&mut self.document);

        let mut handled = 0;
        for batch in self.document.take_intersection_records() {
            let Some(root) = batch.root else {
                trace!(observer = %batch.observer, "batch without root element");
                continue;
            };
            let Some(component) = self.registry.lookup_mut(root) else {
                trace!(observer = %batch.observer, %root, "no component at observer root");
                continue;
            };
            if component.handle_intersections(&mut self.document, batch.observer, &batch.entries) {
                handled += 1;
            }
        }
        handled
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn schedule(&mut self, delay: Duration, task: Task) {
        self.timers.push(Timer { due: self.now + delay, task });
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward, running due timers in order.
    /// Returns the number of timers fired.
    pub fn advance(&mut self, by: Duration) -> usize {
        let until = self.now + by;
        let mut fired = 0;
        while let Some(index) = self.next_due(until) {
            let timer = self.timers.remove(index);
            self.set_now(timer.due);
            self.run_task(timer.task);
            fired += 1;
        }
        self.set_now(until);
        fired
    }

    /// Earliest timer due by `until`; scheduling order breaks ties
    fn next_due(&self, until: Duration) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|&(i, timer)| (timer.due, i))
            .map(|(i, _)| i)
    }

    fn set_now(&mut self, now: Duration) {
        self.now = now;
        self.document.set_time(now.as_nanos() as f64 / 1_000_000.0);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::EmulateTransitionEnd(element) => {
                if Alert::get_instance(self, element).is_some_and(Alert::is_closing) {
                    self.transition_end(element);
                } else {
                    trace!(%element, "transition already finished");
                }
            }
        }
    }

    /// Window `load`: creates a ScrollSpy for every `[data-bs-spy="scroll"]`
    /// element. Returns how many were created.
    pub fn load(&mut self) -> Result<usize, WidgetError> {
        self.document.trigger(
            NodeId::ROOT,
            "load",
            EventInit { bubbles: false, cancelable: false, related_target: None },
        );
        scrollspy::init_data_api(self)
    }

    /// Click `node` and run the alert dismiss data API
    pub fn click(&mut self, node: NodeId) -> Result<Event, WidgetError> {
        let mut event = self.document.trigger(node, "click", EventInit::default());
        alert::handle_dismiss_click(self, &mut event)?;
        Ok(event)
    }

    /// Dispatch `transitionend` at `node`; finishes a closing alert at
    /// `node` or around it. Returns whether one was finished.
    pub fn transition_end(&mut self, node: NodeId) -> bool {
        self.document.trigger(node, "transitionend", EventInit { cancelable: false, ..EventInit::default() });

        let closing = std::iter::once(node)
            .chain(self.document.tree().ancestors(node))
            .find(|&n| self.registry.get::<Alert>(n).is_some_and(Alert::is_closing));
        match closing {
            Some(element) => {
                Alert::destroy(self, element);
                true
            }
            None => false,
        }
    }

    /// Scroll an element and deliver the resulting intersection batches
    pub fn scroll_to(&mut self, node: NodeId, top: f64) -> usize {
        fos_layout::reflow(&mut self.document);
        self.document.scroll_to(node, top);
        self.run_intersection_observers()
    }

    /// Scroll `node` into view and deliver the resulting intersection batches
    pub fn scroll_into_view(&mut self, node: NodeId) -> usize {
        fos_layout::reflow(&mut self.document);
        self.document.scroll_into_view(node);
        self.run_intersection_observers()
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timers_fire_in_due_order() {
        let mut ui = Ui::new(Document::new());
        ui.schedule(Duration::from_millis(30), Task::EmulateTransitionEnd(NodeId::ROOT));
        ui.schedule(Duration::from_millis(10), Task::EmulateTransitionEnd(NodeId::ROOT));

        assert_eq!(ui.advance(Duration::from_millis(20)), 1);
        assert_eq!(ui.pending_timers(), 1);
        assert_eq!(ui.document().time(), 20.0);

        assert_eq!(ui.advance(Duration::from_millis(20)), 1);
        assert_eq!(ui.now(), Duration::from_millis(40));
    }

    #[test]
    fn test_dispose_unknown_instance() {
        let mut ui = Ui::new(Document::new());
        let body = ui.document().body().unwrap();

        assert!(!ui.dispose::<Alert>(body));
        assert!(ui.with_instance::<Alert, _>(body, |_, _| ()).is_none());
    }
}
