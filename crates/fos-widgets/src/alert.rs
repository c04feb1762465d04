//! Alert
//!
//! Dismissable alert: removes `show`, waits for the fade transition and
//! detaches the element.

use std::any::Any;
use std::time::Duration;

use fos_dom::{Document, Event, EventInit, NodeId};
use tracing::{debug, trace};

use crate::ui::Task;
use crate::util::{get_element_from_selector, transition_duration_ms};
use crate::{Component, ComponentType, Ui, WidgetError};

pub const NAME: &str = "alert";
pub const DATA_KEY: &str = "bs.alert";

pub const EVENT_CLOSE: &str = "close.bs.alert";
pub const EVENT_CLOSED: &str = "closed.bs.alert";

pub const SELECTOR_DISMISS: &str = "[data-bs-dismiss=\"alert\"]";

const CLASS_NAME_ALERT: &str = "alert";
const CLASS_NAME_FADE: &str = "fade";
const CLASS_NAME_SHOW: &str = "show";

/// Extra wait after the transition before `transitionend` is emulated
const TRANSITION_END_SLACK_MS: f64 = 5.0;

/// Alert instance bound to an alert element
#[derive(Debug)]
pub struct Alert {
    element: NodeId,
    closing: bool,
}

impl Alert {
    pub fn new(ui: &mut Ui, element: NodeId) -> Result<&mut Self, WidgetError> {
        if !ui.document().tree().is_element(element) {
            return Err(WidgetError::NotAnElement(element));
        }
        ui.registry_mut().register(Self { element, closing: false })
    }

    pub fn get_or_create_instance(ui: &mut Ui, element: NodeId) -> Result<&mut Self, WidgetError> {
        if Self::get_instance(ui, element).is_none() {
            Self::new(ui, element)?;
        }
        Self::get_instance_mut(ui, element).ok_or(WidgetError::InstanceType { element, expected: NAME })
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Fading out, waiting for `transitionend`
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Close the alert bound to `element`, creating the instance if needed
    pub fn close(ui: &mut Ui, element: NodeId) -> Result<(), WidgetError> {
        Self::get_or_create_instance(ui, element)?;

        let close = ui.document_mut().trigger(element, EVENT_CLOSE, EventInit::default());
        if close.is_default_prevented() {
            debug!(%element, "alert close prevented");
            return Ok(());
        }

        let tree = ui.document_mut().tree_mut();
        tree.remove_class(element, CLASS_NAME_SHOW);
        if !tree.has_class(element, CLASS_NAME_FADE) {
            Self::destroy(ui, element);
            return Ok(());
        }

        let duration = transition_duration_ms(ui.document().tree(), element).max(0.0) + TRANSITION_END_SLACK_MS;
        if let Some(alert) = Self::get_instance_mut(ui, element) {
            alert.closing = true;
        }
        ui.schedule(Duration::from_secs_f64(duration / 1000.0), Task::EmulateTransitionEnd(element));
        debug!(%element, duration_ms = duration, "alert fading out");
        Ok(())
    }

    /// Detach the element, announce it and drop the instance
    pub(crate) fn destroy(ui: &mut Ui, element: NodeId) {
        let doc = ui.document_mut();
        doc.tree_mut().detach(element);
        doc.trigger(element, EVENT_CLOSED, EventInit::default());
        ui.dispose::<Alert>(element);
        debug!(%element, "alert closed");
    }
}

impl Component for Alert {
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
        doc.off(self.element, ".bs.alert");
        self.closing = false;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentType for Alert {
    const NAME: &'static str = NAME;
    const DATA_KEY: &'static str = DATA_KEY;
}

/// Click handler for `[data-bs-dismiss="alert"]` triggers. Returns whether
/// an alert was closed.
pub(crate) fn handle_dismiss_click(ui: &mut Ui, event: &mut Event) -> Result<bool, WidgetError> {
    if event.is_propagation_stopped() {
        return Ok(false);
    }

    let tree = ui.document().tree();
    let Some(trigger) = tree.closest(event.target, SELECTOR_DISMISS)? else {
        return Ok(false);
    };
    if matches!(tree.tag_name(trigger), Some("a" | "area")) {
        event.prevent_default();
    }

    let target = match get_element_from_selector(tree, trigger) {
        Some(target) => Some(target),
        None => tree.closest(trigger, &format!(".{CLASS_NAME_ALERT}"))?,
    };
    let Some(target) = target else {
        trace!(%trigger, "dismiss trigger has no alert");
        return Ok(false);
    };

    Alert::close(ui, target)?;
    Ok(true)
}
