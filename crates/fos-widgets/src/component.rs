//! Component contract
//!
//! Every widget instance is bound to exactly one element and lives in the
//! [`Registry`](crate::Registry) owned by the [`Ui`] runtime.

use std::any::Any;
use std::fmt;

use fos_dom::{Document, IntersectionObserverEntry, NodeId, ObserverId};

use crate::Ui;

/// Object-safe lifecycle shared by all components
pub trait Component: fmt::Debug + Any {
    /// Element the instance is bound to
    fn element(&self) -> NodeId;

    fn name(&self) -> &'static str;

    fn data_key(&self) -> &'static str;

    /// Release observers and references. Called once, after the instance
    /// has left the registry.
    fn dispose(&mut self, doc: &mut Document);

    /// Receive a batch of intersection entries from an observer rooted at
    /// [`Component::element`]. Returns whether the batch was consumed.
    fn handle_intersections(
        &mut self,
        _doc: &mut Document,
        _observer: ObserverId,
        _entries: &[IntersectionObserverEntry],
    ) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Statically known component types
pub trait ComponentType: Component + Sized {
    const NAME: &'static str;
    const DATA_KEY: &'static str;

    /// Instance bound to `element`, if it is of this type
    fn get_instance(ui: &Ui, element: NodeId) -> Option<&Self> {
        ui.registry().get::<Self>(element)
    }

    fn get_instance_mut(ui: &mut Ui, element: NodeId) -> Option<&mut Self> {
        ui.registry_mut().get_mut::<Self>(element)
    }
}
