//! Instance registry
//!
//! Maps elements to the component bound to them. An element carries at
//! most one instance, whatever its type.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use fos_dom::NodeId;

use crate::{Component, ComponentType, WidgetError};

/// Element → component instance
#[derive(Debug, Default)]
pub struct Registry {
    instances: HashMap<NodeId, Box<dyn Component>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when `element` already has an instance
    pub fn ensure_vacant(&self, element: NodeId) -> Result<(), WidgetError> {
        match self.instances.get(&element) {
            Some(existing) => Err(WidgetError::AlreadyInitialized {
                element,
                existing: existing.name(),
            }),
            None => Ok(()),
        }
    }

    /// Bind an instance to its element
    pub fn register<T: ComponentType>(&mut self, instance: T) -> Result<&mut T, WidgetError> {
        let element = instance.element();
        match self.instances.entry(element) {
            Entry::Occupied(occupied) => Err(WidgetError::AlreadyInitialized {
                element,
                existing: occupied.get().name(),
            }),
            Entry::Vacant(vacant) => vacant
                .insert(Box::new(instance))
                .as_any_mut()
                .downcast_mut::<T>()
                .ok_or(WidgetError::InstanceType { element, expected: T::NAME }),
        }
    }

    pub fn lookup(&self, element: NodeId) -> Option<&dyn Component> {
        self.instances.get(&element).map(|c| &**c)
    }

    pub fn lookup_mut(&mut self, element: NodeId) -> Option<&mut dyn Component> {
        match self.instances.get_mut(&element) {
            Some(c) => Some(&mut **c),
            None => None,
        }
    }

    /// Typed lookup
    pub fn get<T: ComponentType>(&self, element: NodeId) -> Option<&T> {
        self.lookup(element)?.as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: ComponentType>(&mut self, element: NodeId) -> Option<&mut T> {
        self.lookup_mut(element)?.as_any_mut().downcast_mut::<T>()
    }

    /// Remove the binding, handing the instance back for disposal
    pub fn unregister(&mut self, element: NodeId) -> Option<Box<dyn Component>> {
        self.instances.remove(&element)
    }

    pub fn contains(&self, element: NodeId) -> bool {
        self.instances.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
