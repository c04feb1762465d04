//! fOS Widgets
//!
//! Interactive components bound to elements of a [`fos_dom::Document`]:
//!
//! - [`ScrollSpy`] tracks which section of a scroll container is in view
//!   and marks the matching navigation link active
//! - [`Alert`] closes dismissable alerts, fading them out first
//!
//! Components live in the [`Ui`] runtime, which owns the document, keeps
//! one instance per element and delivers intersection batches, timers and
//! data API events.

pub mod alert;
mod component;
pub mod config;
mod error;
mod registry;
pub mod scrollspy;
mod ui;
pub mod util;

pub use alert::Alert;
pub use component::{Component, ComponentType};
pub use config::{Config, ConfigValue};
pub use error::WidgetError;
pub use registry::Registry;
pub use scrollspy::{ScrollSpy, ScrollSpyConfig, SectionObserver};
pub use ui::Ui;
