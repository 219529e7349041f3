//! Quality selection: catalog construction, switch controller, and the
//! selector facade the host attaches to a player.

pub mod catalog;
pub mod controller;
pub mod selector;

pub use catalog::{CatalogEntry, QualityChoice, build_catalog};
pub use controller::QualitySwitchController;
pub use selector::{QualitySelector, SelectorRegistration, VERSION};
