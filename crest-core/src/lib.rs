//! Crest Core - Quality selection for HLS playback
//!
//! This crate provides the building blocks for letting a viewer pin a
//! fixed rendition (by pixel tier) or restore adaptive selection: host
//! player abstractions, rendition catalog construction, and the
//! quality-switch controller that coordinates a buffer flush with playback
//! state preservation so the switch takes effect immediately.

pub mod config;
pub mod player;
pub mod quality;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{SelectorConfig, SwitchTuning};
pub use player::{
    MenuError, MenuPlacement, PlaybackSurface, QualityMenu, Rendition, RenditionRegistry,
};
pub use quality::{
    CatalogEntry, QualityChoice, QualitySelector, QualitySwitchController, SelectorRegistration,
    build_catalog,
};
