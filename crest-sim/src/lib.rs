//! Crest Simulation - Mock host players for quality-selection testing.
//!
//! This crate provides deterministic stand-ins for the host player
//! framework: a playback surface with recordable calls, a rendition
//! registry that can grow incrementally like a parsing manifest, and a
//! menu affordance that captures whatever the controller pushes at it.
//! The integration suite under `tests/` drives the real controller
//! against these mocks.

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]

pub mod menu;
pub mod player;

pub use menu::MockMenu;
pub use player::{MockPlayer, MockPlayerBuilder, MockRenditionRegistry, PlayerCall};
