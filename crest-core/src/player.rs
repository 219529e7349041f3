//! Host-player abstractions for quality selection.
//!
//! This module defines the traits that separate the quality-switch logic
//! from the player framework hosting it. The controller never touches the
//! host's DOM, decode pipeline, or manifest handling directly; it only
//! talks to these seams. Implementations live in the host integration (or
//! in crest-sim for tests).

use async_trait::async_trait;
use thiserror::Error;

use crate::quality::CatalogEntry;

/// One fixed-quality encoded variant of the stream.
///
/// Renditions are owned by the host streaming engine; the controller only
/// reads their dimensions and flips the enabled flag through
/// [`RenditionRegistry::set_enabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendition {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Whether the host's adaptive engine may pick this rendition.
    pub enabled: bool,
}

impl Rendition {
    /// Creates an enabled rendition with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            enabled: true,
        }
    }

    /// Returns the pixel tier used for deduplication and selection.
    ///
    /// The tier is the shorter of the two dimensions, so a 1280x720 and an
    /// anamorphic 960x720 variant land in the same 720p bucket. Returns
    /// `None` for degenerate renditions where either dimension is zero.
    pub fn pixel_tier(&self) -> Option<u32> {
        match self.width.min(self.height) {
            0 => None,
            tier => Some(tier),
        }
    }
}

/// Playback control surface exposed by the host player.
///
/// Time positions are in seconds, volume is in `0.0..=1.0`. All methods
/// mutate or read live playback state, so implementations are expected to
/// be cheap and non-blocking.
#[async_trait]
pub trait PlaybackSurface: Send + Sync {
    /// Returns the current playback position.
    async fn current_time(&self) -> f64;

    /// Moves the playback position.
    async fn seek(&self, position: f64);

    /// Returns the current volume.
    async fn volume(&self) -> f32;

    /// Sets the volume.
    async fn set_volume(&self, volume: f32);

    /// Returns whether playback is currently paused.
    async fn is_paused(&self) -> bool;

    /// Pauses playback.
    async fn pause(&self);

    /// Resumes playback.
    async fn play(&self);

    /// Discards buffered media from the active decode pipeline.
    ///
    /// Returns `false` when the host pipeline has no such capability.
    /// That is a normal, expected condition: the controller falls back to
    /// a small backward seek to force the pipeline to re-fetch.
    async fn clear_buffer(&self) -> bool;
}

/// Access to the host's known renditions.
///
/// The registry is the mutable mapping the streaming engine keeps between
/// manifest variants and their enabled flags. Indices are positions in the
/// host's own collection and stay stable between [`Self::renditions`] and
/// the [`Self::set_enabled`] calls made from the same event turn.
#[async_trait]
pub trait RenditionRegistry: Send + Sync {
    /// Returns a snapshot of all currently known renditions.
    async fn renditions(&self) -> Vec<Rendition>;

    /// Enables or disables the rendition at `index`.
    ///
    /// Out-of-range indices are ignored by implementations.
    async fn set_enabled(&self, index: usize, enabled: bool);
}

/// Placement hints for installing the quality button into the host UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuPlacement {
    /// Icon class for the button; `None` uses the host's stock icon.
    pub icon_class: Option<String>,
    /// Control-bar position; `None` lets the host pick (typically next to
    /// the fullscreen toggle).
    pub placement_index: Option<usize>,
}

/// The selectable quality menu exposed by the host UI.
///
/// Menu items are stateless views: the controller pushes a full catalog on
/// every change and the selected flag travels inside the entries. Items
/// never mutate each other or reach back into the controller.
#[async_trait]
pub trait QualityMenu: Send + Sync {
    /// Installs the menu button into the host control bar.
    ///
    /// # Errors
    ///
    /// - `MenuError::RenderFailed` - The host UI rejected the button
    /// - `MenuError::Detached` - The menu is no longer attached to a player
    async fn install(&self, placement: &MenuPlacement) -> Result<(), MenuError>;

    /// Replaces the menu's item list with the given catalog.
    ///
    /// # Errors
    ///
    /// - `MenuError::RenderFailed` - The host UI could not rebuild the list
    /// - `MenuError::Detached` - The menu is no longer attached to a player
    async fn render(&self, entries: &[CatalogEntry]) -> Result<(), MenuError>;

    /// Clears the button's pressed affordance.
    async fn unpress(&self);

    /// Replaces the button's inner text.
    async fn set_button_text(&self, text: &str);
}

/// Errors that can occur in the host's menu affordance.
///
/// The controller logs these and carries on; a broken menu never blocks a
/// quality switch (see the controller's failure semantics).
#[derive(Debug, Error)]
pub enum MenuError {
    /// The host UI failed to build or rebuild the menu.
    #[error("menu rebuild failed: {reason}")]
    RenderFailed {
        /// Host-provided failure description.
        reason: String,
    },

    /// The menu outlived the player it was attached to.
    #[error("menu is detached from the player")]
    Detached,
}
