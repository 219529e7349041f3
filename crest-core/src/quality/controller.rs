//! Quality-switch state machine and buffer-flush choreography.
//!
//! Flipping rendition enabled flags does not by itself make an already
//! buffered decode pipeline switch; the pipeline would keep playing what it
//! has and only apply the change to segments it fetches later. The
//! controller therefore wraps every effective switch in a pause, a buffer
//! flush (or backward seek fallback), and a delayed restore of position,
//! volume, and play state, which forces the change to be immediate.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SelectorConfig;
use crate::player::{PlaybackSurface, QualityMenu, Rendition, RenditionRegistry};
use crate::quality::catalog::{CatalogEntry, QualityChoice, build_catalog};

/// Owns current-quality state and the rendition enable/disable policy.
///
/// The controller is the single source of truth for the current selection:
/// the menu is a stateless view that gets a full catalog pushed on every
/// change. Two logical states exist, `Auto` (all renditions enabled) and a
/// fixed tier (exactly the matching renditions enabled); the initial state
/// is `Auto`.
///
/// No operation here fails outwardly. A requested tier with no matching
/// rendition still commits the state but skips the flush choreography, and
/// menu failures are logged and swallowed.
pub struct QualitySwitchController {
    player: Arc<dyn PlaybackSurface>,
    registry: Arc<dyn RenditionRegistry>,
    menu: Arc<dyn QualityMenu>,
    config: SelectorConfig,
    current: Mutex<QualityChoice>,
    catalog: Mutex<Vec<CatalogEntry>>,
    /// In-flight restore and the playback snapshot it will apply; a newer
    /// switch inherits the snapshot and supersedes the task.
    pending_restore: Mutex<Option<PendingRestore>>,
}

/// Playback state captured before a flush, to be reapplied afterwards.
#[derive(Debug, Clone, Copy)]
struct PlaybackSnapshot {
    position: f64,
    volume: f32,
    was_playing: bool,
}

struct PendingRestore {
    snapshot: PlaybackSnapshot,
    task: JoinHandle<()>,
}

impl QualitySwitchController {
    /// Creates a controller in adaptive mode with an empty catalog.
    pub fn new(
        player: Arc<dyn PlaybackSurface>,
        registry: Arc<dyn RenditionRegistry>,
        menu: Arc<dyn QualityMenu>,
        config: SelectorConfig,
    ) -> Self {
        Self {
            player,
            registry,
            menu,
            config,
            current: Mutex::new(QualityChoice::Auto),
            catalog: Mutex::new(Vec::new()),
            pending_restore: Mutex::new(None),
        }
    }

    /// Returns the current selection, `Auto` if none was ever set.
    pub fn current_quality(&self) -> QualityChoice {
        *self.current.lock()
    }

    /// Returns a copy of the last-built catalog.
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.catalog.lock().clone()
    }

    /// Applies a quality selection.
    ///
    /// Enables every rendition under `Auto`, or exactly the renditions of
    /// the requested tier otherwise, and commits the choice. The choice is
    /// committed even when no rendition matches; the requested tier is not
    /// validated against the catalog so a selection can name a tier the
    /// manifest has yet to announce. Only a switch that actually changed
    /// some rendition's eligibility triggers the buffer flush.
    pub async fn set_quality(&self, choice: QualityChoice) {
        let renditions = self.registry.renditions().await;

        let mut quality_set = false;
        for (index, rendition) in renditions.iter().enumerate() {
            let eligible = match choice {
                QualityChoice::Auto => true,
                QualityChoice::Tier(tier) => rendition.pixel_tier() == Some(tier),
            };
            self.registry.set_enabled(index, eligible).await;
            if eligible {
                quality_set = true;
            }
        }

        *self.current.lock() = choice;
        info!(quality = %choice, matched = quality_set, "quality selected");

        if self.config.display_current_quality {
            self.menu.set_button_text(&choice.label()).await;
        }
        self.menu.unpress().await;
        self.push_catalog(&renditions).await;

        if quality_set {
            self.flush_buffer_and_restore().await;
        }
    }

    /// Rebuilds the catalog from the host's current renditions.
    ///
    /// Invoked for every rendition the host discovers; the catalog is
    /// rebuilt from scratch each time rather than patched, so there is no
    /// stale dedup state to get wrong.
    pub async fn refresh_catalog(&self) {
        let renditions = self.registry.renditions().await;
        self.push_catalog(&renditions).await;
    }

    async fn push_catalog(&self, renditions: &[Rendition]) {
        let current = *self.current.lock();
        let entries = build_catalog(renditions, current);
        debug!(entries = entries.len(), "rebuilt quality catalog");

        if let Err(error) = self.menu.render(&entries).await {
            warn!(%error, "quality menu rebuild failed");
        }
        *self.catalog.lock() = entries;
    }

    /// Forces the pipeline to pick up the new rendition set immediately.
    ///
    /// Snapshots playback state, pauses, flushes the buffer (seeking
    /// slightly backward when the host cannot flush), and schedules the
    /// restore after the configured delay. The restore is a one-shot task;
    /// if a newer switch arrives while it is pending, the older restore is
    /// aborted so stale snapshots never apply out of order.
    ///
    /// When a restore is still pending, the live player state is what the
    /// earlier switch left behind (paused, possibly nudged backward), not
    /// what the user last saw. The new switch therefore inherits the
    /// pending snapshot instead of re-reading the player; otherwise rapid
    /// switches while playing would end paused forever.
    async fn flush_buffer_and_restore(&self) {
        let pending = self
            .pending_restore
            .lock()
            .take()
            .filter(|p| !p.task.is_finished());

        let snapshot = if let Some(pending) = &pending {
            pending.snapshot
        } else {
            PlaybackSnapshot {
                position: self.player.current_time().await,
                volume: self.player.volume().await,
                was_playing: !self.player.is_paused().await,
            }
        };
        if let Some(superseded) = pending {
            superseded.task.abort();
        }

        self.player.pause().await;

        if !self.player.clear_buffer().await {
            let nudged = nudged_position(snapshot.position, self.config.switch.seek_nudge);
            debug!(position = snapshot.position, nudged, "no buffer-clear capability, seeking back");
            self.player.seek(nudged).await;
        }

        let player = Arc::clone(&self.player);
        let delay = self.config.switch.restore_delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            player.seek(snapshot.position).await;
            player.set_volume(snapshot.volume).await;
            if snapshot.was_playing {
                player.play().await;
            }
        });

        *self.pending_restore.lock() = Some(PendingRestore { snapshot, task });
    }
}

/// Backward-nudged position for the seek fallback, floored at zero.
fn nudged_position(position: f64, nudge: f64) -> f64 {
    (position - nudge).max(0.0)
}
