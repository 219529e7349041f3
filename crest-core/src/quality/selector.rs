//! Selector facade: attachment lifecycle and host registration.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::SelectorConfig;
use crate::player::{MenuPlacement, PlaybackSurface, QualityMenu, RenditionRegistry};
use crate::quality::catalog::QualityChoice;
use crate::quality::controller::QualitySwitchController;

/// Crate version reported in the registration record.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Registration record returned to the host on attachment.
///
/// The host keeps this instead of stamping an ad-hoc flag onto a shared
/// player object; its presence is the proof that quality selection is
/// active on the player.
#[derive(Debug, Clone)]
pub struct SelectorRegistration {
    /// Version of the selector that attached.
    pub version: &'static str,
    /// Whether the button shows the current quality label.
    pub display_current_quality: bool,
}

/// A quality selector attached to one host player.
///
/// Thin facade over the controller: the host binds its rendition-discovery
/// event to [`Self::on_rendition_added`] and its menu clicks to
/// [`Self::set_quality`].
pub struct QualitySelector {
    controller: Arc<QualitySwitchController>,
    registration: SelectorRegistration,
}

impl QualitySelector {
    /// Attaches a selector to a host player.
    ///
    /// Returns `None` when the host exposes no rendition registry at all;
    /// quality switching is meaningless there, so the feature stays off
    /// entirely (no button, no controller). That is a normal condition for
    /// non-adaptive sources, not an error.
    pub async fn attach(
        player: Arc<dyn PlaybackSurface>,
        renditions: Option<Arc<dyn RenditionRegistry>>,
        menu: Arc<dyn QualityMenu>,
        config: SelectorConfig,
    ) -> Option<Self> {
        let Some(registry) = renditions else {
            debug!("host exposes no rendition levels, quality selector disabled");
            return None;
        };

        let placement = MenuPlacement {
            icon_class: config.icon_class.clone(),
            placement_index: config.placement_index,
        };
        if let Err(error) = menu.install(&placement).await {
            warn!(%error, "quality button installation failed");
        }
        if config.display_current_quality {
            menu.set_button_text(&QualityChoice::Auto.label()).await;
        }

        let registration = SelectorRegistration {
            version: VERSION,
            display_current_quality: config.display_current_quality,
        };
        let controller = Arc::new(QualitySwitchController::new(
            player, registry, menu, config,
        ));
        controller.refresh_catalog().await;

        debug!(version = VERSION, "quality selector attached");
        Some(Self {
            controller,
            registration,
        })
    }

    /// Returns the registration record for this attachment.
    pub fn registration(&self) -> &SelectorRegistration {
        &self.registration
    }

    /// Returns the underlying controller.
    pub fn controller(&self) -> &Arc<QualitySwitchController> {
        &self.controller
    }

    /// Host event binding: a new rendition became known.
    pub async fn on_rendition_added(&self) {
        self.controller.refresh_catalog().await;
    }

    /// Host menu binding: the user picked a catalog entry.
    pub async fn set_quality(&self, choice: QualityChoice) {
        self.controller.set_quality(choice).await;
    }

    /// Returns the current selection.
    pub fn current_quality(&self) -> QualityChoice {
        self.controller.current_quality()
    }
}
