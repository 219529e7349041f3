//! Mock quality menu recording what the controller pushes at it.

use async_trait::async_trait;
use parking_lot::Mutex;

use crest_core::{CatalogEntry, MenuError, MenuPlacement, QualityMenu};

/// Mock menu affordance.
///
/// Records every rendered catalog, unpress, button text, and installation
/// placement. Can be built failing to exercise the controller's
/// swallow-and-log path.
pub struct MockMenu {
    rendered: Mutex<Vec<Vec<CatalogEntry>>>,
    placements: Mutex<Vec<MenuPlacement>>,
    button_text: Mutex<Option<String>>,
    unpress_count: Mutex<usize>,
    fail_render: bool,
}

impl MockMenu {
    /// Creates a menu that accepts everything.
    pub fn new() -> Self {
        Self {
            rendered: Mutex::new(Vec::new()),
            placements: Mutex::new(Vec::new()),
            button_text: Mutex::new(None),
            unpress_count: Mutex::new(0),
            fail_render: false,
        }
    }

    /// Creates a menu whose install and render calls always fail.
    pub fn failing() -> Self {
        Self {
            fail_render: true,
            ..Self::new()
        }
    }

    /// Returns every catalog rendered so far, oldest first.
    pub fn rendered(&self) -> Vec<Vec<CatalogEntry>> {
        self.rendered.lock().clone()
    }

    /// Returns the most recently rendered catalog, if any.
    pub fn last_rendered(&self) -> Option<Vec<CatalogEntry>> {
        self.rendered.lock().last().cloned()
    }

    /// Returns the recorded installation placements.
    pub fn placements(&self) -> Vec<MenuPlacement> {
        self.placements.lock().clone()
    }

    /// Returns the current button text, if any was set.
    pub fn button_text(&self) -> Option<String> {
        self.button_text.lock().clone()
    }

    /// Returns how many times the button was unpressed.
    pub fn unpress_count(&self) -> usize {
        *self.unpress_count.lock()
    }
}

impl Default for MockMenu {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QualityMenu for MockMenu {
    async fn install(&self, placement: &MenuPlacement) -> Result<(), MenuError> {
        if self.fail_render {
            return Err(MenuError::RenderFailed {
                reason: "mock menu configured to fail".to_string(),
            });
        }
        self.placements.lock().push(placement.clone());
        Ok(())
    }

    async fn render(&self, entries: &[CatalogEntry]) -> Result<(), MenuError> {
        if self.fail_render {
            return Err(MenuError::RenderFailed {
                reason: "mock menu configured to fail".to_string(),
            });
        }
        self.rendered.lock().push(entries.to_vec());
        Ok(())
    }

    async fn unpress(&self) {
        *self.unpress_count.lock() += 1;
    }

    async fn set_button_text(&self, text: &str) {
        *self.button_text.lock() = Some(text.to_string());
    }
}
