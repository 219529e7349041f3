//! Centralized configuration for the quality selector.
//!
//! All tunable parameters are defined here to avoid hard-coded values
//! scattered throughout the codebase.

use std::time::Duration;

/// Configuration for a quality selector instance.
///
/// Groups presentation options with the switch-timing tunables. Supports
/// environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct SelectorConfig {
    /// Show the current quality label on the menu button instead of an icon.
    pub display_current_quality: bool,
    /// Icon class for the menu button; `None` uses the host's stock icon.
    pub icon_class: Option<String>,
    /// Control-bar position for the button; `None` lets the host pick.
    pub placement_index: Option<usize>,
    /// Buffer-flush choreography tuning.
    pub switch: SwitchTuning,
}

/// Timing parameters for the quality-switch choreography.
///
/// Both values are empirical, not invariants: the delay gives the decode
/// pipeline time to react to the new enabled flags before playback state is
/// restored, and the nudge is the backward seek used when the pipeline has
/// no buffer-clear capability.
#[derive(Debug, Clone)]
pub struct SwitchTuning {
    /// Delay before restoring position, volume, and play state.
    pub restore_delay: Duration,
    /// Backward seek distance in seconds for the buffer-flush fallback.
    pub seek_nudge: f64,
}

impl Default for SwitchTuning {
    fn default() -> Self {
        Self {
            restore_delay: Duration::from_millis(50),
            seek_nudge: 0.1, // 100 ms of media
        }
    }
}

impl SwitchTuning {
    /// Creates tuning with a near-zero restore delay for fast tests.
    pub fn for_testing() -> Self {
        Self {
            restore_delay: Duration::from_millis(5),
            ..Default::default()
        }
    }
}

impl SelectorConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime tuning without recompiling the host integration
    /// while maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(display) = std::env::var("CREST_DISPLAY_CURRENT_QUALITY") {
            config.display_current_quality = display.parse().unwrap_or(false);
        }

        if let Ok(delay) = std::env::var("CREST_RESTORE_DELAY_MS") {
            if let Ok(millis) = delay.parse::<u64>() {
                config.switch.restore_delay = Duration::from_millis(millis);
            }
        }

        if let Ok(nudge) = std::env::var("CREST_SEEK_NUDGE") {
            if let Ok(seconds) = nudge.parse::<f64>() {
                if seconds >= 0.0 {
                    config.switch.seek_nudge = seconds;
                }
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    pub fn for_testing() -> Self {
        Self {
            switch: SwitchTuning::for_testing(),
            ..Default::default()
        }
    }
}
