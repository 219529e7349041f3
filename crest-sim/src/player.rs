//! Mock playback surface and rendition registry for controller testing.

use async_trait::async_trait;
use parking_lot::Mutex;

use crest_core::{PlaybackSurface, Rendition, RenditionRegistry};

/// One recorded call against the mock playback surface.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    /// Playback was paused.
    Pause,
    /// Playback was resumed.
    Play,
    /// Position was moved to the given time.
    Seek(f64),
    /// Volume was set to the given level.
    SetVolume(f32),
    /// Buffered media was discarded.
    ClearBuffer,
}

#[derive(Debug)]
struct PlayerState {
    current_time: f64,
    volume: f32,
    paused: bool,
}

/// Mock host player for quality-switch testing.
///
/// Tracks playback state under a lock and records every mutating call so
/// tests can assert on the exact choreography the controller performed.
/// Buffer-clear support is configurable to exercise both flush paths.
pub struct MockPlayer {
    state: Mutex<PlayerState>,
    calls: Mutex<Vec<PlayerCall>>,
    supports_clear_buffer: bool,
}

impl MockPlayer {
    /// Creates a playing mock player at position zero, full volume, with
    /// buffer-clear support.
    pub fn new() -> Self {
        MockPlayerBuilder::new().build()
    }

    /// Returns builder for customizing player behavior.
    pub fn builder() -> MockPlayerBuilder {
        MockPlayerBuilder::new()
    }

    /// Returns all recorded calls in order.
    pub fn calls(&self) -> Vec<PlayerCall> {
        self.calls.lock().clone()
    }

    /// Returns how many times the given call was recorded.
    pub fn call_count(&self, call: &PlayerCall) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    /// Returns how many restores (volume applications) were recorded.
    pub fn volume_set_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, PlayerCall::SetVolume(_)))
            .count()
    }

    /// Overwrites the playback position without recording a seek.
    pub fn force_time(&self, position: f64) {
        self.state.lock().current_time = position;
    }

    /// Overwrites the volume without recording a call.
    pub fn force_volume(&self, volume: f32) {
        self.state.lock().volume = volume;
    }
}

impl Default for MockPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaybackSurface for MockPlayer {
    async fn current_time(&self) -> f64 {
        self.state.lock().current_time
    }

    async fn seek(&self, position: f64) {
        self.state.lock().current_time = position;
        self.calls.lock().push(PlayerCall::Seek(position));
    }

    async fn volume(&self) -> f32 {
        self.state.lock().volume
    }

    async fn set_volume(&self, volume: f32) {
        self.state.lock().volume = volume;
        self.calls.lock().push(PlayerCall::SetVolume(volume));
    }

    async fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    async fn pause(&self) {
        self.state.lock().paused = true;
        self.calls.lock().push(PlayerCall::Pause);
    }

    async fn play(&self) {
        self.state.lock().paused = false;
        self.calls.lock().push(PlayerCall::Play);
    }

    async fn clear_buffer(&self) -> bool {
        if !self.supports_clear_buffer {
            return false;
        }
        self.calls.lock().push(PlayerCall::ClearBuffer);
        true
    }
}

/// Builder for [`MockPlayer`].
pub struct MockPlayerBuilder {
    current_time: f64,
    volume: f32,
    paused: bool,
    supports_clear_buffer: bool,
}

impl MockPlayerBuilder {
    /// Creates a builder with playing defaults and buffer-clear support.
    pub fn new() -> Self {
        Self {
            current_time: 0.0,
            volume: 1.0,
            paused: false,
            supports_clear_buffer: true,
        }
    }

    /// Sets the starting playback position.
    pub fn current_time(mut self, position: f64) -> Self {
        self.current_time = position;
        self
    }

    /// Sets the starting volume.
    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// Starts the player paused.
    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }

    /// Removes the buffer-clear capability, forcing the seek fallback.
    pub fn without_clear_buffer(mut self) -> Self {
        self.supports_clear_buffer = false;
        self
    }

    /// Builds the mock player.
    pub fn build(self) -> MockPlayer {
        MockPlayer {
            state: Mutex::new(PlayerState {
                current_time: self.current_time,
                volume: self.volume,
                paused: self.paused,
            }),
            calls: Mutex::new(Vec::new()),
            supports_clear_buffer: self.supports_clear_buffer,
        }
    }
}

impl Default for MockPlayerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock rendition registry backed by a plain vector.
///
/// Renditions can be pushed incrementally to simulate the host discovering
/// manifest variants one at a time.
pub struct MockRenditionRegistry {
    renditions: Mutex<Vec<Rendition>>,
}

impl MockRenditionRegistry {
    /// Creates a registry with the given renditions.
    pub fn new(renditions: Vec<Rendition>) -> Self {
        Self {
            renditions: Mutex::new(renditions),
        }
    }

    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Adds a newly discovered rendition.
    pub fn push(&self, rendition: Rendition) {
        self.renditions.lock().push(rendition);
    }

    /// Returns the enabled flag of every rendition, in order.
    pub fn enabled_flags(&self) -> Vec<bool> {
        self.renditions.lock().iter().map(|r| r.enabled).collect()
    }
}

#[async_trait]
impl RenditionRegistry for MockRenditionRegistry {
    async fn renditions(&self) -> Vec<Rendition> {
        self.renditions.lock().clone()
    }

    async fn set_enabled(&self, index: usize, enabled: bool) {
        if let Some(rendition) = self.renditions.lock().get_mut(index) {
            rendition.enabled = enabled;
        }
    }
}
