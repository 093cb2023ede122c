//! # Player Configuration
//!
//! [`PlayerSettings`] holds the tunable behaviour of a controller (audio,
//! scaling, end-of-media policy, buffering threshold, notification mode,
//! lifecycle policy). [`PlayerConfig`] bundles those settings with the host
//! bridges a controller needs.

use bridge_traits::dispatch::MainThreadExecutor;
use bridge_traits::engine::{MediaEngine, VideoSurface};
use bridge_traits::playback::FillMode;
use core_runtime::events::EventBus;
use core_runtime::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Tunable controller behaviour.
///
/// Every field can also be changed at runtime through the matching
/// `PlaybackController` setter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// Default: false.
    #[serde(default)]
    pub muted: bool,

    /// Linear volume, `0.0..=1.0`.
    ///
    /// Default: 1.0.
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// How video is scaled into the surface.
    ///
    /// Default: aspect fit.
    #[serde(default)]
    pub fill_mode: FillMode,

    /// Restart from the beginning when the end of the media is reached.
    ///
    /// Default: false.
    #[serde(default)]
    pub looping: bool,

    /// Stay on the last frame at the end of the media instead of rewinding.
    /// Ignored while `looping` is set.
    ///
    /// Default: false.
    #[serde(default)]
    pub freeze_at_end: bool,

    /// Buffered lookahead (seconds ahead of the playhead) that counts as
    /// "ready" when loaded time ranges change.
    ///
    /// Default: 10 seconds.
    #[serde(default = "default_buffer_threshold_secs")]
    pub buffer_threshold_secs: f64,

    /// Only notify the delegate about playback state writes that change the
    /// value.
    ///
    /// Default: true.
    #[serde(default = "default_true")]
    pub playback_edge_triggered: bool,

    /// Only notify the delegate about buffering state writes that change the
    /// value.
    ///
    /// Default: true.
    #[serde(default = "default_true")]
    pub buffering_edge_triggered: bool,

    /// Default: true.
    #[serde(default = "default_true")]
    pub pauses_when_backgrounded: bool,

    /// Default: true.
    #[serde(default = "default_true")]
    pub resumes_on_foreground: bool,

    /// Interval of the periodic time observer, in milliseconds.
    ///
    /// Default: 10 ms.
    #[serde(default = "default_time_tick_interval_ms")]
    pub time_tick_interval_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            muted: false,
            volume: default_volume(),
            fill_mode: FillMode::default(),
            looping: false,
            freeze_at_end: false,
            buffer_threshold_secs: default_buffer_threshold_secs(),
            playback_edge_triggered: true,
            buffering_edge_triggered: true,
            pauses_when_backgrounded: true,
            resumes_on_foreground: true,
            time_tick_interval_ms: default_time_tick_interval_ms(),
        }
    }
}

impl PlayerSettings {
    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid player settings JSON: {}", e)))?;
        settings.validate().map_err(Error::Config)?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(format!("volume must be between 0.0 and 1.0, got {}", self.volume));
        }

        if !self.buffer_threshold_secs.is_finite() || self.buffer_threshold_secs < 0.0 {
            return Err("buffer_threshold_secs must be a non-negative number".to_string());
        }

        if self.time_tick_interval_ms == 0 {
            return Err("time_tick_interval_ms must be > 0".to_string());
        }

        Ok(())
    }

    pub fn buffer_threshold(&self) -> Duration {
        Duration::from_secs_f64(self.buffer_threshold_secs)
    }

    pub fn time_tick_interval(&self) -> Duration {
        Duration::from_millis(self.time_tick_interval_ms)
    }

    /// Set both edge-triggered flags at once.
    pub fn with_edge_triggered(mut self, edge_triggered: bool) -> Self {
        self.playback_edge_triggered = edge_triggered;
        self.buffering_edge_triggered = edge_triggered;
        self
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_volume() -> f32 {
    1.0
}

fn default_buffer_threshold_secs() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}

fn default_time_tick_interval_ms() -> u64 {
    10
}

// ============================================================================
// Player Configuration
// ============================================================================

/// Host bridges and settings for one `PlaybackController`.
#[derive(Clone)]
pub struct PlayerConfig {
    pub engine: Arc<dyn MediaEngine>,
    pub surface: Arc<dyn VideoSurface>,
    /// Executor bound to the thread that owns the controller.
    pub executor: Arc<dyn MainThreadExecutor>,
    /// Optional fan-out of every delegate notification.
    pub event_bus: Option<EventBus>,
    pub settings: PlayerSettings,
}

impl PlayerConfig {
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }
}

impl std::fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("engine", &"MediaEngine { ... }")
            .field("surface", &"VideoSurface { ... }")
            .field("executor", &"MainThreadExecutor { ... }")
            .field("event_bus", &self.event_bus)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for [`PlayerConfig`].
#[derive(Default)]
pub struct PlayerConfigBuilder {
    engine: Option<Arc<dyn MediaEngine>>,
    surface: Option<Arc<dyn VideoSurface>>,
    executor: Option<Arc<dyn MainThreadExecutor>>,
    event_bus: Option<EventBus>,
    settings: Option<PlayerSettings>,
}

impl PlayerConfigBuilder {
    /// Sets the native player. Required.
    pub fn engine(mut self, engine: Arc<dyn MediaEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Sets the view layer the engine renders into. Required.
    pub fn surface(mut self, surface: Arc<dyn VideoSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Sets the designated-thread executor. Required.
    ///
    /// Desktop hosts can use `bridge_desktop::QueueExecutor`.
    pub fn executor(mut self, executor: Arc<dyn MainThreadExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Mirror every notification onto `bus`.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Default: [`PlayerSettings::default`].
    pub fn settings(mut self, settings: PlayerSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn build(self) -> Result<PlayerConfig> {
        let engine = self.engine.ok_or_else(|| {
            capability_missing(
                "MediaEngine",
                "A MediaEngine is required to play media. \
                 Inject the platform player (AVPlayer, ExoPlayer, a GStreamer pipeline).",
            )
        })?;

        let surface = self.surface.ok_or_else(|| {
            capability_missing(
                "VideoSurface",
                "A VideoSurface is required to display video. \
                 Inject the host view layer the engine renders into.",
            )
        })?;

        let executor = self.executor.ok_or_else(|| {
            capability_missing(
                "MainThreadExecutor",
                "A MainThreadExecutor is required to marshal engine callbacks. \
                 Desktop: use bridge_desktop::QueueExecutor. \
                 Mobile: wrap the main dispatch queue / main Looper.",
            )
        })?;

        let settings = self.settings.unwrap_or_default();
        settings.validate().map_err(Error::Config)?;

        Ok(PlayerConfig {
            engine,
            surface,
            executor,
            event_bus: self.event_bus,
            settings,
        })
    }
}

fn capability_missing(capability: &str, message: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: message.to_string(),
    }
}
