//! Media engine bridge traits.
//!
//! The host platform owns the actual video engine (decoding, rendering,
//! network streaming, buffering heuristics). The core only needs a narrow
//! capability surface:
//!
//! - [`MediaEngine`]: the player object. Owns the current item, play/pause,
//!   volume, periodic time ticks and the end-of-item action.
//! - [`MediaAsset`]: a resolved media source with asynchronous key loading,
//!   playability, natural size and frame snapshots.
//! - [`PlayerItem`]: the playable instance of an asset. Reports current time
//!   and duration, seeks, and emits status/buffer/end notifications.
//! - [`VideoSurface`]: the host view layer the engine renders into.
//!
//! ## Observation
//!
//! Each observable object exposes a typed `observe`-style method that takes a
//! callback and returns a [`Subscription`]. Callbacks may fire on any thread;
//! the core marshals them onto its designated thread before touching state.
//!
//! ## Re-entrancy
//!
//! Query methods (`current_time`, `duration`, `is_playable`, ...) must not call
//! back into observers synchronously. Commands (`play`, `seek`, ...) may.

use crate::error::Result;
use crate::playback::{FillMode, MediaSource, SeekTolerance, TimeRange, VideoFrame, VideoSize};
use crate::subscription::Subscription;
use std::sync::Arc;
use std::time::Duration;

/// Callback for item-level notifications.
pub type ItemObserver = Arc<dyn Fn(ItemEvent) + Send + Sync>;

/// Callback for periodic playback time ticks; receives the current media time.
pub type TimeObserver = Arc<dyn Fn(Duration) + Send + Sync>;

/// Callback for surface notifications.
pub type SurfaceObserver = Arc<dyn Fn(SurfaceEvent) + Send + Sync>;

/// Completion of a seek. `true` when the seek finished, `false` when it was
/// interrupted by another seek.
pub type SeekCompletion = Box<dyn FnOnce(bool) + Send>;

/// Completion of asynchronous asset key loading.
pub type AssetLoadCompletion = Box<dyn FnOnce() + Send>;

/// Asset properties the core resolves before building an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Tracks,
    Playable,
    Duration,
}

impl AssetKey {
    /// Keys that must resolve before a source is considered valid.
    pub const REQUIRED: [AssetKey; 3] = [AssetKey::Tracks, AssetKey::Playable, AssetKey::Duration];
}

/// Resolution status of an [`AssetKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKeyStatus {
    Unknown,
    Loading,
    Loaded,
    Failed { message: String },
    Cancelled,
}

impl AssetKeyStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, AssetKeyStatus::Failed { .. })
    }
}

/// Readiness of a [`PlayerItem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    Unknown,
    ReadyToPlay,
    Failed { message: String },
}

/// Notifications emitted by a [`PlayerItem`].
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEvent {
    /// Item status changed.
    StatusChanged(ItemStatus),
    /// The "playback likely to keep up" flag changed to the carried value.
    PlaybackLikelyToKeepUp(bool),
    /// The "playback buffer empty" flag changed to the carried value.
    PlaybackBufferEmpty(bool),
    /// The loaded time ranges changed.
    LoadedTimeRangesChanged(Vec<TimeRange>),
    /// Playback reached the end of the item.
    DidPlayToEnd,
    /// Playback failed before reaching the end of the item.
    FailedToPlayToEnd { message: String },
}

/// Notifications emitted by a [`VideoSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The "ready for display" flag changed to the carried value.
    ReadyForDisplay(bool),
}

/// What the engine does by itself when the current item ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionAtItemEnd {
    /// Keep the rate; used when the core loops playback itself.
    None,
    /// Pause at the end.
    Pause,
}

/// The host's media player object.
pub trait MediaEngine: Send + Sync {
    /// Create an asset handle for a source. Must not block on I/O; resolution
    /// happens in [`MediaAsset::load_values_async`].
    fn open_asset(&self, source: &MediaSource) -> Result<Arc<dyn MediaAsset>>;

    /// Create a playable item for a resolved asset.
    fn create_item(&self, asset: Arc<dyn MediaAsset>) -> Result<Arc<dyn PlayerItem>>;

    /// Replace the item the engine is playing. `None` clears it.
    fn replace_current_item(&self, item: Option<Arc<dyn PlayerItem>>);

    /// Begin or resume playback of the current item.
    fn play(&self);

    /// Pause playback of the current item.
    fn pause(&self);

    /// Configure the engine's own end-of-item behaviour.
    fn set_action_at_item_end(&self, action: ActionAtItemEnd);

    fn is_muted(&self) -> bool;

    fn set_muted(&self, muted: bool);

    /// Linear volume in `0.0..=1.0`.
    fn volume(&self) -> f32;

    fn set_volume(&self, volume: f32);

    /// Register a periodic time observer firing roughly every `interval`.
    fn add_periodic_time_observer(&self, interval: Duration, observer: TimeObserver)
        -> Subscription;
}

/// A media source resolved by the engine.
pub trait MediaAsset: Send + Sync {
    /// Start resolving `keys`. `completion` fires once, on any thread, after
    /// every key has reached a final status.
    fn load_values_async(&self, keys: &[AssetKey], completion: AssetLoadCompletion);

    /// Status of a key after (or during) loading.
    fn status_of_value(&self, key: AssetKey) -> AssetKeyStatus;

    /// Whether the engine can play the asset at all.
    fn is_playable(&self) -> bool;

    /// Intrinsic size of the first video track, when known.
    fn natural_size(&self) -> Option<VideoSize>;

    /// Capture a still frame at `time`.
    fn generate_image(&self, time: Duration) -> Result<VideoFrame>;
}

/// A playable instance of an asset.
pub trait PlayerItem: Send + Sync {
    fn current_time(&self) -> Duration;

    /// Total duration, `None` while indefinite (e.g. live streams).
    fn duration(&self) -> Option<Duration>;

    fn loaded_time_ranges(&self) -> Vec<TimeRange>;

    /// Seek within the item. `completion`, when given, fires once the seek
    /// finishes or is interrupted.
    fn seek(&self, to: Duration, tolerance: SeekTolerance, completion: Option<SeekCompletion>);

    /// Register for status, buffering and end-of-item notifications.
    fn observe(&self, observer: ItemObserver) -> Subscription;
}

/// Host view layer the engine renders into.
pub trait VideoSurface: Send + Sync {
    /// Bind (or unbind) the engine's video output to this surface.
    fn set_player_attached(&self, attached: bool);

    fn set_hidden(&self, hidden: bool);

    fn set_fill_mode(&self, mode: FillMode);

    fn fill_mode(&self) -> FillMode;

    /// Register for surface notifications.
    fn observe(&self, observer: SurfaceObserver) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_keys() {
        assert_eq!(AssetKey::REQUIRED.len(), 3);
        assert!(AssetKey::REQUIRED.contains(&AssetKey::Playable));
    }

    #[test]
    fn failed_key_status() {
        assert!(AssetKeyStatus::Failed {
            message: "missing moov".into()
        }
        .is_failed());
        assert!(!AssetKeyStatus::Loaded.is_failed());
    }
}
