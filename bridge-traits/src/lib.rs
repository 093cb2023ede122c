//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback core and the
//! platform's native video stack. Each trait represents a capability that the
//! core requires but that only the host can provide (AVFoundation on Apple
//! platforms, ExoPlayer/MediaPlayer on Android, a GStreamer or FFmpeg player
//! on desktop).
//!
//! ## Traits
//!
//! ### Media
//! - [`MediaEngine`](engine::MediaEngine) - The native player object
//! - [`MediaAsset`](engine::MediaAsset) - Asynchronously resolved media source
//! - [`PlayerItem`](engine::PlayerItem) - Playable item with status/buffer notifications
//! - [`VideoSurface`](engine::VideoSurface) - View layer the engine renders into
//!
//! ### Platform Integration
//! - [`MainThreadExecutor`](dispatch::MainThreadExecutor) - Designated-thread job queue
//! - [`LifecycleObserver`](background::LifecycleObserver) - App foreground/background transitions
//!
//! ### Utilities
//! - [`LoggerSink`](logger::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop` (executor + lifecycle shims) | ✅ In Progress |
//! | iOS      | TBD                 | 📋 Planned |
//! | Android  | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. The
//! playback core never surfaces these errors to its own callers; it turns
//! them into state transitions.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync`. Observer callbacks may be invoked
//! from any thread; the core marshals them onto the designated thread.

pub mod background;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod logger;
pub mod playback;
pub mod subscription;

pub use error::BridgeError;

// Re-export commonly used types
pub use background::{LifecycleChangeStream, LifecycleEvent, LifecycleObserver, LifecycleState};
pub use dispatch::{MainThreadExecutor, MainThreadJob};
pub use engine::{
    ActionAtItemEnd, AssetKey, AssetKeyStatus, ItemEvent, ItemObserver, ItemStatus, MediaAsset,
    MediaEngine, PlayerItem, SeekCompletion, SurfaceEvent, SurfaceObserver, TimeObserver,
    VideoSurface,
};
pub use logger::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use playback::{
    BufferingState, FillMode, MediaSource, PlaybackSessionId, PlaybackState, SeekTolerance,
    TimeRange, VideoFrame, VideoSize,
};
pub use subscription::{Subscription, SubscriptionId};
