//! Playback vocabulary shared between the core and host adapters.
//!
//! These types describe what the core tells the host (states, frames, sizes)
//! and what the host hands to the core (sources, loaded ranges). They carry no
//! behaviour beyond small conveniences so that every platform adapter agrees
//! on the same shapes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Playback lifecycle state exposed to delegates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
    /// Terminal for the current load; a fresh load is required to recover.
    Failed,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Stopped => "stopped",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Buffering state, tracked independently of [`PlaybackState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferingState {
    #[default]
    Unknown,
    /// Enough media is buffered to keep playing.
    Ready,
    /// The playback buffer ran dry.
    Delayed,
}

impl fmt::Display for BufferingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferingState::Unknown => "unknown",
            BufferingState::Ready => "ready",
            BufferingState::Delayed => "delayed",
        };
        f.write_str(name)
    }
}

/// How video content is scaled into the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Stretch to fill, ignoring aspect ratio.
    Stretch,
    /// Preserve aspect ratio and fill the surface, cropping if needed.
    AspectFill,
    /// Preserve aspect ratio and fit inside the surface.
    #[default]
    AspectFit,
}

/// Media source handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Media file accessible to the host runtime.
    LocalFile { path: PathBuf },
    /// Remote HTTP(S) resource fetched by the engine.
    RemoteUrl {
        url: String,
        headers: HashMap<String, String>,
    },
}

impl MediaSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        MediaSource::LocalFile { path: path.into() }
    }

    pub fn url(url: impl Into<String>) -> Self {
        MediaSource::RemoteUrl {
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Determine whether the source represents remote content.
    pub fn is_remote(&self) -> bool {
        matches!(self, MediaSource::RemoteUrl { .. })
    }

    /// Location string as given by the caller (path or URL).
    pub fn location(&self) -> String {
        match self {
            MediaSource::LocalFile { path } => path.to_string_lossy().into_owned(),
            MediaSource::RemoteUrl { url, .. } => url.clone(),
        }
    }
}

/// Unique identifier for one loaded media source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackSessionId(Uuid);

impl PlaybackSessionId {
    /// Generate a new session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlaybackSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaybackSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A contiguous range of media the engine has already loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Duration,
    pub duration: Duration,
}

impl TimeRange {
    pub fn new(start: Duration, duration: Duration) -> Self {
        Self { start, duration }
    }

    pub fn end(&self) -> Duration {
        self.start + self.duration
    }
}

/// Tolerances applied to a seek. Zero on both sides means frame-exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeekTolerance {
    pub before: Duration,
    pub after: Duration,
}

impl SeekTolerance {
    pub const EXACT: SeekTolerance = SeekTolerance {
        before: Duration::ZERO,
        after: Duration::ZERO,
    };

    pub fn new(before: Duration, after: Duration) -> Self {
        Self { before, after }
    }
}

/// Intrinsic dimensions of the video track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoSize {
    pub width: f64,
    pub height: f64,
}

impl VideoSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Still image captured from the current media.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Encoded or raw pixel data, as produced by the host image generator.
    pub data: Bytes,
    /// Media time the frame was captured at.
    pub timestamp: Duration,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, data: Bytes, timestamp: Duration) -> Self {
        Self {
            width,
            height,
            data,
            timestamp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }
}
