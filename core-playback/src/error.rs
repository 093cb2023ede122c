//! # Playback Error Types
//!
//! Errors raised inside the controller. None of these cross the public
//! command surface: the controller turns them into a `Failed` playback state
//! or an empty result and logs them.

use bridge_traits::engine::AssetKey;
use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors that can occur while loading or driving a media source.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// A required asset key failed to resolve.
    #[error("Asset key {key:?} failed to load: {message}")]
    SourceValidation { key: AssetKey, message: String },

    /// The asset resolved but the engine cannot play it.
    #[error("Media source is not playable")]
    SourceNotPlayable,

    // ========================================================================
    // Engine Errors
    // ========================================================================
    /// The engine reported the item as failed.
    #[error("Player item failed: {0}")]
    ItemFailed(String),

    /// Attempted an operation that needs a loaded source.
    #[error("No media source loaded")]
    NoSessionLoaded,

    /// A host bridge call failed.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl PlaybackError {
    /// Returns `true` if the error came from validating a newly loaded source.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::SourceValidation { .. } | PlaybackError::SourceNotPlayable
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
