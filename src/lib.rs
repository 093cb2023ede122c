//! Workspace facade crate.
//!
//! Re-exports the playback core and its bridge contracts so host
//! applications can depend on `vpc-workspace` alone. The `desktop-shims`
//! feature (on by default) adds the desktop executor and lifecycle
//! implementations from `bridge-desktop`.

pub use bridge_traits;
pub use core_playback;
pub use core_runtime;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;

pub use core_playback::{
    LifecycleBridge, PlaybackController, PlaybackError, PlayerConfig, PlayerDelegate,
    PlayerSettings,
};
