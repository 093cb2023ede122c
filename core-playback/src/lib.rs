//! # Video Playback Controller
//!
//! Drives a host media engine through a small state machine.
//!
//! ## Overview
//!
//! This crate handles:
//! - Playback and buffering state with edge-triggered delegate notifications
//! - Buffering-driven resume after stalls
//! - Loop / freeze / rewind-then-stop policy at the end of the media
//! - Marshaling engine callbacks onto the designated thread
//! - Pausing and resuming across application lifecycle transitions
//!
//! Decoding, rendering and networking stay in the host engine, reached
//! through the traits in `bridge-traits`.

pub mod config;
pub mod controller;
pub mod delegate;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod policy;
pub mod state;

mod session;

pub use config::{PlayerConfig, PlayerConfigBuilder, PlayerSettings};
pub use controller::{PlaybackController, WeakPlaybackController};
pub use delegate::{Notification, PlayerDelegate};
pub use dispatch::run_on_main;
pub use error::{PlaybackError, Result};
pub use lifecycle::{lifecycle_action, LifecycleAction, LifecycleBridge};
pub use policy::EndOfMediaAction;
pub use state::ObservedValue;
