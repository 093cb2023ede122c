//! # Desktop Bridge Implementations
//!
//! Default implementations of the host-side bridge traits for desktop
//! platforms (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! Desktop hosts own their own event loop, so this crate only supplies the
//! pieces every host needs and none of the media stack:
//! - `QueueExecutor` - a `MainThreadExecutor` drained by the host's event loop
//! - `ChannelLifecycleObserver` - lifecycle transitions posted by the host
//!   (window focus, minimize, restore)
//! - `DesktopLifecycleObserver` - always active; for hosts without
//!   lifecycle signals
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ChannelLifecycleObserver, QueueExecutor};
//! use bridge_traits::LifecycleEvent;
//!
//! let executor = Arc::new(QueueExecutor::for_current_thread());
//! let lifecycle = Arc::new(ChannelLifecycleObserver::new());
//!
//! // in the window event loop
//! lifecycle.post(LifecycleEvent::WillResignActive);
//! executor.run_pending();
//! ```

mod background;
mod executor;

pub use background::{ChannelLifecycleObserver, DesktopLifecycleObserver};
pub use executor::QueueExecutor;
