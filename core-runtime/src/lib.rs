//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the playback crates:
//! - Logging and tracing setup, including host [`LoggerSink`] forwarding
//! - Event bus for fan-out of player notifications
//! - Runtime error type used during controller construction
//!
//! [`LoggerSink`]: bridge_traits::logger::LoggerSink

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
