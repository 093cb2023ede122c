//! Application lifecycle observation.
//!
//! Notifies the core about app lifecycle transitions so playback can pause
//! when the app leaves the screen and resume when it comes back.
//!
//! # Platform Support
//!
//! - **iOS**: UIApplication will-resign-active / did-enter-background /
//!   will-enter-foreground notifications
//! - **Android**: Activity `onPause` / `onStop` / `onStart`
//! - **Desktop**: Window focus/minimize events (less critical)

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Coarse application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// In the foreground and receiving events.
    Active,
    /// Visible but not receiving events (e.g. system overlay shown).
    Inactive,
    /// No longer visible.
    Background,
}

/// Discrete lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    WillResignActive,
    DidEnterBackground,
    WillEnterForeground,
    DidBecomeActive,
}

impl LifecycleEvent {
    /// State the application is in once the transition completes.
    pub fn resulting_state(&self) -> LifecycleState {
        match self {
            LifecycleEvent::WillResignActive => LifecycleState::Inactive,
            LifecycleEvent::DidEnterBackground => LifecycleState::Background,
            LifecycleEvent::WillEnterForeground => LifecycleState::Inactive,
            LifecycleEvent::DidBecomeActive => LifecycleState::Active,
        }
    }
}

/// Lifecycle observer trait
///
/// # Example
///
/// ```ignore
/// use bridge_traits::background::{LifecycleEvent, LifecycleObserver};
///
/// async fn watch(observer: &dyn LifecycleObserver) -> Result<()> {
///     let mut stream = observer.subscribe_changes().await?;
///
///     while let Some(event) = stream.next().await {
///         if event == LifecycleEvent::DidEnterBackground {
///             release_decoders();
///         }
///     }
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait LifecycleObserver: Send + Sync {
    /// Get current lifecycle state
    async fn get_state(&self) -> Result<LifecycleState>;

    /// Subscribe to lifecycle transitions
    async fn subscribe_changes(&self) -> Result<Box<dyn LifecycleChangeStream>>;
}

/// Stream of lifecycle transitions
#[async_trait::async_trait]
pub trait LifecycleChangeStream: Send {
    /// Get the next lifecycle transition
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<LifecycleEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resulting_state() {
        assert_eq!(
            LifecycleEvent::DidEnterBackground.resulting_state(),
            LifecycleState::Background
        );
        assert_eq!(
            LifecycleEvent::DidBecomeActive.resulting_state(),
            LifecycleState::Active
        );
        assert_eq!(
            LifecycleEvent::WillResignActive.resulting_state(),
            LifecycleState::Inactive
        );
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&LifecycleEvent::WillEnterForeground).unwrap();
        assert_eq!(json, "\"will_enter_foreground\"");
    }
}
