//! # Event Bus System
//!
//! Broadcasts player notifications to any number of in-process listeners using
//! `tokio::sync::broadcast`. The delegate contract of the playback controller
//! reaches exactly one owner; the bus lets additional observers (analytics,
//! now-playing widgets, test harnesses) follow along without becoming
//! delegates themselves.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(64);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Playback(PlaybackEvent::WillLoop)).ok();
//! assert_eq!(rx.recv().await.unwrap(), CoreEvent::Playback(PlaybackEvent::WillLoop));
//! # }
//! ```
//!
//! ## Event Types
//!
//! ### Playback Events
//! Mirror the controller's delegate callbacks one-to-one: `Ready`,
//! `StateChanged`, `BufferingChanged`, `PositionChanged`,
//! `WillStartFromBeginning`, `DidEnd`, `WillLoop`.
//!
//! ### Lifecycle Events
//! Application transitions observed by the lifecycle bridge.
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events; it can keep
//!   receiving. Position ticks arrive every few milliseconds, so slow
//!   subscribers should expect this.
//! - **`RecvError::Closed`**: every sender is gone; treat as shutdown.

use bridge_traits::background::LifecycleEvent;
use bridge_traits::playback::{BufferingState, PlaybackState};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;
use tracing::trace;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 256;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Playback controller notifications
    Playback(PlaybackEvent),
    /// Application lifecycle transitions
    Lifecycle(LifecycleEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Lifecycle(LifecycleEvent::WillResignActive) => "App resigning active",
            CoreEvent::Lifecycle(LifecycleEvent::DidEnterBackground) => "App entered background",
            CoreEvent::Lifecycle(LifecycleEvent::WillEnterForeground) => {
                "App entering foreground"
            }
            CoreEvent::Lifecycle(LifecycleEvent::DidBecomeActive) => "App became active",
        }
    }
}

// ============================================================================
// Playback Events
// ============================================================================

/// Notifications emitted by the playback controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// The surface has a frame ready for display.
    Ready,
    /// Playback state was written.
    StateChanged { state: PlaybackState },
    /// Buffering state was written.
    BufferingChanged { state: BufferingState },
    /// Periodic time tick.
    PositionChanged {
        /// Current media time (milliseconds).
        position_ms: u64,
    },
    /// Playback is about to restart from time zero.
    WillStartFromBeginning,
    /// Playback stopped, either explicitly or at the end of the media.
    DidEnd,
    /// The end of the media was reached and playback is looping.
    WillLoop,
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Ready => "Player ready for display",
            PlaybackEvent::StateChanged { .. } => "Playback state changed",
            PlaybackEvent::BufferingChanged { .. } => "Buffering state changed",
            PlaybackEvent::PositionChanged { .. } => "Playback position changed",
            PlaybackEvent::WillStartFromBeginning => "Playback starting from beginning",
            PlaybackEvent::DidEnd => "Playback ended",
            PlaybackEvent::WillLoop => "Playback looping",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Cloning the bus clones the sender; every clone publishes to the same set
/// of subscribers. Subscribers only see events emitted after they subscribed.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus that buffers up to `capacity` events per
    /// subscriber before reporting `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        trace!(event = event.description(), "emitting core event");
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional filter.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream, PlaybackEvent};
///
/// let bus = EventBus::default();
/// // Skip the high-frequency position ticks
/// let stream = EventStream::new(bus.subscribe()).filter(|event| {
///     !matches!(event, CoreEvent::Playback(PlaybackEvent::PositionChanged { .. }))
/// });
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`/`try_recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` once every sender has been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv). `None` when nothing
    /// matching is queued.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
