//! Delegate contract.
//!
//! The owner of a controller implements [`PlayerDelegate`] and overrides only
//! the callbacks it cares about. The controller holds the delegate weakly:
//! once the owner drops it, notifications are skipped.

use bridge_traits::playback::{BufferingState, PlaybackState};
use core_runtime::events::PlaybackEvent;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Receiver of controller notifications. Every method defaults to a no-op.
///
/// Callbacks run on the designated thread, after the controller has released
/// its internal lock, so they may call back into the controller.
pub trait PlayerDelegate: Send + Sync {
    /// The surface has a frame ready for display.
    fn player_ready(&self) {}

    fn playback_state_changed(&self, _state: PlaybackState) {}

    fn buffering_state_changed(&self, _state: BufferingState) {}

    /// Periodic time tick.
    fn current_time_changed(&self, _time: Duration) {}

    fn playback_will_start_from_beginning(&self) {}

    fn playback_did_end(&self) {}

    fn playback_will_loop(&self) {}
}

/// A notification queued by the state machine for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Ready,
    PlaybackStateChanged(PlaybackState),
    BufferingStateChanged(BufferingState),
    CurrentTimeChanged(Duration),
    WillStartFromBeginning,
    DidEnd,
    WillLoop,
}

impl Notification {
    pub(crate) fn deliver(&self, delegate: &dyn PlayerDelegate) {
        match *self {
            Notification::Ready => delegate.player_ready(),
            Notification::PlaybackStateChanged(state) => delegate.playback_state_changed(state),
            Notification::BufferingStateChanged(state) => delegate.buffering_state_changed(state),
            Notification::CurrentTimeChanged(time) => delegate.current_time_changed(time),
            Notification::WillStartFromBeginning => delegate.playback_will_start_from_beginning(),
            Notification::DidEnd => delegate.playback_did_end(),
            Notification::WillLoop => delegate.playback_will_loop(),
        }
    }

    /// Event bus form of this notification.
    pub fn to_event(&self) -> PlaybackEvent {
        match *self {
            Notification::Ready => PlaybackEvent::Ready,
            Notification::PlaybackStateChanged(state) => PlaybackEvent::StateChanged { state },
            Notification::BufferingStateChanged(state) => PlaybackEvent::BufferingChanged { state },
            Notification::CurrentTimeChanged(time) => PlaybackEvent::PositionChanged {
                position_ms: time.as_millis() as u64,
            },
            Notification::WillStartFromBeginning => PlaybackEvent::WillStartFromBeginning,
            Notification::DidEnd => PlaybackEvent::DidEnd,
            Notification::WillLoop => PlaybackEvent::WillLoop,
        }
    }
}

/// Non-owning delegate slot.
#[derive(Default)]
pub(crate) struct DelegateSlot {
    inner: RwLock<Option<Weak<dyn PlayerDelegate>>>,
}

impl DelegateSlot {
    pub(crate) fn set<D: PlayerDelegate + 'static>(&self, delegate: &Arc<D>) {
        let weak: Weak<dyn PlayerDelegate> = Arc::downgrade(delegate) as Weak<D>;
        *self.inner.write() = Some(weak);
    }

    pub(crate) fn clear(&self) {
        *self.inner.write() = None;
    }

    /// Live delegate, if one is set and still alive.
    pub(crate) fn get(&self) -> Option<Arc<dyn PlayerDelegate>> {
        self.inner.read().as_ref().and_then(Weak::upgrade)
    }
}
