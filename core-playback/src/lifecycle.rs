//! # Lifecycle Bridge
//!
//! Maps application lifecycle transitions onto controller commands:
//!
//! | Transition | Condition | Command |
//! |---|---|---|
//! | will resign active | playing | `pause()` |
//! | did enter background | paused, pause-when-backgrounded | `pause()` |
//! | will enter foreground | not playing, resume-on-foreground | `play_from_current_time()` |
//!
//! The background rule checks `Paused`, so it never pauses a playing
//! session on its own; playback is normally paused earlier by the
//! resign-active transition.
//!
//! The bridge holds the controller weakly and keeps no state of its own.

use crate::controller::{PlaybackController, WeakPlaybackController};

use bridge_traits::background::{LifecycleEvent, LifecycleObserver};
use bridge_traits::playback::PlaybackState;
use core_runtime::events::CoreEvent;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Command chosen for a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Pause,
    PlayFromCurrentTime,
}

/// Decide what a lifecycle transition does to playback.
pub fn lifecycle_action(
    event: LifecycleEvent,
    state: PlaybackState,
    pauses_when_backgrounded: bool,
    resumes_on_foreground: bool,
) -> Option<LifecycleAction> {
    match event {
        LifecycleEvent::WillResignActive if state == PlaybackState::Playing => {
            Some(LifecycleAction::Pause)
        }
        LifecycleEvent::DidEnterBackground
            if state == PlaybackState::Paused && pauses_when_backgrounded =>
        {
            Some(LifecycleAction::Pause)
        }
        LifecycleEvent::WillEnterForeground
            if state != PlaybackState::Playing && resumes_on_foreground =>
        {
            Some(LifecycleAction::PlayFromCurrentTime)
        }
        _ => None,
    }
}

/// Forwards lifecycle transitions to a controller.
#[derive(Clone)]
pub struct LifecycleBridge {
    controller: WeakPlaybackController,
}

impl LifecycleBridge {
    pub fn new(controller: &PlaybackController) -> Self {
        Self {
            controller: controller.downgrade(),
        }
    }

    /// Apply `event` on the designated thread. Does nothing once the
    /// controller is gone.
    pub fn handle(&self, event: LifecycleEvent) {
        let Some(controller) = self.controller.upgrade() else {
            return;
        };
        controller.publish(CoreEvent::Lifecycle(event));

        let weak = self.controller.clone();
        controller.run_on_main(move || {
            if let Some(controller) = weak.upgrade() {
                apply(&controller, event);
            }
        });
    }

    /// Follow `observer`'s transitions on a Tokio task until the stream
    /// closes or the controller is dropped.
    pub fn spawn(self, observer: Arc<dyn LifecycleObserver>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut stream = match observer.subscribe_changes().await {
                Ok(stream) => stream,
                Err(error) => {
                    warn!(error = %error, "lifecycle observer unavailable");
                    return;
                }
            };

            while let Some(event) = stream.next().await {
                if self.controller.upgrade().is_none() {
                    debug!("controller released, lifecycle bridge exiting");
                    break;
                }
                self.handle(event);
            }
        })
    }
}

fn apply(controller: &PlaybackController, event: LifecycleEvent) {
    let action = lifecycle_action(
        event,
        controller.playback_state(),
        controller.pauses_when_backgrounded(),
        controller.resumes_on_foreground(),
    );
    debug!(?event, ?action, "lifecycle transition");

    match action {
        Some(LifecycleAction::Pause) => controller.pause(),
        Some(LifecycleAction::PlayFromCurrentTime) => controller.play_from_current_time(),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resign_active_pauses_only_while_playing() {
        use PlaybackState::*;
        let event = LifecycleEvent::WillResignActive;
        assert_eq!(
            lifecycle_action(event, Playing, true, true),
            Some(LifecycleAction::Pause)
        );
        assert_eq!(lifecycle_action(event, Paused, true, true), None);
        assert_eq!(lifecycle_action(event, Stopped, true, true), None);
    }

    #[test]
    fn background_rule_checks_paused() {
        use PlaybackState::*;
        let event = LifecycleEvent::DidEnterBackground;
        assert_eq!(lifecycle_action(event, Playing, true, true), None);
        assert_eq!(
            lifecycle_action(event, Paused, true, true),
            Some(LifecycleAction::Pause)
        );
        assert_eq!(lifecycle_action(event, Paused, false, true), None);
    }

    #[test]
    fn foreground_resumes_when_not_playing() {
        use PlaybackState::*;
        let event = LifecycleEvent::WillEnterForeground;
        assert_eq!(
            lifecycle_action(event, Paused, true, true),
            Some(LifecycleAction::PlayFromCurrentTime)
        );
        assert_eq!(
            lifecycle_action(event, Stopped, true, true),
            Some(LifecycleAction::PlayFromCurrentTime)
        );
        assert_eq!(lifecycle_action(event, Playing, true, true), None);
        assert_eq!(lifecycle_action(event, Paused, true, false), None);
    }

    #[test]
    fn become_active_does_nothing() {
        for state in [
            PlaybackState::Stopped,
            PlaybackState::Playing,
            PlaybackState::Paused,
            PlaybackState::Failed,
        ] {
            assert_eq!(
                lifecycle_action(LifecycleEvent::DidBecomeActive, state, true, true),
                None
            );
        }
    }
}
