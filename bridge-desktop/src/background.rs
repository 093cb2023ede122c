//! Lifecycle Observation Implementation

use async_trait::async_trait;
use bridge_traits::{
    background::{LifecycleChangeStream, LifecycleEvent, LifecycleObserver, LifecycleState},
    error::{BridgeError, Result},
};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

const CHANNEL_CAPACITY: usize = 32;

/// Lifecycle observer fed by the host.
///
/// Desktop platforms have no uniform lifecycle notifications, so the host
/// maps its own window events (focus lost, minimized, restored) onto
/// [`LifecycleEvent`]s and posts them here. Every subscriber sees every
/// transition posted after it subscribed.
pub struct ChannelLifecycleObserver {
    state: RwLock<LifecycleState>,
    sender: Mutex<Option<broadcast::Sender<LifecycleEvent>>>,
}

impl ChannelLifecycleObserver {
    /// Create an observer in the `Active` state.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(LifecycleState::Active),
            sender: Mutex::new(Some(sender)),
        }
    }

    /// Record `event` and deliver it to current subscribers.
    ///
    /// Returns the number of subscribers reached.
    pub fn post(&self, event: LifecycleEvent) -> usize {
        *self.state.write() = event.resulting_state();

        match self.sender.lock().as_ref() {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => {
                warn!(?event, "lifecycle observer closed, event dropped");
                0
            }
        }
    }

    /// End every open stream. Later subscriptions fail.
    pub fn close(&self) {
        if self.sender.lock().take().is_some() {
            debug!("lifecycle observer closed");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender
            .lock()
            .as_ref()
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

impl Default for ChannelLifecycleObserver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LifecycleObserver for ChannelLifecycleObserver {
    async fn get_state(&self) -> Result<LifecycleState> {
        Ok(*self.state.read())
    }

    async fn subscribe_changes(&self) -> Result<Box<dyn LifecycleChangeStream>> {
        let sender = self.sender.lock();
        let sender = sender
            .as_ref()
            .ok_or_else(|| BridgeError::NotAvailable("lifecycle observer closed".to_string()))?;
        Ok(Box::new(BroadcastLifecycleStream {
            receiver: sender.subscribe(),
        }))
    }
}

struct BroadcastLifecycleStream {
    receiver: broadcast::Receiver<LifecycleEvent>,
}

#[async_trait]
impl LifecycleChangeStream for BroadcastLifecycleStream {
    async fn next(&mut self) -> Option<LifecycleEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "lifecycle subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Desktop lifecycle observer (always active).
pub struct DesktopLifecycleObserver;

impl DesktopLifecycleObserver {
    /// Create a new lifecycle observer.
    pub fn new() -> Self {
        Self
    }
}

impl Default for DesktopLifecycleObserver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LifecycleObserver for DesktopLifecycleObserver {
    async fn get_state(&self) -> Result<LifecycleState> {
        Ok(LifecycleState::Active)
    }

    async fn subscribe_changes(&self) -> Result<Box<dyn LifecycleChangeStream>> {
        Ok(Box::new(DesktopLifecycleChangeStream))
    }
}

/// Desktop lifecycle change stream (never emits).
struct DesktopLifecycleChangeStream;

#[async_trait]
impl LifecycleChangeStream for DesktopLifecycleChangeStream {
    async fn next(&mut self) -> Option<LifecycleEvent> {
        std::future::pending::<()>().await;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_post_updates_state() {
        let observer = ChannelLifecycleObserver::new();
        assert_eq!(observer.get_state().await.unwrap(), LifecycleState::Active);

        observer.post(LifecycleEvent::DidEnterBackground);
        assert_eq!(
            observer.get_state().await.unwrap(),
            LifecycleState::Background
        );

        observer.post(LifecycleEvent::DidBecomeActive);
        assert_eq!(observer.get_state().await.unwrap(), LifecycleState::Active);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events_in_order() {
        let observer = ChannelLifecycleObserver::new();
        let mut first = observer.subscribe_changes().await.unwrap();
        let mut second = observer.subscribe_changes().await.unwrap();
        assert_eq!(observer.subscriber_count(), 2);

        assert_eq!(observer.post(LifecycleEvent::WillResignActive), 2);
        assert_eq!(observer.post(LifecycleEvent::DidEnterBackground), 2);

        assert_eq!(first.next().await, Some(LifecycleEvent::WillResignActive));
        assert_eq!(first.next().await, Some(LifecycleEvent::DidEnterBackground));
        assert_eq!(second.next().await, Some(LifecycleEvent::WillResignActive));
    }

    #[tokio::test]
    async fn test_post_without_subscribers() {
        let observer = ChannelLifecycleObserver::new();
        assert_eq!(observer.post(LifecycleEvent::WillEnterForeground), 0);
        assert_eq!(
            observer.get_state().await.unwrap(),
            LifecycleState::Inactive
        );
    }

    #[tokio::test]
    async fn test_close_ends_streams() {
        let observer = ChannelLifecycleObserver::new();
        let mut stream = observer.subscribe_changes().await.unwrap();

        observer.close();

        assert_eq!(stream.next().await, None);
        assert!(matches!(
            observer.subscribe_changes().await,
            Err(BridgeError::NotAvailable(_))
        ));
        assert_eq!(observer.post(LifecycleEvent::DidBecomeActive), 0);
    }

    #[tokio::test]
    async fn test_lagged_subscriber_skips_to_latest() {
        let observer = ChannelLifecycleObserver::new();
        let mut stream = observer.subscribe_changes().await.unwrap();

        for _ in 0..CHANNEL_CAPACITY {
            observer.post(LifecycleEvent::WillResignActive);
        }
        observer.post(LifecycleEvent::DidEnterBackground);

        let mut last = None;
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_millis(20), stream.next()).await
        {
            last = Some(event);
        }
        assert_eq!(last, Some(LifecycleEvent::DidEnterBackground));
    }

    #[tokio::test]
    async fn test_desktop_lifecycle_observer() {
        let observer = DesktopLifecycleObserver::new();
        assert_eq!(observer.get_state().await.unwrap(), LifecycleState::Active);

        let mut stream = observer.subscribe_changes().await.unwrap();
        let next = tokio::time::timeout(Duration::from_millis(10), stream.next()).await;
        assert!(next.is_err());
    }
}
