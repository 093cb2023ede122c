//! One loaded media source.

use bridge_traits::engine::{MediaAsset, PlayerItem};
use bridge_traits::playback::{MediaSource, PlaybackSessionId};
use bridge_traits::subscription::Subscription;
use std::sync::Arc;
use std::time::Duration;
use tracing::Span;

/// A source between `load` and asset resolution.
pub(crate) struct PendingLoad {
    pub generation: u64,
    pub id: PlaybackSessionId,
    pub source: MediaSource,
    pub start_time: Option<Duration>,
    pub asset: Arc<dyn MediaAsset>,
    pub span: Span,
}

/// A resolved source with its engine item and live item observer.
///
/// Dropping the session cancels the observer.
pub(crate) struct PlaybackSession {
    pub generation: u64,
    pub id: PlaybackSessionId,
    pub source: MediaSource,
    pub asset: Arc<dyn MediaAsset>,
    pub item: Arc<dyn PlayerItem>,
    pub span: Span,
    item_subscription: Subscription,
}

impl PlaybackSession {
    pub(crate) fn new(
        pending: PendingLoad,
        item: Arc<dyn PlayerItem>,
        item_subscription: Subscription,
    ) -> Self {
        Self {
            generation: pending.generation,
            id: pending.id,
            source: pending.source,
            asset: pending.asset,
            item,
            span: pending.span,
            item_subscription,
        }
    }

    pub(crate) fn is_observing(&self) -> bool {
        self.item_subscription.is_active()
    }
}
