//! Scripted host doubles for controller tests.
//!
//! The fakes record every command they receive and keep every observer that
//! was ever registered, so tests can fire engine events on demand, including
//! events from observers that have since been cancelled.

#![allow(dead_code)]

use bridge_traits::dispatch::{MainThreadExecutor, MainThreadJob};
use bridge_traits::engine::{
    ActionAtItemEnd, AssetKey, AssetKeyStatus, AssetLoadCompletion, ItemEvent, ItemObserver,
    MediaAsset, MediaEngine, PlayerItem, SeekCompletion, SurfaceEvent, SurfaceObserver,
    TimeObserver, VideoSurface,
};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::playback::{
    BufferingState, FillMode, MediaSource, PlaybackState, SeekTolerance, TimeRange, VideoFrame,
    VideoSize,
};
use bridge_traits::subscription::{Subscription, SubscriptionId};
use bytes::Bytes;
use core_playback::{Notification, PlaybackController, PlayerConfig, PlayerDelegate, PlayerSettings};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

type ObserverList<T> = Arc<Mutex<Vec<(SubscriptionId, T)>>>;

fn register<T: Send + 'static>(list: &ObserverList<T>, observer: T) -> Subscription {
    let id = SubscriptionId::next();
    list.lock().push((id, observer));
    let list = Arc::clone(list);
    Subscription::new(id, move || list.lock().retain(|(existing, _)| *existing != id))
}

// ============================================================================
// Engine
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Play,
    Pause,
    ReplaceItem { present: bool },
    ActionAtItemEnd(ActionAtItemEnd),
}

#[derive(Default)]
pub struct FakeEngine {
    pub calls: Mutex<Vec<EngineCall>>,
    prepared: Mutex<HashMap<String, Arc<FakeAsset>>>,
    pub assets: Mutex<Vec<Arc<FakeAsset>>>,
    pub items: Mutex<Vec<Arc<FakeItem>>>,
    time_observers: ObserverList<TimeObserver>,
    muted: Mutex<bool>,
    volume: Mutex<f32>,
    pub fail_open: Mutex<bool>,
}

impl FakeEngine {
    /// Use `asset` the next time `location` is opened.
    pub fn prepare(&self, location: &str, asset: FakeAsset) -> Arc<FakeAsset> {
        let asset = Arc::new(asset);
        self.prepared
            .lock()
            .insert(location.to_string(), Arc::clone(&asset));
        asset
    }

    pub fn last_asset(&self) -> Arc<FakeAsset> {
        Arc::clone(self.assets.lock().last().expect("an asset was opened"))
    }

    pub fn last_item(&self) -> Arc<FakeItem> {
        Arc::clone(self.items.lock().last().expect("an item was created"))
    }

    pub fn plays(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| **call == EngineCall::Play)
            .count()
    }

    pub fn pauses(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| **call == EngineCall::Pause)
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn tick(&self, time: Duration) {
        let observers: Vec<TimeObserver> = self
            .time_observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(time);
        }
    }

    pub fn time_observer_count(&self) -> usize {
        self.time_observers.lock().len()
    }
}

impl MediaEngine for FakeEngine {
    fn open_asset(&self, source: &MediaSource) -> BridgeResult<Arc<dyn MediaAsset>> {
        if *self.fail_open.lock() {
            return Err(BridgeError::Engine("unsupported scheme".into()));
        }
        let asset = self
            .prepared
            .lock()
            .remove(&source.location())
            .unwrap_or_else(|| Arc::new(FakeAsset::playable()));
        self.assets.lock().push(Arc::clone(&asset));
        Ok(asset)
    }

    fn create_item(&self, _asset: Arc<dyn MediaAsset>) -> BridgeResult<Arc<dyn PlayerItem>> {
        let item = Arc::new(FakeItem::default());
        self.items.lock().push(Arc::clone(&item));
        Ok(item)
    }

    fn replace_current_item(&self, item: Option<Arc<dyn PlayerItem>>) {
        self.calls.lock().push(EngineCall::ReplaceItem {
            present: item.is_some(),
        });
    }

    fn play(&self) {
        self.calls.lock().push(EngineCall::Play);
    }

    fn pause(&self) {
        self.calls.lock().push(EngineCall::Pause);
    }

    fn set_action_at_item_end(&self, action: ActionAtItemEnd) {
        self.calls.lock().push(EngineCall::ActionAtItemEnd(action));
    }

    fn is_muted(&self) -> bool {
        *self.muted.lock()
    }

    fn set_muted(&self, muted: bool) {
        *self.muted.lock() = muted;
    }

    fn volume(&self) -> f32 {
        *self.volume.lock()
    }

    fn set_volume(&self, volume: f32) {
        *self.volume.lock() = volume;
    }

    fn add_periodic_time_observer(
        &self,
        _interval: Duration,
        observer: TimeObserver,
    ) -> Subscription {
        register(&self.time_observers, observer)
    }
}

// ============================================================================
// Asset
// ============================================================================

pub struct FakeAsset {
    statuses: HashMap<AssetKey, AssetKeyStatus>,
    playable: bool,
    size: Option<VideoSize>,
    completion: Mutex<Option<AssetLoadCompletion>>,
    pub snapshot_times: Mutex<Vec<Duration>>,
}

impl FakeAsset {
    pub fn playable() -> Self {
        Self {
            statuses: AssetKey::REQUIRED
                .iter()
                .map(|key| (*key, AssetKeyStatus::Loaded))
                .collect(),
            playable: true,
            size: Some(VideoSize::new(1920.0, 1080.0)),
            completion: Mutex::new(None),
            snapshot_times: Mutex::new(Vec::new()),
        }
    }

    pub fn with_failed_key(mut self, key: AssetKey) -> Self {
        self.statuses.insert(
            key,
            AssetKeyStatus::Failed {
                message: "could not resolve".into(),
            },
        );
        self
    }

    pub fn not_playable(mut self) -> Self {
        self.playable = false;
        self
    }

    /// Fire the pending key-loading completion.
    pub fn complete(&self) {
        let completion = self.completion.lock().take();
        if let Some(completion) = completion {
            completion();
        }
    }

    pub fn has_pending_load(&self) -> bool {
        self.completion.lock().is_some()
    }
}

impl MediaAsset for FakeAsset {
    fn load_values_async(&self, _keys: &[AssetKey], completion: AssetLoadCompletion) {
        *self.completion.lock() = Some(completion);
    }

    fn status_of_value(&self, key: AssetKey) -> AssetKeyStatus {
        self.statuses
            .get(&key)
            .cloned()
            .unwrap_or(AssetKeyStatus::Unknown)
    }

    fn is_playable(&self) -> bool {
        self.playable
    }

    fn natural_size(&self) -> Option<VideoSize> {
        self.size
    }

    fn generate_image(&self, time: Duration) -> BridgeResult<VideoFrame> {
        self.snapshot_times.lock().push(time);
        Ok(VideoFrame::new(2, 2, Bytes::from_static(&[0u8; 16]), time))
    }
}

// ============================================================================
// Item
// ============================================================================

#[derive(Default)]
pub struct FakeItem {
    current_time: Mutex<Duration>,
    duration: Mutex<Option<Duration>>,
    ranges: Mutex<Vec<TimeRange>>,
    pub seeks: Mutex<Vec<(Duration, SeekTolerance)>>,
    pending_completions: Mutex<Vec<SeekCompletion>>,
    observers: ObserverList<ItemObserver>,
    every_observer: Mutex<Vec<ItemObserver>>,
}

impl FakeItem {
    pub fn set_current_time(&self, time: Duration) {
        *self.current_time.lock() = time;
    }

    pub fn set_duration(&self, duration: Option<Duration>) {
        *self.duration.lock() = duration;
    }

    /// Deliver `event` to the live observers.
    pub fn emit(&self, event: ItemEvent) {
        let observers: Vec<ItemObserver> = self
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(event.clone());
        }
    }

    /// Deliver `event` to every observer ever registered, cancelled or not,
    /// as a late engine callback would.
    pub fn emit_late(&self, event: ItemEvent) {
        let observers: Vec<ItemObserver> = self.every_observer.lock().clone();
        for observer in observers {
            observer(event.clone());
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    pub fn seek_targets(&self) -> Vec<Duration> {
        self.seeks.lock().iter().map(|(to, _)| *to).collect()
    }

    pub fn pending_seek_completions(&self) -> usize {
        self.pending_completions.lock().len()
    }

    pub fn complete_seeks(&self, finished: bool) {
        let completions: Vec<SeekCompletion> = self.pending_completions.lock().drain(..).collect();
        for completion in completions {
            completion(finished);
        }
    }
}

impl PlayerItem for FakeItem {
    fn current_time(&self) -> Duration {
        *self.current_time.lock()
    }

    fn duration(&self) -> Option<Duration> {
        *self.duration.lock()
    }

    fn loaded_time_ranges(&self) -> Vec<TimeRange> {
        self.ranges.lock().clone()
    }

    fn seek(&self, to: Duration, tolerance: SeekTolerance, completion: Option<SeekCompletion>) {
        self.seeks.lock().push((to, tolerance));
        if let Some(completion) = completion {
            self.pending_completions.lock().push(completion);
        }
    }

    fn observe(&self, observer: ItemObserver) -> Subscription {
        self.every_observer.lock().push(Arc::clone(&observer));
        register(&self.observers, observer)
    }
}

// ============================================================================
// Surface
// ============================================================================

pub struct FakeSurface {
    pub attached: Mutex<bool>,
    pub hidden: Mutex<bool>,
    fill_mode: Mutex<FillMode>,
    observers: ObserverList<SurfaceObserver>,
}

impl Default for FakeSurface {
    fn default() -> Self {
        Self {
            attached: Mutex::new(false),
            hidden: Mutex::new(false),
            fill_mode: Mutex::new(FillMode::Stretch),
            observers: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeSurface {
    pub fn emit(&self, event: SurfaceEvent) {
        let observers: Vec<SurfaceObserver> = self
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(event);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }
}

impl VideoSurface for FakeSurface {
    fn set_player_attached(&self, attached: bool) {
        *self.attached.lock() = attached;
    }

    fn set_hidden(&self, hidden: bool) {
        *self.hidden.lock() = hidden;
    }

    fn set_fill_mode(&self, mode: FillMode) {
        *self.fill_mode.lock() = mode;
    }

    fn fill_mode(&self) -> FillMode {
        *self.fill_mode.lock()
    }

    fn observe(&self, observer: SurfaceObserver) -> Subscription {
        register(&self.observers, observer)
    }
}

// ============================================================================
// Executors
// ============================================================================

/// Every caller is on the designated thread.
#[derive(Default)]
pub struct InlineExecutor;

impl MainThreadExecutor for InlineExecutor {
    fn is_main_thread(&self) -> bool {
        true
    }

    fn enqueue(&self, job: MainThreadJob) {
        job();
    }
}

/// Callers are never on the designated thread; jobs wait for `run_pending`.
#[derive(Default)]
pub struct ManualExecutor {
    queue: Mutex<Vec<MainThreadJob>>,
}

impl ManualExecutor {
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn run_pending(&self) {
        loop {
            let jobs: Vec<MainThreadJob> = self.queue.lock().drain(..).collect();
            if jobs.is_empty() {
                break;
            }
            for job in jobs {
                job();
            }
        }
    }
}

impl MainThreadExecutor for ManualExecutor {
    fn is_main_thread(&self) -> bool {
        false
    }

    fn enqueue(&self, job: MainThreadJob) {
        self.queue.lock().push(job);
    }
}

// ============================================================================
// Delegate
// ============================================================================

#[derive(Default)]
pub struct RecordingDelegate {
    pub notifications: Mutex<Vec<Notification>>,
}

impl RecordingDelegate {
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock())
    }

    pub fn state_changes(&self) -> Vec<PlaybackState> {
        self.notifications
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notification::PlaybackStateChanged(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn buffering_changes(&self) -> Vec<BufferingState> {
        self.notifications
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notification::BufferingStateChanged(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, notification: Notification) -> usize {
        self.notifications
            .lock()
            .iter()
            .filter(|n| **n == notification)
            .count()
    }
}

impl PlayerDelegate for RecordingDelegate {
    fn player_ready(&self) {
        self.notifications.lock().push(Notification::Ready);
    }

    fn playback_state_changed(&self, state: PlaybackState) {
        self.notifications
            .lock()
            .push(Notification::PlaybackStateChanged(state));
    }

    fn buffering_state_changed(&self, state: BufferingState) {
        self.notifications
            .lock()
            .push(Notification::BufferingStateChanged(state));
    }

    fn current_time_changed(&self, time: Duration) {
        self.notifications
            .lock()
            .push(Notification::CurrentTimeChanged(time));
    }

    fn playback_will_start_from_beginning(&self) {
        self.notifications
            .lock()
            .push(Notification::WillStartFromBeginning);
    }

    fn playback_did_end(&self) {
        self.notifications.lock().push(Notification::DidEnd);
    }

    fn playback_will_loop(&self) {
        self.notifications.lock().push(Notification::WillLoop);
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub engine: Arc<FakeEngine>,
    pub surface: Arc<FakeSurface>,
    pub delegate: Arc<RecordingDelegate>,
    pub controller: PlaybackController,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(PlayerSettings::default())
    }

    pub fn with_settings(settings: PlayerSettings) -> Self {
        Self::build(settings, Arc::new(InlineExecutor))
    }

    pub fn build(settings: PlayerSettings, executor: Arc<dyn MainThreadExecutor>) -> Self {
        let engine = Arc::new(FakeEngine::default());
        let surface = Arc::new(FakeSurface::default());
        let config = PlayerConfig::builder()
            .engine(engine.clone())
            .surface(surface.clone())
            .executor(executor)
            .settings(settings)
            .build()
            .expect("valid config");

        let controller = PlaybackController::new(config);
        let delegate = Arc::new(RecordingDelegate::default());
        controller.set_delegate(&delegate);

        Self {
            engine,
            surface,
            delegate,
            controller,
        }
    }

    /// Load `location` and resolve its asset; returns the new engine item.
    pub fn load_ready(&self, location: &str) -> Arc<FakeItem> {
        self.controller.load(MediaSource::file(location), None);
        self.engine.last_asset().complete();
        self.engine.last_item()
    }

    /// Load, resolve and start playing; clears recorded calls afterwards.
    pub fn playing(&self, location: &str) -> Arc<FakeItem> {
        let item = self.load_ready(location);
        self.controller.play_from_current_time();
        self.engine.clear_calls();
        self.delegate.take();
        item
    }
}
