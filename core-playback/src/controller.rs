//! # Playback Controller
//!
//! State machine over a host media engine.
//!
//! ## Overview
//!
//! The controller owns two independent state axes, [`PlaybackState`] and
//! [`BufferingState`], exposes the command surface (`load`, `play_*`,
//! `pause`, `stop`, `seek`, `snapshot`) and maps engine notifications onto
//! those states:
//!
//! - buffering signals drive `Ready`/`Delayed` and resume a stalled engine
//! - item status drives surface visibility and `Failed`
//! - end-of-item applies the loop / freeze / rewind-then-stop policy
//!
//! ## Threading
//!
//! Commands are expected on the designated thread. Engine callbacks may
//! arrive on any thread and are marshaled through the host
//! [`MainThreadExecutor`] before they touch state. Every callback carries the
//! load generation it was registered for; callbacks from a superseded load
//! are dropped.
//!
//! State changes are computed under the internal lock as a list of effects
//! (notifications, engine commands) that run after the lock is released, so
//! delegates and engines may call back into the controller.

use crate::config::{PlayerConfig, PlayerSettings};
use crate::delegate::{DelegateSlot, Notification, PlayerDelegate};
use crate::dispatch::run_on_main;
use crate::error::{PlaybackError, Result};
use crate::policy::{self, EndOfMediaAction};
use crate::session::{PendingLoad, PlaybackSession};
use crate::state::ObservedValue;

use bridge_traits::dispatch::MainThreadExecutor;
use bridge_traits::engine::{
    AssetKey, AssetKeyStatus, ItemEvent, ItemStatus, MediaEngine, PlayerItem, SeekCompletion,
    SurfaceEvent, VideoSurface,
};
use bridge_traits::playback::{
    BufferingState, FillMode, MediaSource, PlaybackSessionId, PlaybackState, SeekTolerance,
    VideoFrame, VideoSize,
};
use bridge_traits::subscription::Subscription;
use core_runtime::events::{CoreEvent, EventBus};
use core_runtime::logging::{describe_source, redact_if_sensitive};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info, info_span, trace, warn};

// ============================================================================
// Effects
// ============================================================================

/// Work decided under the state lock and performed after releasing it.
enum Effect {
    Notify(Notification),
    EnginePlay,
    EnginePause,
    Seek {
        item: Arc<dyn PlayerItem>,
        to: Duration,
        tolerance: SeekTolerance,
        /// Stop once the seek completes, if the load generation still matches.
        then_stop: Option<u64>,
    },
    /// Bind engine output to the surface and unhide it.
    ShowSurface,
}

// ============================================================================
// Controller State
// ============================================================================

struct ControllerState {
    settings: PlayerSettings,
    playback: ObservedValue<PlaybackState>,
    buffering: ObservedValue<BufferingState>,
    /// Incremented by every `load`.
    generation: u64,
    pending: Option<PendingLoad>,
    session: Option<PlaybackSession>,
}

impl ControllerState {
    fn new(settings: PlayerSettings) -> Self {
        Self {
            playback: ObservedValue::new(PlaybackState::Stopped, settings.playback_edge_triggered),
            buffering: ObservedValue::new(
                BufferingState::Unknown,
                settings.buffering_edge_triggered,
            ),
            settings,
            generation: 0,
            pending: None,
            session: None,
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    fn set_playback(&mut self, state: PlaybackState, effects: &mut Vec<Effect>) {
        let previous = self.playback.get();
        if self.playback.set(state) {
            if previous != state {
                info!(from = %previous, to = %state, "playback state changed");
            }
            effects.push(Effect::Notify(Notification::PlaybackStateChanged(state)));
        }
    }

    fn set_buffering(&mut self, state: BufferingState, effects: &mut Vec<Effect>) {
        let previous = self.buffering.get();
        if self.buffering.set(state) {
            if previous != state {
                debug!(from = %previous, to = %state, "buffering state changed");
            }
            effects.push(Effect::Notify(Notification::BufferingStateChanged(state)));
        }
    }

    fn play_from_current_time(&mut self, effects: &mut Vec<Effect>) {
        if self.playback.get() == PlaybackState::Playing {
            trace!("already playing");
            return;
        }
        self.set_playback(PlaybackState::Playing, effects);
        effects.push(Effect::EnginePlay);
    }

    fn pause(&mut self, effects: &mut Vec<Effect>) {
        if self.playback.get() != PlaybackState::Playing {
            return;
        }
        effects.push(Effect::EnginePause);
        self.set_playback(PlaybackState::Paused, effects);
    }

    fn stop(&mut self, effects: &mut Vec<Effect>) {
        if self.playback.get() == PlaybackState::Stopped {
            return;
        }
        effects.push(Effect::EnginePause);
        self.set_playback(PlaybackState::Stopped, effects);
        effects.push(Effect::Notify(Notification::DidEnd));
    }

    fn seek_effect(&self, to: Duration, tolerance: SeekTolerance) -> Option<Effect> {
        self.session.as_ref().map(|session| Effect::Seek {
            item: Arc::clone(&session.item),
            to,
            tolerance,
            then_stop: None,
        })
    }

    /// Mark buffering ready and resume the engine if this ends a stall.
    fn buffering_ready(&mut self, effects: &mut Vec<Effect>) {
        let previous = self.buffering.get();
        self.set_buffering(BufferingState::Ready, effects);
        if policy::should_auto_resume(self.playback.get(), previous, BufferingState::Ready) {
            debug!("buffer recovered, resuming engine");
            effects.push(Effect::EnginePlay);
        }
    }

    fn end_of_media(&mut self, generation: u64, effects: &mut Vec<Effect>) {
        let action =
            EndOfMediaAction::select(self.settings.looping, self.settings.freeze_at_end);
        debug!(?action, "played to end");

        match action {
            EndOfMediaAction::Loop => {
                effects.push(Effect::Notify(Notification::WillLoop));
                effects.extend(self.seek_effect(Duration::ZERO, SeekTolerance::EXACT));
            }
            EndOfMediaAction::Freeze => self.stop(effects),
            EndOfMediaAction::RewindThenStop => match self.session.as_ref() {
                Some(session) => effects.push(Effect::Seek {
                    item: Arc::clone(&session.item),
                    to: Duration::ZERO,
                    tolerance: SeekTolerance::EXACT,
                    then_stop: Some(generation),
                }),
                None => self.stop(effects),
            },
        }
    }

    fn fail_item(&mut self, error: PlaybackError, effects: &mut Vec<Effect>) {
        warn!(error = %error, "playback failed");
        self.set_playback(PlaybackState::Failed, effects);
    }

    fn current_time(&self) -> Duration {
        self.session
            .as_ref()
            .map_or(Duration::ZERO, |session| session.item.current_time())
    }
}

// ============================================================================
// Shared Core
// ============================================================================

struct Shared {
    engine: Arc<dyn MediaEngine>,
    surface: Arc<dyn VideoSurface>,
    executor: Arc<dyn MainThreadExecutor>,
    event_bus: Option<EventBus>,
    delegate: DelegateSlot,
    state: Mutex<ControllerState>,
    /// Engine time observer and surface observer.
    subscriptions: Mutex<Vec<Subscription>>,
}

impl Shared {
    /// Run `f` under the state lock, then perform the effects it produced.
    fn mutate<F>(self: &Arc<Self>, f: F)
    where
        F: FnOnce(&mut ControllerState, &mut Vec<Effect>),
    {
        let mut effects = Vec::new();
        {
            let mut state = self.state.lock();
            f(&mut state, &mut effects);
        }
        self.apply(effects);
    }

    fn apply(self: &Arc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Notify(notification) => self.notify(notification),
                Effect::EnginePlay => self.engine.play(),
                Effect::EnginePause => self.engine.pause(),
                Effect::Seek {
                    item,
                    to,
                    tolerance,
                    then_stop,
                } => {
                    let completion = then_stop.map(|generation| self.stop_after_seek(generation));
                    item.seek(to, tolerance, completion);
                }
                Effect::ShowSurface => {
                    self.surface.set_player_attached(true);
                    self.surface.set_hidden(false);
                }
            }
        }
    }

    fn notify(&self, notification: Notification) {
        if let Some(delegate) = self.delegate.get() {
            notification.deliver(delegate.as_ref());
        }
        if let Some(bus) = &self.event_bus {
            // No subscribers is fine
            let _ = bus.emit(CoreEvent::Playback(notification.to_event()));
        }
    }

    fn stop_after_seek(self: &Arc<Self>, generation: u64) -> SeekCompletion {
        let weak = Arc::downgrade(self);
        let executor = Arc::clone(&self.executor);
        Box::new(move |finished| {
            run_on_main(executor.as_ref(), move || {
                if let Some(shared) = weak.upgrade() {
                    shared.on_rewind_complete(generation, finished);
                }
            });
        })
    }

    fn on_rewind_complete(self: &Arc<Self>, generation: u64, finished: bool) {
        self.mutate(|state, effects| {
            if !state.is_current(generation) {
                trace!(generation, "dropping rewind completion from superseded load");
                return;
            }
            debug!(finished, "rewind complete, stopping");
            state.stop(effects);
        });
    }

    fn fail_load(self: &Arc<Self>, generation: u64, error: &PlaybackError) {
        self.mutate(|state, effects| {
            if !state.is_current(generation) {
                return;
            }
            warn!(error = %error, "media source failed to load");
            state.set_playback(PlaybackState::Failed, effects);
        });
    }

    fn on_asset_loaded(self: &Arc<Self>, generation: u64) {
        let pending = {
            let mut state = self.state.lock();
            if !state.is_current(generation) {
                trace!(generation, "dropping asset completion from superseded load");
                return;
            }
            state.pending.take()
        };
        let Some(pending) = pending else {
            return;
        };

        let span = pending.span.clone();
        let _entered = span.enter();

        match self.prepare_session(pending) {
            Ok(session) => self.install_session(session),
            Err(error) => self.fail_load(generation, &error),
        }
    }

    /// Validate the resolved asset and build its item. Runs without the lock.
    fn prepare_session(self: &Arc<Self>, pending: PendingLoad) -> Result<PlaybackSession> {
        for key in AssetKey::REQUIRED {
            if let AssetKeyStatus::Failed { message } = pending.asset.status_of_value(key) {
                return Err(PlaybackError::SourceValidation { key, message });
            }
        }
        if !pending.asset.is_playable() {
            return Err(PlaybackError::SourceNotPlayable);
        }

        let item = self.engine.create_item(Arc::clone(&pending.asset))?;
        if let Some(start) = pending.start_time {
            debug!(start_ms = start.as_millis() as u64, "seeking to start time");
            item.seek(start, SeekTolerance::EXACT, None);
        }

        let subscription = item.observe(self.item_observer(pending.generation));
        Ok(PlaybackSession::new(pending, item, subscription))
    }

    fn install_session(self: &Arc<Self>, session: PlaybackSession) {
        let item = Arc::clone(&session.item);
        let looping = {
            let mut state = self.state.lock();
            if !state.is_current(session.generation) {
                trace!("dropping session prepared for superseded load");
                return;
            }
            debug!(
                session_id = %session.id,
                observing = session.is_observing(),
                "session installed"
            );
            state.session = Some(session);
            state.settings.looping
        };

        self.engine
            .set_action_at_item_end(policy::action_at_item_end(looping));
        self.engine.replace_current_item(Some(item));
    }

    fn item_observer(self: &Arc<Self>, generation: u64) -> bridge_traits::engine::ItemObserver {
        let weak = Arc::downgrade(self);
        let executor = Arc::clone(&self.executor);
        Arc::new(move |event: ItemEvent| {
            let weak = weak.clone();
            run_on_main(executor.as_ref(), move || {
                if let Some(shared) = weak.upgrade() {
                    shared.on_item_event(generation, event);
                }
            });
        })
    }

    fn on_item_event(self: &Arc<Self>, generation: u64, event: ItemEvent) {
        self.mutate(|state, effects| {
            if !state.is_current(generation) {
                trace!(generation, ?event, "dropping item event from superseded load");
                return;
            }
            let _entered = state
                .session
                .as_ref()
                .map(|session| session.span.clone().entered());

            match event {
                ItemEvent::StatusChanged(ItemStatus::ReadyToPlay) => {
                    debug!("item ready to play");
                    effects.push(Effect::ShowSurface);
                }
                ItemEvent::StatusChanged(ItemStatus::Failed { message }) => {
                    state.fail_item(PlaybackError::ItemFailed(message), effects);
                }
                ItemEvent::StatusChanged(ItemStatus::Unknown) => {}
                ItemEvent::PlaybackLikelyToKeepUp(true) => state.buffering_ready(effects),
                ItemEvent::PlaybackBufferEmpty(true) => {
                    state.set_buffering(BufferingState::Delayed, effects)
                }
                ItemEvent::PlaybackLikelyToKeepUp(false) | ItemEvent::PlaybackBufferEmpty(false) => {}
                ItemEvent::LoadedTimeRangesChanged(ranges) => {
                    if state.session.is_none() {
                        return;
                    }
                    let current = state.current_time();
                    let threshold = state.settings.buffer_threshold();
                    if policy::lookahead_sufficient(&ranges, current, threshold) {
                        state.buffering_ready(effects);
                    }
                }
                ItemEvent::DidPlayToEnd => state.end_of_media(generation, effects),
                ItemEvent::FailedToPlayToEnd { message } => {
                    debug!("item failed before reaching the end");
                    state.fail_item(PlaybackError::ItemFailed(message), effects);
                }
            }
        });
    }

    fn register_observers(self: &Arc<Self>, tick_interval: Duration) {
        let weak = Arc::downgrade(self);
        let executor = Arc::clone(&self.executor);
        let time_subscription = self.engine.add_periodic_time_observer(
            tick_interval,
            Arc::new(move |time: Duration| {
                let weak = weak.clone();
                run_on_main(executor.as_ref(), move || {
                    if let Some(shared) = weak.upgrade() {
                        shared.notify(Notification::CurrentTimeChanged(time));
                    }
                });
            }),
        );

        let weak = Arc::downgrade(self);
        let executor = Arc::clone(&self.executor);
        let surface_subscription = self.surface.observe(Arc::new(move |event: SurfaceEvent| {
            let SurfaceEvent::ReadyForDisplay(ready) = event;
            if !ready {
                return;
            }
            let weak = weak.clone();
            run_on_main(executor.as_ref(), move || {
                if let Some(shared) = weak.upgrade() {
                    shared.notify(Notification::Ready);
                }
            });
        }));

        let mut subscriptions = self.subscriptions.lock();
        subscriptions.push(time_subscription);
        subscriptions.push(surface_subscription);
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.engine.pause();
        let state = self.state.get_mut();
        state.pending = None;
        if state.session.take().is_some() {
            self.engine.replace_current_item(None);
        }
        debug!("playback controller released");
    }
}

// ============================================================================
// Public Handle
// ============================================================================

/// Playback controller handle.
///
/// Cheap to clone; all clones drive the same player. The engine is paused and
/// its item released when the last handle is dropped.
///
/// # Example
///
/// ```ignore
/// use core_playback::{PlaybackController, PlayerConfig};
/// use bridge_traits::playback::MediaSource;
///
/// let config = PlayerConfig::builder()
///     .engine(engine)
///     .surface(surface)
///     .executor(executor)
///     .build()?;
///
/// let controller = PlaybackController::new(config);
/// controller.set_delegate(&my_delegate);
/// controller.load(MediaSource::url("https://cdn.example.com/intro.m3u8"), None);
/// controller.play_from_beginning();
/// ```
#[derive(Clone)]
pub struct PlaybackController {
    shared: Arc<Shared>,
}

/// Non-owning controller handle.
#[derive(Clone)]
pub struct WeakPlaybackController {
    shared: Weak<Shared>,
}

impl WeakPlaybackController {
    pub fn upgrade(&self) -> Option<PlaybackController> {
        self.shared
            .upgrade()
            .map(|shared| PlaybackController { shared })
    }
}

impl PlaybackController {
    /// Create a controller and apply the configured settings to the engine
    /// and surface. The surface starts hidden until the first item is ready.
    pub fn new(config: PlayerConfig) -> Self {
        let PlayerConfig {
            engine,
            surface,
            executor,
            event_bus,
            mut settings,
        } = config;

        settings.volume = clamp_volume(settings.volume);
        engine.set_muted(settings.muted);
        engine.set_volume(settings.volume);
        engine.set_action_at_item_end(policy::action_at_item_end(settings.looping));
        surface.set_fill_mode(settings.fill_mode);
        surface.set_hidden(true);

        let tick_interval = settings.time_tick_interval();
        let shared = Arc::new(Shared {
            engine,
            surface,
            executor,
            event_bus,
            delegate: DelegateSlot::default(),
            state: Mutex::new(ControllerState::new(settings)),
            subscriptions: Mutex::new(Vec::new()),
        });
        shared.register_observers(tick_interval);

        Self { shared }
    }

    pub fn downgrade(&self) -> WeakPlaybackController {
        WeakPlaybackController {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Set the delegate. Only a weak reference is kept.
    pub fn set_delegate<D: PlayerDelegate + 'static>(&self, delegate: &Arc<D>) {
        self.shared.delegate.set(delegate);
    }

    pub fn clear_delegate(&self) {
        self.shared.delegate.clear();
    }

    /// Run `job` on the designated thread; inline when already there.
    pub fn run_on_main<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        run_on_main(self.shared.executor.as_ref(), job);
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Replace the current media source.
    ///
    /// Returns immediately. The previous session's observers are released
    /// right away; the new source is validated asynchronously and either
    /// becomes the engine's current item or moves the controller to
    /// [`PlaybackState::Failed`].
    pub fn load(&self, source: MediaSource, start_time: Option<Duration>) {
        let id = PlaybackSessionId::new();
        let span = info_span!(
            "playback_session",
            session_id = %id,
            source = %describe_source(&source)
        );
        let _entered = span.enter();
        info!(remote = source.is_remote(), "loading media source");
        if let MediaSource::RemoteUrl { headers, .. } = &source {
            for (name, value) in headers {
                trace!(header = %name, value = %redact_if_sensitive(name, value), "request header");
            }
        }

        let shared = &self.shared;
        let mut effects = Vec::new();
        let (generation, previous_session, previous_pending) = {
            let mut state = shared.state.lock();
            state.pause(&mut effects);
            state.set_buffering(BufferingState::Unknown, &mut effects);
            state.generation += 1;
            (
                state.generation,
                state.session.take(),
                state.pending.take(),
            )
        };
        // Releasing the old session cancels its item observer.
        drop(previous_session);
        drop(previous_pending);
        shared.apply(effects);

        let asset = match shared.engine.open_asset(&source) {
            Ok(asset) => asset,
            Err(error) => {
                shared.fail_load(generation, &PlaybackError::Bridge(error));
                return;
            }
        };

        {
            let mut state = shared.state.lock();
            if !state.is_current(generation) {
                return;
            }
            state.pending = Some(PendingLoad {
                generation,
                id,
                source,
                start_time,
                asset: Arc::clone(&asset),
                span: span.clone(),
            });
        }

        let weak = Arc::downgrade(shared);
        let executor = Arc::clone(&shared.executor);
        asset.load_values_async(
            &AssetKey::REQUIRED,
            Box::new(move || {
                run_on_main(executor.as_ref(), move || {
                    if let Some(shared) = weak.upgrade() {
                        shared.on_asset_loaded(generation);
                    }
                });
            }),
        );
    }

    /// Notify "will start from beginning", rewind, then play.
    pub fn play_from_beginning(&self) {
        debug!("play from beginning");
        self.shared.mutate(|state, effects| {
            effects.push(Effect::Notify(Notification::WillStartFromBeginning));
            effects.extend(state.seek_effect(Duration::ZERO, SeekTolerance::EXACT));
            state.play_from_current_time(effects);
        });
    }

    /// Start playing. No-op while already playing.
    pub fn play_from_current_time(&self) {
        debug!("play from current time");
        self.shared
            .mutate(|state, effects| state.play_from_current_time(effects));
    }

    /// Pause. No-op unless playing.
    pub fn pause(&self) {
        debug!("pause");
        self.shared.mutate(|state, effects| state.pause(effects));
    }

    /// Pause the engine, move to `Stopped` and notify "did end". No-op while
    /// already stopped.
    pub fn stop(&self) {
        debug!("stop");
        self.shared.mutate(|state, effects| state.stop(effects));
    }

    /// Frame-exact seek. No-op without a loaded source.
    pub fn seek(&self, to: Duration) {
        self.seek_with_tolerance(to, Duration::ZERO, Duration::ZERO);
    }

    /// Seek allowing the engine to land within the given tolerances.
    pub fn seek_with_tolerance(&self, to: Duration, before: Duration, after: Duration) {
        let tolerance = SeekTolerance::new(before, after);
        self.shared.mutate(|state, effects| match state.seek_effect(to, tolerance) {
            Some(effect) => {
                debug!(to_ms = to.as_millis() as u64, "seek");
                effects.push(effect);
            }
            None => debug!("seek ignored, no media loaded"),
        });
    }

    /// Capture the frame at the current time. `None` without a loaded source
    /// or when the host cannot produce an image.
    pub fn snapshot(&self) -> Option<VideoFrame> {
        match self.capture_frame() {
            Ok(frame) => Some(frame),
            Err(error) => {
                debug!(error = %error, "snapshot failed");
                None
            }
        }
    }

    fn capture_frame(&self) -> Result<VideoFrame> {
        let (asset, item) = {
            let state = self.shared.state.lock();
            let session = state.session.as_ref().ok_or(PlaybackError::NoSessionLoaded)?;
            (Arc::clone(&session.asset), Arc::clone(&session.item))
        };
        Ok(asset.generate_image(item.current_time())?)
    }

    // ------------------------------------------------------------------------
    // Read-only state
    // ------------------------------------------------------------------------

    pub fn playback_state(&self) -> PlaybackState {
        self.shared.state.lock().playback.get()
    }

    pub fn buffering_state(&self) -> BufferingState {
        self.shared.state.lock().buffering.get()
    }

    /// Current media time; zero without a loaded source.
    pub fn current_time(&self) -> Duration {
        self.shared.state.lock().current_time()
    }

    /// Item duration; `None` without a loaded source or while indefinite.
    pub fn maximum_duration(&self) -> Option<Duration> {
        let state = self.shared.state.lock();
        state.session.as_ref().and_then(|session| session.item.duration())
    }

    /// Intrinsic size of the loaded media.
    pub fn natural_size(&self) -> Option<VideoSize> {
        let state = self.shared.state.lock();
        state
            .session
            .as_ref()
            .and_then(|session| session.asset.natural_size())
    }

    /// Identifier of the session currently installed on the engine.
    pub fn session_id(&self) -> Option<PlaybackSessionId> {
        self.shared.state.lock().session.as_ref().map(|session| session.id)
    }

    /// Source of the session currently installed on the engine.
    pub fn source(&self) -> Option<MediaSource> {
        let state = self.shared.state.lock();
        state.session.as_ref().map(|session| session.source.clone())
    }

    pub fn settings(&self) -> PlayerSettings {
        self.shared.state.lock().settings.clone()
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    pub fn is_muted(&self) -> bool {
        self.shared.engine.is_muted()
    }

    pub fn set_muted(&self, muted: bool) {
        self.shared.state.lock().settings.muted = muted;
        self.shared.engine.set_muted(muted);
    }

    pub fn volume(&self) -> f32 {
        self.shared.engine.volume()
    }

    /// Set linear volume. Values outside `0.0..=1.0` are clamped.
    pub fn set_volume(&self, volume: f32) {
        let clamped = clamp_volume(volume);
        self.shared.state.lock().settings.volume = clamped;
        self.shared.engine.set_volume(clamped);
    }

    pub fn fill_mode(&self) -> FillMode {
        self.shared.surface.fill_mode()
    }

    pub fn set_fill_mode(&self, mode: FillMode) {
        self.shared.state.lock().settings.fill_mode = mode;
        self.shared.surface.set_fill_mode(mode);
    }

    pub fn is_looping(&self) -> bool {
        self.shared.state.lock().settings.looping
    }

    /// Also reconfigures the engine's end-of-item action.
    pub fn set_looping(&self, looping: bool) {
        self.shared.state.lock().settings.looping = looping;
        self.shared
            .engine
            .set_action_at_item_end(policy::action_at_item_end(looping));
    }

    pub fn freezes_at_end(&self) -> bool {
        self.shared.state.lock().settings.freeze_at_end
    }

    pub fn set_freeze_at_end(&self, freeze: bool) {
        self.shared.state.lock().settings.freeze_at_end = freeze;
    }

    pub fn buffer_threshold(&self) -> Duration {
        self.shared.state.lock().settings.buffer_threshold()
    }

    pub fn set_buffer_threshold(&self, threshold: Duration) {
        self.shared.state.lock().settings.buffer_threshold_secs = threshold.as_secs_f64();
    }

    /// Set edge-triggered mode for both playback and buffering notifications.
    pub fn set_edge_triggered(&self, edge_triggered: bool) {
        self.set_playback_edge_triggered(edge_triggered);
        self.set_buffering_edge_triggered(edge_triggered);
    }

    pub fn set_playback_edge_triggered(&self, edge_triggered: bool) {
        let mut state = self.shared.state.lock();
        state.settings.playback_edge_triggered = edge_triggered;
        state.playback.set_edge_triggered(edge_triggered);
    }

    pub fn set_buffering_edge_triggered(&self, edge_triggered: bool) {
        let mut state = self.shared.state.lock();
        state.settings.buffering_edge_triggered = edge_triggered;
        state.buffering.set_edge_triggered(edge_triggered);
    }

    pub fn pauses_when_backgrounded(&self) -> bool {
        self.shared.state.lock().settings.pauses_when_backgrounded
    }

    pub fn set_pauses_when_backgrounded(&self, enabled: bool) {
        self.shared.state.lock().settings.pauses_when_backgrounded = enabled;
    }

    pub fn resumes_on_foreground(&self) -> bool {
        self.shared.state.lock().settings.resumes_on_foreground
    }

    pub fn set_resumes_on_foreground(&self, enabled: bool) {
        self.shared.state.lock().settings.resumes_on_foreground = enabled;
    }

    /// Publish a lifecycle transition on the event bus, if one is configured.
    pub(crate) fn publish(&self, event: CoreEvent) {
        if let Some(bus) = &self.shared.event_bus {
            let _ = bus.emit(event);
        }
    }
}

fn clamp_volume(volume: f32) -> f32 {
    let clamped = if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    };
    if clamped != volume {
        warn!(requested = volume, applied = clamped, "volume out of range");
    }
    clamped
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("PlaybackController")
            .field("playback", &state.playback.get())
            .field("buffering", &state.buffering.get())
            .field("session", &state.session.as_ref().map(|s| s.id))
            .finish()
    }
}
