//! Buffering and end-of-media decisions.
//!
//! Pure functions over controller state and engine signals. The controller
//! applies their results; keeping them here makes the rules testable without
//! an engine.

use bridge_traits::engine::ActionAtItemEnd;
use bridge_traits::playback::{BufferingState, PlaybackState, TimeRange};
use std::time::Duration;

/// Seconds of media buffered ahead of `current`, measured against the first
/// loaded range. `None` when nothing is loaded.
pub fn buffered_lookahead(ranges: &[TimeRange], current: Duration) -> Option<Duration> {
    ranges
        .first()
        .map(|range| range.end().saturating_sub(current))
}

/// Whether the loaded ranges put at least `threshold` of media ahead of the
/// playhead.
pub fn lookahead_sufficient(ranges: &[TimeRange], current: Duration, threshold: Duration) -> bool {
    buffered_lookahead(ranges, current).is_some_and(|ahead| ahead >= threshold)
}

/// Whether a buffering transition should re-issue `play` to the engine.
///
/// Only a stall recovering (`Delayed` to `Ready`) while the user intends to
/// play resumes the engine; repeated ready signals do nothing.
pub fn should_auto_resume(
    state: PlaybackState,
    previous: BufferingState,
    next: BufferingState,
) -> bool {
    state == PlaybackState::Playing
        && previous == BufferingState::Delayed
        && next == BufferingState::Ready
}

/// What to do when the current item plays to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfMediaAction {
    /// Notify "will loop" and seek back to zero; keep playing.
    Loop,
    /// Stop on the last frame.
    Freeze,
    /// Seek back to zero, then stop once the seek completes.
    RewindThenStop,
}

impl EndOfMediaAction {
    pub fn select(looping: bool, freeze_at_end: bool) -> Self {
        match (looping, freeze_at_end) {
            (true, _) => EndOfMediaAction::Loop,
            (false, true) => EndOfMediaAction::Freeze,
            (false, false) => EndOfMediaAction::RewindThenStop,
        }
    }
}

/// Engine-side end-of-item behaviour matching the loop flag.
pub fn action_at_item_end(looping: bool) -> ActionAtItemEnd {
    if looping {
        ActionAtItemEnd::None
    } else {
        ActionAtItemEnd::Pause
    }
}
