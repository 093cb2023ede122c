//! Observed state cells.
//!
//! Playback and buffering state are each stored in an [`ObservedValue`]. A
//! write reports whether observers should hear about it: in edge-triggered
//! mode only when the value changed, otherwise on every write.

/// A value whose writes may notify observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedValue<T> {
    value: T,
    edge_triggered: bool,
}

impl<T: Copy + PartialEq> ObservedValue<T> {
    pub fn new(value: T, edge_triggered: bool) -> Self {
        Self {
            value,
            edge_triggered,
        }
    }

    pub fn get(&self) -> T {
        self.value
    }

    /// Store `value`. Returns `true` when observers should be notified.
    pub fn set(&mut self, value: T) -> bool {
        let changed = self.value != value;
        self.value = value;
        changed || !self.edge_triggered
    }

    pub fn is_edge_triggered(&self) -> bool {
        self.edge_triggered
    }

    pub fn set_edge_triggered(&mut self, edge_triggered: bool) {
        self.edge_triggered = edge_triggered;
    }
}
