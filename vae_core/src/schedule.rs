//! Periodic checkpoint cadence.

/// Decides at which (0-based) epochs a periodic checkpoint is written.
///
/// A checkpoint is due on every multiple of the interval, skipping epoch 0,
/// so an interval of 25 saves after epochs 25, 50, 75, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointSchedule {
    interval: usize,
}

impl CheckpointSchedule {
    /// Save every `interval` epochs. An interval of 0 never saves.
    pub const fn every(interval: usize) -> Self {
        Self { interval }
    }

    /// Schedule that never fires.
    pub const fn never() -> Self {
        Self::every(0)
    }

    /// The configured interval.
    pub const fn interval(&self) -> usize {
        self.interval
    }

    /// Whether a checkpoint is due after `epoch`.
    pub const fn is_due(&self, epoch: usize) -> bool {
        self.interval != 0 && epoch >= self.interval && epoch % self.interval == 0
    }
}

impl Default for CheckpointSchedule {
    fn default() -> Self {
        Self::every(25)
    }
}
