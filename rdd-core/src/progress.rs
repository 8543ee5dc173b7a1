//! Progress tracking for a running transfer.

/// Receives progress updates from the copy loop.
///
/// Calls happen synchronously on the copying thread, so implementations must
/// not block.
pub trait ProgressSink {
    /// Called once before copying, with the expected byte count if known.
    fn start(&mut self, _total: Option<u64>) {}

    /// Called with the new position after every chunk or extent.
    fn update(&mut self, position: u64);

    /// Called once after the last update of a successful copy.
    fn finish(&mut self) {}
}

/// A sink that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&mut self, _position: u64) {}
}

/// Monotone byte counter that forwards changes to a [`ProgressSink`].
///
/// The position never decreases and never exceeds the total once the total
/// is known.
pub struct ProgressState<'a> {
    position: u64,
    total: Option<u64>,
    sink: &'a mut dyn ProgressSink,
}

impl<'a> ProgressState<'a> {
    pub fn new(total: Option<u64>, sink: &'a mut dyn ProgressSink) -> Self {
        sink.start(total);
        Self {
            position: 0,
            total,
            sink,
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Adds `bytes` to the position.
    pub fn advance(&mut self, bytes: u64) {
        self.set(self.position.saturating_add(bytes));
    }

    /// Moves the position forward to `position`; earlier positions are ignored.
    pub fn set(&mut self, position: u64) {
        let position = match self.total {
            Some(total) => position.min(total),
            None => position,
        };
        if position > self.position {
            self.position = position;
            self.sink.update(position);
        }
    }

    /// Jumps to the total, if known, and notifies the sink that copying ended.
    pub fn complete(&mut self) {
        if let Some(total) = self.total {
            self.set(total);
        }
        self.sink.finish();
    }
}
