use std::time::Duration;

/// Accumulates elapsed time and fires once it passes the drop interval.
///
/// At most one drop fires per [`advance`](Self::advance) call, however much
/// time was added; the surplus is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTimer {
    interval: Duration,
    elapsed: Duration,
}

impl DropTimer {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Time accumulated since the last drop or reset.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Adds `delta` and returns `true` if a drop is due.
    ///
    /// A drop is due once the accumulated time is strictly greater than the
    /// interval; the accumulator then restarts from zero.
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(delta);
        if self.elapsed > self.interval {
            self.reset();
            return true;
        }
        false
    }
}
