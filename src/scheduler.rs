use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Fixed-rate trigger source for the sampling loop.
///
/// Owns its cadence state explicitly: the period, the next-fire deadline and
/// a count of dropped triggers. The tick body runs on the caller's thread,
/// so at most one tick ever executes at a time; a trigger that elapses while
/// a tick is still running is dropped, never queued.
pub struct Scheduler {
    period: Duration,
    skipped: u64,
}

impl Scheduler {
    /// `period` must be non-zero.
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "scheduler period must be non-zero");
        Self { period, skipped: 0 }
    }

    /// Drive `tick` at the configured cadence, first firing immediately,
    /// until `shutdown` signals or its sender side goes away.
    ///
    /// The shutdown channel is observed only between ticks, so a signal
    /// never interrupts a partially-emitted tick. Returns the number of
    /// triggers dropped because a tick overran its period.
    pub fn run<F: FnMut()>(mut self, shutdown: &Receiver<()>, mut tick: F) -> u64 {
        let mut next = Instant::now();
        loop {
            let wait = next.saturating_duration_since(Instant::now());
            match shutdown.recv_timeout(wait) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return self.skipped,
                Err(RecvTimeoutError::Timeout) => {}
            }

            tick();

            next += self.period;
            let now = Instant::now();
            if now > next {
                // The tick overran: the triggers that elapsed meanwhile are
                // dropped and the cadence re-aligns to the next future slot.
                let missed = missed_triggers(now.duration_since(next), self.period);
                self.skipped += missed;
                next += self.period * missed as u32;
            }
        }
    }
}

/// How many triggers elapsed while a tick overran its deadline by `late`.
fn missed_triggers(late: Duration, period: Duration) -> u64 {
    (late.as_nanos() / period.as_nanos()) as u64 + 1
}
