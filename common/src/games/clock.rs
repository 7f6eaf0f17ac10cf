use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic elapsed-time source used for the search time budget.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Never advances, so the search always runs to completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrozenClock;

impl Clock for FrozenClock {
    fn now(&self) -> Duration {
        Duration::ZERO
    }
}

/// Advances by a fixed step on every read.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    ticks: Arc<AtomicU64>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(step: Duration) -> Self {
        Self {
            ticks: Arc::new(AtomicU64::new(0)),
            step,
        }
    }

    pub fn reads(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Duration {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        self.step.saturating_mul(tick.min(u32::MAX as u64) as u32)
    }
}

/// Blocks the first read until released, holding a search in flight.
#[cfg(test)]
#[derive(Clone)]
pub(crate) struct GatedClock {
    gate: Arc<std::sync::Mutex<Option<std::sync::mpsc::Receiver<()>>>>,
}

#[cfg(test)]
impl GatedClock {
    pub(crate) fn new() -> (Self, std::sync::mpsc::Sender<()>) {
        let (tx, rx) = std::sync::mpsc::channel();
        let clock = Self {
            gate: Arc::new(std::sync::Mutex::new(Some(rx))),
        };
        (clock, tx)
    }
}

#[cfg(test)]
impl Clock for GatedClock {
    fn now(&self) -> Duration {
        let gate = self.gate.lock().unwrap().take();
        if let Some(rx) = gate {
            let _ = rx.recv();
        }
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_clock_never_moves() {
        let clock = FrozenClock;
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_stepping_clock_advances_per_read() {
        let clock = SteppingClock::new(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::from_millis(10));
        assert_eq!(clock.clone().now(), Duration::from_millis(20));
        assert_eq!(clock.reads(), 3);
    }

    #[test]
    fn test_monotonic_clock_is_non_decreasing() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
