//! Timing and cancellation primitives
//!
//! The sequencer's deadlines are driven by an injectable monotonic clock so
//! tests can simulate the ~19.5 s session without real delays. Cancellation
//! is a cloneable token checked at every observation-loop iteration and
//! between stimuli.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Fixed per-stimulus timing windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Blank-screen settle pause before each stimulus, resets visual context
    pub baseline_settle: Duration,
    /// Hold after the stimulus appears, before capture starts; avoids
    /// capturing the startle reflex rather than genuine affect
    pub pre_observation: Duration,
    /// Wall-clock capture window per stimulus
    pub observation_window: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            baseline_settle: Duration::from_secs(1),
            pre_observation: Duration::from_millis(500),
            observation_window: Duration::from_secs(5),
        }
    }
}

/// Monotonic clock abstraction.
///
/// `now` returns elapsed time since an arbitrary fixed origin; only
/// differences are meaningful.
pub trait Clock {
    fn now(&self) -> Duration;
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `Instant` and `thread::sleep`
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic clock for tests.
///
/// Cloneable handle over shared state: sleeping advances time instantly, and
/// mock collaborators holding a clone can advance time from inside the
/// observation loop via [`ManualClock::advance`].
#[derive(Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        self.nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Cooperative cancellation token.
///
/// Cancelling mid-session yields `SessionError::Cancelled`, never a partial
/// score; resources are still released on that path.
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
