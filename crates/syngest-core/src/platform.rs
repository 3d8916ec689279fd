//! Platform abstraction traits for the frame callback runtime.
//!
//! Hosts plug in here: a window loop schedules frames when the runtime asks
//! for one, and a clock supplies the timestamps handed to frame callbacks.

use web_time::Instant;

/// Schedules work for the runtime.
///
/// Implementations are responsible for arranging that the host drains the
/// runtime's frame callbacks soon. They must be safe to use from multiple
/// threads because task wakers may fire from anywhere.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Provides timing information for the runtime.
pub trait Clock: Send + Sync {
    /// Instant type produced by this clock implementation.
    type Instant: Copy + Send + Sync;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of nanoseconds elapsed since `since`.
    fn elapsed_nanos(&self, since: Self::Instant) -> u64;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64 {
        self.elapsed_nanos(since) / 1_000_000
    }
}

/// Wall clock backed by `web_time::Instant`, which also works on wasm.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed_nanos(&self, since: Instant) -> u64 {
        let elapsed = Instant::now().saturating_duration_since(since);
        u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
    }
}

#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}
