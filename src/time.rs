//! Wall-clock and monotonic-tick abstractions.
//!
//! The recorder reads the wall clock exactly once, when it is built, and
//! pairs that reading with a monotonic tick taken at the same instant.
//! Every later timestamp is derived by adding the elapsed tick delta to the
//! baseline, so reported times are anchored to the epoch but immune to
//! wall-clock adjustments while the process runs.

use std::fmt;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;

/// Source of wall-clock time.
///
/// Implementations must be cheap and thread safe. The recorder consults the
/// clock a single time, at construction.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current wall-clock time in microseconds since the UNIX epoch.
    fn epoch_micros(&self) -> u64;
}

/// Source of monotonic time.
///
/// The origin of the counter is arbitrary; only deltas between readings are
/// meaningful. Readings must never decrease. The recorder does not defend
/// against a ticker that goes backwards, so a non-monotonic implementation
/// produces garbage timestamps.
pub trait Ticker: Send + Sync + fmt::Debug {
    /// Current reading of the monotonic counter, in nanoseconds.
    fn tick_nanos(&self) -> u64;
}

/// Wall clock backed by [`SystemTime`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a system clock.
    pub fn new() -> Self {
        SystemClock
    }
}

impl Clock for SystemClock {
    fn epoch_micros(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as u64
    }
}

// Shared origin so every ticker instance reports on the same scale.
static TICK_ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);

/// Monotonic ticker backed by [`Instant`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTicker;

impl SystemTicker {
    /// Create a system ticker.
    pub fn new() -> Self {
        SystemTicker
    }
}

impl Ticker for SystemTicker {
    fn tick_nanos(&self) -> u64 {
        TICK_ORIGIN.elapsed().as_nanos() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_past_2020() {
        // 2020-01-01T00:00:00Z in micros.
        assert!(SystemClock::new().epoch_micros() > 1_577_836_800_000_000);
    }

    #[test]
    fn system_ticker_never_decreases() {
        let ticker = SystemTicker::new();
        let mut last = ticker.tick_nanos();
        for _ in 0..1_000 {
            let now = ticker.tick_nanos();
            assert!(now >= last);
            last = now;
        }
    }
}
