//! Fixed-duration per-round countdown.

use std::time::Duration;

use tokio::time::sleep;

/// Drives one round's countdown, emitting a tick per whole second.
///
/// Purely time-driven; it is not cancellable mid-round. The round loop checks
/// the session phase between rounds instead.
pub struct RoundTimer {
    total_secs: u64,
}

impl RoundTimer {
    /// Create a timer for a round of the given duration.
    pub fn new(total_secs: u64) -> Self {
        Self { total_secs }
    }

    /// Run the countdown, calling `on_tick(time_left, total)` once per second
    /// starting at the full duration.
    pub async fn run<F>(self, mut on_tick: F)
    where
        F: FnMut(u64, u64),
    {
        for time_left in (1..=self.total_secs).rev() {
            on_tick(time_left, self.total_secs);
            sleep(Duration::from_secs(1)).await;
        }
    }
}
