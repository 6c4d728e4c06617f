use std::time::Duration;

/// First reconnect delay after a drop.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
/// Reconnect delays never grow past this.
pub const DEFAULT_DELAY_CAP: Duration = Duration::from_secs(30);

/// Capped exponential reconnect backoff. Delays double per failed attempt
/// and reset once a connection is established.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    cap: Duration,
    next: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_DELAY, DEFAULT_DELAY_CAP)
    }
}

impl Backoff {
    pub fn new(initial: Duration, cap: Duration) -> Self {
        let cap = cap.max(initial);
        Self {
            initial,
            cap,
            next: initial,
        }
    }

    /// Delay to wait before the next attempt; advances the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = delay.checked_mul(2).unwrap_or(self.cap).min(self.cap);
        delay
    }

    /// Called after a successful connection.
    pub fn reset(&mut self) {
        self.next = self.initial;
    }
}
