//! Periodic status logging for the long-running monitor

use std::time::Duration;
use tokio::time::Instant;

/// Paces the stats line the binary logs while the engine runs
pub struct Heartbeat {
    interval: Duration,
    next_due: Instant,
}

impl Heartbeat {
    /// First beat is due one interval from now
    pub fn new(interval_secs: u64) -> Self {
        let interval = Duration::from_secs(interval_secs);
        Self {
            interval,
            next_due: Instant::now() + interval,
        }
    }

    /// Returns true at most once per interval, re-arming on success
    pub fn poll(&mut self) -> bool {
        let now = Instant::now();
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_beats_once_per_interval() {
        let mut heartbeat = Heartbeat::new(300);
        assert!(!heartbeat.poll());

        tokio::time::advance(Duration::from_secs(300)).await;
        assert!(heartbeat.poll());
        assert!(!heartbeat.poll());

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(!heartbeat.poll());
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(heartbeat.poll());
    }

    #[tokio::test]
    async fn test_zero_interval_always_beats() {
        let mut heartbeat = Heartbeat::new(0);
        assert!(heartbeat.poll());
        assert!(heartbeat.poll());
    }
}
