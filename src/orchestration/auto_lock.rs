use std::time::Duration;

use tokio::time::Instant;

/// Single-shot inactivity timer. It only tracks a deadline; whoever drives
/// the manager turns the deadline into an `AutoLockTimerExpired` message.
#[derive(Debug, Clone)]
pub struct AutoLockTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl AutoLockTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// (Re)arm for one full interval from now.
    pub fn start(&mut self) {
        self.deadline = Some(Instant::now() + self.interval);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Takes effect on the next `start()`.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn restart(&mut self, interval: Duration) {
        self.interval = interval;
        self.start();
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Phone lock bookkeeping relevant to auto-lock decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhoneLockState {
    pub locked: bool,
    pub tethering: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timer_deadlines() {
        let mut timer = AutoLockTimer::new(Duration::from_secs(30));
        assert!(!timer.is_active());

        let started = Instant::now();
        timer.start();
        assert_eq!(timer.deadline(), Some(started + Duration::from_secs(30)));

        tokio::time::advance(Duration::from_secs(10)).await;
        timer.restart(Duration::from_secs(60));
        assert_eq!(timer.interval(), Duration::from_secs(60));
        assert_eq!(timer.deadline(), Some(started + Duration::from_secs(70)));

        timer.stop();
        assert!(timer.deadline().is_none());
    }
}
