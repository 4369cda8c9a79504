//! Single-slot rest timer.
//!
//! The timer itself never schedules anything. `start` hands back a
//! [`TimerToken`]; whoever drives the clock calls [`RestTimer::tick`] with
//! that token once per second. Every `start` and `cancel` retires all
//! previously issued tokens, so a tick scheduled for a superseded countdown
//! can never touch the current one.

/// Identifies one started countdown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Result of applying one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Token no longer current; nothing changed
    Stale,
    /// Decremented and still running
    Ticking,
    /// Decremented to zero and stopped
    Expired,
}

#[derive(Clone, Debug, Default)]
pub struct RestTimer {
    seconds_remaining: u32,
    running: bool,
    generation: u64,
}

impl RestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start (or restart) the countdown, superseding any running one
    pub fn start(&mut self, seconds: u32) -> TimerToken {
        self.generation += 1;
        self.seconds_remaining = seconds;
        self.running = seconds > 0;
        tracing::debug!(seconds, generation = self.generation, "Rest timer started");
        TimerToken(self.generation)
    }

    /// Stop and clear the countdown. Idempotent.
    pub fn cancel(&mut self) {
        if self.running {
            tracing::debug!(
                remaining = self.seconds_remaining,
                "Rest timer cancelled"
            );
        }
        self.generation += 1;
        self.seconds_remaining = 0;
        self.running = false;
    }

    /// Whether `token` belongs to the countdown currently running
    pub fn is_current(&self, token: TimerToken) -> bool {
        self.running && token.0 == self.generation
    }

    /// Apply one elapsed second on behalf of `token`
    pub fn tick(&mut self, token: TimerToken) -> TickOutcome {
        if !self.is_current(token) {
            return TickOutcome::Stale;
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.running = false;
            tracing::debug!("Rest timer expired");
            TickOutcome::Expired
        } else {
            TickOutcome::Ticking
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_sets_countdown() {
        let mut timer = RestTimer::new();
        assert!(!timer.is_running());

        let token = timer.start(90);
        assert!(timer.is_running());
        assert_eq!(timer.seconds_remaining(), 90);
        assert!(timer.is_current(token));
    }

    #[test]
    fn test_ticks_down_to_expiry() {
        let mut timer = RestTimer::new();
        let token = timer.start(3);

        assert_eq!(timer.tick(token), TickOutcome::Ticking);
        assert_eq!(timer.tick(token), TickOutcome::Ticking);
        assert_eq!(timer.seconds_remaining(), 1);
        assert_eq!(timer.tick(token), TickOutcome::Expired);
        assert_eq!(timer.seconds_remaining(), 0);
        assert!(!timer.is_running());

        // Further ticks on an expired countdown are ignored
        assert_eq!(timer.tick(token), TickOutcome::Stale);
        assert_eq!(timer.seconds_remaining(), 0);
    }

    #[test]
    fn test_restart_supersedes_old_token() {
        let mut timer = RestTimer::new();
        let old = timer.start(90);
        for _ in 0..30 {
            timer.tick(old);
        }
        assert_eq!(timer.seconds_remaining(), 60);

        let new = timer.start(90);
        assert_eq!(timer.seconds_remaining(), 90);
        assert_eq!(timer.tick(old), TickOutcome::Stale);
        assert_eq!(timer.seconds_remaining(), 90);
        assert_eq!(timer.tick(new), TickOutcome::Ticking);
        assert_eq!(timer.seconds_remaining(), 89);
    }

    #[test]
    fn test_cancel_is_idempotent_and_retires_token() {
        let mut timer = RestTimer::new();
        let token = timer.start(90);

        timer.cancel();
        timer.cancel();
        assert!(!timer.is_running());
        assert_eq!(timer.seconds_remaining(), 0);
        assert_eq!(timer.tick(token), TickOutcome::Stale);
    }
}
