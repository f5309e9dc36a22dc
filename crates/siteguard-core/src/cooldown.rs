//! Process-wide silence window after any violation.

/// Suppression window shared by every track.
///
/// A violation anywhere silences the whole system: the assumption is that
/// remediation for the incident is already in motion, so further events
/// would only restate it. The window extends on overlapping triggers and
/// never shortens.
#[derive(Debug, Clone)]
pub struct GlobalCooldown {
    active: bool,
    until: f64,
    silence_secs: f64,
}

impl GlobalCooldown {
    pub fn new(silence_secs: f64) -> Self {
        Self {
            active: false,
            until: 0.0,
            silence_secs,
        }
    }

    /// True while the silence window is open
    pub fn is_active(&self, now: f64) -> bool {
        now < self.until
    }

    /// Open (or extend) the silence window.
    ///
    /// `until` advances to `max(until, now) + silence_secs`: a trigger
    /// landing inside an open window stacks onto its end instead of
    /// restarting from `now`.
    pub fn trigger(&mut self, now: f64) {
        self.until = self.until.max(now) + self.silence_secs;
        self.active = true;
    }

    /// Per-frame bookkeeping; returns true exactly once, on the frame the
    /// window closes. The caller is expected to reset its track state then.
    pub fn tick(&mut self, now: f64) -> bool {
        if self.active && now >= self.until {
            self.active = false;
            return true;
        }
        false
    }

    /// Seconds left in the window, 0 when inactive
    pub fn remaining(&self, now: f64) -> f64 {
        (self.until - now).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_opens_window() {
        let mut cooldown = GlobalCooldown::new(10.0);
        assert!(!cooldown.is_active(0.0));

        cooldown.trigger(5.0);
        assert!(cooldown.is_active(5.0));
        assert!(cooldown.is_active(14.9));
        assert!(!cooldown.is_active(15.0));
    }

    #[test]
    fn test_overlapping_trigger_extends() {
        let mut cooldown = GlobalCooldown::new(10.0);
        cooldown.trigger(0.0);
        cooldown.trigger(2.0);

        // until = max(10, 2) + 10 = first trigger + 12s, not 2 + 10
        assert!(cooldown.is_active(11.9));
        assert!(cooldown.is_active(19.9));
        assert!(!cooldown.is_active(20.0));
    }

    #[test]
    fn test_tick_fires_once_at_end() {
        let mut cooldown = GlobalCooldown::new(10.0);
        cooldown.trigger(0.0);

        assert!(!cooldown.tick(5.0));
        assert!(cooldown.tick(10.0));
        assert!(!cooldown.tick(11.0)); // already cleared
    }

    #[test]
    fn test_remaining_clamps_at_zero() {
        let mut cooldown = GlobalCooldown::new(10.0);
        cooldown.trigger(0.0);

        assert_eq!(cooldown.remaining(4.0), 6.0);
        assert_eq!(cooldown.remaining(25.0), 0.0);
    }
}
