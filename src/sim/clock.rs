//! Simulation clocks
//!
//! A clock is armed while its engine is `Playing` and disarmed on every
//! other phase. Disarming is idempotent and drops any banked time so a
//! resumed game never replays the pause.

/// Maximum discrete steps a single `advance` may run (prevents spiral of death)
pub const MAX_SUBSTEPS: u32 = 8;

/// How a clock turns host-elapsed time into simulation work
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockMode {
    /// Fixed wall-clock interval (Snake)
    Interval { period_ms: f64 },
    /// One update per display frame, scaled to a reference frame duration
    Frame { target_frame_ms: f64, max_frame_ms: f64 },
}

#[derive(Debug, Clone)]
pub struct Clock {
    mode: ClockMode,
    armed: bool,
    accumulator_ms: f64,
}

impl Clock {
    pub fn interval(period_ms: f64) -> Self {
        Self {
            mode: ClockMode::Interval { period_ms },
            armed: false,
            accumulator_ms: 0.0,
        }
    }

    pub fn frame(target_frame_ms: f64, max_frame_ms: f64) -> Self {
        Self {
            mode: ClockMode::Frame {
                target_frame_ms,
                max_frame_ms,
            },
            armed: false,
            accumulator_ms: 0.0,
        }
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self) {
        if !self.armed {
            self.armed = true;
            self.accumulator_ms = 0.0;
        }
    }

    pub fn disarm(&mut self) {
        self.armed = false;
        self.accumulator_ms = 0.0;
    }

    /// Change the interval period (no-op for frame clocks)
    pub fn set_period(&mut self, period_ms: f64) {
        if let ClockMode::Interval { .. } = self.mode {
            self.mode = ClockMode::Interval { period_ms };
        }
    }

    /// Current interval period, if this is an interval clock
    pub fn period(&self) -> Option<f64> {
        match self.mode {
            ClockMode::Interval { period_ms } => Some(period_ms),
            ClockMode::Frame { .. } => None,
        }
    }

    /// Bank elapsed time and report how many interval steps are due
    pub fn due_steps(&mut self, elapsed_ms: f64) -> u32 {
        let ClockMode::Interval { period_ms } = self.mode else {
            return 0;
        };
        if !self.armed || period_ms <= 0.0 || !elapsed_ms.is_finite() {
            return 0;
        }
        self.accumulator_ms += elapsed_ms.max(0.0);

        let mut steps = 0;
        while self.accumulator_ms >= period_ms && steps < MAX_SUBSTEPS {
            self.accumulator_ms -= period_ms;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog instead of fast-forwarding through it
            self.accumulator_ms = self.accumulator_ms.min(period_ms);
        }
        steps
    }

    /// Frame delta in reference frames plus the clamped elapsed milliseconds
    ///
    /// Returns `None` while disarmed.
    pub fn frame_delta(&self, elapsed_ms: f64) -> Option<(f32, f64)> {
        let ClockMode::Frame {
            target_frame_ms,
            max_frame_ms,
        } = self.mode
        else {
            return None;
        };
        if !self.armed || !elapsed_ms.is_finite() {
            return None;
        }
        let clamped = elapsed_ms.clamp(0.0, max_frame_ms);
        Some(((clamped / target_frame_ms) as f32, clamped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disarmed_clock_does_nothing() {
        let mut clock = Clock::interval(100.0);
        assert_eq!(clock.due_steps(1000.0), 0);

        let frame = Clock::frame(16.0, 50.0);
        assert!(frame.frame_delta(16.0).is_none());
    }

    #[test]
    fn test_interval_banks_time() {
        let mut clock = Clock::interval(100.0);
        clock.arm();
        assert_eq!(clock.due_steps(60.0), 0);
        assert_eq!(clock.due_steps(60.0), 1);
        assert_eq!(clock.due_steps(180.0), 2);
    }

    #[test]
    fn test_interval_caps_substeps() {
        let mut clock = Clock::interval(10.0);
        clock.arm();
        assert_eq!(clock.due_steps(10_000.0), MAX_SUBSTEPS);
        // Backlog was dropped
        assert!(clock.due_steps(0.0) <= 1);
    }

    #[test]
    fn test_disarm_is_idempotent_and_clears_bank() {
        let mut clock = Clock::interval(100.0);
        clock.arm();
        clock.due_steps(90.0);
        clock.disarm();
        clock.disarm();
        assert!(!clock.is_armed());
        clock.arm();
        assert_eq!(clock.due_steps(20.0), 0);
    }

    #[test]
    fn test_frame_delta_clamps() {
        let mut clock = Clock::frame(16.0, 50.0);
        clock.arm();
        let (dt, ms) = clock.frame_delta(16.0).unwrap();
        assert!((dt - 1.0).abs() < 1e-6);
        assert_eq!(ms, 16.0);

        // Backgrounded tab: huge gap is clamped to 50ms
        let (dt, ms) = clock.frame_delta(5000.0).unwrap();
        assert!((dt - 50.0 / 16.0).abs() < 1e-6);
        assert_eq!(ms, 50.0);
    }
}
