//! Combo tracking for Brick Breaker
//!
//! A chain of brick hits landing within `timeout_ms` of each other builds a
//! combo; the combo value *before* a hit is what multiplies that hit's points.

/// Combo state for one run
#[derive(Debug, Clone)]
pub struct ComboTracker {
    combo: u32,
    last_hit_ms: Option<f64>,
    timeout_ms: f64,
    multiplier: f32,
    max_combo: u32,
}

impl ComboTracker {
    pub fn new(timeout_ms: f64, multiplier: f32, max_combo: u32) -> Self {
        Self {
            combo: 0,
            last_hit_ms: None,
            timeout_ms,
            multiplier,
            max_combo,
        }
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Register a brick hit at `now_ms`; returns the multiplier earned by this hit
    pub fn register_hit(&mut self, now_ms: f64) -> f32 {
        let expired = self
            .last_hit_ms
            .is_some_and(|last| now_ms - last > self.timeout_ms);
        if expired {
            self.combo = 0;
        }
        let factor = 1.0 + self.combo as f32 * self.multiplier;
        self.combo = (self.combo + 1).min(self.max_combo);
        self.last_hit_ms = Some(now_ms);
        factor
    }

    /// Paddle touch or lost ball
    pub fn reset(&mut self) {
        self.combo = 0;
        self.last_hit_ms = None;
    }
}

/// Points for a destroyed brick under a combo factor
pub fn brick_score(points: u32, factor: f32) -> u64 {
    (points as f32 * factor).round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hit_scores_plain_points() {
        let mut combo = ComboTracker::new(2000.0, 0.1, 10);
        let factor = combo.register_hit(0.0);
        assert_eq!(brick_score(10, factor), 10);
        assert_eq!(combo.combo(), 1);
    }

    #[test]
    fn test_chain_builds_and_caps() {
        let mut combo = ComboTracker::new(2000.0, 0.5, 3);
        combo.register_hit(0.0);
        let f2 = combo.register_hit(100.0);
        assert!((f2 - 1.5).abs() < 1e-6);
        combo.register_hit(200.0);
        combo.register_hit(300.0);
        combo.register_hit(400.0);
        assert_eq!(combo.combo(), 3);
    }

    #[test]
    fn test_gap_past_timeout_restarts_at_one() {
        let mut combo = ComboTracker::new(1000.0, 0.1, 10);
        combo.register_hit(0.0);
        combo.register_hit(500.0);
        combo.register_hit(900.0);
        assert_eq!(combo.combo(), 3);

        let factor = combo.register_hit(2500.0);
        assert_eq!(combo.combo(), 1);
        assert!((factor - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset_on_paddle() {
        let mut combo = ComboTracker::new(1000.0, 0.1, 10);
        combo.register_hit(0.0);
        combo.register_hit(10.0);
        combo.reset();
        assert_eq!(combo.combo(), 0);
        combo.register_hit(20.0);
        assert_eq!(combo.combo(), 1);
    }

    #[test]
    fn test_brick_score_rounds() {
        assert_eq!(brick_score(10, 1.25), 13);
        assert_eq!(brick_score(20, 1.0), 20);
    }
}
