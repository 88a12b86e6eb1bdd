use std::time::Duration;

/// Empirically-tuned knobs for one remote deployment. Everything the
/// scheduler treats as a magic number lives here; none of it is protocol.
#[derive(Clone, Debug)]
pub struct Tuning {
    pub viewport_extent: i64,     // edge length of the safe rectangle, world units
    pub cursor_scale: i64,        // px of cursor offset per world unit, first pass
    pub correction_scale: i64,    // px per world unit of residual, second pass
    pub latency_budget: Duration, // navigation time deducted from reported cooldown
    pub history_depth: usize,     // trailing placements kept for recovery replay
    pub replay_delay: Duration,   // pause between replayed placements
    pub settle_delay: Duration,   // pause after each forward placement
    pub shuffle_seed: u64,        // fixed seed for the random traversal
    pub alpha_floor: f32,         // pixels below alpha_floor * 255 are not drawn
    pub refresh_on_resume: bool,  // reload the session after a confirmed interception
}

impl Tuning {
    pub fn half_extent(&self) -> i64 {
        self.viewport_extent / 2
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_extent: 100,
            cursor_scale: 3,
            correction_scale: 2,
            latency_budget: Duration::from_secs(53),
            history_depth: 6,
            replay_delay: Duration::from_millis(200),
            settle_delay: Duration::from_millis(200),
            shuffle_seed: 1024,
            alpha_floor: 0.2,
            refresh_on_resume: false,
        }
    }
}
