//! Wall-clock to simulation timestep conversion

use crate::consts::MAX_FRAME_DT;

/// Turns successive clock readings into capped frame deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, capped at `MAX_FRAME_DT`.
    ///
    /// The first reading and any clock that runs backwards yield 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let Some(last) = self.last_ms.replace(now_ms) else {
            return 0.0;
        };
        let delta_ms = now_ms - last;
        if !delta_ms.is_finite() || delta_ms <= 0.0 {
            return 0.0;
        }
        ((delta_ms / 1000.0) as f32).min(MAX_FRAME_DT)
    }

    /// Re-base on `now_ms`, e.g. after a resume, so the gap is not simulated
    pub fn reset(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }
}
