use crate::constants::MAX_FRAME_DT;

/// Simulation time, advanced once per frame from the wall-clock delta.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    now: f64,
    frames: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `wall_dt` seconds and return the step actually taken.
    ///
    /// Negative or non-finite deltas count as 0; long stalls are clamped to
    /// `MAX_FRAME_DT`.
    pub fn advance(&mut self, wall_dt: f32) -> f32 {
        let dt = if wall_dt.is_finite() {
            wall_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.now += dt as f64;
        self.frames += 1;
        dt
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_stalls_and_garbage() {
        let mut c = SimClock::new();
        assert_eq!(c.advance(5.0), MAX_FRAME_DT);
        assert_eq!(c.advance(-1.0), 0.0);
        assert_eq!(c.advance(f32::NAN), 0.0);
        assert_eq!(c.frames(), 3);
        assert!((c.now() - MAX_FRAME_DT as f64).abs() < 1e-9);
    }
}
