//! Difficulty clock and scroll speed model

use serde::{Deserialize, Serialize};

use crate::consts::FLOOR_SCROLL_FACTOR;
use crate::tuning::DifficultyTuning;
use crate::wrap_unit;

/// Elapsed time and the speed derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    /// Seconds of unpaused play
    pub elapsed: f32,
    /// Current obstacle scroll speed (units/s)
    pub scroll_speed: f32,
    /// Floor texture offset in [0, 1)
    pub floor_offset: f32,
}

impl DifficultyState {
    pub fn new(tuning: &DifficultyTuning) -> Self {
        Self {
            elapsed: 0.0,
            scroll_speed: tuning.initial_speed,
            floor_offset: 0.0,
        }
    }

    /// Advance the clock and ramp speed toward the ceiling
    pub fn tick(&mut self, dt: f32, tuning: &DifficultyTuning) {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.scroll_speed =
            (self.scroll_speed + tuning.speed_increase_rate * dt).min(tuning.max_speed);
        self.floor_offset = wrap_unit(self.floor_offset + self.scroll_speed * dt * FLOOR_SCROLL_FACTOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ramp(initial: f32, rate: f32, max: f32) -> DifficultyTuning {
        DifficultyTuning {
            initial_speed: initial,
            speed_increase_rate: rate,
            max_speed: max,
        }
    }

    #[test]
    fn test_speed_clamps_at_max() {
        let tuning = ramp(1.0, 1.0, 5.0);
        let mut state = DifficultyState::new(&tuning);

        for _ in 0..40 {
            state.tick(0.1, &tuning);
        }
        // t = 4s: at the ceiling up to float accumulation
        assert!((state.scroll_speed - 5.0).abs() < 1e-4);

        for _ in 40..100 {
            state.tick(0.1, &tuning);
            assert!(state.scroll_speed <= 5.0);
        }
        assert_eq!(state.scroll_speed, 5.0);
        assert!((state.elapsed - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let tuning = DifficultyTuning::default();
        let mut state = DifficultyState::new(&tuning);
        state.tick(0.5, &tuning);
        let before = state.clone();
        state.tick(0.0, &tuning);
        assert_eq!(state, before);
    }

    #[test]
    fn test_floor_offset_wraps() {
        let tuning = ramp(20.0, 0.0, 20.0);
        let mut state = DifficultyState::new(&tuning);
        for _ in 0..50 {
            state.tick(0.1, &tuning);
            assert!((0.0..1.0).contains(&state.floor_offset));
        }
    }

    proptest! {
        #[test]
        fn prop_speed_monotonic_and_bounded(
            dts in proptest::collection::vec(0.0f32..0.5, 1..200),
            initial in 0.0f32..10.0,
            rate in 0.0f32..5.0,
            extra in 0.0f32..20.0,
        ) {
            let tuning = ramp(initial, rate, initial + extra);
            let mut state = DifficultyState::new(&tuning);
            let mut last = state.scroll_speed;
            for dt in dts {
                state.tick(dt, &tuning);
                prop_assert!(state.scroll_speed >= last);
                prop_assert!(state.scroll_speed <= tuning.max_speed);
                last = state.scroll_speed;
            }
        }
    }
}
