//! Obstacle spawner
//!
//! Spawning needs two conditions at once: enough time since the last spawn
//! (the interval shrinks with elapsed time) and enough trailing distance
//! behind the most recent obstacle (the gap shrinks too, down to a floor).

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyState;
use super::obstacle::{Archetype, Obstacle, ObstacleRegistry, ObstacleSpec};
use crate::consts::ACCUMULATION_EPSILON;
use crate::tuning::SpawnTuning;

/// Spawn timing state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnCursor {
    pub timer: f32,
    pub distance_since_last: f32,
    /// Most recently spawned obstacle, if it is still tracked
    pub last: Option<u32>,
}

/// Interval between spawns at a given elapsed time
pub fn spawn_interval(tuning: &SpawnTuning, elapsed: f32) -> f32 {
    (1.0 / (tuning.base_spawn_rate + elapsed * tuning.difficulty_gain)).max(tuning.min_interval)
}

/// Minimum trailing gap at a given elapsed time
pub fn min_space(tuning: &SpawnTuning, elapsed: f32) -> f32 {
    (tuning.base_min_space - elapsed * tuning.space_decay).max(tuning.floor_space)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub cursor: SpawnCursor,
    pub enabled: bool,
    /// Most recent gap requirement, restored on eviction of the tracked obstacle
    pub current_min_space: f32,
    /// Spawn slots consumed without producing an obstacle (empty template set)
    pub skipped: u32,
}

impl Spawner {
    pub fn new(tuning: &SpawnTuning) -> Self {
        Self {
            cursor: SpawnCursor::default(),
            enabled: true,
            current_min_space: min_space(tuning, 0.0),
            skipped: 0,
        }
    }

    /// Forget all timing state
    pub fn reset(&mut self, tuning: &SpawnTuning) {
        *self = Self::new(tuning);
    }

    /// Evaluate the spawn condition and maybe create one obstacle.
    ///
    /// `next_id` allocates the new obstacle's id. Returns the spawned id.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        dt: f32,
        difficulty: &DifficultyState,
        tuning: &SpawnTuning,
        registry: &mut ObstacleRegistry,
        rng: &mut R,
        next_id: impl FnOnce() -> u32,
    ) -> Option<u32> {
        if !self.enabled {
            return None;
        }

        let interval = spawn_interval(tuning, difficulty.elapsed);
        self.current_min_space = min_space(tuning, difficulty.elapsed);

        match self.cursor.last.and_then(|id| registry.get(id)) {
            Some(last) => {
                self.cursor.distance_since_last = tuning.spawn_position.z - last.position.z;
            }
            None => {
                self.cursor.last = None;
                self.cursor.distance_since_last += difficulty.scroll_speed * dt;
            }
        }

        self.cursor.timer += dt;
        let timer_ready = self.cursor.timer + ACCUMULATION_EPSILON >= interval;
        let gap_ready =
            self.cursor.distance_since_last + ACCUMULATION_EPSILON >= self.current_min_space;
        if !(timer_ready && gap_ready) {
            return None;
        }

        // The slot is consumed whether or not a template is available
        self.cursor.timer = 0.0;
        self.cursor.distance_since_last = 0.0;

        let Some((spec, template)) = choose(tuning, rng) else {
            self.skipped += 1;
            return None;
        };

        let id = next_id();
        log::debug!(
            "Spawned obstacle {} ({:?}, '{}') at t={:.2}",
            id,
            spec.archetype,
            template.name,
            difficulty.elapsed
        );
        registry.insert(Obstacle::from_template(id, spec, template));
        self.cursor.last = Some(id);
        Some(id)
    }

    /// Registry eviction notice. Clearing the tracked obstacle opens the gap
    /// so the next spawn only waits on the timer.
    pub fn on_evicted(&mut self, id: u32) {
        if self.cursor.last == Some(id) {
            self.cursor.last = None;
            self.cursor.distance_since_last = self.current_min_space;
        }
    }
}

/// Weighted archetype choice
fn choose<'t, R: Rng>(
    tuning: &'t SpawnTuning,
    rng: &mut R,
) -> Option<(ObstacleSpec, &'t crate::tuning::ObstacleTemplate)> {
    let roll: f32 = rng.random();
    if roll < tuning.pendulum_chance {
        if let Some(template) = &tuning.swinging_template {
            let phase = rng.random_range(0.0..360.0);
            let spec = ObstacleSpec {
                archetype: Archetype::SwingingHazard,
                template: 0,
                spawn_position: tuning.spawn_position,
                phase: Some(phase),
            };
            return Some((spec, template));
        }
    }

    if tuning.static_templates.is_empty() {
        return None;
    }
    let index = rng.random_range(0..tuning.static_templates.len());
    let spec = ObstacleSpec {
        archetype: Archetype::StaticHazard,
        template: index,
        spawn_position: tuning.spawn_position,
        phase: None,
    };
    Some((spec, &tuning.static_templates[index]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::DifficultyTuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn flat_tuning() -> SpawnTuning {
        SpawnTuning {
            base_spawn_rate: 1.0,
            difficulty_gain: 0.0,
            min_interval: 0.5,
            base_min_space: 10.0,
            space_decay: 0.0,
            floor_space: 10.0,
            ..SpawnTuning::default()
        }
    }

    fn constant_speed(speed: f32) -> DifficultyState {
        DifficultyState::new(&DifficultyTuning {
            initial_speed: speed,
            speed_increase_rate: 0.0,
            max_speed: speed,
        })
    }

    struct Ids(u32);

    impl Ids {
        fn next(&mut self) -> u32 {
            self.0 += 1;
            self.0
        }
    }

    #[test]
    fn test_curves() {
        let tuning = SpawnTuning {
            base_spawn_rate: 0.5,
            difficulty_gain: 0.1,
            min_interval: 0.5,
            base_min_space: 12.0,
            space_decay: 1.0,
            floor_space: 6.0,
            ..SpawnTuning::default()
        };
        assert_eq!(spawn_interval(&tuning, 0.0), 2.0);
        assert_eq!(spawn_interval(&tuning, 5.0), 1.0);
        assert_eq!(spawn_interval(&tuning, 100.0), 0.5);
        assert_eq!(min_space(&tuning, 0.0), 12.0);
        assert_eq!(min_space(&tuning, 4.0), 8.0);
        assert_eq!(min_space(&tuning, 50.0), 6.0);
    }

    #[test]
    fn test_single_spawn_in_first_second() {
        let tuning = flat_tuning();
        let mut difficulty = constant_speed(10.0);
        let mut spawner = Spawner::new(&tuning);
        let mut registry = ObstacleRegistry::new(tuning.destroy_distance);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ids = Ids(0);

        let dt = 0.125;
        let mut spawned = Vec::new();
        for step in 1..=8 {
            difficulty.tick(dt, &DifficultyTuning {
                initial_speed: 10.0,
                speed_increase_rate: 0.0,
                max_speed: 10.0,
            });
            if let Some(id) = spawner.maybe_spawn(dt, &difficulty, &tuning, &mut registry, &mut rng, || ids.next()) {
                spawned.push((step, id));
                assert_eq!(spawner.cursor.distance_since_last, 0.0);
                assert_eq!(spawner.cursor.timer, 0.0);
            }
        }
        // 8 * 0.125 = 1s of timer and 8 * 1.25 = 10 units of distance
        assert_eq!(spawned, vec![(8, 1)]);
        assert_eq!(registry.len(), 1);
        assert_eq!(spawner.cursor.last, Some(1));
    }

    fn spawns_over(dt: f32, ticks: usize) -> Vec<usize> {
        let tuning = flat_tuning();
        let difficulty = constant_speed(10.0);
        let mut spawner = Spawner::new(&tuning);
        let mut registry = ObstacleRegistry::new(tuning.destroy_distance);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut ids = Ids(0);

        (1..=ticks)
            .filter(|_| {
                spawner
                    .maybe_spawn(dt, &difficulty, &tuning, &mut registry, &mut rng, || ids.next())
                    .is_some()
            })
            .collect()
    }

    #[test]
    fn test_single_spawn_at_inexact_timesteps() {
        // Neither 1/60 nor 0.1 sums to exactly 1.0 in f32
        assert_eq!(spawns_over(crate::consts::SIM_DT, 60), vec![60]);
        assert_eq!(spawns_over(0.1, 10), vec![10]);
    }

    #[test]
    fn test_distance_gate_blocks_timer() {
        let tuning = flat_tuning();
        let difficulty = constant_speed(1.0);
        let mut spawner = Spawner::new(&tuning);
        let mut registry = ObstacleRegistry::new(tuning.destroy_distance);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ids = Ids(0);

        // Timer passes its interval long before 10 units accumulate at speed 1
        for _ in 0..9 {
            assert!(spawner
                .maybe_spawn(1.0, &difficulty, &tuning, &mut registry, &mut rng, || ids.next())
                .is_none());
        }
        assert!(spawner
            .maybe_spawn(1.0, &difficulty, &tuning, &mut registry, &mut rng, || ids.next())
            .is_some());
    }

    #[test]
    fn test_distance_tracks_last_obstacle() {
        let tuning = flat_tuning();
        let difficulty = constant_speed(10.0);
        let mut spawner = Spawner::new(&tuning);
        let mut registry = ObstacleRegistry::new(tuning.destroy_distance);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ids = Ids(0);

        spawner.cursor.distance_since_last = 10.0;
        spawner.cursor.timer = 1.0;
        let id = spawner
            .maybe_spawn(0.0, &difficulty, &tuning, &mut registry, &mut rng, || ids.next())
            .unwrap();

        registry.advance(0.4, 10.0);
        spawner.maybe_spawn(0.0, &difficulty, &tuning, &mut registry, &mut rng, || ids.next());
        assert_eq!(spawner.cursor.last, Some(id));
        assert!((spawner.cursor.distance_since_last - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_eviction_resets_distance_to_min_space() {
        let tuning = flat_tuning();
        let difficulty = constant_speed(10.0);
        let mut spawner = Spawner::new(&tuning);
        let mut registry = ObstacleRegistry::new(tuning.destroy_distance);
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ids = Ids(0);

        spawner.cursor.distance_since_last = 10.0;
        spawner.cursor.timer = 1.0;
        let id = spawner
            .maybe_spawn(0.0, &difficulty, &tuning, &mut registry, &mut rng, || ids.next())
            .unwrap();

        // Unrelated ids are ignored
        spawner.on_evicted(id + 100);
        assert_eq!(spawner.cursor.last, Some(id));

        for evicted in registry.advance(10.0, 10.0) {
            spawner.on_evicted(evicted);
        }
        assert_eq!(spawner.cursor.last, None);
        assert_eq!(spawner.cursor.distance_since_last, 10.0);
    }

    #[test]
    fn test_empty_templates_consume_slot() {
        let tuning = SpawnTuning {
            static_templates: Vec::new(),
            swinging_template: None,
            ..flat_tuning()
        };
        let difficulty = constant_speed(10.0);
        let mut spawner = Spawner::new(&tuning);
        let mut registry = ObstacleRegistry::new(tuning.destroy_distance);
        let mut rng = Pcg32::seed_from_u64(5);

        spawner.cursor.distance_since_last = 10.0;
        spawner.cursor.timer = 1.0;
        assert!(spawner
            .maybe_spawn(0.0, &difficulty, &tuning, &mut registry, &mut rng, || 1)
            .is_none());
        assert_eq!(spawner.skipped, 1);
        assert_eq!(spawner.cursor.timer, 0.0);
        assert_eq!(spawner.cursor.distance_since_last, 0.0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_pendulum_chance_extremes() {
        let mut tuning = flat_tuning();
        let mut rng = Pcg32::seed_from_u64(6);

        tuning.pendulum_chance = 1.0;
        for _ in 0..20 {
            let (spec, _) = choose(&tuning, &mut rng).unwrap();
            assert_eq!(spec.archetype, Archetype::SwingingHazard);
            let phase = spec.phase.unwrap();
            assert!((0.0..360.0).contains(&phase));
        }

        tuning.pendulum_chance = 0.0;
        for _ in 0..20 {
            let (spec, _) = choose(&tuning, &mut rng).unwrap();
            assert_eq!(spec.archetype, Archetype::StaticHazard);
            assert!(spec.template < tuning.static_templates.len());
        }

        // No swinging template: falls back to static
        tuning.pendulum_chance = 1.0;
        tuning.swinging_template = None;
        let (spec, _) = choose(&tuning, &mut rng).unwrap();
        assert_eq!(spec.archetype, Archetype::StaticHazard);
    }

    #[test]
    fn test_disabled_spawner_is_inert() {
        let tuning = flat_tuning();
        let difficulty = constant_speed(10.0);
        let mut spawner = Spawner::new(&tuning);
        spawner.enabled = false;
        let mut registry = ObstacleRegistry::new(tuning.destroy_distance);
        let mut rng = Pcg32::seed_from_u64(7);
        assert!(spawner
            .maybe_spawn(100.0, &difficulty, &tuning, &mut registry, &mut rng, || 1)
            .is_none());
        assert_eq!(spawner.cursor, SpawnCursor::default());
    }

    proptest! {
        #[test]
        fn prop_registry_size_matches_spawn_minus_evict(
            seed in any::<u64>(),
            dts in proptest::collection::vec(0.0f32..0.2, 1..400),
        ) {
            let tuning = SpawnTuning::default();
            let difficulty_tuning = DifficultyTuning::default();
            let mut difficulty = DifficultyState::new(&difficulty_tuning);
            let mut spawner = Spawner::new(&tuning);
            let mut registry = ObstacleRegistry::new(tuning.destroy_distance);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ids = Ids(0);
            let (mut spawned, mut evicted) = (0usize, 0usize);

            for dt in dts {
                difficulty.tick(dt, &difficulty_tuning);
                let timer_before = spawner.cursor.timer + dt;
                let interval = spawn_interval(&tuning, difficulty.elapsed);
                if spawner.maybe_spawn(dt, &difficulty, &tuning, &mut registry, &mut rng, || ids.next()).is_some() {
                    spawned += 1;
                    prop_assert!(timer_before + ACCUMULATION_EPSILON >= interval);
                }
                for id in registry.advance(dt, difficulty.scroll_speed) {
                    spawner.on_evicted(id);
                    evicted += 1;
                }
                prop_assert_eq!(registry.len(), spawned - evicted);
            }
        }
    }
}
