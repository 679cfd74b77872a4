//! Game state and core simulation types
//!
//! One `GameState` owns every component of a run. Components never look each
//! other up; the tick and session code pass what each one needs.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::character::{Character, Shape};
use super::difficulty::DifficultyState;
use super::obstacle::{Archetype, ObstacleRegistry};
use super::session::Session;
use super::spawner::Spawner;
use crate::tuning::{ScoreTuning, Tuning};

/// Contact notification from the physics host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Contact {
    /// The character entered a hazard volume of this obstacle
    Hazard { obstacle: u32 },
    /// The character touched a surface with this normal
    Surface { normal: Vec3 },
}

/// Things the host may want to react to (sound, UI, scene reload)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ObstacleSpawned { id: u32, archetype: Archetype },
    ObstacleEvicted { id: u32 },
    ShapeChanged { shape: Shape },
    Damaged { amount: f32, health: f32 },
    Died,
    Jumped { impulse: f32 },
    Paused,
    Resumed,
    GameOver { final_score: f32 },
    /// The scene host should reload the level
    Restarted,
}

/// Running score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub value: f32,
    pub multiplier: f32,
}

impl Default for Score {
    fn default() -> Self {
        Self {
            value: 0.0,
            multiplier: 1.0,
        }
    }
}

impl Score {
    /// Accrue points for distance scrolled; the multiplier grows with elapsed time
    pub fn advance(&mut self, distance: f32, elapsed: f32, tuning: &ScoreTuning) {
        self.multiplier = (1.0 + elapsed * tuning.multiplier_gain).min(tuning.max_multiplier);
        self.value += distance.max(0.0) * tuning.points_per_unit * self.multiplier;
    }

    /// Whole points for display and leaderboards
    pub fn points(&self) -> u64 {
        self.value.max(0.0) as u64
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub session: Session,
    pub difficulty: DifficultyState,
    pub spawner: Spawner,
    pub obstacles: ObstacleRegistry,
    pub character: Character,
    pub score: Score,
    /// Simulation tick counter (running ticks only)
    pub time_ticks: u64,
    /// Pending events, drained by the host
    pub events: Vec<GameEvent>,
    /// Obstacles the character overlapped on the last detection pass
    pub(crate) touching: Vec<u32>,
    /// Next entity ID
    pub(crate) next_id: u32,
}

impl GameState {
    /// Create a new game state with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            session: Session::new(),
            difficulty: DifficultyState::new(&tuning.difficulty),
            spawner: Spawner::new(&tuning.spawn),
            obstacles: ObstacleRegistry::new(tuning.spawn.destroy_distance),
            character: Character::new(&tuning.character),
            score: Score::default(),
            time_ticks: 0,
            events: Vec::new(),
            touching: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Overlap the character collider against every hazard part and report
    /// obstacles newly entered since the previous call.
    pub fn detect_contacts(&mut self) -> Vec<Contact> {
        let Some(collider) = self.character.world_collider() else {
            self.touching.clear();
            return Vec::new();
        };

        let overlapping: Vec<u32> = self
            .obstacles
            .iter()
            .filter(|o| {
                o.part_bounds()
                    .any(|(center, half)| collider.overlaps_box(center, half))
            })
            .map(|o| o.id)
            .collect();

        let entered = overlapping
            .iter()
            .filter(|id| !self.touching.contains(id))
            .map(|&obstacle| Contact::Hazard { obstacle })
            .collect();
        self.touching = overlapping;
        entered
    }
}
