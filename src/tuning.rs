//! Data-driven game balance
//!
//! Every number the simulation reads lives here. Defaults reproduce the
//! shipped balance; a JSON file can override any subset of fields.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Scroll speed ramp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DifficultyTuning {
    /// Scroll speed at session start (units/s)
    pub initial_speed: f32,
    /// Speed gained per second
    pub speed_increase_rate: f32,
    /// Speed ceiling
    pub max_speed: f32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            initial_speed: 5.0,
            speed_increase_rate: 0.1,
            max_speed: 20.0,
        }
    }
}

/// Swing parameters for pendulum obstacles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PendulumTuning {
    /// Peak swing angle in degrees
    pub amplitude: f32,
    /// Angular speed of the sine argument (rad/s)
    pub angular_speed: f32,
    /// Pin scale to its spawn value every tick
    pub preserve_scale: bool,
}

impl Default for PendulumTuning {
    fn default() -> Self {
        Self {
            amplitude: 45.0,
            angular_speed: 2.0,
            preserve_scale: true,
        }
    }
}

/// One hazard volume of an obstacle, relative to the obstacle origin
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PartTemplate {
    pub offset: Vec3,
    pub half_extents: Vec3,
}

/// A spawnable obstacle layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleTemplate {
    pub name: String,
    pub parts: Vec<PartTemplate>,
    /// Lethal on contact regardless of health
    #[serde(default = "default_deadly")]
    pub deadly: bool,
    /// Damage dealt on contact when not deadly
    #[serde(default = "default_damage")]
    pub damage: f32,
    /// Swing motion (only meaningful for the swinging template)
    #[serde(default)]
    pub pendulum: Option<PendulumTuning>,
}

fn default_deadly() -> bool {
    true
}

fn default_damage() -> f32 {
    1.0
}

impl ObstacleTemplate {
    fn wall(name: &str, parts: Vec<PartTemplate>, deadly: bool) -> Self {
        Self {
            name: name.to_string(),
            parts,
            deadly,
            damage: 1.0,
            pendulum: None,
        }
    }
}

/// Spawn cadence, spacing and obstacle selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpawnTuning {
    /// Spawns per second at elapsed = 0
    pub base_spawn_rate: f32,
    /// Spawn rate gained per elapsed second
    pub difficulty_gain: f32,
    /// Shortest allowed interval between spawns (s)
    pub min_interval: f32,
    /// Minimum trailing gap at elapsed = 0
    pub base_min_space: f32,
    /// Gap lost per elapsed second
    pub space_decay: f32,
    /// Gap never shrinks below this
    pub floor_space: f32,
    /// Probability of a swinging hazard per spawn
    pub pendulum_chance: f32,
    /// Where obstacles appear; `z` is the spawn boundary
    pub spawn_position: Vec3,
    /// Obstacles with `z` below this are destroyed
    pub destroy_distance: f32,
    pub static_templates: Vec<ObstacleTemplate>,
    pub swinging_template: Option<ObstacleTemplate>,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        let part = |x: f32, y: f32, hx: f32, hy: f32| PartTemplate {
            offset: Vec3::new(x, y, 0.0),
            half_extents: Vec3::new(hx, hy, 0.25),
        };

        Self {
            base_spawn_rate: 1.0 / 3.0,
            difficulty_gain: 0.01,
            min_interval: 0.5,
            base_min_space: 12.0,
            space_decay: 0.05,
            floor_space: 6.0,
            pendulum_chance: 0.3,
            spawn_position: Vec3::new(3.2, 1.4, 30.0),
            destroy_distance: -30.0,
            static_templates: vec![
                // Full-height wall across the lane edge: dodge sideways
                ObstacleTemplate::wall("lava_wall", vec![part(0.0, 0.0, 3.0, 1.4)], true),
                // Two pillars with a narrow gap: only the cube fits
                ObstacleTemplate::wall(
                    "lava_wall_split",
                    vec![part(-2.5, 0.0, 1.5, 1.4), part(2.5, 0.0, 1.5, 1.4)],
                    true,
                ),
                // Overhang: flatten or take a hit
                ObstacleTemplate::wall("lava_ceiling", vec![part(0.0, 2.5, 3.0, 1.0)], false),
            ],
            swinging_template: Some(ObstacleTemplate {
                name: "pendulum".to_string(),
                parts: vec![PartTemplate {
                    offset: Vec3::new(0.0, -1.0, 0.0),
                    half_extents: Vec3::new(0.5, 1.5, 0.5),
                }],
                deadly: false,
                damage: 1.0,
                pendulum: Some(PendulumTuning::default()),
            }),
        }
    }
}

/// Character movement and health
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CharacterTuning {
    /// Horizontal speed at full axis deflection
    pub move_speed: f32,
    /// Vertical impulse applied by the host on jump
    pub jump_force: f32,
    pub max_health: f32,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_force: 5.0,
            max_health: 3.0,
        }
    }
}

/// Score accrual
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreTuning {
    /// Points per unit of distance scrolled
    pub points_per_unit: f32,
    /// Multiplier gained per elapsed second
    pub multiplier_gain: f32,
    pub max_multiplier: f32,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            points_per_unit: 1.0,
            multiplier_gain: 0.02,
            max_multiplier: 5.0,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: DifficultyTuning,
    pub spawn: SpawnTuning,
    pub character: CharacterTuning,
    pub score: ScoreTuning,
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check ranges the simulation relies on
    ///
    /// An empty template set is valid: the spawner then never produces
    /// obstacles.
    pub fn validate(&self) -> Result<()> {
        let d = &self.difficulty;
        if d.initial_speed < 0.0 || d.speed_increase_rate < 0.0 {
            return Err(invalid("speeds must be non-negative"));
        }
        if d.max_speed < d.initial_speed {
            return Err(invalid("max_speed must be >= initial_speed"));
        }

        let s = &self.spawn;
        if s.base_spawn_rate <= 0.0 || s.difficulty_gain < 0.0 {
            return Err(invalid("base_spawn_rate must be positive, difficulty_gain non-negative"));
        }
        if s.min_interval <= 0.0 {
            return Err(invalid("min_interval must be positive"));
        }
        if s.floor_space < 0.0 || s.base_min_space < s.floor_space || s.space_decay < 0.0 {
            return Err(invalid("spacing must satisfy 0 <= floor_space <= base_min_space"));
        }
        if !(0.0..=1.0).contains(&s.pendulum_chance) {
            return Err(invalid("pendulum_chance must be within [0, 1]"));
        }
        if s.destroy_distance >= s.spawn_position.z {
            return Err(invalid("destroy_distance must lie behind the spawn boundary"));
        }
        let templates = s.static_templates.iter().chain(s.swinging_template.iter());
        for template in templates {
            if template.damage < 0.0 {
                return Err(invalid(&format!("template '{}' has negative damage", template.name)));
            }
        }

        if self.character.max_health <= 0.0 {
            return Err(invalid("max_health must be positive"));
        }
        if self.score.max_multiplier < 1.0 || self.score.multiplier_gain < 0.0 {
            return Err(invalid("max_multiplier must be >= 1"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> Error {
    Error::InvalidTuning(msg.to_string())
}
