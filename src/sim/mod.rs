//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Fixed per-tick ordering
//! - Stable obstacle order (spawn order)
//! - No rendering, physics engine or platform dependencies

pub mod character;
pub mod collision;
pub mod difficulty;
pub mod obstacle;
pub mod pendulum;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use character::{Character, DamageOutcome, Shape, ShapeVisuals};
pub use collision::{Collider, HazardPart, HazardTag, collider_for};
pub use difficulty::DifficultyState;
pub use obstacle::{Archetype, Obstacle, ObstacleRegistry, ObstacleSpec};
pub use pendulum::Pendulum;
pub use session::{Session, SessionState};
pub use spawner::{SpawnCursor, Spawner, min_space, spawn_interval};
pub use state::{Contact, GameEvent, GameState, Score};
pub use tick::{TickInput, tick};
