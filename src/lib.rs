//! Lava Runner - endless shape-shifting runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty, spawning, obstacles, character, session)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Final score leaderboard
//! - `error`: Errors for the fallible edges (tuning files, leaderboard storage)

pub mod error;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Contacts with a normal whose Y exceeds this count as ground
    pub const GROUND_NORMAL_THRESHOLD: f32 = 0.5;

    /// Slack for timer and distance thresholds accumulated from f32 steps
    pub const ACCUMULATION_EPSILON: f32 = 1e-4;

    /// Floor texture scroll relative to obstacle scroll
    pub const FLOOR_SCROLL_FACTOR: f32 = 0.1;

    /// Sphere collider
    pub const SPHERE_RADIUS: f32 = 1.25;
    pub const SPHERE_CENTER: [f32; 3] = [0.0, -0.1, 0.0];

    /// Cube collider (tall, narrow)
    pub const CUBE_CENTER: [f32; 3] = [0.0, 1.0, -1.0];
    pub const CUBE_SIZE: [f32; 3] = [0.7, 4.0, 1.0];

    /// Flat collider (wide, low)
    pub const FLAT_CENTER: [f32; 3] = [0.0, 0.0, -0.8];
    pub const FLAT_SIZE: [f32; 3] = [6.0, 2.0, 1.0];
}

/// Convert an angle in degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

/// Wrap a value into [0, 1)
#[inline]
pub fn wrap_unit(value: f32) -> f32 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negatives
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}
