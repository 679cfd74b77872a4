//! Pendulum oscillator for swinging hazards
//!
//! Each pendulum swings about the Z axis on its own clock:
//! `angle(t) = amplitude * sin((t0 + t) * angular_speed)` with `t0` the
//! spawn phase converted to radians.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::deg_to_rad;
use crate::tuning::PendulumTuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pendulum {
    /// Peak angle in degrees
    pub amplitude: f32,
    pub angular_speed: f32,
    /// Spawn phase in radians
    pub t0: f32,
    /// Local time since spawn (s)
    pub t: f32,
    /// Current swing angle in degrees
    pub angle: f32,
    pub rotation: Quat,
    pub scale: Vec3,
    base_scale: Vec3,
    preserve_scale: bool,
}

impl Pendulum {
    /// Create a pendulum with a phase in degrees `[0, 360)`
    pub fn new(tuning: &PendulumTuning, phase_degrees: f32, scale: Vec3) -> Self {
        let mut pendulum = Self {
            amplitude: tuning.amplitude,
            angular_speed: tuning.angular_speed,
            t0: deg_to_rad(phase_degrees),
            t: 0.0,
            angle: 0.0,
            rotation: Quat::IDENTITY,
            scale,
            base_scale: scale,
            preserve_scale: tuning.preserve_scale,
        };
        pendulum.apply();
        pendulum
    }

    /// Angle in degrees at local time `t`
    pub fn angle_at(&self, t: f32) -> f32 {
        self.amplitude * ((self.t0 + t) * self.angular_speed).sin()
    }

    pub fn update(&mut self, dt: f32) {
        self.t += dt;
        self.apply();
    }

    fn apply(&mut self) {
        self.angle = self.angle_at(self.t);
        self.rotation = Quat::from_rotation_z(deg_to_rad(self.angle));
        if self.preserve_scale && self.scale != self.base_scale {
            self.scale = self.base_scale;
        }
    }
}
