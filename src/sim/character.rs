//! Shape-shifting character
//!
//! States are {Sphere, Cube, Flat} x {Alive, Dead}. Dead is terminal for the
//! session; only a session reset builds a fresh character.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{Collider, collider_for};
use crate::consts::GROUND_NORMAL_THRESHOLD;
use crate::tuning::CharacterTuning;

/// Body shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    Sphere,
    Cube,
    Flat,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Sphere, Shape::Cube, Shape::Flat];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Sphere => "Sphere",
            Shape::Cube => "Cube",
            Shape::Flat => "Flat",
        }
    }
}

/// Which shape meshes the renderer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShapeVisuals {
    pub sphere: bool,
    pub cube: bool,
    pub flat: bool,
}

impl ShapeVisuals {
    /// Exactly `shape` active
    pub fn only(shape: Shape) -> Self {
        Self {
            sphere: shape == Shape::Sphere,
            cube: shape == Shape::Cube,
            flat: shape == Shape::Flat,
        }
    }

    pub fn is_active(&self, shape: Shape) -> bool {
        match shape {
            Shape::Sphere => self.sphere,
            Shape::Cube => self.cube,
            Shape::Flat => self.flat,
        }
    }

    pub fn active_count(&self) -> usize {
        Shape::ALL.iter().filter(|s| self.is_active(**s)).count()
    }
}

/// Outcome of a damage or death request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Already dead, nothing changed
    Ignored,
    /// Health reduced, still alive
    Hurt,
    /// This call killed the character
    Died,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub shape: Shape,
    pub health: f32,
    pub max_health: f32,
    pub grounded: bool,
    pub dead: bool,
    /// Accepts input; cleared by the session on game over
    pub enabled: bool,
    pub position: Vec3,
    pub visuals: ShapeVisuals,
    pub collider: Collider,
    /// Colliders stop generating contacts once dead
    pub collider_enabled: bool,
    /// Physics response disabled once dead
    pub kinematic: bool,
    move_speed: f32,
    jump_force: f32,
}

impl Character {
    pub fn new(tuning: &CharacterTuning) -> Self {
        let shape = Shape::default();
        Self {
            shape,
            health: tuning.max_health,
            max_health: tuning.max_health,
            grounded: true,
            dead: false,
            enabled: true,
            position: Vec3::ZERO,
            visuals: ShapeVisuals::only(shape),
            collider: collider_for(shape),
            collider_enabled: true,
            kinematic: false,
            move_speed: tuning.move_speed,
            jump_force: tuning.jump_force,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Swap visual and collider to `shape`. Returns false when refused.
    pub fn change_shape(&mut self, shape: Shape) -> bool {
        if self.dead || !self.enabled {
            return false;
        }
        self.shape = shape;
        self.visuals = ShapeVisuals::only(shape);
        self.collider = collider_for(shape);
        log::debug!("Character shape -> {}", shape.as_str());
        true
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.dead || amount <= 0.0 {
            return DamageOutcome::Ignored;
        }
        self.health = (self.health - amount).max(0.0);
        log::debug!("Character took {} damage, health {}", amount, self.health);
        if self.health <= 0.0 {
            self.die()
        } else {
            DamageOutcome::Hurt
        }
    }

    /// Kill immediately, bypassing health
    pub fn die(&mut self) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }
        self.dead = true;
        self.kinematic = true;
        self.collider_enabled = false;
        log::info!("Character died");
        DamageOutcome::Died
    }

    /// Contact reported by the physics host
    pub fn on_contact(&mut self, normal: Vec3) {
        if normal.y > GROUND_NORMAL_THRESHOLD {
            self.grounded = true;
        }
    }

    /// Apply horizontal axis input in [-1, 1]
    pub fn move_horizontal(&mut self, axis: f32, dt: f32) {
        if self.dead || !self.enabled {
            return;
        }
        self.position.x += axis.clamp(-1.0, 1.0) * self.move_speed * dt;
    }

    /// Jump when grounded. Returns the impulse for the host to apply.
    pub fn jump(&mut self) -> Option<f32> {
        if self.dead || !self.enabled || !self.grounded {
            return None;
        }
        self.grounded = false;
        Some(self.jump_force)
    }

    /// Collider in world space, if it can still collide
    pub fn world_collider(&self) -> Option<Collider> {
        self.collider_enabled
            .then(|| self.collider.translated(self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character() -> Character {
        Character::new(&CharacterTuning::default())
    }

    #[test]
    fn test_starts_as_sphere() {
        let c = character();
        assert_eq!(c.shape, Shape::Sphere);
        assert_eq!(c.visuals.active_count(), 1);
        assert_eq!(c.collider, collider_for(Shape::Sphere));
        assert_eq!(c.health, 3.0);
    }

    #[test]
    fn test_change_shape_swaps_atomically() {
        let mut c = character();
        assert!(c.change_shape(Shape::Cube));
        assert_eq!(c.visuals.active_count(), 1);
        assert!(c.visuals.is_active(Shape::Cube));
        assert_eq!(c.collider, collider_for(Shape::Cube));

        assert!(c.change_shape(Shape::Flat));
        assert!(!c.visuals.is_active(Shape::Cube));
        assert_eq!(c.collider, collider_for(Shape::Flat));
    }

    #[test]
    fn test_lethal_damage_kills_once() {
        let mut c = character();
        assert_eq!(c.take_damage(1.0), DamageOutcome::Hurt);
        assert_eq!(c.take_damage(2.0), DamageOutcome::Died);
        assert!(c.dead);
        assert!(c.kinematic);
        assert!(!c.collider_enabled);

        let snapshot = c.clone();
        assert_eq!(c.take_damage(5.0), DamageOutcome::Ignored);
        assert_eq!(c.die(), DamageOutcome::Ignored);
        assert_eq!(c, snapshot);
    }

    #[test]
    fn test_health_stays_in_range() {
        let mut c = character();
        assert_eq!(c.take_damage(-4.0), DamageOutcome::Ignored);
        assert_eq!(c.health, c.max_health);

        assert_eq!(c.take_damage(5.0), DamageOutcome::Died);
        assert_eq!(c.health, 0.0);
        assert!((0.0..=c.max_health).contains(&c.health));
    }

    #[test]
    fn test_dead_keeps_visuals_and_refuses_shape() {
        let mut c = character();
        c.change_shape(Shape::Cube);
        c.die();
        assert!(!c.change_shape(Shape::Flat));
        assert_eq!(c.shape, Shape::Cube);
        assert!(c.visuals.is_active(Shape::Cube));
        assert!(c.world_collider().is_none());
    }

    #[test]
    fn test_grounding_and_jump() {
        let mut c = character();
        assert_eq!(c.jump(), Some(5.0));
        assert!(!c.grounded);
        assert_eq!(c.jump(), None);

        // Wall contact does not ground
        c.on_contact(Vec3::X);
        assert!(!c.grounded);
        c.on_contact(Vec3::new(0.0, 0.6, 0.8));
        assert!(c.grounded);
    }

    #[test]
    fn test_movement_ignored_when_disabled() {
        let mut c = character();
        c.move_horizontal(2.0, 1.0);
        assert_eq!(c.position.x, 5.0);
        c.enabled = false;
        c.move_horizontal(1.0, 1.0);
        assert_eq!(c.position.x, 5.0);
    }
}
