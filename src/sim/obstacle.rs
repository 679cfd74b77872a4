//! Obstacles and the registry that owns them
//!
//! The registry is the single owner of live obstacles. Everything else refers
//! to an obstacle by id and must tolerate the id no longer resolving.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{HazardPart, HazardTag};
use super::pendulum::Pendulum;
use crate::tuning::ObstacleTemplate;

/// Obstacle category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    StaticHazard,
    SwingingHazard,
}

/// What was spawned, fixed at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub archetype: Archetype,
    /// Index into the static templates (0 for the swinging template)
    pub template: usize,
    pub spawn_position: Vec3,
    /// Swing phase in degrees, swinging hazards only
    pub phase: Option<f32>,
}

/// A live obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub spec: ObstacleSpec,
    pub position: Vec3,
    pub alive: bool,
    pub parts: Vec<HazardPart>,
    pub deadly: bool,
    pub damage: f32,
    pub pendulum: Option<Pendulum>,
}

impl Obstacle {
    /// Build an obstacle from its template; every part is tagged as a hazard trigger
    pub fn from_template(id: u32, spec: ObstacleSpec, template: &ObstacleTemplate) -> Self {
        let parts = template
            .parts
            .iter()
            .map(|p| HazardPart {
                offset: p.offset,
                half_extents: p.half_extents,
                tag: HazardTag::Obstacle,
                trigger: true,
            })
            .collect();

        let pendulum = match (spec.phase, &template.pendulum) {
            (Some(phase), Some(tuning)) => Some(Pendulum::new(tuning, phase, Vec3::ONE)),
            _ => None,
        };

        Self {
            id,
            position: spec.spawn_position,
            spec,
            alive: true,
            parts,
            deadly: template.deadly,
            damage: template.damage,
            pendulum,
        }
    }

    /// World-space centers and half extents of each hazard part
    pub fn part_bounds(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.parts.iter().map(move |part| {
            let offset = match &self.pendulum {
                Some(p) => p.rotation * part.offset,
                None => part.offset,
            };
            (self.position + offset, part.half_extents)
        })
    }
}

/// Ordered collection of live obstacles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
    destroy_distance: f32,
}

impl ObstacleRegistry {
    pub fn new(destroy_distance: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            destroy_distance,
        }
    }

    pub fn insert(&mut self, obstacle: Obstacle) {
        debug_assert!(self.get(obstacle.id).is_none(), "duplicate obstacle id");
        self.obstacles.push(obstacle);
    }

    /// Scroll every live obstacle toward the player and evict those past the
    /// destroy distance. Returns the evicted ids.
    pub fn advance(&mut self, dt: f32, scroll_speed: f32) -> Vec<u32> {
        let mut evicted = Vec::new();
        for obstacle in self.obstacles.iter_mut().filter(|o| o.alive) {
            obstacle.position.z -= scroll_speed * dt;
            if obstacle.position.z < self.destroy_distance {
                obstacle.alive = false;
                evicted.push(obstacle.id);
            }
        }
        self.obstacles.retain(|o| o.alive);
        for id in &evicted {
            log::debug!("Obstacle {} evicted", id);
        }
        evicted
    }

    /// Advance every pendulum's local clock
    pub fn update_pendulums(&mut self, dt: f32) {
        for pendulum in self
            .obstacles
            .iter_mut()
            .filter(|o| o.alive)
            .filter_map(|o| o.pendulum.as_mut())
        {
            pendulum.update(dt);
        }
    }

    /// Destroy everything. Returns how many obstacles were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.obstacles.len();
        self.obstacles.clear();
        count
    }

    pub fn get(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id && o.alive)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.alive)
    }

    /// Live obstacles only
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
