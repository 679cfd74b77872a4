//! Collider descriptors and overlap tests
//!
//! The character's collision volume is a tagged variant assigned by value;
//! swapping shape replaces the whole descriptor. Hazard parts are axis-aligned
//! boxes. The overlap tests here let a host without a physics engine turn
//! geometry into contact events.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Collision volume in the owner's local space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Sphere { center: Vec3, radius: f32 },
    Box { center: Vec3, size: Vec3 },
}

impl Collider {
    /// Move the volume into world space at `origin`
    pub fn translated(&self, origin: Vec3) -> Collider {
        match *self {
            Collider::Sphere { center, radius } => Collider::Sphere {
                center: center + origin,
                radius,
            },
            Collider::Box { center, size } => Collider::Box {
                center: center + origin,
                size,
            },
        }
    }

    /// Test against an axis-aligned box given by center and half extents
    pub fn overlaps_box(&self, box_center: Vec3, half_extents: Vec3) -> bool {
        match *self {
            Collider::Sphere { center, radius } => {
                sphere_box_overlap(center, radius, box_center, half_extents)
            }
            Collider::Box { center, size } => {
                box_box_overlap(center, size * 0.5, box_center, half_extents)
            }
        }
    }
}

/// Hazard classification stamped on every part of a spawned obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardTag {
    Obstacle,
}

/// One hazard volume of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardPart {
    pub offset: Vec3,
    pub half_extents: Vec3,
    pub tag: HazardTag,
    /// Reports overlap without physical response
    pub trigger: bool,
}

/// Fixed per-shape collider table
pub fn collider_for(shape: super::character::Shape) -> Collider {
    use super::character::Shape;
    match shape {
        Shape::Sphere => Collider::Sphere {
            center: Vec3::from_array(SPHERE_CENTER),
            radius: SPHERE_RADIUS,
        },
        Shape::Cube => Collider::Box {
            center: Vec3::from_array(CUBE_CENTER),
            size: Vec3::from_array(CUBE_SIZE),
        },
        Shape::Flat => Collider::Box {
            center: Vec3::from_array(FLAT_CENTER),
            size: Vec3::from_array(FLAT_SIZE),
        },
    }
}

fn sphere_box_overlap(center: Vec3, radius: f32, box_center: Vec3, half: Vec3) -> bool {
    let closest = center.clamp(box_center - half, box_center + half);
    closest.distance_squared(center) <= radius * radius
}

fn box_box_overlap(a_center: Vec3, a_half: Vec3, b_center: Vec3, b_half: Vec3) -> bool {
    let d = (a_center - b_center).abs();
    let reach = a_half + b_half;
    d.x <= reach.x && d.y <= reach.y && d.z <= reach.z
}
