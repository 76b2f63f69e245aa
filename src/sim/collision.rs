//! Axis-aligned bounding-box collision detection

use glam::Vec2;

use super::state::{Car, Obstacle};

/// An axis-aligned box described by its center and half-extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// Overlap test. Boxes that merely touch along an edge do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half + other.half;
        delta.x < reach.x && delta.y < reach.y
    }
}

/// Check whether the car overlaps an active obstacle
pub fn car_hits_obstacle(car: &Car, obstacle: &Obstacle) -> bool {
    if !obstacle.active {
        return false;
    }
    car.aabb()
        .intersects(&Aabb::from_center_size(obstacle.pos, obstacle.size))
}
