//! Player controller: buffered turns, instant reversal, tunnel wrap

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{GridMap, Passage};
use super::motion::{Direction, is_centered, snap_to_grid, wrap_tunnel};
use crate::entity_center;

/// The player-controlled entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the bounding box
    pub pos: Vec2,
    /// Applied direction
    pub direction: Direction,
    /// Buffered request, kept until it can be honored or replaced
    pub requested: Direction,
    /// Pixels per tick
    pub speed: f32,
    spawn: Vec2,
}

impl Player {
    pub fn new(spawn: Vec2, speed: f32) -> Self {
        Self {
            pos: spawn,
            direction: Direction::None,
            requested: Direction::None,
            speed,
            spawn,
        }
    }

    /// Record the direction the player wants to go next
    pub fn request(&mut self, dir: Direction) {
        self.requested = dir;
    }

    pub fn center(&self) -> Vec2 {
        entity_center(self.pos)
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Back to the spawn point, standing still
    pub fn reset(&mut self) {
        self.pos = self.spawn;
        self.direction = Direction::None;
        self.requested = Direction::None;
    }

    /// Advance one tick
    pub fn update(&mut self, map: &GridMap) {
        self.apply_request(map);

        if !self.direction.is_none()
            && map.can_advance_through(self.pos, self.speed, self.direction, Passage::HouseBarred)
        {
            self.pos += self.direction.vector() * self.speed;
            wrap_tunnel(&mut self.pos, map.pixel_width());
        }
    }

    fn apply_request(&mut self, map: &GridMap) {
        let wanted = self.requested;
        if wanted.is_none() {
            return;
        }
        if wanted == self.direction {
            self.requested = Direction::None;
            return;
        }

        // Reversal never needs a tile boundary
        if !self.direction.is_none() && wanted == self.direction.opposite() {
            self.direction = wanted;
            self.requested = Direction::None;
            return;
        }

        if !is_centered(self.pos, self.speed) {
            return;
        }
        let snapped = snap_to_grid(self.pos);
        if map.can_advance_through(snapped, self.speed, wanted, Passage::HouseBarred) {
            self.pos = snapped;
            self.direction = wanted;
            self.requested = Direction::None;
        }
    }
}
