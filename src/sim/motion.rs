//! Grid-aligned movement primitives shared by the player and the ghosts
//!
//! Entity positions are the top-left corner of a tile-sized bounding box, so
//! an entity sits exactly on a tile when both coordinates are multiples of
//! `TILE_SIZE`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

/// Movement direction of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Every real direction, in tie-break order for ghost decisions
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector in screen space (y grows downward)
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::None => Vec2::ZERO,
        }
    }

    /// Tile offset as (row, col)
    pub fn tile_offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::None => (0, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    pub fn is_none(self) -> bool {
        self == Direction::None
    }
}

/// Distance from `v` to the nearest tile grid line along one axis
#[inline]
fn grid_offset(v: f32) -> f32 {
    let r = v.rem_euclid(TILE_SIZE);
    r.min(TILE_SIZE - r)
}

/// True when `pos` lies within `tolerance` pixels of a tile-aligned coordinate
/// on both axes.
///
/// Callers pass their current speed as the tolerance, so faster entities get
/// a wider turn window.
pub fn is_centered(pos: Vec2, tolerance: f32) -> bool {
    grid_offset(pos.x) <= tolerance && grid_offset(pos.y) <= tolerance
}

/// Tile (row, col) whose aligned position is nearest to `pos`.
///
/// The column is not wrapped; near the tunnel mouths it can be -1 or `cols`.
pub fn nearest_tile(pos: Vec2) -> (i32, i32) {
    (
        (pos.y / TILE_SIZE).round() as i32,
        (pos.x / TILE_SIZE).round() as i32,
    )
}

/// Snap `pos` onto the nearest tile-aligned coordinate
pub fn snap_to_grid(pos: Vec2) -> Vec2 {
    let (row, col) = nearest_tile(pos);
    crate::tile_origin(row, col)
}

/// Side-tunnel wraparound.
///
/// Once an entity is more than half a tile past the left or right edge of a
/// maze `maze_width` pixels wide it reappears at the mirrored coordinate on
/// the opposite side. Returns true when a wrap happened.
pub fn wrap_tunnel(pos: &mut Vec2, maze_width: f32) -> bool {
    let half = TILE_SIZE / 2.0;
    if pos.x < -half {
        pos.x += maze_width;
        true
    } else if pos.x > maze_width - half {
        pos.x -= maze_width;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIDTH: f32 = 28.0 * TILE_SIZE;

    #[test]
    fn test_opposites() {
        for dir in Direction::ALL {
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.vector() + dir.opposite().vector(), Vec2::ZERO);
        }
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn test_vectors_match_tile_offsets() {
        for dir in Direction::ALL {
            let (dr, dc) = dir.tile_offset();
            assert_eq!(dir.vector(), Vec2::new(dc as f32, dr as f32));
        }
    }

    #[test]
    fn test_centered_tolerance() {
        let aligned = Vec2::new(3.0 * TILE_SIZE, 5.0 * TILE_SIZE);
        assert!(is_centered(aligned, 0.0));
        assert!(is_centered(aligned + Vec2::new(2.0, 0.0), 2.5));
        assert!(is_centered(aligned - Vec2::new(2.5, 0.0), 2.5));
        assert!(!is_centered(aligned + Vec2::new(2.6, 0.0), 2.5));
        assert!(!is_centered(aligned + Vec2::new(0.0, 13.0), 2.5));
        // Frightened speed narrows the window
        assert!(!is_centered(aligned + Vec2::new(1.9, 0.0), 1.8));
    }

    #[test]
    fn test_snap_to_grid() {
        let pos = Vec2::new(3.0 * TILE_SIZE + 2.0, 5.0 * TILE_SIZE - 1.5);
        assert_eq!(snap_to_grid(pos), Vec2::new(3.0 * TILE_SIZE, 5.0 * TILE_SIZE));
        assert_eq!(nearest_tile(pos), (5, 3));
    }

    #[test]
    fn test_tunnel_wrap_both_sides() {
        let mut left = Vec2::new(-14.0, 100.0);
        assert!(wrap_tunnel(&mut left, WIDTH));
        assert_eq!(left.x, WIDTH - 14.0);

        let mut right = Vec2::new(WIDTH - 12.0, 100.0);
        assert!(wrap_tunnel(&mut right, WIDTH));
        assert_eq!(right.x, -12.0);

        let mut inside = Vec2::new(-13.0, 100.0);
        assert!(!wrap_tunnel(&mut inside, WIDTH));
    }

    proptest! {
        #[test]
        fn wrap_is_a_mirror_and_settles(offset in 0.01f32..8.0, y in 0.0f32..500.0) {
            let half = TILE_SIZE / 2.0;

            // Leaving through the right mouth
            let mut pos = Vec2::new(WIDTH - half + offset, y);
            prop_assert!(wrap_tunnel(&mut pos, WIDTH));
            prop_assert!((pos.x - (offset - half)).abs() < 1e-3);
            prop_assert_eq!(pos.y, y);
            prop_assert!(!wrap_tunnel(&mut pos, WIDTH));

            // Leaving through the left mouth
            let mut pos = Vec2::new(-half - offset, y);
            prop_assert!(wrap_tunnel(&mut pos, WIDTH));
            prop_assert!((pos.x - (WIDTH - half - offset)).abs() < 1e-3);
            prop_assert!(!wrap_tunnel(&mut pos, WIDTH));
        }
    }
}
