//! Pursuer AI
//!
//! Each ghost re-plans only when it reaches a tile it has not processed yet,
//! and only when that tile offers something other than carrying straight on.
//! Planning picks the exit whose next tile centre is closest to the active
//! target, never turning back unless the tile is a dead end.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{GridMap, Passage, TileKind};
use super::motion::{Direction, is_centered, nearest_tile, snap_to_grid, wrap_tunnel};
use crate::consts::TILE_SIZE;
use crate::settings::Settings;
use crate::{entity_center, tile_center};

/// Chase distance (in tiles) inside which Clyde gives up
const CLYDE_SHY_TILES: f32 = 8.0;
/// How far ahead of the player Pinky aims
const PINKY_LEAD_TILES: f32 = 4.0;
/// Inky's pivot distance ahead of the player
const INKY_PIVOT_TILES: f32 = 2.0;

/// The four pursuer archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhostKind {
    /// Direct pursuer, also the leader Inky flanks from
    Blinky,
    /// Ambusher
    Pinky,
    /// Flanker
    Inky,
    /// Shy one
    Clyde,
}

impl GhostKind {
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];

    pub fn index(self) -> usize {
        match self {
            GhostKind::Blinky => 0,
            GhostKind::Pinky => 1,
            GhostKind::Inky => 2,
            GhostKind::Clyde => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GhostKind::Blinky => "blinky",
            GhostKind::Pinky => "pinky",
            GhostKind::Inky => "inky",
            GhostKind::Clyde => "clyde",
        }
    }

    /// Home tile for Scatter, just outside the maze
    pub fn scatter_tile(self, map: &GridMap) -> (i32, i32) {
        let rows = map.rows() as i32;
        let cols = map.cols() as i32;
        match self {
            GhostKind::Blinky => (-3, cols - 3),
            GhostKind::Pinky => (-3, 2),
            GhostKind::Inky => (rows + 2, cols - 1),
            GhostKind::Clyde => (rows + 2, 0),
        }
    }

    pub fn scatter_target(self, map: &GridMap) -> Vec2 {
        let (row, col) = self.scatter_tile(map);
        tile_center(row, col)
    }

    /// Map corner each kind flees to while Frightened
    pub fn frightened_target(self, map: &GridMap) -> Vec2 {
        let w = map.pixel_width();
        let h = map.pixel_height();
        match self {
            GhostKind::Blinky => Vec2::new(w, 0.0),
            GhostKind::Pinky => Vec2::ZERO,
            GhostKind::Inky => Vec2::new(w, h),
            GhostKind::Clyde => Vec2::new(0.0, h),
        }
    }

    /// Chase-mode target for a ghost of this kind whose centre is `own_center`
    pub fn chase_target(self, ctx: &Pursuit, own_center: Vec2) -> Vec2 {
        match self {
            GhostKind::Blinky => ctx.player_center,
            GhostKind::Pinky => ambush_target(ctx),
            GhostKind::Inky => flank_target(ctx),
            GhostKind::Clyde => shy_target(ctx, own_center),
        }
    }
}

fn ambush_target(ctx: &Pursuit) -> Vec2 {
    ctx.player_center + ctx.player_facing.vector() * PINKY_LEAD_TILES * TILE_SIZE
}

fn flank_target(ctx: &Pursuit) -> Vec2 {
    let Some(leader) = ctx.leader_center else {
        return ctx.player_center;
    };
    let pivot = ctx.player_center + ctx.player_facing.vector() * INKY_PIVOT_TILES * TILE_SIZE;
    leader + (pivot - leader) * 2.0
}

fn shy_target(ctx: &Pursuit, own_center: Vec2) -> Vec2 {
    let reach = CLYDE_SHY_TILES * TILE_SIZE;
    if own_center.distance_squared(ctx.player_center) > reach * reach {
        ctx.player_center
    } else {
        GhostKind::Clyde.scatter_target(ctx.map)
    }
}

/// Everything a ghost looks at when choosing where to go
#[derive(Debug, Clone, Copy)]
pub struct Pursuit<'a> {
    pub map: &'a GridMap,
    pub player_center: Vec2,
    pub player_facing: Direction,
    /// Blinky's centre, when Blinky exists
    pub leader_center: Option<Vec2>,
    pub scatter: bool,
    /// Global Frightened flag
    pub frightened: bool,
    /// Waypoint the exit routine heads for
    pub house_exit: Vec2,
}

/// Choose an exit from tile (row, col).
///
/// The reverse of `current` is only allowed when it is the sole exit. Among
/// the allowed exits the one whose next tile centre is closest to `target`
/// wins; ties go to the earlier entry in `Direction::ALL` order. Returns
/// `Direction::None` when `exits` is empty.
pub fn pick_direction(
    row: i32,
    col: i32,
    current: Direction,
    exits: &[Direction],
    target: Vec2,
) -> Direction {
    let reverse = current.opposite();
    let dead_end = exits.iter().all(|&d| !reverse.is_none() && d == reverse);

    let mut best = Direction::None;
    let mut best_dist = f32::INFINITY;
    for &dir in exits {
        if dir == reverse && !dead_end {
            continue;
        }
        let (dr, dc) = dir.tile_offset();
        let dist = tile_center(row + dr, col + dc).distance_squared(target);
        if dist < best_dist {
            best = dir;
            best_dist = dist;
        }
    }
    best
}

/// Passable exits of a tile, in `Direction::ALL` order
fn exits_from(map: &GridMap, row: i32, col: i32) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&dir| !Passage::HouseBarred.blocks(map.neighbor(row, col, dir)))
        .collect()
}

/// Move `from` toward `to` by at most `step`, landing exactly when close
fn approach(from: f32, to: f32, step: f32) -> f32 {
    let delta = to - from;
    if delta.abs() <= step {
        to
    } else {
        from + step * delta.signum()
    }
}

/// A pursuer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    pub kind: GhostKind,
    /// Top-left of the bounding box
    pub pos: Vec2,
    pub direction: Direction,
    /// Pixels per tick, recomputed every update
    pub speed: f32,
    /// Moving and colliding
    pub active: bool,
    /// Already eaten during the current Frightened period
    pub eaten: bool,
    /// Inside the house; the exit routine drives it until it reaches the door
    pub housed: bool,
    /// Round time at which an inactive ghost is released
    pub release_at: f32,
    spawn: Vec2,
    /// Last tile a decision was considered on
    last_tile: Option<(i32, i32)>,
}

impl Ghost {
    /// Place a ghost at `spawn`, released `delay` seconds after `now`
    pub fn new(kind: GhostKind, spawn: Vec2, map: &GridMap, now: f32, delay: f32) -> Self {
        let mut ghost = Self {
            kind,
            pos: spawn,
            direction: Direction::None,
            speed: 0.0,
            active: false,
            eaten: false,
            housed: false,
            release_at: 0.0,
            spawn,
            last_tile: None,
        };
        ghost.reset(map, now, delay);
        ghost
    }

    pub fn center(&self) -> Vec2 {
        entity_center(self.pos)
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Frightened from this ghost's point of view
    pub fn is_frightened(&self, global_frightened: bool) -> bool {
        global_frightened && !self.eaten
    }

    /// Back to spawn with a fresh release timer
    pub fn reset(&mut self, map: &GridMap, now: f32, delay: f32) {
        self.eaten = false;
        self.place(self.spawn, map);
        self.active = delay <= 0.0;
        self.release_at = now + delay;
    }

    /// Relocate an eaten ghost into the house and bench it
    pub fn send_home(&mut self, interior: Vec2, map: &GridMap, release_at: f32) {
        self.place(interior, map);
        self.active = false;
        self.release_at = release_at;
    }

    fn place(&mut self, pos: Vec2, map: &GridMap) {
        self.pos = pos;
        self.direction = Direction::None;
        self.housed = map.tile_at_pixel(entity_center(pos)) == TileKind::GhostHouse;
        self.last_tile = None;
    }

    /// Turn around on a Scatter/Chase flip
    pub fn reverse(&mut self) {
        if !self.housed && !self.direction.is_none() {
            self.direction = self.direction.opposite();
        }
    }

    /// Where this ghost is heading right now
    pub fn target(&self, ctx: &Pursuit) -> Vec2 {
        if self.is_frightened(ctx.frightened) {
            self.kind.frightened_target(ctx.map)
        } else if ctx.scatter {
            self.kind.scatter_target(ctx.map)
        } else {
            self.kind.chase_target(ctx, self.center())
        }
    }

    /// Advance one tick
    pub fn update(&mut self, ctx: &Pursuit, settings: &Settings) {
        self.speed = if self.is_frightened(ctx.frightened) {
            settings.frightened_speed
        } else {
            settings.ghost_speed
        };

        if self.housed {
            self.leave_house(ctx.house_exit);
            return;
        }

        let map = ctx.map;
        if is_centered(self.pos, self.speed) {
            let (row, col) = nearest_tile(self.pos);
            let tile = (row, map.wrap_col(col));
            if self.last_tile != Some(tile) {
                self.last_tile = Some(tile);
                if !self.in_corridor(map, row, col) {
                    self.decide(ctx);
                }
            }
        }

        if !self.direction.is_none()
            && map.can_advance_through(self.pos, self.speed, self.direction, Passage::HouseBarred)
        {
            self.pos += self.direction.vector() * self.speed;
        } else {
            self.pos = snap_to_grid(self.pos);
            self.decide(ctx);
        }

        wrap_tunnel(&mut self.pos, map.pixel_width());
    }

    /// Only way on is straight ahead
    fn in_corridor(&self, map: &GridMap, row: i32, col: i32) -> bool {
        if self.direction.is_none() {
            return false;
        }
        let reverse = self.direction.opposite();
        let mut onward = exits_from(map, row, col).into_iter().filter(|&d| d != reverse);
        onward.next() == Some(self.direction) && onward.next().is_none()
    }

    fn decide(&mut self, ctx: &Pursuit) {
        self.pos = snap_to_grid(self.pos);
        let (row, col) = nearest_tile(self.pos);
        let exits = exits_from(ctx.map, row, col);
        let target = self.target(ctx);
        let choice = pick_direction(row, col, self.direction, &exits, target);
        if choice != self.direction {
            log::trace!("{} turns {:?} at ({row}, {col})", self.kind.name(), choice);
        }
        self.direction = choice;
    }

    /// Scripted walk to the exit waypoint: x first, then y
    fn leave_house(&mut self, exit: Vec2) {
        let delta = exit - self.pos;
        self.direction = if delta.x.abs() > delta.y.abs() {
            if delta.x < 0.0 { Direction::Left } else { Direction::Right }
        } else if delta.y < 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };

        if self.pos.x != exit.x {
            self.pos.x = approach(self.pos.x, exit.x, self.speed);
        } else {
            self.pos.y = approach(self.pos.y, exit.y, self.speed);
        }

        if self.pos == exit {
            self.housed = false;
            self.last_tile = None;
            log::debug!("{} left the house", self.kind.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::Layout;
    use crate::tile_origin;
    use proptest::prelude::*;

    fn pursuit(layout: &Layout, player_center: Vec2, facing: Direction) -> Pursuit<'_> {
        Pursuit {
            map: &layout.map,
            player_center,
            player_facing: facing,
            leader_center: None,
            scatter: false,
            frightened: false,
            house_exit: layout.house_exit,
        }
    }

    #[test]
    fn test_blinky_and_pinky_targets() {
        let layout = Layout::classic();
        let player = tile_center(22, 13);
        let ctx = pursuit(&layout, player, Direction::Left);
        let own = tile_center(5, 5);

        assert_eq!(GhostKind::Blinky.chase_target(&ctx, own), player);
        assert_eq!(
            GhostKind::Pinky.chase_target(&ctx, own),
            player - Vec2::new(4.0 * TILE_SIZE, 0.0)
        );

        // Standing still: Pinky aims at the player
        let idle = pursuit(&layout, player, Direction::None);
        assert_eq!(GhostKind::Pinky.chase_target(&idle, own), player);
    }

    #[test]
    fn test_inky_flanks_from_leader() {
        let layout = Layout::classic();
        let player = Vec2::new(100.0, 100.0);
        let mut ctx = pursuit(&layout, player, Direction::Up);
        let own = Vec2::ZERO;

        // No leader: direct pursuit
        assert_eq!(GhostKind::Inky.chase_target(&ctx, own), player);

        ctx.leader_center = Some(Vec2::new(60.0, 100.0));
        // pivot = (100, 48); leader + 2 * (40, -52)
        assert_eq!(GhostKind::Inky.chase_target(&ctx, own), Vec2::new(140.0, -4.0));
    }

    #[test]
    fn test_clyde_is_shy() {
        let layout = Layout::classic();
        let player = tile_center(22, 13);
        let ctx = pursuit(&layout, player, Direction::Left);
        let corner = GhostKind::Clyde.scatter_target(&layout.map);

        let far = player - Vec2::new(0.0, 9.0 * TILE_SIZE);
        assert_eq!(GhostKind::Clyde.chase_target(&ctx, far), player);

        let near = player - Vec2::new(0.0, 7.0 * TILE_SIZE);
        assert_eq!(GhostKind::Clyde.chase_target(&ctx, near), corner);

        // Exactly eight tiles counts as close
        let edge = player - Vec2::new(0.0, 8.0 * TILE_SIZE);
        assert_eq!(GhostKind::Clyde.chase_target(&ctx, edge), corner);
    }

    #[test]
    fn test_mode_selects_target() {
        let layout = Layout::classic();
        let player = tile_center(22, 13);
        let mut ctx = pursuit(&layout, player, Direction::Left);
        let mut ghost = Ghost::new(GhostKind::Blinky, layout.ghost_spawns[0], &layout.map, 0.0, 0.0);

        assert_eq!(ghost.target(&ctx), player);

        ctx.scatter = true;
        assert_eq!(ghost.target(&ctx), tile_center(-3, 25));

        ctx.frightened = true;
        assert_eq!(ghost.target(&ctx), Vec2::new(layout.map.pixel_width(), 0.0));

        // Eaten ghosts ignore Frightened
        ghost.eaten = true;
        assert_eq!(ghost.target(&ctx), tile_center(-3, 25));
    }

    #[test]
    fn test_frightened_corners_are_distinct() {
        let layout = Layout::classic();
        let corners: std::collections::HashSet<_> = GhostKind::ALL
            .iter()
            .map(|k| {
                let c = k.frightened_target(&layout.map);
                (c.x as i32, c.y as i32)
            })
            .collect();
        assert_eq!(corners.len(), 4);
    }

    #[test]
    fn test_pick_direction_rules() {
        let target = tile_center(0, 0);
        let all = Direction::ALL;

        // Up and Left tie on distance; Up comes first
        let dir = pick_direction(5, 5, Direction::None, &all, tile_center(4, 4));
        assert_eq!(dir, Direction::Up);

        // Moving Down: Up is the reverse and is skipped
        let dir = pick_direction(5, 5, Direction::Down, &all, target);
        assert_eq!(dir, Direction::Left);

        // Dead end: the reverse is taken
        let dir = pick_direction(5, 5, Direction::Down, &[Direction::Up], target);
        assert_eq!(dir, Direction::Up);

        assert_eq!(pick_direction(5, 5, Direction::Down, &[], target), Direction::None);
    }

    #[test]
    fn test_ghost_starts_housed_or_not() {
        let layout = Layout::classic();
        let housed: Vec<bool> = GhostKind::ALL
            .iter()
            .map(|&k| Ghost::new(k, layout.ghost_spawns[k.index()], &layout.map, 0.0, 1.0).housed)
            .collect();
        assert_eq!(housed, vec![false, true, true, true]);

        let blinky = Ghost::new(GhostKind::Blinky, layout.ghost_spawns[0], &layout.map, 0.0, 0.0);
        assert!(blinky.active);
        let pinky = Ghost::new(GhostKind::Pinky, layout.ghost_spawns[1], &layout.map, 2.0, 5.0);
        assert!(!pinky.active);
        assert_eq!(pinky.release_at, 7.0);
    }

    #[test]
    fn test_leave_house_reaches_exit() {
        let layout = Layout::classic();
        let settings = Settings::default();
        let ctx = pursuit(&layout, tile_center(22, 13), Direction::None);

        for kind in [GhostKind::Pinky, GhostKind::Inky, GhostKind::Clyde] {
            let mut ghost = Ghost::new(kind, layout.ghost_spawns[kind.index()], &layout.map, 0.0, 0.0);
            let mut ticks = 0;
            while ghost.housed {
                ghost.update(&ctx, &settings);
                assert!(
                    layout.map.box_is_clear(ghost.pos, Passage::Open),
                    "{kind:?} clipped a wall at {:?}",
                    ghost.pos
                );
                ticks += 1;
                assert!(ticks < 200, "{kind:?} never left the house");
            }
            assert_eq!(ghost.pos, layout.house_exit);
            assert_eq!(ghost.direction, Direction::Up);
        }
    }

    #[test]
    fn test_corridor_does_not_replan() {
        let layout = Layout::classic();
        let settings = Settings::default();
        // Row 5 col 3 is a straight horizontal run
        let mut ghost = Ghost::new(GhostKind::Blinky, tile_origin(5, 3), &layout.map, 0.0, 0.0);
        ghost.direction = Direction::Right;
        // Target far up-left would otherwise pull it around
        let ctx = pursuit(&layout, tile_center(1, 1), Direction::None);
        ghost.update(&ctx, &settings);
        assert_eq!(ghost.direction, Direction::Right);
        assert_eq!(ghost.pos, tile_origin(5, 3) + Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_intersection_turns_toward_target() {
        let layout = Layout::classic();
        let settings = Settings::default();
        // Row 5 col 6 is a four-way junction
        let mut ghost = Ghost::new(GhostKind::Blinky, tile_origin(5, 6), &layout.map, 0.0, 0.0);
        ghost.direction = Direction::Right;
        let ctx = pursuit(&layout, tile_center(22, 6), Direction::None);
        ghost.update(&ctx, &settings);
        assert_eq!(ghost.direction, Direction::Down);
        assert_eq!(ghost.pos, tile_origin(5, 6) + Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_no_u_turn_at_junction() {
        let layout = Layout::classic();
        let settings = Settings::default();
        let mut ghost = Ghost::new(GhostKind::Blinky, tile_origin(5, 6), &layout.map, 0.0, 0.0);
        ghost.direction = Direction::Right;
        // Target is straight behind
        let ctx = pursuit(&layout, tile_center(5, 1), Direction::None);
        ghost.update(&ctx, &settings);
        assert_ne!(ghost.direction, Direction::Left);
    }

    #[test]
    fn test_frightened_speed_and_eaten_speed() {
        let layout = Layout::classic();
        let settings = Settings::default();
        let mut ctx = pursuit(&layout, tile_center(22, 13), Direction::None);
        ctx.frightened = true;
        let mut ghost = Ghost::new(GhostKind::Blinky, tile_origin(5, 3), &layout.map, 0.0, 0.0);
        ghost.direction = Direction::Right;

        ghost.update(&ctx, &settings);
        assert_eq!(ghost.speed, settings.frightened_speed);

        ghost.eaten = true;
        ghost.update(&ctx, &settings);
        assert_eq!(ghost.speed, settings.ghost_speed);
    }

    #[test]
    fn test_send_home_and_reverse() {
        let layout = Layout::classic();
        let mut ghost = Ghost::new(GhostKind::Blinky, tile_origin(5, 3), &layout.map, 0.0, 0.0);
        ghost.direction = Direction::Left;
        ghost.reverse();
        assert_eq!(ghost.direction, Direction::Right);

        ghost.eaten = true;
        ghost.send_home(layout.house_interior, &layout.map, 12.0);
        assert!(ghost.housed);
        assert!(!ghost.active);
        assert!(ghost.eaten);
        assert_eq!(ghost.pos, layout.house_interior);
        assert_eq!(ghost.release_at, 12.0);

        // Housed ghosts ignore reversal
        ghost.direction = Direction::Up;
        ghost.reverse();
        assert_eq!(ghost.direction, Direction::Up);
    }

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::None),
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn never_reverses_with_alternatives(
            current in any_direction(),
            mask in 1u8..16,
            tx in -200.0f32..1000.0,
            ty in -200.0f32..1000.0,
        ) {
            let exits: Vec<Direction> = Direction::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, d)| *d)
                .collect();
            let choice = pick_direction(10, 10, current, &exits, Vec2::new(tx, ty));
            prop_assert!(exits.contains(&choice));
            if exits.iter().any(|&d| d != current.opposite()) && !current.is_none() {
                prop_assert_ne!(choice, current.opposite());
            }
        }

        #[test]
        fn roaming_ghost_never_overlaps_a_wall(
            kind_idx in 0usize..4,
            targets in prop::collection::vec((0i32..30, 0i32..28, any::<bool>()), 1..8),
        ) {
            let layout = Layout::classic();
            let settings = Settings::default();
            let kind = GhostKind::ALL[kind_idx];
            let mut ghost = Ghost::new(kind, layout.ghost_spawns[kind.index()], &layout.map, 0.0, 0.0);
            let mut leader = None;
            for (row, col, frightened) in targets {
                let mut ctx = pursuit(&layout, tile_center(row, col), Direction::Left);
                ctx.frightened = frightened;
                ctx.leader_center = leader;
                for _ in 0..60 {
                    ghost.update(&ctx, &settings);
                    let passage = if ghost.housed { Passage::Open } else { Passage::HouseBarred };
                    prop_assert!(layout.map.box_is_clear(ghost.pos, passage), "overlap at {:?}", ghost.pos);
                }
                leader = Some(ghost.center());
            }
        }
    }
}
