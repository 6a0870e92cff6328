//! Maze layouts: tile matrix plus the fixed spawn and house coordinates

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ghost::GhostKind;
use super::grid::{GridMap, MapError, Passage, TileKind};
use crate::consts::TILE_SIZE;
use crate::tile_origin;

/// The classic 28x30 board.
///
/// `#` wall, `.` floor (holds a pill), `o` power pill, `_` ghost house.
/// Row 14 is the side tunnel.
pub const CLASSIC_BOARD: [&str; 30] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.#####.##.#####.######",
    "######.#####.##.#####.######",
    "######.##..........##.######",
    "######.##.###__###.##.######",
    "######.##.#______#.##.######",
    "..........#______#..........",
    "######.##.#______#.##.######",
    "######.##.########.##.######",
    "######.##..........##.######",
    "######.##.########.##.######",
    "######.##.########.##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o..##................##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Width of every classic row
const CLASSIC_COLS: usize = 28;

/// Every classic row has the full width and only known glyphs
const fn classic_board_is_valid() -> bool {
    let mut row = 0;
    while row < CLASSIC_BOARD.len() {
        let glyphs = CLASSIC_BOARD[row].as_bytes();
        if glyphs.len() != CLASSIC_COLS {
            return false;
        }
        let mut col = 0;
        while col < glyphs.len() {
            if !matches!(glyphs[col], b'#' | b'.' | b'o' | b'_') {
                return false;
            }
            col += 1;
        }
        row += 1;
    }
    true
}

const _: () = assert!(classic_board_is_valid(), "classic board is malformed");

/// Map plus every fixed coordinate a round needs (all top-left pixels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub map: GridMap,
    pub player_spawn: Vec2,
    /// Indexed by `GhostKind::index`
    pub ghost_spawns: [Vec2; 4],
    /// Where an eaten ghost is sent
    pub house_interior: Vec2,
    /// Waypoint just outside the house door
    pub house_exit: Vec2,
}

impl Layout {
    /// The built-in board with the arcade spawn points
    pub fn classic() -> Self {
        // Shape and glyphs are checked at compile time
        let tiles = CLASSIC_BOARD
            .iter()
            .flat_map(|row| row.chars())
            .map(|glyph| glyph_tile(glyph).unwrap_or(TileKind::Wall))
            .collect();
        let map = GridMap::from_tiles(CLASSIC_BOARD.len(), CLASSIC_COLS, tiles);
        let half = TILE_SIZE / 2.0;
        Self {
            map,
            player_spawn: tile_origin(22, 13),
            ghost_spawns: [
                tile_origin(11, 13),
                tile_origin(14, 13),
                tile_origin(14, 11) + Vec2::new(half, 0.0),
                tile_origin(14, 14) + Vec2::new(half, 0.0),
            ],
            house_interior: tile_origin(14, 13),
            house_exit: tile_origin(11, 13),
        }
    }

    /// Build a layout from a text board, validating every spawn point
    pub fn from_board(
        rows: &[&str],
        player_spawn: Vec2,
        ghost_spawns: [Vec2; 4],
        house_interior: Vec2,
        house_exit: Vec2,
    ) -> Result<Self, MapError> {
        let map = parse_board(rows)?;

        if !map.box_is_clear(player_spawn, Passage::HouseBarred) {
            return Err(MapError::BlockedSpawn { what: "player" });
        }
        for kind in GhostKind::ALL {
            if !map.box_is_clear(ghost_spawns[kind.index()], Passage::Open) {
                return Err(MapError::BlockedSpawn { what: kind.name() });
            }
        }
        if !map.box_is_clear(house_interior, Passage::Open) {
            return Err(MapError::BlockedSpawn { what: "house interior" });
        }
        if !map.box_is_clear(house_exit, Passage::HouseBarred) {
            return Err(MapError::BlockedSpawn { what: "house exit" });
        }

        Ok(Self {
            map,
            player_spawn,
            ghost_spawns,
            house_interior,
            house_exit,
        })
    }
}

fn glyph_tile(glyph: char) -> Option<TileKind> {
    match glyph {
        '#' => Some(TileKind::Wall),
        '.' => Some(TileKind::Floor),
        'o' => Some(TileKind::PowerPill),
        '_' => Some(TileKind::GhostHouse),
        _ => None,
    }
}

/// Parse a text board into a map
pub fn parse_board(rows: &[&str]) -> Result<GridMap, MapError> {
    let cols = rows.first().map(|r| r.chars().count()).unwrap_or(0);
    if cols == 0 {
        return Err(MapError::Empty);
    }

    let mut tiles = Vec::with_capacity(rows.len() * cols);
    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != cols {
            return Err(MapError::Ragged {
                row,
                expected: cols,
                found,
            });
        }
        for (col, glyph) in line.chars().enumerate() {
            tiles.push(glyph_tile(glyph).ok_or(MapError::UnknownTile { glyph, row, col })?);
        }
    }

    Ok(GridMap::from_tiles(rows.len(), cols, tiles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    #[test]
    fn test_classic_layout_dimensions() {
        let layout = Layout::classic();
        assert_eq!(layout.map.rows(), 30);
        assert_eq!(layout.map.cols(), 28);
        assert_eq!(layout.map.classify(22, 13), TileKind::Floor);
        assert_eq!(layout.map.classify(12, 13), TileKind::GhostHouse);
        assert_eq!(layout.map.classify(3, 1), TileKind::PowerPill);
    }

    #[test]
    fn test_classic_map_matches_parsed_board() {
        assert_eq!(parse_board(&CLASSIC_BOARD), Ok(Layout::classic().map));
    }

    #[test]
    fn test_classic_spawns_validate() {
        let classic = Layout::classic();
        let rebuilt = Layout::from_board(
            &CLASSIC_BOARD,
            classic.player_spawn,
            classic.ghost_spawns,
            classic.house_interior,
            classic.house_exit,
        )
        .unwrap();
        assert_eq!(rebuilt, classic);
    }

    #[test]
    fn test_spawn_in_wall_is_rejected() {
        let classic = Layout::classic();
        let err = Layout::from_board(
            &CLASSIC_BOARD,
            tile_origin(0, 0),
            classic.ghost_spawns,
            classic.house_interior,
            classic.house_exit,
        )
        .unwrap_err();
        assert_eq!(err, MapError::BlockedSpawn { what: "player" });
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_board(&[]), Err(MapError::Empty));
        assert!(matches!(parse_board(&["#.", "#"]), Err(MapError::Ragged { row: 1, .. })));
        assert_eq!(
            parse_board(&["#x"]),
            Err(MapError::UnknownTile {
                glyph: 'x',
                row: 0,
                col: 1
            })
        );
    }

    /// Every pill must be reachable from the player spawn or a level could
    /// never be cleared.
    #[test]
    fn test_every_floor_tile_is_reachable() {
        let map = Layout::classic().map;
        let start = (22, 13);
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some((row, col)) = queue.pop_front() {
            for dir in crate::sim::Direction::ALL {
                let (dr, dc) = dir.tile_offset();
                let next = (row + dr, map.wrap_col(col + dc));
                if !Passage::HouseBarred.blocks(map.classify(next.0, next.1)) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        for (row, col, tile) in map.tiles() {
            if matches!(tile, TileKind::Floor | TileKind::PowerPill) {
                assert!(seen.contains(&(row, col)), "tile ({row}, {col}) is unreachable");
            }
        }
    }
}
