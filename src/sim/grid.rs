//! Tile map of the maze
//!
//! The map is fixed once built: collectibles are tracked by the round state,
//! never by rewriting tiles. Everything outside the matrix reads as `Wall`,
//! except that pixel lookups wrap horizontally so the side tunnels join up.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::motion::Direction;
use crate::consts::{CORNER_PADDING, TILE_SIZE, TILE_SIZE_PX};

/// Classification of a single maze tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Floor,
    Wall,
    GhostHouse,
    PowerPill,
}

impl TileKind {
    /// Decode the numeric tile code (0 floor, 1 wall, 2 ghost house, 3 power pill)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TileKind::Floor),
            1 => Some(TileKind::Wall),
            2 => Some(TileKind::GhostHouse),
            3 => Some(TileKind::PowerPill),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            TileKind::Floor => 0,
            TileKind::Wall => 1,
            TileKind::GhostHouse => 2,
            TileKind::PowerPill => 3,
        }
    }

    pub fn is_wall(self) -> bool {
        self == TileKind::Wall
    }
}

/// Which tiles stop an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passage {
    /// Only walls block
    Open,
    /// Walls and the ghost house (door included) block
    HouseBarred,
}

impl Passage {
    pub fn blocks(self, tile: TileKind) -> bool {
        match self {
            Passage::Open => tile == TileKind::Wall,
            Passage::HouseBarred => matches!(tile, TileKind::Wall | TileKind::GhostHouse),
        }
    }
}

/// Problems found while building a map or layout
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no tiles")]
    Empty,
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile {glyph:?} at row {row}, col {col}")]
    UnknownTile { glyph: char, row: usize, col: usize },
    #[error("unknown tile code {code} at row {row}, col {col}")]
    UnknownCode { code: u8, row: usize, col: usize },
    #[error("{what} spawn overlaps a blocked tile")]
    BlockedSpawn { what: &'static str },
}

/// Immutable 2D tile matrix plus pixel/tile conversions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMap {
    rows: usize,
    cols: usize,
    /// Row-major tiles
    tiles: Vec<TileKind>,
}

impl GridMap {
    /// Build from rows of numeric tile codes
    pub fn from_codes(codes: &[Vec<u8>]) -> Result<Self, MapError> {
        let cols = codes.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(codes.len() * cols);
        for (row, line) in codes.iter().enumerate() {
            if line.len() != cols {
                return Err(MapError::Ragged {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
            for (col, &code) in line.iter().enumerate() {
                let tile = TileKind::from_code(code).ok_or(MapError::UnknownCode { code, row, col })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            rows: codes.len(),
            cols,
            tiles,
        })
    }

    pub(crate) fn from_tiles(rows: usize, cols: usize, tiles: Vec<TileKind>) -> Self {
        debug_assert_eq!(rows * cols, tiles.len());
        Self { rows, cols, tiles }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn pixel_width(&self) -> f32 {
        self.cols as f32 * TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.rows as f32 * TILE_SIZE
    }

    /// Tile at (row, col); anything out of bounds is a wall
    pub fn classify(&self, row: i32, col: i32) -> TileKind {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return TileKind::Wall;
        }
        self.tiles[row as usize * self.cols + col as usize]
    }

    pub fn is_walkable(&self, row: i32, col: i32) -> bool {
        !self.classify(row, col).is_wall()
    }

    pub fn is_ghost_house(&self, row: i32, col: i32) -> bool {
        self.classify(row, col) == TileKind::GhostHouse
    }

    pub fn is_power_pill(&self, row: i32, col: i32) -> bool {
        self.classify(row, col) == TileKind::PowerPill
    }

    /// Fold a column index back onto the map (tunnel continuity)
    pub fn wrap_col(&self, col: i32) -> i32 {
        col.rem_euclid(self.cols as i32)
    }

    /// Pixel to (row, col) by integer division; the column wraps horizontally
    pub fn pixel_to_tile(&self, x: f32, y: f32) -> (i32, i32) {
        let row = (y.floor() as i32).div_euclid(TILE_SIZE_PX);
        let col = (x.floor() as i32).div_euclid(TILE_SIZE_PX);
        (row, self.wrap_col(col))
    }

    /// Tile under a pixel, using wrapped lookup
    pub fn tile_at_pixel(&self, point: Vec2) -> TileKind {
        let (row, col) = self.pixel_to_tile(point.x, point.y);
        self.classify(row, col)
    }

    /// Tile adjacent to (row, col) in `dir`, wrapping across the tunnel
    pub fn neighbor(&self, row: i32, col: i32, dir: Direction) -> TileKind {
        let (dr, dc) = dir.tile_offset();
        self.classify(row + dr, self.wrap_col(col + dc))
    }

    /// Would an entity at `pos` still be clear of walls after one step of
    /// `speed` pixels in `dir`?
    pub fn can_advance(&self, pos: Vec2, speed: f32, dir: Direction) -> bool {
        self.can_advance_through(pos, speed, dir, Passage::Open)
    }

    /// `can_advance` with an explicit blocking policy
    pub fn can_advance_through(&self, pos: Vec2, speed: f32, dir: Direction, passage: Passage) -> bool {
        self.box_is_clear(pos + dir.vector() * speed, passage)
    }

    /// Check the four inset corners of the bounding box at `pos`
    pub fn box_is_clear(&self, pos: Vec2, passage: Passage) -> bool {
        let near = CORNER_PADDING;
        let far = TILE_SIZE - CORNER_PADDING;
        [
            Vec2::new(near, near),
            Vec2::new(far, near),
            Vec2::new(near, far),
            Vec2::new(far, far),
        ]
        .into_iter()
        .all(|corner| !passage.blocks(self.tile_at_pixel(pos + corner)))
    }

    /// Iterate every tile as (row, col, kind) in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = (i32, i32, TileKind)> + '_ {
        let cols = self.cols;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &tile)| ((i / cols) as i32, (i % cols) as i32, tile))
    }
}
