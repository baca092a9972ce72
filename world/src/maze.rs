//! Tile grid parsed from stage layouts.

use maze_rescue_core::{CellCoord, Direction, TileKind};
use thiserror::Error;

/// Textual maze description paired with the adversary patrol templates.
#[derive(Clone, Copy, Debug)]
pub struct MazeLayout<'a> {
    /// Rows of layout symbols, top to bottom.
    pub tiles: &'a [&'a str],
    /// Patrol templates expressed as axis-aligned corner points.
    pub patrols: &'a [&'a [CellCoord]],
}

/// Authoring errors detected while loading a stage layout.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout contained no rows or an empty first row.
    #[error("maze layout is empty")]
    Empty,
    /// A row did not match the width of the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A symbol did not map to any tile kind.
    #[error("unknown tile symbol '{symbol}' at column {column}, row {row}")]
    UnknownSymbol {
        /// Offending symbol.
        symbol: char,
        /// Zero-based column of the symbol.
        column: usize,
        /// Zero-based row of the symbol.
        row: usize,
    },
    /// A tile that must appear exactly once was absent.
    #[error("maze layout has no {kind:?} tile")]
    MissingTile {
        /// Kind of the missing tile.
        kind: TileKind,
    },
    /// A tile that must appear exactly once appeared several times.
    #[error("maze layout has more than one {kind:?} tile")]
    DuplicateTile {
        /// Kind of the duplicated tile.
        kind: TileKind,
    },
    /// A patrol template had no corner points.
    #[error("patrol {index} has no waypoints")]
    EmptyPatrol {
        /// Index of the patrol template.
        index: usize,
    },
    /// Two consecutive corner points did not share a row or column.
    #[error("patrol {index} segment {from:?} -> {to:?} is not axis aligned")]
    PatrolNotAxisAligned {
        /// Index of the patrol template.
        index: usize,
        /// Segment start.
        from: CellCoord,
        /// Segment end.
        to: CellCoord,
    },
    /// A patrol route crossed a tile that adversaries cannot always enter.
    #[error("patrol {index} crosses blocked cell {cell:?}")]
    PatrolBlocked {
        /// Index of the patrol template.
        index: usize,
        /// First blocked cell on the route.
        cell: CellCoord,
    },
    /// The stage asked for more adversaries than the maze has patrols.
    #[error("stage requests {requested} adversaries but the maze defines {available} patrols")]
    NotEnoughPatrols {
        /// Adversaries requested by the stage.
        requested: usize,
        /// Patrol templates available in the layout.
        available: usize,
    },
}

/// Rectangular grid of semantic tiles.
///
/// The shape never changes after parsing. Individual cells change only when a
/// collectible or the objective is cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
}

impl Maze {
    /// Parses layout rows into a maze.
    ///
    /// Exactly one pen and one objective must be present.
    pub fn parse(rows: &[&str]) -> Result<Self, LayoutError> {
        let expected = rows.first().map_or(0, |row| row.chars().count());
        if expected == 0 {
            return Err(LayoutError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != expected {
                return Err(LayoutError::RaggedRow {
                    row: row_index,
                    expected,
                    found,
                });
            }

            for (column, symbol) in row.chars().enumerate() {
                let kind = TileKind::from_symbol(symbol).ok_or(LayoutError::UnknownSymbol {
                    symbol,
                    column,
                    row: row_index,
                })?;
                tiles.push(kind);
            }
        }

        let maze = Self {
            columns: u32::try_from(expected).unwrap_or(u32::MAX),
            rows: u32::try_from(rows.len()).unwrap_or(u32::MAX),
            tiles,
        };

        for kind in [TileKind::Pen, TileKind::Objective] {
            match maze.locate_all(kind).len() {
                0 => return Err(LayoutError::MissingTile { kind }),
                1 => {}
                _ => return Err(LayoutError::DuplicateTile { kind }),
            }
        }

        Ok(maze)
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Kind of the tile at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<TileKind> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Bounds-checked walkability given the current hazard state.
    ///
    /// Walls are never walkable. Hazard ground is walkable only while the
    /// hazard cycle is safe. Every other tile kind is walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord, hazard_active: bool) -> bool {
        match self.tile(cell) {
            None | Some(TileKind::Wall) => false,
            Some(TileKind::Hazard) => !hazard_active,
            Some(_) => true,
        }
    }

    /// First cell of the provided kind in row-major order.
    #[must_use]
    pub fn locate(&self, kind: TileKind) -> Option<CellCoord> {
        self.tiles
            .iter()
            .position(|tile| *tile == kind)
            .map(|index| self.cell_at(index))
    }

    /// Every cell of the provided kind in row-major order.
    #[must_use]
    pub fn locate_all(&self, kind: TileKind) -> Vec<CellCoord> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == kind)
            .map(|(index, _)| self.cell_at(index))
            .collect()
    }

    /// Downgrades a collectible or the objective to ordinary ground.
    ///
    /// Other tiles are left untouched, so clearing twice is harmless.
    pub fn clear(&mut self, cell: CellCoord) {
        let Some(index) = self.index(cell) else {
            return;
        };
        if let Some(tile) = self.tiles.get_mut(index) {
            if matches!(tile, TileKind::Collectible | TileKind::Objective) {
                *tile = TileKind::Path;
            }
        }
    }

    /// In-bounds neighbour of `cell` in the provided direction.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        cell.neighbor(direction)
            .filter(|neighbor| self.contains(*neighbor))
    }

    /// Renders the maze back into layout rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        let width = usize::try_from(self.columns).unwrap_or(0);
        if width == 0 {
            return Vec::new();
        }
        self.tiles
            .chunks(width)
            .map(|row| row.iter().map(|tile| tile.symbol()).collect())
            .collect()
    }

    /// Expands a patrol template into a contiguous cell route.
    ///
    /// Each consecutive pair of corner points must share a row or column and
    /// every cell along the way must be walkable regardless of the hazard
    /// cycle.
    pub(crate) fn expand_patrol(
        &self,
        index: usize,
        corners: &[CellCoord],
    ) -> Result<Vec<CellCoord>, LayoutError> {
        let first = *corners.first().ok_or(LayoutError::EmptyPatrol { index })?;
        let mut route = vec![first];

        for pair in corners.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if from.column() != to.column() && from.row() != to.row() {
                return Err(LayoutError::PatrolNotAxisAligned { index, from, to });
            }

            let mut cursor = from;
            while cursor != to {
                let column = step_toward(cursor.column(), to.column());
                let row = step_toward(cursor.row(), to.row());
                cursor = CellCoord::new(column, row);
                route.push(cursor);
            }
        }

        if let Some(cell) = route
            .iter()
            .copied()
            .find(|cell| !self.is_walkable(*cell, true))
        {
            return Err(LayoutError::PatrolBlocked { index, cell });
        }

        route.dedup();
        Ok(route)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn cell_at(&self, index: usize) -> CellCoord {
        let width = usize::try_from(self.columns).unwrap_or(1).max(1);
        let column = u32::try_from(index % width).unwrap_or(u32::MAX);
        let row = u32::try_from(index / width).unwrap_or(u32::MAX);
        CellCoord::new(column, row)
    }
}

fn step_toward(value: u32, target: u32) -> u32 {
    match value.cmp(&target) {
        std::cmp::Ordering::Less => value + 1,
        std::cmp::Ordering::Greater => value - 1,
        std::cmp::Ordering::Equal => value,
    }
}
