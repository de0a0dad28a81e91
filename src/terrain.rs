use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Moore neighborhood offsets as (d_row, d_col): NW, N, NE, W, E, SW, S, SE
const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// State of a single terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    Tree,
    Water,
    Burning,
    Burned,
}

impl CellState {
    pub fn name(&self) -> &str {
        match self {
            CellState::Empty => "Empty",
            CellState::Tree => "Tree",
            CellState::Water => "Water",
            CellState::Burning => "Burning",
            CellState::Burned => "Burned",
        }
    }

    /// Integer code used by the map file format
    pub fn code(&self) -> u8 {
        match self {
            CellState::Empty => 0,
            CellState::Tree => 1,
            CellState::Water => 2,
            CellState::Burning => 3,
            CellState::Burned => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<CellState> {
        match code {
            0 => Some(CellState::Empty),
            1 => Some(CellState::Tree),
            2 => Some(CellState::Water),
            3 => Some(CellState::Burning),
            4 => Some(CellState::Burned),
            _ => None,
        }
    }
}

/// Grid coordinate. Ordering is row-major, which the firebreak search relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Cell counts for a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerrainStats {
    pub total: usize,
    pub empty: usize,
    pub trees: usize,
    pub water: usize,
    pub burning: usize,
    pub burned: usize,
}

impl TerrainStats {
    pub fn of(&self, state: CellState) -> usize {
        match state {
            CellState::Empty => self.empty,
            CellState::Tree => self.trees,
            CellState::Water => self.water,
            CellState::Burning => self.burning,
            CellState::Burned => self.burned,
        }
    }

    /// Share of the grid taken by `count` cells, in percent
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }
}

/// Fixed-size 2D terrain, stored row-major.
///
/// Cloning is a deep copy, so scratch copies handed to propagation never
/// alias the caller's grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl TerrainGrid {
    /// Create an all-empty grid
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        Self::filled(width, height, CellState::Empty)
    }

    /// Create a grid with every cell set to `state`
    pub fn filled(width: usize, height: usize, state: CellState) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { height, width });
        }
        Ok(Self {
            width,
            height,
            cells: vec![state; width * height],
        })
    }

    /// Build a grid from rows of equal length
    pub fn from_rows(rows: Vec<Vec<CellState>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { height, width });
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(GridError::Ragged {
                row,
                expected: width,
                found,
            });
        }
        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    fn check(&self, pos: Position) -> Result<usize, GridError> {
        if self.contains(pos) {
            Ok(pos.row * self.width + pos.col)
        } else {
            Err(GridError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                height: self.height,
                width: self.width,
            })
        }
    }

    pub fn get(&self, pos: Position) -> Result<CellState, GridError> {
        self.check(pos).map(|idx| self.cells[idx])
    }

    pub fn set(&mut self, pos: Position, state: CellState) -> Result<(), GridError> {
        let idx = self.check(pos)?;
        self.cells[idx] = state;
        Ok(())
    }

    /// True when `pos` is in bounds and holds a tree
    pub fn is_tree(&self, pos: Position) -> bool {
        self.get(pos) == Ok(CellState::Tree)
    }

    /// In-bounds Moore neighbors of `pos`, in NW, N, NE, W, E, SW, S, SE order
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        let mut result = Vec::with_capacity(8);
        for (dr, dc) in MOORE_OFFSETS {
            let (Some(row), Some(col)) = (pos.row.checked_add_signed(dr), pos.col.checked_add_signed(dc)) else {
                continue;
            };
            let candidate = Position::new(row, col);
            if self.contains(candidate) {
                result.push(candidate);
            }
        }
        result
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Position::new(row, col)))
    }

    /// Positions holding `state`, in row-major order
    pub fn positions_of(&self, state: CellState) -> impl Iterator<Item = Position> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(move |&(_, &cell)| cell == state)
            .map(move |(idx, _)| Position::new(idx / width, idx % width))
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    /// Iterate over rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks(self.width)
    }

    pub fn stats(&self) -> TerrainStats {
        let mut stats = TerrainStats {
            total: self.cells.len(),
            ..Default::default()
        };
        for cell in &self.cells {
            match cell {
                CellState::Empty => stats.empty += 1,
                CellState::Tree => stats.trees += 1,
                CellState::Water => stats.water += 1,
                CellState::Burning => stats.burning += 1,
                CellState::Burned => stats.burned += 1,
            }
        }
        stats
    }

    /// Centre cell, used as the default ignition point
    pub fn center(&self) -> Position {
        Position::new(self.height / 2, self.width / 2)
    }
}
