use crate::error::PersistenceError;
use crate::terrain::{CellState, TerrainGrid};
use std::fs;
use std::path::Path;
use tracing::info;

/// Save a grid as a JSON 2D array of cell codes
pub fn save_grid(grid: &TerrainGrid, path: &Path) -> Result<(), PersistenceError> {
    let rows: Vec<Vec<u8>> = grid
        .rows()
        .map(|row| row.iter().map(CellState::code).collect())
        .collect();
    let json = serde_json::to_string(&rows).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "map saved");
    Ok(())
}

/// Load a grid saved by [`save_grid`]. Shape comes from the array itself.
pub fn load_grid(path: &Path) -> Result<TerrainGrid, PersistenceError> {
    let content = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let codes: Vec<Vec<i64>> = serde_json::from_str(&content).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let expected = codes.first().map_or(0, Vec::len);
    if expected == 0 {
        return Err(PersistenceError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::with_capacity(codes.len());
    for (row, line) in codes.iter().enumerate() {
        if line.len() != expected {
            return Err(PersistenceError::Ragged {
                path: path.to_path_buf(),
                row,
                expected,
                found: line.len(),
            });
        }
        let mut cells = Vec::with_capacity(expected);
        for (col, &value) in line.iter().enumerate() {
            let cell = CellState::from_code(value).ok_or_else(|| PersistenceError::UnknownCell {
                path: path.to_path_buf(),
                value,
                row,
                col,
            })?;
            cells.push(cell);
        }
        rows.push(cells);
    }

    // Rows are non-empty and rectangular at this point
    let grid = TerrainGrid::from_rows(rows).map_err(|_| PersistenceError::Empty {
        path: path.to_path_buf(),
    })?;
    info!(path = %path.display(), width = grid.width(), height = grid.height(), "map loaded");
    Ok(grid)
}
