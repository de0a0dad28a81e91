use crate::terrain::Position;
use std::path::PathBuf;
use thiserror::Error;

/// Grid geometry errors. These indicate a caller bug rather than bad input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("position ({row}, {col}) is outside a {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
    #[error("grid dimensions must be at least 1x1 (got {height}x{width})")]
    EmptyDimensions { height: usize, width: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors raised by random map generation.
#[derive(Debug, Error, PartialEq)]
pub enum GenerationError {
    #[error("tree ({trees}%) and water ({water}%) percentages must each lie in 0-100 and sum to at most 100")]
    InvalidDensity { trees: f32, water: f32 },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Errors raised by the firebreak search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FirebreakError {
    #[error("ignition ({}, {}) is not a tree", .0.row, .0.col)]
    InvalidIgnition(Position),
    #[error("no other tree exists to remove as a firebreak")]
    NoCandidates,
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Grid save/load failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access map file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("map file {path} is not a valid 2D array: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("map file {path} has row {row} with {found} cells, expected {expected}")]
    Ragged {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("map file {path} has unknown cell code {value} at ({row}, {col})")]
    UnknownCell {
        path: PathBuf,
        value: i64,
        row: usize,
        col: usize,
    },
    #[error("map file {path} contains no cells")]
    Empty { path: PathBuf },
}

/// Config file failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write config file: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Report export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("a {width}x{height} grid at {scale} pixels per cell is too large for a PNG")]
    ImageTooLarge { width: usize, height: usize, scale: u32 },
    #[error("failed to encode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Anything that stops a session before it produces a report.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
