use crate::error::GenerationError;
use crate::terrain::{CellState, Position, TerrainGrid};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

/// Check that tree/water percentages describe a valid map
pub fn validate_density(tree_percent: f32, water_percent: f32) -> Result<(), GenerationError> {
    let in_range = |p: f32| (0.0..=100.0).contains(&p);
    if !in_range(tree_percent) || !in_range(water_percent) || tree_percent + water_percent > 100.0 {
        return Err(GenerationError::InvalidDensity {
            trees: tree_percent,
            water: water_percent,
        });
    }
    Ok(())
}

/// Generate a random map with exact tree and water counts.
///
/// `floor(cells * percent / 100)` cells of each kind are scattered over a
/// shuffled list of positions; the rest is bare ground.
pub fn generate<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    tree_percent: f32,
    water_percent: f32,
    rng: &mut R,
) -> Result<TerrainGrid, GenerationError> {
    validate_density(tree_percent, water_percent)?;
    let mut grid = TerrainGrid::new(width, height)?;

    let total = width * height;
    let tree_count = ((total as f64 * tree_percent as f64 / 100.0).floor() as usize).min(total);
    let water_count = ((total as f64 * water_percent as f64 / 100.0).floor() as usize).min(total - tree_count);

    let mut positions: Vec<Position> = grid.positions().collect();
    positions.shuffle(rng);

    for &pos in &positions[..tree_count] {
        grid.set(pos, CellState::Tree)?;
    }
    for &pos in &positions[tree_count..tree_count + water_count] {
        grid.set(pos, CellState::Water)?;
    }

    info!(
        width,
        height,
        trees = tree_count,
        water = water_count,
        empty = total - tree_count - water_count,
        "generated random map"
    );
    Ok(grid)
}
