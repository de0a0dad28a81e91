use crate::error::FirebreakError;
use crate::terrain::{CellState, Position, TerrainGrid};
use rand::seq::IteratorRandom;
use rand::Rng;
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

/// Outcome of a single fire run
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationResult {
    /// Where the fire started (None when the grid had no trees at all)
    pub ignition: Option<Position>,
    /// Every tree the fire reached, ignition included
    pub burned: BTreeSet<Position>,
    /// Trees on the input grid before the burn
    pub original_trees: usize,
    /// Copy of the input grid with burned trees set to `Burned`
    pub snapshot: TerrainGrid,
}

impl PropagationResult {
    /// Result for a grid with nothing to ignite
    fn unignited(grid: &TerrainGrid) -> Self {
        Self {
            ignition: None,
            burned: BTreeSet::new(),
            original_trees: grid.count(CellState::Tree),
            snapshot: grid.clone(),
        }
    }

    pub fn burned_count(&self) -> usize {
        self.burned.len()
    }

    /// Burned trees as a share of the original trees (0 when there were none)
    pub fn burned_percentage(&self) -> f64 {
        if self.original_trees == 0 {
            0.0
        } else {
            self.burned.len() as f64 / self.original_trees as f64 * 100.0
        }
    }

    /// Trees that survived the fire
    pub fn surviving_trees(&self) -> usize {
        self.original_trees - self.burned.len()
    }
}

/// Breadth-first flood fill over Moore-adjacent trees.
///
/// Returns the burned positions in visitation order. `ignition` must be a tree.
pub(crate) fn flood_fill(grid: &TerrainGrid, ignition: Position) -> Vec<Position> {
    let width = grid.width();
    let mut visited = vec![false; width * grid.height()];
    let mut order = Vec::new();
    let mut frontier = VecDeque::new();

    visited[ignition.row * width + ignition.col] = true;
    order.push(ignition);
    frontier.push_back(ignition);

    while let Some(current) = frontier.pop_front() {
        for next in grid.neighbors(current) {
            let idx = next.row * width + next.col;
            if visited[idx] || !grid.is_tree(next) {
                continue;
            }
            visited[idx] = true;
            order.push(next);
            frontier.push_back(next);
        }
    }

    order
}

/// Burn from a fixed ignition point.
///
/// Fails with `InvalidIgnition` when `ignition` is out of bounds or not a tree.
pub fn propagate_from(grid: &TerrainGrid, ignition: Position) -> Result<PropagationResult, FirebreakError> {
    if !grid.is_tree(ignition) {
        return Err(FirebreakError::InvalidIgnition(ignition));
    }

    let burned_order = flood_fill(grid, ignition);
    let mut snapshot = grid.clone();
    for &pos in &burned_order {
        snapshot.set(pos, CellState::Burned)?;
    }

    Ok(PropagationResult {
        ignition: Some(ignition),
        burned: burned_order.into_iter().collect(),
        original_trees: grid.count(CellState::Tree),
        snapshot,
    })
}

/// Burn from a tree chosen uniformly at random.
///
/// Returns an unignited result when the grid has no trees.
pub fn propagate_random<R: Rng + ?Sized>(grid: &TerrainGrid, rng: &mut R) -> PropagationResult {
    match grid.positions_of(CellState::Tree).choose(rng) {
        Some(start) => propagate_from(grid, start).unwrap_or_else(|_| PropagationResult::unignited(grid)),
        None => {
            debug!("no trees on grid, nothing to ignite");
            PropagationResult::unignited(grid)
        }
    }
}

/// Burn from `ignition`, substituting a random tree when it is not a valid start.
pub fn propagate<R: Rng + ?Sized>(grid: &TerrainGrid, ignition: Position, rng: &mut R) -> PropagationResult {
    match propagate_from(grid, ignition) {
        Ok(result) => result,
        Err(_) => {
            debug!(%ignition, "ignition is not a tree, picking a random start");
            propagate_random(grid, rng)
        }
    }
}
