use crate::error::{FirebreakError, GridError};
use crate::propagation::{flood_fill, propagate_from, PropagationResult};
use crate::terrain::{CellState, Position, TerrainGrid};
use tracing::{debug, info};

/// Burn outcome when one specific tree is cleared beforehand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirebreakCandidate {
    pub position: Position,
    /// Trees burned with this tree removed
    pub burned: usize,
}

/// Result of searching for the single most effective tree removal
#[derive(Debug, Clone, PartialEq)]
pub struct FirebreakResult {
    pub ignition: Position,
    /// Every evaluated candidate, row-major
    pub candidates: Vec<FirebreakCandidate>,
    /// Best tree to remove, or None when no removal reduces the burn
    pub chosen: Option<Position>,
    /// Baseline burned minus burned with the chosen removal
    pub trees_saved: usize,
    pub without_firebreak: PropagationResult,
    pub with_firebreak: PropagationResult,
}

impl FirebreakResult {
    pub fn baseline_burned(&self) -> usize {
        self.without_firebreak.burned_count()
    }

    pub fn chosen_burned(&self) -> usize {
        self.with_firebreak.burned_count()
    }

    /// Trees saved as a share of the baseline burn
    pub fn reduction_percentage(&self) -> f64 {
        let baseline = self.baseline_burned();
        if baseline == 0 {
            0.0
        } else {
            self.trees_saved as f64 / baseline as f64 * 100.0
        }
    }
}

/// Copy of `grid` with the cell at `position` cleared
pub fn apply_firebreak(grid: &TerrainGrid, position: Position) -> Result<TerrainGrid, GridError> {
    let mut cleared = grid.clone();
    cleared.set(position, CellState::Empty)?;
    Ok(cleared)
}

/// First candidate with the strictly greatest reduction, if any reduction is positive
fn select_best(baseline: usize, candidates: &[FirebreakCandidate]) -> Option<FirebreakCandidate> {
    let mut best = None;
    let mut best_reduction = 0;
    for candidate in candidates {
        let reduction = baseline.saturating_sub(candidate.burned);
        if reduction > best_reduction {
            best = Some(*candidate);
            best_reduction = reduction;
        }
    }
    best
}

/// Try removing each tree in turn and keep the removal that saves the most trees.
///
/// The ignition point is fixed: a non-tree ignition fails with `InvalidIgnition`
/// rather than being resampled. `grid` is never modified; each candidate is
/// evaluated on its own scratch copy.
pub fn find_best_firebreak(grid: &TerrainGrid, ignition: Position) -> Result<FirebreakResult, FirebreakError> {
    let without_firebreak = propagate_from(grid, ignition)?;
    let baseline = without_firebreak.burned_count();

    let positions: Vec<Position> = grid
        .positions_of(CellState::Tree)
        .filter(|&pos| pos != ignition)
        .collect();
    if positions.is_empty() {
        return Err(FirebreakError::NoCandidates);
    }

    let mut candidates = Vec::with_capacity(positions.len());
    for position in positions {
        // A tree outside the baseline burn cannot change it
        let burned = if without_firebreak.burned.contains(&position) {
            flood_fill(&apply_firebreak(grid, position)?, ignition).len()
        } else {
            baseline
        };
        candidates.push(FirebreakCandidate { position, burned });
    }
    debug!(count = candidates.len(), baseline, "evaluated firebreak candidates");

    let (chosen, with_firebreak) = match select_best(baseline, &candidates) {
        Some(best) => {
            let with_firebreak = propagate_from(&apply_firebreak(grid, best.position)?, ignition)?;
            (Some(best.position), with_firebreak)
        }
        None => (None, without_firebreak.clone()),
    };
    let trees_saved = baseline.saturating_sub(with_firebreak.burned_count());

    match chosen {
        Some(pos) => info!(%pos, trees_saved, baseline, "best firebreak found"),
        None => info!(baseline, "no single tree removal reduces the burn"),
    }

    Ok(FirebreakResult {
        ignition,
        candidates,
        chosen,
        trees_saved,
        without_firebreak,
        with_firebreak,
    })
}
