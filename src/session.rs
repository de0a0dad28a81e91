use crate::config::AppConfig;
use crate::error::{FirebreakError, SessionError};
use crate::firebreak::{find_best_firebreak, FirebreakResult};
use crate::generator;
use crate::persistence;
use crate::propagation::{propagate, PropagationResult};
use crate::settings::SnapshotView;
use crate::terrain::{CellState, Position, TerrainGrid};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

/// Everything a finished session produced, ready for rendering and export
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub original: TerrainGrid,
    pub baseline: PropagationResult,
    /// None when the ignition tree was the only tree on the map
    pub firebreak: Option<FirebreakResult>,
    pub with_firebreak: PropagationResult,
}

impl SessionReport {
    pub fn ignition(&self) -> Option<Position> {
        self.baseline.ignition
    }

    pub fn chosen_firebreak(&self) -> Option<Position> {
        self.firebreak.as_ref().and_then(|f| f.chosen)
    }

    pub fn trees_saved(&self) -> usize {
        self.firebreak.as_ref().map_or(0, |f| f.trees_saved)
    }

    pub fn reduction_percentage(&self) -> f64 {
        self.firebreak.as_ref().map_or(0.0, FirebreakResult::reduction_percentage)
    }

    pub fn grid(&self, view: SnapshotView) -> &TerrainGrid {
        match view {
            SnapshotView::Original => &self.original,
            SnapshotView::WithoutFirebreak => &self.baseline.snapshot,
            SnapshotView::WithFirebreak => &self.with_firebreak.snapshot,
        }
    }

    /// Burn statistics for a snapshot (None for the unburned original)
    pub fn run(&self, view: SnapshotView) -> Option<&PropagationResult> {
        match view {
            SnapshotView::Original => None,
            SnapshotView::WithoutFirebreak => Some(&self.baseline),
            SnapshotView::WithFirebreak => Some(&self.with_firebreak),
        }
    }

    /// Human-readable statistics for a snapshot
    pub fn summary(&self, view: SnapshotView) -> Vec<String> {
        let mut lines = Vec::new();
        match self.run(view) {
            None => {
                let stats = self.original.stats();
                lines.push(format!("Trees: {} ({:.1}%)", stats.trees, stats.percent(stats.trees)));
                lines.push(format!("Water: {} ({:.1}%)", stats.water, stats.percent(stats.water)));
                lines.push(format!("Bare ground: {} ({:.1}%)", stats.empty, stats.percent(stats.empty)));
            }
            Some(run) => {
                lines.push(format!(
                    "Burned: {}/{} trees ({:.1}%)",
                    run.burned_count(),
                    run.original_trees,
                    run.burned_percentage()
                ));
                lines.push(format!("Survived: {} trees", run.surviving_trees()));
            }
        }
        if let Some(ignition) = self.ignition() {
            lines.push(format!("Ignition: {}", ignition));
        }
        if view == SnapshotView::WithFirebreak {
            match self.chosen_firebreak() {
                Some(pos) => lines.push(format!(
                    "Firebreak: {} saves {} trees ({:.1}% less burned)",
                    pos,
                    self.trees_saved(),
                    self.reduction_percentage()
                )),
                None => lines.push("Firebreak: no single removal helps".to_string()),
            }
        }
        lines
    }
}

/// How a session ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The map had no trees, so there was no fire to simulate
    NothingToSimulate { grid: TerrainGrid },
    Completed(Box<SessionReport>),
}

/// Owns one live grid and runs baseline fire, firebreak search and the
/// firebreak rerun over copies of it
pub struct SimulationSession {
    config: AppConfig,
    rng: StdRng,
}

impl SimulationSession {
    pub fn new(config: AppConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Load the configured map file, or generate a fresh random map
    pub fn obtain_grid(&mut self) -> Result<TerrainGrid, SessionError> {
        if let Some(path) = &self.config.load_path {
            return Ok(persistence::load_grid(path)?);
        }
        let map = &self.config.map;
        Ok(generator::generate(
            map.width,
            map.height,
            map.tree_percent,
            map.water_percent,
            &mut self.rng,
        )?)
    }

    /// Obtain a grid and simulate it
    pub fn run(&mut self) -> Result<SessionOutcome, SessionError> {
        let grid = self.obtain_grid()?;
        Ok(self.simulate(grid))
    }

    /// Baseline fire, firebreak search, then the fire again with the chosen tree cleared
    pub fn simulate(&mut self, grid: TerrainGrid) -> SessionOutcome {
        if grid.count(CellState::Tree) == 0 {
            warn!("map has no trees, nothing to simulate");
            return SessionOutcome::NothingToSimulate { grid };
        }

        let requested = self.config.map.ignition.unwrap_or_else(|| grid.center());
        let baseline = propagate(&grid, requested, &mut self.rng);
        let Some(ignition) = baseline.ignition else {
            return SessionOutcome::NothingToSimulate { grid };
        };
        info!(
            %ignition,
            burned = baseline.burned_count(),
            trees = baseline.original_trees,
            "baseline fire"
        );

        let (firebreak, with_firebreak) = match find_best_firebreak(&grid, ignition) {
            Ok(result) => {
                info!(burned = result.chosen_burned(), saved = result.trees_saved, "fire with firebreak");
                let with_firebreak = result.with_firebreak.clone();
                (Some(result), with_firebreak)
            }
            Err(FirebreakError::NoCandidates) => {
                info!("ignition is the only tree, nothing to optimize");
                (None, baseline.clone())
            }
            Err(e) => {
                // The baseline always ignites an in-bounds tree
                warn!("firebreak search skipped: {e}");
                (None, baseline.clone())
            }
        };

        SessionOutcome::Completed(Box::new(SessionReport {
            original: grid,
            baseline,
            firebreak,
            with_firebreak,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MapSettings;
    use tempfile::NamedTempFile;

    fn seeded(map: MapSettings) -> SimulationSession {
        SimulationSession::new(AppConfig {
            map,
            seed: Some(11),
            ..AppConfig::default()
        })
    }

    #[test]
    fn test_full_session_on_generated_map() {
        let mut session = seeded(MapSettings {
            width: 12,
            height: 8,
            tree_percent: 70.0,
            water_percent: 10.0,
            ignition: None,
        });
        let SessionOutcome::Completed(report) = session.run().unwrap() else {
            panic!("expected a completed session");
        };

        assert_eq!(report.original.count(CellState::Tree), 67);
        assert_eq!(report.original.count(CellState::Burned), 0);
        let ignition = report.ignition().unwrap();
        assert!(report.original.is_tree(ignition));
        assert!(report.with_firebreak.burned_count() <= report.baseline.burned_count());
        assert_eq!(
            report.trees_saved(),
            report.baseline.burned_count() - report.with_firebreak.burned_count()
        );
        if let Some(pos) = report.chosen_firebreak() {
            assert_eq!(report.with_firebreak.snapshot.get(pos), Ok(CellState::Empty));
            assert_eq!(report.original.get(pos), Ok(CellState::Tree));
        }
    }

    #[test]
    fn test_same_seed_same_report() {
        let map = MapSettings::default();
        let a = seeded(map.clone()).run().unwrap();
        let b = seeded(map).run().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_trees_stops_early() {
        let mut session = seeded(MapSettings {
            tree_percent: 0.0,
            water_percent: 40.0,
            ..MapSettings::default()
        });
        assert!(matches!(
            session.run().unwrap(),
            SessionOutcome::NothingToSimulate { .. }
        ));
    }

    #[test]
    fn test_single_tree_has_no_firebreak() {
        let mut grid = TerrainGrid::new(5, 5).unwrap();
        grid.set(Position::new(0, 4), CellState::Tree).unwrap();
        let mut session = seeded(MapSettings::default());
        let SessionOutcome::Completed(report) = session.simulate(grid) else {
            panic!("expected a completed session");
        };
        // Centre is bare, so the lone tree is picked as ignition
        assert_eq!(report.ignition(), Some(Position::new(0, 4)));
        assert!(report.firebreak.is_none());
        assert_eq!(report.trees_saved(), 0);
        assert_eq!(report.with_firebreak, report.baseline);
    }

    #[test]
    fn test_explicit_ignition_used() {
        let grid = TerrainGrid::filled(5, 1, CellState::Tree).unwrap();
        let mut session = seeded(MapSettings {
            ignition: Some(Position::new(0, 0)),
            ..MapSettings::default()
        });
        let SessionOutcome::Completed(report) = session.simulate(grid) else {
            panic!("expected a completed session");
        };
        assert_eq!(report.ignition(), Some(Position::new(0, 0)));
        assert_eq!(report.chosen_firebreak(), Some(Position::new(0, 1)));
        assert_eq!(report.trees_saved(), 4);
        assert_eq!(report.reduction_percentage(), 80.0);
        let summary = report.summary(SnapshotView::WithFirebreak);
        assert!(summary.iter().any(|l| l.contains("saves 4 trees")));
    }

    #[test]
    fn test_invalid_density_surfaces() {
        let mut session = seeded(MapSettings {
            tree_percent: 90.0,
            water_percent: 20.0,
            ..MapSettings::default()
        });
        assert!(matches!(session.run(), Err(SessionError::Generation(_))));
    }

    #[test]
    fn test_load_failure_surfaces() {
        let mut session = SimulationSession::new(AppConfig {
            load_path: Some("/nonexistent/map.json".into()),
            ..AppConfig::default()
        });
        assert!(matches!(session.run(), Err(SessionError::Persistence(_))));
    }

    #[test]
    fn test_loaded_map_is_used() {
        let grid = TerrainGrid::filled(3, 3, CellState::Tree).unwrap();
        let temp_file = NamedTempFile::new().unwrap();
        persistence::save_grid(&grid, temp_file.path()).unwrap();

        let mut session = SimulationSession::new(AppConfig {
            load_path: Some(temp_file.path().to_path_buf()),
            seed: Some(3),
            ..AppConfig::default()
        });
        let SessionOutcome::Completed(report) = session.run().unwrap() else {
            panic!("expected a completed session");
        };
        assert_eq!(report.original, grid);
        assert_eq!(report.baseline.burned_count(), 9);
        assert_eq!(report.ignition(), Some(Position::new(1, 1)));
    }
}
