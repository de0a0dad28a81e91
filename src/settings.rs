use crate::terrain::Position;
use serde::{Deserialize, Serialize};

/// How cells are drawn in console and TUI output
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Emoji symbols
    #[default]
    Symbols,
    /// ASCII characters only
    Plain,
}

impl DisplayMode {
    pub fn name(&self) -> &str {
        match self {
            DisplayMode::Symbols => "Symbols",
            DisplayMode::Plain => "Plain",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            DisplayMode::Symbols => DisplayMode::Plain,
            DisplayMode::Plain => DisplayMode::Symbols,
        }
    }
}

/// Which grid snapshot of a finished session to show
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SnapshotView {
    #[default]
    Original,
    WithoutFirebreak,
    WithFirebreak,
}

impl SnapshotView {
    pub fn name(&self) -> &str {
        match self {
            SnapshotView::Original => "Original",
            SnapshotView::WithoutFirebreak => "Without firebreak",
            SnapshotView::WithFirebreak => "With firebreak",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SnapshotView::Original => SnapshotView::WithoutFirebreak,
            SnapshotView::WithoutFirebreak => SnapshotView::WithFirebreak,
            SnapshotView::WithFirebreak => SnapshotView::Original,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SnapshotView::Original => SnapshotView::WithFirebreak,
            SnapshotView::WithoutFirebreak => SnapshotView::Original,
            SnapshotView::WithFirebreak => SnapshotView::WithoutFirebreak,
        }
    }
}

/// Map shape, density and ignition settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    /// Grid width in cells (>= 1)
    pub width: usize,
    /// Grid height in cells (>= 1)
    pub height: usize,
    /// Share of cells that start as trees (0-100)
    pub tree_percent: f32,
    /// Share of cells that start as water (0-100, trees + water <= 100)
    pub water_percent: f32,
    /// Ignition point; the map centre when unset
    pub ignition: Option<Position>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width: 20,
            height: 10,
            tree_percent: 60.0,
            water_percent: 10.0,
            ignition: None,
        }
    }
}

impl MapSettings {
    /// Adjust tree density, leaving room for the current water share
    pub fn adjust_tree_percent(&mut self, delta: f32) {
        self.tree_percent = (self.tree_percent + delta).clamp(0.0, 100.0 - self.water_percent);
    }

    /// Adjust water density, leaving room for the current tree share
    pub fn adjust_water_percent(&mut self, delta: f32) {
        self.water_percent = (self.water_percent + delta).clamp(0.0, 100.0 - self.tree_percent);
    }
}
