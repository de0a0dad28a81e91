use crate::export;
use crate::session::{SessionOutcome, SessionReport, SimulationSession};
use crate::settings::{DisplayMode, SnapshotView};
use std::path::PathBuf;

const DEFAULT_EXPORT_DIR: &str = "fire-report";

/// Interactive viewer state
pub struct App {
    pub session: SimulationSession,
    pub outcome: Option<SessionOutcome>,
    pub view: SnapshotView,
    pub display_mode: DisplayMode,
    pub show_help: bool,
    pub help_scroll: u16,
    /// Last action result shown in the status box
    pub message: Option<String>,
}

impl App {
    pub fn new(session: SimulationSession) -> Self {
        let display_mode = session.config().display_mode;
        let mut app = Self {
            session,
            outcome: None,
            view: SnapshotView::default(),
            display_mode,
            show_help: false,
            help_scroll: 0,
            message: None,
        };
        app.rerun();
        app
    }

    /// Run the session again. Generated maps are redrawn from the
    /// session's RNG, so each rerun shows a new forest.
    pub fn rerun(&mut self) {
        match self.session.run() {
            Ok(outcome) => {
                self.message = match &outcome {
                    SessionOutcome::NothingToSimulate { .. } => Some("No trees on map".to_string()),
                    SessionOutcome::Completed(_) => None,
                };
                self.outcome = Some(outcome);
            }
            Err(e) => {
                self.outcome = None;
                self.message = Some(e.to_string());
            }
        }
    }

    pub fn report(&self) -> Option<&SessionReport> {
        match &self.outcome {
            Some(SessionOutcome::Completed(report)) => Some(report.as_ref()),
            _ => None,
        }
    }

    pub fn next_view(&mut self) {
        self.view = self.view.next();
    }

    pub fn prev_view(&mut self) {
        self.view = self.view.prev();
    }

    pub fn toggle_display_mode(&mut self) {
        self.display_mode = self.display_mode.next();
    }

    /// Change tree density and rerun
    pub fn adjust_trees(&mut self, delta: f32) {
        self.session.config_mut().map.adjust_tree_percent(delta);
        self.rerun();
    }

    /// Change water density and rerun
    pub fn adjust_water(&mut self, delta: f32) {
        self.session.config_mut().map.adjust_water_percent(delta);
        self.rerun();
    }

    /// Write the current report to the configured export directory
    pub fn export(&mut self) {
        let Some(report) = self.report() else {
            self.message = Some("Nothing to export".to_string());
            return;
        };
        let config = self.session.config();
        let dir = config
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));
        let message = match export::export_session(report, &dir, config.png_scale) {
            Ok(files) => format!("Exported {} files to {}", files.len(), dir.display()),
            Err(e) => e.to_string(),
        };
        self.message = Some(message);
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0;
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::settings::MapSettings;
    use tempfile::TempDir;

    fn app_with(map: MapSettings, export_dir: Option<PathBuf>) -> App {
        App::new(SimulationSession::new(AppConfig {
            map,
            seed: Some(21),
            export_dir,
            ..AppConfig::default()
        }))
    }

    #[test]
    fn test_starts_with_report() {
        let app = app_with(MapSettings::default(), None);
        assert!(app.report().is_some());
        assert!(app.message.is_none());
        assert_eq!(app.view, SnapshotView::Original);
    }

    #[test]
    fn test_bad_density_reported_not_panicking() {
        let mut app = app_with(MapSettings::default(), None);
        app.session.config_mut().map.tree_percent = 95.0;
        app.session.config_mut().map.water_percent = 10.0;
        app.rerun();
        assert!(app.report().is_none());
        assert!(app.message.as_deref().unwrap().contains("percentages"));
    }

    #[test]
    fn test_density_adjust_reruns() {
        let mut app = app_with(MapSettings::default(), None);
        app.adjust_trees(-100.0);
        assert!(matches!(app.outcome, Some(SessionOutcome::NothingToSimulate { .. })));
        assert_eq!(app.message.as_deref(), Some("No trees on map"));
    }

    #[test]
    fn test_export_to_configured_dir() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(MapSettings::default(), Some(dir.path().to_path_buf()));
        app.export();
        assert!(app.message.as_deref().unwrap().starts_with("Exported 3 files"));
        assert!(dir.path().join("original.html").exists());
    }

    #[test]
    fn test_view_cycling() {
        let mut app = app_with(MapSettings::default(), None);
        app.next_view();
        assert_eq!(app.view, SnapshotView::WithoutFirebreak);
        app.prev_view();
        app.prev_view();
        assert_eq!(app.view, SnapshotView::WithFirebreak);
        app.toggle_display_mode();
        assert_eq!(app.display_mode, DisplayMode::Plain);
    }
}
