use crate::session::SessionReport;
use crate::settings::{DisplayMode, SnapshotView};
use crate::terrain::{CellState, TerrainGrid};

const RULE_WIDTH: usize = 50;

/// All cell states in legend order
pub const ALL_STATES: [CellState; 5] = [
    CellState::Empty,
    CellState::Tree,
    CellState::Water,
    CellState::Burning,
    CellState::Burned,
];

/// Glyph for a cell. Symbols are two columns wide, plain glyphs one.
pub fn symbol(state: CellState, mode: DisplayMode) -> &'static str {
    match mode {
        DisplayMode::Symbols => match state {
            CellState::Empty => ". ",
            CellState::Tree => "🌲",
            CellState::Water => "💧",
            CellState::Burning => "🔥",
            CellState::Burned => "⬛",
        },
        DisplayMode::Plain => match state {
            CellState::Empty => ".",
            CellState::Tree => "T",
            CellState::Water => "~",
            CellState::Burning => "*",
            CellState::Burned => "x",
        },
    }
}

/// RGB color shared by the viewer and the exporters
pub fn cell_color(state: CellState) -> [u8; 3] {
    match state {
        CellState::Empty => [194, 178, 128],
        CellState::Tree => [34, 139, 34],
        CellState::Water => [30, 144, 255],
        CellState::Burning => [255, 140, 0],
        CellState::Burned => [60, 60, 60],
    }
}

/// Draw the grid as text, one line per row
pub fn render_grid(grid: &TerrainGrid, mode: DisplayMode) -> String {
    let mut out = String::with_capacity(grid.width() * grid.height() * 4);
    for row in grid.rows() {
        let line: Vec<&str> = row.iter().map(|&cell| symbol(cell, mode)).collect();
        let separator = if mode == DisplayMode::Plain { " " } else { "" };
        out.push_str(line.join(separator).trim_end());
        out.push('\n');
    }
    out
}

fn section(out: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
}

/// Full console report: the three maps with their statistics
pub fn render_report(report: &SessionReport, mode: DisplayMode) -> String {
    let mut out = String::new();
    for view in [
        SnapshotView::Original,
        SnapshotView::WithoutFirebreak,
        SnapshotView::WithFirebreak,
    ] {
        section(&mut out, &view.name().to_uppercase());
        out.push_str(&render_grid(report.grid(view), mode));
        for line in report.summary(view) {
            out.push_str("- ");
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::propagation::tests::grid_with;
    use crate::session::{SessionOutcome, SimulationSession};
    use crate::settings::MapSettings;
    use crate::terrain::Position;

    #[test]
    fn test_plain_render() {
        let grid = grid_with(
            3,
            2,
            CellState::Empty,
            &[(0, 0, CellState::Tree), (1, 2, CellState::Water), (1, 1, CellState::Burned)],
        );
        assert_eq!(render_grid(&grid, DisplayMode::Plain), "T . .\n. x ~\n");
    }

    #[test]
    fn test_report_lists_all_views() {
        let grid = TerrainGrid::filled(4, 1, CellState::Tree).unwrap();
        let mut session = SimulationSession::new(AppConfig {
            map: MapSettings {
                ignition: Some(Position::new(0, 0)),
                ..MapSettings::default()
            },
            seed: Some(5),
            ..AppConfig::default()
        });
        let SessionOutcome::Completed(report) = session.simulate(grid) else {
            panic!("expected a completed session");
        };

        let text = render_report(&report, DisplayMode::Plain);
        assert!(text.contains("ORIGINAL"));
        assert!(text.contains("WITHOUT FIREBREAK"));
        assert!(text.contains("WITH FIREBREAK"));
        assert!(text.contains("T T T T\n"));
        assert!(text.contains("x x x x\n"));
        assert!(text.contains("x . T T\n"));
        assert!(text.contains("Firebreak: (0, 1) saves 3 trees"));
    }

    #[test]
    fn test_symbol_render() {
        let grid = grid_with(2, 1, CellState::Tree, &[(0, 1, CellState::Water)]);
        assert_eq!(render_grid(&grid, DisplayMode::Symbols), "🌲💧\n");
    }

    #[test]
    fn test_symbols_distinct_per_mode() {
        for mode in [DisplayMode::Symbols, DisplayMode::Plain] {
            let mut seen: Vec<_> = ALL_STATES.iter().map(|&s| symbol(s, mode)).collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), ALL_STATES.len());
        }
    }
}
