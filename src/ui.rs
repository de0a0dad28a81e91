use crate::app::App;
use crate::render::{cell_color, symbol};
use crate::session::SessionOutcome;
use crate::settings::{DisplayMode, SnapshotView};
use crate::terrain::{Position, TerrainGrid};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 34;

/// Max scroll for help content
pub const HELP_CONTENT_LINES: u16 = 30;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;
const IGNITION_BG: Color = Color::Red;
const FIREBREAK_BG: Color = Color::Yellow;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);

    render_sidebar(frame, layout[0], app);
    render_canvas(frame, layout[1], app);

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Status
            Constraint::Length(7), // Map settings
            Constraint::Min(8),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_map_box(frame, sections[1], app);
    render_controls_box(frame, sections[2]);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Forest Fire ");

    let mut content = vec![Line::from(Span::styled(
        app.view.name().to_string(),
        Style::default().fg(HIGHLIGHT_COLOR).add_modifier(Modifier::BOLD),
    ))];

    match &app.outcome {
        Some(SessionOutcome::Completed(report)) => {
            for line in report.summary(app.view) {
                content.push(Line::from(Span::styled(line, Style::default().fg(TEXT_COLOR))));
            }
        }
        Some(SessionOutcome::NothingToSimulate { .. }) | None => {}
    }
    if let Some(message) = &app.message {
        content.push(Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))));
    }

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_map_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Map ");
    let config = app.session.config();
    let map = &config.map;

    let make_line = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(DIM_TEXT_COLOR)),
            Span::styled(value, Style::default().fg(TEXT_COLOR)),
        ])
    };

    let source = match &config.load_path {
        Some(path) => path.display().to_string(),
        None => "random".to_string(),
    };

    let content = vec![
        make_line("Size", format!("{} x {}", map.width, map.height)),
        make_line("Trees", format!("{:.0}%", map.tree_percent)),
        make_line("Water", format!("{:.0}%", map.water_percent)),
        make_line("Source", source),
        make_line("Display", app.display_mode.name().to_string()),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Tab", "next snapshot"),
        make_control("←/→", "cycle snapshots"),
        make_control("R", "new map + rerun"),
        make_control("T/G", "trees +/-5%"),
        make_control("W/S", "water +/-5%"),
        make_control("M", "display mode"),
        make_control("E", "export report"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

/// Build one styled line per grid row
pub fn grid_lines(
    grid: &TerrainGrid,
    mode: DisplayMode,
    ignition: Option<Position>,
    firebreak: Option<Position>,
) -> Vec<Line<'static>> {
    grid.rows()
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span<'static>> = cells
                .iter()
                .enumerate()
                .map(|(col, &cell)| {
                    let [r, g, b] = cell_color(cell);
                    let mut style = Style::default().fg(Color::Rgb(r, g, b));
                    let pos = Position::new(row, col);
                    if firebreak == Some(pos) {
                        style = style.bg(FIREBREAK_BG);
                    } else if ignition == Some(pos) {
                        style = style.bg(IGNITION_BG);
                    }
                    let glyph = match mode {
                        DisplayMode::Symbols => symbol(cell, mode).to_string(),
                        DisplayMode::Plain => format!("{} ", symbol(cell, mode)),
                    };
                    Span::styled(glyph, style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match &app.outcome {
        Some(SessionOutcome::Completed(report)) => {
            let firebreak = if app.view == SnapshotView::WithFirebreak {
                report.chosen_firebreak()
            } else {
                None
            };
            grid_lines(report.grid(app.view), app.display_mode, report.ignition(), firebreak)
        }
        Some(SessionOutcome::NothingToSimulate { grid }) => grid_lines(grid, app.display_mode, None, None),
        None => vec![Line::from(Span::styled(
            "No map loaded",
            Style::default().fg(DIM_TEXT_COLOR),
        ))],
    };

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let canvas_width = area.width.saturating_sub(SIDEBAR_WIDTH);

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(30);
    let x = SIDEBAR_WIDTH + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("FOREST FIRE FIREBREAK SEARCH", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Fire starts at the ignition cell (red) and spreads instantly to every tree touching a burning tree, diagonals included. Water and bare ground stop it."),
        Line::from(""),
        Line::from("The search clears each tree in turn and keeps the single removal that saves the most trees (yellow)."),
        Line::from(""),
        Line::from(Span::styled("SNAPSHOTS (Tab, ←/→):", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Original map, fire without firebreak, fire with firebreak"),
        Line::from(""),
        Line::from(Span::styled("MAP:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("R=new random map, T/G=trees up/down, W/S=water up/down"),
        Line::from(""),
        Line::from(Span::styled("OUTPUT:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("M=symbols/plain display, E=export HTML (and PNG) report"),
        Line::from(""),
        Line::from("Q=Quit, J/K=scroll help, H=close help"),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2);
    let max_scroll = content_height.saturating_sub(visible_height);

    let title = if max_scroll > 0 {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::CellState;

    #[test]
    fn test_grid_lines_marks_cells() {
        let grid = TerrainGrid::filled(3, 2, CellState::Tree).unwrap();
        let lines = grid_lines(
            &grid,
            DisplayMode::Plain,
            Some(Position::new(0, 0)),
            Some(Position::new(1, 2)),
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[0].content, "T ");
        assert_eq!(lines[0].spans[0].style.bg, Some(IGNITION_BG));
        assert_eq!(lines[1].spans[2].style.bg, Some(FIREBREAK_BG));
        assert_eq!(lines[1].spans[1].style.bg, None);
    }
}
