//! HTML and PNG reports for a finished session.
//!
//! Each snapshot becomes a self-contained HTML page (inline CSS, one table
//! cell per grid cell) and, when a PNG scale is set, a plain image with one
//! square block per cell.

use crate::error::ExportError;
use crate::render::{cell_color, ALL_STATES};
use crate::session::SessionReport;
use crate::settings::SnapshotView;
use crate::terrain::{Position, TerrainGrid};
use image::{ImageBuffer, Rgb, RgbImage};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Cells drawn with a highlight border
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlights {
    pub ignition: Option<Position>,
    pub firebreak: Option<Position>,
}

fn hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build a standalone HTML page showing `grid` with a legend and statistics
pub fn html_document(title: &str, grid: &TerrainGrid, summary: &[String], highlights: Highlights) -> String {
    let mut html = String::new();
    let title = escape(title);

    // write! into a String cannot fail
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n\
         body {{ font-family: sans-serif; background: #1e1e1e; color: #eee; margin: 2em; }}\n\
         table.grid {{ border-collapse: collapse; }}\n\
         table.grid td {{ width: 14px; height: 14px; padding: 0; border: 1px solid #222; }}\n\
         td.ignition {{ outline: 3px solid #ff3030; outline-offset: -3px; }}\n\
         td.firebreak {{ outline: 3px solid #ffff00; outline-offset: -3px; }}\n\
         .legend span {{ display: inline-block; width: 14px; height: 14px; margin: 0 4px 0 12px; vertical-align: middle; }}\n\
         </style>\n</head>\n<body>\n<h1>{title}</h1>\n"
    );

    let stats = grid.stats();
    html.push_str("<div class=\"legend\">");
    for state in ALL_STATES {
        let _ = write!(
            html,
            "<span style=\"background:{}\"></span>{} ({})",
            hex(cell_color(state)),
            state.name(),
            stats.of(state)
        );
    }
    html.push_str("</div>\n<ul>\n");
    for line in summary {
        let _ = writeln!(html, "<li>{}</li>", escape(line));
    }
    html.push_str("</ul>\n<table class=\"grid\">\n");

    for (row, cells) in grid.rows().enumerate() {
        html.push_str("<tr>");
        for (col, &cell) in cells.iter().enumerate() {
            let pos = Position::new(row, col);
            let class = if highlights.firebreak == Some(pos) {
                " class=\"firebreak\""
            } else if highlights.ignition == Some(pos) {
                " class=\"ignition\""
            } else {
                ""
            };
            let _ = write!(
                html,
                "<td{class} style=\"background:{}\" title=\"{pos} {}\"></td>",
                hex(cell_color(cell)),
                cell.name()
            );
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n</body>\n</html>\n");
    html
}

/// Largest PNG scale accepted from the command line or a config file
pub const MAX_PNG_SCALE: u32 = 64;

/// Upper bound on the pixel count of an exported image
const MAX_IMAGE_PIXELS: u64 = 1 << 26;

/// Pixel dimensions of `grid` at `scale`, or None when they overflow or exceed the cap
fn image_dimensions(grid: &TerrainGrid, scale: u32) -> Option<(u32, u32)> {
    let width = u32::try_from(grid.width()).ok()?.checked_mul(scale)?;
    let height = u32::try_from(grid.height()).ok()?.checked_mul(scale)?;
    (u64::from(width) * u64::from(height) <= MAX_IMAGE_PIXELS).then_some((width, height))
}

/// Render `grid` to an image with `scale` x `scale` pixels per cell
pub fn grid_image(grid: &TerrainGrid, scale: u32) -> Result<RgbImage, ExportError> {
    let scale = scale.max(1);
    let (width, height) = image_dimensions(grid, scale).ok_or(ExportError::ImageTooLarge {
        width: grid.width(),
        height: grid.height(),
        scale,
    })?;
    let mut img: RgbImage = ImageBuffer::new(width, height);
    for (row, cells) in grid.rows().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            let color = Rgb(cell_color(cell));
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(col as u32 * scale + dx, row as u32 * scale + dy, color);
                }
            }
        }
    }
    Ok(img)
}

/// Save `grid` as a PNG
pub fn save_png(grid: &TerrainGrid, path: &Path, scale: u32) -> Result<(), ExportError> {
    grid_image(grid, scale)?
        .save(path)
        .map_err(|source| ExportError::Image {
            path: path.to_path_buf(),
            source,
        })
}

fn file_stem(view: SnapshotView) -> &'static str {
    match view {
        SnapshotView::Original => "original",
        SnapshotView::WithoutFirebreak => "burned_without_firebreak",
        SnapshotView::WithFirebreak => "burned_with_firebreak",
    }
}

/// Write one HTML page per snapshot (plus PNGs when `png_scale > 0`) into `dir`
pub fn export_session(report: &SessionReport, dir: &Path, png_scale: u32) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for view in [
        SnapshotView::Original,
        SnapshotView::WithoutFirebreak,
        SnapshotView::WithFirebreak,
    ] {
        let highlights = Highlights {
            ignition: report.ignition(),
            firebreak: if view == SnapshotView::WithFirebreak {
                report.chosen_firebreak()
            } else {
                None
            },
        };
        let grid = report.grid(view);
        let html = html_document(view.name(), grid, &report.summary(view), highlights);
        let path = dir.join(format!("{}.html", file_stem(view)));
        fs::write(&path, html).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);

        if png_scale > 0 {
            let path = dir.join(format!("{}.png", file_stem(view)));
            save_png(grid, &path, png_scale)?;
            written.push(path);
        }
    }

    info!(dir = %dir.display(), files = written.len(), "report exported");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::session::{SessionOutcome, SimulationSession};
    use crate::settings::MapSettings;
    use crate::terrain::CellState;
    use tempfile::TempDir;

    fn corridor_report() -> SessionReport {
        let grid = TerrainGrid::filled(4, 1, CellState::Tree).unwrap();
        let mut session = SimulationSession::new(AppConfig {
            map: MapSettings {
                ignition: Some(Position::new(0, 0)),
                ..MapSettings::default()
            },
            seed: Some(5),
            ..AppConfig::default()
        });
        match session.simulate(grid) {
            SessionOutcome::Completed(report) => *report,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_html_document_contents() {
        let grid = TerrainGrid::filled(3, 2, CellState::Water).unwrap();
        let html = html_document(
            "Lake <test>",
            &grid,
            &["Burned: 0/0 trees".to_string()],
            Highlights {
                ignition: Some(Position::new(1, 2)),
                firebreak: None,
            },
        );
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Lake &lt;test&gt;</title>"));
        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("<td").count(), 6);
        assert_eq!(html.matches("class=\"ignition\"").count(), 1);
        assert!(html.contains("<li>Burned: 0/0 trees</li>"));
        assert!(html.contains("#1e90ff"));
        assert!(html.contains("Water (6)"));
    }

    #[test]
    fn test_grid_image_scaled() {
        let mut grid = TerrainGrid::new(3, 2).unwrap();
        grid.set(Position::new(1, 2), CellState::Tree).unwrap();
        let img = grid_image(&grid, 4).unwrap();
        assert_eq!(img.dimensions(), (12, 8));
        assert_eq!(img.get_pixel(9, 5), &Rgb(cell_color(CellState::Tree)));
        assert_eq!(img.get_pixel(0, 0), &Rgb(cell_color(CellState::Empty)));
    }

    #[test]
    fn test_oversized_png_rejected() {
        let grid = TerrainGrid::filled(20, 10, CellState::Tree).unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huge.png");

        let result = save_png(&grid, &path, 300_000_000);
        assert!(matches!(
            result,
            Err(ExportError::ImageTooLarge {
                width: 20,
                height: 10,
                scale: 300_000_000
            })
        ));
        assert!(!path.exists());

        // No overflow, but past the pixel cap
        assert!(grid_image(&grid, 5_000).is_err());
        assert!(grid_image(&grid, MAX_PNG_SCALE).is_ok());
    }

    #[test]
    fn test_export_session_writes_files() {
        let report = corridor_report();
        let dir = TempDir::new().unwrap();
        let written = export_session(&report, dir.path(), 2).unwrap();
        assert_eq!(written.len(), 6);
        for path in &written {
            assert!(path.exists());
        }

        let with = fs::read_to_string(dir.path().join("burned_with_firebreak.html")).unwrap();
        assert!(with.contains("class=\"firebreak\""));
        let without = fs::read_to_string(dir.path().join("burned_without_firebreak.html")).unwrap();
        assert!(!without.contains("class=\"firebreak\""));
    }

    #[test]
    fn test_export_html_only() {
        let report = corridor_report();
        let dir = TempDir::new().unwrap();
        let written = export_session(&report, &dir.path().join("nested"), 0).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.extension().unwrap() == "html"));
    }
}
