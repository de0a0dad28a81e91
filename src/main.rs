mod app;
mod config;
mod error;
mod export;
mod firebreak;
mod generator;
mod persistence;
mod presets;
mod propagation;
mod render;
mod session;
mod settings;
mod terrain;
mod ui;

use app::App;
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use presets::{DensityPreset, PresetManager};
use ratatui::{backend::CrosstermBackend, Terminal};
use session::{SessionOutcome, SimulationSession};
use settings::DisplayMode;
use std::io;
use std::path::{Path, PathBuf};
use terrain::Position;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "forest-fire-sim")]
#[command(about = "Forest fire spread simulation with optimal single-tree firebreak search")]
struct Args {
    // === Map ===
    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Percentage of cells that start as trees (0-100)
    #[arg(short = 't', long)]
    trees: Option<f32>,

    /// Percentage of cells that start as water (0-100, trees + water <= 100)
    #[arg(short = 'w', long)]
    water: Option<f32>,

    /// Named density preset (see --list-presets)
    #[arg(short = 'p', long)]
    preset: Option<String>,

    /// RNG seed for reproducible maps
    #[arg(long)]
    seed: Option<u64>,

    // === Fire ===
    /// Ignition row (defaults to the map centre)
    #[arg(long, requires = "col")]
    row: Option<usize>,

    /// Ignition column (defaults to the map centre)
    #[arg(long, requires = "row")]
    col: Option<usize>,

    // === Files ===
    /// Load the map from a JSON grid file instead of generating one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the original map to a JSON grid file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Write HTML reports for the three snapshots into this directory
    #[arg(long = "export-dir")]
    export_dir: Option<PathBuf>,

    /// Also write PNG snapshots with this many pixels per cell
    #[arg(long = "png-scale")]
    png_scale: Option<u32>,

    /// Read settings from a JSON config file (command-line flags take precedence)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings to a JSON config file
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// Save the effective tree/water densities as a user preset
    #[arg(long = "save-preset")]
    save_preset: Option<String>,

    /// List available density presets and exit
    #[arg(long = "list-presets")]
    list_presets: bool,

    // === Output ===
    /// Display mode (symbols, plain)
    #[arg(long)]
    display: Option<String>,

    /// Browse the results in an interactive terminal viewer
    #[arg(short = 'i', long)]
    interactive: bool,
}

fn parse_display_mode(s: &str) -> DisplayMode {
    match s.to_lowercase().as_str() {
        "plain" | "ascii" | "text" => DisplayMode::Plain,
        _ => DisplayMode::Symbols,
    }
}

/// Merge config file, preset and command-line flags, in that order
fn build_config(args: &Args, presets: &PresetManager) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(name) = &args.preset {
        let preset = presets
            .find(name)
            .ok_or_else(|| format!("unknown preset '{}' (try --list-presets)", name))?;
        config.map.tree_percent = preset.tree_percent;
        config.map.water_percent = preset.water_percent;
    }

    if let Some(width) = args.width {
        config.map.width = width;
    }
    if let Some(height) = args.height {
        config.map.height = height;
    }
    if let Some(trees) = args.trees {
        config.map.tree_percent = trees;
    }
    if let Some(water) = args.water {
        config.map.water_percent = water;
    }
    if let (Some(row), Some(col)) = (args.row, args.col) {
        config.map.ignition = Some(Position::new(row, col));
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(display) = &args.display {
        config.display_mode = parse_display_mode(display);
    }
    if args.load.is_some() {
        config.load_path = args.load.clone();
    }
    if args.export_dir.is_some() {
        config.export_dir = args.export_dir.clone();
    }
    if let Some(scale) = args.png_scale {
        config.png_scale = scale;
    }

    if config.png_scale > export::MAX_PNG_SCALE {
        return Err(format!(
            "PNG scale {} is too large (at most {} pixels per cell)",
            config.png_scale,
            export::MAX_PNG_SCALE
        )
        .into());
    }
    // Densities only shape generated maps
    if config.load_path.is_none() {
        generator::validate_density(config.map.tree_percent, config.map.water_percent)?;
    }
    Ok(config)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();
    let mut presets = PresetManager::new();

    if args.list_presets {
        for preset in presets.all_presets() {
            println!(
                "{:<12} trees {:>5.1}%  water {:>5.1}%  {}",
                preset.name, preset.tree_percent, preset.water_percent, preset.description
            );
        }
        return Ok(());
    }

    let config = build_config(&args, &presets)?;

    if let Some(name) = &args.save_preset {
        let path = presets.save_preset(DensityPreset::new(
            name.as_str(),
            "Saved from the command line",
            config.map.tree_percent,
            config.map.water_percent,
        ))?;
        println!("Preset saved to {}", path.display());
    }
    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        println!("Config saved to {}", path.display());
    }

    let session = SimulationSession::new(config);
    if args.interactive {
        run_interactive(session)
    } else {
        run_batch(session, args.save.as_deref())
    }
}

/// One session printed to the console, optionally saved and exported
fn run_batch(mut session: SimulationSession, save: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let grid = session.obtain_grid()?;

    let stats = grid.stats();
    println!(
        "Map {}x{}: {} trees ({:.1}%), {} water ({:.1}%), {} bare ({:.1}%)",
        grid.width(),
        grid.height(),
        stats.trees,
        stats.percent(stats.trees),
        stats.water,
        stats.percent(stats.water),
        stats.empty,
        stats.percent(stats.empty)
    );

    if let Some(path) = save {
        persistence::save_grid(&grid, path)?;
        println!("Map saved to {}", path.display());
    }

    let report = match session.simulate(grid) {
        SessionOutcome::NothingToSimulate { .. } => {
            println!("No trees on the map: nothing to simulate.");
            return Ok(());
        }
        SessionOutcome::Completed(report) => report,
    };

    let config = session.config();
    print!("{}", render::render_report(&report, config.display_mode));

    if let Some(dir) = &config.export_dir {
        for path in export::export_session(&report, dir, config.png_scale)? {
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn run_interactive(session: SimulationSession) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Only process Press events
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Handle Ctrl+C
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
            KeyCode::Esc => {
                if app.show_help {
                    app.toggle_help();
                }
            }
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
            KeyCode::Char('j') | KeyCode::Char('J') => {
                if app.show_help {
                    app.scroll_help_down(ui::HELP_CONTENT_LINES);
                }
            }
            KeyCode::Char('k') | KeyCode::Char('K') => {
                if app.show_help {
                    app.scroll_help_up();
                }
            }
            KeyCode::Tab | KeyCode::Right => app.next_view(),
            KeyCode::BackTab | KeyCode::Left => app.prev_view(),
            KeyCode::Char('r') | KeyCode::Char('R') => app.rerun(),
            KeyCode::Char('t') | KeyCode::Char('T') => app.adjust_trees(5.0),
            KeyCode::Char('g') | KeyCode::Char('G') => app.adjust_trees(-5.0),
            KeyCode::Char('w') | KeyCode::Char('W') => app.adjust_water(5.0),
            KeyCode::Char('s') | KeyCode::Char('S') => app.adjust_water(-5.0),
            KeyCode::Char('m') | KeyCode::Char('M') => app.toggle_display_mode(),
            KeyCode::Char('e') | KeyCode::Char('E') => app.export(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "forest-fire-sim",
            "--width",
            "30",
            "--trees",
            "80",
            "--water",
            "5",
            "--row",
            "2",
            "--col",
            "7",
            "--display",
            "plain",
        ]);
        let config = build_config(&args, &PresetManager::with_dir(None)).unwrap();
        assert_eq!(config.map.width, 30);
        assert_eq!(config.map.height, AppConfig::default().map.height);
        assert_eq!(config.map.tree_percent, 80.0);
        assert_eq!(config.map.ignition, Some(Position::new(2, 7)));
        assert_eq!(config.display_mode, DisplayMode::Plain);
    }

    #[test]
    fn test_preset_then_flag() {
        let args = Args::parse_from(["forest-fire-sim", "--preset", "fragmented", "--trees", "40"]);
        let config = build_config(&args, &PresetManager::with_dir(None)).unwrap();
        assert_eq!(config.map.tree_percent, 40.0);
        assert_eq!(config.map.water_percent, 30.0);
    }

    #[test]
    fn test_invalid_density_rejected() {
        let args = Args::parse_from(["forest-fire-sim", "--trees", "90", "--water", "20"]);
        assert!(build_config(&args, &PresetManager::with_dir(None)).is_err());
    }

    #[test]
    fn test_density_ignored_for_loaded_map() {
        let args = Args::parse_from([
            "forest-fire-sim",
            "--load",
            "map.json",
            "--trees",
            "90",
            "--water",
            "20",
        ]);
        let config = build_config(&args, &PresetManager::with_dir(None)).unwrap();
        assert_eq!(config.load_path, Some(PathBuf::from("map.json")));
    }

    #[test]
    fn test_png_scale_capped() {
        let args = Args::parse_from(["forest-fire-sim", "--png-scale", "300000000"]);
        let err = build_config(&args, &PresetManager::with_dir(None)).unwrap_err();
        assert!(err.to_string().contains("too large"));

        let args = Args::parse_from(["forest-fire-sim", "--png-scale", "64"]);
        assert_eq!(build_config(&args, &PresetManager::with_dir(None)).unwrap().png_scale, 64);
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let args = Args::parse_from(["forest-fire-sim", "--preset", "swamp"]);
        let err = build_config(&args, &PresetManager::with_dir(None)).unwrap_err();
        assert!(err.to_string().contains("swamp"));
    }

    #[test]
    fn test_row_requires_col() {
        assert!(Args::try_parse_from(["forest-fire-sim", "--row", "3"]).is_err());
    }
}
