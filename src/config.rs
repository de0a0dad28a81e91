use crate::error::ConfigError;
use crate::settings::{DisplayMode, MapSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete run configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Map shape, densities and ignition
    pub map: MapSettings,
    /// RNG seed for reproducible maps and ignition fallback
    pub seed: Option<u64>,
    /// Console/TUI cell style
    pub display_mode: DisplayMode,
    /// Map file to load instead of generating
    pub load_path: Option<PathBuf>,
    /// Directory for HTML/PNG reports
    pub export_dir: Option<PathBuf>,
    /// Pixels per cell for PNG export (0 disables PNGs)
    pub png_scale: u32,
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, json).map_err(ConfigError::Write)?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::Read)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            map: MapSettings::default(),
            seed: None,
            display_mode: DisplayMode::default(),
            load_path: None,
            export_dir: None,
            png_scale: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Position;
    use tempfile::NamedTempFile;

    #[test]
    fn test_all_fields_preserved() {
        let original = AppConfig {
            version: 1,
            map: MapSettings {
                width: 42,
                height: 17,
                tree_percent: 75.5,
                water_percent: 12.0,
                ignition: Some(Position::new(3, 9)),
            },
            seed: Some(1234),
            display_mode: DisplayMode::Plain,
            load_path: Some(PathBuf::from("maps/valley.json")),
            export_dir: Some(PathBuf::from("out")),
            png_scale: 8,
        };

        let json = serde_json::to_string(&original).unwrap();
        let restored: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.map.width, 42);
        assert_eq!(restored.map.height, 17);
        assert_eq!(restored.map.tree_percent, 75.5);
        assert_eq!(restored.map.water_percent, 12.0);
        assert_eq!(restored.map.ignition, Some(Position::new(3, 9)));
        assert_eq!(restored.seed, Some(1234));
        assert_eq!(restored.display_mode, DisplayMode::Plain);
        assert_eq!(restored.png_scale, 8);
        assert_eq!(restored, original);
    }

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig::default();

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        config.save_to_file(&path).unwrap();
        let loaded = AppConfig::load_from_file(&path).unwrap();

        assert_eq!(loaded.version, config.version);
        assert_eq!(loaded.map, config.map);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }
}
