use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A named tree/water density combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityPreset {
    pub name: String,
    pub description: String,
    pub tree_percent: f32,
    pub water_percent: f32,
}

impl DensityPreset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        tree_percent: f32,
        water_percent: f32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tree_percent,
            water_percent,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<DensityPreset>,
    /// User-created presets loaded from disk
    pub user: Vec<DensityPreset>,
    dir: Option<PathBuf>,
}

impl PresetManager {
    /// Manager backed by the user config directory
    pub fn new() -> Self {
        Self::with_dir(dirs::config_dir().map(|p| p.join("forest-fire-sim").join("presets")))
    }

    /// Manager backed by an explicit presets directory (None disables user presets)
    pub fn with_dir(dir: Option<PathBuf>) -> Self {
        let mut manager = Self {
            builtin: Self::builtin_presets(),
            user: Vec::new(),
            dir,
        };
        manager.load_user_presets();
        manager
    }

    fn builtin_presets() -> Vec<DensityPreset> {
        vec![
            DensityPreset::new("Balanced", "Mixed forest with scattered ponds", 60.0, 10.0),
            DensityPreset::new("Fragmented", "Lots of water breaking up the forest", 50.0, 30.0),
            DensityPreset::new("Dense", "Near-continuous canopy", 90.0, 5.0),
            DensityPreset::new("Sparse", "Open woodland with isolated stands", 30.0, 10.0),
        ]
    }

    /// Load user presets from disk, skipping unreadable files
    fn load_user_presets(&mut self) {
        let Some(dir) = &self.dir else { return };
        let Ok(entries) = fs::read_dir(dir) else { return };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                match Self::read_preset(&path) {
                    Ok(preset) => self.user.push(preset),
                    Err(e) => warn!(path = %path.display(), "skipping preset: {e}"),
                }
            }
        }
    }

    fn read_preset(path: &Path) -> Result<DensityPreset, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::Read)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save a preset to disk
    pub fn save_preset(&mut self, preset: DensityPreset) -> Result<PathBuf, ConfigError> {
        let dir = self.dir.as_ref().ok_or(ConfigError::NoConfigDir)?;
        fs::create_dir_all(dir).map_err(ConfigError::Write)?;

        // Sanitize filename
        let filename = preset
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect::<String>();
        let path = dir.join(format!("{}.json", filename));

        let json = serde_json::to_string_pretty(&preset).map_err(ConfigError::Serialize)?;
        fs::write(&path, json).map_err(ConfigError::Write)?;

        match self.user.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.user.push(preset),
        }
        Ok(path)
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &DensityPreset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name
    pub fn find(&self, name: &str) -> Option<&DensityPreset> {
        self.all_presets().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}
