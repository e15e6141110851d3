use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use juliabrot_core::Viewport;
use juliabrot_render::BrushKind;

use crate::error::ExplorerError;

// ---------------------------------------------------------------------------
// Explorer settings
// ---------------------------------------------------------------------------

/// Startup configuration for an [`Explorer`](crate::Explorer).
///
/// Every field has a default, so a partial JSON file only overrides what it
/// names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerSettings {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default)]
    pub brush: BrushKind,
    #[serde(default)]
    pub color_offset: f32,
    /// Fraction of the visible extent moved per pan step.
    #[serde(default = "default_pan_fraction")]
    pub pan_fraction: f64,
    /// Scale multiplier per zoom step.
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,
    /// Slice workers per render. `None` uses one per core.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Seed for Banded/Random palettes. `None` draws a fresh palette per brush.
    #[serde(default)]
    pub palette_seed: Option<u64>,
    /// Maximum undo entries kept per mode.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_max_iterations() -> u32 {
    1000
}
fn default_pan_fraction() -> f64 {
    0.2
}
fn default_zoom_factor() -> f64 {
    2.0
}
fn default_max_history() -> usize {
    200
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            max_iterations: default_max_iterations(),
            brush: BrushKind::default(),
            color_offset: 0.0,
            pan_fraction: default_pan_fraction(),
            zoom_factor: default_zoom_factor(),
            workers: None,
            palette_seed: None,
            max_history: default_max_history(),
        }
    }
}

impl ExplorerSettings {
    /// Load settings from `path`, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<ExplorerSettings>(&json) {
                    Ok(settings) => {
                        info!("Loaded settings from {}", path.display());
                        return settings;
                    }
                    Err(e) => {
                        error!("Failed to parse settings: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read settings file: {e}");
                }
            }
        } else {
            debug!("No settings file at {}", path.display());
        }
        Self::default()
    }

    /// Persist settings to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Reject values no explorer can start from.
    pub fn validate(&self) -> crate::Result<()> {
        Viewport::default_mandelbrot(self.width, self.height, self.max_iterations).validate()?;
        if !(0.0..=1.0).contains(&self.color_offset) {
            return Err(ExplorerError::InvalidColorOffset(self.color_offset));
        }
        if !(self.pan_fraction > 0.0 && self.pan_fraction <= 1.0) {
            return Err(ExplorerError::Settings(format!(
                "pan_fraction must lie in (0, 1], got {}",
                self.pan_fraction
            )));
        }
        if !(self.zoom_factor > 1.0 && self.zoom_factor.is_finite()) {
            return Err(ExplorerError::Settings(format!(
                "zoom_factor must be finite and > 1, got {}",
                self.zoom_factor
            )));
        }
        if self.workers == Some(0) {
            return Err(ExplorerError::Settings(
                "workers must be at least 1 (omit it for one per core)".into(),
            ));
        }
        if self.max_history == 0 {
            return Err(ExplorerError::Settings("max_history must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = ExplorerSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.brush, BrushKind::Smooth);
        assert_eq!(settings.max_history, 200);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: ExplorerSettings =
            serde_json::from_str(r#"{ "width": 320, "brush": "banded", "palette_seed": 3 }"#)
                .unwrap();
        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, 600);
        assert_eq!(settings.brush, BrushKind::Banded);
        assert_eq!(settings.palette_seed, Some(3));
        assert_eq!(settings.zoom_factor, 2.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            ExplorerSettings { width: 0, ..Default::default() },
            ExplorerSettings { max_iterations: 0, ..Default::default() },
            ExplorerSettings { color_offset: 1.5, ..Default::default() },
            ExplorerSettings { color_offset: f32::NAN, ..Default::default() },
            ExplorerSettings { pan_fraction: 0.0, ..Default::default() },
            ExplorerSettings { zoom_factor: 1.0, ..Default::default() },
            ExplorerSettings { workers: Some(0), ..Default::default() },
            ExplorerSettings { max_history: 0, ..Default::default() },
        ];
        for settings in cases {
            assert!(settings.validate().is_err(), "{settings:?}");
        }
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExplorerSettings::load(&dir.path().join("absent.json"));
        assert_eq!(settings, ExplorerSettings::default());
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ExplorerSettings::load(&path), ExplorerSettings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = ExplorerSettings {
            width: 640,
            height: 480,
            brush: BrushKind::Rainbow,
            color_offset: 0.25,
            workers: Some(3),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(ExplorerSettings::load(&path), settings);
    }
}
