//! Configuration management for AnnoKit
//!
//! Provides configuration file handling and validation for annotation
//! drawing and picking. Supports JSON and TOML file formats stored in the
//! platform-specific configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Drawing settings (handle sizes, line widths, slice and surface defaults)
//! - Picking settings (buffer clear values)

use crate::error::{SettingsError, SettingsResult};
use annokit_core::constants::{
    ARROW_SIZE_MULTIPLE, DEFAULT_HALF_SLICE_THICKNESS, DEFAULT_SURFACE_OFFSET_LENGTH,
    ROTATION_HANDLE_OFFSET_MULTIPLE, SIZING_HANDLE_LINE_WIDTH, SIZING_HANDLE_SIZE,
};
use annokit_core::Rgba;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Annotation drawing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSettings {
    /// Width and height in pixels of a sizing handle
    pub sizing_handle_size: f64,
    /// Line width in pixels of the selection box around an edited annotation
    pub sizing_handle_line_width: f64,
    /// The rotation handle sits this many handle sizes beyond the top edge
    pub rotation_handle_offset_multiple: f64,
    /// Arrowheads extend this many line widths from the line
    pub arrow_size_multiple: f64,
    /// Narrowest line in pixels after percentage conversion
    pub line_width_minimum: f64,
    /// Half slice thickness used when the slice thickness is zero
    pub default_half_slice_thickness: f64,
    /// Offset applied when a coordinate is re-anchored to a surface vertex
    pub default_surface_offset_length: f64,
    /// Foreground color used for the selection box and handles
    pub foreground_color: Rgba,
    /// HSV saturation and value scale applied to the selection box color
    pub selection_color_scale: f64,
    /// X percentage of automatically placed color bars
    pub color_bar_auto_x: f64,
    /// Lowest Y percentage of the first automatically placed color bar
    pub color_bar_auto_min_y: f64,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            sizing_handle_size: SIZING_HANDLE_SIZE,
            sizing_handle_line_width: SIZING_HANDLE_LINE_WIDTH,
            rotation_handle_offset_multiple: ROTATION_HANDLE_OFFSET_MULTIPLE,
            arrow_size_multiple: ARROW_SIZE_MULTIPLE,
            line_width_minimum: 1.0,
            default_half_slice_thickness: DEFAULT_HALF_SLICE_THICKNESS,
            default_surface_offset_length: DEFAULT_SURFACE_OFFSET_LENGTH,
            foreground_color: Rgba::WHITE,
            selection_color_scale: 0.8,
            color_bar_auto_x: 14.0,
            color_bar_auto_min_y: 4.0,
        }
    }
}

/// Picking pass settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingSettings {
    /// Depth written when the picking buffers are cleared
    pub clear_depth: f64,
}

impl Default for PickingSettings {
    fn default() -> Self {
        Self { clear_depth: 1.0 }
    }
}

/// Complete AnnoKit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Drawing settings
    pub drawing: DrawingSettings,
    /// Picking settings
    pub picking: PickingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("annokit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        config.validate()?;
        tracing::debug!("Loaded annotation settings from {}", path.display());
        Ok(config)
    }

    /// Load config from file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!(
                "No settings at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let d = &self.drawing;
        if d.sizing_handle_size <= 0.0 {
            return Err(SettingsError::invalid(
                "drawing.sizing_handle_size",
                "must be > 0",
            ));
        }
        if d.sizing_handle_line_width <= 0.0 {
            return Err(SettingsError::invalid(
                "drawing.sizing_handle_line_width",
                "must be > 0",
            ));
        }
        if d.rotation_handle_offset_multiple < 0.0 {
            return Err(SettingsError::invalid(
                "drawing.rotation_handle_offset_multiple",
                "must be >= 0",
            ));
        }
        if d.arrow_size_multiple <= 0.0 {
            return Err(SettingsError::invalid(
                "drawing.arrow_size_multiple",
                "must be > 0",
            ));
        }
        if d.line_width_minimum < 0.0 {
            return Err(SettingsError::invalid(
                "drawing.line_width_minimum",
                "must be >= 0",
            ));
        }
        if d.default_half_slice_thickness <= 0.0 {
            return Err(SettingsError::invalid(
                "drawing.default_half_slice_thickness",
                "must be > 0",
            ));
        }
        if d.default_surface_offset_length < 0.0 {
            return Err(SettingsError::invalid(
                "drawing.default_surface_offset_length",
                "must be >= 0",
            ));
        }
        if !(0.0..=1.0).contains(&d.selection_color_scale) {
            return Err(SettingsError::invalid(
                "drawing.selection_color_scale",
                "must be within [0, 1]",
            ));
        }
        for (key, value) in [
            ("drawing.color_bar_auto_x", d.color_bar_auto_x),
            ("drawing.color_bar_auto_min_y", d.color_bar_auto_min_y),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(SettingsError::invalid(key, "must be within [0, 100]"));
            }
        }

        if !(0.0..=1.0).contains(&self.picking.clear_depth) {
            return Err(SettingsError::invalid(
                "picking.clear_depth",
                "must be within [0, 1]",
            ));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.drawing.sizing_handle_size, 5.0);
        assert_eq!(config.drawing.default_half_slice_thickness, 1.0);
        assert_eq!(config.drawing.color_bar_auto_x, 14.0);
    }

    #[test]
    fn test_validate_rejects_zero_handle_size() {
        let mut config = Config::new();
        config.drawing.sizing_handle_size = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sizing_handle_size"));
    }

    #[test]
    fn test_validate_rejects_color_bar_position() {
        let mut config = Config::new();
        config.drawing.color_bar_auto_x = 120.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[drawing]\nline_width_minimum = 2.5\n").unwrap();
        assert_eq!(config.drawing.line_width_minimum, 2.5);
        assert_eq!(config.drawing.sizing_handle_size, 5.0);
        assert_eq!(config.picking, PickingSettings::default());
    }
}
