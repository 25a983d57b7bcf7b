// SPDX-License-Identifier: GPL-3.0-only

//! Viewer configuration
//!
//! Loaded from JSON. Every field has a default so partial files are fine.

use crate::constants::{self, capture, controls, render};
use crate::errors::{AppError, AppResult};
use crate::pipelines::scene::PlyEncoding;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the per-user config directory
const CONFIG_DIR_NAME: &str = "rgbd-viewer";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Off-screen render target width (pixels)
    pub render_width: u32,
    /// Off-screen render target height (pixels)
    pub render_height: u32,
    /// Near clip plane (meters)
    pub near: f32,
    /// Far clip plane (meters)
    pub far: f32,
    /// Divisor converting raw depth samples to meters
    pub depth_scale: f32,
    /// Degrees per rotation key press
    pub rotation_step_deg: f32,
    /// Centimeters per translation key press
    pub translation_step_cm: f32,
    /// Where saved image pairs go
    pub capture_dir: PathBuf,
    /// Point cloud written when leaving the viewer
    pub export_path: PathBuf,
    /// PLY body encoding
    pub ply_encoding: PlyEncoding,
    /// Depth colormap scaling factor
    pub colormap_alpha: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            render_width: render::DEFAULT_WIDTH,
            render_height: render::DEFAULT_HEIGHT,
            near: render::DEFAULT_NEAR,
            far: render::DEFAULT_FAR,
            depth_scale: constants::DEFAULT_DEPTH_SCALE,
            rotation_step_deg: controls::ROTATION_STEP_DEG,
            translation_step_cm: controls::TRANSLATION_STEP_CM,
            capture_dir: PathBuf::from(capture::DEFAULT_DIR),
            export_path: PathBuf::from(capture::DEFAULT_EXPORT_PATH),
            ply_encoding: PlyEncoding::default(),
            colormap_alpha: constants::DEFAULT_COLORMAP_ALPHA,
        }
    }
}

impl ViewerConfig {
    /// Per-user config file location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the per-user file is used
    /// when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let config = Self::from_file(&path)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate a config file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate JSON text
    pub fn from_json(text: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check renderer preconditions
    pub fn validate(&self) -> AppResult<()> {
        if self.render_width == 0 || self.render_height == 0 {
            return Err(AppError::Config(format!(
                "render size must be non-zero, got {}x{}",
                self.render_width, self.render_height
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(AppError::Config(format!(
                "clip planes must satisfy far > near > 0, got near={} far={}",
                self.near, self.far
            )));
        }
        if !(self.depth_scale > 0.0) {
            return Err(AppError::Config(format!(
                "depth scale must be positive, got {}",
                self.depth_scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ViewerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ViewerConfig::from_json(r#"{ "render_width": 320 }"#).unwrap();
        assert_eq!(config.render_width, 320);
        assert_eq!(config.render_height, render::DEFAULT_HEIGHT);
        assert_eq!(config.depth_scale, constants::DEFAULT_DEPTH_SCALE);
    }

    #[test]
    fn test_rejects_bad_clip_planes() {
        assert!(ViewerConfig::from_json(r#"{ "near": 5.0, "far": 1.0 }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "near": 0.0 }"#).is_err());
    }

    #[test]
    fn test_rejects_zero_size() {
        assert!(ViewerConfig::from_json(r#"{ "render_height": 0 }"#).is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ViewerConfig::from_json("{ not json"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = ViewerConfig {
            far: 50.0,
            ply_encoding: PlyEncoding::BinaryLittleEndian,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ViewerConfig::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ViewerConfig::load(Some(&dir.path().join("missing.json"))).is_err());
    }
}
