// SPDX-License-Identifier: GPL-3.0-only

//! Scene capture pipeline
//!
//! Saves the raw inputs of a frame and exports its point cloud:
//! - Color image (8-bit RGB PNG)
//! - Depth image (16-bit grayscale PNG, millimeters)
//! - Point cloud (PLY)

mod ply_export;

pub use ply_export::{
    PlyEncoding, PlyExportOptions, export_point_cloud_ply, read_ply, read_ply_file, write_ply,
};

use crate::backends::types::{ColorImage, DepthImage};
use crate::constants::capture;
use crate::errors::AppResult;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

/// Paths written by [`save_image_pair`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePairPaths {
    pub timestamp: String,
    pub color_path: PathBuf,
    pub depth_path: PathBuf,
}

/// Filename timestamp, millisecond precision
pub fn capture_timestamp(now: DateTime<Local>) -> String {
    now.format(capture::TIMESTAMP_FORMAT).to_string()
}

/// Save a color/depth pair as `rgb_<ts>.png` and `depth_<ts>.png`
///
/// The depth image keeps its raw 16-bit samples so it can be reloaded as a
/// frame source later.
pub fn save_image_pair(
    color: &ColorImage,
    depth: &DepthImage,
    output_dir: &Path,
) -> AppResult<ImagePairPaths> {
    save_image_pair_at(color, depth, output_dir, Local::now())
}

/// [`save_image_pair`] with an explicit clock reading
pub fn save_image_pair_at(
    color: &ColorImage,
    depth: &DepthImage,
    output_dir: &Path,
    now: DateTime<Local>,
) -> AppResult<ImagePairPaths> {
    std::fs::create_dir_all(output_dir)?;

    let timestamp = capture_timestamp(now);
    let color_path = output_dir.join(format!("{}{}.png", capture::COLOR_PREFIX, timestamp));
    let depth_path = output_dir.join(format!("{}{}.png", capture::DEPTH_PREFIX, timestamp));

    color.save(&color_path)?;
    depth.save(&depth_path)?;

    info!(timestamp = %timestamp, dir = %output_dir.display(), "Saved image pair");

    Ok(ImagePairPaths {
        timestamp,
        color_path,
        depth_path,
    })
}
