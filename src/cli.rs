// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Viewing a still pair or a captured sequence in the terminal
//! - Exporting a pair as a PLY point cloud
//! - Rendering a pair at a fixed pose to a PNG

use rgbd_viewer::ViewerConfig;
use rgbd_viewer::backends::file_source::load_frame;
use rgbd_viewer::backends::{Intrinsics, SequenceFrameSource, StillFrameSource};
use rgbd_viewer::errors::AppResult;
use rgbd_viewer::geometry::{PoseControls, reproject};
use rgbd_viewer::pipelines::ViewerPipeline;
use rgbd_viewer::pipelines::scene::{PlyEncoding, PlyExportOptions, export_point_cloud_ply};
use rgbd_viewer::terminal;
use std::path::{Path, PathBuf};

/// Interactive viewer over one color/depth pair
pub fn view(
    rgb: &Path,
    depth: &Path,
    intrinsics: Intrinsics,
    config: ViewerConfig,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let source = StillFrameSource::open(rgb, depth, intrinsics)?;
    let export_path = output.unwrap_or_else(|| config.export_path.clone());
    report_export(terminal::run(source, config, export_path)?);
    Ok(())
}

/// Interactive viewer looping over a capture directory
pub fn replay(
    dir: &Path,
    intrinsics: Intrinsics,
    config: ViewerConfig,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let source = SequenceFrameSource::open(dir, intrinsics, true)?;
    println!("Replaying {} captured frames", source.len());
    let export_path = output.unwrap_or_else(|| config.export_path.clone());
    report_export(terminal::run(source, config, export_path)?);
    Ok(())
}

/// Reproject a pair and write it as PLY
pub fn export(
    rgb: &Path,
    depth: &Path,
    intrinsics: Intrinsics,
    config: &ViewerConfig,
    output: Option<PathBuf>,
    binary: bool,
    skip_invalid: bool,
) -> AppResult<()> {
    let frame = load_frame(rgb, depth, intrinsics)?;
    let cloud = reproject(
        &frame.color,
        &frame.depth,
        &frame.intrinsics,
        config.depth_scale,
    )?;

    let options = PlyExportOptions {
        encoding: if binary {
            PlyEncoding::BinaryLittleEndian
        } else {
            config.ply_encoding
        },
        skip_invalid,
    };
    let path = output.unwrap_or_else(|| config.export_path.clone());
    let count = export_point_cloud_ply(&cloud, &path, options)?;

    println!("Exported {} points to {}", count, path.display());
    Ok(())
}

/// Render a pair at a fixed pose and save the raster
pub fn render(
    rgb: &Path,
    depth: &Path,
    intrinsics: Intrinsics,
    pose: PoseControls,
    config: ViewerConfig,
    output: &Path,
) -> AppResult<()> {
    let frame = load_frame(rgb, depth, intrinsics)?;
    let mut pipeline = ViewerPipeline::new(config)?;
    let result = pipeline.process(frame, &pose)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    result.raster.save(output)?;

    println!(
        "Rendered {}x{} view ({}) to {}",
        result.raster.width(),
        result.raster.height(),
        pose.summary(),
        output.display()
    );
    Ok(())
}

fn report_export(exported: Option<(PathBuf, usize)>) {
    match exported {
        Some((path, count)) => println!("Exported {} points to {}", count, path.display()),
        None => println!("No frame was rendered, nothing exported"),
    }
}
