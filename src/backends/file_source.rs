// SPDX-License-Identifier: GPL-3.0-only

//! File-backed frame sources
//!
//! Color files are decoded to RGB by the `image` crate, so no channel
//! reordering is needed here. Depth files must be 16-bit grayscale PNGs
//! holding millimeters.

use super::FrameSource;
use super::types::{ColorImage, DepthImage, Intrinsics, RgbdFrame};
use crate::constants::capture;
use crate::errors::FrameError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load a color image as RGB
pub fn load_color_image(path: &Path) -> Result<ColorImage, FrameError> {
    let image = image::open(path).map_err(|source| FrameError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.into_rgb8())
}

/// Load a raw 16-bit depth image
///
/// 8-bit or color files are rejected: converting them would silently
/// change the depth scale.
pub fn load_depth_image(path: &Path) -> Result<DepthImage, FrameError> {
    let image = image::open(path).map_err(|source| FrameError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    match image {
        image::DynamicImage::ImageLuma16(depth) => Ok(depth),
        other => Err(FrameError::Decode {
            path: path.to_path_buf(),
            reason: format!("expected 16-bit grayscale, got {:?}", other.color()),
        }),
    }
}

/// Load one color/depth pair into a frame
pub fn load_frame(
    color_path: &Path,
    depth_path: &Path,
    intrinsics: Intrinsics,
) -> Result<RgbdFrame, FrameError> {
    let color = load_color_image(color_path)?;
    let depth = load_depth_image(depth_path)?;
    debug!(
        color = %color_path.display(),
        depth = %depth_path.display(),
        width = depth.width(),
        height = depth.height(),
        "Loaded frame from disk"
    );
    Ok(RgbdFrame::new(color, depth, intrinsics)?)
}

/// Replays one still color/depth pair on every tick
pub struct StillFrameSource {
    frame: RgbdFrame,
}

impl StillFrameSource {
    pub fn open(
        color_path: &Path,
        depth_path: &Path,
        intrinsics: Intrinsics,
    ) -> Result<Self, FrameError> {
        let frame = load_frame(color_path, depth_path, intrinsics)?;
        info!(
            width = frame.width(),
            height = frame.height(),
            "Opened still frame source"
        );
        Ok(Self { frame })
    }

    pub fn from_frame(frame: RgbdFrame) -> Self {
        Self { frame }
    }
}

impl FrameSource for StillFrameSource {
    fn next_frame(&mut self) -> Result<RgbdFrame, FrameError> {
        Ok(self.frame.clone())
    }
}

/// Color/depth file pair belonging to one capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPair {
    pub timestamp: String,
    pub color_path: PathBuf,
    pub depth_path: PathBuf,
}

/// Find `rgb_<ts>.png` / `depth_<ts>.png` pairs in a directory, oldest first
///
/// Color files without a matching depth file are skipped.
pub fn scan_captures(dir: &Path) -> Result<Vec<CapturedPair>, FrameError> {
    let mut pairs = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(timestamp) = name
            .strip_prefix(capture::COLOR_PREFIX)
            .and_then(|rest| rest.strip_suffix(".png"))
        else {
            continue;
        };

        let depth_path = dir.join(format!("{}{}.png", capture::DEPTH_PREFIX, timestamp));
        if !depth_path.is_file() {
            debug!(color = %path.display(), "Skipping capture without depth image");
            continue;
        }

        pairs.push(CapturedPair {
            timestamp: timestamp.to_string(),
            color_path: path.clone(),
            depth_path,
        });
    }

    // Timestamps are zero-padded, so lexical order is chronological
    pairs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    Ok(pairs)
}

/// Replays a directory of captured pairs in order
pub struct SequenceFrameSource {
    dir: PathBuf,
    pairs: Vec<CapturedPair>,
    intrinsics: Intrinsics,
    position: usize,
    looping: bool,
}

impl SequenceFrameSource {
    pub fn open(dir: &Path, intrinsics: Intrinsics, looping: bool) -> Result<Self, FrameError> {
        let pairs = scan_captures(dir)?;
        if pairs.is_empty() {
            return Err(FrameError::Exhausted(dir.to_path_buf()));
        }
        info!(dir = %dir.display(), frames = pairs.len(), looping, "Opened capture sequence");
        Ok(Self {
            dir: dir.to_path_buf(),
            pairs,
            intrinsics,
            position: 0,
            looping,
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FrameSource for SequenceFrameSource {
    fn next_frame(&mut self) -> Result<RgbdFrame, FrameError> {
        if self.position >= self.pairs.len() {
            if !self.looping {
                return Err(FrameError::Exhausted(self.dir.clone()));
            }
            self.position = 0;
        }

        let pair = &self.pairs[self.position];
        let frame = load_frame(&pair.color_path, &pair.depth_path, self.intrinsics)?;
        self.position += 1;
        Ok(frame)
    }
}
