// SPDX-License-Identifier: GPL-3.0-only

//! Shared frame types for RGB-D sources
//!
//! All color data inside the crate is stored as red-green-blue bytes.
//! Sources that deliver blue-green-red (the usual camera stream layout)
//! convert once through [`color_from_bgr`] before handing frames on.

use crate::errors::ReprojectError;
use image::{ImageBuffer, Luma, RgbImage};
use serde::{Deserialize, Serialize};

/// H×W×3 color image, RGB channel order
pub type ColorImage = RgbImage;

/// H×W depth image, millimeters, 0 = no depth
pub type DepthImage = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Pinhole camera intrinsics in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    /// Focal length X
    pub fx: f32,
    /// Focal length Y
    pub fy: f32,
    /// Principal point X
    pub cx: f32,
    /// Principal point Y
    pub cy: f32,
}

impl Intrinsics {
    /// Create intrinsics, rejecting non-positive focal lengths
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Result<Self, ReprojectError> {
        let intrinsics = Self { fx, fy, cx, cy };
        intrinsics.validate()?;
        Ok(intrinsics)
    }

    /// Check the focal length invariant (also rejects NaN)
    pub fn validate(&self) -> Result<(), ReprojectError> {
        if self.fx > 0.0 && self.fy > 0.0 {
            Ok(())
        } else {
            Err(ReprojectError::InvalidIntrinsics {
                fx: self.fx,
                fy: self.fy,
            })
        }
    }

    /// Intrinsics rescaled for a different image resolution
    pub fn scaled(&self, scale_x: f32, scale_y: f32) -> Self {
        Self {
            fx: self.fx * scale_x,
            fy: self.fy * scale_y,
            cx: self.cx * scale_x,
            cy: self.cy * scale_y,
        }
    }
}

/// One color + depth pair with the intrinsics it was captured with
#[derive(Debug, Clone)]
pub struct RgbdFrame {
    pub color: ColorImage,
    pub depth: DepthImage,
    pub intrinsics: Intrinsics,
}

impl RgbdFrame {
    /// Bundle a frame, checking that both images share one pixel grid
    pub fn new(
        color: ColorImage,
        depth: DepthImage,
        intrinsics: Intrinsics,
    ) -> Result<Self, ReprojectError> {
        check_dimensions(&color, &depth)?;
        intrinsics.validate()?;
        Ok(Self {
            color,
            depth,
            intrinsics,
        })
    }

    pub fn width(&self) -> u32 {
        self.depth.width()
    }

    pub fn height(&self) -> u32 {
        self.depth.height()
    }
}

/// Fail with `DimensionMismatch` unless color and depth are the same size
pub fn check_dimensions(color: &ColorImage, depth: &DepthImage) -> Result<(), ReprojectError> {
    if color.dimensions() == depth.dimensions() {
        return Ok(());
    }
    Err(ReprojectError::DimensionMismatch {
        color_width: color.width(),
        color_height: color.height(),
        depth_width: depth.width(),
        depth_height: depth.height(),
    })
}

/// Build an RGB color image from a packed BGR buffer
pub fn color_from_bgr(bgr: &[u8], width: u32, height: u32) -> Result<ColorImage, ReprojectError> {
    let expected = (width as usize) * (height as usize) * 3;
    if bgr.len() != expected {
        return Err(ReprojectError::BufferSize {
            expected,
            actual: bgr.len(),
        });
    }

    let rgb: Vec<u8> = bgr
        .chunks_exact(3)
        .flat_map(|px| [px[2], px[1], px[0]])
        .collect();

    ColorImage::from_raw(width, height, rgb).ok_or(ReprojectError::BufferSize {
        expected,
        actual: bgr.len(),
    })
}

/// Build a depth image from raw 16-bit samples in row-major order
pub fn depth_from_raw(samples: Vec<u16>, width: u32, height: u32) -> Result<DepthImage, ReprojectError> {
    let expected = (width as usize) * (height as usize);
    let actual = samples.len();
    DepthImage::from_raw(width, height, samples)
        .filter(|_| actual == expected)
        .ok_or(ReprojectError::BufferSize { expected, actual })
}
