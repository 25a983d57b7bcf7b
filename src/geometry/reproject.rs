// SPDX-License-Identifier: GPL-3.0-only

//! Depth map reprojection into a colored point cloud

use crate::backends::types::{ColorImage, DepthImage, Intrinsics, RgbdFrame, check_dimensions};
use crate::constants::DEFAULT_DEPTH_SCALE;
use crate::errors::ReprojectError;
use tracing::debug;

/// Camera-space point with its color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// (x, y, z) in meters, X right, Y down, Z forward
    pub position: [f32; 3],
    /// (r, g, b) bytes
    pub color: [u8; 3],
}

impl Vertex {
    /// Whether the source pixel carried a depth sample
    #[inline]
    pub fn has_depth(&self) -> bool {
        self.position[2] > 0.0
    }
}

/// Row-major vertex array produced from one frame
///
/// Holds exactly one vertex per depth pixel, so index = v * width + u.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    vertices: Vec<Vertex>,
    width: u32,
    height: u32,
}

impl PointCloud {
    /// Wrap an already-built vertex list (no grid, width = len, height = 1)
    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        let width = vertices.len() as u32;
        let height = u32::from(!vertices.is_empty());
        Self {
            vertices,
            width,
            height,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Grid dimensions (width, height) of the source depth image
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Vertex produced by pixel (u, v)
    pub fn get(&self, u: u32, v: u32) -> Option<&Vertex> {
        if u >= self.width || v >= self.height {
            return None;
        }
        self.vertices.get((v * self.width + u) as usize)
    }

    /// Vertices whose pixel had a depth sample
    pub fn valid_points(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().filter(|v| v.has_depth())
    }
}

/// Reproject every depth pixel to camera space using the pinhole model
///
/// For pixel (u, v) with raw depth d:
/// `z = d / scale_factor`, `x = (u - cx) * z / fx`, `y = (v - cy) * z / fy`.
/// Pixels without depth yield a vertex at the origin.
pub fn reproject(
    color: &ColorImage,
    depth: &DepthImage,
    intrinsics: &Intrinsics,
    scale_factor: f32,
) -> Result<PointCloud, ReprojectError> {
    check_dimensions(color, depth)?;
    intrinsics.validate()?;

    let (width, height) = depth.dimensions();
    let mut vertices = Vec::with_capacity((width as usize) * (height as usize));

    for ((u, v, depth_px), color_px) in depth.enumerate_pixels().zip(color.pixels()) {
        let z = depth_px.0[0] as f32 / scale_factor;
        let x = (u as f32 - intrinsics.cx) * z / intrinsics.fx;
        let y = (v as f32 - intrinsics.cy) * z / intrinsics.fy;
        vertices.push(Vertex {
            position: [x, y, z],
            color: color_px.0,
        });
    }

    debug!(width, height, vertices = vertices.len(), "Reprojected depth frame");

    Ok(PointCloud {
        vertices,
        width,
        height,
    })
}

/// Reproject a frame with the default millimeter depth scale
pub fn reproject_frame(frame: &RgbdFrame) -> Result<PointCloud, ReprojectError> {
    reproject(
        &frame.color,
        &frame.depth,
        &frame.intrinsics,
        DEFAULT_DEPTH_SCALE,
    )
}
