// SPDX-License-Identifier: GPL-3.0-only

//! CPU-side geometry: depth reprojection, pose, and view/projection matrices

pub mod pose;
pub mod projection;
pub mod reproject;

pub use pose::{PoseAxis, PoseControls};
pub use projection::{
    axis_fixup, build_gl_view, build_projection, build_view_matrix, intrinsic_projection,
    view_projection,
};
pub use reproject::{PointCloud, Vertex, reproject, reproject_frame};
