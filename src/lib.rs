// SPDX-License-Identifier: GPL-3.0-only

//! RGB-D point cloud viewer
//!
//! Reprojects registered color + depth frames into camera-space point clouds,
//! renders them off-screen from a user-controlled pose, and exports them as
//! PLY.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`backends`]: frame types and frame sources
//! - [`geometry`]: reprojection, pose, view and projection matrices
//! - [`shaders`]: GPU point cloud renderer
//! - [`pipelines`]: per-tick viewer pipeline, capture and export
//! - [`visualization`]: depth colormap and debug composites
//! - [`terminal`]: interactive terminal viewer
//! - [`config`]: user configuration handling

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod geometry;
pub mod gpu;
pub mod pipelines;
pub mod shaders;
pub mod terminal;
pub mod visualization;

// Re-export commonly used types
pub use backends::{FrameSource, Intrinsics, RgbdFrame};
pub use config::ViewerConfig;
pub use errors::{AppError, AppResult};
pub use geometry::{PointCloud, PoseControls, Vertex};
pub use shaders::PointCloudRenderer;
