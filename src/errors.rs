// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the RGB-D viewer

use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Reprojection errors
    #[error("Reprojection error: {0}")]
    Reproject(#[from] ReprojectError),
    /// Rendering errors
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    /// Point cloud export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
    /// Frame acquisition errors
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// Storage/filesystem errors
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Errors raised while turning an RGB-D pair into vertices
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReprojectError {
    /// Color and depth images do not cover the same pixel grid
    #[error("color image is {color_width}x{color_height} but depth image is {depth_width}x{depth_height}")]
    DimensionMismatch {
        color_width: u32,
        color_height: u32,
        depth_width: u32,
        depth_height: u32,
    },
    /// Focal lengths must be strictly positive
    #[error("invalid intrinsics: fx={fx}, fy={fy} (focal lengths must be > 0)")]
    InvalidIntrinsics { fx: f32, fy: f32 },
    /// Raw buffer length does not match the declared image size
    #[error("buffer holds {actual} samples, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// GPU renderer errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum RenderError {
    /// No adapter or device could be acquired
    #[error("failed to acquire GPU context: {0}")]
    ContextInit(String),
    /// Shader module or pipeline failed validation
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),
    /// Mapping the readback buffer failed
    #[error("readback failed: {0}")]
    Readback(String),
    /// Off-screen target has an unusable size
    #[error("invalid render target {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },
}

/// Point cloud export errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing or reading the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// File content does not follow the expected vertex layout
    #[error("malformed point cloud file: {0}")]
    Format(String),
}

/// Frame source errors
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Image file could not be opened or decoded
    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Decoded image has an unexpected pixel layout
    #[error("unsupported image layout in {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    /// Sequence source has no frames
    #[error("no frames found in {0}")]
    Exhausted(PathBuf),
    /// Directory listing failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Loaded images do not form a valid frame
    #[error(transparent)]
    Invalid(#[from] ReprojectError),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Storage(std::io::Error::other(err))
    }
}
