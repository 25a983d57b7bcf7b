// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Divisor converting raw depth samples (millimeters) to meters
pub const DEFAULT_DEPTH_SCALE: f32 = 1000.0;

/// Rotation controls are limited to [-180, 180] degrees
pub const ROTATION_LIMIT_DEG: f32 = 180.0;
/// Translation controls are limited to [-1000, 1000] centimeters
pub const TRANSLATION_LIMIT_CM: f32 = 1000.0;

/// Off-screen render target defaults, matching the 640x480 camera stream
pub mod render {
    pub const DEFAULT_WIDTH: u32 = 640;
    pub const DEFAULT_HEIGHT: u32 = 480;
    /// Near clip plane (meters)
    pub const DEFAULT_NEAR: f32 = 0.1;
    /// Far clip plane (meters)
    pub const DEFAULT_FAR: f32 = 1000.0;
}

/// Keyboard pose control step sizes
pub mod controls {
    /// Degrees per key press
    pub const ROTATION_STEP_DEG: f32 = 5.0;
    /// Centimeters per key press
    pub const TRANSLATION_STEP_CM: f32 = 10.0;
}

/// Image-pair capture and export
pub mod capture {
    /// Directory for saved image pairs
    pub const DEFAULT_DIR: &str = "./images";
    /// Point cloud written when leaving the viewer
    pub const DEFAULT_EXPORT_PATH: &str = "pcd.ply";
    /// Filename timestamp: YearMonthDay_HourMinuteSecond_Millisecond
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";
    pub const COLOR_PREFIX: &str = "rgb_";
    pub const DEPTH_PREFIX: &str = "depth_";
}

/// Depth colormap scaling (8-bit value = depth_mm * alpha, saturated)
pub const DEFAULT_COLORMAP_ALPHA: f32 = 0.03;

/// Terminal viewer frame poll interval
pub const TERMINAL_POLL_MS: u64 = 16;
