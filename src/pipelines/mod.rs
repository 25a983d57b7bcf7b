// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing pipelines
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Frame Source │ ──▶ │  Viewer Pipeline  │ ──▶ │   Terminal   │
//! │ (color+depth)│     │  - Reproject      │     │   display    │
//! │              │     │  - View/proj      │     │              │
//! │              │     │  - GPU points     │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//!                               │
//!                               ▼
//!                      ┌───────────────────┐
//!                      │  Scene Capture    │
//!                      │  - PNG pair       │
//!                      │  - PLY export     │
//!                      └───────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`viewer`]: per-tick reprojection and rendering
//! - [`scene`]: image pair capture and point cloud export

pub mod scene;
pub mod viewer;

pub use viewer::{FrameOutput, ViewMode, ViewerPipeline};
