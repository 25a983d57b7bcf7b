// SPDX-License-Identifier: GPL-3.0-only
//! GPU shader programs and their processors

mod gpu_processor;
pub mod point_cloud;

pub use gpu_processor::{padded_bytes_per_row, read_buffer_async, strip_row_padding};
pub use point_cloud::{GpuPoint, PointCloudRenderer, point_cloud_shader};
