// SPDX-License-Identifier: GPL-3.0-only

//! GPU point cloud rendering
//!
//! Rasterizes reprojected RGB-D vertices as single-pixel points into an
//! off-screen color target and reads the result back as an RGB image.

mod processor;

pub use processor::{GpuPoint, PointCloudRenderer};

/// Point cloud vertex + fragment shader
const POINT_CLOUD_WGSL: &str = include_str!("point_cloud.wgsl");

/// Get the point cloud shader source
pub fn point_cloud_shader() -> &'static str {
    POINT_CLOUD_WGSL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_cloud_shader_validates() {
        let module = match naga::front::wgsl::parse_str(point_cloud_shader()) {
            Ok(module) => module,
            Err(e) => panic!("Shader 'point_cloud' parse failed: {:?}", e),
        };

        let info = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module);
        if let Err(e) = info {
            panic!("Shader 'point_cloud' validation failed: {:?}", e);
        }

        let entry_points: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(entry_points.contains(&"vs_main"));
        assert!(entry_points.contains(&"fs_main"));
    }
}
