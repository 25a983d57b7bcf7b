// SPDX-License-Identifier: GPL-3.0-only

//! Per-frame viewer pipeline
//!
//! One tick pulls a frame from the source, reprojects it, builds the
//! view-projection for the current pose, and renders the cloud. Nothing is
//! carried over between ticks apart from the renderer itself.

use crate::backends::{FrameSource, Intrinsics, RgbdFrame};
use crate::config::ViewerConfig;
use crate::errors::AppResult;
use crate::geometry::{PointCloud, PoseControls, reproject, view_projection};
use crate::shaders::PointCloudRenderer;
use crate::visualization::{depth_colormap, overlay, side_by_side};
use image::RgbImage;
use tracing::debug;

/// Which image the viewer displays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Pose-controlled point cloud render
    #[default]
    PointCloud,
    /// Color image next to the depth colormap
    SideBySide,
    /// Color image blended with the depth colormap
    Overlay,
}

impl ViewMode {
    /// Cycle to the next mode
    pub fn next(self) -> Self {
        match self {
            ViewMode::PointCloud => ViewMode::SideBySide,
            ViewMode::SideBySide => ViewMode::Overlay,
            ViewMode::Overlay => ViewMode::PointCloud,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::PointCloud => "Point cloud",
            ViewMode::SideBySide => "Aligned frames",
            ViewMode::Overlay => "Overlay",
        }
    }
}

/// Everything one tick produced
pub struct FrameOutput {
    pub frame: RgbdFrame,
    pub cloud: PointCloud,
    pub raster: RgbImage,
}

impl FrameOutput {
    /// Image to show for the given mode
    pub fn compose(&self, mode: ViewMode, colormap_alpha: f32) -> RgbImage {
        match mode {
            ViewMode::PointCloud => self.raster.clone(),
            ViewMode::SideBySide => side_by_side(
                &self.frame.color,
                &depth_colormap(&self.frame.depth, colormap_alpha),
            ),
            ViewMode::Overlay => overlay(
                &self.frame.color,
                &depth_colormap(&self.frame.depth, colormap_alpha),
            ),
        }
    }
}

/// Reprojection + rendering with a persistent GPU renderer
pub struct ViewerPipeline {
    renderer: PointCloudRenderer,
    config: ViewerConfig,
}

impl ViewerPipeline {
    pub fn new(config: ViewerConfig) -> AppResult<Self> {
        config.validate()?;
        let renderer = PointCloudRenderer::new(config.render_width, config.render_height)?;
        Ok(Self { renderer, config })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Pull the next frame from `source` and process it
    pub fn tick<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
        pose: &PoseControls,
    ) -> AppResult<FrameOutput> {
        let frame = source.next_frame()?;
        self.process(frame, pose)
    }

    /// Reproject and render one frame at `pose`
    pub fn process(&mut self, frame: RgbdFrame, pose: &PoseControls) -> AppResult<FrameOutput> {
        let cloud = reproject(
            &frame.color,
            &frame.depth,
            &frame.intrinsics,
            self.config.depth_scale,
        )?;

        let intrinsics = render_intrinsics(
            &frame,
            self.config.render_width,
            self.config.render_height,
        );
        let matrix = view_projection(
            pose,
            &intrinsics,
            self.config.render_width,
            self.config.render_height,
            self.config.near,
            self.config.far,
        );
        let raster = self.renderer.render(cloud.vertices(), &matrix)?;

        debug!(pose = %pose.summary(), points = cloud.len(), "Viewer tick complete");

        Ok(FrameOutput {
            frame,
            cloud,
            raster,
        })
    }
}

/// Frame intrinsics expressed in render target pixels
pub fn render_intrinsics(frame: &RgbdFrame, width: u32, height: u32) -> Intrinsics {
    if frame.width() == width && frame.height() == height {
        return frame.intrinsics;
    }
    frame.intrinsics.scaled(
        width as f32 / frame.width() as f32,
        height as f32 / frame.height() as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::types::{ColorImage, DepthImage, Intrinsics};
    use crate::backends::StillFrameSource;
    use approx::assert_relative_eq;
    use glam::Vec4;

    fn frame() -> RgbdFrame {
        let color = ColorImage::from_pixel(8, 6, image::Rgb([0, 200, 0]));
        let depth = DepthImage::from_pixel(8, 6, image::Luma([1500]));
        let intrinsics = Intrinsics::new(8.0, 8.0, 4.0, 3.0).unwrap();
        RgbdFrame::new(color, depth, intrinsics).unwrap()
    }

    #[test]
    fn test_view_mode_cycles() {
        let mut mode = ViewMode::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(mode, ViewMode::PointCloud);
        assert_eq!(
            seen,
            vec![ViewMode::PointCloud, ViewMode::SideBySide, ViewMode::Overlay]
        );
    }

    #[test]
    fn test_compose_debug_views() {
        let output = FrameOutput {
            frame: frame(),
            cloud: PointCloud::default(),
            raster: RgbImage::new(16, 12),
        };
        assert_eq!(output.compose(ViewMode::PointCloud, 0.03).dimensions(), (16, 12));
        assert_eq!(output.compose(ViewMode::SideBySide, 0.03).dimensions(), (16, 6));
        assert_eq!(output.compose(ViewMode::Overlay, 0.03).dimensions(), (8, 6));
    }

    fn hd_frame() -> RgbdFrame {
        let color = ColorImage::new(1280, 720);
        let depth = DepthImage::from_pixel(1280, 720, image::Luma([2000]));
        let intrinsics = Intrinsics::new(900.0, 900.0, 640.0, 360.0).unwrap();
        RgbdFrame::new(color, depth, intrinsics).unwrap()
    }

    /// Camera-space point of pixel (u, v) at depth z, projected to NDC
    fn pixel_to_ndc(frame: &RgbdFrame, u: f32, v: f32, z: f32, width: u32, height: u32) -> Vec4 {
        let k = frame.intrinsics;
        let point = Vec4::new((u - k.cx) * z / k.fx, (v - k.cy) * z / k.fy, z, 1.0);
        let m = view_projection(
            &PoseControls::default(),
            &render_intrinsics(frame, width, height),
            width,
            height,
            0.1,
            1000.0,
        );
        let clip = m * point;
        clip / clip.w
    }

    #[test]
    fn test_render_intrinsics_unchanged_at_native_size() {
        let frame = hd_frame();
        assert_eq!(render_intrinsics(&frame, 1280, 720), frame.intrinsics);
    }

    #[test]
    fn test_principal_point_centered_at_smaller_render_size() {
        let frame = hd_frame();
        let center = pixel_to_ndc(&frame, 640.0, 360.0, 2.0, 640, 480);
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-5);

        // Frame corners stay inside the target
        for (u, v) in [(0.0, 0.0), (1280.0, 720.0), (0.0, 720.0), (1280.0, 0.0)] {
            let ndc = pixel_to_ndc(&frame, u, v, 2.0, 640, 480);
            assert!(ndc.x.abs() <= 1.0 + 1e-4, "u={} v={} ndc={:?}", u, v, ndc);
            assert!(ndc.y.abs() <= 1.0 + 1e-4, "u={} v={} ndc={:?}", u, v, ndc);
        }
    }

    #[test]
    fn test_tick_renders_configured_size() {
        let config = ViewerConfig {
            render_width: 32,
            render_height: 24,
            ..Default::default()
        };
        let mut pipeline = match ViewerPipeline::new(config) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                println!("Skipping test (no GPU): {}", e);
                return;
            }
        };

        let mut source = StillFrameSource::from_frame(frame());
        let output = pipeline
            .tick(&mut source, &PoseControls::default())
            .unwrap();
        assert_eq!(output.cloud.len(), 48);
        assert_eq!(output.raster.dimensions(), (32, 24));
        assert!(output.raster.pixels().any(|p| p.0 == [0, 200, 0]));
    }
}
