// SPDX-License-Identifier: GPL-3.0-only

//! Off-screen point cloud renderer
//!
//! Draws reprojected vertices as a point list into a fixed-size RGBA
//! target with a 32-bit depth buffer (nearest point wins), then copies the
//! target back to the CPU.
//!
//! wgpu's framebuffer origin is the top-left corner and NDC `+y` maps to
//! row 0, so the readback is already in image row order and needs no
//! vertical flip.

use crate::errors::RenderError;
use crate::geometry::Vertex;
use crate::gpu::{self, wgpu};
use wgpu::util::DeviceExt;
use crate::shaders::gpu_processor::{padded_bytes_per_row, read_buffer_async, strip_row_padding};
use glam::Mat4;
use image::RgbImage;
use tracing::{debug, info};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertex layout uploaded to the GPU
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPoint {
    /// Camera-space position in meters
    pub position: [f32; 3],
    /// RGB color, alpha unused
    pub color: [u8; 4],
}

impl From<&Vertex> for GpuPoint {
    fn from(vertex: &Vertex) -> Self {
        let [r, g, b] = vertex.color;
        Self {
            position: vertex.position,
            color: [r, g, b, u8::MAX],
        }
    }
}

impl GpuPoint {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Unorm8x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Shader uniforms
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct RenderUniforms {
    /// Column-major, exactly as stored by glam
    view_projection: [f32; 16],
}

/// Headless point cloud renderer with a fixed output size
pub struct PointCloudRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    color_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    staging_buffer: wgpu::Buffer,
    padded_row: u32,
    width: u32,
    height: u32,
}

impl PointCloudRenderer {
    /// Create a renderer with a `width` x `height` target
    ///
    /// Fails with `ContextInit` when no device can be created and with
    /// `ShaderCompile` when the pipeline does not validate.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        pollster::block_on(Self::new_async(width, height))
    }

    pub async fn new_async(width: u32, height: u32) -> Result<Self, RenderError> {
        info!(width, height, "Initializing GPU point cloud renderer");

        if width == 0 || height == 0 {
            return Err(RenderError::InvalidTarget { width, height });
        }

        let (device, queue, gpu_info) = gpu::create_render_device("point_cloud_renderer").await?;

        info!(
            adapter_name = %gpu_info.adapter_name,
            adapter_backend = ?gpu_info.backend,
            "GPU device created for point cloud rendering"
        );

        let max_dimension = device.limits().max_texture_dimension_2d;
        if width > max_dimension || height > max_dimension {
            return Err(RenderError::InvalidTarget { width, height });
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("point_cloud_shader"),
            source: wgpu::ShaderSource::Wgsl(super::point_cloud_shader().into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("point_cloud_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("point_cloud_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("point_cloud_render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[GpuPoint::layout()],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::PointList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        if let Some(error) = device.pop_error_scope().await {
            return Err(RenderError::ShaderCompile(error.to_string()));
        }

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("point_cloud_uniform_buffer"),
            size: std::mem::size_of::<RenderUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("point_cloud_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let color_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("point_cloud_color_target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("point_cloud_depth_target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let padded_row = padded_bytes_per_row(width, 4);
        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("point_cloud_staging_buffer"),
            size: u64::from(padded_row) * u64::from(height),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        debug!(width, height, padded_row, "Point cloud render targets allocated");

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group,
            uniform_buffer,
            color_texture,
            depth_view,
            staging_buffer,
            padded_row,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Render the vertices and read back an RGB image
    ///
    /// The background is black. Vertices outside the clip volume are
    /// discarded. Calls are deterministic for identical inputs.
    pub fn render(
        &mut self,
        vertices: &[Vertex],
        view_projection: &Mat4,
    ) -> Result<RgbImage, RenderError> {
        pollster::block_on(self.render_async(vertices, view_projection))
    }

    pub async fn render_async(
        &mut self,
        vertices: &[Vertex],
        view_projection: &Mat4,
    ) -> Result<RgbImage, RenderError> {
        let uniforms = RenderUniforms {
            view_projection: view_projection.to_cols_array(),
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        // Zero-sized vertex buffers are not allowed, so an empty cloud
        // only clears the targets
        let vertex_buffer = (!vertices.is_empty()).then(|| {
            let points: Vec<GpuPoint> = vertices.iter().map(GpuPoint::from).collect();
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("point_cloud_vertex_buffer"),
                    contents: bytemuck::cast_slice(&points),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let color_view = self
            .color_texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("point_cloud_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("point_cloud_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(buffer) = &vertex_buffer {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.bind_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..vertices.len() as u32, 0..1);
            }
        }

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let data = read_buffer_async(&self.device, &self.staging_buffer).await?;
        let rgba = strip_row_padding(
            &data,
            (self.width * 4) as usize,
            self.padded_row as usize,
            self.height as usize,
        );

        let rgb: Vec<u8> = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        debug!(
            points = vertices.len(),
            width = self.width,
            height = self.height,
            "Point cloud rendered"
        );

        RgbImage::from_raw(self.width, self.height, rgb).ok_or_else(|| {
            RenderError::Readback("readback size does not match render target".to_string())
        })
    }
}
