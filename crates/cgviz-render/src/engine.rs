//! The wgpu render engine.
//!
//! One engine owns the device, the camera, the two scene pipelines (flat
//! shaded triangles and unlit lines) and the uploaded geometry. It is created
//! either for a window surface ([`RenderEngine::new_windowed`]) or for an
//! offscreen target that can be read back ([`RenderEngine::new_headless`]).

use std::num::NonZeroU64;
use std::sync::Arc;

use glam::Vec3;

use cgviz_core::{scene_bounds, Geometry};

use crate::buffer::{create_buffer, write_uniform, BufferRole};
use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::scene_render::{GeometryBuffers, GeometryRenderData, PrimitiveKind, SceneVertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const HEADLESS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Camera uniforms.
/// Layout must match WGSL CameraUniforms exactly (80 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera position (w unused).
    pub eye: [f32; 4],
}

impl CameraUniforms {
    /// Builds uniforms from a camera.
    #[must_use]
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            eye: camera.position.extend(1.0).to_array(),
        }
    }
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self::from_camera(&Camera::default())
    }
}

/// Offscreen color target plus a readback buffer.
struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    readback: wgpu::Buffer,
    bytes_per_row: u32,
}

/// The main render engine.
pub struct RenderEngine {
    /// The wgpu device.
    pub device: wgpu::Device,
    /// The command queue.
    pub queue: wgpu::Queue,
    /// The window surface (`None` when headless).
    pub surface: Option<wgpu::Surface<'static>>,
    /// Surface configuration; also describes the offscreen target when headless.
    pub surface_config: wgpu::SurfaceConfiguration,
    /// Current width in pixels.
    pub width: u32,
    /// Current height in pixels.
    pub height: u32,
    /// The viewer camera.
    pub camera: Camera,
    /// Clear color.
    pub background_color: Vec3,

    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    scene: Vec<GeometryRenderData>,
    offscreen: Option<OffscreenTarget>,
}

impl RenderEngine {
    /// Creates a new windowed render engine.
    pub async fn new_windowed(window: Arc<winit::window::Window>) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let surface = instance.create_surface(window.clone())?;
        let (adapter, device, queue) = Self::request_device(&instance, Some(&surface)).await?;

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurface)?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        log::debug!("configured {width}x{height} surface with format {surface_format:?}");
        Ok(Self::from_parts(device, queue, Some(surface), surface_config, None))
    }

    /// Creates a new headless render engine rendering into an offscreen texture.
    pub async fn new_headless(width: u32, height: u32) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let (_adapter, device, queue) = Self::request_device(&instance, None).await?;

        let width = width.max(1);
        let height = height.max(1);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: HEADLESS_FORMAT,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let offscreen = Self::create_offscreen_target(&device, width, height);
        Ok(Self::from_parts(device, queue, None, surface_config, Some(offscreen)))
    }

    async fn request_device(
        instance: &wgpu::Instance,
        surface: Option<&wgpu::Surface<'_>>,
    ) -> RenderResult<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surface,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        log::debug!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("cgviz device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        Ok((adapter, device, queue))
    }

    fn from_parts(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: Option<wgpu::Surface<'static>>,
        surface_config: wgpu::SurfaceConfiguration,
        offscreen: Option<OffscreenTarget>,
    ) -> Self {
        let width = surface_config.width;
        let height = surface_config.height;
        #[allow(clippy::cast_precision_loss)]
        let camera = Camera::new(width as f32 / height as f32);

        let depth_view = Self::create_depth_view(&device, width, height);

        let camera_buffer = create_buffer(
            &device,
            BufferRole::Uniform,
            &[CameraUniforms::from_camera(&camera)],
            "camera uniforms",
        );

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera bind group layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(80),
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera bind group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene pipeline layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let mesh_pipeline = Self::create_scene_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            surface_config.format,
            PrimitiveKind::Triangles,
        );
        let line_pipeline = Self::create_scene_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            surface_config.format,
            PrimitiveKind::Lines,
        );

        Self {
            device,
            queue,
            surface,
            surface_config,
            width,
            height,
            camera,
            background_color: Vec3::new(0.1, 0.1, 0.1),
            depth_view,
            camera_buffer,
            camera_bind_group,
            mesh_pipeline,
            line_pipeline,
            scene: Vec::new(),
            offscreen,
        }
    }

    fn create_scene_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        kind: PrimitiveKind,
    ) -> wgpu::RenderPipeline {
        let (label, topology, fragment_entry) = match kind {
            PrimitiveKind::Triangles => (
                "mesh pipeline",
                wgpu::PrimitiveTopology::TriangleList,
                "fs_mesh",
            ),
            PrimitiveKind::Lines => ("line pipeline", wgpu::PrimitiveTopology::LineList, "fs_line"),
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[SceneVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(fragment_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_offscreen_target(device: &wgpu::Device, width: u32, height: u32) -> OffscreenTarget {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen color texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HEADLESS_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bytes_per_row = aligned_bytes_per_row(width);
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("offscreen readback buffer"),
            size: u64::from(bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        OffscreenTarget {
            texture,
            view,
            readback,
            bytes_per_row,
        }
    }

    /// Resizes the render targets.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.width = width;
        self.height = height;
        self.surface_config.width = width;
        self.surface_config.height = height;

        if let Some(ref surface) = self.surface {
            surface.configure(&self.device, &self.surface_config);
        }

        self.depth_view = Self::create_depth_view(&self.device, width, height);

        if self.offscreen.is_some() {
            self.offscreen = Some(Self::create_offscreen_target(&self.device, width, height));
        }

        #[allow(clippy::cast_precision_loss)]
        self.camera.set_aspect_ratio(width as f32 / height as f32);
    }

    /// Uploads the geometry list, replacing any previous scene, and fits the
    /// camera to its bounds.
    pub fn set_scene(&mut self, geometries: &[Geometry]) {
        self.scene = geometries
            .iter()
            .enumerate()
            .map(|(i, geometry)| {
                let label = geometry
                    .label()
                    .map_or_else(|| format!("{} {i}", geometry.type_name()), str::to_string);
                GeometryRenderData::new(&self.device, &GeometryBuffers::from_geometry(geometry), &label)
            })
            .collect();

        self.fit_camera(geometries);
        log::debug!("uploaded {} geometries", self.scene.len());
    }

    /// Points the camera at the bounds of the given geometries.
    pub fn fit_camera(&mut self, geometries: &[Geometry]) {
        if let Some((min, max)) = scene_bounds(geometries) {
            self.camera.look_at_box(min.as_vec3(), max.as_vec3());
        }
    }

    /// Returns the number of uploaded geometries.
    #[must_use]
    pub fn scene_len(&self) -> usize {
        self.scene.len()
    }

    /// Encodes a full scene pass into `view`.
    fn encode_scene(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        write_uniform(
            &self.queue,
            &self.camera_buffer,
            &CameraUniforms::from_camera(&self.camera),
        );

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(self.background_color.x),
                        g: f64::from(self.background_color.y),
                        b: f64::from(self.background_color.z),
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        render_pass.set_pipeline(&self.mesh_pipeline);
        for data in self.scene.iter().filter(|d| d.kind == PrimitiveKind::Triangles) {
            data.draw(&mut render_pass);
        }

        render_pass.set_pipeline(&self.line_pipeline);
        for data in self.scene.iter().filter(|d| d.kind == PrimitiveKind::Lines) {
            data.draw(&mut render_pass);
        }
    }

    /// Renders one frame to the window surface and presents it.
    pub fn render_to_surface(&mut self) -> RenderResult<()> {
        let surface = self.surface.as_ref().ok_or(RenderError::NoSurface)?;

        let output = match surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.resize(self.width, self.height);
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other) => {
                return Err(RenderError::Timeout)
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        self.encode_scene(&mut encoder, &view);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Renders one frame offscreen and returns tightly packed RGBA pixels,
    /// rows top to bottom.
    pub fn capture_frame(&mut self) -> RenderResult<Vec<u8>> {
        let target = self
            .offscreen
            .as_ref()
            .ok_or(RenderError::NoOffscreenTarget)?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("capture encoder"),
            });
        self.encode_scene(&mut encoder, &target.view);

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &target.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(target.bytes_per_row),
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

        // Map buffer and read data
        let buffer_slice = target.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());
        rx.recv()
            .map_err(|_| RenderError::BufferMapFailed)?
            .map_err(|_| RenderError::BufferMapFailed)?;

        // Copy data, removing row padding
        let data = buffer_slice.get_mapped_range();
        let row_bytes = (self.width * 4) as usize;
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        for row in 0..self.height {
            let start = (row * target.bytes_per_row) as usize;
            pixels.extend_from_slice(&data[start..start + row_bytes]);
        }

        drop(data);
        target.readback.unmap();
        Ok(pixels)
    }
}

/// Calculates bytes per row with proper alignment for wgpu buffer copies.
fn aligned_bytes_per_row(width: u32) -> u32 {
    let bytes_per_pixel = 4u32; // RGBA8
    let unaligned = width * bytes_per_pixel;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unaligned.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_camera_uniforms_size() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 80);
    }

    #[test]
    fn test_aligned_bytes_per_row() {
        assert_eq!(aligned_bytes_per_row(64), 256);
        assert_eq!(aligned_bytes_per_row(65), 512);
        assert_eq!(aligned_bytes_per_row(200) % wgpu::COPY_BYTES_PER_ROW_ALIGNMENT, 0);
    }

    #[test]
    fn test_camera_uniforms_eye() {
        let mut camera = Camera::new(1.0);
        camera.position = Vec3::new(1.0, 2.0, 3.0);
        let uniforms = CameraUniforms::from_camera(&camera);
        assert_eq!(uniforms.eye, [1.0, 2.0, 3.0, 1.0]);
    }

    proptest! {
        #[test]
        fn prop_bytes_per_row_aligned(width in 1u32..8192) {
            let row = aligned_bytes_per_row(width);
            prop_assert_eq!(row % wgpu::COPY_BYTES_PER_ROW_ALIGNMENT, 0);
            prop_assert!(row >= width * 4);
            prop_assert!(row < width * 4 + wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        }
    }
}
