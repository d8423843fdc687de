//! wgpu Renderer
//!
//! This module handles all wgpu initialization and rendering. Drawings are
//! rasterized on the CPU; the renderer uploads the finished canvas into a
//! float texture and blits it to the window surface.

use crate::error::Result;
use crate::raster::Canvas;
use wgpu::util::DeviceExt;

/// Uniforms for blit shader (surface encoding)
#[repr(C, align(16))]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct BlitUniforms {
    encode_srgb: u32, // 1 = shader encodes linear → sRGB
    _padding: [u32; 3],
}

/// Renderer wraps the wgpu device, queue, and surface
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    max_texture_dimension: u32,
    canvas_format: wgpu::TextureFormat,

    // Canvas texture holding the rasterized drawing
    canvas_texture: wgpu::Texture,
    canvas_view: wgpu::TextureView,

    // Blit pipeline for copying canvas to surface
    blit_pipeline: wgpu::RenderPipeline,
    blit_uniform_buffer: wgpu::Buffer,
    blit_bind_group: wgpu::BindGroup,
    canvas_sampler: wgpu::Sampler,
}

impl Renderer {
    /// Create a new renderer
    ///
    /// # Arguments
    /// * `window` - The window to render to
    /// * `size` - Initial surface size in physical pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<Self> {
        log::info!("🔧 Renderer::new() starting...");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all() & !wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;
        log::info!("✅ Surface created");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        log::info!("✅ Adapter acquired: {:?} (backend: {:?})", adapter_info.name, adapter_info.backend);

        let adapter_limits = adapter.limits();
        let max_texture_dimension = adapter_limits.max_texture_dimension_2d;
        log::info!("📏 Max texture dimension: {}", max_texture_dimension);

        // Downlevel defaults raised to what the adapter supports for textures
        let device_limits = wgpu::Limits::downlevel_defaults().using_resolution(adapter_limits);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Spiral Canvas Device"),
                required_features: wgpu::Features::empty(),
                required_limits: device_limits,
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;
        log::info!("✅ Device and queue created");

        let surface_caps = surface.get_capabilities(&adapter);
        log::debug!(
            "Surface capabilities: formats={:?}, present_modes={:?}",
            surface_caps.formats,
            surface_caps.present_modes
        );

        // Prefer sRGB formats so the hardware encodes the linear canvas
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        log::info!("Selected surface format: {:?}", surface_format);

        let canvas_format = wgpu::TextureFormat::Rgba16Float;

        let clamped_width = size.width.min(max_texture_dimension).max(1);
        let clamped_height = size.height.min(max_texture_dimension).max(1);
        if clamped_width != size.width || clamped_height != size.height {
            log::warn!(
                "⚠️ Canvas size {}x{} outside texture limits, clamping to {}x{}",
                size.width,
                size.height,
                clamped_width,
                clamped_height
            );
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: clamped_width,
            height: clamped_height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("✅ Surface configured: {}x{}", config.width, config.height);

        let (canvas_texture, canvas_view) =
            Self::create_canvas_texture(&device, clamped_width, clamped_height, canvas_format);

        let (blit_pipeline, blit_bind_group_layout) =
            Self::create_blit_pipeline(&device, surface_format);

        let canvas_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Canvas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let blit_uniforms = BlitUniforms {
            encode_srgb: u32::from(!surface_format.is_srgb()),
            _padding: [0; 3],
        };
        let blit_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Blit Uniform Buffer"),
            contents: bytemuck::cast_slice(&[blit_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let blit_bind_group = Self::create_blit_bind_group(
            &device,
            &blit_bind_group_layout,
            &canvas_view,
            &canvas_sampler,
            &blit_uniform_buffer,
        );

        log::info!(
            "✅ Renderer initialized: {}x{}, surface: {:?}, canvas: {:?}",
            size.width,
            size.height,
            surface_format,
            canvas_format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            max_texture_dimension,
            canvas_format,
            canvas_texture,
            canvas_view,
            blit_pipeline,
            blit_uniform_buffer,
            blit_bind_group,
            canvas_sampler,
        })
    }

    /// Create canvas texture holding the rasterized drawing
    fn create_canvas_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Canvas Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        (texture, view)
    }

    fn create_blit_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        canvas_view: &wgpu::TextureView,
        canvas_sampler: &wgpu::Sampler,
        uniform_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(canvas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(canvas_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Recreate the blit bind group with current canvas view and uniform buffer
    fn recreate_blit_bind_group(&mut self) {
        self.blit_bind_group = Self::create_blit_bind_group(
            &self.device,
            &self.blit_pipeline.get_bind_group_layout(0),
            &self.canvas_view,
            &self.canvas_sampler,
            &self.blit_uniform_buffer,
        );
    }

    /// Create the blit pipeline for copying canvas to surface
    fn create_blit_pipeline(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroupLayout) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group_layout)
    }

    /// Resize the surface and canvas texture
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        let clamped_width = new_size.width.min(self.max_texture_dimension);
        let clamped_height = new_size.height.min(self.max_texture_dimension);
        if clamped_width != new_size.width || clamped_height != new_size.height {
            log::warn!(
                "⚠️ Resize {}x{} exceeds max texture size {}, clamping to {}x{}",
                new_size.width,
                new_size.height,
                self.max_texture_dimension,
                clamped_width,
                clamped_height
            );
        }

        self.config.width = clamped_width;
        self.config.height = clamped_height;
        self.surface.configure(&self.device, &self.config);

        let (canvas_texture, canvas_view) = Self::create_canvas_texture(
            &self.device,
            clamped_width,
            clamped_height,
            self.canvas_format,
        );
        self.canvas_texture = canvas_texture;
        self.canvas_view = canvas_view;
        self.recreate_blit_bind_group();

        log::debug!("Surface and canvas resized to: {}x{}", clamped_width, clamped_height);
    }

    /// Pixel size the canvas must be rasterized at
    pub fn canvas_size(&self) -> [u32; 2] {
        [self.config.width, self.config.height]
    }

    /// Upload a rasterized canvas into the canvas texture
    pub fn upload_canvas(&mut self, canvas: &Canvas) {
        let width = self.canvas_texture.width();
        let height = self.canvas_texture.height();
        if canvas.width() != width || canvas.height() != height {
            log::warn!(
                "Canvas {}x{} does not match texture {}x{}, skipping upload",
                canvas.width(),
                canvas.height(),
                width,
                height
            );
            return;
        }

        // Rgba16Float: 4 channels * 2 bytes per f16
        let texels: Vec<half::f16> = canvas
            .pixels()
            .iter()
            .flat_map(|p| p.iter().map(|&c| half::f16::from_f32(c)))
            .collect();

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.canvas_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&texels),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 8),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        log::trace!("Uploaded canvas {}x{}", width, height);
    }

    /// Render a frame (blit canvas to surface)
    pub fn render(&mut self) {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::error!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Blit canvas texture to surface using full-screen quad
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.blit_pipeline);
            render_pass.set_bind_group(0, &self.blit_bind_group, &[]);
            render_pass.draw(0..6, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
