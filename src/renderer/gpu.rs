use wgpu::util::DeviceExt;

use crate::math::mesh::SurfaceMesh;
use crate::renderer::context::{GraphicsContext, UniformValue, uniform};
use crate::renderer::error::{RenderError, ShaderStage};
use crate::renderer::texture::TextureData;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const PLACEHOLDER_TEXEL: [u8; 4] = [255, 255, 255, 255];

/// Uniform block shared by both shader stages. Field order and padding
/// follow WGSL uniform layout rules.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub mvp: [[f32; 4]; 4],
    pub normal_mat: [[f32; 4]; 4],
    pub world: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub light_color: [f32; 3],
    pub shininess: f32,
    pub light_position: [f32; 3],
    pub _pad0: f32,
    pub light_vec: [f32; 3],
    pub _pad1: f32,
    pub tex_scale: [f32; 2],
    pub tex_center: [f32; 2],
}

impl Default for SceneUniforms {
    fn default() -> Self {
        let identity = glam::Mat4::IDENTITY.to_cols_array_2d();
        Self {
            mvp: identity,
            normal_mat: identity,
            world: identity,
            color: [1.0; 4],
            light_color: [1.0; 3],
            shininess: 1.0,
            light_position: [0.0; 3],
            _pad0: 0.0,
            light_vec: [0.0; 3],
            _pad1: 0.0,
            tex_scale: [1.0, 1.0],
            tex_center: [0.0, 0.0],
        }
    }
}

impl SceneUniforms {
    /// Stores `value` in the slot named `name`. Returns false when no slot
    /// of that name and type exists.
    pub fn apply(&mut self, name: &str, value: UniformValue) -> bool {
        match (name, value) {
            (uniform::MODEL_VIEW_PROJECTION, UniformValue::Mat4(m)) => {
                self.mvp = m.to_cols_array_2d()
            }
            (uniform::NORMAL_MATRIX, UniformValue::Mat4(m)) => {
                self.normal_mat = m.to_cols_array_2d()
            }
            (uniform::WORLD, UniformValue::Mat4(m)) => self.world = m.to_cols_array_2d(),
            (uniform::COLOR, UniformValue::Vec4(v)) => self.color = v,
            (uniform::LIGHT_COLOR, UniformValue::Vec3(v)) => self.light_color = v,
            (uniform::SHININESS, UniformValue::Float(v)) => self.shininess = v,
            (uniform::LIGHT_POSITION, UniformValue::Vec3(v)) => self.light_position = v,
            (uniform::LIGHT_VEC, UniformValue::Vec3(v)) => self.light_vec = v,
            (uniform::TEX_SCALE, UniformValue::Vec2(v)) => self.tex_scale = v,
            (uniform::TEX_CENTER, UniformValue::Vec2(v)) => self.tex_center = v,
            _ => return false,
        }
        true
    }
}

pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub normal_buffer: wgpu::Buffer,
    pub uv_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl MeshBuffers {
    pub fn new(device: &wgpu::Device, mesh: &SurfaceMesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Surface Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let normal_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Surface Normal Buffer"),
            contents: bytemuck::cast_slice(&mesh.normals),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uv_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Surface Texcoord Buffer"),
            contents: bytemuck::cast_slice(&mesh.uvs),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            vertex_buffer,
            normal_buffer,
            uv_buffer,
            vertex_count: mesh.vertex_count() as u32,
        }
    }
}

pub struct GpuState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,

    pub pipeline_surface: wgpu::RenderPipeline,

    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,

    pub texture_bind_group_layout: wgpu::BindGroupLayout,
    pub texture_bind_group: wgpu::BindGroup,
    pub sampler: wgpu::Sampler,

    pub mesh: Option<MeshBuffers>,

    pub depth_texture: wgpu::TextureView,
}

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const NORMAL_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const TEXCOORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];

fn surface_vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    [
        wgpu::VertexBufferLayout {
            array_stride: 12,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: 12,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &NORMAL_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: 8,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &TEXCOORD_ATTRIBUTES,
        },
    ]
}

async fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStage,
    label: &str,
    source: &'static str,
) -> Result<wgpu::ShaderModule, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match device.pop_error_scope().await {
        Some(err) => Err(RenderError::ShaderCompile {
            stage,
            log: err.to_string(),
        }),
        None => Ok(module),
    }
}

impl GpuState {
    pub async fn new(window: std::sync::Arc<winit::window::Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::ContextUnavailable(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::ContextUnavailable("no suitable GPU adapter".into()))?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Surface Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| RenderError::ContextUnavailable(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| RenderError::ContextUnavailable("surface has no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let vertex_shader = compile_stage(
            &device,
            ShaderStage::Vertex,
            "Surface Vertex Shader",
            include_str!("shaders/surface.vert.wgsl"),
        )
        .await?;
        let fragment_shader = compile_stage(
            &device,
            ShaderStage::Fragment,
            "Surface Fragment Shader",
            include_str!("shaders/surface.frag.wgsl"),
        )
        .await?;

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SceneUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Surface Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let texture_bind_group = Self::create_texture_bind_group(
            &device,
            &queue,
            &texture_bind_group_layout,
            &sampler,
            &TextureData::solid(PLACEHOLDER_TEXEL),
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Surface Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline_surface = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Surface Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_shader,
                entry_point: Some("vs_main"),
                buffers: &surface_vertex_layouts(),
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                cull_mode: None,
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
            multiview: None,
            cache: None,
        });
        if let Some(err) = device.pop_error_scope().await {
            return Err(RenderError::Link {
                log: err.to_string(),
            });
        }

        let depth_texture = Self::create_depth_texture(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            pipeline_surface,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group_layout,
            texture_bind_group,
            sampler,
            mesh: None,
            depth_texture,
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_texture_bind_group(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &TextureData,
    ) -> wgpu::BindGroup {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Surface Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Self::create_depth_texture(&self.device, &self.config);
        }
    }

    pub fn set_vsync(&mut self, enabled: bool) {
        self.config.present_mode = if enabled {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        self.surface.configure(&self.device, &self.config);
    }

    /// Replaces the vertex buffers wholesale. Must run before the first draw
    /// that should show the mesh.
    pub fn upload_mesh(&mut self, mesh: &SurfaceMesh) {
        if mesh.is_empty() {
            self.mesh = None;
            return;
        }
        self.mesh = Some(MeshBuffers::new(&self.device, mesh));
        log::info!("Uploaded surface mesh: {} vertices", mesh.vertex_count());
    }

    /// Binds `image` as the surface texture with linear filtering.
    pub fn set_texture(&mut self, image: &TextureData) {
        self.texture_bind_group = Self::create_texture_bind_group(
            &self.device,
            &self.queue,
            &self.texture_bind_group_layout,
            &self.sampler,
            image,
        );
        log::info!("Texture bound: {}x{}", image.width, image.height);
    }

    /// Starts recording the surface pass into `encoder`, targeting `view`.
    pub fn surface_pass<'a>(
        &'a self,
        view: &'a wgpu::TextureView,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> SurfacePass<'a> {
        SurfacePass {
            gpu: self,
            view,
            encoder,
            clear_color: wgpu::Color::BLACK,
            uniforms: SceneUniforms::default(),
        }
    }
}

/// One frame of surface drawing, fed through `GraphicsContext`.
pub struct SurfacePass<'a> {
    gpu: &'a GpuState,
    view: &'a wgpu::TextureView,
    encoder: &'a mut wgpu::CommandEncoder,
    clear_color: wgpu::Color,
    uniforms: SceneUniforms,
}

impl GraphicsContext for SurfacePass<'_> {
    fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = wgpu::Color {
            r: color[0] as f64,
            g: color[1] as f64,
            b: color[2] as f64,
            a: color[3] as f64,
        };
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if !self.uniforms.apply(name, value) {
            log::trace!("No uniform slot for '{}'", name);
        }
    }

    fn draw_strip(&mut self, vertex_count: u32) {
        self.gpu.queue.write_buffer(
            &self.gpu.uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.uniforms]),
        );

        let mut render_pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Surface Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.gpu.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(mesh) = &self.gpu.mesh else {
            return;
        };

        render_pass.set_pipeline(&self.gpu.pipeline_surface);
        render_pass.set_bind_group(0, &self.gpu.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, &self.gpu.texture_bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, mesh.normal_buffer.slice(..));
        render_pass.set_vertex_buffer(2, mesh.uv_buffer.slice(..));
        render_pass.draw(0..vertex_count.min(mesh.vertex_count), 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn test_uniform_block_size() {
        // 3 matrices + color + 4 packed vec3/vec2 rows
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 3 * 64 + 16 + 3 * 16 + 16);
    }

    #[test]
    fn test_apply_known_uniforms() {
        let mut u = SceneUniforms::default();

        assert!(u.apply(uniform::TEX_SCALE, UniformValue::Vec2([2.0, 1.0])));
        assert!(u.apply(uniform::LIGHT_POSITION, UniformValue::Vec3([0.0, 0.0, 5.0])));
        assert!(u.apply(uniform::SHININESS, UniformValue::Float(8.0)));

        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        assert!(u.apply(uniform::MODEL_VIEW_PROJECTION, UniformValue::Mat4(m)));

        assert_eq!(u.tex_scale, [2.0, 1.0]);
        assert_eq!(u.light_position, [0.0, 0.0, 5.0]);
        assert_eq!(u.shininess, 8.0);
        assert_eq!(u.mvp[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_apply_rejects_unknown_or_mistyped() {
        let mut u = SceneUniforms::default();
        assert!(!u.apply("ambientColor", UniformValue::Vec3([0.0, 0.0, 0.5])));
        assert!(!u.apply(uniform::TEX_SCALE, UniformValue::Float(2.0)));
        assert_eq!(u, SceneUniforms::default());
    }
}
