use std::path::Path;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::assets;
use tree_core::{
    Scene, CLEAR_COLOR, GOLD, LIGHT_MARKER_SIZE, PARTICLE_OPACITY, PARTICLE_SIZE, STAR_SIZE,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SpriteUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PhotoUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    tint: [f32; 4],
}

/// One sprite batch: per-instance centers and colors plus its own uniforms.
struct SpriteBatch {
    centers: wgpu::Buffer,
    colors: wgpu::Buffer,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    count: u32,
}

struct PhotoSlot {
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    _texture: wgpu::Texture,
}

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sprite_pipeline: wgpu::RenderPipeline,
    photo_pipeline: wgpu::RenderPipeline,
    quad_vb: wgpu::Buffer,
    particles: SpriteBatch,
    lights: SpriteBatch,
    star: SpriteBatch,
    photos: Vec<PhotoSlot>,
}

// Two triangles spanning [-0.5, 0.5]^2
const QUAD_VERTICES: [f32; 12] = [
    -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
];

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

fn quad_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: (std::mem::size_of::<f32>() * 2) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0,
        }],
    }
}

const CENTER_ATTR: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x3,
    offset: 0,
    shader_location: 1,
}];
const COLOR_ATTR: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x3,
    offset: 0,
    shader_location: 2,
}];

fn instance_vec3_layout(
    attributes: &'static [wgpu::VertexAttribute],
) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vec3>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes,
    }
}

fn make_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout],
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        // photos are double sided
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

fn sprite_batch(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    centers: &[Vec3],
    colors: &[Vec3],
) -> SpriteBatch {
    // never create zero-sized vertex buffers
    let min_bytes = std::mem::size_of::<Vec3>() as u64;
    let vertex_buffer = |name: &str, data: &[Vec3]| {
        if data.is_empty() {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(name),
                size: min_bytes,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        } else {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(name),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
        }
    };
    let centers_buf = vertex_buffer(&format!("{label}_centers"), centers);
    let colors_buf = vertex_buffer(&format!("{label}_colors"), colors);
    let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<SpriteUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniforms.as_entire_binding(),
        }],
    });
    SpriteBatch {
        centers: centers_buf,
        colors: colors_buf,
        uniforms,
        bind_group,
        count: centers.len() as u32,
    }
}

fn upload_photo(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    photo: &assets::PhotoImage,
    index: usize,
) -> wgpu::Texture {
    let (width, height) = photo.image.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("photo_{index}")),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        photo.image.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    texture
}

impl<'w> GpuState<'w> {
    pub async fn new(
        window: &'w winit::window::Window,
        scene: &Scene,
        photo_dir: &Path,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // ---- sprites: particles, light ring, star ----
        let sprite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(tree_core::SPRITE_WGSL.into()),
        });
        let sprite_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let sprite_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pl"),
            bind_group_layouts: &[&sprite_bgl],
            push_constant_ranges: &[],
        });
        let sprite_pipeline = make_pipeline(
            &device,
            "sprite_pipeline",
            &sprite_layout,
            &sprite_shader,
            &[
                quad_layout(),
                instance_vec3_layout(&CENTER_ATTR),
                instance_vec3_layout(&COLOR_ATTR),
            ],
            format,
            ADDITIVE,
        );

        let particles = sprite_batch(
            &device,
            &sprite_bgl,
            "particles",
            scene.particles.positions(),
            scene.particles.colors(),
        );
        let lights = sprite_batch(
            &device,
            &sprite_bgl,
            "lights",
            scene.lights.positions(),
            scene.lights.colors(),
        );
        let star = sprite_batch(
            &device,
            &sprite_bgl,
            "star",
            &[Vec3::ZERO],
            &[Vec3::from(GOLD)],
        );

        // ---- photos ----
        let photo_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("photo_shader"),
            source: wgpu::ShaderSource::Wgsl(tree_core::PHOTO_WGSL.into()),
        });
        let photo_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("photo_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let photo_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("photo_pl"),
            bind_group_layouts: &[&photo_bgl],
            push_constant_ranges: &[],
        });
        let photo_pipeline = make_pipeline(
            &device,
            "photo_pipeline",
            &photo_layout,
            &photo_shader,
            &[quad_layout()],
            format,
            wgpu::BlendState::ALPHA_BLENDING,
        );
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("photo_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let mut photos = Vec::with_capacity(scene.photos.len());
        let mut loaded = 0usize;
        for i in 0..scene.photos.len() {
            let image = assets::load_photo(photo_dir, i);
            if !image.blank {
                loaded += 1;
            }
            let texture = upload_photo(&device, &queue, &image, i);
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("photo_uniforms"),
                size: std::mem::size_of::<PhotoUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("photo_bg"),
                layout: &photo_bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });
            photos.push(PhotoSlot {
                uniforms,
                bind_group,
                _texture: texture,
            });
        }
        log::info!(
            "[render] {} particles, {} lights, {loaded}/{} photos loaded, format {:?}",
            particles.count,
            lights.count,
            photos.len(),
            format
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            sprite_pipeline,
            photo_pipeline,
            quad_vb,
            particles,
            lights,
            star,
            photos,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn write_sprite_uniforms(
        &self,
        batch: &SpriteBatch,
        scene: &Scene,
        model: Mat4,
        size: f32,
        opacity: f32,
    ) {
        let cam = &scene.camera;
        let uniforms = SpriteUniforms {
            view_proj: cam.view_proj().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            cam_right: cam.right().extend(size).to_array(),
            cam_up: cam.up_vector().extend(opacity).to_array(),
        };
        self.queue
            .write_buffer(&batch.uniforms, 0, bytemuck::bytes_of(&uniforms));
    }

    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Per-frame uploads: positions nudged by the formation engine and the
        // twinkling ring colors. Particle colors were uploaded once.
        self.queue.write_buffer(
            &self.particles.centers,
            0,
            bytemuck::cast_slice(scene.particles.positions()),
        );
        self.queue.write_buffer(
            &self.lights.colors,
            0,
            bytemuck::cast_slice(scene.lights.colors()),
        );

        self.write_sprite_uniforms(
            &self.particles,
            scene,
            Mat4::from_rotation_y(scene.particles.rotation()),
            PARTICLE_SIZE,
            PARTICLE_OPACITY,
        );
        self.write_sprite_uniforms(
            &self.lights,
            scene,
            Mat4::from_rotation_y(scene.lights.rotation()),
            LIGHT_MARKER_SIZE,
            1.0,
        );
        let star = &scene.star;
        self.write_sprite_uniforms(
            &self.star,
            scene,
            Mat4::from_translation(star.position) * Mat4::from_rotation_y(star.rotation),
            STAR_SIZE * star.scale,
            1.0,
        );
        let view_proj = scene.camera.view_proj().to_cols_array_2d();
        for (slot, pose) in self.photos.iter().zip(scene.photos.poses()) {
            let uniforms = PhotoUniforms {
                view_proj,
                model: pose.model_matrix().to_cols_array_2d(),
                tint: [1.0, 1.0, 1.0, pose.opacity],
            };
            self.queue
                .write_buffer(&slot.uniforms, 0, bytemuck::bytes_of(&uniforms));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: CLEAR_COLOR[0],
                            g: CLEAR_COLOR[1],
                            b: CLEAR_COLOR[2],
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(&self.sprite_pipeline);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            let batches = [
                Some(&self.particles),
                scene.lights.visible().then_some(&self.lights),
                star.visible.then_some(&self.star),
            ];
            for batch in batches.into_iter().flatten() {
                if batch.count == 0 {
                    continue;
                }
                rpass.set_bind_group(0, &batch.bind_group, &[]);
                rpass.set_vertex_buffer(1, batch.centers.slice(..));
                rpass.set_vertex_buffer(2, batch.colors.slice(..));
                rpass.draw(0..6, 0..batch.count);
            }

            rpass.set_pipeline(&self.photo_pipeline);
            for (slot, pose) in self.photos.iter().zip(scene.photos.poses()) {
                if pose.opacity < 1e-3 {
                    continue;
                }
                rpass.set_bind_group(0, &slot.bind_group, &[]);
                rpass.draw(0..6, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
