//! GPU state and the frame's render pipeline.
//!
//! Rendering is an explicit ordered list of passes, each with declared
//! inputs and one output:
//!
//! 1. **Ripple pass**: full-screen procedural shader into an offscreen
//!    texture sized to the surface.
//! 2. **Scene pass**: blit the ripple texture as the background, then draw
//!    the ball and attractors with depth. The reflection material samples
//!    the secondary target rendered on the previous frame.
//! 3. **Reflection pass** (when enabled): meshes only, from the secondary
//!    camera, into a fixed 512x512 target.
//! 4. **Preview pass** (when enabled): the same secondary view into a small
//!    top-left viewport of the surface.

mod reflection_pass;
mod ripple_pass;
mod scene_pass;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use winit::window::Window;

use crate::error::GpuError;
use crate::materials::{
    MaterialKind, ATTRACTOR_BASE, ATTRACTOR_EMISSIVE, ATTRACTOR_EMISSIVE_INTENSITY,
};
use crate::scene::Scene;
use reflection_pass::ReflectionPass;
use ripple_pass::RipplePass;
use scene_pass::ScenePass;

pub use reflection_pass::REFLECTION_TARGET_SIZE;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
/// Fraction of the surface covered by the preview pane.
const PREVIEW_FRACTION: f32 = 0.22;
/// Uniform-buffer slot stride; covers the minimum offset alignment.
const ENTITY_STRIDE: u64 = 256;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light_dir: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct EntityUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
    /// Interpretation depends on the shading mode in `w`:
    /// mode 0 -> (metalness, roughness, -, 0), mode 1 -> (-, -, shininess, 1),
    /// mode 2 -> (reflectivity, -, shininess, 2).
    params: [f32; 4],
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    ripple: RipplePass,
    scene_pass: ScenePass,
    reflection: ReflectionPass,
    globals_buffer: wgpu::Buffer,
    secondary_globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    secondary_globals_bind_group: wgpu::BindGroup,
    entity_buffer: wgpu::Buffer,
    entity_bind_group: wgpu::BindGroup,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, attractor_capacity: usize) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;
        log::info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

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

        let depth_view = create_depth_texture(&device, config.width, config.height);

        // Shared bind group layouts: per-frame globals and per-draw entity.
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
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
        let entity_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Entity Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let secondary_globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Secondary Globals Buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let secondary_globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Secondary Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: secondary_globals_buffer.as_entire_binding(),
            }],
        });

        // One slot for the ball plus one per attractor slot.
        let entity_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Entity Buffer"),
            size: (1 + attractor_capacity as u64) * ENTITY_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let entity_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Entity Bind Group"),
            layout: &entity_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &entity_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<EntityUniforms>() as u64),
                }),
            }],
        });

        let ripple = RipplePass::new(&device, config.width, config.height, surface_format);
        let reflection = ReflectionPass::new(&device, surface_format);
        let scene_pass = ScenePass::new(
            &device,
            surface_format,
            &globals_layout,
            &entity_layout,
            ripple.view(),
            reflection.view(),
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            ripple,
            scene_pass,
            reflection,
            globals_buffer,
            secondary_globals_buffer,
            globals_bind_group,
            secondary_globals_bind_group,
            entity_buffer,
            entity_bind_group,
        })
    }

    /// Reallocate every surface-sized resource for new dimensions.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_texture(&self.device, self.config.width, self.config.height);
        self.ripple
            .resize(&self.device, self.config.width, self.config.height);
        self.scene_pass.rebind_ripple(&self.device, self.ripple.view());
    }

    fn write_frame_uniforms(&self, scene: &Scene) {
        let eye = scene.camera.eye();
        let globals = Globals {
            view_proj: scene.camera.view_proj().to_cols_array_2d(),
            camera_pos: [eye.x, eye.y, eye.z, 1.0],
            light_dir: [0.0, 0.0, 1.0, 0.0],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let ball = &scene.ball;
        let secondary = Globals {
            view_proj: scene
                .secondary
                .view_proj(ball.position, ball.velocity)
                .to_cols_array_2d(),
            camera_pos: [ball.position.x, ball.position.y, ball.position.z, 1.0],
            light_dir: [0.0, 0.0, 1.0, 0.0],
        };
        self.queue.write_buffer(
            &self.secondary_globals_buffer,
            0,
            bytemuck::bytes_of(&secondary),
        );

        // Ball entity in slot 0.
        let material = scene.materials.current();
        let params = match material.kind {
            MaterialKind::Standard => [material.metalness, material.roughness, 0.0, 0.0],
            MaterialKind::Phong => [0.0, 0.0, material.shininess, 1.0],
            MaterialKind::Reflection => [material.reflectivity, 0.0, material.shininess, 2.0],
        };
        let color = scene.ball_color();
        let ball_entity = EntityUniforms {
            model: Mat4::from_translation(ball.position).to_cols_array_2d(),
            color: [color.x, color.y, color.z, 1.0],
            emissive: [0.0; 4],
            params,
        };
        self.queue
            .write_buffer(&self.entity_buffer, 0, bytemuck::bytes_of(&ball_entity));

        for (i, attractor) in scene.attractors.iter().enumerate() {
            let model = Mat4::from_translation(attractor.position)
                * Mat4::from_rotation_y(attractor.rotation);
            let entity = EntityUniforms {
                model: model.to_cols_array_2d(),
                color: [ATTRACTOR_BASE.x, ATTRACTOR_BASE.y, ATTRACTOR_BASE.z, 1.0],
                emissive: [
                    ATTRACTOR_EMISSIVE.x,
                    ATTRACTOR_EMISSIVE.y,
                    ATTRACTOR_EMISSIVE.z,
                    ATTRACTOR_EMISSIVE_INTENSITY,
                ],
                params: [0.0, 1.0, 0.0, 0.0],
            };
            self.queue.write_buffer(
                &self.entity_buffer,
                (1 + i as u64) * ENTITY_STRIDE,
                bytemuck::bytes_of(&entity),
            );
        }

        self.ripple.write(&self.queue, &scene.ripple_uniforms());
    }

    fn draw_meshes(&self, pass: &mut wgpu::RenderPass<'_>, globals: &wgpu::BindGroup, scene: &Scene) {
        pass.set_pipeline(self.scene_pass.mesh_pipeline());
        pass.set_bind_group(0, globals, &[]);
        pass.set_bind_group(2, self.scene_pass.env_bind_group(), &[]);

        pass.set_bind_group(1, &self.entity_bind_group, &[0]);
        self.scene_pass.draw_sphere(pass);

        for i in 0..scene.attractors.len() {
            let offset = ((1 + i) as u64 * ENTITY_STRIDE) as u32;
            pass.set_bind_group(1, &self.entity_bind_group, &[offset]);
            self.scene_pass.draw_dodecahedron(pass);
        }
    }

    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        self.write_frame_uniforms(scene);

        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // 1. Ripple field into its offscreen target.
        self.ripple.encode(&mut encoder);

        // 2. Main view: ripple background, then meshes.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.0,
                            g: 0.0,
                            b: 0.02,
                            a: 1.0,
                        }),
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

            self.scene_pass.draw_background(&mut pass);
            self.draw_meshes(&mut pass, &self.globals_bind_group, scene);
        }

        // 3. Secondary view into the reflection target (meshes only, no
        //    background); the main pass reads this texture next frame.
        if scene.reflection_enabled() {
            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Reflection Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: self.reflection.view(),
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: self.reflection.depth_view(),
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                self.draw_meshes(&mut pass, &self.secondary_globals_bind_group, scene);
            }

            // 4. Small preview pane, top-left.
            if scene.preview_enabled() {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Preview Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &surface_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
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
                pass.set_viewport(
                    0.0,
                    0.0,
                    self.config.width as f32 * PREVIEW_FRACTION,
                    self.config.height as f32 * PREVIEW_FRACTION,
                    0.0,
                    1.0,
                );
                self.draw_meshes(&mut pass, &self.secondary_globals_bind_group, scene);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
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
