//! The secondary camera's render target.
//!
//! A fixed 512x512 color/depth pair the scene is rendered into from the
//! secondary camera. The color texture doubles as the environment map for
//! the reflection material and as the source for the preview pane. The size
//! never changes, so nothing here reacts to resize.

use super::DEPTH_FORMAT;

/// Side length of the square reflection target.
pub const REFLECTION_TARGET_SIZE: u32 = 512;

pub struct ReflectionPass {
    view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

impl ReflectionPass {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Reflection Texture"),
            size: wgpu::Extent3d {
                width: REFLECTION_TARGET_SIZE,
                height: REFLECTION_TARGET_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Reflection Depth Texture"),
            size: wgpu::Extent3d {
                width: REFLECTION_TARGET_SIZE,
                height: REFLECTION_TARGET_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            depth_view: depth_texture.create_view(&wgpu::TextureViewDescriptor::default()),
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }
}
