//! Frame renderer: owns the GPU context, the texture cache and the streamed
//! mesh buffers, and submits one `SpriteBatch` per frame.
//!
//! Textures are keyed by image id and loaded on first use through a caller
//! supplied loader, so the renderer never reaches for files on its own.

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::batch::SpriteBatch;
use crate::gpu_context::GpuContext;
use crate::projection::ScreenProjection;
use crate::sprite_pipeline::SpritePipeline;
use crate::texture::Texture;
use crate::vertex::SpriteVertex;

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

pub struct SpriteRenderer {
    pub gpu: GpuContext,
    pipeline: SpritePipeline,
    textures: HashMap<Arc<str>, GpuSpriteTexture>,

    // Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
}

impl SpriteRenderer {
    pub fn new(window: Arc<Window>) -> Result<Self, String> {
        let gpu = GpuContext::new(window)?;
        let pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);

        let projection = ScreenProjection::for_viewport(gpu.size.0, gpu.size.1);
        let projection_buffer =
            gpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Projection Uniform Buffer"),
                    contents: bytemuck::cast_slice(&[projection]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
        let projection_bind_group =
            pipeline.create_camera_bind_group(&gpu.device, &projection_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        Ok(Self {
            gpu,
            pipeline,
            textures: HashMap::new(),
            vertex_buffer,
            index_buffer,
            vertex_capacity: 1,
            index_capacity: 1,
            projection_buffer,
            projection_bind_group,
        })
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.gpu.size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Size of the texture for `key`, loading it with `load` on first use.
    pub fn ensure_texture(
        &mut self,
        key: &str,
        load: impl FnOnce() -> Result<Vec<u8>, String>,
    ) -> Result<(u32, u32), String> {
        if let Some(cached) = self.textures.get(key) {
            return Ok(cached.texture.size);
        }
        let bytes = load()?;
        let texture = Texture::from_bytes(&self.gpu.device, &self.gpu.queue, &bytes, key)?;
        let bind_group = self
            .pipeline
            .create_texture_bind_group(&self.gpu.device, &texture);
        let size = texture.size;
        log::debug!("Loaded texture '{}' ({}x{})", key, size.0, size.1);
        self.textures.insert(
            Arc::from(key),
            GpuSpriteTexture {
                texture,
                bind_group,
            },
        );
        Ok(size)
    }

    /// Forget every cached texture, e.g. after the level's atlas changed.
    pub fn evict_textures(&mut self) {
        self.textures.clear();
    }

    /// Clear to `clear_color` and draw `batch` in submission order.
    pub fn render(&mut self, batch: &SpriteBatch, clear_color: wgpu::Color) {
        self.ensure_mesh_capacity(batch.vertices.len(), batch.indices.len());
        if !batch.vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&batch.vertices));
        }
        if !batch.indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&batch.indices));
        }
        let projection = ScreenProjection::for_viewport(self.gpu.size.0, self.gpu.size.1);
        self.gpu.queue.write_buffer(
            &self.projection_buffer,
            0,
            bytemuck::cast_slice(&[projection]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.projection_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for draw in &batch.draw_calls {
                let Some(texture) = self.textures.get(&draw.texture_key) else {
                    log::warn!("Draw call references unloaded texture '{}'", draw.texture_key);
                    continue;
                };
                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                render_pass.draw_indexed(
                    draw.index_start..(draw.index_start + draw.index_count),
                    0,
                    0..1,
                );
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.index_capacity);
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
