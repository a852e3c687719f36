//! CPU-side sprite mesh built fresh every frame.
//!
//! Each queued quad is one "blit part of an image into a window rectangle"
//! call. Quads are emitted in submission order and consecutive quads sharing a
//! texture collapse into a single `DrawCall`, so a frame of tiles from one
//! atlas costs one bind and one `draw_indexed`.
//!
//! Source rectangles are in texel units of the source image. A negative source
//! width mirrors the image horizontally: the left edge of the destination then
//! samples `x` and the right edge samples `x + width`, which lies to its left.

use std::sync::Arc;

use crate::vertex::SpriteVertex;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

/// One blit: `source` is `[x, y, width, height]` in texels of a
/// `texture_size` image, `dest` the same layout in window pixels.
#[derive(Debug, Clone, Copy)]
pub struct SpriteQuad<'a> {
    pub texture_key: &'a str,
    pub texture_size: (u32, u32),
    pub source: [i32; 4],
    pub dest: [i32; 4],
}

#[derive(Debug, Default)]
pub struct SpriteBatch {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    pub fn push_quad(&mut self, quad: SpriteQuad<'_>) {
        let tex_w = quad.texture_size.0.max(1) as f32;
        let tex_h = quad.texture_size.1.max(1) as f32;
        let [sx, sy, sw, sh] = quad.source;
        let u0 = sx as f32 / tex_w;
        let u1 = (sx + sw) as f32 / tex_w;
        let v0 = sy as f32 / tex_h;
        let v1 = (sy + sh) as f32 / tex_h;

        let [dx, dy, dw, dh] = quad.dest;
        let left = dx as f32;
        let top = dy as f32;
        let right = (dx + dw) as f32;
        let bottom = (dy + dh) as f32;

        let base_index = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            SpriteVertex {
                position: [left, top],
                tex_coords: [u0, v0],
            },
            SpriteVertex {
                position: [right, top],
                tex_coords: [u1, v0],
            },
            SpriteVertex {
                position: [right, bottom],
                tex_coords: [u1, v1],
            },
            SpriteVertex {
                position: [left, bottom],
                tex_coords: [u0, v1],
            },
        ]);

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        self.push_draw_call(quad.texture_key, draw_start, 6);
    }

    fn push_draw_call(&mut self, texture_key: &str, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if &*last.texture_key == texture_key && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture_key: Arc::from(texture_key),
            index_start,
            index_count,
        });
    }
}
