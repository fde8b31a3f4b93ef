use crate::batch::TileVertex;
use crate::texture_cache::{TextureCache, TextureHandle};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;

/// Quads per `draw_mesh` call. Macroquad clamps geometry above its default
/// draw call capacity of 5000 indices (six per quad).
pub const MAX_QUADS_PER_MESH: usize = 5000 / 6;

/// Transform and tint applied to everything drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// Added to every world position after scaling.
    pub offset: Vec2,
    /// Multiplies every world position.
    pub scale: Vec2,
    /// Vertex colour; alpha carries layer opacity.
    pub color: Color,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: Vec2::ONE,
            color: WHITE,
        }
    }
}

impl RenderState {
    /// Maps a world position to target space.
    #[inline]
    pub fn transform(&self, p: Vec2) -> Vec2 {
        self.offset + p * self.scale
    }

    /// The same state moved by `by` world pixels.
    pub fn translated(mut self, by: Vec2) -> Self {
        self.offset += by * self.scale;
        self
    }

    /// The same state with its alpha multiplied by `opacity`.
    pub fn faded(mut self, opacity: f32) -> Self {
        self.color.a *= opacity;
        self
    }
}

/// Anything quads can be drawn into.
pub trait RenderTarget {
    /// Draws `vertices` (four per quad, clockwise from top-left) with the
    /// cached texture `texture`. Texture coordinates are in pixels.
    fn draw_quads(&mut self, texture: TextureHandle, vertices: &[TileVertex], state: &RenderState);
}

/// The current macroquad render target (screen or active camera).
pub struct Screen<'a> {
    textures: &'a TextureCache,
}

impl<'a> Screen<'a> {
    /// Target drawing with images of `textures`.
    pub fn new(textures: &'a TextureCache) -> Self {
        Self { textures }
    }
}

impl RenderTarget for Screen<'_> {
    fn draw_quads(&mut self, texture: TextureHandle, vertices: &[TileVertex], state: &RenderState) {
        let Some(tex) = self.textures.texture(texture) else {
            return;
        };
        let size = vec2(tex.width(), tex.height());

        for chunk in vertices.chunks(MAX_QUADS_PER_MESH * 4) {
            let mesh = Mesh {
                vertices: chunk
                    .iter()
                    .map(|v| {
                        let p = state.transform(v.position);
                        let uv = v.tex_coords / size;
                        Vertex::new(p.x, p.y, 0.0, uv.x, uv.y, state.color)
                    })
                    .collect(),
                indices: quad_indices(chunk.len() / 4),
                texture: Some(tex.clone()),
            };
            draw_mesh(&mesh);
        }
    }
}

/// Two triangles per quad.
fn quad_indices(quads: usize) -> Vec<u16> {
    (0..quads as u16)
        .flat_map(|q| {
            let i = q * 4;
            [i, i + 1, i + 2, i, i + 2, i + 3]
        })
        .collect()
}
