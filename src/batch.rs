use crate::render::{RenderState, RenderTarget};
use crate::texture_cache::TextureHandle;
use macroquad::prelude::*;

/// One corner of a tile quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileVertex {
    /// World position in pixels.
    pub position: Vec2,
    /// Texture position in pixels of the palette image.
    pub tex_coords: Vec2,
}

/// Vertex indices of one placed tile inside its [`TileBatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRef {
    /// Positions in [`TileBatch::vertices`], one per corner.
    pub indices: [u32; 4],
}

impl TileRef {
    fn starting_at(i: u32) -> Self {
        Self {
            indices: [i, i + 1, i + 2, i + 3],
        }
    }
}

/// All quads of a layer that sample the same palette texture.
#[derive(Debug)]
pub struct TileBatch {
    texture: TextureHandle,
    vertices: Vec<TileVertex>,
    tiles: Vec<TileRef>,
}

impl TileBatch {
    pub(crate) fn new(texture: TextureHandle) -> Self {
        Self {
            texture,
            vertices: Vec::new(),
            tiles: Vec::new(),
        }
    }

    /// Appends a quad given as top-left, top-right, bottom-right, bottom-left.
    pub(crate) fn add_tile(&mut self, quad: [TileVertex; 4]) -> TileRef {
        let tile = TileRef::starting_at(self.vertices.len() as u32);
        self.vertices.extend_from_slice(&quad);
        self.tiles.push(tile);
        tile
    }

    /// Shared texture every quad samples.
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Flat vertex buffer, four vertices per quad.
    pub fn vertices(&self) -> &[TileVertex] {
        &self.vertices
    }

    /// References of every placed tile, in placement order.
    pub fn tiles(&self) -> &[TileRef] {
        &self.tiles
    }

    /// The four vertices of a placed tile.
    pub fn quad(&self, tile: TileRef) -> Option<&[TileVertex]> {
        let start = tile.indices[0] as usize;
        self.vertices.get(start..start + 4)
    }

    /// Number of placed tiles.
    pub fn quad_count(&self) -> usize {
        self.tiles.len()
    }

    pub(crate) fn draw<T: RenderTarget + ?Sized>(&self, target: &mut T, state: &RenderState) {
        if self.vertices.is_empty() {
            return;
        }
        target.draw_quads(self.texture, &self.vertices, state);
    }
}
