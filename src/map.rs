use crate::ir_map::Properties;
use crate::layer::Layer;
use crate::render::{RenderState, RenderTarget};

/// A loaded map: dimensions, properties and tile layers in draw order.
///
/// Texture data lives in the [`TextureCache`](crate::TextureCache) of the
/// loader that produced the map; batches only hold handles into it.
#[derive(Debug)]
pub struct Map {
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    properties: Properties,
    layers: Vec<Layer>,
}

impl Map {
    pub(crate) fn new(width: u32, height: u32, tile_width: u32, tile_height: u32, properties: Properties, layers: Vec<Layer>) -> Self {
        Self {
            width,
            height,
            tile_width,
            tile_height,
            properties,
            layers,
        }
    }

    /// Width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tile width in pixels.
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Tile height in pixels.
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Custom map properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Tile layers in document order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// First layer with the given name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    /// Draws every visible layer, first layer at the bottom.
    pub fn draw<T: RenderTarget + ?Sized>(&self, target: &mut T, state: &RenderState) {
        for layer in &self.layers {
            layer.draw(target, state);
        }
    }
}
