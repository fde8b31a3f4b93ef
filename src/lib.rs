#![warn(missing_docs)]

//! Tiled TMX loader for Macroquad.
//!
//! A [`MapLoader`] parses a TMX document, slices its tileset images into
//! palette regions and batches every tile layer into one vertex buffer per
//! texture, so a layer draws with one mesh call per tileset.
//!
//! ```no_run
//! use macroquad_tmx::{MapLoader, RenderState};
//!
//! let mut loader = MapLoader::with_base_path("assets/");
//! loader.add_search_path("assets/tilesets/");
//! let map = loader.parse_file("level1.tmx").expect("map loads");
//! // every frame:
//! loader.draw(&map, &RenderState::default());
//! ```

mod batch;
mod error;
mod ir_map;
mod layer;
mod loader {
    pub mod tmx_loader;
}
mod map;
mod map_loader;
mod palette;
mod render;
mod texture_cache;

pub use batch::{TileBatch, TileRef, TileVertex};
pub use error::MapError;
pub use ir_map::{Properties, PropertyValue};
pub use layer::{Layer, LayerKind};
pub use map::Map;
pub use map_loader::MapLoader;
pub use palette::{PaletteEntry, PaletteIndex, TileId, FLIP_D, FLIP_H, FLIP_V, GID_MASK};
pub use render::{RenderState, RenderTarget, Screen, MAX_QUADS_PER_MESH};
pub use texture_cache::{TextureCache, TextureHandle, PLACEHOLDER_KEY, PLACEHOLDER_SIZE};
