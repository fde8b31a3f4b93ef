use crate::batch::{TileRef, TileVertex};
use crate::error::MapError;
use crate::ir_map::{IrLayer, IrLayerKind, IrMap};
use crate::layer::{Layer, LayerKind};
use crate::loader::tmx_loader::decode_map_str;
use crate::map::Map;
use crate::palette::{PaletteIndex, TileId};
use crate::render::{RenderState, Screen};
use crate::texture_cache::TextureCache;
use log::{error, info, warn};
use macroquad::prelude::*;
use std::path::Path;

/// Loads TMX maps and owns the palette images they reference.
///
/// The texture cache and search paths live as long as the loader, so maps
/// loaded by the same loader share images. A [`Map`] must be drawn with the
/// loader (or cache) that produced it.
#[derive(Default)]
pub struct MapLoader {
    base_path: String,
    search_paths: Vec<String>,
    textures: TextureCache,
}

impl MapLoader {
    /// Loader that opens map files as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader that prepends `base_path` to every map file it opens.
    pub fn with_base_path(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    /// Appends a prefix tried, in insertion order, when resolving palette
    /// image names. The prefix is used verbatim, so directories need their
    /// trailing separator.
    pub fn add_search_path(&mut self, path: impl Into<String>) {
        self.search_paths.push(path.into());
    }

    /// Image search prefixes in lookup order.
    pub fn search_paths(&self) -> &[String] {
        &self.search_paths
    }

    /// Images loaded so far.
    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    /// Loads `base_path + file`. Any structural problem aborts the whole
    /// load; missing palette images are replaced by a placeholder.
    pub fn parse_file(&mut self, file: &str) -> Result<Map, MapError> {
        let level_path = format!("{}{}", self.base_path, file);
        let result = std::fs::read_to_string(&level_path)
            .map_err(|source| MapError::Io {
                path: level_path.clone().into(),
                source,
            })
            .and_then(|xml| self.load(Path::new(&level_path), &xml));

        if let Err(err) = &result {
            error!("Map {level_path} not loaded: {err}");
        }
        result
    }

    /// Loads a document already in memory; `name` is only used in diagnostics.
    pub fn parse_str(&mut self, name: &str, xml: &str) -> Result<Map, MapError> {
        let result = self.load(Path::new(name), xml);
        if let Err(err) = &result {
            error!("Map {name} not loaded: {err}");
        }
        result
    }

    /// Draws `map` into the current macroquad render target.
    pub fn draw(&self, map: &Map, state: &RenderState) {
        map.draw(&mut Screen::new(&self.textures), state);
    }

    fn load(&mut self, path: &Path, xml: &str) -> Result<Map, MapError> {
        let ir = decode_map_str(path, xml)?;
        let map = self.build(ir)?;
        info!(
            "Loaded map {} ({}x{}, {} layers)",
            path.display(),
            map.width(),
            map.height(),
            map.layers().len()
        );
        Ok(map)
    }

    fn build(&mut self, ir: IrMap) -> Result<Map, MapError> {
        let mut palette = PaletteIndex::new();
        for ts in &ir.tilesets {
            let handle = self.textures.get_or_load(&self.search_paths, &ts.image);
            let size = self.textures.size(handle).unwrap_or((0, 0));
            let first_gid = palette.add_palette(handle, size, ts.tile_w, ts.tile_h);
            if let Some(declared) = ts.first_gid.filter(|&g| g != first_gid) {
                warn!(
                    "Tileset {} declares firstgid {declared}, using cumulative id {first_gid}",
                    ts.image
                );
            }
        }

        let tile_size = vec2(ir.tile_w as f32, ir.tile_h as f32);
        let layers = ir
            .layers
            .into_iter()
            .map(|l| build_layer(&palette, tile_size, ir.width, l))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Map::new(
            ir.width,
            ir.height,
            ir.tile_w,
            ir.tile_h,
            ir.properties,
            layers,
        ))
    }
}

/// Walks the gids row-major over `width` columns; the declared height is
/// not consulted.
fn build_layer(palette: &PaletteIndex, tile_size: Vec2, width: u32, ir: IrLayer) -> Result<Layer, MapError> {
    let mut layer = Layer::new(ir.name, LayerKind::Tile)
        .with_display(ir.visible, ir.opacity, ir.offset)
        .with_properties(ir.properties);

    let IrLayerKind::Tiles { data } = ir.kind;
    let (mut x, mut y) = (0u32, 0u32);
    for raw in data {
        let gid = TileId(raw);
        if !gid.is_empty() {
            place_tile(&mut layer, palette, tile_size, x, y, gid)?;
        }
        x += 1;
        if x == width {
            x = 0;
            y += 1;
        }
    }
    Ok(layer)
}

/// Appends the quad of `gid` at grid cell (`x`, `y`) to the layer batch of
/// its palette texture.
///
/// The quad is sized by the palette slice, not by the map tile size.
pub(crate) fn place_tile(
    layer: &mut Layer,
    palette: &PaletteIndex,
    tile_size: Vec2,
    x: u32,
    y: u32,
    gid: TileId,
) -> Result<TileRef, MapError> {
    let corrupt = || MapError::CorruptMapData {
        layer: layer.name().to_owned(),
        gid: gid.clean(),
        palette_len: palette.len(),
    };
    let entry = palette.get(gid).ok_or_else(corrupt)?;
    let texture = palette.texture(entry.texture_id).ok_or_else(corrupt)?;

    let uv = entry.inset_corners();
    let order = gid.corner_order();
    let origin = vec2(x as f32, y as f32) * tile_size;
    let positions = [
        origin,
        origin + vec2(entry.size.x, 0.0),
        origin + entry.size,
        origin + vec2(0.0, entry.size.y),
    ];
    let quad: [TileVertex; 4] = std::array::from_fn(|i| TileVertex {
        position: positions[i],
        tex_coords: uv[order[i]],
    });

    Ok(layer.batch_mut(entry.texture_id, texture).add_tile(quad))
}
