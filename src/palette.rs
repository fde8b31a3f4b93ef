use crate::texture_cache::TextureHandle;
use macroquad::prelude::*;

/// Horizontal flip flag of a gid.
pub const FLIP_H: u32 = 0x8000_0000; // bit 31
/// Vertical flip flag of a gid.
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
/// Diagonal (transpose) flip flag of a gid.
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
/// Id bits of a gid.
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits (bit 28 is free)

/// A global tile id as stored in layer data: 1-based, 0 = empty cell,
/// flip flags in the top bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u32);

impl TileId {
    /// Id with flags, as stored.
    #[inline] pub fn raw(self) -> u32 { self.0 }
    /// Id without flags.
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    /// `true` for an empty cell.
    #[inline] pub fn is_empty(self) -> bool { self.clean() == 0 }
    /// Horizontal flip set.
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    /// Vertical flip set.
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    /// Diagonal flip set.
    #[inline] pub fn flip_d(self) -> bool { (self.0 & FLIP_D) != 0 }

    /// For each quad corner (top-left, top-right, bottom-right, bottom-left),
    /// the palette corner it samples. Diagonal flip applies first, then
    /// horizontal, then vertical.
    pub fn corner_order(self) -> [usize; 4] {
        let mut o = [0, 1, 2, 3];
        if self.flip_d() {
            o = [o[0], o[3], o[2], o[1]];
        }
        if self.flip_h() {
            o = [o[1], o[0], o[3], o[2]];
        }
        if self.flip_v() {
            o = [o[3], o[2], o[1], o[0]];
        }
        o
    }
}

/// Texture region of one palette slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    /// Pixel-space corners: top-left, top-right, bottom-right, bottom-left.
    pub corners: [Vec2; 4],
    /// Slice size in pixels.
    pub size: Vec2,
    /// Position of the owning palette texture in [`PaletteIndex::textures`].
    pub texture_id: usize,
}

impl PaletteEntry {
    fn from_rect(rect: Rect, texture_id: usize) -> Self {
        Self {
            corners: [
                vec2(rect.x, rect.y),
                vec2(rect.x + rect.w, rect.y),
                vec2(rect.x + rect.w, rect.y + rect.h),
                vec2(rect.x, rect.y + rect.h),
            ],
            size: rect.size(),
            texture_id,
        }
    }

    /// Corners pulled half a pixel toward the slice interior so sampling
    /// never reaches the neighbouring slice of the atlas.
    pub fn inset_corners(&self) -> [Vec2; 4] {
        let [tl, tr, br, bl] = self.corners;
        [
            tl + vec2(0.5, 0.5),
            tr + vec2(-0.5, 0.5),
            br + vec2(-0.5, -0.5),
            bl + vec2(0.5, -0.5),
        ]
    }
}

/// Global tile id → texture region lookup for one load.
#[derive(Debug, Default)]
pub struct PaletteIndex {
    textures: Vec<TextureHandle>,
    entries: Vec<PaletteEntry>,
}

impl PaletteIndex {
    /// Index without palettes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slices a palette image row-major into `tile_w × tile_h` regions and
    /// appends them; partial tiles at the right/bottom edge are dropped.
    /// Returns the global id of the first slice.
    pub fn add_palette(&mut self, texture: TextureHandle, image_size: (u32, u32), tile_w: u32, tile_h: u32) -> u32 {
        let first_gid = self.entries.len() as u32 + 1;
        let texture_id = self.textures.len();
        self.textures.push(texture);

        let columns = image_size.0 / tile_w;
        let rows = image_size.1 / tile_h;
        self.entries.reserve((columns * rows) as usize);
        for y in 0..rows {
            for x in 0..columns {
                let rect = Rect::new(
                    (x * tile_w) as f32,
                    (y * tile_h) as f32,
                    tile_w as f32,
                    tile_h as f32,
                );
                self.entries.push(PaletteEntry::from_rect(rect, texture_id));
            }
        }
        first_gid
    }

    /// Entry of a global id; `None` for empty or out-of-range ids.
    #[inline]
    pub fn get(&self, gid: TileId) -> Option<&PaletteEntry> {
        let clean = gid.clean() as usize;
        if clean == 0 {
            return None;
        }
        self.entries.get(clean - 1)
    }

    /// Cache handle of a palette texture.
    #[inline]
    pub fn texture(&self, texture_id: usize) -> Option<TextureHandle> {
        self.textures.get(texture_id).copied()
    }

    /// Palette textures in declaration order.
    pub fn textures(&self) -> &[TextureHandle] {
        &self.textures
    }

    /// Number of slices across all palettes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no palette produced a slice.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
