use crate::batch::TileBatch;
use crate::ir_map::Properties;
use crate::render::{RenderState, RenderTarget};
use crate::texture_cache::TextureHandle;
use macroquad::prelude::*;
use std::collections::BTreeMap;

/// What a layer holds. Only tile layers are populated by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Grid of tiles, batched per texture.
    Tile,
    /// Free-standing objects.
    ObjectGroup,
    /// A single image.
    ImageLayer,
}

/// A named group of tile batches, one batch per palette texture.
#[derive(Debug)]
pub struct Layer {
    name: String,
    kind: LayerKind,
    visible: bool,
    opacity: f32,
    offset: Vec2,
    properties: Properties,
    batches: BTreeMap<usize, TileBatch>,
}

impl Layer {
    pub(crate) fn new(name: String, kind: LayerKind) -> Self {
        Self {
            name,
            kind,
            visible: true,
            opacity: 1.0,
            offset: Vec2::ZERO,
            properties: Properties::new(),
            batches: BTreeMap::new(),
        }
    }

    pub(crate) fn with_display(mut self, visible: bool, opacity: f32, offset: Vec2) -> Self {
        self.visible = visible;
        self.opacity = opacity;
        self.offset = offset;
        self
    }

    pub(crate) fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Batch of a palette texture, created on first use.
    pub(crate) fn batch_mut(&mut self, texture_id: usize, texture: TextureHandle) -> &mut TileBatch {
        self.batches
            .entry(texture_id)
            .or_insert_with(|| TileBatch::new(texture))
    }

    /// Name from the document, `"undefined"` when absent.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Hidden layers are loaded but never drawn.
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Draw-time translation in pixels.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Batches keyed by palette texture id, in ascending id order.
    pub fn batches(&self) -> impl Iterator<Item = (usize, &TileBatch)> {
        self.batches.iter().map(|(id, b)| (*id, b))
    }

    /// Batch of a palette texture, if any tile of this layer uses it.
    pub fn batch(&self, texture_id: usize) -> Option<&TileBatch> {
        self.batches.get(&texture_id)
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Tiles placed across all batches.
    pub fn quad_count(&self) -> usize {
        self.batches.values().map(TileBatch::quad_count).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.values().map(|b| b.vertices().len()).sum()
    }

    /// `true` when no tile was placed.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub(crate) fn draw<T: RenderTarget + ?Sized>(&self, target: &mut T, state: &RenderState) {
        if !self.visible {
            return;
        }
        let state = state.translated(self.offset).faded(self.opacity);
        for batch in self.batches.values() {
            batch.draw(target, &state);
        }
    }
}
