// src/ir_map.rs
use macroquad::prelude::*;
use std::collections::{btree_map, BTreeMap};

/// A typed custom property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// `type="bool"`
    Bool(bool),
    /// `type="int"` or `type="object"`
    I64(i64),
    /// `type="float"`
    F32(f32),
    /// Untyped, `string`, `file`, `color` or `class`.
    String(String),
}

/// Custom properties of a map or layer, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(BTreeMap<String, PropertyValue>);

impl Properties {
    /// Empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: String, value: PropertyValue) {
        self.0.insert(name, value);
    }

    /// Raw access to a value.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// Value of a `bool` property.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Value of an `int` property.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            PropertyValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Value of an `int` property that fits in an `i32`.
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get_i64(name).and_then(|v| i32::try_from(v).ok())
    }

    /// Value of a `float` property.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            PropertyValue::F32(v) => Some(*v),
            _ => None,
        }
    }

    /// Value of a string-like property.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropertyValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no property was declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Properties in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PropertyValue> {
        self.0.iter()
    }
}

/// Canonical, format-agnostic map.
pub(crate) struct IrMap {
    pub width: u32,
    pub height: u32,
    pub tile_w: u32,
    pub tile_h: u32,
    pub properties: Properties,
    pub tilesets: Vec<IrTileset>, // declaration order
    pub layers: Vec<IrLayer>,     // draw order: document order
}

/// One image atlas with a regular grid.
pub(crate) struct IrTileset {
    pub first_gid: Option<u32>,
    /// Base file name of the palette image, directories stripped.
    pub image: String,
    pub tile_w: u32,
    pub tile_h: u32,
}

pub(crate) enum IrLayerKind {
    Tiles {
        data: Vec<u32>, // raw GIDs, flip flags included
    },
}

pub(crate) struct IrLayer {
    pub name: String,
    pub visible: bool,
    pub opacity: f32,
    pub offset: Vec2,
    pub properties: Properties,
    pub kind: IrLayerKind,
}
