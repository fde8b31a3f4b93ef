// src/loader/tmx_loader.rs
use crate::error::MapError;
use crate::ir_map::*;
use log::{debug, warn};
use macroquad::prelude::*;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct TmxMap {
    #[serde(rename = "@width")]
    width: Option<u32>,
    #[serde(rename = "@height")]
    height: Option<u32>,
    #[serde(rename = "@tilewidth")]
    tilewidth: Option<u32>,
    #[serde(rename = "@tileheight")]
    tileheight: Option<u32>,
    properties: Option<TmxProperties>,
    #[serde(default, rename = "tileset")]
    tilesets: Vec<TmxTileset>,
    #[serde(default, rename = "layer")]
    layers: Vec<TmxLayer>,
    #[serde(default, rename = "objectgroup")]
    object_groups: Vec<TmxOtherLayer>,
    #[serde(default, rename = "imagelayer")]
    image_layers: Vec<TmxOtherLayer>,
}

#[derive(Deserialize)]
struct TmxTileset {
    #[serde(rename = "@firstgid")]
    firstgid: Option<u32>,
    #[serde(rename = "@tilewidth")]
    tilewidth: Option<u32>,
    #[serde(rename = "@tileheight")]
    tileheight: Option<u32>,
    image: Option<TmxImage>,
}

#[derive(Deserialize)]
struct TmxImage {
    #[serde(rename = "@source")]
    source: Option<String>,
}

#[derive(Deserialize)]
struct TmxLayer {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "@visible")]
    visible: Option<String>,
    #[serde(rename = "@opacity")]
    opacity: Option<f32>,
    #[serde(rename = "@offsetx")]
    offsetx: Option<f32>,
    #[serde(rename = "@offsety")]
    offsety: Option<f32>,
    properties: Option<TmxProperties>,
    data: Option<TmxData>,
}

#[derive(Deserialize)]
struct TmxData {
    #[serde(rename = "@encoding")]
    encoding: Option<String>,
    #[serde(rename = "$text")]
    text: Option<String>,
}

#[derive(Deserialize)]
struct TmxOtherLayer {
    #[serde(rename = "@name")]
    name: Option<String>,
}

#[derive(Deserialize, Default)]
struct TmxProperties {
    #[serde(default, rename = "property")]
    items: Vec<TmxProperty>,
}

#[derive(Deserialize)]
struct TmxProperty {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@type")]
    kind: Option<String>,
    #[serde(rename = "@value")]
    value: Option<String>,
    #[serde(rename = "$text")]
    text: Option<String>,
}

const UNNAMED_LAYER: &str = "undefined";

fn property_to_ir(prop: TmxProperty) -> Result<Option<(String, PropertyValue)>, MapError> {
    let TmxProperty {
        name,
        kind,
        value,
        text,
    } = prop;
    // Multi-line string values live in the element body instead of `value`.
    let raw = value.or(text).unwrap_or_default();

    let parsed = match kind.as_deref().unwrap_or("string") {
        "bool" => raw.trim().parse().ok().map(PropertyValue::Bool),
        "int" | "object" => raw.trim().parse().ok().map(PropertyValue::I64),
        "float" => raw.trim().parse().ok().map(PropertyValue::F32),
        "string" | "file" | "color" | "class" => {
            return Ok(Some((name, PropertyValue::String(raw))));
        }
        other => {
            return Err(MapError::UnsupportedPropertyType {
                name,
                kind: other.to_owned(),
            });
        }
    };

    if parsed.is_none() {
        warn!("Dropping property '{name}': {raw:?} is not a valid {}", kind.unwrap_or_default());
    }
    Ok(parsed.map(|value| (name, value)))
}

fn properties_to_ir(props: Option<TmxProperties>) -> Result<Properties, MapError> {
    let mut out = Properties::new();
    for p in props.unwrap_or_default().items {
        if let Some((name, value)) = property_to_ir(p)? {
            out.insert(name, value);
        }
    }
    Ok(out)
}

fn required(value: Option<u32>, element: &'static str, attribute: &'static str) -> Result<u32, MapError> {
    value.ok_or(MapError::MissingAttribute { element, attribute })
}

fn dimension(value: Option<u32>, element: &'static str, attribute: &'static str) -> Result<u32, MapError> {
    match required(value, element, attribute)? {
        0 => Err(MapError::InvalidDimension { element, attribute }),
        v => Ok(v),
    }
}

/// Strips directory components, accepting both separators.
fn base_name(source: &str) -> &str {
    source.rsplit(['/', '\\']).next().unwrap_or(source)
}

/// Parses comma separated gids; whitespace and line breaks around tokens are ignored.
pub(crate) fn parse_csv(layer: &str, text: &str) -> Result<Vec<u32>, MapError> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<u32>().map_err(|_| MapError::InvalidTileData {
                layer: layer.to_owned(),
                token: token.to_owned(),
            })
        })
        .collect()
}

fn root_is_map(xml: &str) -> Result<bool, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => return Ok(e.name().as_ref() == b"map"),
            Event::Eof => return Ok(false),
            _ => {}
        }
    }
}

fn tileset_to_ir(index: usize, ts: TmxTileset) -> Result<IrTileset, MapError> {
    let tile_w = dimension(ts.tilewidth, "tileset", "tilewidth")?;
    let tile_h = dimension(ts.tileheight, "tileset", "tileheight")?;

    let image = ts.image.ok_or_else(|| MapError::MissingElement {
        element: "image",
        owner: format!("tileset #{index}"),
    })?;
    let source = image.source.ok_or(MapError::MissingAttribute {
        element: "image",
        attribute: "source",
    })?;

    Ok(IrTileset {
        first_gid: ts.firstgid,
        image: base_name(&source).to_owned(),
        tile_w,
        tile_h,
    })
}

fn layer_to_ir(l: TmxLayer) -> Result<IrLayer, MapError> {
    let name = l.name.unwrap_or_else(|| UNNAMED_LAYER.to_owned());
    // Anything that does not read as a non-zero integer hides the layer.
    let visible = l
        .visible
        .map_or(true, |v| v.trim().parse::<i64>().unwrap_or(0) != 0);

    let data = l.data.ok_or_else(|| MapError::MissingElement {
        element: "data",
        owner: format!("layer '{name}'"),
    })?;
    let encoding = data.encoding.ok_or(MapError::MissingAttribute {
        element: "data",
        attribute: "encoding",
    })?;
    if encoding != "csv" {
        return Err(MapError::UnsupportedEncoding {
            layer: name,
            encoding,
        });
    }
    let gids = parse_csv(&name, data.text.as_deref().unwrap_or_default())?;

    Ok(IrLayer {
        properties: properties_to_ir(l.properties)?,
        visible,
        opacity: l.opacity.unwrap_or(1.0),
        offset: vec2(l.offsetx.unwrap_or(0.0), l.offsety.unwrap_or(0.0)),
        kind: IrLayerKind::Tiles { data: gids },
        name,
    })
}

/// Decodes a TMX document into the IR, validating every structural
/// requirement before any resource is touched.
pub(crate) fn decode_map_str(path: &Path, xml: &str) -> Result<IrMap, MapError> {
    let is_map = root_is_map(xml).map_err(|source| MapError::Xml {
        path: path.to_path_buf(),
        source,
    })?;
    if !is_map {
        return Err(MapError::MissingRoot {
            path: path.to_path_buf(),
        });
    }

    let m: TmxMap = quick_xml::de::from_str(xml).map_err(|source| MapError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let width = dimension(m.width, "map", "width")?;
    let height = dimension(m.height, "map", "height")?;
    let tile_w = dimension(m.tilewidth, "map", "tilewidth")?;
    let tile_h = dimension(m.tileheight, "map", "tileheight")?;
    let properties = properties_to_ir(m.properties)?;

    if m.tilesets.is_empty() {
        warn!("No tilesets found in {}", path.display());
    }
    let tilesets = m
        .tilesets
        .into_iter()
        .enumerate()
        .map(|(i, ts)| tileset_to_ir(i, ts))
        .collect::<Result<Vec<_>, _>>()?;

    let layers = m
        .layers
        .into_iter()
        .map(layer_to_ir)
        .collect::<Result<Vec<_>, _>>()?;

    for other in m.object_groups.iter().chain(&m.image_layers) {
        debug!(
            "Ignoring non-tile layer '{}'",
            other.name.as_deref().unwrap_or(UNNAMED_LAYER)
        );
    }

    Ok(IrMap {
        width,
        height,
        tile_w,
        tile_h,
        properties,
        tilesets,
        layers,
    })
}
