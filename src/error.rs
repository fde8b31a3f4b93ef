use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors produced while loading a TMX map.
///
/// Every variant aborts the load; a missing palette image is not an error
/// (it is replaced by a placeholder texture).
#[derive(Debug, Error)]
pub enum MapError {
    /// The map file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The document is not well-formed XML.
    #[error("malformed XML in {path}: {source}")]
    Xml {
        /// Path of the document.
        path: PathBuf,
        /// Underlying reader error.
        #[source]
        source: quick_xml::Error,
    },

    /// The document is XML but does not decode into the TMX layout.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// Path of the document.
        path: PathBuf,
        /// Underlying deserializer error.
        #[source]
        source: quick_xml::DeError,
    },

    /// The root element is not `<map>`.
    #[error("map node not found in {path}")]
    MissingRoot {
        /// Path of the document.
        path: PathBuf,
    },

    /// A mandatory attribute is absent.
    #[error("<{element}> is missing the `{attribute}` attribute")]
    MissingAttribute {
        /// Element the attribute belongs to.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },

    /// A mandatory child element is absent.
    #[error("{owner} is missing its <{element}> node")]
    MissingElement {
        /// Name of the missing element.
        element: &'static str,
        /// Human readable description of the parent.
        owner: String,
    },

    /// A size attribute is zero.
    #[error("<{element}> has a zero `{attribute}`")]
    InvalidDimension {
        /// Element the attribute belongs to.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },

    /// Tile data uses an encoding other than `csv`.
    #[error("layer '{layer}' uses unsupported encoding {encoding}")]
    UnsupportedEncoding {
        /// Layer name.
        layer: String,
        /// Encoding named by the document.
        encoding: String,
    },

    /// A CSV token is not a non-negative integer.
    #[error("layer '{layer}' has invalid tile data token {token:?}")]
    InvalidTileData {
        /// Layer name.
        layer: String,
        /// Offending token.
        token: String,
    },

    /// A global tile id points past the end of the palette.
    #[error("corrupt map data: layer '{layer}' references gid {gid} but only {palette_len} tiles are defined")]
    CorruptMapData {
        /// Layer name.
        layer: String,
        /// Global id without flip flags.
        gid: u32,
        /// Number of palette entries of the load.
        palette_len: usize,
    },

    /// A property declares a `type` this loader does not know.
    #[error("property '{name}' has unsupported type {kind}")]
    UnsupportedPropertyType {
        /// Property name.
        name: String,
        /// Declared type.
        kind: String,
    },
}
