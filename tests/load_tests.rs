// tests/load_tests.rs

use macroquad::prelude::*;
use macroquad_tmx::{MapError, MapLoader, PLACEHOLDER_KEY};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("mq_tmx_{tag}_{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn prefix(dir: &Path) -> String {
    format!("{}/", dir.display())
}

fn write_png(dir: &Path, name: &str, w: u16, h: u16) {
    let path = dir.join(name);
    Image::gen_image_color(w, h, WHITE).export_png(path.to_str().expect("path utf8"));
}

fn loader_for(dir: &Path) -> MapLoader {
    let mut loader = MapLoader::with_base_path(prefix(dir));
    loader.add_search_path(prefix(dir));
    loader
}

fn map_xml(tilesets: &str, layers: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="orthogonal" renderorder="right-down" width="2" height="2" tilewidth="16" tileheight="16">
{tilesets}
{layers}
</map>"#
    )
}

const TILES_32: &str = r#"<tileset firstgid="1" name="tiles" tilewidth="16" tileheight="16">
  <image source="tiles.png" width="32" height="32"/>
</tileset>"#;

#[test]
fn minimal_map_batches_both_tiles_into_one_batch() -> anyhow::Result<()> {
    let dir = temp_dir("minimal");
    write_png(&dir, "tiles.png", 32, 32);
    fs::write(
        dir.join("map.tmx"),
        map_xml(TILES_32, r#"<layer name="ground"><data encoding="csv">1,0,0,2</data></layer>"#),
    )?;

    let mut loader = loader_for(&dir);
    let map = loader.parse_file("map.tmx")?;

    assert_eq!((map.width(), map.height()), (2, 2));
    assert_eq!((map.tile_width(), map.tile_height()), (16, 16));
    assert_eq!(map.layers().len(), 1);

    let layer = &map.layers()[0];
    assert_eq!(layer.name(), "ground");
    assert_eq!(layer.batch_count(), 1);

    let batch = layer.batch(0).expect("batch for the only tileset");
    assert_eq!(batch.quad_count(), 2);
    let v = batch.vertices();
    assert_eq!(v[0].position, vec2(0.0, 0.0));
    assert_eq!(v[0].tex_coords, vec2(0.5, 0.5));
    assert_eq!(v[4].position, vec2(16.0, 16.0));
    assert_eq!(v[4].tex_coords, vec2(16.5, 0.5));
    assert_eq!(v[6].position, vec2(32.0, 32.0));
    Ok(())
}

#[test]
fn all_zero_layer_has_no_batches() -> anyhow::Result<()> {
    let dir = temp_dir("empty");
    write_png(&dir, "tiles.png", 32, 32);
    fs::write(
        dir.join("map.tmx"),
        map_xml(TILES_32, r#"<layer name="empty"><data encoding="csv">0,0,0,0</data></layer>"#),
    )?;

    let map = loader_for(&dir).parse_file("map.tmx")?;
    let layer = map.layer("empty").expect("layer");
    assert!(layer.is_empty());
    assert_eq!(layer.vertex_count(), 0);
    Ok(())
}

#[test]
fn second_tileset_continues_global_ids() -> anyhow::Result<()> {
    let dir = temp_dir("two_sets");
    write_png(&dir, "tiles.png", 32, 32);
    write_png(&dir, "props.png", 16, 16);
    let tilesets = format!(
        r#"{TILES_32}
<tileset firstgid="5" name="props" tilewidth="16" tileheight="16">
  <image source="props.png" width="16" height="16"/>
</tileset>"#
    );
    fs::write(
        dir.join("map.tmx"),
        map_xml(&tilesets, r#"<layer name="mixed"><data encoding="csv">4,5,0,0</data></layer>"#),
    )?;

    let mut loader = loader_for(&dir);
    let map = loader.parse_file("map.tmx")?;
    let layer = &map.layers()[0];
    assert_eq!(layer.batch_count(), 2);

    let props = layer.batch(1).expect("batch of the second tileset");
    assert_eq!(props.quad_count(), 1);
    assert_eq!(props.vertices()[0].tex_coords, vec2(0.5, 0.5));
    assert_eq!(props.vertices()[0].position, vec2(16.0, 0.0));

    let tiles = layer.batch(0).expect("batch of the first tileset");
    assert_eq!(tiles.vertices()[0].tex_coords, vec2(16.5, 16.5));

    assert_ne!(tiles.texture(), props.texture());
    assert_eq!(
        loader.textures().key(props.texture()),
        Some(format!("{}props.png", prefix(&dir)).as_str())
    );
    Ok(())
}

#[test]
fn missing_image_loads_with_placeholder() -> anyhow::Result<()> {
    let dir = temp_dir("placeholder");
    fs::write(
        dir.join("map.tmx"),
        map_xml(
            r#"<tileset tilewidth="16" tileheight="16"><image source="gone.png"/></tileset>"#,
            r#"<layer name="ground"><data encoding="csv">16,0,0,0</data></layer>"#,
        ),
    )?;

    let mut loader = loader_for(&dir);
    let map = loader.parse_file("map.tmx")?;

    let placeholder = loader.textures().lookup(PLACEHOLDER_KEY).expect("placeholder cached");
    assert_eq!(loader.textures().size(placeholder), Some((64, 64)));

    // 64×64 placeholder holds 16 slices, so gid 16 is the last one.
    let batch = map.layers()[0].batch(0).expect("batch");
    assert_eq!(batch.texture(), placeholder);
    assert_eq!(batch.vertices()[0].tex_coords, vec2(48.5, 48.5));
    Ok(())
}

#[test]
fn image_is_decoded_once_per_loader() -> anyhow::Result<()> {
    let dir = temp_dir("shared");
    write_png(&dir, "tiles.png", 32, 32);
    let layer = r#"<layer name="ground"><data encoding="csv">1,1,1,1</data></layer>"#;
    fs::write(dir.join("a.tmx"), map_xml(TILES_32, layer))?;
    fs::write(dir.join("b.tmx"), map_xml(TILES_32, layer))?;

    let mut loader = loader_for(&dir);
    let a = loader.parse_file("a.tmx")?;
    let b = loader.parse_file("b.tmx")?;

    assert_eq!(loader.textures().len(), 1);
    let ta = a.layers()[0].batch(0).expect("batch").texture();
    let tb = b.layers()[0].batch(0).expect("batch").texture();
    assert_eq!(ta, tb);
    Ok(())
}

#[test]
fn image_directories_are_stripped_before_searching() -> anyhow::Result<()> {
    let maps = temp_dir("maps");
    let art = temp_dir("art");
    write_png(&art, "tiles.png", 32, 32);
    let tileset = r#"<tileset tilewidth="16" tileheight="16"><image source="../../some/where/tiles.png"/></tileset>"#;
    fs::write(
        maps.join("map.tmx"),
        map_xml(tileset, r#"<layer><data encoding="csv">1</data></layer>"#),
    )?;

    let mut loader = MapLoader::with_base_path(prefix(&maps));
    loader.add_search_path(prefix(&maps));
    loader.add_search_path(prefix(&art));
    let map = loader.parse_file("map.tmx")?;

    let tex = map.layers()[0].batch(0).expect("batch").texture();
    assert_eq!(
        loader.textures().key(tex),
        Some(format!("{}tiles.png", prefix(&art)).as_str())
    );
    assert_eq!(map.layers()[0].name(), "undefined");
    Ok(())
}

#[test]
fn properties_and_layer_flags_survive_loading() -> anyhow::Result<()> {
    let dir = temp_dir("props");
    write_png(&dir, "tiles.png", 32, 32);
    let xml = format!(
        r#"<map width="2" height="1" tilewidth="16" tileheight="16">
  <properties>
    <property name="music" value="forest.ogg"/>
    <property name="difficulty" type="int" value="3"/>
  </properties>
  {TILES_32}
  <layer name="hidden" visible="0" opacity="0.25">
    <properties><property name="solid" type="bool" value="true"/></properties>
    <data encoding="csv">1,2</data>
  </layer>
</map>"#
    );
    fs::write(dir.join("map.tmx"), xml)?;

    let map = loader_for(&dir).parse_file("map.tmx")?;
    assert_eq!(map.properties().get_string("music"), Some("forest.ogg"));
    assert_eq!(map.properties().get_i32("difficulty"), Some(3));

    let layer = map.layer("hidden").expect("layer");
    assert!(!layer.visible());
    assert_eq!(layer.opacity(), 0.25);
    assert_eq!(layer.properties().get_bool("solid"), Some(true));
    // Hidden layers are still batched.
    assert_eq!(layer.quad_count(), 2);
    Ok(())
}

#[test]
fn unsupported_encoding_fails_the_whole_map() -> anyhow::Result<()> {
    let dir = temp_dir("base64");
    write_png(&dir, "tiles.png", 32, 32);
    let layers = r#"<layer name="ok"><data encoding="csv">1,0,0,0</data></layer>
<layer name="packed"><data encoding="base64">AQAAAAAAAAAAAAAAAAAAAA==</data></layer>"#;
    fs::write(dir.join("map.tmx"), map_xml(TILES_32, layers))?;

    let err = loader_for(&dir).parse_file("map.tmx").unwrap_err();
    match err {
        MapError::UnsupportedEncoding { layer, encoding } => {
            assert_eq!(layer, "packed");
            assert_eq!(encoding, "base64");
        }
        other => panic!("expected UnsupportedEncoding, got {other:?}"),
    }
    Ok(())
}

#[test]
fn out_of_range_gid_is_reported_as_corrupt() -> anyhow::Result<()> {
    let dir = temp_dir("corrupt");
    write_png(&dir, "tiles.png", 32, 32);
    fs::write(
        dir.join("map.tmx"),
        map_xml(TILES_32, r#"<layer name="ground"><data encoding="csv">0,9,0,0</data></layer>"#),
    )?;

    let err = loader_for(&dir).parse_file("map.tmx").unwrap_err();
    assert!(matches!(err, MapError::CorruptMapData { gid: 9, palette_len: 4, .. }));
    Ok(())
}

#[test]
fn missing_file_is_io_error() {
    let dir = temp_dir("missing");
    let err = loader_for(&dir).parse_file("nope.tmx").unwrap_err();
    match err {
        MapError::Io { path, .. } => assert!(path.ends_with("nope.tmx")),
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn malformed_xml_is_rejected() {
    let err = MapLoader::new()
        .parse_str("broken.tmx", r#"<map width="1"><layer></map>"#)
        .unwrap_err();
    assert!(matches!(err, MapError::Xml { .. } | MapError::Decode { .. }));
}
