// tests/map_tests.rs

use macroquad_tmx::{MapError, MapLoader};

fn parse(xml: &str) -> Result<macroquad_tmx::Map, MapError> {
    MapLoader::new().parse_str("test.tmx", xml)
}

const MISSING_HEIGHT: &str = r#"
<map width="2" tilewidth="8" tileheight="8">
  <layer name="oops"><data encoding="csv">0,0</data></layer>
</map>
"#;

#[test]
fn error_names_the_missing_map_attribute() {
    let err = parse(MISSING_HEIGHT).unwrap_err();
    assert!(matches!(
        err,
        MapError::MissingAttribute {
            element: "map",
            attribute: "height"
        }
    ));
    assert_eq!(err.to_string(), "<map> is missing the `height` attribute");
}

const NOT_A_MAP: &str = r#"<?xml version="1.0"?>
<tileset name="loose" tilewidth="8" tileheight="8"/>
"#;

#[test]
fn error_on_missing_map_node() {
    let err = parse(NOT_A_MAP).unwrap_err();
    assert!(matches!(err, MapError::MissingRoot { .. }));
}

const LAYER_WITHOUT_DATA: &str = r#"
<map width="1" height="1" tilewidth="8" tileheight="8">
  <layer name="good"><data encoding="csv">0</data></layer>
  <layer name="bad"/>
</map>
"#;

#[test]
fn one_bad_layer_fails_the_whole_map() {
    let err = parse(LAYER_WITHOUT_DATA).unwrap_err();
    match err {
        MapError::MissingElement { element, owner } => {
            assert_eq!(element, "data");
            assert_eq!(owner, "layer 'bad'");
        }
        other => panic!("expected MissingElement, got {other:?}"),
    }
}

const NO_TILESETS: &str = r#"
<map width="2" height="1" tilewidth="8" tileheight="8" nextlayerid="2">
  <editorsettings><export format="tmx"/></editorsettings>
  <layer name="blank"><data encoding="csv">0,0</data></layer>
  <objectgroup name="spawns"><object id="1" x="4" y="4"/></objectgroup>
</map>
"#;

#[test]
fn map_without_tilesets_loads_empty_layers() {
    let map = parse(NO_TILESETS).expect("map without tilesets still loads");
    assert_eq!(map.layers().len(), 1);
    assert!(map.layers()[0].is_empty());
    assert!(map.properties().is_empty());
}

const NO_TILESETS_BUT_TILES: &str = r#"
<map width="1" height="1" tilewidth="8" tileheight="8">
  <layer name="ground"><data encoding="csv">1</data></layer>
</map>
"#;

#[test]
fn tiles_without_tilesets_are_corrupt() {
    let err = parse(NO_TILESETS_BUT_TILES).unwrap_err();
    assert!(matches!(err, MapError::CorruptMapData { gid: 1, palette_len: 0, .. }));
}

const BAD_TOKEN: &str = r#"
<map width="2" height="1" tilewidth="8" tileheight="8">
  <layer name="ground"><data encoding="csv">0,x</data></layer>
</map>
"#;

#[test]
fn error_on_non_numeric_tile_data() {
    let err = parse(BAD_TOKEN).unwrap_err();
    assert!(matches!(err, MapError::InvalidTileData { ref token, .. } if token == "x"));
}
