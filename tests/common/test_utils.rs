#![allow(dead_code)]

use std::{collections::HashMap, path::PathBuf};

use city_ngin::{
    CityManifest,
    data_structures::catalog::{AssetCatalog, BUILDINGS, ROADS},
    parse_obj,
};

pub const UNIT_QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 0 1
v 0 0 1
f 1 2 3 4
";

pub fn fixture_root() -> PathBuf {
    PathBuf::from("tests/fixtures/city")
}

pub fn fixture(name: &str) -> PathBuf {
    fixture_root().join(name)
}

pub fn fixture_manifest() -> CityManifest {
    CityManifest {
        assets_root: fixture_root(),
        buildings: vec!["house.obj".to_string(), "tower.obj".to_string()],
        others: vec!["bush.obj".to_string()],
        ..Default::default()
    }
}

/// A catalog with the four road pieces and `buildings` building variants,
/// every asset a unit quad without materials.
pub fn stub_catalog(buildings: usize) -> AssetCatalog {
    let mut catalog = AssetCatalog::new();
    for _ in 0..4 {
        catalog.load(ROADS, parse_obj(UNIT_QUAD).unwrap(), HashMap::new());
    }
    for _ in 0..buildings {
        catalog.load(BUILDINGS, parse_obj(UNIT_QUAD).unwrap(), HashMap::new());
    }
    catalog
}
