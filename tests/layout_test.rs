use std::collections::HashSet;

use city_ngin::{
    LayoutConfig, LayoutError, generate, generate_with_rng,
    data_structures::catalog::{AssetCatalog, BUILDINGS, ROADS},
    layout::{AssetVariant, QuarterTurns, RoadKind, RoadLine},
};
use rand::SeedableRng;

mod common;
use common::test_utils::stub_catalog;

fn config(world_length: usize, road_probability: f64, seed: u64) -> LayoutConfig {
    LayoutConfig {
        world_length,
        road_probability,
        seed,
        ..Default::default()
    }
}

#[test]
fn should_cover_every_cell_once_in_row_major_order() {
    let catalog = stub_catalog(3);
    for n in [1, 2, 5, 9, 16] {
        let layout = generate(&config(n, 0.7, 11), &catalog).unwrap();
        assert_eq!(layout.placements.len(), n * n);
        let cells = layout
            .placements
            .iter()
            .map(|p| (p.row, p.col))
            .collect::<HashSet<_>>();
        assert_eq!(cells.len(), n * n);
        for (idx, placement) in layout.placements.iter().enumerate() {
            assert_eq!((placement.row, placement.col), (idx / n, idx % n));
        }
    }
}

#[test]
fn should_place_fixed_corners() {
    let catalog = stub_catalog(2);
    for n in 5..12 {
        for p in [0.0, 0.5, 1.0] {
            let layout = generate(&config(n, p, n as u64), &catalog).unwrap();
            let last = n - 1;
            for ((row, col), rotation) in [
                ((0, 0), QuarterTurns::DEG_0),
                ((last, 0), QuarterTurns::DEG_270),
                ((last, last), QuarterTurns::DEG_180),
                ((0, last), QuarterTurns::DEG_90),
            ] {
                let placement = layout.placement(row, col).unwrap();
                assert_eq!(placement.asset_variant, AssetVariant::Road(RoadKind::Corner));
                assert_eq!(placement.rotation, rotation);
            }
        }
    }
}

#[test]
fn should_build_plain_five_by_five_grid_without_roads() {
    let catalog = stub_catalog(4);
    let layout = generate(&config(5, 0.0, 3), &catalog).unwrap();
    assert!(layout.road_lines.is_empty());
    assert_eq!(layout.placements.len(), 25);

    for placement in &layout.placements {
        let (i, j) = (placement.row, placement.col);
        let on_i_edge = i == 0 || i == 4;
        let on_j_edge = j == 0 || j == 4;
        match (on_i_edge, on_j_edge) {
            (true, true) => {
                assert_eq!(placement.asset_variant, AssetVariant::Road(RoadKind::Corner))
            }
            (false, true) => {
                assert_eq!(placement.asset_variant, AssetVariant::Road(RoadKind::Straight));
                assert_eq!(placement.rotation, QuarterTurns::DEG_90);
            }
            (true, false) => {
                assert_eq!(placement.asset_variant, AssetVariant::Road(RoadKind::Straight));
                assert_eq!(placement.rotation, QuarterTurns::DEG_0);
            }
            (false, false) => {
                assert!(matches!(placement.asset_variant, AssetVariant::Building(idx) if idx < 4));
                assert_eq!(placement.asset.role, BUILDINGS);
            }
        }
    }

    // The ring of buildings faces the border, the center has no road neighbour.
    assert_eq!(layout.placement(1, 1).unwrap().rotation, QuarterTurns::DEG_270);
    assert_eq!(layout.placement(2, 3).unwrap().rotation, QuarterTurns::DEG_0);
    assert_eq!(layout.placement(2, 1).unwrap().rotation, QuarterTurns::DEG_180);
    assert_eq!(layout.placement(3, 2).unwrap().rotation, QuarterTurns::DEG_90);
    assert_eq!(layout.placement(2, 2).unwrap().rotation, QuarterTurns::DEG_0);
}

#[test]
fn should_keep_road_lines_apart_and_off_the_border() {
    let catalog = stub_catalog(1);
    for seed in 0..40 {
        for n in [5, 8, 12, 30] {
            let layout = generate(&config(n, 0.9, seed), &catalog).unwrap();
            for line in layout.road_lines.iter() {
                let (pos, next) = match line {
                    RoadLine::Row(p) => (p, RoadLine::Row(p + 1)),
                    RoadLine::Col(p) => (p, RoadLine::Col(p + 1)),
                };
                assert!(pos != 0 && pos != n - 1);
                assert!(!layout.road_lines.contains(next));
            }
        }
    }
}

#[test]
fn should_reproduce_layout_for_same_seed() {
    let catalog = stub_catalog(9);
    let cfg = config(14, 0.7, 42);
    assert_eq!(generate(&cfg, &catalog).unwrap(), generate(&cfg, &catalog).unwrap());

    let mut first = rand_pcg::Pcg64::seed_from_u64(7);
    let mut second = rand_pcg::Pcg64::seed_from_u64(7);
    assert_eq!(
        generate_with_rng(&cfg, &catalog, &mut first).unwrap(),
        generate_with_rng(&cfg, &catalog, &mut second).unwrap()
    );

    let mut injected = rand_pcg::Pcg64::seed_from_u64(42);
    assert_eq!(
        generate_with_rng(&cfg, &catalog, &mut injected).unwrap(),
        generate(&cfg, &catalog).unwrap()
    );
}

#[test]
fn should_classify_road_cells_from_selected_lines() {
    let catalog = stub_catalog(2);
    for seed in 0..30 {
        let n = 15;
        let layout = generate(&config(n, 1.0, seed), &catalog).unwrap();
        let roads = &layout.road_lines;
        for placement in &layout.placements {
            let (i, j) = (placement.row, placement.col);
            let edge = |x: usize| x == 0 || x == n - 1;
            let variant = placement.asset_variant;
            if edge(i) && edge(j) {
                assert_eq!(variant, AssetVariant::Road(RoadKind::Corner));
            } else if (edge(i) && roads.has_col(j)) || (edge(j) && roads.has_row(i)) {
                assert_eq!(variant, AssetVariant::Road(RoadKind::TJunction));
            } else if roads.has_row(i) && roads.has_col(j) {
                assert_eq!(variant, AssetVariant::Road(RoadKind::Crossing));
                assert!(
                    placement.rotation == QuarterTurns::DEG_0
                        || placement.rotation == QuarterTurns::DEG_90
                );
            } else if roads.has_row(i) || roads.has_col(j) {
                assert_eq!(variant, AssetVariant::Road(RoadKind::Straight));
                let expected = if roads.has_col(j) {
                    QuarterTurns::DEG_90
                } else {
                    QuarterTurns::DEG_0
                };
                assert_eq!(placement.rotation, expected);
            } else if !edge(i) && !edge(j) {
                assert!(!variant.is_road());
            }
        }
    }
}

#[test]
fn should_translate_cells_by_unit_length() {
    let catalog = stub_catalog(1);
    let cfg = LayoutConfig {
        unit_length: 3.5,
        ..config(6, 0.5, 1)
    };
    let layout = generate(&cfg, &catalog).unwrap();
    for placement in &layout.placements {
        assert_eq!(
            placement.translation,
            [placement.row as f64 * 3.5, 0.0, placement.col as f64 * 3.5]
        );
    }
    assert_eq!(layout.center(), [10.5, 0.0, 10.5]);
}

#[test]
fn should_point_handles_at_catalog_assets() {
    let catalog = stub_catalog(3);
    let layout = generate(&config(10, 0.8, 5), &catalog).unwrap();
    for placement in &layout.placements {
        assert!(catalog.get(&placement.asset).is_some());
        if let AssetVariant::Road(kind) = placement.asset_variant {
            assert_eq!(placement.asset.role, ROADS);
            assert_eq!(placement.asset.index, kind.index());
        }
    }
}

#[test]
fn should_group_instances_per_asset() {
    let catalog = stub_catalog(3);
    let layout = generate(&config(8, 0.6, 9), &catalog).unwrap();
    let groups = layout.instances_by_asset();
    assert_eq!(groups.values().map(Vec::len).sum::<usize>(), 64);

    let corner = layout.placement(7, 7).unwrap();
    let instance = corner.to_instance();
    assert_eq!(instance.position, cgmath::Vector3::new(14.0, 0.0, 14.0));
    let raw = instance.to_raw();
    // 180° about +Y flips x and z
    assert!((raw.model[0][0] + 1.0).abs() < 1e-5);
    assert!((raw.model[2][2] + 1.0).abs() < 1e-5);
    assert_eq!(raw.model[3], [14.0, 0.0, 14.0, 1.0]);
}

#[test]
fn should_reject_invalid_configs() {
    let catalog = stub_catalog(1);
    for cfg in [
        config(0, 0.5, 0),
        config(5, 1.5, 0),
        config(5, -0.1, 0),
        config(5, f64::NAN, 0),
        LayoutConfig {
            unit_length: 0.0,
            ..Default::default()
        },
    ] {
        assert!(matches!(
            generate(&cfg, &catalog),
            Err(LayoutError::InvalidConfig { .. })
        ));
    }
}

#[test]
fn should_require_roads_and_buildings() {
    let err = generate(&LayoutConfig::default(), &AssetCatalog::new()).unwrap_err();
    assert_eq!(
        err,
        LayoutError::MissingAsset {
            role: ROADS.to_string(),
            needed: 4,
            found: 0
        }
    );

    let err = generate(&LayoutConfig::default(), &stub_catalog(0)).unwrap_err();
    assert_eq!(
        err,
        LayoutError::MissingAsset {
            role: BUILDINGS.to_string(),
            needed: 1,
            found: 0
        }
    );
}
