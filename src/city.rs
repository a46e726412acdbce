//! Top-level flow: load the asset catalog, generate a layout, frame it.

use std::path::PathBuf;

use anyhow::Context;

use crate::{
    data_structures::{
        catalog::{AssetCatalog, BUILDINGS, OTHERS, ROADS},
        extents::BoundingSphere,
    },
    layout::{self, LayoutConfig, RoadKind, WorldLayout},
    resources,
};

/// Which OBJ files make up a city, relative to `assets_root`.
#[derive(Clone, Debug, PartialEq)]
pub struct CityManifest {
    pub assets_root: PathBuf,
    pub buildings: Vec<String>,
    /// Indexed by `RoadKind::index`.
    pub roads: [String; 4],
    pub others: Vec<String>,
}

impl Default for CityManifest {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            assets_root: PathBuf::from("assets"),
            buildings: names(&[
                "base.obj",
                "building_A.obj",
                "building_B.obj",
                "building_C.obj",
                "building_D.obj",
                "building_E.obj",
                "building_F.obj",
                "building_G.obj",
                "building_H.obj",
            ]),
            roads: [
                "road_tsplit.obj".to_string(),
                "road_junction.obj".to_string(),
                "road_corner.obj".to_string(),
                "road_straight.obj".to_string(),
            ],
            others: names(&["bush.obj", "trafficlight_A.obj", "bench.obj"]),
        }
    }
}

impl CityManifest {
    pub fn road_path(&self, kind: RoadKind) -> PathBuf {
        self.assets_root.join(&self.roads[kind.index()])
    }

    fn paths(&self, names: &[String]) -> Vec<PathBuf> {
        names.iter().map(|n| self.assets_root.join(n)).collect()
    }

    /// Loads every role concurrently. Any failing file fails the whole catalog.
    pub async fn load_catalog(&self) -> anyhow::Result<AssetCatalog> {
        let buildings = self.paths(&self.buildings);
        let roads = RoadKind::ALL
            .iter()
            .map(|kind| self.road_path(*kind))
            .collect::<Vec<_>>();
        let others = self.paths(&self.others);

        let (buildings, roads, others) = futures::try_join!(
            resources::load_models(&buildings),
            resources::load_models(&roads),
            resources::load_models(&others),
        )?;

        let mut catalog = AssetCatalog::new();
        for (role, models) in [
            (BUILDINGS, buildings),
            (ROADS, roads),
            (OTHERS, others),
        ] {
            for (model, materials) in models {
                catalog.load(role, model, materials);
            }
        }
        log::info!("asset catalog ready with {} assets", catalog.len());
        Ok(catalog)
    }
}

pub struct City {
    pub catalog: AssetCatalog,
    pub layout: WorldLayout,
    /// Sphere around the aggregate extents of all catalog assets, for camera near/far planes.
    pub asset_bounds: Option<BoundingSphere>,
}

impl City {
    pub async fn load(manifest: &CityManifest, config: &LayoutConfig) -> anyhow::Result<Self> {
        let catalog = manifest.load_catalog().await?;
        Self::from_catalog(catalog, config)
    }

    pub fn from_catalog(catalog: AssetCatalog, config: &LayoutConfig) -> anyhow::Result<Self> {
        let layout = layout::generate(config, &catalog).context("failed to generate layout")?;
        let extents = catalog.extents();
        let asset_bounds = (!extents.is_empty()).then(|| extents.bounding_sphere());
        Ok(Self {
            catalog,
            layout,
            asset_bounds,
        })
    }

    /// Generates a fresh layout from the already loaded catalog, e.g. after a
    /// change of world length or road probability.
    pub fn regenerate(&mut self, config: &LayoutConfig) -> anyhow::Result<()> {
        self.layout = layout::generate(config, &self.catalog).context("failed to generate layout")?;
        Ok(())
    }
}

/// Initializes logging and builds a city on a fresh tokio runtime.
pub fn run(manifest: &CityManifest, config: &LayoutConfig) -> anyhow::Result<City> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(City::load(manifest, config))
}
