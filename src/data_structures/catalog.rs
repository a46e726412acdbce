//! Loaded assets grouped by a caller-chosen role such as "buildings" or "roads".

use std::collections::{BTreeMap, HashMap};

use crate::data_structures::{
    extents::{self, Extents},
    geometry::ParsedModel,
    material::{Material, MaterialRecord},
};

pub const BUILDINGS: &str = "buildings";
pub const ROADS: &str = "roads";
pub const OTHERS: &str = "others";

/// Stable reference to one asset: its role and its position within that role.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetHandle {
    pub role: String,
    pub index: usize,
}

/// A parsed model together with the materials its geometries reference.
#[derive(Clone, Debug)]
pub struct Asset {
    pub model: ParsedModel,
    pub materials: HashMap<String, MaterialRecord>,
    /// `None` for a model without any vertices.
    pub extents: Option<Extents>,
}

impl Asset {
    pub fn new(model: ParsedModel, materials: HashMap<String, MaterialRecord>) -> Self {
        let extents = model.extents();
        Self {
            model,
            materials,
            extents,
        }
    }

    /// Materials for every geometry, in geometry order, with defaults filled in.
    pub fn resolved_materials(&self) -> Vec<Material> {
        self.model
            .geometries
            .iter()
            .map(|g| Material::resolve(self.materials.get(&g.material_name)))
            .collect()
    }
}

/**
 * Build once, read many. The layout generator only borrows from the catalog;
 * placements refer back to it through `AssetHandle`s.
 */
#[derive(Clone, Debug, Default)]
pub struct AssetCatalog {
    roles: BTreeMap<String, Vec<Asset>>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(
        &mut self,
        role: &str,
        model: ParsedModel,
        materials: HashMap<String, MaterialRecord>,
    ) -> AssetHandle {
        let assets = self.roles.entry(role.to_string()).or_default();
        assets.push(Asset::new(model, materials));
        AssetHandle {
            role: role.to_string(),
            index: assets.len() - 1,
        }
    }

    pub fn get(&self, handle: &AssetHandle) -> Option<&Asset> {
        self.roles.get(&handle.role)?.get(handle.index)
    }

    pub fn role(&self, role: &str) -> &[Asset] {
        self.roles.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn role_len(&self, role: &str) -> usize {
        self.role(role).len()
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roles.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn role_extents(&self, role: &str) -> Extents {
        let all = self
            .role(role)
            .iter()
            .filter_map(|a| a.extents)
            .collect::<Vec<_>>();
        extents::aggregate(&all)
    }

    /// Aggregate extents of every asset, `Extents::EMPTY` for an empty catalog.
    pub fn extents(&self) -> Extents {
        let all = self
            .roles
            .values()
            .flatten()
            .filter_map(|a| a.extents)
            .collect::<Vec<_>>();
        extents::aggregate(&all)
    }
}
