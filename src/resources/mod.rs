use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use futures::future::try_join_all;

use crate::data_structures::{
    catalog::{AssetCatalog, AssetHandle},
    geometry::ParsedModel,
    material::MaterialRecord,
};

/**
 * This module contains all logic for turning OBJ/MTL files on disk into catalog assets.
 */
pub(crate) mod lex;
pub mod mtl;
pub mod obj;

pub use mtl::parse_mtl;
pub use obj::parse_obj;

/// A parsed OBJ file plus the merged contents of all its material libraries.
pub type LoadedModel = (ParsedModel, HashMap<String, MaterialRecord>);

/// Resolves a material library or texture reference against the directory of the OBJ file that names it.
pub fn resolve_resource(obj_path: &Path, reference: &str) -> PathBuf {
    let reference = Path::new(reference.trim());
    if reference.is_absolute() {
        return reference.to_path_buf();
    }
    match obj_path.parent() {
        Some(dir) => dir.join(reference),
        None => reference.to_path_buf(),
    }
}

pub async fn load_string(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

pub async fn load_model_obj(path: &Path) -> anyhow::Result<LoadedModel> {
    let obj_text = load_string(path).await?;
    let model = parse_obj(&obj_text).with_context(|| format!("failed to parse {}", path.display()))?;

    let library_paths = model
        .material_library_names
        .iter()
        .map(|name| resolve_resource(path, name))
        .collect::<Vec<_>>();
    let library_texts = try_join_all(library_paths.iter().map(|p| load_string(p))).await?;
    // Later libraries override materials of the same name.
    let mut materials = parse_mtl(&library_texts.join("\n"))
        .with_context(|| format!("failed to parse material libraries of {}", path.display()))?;

    for material in materials.values_mut() {
        for reference in material.texture_refs_mut() {
            if reference.starts_with('-') {
                log::debug!("texture reference `{reference}` carries options, kept verbatim");
                continue;
            }
            *reference = resolve_resource(path, reference).to_string_lossy().into_owned();
        }
    }

    let missing = model
        .geometries
        .iter()
        .filter(|g| !materials.contains_key(&g.material_name))
        .count();
    if missing > 0 {
        log::debug!(
            "{} geometries in {} use materials without a definition, defaults apply",
            missing,
            path.display()
        );
    }
    Ok((model, materials))
}

/// Loads `paths` concurrently. Either every model loads or none does.
pub async fn load_models(paths: &[PathBuf]) -> anyhow::Result<Vec<LoadedModel>> {
    try_join_all(paths.iter().map(|p| load_model_obj(p))).await
}

/// Loads `paths` into `catalog` under `role`. On failure the catalog is left untouched.
pub async fn load_role(
    catalog: &mut AssetCatalog,
    role: &str,
    paths: &[PathBuf],
) -> anyhow::Result<Vec<AssetHandle>> {
    let loaded = load_models(paths)
        .await
        .with_context(|| format!("failed to load `{role}` assets"))?;
    let handles = loaded
        .into_iter()
        .map(|(model, materials)| catalog.load(role, model, materials))
        .collect::<Vec<_>>();
    log::info!("loaded {} `{}` assets", handles.len(), role);
    Ok(handles)
}
