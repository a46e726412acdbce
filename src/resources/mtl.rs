//! Wavefront MTL reader.

use std::collections::HashMap;

use crate::{
    data_structures::material::MaterialRecord,
    error::ParseError,
    resources::lex::{self, Statement},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MtlKeyword<'a> {
    NewMaterial,
    Shininess,
    Ambient,
    Diffuse,
    Specular,
    Emissive,
    DiffuseMap,
    SpecularMap,
    BumpMap,
    OpticalDensity,
    Dissolve,
    Illumination,
    Unrecognized(&'a str),
}

impl<'a> From<&'a str> for MtlKeyword<'a> {
    fn from(keyword: &'a str) -> Self {
        match keyword {
            "newmtl" => MtlKeyword::NewMaterial,
            "Ns" => MtlKeyword::Shininess,
            "Ka" => MtlKeyword::Ambient,
            "Kd" => MtlKeyword::Diffuse,
            "Ks" => MtlKeyword::Specular,
            "Ke" => MtlKeyword::Emissive,
            "map_Kd" => MtlKeyword::DiffuseMap,
            "map_Ns" => MtlKeyword::SpecularMap,
            "map_Bump" => MtlKeyword::BumpMap,
            "Ni" => MtlKeyword::OpticalDensity,
            "d" => MtlKeyword::Dissolve,
            "illum" => MtlKeyword::Illumination,
            other => MtlKeyword::Unrecognized(other),
        }
    }
}

/// Texture arguments are kept verbatim; option flags such as `-s` or `-o`
/// are left for the consumer.
fn map_argument(stmt: &Statement<'_>) -> Result<String, ParseError> {
    stmt.text().map(str::to_string)
}

/// Parses MTL text into materials keyed by their `newmtl` name.
pub fn parse_mtl(text: &str) -> Result<HashMap<String, MaterialRecord>, ParseError> {
    let mut materials: HashMap<String, MaterialRecord> = HashMap::new();
    let mut active: Option<String> = None;

    for stmt in lex::statements(text) {
        let keyword = MtlKeyword::from(stmt.keyword);
        match keyword {
            MtlKeyword::NewMaterial => {
                let name = stmt.text()?.to_string();
                if materials.insert(name.clone(), MaterialRecord::default()).is_some() {
                    log::debug!("material `{}` redefined on line {}", name, stmt.line);
                }
                active = Some(name);
                continue;
            }
            MtlKeyword::Unrecognized(other) => {
                log::warn!("unhandled MTL keyword `{}` on line {}", other, stmt.line);
                continue;
            }
            _ => {}
        }

        let material = active
            .as_ref()
            .and_then(|name| materials.get_mut(name))
            .ok_or_else(|| ParseError::NoActiveMaterial {
                line: stmt.line,
                keyword: stmt.keyword.to_string(),
            })?;

        match keyword {
            MtlKeyword::Shininess => material.shininess = Some(stmt.floats::<1>()?[0]),
            MtlKeyword::Ambient => material.ambient = Some(stmt.floats::<3>()?),
            MtlKeyword::Diffuse => material.diffuse = Some(stmt.floats::<3>()?),
            MtlKeyword::Specular => material.specular = Some(stmt.floats::<3>()?),
            MtlKeyword::Emissive => material.emissive = Some(stmt.floats::<3>()?),
            MtlKeyword::DiffuseMap => material.diffuse_map = Some(map_argument(&stmt)?),
            MtlKeyword::SpecularMap => material.specular_map = Some(map_argument(&stmt)?),
            MtlKeyword::BumpMap => material.normal_map = Some(map_argument(&stmt)?),
            MtlKeyword::OpticalDensity => {
                material.optical_density = Some(stmt.floats::<1>()?[0])
            }
            MtlKeyword::Dissolve => material.opacity = Some(stmt.floats::<1>()?[0]),
            MtlKeyword::Illumination => {
                stmt.require(1)?;
                let model = stmt.int(stmt.parts[0])?;
                let model = i32::try_from(model).map_err(|_| ParseError::MalformedNumber {
                    line: stmt.line,
                    token: stmt.parts[0].to_string(),
                })?;
                material.illum_model = Some(model);
            }
            MtlKeyword::NewMaterial | MtlKeyword::Unrecognized(_) => {}
        }
    }

    log::debug!("parsed MTL with {} materials", materials.len());
    Ok(materials)
}
