//! Material data as parsed from MTL files, and the resolved form a renderer consumes.

/// One `newmtl` block. Every field is optional; defaults are applied by
/// [`Material::resolve`], never by the parser.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialRecord {
    pub shininess: Option<f64>,
    pub ambient: Option<[f64; 3]>,
    pub diffuse: Option<[f64; 3]>,
    pub specular: Option<[f64; 3]>,
    pub emissive: Option<[f64; 3]>,
    pub optical_density: Option<f64>,
    pub opacity: Option<f64>,
    pub illum_model: Option<i32>,
    /// Raw `map_Kd` argument, option flags included.
    pub diffuse_map: Option<String>,
    pub specular_map: Option<String>,
    pub normal_map: Option<String>,
}

impl MaterialRecord {
    /// Texture references of this record, for path rewriting.
    pub fn texture_refs_mut(&mut self) -> impl Iterator<Item = &mut String> {
        [
            self.diffuse_map.as_mut(),
            self.specular_map.as_mut(),
            self.normal_map.as_mut(),
        ]
        .into_iter()
        .flatten()
    }
}

/// A fully populated material. Missing texture maps stay `None`; the renderer
/// is expected to bind a plain white texture in their place.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub shininess: f64,
    pub ambient: [f64; 3],
    pub diffuse: [f64; 3],
    pub specular: [f64; 3],
    pub emissive: [f64; 3],
    pub optical_density: f64,
    pub opacity: f64,
    pub illum_model: i32,
    pub diffuse_map: Option<String>,
    pub specular_map: Option<String>,
    pub normal_map: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shininess: 400.0,
            ambient: [0.0; 3],
            diffuse: [1.0; 3],
            specular: [1.0; 3],
            emissive: [0.0; 3],
            optical_density: 1.0,
            opacity: 1.0,
            illum_model: 2,
            diffuse_map: None,
            specular_map: None,
            normal_map: None,
        }
    }
}

impl Material {
    /// Overlays `record` on the default material. `None` yields the defaults.
    pub fn resolve(record: Option<&MaterialRecord>) -> Self {
        let base = Self::default();
        let Some(r) = record else {
            return base;
        };
        Self {
            shininess: r.shininess.unwrap_or(base.shininess),
            ambient: r.ambient.unwrap_or(base.ambient),
            diffuse: r.diffuse.unwrap_or(base.diffuse),
            specular: r.specular.unwrap_or(base.specular),
            emissive: r.emissive.unwrap_or(base.emissive),
            optical_density: r.optical_density.unwrap_or(base.optical_density),
            opacity: r.opacity.unwrap_or(base.opacity),
            illum_model: r.illum_model.unwrap_or(base.illum_model),
            diffuse_map: r.diffuse_map.clone(),
            specular_map: r.specular_map.clone(),
            normal_map: r.normal_map.clone(),
        }
    }
}
