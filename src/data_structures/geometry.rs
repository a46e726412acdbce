//! Parsed OBJ geometry.
//!
//! A `Geometry` is one contiguous run of triangulated, de-indexed vertex data
//! sharing the same object, group and material context. Attribute streams are
//! flat `f64` lists, so three consecutive entries of `position` form one vertex.

use std::{collections::BTreeMap, fmt};

use crate::{
    data_structures::extents::{self, Extents},
    error::ExtentsError,
};

/// The vertex attribute streams an OBJ face can feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKind {
    Position,
    TexCoord,
    Normal,
    Color,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 4] = [
        AttributeKind::Position,
        AttributeKind::TexCoord,
        AttributeKind::Normal,
        AttributeKind::Color,
    ];

    /// Number of floats per vertex in this stream.
    pub fn components(self) -> usize {
        match self {
            AttributeKind::TexCoord => 2,
            AttributeKind::Position | AttributeKind::Normal | AttributeKind::Color => 3,
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Position => "position",
            AttributeKind::TexCoord => "texcoord",
            AttributeKind::Normal => "normal",
            AttributeKind::Color => "color",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub object_name: String,
    pub group_names: Vec<String>,
    pub material_name: String,
    /// Only non-empty streams are present.
    pub attributes: BTreeMap<AttributeKind, Vec<f64>>,
}

impl Geometry {
    pub fn attribute(&self, kind: AttributeKind) -> Option<&[f64]> {
        self.attributes.get(&kind).map(Vec::as_slice)
    }

    pub fn positions(&self) -> &[f64] {
        self.attribute(AttributeKind::Position).unwrap_or(&[])
    }

    pub fn vertex_count(&self) -> usize {
        self.positions().len() / AttributeKind::Position.components()
    }

    pub fn extents(&self) -> Result<Extents, ExtentsError> {
        extents::extents_of(self.positions())
    }
}

/// Result of one OBJ parse: its geometries in file order and the `mtllib`
/// names it references.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedModel {
    pub geometries: Vec<Geometry>,
    pub material_library_names: Vec<String>,
}

impl ParsedModel {
    /// Aggregate extents over all geometries, `None` for a model without vertices.
    pub fn extents(&self) -> Option<Extents> {
        let all = self
            .geometries
            .iter()
            .filter_map(|g| g.extents().ok())
            .collect::<Vec<_>>();
        if all.is_empty() {
            None
        } else {
            Some(extents::aggregate(&all))
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.geometries.iter().map(Geometry::vertex_count).sum()
    }
}
