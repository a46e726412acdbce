//! Wavefront OBJ reader for the keyword subset the city assets use:
//! `v`, `vt`, `vn`, `f`, `g`, `o`, `usemtl`, `mtllib` and `s`.
//!
//! Faces are fan-triangulated and de-indexed into one flat attribute stream
//! per `Geometry`, so the output can be uploaded without an index buffer.

use std::collections::BTreeMap;

use crate::{
    data_structures::geometry::{AttributeKind, Geometry, ParsedModel},
    error::ParseError,
    resources::lex::{self, Statement},
};

const DEFAULT_NAME: &str = "default";
const WHITE: [f64; 3] = [1.0, 1.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ObjKeyword<'a> {
    Vertex,
    TexCoord,
    Normal,
    Face,
    SmoothingGroup,
    MaterialLibrary,
    UseMaterial,
    Group,
    Object,
    Unrecognized(&'a str),
}

impl<'a> From<&'a str> for ObjKeyword<'a> {
    fn from(keyword: &'a str) -> Self {
        match keyword {
            "v" => ObjKeyword::Vertex,
            "vt" => ObjKeyword::TexCoord,
            "vn" => ObjKeyword::Normal,
            "f" => ObjKeyword::Face,
            "s" => ObjKeyword::SmoothingGroup,
            "mtllib" => ObjKeyword::MaterialLibrary,
            "usemtl" => ObjKeyword::UseMaterial,
            "g" => ObjKeyword::Group,
            "o" => ObjKeyword::Object,
            other => ObjKeyword::Unrecognized(other),
        }
    }
}

/**
 * Declared vertex attributes. OBJ indices are 1-based, so every pool starts
 * with a sentinel at index 0 and a raw index maps directly onto the pool.
 *
 * Colors are stored per position (white when a `v` line has none), so a
 * position index always addresses its color as well.
 */
struct Pools {
    positions: Vec<[f64; 3]>,
    texcoords: Vec<[f64; 2]>,
    normals: Vec<[f64; 3]>,
    colors: Vec<[f64; 3]>,
}

impl Default for Pools {
    fn default() -> Self {
        Self {
            positions: vec![[0.0; 3]],
            texcoords: vec![[0.0; 2]],
            normals: vec![[0.0; 3]],
            colors: vec![[0.0; 3]],
        }
    }
}

impl Pools {
    fn len(&self, kind: AttributeKind) -> usize {
        match kind {
            AttributeKind::Position | AttributeKind::Color => self.positions.len(),
            AttributeKind::TexCoord => self.texcoords.len(),
            AttributeKind::Normal => self.normals.len(),
        }
    }
}

/// A face corner with every present index resolved against its pool.
#[derive(Clone, Copy)]
struct FaceVertex {
    position: usize,
    texcoord: Option<usize>,
    normal: Option<usize>,
}

/// Geometry under construction; streams grow as faces arrive.
struct GeometryBuilder {
    object_name: String,
    group_names: Vec<String>,
    material_name: String,
    position: Vec<f64>,
    texcoord: Vec<f64>,
    normal: Vec<f64>,
    color: Vec<f64>,
}

impl GeometryBuilder {
    fn build(self, with_colors: bool) -> Geometry {
        let mut attributes = BTreeMap::new();
        let streams = [
            (AttributeKind::Position, self.position),
            (AttributeKind::TexCoord, self.texcoord),
            (AttributeKind::Normal, self.normal),
            (AttributeKind::Color, self.color),
        ];
        for (kind, data) in streams {
            if data.is_empty() || (kind == AttributeKind::Color && !with_colors) {
                continue;
            }
            attributes.insert(kind, data);
        }
        Geometry {
            object_name: self.object_name,
            group_names: self.group_names,
            material_name: self.material_name,
            attributes,
        }
    }
}

/// Which geometry, if any, the next face is appended to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GeometryState {
    NoActiveGeometry,
    ActiveGeometry(usize),
}

struct ObjParser {
    pools: Pools,
    has_colors: bool,
    geometries: Vec<GeometryBuilder>,
    state: GeometryState,
    object_name: String,
    group_names: Vec<String>,
    material_name: String,
    material_library_names: Vec<String>,
}

impl ObjParser {
    fn new() -> Self {
        Self {
            pools: Pools::default(),
            has_colors: false,
            geometries: Vec::new(),
            state: GeometryState::NoActiveGeometry,
            object_name: DEFAULT_NAME.to_string(),
            group_names: vec![DEFAULT_NAME.to_string()],
            material_name: DEFAULT_NAME.to_string(),
            material_library_names: Vec::new(),
        }
    }

    fn statement(&mut self, stmt: &Statement<'_>) -> Result<(), ParseError> {
        match ObjKeyword::from(stmt.keyword) {
            ObjKeyword::Vertex => self.vertex(stmt)?,
            ObjKeyword::TexCoord => {
                let [u, v] = stmt.floats::<2>()?;
                self.pools.texcoords.push([u, v]);
            }
            ObjKeyword::Normal => {
                let normal = stmt.floats::<3>()?;
                self.pools.normals.push(normal);
            }
            ObjKeyword::Face => self.face(stmt)?,
            ObjKeyword::SmoothingGroup => {}
            ObjKeyword::MaterialLibrary => {
                // A single file name may contain spaces, so take the raw remainder.
                let name = stmt.text()?;
                self.material_library_names.push(name.to_string());
            }
            ObjKeyword::UseMaterial => {
                self.material_name = stmt.unparsed.to_string();
                self.break_geometry();
            }
            ObjKeyword::Group => {
                self.group_names = stmt.parts.iter().map(|g| g.to_string()).collect();
                self.break_geometry();
            }
            ObjKeyword::Object => {
                self.object_name = stmt.unparsed.to_string();
                self.break_geometry();
            }
            ObjKeyword::Unrecognized(keyword) => {
                log::warn!("unhandled OBJ keyword `{}` on line {}", keyword, stmt.line);
            }
        }
        Ok(())
    }

    fn vertex(&mut self, stmt: &Statement<'_>) -> Result<(), ParseError> {
        let position = stmt.floats::<3>()?;
        let extra = stmt.parts[3..]
            .iter()
            .map(|token| stmt.float(token))
            .collect::<Result<Vec<_>, _>>()?;
        let color = if extra.len() >= 3 {
            self.has_colors = true;
            [extra[0], extra[1], extra[2]]
        } else {
            // One or two extra values are a homogeneous weight, not a color.
            WHITE
        };
        self.pools.positions.push(position);
        self.pools.colors.push(color);
        Ok(())
    }

    fn face(&mut self, stmt: &Statement<'_>) -> Result<(), ParseError> {
        if stmt.parts.len() < 3 {
            return Err(ParseError::UnterminatedFace {
                line: stmt.line,
                found: stmt.parts.len(),
            });
        }
        let corners = stmt
            .parts
            .iter()
            .map(|token| self.resolve_face_vertex(stmt, token))
            .collect::<Result<Vec<_>, _>>()?;

        let idx = self.set_geometry();
        for tri in 0..corners.len() - 2 {
            self.emit(idx, corners[0]);
            self.emit(idx, corners[tri + 1]);
            self.emit(idx, corners[tri + 2]);
        }
        Ok(())
    }

    fn resolve_face_vertex(
        &self,
        stmt: &Statement<'_>,
        token: &str,
    ) -> Result<FaceVertex, ParseError> {
        let mut components = token.split('/');
        let position = match components.next() {
            Some(p) if !p.is_empty() => self.resolve(stmt, AttributeKind::Position, p)?,
            _ => {
                return Err(ParseError::MalformedNumber {
                    line: stmt.line,
                    token: token.to_string(),
                });
            }
        };
        let mut optional = |kind| -> Result<Option<usize>, ParseError> {
            match components.next() {
                Some(raw) if !raw.is_empty() => self.resolve(stmt, kind, raw).map(Some),
                _ => Ok(None),
            }
        };
        let texcoord = optional(AttributeKind::TexCoord)?;
        let normal = optional(AttributeKind::Normal)?;
        Ok(FaceVertex {
            position,
            texcoord,
            normal,
        })
    }

    /// Positive indices address the pool directly, negative ones count back from its end.
    fn resolve(
        &self,
        stmt: &Statement<'_>,
        kind: AttributeKind,
        raw: &str,
    ) -> Result<usize, ParseError> {
        let index = stmt.int(raw)?;
        let len = self.pools.len(kind);
        let resolved = if index >= 0 { index } else { len as i64 + index };
        if resolved < 1 || resolved >= len as i64 {
            return Err(ParseError::BadIndex {
                line: stmt.line,
                kind,
                index,
                len: len - 1,
            });
        }
        Ok(resolved as usize)
    }

    fn emit(&mut self, idx: usize, vertex: FaceVertex) {
        let pools = &self.pools;
        let geometry = &mut self.geometries[idx];
        geometry.position.extend(pools.positions[vertex.position]);
        // Always collected so the stream stays aligned with positions; pruned
        // at the end when no `v` line declared a color.
        geometry.color.extend(pools.colors[vertex.position]);
        if let Some(t) = vertex.texcoord {
            geometry.texcoord.extend(pools.texcoords[t]);
        }
        if let Some(n) = vertex.normal {
            geometry.normal.extend(pools.normals[n]);
        }
    }

    /// Ends the active geometry, unless it has not received any faces yet.
    fn break_geometry(&mut self) {
        if let GeometryState::ActiveGeometry(idx) = self.state {
            if !self.geometries[idx].position.is_empty() {
                self.state = GeometryState::NoActiveGeometry;
            }
        }
    }

    /// Returns the active geometry, opening one with the current context if needed.
    fn set_geometry(&mut self) -> usize {
        match self.state {
            GeometryState::ActiveGeometry(idx) => idx,
            GeometryState::NoActiveGeometry => {
                self.geometries.push(GeometryBuilder {
                    object_name: self.object_name.clone(),
                    group_names: self.group_names.clone(),
                    material_name: self.material_name.clone(),
                    position: Vec::new(),
                    texcoord: Vec::new(),
                    normal: Vec::new(),
                    color: Vec::new(),
                });
                let idx = self.geometries.len() - 1;
                self.state = GeometryState::ActiveGeometry(idx);
                idx
            }
        }
    }

    fn finish(self) -> ParsedModel {
        let has_colors = self.has_colors;
        let geometries = self
            .geometries
            .into_iter()
            .filter(|g| !g.position.is_empty())
            .map(|g| g.build(has_colors))
            .collect();
        ParsedModel {
            geometries,
            material_library_names: self.material_library_names,
        }
    }
}

/// Parses OBJ text into triangulated geometries. Unknown keywords are logged and skipped.
pub fn parse_obj(text: &str) -> Result<ParsedModel, ParseError> {
    let mut parser = ObjParser::new();
    for stmt in lex::statements(text) {
        parser.statement(&stmt)?;
    }
    let model = parser.finish();
    log::debug!(
        "parsed OBJ with {} geometries, {} vertices and {} material libraries",
        model.geometries.len(),
        model.vertex_count(),
        model.material_library_names.len()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_coalesce_breaks_without_faces() {
        let mut parser = ObjParser::new();
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nusemtl a\ng walls\no house\nf 1 2 3";
        let mut count = 0;
        for stmt in lex::statements(text) {
            parser.statement(&stmt).unwrap();
            count += 1;
            if count == 4 {
                assert_eq!(parser.state, GeometryState::ActiveGeometry(0));
            }
            if count == 7 {
                assert_eq!(parser.state, GeometryState::NoActiveGeometry);
            }
        }
        assert_eq!(parser.state, GeometryState::ActiveGeometry(1));
        assert_eq!(parser.geometries.len(), 2);
    }

    #[test]
    fn should_keep_sentinel_at_pool_start() {
        let mut parser = ObjParser::new();
        for stmt in lex::statements("v 4 5 6") {
            parser.statement(&stmt).unwrap();
        }
        assert_eq!(parser.pools.positions, vec![[0.0; 3], [4.0, 5.0, 6.0]]);
        assert_eq!(parser.pools.len(AttributeKind::Color), 2);
    }

    #[test]
    fn should_map_keywords() {
        assert_eq!(ObjKeyword::from("usemtl"), ObjKeyword::UseMaterial);
        assert_eq!(ObjKeyword::from("l"), ObjKeyword::Unrecognized("l"));
    }
}
