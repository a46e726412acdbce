//! Axis-aligned bounding boxes over flat position lists.

use crate::error::ExtentsError;

/// A closed axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extents {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

/// A sphere enclosing an `Extents`, used for camera framing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: [f64; 3],
    pub radius: f64,
}

impl Extents {
    /// Identity of `union`: an inverted box that every point expands.
    pub const EMPTY: Extents = Extents {
        min: [f64::INFINITY; 3],
        max: [f64::NEG_INFINITY; 3],
    };

    pub fn union(&self, other: &Extents) -> Extents {
        let mut out = *self;
        for axis in 0..3 {
            out.min[axis] = out.min[axis].min(other.min[axis]);
            out.max[axis] = out.max[axis].max(other.max[axis]);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        let center = self.center();
        let radius = (0..3)
            .map(|axis| {
                let d = self.max[axis] - center[axis];
                d * d
            })
            .sum::<f64>()
            .sqrt();
        BoundingSphere { center, radius }
    }
}

impl Default for Extents {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Extents of a flat `[x, y, z, x, y, z, ...]` list. A trailing partial triple is ignored.
pub fn extents_of(positions: &[f64]) -> Result<Extents, ExtentsError> {
    let mut triples = positions.chunks_exact(3);
    let first = triples.next().ok_or(ExtentsError::EmptyInput)?;
    let mut extents = Extents {
        min: [first[0], first[1], first[2]],
        max: [first[0], first[1], first[2]],
    };
    for p in triples {
        for axis in 0..3 {
            extents.min[axis] = extents.min[axis].min(p[axis]);
            extents.max[axis] = extents.max[axis].max(p[axis]);
        }
    }
    Ok(extents)
}

/// Component-wise min/max fold, `Extents::EMPTY` for an empty slice.
pub fn aggregate(items: &[Extents]) -> Extents {
    items
        .iter()
        .fold(Extents::EMPTY, |acc, item| acc.union(item))
}
