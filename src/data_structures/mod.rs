//! Engine data structures: geometry, materials, extents, catalog and instances.
//!
//! - `geometry` holds triangulated OBJ output
//! - `material` holds MTL records and the default-material overlay
//! - `extents` computes bounding boxes and framing spheres
//! - `catalog` groups loaded assets by role
//! - `instance` holds per-instance transforms for placed assets

pub mod catalog;
pub mod extents;
pub mod geometry;
pub mod instance;
pub mod material;
