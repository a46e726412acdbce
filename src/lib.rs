//! city-ngin
//!
//! Procedural city layouts assembled from Wavefront OBJ/MTL assets. The crate
//! parses the asset files into plain geometry and material records, keeps
//! them in a role-keyed catalog and places road and building variants on an
//! N×N grid. Turning geometry into GPU resources and drawing the placements
//! is left to the embedding renderer.
//!
//! High-level modules
//! - `city`: top-level flow that loads a catalog and generates a layout
//! - `data_structures`: geometry, materials, extents, the asset catalog and instances
//! - `error`: parse, extent and layout errors
//! - `layout`: the grid layout generator
//! - `resources`: OBJ/MTL parsers and async file loading
//!

pub mod city;
pub mod data_structures;
pub mod error;
pub mod layout;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use city::{City, CityManifest};
pub use error::{ExtentsError, LayoutError, ParseError};
pub use layout::{CellPlacement, LayoutConfig, WorldLayout, generate, generate_with_rng};
pub use resources::{parse_mtl, parse_obj};
