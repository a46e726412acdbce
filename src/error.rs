//! Error types shared by the parsers, the extent calculator and the layout generator.

use crate::data_structures::geometry::AttributeKind;

/// Failure while reading OBJ or MTL text. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: `{token}` is not a valid number")]
    MalformedNumber { line: usize, token: String },

    #[error("line {line}: `{keyword}` appears before any `newmtl`")]
    NoActiveMaterial { line: usize, keyword: String },

    #[error("line {line}: face has {found} vertices, at least 3 are required")]
    UnterminatedFace { line: usize, found: usize },

    #[error("line {line}: {kind} index {index} is out of bounds ({len} entries declared)")]
    BadIndex {
        line: usize,
        kind: AttributeKind,
        index: i64,
        len: usize,
    },

    #[error("line {line}: `{keyword}` expects {expected} values but got {found}")]
    MissingComponents {
        line: usize,
        keyword: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtentsError {
    #[error("cannot compute extents of an empty position list")]
    EmptyInput,
}

/// Failure to set up a layout. Once validated, generation itself cannot fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid layout configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("catalog role `{role}` holds {found} assets, {needed} are required")]
    MissingAsset {
        role: String,
        needed: usize,
        found: usize,
    },
}
