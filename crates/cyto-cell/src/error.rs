use cyto_core::Vector3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CellError {
    #[error("unknown cell type {0:?}")]
    UnknownType(String),

    #[error("cell type {0:?} is already registered")]
    DuplicateType(String),

    #[error("cell type {type_name:?} has no attribute {attribute:?}")]
    UnknownAttribute {
        type_name: String,
        attribute: String,
    },

    #[error("cell types {first:?} and {second:?} must share one radius for mixed placement")]
    RadiusMismatch { first: String, second: String },

    #[error("simulation extent must be positive in every dimension, got {0}")]
    InvalidExtent(Vector3),

    #[error("patch size must be non-negative, got {0}")]
    NegativePatchSize(f64),

    #[error("patch size {patch} does not evenly divide the {axis}-extent {extent}")]
    Indivisible {
        axis:   char,
        extent: f64,
        patch:  f64,
    },

    #[error("{nx}x{ny} patches in x/y: an axis with patches needs at least 3 when the other has 3 or more")]
    ThinPatchAxis { nx: usize, ny: usize },

    #[error("placement plane z = {z} lies outside the volume (z-extent {extent})")]
    PlaneOutOfRange { z: f64, extent: f64 },

    #[error("cell type {type_name:?} declares {expected} attributes, got {got} values")]
    AttributeCount {
        type_name: String,
        expected:  usize,
        got:       usize,
    },

    #[error("invalid rule: {0}")]
    InvalidRule(String),
}

pub type CellResult<T> = Result<T, CellError>;
