//! Plain-data records for capturing and restoring a run.

use cyto_core::{RngState, Vector3};

/// One live cell's full state.
///
/// `attributes` follows the declared attribute order of the cell's type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRecord {
    pub type_name:  String,
    pub position:   Vector3,
    pub velocity:   Vector3,
    pub heading:    Vector3,
    pub attributes: Vec<f64>,
}

/// One field's flattened concentration grid in moles/ml, `(x, y, z)` nested
/// order with x outermost.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldRecord {
    pub name:           String,
    pub concentrations: Vec<f64>,
}

/// A full mid-run capture: the clock, every live cell, every field, and the
/// RNG token.
///
/// The token only round-trips within one process (the generator's byte
/// layout is not a stable interface), so serialization skips it; a
/// deserialized snapshot restores everything else and the generator keeps
/// its current stream.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TissueSnapshot {
    pub time:   f64,
    pub cells:  Vec<CellRecord>,
    pub fields: Vec<FieldRecord>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub rng:    Option<RngState>,
}
