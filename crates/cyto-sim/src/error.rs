use cyto_cell::CellError;
use cyto_field::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("molecule {0:?} is already registered")]
    DuplicateMolecule(String),

    #[error("unknown molecule {0:?}")]
    UnknownMolecule(String),

    #[error("reset interval for molecule {name:?} must be positive, got {interval}")]
    ResetInterval { name: String, interval: f64 },

    #[error("concentration mean for molecule {name:?} must be non-negative, got {mean}")]
    NegativeMean { name: String, mean: f64 },

    #[error("field error: {0}")]
    Field(#[from] FieldError),

    #[error("cell error: {0}")]
    Cell(#[from] CellError),
}

pub type SimResult<T> = Result<T, SimError>;
