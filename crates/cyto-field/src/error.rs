use cyto_core::Vector3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field extent must be positive in every dimension, got {0}")]
    InvalidExtent(Vector3),

    #[error("field grid size must be non-negative, got {0}")]
    NegativeGridSize(f64),

    #[error("grid size {gridsize} does not evenly divide the {axis}-extent {extent}")]
    Indivisible {
        axis:     char,
        extent:   f64,
        gridsize: f64,
    },

    #[error("negative {what} rate {rate} for molecule {name:?}")]
    NegativeRate {
        name: String,
        what: &'static str,
        rate: f64,
    },

    #[error("concentration data has {got} values, grid holds {expected}")]
    DataLength { expected: usize, got: usize },
}

pub type FieldResult<T> = Result<T, FieldError>;
