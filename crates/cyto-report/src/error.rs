//! Error types for cyto-report.

use cyto_cell::CellError;
use thiserror::Error;

/// Errors that can occur while configuring or writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cell error: {0}")]
    Cell(#[from] CellError),
}

/// Alias for `Result<T, ReportError>`.
pub type ReportResult<T> = Result<T, ReportError>;
