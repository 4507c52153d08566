//! The `ReportWriter` trait implemented by all backend writers.

use crate::{ReportResult, SampleRow, TallyRow};

/// Trait implemented by report backends.
///
/// [`ReportObserver`][crate::ReportObserver] never propagates these errors
/// mid-run; it stores the first one for retrieval with
/// [`take_error`][crate::ReportObserver::take_error].
pub trait ReportWriter {
    /// Append one history sample.
    fn write_sample(&mut self, row: &SampleRow) -> ReportResult<()>;

    /// Write the final action-tally counts.
    fn write_tallies(&mut self, rows: &[TallyRow]) -> ReportResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> ReportResult<()>;
}
