//! `ReportObserver<W>` — bridges `TissueObserver` to a `ReportWriter`.

use cyto_sim::{Tissue, TissueObserver};

use crate::history::History;
use crate::row::TallyRow;
use crate::writer::ReportWriter;
use crate::ReportError;

/// A [`TissueObserver`] that samples the tissue into a [`History`] every
/// `every` steps and forwards each sample to a [`ReportWriter`] backend.
///
/// At the end of the run it writes the final action tallies and closes the
/// writer.
///
/// Errors from the writer are stored internally because `TissueObserver`
/// methods have no return value.  After `run_for` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct ReportObserver<W: ReportWriter> {
    history:    History,
    writer:     W,
    every:      u64,
    steps:      u64,
    last_error: Option<ReportError>,
}

impl<W: ReportWriter> ReportObserver<W> {
    /// Create an observer that samples once per `every` completed steps.
    ///
    /// # Panics
    ///
    /// Panics if `every` is zero.
    pub fn new(history: History, writer: W, every: u64) -> Self {
        assert!(every > 0, "sampling interval must be nonzero");
        Self {
            history,
            writer,
            every,
            steps: 0,
            last_error: None,
        }
    }

    /// The accumulated in-memory history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Take the stored write error (if any) after `run_for` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<ReportError> {
        self.last_error.take()
    }

    /// Unwrap the history and the inner writer (e.g. to inspect files after
    /// the run).
    pub fn into_parts(self) -> (History, W) {
        (self.history, self.writer)
    }

    fn store_err(&mut self, result: crate::ReportResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: ReportWriter> TissueObserver for ReportObserver<W> {
    fn on_step_end(&mut self, tissue: &Tissue) {
        self.steps += 1;
        if !self.steps.is_multiple_of(self.every) {
            return;
        }
        self.history.sample(tissue);
        let row = self.history.row(self.history.len() - 1);
        let result = self.writer.write_sample(&row);
        self.store_err(result);
    }

    fn on_run_end(&mut self, tissue: &Tissue) {
        let rows: Vec<TallyRow> = tissue
            .tally()
            .rows()
            .map(|(name, count)| TallyRow {
                name: name.to_string(),
                count,
            })
            .collect();
        let result = self.writer.write_tallies(&rows);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
