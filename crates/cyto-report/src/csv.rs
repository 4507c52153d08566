//! CSV report backend.
//!
//! Creates two files in the configured output directory:
//! - `history.csv` — one row per sample: time, per-type counts, per-molecule
//!   average concentrations, tracked attribute totals
//! - `tallies.csv` — final action counts, one row per registered tally

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::history::History;
use crate::writer::ReportWriter;
use crate::{ReportResult, SampleRow, TallyRow};

/// Writes tissue history to two CSV files.
pub struct CsvWriter {
    history:  Writer<File>,
    tallies:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    ///
    /// The history header is derived from `history`'s column labels, so the
    /// writer must be created *after* every
    /// [`track`][crate::History::track] call.
    pub fn new(dir: &Path, history: &History) -> ReportResult<Self> {
        let mut history_file = Writer::from_path(dir.join("history.csv"))?;
        history_file.write_record(history.columns())?;

        let mut tallies = Writer::from_path(dir.join("tallies.csv"))?;
        tallies.write_record(["action", "count"])?;

        Ok(Self {
            history: history_file,
            tallies,
            finished: false,
        })
    }
}

impl ReportWriter for CsvWriter {
    fn write_sample(&mut self, row: &SampleRow) -> ReportResult<()> {
        let mut record = Vec::with_capacity(1 + row.counts.len() + row.concs.len() + row.tracked.len());
        record.push(row.time.to_string());
        record.extend(row.counts.iter().map(|c| c.to_string()));
        record.extend(row.concs.iter().map(|c| c.to_string()));
        record.extend(row.tracked.iter().map(|c| c.to_string()));
        self.history.write_record(&record)?;
        Ok(())
    }

    fn write_tallies(&mut self, rows: &[TallyRow]) -> ReportResult<()> {
        for row in rows {
            self.tallies.write_record(&[row.name.clone(), row.count.to_string()])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> ReportResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.history.flush()?;
        self.tallies.flush()?;
        Ok(())
    }
}
