//! `cyto-report` — history sampling and report writers for the cytogrid
//! simulator.
//!
//! [`History`] records a schema-aware time series from a running tissue: one
//! row per sample holding the simulated time, live-cell counts per type,
//! average concentration per molecular field, and population totals for any
//! tracked `type:attribute` pairs.
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | `history`  | [`History`] — in-memory time series over a tissue     |
//! | `row`      | Plain data rows handed to backends                    |
//! | `writer`   | The [`ReportWriter`] backend trait                    |
//! | `csv`      | [`CsvWriter`] — `history.csv` + `tallies.csv`         |
//! | `observer` | [`ReportObserver`] — drives sampling from the run loop|
//! | `error`    | [`ReportError`] / [`ReportResult`]                    |
//!
//! # Usage
//!
//! ```rust,ignore
//! use cyto_report::{CsvWriter, History, ReportObserver};
//!
//! let mut history = History::new(&tissue);
//! history.track(&tissue, "t-cell", "activation")?;
//! let writer = CsvWriter::new(Path::new("./out"), &history)?;
//! let mut obs = ReportObserver::new(history, writer, 60);
//! tissue.run_for(86_400, 1.0, &mut obs);
//! obs.take_error().map(|e| eprintln!("report error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod history;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{ReportError, ReportResult};
pub use history::History;
pub use observer::ReportObserver;
pub use row::{SampleRow, TallyRow};
pub use writer::ReportWriter;
