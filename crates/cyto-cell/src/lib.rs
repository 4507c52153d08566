//! `cyto-cell` — cell agents, rule-based type schemas, and the population
//! manager of the cytogrid tissue simulator.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`cell`]       | `Cell` — one agent's state vector                          |
//! | [`celltype`]   | `CellType` — attribute schema plus the rule pipeline       |
//! | [`dist`]       | `Dist` — sampling distributions for attribute seeding      |
//! | [`rate`]       | `Rate` — attribute-driven rate laws                        |
//! | [`cond`]       | `Cond` — stochastic and threshold trigger conditions       |
//! | [`sense`]      | `Sense` — field and contact perception rules               |
//! | [`process`]    | `Process` — internal-state evolution rules                 |
//! | [`action`]     | `Action` — discrete behaviors (death, division, motion, …) |
//! | [`space`]      | `Space` — periodic volume and its patch discretization     |
//! | [`population`] | `Population` — agent storage, placement, the step sweep    |
//! | [`tally`]      | `ActionTally` — named event counters                       |
//! | [`error`]      | `CellError`, `CellResult<T>`                               |
//!
//! # Rule pipeline
//!
//! A `CellType` owns four ordered rule lists.  Each step every live cell
//! runs them in order: senses read the world into attributes, processes
//! evolve attributes, then unconditional and conditional actions change
//! the world.
//!
//! ```text
//! Sense ──▶ Process ──▶ Action (always) ──▶ Cond? ──▶ Action
//! ```

pub mod action;
pub mod cell;
pub mod celltype;
pub mod cond;
pub mod dist;
pub mod error;
pub mod population;
pub mod process;
pub mod rate;
pub mod sense;
pub mod space;
pub mod tally;

mod context;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use action::Action;
pub use cell::Cell;
pub use celltype::CellType;
pub use cond::Cond;
pub use dist::Dist;
pub use error::{CellError, CellResult};
pub use population::Population;
pub use process::Process;
pub use rate::Rate;
pub use sense::Sense;
pub use space::Space;
pub use tally::ActionTally;
