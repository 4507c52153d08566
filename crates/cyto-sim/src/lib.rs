//! `cyto-sim` — tissue orchestrator of the cytogrid simulator.
//!
//! # Step loop
//!
//! ```text
//! for each step of length dt:
//!   ① Fields — every molecular field either fires its scheduled uniform
//!               reset or takes one diffusion and decay step.
//!   ② Cells  — the population runs each live cell's rule pipeline in
//!               shuffled order, sweeps the dead, moves the mobile, and
//!               merges admissions.
//!   ③ Clock  — simulated time advances by dt.
//! ```
//!
//! Cells always sense the field state phase ① just produced; what they
//! secrete in phase ② is diffused, then sensed, one step later.
//!
//! # Crate layout
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`tissue`]   | `Tissue` — fields + population + clock + RNG          |
//! | [`builder`]  | `TissueBuilder`, `MoleculeSpec`, `Placement`          |
//! | [`reset`]    | `ResetSchedule` — periodic uniform re-initialization  |
//! | [`observer`] | `TissueObserver` callbacks, `NoopObserver`            |
//! | [`snapshot`] | `CellRecord`, `FieldRecord`, `TissueSnapshot`         |
//! | [`error`]    | `SimError`, `SimResult<T>`                            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cyto_core::Vector3;
//! use cyto_sim::{MoleculeSpec, NoopObserver, Placement, TissueBuilder};
//!
//! let mut tissue = TissueBuilder::new(Vector3::new(100.0, 100.0, 100.0))
//!     .grid_size(10.0)
//!     .patch_size(10.0)
//!     .seed(42)
//!     .add_molecule(MoleculeSpec::new("IL-2").diffusion(80.0).decay(1e-4))
//!     .add_cell_type(t_cell)
//!     .place(Placement::Randomly { type_name: "T cell".into(), count: 500 })
//!     .build()?;
//! tissue.run_for(3_600, 1.0, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod reset;
pub mod snapshot;
pub mod tissue;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::{MoleculeSpec, Placement, TissueBuilder};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, TissueObserver};
pub use reset::ResetSchedule;
pub use snapshot::{CellRecord, FieldRecord, TissueSnapshot};
pub use tissue::Tissue;
