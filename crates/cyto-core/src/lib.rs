//! `cyto-core` — foundational types for the cytogrid tissue simulator.
//!
//! This crate is a dependency of every other `cyto-*` crate.  It has no
//! `cyto-*` dependencies and minimal external ones (`rand`/`rand_distr`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                             |
//! |------------|------------------------------------------------------|
//! | [`vector`] | `Vector3` — positions, velocities, headings          |
//! | [`grid`]   | `Grid3<T>` — dense 3D storage with interpolation     |
//! | [`ids`]    | `TypeId`, `MolId`, `AttrId`, `TallyId`               |
//! | [`rng`]    | `SimRng` — the deterministic sampling service        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public value types.   |

pub mod grid;
pub mod ids;
pub mod rng;
pub mod vector;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use grid::Grid3;
pub use ids::{AttrId, MolId, TallyId, TypeId};
pub use rng::{RngState, SimRng};
pub use vector::Vector3;
