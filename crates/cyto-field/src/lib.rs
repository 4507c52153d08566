//! `cyto-field` — diffusion-reaction molecular fields on a periodic grid.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`geometry`] | `FieldGeometry` — shared volume discretization, built once  |
//! | [`molecule`] | `Molecule` — one species' concentration field + its solver  |
//! | [`error`]    | `FieldError`, `FieldResult<T>`                              |
//!
//! # Numerical scheme
//!
//! Diffusion uses the explicit (forward-Euler) method on a 4- or 6-neighbor
//! stencil with periodic boundaries.  A step that would violate the
//! stability bound `dt ≤ dx²/(2·dims·D)` is split into the minimal number
//! of equal sub-steps that satisfy it.  Decay folds into the same delta so
//! both effects apply from one read-only snapshot per sub-step.

pub mod error;
pub mod geometry;
pub mod molecule;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{FieldError, FieldResult};
pub use geometry::FieldGeometry;
pub use molecule::Molecule;
