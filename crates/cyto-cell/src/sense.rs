//! Senses: rules that read the cell's surroundings into its attributes.
//!
//! Senses run first in the per-cell pipeline, so the attribute vector the
//! later stages see reflects this step's environment.  Field-coupled
//! variants may also withdraw molecule from the local grid cell (binding
//! and consumption conserve ligand), and phagocytosis may kill a neighbor.

use cyto_core::{AttrId, MolId, TypeId};

use crate::cell::Cell;
use crate::context::StepContext;
use crate::error::CellResult;
use crate::rate::{check_attr, check_non_negative, check_positive};

/// An environment-reading rule attached to a cell type.
#[derive(Clone, Debug, PartialEq)]
pub enum Sense {
    /// Copy the local concentration of `mol` into `attr`. Reads the
    /// containing grid cell's value; no molecule is removed.
    CopyConc { attr: AttrId, mol: MolId },
    /// Reversible receptor-ligand binding.  `attr` holds the current
    /// number of bound receptors out of a fixed complement of
    /// `receptors`; the net change over the step is withdrawn from the
    /// field so ligand is conserved.
    BindRev {
        attr:      AttrId,
        mol:       MolId,
        kf:        f64,
        kr:        f64,
        receptors: f64,
    },
    /// Internalize ligand at a rate saturating in the local concentration.
    /// `attr` is set to the per-second rate (not the step total); the step
    /// total is withdrawn from the field.  When nothing is consumed the
    /// attribute is cleared to zero.
    Consume {
        attr:     AttrId,
        mol:      MolId,
        max_rate: f64,
        half_sat: f64,
    },
    /// [`Consume`][Sense::Consume] with a per-cell maximum rate read from
    /// `rate_attr`.  When nothing is consumed the attribute keeps its old
    /// value rather than clearing.
    ConsumeIndiv {
        attr:      AttrId,
        mol:       MolId,
        rate_attr: AttrId,
        half_sat:  f64,
    },
    /// Set `attr` to 1 while a live cell of type `target` is within
    /// `reach`, else 0.
    Cognate { attr: AttrId, target: TypeId, reach: f64 },
    /// Phagocytosis.  When the receptor attribute exceeds `threshold`, try
    /// one random neighbor within `reach`; if it is of the target type,
    /// kill it and increment the internal load attribute.
    Phag {
        load_attr:     AttrId,
        target:        TypeId,
        reach:         f64,
        receptor_attr: AttrId,
        threshold:     f64,
    },
}

impl Sense {
    /// Apply to one cell over a step of length `dt`.
    pub(crate) fn run(&self, cell: &mut Cell, ctx: &mut StepContext<'_>, dt: f64) {
        match *self {
            Sense::CopyConc { attr, mol } => {
                let conc = ctx.fields[mol.index()].conc_at(cell.position());
                cell.set_value(attr, conc);
            }
            Sense::BindRev { attr, mol, kf, kr, receptors } => {
                let field = &mut ctx.fields[mol.index()];
                let ligand = field.conc_at(cell.position());
                let bound = cell.value(attr);
                assert!(
                    bound <= receptors,
                    "bound receptor count {bound} exceeds the receptor complement {receptors}"
                );
                let delta = dt * (kf * (receptors - bound) * ligand - kr * bound);
                cell.set_value(attr, bound + delta);
                field.change_conc(-delta, cell.position());
            }
            Sense::Consume { attr, mol, max_rate, half_sat } => {
                let field = &mut ctx.fields[mol.index()];
                let conc = field.conc_at(cell.position());
                let rate = max_rate * conc / (half_sat + conc);
                debug_assert!(rate >= 0.0);
                let amount = rate * dt;
                if amount != 0.0 {
                    // Store the instantaneous rate, withdraw the step total.
                    cell.set_value(attr, rate);
                    field.change_conc(-amount, cell.position());
                } else {
                    cell.set_value(attr, 0.0);
                }
            }
            Sense::ConsumeIndiv { attr, mol, rate_attr, half_sat } => {
                let field = &mut ctx.fields[mol.index()];
                let conc = field.conc_at(cell.position());
                let max_rate = cell.value(rate_attr);
                debug_assert!(max_rate >= 0.0, "per-cell consumption rate went negative");
                let rate = max_rate * conc / (half_sat + conc);
                let amount = rate * dt;
                if amount != 0.0 {
                    cell.set_value(attr, rate);
                    field.change_conc(-amount, cell.position());
                }
            }
            Sense::Cognate { attr, target, reach } => {
                let found = ctx.has_neighbor(cell.position(), reach, target);
                cell.set_value(attr, if found { 1.0 } else { 0.0 });
            }
            Sense::Phag { load_attr, target, reach, receptor_attr, threshold } => {
                if cell.value(receptor_attr) > threshold {
                    if let Some(slot) = ctx.get_target(cell.position(), reach) {
                        if ctx.cells[slot].type_id() == target {
                            ctx.cells[slot].die();
                            cell.set_value(load_attr, cell.value(load_attr) + 1.0);
                        }
                    }
                }
            }
        }
    }

    /// Validate attribute references and kinetic parameters against a
    /// schema of `attr_count` attributes.
    pub(crate) fn check(&self, attr_count: usize) -> CellResult<()> {
        match *self {
            Sense::CopyConc { attr, .. } => check_attr(attr, attr_count),
            Sense::BindRev { attr, kf, kr, receptors, .. } => {
                check_attr(attr, attr_count)?;
                check_non_negative(kf, "forward binding constant")?;
                check_non_negative(kr, "reverse binding constant")?;
                check_positive(receptors, "receptor complement")
            }
            Sense::Consume { attr, max_rate, half_sat, .. } => {
                check_attr(attr, attr_count)?;
                check_non_negative(max_rate, "maximum consumption rate")?;
                check_positive(half_sat, "half-saturation constant")
            }
            Sense::ConsumeIndiv { attr, rate_attr, half_sat, .. } => {
                check_attr(attr, attr_count)?;
                check_attr(rate_attr, attr_count)?;
                check_positive(half_sat, "half-saturation constant")
            }
            Sense::Cognate { attr, reach, .. } => {
                check_attr(attr, attr_count)?;
                check_non_negative(reach, "sensing reach")
            }
            Sense::Phag { load_attr, reach, receptor_attr, threshold, .. } => {
                check_attr(load_attr, attr_count)?;
                check_attr(receptor_attr, attr_count)?;
                check_non_negative(reach, "sensing reach")?;
                check_non_negative(threshold, "receptor threshold")
            }
        }
    }
}
