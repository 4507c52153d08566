//! Activities: rules that act on the world when their condition fires.
//!
//! Actions close the loop the senses open.  They kill, divide, and recruit
//! cells, deposit molecule into the fields, and steer motile cells.  Cell
//! creation goes through the pending queue, so nothing an action admits is
//! visible to rules until the step's merge; the acting cell itself changes
//! immediately.

use std::f64::consts::TAU;

use cyto_core::{AttrId, MolId, TallyId, TypeId, Vector3};

use crate::cell::Cell;
use crate::context::StepContext;
use crate::error::{CellError, CellResult};
use crate::rate::{Rate, check_attr, check_non_negative, check_positive};

/// A world-affecting rule, run when its paired condition holds.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Kill the acting cell.  It stops running rules immediately and is
    /// compacted away at the end of the step.
    Die { tally: TallyId },
    /// Reinterpret the acting cell as another type.  Attributes carry over
    /// unchanged, so the two types must declare the same schema width.
    ChangeType { into: TypeId, tally: TallyId },
    /// Replace the acting cell with two newborn daughters offset a tenth
    /// of a micron to either side along x.
    Divide { daughter: TypeId, tally: TallyId },
    /// Admit one cell of `type_id` at `offset` microns from the acting
    /// cell, in a uniformly random direction.
    Admit {
        type_id: TypeId,
        offset:  f64,
        birth:   bool,
        tally:   TallyId,
    },
    /// Admit a rate-determined number of cells in a ring of radius
    /// `offset` in the acting cell's xy-plane.  The count truncates to a
    /// whole number; the first cell is admitted even when it is zero.
    AdmitMult {
        type_id: TypeId,
        offset:  f64,
        birth:   bool,
        count:   Rate,
    },
    /// Admit one cell `offset` microns up the local gradient of `mol`,
    /// falling back to a random direction where the field is flat.
    /// `offset` doubles as the gradient sampling radius.
    AdmitGradient {
        type_id: TypeId,
        mol:     MolId,
        offset:  f64,
        birth:   bool,
        tally:   TallyId,
    },
    /// Deposit `rate · dt` molecules into `mol` at the cell's position.
    SecreteFixed { mol: MolId, rate: f64 },
    /// Deposit `attr · dt` molecules, reading the per-second rate from the
    /// cell.
    SecreteVar { mol: MolId, attr: AttrId },
    /// Deposit `attr` molecules in one burst, with no timestep scaling.
    SecreteBurst { mol: MolId, attr: AttrId },
    /// Deposit `rate · dt` molecules with the rate computed from the
    /// cell's attributes.  Non-positive amounts are skipped, so a rate law
    /// that dips negative cannot withdraw molecule.
    Secrete { mol: MolId, rate: Rate },
    /// Point the cell in a fresh uniformly random direction.
    MoveRandomly,
    /// Point the cell in a fresh random direction in the xy-plane.
    MoveRandomly2D,
    /// Chemotaxis: face up the local gradient of `mol` when the
    /// concentration reaches `min_conc` and the gradient is nonzero, else
    /// tumble to a random direction.
    MoveChemotaxis {
        mol:      MolId,
        min_conc: f64,
        radius:   f64,
    },
    /// Chemotaxis confined to the xy-plane, for single-layer volumes.
    MoveChemotaxis2D {
        mol:      MolId,
        min_conc: f64,
        radius:   f64,
    },
    /// Run two actions in sequence.  The second runs even when the first
    /// kills the acting cell.
    Composite(Box<Action>, Box<Action>),
}

impl Action {
    /// Apply to one cell over a step of length `dt`.
    pub(crate) fn run(&self, cell: &mut Cell, ctx: &mut StepContext<'_>, dt: f64) {
        match *self {
            Action::Die { tally } => {
                cell.die();
                ctx.tally.bump(tally);
            }
            Action::ChangeType { into, tally } => {
                debug_assert_eq!(
                    ctx.types[cell.type_id().index()].attribute_count(),
                    ctx.types[into.index()].attribute_count(),
                    "type change must preserve the attribute schema width"
                );
                cell.set_type_id(into);
                ctx.tally.bump(tally);
            }
            Action::Divide { daughter, tally } => {
                let pos = cell.position();
                ctx.add_cell(daughter, pos + Vector3::new(0.1, 0.0, 0.0), true);
                ctx.add_cell(daughter, pos + Vector3::new(-0.1, 0.0, 0.0), true);
                cell.die();
                ctx.tally.bump(tally);
            }
            Action::Admit { type_id, offset, birth, tally } => {
                let dir = Vector3::random_unit(ctx.rng);
                ctx.add_cell(type_id, cell.position() + dir * offset, birth);
                ctx.tally.bump(tally);
            }
            Action::AdmitMult { type_id, offset, birth, ref count } => {
                let n = count.eval(cell.values()) as i64;
                let pos = cell.position();
                ctx.add_cell(type_id, pos + Vector3::new(offset, 0.0, 0.0), birth);
                for i in 1..n {
                    let angle = i as f64 * (TAU / n as f64);
                    let ring = Vector3::new(offset * angle.cos(), offset * angle.sin(), 0.0);
                    ctx.add_cell(type_id, pos + ring, birth);
                }
            }
            Action::AdmitGradient { type_id, mol, offset, birth, tally } => {
                let gradient = ctx.fields[mol.index()].gradient(cell.position(), offset);
                let mag = gradient.length();
                let dir = if mag > 0.0 {
                    gradient * (1.0 / mag)
                } else {
                    Vector3::random_unit(ctx.rng)
                };
                ctx.add_cell(type_id, cell.position() + dir * offset, birth);
                ctx.tally.bump(tally);
            }
            Action::SecreteFixed { mol, rate } => {
                ctx.fields[mol.index()].change_conc(rate * dt, cell.position());
            }
            Action::SecreteVar { mol, attr } => {
                let amount = dt * cell.value(attr);
                ctx.fields[mol.index()].change_conc(amount, cell.position());
            }
            Action::SecreteBurst { mol, attr } => {
                let amount = cell.value(attr);
                ctx.fields[mol.index()].change_conc(amount, cell.position());
            }
            Action::Secrete { mol, ref rate } => {
                let amount = rate.eval(cell.values()) * dt;
                if amount > 0.0 {
                    ctx.fields[mol.index()].change_conc(amount, cell.position());
                }
            }
            Action::MoveRandomly => {
                cell.set_direction(Vector3::random_unit(ctx.rng));
            }
            Action::MoveRandomly2D => {
                cell.set_direction(Vector3::random_unit_xy(ctx.rng));
            }
            Action::MoveChemotaxis { mol, min_conc, radius } => {
                let field = &ctx.fields[mol.index()];
                let conc = field.conc_at(cell.position());
                let mut mag = 0.0;
                if conc >= min_conc {
                    let gradient = field.gradient(cell.position(), radius);
                    mag = gradient.length();
                    if mag != 0.0 {
                        cell.set_direction(gradient * (1.0 / mag));
                    }
                }
                if conc < min_conc || mag == 0.0 {
                    cell.set_direction(Vector3::random_unit(ctx.rng));
                }
            }
            Action::MoveChemotaxis2D { mol, min_conc, radius } => {
                let field = &ctx.fields[mol.index()];
                let conc = field.conc_at(cell.position());
                let mut mag = 0.0;
                if conc >= min_conc {
                    let gradient = field.gradient(cell.position(), radius);
                    debug_assert!(gradient.z == 0.0, "planar chemotaxis in a layered volume");
                    mag = gradient.length();
                    if mag != 0.0 {
                        cell.set_direction(gradient * (1.0 / mag));
                    }
                }
                if conc < min_conc || mag == 0.0 {
                    cell.set_direction(Vector3::random_unit_xy(ctx.rng));
                }
            }
            Action::Composite(ref a, ref b) => {
                a.run(cell, ctx, dt);
                b.run(cell, ctx, dt);
            }
        }
    }

    /// Validate attribute references and parameters against a schema of
    /// `attr_count` attributes.
    pub(crate) fn check(&self, attr_count: usize) -> CellResult<()> {
        match *self {
            Action::Die { .. }
            | Action::ChangeType { .. }
            | Action::Divide { .. }
            | Action::MoveRandomly
            | Action::MoveRandomly2D => Ok(()),
            Action::Admit { offset, .. } | Action::AdmitGradient { offset, .. } => {
                check_non_negative(offset, "admission offset")
            }
            Action::AdmitMult { offset, ref count, .. } => {
                check_positive(offset, "admission ring radius")?;
                count.check(attr_count)
            }
            Action::SecreteFixed { rate, .. } => {
                if rate == 0.0 {
                    return Err(CellError::InvalidRule(
                        "fixed secretion rate must be nonzero".into(),
                    ));
                }
                Ok(())
            }
            Action::SecreteVar { attr, .. } | Action::SecreteBurst { attr, .. } => {
                check_attr(attr, attr_count)
            }
            Action::Secrete { ref rate, .. } => rate.check(attr_count),
            Action::MoveChemotaxis { min_conc, radius, .. }
            | Action::MoveChemotaxis2D { min_conc, radius, .. } => {
                check_non_negative(min_conc, "concentration floor")?;
                check_positive(radius, "gradient sampling radius")
            }
            Action::Composite(ref a, ref b) => {
                a.check(attr_count)?;
                b.check(attr_count)
            }
        }
    }
}
