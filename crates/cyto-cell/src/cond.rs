//! Conditions: per-step predicates gating a cell's activities.
//!
//! A condition is asked once per timestep per live cell.  Threshold variants
//! are pure reads of the attribute vector; probabilistic variants draw from
//! the simulation RNG, scaling the configured per-unit-time probability by
//! the step length so event frequency is invariant under step refinement.

use cyto_core::{AttrId, SimRng};

use crate::error::{CellError, CellResult};
use crate::rate::{Rate, check_attr};

/// A boolean test over one cell's state.
#[derive(Clone, Debug, PartialEq)]
pub enum Cond {
    /// Fires with probability `p` per unit time.
    FixedProb(f64),
    /// Fires with a per-unit-time probability read from an attribute.
    VarProb(AttrId),
    /// True while the attribute is at or above a fixed threshold.
    AboveThr { attr: AttrId, threshold: f64 },
    /// True while the attribute is at or below a fixed threshold.
    BelowThr { attr: AttrId, threshold: f64 },
    /// True while `attr` is at or above the value of `threshold_attr`.
    AboveVar { attr: AttrId, threshold_attr: AttrId },
    /// True while `attr` is at or below the value of `threshold_attr`.
    BelowVar { attr: AttrId, threshold_attr: AttrId },
    /// Fires with a per-unit-time probability computed by a rate law.
    /// Rates at or below zero never fire; rates at or above one always do.
    CalcProb(Rate),
    /// Both sub-conditions hold. Short-circuits, so the right side draws no
    /// random numbers when the left side already failed.
    And(Box<Cond>, Box<Cond>),
    /// Either sub-condition holds.
    Or(Box<Cond>, Box<Cond>),
}

impl Cond {
    /// Evaluate for one cell over a step of length `dt`.
    pub fn test(&self, values: &[f64], dt: f64, rng: &mut SimRng) -> bool {
        match *self {
            Cond::FixedProb(p) => rng.bernoulli(p * dt),
            Cond::VarProb(attr) => rng.bernoulli(values[attr.index()] * dt),
            Cond::AboveThr { attr, threshold } => values[attr.index()] >= threshold,
            Cond::BelowThr { attr, threshold } => values[attr.index()] <= threshold,
            Cond::AboveVar { attr, threshold_attr } => {
                values[attr.index()] >= values[threshold_attr.index()]
            }
            Cond::BelowVar { attr, threshold_attr } => {
                values[attr.index()] <= values[threshold_attr.index()]
            }
            Cond::CalcProb(ref rate) => {
                let p = rate.eval(values);
                if p <= 0.0 {
                    false
                } else if p >= 1.0 {
                    true
                } else {
                    rng.bernoulli(p * dt)
                }
            }
            Cond::And(ref a, ref b) => a.test(values, dt, rng) && b.test(values, dt, rng),
            Cond::Or(ref a, ref b) => a.test(values, dt, rng) || b.test(values, dt, rng),
        }
    }

    /// Validate attribute references and probabilities against a schema of
    /// `attr_count` attributes.
    pub(crate) fn check(&self, attr_count: usize) -> CellResult<()> {
        match *self {
            Cond::FixedProb(p) => {
                if !(0.0..=1.0).contains(&p) {
                    return Err(CellError::InvalidRule(format!(
                        "fixed probability must lie in [0, 1], got {p}"
                    )));
                }
                Ok(())
            }
            Cond::VarProb(attr) => check_attr(attr, attr_count),
            Cond::AboveThr { attr, .. } | Cond::BelowThr { attr, .. } => {
                check_attr(attr, attr_count)
            }
            Cond::AboveVar { attr, threshold_attr }
            | Cond::BelowVar { attr, threshold_attr } => {
                check_attr(attr, attr_count)?;
                check_attr(threshold_attr, attr_count)
            }
            Cond::CalcProb(ref rate) => rate.check(attr_count),
            Cond::And(ref a, ref b) | Cond::Or(ref a, ref b) => {
                a.check(attr_count)?;
                b.check(attr_count)
            }
        }
    }
}
