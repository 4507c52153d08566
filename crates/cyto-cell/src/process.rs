//! Processes: rules that evolve a cell's internal attributes.
//!
//! Processes run after senses and touch nothing outside the attribute
//! vector, apart from the birth-death variants reporting their event
//! counts.  Integration is forward Euler at the step length handed down
//! from the orchestrator.

use cyto_core::{AttrId, SimRng, TallyId};

use crate::cell::Cell;
use crate::cond::Cond;
use crate::error::{CellError, CellResult};
use crate::rate::{Rate, check_attr, check_non_negative};
use crate::tally::ActionTally;

/// An internal-state rule attached to a cell type.
#[derive(Clone, Debug, PartialEq)]
pub enum Process {
    /// Integrate: `attr += rate · dt`.
    Update { attr: AttrId, rate: Rate },
    /// Integrate, then clamp the result into `[min, max]`.
    UpdateBounded {
        attr: AttrId,
        rate: Rate,
        min:  f64,
        max:  f64,
    },
    /// Overwrite: `attr = rate`, with no timestep scaling.  Used to derive
    /// one attribute from others, e.g. a probability for a later condition.
    Replace { attr: AttrId, rate: Rate },
    /// Two-state switch between fixed values.  At `low`, the `rise`
    /// condition may flip the attribute to `high`; at `high`, `fall` may
    /// flip it back.
    ///
    /// # Panics
    ///
    /// Panics when the attribute holds neither value, which means some
    /// other rule wrote to a switch attribute.
    Toggle {
        attr: AttrId,
        low:  f64,
        high: f64,
        rise: Cond,
        fall: Cond,
    },
    /// [`Toggle`][Process::Toggle] with the two values read from other
    /// attributes instead of fixed.
    ToggleVar {
        attr:      AttrId,
        low_attr:  AttrId,
        high_attr: AttrId,
        rise:      Cond,
        fall:      Cond,
    },
    /// One step of a stochastic birth-death chain on a whole-numbered
    /// attribute: the count goes up by one with probability
    /// `n · birth_rate · dt`, down by one with probability
    /// `n · death_rate · dt`, else stays.
    ///
    /// # Panics
    ///
    /// Panics when `n · (birth_rate + death_rate) · dt` exceeds 1, since
    /// the two probabilities no longer fit one uniform draw.  Shrink the
    /// timestep.
    BirthDeath {
        attr:       AttrId,
        birth_rate: f64,
        death_rate: f64,
        births:     TallyId,
        deaths:     TallyId,
    },
    /// [`BirthDeath`][Process::BirthDeath] with per-cell rates read from
    /// attributes.  The caller is responsible for keeping those rates
    /// small enough for the timestep.
    BirthDeathVar {
        attr:       AttrId,
        birth_attr: AttrId,
        death_attr: AttrId,
        births:     TallyId,
        deaths:     TallyId,
    },
}

impl Process {
    /// Apply to one cell over a step of length `dt`.
    pub(crate) fn step(&self, cell: &mut Cell, dt: f64, rng: &mut SimRng, tally: &mut ActionTally) {
        match *self {
            Process::Update { attr, ref rate } => {
                let change = rate.eval(cell.values()) * dt;
                cell.set_value(attr, cell.value(attr) + change);
            }
            Process::UpdateBounded { attr, ref rate, min, max } => {
                let change = rate.eval(cell.values()) * dt;
                cell.set_value(attr, (cell.value(attr) + change).clamp(min, max));
            }
            Process::Replace { attr, ref rate } => {
                let value = rate.eval(cell.values());
                cell.set_value(attr, value);
            }
            Process::Toggle { attr, low, high, ref rise, ref fall } => {
                let current = cell.value(attr);
                if current == low {
                    if rise.test(cell.values(), dt, rng) {
                        cell.set_value(attr, high);
                    }
                } else if current == high {
                    if fall.test(cell.values(), dt, rng) {
                        cell.set_value(attr, low);
                    }
                } else {
                    panic!("switch attribute {attr} holds {current}, expected {low} or {high}");
                }
            }
            Process::ToggleVar { attr, low_attr, high_attr, ref rise, ref fall } => {
                let current = cell.value(attr);
                let low = cell.value(low_attr);
                let high = cell.value(high_attr);
                if current == low {
                    if rise.test(cell.values(), dt, rng) {
                        cell.set_value(attr, high);
                    }
                } else if current == high {
                    if fall.test(cell.values(), dt, rng) {
                        cell.set_value(attr, low);
                    }
                } else {
                    panic!("switch attribute {attr} holds {current}, expected {low} or {high}");
                }
            }
            Process::BirthDeath { attr, birth_rate, death_rate, births, deaths } => {
                birth_death(cell, attr, birth_rate, death_rate, births, deaths, dt, rng, tally);
            }
            Process::BirthDeathVar { attr, birth_attr, death_attr, births, deaths } => {
                let birth_rate = cell.value(birth_attr);
                let death_rate = cell.value(death_attr);
                birth_death(cell, attr, birth_rate, death_rate, births, deaths, dt, rng, tally);
            }
        }
    }

    /// Validate attribute references and parameters against a schema of
    /// `attr_count` attributes.
    pub(crate) fn check(&self, attr_count: usize) -> CellResult<()> {
        match *self {
            Process::Update { attr, ref rate } | Process::Replace { attr, ref rate } => {
                check_attr(attr, attr_count)?;
                rate.check(attr_count)
            }
            Process::UpdateBounded { attr, ref rate, min, max } => {
                check_attr(attr, attr_count)?;
                rate.check(attr_count)?;
                if min > max {
                    return Err(CellError::InvalidRule(format!(
                        "bounded update needs min <= max, got [{min}, {max}]"
                    )));
                }
                Ok(())
            }
            Process::Toggle { attr, ref rise, ref fall, .. } => {
                check_attr(attr, attr_count)?;
                rise.check(attr_count)?;
                fall.check(attr_count)
            }
            Process::ToggleVar { attr, low_attr, high_attr, ref rise, ref fall } => {
                check_attr(attr, attr_count)?;
                check_attr(low_attr, attr_count)?;
                check_attr(high_attr, attr_count)?;
                rise.check(attr_count)?;
                fall.check(attr_count)
            }
            Process::BirthDeath { attr, birth_rate, death_rate, .. } => {
                check_attr(attr, attr_count)?;
                check_non_negative(birth_rate, "birth rate")?;
                check_non_negative(death_rate, "death rate")
            }
            Process::BirthDeathVar { attr, birth_attr, death_attr, .. } => {
                check_attr(attr, attr_count)?;
                check_attr(birth_attr, attr_count)?;
                check_attr(death_attr, attr_count)
            }
        }
    }
}

/// Shared step for the two birth-death variants.
fn birth_death(
    cell: &mut Cell,
    attr: AttrId,
    birth_rate: f64,
    death_rate: f64,
    births: TallyId,
    deaths: TallyId,
    dt: f64,
    rng: &mut SimRng,
    tally: &mut ActionTally,
) {
    let n = cell.value(attr) as i64;
    let nf = n as f64;
    assert!(
        nf * (birth_rate + death_rate) * dt <= 1.0,
        "birth-death probabilities exceed 1 at n = {n}; use a smaller timestep"
    );

    let r = rng.uniform();
    if r < nf * birth_rate * dt {
        cell.set_value(attr, (n + 1) as f64);
        tally.bump(births);
    } else if r < nf * (birth_rate + death_rate) * dt {
        cell.set_value(attr, (n - 1) as f64);
        tally.bump(deaths);
    }
}
