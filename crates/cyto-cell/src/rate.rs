//! Rate laws: scalar functions of a cell's attribute vector.
//!
//! Rates are the shared vocabulary of the rule system.  Processes integrate
//! them, probabilistic conditions turn them into per-step event chances, and
//! secretion actions scale them into molecule output.  Each variant is a
//! closed-form expression over at most two attributes:
//!
//! ```text
//! Fixed          k
//! Var            x
//! Linear         a·x + b
//! ChoppedLinear  clamp(a·x + b, lo, hi)
//! Product        x·y
//! Saturating     m·x / (x + h)           Michaelis-Menten
//! Inhibiting     m·c / (x + c)           reciprocal saturation
//! RelSat         m·x / (x + w·y + h)     saturation shifted by a competitor
//! RelInh         m·c / (x + w·y + c)
//! Synergy        m·x(1 + w·y) / (x(1 + w·y) + c)
//! Sigmoid        1 / (1 + exp(-s·(x - t)))
//! Composite      r1 · r2
//! ```

use cyto_core::AttrId;

use crate::error::{CellError, CellResult};

/// A scalar function of one cell's attribute values.
#[derive(Clone, Debug, PartialEq)]
pub enum Rate {
    /// Constant, independent of the cell.
    Fixed(f64),
    /// The raw value of one attribute.
    Var(AttrId),
    /// Affine in one attribute.
    Linear { attr: AttrId, slope: f64, intercept: f64 },
    /// Affine, clamped into `[min, max]`.
    ChoppedLinear { attr: AttrId, slope: f64, intercept: f64, min: f64, max: f64 },
    /// Product of two attribute values.
    Product(AttrId, AttrId),
    /// Michaelis-Menten saturation in one attribute.
    Saturating { attr: AttrId, max_rate: f64, half_sat: f64 },
    /// Falls from `max_rate` toward zero as the attribute grows.
    Inhibiting { attr: AttrId, max_rate: f64, constant: f64 },
    /// Saturation in `attr`, with `other` raising the half-saturation point.
    RelSat { attr: AttrId, other: AttrId, max_rate: f64, half_sat: f64, weight: f64 },
    /// Inhibition in `attr`, with `other` deepening it.
    RelInh { attr: AttrId, other: AttrId, max_rate: f64, constant: f64, weight: f64 },
    /// Saturation in `attr` where `other` amplifies the input.
    Synergy { attr: AttrId, other: AttrId, max_rate: f64, constant: f64, weight: f64 },
    /// Logistic switch centered on `threshold`, in `(0, 1)`.
    Sigmoid { attr: AttrId, threshold: f64, steepness: f64 },
    /// Product of two sub-rates.
    Composite(Box<Rate>, Box<Rate>),
}

impl Rate {
    /// Evaluate against one cell's attribute vector.
    pub fn eval(&self, values: &[f64]) -> f64 {
        match *self {
            Rate::Fixed(k) => k,
            Rate::Var(attr) => values[attr.index()],
            Rate::Linear { attr, slope, intercept } => slope * values[attr.index()] + intercept,
            Rate::ChoppedLinear { attr, slope, intercept, min, max } => {
                (slope * values[attr.index()] + intercept).clamp(min, max)
            }
            Rate::Product(a, b) => values[a.index()] * values[b.index()],
            Rate::Saturating { attr, max_rate, half_sat } => {
                let x = values[attr.index()];
                max_rate * x / (x + half_sat)
            }
            Rate::Inhibiting { attr, max_rate, constant } => {
                let x = values[attr.index()];
                max_rate * constant / (x + constant)
            }
            Rate::RelSat { attr, other, max_rate, half_sat, weight } => {
                let x = values[attr.index()];
                let y = values[other.index()];
                max_rate * x / (x + weight * y + half_sat)
            }
            Rate::RelInh { attr, other, max_rate, constant, weight } => {
                let x = values[attr.index()];
                let y = values[other.index()];
                max_rate * constant / (x + weight * y + constant)
            }
            Rate::Synergy { attr, other, max_rate, constant, weight } => {
                let x = values[attr.index()];
                let boosted = x * (1.0 + weight * values[other.index()]);
                max_rate * boosted / (boosted + constant)
            }
            Rate::Sigmoid { attr, threshold, steepness } => {
                1.0 / (1.0 + (-steepness * (values[attr.index()] - threshold)).exp())
            }
            Rate::Composite(ref a, ref b) => a.eval(values) * b.eval(values),
        }
    }

    /// Validate attribute references and parameters against a schema of
    /// `attr_count` attributes.
    pub(crate) fn check(&self, attr_count: usize) -> CellResult<()> {
        match *self {
            Rate::Fixed(_) => Ok(()),
            Rate::Var(attr) => check_attr(attr, attr_count),
            Rate::Linear { attr, .. } => check_attr(attr, attr_count),
            Rate::ChoppedLinear { attr, min, max, .. } => {
                check_attr(attr, attr_count)?;
                if min > max {
                    return Err(CellError::InvalidRule(format!(
                        "chopped linear rate needs min <= max, got [{min}, {max}]"
                    )));
                }
                Ok(())
            }
            Rate::Product(a, b) => {
                check_attr(a, attr_count)?;
                check_attr(b, attr_count)
            }
            Rate::Saturating { attr, half_sat, .. } => {
                check_attr(attr, attr_count)?;
                check_positive(half_sat, "half-saturation constant")
            }
            Rate::Inhibiting { attr, constant, .. } => {
                check_attr(attr, attr_count)?;
                check_positive(constant, "inhibition constant")
            }
            Rate::RelSat { attr, other, half_sat, .. } => {
                check_attr(attr, attr_count)?;
                check_attr(other, attr_count)?;
                check_positive(half_sat, "half-saturation constant")
            }
            Rate::RelInh { attr, other, constant, .. } => {
                check_attr(attr, attr_count)?;
                check_attr(other, attr_count)?;
                check_positive(constant, "inhibition constant")
            }
            Rate::Synergy { attr, other, constant, .. } => {
                check_attr(attr, attr_count)?;
                check_attr(other, attr_count)?;
                check_positive(constant, "half-saturation constant")
            }
            Rate::Sigmoid { attr, .. } => check_attr(attr, attr_count),
            Rate::Composite(ref a, ref b) => {
                a.check(attr_count)?;
                b.check(attr_count)
            }
        }
    }
}

/// Reject attribute references outside a schema of `count` attributes.
pub(crate) fn check_attr(attr: AttrId, count: usize) -> CellResult<()> {
    if attr.index() >= count {
        return Err(CellError::InvalidRule(format!(
            "rule references {attr} but the cell type declares {count} attributes"
        )));
    }
    Ok(())
}

/// Reject non-positive constants that sit in a denominator.
pub(crate) fn check_positive(value: f64, what: &str) -> CellResult<()> {
    if value <= 0.0 {
        return Err(CellError::InvalidRule(format!("{what} must be positive, got {value}")));
    }
    Ok(())
}

/// Reject negative kinetic parameters.
pub(crate) fn check_non_negative(value: f64, what: &str) -> CellResult<()> {
    if value < 0.0 {
        return Err(CellError::InvalidRule(format!("{what} must be non-negative, got {value}")));
    }
    Ok(())
}
