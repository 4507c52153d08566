//! Distribution specifications for sampling attribute values.
//!
//! A cell type's schema attaches one [`Dist`] per attribute for cells
//! created by division and one for cells admitted from outside, so a fresh
//! daughter can inherit tight initial values while recruited cells arrive
//! with broader population-level variation.

use cyto_core::SimRng;

/// How one attribute value is drawn when a cell is created.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dist {
    /// Always the same value.
    Fixed(f64),
    /// Uniform on `[min, max)`.
    Uniform { min: f64, max: f64 },
    /// Normal with the given mean and standard deviation.
    Gaussian { mean: f64, sd: f64 },
    /// `exp` of a normal draw; `mean` and `sd` describe the underlying
    /// normal, not the resulting distribution.
    LogNormal { mean: f64, sd: f64 },
}

impl Dist {
    /// Draw one value.
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        match *self {
            Dist::Fixed(value) => value,
            Dist::Uniform { min, max } => (max - min) * rng.uniform() + min,
            Dist::Gaussian { mean, sd } => rng.gaussian(mean, sd),
            Dist::LogNormal { mean, sd } => rng.gaussian(mean, sd).exp(),
        }
    }
}

/// Zero, always. Attributes not given an explicit specification start flat.
impl Default for Dist {
    fn default() -> Self {
        Dist::Fixed(0.0)
    }
}
