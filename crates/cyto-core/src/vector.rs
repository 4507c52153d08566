//! 3-component vector in simulation space.
//!
//! Positions, velocities, and headings are all `Vector3`s measured in
//! microns (or microns/second).  The type is a plain `Copy` value — cheap to
//! pass by value, no ownership semantics.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub};

use crate::rng::SimRng;

/// A 3-component `f64` vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to `other`.
    ///
    /// Ignores periodic wrapping — the population manager's minimum-image
    /// helpers handle wrapped distance.
    #[inline]
    pub fn dist(self, other: Vector3) -> f64 {
        (other - self).length()
    }

    /// Componentwise `>=` — all three components must hold.
    #[inline]
    pub fn all_ge(self, other: Vector3) -> bool {
        self.x >= other.x && self.y >= other.y && self.z >= other.z
    }

    /// Componentwise strict `<` — all three components must hold.
    #[inline]
    pub fn all_lt(self, other: Vector3) -> bool {
        self.x < other.x && self.y < other.y && self.z < other.z
    }

    /// Uniformly seeded heading: three independent uniforms in `[-1, 1]`
    /// rescaled to unit length.  No rejection step.
    pub fn random_unit(rng: &mut SimRng) -> Vector3 {
        let x = 2.0 * rng.uniform() - 1.0;
        let y = 2.0 * rng.uniform() - 1.0;
        let z = 2.0 * rng.uniform() - 1.0;
        let sf = 1.0 / (x * x + y * y + z * z).sqrt();
        Vector3::new(x * sf, y * sf, z * sf)
    }

    /// As [`random_unit`][Self::random_unit], confined to the xy-plane.
    pub fn random_unit_xy(rng: &mut SimRng) -> Vector3 {
        let x = 2.0 * rng.uniform() - 1.0;
        let y = 2.0 * rng.uniform() - 1.0;
        let sf = 1.0 / (x * x + y * y).sqrt();
        Vector3::new(x * sf, y * sf, 0.0)
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    #[inline]
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    #[inline]
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;
    #[inline]
    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl MulAssign<f64> for Vector3 {
    #[inline]
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
