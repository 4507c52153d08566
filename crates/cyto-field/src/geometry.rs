//! Shared field geometry.
//!
//! Every [`Molecule`][crate::Molecule] in a simulation discretizes the same
//! volume the same way, so the geometry is built once, validated once, and
//! handed to each field at construction.  It is a plain `Copy` value and is
//! never mutated afterwards.

use cyto_core::Vector3;

use crate::{FieldError, FieldResult};

/// Avogadro's number scaled for micron-cubed volumes in milliliters:
/// `6.022e23 / 1e12`.
const NAV_PER_UM3: f64 = 6.022e11;

/// Discretization of the simulation volume for molecular fields.
///
/// A `grid_size` of zero means one well-mixed compartment spanning the whole
/// volume; otherwise the volume is split into `nx × ny × nz` cubic cells of
/// `grid_size` microns per side.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldGeometry {
    extent:      Vector3,
    grid_size:   f64,
    nx:          usize,
    ny:          usize,
    nz:          usize,
    inv_nav_vol: f64,
}

impl FieldGeometry {
    /// Validate and build a geometry.
    ///
    /// # Errors
    ///
    /// Rejects non-positive extents, a negative grid size, and (when
    /// gridded) extents not evenly divisible by the grid size.
    pub fn new(extent: Vector3, grid_size: f64) -> FieldResult<Self> {
        if !(extent.x > 0.0 && extent.y > 0.0 && extent.z > 0.0) {
            return Err(FieldError::InvalidExtent(extent));
        }
        if grid_size < 0.0 {
            return Err(FieldError::NegativeGridSize(grid_size));
        }

        if grid_size == 0.0 {
            // Single well-mixed compartment; normalize by the whole volume.
            let inv_nav_vol = 1.0 / (NAV_PER_UM3 * extent.x * extent.y * extent.z);
            return Ok(Self {
                extent,
                grid_size,
                nx: 1,
                ny: 1,
                nz: 1,
                inv_nav_vol,
            });
        }

        let split = |axis: char, range: f64| -> FieldResult<usize> {
            if range % grid_size != 0.0 {
                return Err(FieldError::Indivisible {
                    axis,
                    extent: range,
                    gridsize: grid_size,
                });
            }
            Ok((range / grid_size) as usize)
        };
        let nx = split('x', extent.x)?;
        let ny = split('y', extent.y)?;
        let nz = split('z', extent.z)?;

        let inv_nav_vol = 1.0 / (NAV_PER_UM3 * grid_size * grid_size * grid_size);
        Ok(Self {
            extent,
            grid_size,
            nx,
            ny,
            nz,
            inv_nav_vol,
        })
    }

    #[inline]
    pub fn extent(&self) -> Vector3 {
        self.extent
    }

    #[inline]
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    #[inline]
    pub fn xsize(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ysize(&self) -> usize {
        self.ny
    }

    #[inline]
    pub fn zsize(&self) -> usize {
        self.nz
    }

    /// Total real-cell count.
    #[inline]
    pub fn size(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    #[inline]
    pub fn is_single_cell(&self) -> bool {
        self.size() == 1
    }

    /// Number of diffusive dimensions: 2 when the volume is one z-layer,
    /// else 3.  Drives the explicit-scheme stability bound.
    #[inline]
    pub fn dims(&self) -> usize {
        if self.nz == 1 { 2 } else { 3 }
    }

    /// Converts a molecule count to a concentration delta (moles/ml) for one
    /// grid cell: `1 / (6.022e11 · cellVolume_μm³)`.
    #[inline]
    pub fn inv_nav_vol(&self) -> f64 {
        self.inv_nav_vol
    }

    /// `true` when `pos` lies inside `[0, extent)` on every axis.
    #[inline]
    pub fn contains(&self, pos: Vector3) -> bool {
        pos.all_ge(Vector3::ZERO) && pos.all_lt(self.extent)
    }

    /// Guard-space indices (1-based real cells) of the grid cell containing
    /// `pos`.  Well-mixed geometries always map to `(1, 1, 1)`.
    #[inline]
    pub fn cell_index(&self, pos: Vector3) -> (usize, usize, usize) {
        if self.grid_size == 0.0 {
            return (1, 1, 1);
        }
        debug_assert!(self.contains(pos), "position {pos} outside the volume");
        let xi = (pos.x / self.grid_size + 1.0) as usize;
        let yi = (pos.y / self.grid_size + 1.0) as usize;
        let zi = (pos.z / self.grid_size + 1.0) as usize;
        (xi, yi, zi)
    }

    /// Fractional guard-space indices for trilinear interpolation.
    ///
    /// Cell values are stored at cell centers, so the stored point for real
    /// cell 1 sits at `grid_size/2`; the `+ 0.5` shift accounts for that.
    #[inline]
    pub fn frac_index(&self, pos: Vector3) -> (f64, f64, f64) {
        (
            pos.x / self.grid_size + 0.5,
            pos.y / self.grid_size + 0.5,
            pos.z / self.grid_size + 0.5,
        )
    }
}
