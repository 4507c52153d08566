//! The toroidal volume cells live in.
//!
//! Space is periodic on every axis: positions wrap modulo the extent, and
//! distances use the minimum-image convention so a cell near one face sees
//! cells near the opposite face as close neighbors.  When built with a
//! positive patch size the volume is additionally divided into a lattice of
//! cubic patches that the population manager uses to prune neighbor
//! searches; a patch size of zero means one well-mixed compartment with no
//! pruning.
//!
//! The patch lattice is coarser than the field engine's grid in most runs
//! and the two are configured independently.

use cyto_core::Vector3;

use crate::error::{CellError, CellResult};

/// Geometry of the periodic simulation volume, with an optional patch
/// lattice for neighbor pruning.
///
/// Plain `Copy` value, validated once at construction and immutable after.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Space {
    extent:     Vector3,
    patch_size: f64,
    nx:         usize,
    ny:         usize,
    nz:         usize,
}

impl Space {
    /// Validate and build the space.
    ///
    /// # Errors
    ///
    /// Rejects non-positive extents, a negative patch size, extents not
    /// evenly divisible by the patch size, and lattices with a thin x or
    /// y axis (under 3 patches) unless both are thin, in which case
    /// neighbor search degenerates to a full scan.  The z axis may be a
    /// single or double layer either way.
    pub fn new(extent: Vector3, patch_size: f64) -> CellResult<Self> {
        if !(extent.x > 0.0 && extent.y > 0.0 && extent.z > 0.0) {
            return Err(CellError::InvalidExtent(extent));
        }
        if patch_size < 0.0 {
            return Err(CellError::NegativePatchSize(patch_size));
        }

        if patch_size == 0.0 {
            // Well-mixed: one compartment, every cell neighbors every other.
            return Ok(Self {
                extent,
                patch_size,
                nx: 1,
                ny: 1,
                nz: 1,
            });
        }

        let split = |axis: char, range: f64| -> CellResult<usize> {
            if range % patch_size != 0.0 {
                return Err(CellError::Indivisible {
                    axis,
                    extent: range,
                    patch: patch_size,
                });
            }
            Ok((range / patch_size) as usize)
        };
        let nx = split('x', extent.x)?;
        let ny = split('y', extent.y)?;
        let nz = split('z', extent.z)?;

        if (nx < 3 && ny >= 3) || (nx >= 3 && ny < 3) {
            return Err(CellError::ThinPatchAxis { nx, ny });
        }

        Ok(Self {
            extent,
            patch_size,
            nx,
            ny,
            nz,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn extent(&self) -> Vector3 {
        self.extent
    }

    #[inline]
    pub fn patch_size(&self) -> f64 {
        self.patch_size
    }

    /// `true` when a patch lattice exists for neighbor pruning.
    #[inline]
    pub fn is_gridded(&self) -> bool {
        self.patch_size > 0.0
    }

    /// Patch lattice dimensions. `(1, 1, 1)` when well-mixed.
    #[inline]
    pub fn patch_dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// `true` when `pos` lies inside `[0, extent)` on every axis.
    #[inline]
    pub fn contains(&self, pos: Vector3) -> bool {
        pos.all_ge(Vector3::ZERO) && pos.all_lt(self.extent)
    }

    // ── Periodic metric ───────────────────────────────────────────────────

    /// Map a position into the primary volume by adding or subtracting
    /// whole extents.
    pub fn wrap(&self, mut pos: Vector3) -> Vector3 {
        while pos.x >= self.extent.x {
            pos.x -= self.extent.x;
        }
        while pos.x < 0.0 {
            pos.x += self.extent.x;
        }
        while pos.y >= self.extent.y {
            pos.y -= self.extent.y;
        }
        while pos.y < 0.0 {
            pos.y += self.extent.y;
        }
        while pos.z >= self.extent.z {
            pos.z -= self.extent.z;
        }
        while pos.z < 0.0 {
            pos.z += self.extent.z;
        }
        pos
    }

    /// Shortest periodic separation vector equivalent to the plain
    /// difference `d`.
    #[inline]
    pub fn min_image(&self, d: Vector3) -> Vector3 {
        Vector3::new(
            fold_axis(d.x, self.extent.x),
            fold_axis(d.y, self.extent.y),
            fold_axis(d.z, self.extent.z),
        )
    }

    /// Separation vector `to - from` under the minimum-image convention.
    #[inline]
    pub fn offset(&self, from: Vector3, to: Vector3) -> Vector3 {
        self.min_image(to - from)
    }

    /// Periodic distance between two wrapped positions.
    #[inline]
    pub fn distance(&self, a: Vector3, b: Vector3) -> f64 {
        self.min_image(b - a).length()
    }

    // ── Patch lookup ──────────────────────────────────────────────────────

    /// Patch lattice coordinates of a wrapped position.
    ///
    /// Meaningless for well-mixed spaces, which have a single patch.
    #[inline]
    pub fn patch_of(&self, pos: Vector3) -> (usize, usize, usize) {
        debug_assert!(self.is_gridded());
        debug_assert!(self.contains(pos), "position {pos} outside the volume");
        (
            (pos.x / self.patch_size) as usize,
            (pos.y / self.patch_size) as usize,
            (pos.z / self.patch_size) as usize,
        )
    }
}

/// Fold one axis of a separation onto its minimum image.  The wrapped
/// alternative `|d| - range` replaces `d` only when it is strictly shorter.
#[inline]
fn fold_axis(d: f64, range: f64) -> f64 {
    if (d.abs() - range).abs() < d.abs() {
        if d < 0.0 { d + range } else { d - range }
    } else {
        d
    }
}
