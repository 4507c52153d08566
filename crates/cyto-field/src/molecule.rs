//! Per-molecule concentration field under diffusion and decay.
//!
//! Concentrations (moles/ml) live on a dense grid with one guard cell per
//! face.  Guard entries mirror the wrapped real cells, so the explicit
//! diffusion stencil reads neighbors without any modulo arithmetic; the cost
//! moves to a guard refresh after each mutation.
//!
//! Index convention: real cells occupy `[1..=n]` on each axis, guards sit at
//! `0` and `n + 1`.

use cyto_core::{Grid3, SimRng, Vector3};

use crate::{FieldError, FieldGeometry, FieldResult};

/// Molecules per mole.
const AVOGADRO: f64 = 6.022e23;

/// Maps a guard-cube index to the real cell it mirrors (identity for real
/// indices).
#[inline]
fn mirror(idx: usize, n: usize) -> usize {
    if idx == 0 {
        n
    } else if idx == n + 1 {
        1
    } else {
        idx
    }
}

/// Guard images of a real index: itself, plus the opposite-face guard(s) it
/// is mirrored into.  A 1-cell axis yields both guards.
#[inline]
fn images(idx: usize, n: usize) -> ([usize; 3], usize) {
    let mut out = [idx; 3];
    let mut len = 1;
    if idx == 1 {
        out[len] = n + 1;
        len += 1;
    }
    if idx == n {
        out[len] = 0;
        len += 1;
    }
    (out, len)
}

// ── Molecule ──────────────────────────────────────────────────────────────────

/// One diffusible molecular species and its concentration field.
#[derive(Debug)]
pub struct Molecule {
    name:           String,
    diffusion_rate: f64, // microns²/sec
    decay_rate:     f64, // fraction/sec
    geometry:       FieldGeometry,
    conc:           Grid3<f64>,
    delta:          Grid3<f64>, // scratch for the explicit scheme
}

impl Molecule {
    /// A field with zero diffusion and decay; concentrations start at zero.
    pub fn new(name: impl Into<String>, geometry: &FieldGeometry) -> Self {
        let (nx, ny, nz) = (geometry.xsize(), geometry.ysize(), geometry.zsize());
        Self {
            name:           name.into(),
            diffusion_rate: 0.0,
            decay_rate:     0.0,
            geometry:       *geometry,
            conc:           Grid3::new(nx + 2, ny + 2, nz + 2),
            delta:          Grid3::new(nx + 2, ny + 2, nz + 2),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn diffusion_rate(&self) -> f64 {
        self.diffusion_rate
    }

    #[inline]
    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    #[inline]
    pub fn geometry(&self) -> &FieldGeometry {
        &self.geometry
    }

    /// Set the diffusion rate in microns²/sec.
    pub fn set_diffusion_rate(&mut self, rate: f64) -> FieldResult<()> {
        if rate < 0.0 {
            return Err(FieldError::NegativeRate {
                name: self.name.clone(),
                what: "diffusion",
                rate,
            });
        }
        self.diffusion_rate = rate;
        Ok(())
    }

    /// Set the decay rate as a fraction per second.
    pub fn set_decay_rate(&mut self, rate: f64) -> FieldResult<()> {
        if rate < 0.0 {
            return Err(FieldError::NegativeRate {
                name: self.name.clone(),
                what: "decay",
                rate,
            });
        }
        self.decay_rate = rate;
        Ok(())
    }

    // ── Mutation ──────────────────────────────────────────────────────────────

    /// Set every real cell to `mean` (moles/ml), optionally with Gaussian
    /// noise of standard deviation `sd`.  Negative draws are re-sampled.
    pub fn set_uniform_conc(&mut self, mean: f64, sd: f64, rng: &mut SimRng) {
        assert!(mean >= 0.0, "uniform concentration must be non-negative");

        if sd > 0.0 {
            let (nx, ny, nz) = self.real_sizes();
            for i in 1..=nx {
                for j in 1..=ny {
                    for k in 1..=nz {
                        let c = loop {
                            let c = rng.gaussian(mean, sd);
                            if c >= 0.0 {
                                break c;
                            }
                        };
                        *self.conc.at_mut(i, j, k) = c;
                    }
                }
            }
            self.refresh_guards();
        } else {
            // Writing guards too keeps them consistent without a refresh.
            self.conc.fill(mean);
        }
    }

    /// Add (or with a negative `amount`, remove) a number of molecules at
    /// the grid cell nearest `pos`.
    ///
    /// The count converts to a concentration delta via the geometry's
    /// normalization constant.  Removing more than is present is a
    /// parameterization error and panics.
    pub fn change_conc(&mut self, amount: f64, pos: Vector3) {
        let (xi, yi, zi) = self.geometry.cell_index(pos);
        let change = amount * self.geometry.inv_nav_vol();
        let cell = self.conc.at_mut(xi, yi, zi);
        *cell += change;
        assert!(
            *cell >= 0.0,
            "concentration of {:?} driven negative at {pos}",
            self.name
        );

        if self.geometry.grid_size() > 0.0 {
            self.set_specific_guards(xi, yi, zi);
        }
    }

    /// Advance the field by `dt` seconds.
    ///
    /// Decay-only fields (and single-cell grids) scale in place.  Diffusive
    /// fields run the explicit scheme in `⌊2·dims·D·dt/dx²⌋ + 1` equal
    /// sub-steps so that each sub-step satisfies the stability bound
    /// `dt ≤ dx²/(2·dims·D)`.
    pub fn update(&mut self, dt: f64) {
        if self.diffusion_rate == 0.0 || self.geometry.is_single_cell() {
            if self.decay_rate != 0.0 {
                self.decay(dt);
            }
            return;
        }

        let g = self.geometry.grid_size();
        let dims = self.geometry.dims() as f64;
        let num_steps = (2.0 * dims * self.diffusion_rate * dt / (g * g)) as usize + 1;
        let sub = dt / num_steps as f64;
        for _ in 0..num_steps {
            if self.geometry.dims() == 2 {
                self.explicit_step_2d(sub);
            } else {
                self.explicit_step_3d(sub);
            }
        }
    }

    /// Exponential decay over every cell, guards included (guards scale in
    /// lockstep with the cells they mirror, so no refresh is needed).
    fn decay(&mut self, dt: f64) {
        let factor = self.decay_rate * dt;
        assert!(factor < 1.0, "decay·dt = {factor} ≥ 1 would empty the field in one step");
        for v in self.conc.as_mut_slice() {
            *v -= factor * *v;
        }
    }

    /// One explicit diffusion+decay sub-step on a single-layer volume
    /// (4-neighbor stencil).
    fn explicit_step_2d(&mut self, dt: f64) {
        let (nx, ny, _) = self.real_sizes();
        let decay_factor = self.decay_rate * dt;
        assert!(decay_factor < 1.0);
        let g = self.geometry.grid_size();
        let diff_factor = self.diffusion_rate * dt / (g * g);

        // All deltas from a read-only snapshot, then apply, so no cell ever
        // sees a half-updated neighbor.
        for i in 1..=nx {
            for j in 1..=ny {
                let current = *self.conc.at(i, j, 1);
                let mut sum = 0.0;
                sum += self.conc.at(i - 1, j, 1) - current;
                sum += self.conc.at(i + 1, j, 1) - current;
                sum += self.conc.at(i, j - 1, 1) - current;
                sum += self.conc.at(i, j + 1, 1) - current;
                *self.delta.at_mut(i, j, 1) = diff_factor * sum - decay_factor * current;
            }
        }

        for i in 1..=nx {
            for j in 1..=ny {
                let v = self.conc.at_mut(i, j, 1);
                *v += *self.delta.at(i, j, 1);
                assert!(*v >= 0.0, "negative concentration after diffusion step");
            }
        }

        self.refresh_guards();
    }

    /// One explicit diffusion+decay sub-step on a full 3D volume
    /// (6-neighbor stencil).
    fn explicit_step_3d(&mut self, dt: f64) {
        let (nx, ny, nz) = self.real_sizes();
        let decay_factor = self.decay_rate * dt;
        assert!(decay_factor < 1.0);
        let g = self.geometry.grid_size();
        let diff_factor = self.diffusion_rate * dt / (g * g);

        for i in 1..=nx {
            for j in 1..=ny {
                for k in 1..=nz {
                    let current = *self.conc.at(i, j, k);
                    let mut sum = 0.0;
                    sum += self.conc.at(i - 1, j, k) - current;
                    sum += self.conc.at(i + 1, j, k) - current;
                    sum += self.conc.at(i, j - 1, k) - current;
                    sum += self.conc.at(i, j + 1, k) - current;
                    sum += self.conc.at(i, j, k - 1) - current;
                    sum += self.conc.at(i, j, k + 1) - current;
                    *self.delta.at_mut(i, j, k) = diff_factor * sum - decay_factor * current;
                }
            }
        }

        for i in 1..=nx {
            for j in 1..=ny {
                for k in 1..=nz {
                    let v = self.conc.at_mut(i, j, k);
                    *v += *self.delta.at(i, j, k);
                    assert!(*v >= 0.0, "negative concentration after diffusion step");
                }
            }
        }

        self.refresh_guards();
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Concentration of the grid cell containing `pos` (no interpolation).
    #[inline]
    pub fn conc_at(&self, pos: Vector3) -> f64 {
        let (xi, yi, zi) = self.geometry.cell_index(pos);
        *self.conc.at(xi, yi, zi)
    }

    /// Trilinearly interpolated concentration at `pos`.
    ///
    /// Stored values sit at cell centers, so interpolation is valid up to
    /// half a grid cell outside the nominal volume — gradient sampling near
    /// a boundary depends on that slack.
    pub fn interp_conc(&self, pos: Vector3) -> f64 {
        if self.geometry.is_single_cell() {
            return *self.conc.at(1, 1, 1);
        }

        let half = 0.5 * self.geometry.grid_size();
        let ext = self.geometry.extent();
        debug_assert!(
            pos.x >= -half && pos.x < ext.x + half,
            "x = {} outside interpolation range",
            pos.x
        );
        debug_assert!(pos.y >= -half && pos.y < ext.y + half);
        debug_assert!(pos.z >= -half && pos.z < ext.z + half);

        let (fx, fy, fz) = self.geometry.frac_index(pos);
        self.conc.interpolate(fx, fy, fz)
    }

    /// Central-difference concentration gradient at `pos`, sampling
    /// `pos ± r` along each axis.
    ///
    /// `r` must be in `(0, gridSize/2]` so the samples stay within the
    /// interpolation range.  Single-layer volumes get a zero z-component;
    /// single-cell grids have no gradient at all.
    pub fn gradient(&self, pos: Vector3, r: f64) -> Vector3 {
        if self.geometry.is_single_cell() {
            return Vector3::ZERO;
        }

        debug_assert!(self.geometry.contains(pos), "position {pos} outside the volume");
        assert!(
            r > 0.0 && r <= self.geometry.grid_size() / 2.0,
            "sampling radius {r} outside (0, gridSize/2]"
        );

        let gx = self.interp_conc(pos + Vector3::new(r, 0.0, 0.0))
            - self.interp_conc(pos + Vector3::new(-r, 0.0, 0.0));
        let gy = self.interp_conc(pos + Vector3::new(0.0, r, 0.0))
            - self.interp_conc(pos + Vector3::new(0.0, -r, 0.0));
        let gz = if self.geometry.zsize() > 1 {
            self.interp_conc(pos + Vector3::new(0.0, 0.0, r))
                - self.interp_conc(pos + Vector3::new(0.0, 0.0, -r))
        } else {
            0.0
        };

        Vector3::new(gx, gy, gz) * (1.0 / (2.0 * r))
    }

    /// Mean concentration over the real cells.
    pub fn avg_conc(&self) -> f64 {
        let (nx, ny, nz) = self.real_sizes();
        let mut total = 0.0;
        for i in 1..=nx {
            for j in 1..=ny {
                for k in 1..=nz {
                    total += self.conc.at(i, j, k);
                }
            }
        }
        total / self.geometry.size() as f64
    }

    /// Number of molecules of this species in `volume_ml` milliliters
    /// centered at `pos`, truncated to a whole count.
    pub fn molecule_count(&self, volume_ml: f64, pos: Vector3) -> u64 {
        (AVOGADRO * self.conc_at(pos) * volume_ml) as u64
    }

    // ── Bulk load/save ────────────────────────────────────────────────────────

    /// Real-cell concentrations flattened in `(x, y, z)` nested order.
    pub fn concentrations(&self) -> Vec<f64> {
        let (nx, ny, nz) = self.real_sizes();
        let mut out = Vec::with_capacity(self.geometry.size());
        for i in 1..=nx {
            for j in 1..=ny {
                for k in 1..=nz {
                    out.push(*self.conc.at(i, j, k));
                }
            }
        }
        out
    }

    /// Load real-cell concentrations from a flat slice in `(x, y, z)` nested
    /// order, then rebuild the guard layer.
    pub fn load_concentrations(&mut self, values: &[f64]) -> FieldResult<()> {
        if values.len() != self.geometry.size() {
            return Err(FieldError::DataLength {
                expected: self.geometry.size(),
                got:      values.len(),
            });
        }

        let (nx, ny, nz) = self.real_sizes();
        let mut it = values.iter();
        for i in 1..=nx {
            for j in 1..=ny {
                for k in 1..=nz {
                    *self.conc.at_mut(i, j, k) = *it.next().unwrap_or(&0.0);
                }
            }
        }
        self.refresh_guards();
        Ok(())
    }

    // ── Guard maintenance ─────────────────────────────────────────────────────

    #[inline]
    fn real_sizes(&self) -> (usize, usize, usize) {
        (
            self.geometry.xsize(),
            self.geometry.ysize(),
            self.geometry.zsize(),
        )
    }

    /// Rewrite every guard entry (faces, edges, corners) from the real cell
    /// it mirrors.
    fn refresh_guards(&mut self) {
        let (nx, ny, nz) = self.real_sizes();
        for i in 0..nx + 2 {
            for j in 0..ny + 2 {
                for k in 0..nz + 2 {
                    let (si, sj, sk) = (mirror(i, nx), mirror(j, ny), mirror(k, nz));
                    if (si, sj, sk) != (i, j, k) {
                        let v = *self.conc.at(si, sj, sk);
                        *self.conc.at_mut(i, j, k) = v;
                    }
                }
            }
        }
    }

    /// Propagate one changed real cell to the guard entries that mirror it
    /// (up to 7, depending on how many boundary faces it touches).
    fn set_specific_guards(&mut self, i: usize, j: usize, k: usize) {
        let (nx, ny, nz) = self.real_sizes();
        debug_assert!((1..=nx).contains(&i) && (1..=ny).contains(&j) && (1..=nz).contains(&k));

        let value = *self.conc.at(i, j, k);
        let (xs, xn) = images(i, nx);
        let (ys, yn) = images(j, ny);
        let (zs, zn) = images(k, nz);

        for &ii in &xs[..xn] {
            for &jj in &ys[..yn] {
                for &kk in &zs[..zn] {
                    if (ii, jj, kk) != (i, j, k) {
                        *self.conc.at_mut(ii, jj, kk) = value;
                    }
                }
            }
        }
    }
}
