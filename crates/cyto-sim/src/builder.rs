//! Fluent builder for constructing a [`Tissue`].

use cyto_cell::{ActionTally, CellType, Population, Space};
use cyto_core::{MolId, SimRng, Vector3};
use cyto_field::{FieldGeometry, Molecule};
use rustc_hash::FxHashMap;

use crate::reset::ResetSchedule;
use crate::{SimError, SimResult, Tissue};

// ── Molecule spec ─────────────────────────────────────────────────────────────

/// Declarative description of one molecular field, consumed by
/// [`TissueBuilder::add_molecule`].
///
/// # Example
///
/// ```rust,ignore
/// MoleculeSpec::new("IL-2")
///     .diffusion(80.0)
///     .decay(1e-4)
///     .initial_conc(1e-10, 0.0)
/// ```
#[derive(Clone, Debug)]
pub struct MoleculeSpec {
    name:      String,
    diffusion: f64,
    decay:     f64,
    initial:   Option<(f64, f64)>,
    reset:     Option<(f64, f64, f64)>,
}

impl MoleculeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        MoleculeSpec {
            name:      name.into(),
            diffusion: 0.0,
            decay:     0.0,
            initial:   None,
            reset:     None,
        }
    }

    /// Diffusion rate in microns²/sec.
    pub fn diffusion(mut self, rate: f64) -> Self {
        self.diffusion = rate;
        self
    }

    /// Decay rate as a fraction per second.
    pub fn decay(mut self, rate: f64) -> Self {
        self.decay = rate;
        self
    }

    /// Start the field at `mean` moles/ml everywhere, with Gaussian noise
    /// of standard deviation `sd`.
    pub fn initial_conc(mut self, mean: f64, sd: f64) -> Self {
        self.initial = Some((mean, sd));
        self
    }

    /// Re-initialize the field to `mean` ± `sd` every `interval` seconds,
    /// in place of that step's diffusion pass.
    pub fn reset(mut self, interval: f64, mean: f64, sd: f64) -> Self {
        self.reset = Some((interval, mean, sd));
        self
    }
}

// ── Placement commands ────────────────────────────────────────────────────────

/// One initial-placement command, executed by [`TissueBuilder::build`] in
/// declaration order, after every type is registered.
///
/// Variants mirror the [`Population`] placement suite; see those methods
/// for the exact lattice geometry.
#[derive(Clone, Debug)]
pub enum Placement {
    /// A single cell at a fixed position (wrapped into the volume).
    One { type_name: String, pos: Vector3 },
    /// A square lattice filling one z-plane at cell-diameter spacing.
    Sheet { type_name: String, z: f64 },
    /// A hexagonal-packing lattice filling one z-plane.
    HexSheet { type_name: String, z: f64 },
    /// A hex lattice choosing `first` per site with probability `fraction`,
    /// else `second`.  The two types must share one radius.
    HexMix { first: String, second: String, fraction: f64, z: f64 },
    /// A cubic close-packed block thinned to the walls of `spacing`-micron
    /// lattice cells.
    Grid { type_name: String, spacing: u32 },
    /// As [`Grid`][Placement::Grid], with lattice-cell corners taking the
    /// `corner` type instead.
    MixedGrid { wall: String, corner: String, spacing: u32 },
    /// Planar version of [`Grid`][Placement::Grid], all cells at the
    /// given z.
    Grid2d { type_name: String, spacing: u32, z: f64 },
    /// `count` cells uniformly distributed over the whole volume.
    Randomly { type_name: String, count: usize },
    /// `count` cells uniformly distributed over one z-plane.
    Randomly2d { type_name: String, count: usize, z: f64 },
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`Tissue`].
///
/// # Required inputs
///
/// - the simulated extent in microns (every axis positive)
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                                  |
/// |------------------|------------------------------------------|
/// | `.grid_size(g)`  | `0.0` — every field is well-mixed        |
/// | `.patch_size(p)` | `0.0` — no patch lattice, no motion      |
/// | `.seed(s)`       | `0`                                      |
/// | `.tally(t)`      | an empty [`ActionTally`]                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut tissue = TissueBuilder::new(Vector3::new(200.0, 200.0, 50.0))
///     .grid_size(10.0)
///     .patch_size(10.0)
///     .seed(7)
///     .add_molecule(MoleculeSpec::new("attractant").diffusion(50.0))
///     .add_cell_type(macrophage)
///     .place(Placement::Randomly { type_name: "macrophage".into(), count: 200 })
///     .build()?;
/// ```
pub struct TissueBuilder {
    extent:     Vector3,
    grid_size:  f64,
    patch_size: f64,
    seed:       u64,
    molecules:  Vec<MoleculeSpec>,
    types:      Vec<CellType>,
    placements: Vec<Placement>,
    tally:      ActionTally,
}

impl TissueBuilder {
    /// Create a builder for a volume of the given extent (microns).
    pub fn new(extent: Vector3) -> Self {
        TissueBuilder {
            extent,
            grid_size:  0.0,
            patch_size: 0.0,
            seed:       0,
            molecules:  Vec::new(),
            types:      Vec::new(),
            placements: Vec::new(),
            tally:      ActionTally::new(),
        }
    }

    /// Field grid resolution in microns.  `0` keeps every field well-mixed.
    pub fn grid_size(mut self, size: f64) -> Self {
        self.grid_size = size;
        self
    }

    /// Cell patch resolution in microns.  `0` disables the patch lattice:
    /// neighbor queries scan everyone and nothing moves.
    pub fn patch_size(mut self, size: f64) -> Self {
        self.patch_size = size;
        self
    }

    /// Seed for the run's single RNG stream.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Register one molecular field.  Ids follow call order.
    pub fn add_molecule(mut self, spec: MoleculeSpec) -> Self {
        self.molecules.push(spec);
        self
    }

    /// Register one cell type.  Ids follow call order.
    pub fn add_cell_type(mut self, ty: CellType) -> Self {
        self.types.push(ty);
        self
    }

    /// Queue an initial-placement command.
    pub fn place(mut self, placement: Placement) -> Self {
        self.placements.push(placement);
        self
    }

    /// Supply the tally the rule constructors registered their counters on.
    pub fn tally(mut self, tally: ActionTally) -> Self {
        self.tally = tally;
        self
    }

    /// Validate everything and produce a ready [`Tissue`] at time zero.
    ///
    /// # Errors
    ///
    /// Invalid geometry, duplicate or malformed molecule specs, duplicate
    /// type names, and placement references to unknown types are all
    /// configuration errors.
    pub fn build(self) -> SimResult<Tissue> {
        let geometry = FieldGeometry::new(self.extent, self.grid_size)?;
        let space = Space::new(self.extent, self.patch_size)?;
        let mut rng = SimRng::new(self.seed);

        // ── Fields ────────────────────────────────────────────────────────
        let mut fields = Vec::with_capacity(self.molecules.len());
        let mut names = FxHashMap::default();
        let mut resets = Vec::with_capacity(self.molecules.len());
        for spec in self.molecules {
            if names.contains_key(&spec.name) {
                return Err(SimError::DuplicateMolecule(spec.name));
            }
            let mut field = Molecule::new(spec.name.as_str(), &geometry);
            field.set_diffusion_rate(spec.diffusion)?;
            field.set_decay_rate(spec.decay)?;
            if let Some((mean, sd)) = spec.initial {
                if mean < 0.0 {
                    return Err(SimError::NegativeMean { name: spec.name, mean });
                }
                field.set_uniform_conc(mean, sd, &mut rng);
            }
            resets.push(match spec.reset {
                Some((interval, mean, sd)) => {
                    if interval <= 0.0 {
                        return Err(SimError::ResetInterval { name: spec.name, interval });
                    }
                    if mean < 0.0 {
                        return Err(SimError::NegativeMean { name: spec.name, mean });
                    }
                    Some(ResetSchedule::new(interval, mean, sd))
                }
                None => None,
            });
            names.insert(spec.name, MolId(fields.len() as u16));
            fields.push(field);
        }

        // ── Population ────────────────────────────────────────────────────
        let mut population = Population::new(space);
        for ty in self.types {
            population.add_type(ty)?;
        }
        for placement in self.placements {
            run_placement(&mut population, placement, &mut rng)?;
        }
        population.merge_new();

        Ok(Tissue {
            time: 0.0,
            fields,
            names,
            resets,
            population,
            rng,
            tally: self.tally,
        })
    }
}

fn run_placement(
    population: &mut Population,
    placement: Placement,
    rng: &mut SimRng,
) -> SimResult<()> {
    match placement {
        Placement::One { type_name, pos } => {
            population.add_cell_named(&type_name, pos, false, rng)?;
        }
        Placement::Sheet { type_name, z } => {
            population.add_cell_sheet(&type_name, z, rng)?;
        }
        Placement::HexSheet { type_name, z } => {
            population.add_cell_hex_sheet(&type_name, z, rng)?;
        }
        Placement::HexMix { first, second, fraction, z } => {
            population.add_cell_hex_mix(&first, &second, fraction, z, rng)?;
        }
        Placement::Grid { type_name, spacing } => {
            population.add_cell_grid(&type_name, spacing, rng)?;
        }
        Placement::MixedGrid { wall, corner, spacing } => {
            population.add_cell_mixed_grid(&wall, &corner, spacing, rng)?;
        }
        Placement::Grid2d { type_name, spacing, z } => {
            population.add_cell_grid_2d(&type_name, spacing, z, rng)?;
        }
        Placement::Randomly { type_name, count } => {
            population.add_cell_randomly(&type_name, count, rng)?;
        }
        Placement::Randomly2d { type_name, count, z } => {
            population.add_cell_randomly_2d(&type_name, count, z, rng)?;
        }
    }
    Ok(())
}
