//! The `Tissue` struct and its step loop.

use cyto_cell::{ActionTally, Population};
use cyto_core::{MolId, RngState, SimRng, Vector3};
use cyto_field::Molecule;
use rustc_hash::FxHashMap;

use crate::reset::ResetSchedule;
use crate::snapshot::{CellRecord, FieldRecord, TissueSnapshot};
use crate::{SimError, SimResult, TissueObserver};

/// The complete simulated system: molecular fields, the cell population,
/// the clock, and the RNG stream, advanced together one step at a time.
///
/// Each [`update`][Self::update] runs three phases in a fixed order:
///
/// 1. **Fields**: every field either fires a due [`ResetSchedule`] or takes
///    one diffusion and decay step.
/// 2. **Cells**: the population runs each live cell's rule pipeline in
///    shuffled order, sweeps the dead, moves the mobile, merges admissions.
/// 3. **Clock**: simulated time advances by `dt`.
///
/// Create via [`TissueBuilder`][crate::TissueBuilder].
#[derive(Debug)]
pub struct Tissue {
    /// Simulated seconds since the start of the run.
    pub(crate) time: f64,

    /// Molecular fields, indexed by `MolId` in registration order.
    pub(crate) fields: Vec<Molecule>,

    /// Field name → id, resolved once at build time.
    pub(crate) names: FxHashMap<String, MolId>,

    /// Per-field reset schedule, `None` for fields that only diffuse.
    pub(crate) resets: Vec<Option<ResetSchedule>>,

    /// Every cell, the type registry, and the patch index.
    pub(crate) population: Population,

    /// The run's single RNG stream.
    pub(crate) rng: SimRng,

    /// Event counters bumped by actions.
    pub(crate) tally: ActionTally,
}

impl Tissue {
    // ── Accessors ─────────────────────────────────────────────────────────

    /// Simulated seconds since the start of the run.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Reposition the clock, for resuming a run mid-stream.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Resolve a molecule name.
    ///
    /// # Errors
    ///
    /// Unknown names are configuration errors.
    pub fn mol_id(&self, name: &str) -> SimResult<MolId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| SimError::UnknownMolecule(name.to_string()))
    }

    #[inline]
    pub fn field(&self, id: MolId) -> &Molecule {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn field_mut(&mut self, id: MolId) -> &mut Molecule {
        &mut self.fields[id.index()]
    }

    #[inline]
    pub fn fields(&self) -> &[Molecule] {
        &self.fields
    }

    /// Fastest diffusion rate over all fields, for checking the caller's
    /// choice of time step against the explicit-scheme stability bound.
    /// Zero when no fields exist.
    pub fn max_diff_rate(&self) -> f64 {
        self.fields
            .iter()
            .map(Molecule::diffusion_rate)
            .fold(0.0, f64::max)
    }

    #[inline]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[inline]
    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    /// Split borrow for callers placing cells after construction: the
    /// placement routines sample from the run's own stream.
    pub fn population_and_rng(&mut self) -> (&mut Population, &mut SimRng) {
        (&mut self.population, &mut self.rng)
    }

    #[inline]
    pub fn tally(&self) -> &ActionTally {
        &self.tally
    }

    /// Whether `pos` lies inside the simulated volume.  Both faces count,
    /// so a coordinate equal to the extent is still in bounds.
    pub fn within_bounds(&self, pos: Vector3) -> bool {
        let extent = self.population.space().extent();
        pos.x >= 0.0
            && pos.x <= extent.x
            && pos.y >= 0.0
            && pos.y <= extent.y
            && pos.z >= 0.0
            && pos.z <= extent.z
    }

    // ── Reset schedules ───────────────────────────────────────────────────

    /// Install (or replace) a reset schedule on a named field.  The first
    /// firing comes one full interval after time zero, regardless of the
    /// current clock.
    ///
    /// # Errors
    ///
    /// The molecule must exist, `interval` must be positive, and `mean`
    /// must be non-negative.
    pub fn set_mol_reset(&mut self, name: &str, interval: f64, mean: f64, sd: f64) -> SimResult<()> {
        if interval <= 0.0 {
            return Err(SimError::ResetInterval { name: name.to_string(), interval });
        }
        if mean < 0.0 {
            return Err(SimError::NegativeMean { name: name.to_string(), mean });
        }
        let id = self.mol_id(name)?;
        self.resets[id.index()] = Some(ResetSchedule::new(interval, mean, sd));
        Ok(())
    }

    // ── Step loop ─────────────────────────────────────────────────────────

    /// Advance the whole system by one step of `dt` seconds.
    ///
    /// Fields resolve before cells act, so a cell's senses always read the
    /// concentrations this step's field phase produced; what cells secrete
    /// now is diffused, then sensed, on the next step.
    pub fn update(&mut self, dt: f64) {
        // ── Phase 1: fields ───────────────────────────────────────────────
        //
        // A due reset fires in place of the diffusion step and books its
        // next firing; everything else diffuses and decays.
        for (field, slot) in self.fields.iter_mut().zip(self.resets.iter_mut()) {
            match slot {
                Some(schedule) if schedule.due(self.time) => {
                    field.set_uniform_conc(schedule.mean(), schedule.sd(), &mut self.rng);
                    schedule.advance();
                }
                _ => field.update(dt),
            }
        }

        // ── Phase 2: cells ────────────────────────────────────────────────
        self.population
            .update(dt, &mut self.fields, &mut self.rng, &mut self.tally);

        // ── Phase 3: clock ────────────────────────────────────────────────
        self.time += dt;
    }

    /// Run `steps` consecutive updates of `dt` seconds each, invoking
    /// observer hooks at every step boundary.
    ///
    /// Use [`NoopObserver`][crate::NoopObserver] if you don't need
    /// callbacks.
    pub fn run_for<O: TissueObserver>(&mut self, steps: u64, dt: f64, observer: &mut O) {
        for _ in 0..steps {
            observer.on_step_start(self.time);
            self.update(dt);
            observer.on_step_end(self);
        }
        observer.on_run_end(self);
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    /// Capture the full current state: clock, live cells, fields, and the
    /// (process-local) RNG token.
    pub fn snapshot(&self) -> TissueSnapshot {
        let cells = self
            .population
            .live_cells()
            .map(|cell| CellRecord {
                type_name:  self.population.cell_type(cell.type_id()).name().to_string(),
                position:   cell.position(),
                velocity:   cell.velocity(),
                heading:    cell.direction(),
                attributes: cell.values().to_vec(),
            })
            .collect();
        let fields = self
            .fields
            .iter()
            .map(|field| FieldRecord {
                name:           field.name().to_string(),
                concentrations: field.concentrations(),
            })
            .collect();
        TissueSnapshot {
            time: self.time,
            cells,
            fields,
            rng: Some(self.rng.checkpoint()),
        }
    }

    /// Replace the whole state with a captured one.  The tissue must have
    /// been built with the same type registry and molecules.
    ///
    /// # Errors
    ///
    /// Unknown type or molecule names and mismatched grid lengths reject
    /// the snapshot.  The population is already cleared by then, so a
    /// failed restore leaves the tissue empty rather than half-mixed.
    pub fn restore(&mut self, snapshot: &TissueSnapshot) -> SimResult<()> {
        self.time = snapshot.time;
        self.restore_cells(&snapshot.cells)?;
        for record in &snapshot.fields {
            self.restore_field(record)?;
        }
        if let Some(state) = &snapshot.rng {
            self.rng.restore(state);
        }
        Ok(())
    }

    /// Drop every cell and admit the recorded ones with their exact state,
    /// bypassing the sampling distributions.
    ///
    /// # Errors
    ///
    /// Every record must name a registered type and carry the right number
    /// of attribute values.
    pub fn restore_cells(&mut self, records: &[CellRecord]) -> SimResult<()> {
        self.population.make_empty();
        for record in records {
            let id = self.population.type_id(&record.type_name)?;
            self.population.add_cell_exact(
                id,
                record.position,
                record.velocity,
                record.heading,
                record.attributes.clone(),
            )?;
        }
        self.population.merge_new();
        Ok(())
    }

    /// Overwrite one field's grid from a record.
    ///
    /// # Errors
    ///
    /// The record must name a registered molecule and match its grid size.
    pub fn restore_field(&mut self, record: &FieldRecord) -> SimResult<()> {
        let id = self.mol_id(&record.name)?;
        self.fields[id.index()].load_concentrations(&record.concentrations)?;
        Ok(())
    }

    // ── RNG ───────────────────────────────────────────────────────────────

    /// Snapshot the RNG stream for a later
    /// [`rng_restore`][Self::rng_restore].
    pub fn rng_checkpoint(&self) -> RngState {
        self.rng.checkpoint()
    }

    /// Rewind the RNG stream to a captured state.
    pub fn rng_restore(&mut self, state: &RngState) {
        self.rng.restore(state);
    }
}
