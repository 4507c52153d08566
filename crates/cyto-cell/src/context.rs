//! Per-cell view of the population handed to running rules.
//!
//! While one cell runs its pipeline it is moved out of its slot, leaving a
//! dead placeholder behind.  The context bundles mutable access to
//! everything else a rule may touch.  Neighbor queries therefore anchor on
//! an explicit position (the running cell's) rather than on its slot, and
//! exclude the slot itself so the placeholder can never be its own target.

use cyto_core::{Grid3, SimRng, TypeId, Vector3};
use cyto_field::Molecule;

use crate::cell::Cell;
use crate::celltype::CellType;
use crate::population::{find_target, neighbor_of_type};
use crate::space::Space;
use crate::tally::ActionTally;

/// Mutable simulation state visible to one cell's rules for one step.
pub(crate) struct StepContext<'a> {
    /// Slot of the running cell. Its entry in `cells` is a placeholder.
    pub(crate) me:      usize,
    pub(crate) space:   Space,
    pub(crate) types:   &'a [CellType],
    pub(crate) cells:   &'a mut [Cell],
    pub(crate) pending: &'a mut Vec<Cell>,
    pub(crate) patches: Option<&'a Grid3<Vec<usize>>>,
    pub(crate) fields:  &'a mut [Molecule],
    pub(crate) rng:     &'a mut SimRng,
    pub(crate) tally:   &'a mut ActionTally,
}

impl StepContext<'_> {
    /// Queue a new cell for admission when the step's merge runs.
    ///
    /// The position is wrapped into the volume and the attribute vector is
    /// drawn from the type's birth distributions when `birth` is set, or
    /// its entry distributions otherwise.
    pub(crate) fn add_cell(&mut self, type_id: TypeId, pos: Vector3, birth: bool) {
        let pos = self.space.wrap(pos);
        let mut cell = Cell::new(type_id, pos);
        let types = self.types;
        let ty = &types[type_id.index()];
        if birth {
            ty.initialize_cell(&mut cell, self.rng);
        } else {
            ty.randomize_cell(&mut cell, self.rng);
        }
        self.pending.push(cell);
    }

    /// Pick one live cell within `max_dist` of `from`, or `None`.
    ///
    /// Candidates come from the surrounding patch neighborhood and are
    /// sampled at random (list-length attempts) so the answer is not biased
    /// by patch visiting order.  Reliable only for `max_dist` up to the
    /// patch size; beyond that, in-range cells two patches away are missed.
    pub(crate) fn get_target(&mut self, from: Vector3, max_dist: f64) -> Option<usize> {
        find_target(self.cells, self.patches, &self.space, from, self.me, max_dist, self.rng)
    }

    /// `true` when a live cell of type `ty` lies within `max_dist` of
    /// `from`.  Same patch-size reach limit as [`get_target`][Self::get_target].
    pub(crate) fn has_neighbor(&self, from: Vector3, max_dist: f64, ty: TypeId) -> bool {
        neighbor_of_type(self.cells, self.patches, &self.space, from, self.me, max_dist, ty)
    }
}
