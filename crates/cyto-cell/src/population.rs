//! The population manager: type registry, agent storage, patch index, and
//! the per-step update sweep.
//!
//! # Storage
//!
//! ```text
//!              ┌───────────────────────────────┐
//!   cells      │ slot 0 │ slot 1 │ slot 2 │ …  │  live list, slots recycled
//!              └───────────────────────────────┘
//!   pending    │ queued admissions             │  invisible until merge_new
//!              └───────────────────────────────┘
//!   patches    Grid3<Vec<usize>>                  slot lists per cubic patch
//! ```
//!
//! The patch index stores slot numbers, so the dead sweep re-points entries
//! when it compacts the live list, and the visitation shuffle permutes a
//! separate order vector rather than the list itself.
//!
//! # Step anatomy
//!
//! ```text
//! update(dt):  shuffle order → pipeline per live cell → remove_dead
//!              → move_cells (gridded only) → merge_new
//! ```

use std::mem;

use cyto_core::{AttrId, Grid3, SimRng, TypeId, Vector3};
use cyto_field::Molecule;
use rustc_hash::FxHashMap;

use crate::cell::Cell;
use crate::celltype::CellType;
use crate::context::StepContext;
use crate::error::{CellError, CellResult};
use crate::space::Space;
use crate::tally::ActionTally;

/// Contact repulsion scale in microns/second.  Cancels a 2 micron/minute
/// head-on approach exactly when two cells touch and pushes harder as they
/// overlap.
const PUSH_SPEED: f64 = 0.03;

/// Row spacing of hexagonal packing, in radii: `(1 + sin 30°)/cos 30°`.
const HEX_ROW_SPACE: f64 = 1.732;

/// All cells in one simulation volume, with their type definitions.
#[derive(Debug)]
pub struct Population {
    space: Space,
    types: Vec<CellType>,
    names: FxHashMap<String, TypeId>,

    // ── Agent storage ─────────────────────────────────────────────────────
    cells:   Vec<Cell>,
    pending: Vec<Cell>,
    patches: Option<Grid3<Vec<usize>>>,
}

impl Population {
    /// An empty population over the given space.
    pub fn new(space: Space) -> Self {
        let patches = if space.is_gridded() {
            let (nx, ny, nz) = space.patch_dims();
            Some(Grid3::new(nx, ny, nz))
        } else {
            None
        };
        Self {
            space,
            types: Vec::new(),
            names: FxHashMap::default(),
            cells: Vec::new(),
            pending: Vec::new(),
            patches,
        }
    }

    // ── Type registry ─────────────────────────────────────────────────────

    /// Register a cell type and return its index.
    ///
    /// # Errors
    ///
    /// Rejects a second type with an already-registered name.
    pub fn add_type(&mut self, ty: CellType) -> CellResult<TypeId> {
        if self.names.contains_key(ty.name()) {
            return Err(CellError::DuplicateType(ty.name().to_string()));
        }
        let id = TypeId(self.types.len() as u16);
        self.names.insert(ty.name().to_string(), id);
        self.types.push(ty);
        Ok(id)
    }

    /// Resolve a type name.
    ///
    /// # Errors
    ///
    /// Unknown names are configuration errors.
    pub fn type_id(&self, name: &str) -> CellResult<TypeId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| CellError::UnknownType(name.to_string()))
    }

    #[inline]
    pub fn cell_type(&self, id: TypeId) -> &CellType {
        &self.types[id.index()]
    }

    #[inline]
    pub fn types(&self) -> &[CellType] {
        &self.types
    }

    #[inline]
    pub fn space(&self) -> Space {
        self.space
    }

    /// Largest body radius over all registered types, for viewport sizing.
    /// Zero when no types exist.
    pub fn largest_radius(&self) -> f64 {
        self.types.iter().map(CellType::radius).fold(0.0, f64::max)
    }

    // ── Reporting accessors ───────────────────────────────────────────────

    /// Raw slot view.  May contain dead-but-unswept cells mid-step; filter
    /// on the alive flag.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All live cells.
    pub fn live_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.live_cells().count()
    }

    /// Live cells of one type.
    pub fn count_of(&self, ty: TypeId) -> usize {
        self.live_cells().filter(|c| c.type_id() == ty).count()
    }

    /// Sum of one attribute over live cells of one type.
    pub fn attribute_total(&self, ty: TypeId, attr: AttrId) -> f64 {
        self.live_cells()
            .filter(|c| c.type_id() == ty)
            .map(|c| c.value(attr))
            .sum()
    }

    /// Cells queued for the next merge.
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    // ── Admission ─────────────────────────────────────────────────────────

    /// Queue a new cell of a registered type.
    ///
    /// The position wraps into the volume.  `birth` selects the birth
    /// distributions (daughter cells) over the entry distributions
    /// (immigrating cells).  The cell joins the live list at the next
    /// [`merge_new`][Self::merge_new].
    pub fn add_cell(&mut self, type_id: TypeId, pos: Vector3, birth: bool, rng: &mut SimRng) {
        let pos = self.space.wrap(pos);
        let mut cell = Cell::new(type_id, pos);
        let ty = &self.types[type_id.index()];
        if birth {
            ty.initialize_cell(&mut cell, rng);
        } else {
            ty.randomize_cell(&mut cell, rng);
        }
        self.pending.push(cell);
    }

    /// As [`add_cell`][Self::add_cell], resolving the type by name.
    ///
    /// # Errors
    ///
    /// Unknown names are configuration errors.
    pub fn add_cell_named(
        &mut self,
        name: &str,
        pos: Vector3,
        birth: bool,
        rng: &mut SimRng,
    ) -> CellResult<()> {
        let id = self.type_id(name)?;
        self.add_cell(id, pos, birth, rng);
        Ok(())
    }

    /// Queue a cell with explicit state, bypassing the sampling
    /// distributions.  Restore path for snapshots.
    ///
    /// # Errors
    ///
    /// The value vector must match the type's declared attribute count.
    pub fn add_cell_exact(
        &mut self,
        type_id: TypeId,
        pos: Vector3,
        velocity: Vector3,
        heading: Vector3,
        values: Vec<f64>,
    ) -> CellResult<()> {
        let ty = &self.types[type_id.index()];
        if values.len() != ty.attribute_count() {
            return Err(CellError::AttributeCount {
                type_name: ty.name().to_string(),
                expected:  ty.attribute_count(),
                got:       values.len(),
            });
        }
        let mut cell = Cell::new(type_id, self.space.wrap(pos));
        cell.set_velocity(velocity);
        cell.set_direction(heading);
        cell.set_attributes(values);
        self.pending.push(cell);
        Ok(())
    }

    /// Drop every cell, live and pending, keeping the type registry.
    pub fn make_empty(&mut self) {
        self.cells.clear();
        self.pending.clear();
        if let Some(patches) = &mut self.patches {
            for list in patches.as_mut_slice() {
                list.clear();
            }
        }
    }

    // ── Bulk placement ────────────────────────────────────────────────────
    // Setup-time lattice fills.  All resolve the type by name, seed cells
    // from the entry distributions, and merge the pending list themselves.

    /// Square lattice filling one z-plane, step 2·radius, first center at
    /// (radius, radius).
    pub fn add_cell_sheet(&mut self, name: &str, z: f64, rng: &mut SimRng) -> CellResult<()> {
        self.check_plane(z)?;
        let id = self.type_id(name)?;
        let radius = self.types[id.index()].radius();
        let diameter = 2.0 * radius;
        let extent = self.space.extent();

        let mut x = radius;
        while x < extent.x {
            let mut y = radius;
            while y < extent.y {
                self.add_cell(id, Vector3::new(x, y, z), false, rng);
                y += diameter;
            }
            x += diameter;
        }
        self.merge_new();
        Ok(())
    }

    /// Hexagonal-packing lattice filling one z-plane: rows 1.732·radius
    /// apart, every other row offset by one radius.
    pub fn add_cell_hex_sheet(&mut self, name: &str, z: f64, rng: &mut SimRng) -> CellResult<()> {
        self.check_plane(z)?;
        let id = self.type_id(name)?;
        let radius = self.types[id.index()].radius();
        let diameter = 2.0 * radius;
        let extent = self.space.extent();

        let mut odd = true;
        let mut x = radius;
        while x < extent.x {
            let mut y = if odd { radius } else { diameter };
            while y < extent.y {
                self.add_cell(id, Vector3::new(x, y, z), false, rng);
                y += diameter;
            }
            odd = !odd;
            x += HEX_ROW_SPACE * radius;
        }
        self.merge_new();
        Ok(())
    }

    /// Hexagonal lattice of two interleaved types: each site is `first`
    /// with probability `fraction`, else `second`.
    ///
    /// # Errors
    ///
    /// The two types must share one radius, or the lattice spacing would be
    /// ill-defined.
    pub fn add_cell_hex_mix(
        &mut self,
        first: &str,
        second: &str,
        fraction: f64,
        z: f64,
        rng: &mut SimRng,
    ) -> CellResult<()> {
        self.check_plane(z)?;
        let id1 = self.type_id(first)?;
        let id2 = self.type_id(second)?;
        let radius = self.check_radii(id1, id2)?;
        let diameter = 2.0 * radius;
        let extent = self.space.extent();

        let mut odd = true;
        let mut x = radius;
        while x < extent.x {
            let mut y = if odd { radius } else { diameter };
            while y < extent.y {
                let id = if rng.uniform() < fraction { id1 } else { id2 };
                self.add_cell(id, Vector3::new(x, y, z), false, rng);
                y += diameter;
            }
            odd = !odd;
            x += HEX_ROW_SPACE * radius;
        }
        self.merge_new();
        Ok(())
    }

    /// Cells along the grid lines of a cubic lattice with cell size
    /// `spacing` microns: a candidate site survives when its x or y offset
    /// from the first center is a whole multiple of `spacing`.
    ///
    /// # Panics
    ///
    /// Panics when `spacing` is zero.
    pub fn add_cell_grid(&mut self, name: &str, spacing: u32, rng: &mut SimRng) -> CellResult<()> {
        assert!(spacing > 0, "grid spacing must be nonzero");
        let id = self.type_id(name)?;
        let radius = self.types[id.index()].radius();
        let diameter = 2.0 * radius;
        let extent = self.space.extent();

        let mut x = radius;
        while x < extent.x {
            let mut y = radius;
            while y < extent.y {
                let mut z = radius;
                while z < extent.z {
                    if on_line(x, radius, spacing) || on_line(y, radius, spacing) {
                        self.add_cell(id, Vector3::new(x, y, z), false, rng);
                    }
                    z += diameter;
                }
                y += diameter;
            }
            x += diameter;
        }
        self.merge_new();
        Ok(())
    }

    /// As [`add_cell_grid`][Self::add_cell_grid], but grid corners (x, y,
    /// and z offsets all multiples of `spacing`) get the `corner` type.
    ///
    /// # Errors
    ///
    /// The two types must share one radius.
    ///
    /// # Panics
    ///
    /// Panics when `spacing` is zero.
    pub fn add_cell_mixed_grid(
        &mut self,
        wall: &str,
        corner: &str,
        spacing: u32,
        rng: &mut SimRng,
    ) -> CellResult<()> {
        assert!(spacing > 0, "grid spacing must be nonzero");
        let id1 = self.type_id(wall)?;
        let id2 = self.type_id(corner)?;
        let radius = self.check_radii(id1, id2)?;
        let diameter = 2.0 * radius;
        let extent = self.space.extent();

        let mut x = radius;
        while x < extent.x {
            let mut y = radius;
            while y < extent.y {
                let mut z = radius;
                while z < extent.z {
                    if on_line(x, radius, spacing)
                        && on_line(y, radius, spacing)
                        && on_line(z, radius, spacing)
                    {
                        self.add_cell(id2, Vector3::new(x, y, z), false, rng);
                    } else if on_line(x, radius, spacing) || on_line(y, radius, spacing) {
                        self.add_cell(id1, Vector3::new(x, y, z), false, rng);
                    }
                    z += diameter;
                }
                y += diameter;
            }
            x += diameter;
        }
        self.merge_new();
        Ok(())
    }

    /// Planar version of [`add_cell_grid`][Self::add_cell_grid], all cells
    /// at the given z.
    ///
    /// # Panics
    ///
    /// Panics when `spacing` is zero.
    pub fn add_cell_grid_2d(
        &mut self,
        name: &str,
        spacing: u32,
        z: f64,
        rng: &mut SimRng,
    ) -> CellResult<()> {
        assert!(spacing > 0, "grid spacing must be nonzero");
        self.check_plane(z)?;
        let id = self.type_id(name)?;
        let radius = self.types[id.index()].radius();
        let diameter = 2.0 * radius;
        let extent = self.space.extent();

        let mut x = radius;
        while x < extent.x {
            let mut y = radius;
            while y < extent.y {
                if on_line(x, radius, spacing) || on_line(y, radius, spacing) {
                    self.add_cell(id, Vector3::new(x, y, z), false, rng);
                }
                y += diameter;
            }
            x += diameter;
        }
        self.merge_new();
        Ok(())
    }

    /// `count` cells uniformly distributed over the whole volume.
    pub fn add_cell_randomly(
        &mut self,
        name: &str,
        count: usize,
        rng: &mut SimRng,
    ) -> CellResult<()> {
        let id = self.type_id(name)?;
        let extent = self.space.extent();
        for _ in 0..count {
            let pos = Vector3::new(
                extent.x * rng.uniform(),
                extent.y * rng.uniform(),
                extent.z * rng.uniform(),
            );
            self.add_cell(id, pos, false, rng);
        }
        self.merge_new();
        Ok(())
    }

    /// `count` cells uniformly distributed over one z-plane.
    pub fn add_cell_randomly_2d(
        &mut self,
        name: &str,
        count: usize,
        z: f64,
        rng: &mut SimRng,
    ) -> CellResult<()> {
        self.check_plane(z)?;
        let id = self.type_id(name)?;
        let extent = self.space.extent();
        for _ in 0..count {
            let pos = Vector3::new(extent.x * rng.uniform(), extent.y * rng.uniform(), z);
            self.add_cell(id, pos, false, rng);
        }
        self.merge_new();
        Ok(())
    }

    fn check_plane(&self, z: f64) -> CellResult<()> {
        let extent = self.space.extent().z;
        if !(0.0..extent).contains(&z) {
            return Err(CellError::PlaneOutOfRange { z, extent });
        }
        Ok(())
    }

    fn check_radii(&self, a: TypeId, b: TypeId) -> CellResult<f64> {
        let first = &self.types[a.index()];
        let second = &self.types[b.index()];
        if first.radius() != second.radius() {
            return Err(CellError::RadiusMismatch {
                first:  first.name().to_string(),
                second: second.name().to_string(),
            });
        }
        Ok(first.radius())
    }

    // ── Neighbor queries ──────────────────────────────────────────────────

    /// Slots of all cells in the patch neighborhood around `slot`,
    /// excluding `slot` itself.  May include dead-but-unswept cells.
    pub fn neighbors(&self, slot: usize, out: &mut Vec<usize>) {
        gather_neighbors(
            &self.cells,
            self.patches.as_ref(),
            &self.space,
            self.cells[slot].position(),
            slot,
            out,
        );
    }

    /// One randomly sampled live cell within `max_dist` of `slot`, or
    /// `None`.  Reliable only for `max_dist` up to the patch size.
    pub fn random_target(&self, slot: usize, max_dist: f64, rng: &mut SimRng) -> Option<usize> {
        find_target(
            &self.cells,
            self.patches.as_ref(),
            &self.space,
            self.cells[slot].position(),
            slot,
            max_dist,
            rng,
        )
    }

    /// `true` when a live cell of type `ty` lies within `max_dist` of
    /// `slot`.  Same reach limit as [`random_target`][Self::random_target].
    pub fn has_neighbor(&self, slot: usize, max_dist: f64, ty: TypeId) -> bool {
        neighbor_of_type(
            &self.cells,
            self.patches.as_ref(),
            &self.space,
            self.cells[slot].position(),
            slot,
            max_dist,
            ty,
        )
    }

    // ── Step phases ───────────────────────────────────────────────────────

    /// Move pending cells into the live list and index them.  Runs inside
    /// [`update`][Self::update]; call directly only from setup code.
    pub fn merge_new(&mut self) {
        let start = self.cells.len();
        self.cells.append(&mut self.pending);
        if let Some(patches) = &mut self.patches {
            for slot in start..self.cells.len() {
                let (i, j, k) = self.space.patch_of(self.cells[slot].position());
                patches.at_mut(i, j, k).push(slot);
            }
        }
    }

    /// Compact dead cells out of the live list.
    ///
    /// Removal swaps the last cell into the freed slot, so the survivor's
    /// patch entry is re-pointed at its new slot and the swapped-in cell is
    /// re-examined before the index advances.
    pub fn remove_dead(&mut self) {
        let mut i = 0;
        while i < self.cells.len() {
            if self.cells[i].is_alive() {
                i += 1;
                continue;
            }
            let last = self.cells.len() - 1;
            if let Some(patches) = &mut self.patches {
                let (x, y, z) = self.space.patch_of(self.cells[i].position());
                unlist_slot(patches.at_mut(x, y, z), i);
                if i != last {
                    let (x, y, z) = self.space.patch_of(self.cells[last].position());
                    repoint_slot(patches.at_mut(x, y, z), last, i);
                }
            }
            self.cells.swap_remove(i);
        }
    }

    /// Advance every mobile cell by one step.
    ///
    /// Pass 1 fixes each mobile cell's velocity from its heading plus the
    /// contact pushes of overlapping neighbors, reading only pre-move
    /// positions so the result does not depend on sweep order.  Pass 2
    /// applies the motion under periodic wrap and re-indexes cells whose
    /// patch changed.
    fn move_cells(&mut self, dt: f64) {
        let Population { space, types, cells, patches, .. } = self;

        for slot in 0..cells.len() {
            let ty = &types[cells[slot].type_id().index()];
            if ty.speed() == 0.0 {
                continue;
            }
            let mut vnet = cells[slot].direction() * ty.speed();
            vnet += contact_push(cells, types, patches.as_ref(), space, slot, ty.radius());
            cells[slot].set_velocity(vnet);
        }

        for slot in 0..cells.len() {
            if types[cells[slot].type_id().index()].speed() == 0.0 {
                continue;
            }
            let old = cells[slot].position();
            let pos = space.wrap(old + cells[slot].velocity() * dt);
            cells[slot].set_position(pos);

            if let Some(patches) = patches.as_mut() {
                let (oi, oj, ok) = space.patch_of(old);
                let (ni, nj, nk) = space.patch_of(pos);
                if (oi, oj, ok) != (ni, nj, nk) {
                    unlist_slot(patches.at_mut(oi, oj, ok), slot);
                    patches.at_mut(ni, nj, nk).push(slot);
                }
            }
        }
    }

    /// Advance the whole population by one step: run the rule pipeline for
    /// every live cell in shuffled order, sweep the dead, move mobile
    /// cells (gridded spaces only), and merge admissions.
    pub fn update(
        &mut self,
        dt: f64,
        fields: &mut [Molecule],
        rng: &mut SimRng,
        tally: &mut ActionTally,
    ) {
        let mut order: Vec<usize> = (0..self.cells.len()).collect();
        if order.len() > 1 {
            rng.shuffle(&mut order);
        }

        // Split borrow: the running cell is taken out of its slot while
        // everything else is packaged into its step context.
        let Population { space, types, cells, pending, patches, .. } = self;
        let types: &[CellType] = types;
        for &slot in &order {
            if !cells[slot].is_alive() {
                continue;
            }
            let mut cell = mem::take(&mut cells[slot]);
            let ty = &types[cell.type_id().index()];
            let mut ctx = StepContext {
                me: slot,
                space: *space,
                types,
                cells: cells.as_mut_slice(),
                pending: &mut *pending,
                patches: patches.as_ref(),
                fields: &mut *fields,
                rng: &mut *rng,
                tally: &mut *tally,
            };
            ty.update(&mut cell, &mut ctx, dt);
            cells[slot] = cell;
        }

        self.remove_dead();
        if self.space.is_gridded() {
            self.move_cells(dt);
        }
        self.merge_new();
    }
}

// ── Neighborhood walk ─────────────────────────────────────────────────────

/// Collect the slots of all cells in the 27-patch neighborhood around
/// `anchor`, excluding `exclude`.
///
/// Without a patch index, or when every axis has at most 3 patches, all
/// cells are neighbors.  Dead-but-unswept cells are included; callers
/// filter on the alive flag.
pub(crate) fn gather_neighbors(
    cells: &[Cell],
    patches: Option<&Grid3<Vec<usize>>>,
    space: &Space,
    anchor: Vector3,
    exclude: usize,
    out: &mut Vec<usize>,
) {
    let (nx, ny, nz) = space.patch_dims();
    let patches = match patches {
        Some(patches) if nx > 3 || ny > 3 || nz > 3 => patches,
        _ => {
            out.extend((0..cells.len()).filter(|&slot| slot != exclude));
            return;
        }
    };

    let (ci, cj, ck) = space.patch_of(anchor);
    let (xs, xn) = axis_candidates(ci, nx);
    let (ys, yn) = axis_candidates(cj, ny);
    let (zs, zn) = axis_candidates(ck, nz);
    for &i in &xs[..xn] {
        for &j in &ys[..yn] {
            for &k in &zs[..zn] {
                for &slot in patches.at(i, j, k) {
                    if slot != exclude {
                        out.push(slot);
                    }
                }
            }
        }
    }
}

/// Candidate patch indices along one axis of the neighborhood walk.
///
/// An axis with at most 3 patches contributes all of them, since wrapping
/// a 3-window around a shorter axis would visit a patch twice.  Longer
/// axes contribute the wrapped window around `center`.
fn axis_candidates(center: usize, n: usize) -> ([usize; 3], usize) {
    if n <= 3 {
        ([0, 1, 2], n)
    } else {
        let lo = if center == 0 { n - 1 } else { center - 1 };
        let hi = if center + 1 == n { 0 } else { center + 1 };
        ([lo, center, hi], 3)
    }
}

/// Random-sampling target search over the neighborhood of `anchor`.
///
/// Samples a uniformly random list index per attempt, list-length attempts
/// in all, so the pick is not biased by patch traversal order.
pub(crate) fn find_target(
    cells: &[Cell],
    patches: Option<&Grid3<Vec<usize>>>,
    space: &Space,
    anchor: Vector3,
    exclude: usize,
    max_dist: f64,
    rng: &mut SimRng,
) -> Option<usize> {
    let mut list = Vec::new();
    gather_neighbors(cells, patches, space, anchor, exclude, &mut list);

    for _ in 0..list.len() {
        let slot = list[(rng.uniform() * list.len() as f64) as usize];
        let cand = &cells[slot];
        if cand.is_alive() && space.distance(anchor, cand.position()) <= max_dist {
            return Some(slot);
        }
    }
    None
}

/// Linear existence scan for a live cell of one type near `anchor`.
pub(crate) fn neighbor_of_type(
    cells: &[Cell],
    patches: Option<&Grid3<Vec<usize>>>,
    space: &Space,
    anchor: Vector3,
    exclude: usize,
    max_dist: f64,
    ty: TypeId,
) -> bool {
    let mut list = Vec::new();
    gather_neighbors(cells, patches, space, anchor, exclude, &mut list);

    list.iter().any(|&slot| {
        let cand = &cells[slot];
        cand.is_alive()
            && cand.type_id() == ty
            && space.distance(anchor, cand.position()) <= max_dist
    })
}

/// Net contact-repulsion velocity on `slot` from overlapping neighbors.
fn contact_push(
    cells: &[Cell],
    types: &[CellType],
    patches: Option<&Grid3<Vec<usize>>>,
    space: &Space,
    slot: usize,
    radius: f64,
) -> Vector3 {
    let mut push = Vector3::ZERO;
    let mut list = Vec::new();
    gather_neighbors(cells, patches, space, cells[slot].position(), slot, &mut list);

    for &other in &list {
        let d = space.offset(cells[other].position(), cells[slot].position());
        let mag = d.length();
        if mag == 0.0 {
            continue;
        }
        let dir = d * (1.0 / mag);
        let r = mag / (radius + types[cells[other].type_id().index()].radius());
        if r < 1.0 {
            push += dir * (PUSH_SPEED * (2.0 - r));
        }
    }
    push
}

/// `true` when `coord` sits on a lattice line: its offset from the first
/// cell center is a whole multiple of `spacing`.  Fractional offsets
/// truncate, matching integer-micron lattice geometry.
fn on_line(coord: f64, radius: f64, spacing: u32) -> bool {
    (coord - radius) as i64 % i64::from(spacing) == 0
}

// ── Patch index maintenance ───────────────────────────────────────────────

/// Remove one slot entry from a patch list.
fn unlist_slot(list: &mut Vec<usize>, slot: usize) {
    match list.iter().position(|&s| s == slot) {
        Some(at) => {
            list.swap_remove(at);
        }
        None => debug_assert!(false, "slot {slot} missing from its patch list"),
    }
}

/// Re-point the patch entry of a cell moved from slot `from` to `to`.
fn repoint_slot(list: &mut [usize], from: usize, to: usize) {
    match list.iter().position(|&s| s == from) {
        Some(at) => list[at] = to,
        None => debug_assert!(false, "slot {from} missing from its patch list"),
    }
}
