//! One simulated cell: position, motion state, alive flag, and the numeric
//! attribute vector its [`CellType`](crate::CellType) schema interprets.
//!
//! A cell has no stable identity. Its identity is its slot in the
//! population's live list, and slots are recycled by the dead sweep, so
//! nothing outside the population may hold a slot across a timestep.

use cyto_core::{AttrId, TypeId, Vector3};

/// A single agent.
///
/// Attribute values are meaningless without the owning [`CellType`]'s
/// schema: the type declares how many attributes exist and what each index
/// means. The population guarantees `attributes.len()` always equals the
/// type's declared count.
///
/// [`CellType`]: crate::CellType
#[derive(Clone, Debug)]
pub struct Cell {
    type_id:    TypeId,
    pos:        Vector3,
    velocity:   Vector3,
    direction:  Vector3,
    alive:      bool,
    attributes: Vec<f64>,
}

impl Cell {
    /// A live cell of the given type at `pos`, with no attributes yet.
    ///
    /// The type's initialization routine sizes and fills the attribute
    /// vector immediately after construction.
    pub fn new(type_id: TypeId, pos: Vector3) -> Self {
        debug_assert!(type_id != TypeId::INVALID);
        Self {
            type_id,
            pos,
            velocity:   Vector3::ZERO,
            direction:  Vector3::ZERO,
            alive:      true,
            attributes: Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn position(&self) -> Vector3 {
        self.pos
    }

    #[inline]
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    /// The cell's chosen heading. Distinct from the normalized velocity
    /// whenever contact forces push the cell off its heading.
    #[inline]
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Value of one attribute.
    #[inline]
    pub fn value(&self, attr: AttrId) -> f64 {
        debug_assert!(
            attr.index() < self.attributes.len(),
            "attribute {attr} out of range for a cell with {} attributes",
            self.attributes.len()
        );
        self.attributes[attr.index()]
    }

    /// The whole attribute vector, in declared order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.attributes
    }

    // ── Manipulators ──────────────────────────────────────────────────────

    #[inline]
    pub fn set_type_id(&mut self, type_id: TypeId) {
        debug_assert!(type_id != TypeId::INVALID);
        self.type_id = type_id;
    }

    #[inline]
    pub fn set_position(&mut self, pos: Vector3) {
        self.pos = pos;
    }

    #[inline]
    pub fn set_velocity(&mut self, v: Vector3) {
        self.velocity = v;
    }

    #[inline]
    pub fn set_direction(&mut self, d: Vector3) {
        self.direction = d;
    }

    #[inline]
    pub fn set_value(&mut self, attr: AttrId, value: f64) {
        debug_assert!(
            attr.index() < self.attributes.len(),
            "attribute {attr} out of range for a cell with {} attributes",
            self.attributes.len()
        );
        self.attributes[attr.index()] = value;
    }

    /// Resize the attribute vector to `count` zeros, discarding old values.
    pub fn reset_attributes(&mut self, count: usize) {
        self.attributes.clear();
        self.attributes.resize(count, 0.0);
    }

    /// Install an explicit attribute vector (bulk load path).
    pub(crate) fn set_attributes(&mut self, values: Vec<f64>) {
        self.attributes = values;
    }

    /// Mark the cell dead. It stays in place until the next dead sweep so
    /// that in-flight slot references this step remain valid.
    #[inline]
    pub fn die(&mut self) {
        self.alive = false;
    }
}

/// The placeholder left in a slot while its cell runs the rule pipeline.
/// Dead and typeless, so every query filtering on the alive flag skips it.
impl Default for Cell {
    fn default() -> Self {
        Self {
            type_id:    TypeId::INVALID,
            pos:        Vector3::ZERO,
            velocity:   Vector3::ZERO,
            direction:  Vector3::ZERO,
            alive:      false,
            attributes: Vec::new(),
        }
    }
}
