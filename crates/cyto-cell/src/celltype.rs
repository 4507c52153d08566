//! Cell type schemas: shared traits and behavior for all cells of a kind.
//!
//! A `CellType` declares the attribute schema its cells carry and the four
//! rule lists that run against each live cell every step, in a fixed order:
//!
//! ```text
//! senses          read the environment into attributes
//! processes       evolve internal state
//! unconditionals  actions that always run
//! activities      condition-gated actions
//! ```
//!
//! Senses and processes always run to completion.  Actions can kill the
//! cell, so the action stages re-check the alive flag before every entry
//! and stop at the first dead read.

use cyto_core::{AttrId, SimRng, Vector3};

use crate::action::Action;
use crate::cell::Cell;
use crate::cond::Cond;
use crate::context::StepContext;
use crate::dist::Dist;
use crate::error::{CellError, CellResult};
use crate::process::Process;
use crate::sense::Sense;

/// One attribute column: a name plus the two sampling distributions.
#[derive(Clone, Debug)]
struct AttributeDef {
    name:  String,
    birth: Dist,
    entry: Dist,
}

/// Schema and behavior shared by every cell of one type.
#[derive(Clone, Debug)]
pub struct CellType {
    name:   String,
    radius: f64,
    speed:  f64,

    // ── Attribute schema ──────────────────────────────────────────────────
    attributes: Vec<AttributeDef>,

    // ── Rule lists, in pipeline order ─────────────────────────────────────
    senses:         Vec<Sense>,
    processes:      Vec<Process>,
    unconditionals: Vec<Action>,
    activities:     Vec<(Cond, Action)>,
}

impl CellType {
    /// A new type with the default radius of 5 microns and no motility.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:           name.into(),
            radius:         5.0,
            speed:          0.0,
            attributes:     Vec::new(),
            senses:         Vec::new(),
            processes:      Vec::new(),
            unconditionals: Vec::new(),
            activities:     Vec::new(),
        }
    }

    // ── Configuration ─────────────────────────────────────────────────────

    /// Cell body radius in microns, used for placement and contact forces.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    /// Unimpeded crawl speed in microns/second.  Nonzero speed makes cells
    /// of this type mobile and gives newly created ones a random heading.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Append an attribute column and return its index.
    ///
    /// `birth` seeds cells created by division; `entry` seeds cells placed
    /// at setup or admitted from outside the volume.
    pub fn add_attribute(&mut self, name: impl Into<String>, birth: Dist, entry: Dist) -> AttrId {
        let id = AttrId(self.attributes.len() as u16);
        self.attributes.push(AttributeDef {
            name: name.into(),
            birth,
            entry,
        });
        id
    }

    /// Install a sense rule.
    ///
    /// # Errors
    ///
    /// Rejects rules referencing attributes outside the current schema or
    /// carrying out-of-range parameters.
    pub fn add_sense(&mut self, sense: Sense) -> CellResult<()> {
        sense.check(self.attributes.len())?;
        self.senses.push(sense);
        Ok(())
    }

    /// Install a process rule.
    ///
    /// # Errors
    ///
    /// Same validation as [`add_sense`][Self::add_sense].
    pub fn add_process(&mut self, process: Process) -> CellResult<()> {
        process.check(self.attributes.len())?;
        self.processes.push(process);
        Ok(())
    }

    /// Install an action that runs every step without a condition.
    ///
    /// # Errors
    ///
    /// Same validation as [`add_sense`][Self::add_sense].
    pub fn add_action(&mut self, action: Action) -> CellResult<()> {
        action.check(self.attributes.len())?;
        self.unconditionals.push(action);
        Ok(())
    }

    /// Install a condition-gated action.
    ///
    /// # Errors
    ///
    /// Same validation as [`add_sense`][Self::add_sense].
    pub fn add_activity(&mut self, cond: Cond, action: Action) -> CellResult<()> {
        cond.check(self.attributes.len())?;
        action.check(self.attributes.len())?;
        self.activities.push((cond, action));
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Index of a named attribute, first match wins.
    pub fn attribute_index(&self, name: &str) -> Option<AttrId> {
        self.attributes
            .iter()
            .position(|a| a.name == name)
            .map(|i| AttrId(i as u16))
    }

    /// As [`attribute_index`][Self::attribute_index], but an error naming
    /// the type and attribute when absent.
    pub fn require_attribute(&self, name: &str) -> CellResult<AttrId> {
        self.attribute_index(name).ok_or_else(|| CellError::UnknownAttribute {
            type_name: self.name.clone(),
            attribute: name.to_string(),
        })
    }

    /// Name of one attribute column.
    pub fn attribute_name(&self, attr: AttrId) -> &str {
        &self.attributes[attr.index()].name
    }

    // ── Cell lifecycle ────────────────────────────────────────────────────

    /// Seed a newborn daughter cell: attributes from the birth
    /// distributions, and a random heading when the type is mobile.
    pub fn initialize_cell(&self, cell: &mut Cell, rng: &mut SimRng) {
        cell.reset_attributes(self.attributes.len());
        for (i, def) in self.attributes.iter().enumerate() {
            cell.set_value(AttrId(i as u16), def.birth.sample(rng));
        }
        if self.speed != 0.0 {
            cell.set_direction(Vector3::random_unit(rng));
        }
    }

    /// Seed a cell entering from outside: attributes from the entry
    /// distributions, and a random heading when the type is mobile.
    pub fn randomize_cell(&self, cell: &mut Cell, rng: &mut SimRng) {
        cell.reset_attributes(self.attributes.len());
        for (i, def) in self.attributes.iter().enumerate() {
            cell.set_value(AttrId(i as u16), def.entry.sample(rng));
        }
        if self.speed != 0.0 {
            cell.set_direction(Vector3::random_unit(rng));
        }
    }

    /// Run the full rule pipeline for one cell over a step of length `dt`.
    pub(crate) fn update(&self, cell: &mut Cell, ctx: &mut StepContext<'_>, dt: f64) {
        for sense in &self.senses {
            sense.run(cell, ctx, dt);
        }
        for process in &self.processes {
            process.step(cell, dt, ctx.rng, ctx.tally);
        }
        for action in &self.unconditionals {
            if !cell.is_alive() {
                return;
            }
            action.run(cell, ctx, dt);
        }
        for (cond, action) in &self.activities {
            if !cell.is_alive() {
                return;
            }
            if cond.test(cell.values(), dt, ctx.rng) {
                action.run(cell, ctx, dt);
            }
        }
    }
}
