//! Integration tests for the orchestrator.

use cyto_cell::{Action, ActionTally, CellType, Cond, Dist, Rate};
use cyto_core::{MolId, TypeId, Vector3};
use cyto_field::FieldGeometry;

use crate::{
    CellRecord, FieldRecord, MoleculeSpec, Placement, ResetSchedule, SimError, Tissue,
    TissueBuilder, TissueObserver,
};

fn v(x: f64, y: f64, z: f64) -> Vector3 {
    Vector3::new(x, y, z)
}

/// A type with no attributes and no rules.
fn inert(name: &str) -> CellType {
    CellType::new(name)
}

/// Molecules per (moles/ml) of concentration in a well-mixed 100 μm cube.
/// Secretion rates expressed in multiples of this land on round average
/// concentrations.
fn nav_vol_mixed_cube() -> f64 {
    let geo = FieldGeometry::new(v(100.0, 100.0, 100.0), 0.0).unwrap();
    1.0 / geo.inv_nav_vol()
}

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn defaults_build_an_empty_tissue() {
        let tissue = TissueBuilder::new(v(100.0, 100.0, 100.0)).build().unwrap();
        assert_eq!(tissue.time(), 0.0);
        assert!(tissue.fields().is_empty());
        assert_eq!(tissue.population().live_count(), 0);
        assert_eq!(tissue.max_diff_rate(), 0.0);
    }

    #[test]
    fn duplicate_molecule_names_are_rejected() {
        let err = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .add_molecule(MoleculeSpec::new("IL-2"))
            .add_molecule(MoleculeSpec::new("IL-2"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::DuplicateMolecule(name) if name == "IL-2"));
    }

    #[test]
    fn negative_rates_are_field_errors() {
        let err = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .add_molecule(MoleculeSpec::new("IL-2").diffusion(-1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Field(_)));
    }

    #[test]
    fn initial_concentration_is_uniform() {
        let tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .grid_size(10.0)
            .add_molecule(MoleculeSpec::new("IL-2").initial_conc(5.0, 0.0))
            .build()
            .unwrap();
        let id = tissue.mol_id("IL-2").unwrap();
        assert_eq!(tissue.field(id).avg_conc(), 5.0);
    }

    #[test]
    fn molecule_ids_follow_registration_order() {
        let tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .add_molecule(MoleculeSpec::new("IL-2"))
            .add_molecule(MoleculeSpec::new("TNF"))
            .build()
            .unwrap();
        assert_eq!(tissue.mol_id("IL-2").unwrap(), MolId(0));
        assert_eq!(tissue.mol_id("TNF").unwrap(), MolId(1));
        assert!(matches!(tissue.mol_id("IL-4"), Err(SimError::UnknownMolecule(_))));
    }

    #[test]
    fn placements_fill_the_population() {
        let tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .patch_size(10.0)
            .seed(11)
            .add_cell_type(inert("stromal"))
            .place(Placement::Randomly { type_name: "stromal".into(), count: 32 })
            .place(Placement::One { type_name: "stromal".into(), pos: v(1.0, 2.0, 3.0) })
            .build()
            .unwrap();
        assert_eq!(tissue.population().live_count(), 33);
        assert_eq!(tissue.population().pending_count(), 0);
    }

    #[test]
    fn unknown_placement_type_is_rejected() {
        let err = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .place(Placement::Randomly { type_name: "missing".into(), count: 4 })
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Cell(_)));
    }

    #[test]
    fn reset_interval_must_be_positive() {
        let err = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .add_molecule(MoleculeSpec::new("IL-2").reset(0.0, 1.0, 0.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::ResetInterval { interval, .. } if interval == 0.0));
    }

    #[test]
    fn same_seed_builds_identical_populations() {
        let build = |seed: u64| {
            TissueBuilder::new(v(100.0, 100.0, 100.0))
                .patch_size(10.0)
                .seed(seed)
                .add_cell_type(inert("stromal"))
                .place(Placement::Randomly { type_name: "stromal".into(), count: 16 })
                .build()
                .unwrap()
        };
        let positions = |tissue: &Tissue| -> Vec<(f64, f64, f64)> {
            tissue
                .population()
                .live_cells()
                .map(|c| (c.position().x, c.position().y, c.position().z))
                .collect()
        };
        assert_eq!(positions(&build(9)), positions(&build(9)));
    }
}

#[cfg(test)]
mod reset_tests {
    use super::*;

    #[test]
    fn schedule_fires_and_advances() {
        let mut schedule = ResetSchedule::new(10.0, 2.0, 0.5);
        assert!(!schedule.due(9.999));
        assert!(schedule.due(10.0));
        schedule.advance();
        assert_eq!(schedule.next(), 20.0);
        assert!(!schedule.due(10.0));
    }

    #[test]
    #[should_panic(expected = "reset interval")]
    fn zero_interval_panics() {
        let _ = ResetSchedule::new(0.0, 1.0, 0.0);
    }

    #[test]
    fn first_reset_waits_one_full_interval() {
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .add_molecule(MoleculeSpec::new("feed").reset(5.0, 7.0, 0.0))
            .build()
            .unwrap();
        let id = tissue.mol_id("feed").unwrap();
        for _ in 0..5 {
            tissue.update(1.0);
        }
        assert_eq!(tissue.field(id).avg_conc(), 0.0);
        tissue.update(1.0);
        assert_eq!(tissue.field(id).avg_conc(), 7.0);
    }

    #[test]
    fn reset_replaces_the_decay_step() {
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .add_molecule(
                MoleculeSpec::new("feed")
                    .decay(0.2)
                    .initial_conc(1.0, 0.0)
                    .reset(2.0, 4.0, 0.0),
            )
            .build()
            .unwrap();
        let id = tissue.mol_id("feed").unwrap();
        tissue.update(1.0);
        tissue.update(1.0);
        // Two decay steps ran, at times 0 and 1, each scaling by 1 - 0.2·1.
        let decayed = tissue.field(id).avg_conc();
        assert!((decayed - 0.64).abs() < 1e-12);
        // The step at time 2 fires the reset in place of a decay step.
        tissue.update(1.0);
        assert_eq!(tissue.field(id).avg_conc(), 4.0);
    }

    #[test]
    fn mid_run_install_fires_on_the_next_step() {
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .add_molecule(MoleculeSpec::new("feed"))
            .build()
            .unwrap();
        tissue.update(1.0);
        tissue.update(1.0);
        tissue.set_mol_reset("feed", 1.0, 3.0, 0.0).unwrap();
        tissue.update(1.0);
        let id = tissue.mol_id("feed").unwrap();
        assert_eq!(tissue.field(id).avg_conc(), 3.0);
    }

    #[test]
    fn unknown_molecule_cannot_be_scheduled() {
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0)).build().unwrap();
        assert!(matches!(
            tissue.set_mol_reset("ghost", 1.0, 0.0, 0.0),
            Err(SimError::UnknownMolecule(_))
        ));
    }
}

#[cfg(test)]
mod tissue_tests {
    use super::*;

    #[test]
    fn bounds_are_closed_at_both_faces() {
        let tissue = TissueBuilder::new(v(100.0, 50.0, 25.0)).build().unwrap();
        assert!(tissue.within_bounds(v(0.0, 0.0, 0.0)));
        assert!(tissue.within_bounds(v(100.0, 50.0, 25.0)));
        assert!(!tissue.within_bounds(v(100.001, 1.0, 1.0)));
        assert!(!tissue.within_bounds(v(1.0, -0.001, 1.0)));
    }

    #[test]
    fn update_advances_the_clock() {
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0)).build().unwrap();
        tissue.update(0.25);
        tissue.update(0.25);
        tissue.update(0.25);
        assert_eq!(tissue.time(), 0.75);
    }

    #[test]
    fn max_diff_rate_takes_the_fastest_field() {
        let tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .add_molecule(MoleculeSpec::new("slow").diffusion(10.0))
            .add_molecule(MoleculeSpec::new("fast").diffusion(250.0))
            .build()
            .unwrap();
        assert_eq!(tissue.max_diff_rate(), 250.0);
    }

    #[test]
    fn secretion_accumulates_one_unit_per_step() {
        // A fixed-rate secretor in a well-mixed field deposits exactly one
        // concentration unit per one-second step.
        let rate = nav_vol_mixed_cube();
        let mut secretor = inert("secretor");
        secretor
            .add_action(Action::SecreteFixed { mol: MolId(0), rate })
            .unwrap();
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .seed(3)
            .add_molecule(MoleculeSpec::new("IL-2"))
            .add_cell_type(secretor)
            .place(Placement::One { type_name: "secretor".into(), pos: v(50.0, 50.0, 50.0) })
            .build()
            .unwrap();
        for _ in 0..10 {
            tissue.update(1.0);
        }
        let id = tissue.mol_id("IL-2").unwrap();
        assert!((tissue.field(id).avg_conc() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn tally_counts_flow_through_update() {
        let mut tally = ActionTally::new();
        let deaths = tally.register("deaths");
        let mut mortal = inert("mortal");
        mortal.add_action(Action::Die { tally: deaths }).unwrap();
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .patch_size(10.0)
            .seed(5)
            .add_cell_type(mortal)
            .place(Placement::Randomly { type_name: "mortal".into(), count: 6 })
            .tally(tally)
            .build()
            .unwrap();
        tissue.update(1.0);
        assert_eq!(tissue.population().live_count(), 0);
        assert_eq!(tissue.tally().count(deaths), 6);
    }

    #[test]
    fn run_for_drives_the_observer() {
        struct Counting {
            starts: usize,
            ends:   usize,
            runs:   usize,
        }
        impl TissueObserver for Counting {
            fn on_step_start(&mut self, _time: f64) {
                self.starts += 1;
            }
            fn on_step_end(&mut self, _tissue: &Tissue) {
                self.ends += 1;
            }
            fn on_run_end(&mut self, _tissue: &Tissue) {
                self.runs += 1;
            }
        }

        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0)).build().unwrap();
        let mut counting = Counting { starts: 0, ends: 0, runs: 0 };
        tissue.run_for(5, 0.5, &mut counting);
        assert_eq!((counting.starts, counting.ends, counting.runs), (5, 5, 1));
        assert_eq!(tissue.time(), 2.5);
    }

    #[test]
    fn split_borrow_supports_post_build_placement() {
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .patch_size(10.0)
            .add_cell_type(inert("stromal"))
            .build()
            .unwrap();
        {
            let (population, rng) = tissue.population_and_rng();
            population
                .add_cell_named("stromal", v(10.0, 20.0, 30.0), false, rng)
                .unwrap();
            population.merge_new();
        }
        assert_eq!(tissue.population().live_count(), 1);
    }
}

#[cfg(test)]
mod snapshot_tests {
    use super::*;

    /// A dozen zero-radius walkers and one noisy diffusing field.
    fn sample_tissue(seed: u64) -> Tissue {
        let mut walker = inert("walker");
        walker.set_radius(0.0);
        walker.set_speed(4.0);
        walker.add_attribute("energy", Dist::Fixed(1.0), Dist::Uniform { min: 2.0, max: 6.0 });
        TissueBuilder::new(v(100.0, 100.0, 100.0))
            .grid_size(10.0)
            .patch_size(10.0)
            .seed(seed)
            .add_molecule(MoleculeSpec::new("IL-2").diffusion(30.0).initial_conc(2.5, 0.5))
            .add_cell_type(walker)
            .place(Placement::Randomly { type_name: "walker".into(), count: 12 })
            .build()
            .unwrap()
    }

    #[test]
    fn snapshot_captures_the_whole_state() {
        let mut tissue = sample_tissue(21);
        for _ in 0..3 {
            tissue.update(1.0);
        }
        let snap = tissue.snapshot();
        assert_eq!(snap.time, 3.0);
        assert_eq!(snap.cells.len(), 12);
        assert!(snap.cells.iter().all(|c| c.type_name == "walker"));
        assert!(snap.cells.iter().all(|c| c.attributes.len() == 1));
        assert_eq!(snap.fields.len(), 1);
        assert_eq!(snap.fields[0].name, "IL-2");
        assert_eq!(snap.fields[0].concentrations.len(), 1000);
        assert!(snap.rng.is_some());
    }

    #[test]
    fn restore_resumes_an_identical_run() {
        let mut original = sample_tissue(33);
        for _ in 0..4 {
            original.update(1.0);
        }
        let snap = original.snapshot();

        // A differently seeded twin converges on the captured state, then
        // both advance in lockstep.
        let mut resumed = sample_tissue(99);
        resumed.restore(&snap).unwrap();
        assert_eq!(resumed.time(), original.time());
        assert_eq!(resumed.population().live_count(), original.population().live_count());

        original.update(1.0);
        resumed.update(1.0);
        let state = |tissue: &Tissue| -> (Vec<(f64, f64, f64)>, Vec<f64>) {
            let cells = tissue
                .population()
                .live_cells()
                .map(|c| (c.position().x, c.position().y, c.position().z))
                .collect();
            let id = tissue.mol_id("IL-2").unwrap();
            (cells, tissue.field(id).concentrations())
        };
        assert_eq!(state(&original), state(&resumed));
    }

    #[test]
    fn restoring_an_unknown_type_is_rejected() {
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0)).build().unwrap();
        let records = vec![CellRecord {
            type_name:  "ghost".into(),
            position:   v(1.0, 1.0, 1.0),
            velocity:   Vector3::ZERO,
            heading:    Vector3::ZERO,
            attributes: Vec::new(),
        }];
        assert!(matches!(tissue.restore_cells(&records), Err(SimError::Cell(_))));
    }

    #[test]
    fn restoring_a_wrong_length_grid_is_rejected() {
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .grid_size(10.0)
            .add_molecule(MoleculeSpec::new("IL-2"))
            .build()
            .unwrap();
        let record = FieldRecord { name: "IL-2".into(), concentrations: vec![0.0; 7] };
        assert!(matches!(tissue.restore_field(&record), Err(SimError::Field(_))));
        let record = FieldRecord { name: "ghost".into(), concentrations: vec![0.0; 1000] };
        assert!(matches!(
            tissue.restore_field(&record),
            Err(SimError::UnknownMolecule(_))
        ));
    }

    #[test]
    fn rng_checkpoint_rewinds_the_stream() {
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0)).build().unwrap();
        let token = tissue.rng_checkpoint();
        let first = tissue.population_and_rng().1.uniform();
        tissue.rng_restore(&token);
        let second = tissue.population_and_rng().1.uniform();
        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod determinism {
    use super::*;

    /// Mobile secretors that stochastically divide: motion, field updates,
    /// admissions, and tallies all drawing from the one stream.
    fn history(seed: u64) -> (f64, u64, Vec<(f64, f64, f64)>, f64) {
        let rate = nav_vol_mixed_cube();
        let mut tally = ActionTally::new();
        let divisions = tally.register("divisions");
        let mut walker = inert("walker");
        walker.set_speed(3.0);
        walker
            .add_action(Action::SecreteFixed { mol: MolId(0), rate })
            .unwrap();
        walker
            .add_activity(
                Cond::CalcProb(Rate::Fixed(0.1)),
                Action::Divide { daughter: TypeId(0), tally: divisions },
            )
            .unwrap();
        let mut tissue = TissueBuilder::new(v(100.0, 100.0, 100.0))
            .patch_size(10.0)
            .seed(seed)
            .add_molecule(MoleculeSpec::new("IL-2").decay(0.01))
            .add_cell_type(walker)
            .place(Placement::Randomly { type_name: "walker".into(), count: 10 })
            .tally(tally)
            .build()
            .unwrap();
        for _ in 0..5 {
            tissue.update(1.0);
        }
        let positions = tissue
            .population()
            .live_cells()
            .map(|c| (c.position().x, c.position().y, c.position().z))
            .collect();
        let id = tissue.mol_id("IL-2").unwrap();
        (
            tissue.time(),
            tissue.tally().count(divisions),
            positions,
            tissue.field(id).avg_conc(),
        )
    }

    #[test]
    fn same_seed_same_history() {
        assert_eq!(history(17), history(17));
    }
}
