//! Unit tests for the field engine.

use cyto_core::Vector3;

use crate::FieldGeometry;

fn v(x: f64, y: f64, z: f64) -> Vector3 {
    Vector3::new(x, y, z)
}

/// 10×10×10 cells of 10 μm.
fn cube_geometry() -> FieldGeometry {
    FieldGeometry::new(v(100.0, 100.0, 100.0), 10.0).unwrap()
}

/// 10×10×1 cells of 10 μm — a single z-layer.
fn sheet_geometry() -> FieldGeometry {
    FieldGeometry::new(v(100.0, 100.0, 10.0), 10.0).unwrap()
}

/// One well-mixed compartment.
fn mixed_geometry() -> FieldGeometry {
    FieldGeometry::new(v(1000.0, 1000.0, 1000.0), 0.0).unwrap()
}

#[cfg(test)]
mod geometry {
    use super::*;
    use crate::FieldError;

    #[test]
    fn gridded_sizes_and_normalization() {
        let g = cube_geometry();
        assert_eq!((g.xsize(), g.ysize(), g.zsize()), (10, 10, 10));
        assert_eq!(g.size(), 1000);
        assert_eq!(g.dims(), 3);
        assert!(!g.is_single_cell());
        // 1 / (6.022e11 · 10³)
        assert!((g.inv_nav_vol() - 1.0 / 6.022e14).abs() < 1e-30);
    }

    #[test]
    fn well_mixed_collapses_to_one_cell() {
        let g = mixed_geometry();
        assert_eq!(g.size(), 1);
        assert!(g.is_single_cell());
        // 1 / (6.022e11 · 10⁹ μm³)
        assert!((g.inv_nav_vol() - 1.0 / 6.022e20).abs() < 1e-36);
    }

    #[test]
    fn single_layer_is_two_dimensional() {
        assert_eq!(sheet_geometry().dims(), 2);
        assert_eq!(cube_geometry().dims(), 3);
    }

    #[test]
    fn rejects_bad_extents() {
        assert!(matches!(
            FieldGeometry::new(v(0.0, 100.0, 100.0), 10.0),
            Err(FieldError::InvalidExtent(_))
        ));
        assert!(matches!(
            FieldGeometry::new(v(100.0, 100.0, 100.0), -1.0),
            Err(FieldError::NegativeGridSize(_))
        ));
    }

    #[test]
    fn rejects_indivisible_extent() {
        let err = FieldGeometry::new(v(105.0, 100.0, 100.0), 10.0).unwrap_err();
        assert!(matches!(err, FieldError::Indivisible { axis: 'x', .. }));
    }

    #[test]
    fn cell_index_maps_positions() {
        let g = cube_geometry();
        assert_eq!(g.cell_index(v(0.0, 0.0, 0.0)), (1, 1, 1));
        assert_eq!(g.cell_index(v(9.9, 9.9, 9.9)), (1, 1, 1));
        assert_eq!(g.cell_index(v(10.0, 0.0, 0.0)), (2, 1, 1));
        assert_eq!(g.cell_index(v(99.0, 99.0, 99.0)), (10, 10, 10));
        assert_eq!(mixed_geometry().cell_index(v(500.0, 2.0, 900.0)), (1, 1, 1));
    }

    #[test]
    fn contains_is_half_open() {
        let g = cube_geometry();
        assert!(g.contains(v(0.0, 0.0, 0.0)));
        assert!(g.contains(v(99.999, 50.0, 0.0)));
        assert!(!g.contains(v(100.0, 50.0, 0.0)));
        assert!(!g.contains(v(-0.001, 50.0, 0.0)));
    }
}

#[cfg(test)]
mod concentration {
    use super::*;
    use crate::{FieldError, Molecule};
    use cyto_core::SimRng;

    #[test]
    fn change_conc_converts_molecule_count() {
        let geo = cube_geometry();
        let mut field = Molecule::new("tnf", &geo);
        field.change_conc(1e6, v(5.0, 5.0, 5.0));
        let expected = 1e6 * geo.inv_nav_vol();
        assert_eq!(field.conc_at(v(5.0, 5.0, 5.0)), expected);
        // A different cell stays empty.
        assert_eq!(field.conc_at(v(55.0, 5.0, 5.0)), 0.0);
    }

    #[test]
    fn repeated_secretion_accumulates_in_well_mixed_field() {
        let geo = mixed_geometry();
        let mut field = Molecule::new("il2", &geo);
        let rate = 500.0; // molecules per step
        for _ in 0..10 {
            field.change_conc(rate, v(0.0, 0.0, 0.0));
            field.update(1.0); // no diffusion, no decay: must be a no-op
        }
        let expected = rate * 10.0 * geo.inv_nav_vol();
        let avg = field.avg_conc();
        assert!(
            (avg - expected).abs() <= expected * 1e-14,
            "avg {avg} vs expected {expected}"
        );
    }

    #[test]
    #[should_panic(expected = "driven negative")]
    fn removing_too_much_panics() {
        let geo = cube_geometry();
        let mut field = Molecule::new("tnf", &geo);
        field.change_conc(100.0, v(5.0, 5.0, 5.0));
        field.change_conc(-200.0, v(5.0, 5.0, 5.0));
    }

    #[test]
    fn uniform_init_sets_every_cell() {
        let geo = cube_geometry();
        let mut field = Molecule::new("tnf", &geo);
        let mut rng = SimRng::new(1);
        field.set_uniform_conc(3.0e-12, 0.0, &mut rng);
        assert_eq!(field.avg_conc(), 3.0e-12);
        assert_eq!(field.conc_at(v(95.0, 95.0, 95.0)), 3.0e-12);
    }

    #[test]
    fn noisy_init_is_nonnegative_and_near_mean() {
        let geo = cube_geometry();
        let mut field = Molecule::new("tnf", &geo);
        let mut rng = SimRng::new(7);
        field.set_uniform_conc(10.0, 3.0, &mut rng);
        assert!(field.concentrations().iter().all(|&c| c >= 0.0));
        let avg = field.avg_conc();
        assert!((avg - 10.0).abs() < 0.5, "avg {avg}");
    }

    #[test]
    fn export_import_roundtrip() {
        let geo = sheet_geometry();
        let mut field = Molecule::new("tnf", &geo);
        let mut rng = SimRng::new(3);
        field.set_uniform_conc(5.0, 1.0, &mut rng);

        let data = field.concentrations();
        assert_eq!(data.len(), 100);

        let mut other = Molecule::new("tnf", &geo);
        other.load_concentrations(&data).unwrap();
        assert_eq!(other.concentrations(), data);
        assert_eq!(other.avg_conc(), field.avg_conc());
    }

    #[test]
    fn import_rejects_wrong_length() {
        let geo = sheet_geometry();
        let mut field = Molecule::new("tnf", &geo);
        let err = field.load_concentrations(&[1.0; 7]).unwrap_err();
        assert!(matches!(
            err,
            FieldError::DataLength { expected: 100, got: 7 }
        ));
    }

    #[test]
    fn molecule_count_scales_by_avogadro() {
        let geo = mixed_geometry();
        let mut field = Molecule::new("tnf", &geo);
        field.change_conc(6.022e8, v(0.0, 0.0, 0.0));
        // conc = 6.022e8 / 6.022e20 = 1e-12 moles/ml; in 1 ml that is
        // 6.022e23 · 1e-12 ≈ 6.022e11 molecules.
        let n = field.molecule_count(1.0, v(0.0, 0.0, 0.0));
        assert!((n as f64 - 6.022e11).abs() < 1e3, "count {n}");
    }

    #[test]
    fn negative_rates_rejected() {
        let geo = cube_geometry();
        let mut field = Molecule::new("tnf", &geo);
        assert!(field.set_diffusion_rate(-1.0).is_err());
        assert!(field.set_decay_rate(-0.5).is_err());
        assert!(field.set_diffusion_rate(100.0).is_ok());
        assert!(field.set_decay_rate(0.1).is_ok());
    }
}

#[cfg(test)]
mod solver {
    use super::*;
    use crate::Molecule;
    use cyto_core::SimRng;

    fn total(field: &Molecule) -> f64 {
        field.concentrations().iter().sum()
    }

    #[test]
    fn decay_scales_all_cells() {
        let geo = cube_geometry();
        let mut field = Molecule::new("tnf", &geo);
        let mut rng = SimRng::new(1);
        field.set_uniform_conc(8.0, 0.0, &mut rng);
        field.set_decay_rate(0.1).unwrap();

        field.update(1.0);
        assert!((field.avg_conc() - 8.0 * 0.9).abs() < 1e-12);
        field.update(1.0);
        assert!((field.avg_conc() - 8.0 * 0.81).abs() < 1e-12);
    }

    #[test]
    fn pure_diffusion_conserves_mass() {
        let geo = cube_geometry();
        let mut field = Molecule::new("tnf", &geo);
        field.set_diffusion_rate(50.0).unwrap();
        let mut rng = SimRng::new(11);
        field.set_uniform_conc(5.0, 2.0, &mut rng);

        let before = total(&field);
        for _ in 0..20 {
            field.update(1.0);
        }
        let after = total(&field);
        assert!(
            (after - before).abs() < before * 1e-9,
            "mass drifted: {before} -> {after}"
        );
        assert!(field.concentrations().iter().all(|&c| c >= 0.0));
    }

    #[test]
    fn stiff_diffusion_substeps_stay_stable() {
        // 2·3·D·dt/dx² ≈ 60 sub-steps; a spike must spread, not explode.
        let geo = cube_geometry();
        let mut field = Molecule::new("tnf", &geo);
        field.set_diffusion_rate(1000.0).unwrap();
        field.change_conc(1e9, v(45.0, 45.0, 45.0));

        let before = total(&field);
        field.update(1.0);
        let after = total(&field);
        assert!((after - before).abs() < before * 1e-9);
        assert!(field.concentrations().iter().all(|&c| c >= 0.0));
        // The spike must actually have spread.
        let peak = field.conc_at(v(45.0, 45.0, 45.0));
        assert!(peak < before, "peak {peak} did not diffuse");
        assert!(field.conc_at(v(55.0, 45.0, 45.0)) > 0.0);
    }

    #[test]
    fn diffusion_flows_across_periodic_boundary() {
        let geo = sheet_geometry();
        let mut field = Molecule::new("tnf", &geo);
        field.set_diffusion_rate(20.0).unwrap();
        // Spike in the first x-cell; its periodic x-neighbor is the last cell.
        field.change_conc(1e9, v(5.0, 45.0, 5.0));

        field.update(1.0);
        let wrapped = field.conc_at(v(95.0, 45.0, 5.0));
        let adjacent = field.conc_at(v(15.0, 45.0, 5.0));
        assert!(wrapped > 0.0, "no flux across the boundary");
        assert!((wrapped - adjacent).abs() < adjacent * 1e-9, "asymmetric flux");
    }

    #[test]
    fn uniform_field_is_a_diffusion_fixed_point() {
        let geo = cube_geometry();
        let mut field = Molecule::new("tnf", &geo);
        field.set_diffusion_rate(100.0).unwrap();
        let mut rng = SimRng::new(1);
        field.set_uniform_conc(4.0, 0.0, &mut rng);

        field.update(1.0);
        for c in field.concentrations() {
            assert!((c - 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn decay_and_diffusion_combine() {
        let geo = sheet_geometry();
        let mut field = Molecule::new("tnf", &geo);
        field.set_diffusion_rate(10.0).unwrap();
        field.set_decay_rate(0.05).unwrap();
        let mut rng = SimRng::new(9);
        field.set_uniform_conc(6.0, 1.5, &mut rng);

        let before = total(&field);
        field.update(1.0);
        let after = total(&field);
        // Diffusion conserves; decay removes ~5 % (substeps compound slightly less).
        assert!(after < before);
        assert!((after / before - 0.95).abs() < 5e-3, "ratio {}", after / before);
    }
}

#[cfg(test)]
mod queries {
    use super::*;
    use crate::Molecule;

    /// Fill a sheet field with a linear-in-x profile via the bulk loader.
    fn linear_x_field() -> Molecule {
        let geo = sheet_geometry();
        let mut field = Molecule::new("tnf", &geo);
        let mut data = Vec::with_capacity(100);
        for i in 0..10 {
            for _j in 0..10 {
                data.push(i as f64);
            }
        }
        field.load_concentrations(&data).unwrap();
        field
    }

    #[test]
    fn interp_matches_stored_value_at_cell_center() {
        let field = linear_x_field();
        // Center of cell (4, 3): x = 35, y = 25.
        assert!((field.interp_conc(v(35.0, 25.0, 5.0)) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn interp_blends_between_cells() {
        let field = linear_x_field();
        // Halfway between cell centers 3 and 4 along x.
        let c = field.interp_conc(v(40.0, 25.0, 5.0));
        assert!((c - 3.5).abs() < 1e-12, "got {c}");
    }

    #[test]
    fn gradient_recovers_linear_slope() {
        let field = linear_x_field();
        // Away from the wrap seam the profile rises 1 per 10 μm.
        let g = field.gradient(v(45.0, 45.0, 5.0), 5.0);
        assert!((g.x - 0.1).abs() < 1e-9, "gx {}", g.x);
        assert!(g.y.abs() < 1e-12);
        assert_eq!(g.z, 0.0); // single layer
    }

    #[test]
    fn gradient_of_uniform_field_is_zero() {
        let geo = cube_geometry();
        let mut field = Molecule::new("tnf", &geo);
        let mut rng = cyto_core::SimRng::new(2);
        field.set_uniform_conc(7.0, 0.0, &mut rng);
        let g = field.gradient(v(50.0, 50.0, 50.0), 5.0);
        assert_eq!((g.x, g.y, g.z), (0.0, 0.0, 0.0));
    }

    #[test]
    fn gradient_in_single_cell_field_is_zero() {
        let geo = mixed_geometry();
        let mut field = Molecule::new("tnf", &geo);
        field.change_conc(1e9, v(0.0, 0.0, 0.0));
        assert_eq!(field.gradient(v(1.0, 1.0, 1.0), 0.5), Vector3::ZERO);
    }

    #[test]
    #[should_panic(expected = "sampling radius")]
    fn oversized_gradient_radius_panics() {
        let field = linear_x_field();
        field.gradient(v(45.0, 45.0, 5.0), 6.0); // gridSize/2 = 5
    }

    #[test]
    fn interp_wraps_through_guard_cells() {
        let field = linear_x_field();
        // At the x = 0 face the query blends the wrapped last cell (value 9,
        // read from the guard layer) and the first cell (value 0) equally.
        let c = field.interp_conc(v(0.0, 25.0, 5.0));
        assert!((c - 4.5).abs() < 1e-12, "got {c}");
    }
}
