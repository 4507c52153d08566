//! Unit tests for cyto-core primitives.

#[cfg(test)]
mod vector {
    use crate::{SimRng, Vector3};

    #[test]
    fn arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(0.5, 0.5, 0.5);
        assert_eq!(a + b, Vector3::new(1.5, 2.5, 3.5));
        assert_eq!(a - b, Vector3::new(0.5, 1.5, 2.5));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));

        let mut c = a;
        c += b;
        c *= 2.0;
        assert_eq!(c, Vector3::new(3.0, 5.0, 7.0));
    }

    #[test]
    fn distance() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(3.0, 4.0, 0.0);
        assert_eq!(a.dist(b), 5.0);
        assert_eq!(b.length(), 5.0);
    }

    #[test]
    fn componentwise_bounds() {
        let p = Vector3::new(5.0, 5.0, 5.0);
        let max = Vector3::new(10.0, 10.0, 10.0);
        assert!(p.all_ge(Vector3::ZERO));
        assert!(p.all_lt(max));
        assert!(!Vector3::new(5.0, 11.0, 5.0).all_lt(max));
        assert!(!Vector3::new(-0.1, 5.0, 5.0).all_ge(Vector3::ZERO));
    }

    #[test]
    fn random_unit_has_unit_length() {
        let mut rng = SimRng::new(7);
        for _ in 0..100 {
            let v = Vector3::random_unit(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-12, "length {}", v.length());
        }
    }

    #[test]
    fn random_unit_xy_stays_planar() {
        let mut rng = SimRng::new(7);
        for _ in 0..100 {
            let v = Vector3::random_unit_xy(&mut rng);
            assert_eq!(v.z, 0.0);
            assert!((v.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn display() {
        assert_eq!(Vector3::new(1.0, 2.5, 3.0).to_string(), "(1, 2.5, 3)");
    }
}

#[cfg(test)]
mod grid {
    use crate::Grid3;

    #[test]
    fn indexing_roundtrip() {
        let mut g: Grid3<u32> = Grid3::new(3, 4, 5);
        assert_eq!(g.len(), 60);
        *g.at_mut(2, 3, 4) = 99;
        assert_eq!(*g.at(2, 3, 4), 99);
        assert_eq!(*g.at(0, 0, 0), 0);
    }

    #[test]
    fn layout_is_k_fastest() {
        let mut g: Grid3<u32> = Grid3::new(2, 2, 3);
        *g.at_mut(0, 0, 1) = 1;
        *g.at_mut(0, 1, 0) = 2;
        *g.at_mut(1, 0, 0) = 3;
        let s = g.as_slice();
        assert_eq!(s[1], 1); // k stride 1
        assert_eq!(s[3], 2); // j stride nz
        assert_eq!(s[6], 3); // i stride ny*nz
    }

    #[test]
    fn fill_overwrites_everything() {
        let mut g: Grid3<f64> = Grid3::new(2, 2, 2);
        g.fill(4.5);
        assert!(g.as_slice().iter().all(|&v| v == 4.5));
    }

    #[test]
    fn interpolate_at_stored_points() {
        let mut g: Grid3<f64> = Grid3::new(3, 3, 3);
        *g.at_mut(1, 1, 1) = 10.0;
        assert_eq!(g.interpolate(1.0, 1.0, 1.0), 10.0);
        assert_eq!(g.interpolate(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn interpolate_blends_midpoint() {
        let mut g: Grid3<f64> = Grid3::new(2, 2, 2);
        *g.at_mut(0, 0, 0) = 2.0;
        *g.at_mut(1, 0, 0) = 4.0;
        // Halfway along x between two stored values, flat in y/z.
        assert!((g.interpolate(0.5, 0.0, 0.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn zero_dimension_rejected() {
        let _: Grid3<f64> = Grid3::new(2, 0, 2);
    }
}

#[cfg(test)]
mod ids {
    use crate::{AttrId, MolId, TallyId, TypeId};

    #[test]
    fn index_roundtrip() {
        let id = TypeId(3);
        assert_eq!(id.index(), 3);
        assert_eq!(TypeId::try_from(3usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(TypeId::INVALID.0, u16::MAX);
        assert_eq!(MolId::INVALID.0, u16::MAX);
        assert_eq!(AttrId::INVALID.0, u16::MAX);
        assert_eq!(TallyId::INVALID.0, u16::MAX);
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(MolId::default(), MolId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AttrId(7).to_string(), "AttrId(7)");
    }

    #[test]
    fn oversize_conversion_fails() {
        assert!(TypeId::try_from(100_000usize).is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.uniform(), r2.uniform());
        }
    }

    #[test]
    fn uniform_in_unit_interval() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.uniform();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn bernoulli_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.bernoulli(0.0));
        assert!(rng.bernoulli(1.0));
        assert!(rng.bernoulli(5.0)); // clamped
        assert!(!rng.bernoulli(-1.0)); // clamped
    }

    #[test]
    fn gaussian_sample_statistics() {
        let mut rng = SimRng::new(99);
        let n = 20_000;
        let (mut sum, mut sumsq) = (0.0, 0.0);
        for _ in 0..n {
            let v = rng.gaussian(10.0, 2.0);
            sum += v;
            sumsq += v * v;
        }
        let mean = sum / n as f64;
        let var = sumsq / n as f64 - mean * mean;
        assert!((mean - 10.0).abs() < 0.1, "mean {mean}");
        assert!((var - 4.0).abs() < 0.3, "variance {var}");
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = SimRng::new(5);
        let mut v: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut v);
        let mut sorted = v.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<u32>>());
    }

    #[test]
    fn checkpoint_restores_sequence() {
        let mut rng = SimRng::new(42);
        rng.uniform();
        let state = rng.checkpoint();

        let ahead: Vec<f64> = (0..10).map(|_| rng.uniform()).collect();
        rng.restore(&state);
        let replay: Vec<f64> = (0..10).map(|_| rng.uniform()).collect();
        assert_eq!(ahead, replay);
    }

    #[test]
    fn gen_range_bounds() {
        let mut rng = SimRng::new(1);
        for _ in 0..500 {
            let v = rng.gen_range(3.0..7.0);
            assert!((3.0..7.0).contains(&v));
            let i = rng.gen_range(0..10usize);
            assert!(i < 10);
        }
    }
}
