//! The deterministic sampling service behind every stochastic decision.
//!
//! # Determinism strategy
//!
//! A single `SmallRng` stream drives the whole simulation.  Every
//! distribution draw, Bernoulli trial, and shuffle routes through [`SimRng`],
//! so a fixed seed yields bit-identical runs regardless of platform.
//! [`SimRng::checkpoint`] clones the generator state; restoring it replays
//! the exact remaining sequence, which is what makes mid-run snapshots
//! reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Deterministic simulation RNG.
///
/// Owned by the orchestrator and threaded by mutable reference through the
/// update pipeline.  Single-threaded by design — there is exactly one stream
/// per run.
#[derive(Debug)]
pub struct SimRng(SmallRng);

/// Opaque snapshot of a [`SimRng`]'s internal state.
///
/// Produced by [`SimRng::checkpoint`], consumed by [`SimRng::restore`].
/// Deliberately opaque: the generator's byte layout is not a stable
/// interface, so tokens only round-trip within one process.
#[derive(Clone)]
pub struct RngState(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Gaussian draw with the given mean and standard deviation.
    #[inline]
    pub fn gaussian(&mut self, mean: f64, sd: f64) -> f64 {
        let z: f64 = self.0.sample(StandardNormal);
        mean + sd * z
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Snapshot the generator state for a later [`restore`][Self::restore].
    pub fn checkpoint(&self) -> RngState {
        RngState(self.0.clone())
    }

    /// Rewind the generator to a previously captured state.
    pub fn restore(&mut self, state: &RngState) {
        self.0 = state.0.clone();
    }
}
