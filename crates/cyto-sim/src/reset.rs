//! Periodic uniform re-initialization of one molecular field.

/// Schedule that overwrites a field with a uniform concentration at a fixed
/// cadence, standing in for an external supply the grid does not model
/// (perfusion, a media change, a source far outside the volume).
///
/// A due schedule fires *in place of* that step's diffusion pass, and the
/// first firing comes one full interval after time zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResetSchedule {
    interval: f64,
    mean:     f64,
    sd:       f64,
    next:     f64,
}

impl ResetSchedule {
    /// # Panics
    ///
    /// `interval` must be positive.
    pub fn new(interval: f64, mean: f64, sd: f64) -> Self {
        assert!(interval > 0.0, "reset interval must be positive, got {interval}");
        ResetSchedule { interval, mean, sd, next: interval }
    }

    #[inline]
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Target concentration in moles/ml.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Standard deviation of the per-cell Gaussian noise; `0` for an exact
    /// uniform fill.
    #[inline]
    pub fn sd(&self) -> f64 {
        self.sd
    }

    /// Simulated time of the next firing.
    #[inline]
    pub fn next(&self) -> f64 {
        self.next
    }

    /// Whether the schedule fires at simulated time `time`.
    #[inline]
    pub fn due(&self, time: f64) -> bool {
        time >= self.next
    }

    /// Push the next firing one interval forward.  Called once per firing.
    pub fn advance(&mut self) {
        self.next += self.interval;
    }
}
