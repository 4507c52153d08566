//! Step-loop observer trait for progress reporting and data collection.

use crate::Tissue;

/// Callbacks invoked by [`Tissue::run_for`] at key points in the step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { every: u64, steps: u64 }
///
/// impl TissueObserver for ProgressPrinter {
///     fn on_step_end(&mut self, tissue: &Tissue) {
///         self.steps += 1;
///         if self.steps % self.every == 0 {
///             println!("t = {} s: {} cells", tissue.time(), tissue.population().live_count());
///         }
///     }
/// }
/// ```
pub trait TissueObserver {
    /// Called before each step, with the simulated time about to be stepped.
    fn on_step_start(&mut self, _time: f64) {}

    /// Called at the end of each step.
    ///
    /// Read-only access to the whole tissue lets reporters sample counts,
    /// totals, and concentrations without the orchestrator knowing about
    /// any particular output format.
    fn on_step_end(&mut self, _tissue: &Tissue) {}

    /// Called once after the final step of a [`Tissue::run_for`] call.
    fn on_run_end(&mut self, _tissue: &Tissue) {}
}

/// A [`TissueObserver`] that does nothing.  Use when you need to call
/// [`Tissue::run_for`] but don't want progress callbacks.
pub struct NoopObserver;

impl TissueObserver for NoopObserver {}
