//! Per-iteration diagnostics as an injectable sink.
//!
//! The driver never formats or prints anything itself; it hands each
//! accepted iteration to a `Reporter`, so callers can log, record, or drop
//! the diagnostics without touching the control flow.

/// Snapshot of one accepted iteration.
#[derive(Debug, Clone, Copy)]
pub struct IterationRecord {
    /// Iteration count after this step.
    pub iter: usize,
    /// Objective value at the new iterate.
    pub objective: f64,
    /// Gradient norm at the new iterate.
    pub dual_feasibility: f64,
    /// Directional derivative along the search direction, before the step.
    pub slope: f64,
    /// Accepted step length.
    pub step: f64,
    /// Line-search backtracks for this step.
    pub backtracks: usize,
    /// Line-search extrapolations for this step.
    pub extrapolations: usize,
}

/// Observer invoked once per accepted iteration.
pub trait Reporter {
    fn iteration(&mut self, record: &IterationRecord);
}

/// Discards every record.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn iteration(&mut self, _record: &IterationRecord) {}
}

/// Emits one `log` line per iteration.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn iteration(&mut self, r: &IterationRecord) {
        log::info!(
            "[L-BFGS] iter={} f={:.6e} ‖g‖={:.3e} slope={:.3e} t={:.3e} bk={} bW={}",
            r.iter,
            r.objective,
            r.dual_feasibility,
            r.slope,
            r.step,
            r.backtracks,
            r.extrapolations
        );
    }
}
