//! Solver state and the outer iteration driver.

use crate::error::SolverError;
use crate::linesearch::{self, armijo_wolfe};
use crate::memory::LbfgsMemory;
use crate::model::LineModel;
use crate::params::ParamSet;
use crate::problem::Objective;
use crate::report::{IterationRecord, LogReporter, Reporter, SilentReporter};
use ndarray::Array1;
use std::time::Instant;

/// Terminal status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Still running; never appears on a returned solution.
    Unknown,
    /// Gradient-norm tolerance met.
    FirstOrder,
    /// The computed direction was not a descent direction.
    NotDescent,
    /// The line search exhausted its trial budget.
    Stalled,
    /// Objective-evaluation budget exceeded.
    MaxEval,
    /// Wall-clock budget exceeded.
    MaxTime,
}

/// Solve-time options.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Absolute gradient-norm tolerance (default: 1e-8).
    pub atol: f64,
    /// Tolerance relative to the initial gradient norm (default: 1e-8).
    pub rtol: f64,
    /// Objective-evaluation budget; values ≤ 0 disable the check
    /// (default: -1).
    pub max_eval: i64,
    /// Wall-clock budget in seconds (default: 30.0).
    pub max_time: f64,
    /// Log one line per iteration through the default reporter
    /// (default: false).
    pub verbose: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            atol: 1.0e-8,
            rtol: 1.0e-8,
            max_eval: -1,
            max_time: 30.0,
            verbose: false,
        }
    }
}

impl SolveOptions {
    /// Sets the absolute and relative gradient-norm tolerances.
    pub fn with_tolerances(mut self, atol: f64, rtol: f64) -> Self {
        self.atol = atol.max(0.0);
        self.rtol = rtol.max(0.0);
        self
    }

    /// Sets the objective-evaluation budget; ≤ 0 disables it.
    pub fn with_max_eval(mut self, max_eval: i64) -> Self {
        self.max_eval = max_eval;
        self
    }

    /// Sets the wall-clock budget in seconds.
    pub fn with_max_time(mut self, seconds: f64) -> Self {
        self.max_time = seconds;
        self
    }

    /// Enables per-iteration logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Result record of one solve.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the run ended.
    pub status: Status,
    /// The final iterate.
    pub solution: Array1<f64>,
    /// Objective value at the final iterate.
    pub objective: f64,
    /// Gradient norm at the final iterate, the optimality certificate.
    pub dual_feasibility: f64,
    /// Outer iterations performed.
    pub iterations: usize,
    /// Wall-clock time spent, in seconds.
    pub elapsed_seconds: f64,
}

/// Reusable L-BFGS solver state.
///
/// One instance owns every per-iteration buffer (current and trial point,
/// both gradients, the search direction), the limited-memory operator and
/// the line model. Construct it once per problem dimension and reuse it
/// across solves: the operator is reset and all buffers are overwritten at
/// the start of each `solve`, with no reallocation. A state must not be
/// shared across concurrent solves.
#[derive(Debug)]
pub struct LbfgsSolver {
    x: Array1<f64>,
    xt: Array1<f64>,
    gx: Array1<f64>,
    gt: Array1<f64>,
    d: Array1<f64>,
    memory: LbfgsMemory,
    model: LineModel,
    params: ParamSet,
}

impl LbfgsSolver {
    /// State sized for `problem`, with the default parameter set.
    pub fn new<P: Objective>(problem: &P) -> Result<Self, SolverError> {
        Self::with_params(problem, ParamSet::lbfgs_defaults())
    }

    /// State sized for `problem` with an explicit parameter set, which must
    /// declare `mem` and `tau1`. The history depth is additionally capped at
    /// the problem dimension.
    pub fn with_params<P: Objective>(
        problem: &P,
        params: ParamSet,
    ) -> Result<Self, SolverError> {
        let n = problem.dimension();
        let mem = (params.get("mem")?.int_value().max(1) as usize).min(n.max(1));
        params.get("tau1")?;
        Ok(Self {
            x: Array1::zeros(n),
            xt: Array1::zeros(n),
            gx: Array1::zeros(n),
            gt: Array1::zeros(n),
            d: Array1::zeros(n),
            memory: LbfgsMemory::new(mem, true),
            model: LineModel::new(n),
            params,
        })
    }

    /// The parameter set this state was built with.
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Minimize `problem` from its default starting point.
    pub fn solve<P: Objective>(
        &mut self,
        problem: &mut P,
        options: &SolveOptions,
    ) -> Result<Solution, SolverError> {
        let x0 = problem.initial_point();
        self.solve_from(problem, &x0, options)
    }

    /// Minimize `problem` from `x0`.
    pub fn solve_from<P: Objective>(
        &mut self,
        problem: &mut P,
        x0: &Array1<f64>,
        options: &SolveOptions,
    ) -> Result<Solution, SolverError> {
        if options.verbose {
            self.solve_with(problem, x0, options, &mut LogReporter)
        } else {
            self.solve_with(problem, x0, options, &mut SilentReporter)
        }
    }

    /// Minimize `problem` from `x0`, reporting each iteration to `reporter`.
    pub fn solve_with<P: Objective>(
        &mut self,
        problem: &mut P,
        x0: &Array1<f64>,
        options: &SolveOptions,
        reporter: &mut dyn Reporter,
    ) -> Result<Solution, SolverError> {
        let start = Instant::now();
        if !problem.is_minimization() {
            return Err(SolverError::Maximization);
        }
        if !problem.is_unconstrained() {
            return Err(SolverError::Constrained);
        }
        let n = self.x.len();
        if problem.dimension() != n {
            return Err(SolverError::DimensionMismatch {
                problem_dim: problem.dimension(),
                solver_dim: n,
            });
        }
        if x0.len() != n {
            return Err(SolverError::DimensionMismatch {
                problem_dim: x0.len(),
                solver_dim: n,
            });
        }
        // Fresh operator for an independent solve; every buffer below is
        // overwritten before it is read.
        self.memory.reset();
        self.x.assign(x0);
        let mut f = problem.objective(&self.x);
        problem.gradient(&self.x, &mut self.gx);
        let gnorm0 = self.gx.dot(&self.gx).sqrt();
        let mut gnorm = gnorm0;
        let tol = options.atol + options.rtol * gnorm0;

        let mut iterations = 0;
        let status = loop {
            if gnorm <= tol {
                break Status::FirstOrder;
            }
            if let Some(exhausted) = budget_spent(problem, options, &start) {
                break exhausted;
            }

            self.memory.apply_neg_into(&self.gx, &mut self.d);
            let slope = self.gx.dot(&self.d);
            if !slope.is_finite() || slope >= 0.0 {
                // A degraded operator or numerical breakdown; recovering
                // silently would mask it, so stop here.
                log::warn!(
                    "[L-BFGS] non-descent direction at iter {} (gᵀd = {:.2e})",
                    iterations,
                    slope
                );
                break Status::NotDescent;
            }

            let tau1 = self.params.get("tau1")?.real_value();
            let outcome = match armijo_wolfe(
                &mut self.model,
                problem,
                &self.x,
                &self.d,
                f,
                slope,
                &mut self.gt,
                tau1,
                linesearch::DEFAULT_BK_MAX,
                linesearch::DEFAULT_BW_MAX,
            ) {
                Ok(outcome) => outcome,
                Err(failed) => {
                    log::warn!("[L-BFGS] {failed} at iter {iterations}");
                    break Status::Stalled;
                }
            };

            self.xt.assign(&self.x);
            self.xt.scaled_add(outcome.t, &self.d);
            if !outcome.good_grad {
                // the search last probed somewhere else; the curvature pair
                // must use the gradient at the accepted point
                problem.gradient(&self.xt, &mut self.gt);
            }

            // Curvature pair: displacement t·d and gradient difference.
            self.d *= outcome.t;
            let y = &self.gt - &self.gx;
            self.memory.push(self.d.clone(), y);

            self.x.assign(&self.xt);
            f = outcome.ft;
            self.gx.assign(&self.gt);
            gnorm = self.gx.dot(&self.gx).sqrt();
            iterations += 1;

            reporter.iteration(&IterationRecord {
                iter: iterations,
                objective: f,
                dual_feasibility: gnorm,
                slope,
                step: outcome.t,
                backtracks: outcome.backtracks,
                extrapolations: outcome.extrapolations,
            });
        };

        let elapsed_seconds = start.elapsed().as_secs_f64();
        log::info!(
            "[L-BFGS] done: status={:?} iters={} f={:.6e} ‖g‖={:.3e} evals={} time={:.3}s",
            status,
            iterations,
            f,
            gnorm,
            problem.num_obj_evals(),
            elapsed_seconds
        );
        Ok(Solution {
            status,
            solution: self.x.clone(),
            objective: f,
            dual_feasibility: gnorm,
            iterations,
            elapsed_seconds,
        })
    }
}

// Checked once per outer iteration; a single oracle call is never
// interrupted mid-flight.
fn budget_spent<P: Objective>(
    problem: &P,
    options: &SolveOptions,
    start: &Instant,
) -> Option<Status> {
    if options.max_eval > 0 && problem.num_obj_evals() as i64 > options.max_eval {
        return Some(Status::MaxEval);
    }
    if start.elapsed().as_secs_f64() > options.max_time {
        return Some(Status::MaxTime);
    }
    None
}
