//! A limited-memory quasi-Newton (L-BFGS) solver for unconstrained smooth
//! minimization, driven by an inexact Armijo–Wolfe line search.
//!
//! The method follows "Numerical Optimization" by Nocedal & Wright: an
//! implicit, memory-bounded inverse Hessian approximation supplies the
//! search direction, a one-dimensional line model restricts the objective to
//! that ray, and a backtracking/extrapolating line search picks a step
//! satisfying both the sufficient-decrease and curvature conditions.
//!
//! # Features
//! - Matrix-free two-loop recursion over a FIFO-bounded curvature history,
//!   with the standard `yᵀs / yᵀy` initial scaling and a positive-curvature
//!   guard on every update.
//! - A reusable [`LbfgsSolver`] state owning all per-iteration buffers:
//!   construct once, solve many times, no reallocation.
//! - Termination by gradient-norm tolerance (absolute + relative), by
//!   evaluation or wall-clock budget, or by an explicit stall — never by
//!   silently accepting an unsafe step.
//! - Tunable hyperparameters (`mem`, `tau1`) as named, domain-checked value
//!   objects, ready for an outer tuning loop.
//! - Per-iteration diagnostics through an injectable [`Reporter`] sink.
//!
//! # Example
//!
//! Minimize a strictly convex quadratic:
//!
//! ```
//! use lmqn::{LbfgsSolver, Objective, SolveOptions, Status};
//! use ndarray::{array, Array1};
//!
//! struct Quadratic {
//!     evals: usize,
//! }
//!
//! impl Objective for Quadratic {
//!     fn dimension(&self) -> usize {
//!         2
//!     }
//!     fn objective(&mut self, x: &Array1<f64>) -> f64 {
//!         self.evals += 1;
//!         (x[0] - 1.0).powi(2) + 4.0 * (x[1] - 1.0).powi(2)
//!     }
//!     fn gradient(&mut self, x: &Array1<f64>, g: &mut Array1<f64>) {
//!         g[0] = 2.0 * (x[0] - 1.0);
//!         g[1] = 8.0 * (x[1] - 1.0);
//!     }
//!     fn num_obj_evals(&self) -> usize {
//!         self.evals
//!     }
//!     fn initial_point(&self) -> Array1<f64> {
//!         Array1::zeros(2)
//!     }
//! }
//!
//! let mut problem = Quadratic { evals: 0 };
//! let mut solver = LbfgsSolver::new(&problem).unwrap();
//! let solution = solver
//!     .solve(&mut problem, &SolveOptions::default().with_tolerances(1e-6, 0.0))
//!     .unwrap();
//!
//! assert_eq!(solution.status, Status::FirstOrder);
//! assert!((solution.solution[0] - 1.0).abs() < 1e-5);
//! assert!((solution.solution[1] - 1.0).abs() < 1e-5);
//! ```

pub mod error;
pub mod linesearch;
pub mod memory;
pub mod model;
pub mod params;
pub mod problem;
pub mod report;
pub mod solver;

pub use error::SolverError;
pub use linesearch::{armijo_wolfe, LineSearchFailed, LineSearchOutcome};
pub use memory::LbfgsMemory;
pub use model::LineModel;
pub use params::{Domain, Param, ParamSet, Value};
pub use problem::Objective;
pub use report::{IterationRecord, LogReporter, Reporter, SilentReporter};
pub use solver::{LbfgsSolver, Solution, SolveOptions, Status};
