//! Fatal configuration errors.
//!
//! Everything here is raised before the first iteration runs. Conditions that
//! end a run cleanly (tolerance met, budget exhausted, stalled search) are
//! reported as a `Status` on the solution record instead of an error.

use crate::params::{Domain, Value};

/// An error type for clear diagnostics on misconfigured solves.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("the problem is posed as maximization; this solver only minimizes")]
    Maximization,
    #[error("the problem is not unconstrained; constraints are not supported")]
    Constrained,
    #[error("unknown parameter `{name}`")]
    UnknownParameter {
        /// The name that was looked up.
        name: String,
    },
    #[error("value {value:?} for parameter `{name}` lies outside its domain {domain:?}")]
    OutOfDomain {
        name: String,
        value: Value,
        domain: Domain,
    },
    #[error("problem dimension {problem_dim} does not match solver dimension {solver_dim}")]
    DimensionMismatch {
        problem_dim: usize,
        solver_dim: usize,
    },
}
