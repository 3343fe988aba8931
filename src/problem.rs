//! The objective/gradient oracle interface.

use ndarray::Array1;

/// A smooth unconstrained minimization problem.
///
/// The solver is generic over this capability set rather than over a
/// concrete problem type; anything that can report its dimension and
/// evaluate value and gradient at arbitrary points qualifies. Implementors
/// own their evaluation counters — the solver's evaluation budget is checked
/// against `num_obj_evals`, so `objective` must count every call.
pub trait Objective {
    /// Number of variables.
    fn dimension(&self) -> usize;

    /// Objective value at `x`.
    fn objective(&mut self, x: &Array1<f64>) -> f64;

    /// Write `∇f(x)` into `g`. `g` has length `dimension()`.
    fn gradient(&mut self, x: &Array1<f64>, g: &mut Array1<f64>);

    /// How many times `objective` has been called.
    fn num_obj_evals(&self) -> usize;

    /// Whether the problem is posed as minimization.
    fn is_minimization(&self) -> bool {
        true
    }

    /// Whether the problem is unconstrained.
    fn is_unconstrained(&self) -> bool {
        true
    }

    /// Default starting point.
    fn initial_point(&self) -> Array1<f64>;
}
