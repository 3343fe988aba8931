//! Restriction of the objective to a one-dimensional ray.

use crate::problem::Objective;
use ndarray::Array1;

/// The scalar model `φ(t) = f(x + t·d)`.
///
/// Owns nothing but a trial-point scratch buffer; the base point `x` and
/// direction `d` are read fresh on every probe, so "redirecting" the model
/// after the iterate moves is simply calling it with the current buffers.
/// Every probe is a fresh oracle call — no value or gradient is ever cached
/// across base points or directions.
#[derive(Debug)]
pub struct LineModel {
    xt: Array1<f64>,
}

impl LineModel {
    pub fn new(n: usize) -> Self {
        Self {
            xt: Array1::zeros(n),
        }
    }

    fn probe(&mut self, x: &Array1<f64>, d: &Array1<f64>, t: f64) {
        self.xt.assign(x);
        self.xt.scaled_add(t, d);
    }

    /// Evaluate `φ(t)`.
    pub fn value<P: Objective>(
        &mut self,
        problem: &mut P,
        x: &Array1<f64>,
        d: &Array1<f64>,
        t: f64,
    ) -> f64 {
        self.probe(x, d, t);
        problem.objective(&self.xt)
    }

    /// Fill `g` with `∇f(x + t·d)` and return `φ'(t) = gᵀd`.
    pub fn slope<P: Objective>(
        &mut self,
        problem: &mut P,
        x: &Array1<f64>,
        d: &Array1<f64>,
        t: f64,
        g: &mut Array1<f64>,
    ) -> f64 {
        self.probe(x, d, t);
        problem.gradient(&self.xt, g);
        g.dot(d)
    }

    /// The most recently probed point.
    pub fn trial_point(&self) -> &Array1<f64> {
        &self.xt
    }
}
