//! Limited-memory implicit inverse Hessian.

use ndarray::Array1;
use std::collections::VecDeque;

#[derive(Debug)]
struct CurvaturePair {
    s: Array1<f64>,
    y: Array1<f64>,
    // 1 / yᵀs, positive by construction
    rho: f64,
}

/// A limited-memory approximation to the inverse Hessian.
///
/// Holds at most `mem` curvature pairs `(s, y)` and applies the implicit
/// operator with the two-loop recursion (Nocedal & Wright, Algorithm 7.4)
/// in O(mem·n) time, never materializing a matrix. Pairs are evicted oldest
/// first once the memory is full. With scaling enabled, the implicit initial
/// diagonal is `γ·I` with `γ = yᵀs / yᵀy` refreshed from the newest pair.
#[derive(Debug)]
pub struct LbfgsMemory {
    mem: usize,
    scaling: bool,
    gamma: f64,
    pairs: VecDeque<CurvaturePair>,
    // scratch for the first recursion pass
    alpha: Vec<f64>,
}

impl LbfgsMemory {
    /// An empty memory holding up to `mem` pairs.
    pub fn new(mem: usize, scaling: bool) -> Self {
        let mem = mem.max(1);
        Self {
            mem,
            scaling,
            gamma: 1.0,
            pairs: VecDeque::with_capacity(mem),
            alpha: vec![0.0; mem],
        }
    }

    /// Number of pairs currently stored.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The history bound `mem`.
    pub fn depth(&self) -> usize {
        self.mem
    }

    /// Drop all pairs and restore the unit initial scaling.
    pub fn reset(&mut self) {
        self.pairs.clear();
        self.gamma = 1.0;
    }

    /// Incorporate a curvature pair, evicting the oldest once full.
    ///
    /// Pairs with non-positive (or non-finite) curvature `yᵀs` are skipped so
    /// the operator stays positive definite; an imprecise line search can
    /// legitimately produce such pairs. Returns whether the pair was stored.
    pub fn push(&mut self, s: Array1<f64>, y: Array1<f64>) -> bool {
        let sy = s.dot(&y);
        if !sy.is_finite() || sy <= 0.0 {
            log::debug!("[L-BFGS] curvature pair skipped (yᵀs = {:.3e})", sy);
            return false;
        }
        if self.scaling {
            let yy = y.dot(&y);
            if yy > 0.0 {
                self.gamma = sy / yy;
            }
        }
        if self.pairs.len() == self.mem {
            self.pairs.pop_front();
        }
        self.pairs.push_back(CurvaturePair {
            s,
            y,
            rho: 1.0 / sy,
        });
        true
    }

    /// Compute `out = -H·g`, the quasi-Newton descent direction.
    pub fn apply_neg_into(&mut self, g: &Array1<f64>, out: &mut Array1<f64>) {
        out.assign(g);
        // First pass, newest to oldest.
        for (i, pair) in self.pairs.iter().enumerate().rev() {
            let a = pair.rho * pair.s.dot(&*out);
            self.alpha[i] = a;
            out.scaled_add(-a, &pair.y);
        }
        if self.scaling {
            out.mapv_inplace(|v| v * self.gamma);
        }
        // Second pass, oldest to newest.
        for (i, pair) in self.pairs.iter().enumerate() {
            let beta = pair.rho * pair.y.dot(&*out);
            out.scaled_add(self.alpha[i] - beta, &pair.s);
        }
        out.mapv_inplace(|v| -v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn apply(mem: &mut LbfgsMemory, v: &Array1<f64>) -> Array1<f64> {
        let mut out = Array1::zeros(v.len());
        mem.apply_neg_into(v, &mut out);
        out
    }

    #[test]
    fn empty_memory_is_negated_identity() {
        let mut mem = LbfgsMemory::new(5, true);
        let v = array![1.0, -2.0, 3.0];
        assert_eq!(apply(&mut mem, &v), array![-1.0, 2.0, -3.0]);
    }

    #[test]
    fn secant_condition_holds_for_the_newest_pair() {
        // The BFGS recursion enforces H·y = s exactly for the most recent
        // pair, independently of the initial scaling.
        let mut mem = LbfgsMemory::new(3, true);
        assert!(mem.push(array![1.0, 0.0, 0.5], array![2.0, 0.0, 1.0]));
        assert!(mem.push(array![0.0, 1.0, 0.0], array![0.2, 3.0, 0.5]));

        let y = array![0.2, 3.0, 0.5];
        let out = apply(&mut mem, &y);
        for (o, s) in out.iter().zip([0.0, 1.0, 0.0]) {
            assert!((o + s).abs() < 1e-12, "H·y != s: got {o}, want {}", -s);
        }
    }

    #[test]
    fn nonpositive_curvature_is_skipped() {
        let mut mem = LbfgsMemory::new(5, true);
        let v = array![1.0, 1.0];
        let before = apply(&mut mem, &v);

        assert!(!mem.push(array![1.0, 0.0], array![-1.0, 0.0]));
        assert!(!mem.push(array![1.0, 0.0], array![0.0, 0.0]));
        assert!(!mem.push(array![1.0, 0.0], array![f64::NAN, 0.0]));

        // operator state is untouched: no pair stored, no rescaling
        assert!(mem.is_empty());
        assert_eq!(apply(&mut mem, &v), before);
    }

    #[test]
    fn history_is_bounded_and_fifo() {
        let mut mem = LbfgsMemory::new(2, false);
        for k in 1..=5 {
            let s = array![k as f64, 0.0];
            let y = array![1.0, 0.0];
            assert!(mem.push(s, y));
        }
        assert_eq!(mem.len(), 2);
        // oldest evicted first: pairs 4 and 5 remain
        assert_eq!(mem.pairs[0].s, array![4.0, 0.0]);
        assert_eq!(mem.pairs[1].s, array![5.0, 0.0]);
    }

    #[test]
    fn reset_restores_the_initial_operator() {
        let mut mem = LbfgsMemory::new(4, true);
        assert!(mem.push(array![1.0, 2.0], array![3.0, 1.0]));
        mem.reset();

        assert!(mem.is_empty());
        let v = array![2.0, -4.0];
        assert_eq!(apply(&mut mem, &v), array![-2.0, 4.0]);
    }
}
