use nalgebra::{DMatrix, DVector};
use triangulate_core::Real;

/// Dense least-squares problem `min ½ Σ (s_i r_i(x))²`.
///
/// Implementors supply the plain residuals and their Jacobian. Row scales
/// `s_i` come from [`robust_row_scales`](Self::robust_row_scales) and are
/// treated as constants during a step (IRLS), so the weighted Jacobian is just
/// the row-scaled plain one.
pub trait NllsProblem {
    fn num_params(&self) -> usize;
    fn num_residuals(&self) -> usize;

    fn residuals_unweighted(&self, x: &DVector<Real>) -> DVector<Real>;
    fn jacobian_unweighted(&self, x: &DVector<Real>) -> DMatrix<Real>;

    /// `sqrt(w_i)` per residual row; all ones unless the problem is robust.
    fn robust_row_scales(&self, r_unweighted: &DVector<Real>) -> DVector<Real> {
        DVector::from_element(r_unweighted.len(), 1.0)
    }

    fn weighted_residuals(&self, x: &DVector<Real>) -> DVector<Real> {
        let r = self.residuals_unweighted(x);
        let scales = self.robust_row_scales(&r);
        r.component_mul(&scales)
    }

    /// Weighted residuals and Jacobian from a single residual evaluation.
    fn linearize(&self, x: &DVector<Real>) -> (DVector<Real>, DMatrix<Real>) {
        let mut r = self.residuals_unweighted(x);
        let mut j = self.jacobian_unweighted(x);
        let scales = self.robust_row_scales(&r);
        debug_assert_eq!(scales.len(), j.nrows());
        for (row, &s) in scales.iter().enumerate() {
            if s != 1.0 {
                r[row] *= s;
                j.row_mut(row).scale_mut(s);
            }
        }
        (r, j)
    }
}

/// Termination criteria shared by all backends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    /// Iteration cap; LM turns it into an evaluation budget of
    /// `max_iters * (num_params + 1)`.
    pub max_iters: usize,
    pub ftol: Real,
    pub gtol: Real,
    pub xtol: Real,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iters: 100,
            ftol: 1e-12,
            gtol: 1e-12,
            xtol: 1e-12,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    /// Residual evaluations spent by the backend.
    pub evaluations: usize,
    /// `½ ‖weighted residuals‖²` at the returned parameters.
    pub final_cost: Real,
    pub converged: bool,
}

/// Minimizes an [`NllsProblem`] from a starting point.
pub trait NllsSolverBackend {
    fn solve<P: NllsProblem>(
        &self,
        problem: &P,
        x0: DVector<Real>,
        opts: &SolveOptions,
    ) -> (DVector<Real>, SolveReport);
}
