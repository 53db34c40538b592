//! Levenberg–Marquardt backend built on the `levenberg-marquardt` crate.

use crate::{NllsProblem, NllsSolverBackend, SolveOptions, SolveReport};
use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use nalgebra::{storage::Owned, DMatrix, DVector, Dyn};
use triangulate_core::Real;

/// Evaluates the problem once per parameter update and hands out the cached
/// residuals and Jacobian. Non-finite values are withheld, which makes the
/// solver stop instead of stepping through them.
///
/// The solver can stop on a rejected trial step, so the lowest-cost finite
/// parameters seen so far are kept separately.
struct LmAdapter<'a, P: NllsProblem> {
    problem: &'a P,
    params: DVector<Real>,
    residuals: Option<DVector<Real>>,
    jacobian: Option<DMatrix<Real>>,
    best: Option<(DVector<Real>, Real)>,
}

impl<'a, P: NllsProblem> LmAdapter<'a, P> {
    fn new(problem: &'a P, params: DVector<Real>) -> Self {
        let mut adapter = Self {
            problem,
            params: DVector::zeros(0),
            residuals: None,
            jacobian: None,
            best: None,
        };
        adapter.update(params);
        adapter
    }

    fn update(&mut self, params: DVector<Real>) {
        let (r, j) = self.problem.linearize(&params);
        self.residuals = r.iter().all(|v| v.is_finite()).then_some(r);
        self.jacobian = j.iter().all(|v| v.is_finite()).then_some(j);
        if let Some(r) = &self.residuals {
            let cost = 0.5 * r.norm_squared();
            if self.best.as_ref().map_or(true, |(_, c)| cost <= *c) {
                self.best = Some((params.clone(), cost));
            }
        }
        self.params = params;
    }

    /// Lowest-cost finite parameters, or the last ones tried if none were finite.
    fn into_solution(self) -> (DVector<Real>, Option<Real>) {
        match self.best {
            Some((x, cost)) => (x, Some(cost)),
            None => (self.params, None),
        }
    }
}

impl<P: NllsProblem> LeastSquaresProblem<Real, Dyn, Dyn> for LmAdapter<'_, P> {
    type ResidualStorage = Owned<Real, Dyn>;
    type JacobianStorage = Owned<Real, Dyn, Dyn>;
    type ParameterStorage = Owned<Real, Dyn>;

    fn set_params(&mut self, x: &DVector<Real>) {
        self.update(x.clone());
    }

    fn params(&self) -> DVector<Real> {
        self.params.clone()
    }

    fn residuals(&self) -> Option<DVector<Real>> {
        self.residuals.clone()
    }

    fn jacobian(&self) -> Option<DMatrix<Real>> {
        self.jacobian.clone()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LmBackend;

impl NllsSolverBackend for LmBackend {
    fn solve<P: NllsProblem>(
        &self,
        problem: &P,
        x0: DVector<Real>,
        opts: &SolveOptions,
    ) -> (DVector<Real>, SolveReport) {
        let lm = LevenbergMarquardt::new()
            .with_ftol(opts.ftol)
            .with_xtol(opts.xtol)
            .with_gtol(opts.gtol)
            .with_patience(opts.max_iters.max(1));

        let (adapter, report) = lm.minimize(LmAdapter::new(problem, x0));
        let (x, best_cost) = adapter.into_solution();
        let report = SolveReport {
            evaluations: report.number_of_evaluations,
            final_cost: best_cost.unwrap_or(report.objective_function),
            converged: report.termination.was_successful(),
        };
        (x, report)
    }
}
