use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use nalgebra::{storage::Owned, DMatrix, DVector, Dyn};
use sac_core::Real;

use crate::{NllsProblem, SolveOptions, SolveReport};

/// Adapter exposing an [`NllsProblem`] to the `levenberg-marquardt` crate.
struct LmAdapter<'a, P: NllsProblem> {
    problem: &'a P,
    x: DVector<Real>,
}

impl<P: NllsProblem> LeastSquaresProblem<Real, Dyn, Dyn> for LmAdapter<'_, P> {
    type ResidualStorage = Owned<Real, Dyn>;
    type JacobianStorage = Owned<Real, Dyn, Dyn>;
    type ParameterStorage = Owned<Real, Dyn>;

    fn set_params(&mut self, x: &DVector<Real>) {
        self.x.clone_from(x);
    }

    fn params(&self) -> DVector<Real> {
        self.x.clone()
    }

    fn residuals(&self) -> Option<DVector<Real>> {
        Some(self.problem.residuals(&self.x))
    }

    fn jacobian(&self) -> Option<DMatrix<Real>> {
        Some(self.problem.jacobian(&self.x))
    }
}

/// Levenberg-Marquardt backend.
#[derive(Debug, Default, Clone)]
pub struct LmBackend;

impl LmBackend {
    /// Minimize `problem` starting from `x0`.
    ///
    /// Always returns a parameter vector; check `SolveReport::converged`
    /// before trusting it over the initial guess.
    pub fn solve<P: NllsProblem>(
        &self,
        problem: &P,
        x0: DVector<Real>,
        opts: &SolveOptions,
    ) -> (DVector<Real>, SolveReport) {
        debug_assert_eq!(x0.len(), problem.num_params());

        let lm = LevenbergMarquardt::new()
            .with_ftol(opts.ftol)
            .with_xtol(opts.xtol)
            .with_gtol(opts.gtol)
            .with_patience(opts.max_iters.max(1));

        let adapter = LmAdapter { problem, x: x0 };
        let (adapter, report) = lm.minimize(adapter);

        (
            adapter.x,
            SolveReport {
                iterations: report.number_of_evaluations,
                final_cost: report.objective_function,
                converged: report.termination.was_successful(),
            },
        )
    }
}
