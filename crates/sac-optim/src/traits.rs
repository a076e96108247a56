use nalgebra::{DMatrix, DVector};
use sac_core::Real;

/// A dense nonlinear least-squares problem over a flat parameter vector.
///
/// Implementors supply residuals and an analytic Jacobian; a backend drives
/// the iteration. Dimensions are fixed for the lifetime of the problem.
pub trait NllsProblem {
    /// Length of the parameter vector.
    fn num_params(&self) -> usize;

    /// Number of residual rows.
    fn num_residuals(&self) -> usize;

    /// Residual vector at `x`, `num_residuals` rows.
    fn residuals(&self, x: &DVector<Real>) -> DVector<Real>;

    /// Jacobian at `x`, `num_residuals x num_params`.
    fn jacobian(&self, x: &DVector<Real>) -> DMatrix<Real>;
}

/// Termination criteria shared by solver backends.
#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    /// Iteration cap; backends may interpret this as an evaluation budget.
    pub max_iters: usize,
    /// Relative tolerance on cost reduction.
    pub ftol: Real,
    /// Gradient orthogonality tolerance.
    pub gtol: Real,
    /// Relative tolerance on parameter updates.
    pub xtol: Real,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iters: 50,
            ftol: 1e-10,
            gtol: 1e-10,
            xtol: 1e-10,
        }
    }
}

/// Outcome summary of a solve.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub iterations: usize,
    pub final_cost: Real,
    pub converged: bool,
}
