use log::debug;
use nalgebra::{DMatrix, DVector};
use sac_core::{Indices, PointCloud, Real, Vec3};
use sac_optim::{LmBackend, NllsProblem, SolveOptions};

use crate::estimate::SAMPLE_SIZE;
use crate::sphere::SphereCoefficients;

/// Geometric sphere fit: one radial residual `|p_i - c| - r` per inlier,
/// parameters `(cx, cy, cz, r)`.
struct RadialFit<'a> {
    cloud: &'a PointCloud,
    inliers: &'a [usize],
}

impl NllsProblem for RadialFit<'_> {
    fn num_params(&self) -> usize {
        4
    }

    fn num_residuals(&self) -> usize {
        self.inliers.len()
    }

    fn residuals(&self, x: &DVector<Real>) -> DVector<Real> {
        let center = Vec3::new(x[0], x[1], x[2]);
        let radius = x[3];
        DVector::from_iterator(
            self.inliers.len(),
            self.inliers
                .iter()
                .map(|&i| (self.cloud.point(i) - center).norm() - radius),
        )
    }

    fn jacobian(&self, x: &DVector<Real>) -> DMatrix<Real> {
        let center = Vec3::new(x[0], x[1], x[2]);
        let mut jac = DMatrix::zeros(self.inliers.len(), 4);
        for (row, &i) in self.inliers.iter().enumerate() {
            let diff = center - self.cloud.point(i);
            // Clamp keeps the row finite for a point sitting on the center.
            let dist = diff.norm().max(1e-12);
            jac[(row, 0)] = diff.x / dist;
            jac[(row, 1)] = diff.y / dist;
            jac[(row, 2)] = diff.z / dist;
            jac[(row, 3)] = -1.0;
        }
        jac
    }
}

/// Refine coefficients over an inlier set by nonlinear least squares.
///
/// Returns the input unchanged when the inlier set is smaller than a minimal
/// sample, the solver does not converge within its iteration budget, or the
/// solution is non-finite or has negative radius.
pub(crate) fn optimize_coefficients(
    cloud: &PointCloud,
    inliers: &Indices,
    coefficients: &SphereCoefficients,
) -> SphereCoefficients {
    if inliers.len() < SAMPLE_SIZE {
        debug!(
            "sphere refinement needs at least {SAMPLE_SIZE} inliers, got {}; keeping initial coefficients",
            inliers.len()
        );
        return *coefficients;
    }

    let problem = RadialFit {
        cloud,
        inliers: inliers.as_slice(),
    };
    let x0 = DVector::from_vec(vec![
        coefficients.center.x,
        coefficients.center.y,
        coefficients.center.z,
        coefficients.radius,
    ]);

    let (x, report) = LmBackend.solve(&problem, x0, &SolveOptions::default());
    let refined = SphereCoefficients::new(Vec3::new(x[0], x[1], x[2]), x[3]);

    if !report.converged || !refined.is_finite() || refined.radius < 0.0 {
        debug!(
            "sphere refinement rejected after {} evaluations (converged: {}); keeping initial coefficients",
            report.iterations, report.converged
        );
        return *coefficients;
    }
    refined
}
