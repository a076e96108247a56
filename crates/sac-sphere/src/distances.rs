use sac_core::{Indices, PointCloud, Real, Vec3};

use crate::sphere::SphereCoefficients;

/// Absolute radial residual of a single point.
#[inline]
pub(crate) fn radial_residual(p: &Vec3, coefficients: &SphereCoefficients) -> Real {
    ((p - coefficients.center).norm() - coefficients.radius).abs()
}

/// Residual of every cloud point, in cloud order. Non-finite coordinates
/// propagate into the output unfiltered.
pub(crate) fn get_distances(cloud: &PointCloud, coefficients: &SphereCoefficients) -> Vec<Real> {
    cloud.iter().map(|p| radial_residual(&p, coefficients)).collect()
}

/// True iff every referenced point has residual `<= threshold`.
/// Stops at the first failing point.
pub(crate) fn do_samples_verify_model(
    cloud: &PointCloud,
    indices: &Indices,
    coefficients: &SphereCoefficients,
    threshold: Real,
) -> bool {
    indices
        .iter()
        .all(|&i| radial_residual(&cloud.point(i), coefficients) <= threshold)
}

/// Root-mean-square radial residual over a subset of points.
///
/// Zero for an empty subset.
pub fn rms_radial_residual(
    cloud: &PointCloud,
    indices: &Indices,
    coefficients: &SphereCoefficients,
) -> Real {
    if indices.is_empty() {
        return 0.0;
    }
    let ss: Real = indices
        .iter()
        .map(|&i| {
            let d = radial_residual(&cloud.point(i), coefficients);
            d * d
        })
        .sum();
    (ss / indices.len() as Real).sqrt()
}
