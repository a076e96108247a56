use sac_core::{EstimationError, Indices, Mat3, PointCloud, Real, Vec3};

use crate::sphere::SphereCoefficients;

/// Number of points that uniquely determine a sphere.
pub(crate) const SAMPLE_SIZE: usize = 4;

/// Cutoff on the scale-normalized determinant below which a sample is
/// treated as too ill-conditioned to solve.
const DEGENERACY_EPS: Real = 1e-8;

/// 3x3 system obtained by pairing sample point 0 against points 1..=3.
///
/// From the general sphere equation x^2+y^2+z^2 + Dx + Ey + Fz + G = 0,
/// subtracting the equation at p0 from the one at p_i eliminates G and the
/// quadratic terms, leaving rows `p_i - p0` and right-hand side
/// `|p0|^2 - |p_i|^2` in the unknowns (D, E, F).
fn difference_system(cloud: &PointCloud, samples: &Indices) -> (Mat3, Vec3) {
    let p0 = cloud.point(samples[0]);
    let n0 = p0.norm_squared();

    let mut a = Mat3::zeros();
    let mut b = Vec3::zeros();
    for row in 0..3 {
        let pi = cloud.point(samples[row + 1]);
        a.set_row(row, &(pi - p0).transpose());
        b[row] = n0 - pi.norm_squared();
    }
    (a, b)
}

/// Reject samples whose difference system is singular or nearly so:
/// coincident, collinear, or coplanar point quadruples.
///
/// The determinant is normalized by the row norms, so the check is invariant
/// under uniform scaling of the cloud.
pub(crate) fn is_sample_good(cloud: &PointCloud, samples: &Indices) -> bool {
    if samples.len() != SAMPLE_SIZE {
        return false;
    }

    let (a, _) = difference_system(cloud, samples);
    let scale: Real = (0..3).map(|r| a.row(r).norm()).product();
    if !scale.is_finite() || scale <= 0.0 {
        return false;
    }
    a.determinant().abs() / scale > DEGENERACY_EPS
}

/// Closed-form sphere through a minimal sample of 4 point indices.
pub(crate) fn sphere_from_sample(
    cloud: &PointCloud,
    samples: &Indices,
) -> Result<SphereCoefficients, EstimationError> {
    if samples.len() != SAMPLE_SIZE {
        return Err(EstimationError::NotEnoughSamples {
            needed: SAMPLE_SIZE,
            got: samples.len(),
        });
    }
    if !is_sample_good(cloud, samples) {
        return Err(EstimationError::DegenerateSample);
    }

    let (a, b) = difference_system(cloud, samples);
    let def = a.lu().solve(&b).ok_or(EstimationError::SingularSystem)?;

    let center = -0.5 * def;
    let radius = (cloud.point(samples[0]) - center).norm();
    Ok(SphereCoefficients::new(center, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cloud_on_sphere(center: [f32; 3], radius: f32, dirs: &[[f32; 3]]) -> PointCloud {
        let mut cloud = PointCloud::with_capacity(dirs.len());
        for d in dirs {
            let norm = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
            cloud.push(
                center[0] + radius * d[0] / norm,
                center[1] + radius * d[1] / norm,
                center[2] + radius * d[2] / norm,
            );
        }
        cloud
    }

    #[test]
    fn unit_sphere_from_four_points() {
        let cloud = PointCloud::from_points(&[
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [-1.0, 0.0, 0.0],
        ]);
        let coeffs = sphere_from_sample(&cloud, &vec![0, 1, 2, 3]).unwrap();

        assert_relative_eq!(coeffs.center.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(coeffs.center.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(coeffs.center.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(coeffs.radius, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn sample_points_sit_on_estimated_surface() {
        let cloud = cloud_on_sphere(
            [1.0, -2.0, 0.5],
            2.0,
            &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.2], [0.3, 0.0, 1.0], [1.0, 1.0, 1.0]],
        );
        let samples = vec![0, 1, 2, 3];
        let coeffs = sphere_from_sample(&cloud, &samples).unwrap();

        for &i in &samples {
            let d = (cloud.point(i) - coeffs.center).norm();
            assert_relative_eq!(d, coeffs.radius, epsilon = 1e-5);
        }
        assert_relative_eq!(coeffs.radius, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn collinear_sample_is_rejected() {
        let cloud = PointCloud::from_points(&[
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
            [2.0, 2.0, 2.0],
            [3.0, 3.0, 3.0],
        ]);
        let samples = vec![0, 1, 2, 3];
        assert!(!is_sample_good(&cloud, &samples));
        assert_eq!(
            sphere_from_sample(&cloud, &samples),
            Err(EstimationError::DegenerateSample)
        );
    }

    #[test]
    fn coplanar_sample_is_rejected() {
        // Four points on a circle in the z = 0 plane: infinitely many spheres.
        let cloud = PointCloud::from_points(&[
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
        ]);
        let samples = vec![0, 1, 2, 3];
        assert!(!is_sample_good(&cloud, &samples));
        assert_eq!(
            sphere_from_sample(&cloud, &samples),
            Err(EstimationError::DegenerateSample)
        );
    }

    #[test]
    fn repeated_index_is_rejected() {
        let cloud = PointCloud::from_points(&[
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [-1.0, 0.0, 0.0],
        ]);
        assert!(!is_sample_good(&cloud, &vec![0, 0, 1, 2]));
    }

    #[test]
    fn wrong_sample_count_is_an_error() {
        let cloud = PointCloud::from_points(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(
            sphere_from_sample(&cloud, &vec![0, 1, 2]),
            Err(EstimationError::NotEnoughSamples { needed: 4, got: 3 })
        );
    }

    #[test]
    fn degeneracy_check_is_scale_invariant() {
        let near_flat = |s: f32| {
            PointCloud::from_points(&[
                [0.0, 0.0, 0.0],
                [s, 0.0, 0.0],
                [0.0, s, 0.0],
                [s, s, s * 1e-10],
            ])
        };
        for s in [1e-3_f32, 1.0, 1e3] {
            assert!(!is_sample_good(&near_flat(s), &vec![0, 1, 2, 3]));
        }
    }
}
