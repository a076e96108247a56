//! End-to-end checks of the sphere model through the `SacModel` contract,
//! the way an iterative consensus driver consumes it.

use approx::assert_relative_eq;
use sac_core::{EstimationError, Indices, PointCloud, SacModel};
use sac_sphere::{rms_radial_residual, SphereCoefficients, SphereModel};

/// Four points on the unit sphere plus one gross outlier.
fn unit_sphere_with_outlier() -> PointCloud {
    PointCloud::from_points(&[
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [-1.0, 0.0, 0.0],
        [0.0, 0.0, 100.0],
    ])
}

#[test]
fn estimate_then_classify_with_outlier() {
    let cloud = unit_sphere_with_outlier();
    let model = SphereModel::new();
    let samples: Indices = vec![0, 1, 2, 3];

    assert!(model.is_sample_good(&cloud, &samples));
    let coeffs = model.compute_model_coefficients(&cloud, &samples).unwrap();

    assert_relative_eq!(coeffs.center.norm(), 0.0, epsilon = 1e-6);
    assert_relative_eq!(coeffs.radius, 1.0, epsilon = 1e-6);

    assert_eq!(model.count_within_distance(&cloud, &coeffs, 0.01), 4);
    assert_eq!(
        model.select_within_distance(&cloud, &coeffs, 0.01),
        vec![0, 1, 2, 3]
    );
    assert!(model.do_samples_verify_model(&cloud, &samples, &coeffs, 0.01));
    assert!(!model.do_samples_verify_model(&cloud, &vec![0, 4], &coeffs, 0.01));
}

#[test]
fn collinear_sample_yields_no_model() {
    let cloud = PointCloud::from_points(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [2.0, 0.0, 0.0],
        [3.0, 0.0, 0.0],
    ]);
    let model = SphereModel::new();
    let samples: Indices = vec![0, 1, 2, 3];

    assert!(!model.is_sample_good(&cloud, &samples));
    assert_eq!(
        model.compute_model_coefficients(&cloud, &samples),
        Err(EstimationError::DegenerateSample)
    );
}

#[test]
fn radius_bounds_reject_computed_model() {
    let cloud = PointCloud::from_points(&[
        [3.0, 0.0, 0.0],
        [0.0, 3.0, 0.0],
        [0.0, 0.0, 3.0],
        [-3.0, 0.0, 0.0],
    ]);
    let model = SphereModel::with_radius_limits(0.5, 2.0);
    let coeffs = model
        .compute_model_coefficients(&cloud, &vec![0, 1, 2, 3])
        .unwrap();

    assert_relative_eq!(coeffs.radius, 3.0, epsilon = 1e-6);
    assert!(!model.is_model_valid(&coeffs));
    // The same coefficients pass an unbounded model.
    assert!(SphereModel::new().is_model_valid(&coeffs));
}

#[test]
fn refining_with_three_inliers_is_a_no_op() {
    let cloud = unit_sphere_with_outlier();
    let model = SphereModel::new();
    let initial = SphereCoefficients::new(sac_core::Vec3::new(0.1, 0.1, 0.1), 0.9);

    let refined = model.optimize_model_coefficients(&cloud, &vec![0, 1, 2], &initial);
    assert_eq!(refined, initial);
}

#[test]
fn full_pass_estimate_refine_project() {
    let cloud = unit_sphere_with_outlier();
    let model = SphereModel::new();

    let coeffs = model
        .compute_model_coefficients(&cloud, &vec![0, 1, 2, 3])
        .unwrap();
    let inliers = model.select_within_distance(&cloud, &coeffs, 0.01);
    let refined = model.optimize_model_coefficients(&cloud, &inliers, &coeffs);

    assert_relative_eq!(refined.radius, 1.0, epsilon = 1e-6);
    assert!(rms_radial_residual(&cloud, &inliers, &refined) < 1e-6);

    let projected = model.project_points(&cloud, &inliers, &refined, false);
    assert_eq!(projected.len(), inliers.len());
    for p in projected.iter() {
        assert_relative_eq!((p - refined.center).norm(), refined.radius, epsilon = 1e-6);
    }

    // Full-cloud copy keeps the outlier untouched.
    let copied = model.project_points(&cloud, &inliers, &refined, true);
    assert_eq!(copied.len(), cloud.len());
    assert_eq!(copied.point_f32(4), [0.0, 0.0, 100.0]);
}

#[test]
fn distances_agree_with_verification() {
    let cloud = unit_sphere_with_outlier();
    let model = SphereModel::new();
    let coeffs = SphereCoefficients::new(sac_core::Vec3::zeros(), 1.0);

    let distances = model.get_distances(&cloud, &coeffs);
    assert_eq!(distances.len(), cloud.len());
    for (i, &d) in distances.iter().enumerate() {
        let idx: Indices = vec![i];
        assert_eq!(
            model.do_samples_verify_model(&cloud, &idx, &coeffs, 0.01),
            d <= 0.01
        );
    }
}

/// The driver-facing surface: a model is usable through the trait alone.
fn best_of_two_samples<M: SacModel>(
    model: &M,
    cloud: &PointCloud,
    a: &Indices,
    b: &Indices,
    threshold: f64,
) -> Option<(M::Coefficients, usize)> {
    [a, b]
        .into_iter()
        .filter(|s| model.is_sample_good(cloud, s))
        .filter_map(|s| model.compute_model_coefficients(cloud, s).ok())
        .filter(|c| model.is_model_valid(c))
        .map(|c| {
            let n = model.count_within_distance(cloud, &c, threshold);
            (c, n)
        })
        .max_by_key(|&(_, n)| n)
}

#[test]
fn trait_only_consumption_picks_the_better_sample() {
    let mut cloud = unit_sphere_with_outlier();
    cloud.push(0.0, -1.0, 0.0);
    // A second, smaller sphere supported by fewer points.
    cloud.push(0.2, 0.0, 50.0);
    cloud.push(0.0, 0.2, 50.0);
    cloud.push(-0.2, 0.0, 50.0);
    cloud.push(0.0, 0.0, 50.2);

    let model = SphereModel::new();
    let good: Indices = vec![0, 1, 2, 3];
    let small: Indices = vec![6, 7, 8, 9];

    let (coeffs, count) = best_of_two_samples(&model, &cloud, &good, &small, 0.01).unwrap();
    assert_eq!(count, 5);
    assert_relative_eq!(coeffs.radius, 1.0, epsilon = 1e-5);
}
