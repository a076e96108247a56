use serde::{Deserialize, Serialize};

use sac_core::{EstimationError, Indices, PointCloud, Real, SacModel, Vec3};

use crate::{distances, estimate, inliers, project, refine};

/// Sphere coefficients: center and radius.
///
/// A valid model has finite values and non-negative radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereCoefficients {
    pub center: Vec3,
    pub radius: Real,
}

impl SphereCoefficients {
    pub fn new(center: Vec3, radius: Real) -> Self {
        Self { center, radius }
    }

    pub fn is_finite(&self) -> bool {
        self.center.iter().all(|v| v.is_finite()) && self.radius.is_finite()
    }
}

/// Radius bounds applied during model validation.
///
/// The defaults are unbounded and impose no constraint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SphereModelConfig {
    pub radius_min: Real,
    pub radius_max: Real,
}

impl Default for SphereModelConfig {
    fn default() -> Self {
        Self {
            radius_min: Real::NEG_INFINITY,
            radius_max: Real::INFINITY,
        }
    }
}

/// Sphere model for sample-consensus segmentation.
///
/// The configuration is fixed at construction and every operation borrows
/// the cloud, so one model value can serve concurrent fitting trials.
/// Cloning produces an independent model with the same configuration.
#[derive(Debug, Clone, Default)]
pub struct SphereModel {
    config: SphereModelConfig,
}

impl SphereModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SphereModelConfig) -> Self {
        Self { config }
    }

    /// Accept only models with radius in `[radius_min, radius_max]`.
    pub fn with_radius_limits(radius_min: Real, radius_max: Real) -> Self {
        Self::with_config(SphereModelConfig {
            radius_min,
            radius_max,
        })
    }

    pub fn config(&self) -> &SphereModelConfig {
        &self.config
    }
}

impl SacModel for SphereModel {
    type Coefficients = SphereCoefficients;

    fn name(&self) -> &'static str {
        "sphere"
    }

    fn sample_size(&self) -> usize {
        estimate::SAMPLE_SIZE
    }

    fn model_size(&self) -> usize {
        4
    }

    fn compute_model_coefficients(
        &self,
        cloud: &PointCloud,
        samples: &Indices,
    ) -> Result<SphereCoefficients, EstimationError> {
        estimate::sphere_from_sample(cloud, samples)
    }

    fn get_distances(&self, cloud: &PointCloud, coefficients: &SphereCoefficients) -> Vec<Real> {
        distances::get_distances(cloud, coefficients)
    }

    fn select_within_distance(
        &self,
        cloud: &PointCloud,
        coefficients: &SphereCoefficients,
        threshold: Real,
    ) -> Indices {
        inliers::select_within_distance(cloud, coefficients, threshold)
    }

    fn count_within_distance(
        &self,
        cloud: &PointCloud,
        coefficients: &SphereCoefficients,
        threshold: Real,
    ) -> usize {
        inliers::count_within_distance(cloud, coefficients, threshold)
    }

    fn optimize_model_coefficients(
        &self,
        cloud: &PointCloud,
        inliers: &Indices,
        coefficients: &SphereCoefficients,
    ) -> SphereCoefficients {
        refine::optimize_coefficients(cloud, inliers, coefficients)
    }

    fn project_points(
        &self,
        cloud: &PointCloud,
        inliers: &Indices,
        coefficients: &SphereCoefficients,
        copy_data_fields: bool,
    ) -> PointCloud {
        project::project_points(cloud, inliers, coefficients, copy_data_fields)
    }

    fn do_samples_verify_model(
        &self,
        cloud: &PointCloud,
        indices: &Indices,
        coefficients: &SphereCoefficients,
        threshold: Real,
    ) -> bool {
        distances::do_samples_verify_model(cloud, indices, coefficients, threshold)
    }

    fn is_sample_good(&self, cloud: &PointCloud, samples: &Indices) -> bool {
        estimate::is_sample_good(cloud, samples)
    }

    fn is_model_valid(&self, coefficients: &SphereCoefficients) -> bool {
        if !coefficients.is_finite() || coefficients.radius < 0.0 {
            return false;
        }
        coefficients.radius >= self.config.radius_min
            && coefficients.radius <= self.config.radius_max
    }
}
