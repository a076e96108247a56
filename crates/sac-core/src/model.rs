use thiserror::Error;

use crate::cloud::{Indices, PointCloud};
use crate::math::Real;

/// Recoverable failures of minimal-sample coefficient estimation.
///
/// A consensus driver handles these by discarding the trial and resampling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimationError {
    #[error("need exactly {needed} sample points, got {got}")]
    NotEnoughSamples { needed: usize, got: usize },
    #[error("sample configuration is degenerate")]
    DegenerateSample,
    #[error("linear system is singular")]
    SingularSystem,
}

/// Contract between a primitive shape model and an iterative consensus driver.
///
/// The driver owns sampling policy and trial bookkeeping; the model owns
/// everything shape-specific: estimation from a minimal sample, residual
/// evaluation, inlier classification, refinement, projection and validity
/// checks. All operations are pure with respect to the cloud, which is
/// passed by shared reference and never mutated.
pub trait SacModel {
    /// Shape coefficients produced by estimation and consumed by evaluation.
    type Coefficients: Clone;

    /// Short identifier for diagnostics.
    fn name(&self) -> &'static str;

    /// Number of points in a minimal sample.
    fn sample_size(&self) -> usize;

    /// Number of scalar coefficients of the shape.
    fn model_size(&self) -> usize;

    /// Estimate coefficients from a minimal sample of point indices.
    fn compute_model_coefficients(
        &self,
        cloud: &PointCloud,
        samples: &Indices,
    ) -> Result<Self::Coefficients, EstimationError>;

    /// Absolute residual of every cloud point against the shape, in cloud order.
    ///
    /// Non-finite coordinates propagate into the residuals unfiltered.
    fn get_distances(&self, cloud: &PointCloud, coefficients: &Self::Coefficients) -> Vec<Real>;

    /// Indices of all points with residual `<= threshold`, ascending.
    fn select_within_distance(
        &self,
        cloud: &PointCloud,
        coefficients: &Self::Coefficients,
        threshold: Real,
    ) -> Indices;

    /// Number of points with residual `<= threshold`.
    fn count_within_distance(
        &self,
        cloud: &PointCloud,
        coefficients: &Self::Coefficients,
        threshold: Real,
    ) -> usize;

    /// Refine coefficients against an inlier set.
    ///
    /// Infallible by contract: when the inlier set is too small or the
    /// underlying solve does not converge, the input coefficients are
    /// returned unchanged.
    fn optimize_model_coefficients(
        &self,
        cloud: &PointCloud,
        inliers: &Indices,
        coefficients: &Self::Coefficients,
    ) -> Self::Coefficients;

    /// Project the referenced points onto the shape surface.
    ///
    /// With `copy_data_fields` the result is a full copy of the cloud with
    /// the referenced points moved onto the surface; otherwise it holds only
    /// the projected points, in `inliers` order.
    fn project_points(
        &self,
        cloud: &PointCloud,
        inliers: &Indices,
        coefficients: &Self::Coefficients,
        copy_data_fields: bool,
    ) -> PointCloud;

    /// True iff every referenced point has residual `<= threshold`.
    fn do_samples_verify_model(
        &self,
        cloud: &PointCloud,
        indices: &Indices,
        coefficients: &Self::Coefficients,
        threshold: Real,
    ) -> bool;

    /// Cheap degeneracy pre-check for a candidate minimal sample.
    fn is_sample_good(&self, cloud: &PointCloud, samples: &Indices) -> bool;

    /// Check coefficients against finiteness and configured bounds.
    fn is_model_valid(&self, coefficients: &Self::Coefficients) -> bool;
}
