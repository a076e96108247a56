//! Sphere model for sample-consensus segmentation of 3D point sets.
//!
//! [`SphereModel`] implements the [`sac_core::SacModel`] contract: a
//! closed-form estimator over minimal 4-point samples, radial residual
//! evaluation, threshold classification with data-parallel counting
//! strategies, Levenberg-Marquardt refinement over an inlier set, projection
//! onto the fitted surface, and sample/model validity checks. An iterative
//! consensus driver supplies the sampling loop and consumes the trait.

mod distances;
mod estimate;
mod inliers;
mod project;
mod refine;
mod sphere;

pub use distances::rms_radial_residual;
pub use inliers::{simd_level, SimdLevel};
pub use sphere::{SphereCoefficients, SphereModel, SphereModelConfig};
