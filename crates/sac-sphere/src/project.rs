use sac_core::{Indices, PointCloud, Vec3};

use crate::sphere::SphereCoefficients;

/// Radial projection of a point onto the sphere surface.
///
/// A point coinciding with the center has no defined direction and is
/// returned unmoved; the same applies to non-finite input.
fn onto_surface(p: Vec3, coefficients: &SphereCoefficients) -> Vec3 {
    let dir = p - coefficients.center;
    let dist = dir.norm();
    if !dist.is_finite() || dist <= 0.0 {
        return p;
    }
    coefficients.center + dir * (coefficients.radius / dist)
}

/// Project the referenced points onto the sphere.
///
/// With `copy_data_fields` the output is a full copy of the cloud with the
/// referenced points moved onto the surface, preserving all other entries;
/// otherwise it holds only the projected points, in `inliers` order.
pub(crate) fn project_points(
    cloud: &PointCloud,
    inliers: &Indices,
    coefficients: &SphereCoefficients,
    copy_data_fields: bool,
) -> PointCloud {
    if copy_data_fields {
        let mut projected = cloud.clone();
        for &i in inliers {
            let q = onto_surface(cloud.point(i), coefficients);
            projected.set(i, q.x as f32, q.y as f32, q.z as f32);
        }
        projected
    } else {
        let mut projected = PointCloud::with_capacity(inliers.len());
        for &i in inliers {
            let q = onto_surface(cloud.point(i), coefficients);
            projected.push(q.x as f32, q.y as f32, q.z as f32);
        }
        projected
    }
}
