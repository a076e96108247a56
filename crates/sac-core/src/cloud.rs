use serde::{Deserialize, Serialize};

use crate::math::{Real, Vec3};

/// Ordered list of unique point indices.
///
/// Used both to select a minimal sample and to report an inlier set.
pub type Indices = Vec<usize>;

/// A 3D point set stored as a structure of arrays.
///
/// Coordinates are `f32`, the native precision of sensor clouds and of the
/// data-parallel classification kernels; model-level math promotes to `f64`
/// on access. The container is owned by the caller and treated as read-only
/// by every model operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointCloud {
    xs: Vec<f32>,
    ys: Vec<f32>,
    zs: Vec<f32>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            xs: Vec::with_capacity(n),
            ys: Vec::with_capacity(n),
            zs: Vec::with_capacity(n),
        }
    }

    pub fn from_points(points: &[[f32; 3]]) -> Self {
        let mut cloud = Self::with_capacity(points.len());
        for &[x, y, z] in points {
            cloud.push(x, y, z);
        }
        cloud
    }

    pub fn push(&mut self, x: f32, y: f32, z: f32) {
        self.xs.push(x);
        self.ys.push(y);
        self.zs.push(z);
    }

    /// Overwrite the coordinates of point `i`.
    pub fn set(&mut self, i: usize, x: f32, y: f32, z: f32) {
        self.xs[i] = x;
        self.ys[i] = y;
        self.zs[i] = z;
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Point `i` promoted to double precision.
    #[inline]
    pub fn point(&self, i: usize) -> Vec3 {
        Vec3::new(
            Real::from(self.xs[i]),
            Real::from(self.ys[i]),
            Real::from(self.zs[i]),
        )
    }

    /// Point `i` at storage precision.
    #[inline]
    pub fn point_f32(&self, i: usize) -> [f32; 3] {
        [self.xs[i], self.ys[i], self.zs[i]]
    }

    pub fn xs(&self) -> &[f32] {
        &self.xs
    }

    pub fn ys(&self) -> &[f32] {
        &self.ys
    }

    pub fn zs(&self) -> &[f32] {
        &self.zs
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.len()).map(|i| self.point(i))
    }
}
