//! Threshold classification of cloud points against a sphere.
//!
//! Counting runs one of three strategies over the same single-precision
//! arithmetic: a scalar loop, a 4-lane SSE kernel, or an 8-lane AVX kernel,
//! each vector kernel finishing with a scalar tail. The strategy is resolved
//! once per process from detected CPU features. Results are identical across
//! strategies except for points whose residual lands exactly on the
//! threshold, where reordered float arithmetic may tip either way.

use std::sync::OnceLock;

use sac_core::{Indices, PointCloud, Real};

use crate::sphere::SphereCoefficients;

/// Available counting strategies, widest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdLevel {
    /// One point per step, any architecture.
    Scalar,
    /// 4 lanes (SSE/SSE2/SSE4.1).
    Sse41,
    /// 8 lanes (AVX/AVX2).
    Avx2,
}

static SIMD_LEVEL: OnceLock<SimdLevel> = OnceLock::new();

/// Counting strategy bound for this process.
pub fn simd_level() -> SimdLevel {
    *SIMD_LEVEL.get_or_init(detect_simd_level)
}

fn detect_simd_level() -> SimdLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            return SimdLevel::Avx2;
        }
        if is_x86_feature_detected!("sse4.1") {
            return SimdLevel::Sse41;
        }
    }
    SimdLevel::Scalar
}

/// Single-precision view of the coefficients and threshold, shared by all
/// strategies so they classify on identical arithmetic.
#[derive(Clone, Copy)]
struct Params {
    cx: f32,
    cy: f32,
    cz: f32,
    r: f32,
    t: f32,
}

impl Params {
    fn new(coefficients: &SphereCoefficients, threshold: Real) -> Self {
        Self {
            cx: coefficients.center.x as f32,
            cy: coefficients.center.y as f32,
            cz: coefficients.center.z as f32,
            r: coefficients.radius as f32,
            t: threshold as f32,
        }
    }

    /// `|dist(p, center) - r| <= t`, written as a two-sided comparison so the
    /// vector kernels can mirror it lane for lane. The squared-norm sum
    /// associates the same way as in the kernels. NaN never classifies as an
    /// inlier.
    #[inline]
    fn is_inlier(&self, x: f32, y: f32, z: f32) -> bool {
        let dx = x - self.cx;
        let dy = y - self.cy;
        let dz = z - self.cz;
        let d = (dx * dx + (dy * dy + dz * dz)).sqrt() - self.r;
        -self.t <= d && d <= self.t
    }
}

/// Number of points with residual within the threshold.
pub(crate) fn count_within_distance(
    cloud: &PointCloud,
    coefficients: &SphereCoefficients,
    threshold: Real,
) -> usize {
    let params = Params::new(coefficients, threshold);
    match simd_level() {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 => unsafe { count_avx2(cloud, &params) },
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Sse41 => unsafe { count_sse41(cloud, &params) },
        _ => count_scalar(cloud, &params, 0),
    }
}

/// Ascending indices of all points with residual within the threshold.
///
/// Selection is scalar; it applies the same predicate as the scalar counting
/// strategy.
pub(crate) fn select_within_distance(
    cloud: &PointCloud,
    coefficients: &SphereCoefficients,
    threshold: Real,
) -> Indices {
    let params = Params::new(coefficients, threshold);
    let (xs, ys, zs) = (cloud.xs(), cloud.ys(), cloud.zs());

    let mut inliers = Indices::new();
    for i in 0..cloud.len() {
        if params.is_inlier(xs[i], ys[i], zs[i]) {
            inliers.push(i);
        }
    }
    inliers
}

/// Scalar strategy, also the tail loop of the vector kernels.
fn count_scalar(cloud: &PointCloud, params: &Params, start: usize) -> usize {
    let (xs, ys, zs) = (cloud.xs(), cloud.ys(), cloud.zs());
    let mut count = 0;
    for i in start..cloud.len() {
        if params.is_inlier(xs[i], ys[i], zs[i]) {
            count += 1;
        }
    }
    count
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.1")]
unsafe fn count_sse41(cloud: &PointCloud, params: &Params) -> usize {
    use std::arch::x86_64::*;

    let (xs, ys, zs) = (cloud.xs(), cloud.ys(), cloud.zs());
    let n = cloud.len();
    let simd_n = n - n % 4;

    let cx = _mm_set1_ps(params.cx);
    let cy = _mm_set1_ps(params.cy);
    let cz = _mm_set1_ps(params.cz);
    let r = _mm_set1_ps(params.r);
    let upper = _mm_set1_ps(params.t);
    let lower = _mm_set1_ps(-params.t);

    let mut count = 0usize;
    let mut i = 0usize;
    while i < simd_n {
        let dx = _mm_sub_ps(_mm_loadu_ps(xs.as_ptr().add(i)), cx);
        let dy = _mm_sub_ps(_mm_loadu_ps(ys.as_ptr().add(i)), cy);
        let dz = _mm_sub_ps(_mm_loadu_ps(zs.as_ptr().add(i)), cz);

        let sq = _mm_add_ps(
            _mm_mul_ps(dx, dx),
            _mm_add_ps(_mm_mul_ps(dy, dy), _mm_mul_ps(dz, dz)),
        );
        let d = _mm_sub_ps(_mm_sqrt_ps(sq), r);

        // Ordered comparisons: NaN lanes drop out of the mask.
        let mask = _mm_and_ps(_mm_cmpge_ps(d, lower), _mm_cmple_ps(d, upper));
        count += _mm_movemask_ps(mask).count_ones() as usize;
        i += 4;
    }

    count + count_scalar(cloud, params, simd_n)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn count_avx2(cloud: &PointCloud, params: &Params) -> usize {
    use std::arch::x86_64::*;

    let (xs, ys, zs) = (cloud.xs(), cloud.ys(), cloud.zs());
    let n = cloud.len();
    let simd_n = n - n % 8;

    let cx = _mm256_set1_ps(params.cx);
    let cy = _mm256_set1_ps(params.cy);
    let cz = _mm256_set1_ps(params.cz);
    let r = _mm256_set1_ps(params.r);
    let upper = _mm256_set1_ps(params.t);
    let lower = _mm256_set1_ps(-params.t);

    let mut count = 0usize;
    let mut i = 0usize;
    while i < simd_n {
        let dx = _mm256_sub_ps(_mm256_loadu_ps(xs.as_ptr().add(i)), cx);
        let dy = _mm256_sub_ps(_mm256_loadu_ps(ys.as_ptr().add(i)), cy);
        let dz = _mm256_sub_ps(_mm256_loadu_ps(zs.as_ptr().add(i)), cz);

        let sq = _mm256_add_ps(
            _mm256_mul_ps(dx, dx),
            _mm256_add_ps(_mm256_mul_ps(dy, dy), _mm256_mul_ps(dz, dz)),
        );
        let d = _mm256_sub_ps(_mm256_sqrt_ps(sq), r);

        let mask = _mm256_and_ps(
            _mm256_cmp_ps(d, lower, _CMP_GE_OQ),
            _mm256_cmp_ps(d, upper, _CMP_LE_OQ),
        );
        count += _mm256_movemask_ps(mask).count_ones() as usize;
        i += 8;
    }

    count + count_scalar(cloud, params, simd_n)
}
