//! Fit a sphere to a noisy synthetic cloud with outliers, then refine and
//! project the inliers. Stands in for the iterative consensus driver that
//! would normally feed this model.

use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sac_core::{Indices, PointCloud, SacModel, Vec3};
use sac_sphere::{rms_radial_residual, simd_level, SphereModel};

fn synthetic_cloud(rng: &mut StdRng) -> PointCloud {
    let center = Vec3::new(0.4, -0.8, 1.2);
    let radius = 1.5;

    let mut cloud = PointCloud::with_capacity(1200);
    // 1000 noisy surface points.
    for _ in 0..1000 {
        let theta = rng.random_range(0.0..std::f64::consts::TAU);
        let z = rng.random_range(-1.0_f64..1.0);
        let s = (1.0 - z * z).sqrt();
        let dir = Vec3::new(s * theta.cos(), s * theta.sin(), z);
        let p = center + (radius + rng.random_range(-0.01..=0.01)) * dir;
        cloud.push(p.x as f32, p.y as f32, p.z as f32);
    }
    // 200 outliers scattered in a surrounding box.
    for _ in 0..200 {
        cloud.push(
            rng.random_range(-4.0..4.0),
            rng.random_range(-4.0..4.0),
            rng.random_range(-4.0..4.0),
        );
    }
    cloud
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(12345);
    let cloud = synthetic_cloud(&mut rng);
    let model = SphereModel::with_radius_limits(0.1, 10.0);
    let threshold = 0.03;

    println!("points: {}, counting strategy: {:?}", cloud.len(), simd_level());

    // A handful of random minimal samples; keep the best-supported model.
    let mut best: Option<(sac_sphere::SphereCoefficients, usize)> = None;
    for _ in 0..64 {
        let samples: Indices = (0..4).map(|_| rng.random_range(0..cloud.len())).collect();
        if !model.is_sample_good(&cloud, &samples) {
            continue;
        }
        let Ok(coeffs) = model.compute_model_coefficients(&cloud, &samples) else {
            continue;
        };
        if !model.is_model_valid(&coeffs) {
            continue;
        }
        let count = model.count_within_distance(&cloud, &coeffs, threshold);
        if best.as_ref().map_or(true, |&(_, n)| count > n) {
            best = Some((coeffs, count));
        }
    }

    let (coeffs, count) = best.expect("no valid candidate found");
    ensure!(count >= 4, "too few inliers: {count}");
    println!(
        "candidate: center ({:.3}, {:.3}, {:.3}), radius {:.3}, {} inliers",
        coeffs.center.x, coeffs.center.y, coeffs.center.z, coeffs.radius, count
    );

    let inliers = model.select_within_distance(&cloud, &coeffs, threshold);
    let refined = model.optimize_model_coefficients(&cloud, &inliers, &coeffs);
    println!(
        "refined:   center ({:.3}, {:.3}, {:.3}), radius {:.3}, rms {:.5}",
        refined.center.x,
        refined.center.y,
        refined.center.z,
        refined.radius,
        rms_radial_residual(&cloud, &inliers, &refined)
    );

    let projected = model.project_points(&cloud, &inliers, &refined, false);
    println!("projected {} inliers onto the surface", projected.len());
    Ok(())
}
