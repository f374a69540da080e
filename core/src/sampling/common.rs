//! Common sampling functions.

use crate::geometry::*;
use crate::pbrt::*;
use crate::rng::*;
use itertools::iproduct;

/// Fill `samples` with stratified values in [0, 1).
///
/// * `samples` - Output; one stratum per element.
/// * `rng`     - Random number generator.
/// * `jitter`  - Jitter the samples; otherwise use stratum centers.
pub fn stratified_sample_1d(samples: &mut [Float], rng: &mut RNG, jitter: bool) {
    let inv_n_samples = 1.0 / samples.len() as Float;
    for (i, s) in samples.iter_mut().enumerate() {
        let delta = if jitter { rng.uniform_float() } else { 0.5 };
        *s = min((i as Float + delta) * inv_n_samples, ONE_MINUS_EPSILON);
    }
}

/// Fill `samples` with `nx * ny` stratified 2D values stored as interleaved
/// (x, y) pairs.
///
/// * `samples` - Output with room for `2 * nx * ny` values.
/// * `nx`      - Number of strata in x-direction.
/// * `ny`      - Number of strata in y-direction.
/// * `rng`     - Random number generator.
/// * `jitter`  - Jitter the samples; otherwise use stratum centers.
pub fn stratified_sample_2d(samples: &mut [Float], nx: usize, ny: usize, rng: &mut RNG, jitter: bool) {
    debug_assert!(samples.len() >= 2 * nx * ny);
    let dx = 1.0 / nx as Float;
    let dy = 1.0 / ny as Float;
    for (i, (y, x)) in iproduct!(0..ny, 0..nx).enumerate() {
        let jx = if jitter { rng.uniform_float() } else { 0.5 };
        let jy = if jitter { rng.uniform_float() } else { 0.5 };
        samples[2 * i] = min((x as Float + jx) * dx, ONE_MINUS_EPSILON);
        samples[2 * i + 1] = min((y as Float + jy) * dy, ONE_MINUS_EPSILON);
    }
}

/// Fill `samples` with Latin hypercube samples: `n_samples` points of
/// `n_dim` interleaved dimensions.
///
/// * `samples`   - Output with room for `n_samples * n_dim` values.
/// * `n_samples` - Number of samples.
/// * `n_dim`     - Number of dimensions.
/// * `rng`       - Random number generator.
pub fn latin_hypercube(samples: &mut [Float], n_samples: usize, n_dim: usize, rng: &mut RNG) {
    debug_assert!(samples.len() >= n_samples * n_dim);
    let inv_n_samples = 1.0 / n_samples as Float;

    // Generate LHS samples along diagonal.
    for (i, j) in iproduct!(0..n_samples, 0..n_dim) {
        let sj = (i as Float + rng.uniform_float()) * inv_n_samples;
        samples[n_dim * i + j] = min(sj, ONE_MINUS_EPSILON);
    }

    // Permute LHS samples in each dimension.
    for i in 0..n_dim {
        for j in 0..n_samples {
            let other = j + rng.bounded_uniform_u32(0, (n_samples - j) as u32) as usize;
            samples.swap(n_dim * j + i, n_dim * other + i);
        }
    }
}

/// Uniformly sample a direction on a hemisphere.
///
/// * `u1` - First random value.
/// * `u2` - Second random value.
pub fn uniform_sample_hemisphere(u1: Float, u2: Float) -> Vector3f {
    let z = u1;
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u2;
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a hemisphere.
#[inline]
pub fn uniform_hemisphere_pdf() -> Float {
    INV_TWO_PI
}

/// Uniformly sample a direction from a sphere.
///
/// * `u1` - First random value.
/// * `u2` - Second random value.
pub fn uniform_sample_sphere(u1: Float, u2: Float) -> Vector3f {
    let z = 1.0 - 2.0 * u1;
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u2;
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. The concentric mapping takes points in [-1, 1]^2 to unit disk by
/// uniformly mapping concentric squares to concentric circles.
///
/// * `u1` - First random value.
/// * `u2` - Second random value.
pub fn concentric_sample_disk(u1: Float, u2: Float) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let sx = 2.0 * u1 - 1.0;
    let sy = 2.0 * u2 - 1.0;

    // Handle degeneracy at the origin.
    if sx == 0.0 && sy == 0.0 {
        return Point2f::zero();
    }

    let (r, theta) = if abs(sx) > abs(sy) {
        (sx, PI_OVER_FOUR * (sy / sx))
    } else {
        (sy, PI_OVER_TWO - PI_OVER_FOUR * (sx / sy))
    };
    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Sample a direction on a hemisphere using cosine-weighted sampling.
///
/// * `u1` - First random value.
/// * `u2` - Second random value.
#[inline]
pub fn cosine_sample_hemisphere(u1: Float, u2: Float) -> Vector3f {
    let d = concentric_sample_disk(u1, u2);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted sampling a direction from a hemisphere.
///
/// * `cos_theta` - Cosine term of incident radiance.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Uniformly sample a direction from a cone of directions about the z-axis in a
/// given coordinate system.
///
/// * `u1`            - First random value.
/// * `u2`            - Second random value.
/// * `cos_theta_max` - Cosine of the maximum angle of the cone.
/// * `x`             - The x-axis basis vector.
/// * `y`             - The y-axis basis vector.
/// * `z`             - The z-axis basis vector.
pub fn uniform_sample_cone(
    u1: Float,
    u2: Float,
    cos_theta_max: Float,
    x: &Vector3f,
    y: &Vector3f,
    z: &Vector3f,
) -> Vector3f {
    let cos_theta = lerp(u1, cos_theta_max, 1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi = u2 * TWO_PI;
    *x * (phi.cos() * sin_theta) + *y * (phi.sin() * sin_theta) + *z * cos_theta
}

/// Returns the PDF for sampling a direction from a cone of directions.
///
/// * `cos_theta_max` - Cosine of the maximum angle of the cone.
#[inline]
pub fn uniform_cone_pdf(cos_theta_max: Float) -> Float {
    1.0 / (TWO_PI * (1.0 - cos_theta_max))
}

/// Uniformly sample barycentric coordinates on a triangle.
///
/// * `u1` - First random value.
/// * `u2` - Second random value.
pub fn uniform_sample_triangle(u1: Float, u2: Float) -> (Float, Float) {
    let su1 = u1.sqrt();
    (1.0 - su1, u2 * su1)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn unjittered_1d_samples_are_stratum_centers() {
        let mut rng = RNG::default();
        let mut s = [0.0; 4];
        stratified_sample_1d(&mut s, &mut rng, false);
        assert_eq!(s, [0.125, 0.375, 0.625, 0.875]);
    }

    #[test]
    fn unjittered_2d_samples_cover_grid() {
        let mut rng = RNG::default();
        let mut s = [0.0; 12];
        stratified_sample_2d(&mut s, 3, 2, &mut rng, false);
        let points: Vec<(Float, Float)> = s.chunks(2).map(|c| (c[0], c[1])).collect();
        assert_eq!(points[0], (1.0 / 6.0, 0.25));
        assert_eq!(points[2], (5.0 / 6.0, 0.25));
        assert_eq!(points[3], (1.0 / 6.0, 0.75));
    }

    #[test]
    fn latin_hypercube_has_one_sample_per_stratum() {
        let mut rng = RNG::new(7);
        let n = 8;
        let mut s = vec![0.0; n * 2];
        latin_hypercube(&mut s, n, 2, &mut rng);
        for dim in 0..2 {
            let mut strata: Vec<usize> = (0..n).map(|i| (s[2 * i + dim] * n as Float) as usize).collect();
            strata.sort_unstable();
            assert_eq!(strata, (0..n).collect::<Vec<_>>());
        }
    }

    proptest! {
        #[test]
        fn cosine_hemisphere_is_unit_and_upper(u1 in 0.0..1.0f32, u2 in 0.0..1.0f32) {
            let w = cosine_sample_hemisphere(u1, u2);
            prop_assert!(w.z >= 0.0);
            prop_assert!(approx_eq!(Float, w.length(), 1.0, epsilon = 1e-4));
        }

        #[test]
        fn concentric_disk_is_inside_unit_circle(u1 in 0.0..1.0f32, u2 in 0.0..1.0f32) {
            let p = concentric_sample_disk(u1, u2);
            prop_assert!(p.x * p.x + p.y * p.y <= 1.0 + 1e-5);
        }

        #[test]
        fn cone_samples_stay_in_cone(u1 in 0.0..1.0f32, u2 in 0.0..1.0f32) {
            let cos_max = 0.8;
            let w = uniform_sample_cone(
                u1,
                u2,
                cos_max,
                &Vector3f::new(1.0, 0.0, 0.0),
                &Vector3f::new(0.0, 1.0, 0.0),
                &Vector3f::new(0.0, 0.0, 1.0),
            );
            prop_assert!(w.z >= cos_max - 1e-5);
        }
    }
}
