//! Distant Light

use super::*;
use crate::paramset::*;

/// Directional light infinitely far away; all of its light arrives from the
/// same direction.
#[derive(Clone, Debug)]
pub struct DistantLight {
    /// Emitted radiance.
    pub radiance: Spectrum,

    /// Normalized world space direction towards the light.
    pub direction: Vector3f,
}

impl DistantLight {
    /// Create a new `DistantLight`.
    ///
    /// * `light_to_world` - Light to world transformation.
    /// * `radiance`       - Emitted radiance.
    /// * `direction`      - Light space direction towards the light.
    pub fn new(light_to_world: &Transform, radiance: Spectrum, direction: &Vector3f) -> Self {
        Self {
            radiance,
            direction: light_to_world.transform_vector(direction).normalize(),
        }
    }

    pub(super) fn sample_l(&self, p: &Point3f, p_epsilon: Float, time: Float) -> LightSampleResult {
        LightSampleResult {
            l: self.radiance,
            wi: self.direction,
            pdf: 1.0,
            visibility: VisibilityTester::ray(p, p_epsilon, &self.direction, time),
        }
    }

    pub(super) fn sample_ray(&self, scene: &Scene, ls: &LightSample, time: Float) -> LightRaySample {
        // Pick a point on the disk that faces the light and covers the scene.
        let (world_center, world_radius) = scene.world_bound().bounding_sphere();
        let (v1, v2) = coordinate_system(&self.direction);
        let d = concentric_sample_disk(ls.u_pos[0], ls.u_pos[1]);
        let p_disk = world_center + (v1 * d.x + v2 * d.y) * world_radius;

        let ray = Ray::new(p_disk + self.direction * world_radius, -self.direction, 0.0, INFINITY, time, 0);
        LightRaySample {
            l: self.radiance,
            n: Normal3f::from(ray.d),
            ray,
            pdf: 1.0 / (PI * world_radius * world_radius),
        }
    }

    /// Returns the power that falls on the scene's bounding sphere.
    ///
    /// * `scene` - The scene.
    pub fn power(&self, scene: &Scene) -> Spectrum {
        let (_, world_radius) = scene.world_bound().bounding_sphere();
        self.radiance * (PI * world_radius * world_radius)
    }
}

impl From<(&ParamSet, Transform)> for DistantLight {
    /// Create a `DistantLight` from parameters and the light to world
    /// transformation.
    ///
    /// * `p` - Tuple of parameters and light to world transformation.
    fn from(p: (&ParamSet, Transform)) -> Self {
        let (params, light_to_world) = p;
        let radiance = params.find_one_spectrum("L", Spectrum::one());
        let scale = params.find_one_spectrum("scale", Spectrum::one());
        let from = params.find_one_point3f("from", Point3f::zero());
        let to = params.find_one_point3f("to", Point3f::new(0.0, 0.0, 1.0));
        Self::new(&light_to_world, radiance * scale, &(from - to))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
