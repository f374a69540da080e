//! Point Light

use super::*;
use crate::paramset::*;

/// Isotropic point light that emits the same amount of light in all
/// directions.
#[derive(Clone, Debug)]
pub struct PointLight {
    /// World space position.
    pub p_light: Point3f,

    /// Radiant intensity.
    pub intensity: Spectrum,
}

impl PointLight {
    /// Create a new `PointLight` at the light space origin.
    ///
    /// * `light_to_world` - Light to world transformation.
    /// * `intensity`      - Radiant intensity.
    pub fn new(light_to_world: &Transform, intensity: Spectrum) -> Self {
        Self {
            p_light: light_to_world.transform_point(&Point3f::zero()),
            intensity,
        }
    }

    pub(super) fn sample_l(&self, p: &Point3f, p_epsilon: Float, time: Float) -> LightSampleResult {
        LightSampleResult {
            l: self.intensity / self.p_light.distance_squared(p),
            wi: (self.p_light - *p).normalize(),
            pdf: 1.0,
            visibility: VisibilityTester::segment(p, p_epsilon, &self.p_light, 0.0, time),
        }
    }

    pub(super) fn sample_ray(&self, ls: &LightSample, time: Float) -> LightRaySample {
        let d = uniform_sample_sphere(ls.u_pos[0], ls.u_pos[1]);
        LightRaySample {
            l: self.intensity,
            ray: Ray::new(self.p_light, d, 0.0, INFINITY, time, 0),
            n: Normal3f::from(d),
            pdf: uniform_sphere_pdf(),
        }
    }

    /// Returns the total emitted power.
    pub fn power(&self) -> Spectrum {
        self.intensity * FOUR_PI
    }
}

impl From<(&ParamSet, Transform)> for PointLight {
    /// Create a `PointLight` from parameters and the light to world
    /// transformation.
    ///
    /// * `p` - Tuple of parameters and light to world transformation.
    fn from(p: (&ParamSet, Transform)) -> Self {
        let (params, light_to_world) = p;
        let intensity = params.find_one_spectrum("I", Spectrum::one());
        let scale = params.find_one_spectrum("scale", Spectrum::one());
        let from = params.find_one_point3f("from", Point3f::zero());
        let l2w = light_to_world * Transform::translate(&Vector3f::from(from));
        Self::new(&l2w, intensity * scale)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
