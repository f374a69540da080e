//! Light

use crate::geometry::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::scene::*;
use crate::shape::*;
use crate::spectrum::*;
use std::sync::Arc;

mod diffuse;
mod distant;
mod light_sample;
mod point;
mod visibility_tester;

// Re-export
pub use diffuse::*;
pub use distant::*;
pub use light_sample::*;
pub use point::*;
pub use visibility_tester::*;

/// Return value for `Light::sample_l()`.
#[derive(Copy, Clone, Debug)]
pub struct LightSampleResult {
    /// Incident radiance at the reference point.
    pub l: Spectrum,

    /// Incident direction, pointing towards the light.
    pub wi: Vector3f,

    /// Solid angle density of the sampled direction.
    pub pdf: Float,

    /// Shadow ray between the reference point and the light.
    pub visibility: VisibilityTester,
}

/// Return value for `Light::sample_ray()`.
#[derive(Copy, Clone, Debug)]
pub struct LightRaySample {
    /// Emitted radiance along the ray.
    pub l: Spectrum,

    /// Ray leaving the light.
    pub ray: Ray,

    /// Surface normal at the ray origin.
    pub n: Normal3f,

    /// Joint density of the ray origin and direction.
    pub pdf: Float,
}

/// Light sources.
#[derive(Clone, Debug)]
pub enum Light {
    /// Isotropic point light.
    Point(PointLight),

    /// Directional light infinitely far away.
    Distant(DistantLight),

    /// Emitting shape.
    DiffuseArea(DiffuseAreaLight),
}

impl Light {
    /// Returns true if the light is described by a delta distribution and
    /// cannot be hit by a ray.
    pub fn is_delta_light(&self) -> bool {
        !matches!(self, Self::DiffuseArea(_))
    }

    /// Sample an incident direction at `p` towards the light.
    ///
    /// * `p`         - Reference point.
    /// * `p_epsilon` - Offset for the shadow ray origin.
    /// * `ls`        - Random values.
    /// * `time`      - Time for the shadow ray.
    pub fn sample_l(&self, p: &Point3f, p_epsilon: Float, ls: &LightSample, time: Float) -> LightSampleResult {
        match self {
            Self::Point(l) => l.sample_l(p, p_epsilon, time),
            Self::Distant(l) => l.sample_l(p, p_epsilon, time),
            Self::DiffuseArea(l) => l.sample_l(p, p_epsilon, ls, time),
        }
    }

    /// Sample a ray leaving the light.
    ///
    /// * `scene` - The scene.
    /// * `ls`    - Random values for the ray origin.
    /// * `u1`    - First random value for the direction.
    /// * `u2`    - Second random value for the direction.
    /// * `time`  - Time for the ray.
    pub fn sample_ray(&self, scene: &Scene, ls: &LightSample, u1: Float, u2: Float, time: Float) -> LightRaySample {
        match self {
            Self::Point(l) => l.sample_ray(ls, time),
            Self::Distant(l) => l.sample_ray(scene, ls, time),
            Self::DiffuseArea(l) => l.sample_ray(ls, u1, u2, time),
        }
    }

    /// Returns the total emitted power.
    ///
    /// * `scene` - The scene.
    pub fn power(&self, scene: &Scene) -> Spectrum {
        match self {
            Self::Point(l) => l.power(),
            Self::Distant(l) => l.power(scene),
            Self::DiffuseArea(l) => l.power(),
        }
    }

    /// Returns radiance along a ray that escapes the scene. None of the
    /// supported lights emit at infinity.
    ///
    /// * `_ray` - The ray.
    pub fn le(&self, _ray: &Ray) -> Spectrum {
        Spectrum::zero()
    }

    /// Returns the solid angle density of sampling `wi` from `p`.
    ///
    /// * `p`  - Reference point.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, p: &Point3f, wi: &Vector3f) -> Float {
        match self {
            Self::DiffuseArea(l) => l.shape.pdf_wi(p, wi),
            _ => 0.0,
        }
    }

    /// Returns the number of samples integrators should take.
    pub fn num_samples(&self) -> usize {
        match self {
            Self::DiffuseArea(l) => l.n_samples,
            _ => 1,
        }
    }

    /// Returns emitted radiance from a point on an area light; black for
    /// other lights.
    ///
    /// * `p` - Point on the surface.
    /// * `n` - Surface normal at `p`.
    /// * `w` - Outgoing direction.
    pub fn l(&self, p: &Point3f, n: &Normal3f, w: &Vector3f) -> Spectrum {
        match self {
            Self::DiffuseArea(l) => l.l(p, n, w),
            _ => Spectrum::zero(),
        }
    }
}

/// Atomic reference counted `Light`.
pub type ArcLight = Arc<Light>;
