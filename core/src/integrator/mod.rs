//! Integrator

use crate::camera::*;
use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::renderer::*;
use crate::rng::*;
use crate::sampler::*;
use crate::scene::*;
use crate::spectrum::*;

mod common;

// Re-export.
pub use common::*;

/// Computes radiance leaving a surface towards the camera.
pub trait SurfaceIntegrator: Send + Sync {
    /// Called once before rendering starts.
    ///
    /// * `_scene`    - The scene.
    /// * `_camera`   - The camera.
    /// * `_renderer` - The renderer.
    fn preprocess(&self, _scene: &Scene, _camera: &dyn Camera, _renderer: &dyn Renderer) {}

    /// Request the sample arrays the integrator needs.
    ///
    /// * `_sampler` - The sampler.
    /// * `_sample`  - The sample template.
    /// * `_scene`   - The scene.
    fn request_samples(&self, _sampler: &dyn Sampler, _sample: &mut Sample, _scene: &Scene) {}

    /// Returns radiance leaving the intersection towards the ray origin.
    ///
    /// * `scene`    - The scene.
    /// * `renderer` - The renderer; used to trace child rays.
    /// * `ray`      - The ray that found the intersection.
    /// * `isect`    - The intersection.
    /// * `sample`   - Optional sampler values.
    /// * `rng`      - Random number generator.
    fn li(
        &self,
        scene: &Scene,
        renderer: &dyn Renderer,
        ray: &Ray,
        isect: &mut Intersection<'_>,
        sample: Option<&Sample>,
        rng: &mut RNG,
    ) -> Spectrum;
}

/// Computes the effect of participating media along a ray.
pub trait VolumeIntegrator: Send + Sync {
    /// Called once before rendering starts.
    ///
    /// * `_scene`    - The scene.
    /// * `_camera`   - The camera.
    /// * `_renderer` - The renderer.
    fn preprocess(&self, _scene: &Scene, _camera: &dyn Camera, _renderer: &dyn Renderer) {}

    /// Request the sample arrays the integrator needs.
    ///
    /// * `_sampler` - The sampler.
    /// * `_sample`  - The sample template.
    /// * `_scene`   - The scene.
    fn request_samples(&self, _sampler: &dyn Sampler, _sample: &mut Sample, _scene: &Scene) {}

    /// Returns the radiance added along the ray by the medium and the
    /// transmittance of the ray segment as `(Lv, T)`.
    ///
    /// * `scene`    - The scene.
    /// * `renderer` - The renderer.
    /// * `ray`      - The ray.
    /// * `sample`   - Optional sampler values.
    /// * `rng`      - Random number generator.
    fn li(
        &self,
        scene: &Scene,
        renderer: &dyn Renderer,
        ray: &Ray,
        sample: Option<&Sample>,
        rng: &mut RNG,
    ) -> (Spectrum, Spectrum);

    /// Returns the fraction of light transmitted along the ray segment.
    ///
    /// * `scene`    - The scene.
    /// * `renderer` - The renderer.
    /// * `ray`      - The ray.
    /// * `sample`   - Optional sampler values.
    /// * `rng`      - Random number generator.
    fn transmittance(
        &self,
        scene: &Scene,
        renderer: &dyn Renderer,
        ray: &Ray,
        sample: Option<&Sample>,
        rng: &mut RNG,
    ) -> Spectrum;
}
