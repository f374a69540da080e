//! Emission Integrator

use lumen_core::camera::*;
use lumen_core::geometry::*;
use lumen_core::integrator::*;
use lumen_core::paramset::*;
use lumen_core::pbrt::*;
use lumen_core::renderer::*;
use lumen_core::rng::*;
use lumen_core::sampler::*;
use lumen_core::scene::*;
use lumen_core::spectrum::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Accounts for emission and attenuation in participating media by ray
/// marching through the scene's volume region. In-scattering is ignored.
pub struct EmissionIntegrator {
    /// Distance between ray marching steps.
    step_size: Float,

    /// Index of the 1D array holding the optical thickness offset.
    tau_sample_offset: AtomicUsize,

    /// Index of the 1D array holding the first step offset.
    scatter_sample_offset: AtomicUsize,
}

impl EmissionIntegrator {
    /// Create a new `EmissionIntegrator`.
    ///
    /// * `step_size` - Distance between ray marching steps.
    pub fn new(step_size: Float) -> Self {
        Self {
            step_size,
            tau_sample_offset: AtomicUsize::new(usize::MAX),
            scatter_sample_offset: AtomicUsize::new(usize::MAX),
        }
    }

    /// Returns the first value of a requested 1D array, or a fresh random
    /// value when no sampler values are available.
    ///
    /// * `sample` - Optional sampler values.
    /// * `offset` - Array index recorded by `request_samples()`.
    /// * `rng`    - Random number generator.
    fn sample_1d(sample: Option<&Sample>, offset: &AtomicUsize, rng: &mut RNG) -> Float {
        let offset = offset.load(Ordering::Relaxed);
        sample
            .and_then(|s| s.one_d.get(offset))
            .and_then(|values| values.first().copied())
            .unwrap_or_else(|| rng.uniform_float())
    }
}

impl VolumeIntegrator for EmissionIntegrator {
    fn preprocess(&self, scene: &Scene, _camera: &dyn Camera, _renderer: &dyn Renderer) {
        if scene.volume_region.is_some() {
            debug!("Emission integrator marching with step size {}", self.step_size);
        }
    }

    fn request_samples(&self, _sampler: &dyn Sampler, sample: &mut Sample, _scene: &Scene) {
        self.tau_sample_offset.store(sample.add_1d(1), Ordering::Relaxed);
        self.scatter_sample_offset.store(sample.add_1d(1), Ordering::Relaxed);
    }

    /// Returns the emitted radiance along the ray and its transmittance.
    ///
    /// * `scene`     - The scene.
    /// * `_renderer` - The renderer.
    /// * `ray`       - The ray.
    /// * `sample`    - Optional sampler values.
    /// * `rng`       - Random number generator.
    fn li(
        &self,
        scene: &Scene,
        _renderer: &dyn Renderer,
        ray: &Ray,
        sample: Option<&Sample>,
        rng: &mut RNG,
    ) -> (Spectrum, Spectrum) {
        let Some(vr) = scene.volume_region.as_ref() else {
            return (Spectrum::zero(), Spectrum::new(1.0));
        };
        let Some((t0, t1)) = vr.intersect_p(ray) else {
            return (Spectrum::zero(), Spectrum::new(1.0));
        };
        if t1 - t0 <= 0.0 || self.step_size <= 0.0 {
            return (Spectrum::zero(), Spectrum::new(1.0));
        }

        // Do emission-only volume integration in the region.
        let n_samples = ((t1 - t0) / self.step_size).ceil() as usize;
        let step = (t1 - t0) / n_samples as Float;
        let mut tr = Spectrum::new(1.0);
        let mut lv = Spectrum::zero();
        let mut p_prev = ray.at(t0);
        let mut t = t0 + Self::sample_1d(sample, &self.scatter_sample_offset, rng) * step;

        for _ in 0..n_samples {
            let p = ray.at(t);

            // Attenuation over the segment since the previous point.
            let segment = p - p_prev;
            if segment.length_squared() > 0.0 {
                let tau_ray = Ray::new(p_prev, segment, 0.0, 1.0, ray.time, ray.depth);
                let step_tau = vr.tau(&tau_ray, 0.5 * self.step_size, rng.uniform_float());
                tr *= (-step_tau).exp();
            }

            // Possibly terminate the march once transmittance is small.
            if tr.y() < 1e-3 {
                let continue_prob = 0.5;
                if rng.uniform_float() > continue_prob {
                    tr = Spectrum::zero();
                    break;
                }
                tr /= continue_prob;
            }

            lv += tr * vr.lve(&p);
            p_prev = p;
            t += step;
        }
        (lv * step, tr)
    }

    /// Returns `exp(-tau)` along the ray.
    ///
    /// * `scene`     - The scene.
    /// * `_renderer` - The renderer.
    /// * `ray`       - The ray.
    /// * `sample`    - Optional sampler values.
    /// * `rng`       - Random number generator.
    fn transmittance(
        &self,
        scene: &Scene,
        _renderer: &dyn Renderer,
        ray: &Ray,
        sample: Option<&Sample>,
        rng: &mut RNG,
    ) -> Spectrum {
        let Some(vr) = scene.volume_region.as_ref() else {
            return Spectrum::new(1.0);
        };
        let step = if sample.is_some() {
            self.step_size
        } else {
            4.0 * self.step_size
        };
        let offset = Self::sample_1d(sample, &self.tau_sample_offset, rng);
        (-vr.tau(ray, step, offset)).exp()
    }
}

impl From<&ParamSet> for EmissionIntegrator {
    /// Create an `EmissionIntegrator` from a parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        Self::new(params.find_one_float("stepsize", 1.0))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use lumen_core::accelerators::*;
    use lumen_core::primitive::*;
    use lumen_core::volume::*;
    use std::sync::Arc;

    struct Null;

    impl Renderer for Null {
        fn render(&self, _scene: &Scene, _cancel: &CancellationToken) -> Result<(), RenderError> {
            Ok(())
        }

        fn li<'a>(&self, _scene: &'a Scene, _ray: &Ray, _sample: Option<&Sample>, _rng: &mut RNG) -> LiResult<'a> {
            LiResult {
                l: Spectrum::zero(),
                isect: None,
                t: Spectrum::new(1.0),
            }
        }

        fn transmittance(&self, _scene: &Scene, _ray: &Ray, _sample: Option<&Sample>, _rng: &mut RNG) -> Spectrum {
            Spectrum::new(1.0)
        }
    }

    fn empty_aggregate() -> ArcPrimitive {
        Arc::new(Primitive::Grid(GridAccel::new(vec![], false)))
    }

    fn glowing_box() -> Scene {
        let region = HomogeneousVolume::new(
            Spectrum::new(1.0),
            Spectrum::zero(),
            0.0,
            Spectrum::new(1.0),
            Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0)),
            &Transform::identity(),
        );
        Scene::new(empty_aggregate(), vec![], Some(VolumeRegion::Homogeneous(region)))
    }

    fn through_box() -> Ray {
        Ray::new(
            Point3f::new(-1.0, 0.5, 0.5),
            Vector3f::new(1.0, 0.0, 0.0),
            0.0,
            INFINITY,
            0.0,
            0,
        )
    }

    #[test]
    fn no_region_is_transparent() {
        let scene = Scene::new(empty_aggregate(), vec![], None);
        let integrator = EmissionIntegrator::new(0.1);
        let mut rng = RNG::new(0);
        let (lv, t) = integrator.li(&scene, &Null, &through_box(), None, &mut rng);
        assert!(lv.is_black());
        assert_eq!(t, Spectrum::new(1.0));
        assert_eq!(
            integrator.transmittance(&scene, &Null, &through_box(), None, &mut rng),
            Spectrum::new(1.0)
        );
    }

    #[test]
    fn transmittance_is_exp_of_optical_thickness() {
        let scene = glowing_box();
        let integrator = EmissionIntegrator::new(0.1);
        let mut rng = RNG::new(0);
        let t = integrator.transmittance(&scene, &Null, &through_box(), None, &mut rng);
        for c in t.to_rgb() {
            assert!(approx_eq!(Float, c, (-1.0 as Float).exp(), epsilon = 1e-4));
        }
    }

    #[test]
    fn marched_emission_matches_closed_form() {
        let scene = glowing_box();
        let integrator = EmissionIntegrator::new(0.01);
        let mut rng = RNG::new(5);
        let (lv, t) = integrator.li(&scene, &Null, &through_box(), None, &mut rng);

        // Integral of exp(-s) over the unit segment.
        let expected = 1.0 - (-1.0 as Float).exp();
        for c in lv.to_rgb() {
            assert!(approx_eq!(Float, c, expected, epsilon = 2e-2));
        }
        for c in t.to_rgb() {
            assert!(approx_eq!(Float, c, (-1.0 as Float).exp(), epsilon = 2e-2));
        }
    }

    #[test]
    fn requested_arrays_are_used() {
        let scene = glowing_box();
        let integrator = EmissionIntegrator::new(0.5);
        let mut template = Sample::default();
        let _ = template.add_2d(1);
        struct NoSampler(SamplerData);
        impl Sampler for NoSampler {
            fn data(&self) -> &SamplerData {
                &self.0
            }
            fn maximum_sample_count(&self) -> usize {
                1
            }
            fn get_more_samples(&mut self, _samples: &mut [Sample], _rng: &mut RNG) -> usize {
                0
            }
            fn round_size(&self, size: usize) -> usize {
                size
            }
            fn get_sub_sampler(&self, _num: usize, _count: usize) -> Option<Box<dyn Sampler>> {
                None
            }
        }
        integrator.request_samples(&NoSampler(SamplerData::default()), &mut template, &scene);
        assert_eq!(template.n1d, vec![1, 1]);

        let mut rng = RNG::new(0);
        let mut sample = template.duplicate(1).remove(0);
        sample.one_d[1][0] = 0.0;
        let (a, _) = integrator.li(&scene, &Null, &through_box(), Some(&sample), &mut rng);
        sample.one_d[1][0] = 0.99;
        let (b, _) = integrator.li(&scene, &Null, &through_box(), Some(&sample), &mut rng);
        // A later first step sees more attenuation before its first emission.
        assert!(a.y() > b.y());
    }
}
