//! Whitted Integrator

use lumen_core::geometry::*;
use lumen_core::integrator::*;
use lumen_core::interaction::*;
use lumen_core::light::*;
use lumen_core::paramset::*;
use lumen_core::reflection::*;
use lumen_core::renderer::*;
use lumen_core::rng::*;
use lumen_core::sampler::*;
use lumen_core::scene::*;
use lumen_core::spectrum::*;

/// Implements Whitted's ray tracing algorithm: direct lighting from every
/// light plus perfectly specular reflection and transmission.
pub struct WhittedIntegrator {
    /// Maximum recursion depth.
    max_depth: u32,
}

impl WhittedIntegrator {
    /// Create a new `WhittedIntegrator`.
    ///
    /// * `max_depth` - Maximum recursion depth.
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }
}

impl Default for WhittedIntegrator {
    fn default() -> Self {
        Self::new(5)
    }
}

impl SurfaceIntegrator for WhittedIntegrator {
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
    ) -> Spectrum {
        let bsdf = isect.get_bsdf(ray);
        let p = bsdf.dg_shading.p;
        let n = bsdf.dg_shading.n;
        let wo = -ray.d;

        // Compute emitted light if ray hit an area light source.
        let mut l = isect.le(&wo);

        // Add contribution of each light source.
        for light in scene.lights.iter() {
            let LightSampleResult {
                l: li,
                wi,
                pdf,
                visibility,
            } = light.sample_l(&p, isect.ray_epsilon, &LightSample::from_rng(rng), ray.time);
            if li.is_black() || pdf == 0.0 {
                continue;
            }

            let f = bsdf.f(&wo, &wi, BxDFType::ALL);
            if !f.is_black() && visibility.unoccluded(scene) {
                let tr = visibility.transmittance(scene, renderer, sample, rng);
                l += f * li * tr * (wi.abs_dot(&n) / pdf);
            }
        }

        if ray.depth + 1 < self.max_depth {
            // Trace rays for specular reflection and refraction.
            l += specular_reflect(ray, &bsdf, rng, isect, renderer, scene, sample);
            l += specular_transmit(ray, &bsdf, rng, isect, renderer, scene, sample);
        }
        l
    }
}

impl From<&ParamSet> for WhittedIntegrator {
    /// Create a `WhittedIntegrator` from a parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let max_depth = params.find_one_int("maxdepth", 5);
        if max_depth < 0 {
            warn!("Negative maxdepth {} treated as 0", max_depth);
        }
        Self::new(max_depth.max(0) as u32)
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
    use lumen_core::material::*;
    use lumen_core::pbrt::*;
    use lumen_core::primitive::*;
    use lumen_core::shape::*;
    use lumen_core::texture::*;
    use std::sync::Arc;

    /// Traces rays straight into the scene with nothing in between.
    struct Direct(WhittedIntegrator);

    impl Renderer for Direct {
        fn render(&self, _scene: &Scene, _cancel: &CancellationToken) -> Result<(), RenderError> {
            Ok(())
        }

        fn li<'a>(&self, scene: &'a Scene, ray: &Ray, sample: Option<&Sample>, rng: &mut RNG) -> LiResult<'a> {
            let mut r = *ray;
            let mut isect = scene.intersect(&mut r);
            let l = match isect.as_mut() {
                Some(hit) => self.0.li(scene, self, ray, hit, sample, rng),
                None => Spectrum::zero(),
            };
            LiResult {
                l,
                isect,
                t: Spectrum::new(1.0),
            }
        }

        fn transmittance(&self, _scene: &Scene, _ray: &Ray, _sample: Option<&Sample>, _rng: &mut RNG) -> Spectrum {
            Spectrum::new(1.0)
        }
    }

    fn disk(z: Float, material: Material) -> ArcPrimitive {
        let data = ShapeData::new(Transform::translate(&Vector3f::new(0.0, 0.0, z)), false);
        let shape = Shape::Disk(Disk::new(data, 0.0, 100.0, 0.0, 360.0));
        Arc::new(Primitive::Geometric(GeometricPrimitive::new(
            Arc::new(shape),
            Arc::new(material),
            None,
        )))
    }

    fn matte(r: Float) -> Material {
        Material::Matte(MatteMaterial::new(
            Arc::new(Texture::Constant(Spectrum::new(r))),
            Arc::new(Texture::Constant(0.0)),
            None,
        ))
    }

    fn point_light(p: Vector3f, intensity: Float) -> ArcLight {
        Arc::new(Light::Point(PointLight::new(
            &Transform::translate(&p),
            Spectrum::new(intensity),
        )))
    }

    fn down(o: Point3f) -> Ray {
        Ray::new(o, Vector3f::new(0.0, 0.0, -1.0), 0.0, INFINITY, 0.0, 0)
    }

    #[test]
    fn point_light_over_lambertian_disk() {
        let scene = Scene::new(
            disk(0.0, matte(0.5)),
            vec![point_light(Vector3f::new(0.0, 0.0, 2.0), 1.0)],
            None,
        );
        let renderer = Direct(WhittedIntegrator::default());
        let mut rng = RNG::new(0);

        let result = renderer.li(&scene, &down(Point3f::new(1.0, 0.0, 5.0)), None, &mut rng);
        assert!(result.isect.is_some());

        // R / pi * I * cos(theta) / d^2 with d = sqrt(5) and cos(theta) = 2 / d.
        let d2: Float = 5.0;
        let expected = 0.5 * INV_PI * (2.0 / d2.sqrt()) / d2;
        for c in result.l.to_rgb() {
            assert!(approx_eq!(Float, c, expected, epsilon = 1e-4));
        }
    }

    #[test]
    fn shadowed_point_sees_nothing() {
        let floor = disk(0.0, matte(0.5));
        let blocker = disk(1.0, matte(0.5));
        let grid = GridAccel::new(vec![floor, blocker], false);
        let scene = Scene::new(
            Arc::new(Primitive::Grid(grid)),
            vec![point_light(Vector3f::new(0.0, 0.0, 2.0), 1.0)],
            None,
        );
        let renderer = Direct(WhittedIntegrator::default());
        let mut rng = RNG::new(0);

        // Start between the disks, looking at the floor.
        let result = renderer.li(&scene, &down(Point3f::new(1.0, 0.5, 0.5)), None, &mut rng);
        assert!(result.isect.is_some());
        assert!(result.l.is_black());
    }

    #[test]
    fn mirror_reflects_lit_ceiling_until_max_depth() {
        let kr = Arc::new(Texture::Constant(Spectrum::new(1.0)));
        let mirror = disk(0.0, Material::Mirror(MirrorMaterial::new(kr, None)));
        let ceiling = disk(10.0, matte(0.5));
        let grid = GridAccel::new(vec![mirror, ceiling], false);
        let scene = Scene::new(
            Arc::new(Primitive::Grid(grid)),
            vec![point_light(Vector3f::new(1.0, 0.5, 5.0), 10.0)],
            None,
        );
        let ray = down(Point3f::new(1.0, 0.5, 2.0));
        let mut rng = RNG::new(0);

        let deep = Direct(WhittedIntegrator::new(5)).li(&scene, &ray, None, &mut rng);
        let expected = 0.5 * INV_PI * 10.0 / 25.0;
        for c in deep.l.to_rgb() {
            assert!(approx_eq!(Float, c, expected, epsilon = 1e-4));
        }

        let shallow = Direct(WhittedIntegrator::new(1)).li(&scene, &ray, None, &mut rng);
        assert!(shallow.l.is_black());
    }

    #[test]
    fn max_depth_comes_from_params() {
        let mut ps = ParamSet::new();
        ps.add_int("maxdepth", &[2]);
        assert_eq!(WhittedIntegrator::from(&ps).max_depth, 2);
        assert_eq!(WhittedIntegrator::from(&ParamSet::new()).max_depth, 5);
    }
}
