//! Diffuse Area Light

use super::*;
use crate::paramset::*;

/// Shape that emits the same radiance in every direction on its outward
/// side.
#[derive(Clone, Debug)]
pub struct DiffuseAreaLight {
    /// Emitted radiance.
    pub l_emit: Spectrum,

    /// Number of samples integrators should take.
    pub n_samples: usize,

    /// The emitting shape in world space.
    pub shape: Arc<Shape>,

    /// Surface area of the shape.
    area: Float,
}

impl DiffuseAreaLight {
    /// Create a new `DiffuseAreaLight`.
    ///
    /// * `l_emit`    - Emitted radiance.
    /// * `n_samples` - Number of samples integrators should take.
    /// * `shape`     - The emitting shape.
    pub fn new(l_emit: Spectrum, n_samples: usize, shape: Arc<Shape>) -> Self {
        let area = shape.area();
        Self {
            l_emit,
            n_samples: n_samples.max(1),
            shape,
            area,
        }
    }

    /// Returns emitted radiance leaving a surface point.
    ///
    /// * `_p` - Point on the surface.
    /// * `n`  - Surface normal at the point.
    /// * `w`  - Outgoing direction.
    pub fn l(&self, _p: &Point3f, n: &Normal3f, w: &Vector3f) -> Spectrum {
        if n.dot(w) > 0.0 {
            self.l_emit
        } else {
            Spectrum::zero()
        }
    }

    pub(super) fn sample_l(&self, p: &Point3f, p_epsilon: Float, ls: &LightSample, time: Float) -> LightSampleResult {
        let (ps, ns) = self.shape.sample_from(p, ls.u_pos[0], ls.u_pos[1]);
        let wi = (ps - *p).normalize();
        LightSampleResult {
            l: self.l(&ps, &ns, &-wi),
            wi,
            pdf: self.shape.pdf_wi(p, &wi),
            visibility: VisibilityTester::segment(p, p_epsilon, &ps, 1e-3, time),
        }
    }

    pub(super) fn sample_ray(&self, ls: &LightSample, u1: Float, u2: Float, time: Float) -> LightRaySample {
        let (org, ns) = self.shape.sample(ls.u_pos[0], ls.u_pos[1]);
        let mut dir = uniform_sample_sphere(u1, u2);
        if dir.dot(&ns) < 0.0 {
            dir = -dir;
        }
        LightRaySample {
            l: self.l(&org, &ns, &dir),
            ray: Ray::new(org, dir, 1e-3, INFINITY, time, 0),
            n: ns,
            pdf: self.shape.pdf() * INV_TWO_PI,
        }
    }

    /// Returns the total emitted power.
    pub fn power(&self) -> Spectrum {
        self.l_emit * (self.area * PI)
    }
}

impl From<(&ParamSet, Arc<Shape>)> for DiffuseAreaLight {
    /// Create a `DiffuseAreaLight` from parameters and the emitting shape.
    ///
    /// * `p` - Tuple of parameters and shape.
    fn from(p: (&ParamSet, Arc<Shape>)) -> Self {
        let (params, shape) = p;
        let l = params.find_one_spectrum("L", Spectrum::one());
        let scale = params.find_one_spectrum("scale", Spectrum::one());
        let n_samples = params.find_one_int("nsamples", 1).max(1) as usize;
        Self::new(l * scale, n_samples, shape)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn disk_light() -> DiffuseAreaLight {
        let data = ShapeData::new(Transform::translate(&Vector3f::new(0.0, 0.0, 2.0)), true);
        let disk = Shape::Disk(Disk::new(data, 0.0, 1.0, 0.0, 360.0));
        DiffuseAreaLight::new(Spectrum::new(3.0), 4, Arc::new(disk))
    }

    #[test]
    fn emits_only_on_front_side() {
        let light = disk_light();
        let n = Normal3f::new(0.0, 0.0, 1.0);
        assert_eq!(light.l(&Point3f::zero(), &n, &Vector3f::new(0.0, 0.0, 1.0)), Spectrum::new(3.0));
        assert!(light.l(&Point3f::zero(), &n, &Vector3f::new(0.0, 0.0, -1.0)).is_black());
    }

    #[test]
    fn samples_face_the_reference_point() {
        let light = disk_light();
        let ls = LightSample::new(0.3, 0.7, 0.5);
        let r = light.sample_l(&Point3f::zero(), 1e-3, &ls, 0.0);
        assert!(r.wi.z > 0.0);
        assert!(r.pdf > 0.0);
        assert_eq!(r.l, Spectrum::new(3.0));
        assert!(approx_eq!(Float, light.power()[0], 3.0 * PI * PI, epsilon = 1e-3));
        assert_eq!(Light::DiffuseArea(light).num_samples(), 4);
    }

    #[test]
    fn emitted_rays_leave_the_shape_surface() {
        let light = disk_light();
        let ls = LightSample::new(0.6, 0.35, 0.0);
        let r = light.sample_ray(&ls, 0.2, 0.9, 0.0);

        // Reversed disk at z = 2 with radius 1 facing down.
        assert!(approx_eq!(Float, r.ray.o.z, 2.0, epsilon = 1e-5));
        assert!(r.ray.o.x * r.ray.o.x + r.ray.o.y * r.ray.o.y <= 1.0 + 1e-5);
        assert_eq!(r.n, Normal3f::new(0.0, 0.0, -1.0));
        assert!(r.ray.d.z <= 0.0);
        assert_eq!(r.l, Spectrum::new(3.0));
        assert!(approx_eq!(Float, r.pdf, INV_TWO_PI / PI, epsilon = 1e-5));
    }
}
