//! Homogeneous Volume

use super::*;

/// Box shaped region with constant absorption, scattering and emission.
#[derive(Clone, Debug)]
pub struct HomogeneousVolume {
    /// Absorption coefficient.
    pub sig_a: Spectrum,

    /// Scattering coefficient.
    pub sig_s: Spectrum,

    /// Emitted radiance.
    pub le: Spectrum,

    /// Henyey-Greenstein asymmetry parameter.
    pub g: Float,

    /// The box in volume space.
    pub extent: Bounds3f,

    /// World to volume space transformation.
    pub world_to_volume: Transform,
}

impl HomogeneousVolume {
    /// Create a new `HomogeneousVolume`.
    ///
    /// * `sig_a`           - Absorption coefficient.
    /// * `sig_s`           - Scattering coefficient.
    /// * `g`               - Henyey-Greenstein asymmetry parameter.
    /// * `le`              - Emitted radiance.
    /// * `extent`          - The box in volume space.
    /// * `volume_to_world` - Volume to world space transformation.
    pub fn new(
        sig_a: Spectrum,
        sig_s: Spectrum,
        g: Float,
        le: Spectrum,
        extent: Bounds3f,
        volume_to_world: &Transform,
    ) -> Self {
        Self {
            sig_a,
            sig_s,
            le,
            g,
            extent,
            world_to_volume: volume_to_world.inverse(),
        }
    }

    /// Returns a bounding box in world space.
    pub fn world_bound(&self) -> Bounds3f {
        self.world_to_volume.inverse().transform_bounds(&self.extent)
    }

    /// Returns the parametric range of the ray inside the box.
    ///
    /// * `ray` - The ray in world space.
    pub fn intersect_p(&self, ray: &Ray) -> Option<(Float, Float)> {
        self.extent.intersect_p(&self.world_to_volume.transform_ray(ray))
    }

    /// Returns `s` inside the box and black elsewhere.
    fn inside_or_black(&self, p: &Point3f, s: Spectrum) -> Spectrum {
        if self.extent.inside(&self.world_to_volume.transform_point(p)) {
            s
        } else {
            Spectrum::zero()
        }
    }

    /// Returns the absorption coefficient at a point.
    ///
    /// * `p` - The point.
    pub fn sigma_a(&self, p: &Point3f) -> Spectrum {
        self.inside_or_black(p, self.sig_a)
    }

    /// Returns the scattering coefficient at a point.
    ///
    /// * `p` - The point.
    pub fn sigma_s(&self, p: &Point3f) -> Spectrum {
        self.inside_or_black(p, self.sig_s)
    }

    /// Returns the emitted radiance at a point.
    ///
    /// * `p` - The point.
    pub fn lve(&self, p: &Point3f) -> Spectrum {
        self.inside_or_black(p, self.le)
    }

    /// Returns the phase function value at a point.
    ///
    /// * `p`  - The point.
    /// * `w`  - First direction.
    /// * `wp` - Second direction.
    pub fn p(&self, p: &Point3f, w: &Vector3f, wp: &Vector3f) -> Float {
        if self.extent.inside(&self.world_to_volume.transform_point(p)) {
            phase_hg(w.dot(wp), self.g)
        } else {
            0.0
        }
    }

    /// Returns the optical thickness along the ray. Computed in closed form
    /// since the coefficients are constant.
    ///
    /// * `ray` - The ray.
    pub fn tau(&self, ray: &Ray) -> Spectrum {
        match self.intersect_p(ray) {
            Some((t0, t1)) => ray.at(t0).distance(&ray.at(t1)) * (self.sig_a + self.sig_s),
            None => Spectrum::zero(),
        }
    }
}

impl From<(&ParamSet, &Transform)> for HomogeneousVolume {
    /// Create a `HomogeneousVolume` from parameters.
    ///
    /// * `p` - Tuple containing the parameter set and volume to world transform.
    fn from(p: (&ParamSet, &Transform)) -> Self {
        let (params, volume_to_world) = p;
        let sig_a = params.find_one_spectrum("sigma_a", Spectrum::zero());
        let sig_s = params.find_one_spectrum("sigma_s", Spectrum::zero());
        let g = params.find_one_float("g", 0.0);
        let le = params.find_one_spectrum("Le", Spectrum::zero());
        let p0 = params.find_one_point3f("p0", Point3f::new(0.0, 0.0, 0.0));
        let p1 = params.find_one_point3f("p1", Point3f::new(1.0, 1.0, 1.0));
        Self::new(sig_a, sig_s, g, le, Bounds3f::new(p0, p1), volume_to_world)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn unit_box() -> HomogeneousVolume {
        HomogeneousVolume::new(
            Spectrum::new(0.5),
            Spectrum::new(0.25),
            0.0,
            Spectrum::new(2.0),
            Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0)),
            &Transform::translate(&Vector3f::new(0.0, 0.0, 2.0)),
        )
    }

    #[test]
    fn coefficients_vanish_outside() {
        let v = unit_box();
        let inside = Point3f::new(0.5, 0.5, 2.5);
        let outside = Point3f::new(0.5, 0.5, 0.5);
        assert_eq!(v.sigma_a(&inside), Spectrum::new(0.5));
        assert!(v.sigma_s(&outside).is_black());
        assert_eq!(v.lve(&inside), Spectrum::new(2.0));
        assert_eq!(v.p(&outside, &Vector3f::new(0.0, 0.0, 1.0), &Vector3f::new(0.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn optical_thickness_scales_with_path_length() {
        let v = unit_box();
        let ray = Ray::new(
            Point3f::new(0.5, 0.5, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
            0.0,
            0,
        );
        let (t0, t1) = v.intersect_p(&ray).unwrap();
        assert!(approx_eq!(Float, t0, 2.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, t1, 3.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, v.tau(&ray)[0], 0.75, epsilon = 1e-4));

        let miss = Ray::new(
            Point3f::new(5.0, 0.5, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
            0.0,
            0,
        );
        assert!(v.tau(&miss).is_black());
    }

    #[test]
    fn params_default_to_unit_box() {
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("sigma_a", &[1.0, 1.0, 1.0]);
        let v = HomogeneousVolume::from((&ps, &Transform::identity()));
        let b = v.world_bound();
        assert_eq!(b.p_max, Point3f::new(1.0, 1.0, 1.0));
        assert!(v.sig_s.is_black());
    }
}
