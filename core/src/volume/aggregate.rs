//! Aggregate Volume

use super::*;

/// Several volume regions treated as one; coefficients add up.
#[derive(Clone, Debug)]
pub struct AggregateVolume {
    /// The regions.
    pub regions: Vec<VolumeRegion>,

    /// Union of the region bounds.
    bound: Bounds3f,
}

impl AggregateVolume {
    /// Create a new `AggregateVolume`.
    ///
    /// * `regions` - The regions.
    pub fn new(regions: Vec<VolumeRegion>) -> Self {
        let bound = regions
            .iter()
            .fold(Bounds3f::EMPTY, |b, r| b.union(&r.world_bound()));
        Self { regions, bound }
    }

    /// Returns a bounding box in world space.
    pub fn world_bound(&self) -> Bounds3f {
        self.bound
    }

    /// Returns the smallest parametric range covering every region the ray
    /// passes through.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> Option<(Float, Float)> {
        self.regions
            .iter()
            .filter_map(|r| r.intersect_p(ray))
            .reduce(|(a0, a1), (b0, b1)| (min(a0, b0), max(a1, b1)))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn slab(z0: Float, sig_a: Float) -> VolumeRegion {
        VolumeRegion::Homogeneous(HomogeneousVolume::new(
            Spectrum::new(sig_a),
            Spectrum::zero(),
            0.0,
            Spectrum::new(1.0),
            Bounds3f::new(Point3f::new(0.0, 0.0, z0), Point3f::new(1.0, 1.0, z0 + 1.0)),
            &Transform::identity(),
        ))
    }

    #[test]
    fn regions_combine() {
        let v = VolumeRegion::Aggregate(AggregateVolume::new(vec![slab(0.0, 1.0), slab(3.0, 2.0)]));
        assert_eq!(v.world_bound().p_max.z, 4.0);

        let ray = Ray::new(
            Point3f::new(0.5, 0.5, -1.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
            0.0,
            0,
        );
        let (t0, t1) = v.intersect_p(&ray).unwrap();
        assert!(approx_eq!(Float, t0, 1.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, t1, 5.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, v.tau(&ray, 0.1, 0.5)[1], 3.0, epsilon = 1e-4));
        assert_eq!(v.lve(&Point3f::new(0.5, 0.5, 3.5)), Spectrum::new(1.0));
        assert!(v.sigma_t(&Point3f::new(0.5, 0.5, 2.0)).is_black());
    }
}
