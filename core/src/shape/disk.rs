//! Disks

use super::*;
use crate::paramset::*;
use crate::sampling::*;

/// A disk or annulus perpendicular to the z-axis at height `height`.
#[derive(Clone, Debug)]
pub struct Disk {
    /// Common shape data.
    pub data: ShapeData,

    /// Height along z-axis.
    pub height: Float,

    /// Outer radius.
    pub radius: Float,

    /// Inner radius.
    pub inner_radius: Float,

    /// Maximum spherical coordinate for Φ.
    pub phi_max: Float,
}

impl Disk {
    /// Create a new disk.
    ///
    /// * `data`         - Common shape data.
    /// * `height`       - Height along z-axis.
    /// * `radius`       - Outer radius.
    /// * `inner_radius` - Inner radius.
    /// * `phi_max`      - Maximum spherical coordinate for Φ in degrees.
    pub fn new(data: ShapeData, height: Float, radius: Float, inner_radius: Float, phi_max: Float) -> Self {
        Self {
            data,
            height,
            radius,
            inner_radius,
            phi_max: radians(clamp(phi_max, 0.0, 360.0)),
        }
    }

    /// Returns a bounding box in object space.
    pub fn object_bound(&self) -> Bounds3f {
        Bounds3f::new(
            Point3f::new(-self.radius, -self.radius, self.height),
            Point3f::new(self.radius, self.radius, self.height),
        )
    }

    /// Returns the surface area.
    pub fn area(&self) -> Float {
        self.phi_max * 0.5 * (self.radius * self.radius - self.inner_radius * self.inner_radius)
    }

    /// Intersect in object space; returns the hit parameter, the point, its
    /// azimuth and squared distance from the z-axis.
    ///
    /// * `r` - World space ray.
    fn do_intersection(&self, r: &Ray) -> Option<(Float, Point3f, Float, Float)> {
        let ray = self.data.world_to_object.transform_ray(r);
        if abs(ray.d.z) < 1e-7 {
            return None;
        }

        let t = (self.height - ray.o.z) / ray.d.z;
        if t < ray.min_t || t > ray.max_t {
            return None;
        }

        let p = ray.at(t);
        let dist2 = p.x * p.x + p.y * p.y;
        if dist2 > self.radius * self.radius || dist2 < self.inner_radius * self.inner_radius {
            return None;
        }

        let phi = azimuth(&p);
        if phi > self.phi_max {
            return None;
        }
        Some((t, p, phi, dist2))
    }

    /// Returns the nearest intersection.
    ///
    /// * `ray`   - World space ray.
    /// * `shape` - The enclosing shape, recorded in the differential geometry.
    pub fn intersect<'a>(&self, ray: &Ray, shape: &'a Shape) -> Option<ShapeHit<'a>> {
        let (t, p, phi, dist2) = self.do_intersection(ray)?;

        let u = phi / self.phi_max;
        let one_minus_v = (dist2.sqrt() - self.inner_radius) / (self.radius - self.inner_radius);
        let inv_one_minus_v = if one_minus_v > 0.0 { 1.0 / one_minus_v } else { 0.0 };
        let v = 1.0 - one_minus_v;
        let dpdu = Vector3f::new(-self.phi_max * p.y, self.phi_max * p.x, 0.0) * (self.phi_max * INV_TWO_PI);
        let dpdv = Vector3f::new(-p.x * inv_one_minus_v, -p.y * inv_one_minus_v, 0.0)
            * ((self.radius - self.inner_radius) / self.radius);

        let o2w = &self.data.object_to_world;
        let dg = DifferentialGeometry::new(
            o2w.transform_point(&p),
            o2w.transform_vector(&dpdu),
            o2w.transform_vector(&dpdv),
            Normal3f::zero(),
            Normal3f::zero(),
            u,
            v,
            Some(shape),
        );

        Some(ShapeHit {
            t_hit: t,
            ray_epsilon: 5e-4 * t,
            dg,
        })
    }

    /// Returns true if the ray hits the disk.
    ///
    /// * `ray` - World space ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.do_intersection(ray).is_some()
    }

    /// Sample a point on the full disk.
    ///
    /// * `u1` - First random value.
    /// * `u2` - Second random value.
    pub fn sample(&self, u1: Float, u2: Float) -> (Point3f, Normal3f) {
        let pd = concentric_sample_disk(u1, u2);
        let p = Point3f::new(pd.x * self.radius, pd.y * self.radius, self.height);
        let o2w = &self.data.object_to_world;
        let n = o2w.transform_normal(&Normal3f::new(0.0, 0.0, 1.0)).normalize();
        (o2w.transform_point(&p), self.data.orient(n))
    }
}

impl From<(&ParamSet, Transform, bool)> for Disk {
    /// Create a `Disk` from a parameter set, object to world transform and
    /// whether or not surface normal orientation is reversed.
    ///
    /// * `p` - A tuple containing the parameter set, object to world
    ///         transform and the reverse orientation flag.
    fn from(p: (&ParamSet, Transform, bool)) -> Self {
        let (params, o2w, reverse_orientation) = p;
        let height = params.find_one_float("height", 0.0);
        let radius = params.find_one_float("radius", 1.0);
        let inner_radius = params.find_one_float("innerradius", 0.0);
        let phi_max = params.find_one_float("phimax", 360.0);
        Self::new(ShapeData::new(o2w, reverse_orientation), height, radius, inner_radius, phi_max)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn annulus() -> Shape {
        Shape::Disk(Disk::new(ShapeData::new(Transform::identity(), false), 1.0, 2.0, 0.5, 360.0))
    }

    #[test]
    fn hit_inside_annulus() {
        let shape = annulus();
        let ray = Ray::new(Point3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0), 0.0, INFINITY, 0.0, 0);
        let hit = shape.intersect(&ray).unwrap();
        assert!(approx_eq!(Float, hit.t_hit, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, hit.dg.v, 1.0 - 0.5 / 1.5, epsilon = 1e-5));
        assert_eq!(hit.dg.dndu, Normal3f::zero());
    }

    #[test]
    fn misses_hole_rim_and_parallel_rays() {
        let shape = annulus();
        let up = Vector3f::new(0.0, 0.0, 1.0);
        assert!(!shape.intersect_p(&Ray::new(Point3f::zero(), up, 0.0, INFINITY, 0.0, 0)));
        assert!(!shape.intersect_p(&Ray::new(Point3f::new(3.0, 0.0, 0.0), up, 0.0, INFINITY, 0.0, 0)));
        let side = Vector3f::new(1.0, 0.0, 0.0);
        assert!(!shape.intersect_p(&Ray::new(Point3f::new(-5.0, 0.0, 1.0), side, 0.0, INFINITY, 0.0, 0)));
    }

    #[test]
    fn area_of_annulus() {
        assert!(approx_eq!(Float, annulus().area(), PI * (4.0 - 0.25), epsilon = 1e-4));
    }

    proptest! {
        #[test]
        fn samples_lie_in_plane(u1 in 0.0..1.0f32, u2 in 0.0..1.0f32) {
            let shape = annulus();
            let (p, n) = shape.sample(u1, u2);
            prop_assert!(approx_eq!(Float, p.z, 1.0, epsilon = 1e-6));
            prop_assert!(p.x * p.x + p.y * p.y <= 4.0 + 1e-4);
            prop_assert_eq!(n, Normal3f::new(0.0, 0.0, 1.0));
        }
    }
}
