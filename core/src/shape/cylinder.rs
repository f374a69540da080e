//! Cylinders

use super::*;
use crate::paramset::*;

/// A cylinder of radius `radius` around the z-axis between `z_min` and
/// `z_max`.
#[derive(Clone, Debug)]
pub struct Cylinder {
    /// Common shape data.
    pub data: ShapeData,

    /// Radius.
    pub radius: Float,

    /// Minimum z-value.
    pub z_min: Float,

    /// Maximum z-value.
    pub z_max: Float,

    /// Maximum spherical coordinate for Φ.
    pub phi_max: Float,
}

impl Cylinder {
    /// Create a new cylinder.
    ///
    /// * `data`    - Common shape data.
    /// * `radius`  - Radius.
    /// * `z_min`   - Minimum z-value.
    /// * `z_max`   - Maximum z-value.
    /// * `phi_max` - Maximum spherical coordinate for Φ in degrees.
    pub fn new(data: ShapeData, radius: Float, z_min: Float, z_max: Float, phi_max: Float) -> Self {
        Self {
            data,
            radius,
            z_min: min(z_min, z_max),
            z_max: max(z_min, z_max),
            phi_max: radians(clamp(phi_max, 0.0, 360.0)),
        }
    }

    /// Returns a bounding box in object space.
    pub fn object_bound(&self) -> Bounds3f {
        Bounds3f::new(
            Point3f::new(-self.radius, -self.radius, self.z_min),
            Point3f::new(self.radius, self.radius, self.z_max),
        )
    }

    /// Returns the surface area.
    pub fn area(&self) -> Float {
        (self.z_max - self.z_min) * self.radius * self.phi_max
    }

    fn is_clipped(&self, p: &Point3f, phi: Float) -> bool {
        p.z < self.z_min || p.z > self.z_max || phi > self.phi_max
    }

    /// Intersect in object space; returns the hit parameter, point and
    /// azimuth.
    ///
    /// * `r` - World space ray.
    fn do_intersection(&self, r: &Ray) -> Option<(Float, Point3f, Float)> {
        let ray = self.data.world_to_object.transform_ray(r);

        let a = ray.d.x * ray.d.x + ray.d.y * ray.d.y;
        let b = 2.0 * (ray.d.x * ray.o.x + ray.d.y * ray.o.y);
        let c = ray.o.x * ray.o.x + ray.o.y * ray.o.y - self.radius * self.radius;
        let (t0, t1) = quadratic(a, b, c)?;

        if t0 > ray.max_t || t1 < ray.min_t {
            return None;
        }
        let mut t = t0;
        if t < ray.min_t {
            t = t1;
            if t > ray.max_t {
                return None;
            }
        }

        let mut p = ray.at(t);
        let mut phi = azimuth(&p);
        if self.is_clipped(&p, phi) {
            if t == t1 || t1 > ray.max_t {
                return None;
            }
            t = t1;
            p = ray.at(t);
            phi = azimuth(&p);
            if self.is_clipped(&p, phi) {
                return None;
            }
        }
        Some((t, p, phi))
    }

    /// Returns the nearest intersection.
    ///
    /// * `ray`   - World space ray.
    /// * `shape` - The enclosing shape, recorded in the differential geometry.
    pub fn intersect<'a>(&self, ray: &Ray, shape: &'a Shape) -> Option<ShapeHit<'a>> {
        let (t, p, phi) = self.do_intersection(ray)?;

        let u = phi / self.phi_max;
        let v = (p.z - self.z_min) / (self.z_max - self.z_min);
        let dpdu = Vector3f::new(-self.phi_max * p.y, self.phi_max * p.x, 0.0);
        let dpdv = Vector3f::new(0.0, 0.0, self.z_max - self.z_min);

        let d2p_duu = Vector3f::new(p.x, p.y, 0.0) * (-self.phi_max * self.phi_max);
        let (dndu, dndv) = weingarten(&dpdu, &dpdv, &d2p_duu, &Vector3f::zero(), &Vector3f::zero());

        let o2w = &self.data.object_to_world;
        let dg = DifferentialGeometry::new(
            o2w.transform_point(&p),
            o2w.transform_vector(&dpdu),
            o2w.transform_vector(&dpdv),
            o2w.transform_normal(&dndu),
            o2w.transform_normal(&dndv),
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

    /// Returns true if the ray hits the cylinder.
    ///
    /// * `ray` - World space ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.do_intersection(ray).is_some()
    }

    /// Sample a point uniformly by area.
    ///
    /// * `u1` - First random value.
    /// * `u2` - Second random value.
    pub fn sample(&self, u1: Float, u2: Float) -> (Point3f, Normal3f) {
        let z = lerp(u1, self.z_min, self.z_max);
        let t = u2 * self.phi_max;
        let p = Point3f::new(self.radius * t.cos(), self.radius * t.sin(), z);
        let o2w = &self.data.object_to_world;
        let n = o2w.transform_normal(&Normal3f::new(p.x, p.y, 0.0)).normalize();
        (o2w.transform_point(&p), self.data.orient(n))
    }
}

impl From<(&ParamSet, Transform, bool)> for Cylinder {
    /// Create a `Cylinder` from a parameter set, object to world transform
    /// and whether or not surface normal orientation is reversed.
    ///
    /// * `p` - A tuple containing the parameter set, object to world
    ///         transform and the reverse orientation flag.
    fn from(p: (&ParamSet, Transform, bool)) -> Self {
        let (params, o2w, reverse_orientation) = p;
        let radius = params.find_one_float("radius", 1.0);
        let z_min = params.find_one_float("zmin", -1.0);
        let z_max = params.find_one_float("zmax", 1.0);
        let phi_max = params.find_one_float("phimax", 360.0);
        Self::new(ShapeData::new(o2w, reverse_orientation), radius, z_min, z_max, phi_max)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn cylinder() -> Shape {
        Shape::Cylinder(Cylinder::new(ShapeData::new(Transform::identity(), false), 1.0, -1.0, 1.0, 360.0))
    }

    #[test]
    fn hit_from_outside_has_outward_normal() {
        let shape = cylinder();
        let ray = Ray::new(Point3f::new(-5.0, 0.0, 0.5), Vector3f::new(1.0, 0.0, 0.0), 0.0, INFINITY, 0.0, 0);
        let hit = shape.intersect(&ray).unwrap();
        assert!(approx_eq!(Float, hit.t_hit, 4.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, hit.dg.n.x, -1.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, hit.dg.v, 0.75, epsilon = 1e-5));
    }

    #[test]
    fn rays_along_axis_miss() {
        let shape = cylinder();
        let ray = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), 0.0, INFINITY, 0.0, 0);
        assert!(!shape.intersect_p(&ray));
        let ray = Ray::new(Point3f::new(-5.0, 0.0, 2.0), Vector3f::new(1.0, 0.0, 0.0), 0.0, INFINITY, 0.0, 0);
        assert!(!shape.intersect_p(&ray));
    }

    #[test]
    fn area_and_samples() {
        let shape = cylinder();
        assert!(approx_eq!(Float, shape.area(), 4.0 * PI, epsilon = 1e-4));
        let (p, n) = shape.sample(0.25, 0.5);
        assert!(approx_eq!(Float, p.z, -0.5, epsilon = 1e-6));
        assert!(approx_eq!(Float, p.x, -1.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, n.x, -1.0, epsilon = 1e-5));
    }
}
