//! Spheres

use super::*;
use crate::paramset::*;
use crate::sampling::*;

/// A sphere centered at the object space origin, optionally clipped in z and
/// in azimuth.
#[derive(Clone, Debug)]
pub struct Sphere {
    /// Common shape data.
    pub data: ShapeData,

    /// Radius of sphere.
    pub radius: Float,

    /// Minimum z-value to truncate sphere.
    pub z_min: Float,

    /// Maximum z-value to truncate sphere.
    pub z_max: Float,

    /// Minimum spherical coordinate for θ.
    pub theta_min: Float,

    /// Maximum spherical coordinate for θ.
    pub theta_max: Float,

    /// Maximum spherical coordinate for Φ.
    pub phi_max: Float,
}

/// Object space hit on the sphere surface.
struct SphereHit {
    t: Float,
    p: Point3f,
    phi: Float,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// * `data`    - Common shape data.
    /// * `radius`  - Radius of sphere.
    /// * `z_min`   - Minimum z-value to truncate sphere.
    /// * `z_max`   - Maximum z-value to truncate sphere.
    /// * `phi_max` - Maximum spherical coordinate for Φ in degrees.
    pub fn new(data: ShapeData, radius: Float, z_min: Float, z_max: Float, phi_max: Float) -> Self {
        let z0 = clamp(min(z_min, z_max), -radius, radius);
        let z1 = clamp(max(z_min, z_max), -radius, radius);
        Self {
            data,
            radius,
            z_min: z0,
            z_max: z1,
            theta_min: clamp(z0 / radius, -1.0, 1.0).acos(),
            theta_max: clamp(z1 / radius, -1.0, 1.0).acos(),
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
        self.phi_max * self.radius * (self.z_max - self.z_min)
    }

    /// Returns true if an object space point lies outside the clipped range.
    ///
    /// * `p`   - Point on the full sphere.
    /// * `phi` - Azimuth of the point.
    fn is_clipped(&self, p: &Point3f, phi: Float) -> bool {
        (self.z_min > -self.radius && p.z < self.z_min) || (self.z_max < self.radius && p.z > self.z_max) || phi > self.phi_max
    }

    /// Returns the object space point and azimuth at parameter `t`.
    ///
    /// * `ray` - Object space ray.
    /// * `t`   - Parametric distance.
    fn hit_at(&self, ray: &Ray, t: Float) -> (Point3f, Float) {
        let mut p = ray.at(t);
        if p.x == 0.0 && p.y == 0.0 {
            p.x = 1e-5 * self.radius;
        }
        (p, azimuth(&p))
    }

    /// Find the nearest unclipped hit in object space.
    ///
    /// * `r` - World space ray.
    fn do_intersection(&self, r: &Ray) -> Option<SphereHit> {
        let ray = self.data.world_to_object.transform_ray(r);
        let o = Vector3f::from(ray.o);

        let a = ray.d.length_squared();
        let b = 2.0 * ray.d.dot(&o);
        let c = o.length_squared() - self.radius * self.radius;
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

        let (mut p, mut phi) = self.hit_at(&ray, t);
        if self.is_clipped(&p, phi) {
            if t == t1 || t1 > ray.max_t {
                return None;
            }
            t = t1;
            (p, phi) = self.hit_at(&ray, t);
            if self.is_clipped(&p, phi) {
                return None;
            }
        }

        Some(SphereHit { t, p, phi })
    }

    /// Returns the nearest intersection.
    ///
    /// * `ray`   - World space ray.
    /// * `shape` - The enclosing shape, recorded in the differential geometry.
    pub fn intersect<'a>(&self, ray: &Ray, shape: &'a Shape) -> Option<ShapeHit<'a>> {
        let SphereHit { t, p, phi } = self.do_intersection(ray)?;

        // Parametric representation of the hit.
        let u = phi / self.phi_max;
        let theta = clamp(p.z / self.radius, -1.0, 1.0).acos();
        let d_theta = self.theta_max - self.theta_min;
        let v = (theta - self.theta_min) / d_theta;

        let inv_z_radius = 1.0 / (p.x * p.x + p.y * p.y).sqrt();
        let cos_phi = p.x * inv_z_radius;
        let sin_phi = p.y * inv_z_radius;
        let dpdu = Vector3f::new(-self.phi_max * p.y, self.phi_max * p.x, 0.0);
        let dpdv = Vector3f::new(p.z * cos_phi, p.z * sin_phi, -self.radius * theta.sin()) * d_theta;

        let d2p_duu = Vector3f::new(p.x, p.y, 0.0) * (-self.phi_max * self.phi_max);
        let d2p_duv = Vector3f::new(-sin_phi, cos_phi, 0.0) * (d_theta * p.z * self.phi_max);
        let d2p_dvv = Vector3f::from(p) * (-d_theta * d_theta);
        let (dndu, dndv) = weingarten(&dpdu, &dpdv, &d2p_duu, &d2p_duv, &d2p_dvv);

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

    /// Returns true if the ray hits the sphere.
    ///
    /// * `ray` - World space ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.do_intersection(ray).is_some()
    }

    /// Uniformly sample a point on the full sphere.
    ///
    /// * `u1` - First random value.
    /// * `u2` - Second random value.
    pub fn sample(&self, u1: Float, u2: Float) -> (Point3f, Normal3f) {
        let p = Point3f::from(uniform_sample_sphere(u1, u2) * self.radius);
        let o2w = &self.data.object_to_world;
        let n = o2w.transform_normal(&Normal3f::new(p.x, p.y, p.z)).normalize();
        (o2w.transform_point(&p), self.data.orient(n))
    }

    /// Returns the world space center and the squared distance from `p`.
    fn center_from(&self, p: &Point3f) -> (Point3f, Float) {
        let center = self.data.object_to_world.transform_point(&Point3f::zero());
        (center, p.distance_squared(&center))
    }

    /// Sample a point on the part of the sphere visible from `p` by sampling
    /// the cone it subtends. Points inside the sphere sample it uniformly.
    ///
    /// * `p`     - Reference point.
    /// * `u1`    - First random value.
    /// * `u2`    - Second random value.
    /// * `shape` - The enclosing shape.
    pub fn sample_from(&self, p: &Point3f, u1: Float, u2: Float, shape: &Shape) -> (Point3f, Normal3f) {
        let (center, dist2) = self.center_from(p);
        if dist2 - self.radius * self.radius < 1e-4 {
            return self.sample(u1, u2);
        }

        let wc = (center - *p).normalize();
        let (wc_x, wc_y) = coordinate_system(&wc);
        let sin_theta_max2 = self.radius * self.radius / dist2;
        let cos_theta_max = max(0.0, 1.0 - sin_theta_max2).sqrt();

        let d = uniform_sample_cone(u1, u2, cos_theta_max, &wc_x, &wc_y, &wc);
        let r = Ray::new(*p, d, 1e-3, INFINITY, 0.0, 0);
        let t = match shape.intersect(&r) {
            Some(hit) => hit.t_hit,
            None => (center - *p).dot(&r.d.normalize()),
        };
        let ps = r.at(t);
        let n = Normal3f::from((ps - center).normalize());
        (ps, self.data.orient(n))
    }

    /// Returns the solid angle density for `sample_from`.
    ///
    /// * `p`     - Reference point.
    /// * `wi`    - Direction from the reference point.
    /// * `shape` - The enclosing shape.
    pub fn pdf_wi(&self, p: &Point3f, wi: &Vector3f, shape: &Shape) -> Float {
        let (_, dist2) = self.center_from(p);
        if dist2 - self.radius * self.radius < 1e-4 {
            return shape.pdf_wi_by_area(p, wi);
        }
        let sin_theta_max2 = self.radius * self.radius / dist2;
        let cos_theta_max = max(0.0, 1.0 - sin_theta_max2).sqrt();
        uniform_cone_pdf(cos_theta_max)
    }
}

impl From<(&ParamSet, Transform, bool)> for Sphere {
    /// Create a `Sphere` from a parameter set, object to world transform and
    /// whether or not surface normal orientation is reversed.
    ///
    /// * `p` - A tuple containing the parameter set, object to world
    ///         transform and the reverse orientation flag.
    fn from(p: (&ParamSet, Transform, bool)) -> Self {
        let (params, o2w, reverse_orientation) = p;
        let radius = params.find_one_float("radius", 1.0);
        let z_min = params.find_one_float("zmin", -radius);
        let z_max = params.find_one_float("zmax", radius);
        let phi_max = params.find_one_float("phimax", 360.0);
        Self::new(ShapeData::new(o2w, reverse_orientation), radius, z_min, z_max, phi_max)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
