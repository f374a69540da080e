//! Shapes

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use std::sync::Arc;

mod cylinder;
mod disk;
mod sphere;
mod triangle;

// Re-export
pub use cylinder::*;
pub use disk::*;
pub use sphere::*;
pub use triangle::*;

/// Data common to all shapes.
#[derive(Copy, Clone, Debug)]
pub struct ShapeData {
    /// The object to world transfomation.
    pub object_to_world: Transform,

    /// The world to object transfomation.
    pub world_to_object: Transform,

    /// Indicates whether surface normal directions should be reversed from
    /// the default.
    pub reverse_orientation: bool,

    /// Indicates whether the object to world transformation changes the
    /// handedness of the coordinate system.
    pub transform_swaps_handedness: bool,
}

impl ShapeData {
    /// Create a new instance of shape data.
    ///
    /// * `object_to_world`     - The object to world transfomation.
    /// * `reverse_orientation` - Indicates whether surface normal directions
    ///                           should be reversed from the default.
    pub fn new(object_to_world: Transform, reverse_orientation: bool) -> Self {
        Self {
            object_to_world,
            world_to_object: object_to_world.inverse(),
            reverse_orientation,
            transform_swaps_handedness: object_to_world.swaps_handedness(),
        }
    }

    /// Returns the normal oriented per `reverse_orientation`.
    ///
    /// * `n` - The normal.
    pub(crate) fn orient(&self, n: Normal3f) -> Normal3f {
        if self.reverse_orientation {
            -n
        } else {
            n
        }
    }
}

/// Result of a successful ray-shape intersection.
#[derive(Copy, Clone, Debug)]
pub struct ShapeHit<'a> {
    /// Parametric distance along the ray.
    pub t_hit: Float,

    /// Offset used to avoid self intersection of spawned rays.
    pub ray_epsilon: Float,

    /// World space differential geometry at the hit point.
    pub dg: DifferentialGeometry<'a>,
}

/// The geometric shapes known to the renderer.
#[derive(Clone, Debug)]
pub enum Shape {
    /// A (partial) sphere.
    Sphere(Sphere),

    /// A (partial) disk or annulus.
    Disk(Disk),

    /// A (partial) cylinder.
    Cylinder(Cylinder),

    /// A triangle mesh; must be refined into triangles before intersection.
    TriangleMesh(Arc<TriangleMesh>),

    /// A single triangle of a mesh.
    Triangle(Triangle),
}

impl Shape {
    /// Returns the data common to all shapes.
    pub fn data(&self) -> &ShapeData {
        match self {
            Self::Sphere(s) => &s.data,
            Self::Disk(s) => &s.data,
            Self::Cylinder(s) => &s.data,
            Self::TriangleMesh(m) => &m.data,
            Self::Triangle(t) => &t.mesh.data,
        }
    }

    /// Returns the shape name, useful when debugging.
    pub fn get_type(&self) -> &'static str {
        match self {
            Self::Sphere(_) => "sphere",
            Self::Disk(_) => "disk",
            Self::Cylinder(_) => "cylinder",
            Self::TriangleMesh(_) => "trianglemesh",
            Self::Triangle(_) => "triangle",
        }
    }

    /// Returns a bounding box in the shape's object space.
    pub fn object_bound(&self) -> Bounds3f {
        match self {
            Self::Sphere(s) => s.object_bound(),
            Self::Disk(s) => s.object_bound(),
            Self::Cylinder(s) => s.object_bound(),
            Self::TriangleMesh(m) => m.object_bound(),
            Self::Triangle(t) => t.object_bound(),
        }
    }

    /// Returns a bounding box in world space.
    pub fn world_bound(&self) -> Bounds3f {
        match self {
            Self::TriangleMesh(m) => m.world_bound(),
            Self::Triangle(t) => t.world_bound(),
            _ => self.data().object_to_world.transform_bounds(&self.object_bound()),
        }
    }

    /// Returns true if the shape can be intersected directly; false if it
    /// must be refined first.
    pub fn can_intersect(&self) -> bool {
        !matches!(self, Self::TriangleMesh(_))
    }

    /// Split the shape into simpler shapes.
    pub fn refine(&self) -> Vec<Arc<Shape>> {
        match self {
            Self::TriangleMesh(m) => TriangleMesh::refine(m),
            _ => {
                error!("Unimplemented refine() called for {}", self.get_type());
                vec![]
            }
        }
    }

    /// Returns the nearest intersection within the ray's parametric range.
    ///
    /// * `ray` - The ray in world space.
    pub fn intersect(&self, ray: &Ray) -> Option<ShapeHit<'_>> {
        match self {
            Self::Sphere(s) => s.intersect(ray, self),
            Self::Disk(s) => s.intersect(ray, self),
            Self::Cylinder(s) => s.intersect(ray, self),
            Self::Triangle(t) => t.intersect(ray, self),
            Self::TriangleMesh(_) => {
                error!("Unimplemented intersect() called for {}", self.get_type());
                None
            }
        }
    }

    /// Returns true if the ray hits the shape within its parametric range.
    ///
    /// * `ray` - The ray in world space.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        match self {
            Self::Sphere(s) => s.intersect_p(ray),
            Self::Disk(s) => s.intersect_p(ray),
            Self::Cylinder(s) => s.intersect_p(ray),
            Self::Triangle(t) => t.intersect_p(ray),
            Self::TriangleMesh(_) => {
                error!("Unimplemented intersect_p() called for {}", self.get_type());
                false
            }
        }
    }

    /// Returns the shading geometry at a hit point. The supported shapes use
    /// the true geometry for shading.
    ///
    /// * `_object_to_world` - Object to world transform at hit time.
    /// * `dg`               - Differential geometry at the hit point.
    pub fn get_shading_geometry<'a>(
        &self,
        _object_to_world: &Transform,
        dg: &DifferentialGeometry<'a>,
    ) -> DifferentialGeometry<'a> {
        *dg
    }

    /// Returns the surface area.
    pub fn area(&self) -> Float {
        match self {
            Self::Sphere(s) => s.area(),
            Self::Disk(s) => s.area(),
            Self::Cylinder(s) => s.area(),
            Self::TriangleMesh(m) => m.area(),
            Self::Triangle(t) => t.area(),
        }
    }

    /// Sample a point uniformly by area; returns the point and the surface
    /// normal there.
    ///
    /// * `u1` - First random value.
    /// * `u2` - Second random value.
    pub fn sample(&self, u1: Float, u2: Float) -> (Point3f, Normal3f) {
        match self {
            Self::Sphere(s) => s.sample(u1, u2),
            Self::Disk(s) => s.sample(u1, u2),
            Self::Cylinder(s) => s.sample(u1, u2),
            Self::Triangle(t) => t.sample(u1, u2),
            Self::TriangleMesh(m) => m.sample(u1, u2),
        }
    }

    /// Sample a point on the shape as seen from the reference point `p`.
    ///
    /// * `p`  - Reference point.
    /// * `u1` - First random value.
    /// * `u2` - Second random value.
    pub fn sample_from(&self, p: &Point3f, u1: Float, u2: Float) -> (Point3f, Normal3f) {
        match self {
            Self::Sphere(s) => s.sample_from(p, u1, u2, self),
            _ => self.sample(u1, u2),
        }
    }

    /// Returns the area density for uniform sampling.
    pub fn pdf(&self) -> Float {
        1.0 / self.area()
    }

    /// Returns the solid angle density of sampling direction `wi` from `p`
    /// with `sample_from`.
    ///
    /// * `p`  - Reference point.
    /// * `wi` - Direction from the reference point.
    pub fn pdf_wi(&self, p: &Point3f, wi: &Vector3f) -> Float {
        match self {
            Self::Sphere(s) => s.pdf_wi(p, wi, self),
            Self::TriangleMesh(m) => m.pdf_wi(p, wi),
            _ => self.pdf_wi_by_area(p, wi),
        }
    }

    /// Convert the area density to solid angle measure by intersecting a ray
    /// towards `wi` with the shape.
    ///
    /// * `p`  - Reference point.
    /// * `wi` - Direction from the reference point.
    pub(crate) fn pdf_wi_by_area(&self, p: &Point3f, wi: &Vector3f) -> Float {
        let ray = Ray::new(*p, *wi, 1e-3, INFINITY, 0.0, 0);
        match self.intersect(&ray) {
            Some(hit) => {
                let pdf = p.distance_squared(&ray.at(hit.t_hit)) / (hit.dg.n.abs_dot(&-*wi) * self.area());
                if pdf.is_infinite() {
                    0.0
                } else {
                    pdf
                }
            }
            None => 0.0,
        }
    }
}

/// Computes dndu and dndv from the first and second fundamental forms of a
/// parametric surface.
///
/// * `dpdu`   - Partial derivative of position in u.
/// * `dpdv`   - Partial derivative of position in v.
/// * `d2p_duu` - Second partial derivative in u.
/// * `d2p_duv` - Mixed second partial derivative.
/// * `d2p_dvv` - Second partial derivative in v.
pub(crate) fn weingarten(
    dpdu: &Vector3f,
    dpdv: &Vector3f,
    d2p_duu: &Vector3f,
    d2p_duv: &Vector3f,
    d2p_dvv: &Vector3f,
) -> (Normal3f, Normal3f) {
    let e1 = dpdu.dot(dpdu);
    let f1 = dpdu.dot(dpdv);
    let g1 = dpdv.dot(dpdv);
    let n = dpdu.cross(dpdv).normalize();
    let e2 = n.dot(d2p_duu);
    let f2 = n.dot(d2p_duv);
    let g2 = n.dot(d2p_dvv);

    let inv_egf_1 = 1.0 / (e1 * g1 - f1 * f1);
    let dndu = Normal3f::from(*dpdu * ((f2 * f1 - e2 * g1) * inv_egf_1) + *dpdv * ((e2 * f1 - f2 * e1) * inv_egf_1));
    let dndv = Normal3f::from(*dpdu * ((g2 * f1 - f2 * g1) * inv_egf_1) + *dpdv * ((f2 * f1 - g2 * e1) * inv_egf_1));
    (dndu, dndv)
}

/// Returns the azimuth of a point in [0, 2π).
///
/// * `p` - Point in object space.
pub(crate) fn azimuth(p: &Point3f) -> Float {
    let phi = p.y.atan2(p.x);
    if phi < 0.0 {
        phi + TWO_PI
    } else {
        phi
    }
}
