//! Transformed Primitive

use super::*;

/// A primitive placed in the world by an animated transform. Used for object
/// instances and moving geometry.
pub struct TransformedPrimitive {
    /// The instanced primitive.
    pub primitive: ArcPrimitive,

    /// World to primitive space over the shutter interval.
    pub world_to_primitive: AnimatedTransform,
}

impl TransformedPrimitive {
    /// Create a new `TransformedPrimitive`.
    ///
    /// * `primitive`          - The instanced primitive.
    /// * `world_to_primitive` - World to primitive space transformation.
    pub fn new(primitive: ArcPrimitive, world_to_primitive: AnimatedTransform) -> Self {
        Self {
            primitive,
            world_to_primitive,
        }
    }

    /// Returns a bounding box in world space.
    pub fn world_bound(&self) -> Bounds3f {
        self.world_to_primitive.motion_bounds(&self.primitive.world_bound(), true)
    }

    /// Returns the nearest intersection, moved back to world space.
    ///
    /// * `r` - The ray in world space.
    pub fn intersect(&self, r: &mut Ray) -> Option<Intersection<'_>> {
        let w2p = self.world_to_primitive.interpolate(r.time);
        let mut ray = w2p.transform_ray(r);
        let mut isect = self.primitive.intersect(&mut ray)?;
        r.max_t = ray.max_t;

        if !w2p.is_identity() {
            let p2w = w2p.inverse();
            isect.world_to_object = isect.world_to_object * w2p;
            isect.object_to_world = isect.world_to_object.inverse();
            isect.dg = transform_dg(&p2w, &isect.dg);
        }
        Some(isect)
    }

    /// Returns true if the ray hits the instanced primitive.
    ///
    /// * `r` - The ray in world space.
    pub fn intersect_p(&self, r: &Ray) -> bool {
        let ray = self.world_to_primitive.interpolate(r.time).transform_ray(r);
        self.primitive.intersect_p(&ray)
    }
}

/// Apply a transform to the point, normal and partial derivatives of a hit.
///
/// * `t`  - The transform.
/// * `dg` - The differential geometry.
fn transform_dg<'a>(t: &Transform, dg: &DifferentialGeometry<'a>) -> DifferentialGeometry<'a> {
    DifferentialGeometry {
        p: t.transform_point(&dg.p),
        n: t.transform_normal(&dg.n).normalize(),
        dpdu: t.transform_vector(&dg.dpdu),
        dpdv: t.transform_vector(&dg.dpdv),
        dndu: t.transform_normal(&dg.dndu),
        dndv: t.transform_normal(&dg.dndv),
        dpdx: t.transform_vector(&dg.dpdx),
        dpdy: t.transform_vector(&dg.dpdy),
        ..*dg
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbrt::*;
    use crate::spectrum::*;
    use crate::texture::*;
    use float_cmp::*;

    fn unit_sphere() -> ArcPrimitive {
        let sphere = Shape::Sphere(Sphere::new(ShapeData::new(Transform::identity(), false), 1.0, -1.0, 1.0, 360.0));
        let material = Arc::new(Material::Matte(MatteMaterial::new(
            Arc::new(Texture::Constant(Spectrum::new(0.5))),
            Arc::new(Texture::Constant(0.0)),
            None,
        )));
        Arc::new(Primitive::Geometric(GeometricPrimitive::new(Arc::new(sphere), material, None)))
    }

    #[test]
    fn instance_is_moved_into_world() {
        let primitive_to_world = Transform::translate(&Vector3f::new(3.0, 0.0, 0.0));
        let instance = TransformedPrimitive::new(unit_sphere(), AnimatedTransform::fixed(primitive_to_world.inverse()));

        let b = instance.world_bound();
        assert!(approx_eq!(Float, b.p_min.x, 2.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, b.p_max.x, 4.0, epsilon = 1e-4));

        let mut ray = Ray::new(
            Point3f::new(3.0, 0.0, -5.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
            0.0,
            0,
        );
        assert!(instance.intersect_p(&ray));
        let isect = instance.intersect(&mut ray).unwrap();
        assert!(approx_eq!(Float, ray.max_t, 4.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, isect.dg.p.x, 3.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, isect.dg.n.z, -1.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, isect.object_to_world.transform_point(&Point3f::zero()).x, 3.0, epsilon = 1e-4));
    }

    #[test]
    fn instance_misses_untransformed_position() {
        let instance = TransformedPrimitive::new(
            unit_sphere(),
            AnimatedTransform::fixed(Transform::translate(&Vector3f::new(-3.0, 0.0, 0.0))),
        );
        let ray = Ray::new(
            Point3f::new(0.0, 0.0, -5.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
            0.0,
            0,
        );
        assert!(!instance.intersect_p(&ray));
    }
}
