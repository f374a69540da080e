//! Intersections

use super::DifferentialGeometry;
use crate::geometry::*;
use crate::pbrt::*;
use crate::primitive::*;
use crate::reflection::*;
use crate::spectrum::*;

/// A ray-primitive hit with everything needed to shade it.
///
/// The lifetime specifiers:
/// * `'a` - Shared reference to the scene containing the primitive.
#[derive(Copy, Clone)]
pub struct Intersection<'a> {
    /// Differential geometry at the hit point in world space.
    pub dg: DifferentialGeometry<'a>,

    /// The primitive that was hit.
    pub primitive: &'a GeometricPrimitive,

    /// Object to world transform of the hit, including any instance
    /// transforms.
    pub object_to_world: Transform,

    /// World to object transform of the hit.
    pub world_to_object: Transform,

    /// Offset used when spawning rays from the hit point.
    pub ray_epsilon: Float,
}

impl<'a> Intersection<'a> {
    /// Create a new intersection.
    ///
    /// * `dg`              - Differential geometry at the hit point.
    /// * `primitive`       - The primitive that was hit.
    /// * `object_to_world` - Object to world transform.
    /// * `ray_epsilon`     - Offset used when spawning rays.
    pub fn new(
        dg: DifferentialGeometry<'a>,
        primitive: &'a GeometricPrimitive,
        object_to_world: Transform,
        ray_epsilon: Float,
    ) -> Self {
        Self {
            dg,
            primitive,
            object_to_world,
            world_to_object: object_to_world.inverse(),
            ray_epsilon,
        }
    }

    /// Returns the BSDF at the hit point after estimating the screen-space
    /// differentials from `ray`.
    ///
    /// * `ray` - The ray that produced this hit.
    pub fn get_bsdf(&mut self, ray: &Ray) -> BSDF<'a> {
        self.dg.compute_differentials(ray);
        self.primitive.get_bsdf(&self.dg, &self.object_to_world)
    }

    /// Returns the radiance emitted towards `wo` if the hit primitive is an
    /// area light; black otherwise.
    ///
    /// * `wo` - Outgoing direction.
    pub fn le(&self, wo: &Vector3f) -> Spectrum {
        match self.primitive.area_light.as_ref() {
            Some(light) => light.l(&self.dg.p, &self.dg.n, wo),
            None => Spectrum::zero(),
        }
    }
}
