//! Scene

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::primitive::*;
use crate::volume::*;

/// Everything rays can interact with: the primitive aggregate, the lights and
/// an optional volume region. Immutable once built.
pub struct Scene {
    /// An aggregate of all primitives in the scene.
    pub aggregate: ArcPrimitive,

    /// All light sources in the scene.
    pub lights: Vec<ArcLight>,

    /// Participating media, if any.
    pub volume_region: Option<VolumeRegion>,

    /// Bounds of the geometry and the volume region.
    bound: Bounds3f,
}

impl Scene {
    /// Creates a new `Scene`.
    ///
    /// * `aggregate`     - An aggregate of all primitives in the scene.
    /// * `lights`        - All light sources in the scene.
    /// * `volume_region` - Participating media, if any.
    pub fn new(aggregate: ArcPrimitive, lights: Vec<ArcLight>, volume_region: Option<VolumeRegion>) -> Self {
        let mut bound = aggregate.world_bound();
        if let Some(vr) = volume_region.as_ref() {
            bound = bound.union(&vr.world_bound());
        }
        Self {
            aggregate,
            lights,
            volume_region,
            bound,
        }
    }

    /// Returns the bounds of the geometry and the volume region.
    pub fn world_bound(&self) -> Bounds3f {
        self.bound
    }

    /// Traces the ray into the scene and returns the nearest intersection.
    /// `ray.max_t` is set to its distance.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect(&self, ray: &mut Ray) -> Option<Intersection<'_>> {
        self.aggregate.intersect(ray)
    }

    /// Returns true if the ray hits anything within its parametric range.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.aggregate.intersect_p(ray)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accelerators::*;
    use crate::material::*;
    use crate::pbrt::*;
    use crate::shape::*;
    use crate::spectrum::*;
    use crate::texture::*;
    use std::sync::Arc;

    #[test]
    fn world_bound_includes_volume() {
        let sphere = Shape::Sphere(Sphere::new(ShapeData::new(Transform::identity(), false), 1.0, -1.0, 1.0, 360.0));
        let material = Arc::new(Material::Matte(MatteMaterial::new(
            Arc::new(Texture::Constant(Spectrum::new(0.5))),
            Arc::new(Texture::Constant(0.0)),
            None,
        )));
        let prim = Arc::new(Primitive::Geometric(GeometricPrimitive::new(Arc::new(sphere), material, None)));
        let grid = Arc::new(Primitive::Grid(GridAccel::new(vec![prim], true)));
        let volume = VolumeRegion::Homogeneous(HomogeneousVolume::new(
            Spectrum::new(1.0),
            Spectrum::zero(),
            0.0,
            Spectrum::zero(),
            Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(4.0, 1.0, 1.0)),
            &Transform::identity(),
        ));
        let scene = Scene::new(grid, vec![], Some(volume));

        let b = scene.world_bound();
        assert_eq!(b.p_max.x, 4.0);
        assert!(b.p_min.x <= -1.0);

        let mut ray = Ray::new(
            Point3f::new(0.0, 0.0, -5.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
            0.0,
            0,
        );
        assert!(scene.intersect_p(&ray));
        assert!(scene.intersect(&mut ray).is_some());
        assert!(ray.max_t < 5.0);
    }
}
