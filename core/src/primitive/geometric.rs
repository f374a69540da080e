//! Geometric Primitive

use super::*;

/// A shape with its material and, for emitters, its area light.
#[derive(Clone)]
pub struct GeometricPrimitive {
    /// The shape.
    pub shape: Arc<Shape>,

    /// The material.
    pub material: ArcMaterial,

    /// Area light for emissive shapes.
    pub area_light: Option<ArcLight>,
}

impl GeometricPrimitive {
    /// Create a new `GeometricPrimitive`.
    ///
    /// * `shape`      - The shape.
    /// * `material`   - The material.
    /// * `area_light` - Area light for emissive shapes.
    pub fn new(shape: Arc<Shape>, material: ArcMaterial, area_light: Option<ArcLight>) -> Self {
        Self {
            shape,
            material,
            area_light,
        }
    }

    /// Refine the shape and share the material and light with every part.
    pub fn refine(&self) -> Vec<ArcPrimitive> {
        self.shape
            .refine()
            .into_iter()
            .map(|shape| {
                Arc::new(Primitive::Geometric(Self::new(
                    shape,
                    Arc::clone(&self.material),
                    self.area_light.clone(),
                )))
            })
            .collect()
    }

    /// Returns the hit and shrinks `ray.max_t` if the ray hits the shape.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &mut Ray) -> Option<Intersection<'_>> {
        let hit = self.shape.intersect(ray)?;
        ray.max_t = hit.t_hit;
        let data = self.shape.data();
        Some(Intersection {
            dg: hit.dg,
            primitive: self,
            object_to_world: data.object_to_world,
            world_to_object: data.world_to_object,
            ray_epsilon: hit.ray_epsilon,
        })
    }

    /// Returns the BSDF at a hit point.
    ///
    /// * `dg`              - Differential geometry at the hit point.
    /// * `object_to_world` - Object to world transform of the hit.
    pub fn get_bsdf<'a>(&'a self, dg: &DifferentialGeometry<'a>, object_to_world: &Transform) -> BSDF<'a> {
        let dgs = self.shape.get_shading_geometry(object_to_world, dg);
        self.material.get_bsdf(dg, &dgs)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
