//! Primitives

use crate::accelerators::*;
use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::material::*;
use crate::reflection::*;
use crate::shape::*;
use std::sync::Arc;

mod geometric;
mod transformed;

// Re-export
pub use geometric::*;
pub use transformed::*;

/// Anything a ray can hit: a single shape, an instanced primitive or an
/// aggregate of primitives.
pub enum Primitive {
    /// A shape with a material and optional area light.
    Geometric(GeometricPrimitive),

    /// A primitive placed in the world through an animated transform.
    Transformed(TransformedPrimitive),

    /// A uniform grid over other primitives.
    Grid(GridAccel),
}

/// Atomic reference counted `Primitive`.
pub type ArcPrimitive = Arc<Primitive>;

impl Primitive {
    /// Returns a bounding box in world space.
    pub fn world_bound(&self) -> Bounds3f {
        match self {
            Self::Geometric(p) => p.shape.world_bound(),
            Self::Transformed(p) => p.world_bound(),
            Self::Grid(g) => g.world_bound(),
        }
    }

    /// Returns true if the primitive can be intersected directly.
    pub fn can_intersect(&self) -> bool {
        match self {
            Self::Geometric(p) => p.shape.can_intersect(),
            Self::Transformed(_) | Self::Grid(_) => true,
        }
    }

    /// Split a primitive that cannot be intersected into simpler ones.
    pub fn refine(&self) -> Vec<ArcPrimitive> {
        match self {
            Self::Geometric(p) => p.refine(),
            _ => {
                error!("Unimplemented refine() called on an intersectable primitive");
                vec![]
            }
        }
    }

    /// Refine a primitive until every result can be intersected.
    ///
    /// * `prim` - The primitive to refine.
    pub fn full_refine(prim: &ArcPrimitive) -> Vec<ArcPrimitive> {
        let mut refined = vec![];
        let mut todo = vec![Arc::clone(prim)];
        while let Some(p) = todo.pop() {
            if p.can_intersect() {
                refined.push(p);
            } else {
                todo.extend(p.refine());
            }
        }
        refined
    }

    /// Returns the nearest intersection along the ray and shrinks `ray.max_t`
    /// to its parametric distance.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &mut Ray) -> Option<Intersection<'_>> {
        match self {
            Self::Geometric(p) => p.intersect(ray),
            Self::Transformed(p) => p.intersect(ray),
            Self::Grid(g) => g.intersect(ray),
        }
    }

    /// Returns true if the ray hits anything within its parametric range.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        match self {
            Self::Geometric(p) => p.shape.intersect_p(ray),
            Self::Transformed(p) => p.intersect_p(ray),
            Self::Grid(g) => g.intersect_p(ray),
        }
    }

    /// Returns the area light attached to a leaf primitive.
    ///
    /// *NOTE*: Intersections carry the leaf primitive; this is only valid on
    /// `Geometric` primitives.
    pub fn area_light(&self) -> Option<ArcLight> {
        match self {
            Self::Geometric(p) => p.area_light.clone(),
            _ => {
                error!("area_light() called on a non-leaf primitive");
                None
            }
        }
    }

    /// Returns the BSDF of a leaf primitive at a hit point.
    ///
    /// *NOTE*: Only valid on `Geometric` primitives; other primitives log an
    /// error and return `None`.
    ///
    /// * `dg`              - Differential geometry at the hit point.
    /// * `object_to_world` - Object to world transform of the hit.
    pub fn get_bsdf<'a>(&'a self, dg: &DifferentialGeometry<'a>, object_to_world: &Transform) -> Option<BSDF<'a>> {
        match self {
            Self::Geometric(p) => Some(p.get_bsdf(dg, object_to_world)),
            _ => {
                error!("get_bsdf() called on a non-leaf primitive");
                None
            }
        }
    }
}

impl From<GeometricPrimitive> for Primitive {
    fn from(p: GeometricPrimitive) -> Self {
        Self::Geometric(p)
    }
}

impl From<TransformedPrimitive> for Primitive {
    fn from(p: TransformedPrimitive) -> Self {
        Self::Transformed(p)
    }
}

impl From<GridAccel> for Primitive {
    fn from(g: GridAccel) -> Self {
        Self::Grid(g)
    }
}
