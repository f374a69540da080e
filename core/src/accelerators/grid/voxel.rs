//! Grid Voxel

use super::*;

/// A grid cell. Holds indices into the grid's primitive list and, once first
/// traversed, a table where every primitive can be intersected.
pub struct GridVoxel {
    /// Indices into the grid's primitives.
    indices: Vec<u32>,

    /// Intersectable primitives, built on first access.
    refined: OnceLock<Vec<ArcPrimitive>>,
}

impl GridVoxel {
    /// Create a voxel holding one primitive.
    ///
    /// * `index` - Index of the primitive in the grid.
    pub fn new(index: u32) -> Self {
        Self {
            indices: vec![index],
            refined: OnceLock::new(),
        }
    }

    /// Add a primitive index.
    ///
    /// * `index` - Index of the primitive in the grid.
    pub fn add_primitive(&mut self, index: u32) {
        self.indices.push(index);
    }

    /// Returns the number of primitives overlapping the voxel.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the voxel holds no primitives.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns true once the voxel's primitives were refined.
    pub fn is_refined(&self) -> bool {
        self.refined.get().is_some()
    }

    /// Returns the voxel's primitives, refining the ones that cannot be
    /// intersected on first call. A primitive that refines to a single child
    /// is replaced by it; several children go into a nested grid.
    ///
    /// * `primitives` - The grid's primitives.
    pub fn refined(&self, primitives: &[ArcPrimitive]) -> &[ArcPrimitive] {
        self.refined.get_or_init(|| {
            self.indices
                .iter()
                .map(|&i| {
                    let prim = &primitives[i as usize];
                    if prim.can_intersect() {
                        return Arc::clone(prim);
                    }
                    let mut p = Primitive::full_refine(prim);
                    debug_assert!(!p.is_empty());
                    if p.len() == 1 {
                        p.remove(0)
                    } else {
                        Arc::new(Primitive::Grid(GridAccel::new(p, false)))
                    }
                })
                .collect()
        })
    }

    /// Returns the nearest hit among the voxel's primitives not yet tested
    /// by traversal `ray_id`. Each hit shrinks `ray.max_t`.
    ///
    /// * `primitives` - The grid's primitives.
    /// * `mailboxes`  - The grid's mailboxes.
    /// * `ray_id`     - Traversal id.
    /// * `ray`        - The ray.
    pub fn intersect<'a>(
        &'a self,
        primitives: &[ArcPrimitive],
        mailboxes: &Mailboxes,
        ray_id: u64,
        ray: &mut Ray,
    ) -> Option<Intersection<'a>> {
        let mut hit = None;
        for (&i, prim) in self.indices.iter().zip(self.refined(primitives)) {
            if !mailboxes.deliver(i, ray_id) {
                continue;
            }
            if let Some(isect) = prim.intersect(ray) {
                hit = Some(isect);
            }
        }
        hit
    }

    /// Returns true if any primitive in the voxel not yet tested by
    /// traversal `ray_id` is hit.
    ///
    /// * `primitives` - The grid's primitives.
    /// * `mailboxes`  - The grid's mailboxes.
    /// * `ray_id`     - Traversal id.
    /// * `ray`        - The ray.
    pub fn intersect_p(&self, primitives: &[ArcPrimitive], mailboxes: &Mailboxes, ray_id: u64, ray: &Ray) -> bool {
        self.indices
            .iter()
            .zip(self.refined(primitives))
            .any(|(&i, prim)| mailboxes.deliver(i, ray_id) && prim.intersect_p(ray))
    }
}
