//! Uniform Grid Accelerator

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::primitive::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

mod voxel;

// Re-export
pub use voxel::*;

/// Maximum number of voxels along an axis.
const MAX_VOXELS_PER_AXIS: usize = 64;

/// Maps the result of comparing next crossing parameters to the axis to step.
const CMP_TO_AXIS: [usize; 8] = [2, 1, 2, 1, 2, 2, 0, 0];

/// Uniform grid over a set of primitives. Voxels are only allocated where a
/// primitive bound overlaps them.
pub struct GridAccel {
    /// The primitives; voxels refer to them by index.
    primitives: Vec<ArcPrimitive>,

    /// Number of voxels along each axis.
    n_voxels: [usize; 3],

    /// Bounds of all primitives.
    bounds: Bounds3f,

    /// Voxel size along each axis.
    width: [Float; 3],

    /// Reciprocal voxel size; 0 where the size is 0.
    inv_width: [Float; 3],

    /// Voxels in `z * nx * ny + y * nx + x` order.
    voxels: Vec<Option<GridVoxel>>,

    /// Last ray tested against each primitive.
    mailboxes: Mailboxes,
}

/// Per-primitive record of the last ray tested against it, so a primitive
/// overlapping several voxels is intersected once per traversal. A slot
/// overwritten by another thread's ray only costs a repeated test.
pub struct Mailboxes {
    /// Ray id per primitive; 0 is never issued.
    slots: Vec<AtomicU64>,

    /// Next ray id to hand out.
    next_ray_id: AtomicU64,
}

impl Mailboxes {
    /// Create empty mailboxes.
    ///
    /// * `n` - Number of primitives.
    pub fn new(n: usize) -> Self {
        Self {
            slots: (0..n).map(|_| AtomicU64::new(0)).collect(),
            next_ray_id: AtomicU64::new(1),
        }
    }

    /// Returns a new id for a traversal.
    pub fn next_ray_id(&self) -> u64 {
        self.next_ray_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Records that traversal `ray_id` tests primitive `index`. Returns false
    /// if the traversal already tested it.
    ///
    /// * `index`  - Primitive index.
    /// * `ray_id` - Traversal id.
    pub fn deliver(&self, index: u32, ray_id: u64) -> bool {
        self.slots[index as usize].swap(ray_id, Ordering::Relaxed) != ray_id
    }
}

impl GridAccel {
    /// Build a grid.
    ///
    /// * `primitives`         - The primitives.
    /// * `refine_immediately` - Fully refine all primitives up front instead of
    ///                          on first traversal of a voxel.
    pub fn new(primitives: Vec<ArcPrimitive>, refine_immediately: bool) -> Self {
        let primitives: Vec<ArcPrimitive> = if refine_immediately {
            primitives.iter().flat_map(Primitive::full_refine).collect()
        } else {
            primitives
        };

        let bounds = primitives
            .iter()
            .fold(Bounds3f::EMPTY, |b, p| b.union(&p.world_bound()));

        // Pick a resolution proportional to the cube root of the primitive
        // count, scaled per axis by the box's aspect ratio.
        let mut n_voxels = [1; 3];
        let mut width = [0.0; 3];
        let mut inv_width = [0.0; 3];
        if !primitives.is_empty() {
            let delta = bounds.diagonal();
            let max_width = max(delta.x, max(delta.y, delta.z));
            let voxels_per_unit_dist = if max_width > 0.0 {
                (primitives.len() as Float).cbrt() / max_width
            } else {
                0.0
            };
            for axis in 0..3 {
                let n = (delta[axis] * voxels_per_unit_dist).round() as usize;
                n_voxels[axis] = clamp(n, 1, MAX_VOXELS_PER_AXIS);
                width[axis] = delta[axis] / n_voxels[axis] as Float;
                inv_width[axis] = if width[axis] == 0.0 { 0.0 } else { 1.0 / width[axis] };
            }
        }

        let nv = n_voxels[0] * n_voxels[1] * n_voxels[2];
        let mut grid = Self {
            mailboxes: Mailboxes::new(primitives.len()),
            primitives,
            n_voxels,
            bounds,
            width,
            inv_width,
            voxels: (0..nv).map(|_| None).collect(),
        };

        for i in 0..grid.primitives.len() {
            let (vmin, vmax) = grid.voxel_extent(&grid.primitives[i].world_bound());
            for z in vmin[2]..=vmax[2] {
                for y in vmin[1]..=vmax[1] {
                    for x in vmin[0]..=vmax[0] {
                        let o = grid.offset(x, y, z);
                        match grid.voxels[o].as_mut() {
                            Some(voxel) => voxel.add_primitive(i as u32),
                            None => grid.voxels[o] = Some(GridVoxel::new(i as u32)),
                        }
                    }
                }
            }
        }

        info!(
            "Grid with {} primitives, {}x{}x{} voxels",
            grid.primitives.len(),
            n_voxels[0],
            n_voxels[1],
            n_voxels[2]
        );
        grid
    }

    /// Returns a bounding box in world space.
    pub fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    /// Returns the primitives in the grid.
    pub fn primitives(&self) -> &[ArcPrimitive] {
        &self.primitives
    }

    /// Returns the number of voxels along each axis.
    pub fn resolution(&self) -> [usize; 3] {
        self.n_voxels
    }

    /// Returns the voxel at integer coordinates if one was allocated.
    ///
    /// * `x` - Voxel coordinate on x-axis.
    /// * `y` - Voxel coordinate on y-axis.
    /// * `z` - Voxel coordinate on z-axis.
    pub fn voxel(&self, x: usize, y: usize, z: usize) -> Option<&GridVoxel> {
        self.voxels[self.offset(x, y, z)].as_ref()
    }

    /// Returns the inclusive range of voxel coordinates overlapped by a
    /// bounding box.
    ///
    /// * `b` - The bounding box.
    pub fn voxel_extent(&self, b: &Bounds3f) -> ([usize; 3], [usize; 3]) {
        let mut vmin = [0; 3];
        let mut vmax = [0; 3];
        for axis in 0..3 {
            vmin[axis] = self.pos_to_voxel(&b.p_min, axis) as usize;
            vmax[axis] = self.pos_to_voxel(&b.p_max, axis) as usize;
        }
        (vmin, vmax)
    }

    /// Returns the voxel coordinate containing a point along an axis.
    fn pos_to_voxel(&self, p: &Point3f, axis: usize) -> i32 {
        let v = ((p[axis] - self.bounds.p_min[axis]) * self.inv_width[axis]) as i32;
        clamp(v, 0, self.n_voxels[axis] as i32 - 1)
    }

    /// Returns the position of a voxel boundary along an axis.
    fn voxel_to_pos(&self, p: i32, axis: usize) -> Float {
        self.bounds.p_min[axis] + p as Float * self.width[axis]
    }

    fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        z * self.n_voxels[0] * self.n_voxels[1] + y * self.n_voxels[0] + x
    }

    /// Set up a 3D-DDA walk for the ray; `None` if it misses the grid.
    fn start_walk(&self, ray: &Ray) -> Option<GridWalk> {
        if self.primitives.is_empty() {
            return None;
        }

        let ray_t = if self.bounds.inside(&ray.at(ray.min_t)) {
            ray.min_t
        } else {
            self.bounds.intersect_p(ray)?.0
        };
        let grid_intersect = ray.at(ray_t);

        let mut walk = GridWalk::default();
        for axis in 0..3 {
            walk.pos[axis] = self.pos_to_voxel(&grid_intersect, axis);
            if ray.d[axis] >= 0.0 {
                walk.next_crossing_t[axis] =
                    ray_t + (self.voxel_to_pos(walk.pos[axis] + 1, axis) - grid_intersect[axis]) / ray.d[axis];
                walk.delta_t[axis] = self.width[axis] / ray.d[axis];
                walk.step[axis] = 1;
                walk.out[axis] = self.n_voxels[axis] as i32;
            } else {
                walk.next_crossing_t[axis] =
                    ray_t + (self.voxel_to_pos(walk.pos[axis], axis) - grid_intersect[axis]) / ray.d[axis];
                walk.delta_t[axis] = -self.width[axis] / ray.d[axis];
                walk.step[axis] = -1;
                walk.out[axis] = -1;
            }
        }
        Some(walk)
    }

    /// Returns the voxel the walk is in, if allocated.
    fn walk_voxel(&self, walk: &GridWalk) -> Option<&GridVoxel> {
        let [x, y, z] = walk.pos;
        self.voxel(x as usize, y as usize, z as usize)
    }

    /// Returns the nearest intersection along the ray. Voxels are visited in
    /// ray order until the closest hit so far lies before the next voxel.
    ///
    /// * `ray` - The ray; `max_t` shrinks on every hit.
    pub fn intersect(&self, ray: &mut Ray) -> Option<Intersection<'_>> {
        let mut walk = self.start_walk(ray)?;
        let ray_id = self.mailboxes.next_ray_id();
        let mut hit = None;
        loop {
            if let Some(voxel) = self.walk_voxel(&walk) {
                if let Some(isect) = voxel.intersect(&self.primitives, &self.mailboxes, ray_id, ray) {
                    hit = Some(isect);
                }
            }
            if !walk.advance(ray.max_t) {
                break;
            }
        }
        hit
    }

    /// Returns true at the first hit found along the ray.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        let mut walk = match self.start_walk(ray) {
            Some(walk) => walk,
            None => return false,
        };
        let ray_id = self.mailboxes.next_ray_id();
        loop {
            if let Some(voxel) = self.walk_voxel(&walk) {
                if voxel.intersect_p(&self.primitives, &self.mailboxes, ray_id, ray) {
                    return true;
                }
            }
            if !walk.advance(ray.max_t) {
                return false;
            }
        }
    }
}

/// State of a 3D-DDA walk through the grid.
#[derive(Default)]
struct GridWalk {
    /// Current voxel.
    pos: [i32; 3],

    /// Ray parameter of the next voxel boundary on each axis.
    next_crossing_t: [Float; 3],

    /// Ray parameter distance between boundaries on each axis.
    delta_t: [Float; 3],

    /// Voxel step per axis; +1 or -1.
    step: [i32; 3],

    /// Voxel coordinate that lies outside the grid per axis.
    out: [i32; 3],
}

impl GridWalk {
    /// Step into the next voxel. Returns false when the walk leaves the grid
    /// or the next voxel starts beyond `max_t`.
    ///
    /// * `max_t` - Current end of the ray.
    fn advance(&mut self, max_t: Float) -> bool {
        let t = &self.next_crossing_t;
        let bits = (((t[0] < t[1]) as usize) << 2) + (((t[0] < t[2]) as usize) << 1) + ((t[1] < t[2]) as usize);
        let axis = CMP_TO_AXIS[bits];
        if max_t < self.next_crossing_t[axis] {
            return false;
        }
        self.pos[axis] += self.step[axis];
        if self.pos[axis] == self.out[axis] {
            return false;
        }
        self.next_crossing_t[axis] += self.delta_t[axis];
        true
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::*;
    use crate::shape::*;
    use crate::spectrum::*;
    use crate::texture::*;
    use float_cmp::*;

    fn material() -> ArcMaterial {
        Arc::new(Material::Matte(MatteMaterial::new(
            Arc::new(Texture::Constant(Spectrum::new(0.5))),
            Arc::new(Texture::Constant(0.0)),
            None,
        )))
    }

    fn sphere(center: Point3f, radius: Float) -> ArcPrimitive {
        let data = ShapeData::new(Transform::translate(&Vector3f::from(center)), false);
        let shape = Shape::Sphere(Sphere::new(data, radius, -radius, radius, 360.0));
        Arc::new(Primitive::Geometric(GeometricPrimitive::new(Arc::new(shape), material(), None)))
    }

    fn quad() -> ArcPrimitive {
        let mesh = TriangleMesh::new(
            ShapeData::new(Transform::identity(), false),
            vec![0, 1, 2, 0, 2, 3],
            vec![
                Point3f::new(-1.0, -1.0, 0.0),
                Point3f::new(1.0, -1.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(-1.0, 1.0, 0.0),
            ],
            None,
        )
        .unwrap();
        let shape = Shape::TriangleMesh(Arc::new(mesh));
        Arc::new(Primitive::Geometric(GeometricPrimitive::new(Arc::new(shape), material(), None)))
    }

    fn ray_z(x: Float, y: Float, z: Float, dz: Float) -> Ray {
        Ray::new(Point3f::new(x, y, z), Vector3f::new(0.0, 0.0, dz), 0.0, INFINITY, 0.0, 0)
    }

    #[test]
    fn resolution_follows_aspect_ratio() {
        let spheres: Vec<ArcPrimitive> = (0..8)
            .map(|i| sphere(Point3f::new(0.5 + i as Float, 0.5, 0.5), 0.4))
            .collect();
        let grid = GridAccel::new(spheres, true);
        assert_eq!(grid.resolution(), [2, 1, 1]);
        assert_eq!(grid.primitives().len(), 8);
    }

    #[test]
    fn primitives_land_in_overlapping_voxels() {
        let mut spheres = vec![];
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..2 {
                    spheres.push(sphere(
                        Point3f::new(0.5 + x as Float, 0.5 + y as Float, 0.5 + z as Float),
                        0.4,
                    ));
                }
            }
        }
        let grid = GridAccel::new(spheres, true);
        assert_eq!(grid.resolution(), [2, 2, 2]);

        let low = grid.primitives()[0].world_bound();
        let high = grid.primitives()[7].world_bound();
        assert_eq!(grid.voxel_extent(&low), ([0, 0, 0], [0, 0, 0]));
        assert_eq!(grid.voxel_extent(&high), ([1, 1, 1], [1, 1, 1]));
        assert_eq!(grid.voxel_extent(&grid.world_bound()), ([0, 0, 0], [1, 1, 1]));
        assert_eq!(grid.voxel(1, 0, 1).map(|v| v.len()), Some(1));
    }

    #[test]
    fn nearest_of_two_spheres_is_returned() {
        let near = Point3f::new(0.0, 0.0, 0.0);
        let far = Point3f::new(0.0, 0.0, 5.0);
        let grid = GridAccel::new(vec![sphere(far, 1.0), sphere(near, 1.0)], true);

        let mut ray = ray_z(0.0, 0.0, -10.0, 1.0);
        let isect = grid.intersect(&mut ray).unwrap();
        assert!(approx_eq!(Float, ray.max_t, 9.0, epsilon = 1e-3));
        assert!(approx_eq!(Float, isect.dg.p.z, -1.0, epsilon = 1e-3));

        let mut ray = ray_z(0.0, 0.0, 10.0, -1.0);
        let isect = grid.intersect(&mut ray).unwrap();
        assert!(approx_eq!(Float, ray.max_t, 4.0, epsilon = 1e-3));
        assert!(approx_eq!(Float, isect.dg.p.z, 6.0, epsilon = 1e-3));
    }

    #[test]
    fn nearest_hit_across_overlapping_bounds() {
        let big = sphere(Point3f::new(0.0, 0.0, 0.0), 4.0);
        let small = sphere(Point3f::new(0.0, 3.0, -6.0), 0.5);
        let grid = GridAccel::new(vec![big, small], true);

        let mut ray = Ray::new(
            Point3f::new(0.0, 3.0, -10.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
            0.0,
            0,
        );
        let isect = grid.intersect(&mut ray).unwrap();
        assert!(approx_eq!(Float, isect.dg.p.z, -6.5, epsilon = 1e-3));
    }

    #[test]
    fn primitives_spanning_voxels_are_tested_once_per_ray() {
        let mut prims = vec![];
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..2 {
                    prims.push(sphere(
                        Point3f::new(0.5 + x as Float, 0.5 + y as Float, 0.5 + z as Float),
                        0.4,
                    ));
                }
            }
        }
        prims.push(sphere(Point3f::new(1.0, 1.0, 1.0), 0.9));
        let grid = GridAccel::new(prims, true);
        assert_eq!(grid.resolution(), [2, 2, 2]);
        assert_eq!(grid.voxel_extent(&grid.primitives()[8].world_bound()), ([0, 0, 0], [1, 1, 1]));

        let first = grid.voxel(0, 0, 0).unwrap();
        let last = grid.voxel(1, 1, 1).unwrap();
        let ray_id = grid.mailboxes.next_ray_id();
        let mut ray = ray_z(1.0, 1.0, -5.0, 1.0);
        assert!(first.intersect(grid.primitives(), &grid.mailboxes, ray_id, &mut ray).is_some());

        // The big sphere was already tested by this ray.
        let mut again = ray_z(1.0, 1.0, -5.0, 1.0);
        assert!(last.intersect(grid.primitives(), &grid.mailboxes, ray_id, &mut again).is_none());
        assert!(!last.intersect_p(grid.primitives(), &grid.mailboxes, ray_id, &again));

        let next_id = grid.mailboxes.next_ray_id();
        assert!(last.intersect(grid.primitives(), &grid.mailboxes, next_id, &mut again).is_some());

        let mut ray = ray_z(1.0, 1.0, -5.0, 1.0);
        let isect = grid.intersect(&mut ray).unwrap();
        assert!(approx_eq!(Float, isect.dg.p.z, 0.1, epsilon = 1e-3));
        assert!(grid.intersect_p(&ray_z(1.0, 1.0, -5.0, 1.0)));
    }

    #[test]
    fn shadow_rays_respect_ray_range() {
        let grid = GridAccel::new(vec![sphere(Point3f::zero(), 1.0)], true);
        assert!(grid.intersect_p(&ray_z(0.0, 0.0, -5.0, 1.0)));
        assert!(!grid.intersect_p(&ray_z(3.0, 0.0, -5.0, 1.0)));

        let mut short = ray_z(0.0, 0.0, -5.0, 1.0);
        short.max_t = 3.0;
        assert!(!grid.intersect_p(&short));
    }

    #[test]
    fn voxels_refine_lazily() {
        let grid = GridAccel::new(vec![quad()], false);
        assert_eq!(grid.primitives().len(), 1);
        assert!(!grid.primitives()[0].can_intersect());
        let voxel = grid.voxel(0, 0, 0).unwrap();
        assert!(!voxel.is_refined());

        let mut ray = ray_z(0.25, 0.5, -1.0, 1.0);
        let isect = grid.intersect(&mut ray);
        assert!(isect.is_some());
        assert!(approx_eq!(Float, ray.max_t, 1.0, epsilon = 1e-4));
        assert!(voxel.is_refined());

        let refined = voxel.refined(grid.primitives());
        assert_eq!(refined.len(), 1);
        match refined[0].as_ref() {
            Primitive::Grid(nested) => assert_eq!(nested.primitives().len(), 2),
            _ => panic!("expected a nested grid"),
        }
    }

    #[test]
    fn immediate_refinement_flattens_meshes() {
        let grid = GridAccel::new(vec![quad()], true);
        assert_eq!(grid.primitives().len(), 2);
        assert!(grid.primitives().iter().all(|p| p.can_intersect()));
        assert!(grid.intersect_p(&ray_z(-0.5, 0.25, 1.0, -1.0)));
    }

    #[test]
    fn empty_grid_is_never_hit() {
        let grid = GridAccel::new(vec![], true);
        let mut ray = ray_z(0.0, 0.0, 0.0, 1.0);
        assert!(grid.intersect(&mut ray).is_none());
        assert!(!grid.intersect_p(&ray));
    }
}
