//! Differential Geometry

use crate::geometry::*;
use crate::pbrt::*;
use crate::shape::*;

/// Local geometry of a surface point: position, normal, surface
/// parameterization and the screen-space derivatives used for texture
/// filtering.
///
/// The lifetime specifiers:
/// * `'a` - Shared reference to the shape that was hit.
#[derive(Copy, Clone, Debug, Default)]
pub struct DifferentialGeometry<'a> {
    /// Point on the surface.
    pub p: Point3f,

    /// Unit surface normal.
    pub n: Normal3f,

    /// Surface parameter u.
    pub u: Float,

    /// Surface parameter v.
    pub v: Float,

    /// The shape that was hit, if any.
    pub shape: Option<&'a Shape>,

    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Parametric partial derivative of the point ∂p/∂v.
    pub dpdv: Vector3f,

    /// Change ∂n/∂u in surface normal as we move along u.
    pub dndu: Normal3f,

    /// Change ∂n/∂v in surface normal as we move along v.
    pub dndv: Normal3f,

    /// Change in position per pixel step in x.
    pub dpdx: Vector3f,

    /// Change in position per pixel step in y.
    pub dpdy: Vector3f,

    /// ∂u/∂x.
    pub dudx: Float,

    /// ∂v/∂x.
    pub dvdx: Float,

    /// ∂u/∂y.
    pub dudy: Float,

    /// ∂v/∂y.
    pub dvdy: Float,
}

impl<'a> DifferentialGeometry<'a> {
    /// Create a new `DifferentialGeometry`. The normal is derived from the
    /// partial derivatives and flipped when exactly one of the shape's
    /// reverse orientation and handedness swap flags is set.
    ///
    /// * `p`     - Point on the surface.
    /// * `dpdu`  - Parametric partial derivative of the point ∂p/∂u.
    /// * `dpdv`  - Parametric partial derivative of the point ∂p/∂v.
    /// * `dndu`  - Change ∂n/∂u in surface normal.
    /// * `dndv`  - Change ∂n/∂v in surface normal.
    /// * `u`     - Surface parameter u.
    /// * `v`     - Surface parameter v.
    /// * `shape` - The shape.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p: Point3f,
        dpdu: Vector3f,
        dpdv: Vector3f,
        dndu: Normal3f,
        dndv: Normal3f,
        u: Float,
        v: Float,
        shape: Option<&'a Shape>,
    ) -> Self {
        let mut n = Normal3f::from(dpdu.cross(&dpdv).normalize());
        if let Some(data) = shape.map(|s| s.data()) {
            if data.reverse_orientation ^ data.transform_swaps_handedness {
                n = -n;
            }
        }

        Self {
            p,
            n,
            u,
            v,
            shape,
            dpdu,
            dpdv,
            dndu,
            dndv,
            ..Default::default()
        }
    }

    /// Reset all screen-space derivatives to zero.
    fn clear_differentials(&mut self) {
        self.dpdx = Vector3f::zero();
        self.dpdy = Vector3f::zero();
        self.dudx = 0.0;
        self.dvdx = 0.0;
        self.dudy = 0.0;
        self.dvdy = 0.0;
    }

    /// Estimate ∂p/∂x, ∂p/∂y and the (u, v) derivatives by intersecting the
    /// ray's auxiliary rays with the tangent plane. Rays without
    /// differentials yield zero derivatives.
    ///
    /// * `ray` - The ray that produced this hit.
    pub fn compute_differentials(&mut self, ray: &Ray) {
        let rd = match ray.differentials {
            Some(rd) => rd,
            None => {
                self.clear_differentials();
                return;
            }
        };

        let n = self.n;
        let p = self.p;

        // Compute auxiliary intersection points with plane.
        let d = -n.dot(&Vector3f::from(p));
        let tx = -(n.dot(&Vector3f::from(rd.rx_origin)) + d) / n.dot(&rd.rx_direction);
        assert!(!tx.is_nan(), "auxiliary x ray parallel to tangent plane at {}", p);
        let px = rd.rx_origin + tx * rd.rx_direction;

        let ty = -(n.dot(&Vector3f::from(rd.ry_origin)) + d) / n.dot(&rd.ry_direction);
        assert!(!ty.is_nan(), "auxiliary y ray parallel to tangent plane at {}", p);
        let py = rd.ry_origin + ty * rd.ry_direction;

        self.dpdx = px - p;
        self.dpdy = py - p;

        // Choose the two dimensions that give the best conditioned system.
        let axes = if abs(n.x) > abs(n.y) && abs(n.x) > abs(n.z) {
            [1, 2]
        } else if abs(n.y) > abs(n.z) {
            [0, 2]
        } else {
            [0, 1]
        };

        let a = [
            [self.dpdu[axes[0]], self.dpdv[axes[0]]],
            [self.dpdu[axes[1]], self.dpdv[axes[1]]],
        ];
        let bx = [px[axes[0]] - p[axes[0]], px[axes[1]] - p[axes[1]]];
        let by = [py[axes[0]] - p[axes[0]], py[axes[1]] - p[axes[1]]];

        (self.dudx, self.dvdx) = solve_linear_system_2x2(&a, &bx).unwrap_or((0.0, 0.0));
        (self.dudy, self.dvdy) = solve_linear_system_2x2(&a, &by).unwrap_or((0.0, 0.0));
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn plane_dg<'a>() -> DifferentialGeometry<'a> {
        DifferentialGeometry::new(
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 2.0, 0.0),
            Normal3f::zero(),
            Normal3f::zero(),
            0.5,
            0.5,
            None,
        )
    }

    #[test]
    fn normal_follows_partial_derivatives() {
        let dg = plane_dg();
        assert_eq!(dg.n, Normal3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn reverse_orientation_flips_normal() {
        let shape = Shape::Disk(Disk::new(ShapeData::new(Transform::identity(), true), 0.0, 1.0, 0.0, 360.0));
        let dg = DifferentialGeometry::new(
            Point3f::zero(),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Normal3f::zero(),
            Normal3f::zero(),
            0.0,
            0.0,
            Some(&shape),
        );
        assert_eq!(dg.n, Normal3f::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn differentials_are_zero_without_ray_differentials() {
        let mut dg = plane_dg();
        dg.dudx = 3.0;
        dg.dpdy = Vector3f::new(1.0, 1.0, 1.0);
        let ray = Ray::new(Point3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), 0.0, INFINITY, 0.0, 0);
        dg.compute_differentials(&ray);
        assert_eq!(dg.dpdx, Vector3f::zero());
        assert_eq!(dg.dpdy, Vector3f::zero());
        assert_eq!((dg.dudx, dg.dvdx, dg.dudy, dg.dvdy), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn differentials_follow_offset_rays() {
        let mut dg = plane_dg();
        let mut ray = Ray::new(Point3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), 0.0, INFINITY, 0.0, 0);
        ray.differentials = Some(RayDifferential {
            rx_origin: Point3f::new(0.1, 0.0, 1.0),
            ry_origin: Point3f::new(0.0, 0.2, 1.0),
            rx_direction: Vector3f::new(0.0, 0.0, -1.0),
            ry_direction: Vector3f::new(0.0, 0.0, -1.0),
        });
        dg.compute_differentials(&ray);
        assert!(approx_eq!(Float, dg.dpdx.x, 0.1, epsilon = 1e-6));
        assert!(approx_eq!(Float, dg.dpdy.y, 0.2, epsilon = 1e-6));
        assert!(approx_eq!(Float, dg.dudx, 0.05, epsilon = 1e-6));
        assert!(approx_eq!(Float, dg.dvdy, 0.1, epsilon = 1e-6));
        assert!(approx_eq!(Float, dg.dvdx, 0.0, epsilon = 1e-6));
    }
}
