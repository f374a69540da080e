//! Transformations

use super::*;
use crate::error::*;
use crate::pbrt::*;
use std::ops::Mul;

/// A transformation stored with its inverse.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Transform {
    /// The transformation matrix.
    pub m: Matrix4x4,

    /// The inverse of the transformation matrix.
    pub m_inv: Matrix4x4,
}

impl Transform {
    /// Returns the identity transform.
    pub fn identity() -> Self {
        Self {
            m: Matrix4x4::IDENTITY,
            m_inv: Matrix4x4::IDENTITY,
        }
    }

    /// Creates a transform from a matrix, computing its inverse.
    ///
    /// * `m` - The matrix.
    pub fn new(m: Matrix4x4) -> Result<Self> {
        let m_inv = m.inverse()?;
        Ok(Self { m, m_inv })
    }

    /// Creates a transform from a matrix and its known inverse.
    ///
    /// * `m`     - The matrix.
    /// * `m_inv` - The inverse.
    pub fn with_inverse(m: Matrix4x4, m_inv: Matrix4x4) -> Self {
        Self { m, m_inv }
    }

    /// Returns the inverse transform.
    pub fn inverse(&self) -> Self {
        Self {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// Returns true if this is the identity transform.
    pub fn is_identity(&self) -> bool {
        self.m.is_identity()
    }

    /// Translation by `delta`.
    ///
    /// * `delta` - Offset.
    pub fn translate(delta: &Vector3f) -> Self {
        let m = Matrix4x4::new([
            [1.0, 0.0, 0.0, delta.x],
            [0.0, 1.0, 0.0, delta.y],
            [0.0, 0.0, 1.0, delta.z],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let m_inv = Matrix4x4::new([
            [1.0, 0.0, 0.0, -delta.x],
            [0.0, 1.0, 0.0, -delta.y],
            [0.0, 0.0, 1.0, -delta.z],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Self { m, m_inv }
    }

    /// Scale along each axis. Zero factors produce a singular matrix and an
    /// error.
    ///
    /// * `x` - X-scale.
    /// * `y` - Y-scale.
    /// * `z` - Z-scale.
    pub fn scale(x: Float, y: Float, z: Float) -> Result<Self> {
        if x == 0.0 || y == 0.0 || z == 0.0 {
            return Err(Error::SingularMatrix);
        }
        let m = Matrix4x4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let m_inv = Matrix4x4::new([
            [1.0 / x, 0.0, 0.0, 0.0],
            [0.0, 1.0 / y, 0.0, 0.0],
            [0.0, 0.0, 1.0 / z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Ok(Self { m, m_inv })
    }

    /// Rotation about the x-axis.
    ///
    /// * `theta` - Angle in degrees.
    pub fn rotate_x(theta: Float) -> Self {
        let (sin_theta, cos_theta) = radians(theta).sin_cos();
        let m = Matrix4x4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cos_theta, -sin_theta, 0.0],
            [0.0, sin_theta, cos_theta, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Self { m, m_inv: m.transpose() }
    }

    /// Rotation about the y-axis.
    ///
    /// * `theta` - Angle in degrees.
    pub fn rotate_y(theta: Float) -> Self {
        let (sin_theta, cos_theta) = radians(theta).sin_cos();
        let m = Matrix4x4::new([
            [cos_theta, 0.0, sin_theta, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-sin_theta, 0.0, cos_theta, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Self { m, m_inv: m.transpose() }
    }

    /// Rotation about the z-axis.
    ///
    /// * `theta` - Angle in degrees.
    pub fn rotate_z(theta: Float) -> Self {
        let (sin_theta, cos_theta) = radians(theta).sin_cos();
        let m = Matrix4x4::new([
            [cos_theta, -sin_theta, 0.0, 0.0],
            [sin_theta, cos_theta, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Self { m, m_inv: m.transpose() }
    }

    /// Rotation about an arbitrary axis.
    ///
    /// * `theta` - Angle in degrees.
    /// * `axis`  - Rotation axis.
    pub fn rotate(theta: Float, axis: &Vector3f) -> Self {
        let a = axis.normalize();
        let (sin_theta, cos_theta) = radians(theta).sin_cos();
        let mut m = Matrix4x4::IDENTITY;

        m.m[0][0] = a.x * a.x + (1.0 - a.x * a.x) * cos_theta;
        m.m[0][1] = a.x * a.y * (1.0 - cos_theta) - a.z * sin_theta;
        m.m[0][2] = a.x * a.z * (1.0 - cos_theta) + a.y * sin_theta;

        m.m[1][0] = a.x * a.y * (1.0 - cos_theta) + a.z * sin_theta;
        m.m[1][1] = a.y * a.y + (1.0 - a.y * a.y) * cos_theta;
        m.m[1][2] = a.y * a.z * (1.0 - cos_theta) - a.x * sin_theta;

        m.m[2][0] = a.x * a.z * (1.0 - cos_theta) - a.y * sin_theta;
        m.m[2][1] = a.y * a.z * (1.0 - cos_theta) + a.x * sin_theta;
        m.m[2][2] = a.z * a.z + (1.0 - a.z * a.z) * cos_theta;

        Self { m, m_inv: m.transpose() }
    }

    /// Camera-to-world style viewing transform. Returns the world-to-camera
    /// transformation.
    ///
    /// * `pos`  - Camera position.
    /// * `look` - Point the camera looks at.
    /// * `up`   - Up vector.
    pub fn look_at(pos: &Point3f, look: &Point3f, up: &Vector3f) -> Result<Self> {
        let dir = (*look - *pos).normalize();
        let right = up.normalize().cross(&dir);
        if right.length() == 0.0 {
            return Err(Error::InvalidParameter(format!(
                "'up' vector {up} and viewing direction {dir} passed to look_at are pointing in the same direction"
            )));
        }
        let left = right.normalize();
        let new_up = dir.cross(&left);

        let camera_to_world = Matrix4x4::new([
            [left.x, new_up.x, dir.x, pos.x],
            [left.y, new_up.y, dir.y, pos.y],
            [left.z, new_up.z, dir.z, pos.z],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let world_to_camera = camera_to_world.inverse()?;
        Ok(Self::with_inverse(world_to_camera, camera_to_world))
    }

    /// Orthographic projection mapping z in [near, far] to [0, 1].
    ///
    /// * `z_near` - Near plane.
    /// * `z_far`  - Far plane.
    pub fn orthographic(z_near: Float, z_far: Float) -> Result<Self> {
        Ok(Self::scale(1.0, 1.0, 1.0 / (z_far - z_near))? * Self::translate(&Vector3f::new(0.0, 0.0, -z_near)))
    }

    /// Perspective projection.
    ///
    /// * `fov` - Field of view in degrees.
    /// * `n`   - Near plane.
    /// * `f`   - Far plane.
    pub fn perspective(fov: Float, n: Float, f: Float) -> Result<Self> {
        let persp = Matrix4x4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, f / (f - n), -f * n / (f - n)],
            [0.0, 0.0, 1.0, 0.0],
        ]);
        let inv_tan_ang = 1.0 / (radians(fov) / 2.0).tan();
        Ok(Self::scale(inv_tan_ang, inv_tan_ang, 1.0)? * Self::new(persp)?)
    }

    /// Returns true if the transform changes the handedness of a coordinate
    /// system (negative determinant of the upper 3x3).
    pub fn swaps_handedness(&self) -> bool {
        let m = &self.m.m;
        let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
        det < 0.0
    }

    /// Returns true if the transform scales any of the coordinate axes.
    pub fn has_scale(&self) -> bool {
        let la2 = self.transform_vector(&Vector3f::new(1.0, 0.0, 0.0)).length_squared();
        let lb2 = self.transform_vector(&Vector3f::new(0.0, 1.0, 0.0)).length_squared();
        let lc2 = self.transform_vector(&Vector3f::new(0.0, 0.0, 1.0)).length_squared();
        let not_one = |x: Float| x < 0.999 || x > 1.001;
        not_one(la2) || not_one(lb2) || not_one(lc2)
    }

    /// Transform a point.
    ///
    /// * `p` - The point.
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let m = &self.m.m;
        let xp = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let yp = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let zp = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let wp = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        if wp == 1.0 {
            Point3f::new(xp, yp, zp)
        } else {
            Point3f::new(xp / wp, yp / wp, zp / wp)
        }
    }

    /// Transform a vector.
    ///
    /// * `v` - The vector.
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let m = &self.m.m;
        Vector3f::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Transform a normal using the inverse transpose.
    ///
    /// * `n` - The normal.
    pub fn transform_normal(&self, n: &Normal3f) -> Normal3f {
        let m_inv = &self.m_inv.m;
        Normal3f::new(
            m_inv[0][0] * n.x + m_inv[1][0] * n.y + m_inv[2][0] * n.z,
            m_inv[0][1] * n.x + m_inv[1][1] * n.y + m_inv[2][1] * n.z,
            m_inv[0][2] * n.x + m_inv[1][2] * n.y + m_inv[2][2] * n.z,
        )
    }

    /// Transform a ray, including its differentials.
    ///
    /// * `r` - The ray.
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        let mut ret = *r;
        ret.o = self.transform_point(&r.o);
        ret.d = self.transform_vector(&r.d);
        ret.differentials = r.differentials.map(|diff| RayDifferential {
            rx_origin: self.transform_point(&diff.rx_origin),
            ry_origin: self.transform_point(&diff.ry_origin),
            rx_direction: self.transform_vector(&diff.rx_direction),
            ry_direction: self.transform_vector(&diff.ry_direction),
        });
        ret
    }

    /// Transform a bounding box; returns the box enclosing all 8 transformed
    /// corners.
    ///
    /// * `b` - The bounding box.
    pub fn transform_bounds(&self, b: &Bounds3f) -> Bounds3f {
        let (lo, hi) = (b.p_min, b.p_max);
        [
            Point3f::new(lo.x, lo.y, lo.z),
            Point3f::new(hi.x, lo.y, lo.z),
            Point3f::new(lo.x, hi.y, lo.z),
            Point3f::new(lo.x, lo.y, hi.z),
            Point3f::new(lo.x, hi.y, hi.z),
            Point3f::new(hi.x, hi.y, lo.z),
            Point3f::new(hi.x, lo.y, hi.z),
            Point3f::new(hi.x, hi.y, hi.z),
        ]
        .iter()
        .fold(Bounds3f::EMPTY, |acc, p| acc.union(&self.transform_point(p)))
    }
}

impl Mul for Transform {
    type Output = Self;

    /// Compose two transforms; `self` is applied after `other`.
    ///
    /// * `other` - The transform applied first.
    fn mul(self, other: Self) -> Self::Output {
        Self {
            m: self.m * other.m,
            m_inv: other.m_inv * self.m_inv,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn assert_point_eq(a: Point3f, b: Point3f) {
        assert!(approx_eq!(Float, a.x, b.x, epsilon = 1e-5), "{a} != {b}");
        assert!(approx_eq!(Float, a.y, b.y, epsilon = 1e-5), "{a} != {b}");
        assert!(approx_eq!(Float, a.z, b.z, epsilon = 1e-5), "{a} != {b}");
    }

    #[test]
    fn translate_moves_points_not_vectors() {
        let t = Transform::translate(&Vector3f::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_point(&Point3f::zero()), Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_vector(&Vector3f::new(1.0, 0.0, 0.0)), Vector3f::new(1.0, 0.0, 0.0));
        assert_eq!(t.inverse().transform_point(&Point3f::new(1.0, 2.0, 3.0)), Point3f::zero());
    }

    #[test]
    fn rotate_z_quarter_turn() {
        let t = Transform::rotate_z(90.0);
        assert_point_eq(t.transform_point(&Point3f::new(1.0, 0.0, 0.0)), Point3f::new(0.0, 1.0, 0.0));
        let r = Transform::rotate(90.0, &Vector3f::new(0.0, 0.0, 1.0));
        assert_point_eq(r.transform_point(&Point3f::new(1.0, 0.0, 0.0)), Point3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn scale_with_zero_is_singular() {
        assert_eq!(Transform::scale(1.0, 0.0, 1.0), Err(Error::SingularMatrix));
    }

    #[test]
    fn negative_scale_swaps_handedness() {
        assert!(Transform::scale(-1.0, 1.0, 1.0).unwrap().swaps_handedness());
        assert!(!Transform::scale(2.0, 1.0, 1.0).unwrap().swaps_handedness());
        assert!(Transform::scale(2.0, 1.0, 1.0).unwrap().has_scale());
        assert!(!Transform::rotate_y(30.0).has_scale());
    }

    #[test]
    fn normals_stay_perpendicular_under_nonuniform_scale() {
        let t = Transform::scale(2.0, 1.0, 1.0).unwrap();
        let v = t.transform_vector(&Vector3f::new(1.0, 1.0, 0.0));
        let n = t.transform_normal(&Normal3f::new(1.0, -1.0, 0.0));
        assert!(approx_eq!(Float, n.dot(&v), 0.0, epsilon = 1e-6));
    }

    #[test]
    fn look_at_maps_eye_to_origin() {
        let t = Transform::look_at(
            &Point3f::new(0.0, 0.0, -5.0),
            &Point3f::zero(),
            &Vector3f::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert_point_eq(t.transform_point(&Point3f::new(0.0, 0.0, -5.0)), Point3f::zero());
        assert_point_eq(t.transform_point(&Point3f::zero()), Point3f::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn look_at_with_parallel_up_fails() {
        let r = Transform::look_at(&Point3f::zero(), &Point3f::new(0.0, 1.0, 0.0), &Vector3f::new(0.0, 1.0, 0.0));
        assert!(r.is_err());
    }

    #[test]
    fn transform_bounds_encloses_rotated_box() {
        let b = Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0));
        let tb = Transform::rotate_z(45.0).transform_bounds(&b);
        assert!(approx_eq!(Float, tb.p_min.x, -(0.5 as Float).sqrt(), epsilon = 1e-5));
        assert!(approx_eq!(Float, tb.p_max.y, (2.0 as Float).sqrt(), epsilon = 1e-5));
    }
}
