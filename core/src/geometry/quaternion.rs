//! Quaternions

use super::*;
use crate::pbrt::*;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A quaternion used to represent and interpolate rotations.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quaternion {
    /// Imaginary part.
    pub v: Vector3f,

    /// Real part.
    pub w: Float,
}

impl Default for Quaternion {
    /// Returns the identity rotation.
    fn default() -> Self {
        Self {
            v: Vector3f::zero(),
            w: 1.0,
        }
    }
}

impl Quaternion {
    /// Create a new quaternion.
    ///
    /// * `v` - Imaginary part.
    /// * `w` - Real part.
    pub fn new(v: Vector3f, w: Float) -> Self {
        Self { v, w }
    }

    /// Returns the inner product.
    ///
    /// * `other` - The other quaternion.
    pub fn dot(&self, other: &Self) -> Float {
        self.v.dot(&other.v) + self.w * other.w
    }

    /// Returns the unit quaternion.
    pub fn normalize(&self) -> Self {
        *self / self.dot(self).sqrt()
    }

    /// Spherical linear interpolation between two unit quaternions.
    ///
    /// * `t`  - Parameter in [0, 1].
    /// * `q1` - Value at t=0.
    /// * `q2` - Value at t=1.
    pub fn slerp(t: Float, q1: &Self, q2: &Self) -> Self {
        let cos_theta = q1.dot(q2);
        if cos_theta > 0.9995 {
            (*q1 * (1.0 - t) + *q2 * t).normalize()
        } else {
            let theta = clamp(cos_theta, -1.0, 1.0).acos();
            let thetap = theta * t;
            let qperp = (*q2 - *q1 * cos_theta).normalize();
            *q1 * thetap.cos() + qperp * thetap.sin()
        }
    }

    /// Returns the rotation matrix for a unit quaternion.
    pub fn to_transform(&self) -> Transform {
        let (x, y, z, w) = (self.v.x, self.v.y, self.v.z, self.w);
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (x * w, y * w, z * w);

        let mut m = Matrix4x4::IDENTITY;
        m.m[0][0] = 1.0 - 2.0 * (yy + zz);
        m.m[0][1] = 2.0 * (xy + wz);
        m.m[0][2] = 2.0 * (xz - wy);
        m.m[1][0] = 2.0 * (xy - wz);
        m.m[1][1] = 1.0 - 2.0 * (xx + zz);
        m.m[1][2] = 2.0 * (yz + wx);
        m.m[2][0] = 2.0 * (xz + wy);
        m.m[2][1] = 2.0 * (yz - wx);
        m.m[2][2] = 1.0 - 2.0 * (xx + yy);

        // Transpose since we are left-handed.
        Transform::with_inverse(m.transpose(), m)
    }
}

impl From<&Transform> for Quaternion {
    /// Extract the rotation of a pure rotation transform.
    ///
    /// * `t` - The transform.
    fn from(t: &Transform) -> Self {
        let m = &t.m.m;
        let trace = m[0][0] + m[1][1] + m[2][2];
        if trace > 0.0 {
            let mut s = (trace + 1.0).sqrt();
            let w = s / 2.0;
            s = 0.5 / s;
            Self::new(
                Vector3f::new(
                    (m[2][1] - m[1][2]) * s,
                    (m[0][2] - m[2][0]) * s,
                    (m[1][0] - m[0][1]) * s,
                ),
                w,
            )
        } else {
            // Compute largest of x, y, or z, then remaining components.
            let nxt = [1, 2, 0];
            let mut q = [0.0; 3];
            let mut i = 0;
            if m[1][1] > m[0][0] {
                i = 1;
            }
            if m[2][2] > m[i][i] {
                i = 2;
            }
            let j = nxt[i];
            let k = nxt[j];
            let mut s = ((m[i][i] - (m[j][j] + m[k][k])) + 1.0).sqrt();
            q[i] = s * 0.5;
            if s != 0.0 {
                s = 0.5 / s;
            }
            let w = (m[k][j] - m[j][k]) * s;
            q[j] = (m[j][i] + m[i][j]) * s;
            q[k] = (m[k][i] + m[i][k]) * s;
            Self::new(Vector3f::new(q[0], q[1], q[2]), w)
        }
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.v + other.v, self.w + other.w)
    }
}

impl Sub for Quaternion {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.v - other.v, self.w - other.w)
    }
}

impl Mul<Float> for Quaternion {
    type Output = Self;

    fn mul(self, f: Float) -> Self {
        Self::new(self.v * f, self.w * f)
    }
}

impl Div<Float> for Quaternion {
    type Output = Self;

    fn div(self, f: Float) -> Self {
        Self::new(self.v / f, self.w / f)
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.v, -self.w)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn rotation_survives_quaternion_conversion() {
        let t = Transform::rotate(60.0, &Vector3f::new(1.0, 1.0, 0.0));
        let q = Quaternion::from(&t);
        let t2 = q.to_transform();
        for i in 0..4 {
            for j in 0..4 {
                assert!(approx_eq!(Float, t.m.m[i][j], t2.m.m[i][j], epsilon = 1e-5));
            }
        }
    }

    #[test]
    fn slerp_halfway_about_z() {
        let q1 = Quaternion::from(&Transform::identity());
        let q2 = Quaternion::from(&Transform::rotate_z(90.0));
        let q = Quaternion::slerp(0.5, &q1, &q2);
        let p = q.to_transform().transform_point(&Point3f::new(1.0, 0.0, 0.0));
        let h = (0.5 as Float).sqrt();
        assert!(approx_eq!(Float, p.x, h, epsilon = 1e-5));
        assert!(approx_eq!(Float, p.y, h, epsilon = 1e-5));
    }
}
