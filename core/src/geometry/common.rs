//! Common

use super::{Normal3f, Vector3f};
use crate::pbrt::*;

/// Dot product trait.
pub trait Dot<V> {
    /// Returns the dot product.
    ///
    /// * `other` - The other vector/normal.
    fn dot(&self, other: &V) -> Float;

    /// Returns the absolute value of dot product.
    ///
    /// * `other` - The other vector/normal.
    fn abs_dot(&self, other: &V) -> Float {
        abs(self.dot(other))
    }
}

/// Allows pointing vectors/normals into the same hemisphere as another
/// vector/normal.
pub trait FaceForward<V>: Dot<V> + std::ops::Neg<Output = Self> + Sized + Copy {
    /// If `self` is not in the same hemisphere as `other`, return it flipped.
    ///
    /// * `other` - The other vector/normal.
    fn face_forward(&self, other: &V) -> Self {
        if self.dot(other) < 0.0 {
            -*self
        } else {
            *self
        }
    }
}

impl FaceForward<Vector3f> for Normal3f {}
impl FaceForward<Normal3f> for Normal3f {}
impl FaceForward<Vector3f> for Vector3f {}
impl FaceForward<Normal3f> for Vector3f {}

/// Union trait allows union between two objects.
pub trait Union<T> {
    /// Return the result of a union with an another object of type `T`.
    ///
    /// * `other` - The other object.
    fn union(&self, other: &T) -> Self;
}

/// Builds two unit vectors that form an orthonormal basis with `v1`, which
/// must be normalized.
///
/// * `v1` - The first unit vector of the coordinate system.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if abs(v1.x) > abs(v1.y) {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}

/// Returns the direction for spherical coordinates relative to the standard
/// basis.
///
/// * `sin_theta` - sin(θ).
/// * `cos_theta` - cos(θ).
/// * `phi`       - φ.
pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3f {
    Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_vector3!(
        unit_vector3_f32,
        Float,
        -1.0..1.0f32,
        -1.0..1.0f32,
        -1.0..1.0f32
    );

    proptest! {
        #[test]
        fn coordinate_system_is_orthonormal(v in unit_vector3_f32()) {
            prop_assume!(v.length() > 1e-2);
            let v1 = v.normalize();
            let (v2, v3) = coordinate_system(&v1);
            prop_assert!(approx_eq!(Float, v1.dot(&v2), 0.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(Float, v1.dot(&v3), 0.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(Float, v2.dot(&v3), 0.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(Float, v2.length(), 1.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(Float, v3.length(), 1.0, epsilon = 1e-5));
        }
    }

    #[test]
    fn face_forward_flips_normal() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let v = Vector3f::new(0.0, 0.0, -1.0);
        assert_eq!(n.face_forward(&v), Normal3f::new(0.0, 0.0, -1.0));
        assert_eq!(n.face_forward(&-v), n);
    }
}
