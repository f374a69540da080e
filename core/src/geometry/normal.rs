//! 3-D normals

use super::{Dot, Vector3, Vector3f};
use crate::pbrt::*;
use num_traits::Num;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub};

/// A 3-D normal containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Normal3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D normal containing `Float` values.
pub type Normal3f = Normal3<Float>;

impl<T: Num> Normal3<T> {
    /// Creates a new 3-D normal.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Creates a new 3-D zero normal.
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }
}

impl Normal3f {
    /// Returns true if either coordinate is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Returns the square of the normal's length.
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the normal's length.
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }

    /// Returns the unit normal.
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Returns a new normal containing absolute values of the components.
    pub fn abs(&self) -> Self {
        Self::new(abs(self.x), abs(self.y), abs(self.z))
    }

    /// Returns the axis of the component with the largest magnitude.
    pub fn max_abs_dimension(&self) -> Axis {
        Vector3f::from(self.abs()).max_dimension()
    }
}

impl Dot<Normal3f> for Normal3f {
    /// Returns the dot product with another normal.
    ///
    /// * `other` - The other normal.
    fn dot(&self, other: &Normal3f) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl Dot<Vector3f> for Normal3f {
    /// Returns the dot product with a vector.
    ///
    /// * `other` - The vector.
    fn dot(&self, other: &Vector3f) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl<T: Num> Add for Normal3<T> {
    type Output = Self;

    /// Adds the given normal and returns the result.
    ///
    /// * `other` - The normal to add.
    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<T: Num + Copy> AddAssign for Normal3<T> {
    /// Performs the `+=` operation.
    ///
    /// * `other` - The normal to add.
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl<T: Num> Sub for Normal3<T> {
    type Output = Self;

    /// Subtracts the given normal and returns the result.
    ///
    /// * `other` - The normal to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<T: Num + Copy> Mul<T> for Normal3<T> {
    type Output = Self;

    /// Scale the normal.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl Mul<Normal3f> for Float {
    type Output = Normal3f;

    /// Scale the normal.
    ///
    /// * `n` - The normal.
    fn mul(self, n: Normal3f) -> Normal3f {
        n * self
    }
}

impl Div<Float> for Normal3f {
    type Output = Self;

    /// Scale the normal by 1/f.
    ///
    /// * `f` - The scaling factor.
    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl<T: Num + Neg<Output = T>> Neg for Normal3<T> {
    type Output = Self;

    /// Flip the normal's direction (scale by -1).
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T> Index<usize> for Normal3<T> {
    type Output = T;

    /// Index the normal by an axis to get the immutable coordinate axis value.
    ///
    /// * `axis` - A 3-D coordinate axis.
    fn index(&self, axis: usize) -> &Self::Output {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Invalid axis {axis} for Normal3"),
        }
    }
}

impl<T> Index<Axis> for Normal3<T> {
    type Output = T;

    /// Index the normal by an axis to get the immutable coordinate axis value.
    ///
    /// * `axis` - A 3-D coordinate axis.
    fn index(&self, axis: Axis) -> &Self::Output {
        self.index(axis as usize)
    }
}

impl<T> From<Vector3<T>> for Normal3<T> {
    /// Convert a 3-D vector to a 3-D normal.
    ///
    /// * `v` - The vector.
    fn from(v: Vector3<T>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl<T: fmt::Display> fmt::Display for Normal3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::pbrt::*;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_vector3!(
        vector3_f32,
        Float,
        -100.0..100.0f32,
        -100.0..100.0f32,
        -100.0..100.0f32
    );

    proptest! {
        #[test]
        fn from_vector_f32(v in vector3_f32()) {
            let n = Normal3f::from(v);
            prop_assert_eq!(Vector3f::from(n), v);
            prop_assert!(approx_eq!(Float, n.dot(&v), v.length_squared(), epsilon = 1e-2));
        }

        #[test]
        fn normalize_f32(v in vector3_f32()) {
            prop_assume!(v.length() > 1e-3);
            let n = Normal3f::from(v).normalize();
            prop_assert!(approx_eq!(Float, n.length(), 1.0, epsilon = 1e-5));
        }
    }

    #[test]
    fn max_abs_dimension() {
        assert_eq!(Normal3f::new(0.1, -0.9, 0.2).max_abs_dimension(), Axis::Y);
        assert_eq!(Normal3f::new(-2.0, 0.9, 0.2).max_abs_dimension(), Axis::X);
    }
}
