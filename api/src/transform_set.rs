//! Transform Set

use lumen_core::geometry::*;
use lumen_core::pbrt::*;
use std::ops::{Index, IndexMut};

/// Number of transformations to store; one for shutter open and one for
/// shutter close.
pub const MAX_TRANSFORMS: usize = 2;

/// Transformation for starting time.
pub const START_TRANSFORM_BITS: usize = 1 << 0;

/// Transformation for ending time.
pub const END_TRANSFORM_BITS: usize = 1 << 1;

/// Transformation for both starting and ending time.
pub const ALL_TRANSFORM_BITS: usize = (1 << MAX_TRANSFORMS) - 1;

/// Stores the current transformation at each of the transform times.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformSet {
    /// The transformations.
    t: [Transform; MAX_TRANSFORMS],
}

impl TransformSet {
    /// Returns a new `TransformSet` containing the inverse transformations.
    pub fn inverse(&self) -> Self {
        let mut t_inv = *self;
        for i in 0..MAX_TRANSFORMS {
            t_inv.t[i] = self.t[i].inverse();
        }
        t_inv
    }

    /// Returns `true` if 2 successive transformations are not the same
    /// indicating that this is storing animated transforms.
    pub fn is_animated(&self) -> bool {
        self.t.windows(2).any(|w| w[0] != w[1])
    }

    /// Apply `f` to every transformation selected by `active_transform_bits`.
    ///
    /// * `active_transform_bits` - Selected transform times.
    /// * `f`                     - Maps the old transformation to the new one.
    pub fn update<F>(&mut self, active_transform_bits: usize, f: F)
    where
        F: Fn(&Transform) -> Transform,
    {
        for i in 0..MAX_TRANSFORMS {
            if active_transform_bits & (1 << i) > 0 {
                self.t[i] = f(&self.t[i]);
            }
        }
    }

    /// Returns the animated transform from start to end time.
    ///
    /// * `start_time` - Time of the first transformation.
    /// * `end_time`   - Time of the second transformation.
    pub fn animated(&self, start_time: Float, end_time: Float) -> AnimatedTransform {
        AnimatedTransform::new(self.t[0], start_time, self.t[1], end_time)
    }
}

impl Default for TransformSet {
    /// Returns identity transformations.
    fn default() -> Self {
        Self {
            t: [Transform::identity(); MAX_TRANSFORMS],
        }
    }
}

impl Index<usize> for TransformSet {
    type Output = Transform;

    /// Return the `Transform` at the given index.
    ///
    /// * `index` - The index.
    fn index(&self, index: usize) -> &Self::Output {
        &self.t[index]
    }
}

impl IndexMut<usize> for TransformSet {
    /// Return mutable `Transform` at the given index.
    ///
    /// * `index` - The index.
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.t[index]
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_touches_only_active_transforms() {
        let mut ts = TransformSet::default();
        assert!(!ts.is_animated());

        let shift = Transform::translate(&Vector3f::new(1.0, 0.0, 0.0));
        ts.update(END_TRANSFORM_BITS, |t| *t * shift);
        assert!(ts.is_animated());
        assert_eq!(ts[0], Transform::identity());
        assert_eq!(ts[1], shift);

        ts.update(ALL_TRANSFORM_BITS, |_| Transform::identity());
        assert!(!ts.is_animated());
    }

    #[test]
    fn inverse_inverts_each_time() {
        let mut ts = TransformSet::default();
        ts[1] = Transform::translate(&Vector3f::new(0.0, 2.0, 0.0));
        let inv = ts.inverse();
        let p = inv[1].transform_point(&Point3f::new(0.0, 2.0, 0.0));
        assert_eq!(p, Point3f::zero());
        assert_eq!(inv[0], Transform::identity());
    }
}
