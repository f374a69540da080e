//! 3D Axis Aligned Bounding Boxes.

use super::{Point3f, Ray, Union, Vector3f};
use crate::pbrt::*;
use std::fmt;

/// 3D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Point3f,

    /// Maximum bounds.
    pub p_max: Point3f,
}

impl Bounds3f {
    /// 3-D bounding box where minimum and maximum bounds are maximum and minimum
    /// floating point values. This is so we can easily grow the bounding box
    /// from nothing iteratively.
    pub const EMPTY: Self = Self {
        p_min: Point3f {
            x: Float::MAX,
            y: Float::MAX,
            z: Float::MAX,
        },
        p_max: Point3f {
            x: Float::MIN,
            y: Float::MIN,
            z: Float::MIN,
        },
    };

    /// Creates a new bounding box from 2 points. The minimum and maximum bounds
    /// are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns true if the bounds describes an empty box where any of the
    /// minimum coordinates is greater than the maximum coordinates.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    /// Returns the vector along the box diagonal from the minimum point to
    /// the maximum point.
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    /// Returns the index of the axis with the largest extent.
    pub fn maximum_extent(&self) -> Axis {
        self.diagonal().max_dimension()
    }

    /// Returns true if the point is inside the closed box.
    ///
    /// * `p` - The point.
    pub fn inside(&self, p: &Point3f) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }

    /// Returns true if the two boxes overlap.
    ///
    /// * `other` - The other box.
    pub fn overlaps(&self, other: &Self) -> bool {
        (0..3).all(|i| self.p_max[i] >= other.p_min[i] && self.p_min[i] <= other.p_max[i])
    }

    /// Returns the box grown by `delta` in every direction.
    ///
    /// * `delta` - Amount to expand by.
    pub fn expand(&self, delta: Float) -> Self {
        let d = Vector3f::new(delta, delta, delta);
        Self {
            p_min: self.p_min - d,
            p_max: self.p_max + d,
        }
    }

    /// Returns the center and radius of a sphere enclosing the box.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        let center = lerp(0.5, self.p_min, self.p_max);
        let radius = if self.inside(&center) {
            center.distance(&self.p_max)
        } else {
            0.0
        };
        (center, radius)
    }

    /// Clip the ray's parametric range against the box. Returns the entry and
    /// exit parameters `(t0, t1)` or `None` if the ray misses the box.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> Option<(Float, Float)> {
        let mut t0 = ray.min_t;
        let mut t1 = ray.max_t;
        for i in 0..3 {
            let inv_ray_dir = 1.0 / ray.d[i];
            let mut t_near = (self.p_min[i] - ray.o[i]) * inv_ray_dir;
            let mut t_far = (self.p_max[i] - ray.o[i]) * inv_ray_dir;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }

            // NaN comparisons fall through and keep the previous bound.
            t0 = if t_near > t0 { t_near } else { t0 };
            t1 = if t_far < t1 { t_far } else { t1 };
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}

impl Default for Bounds3f {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<Point3f> for Bounds3f {
    /// Use a 3D point as minimum and maximum 3D bounds.
    ///
    /// * `p` - 3D point.
    fn from(p: Point3f) -> Self {
        Self { p_min: p, p_max: p }
    }
}

impl Union<Point3f> for Bounds3f {
    /// Return a bounding box containing the box and a point.
    ///
    /// * `other` - The point.
    fn union(&self, other: &Point3f) -> Self {
        Self {
            p_min: self.p_min.min(other),
            p_max: self.p_max.max(other),
        }
    }
}

impl Union<Bounds3f> for Bounds3f {
    /// Return a bounding box containing both boxes.
    ///
    /// * `other` - The other box.
    fn union(&self, other: &Bounds3f) -> Self {
        Self {
            p_min: self.p_min.min(&other.p_min),
            p_max: self.p_max.max(&other.p_max),
        }
    }
}

impl fmt::Display for Bounds3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.p_min, self.p_max)
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

    #[test]
    fn empty_bounds_returns_min_greater_than_max_components() {
        assert!(Bounds3f::EMPTY.is_empty());
        let b = Bounds3f::EMPTY.union(&Point3f::new(1.0, 2.0, 3.0));
        assert!(!b.is_empty());
        assert_eq!(b.p_min, b.p_max);
    }

    #[test]
    fn ray_enters_unit_box() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), 0.0, INFINITY, 0.0, 0);
        let (t0, t1) = b.intersect_p(&ray).unwrap();
        assert!(approx_eq!(Float, t0, 4.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, t1, 6.0, epsilon = 1e-6));
    }

    #[test]
    fn ray_misses_unit_box() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Point3f::new(3.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), 0.0, INFINITY, 0.0, 0);
        assert!(b.intersect_p(&ray).is_none());
    }

    prop_point3!(
        point3_f32,
        Float,
        -100.0..100.0f32,
        -100.0..100.0f32,
        -100.0..100.0f32
    );

    proptest! {
        #[test]
        fn new_sorts_components(p1 in point3_f32(), p2 in point3_f32()) {
            let b = Bounds3f::new(p1, p2);
            prop_assert!(b.p_min.x <= b.p_max.x);
            prop_assert!(b.p_min.y <= b.p_max.y);
            prop_assert!(b.p_min.z <= b.p_max.z);
            prop_assert!(b.inside(&p1));
            prop_assert!(b.inside(&p2));
        }

        #[test]
        fn union_contains_both(p1 in point3_f32(), p2 in point3_f32(), p3 in point3_f32()) {
            let b = Bounds3f::from(p1).union(&Bounds3f::new(p2, p3));
            prop_assert!(b.inside(&p1) && b.inside(&p2) && b.inside(&p3));
        }
    }
}
