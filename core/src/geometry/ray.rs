//! Rays

use super::{Point3f, Vector3f};
use crate::pbrt::*;
use std::fmt;

/// Offset rays one pixel over in x and y on the image plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RayDifferential {
    /// Origin of the ray offset in x.
    pub rx_origin: Point3f,

    /// Origin of the ray offset in y.
    pub ry_origin: Point3f,

    /// Direction of the ray offset in x.
    pub rx_direction: Vector3f,

    /// Direction of the ray offset in y.
    pub ry_direction: Vector3f,
}

/// A semi-infinite line with a parametric range.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Minimum parametric distance along the ray.
    pub min_t: Float,

    /// Maximum parametric distance along the ray; shrinks as hits are found.
    pub max_t: Float,

    /// Time value.
    pub time: Float,

    /// Number of bounces from the camera.
    pub depth: u32,

    /// Optional auxiliary rays for texture filtering.
    pub differentials: Option<RayDifferential>,
}

impl Ray {
    /// Create a new ray without differentials.
    ///
    /// * `o`     - Origin.
    /// * `d`     - Direction.
    /// * `min_t` - Start of the parametric range.
    /// * `max_t` - End of the parametric range.
    /// * `time`  - Time value.
    /// * `depth` - Bounce depth.
    pub fn new(o: Point3f, d: Vector3f, min_t: Float, max_t: Float, time: Float, depth: u32) -> Self {
        Self {
            o,
            d,
            min_t,
            max_t,
            time,
            depth,
            differentials: None,
        }
    }

    /// Create a ray spawned from `parent`, one bounce deeper and at the same
    /// time.
    ///
    /// * `o`      - Origin.
    /// * `d`      - Direction.
    /// * `parent` - The parent ray.
    /// * `min_t`  - Start of the parametric range.
    pub fn spawn(o: Point3f, d: Vector3f, parent: &Ray, min_t: Float) -> Self {
        Self::new(o, d, min_t, INFINITY, parent.time, parent.depth + 1)
    }

    /// Returns the point at parameter `t`.
    ///
    /// * `t` - Parametric distance.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Returns true if the ray carries differentials.
    pub fn has_differentials(&self) -> bool {
        self.differentials.is_some()
    }

    /// Returns true if any of the components is NaN.
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans() || self.min_t.is_nan() || self.max_t.is_nan()
    }

    /// Scale the offsets of the differential rays, used to account for the
    /// spacing between samples on the image plane.
    ///
    /// * `s` - Scale factor.
    pub fn scale_differentials(&mut self, s: Float) {
        if let Some(diff) = self.differentials.as_mut() {
            diff.rx_origin = self.o + (diff.rx_origin - self.o) * s;
            diff.ry_origin = self.o + (diff.ry_origin - self.o) * s;
            diff.rx_direction = self.d + (diff.rx_direction - self.d) * s;
            diff.ry_direction = self.d + (diff.ry_direction - self.d) * s;
        }
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[o={}, d={}, t=({}, {}), time={}, depth={}]",
            self.o, self.d, self.min_t, self.max_t, self.time, self.depth
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::pbrt::*;

    #[test]
    fn at_returns_point_along_ray() {
        let r = Ray::new(Point3f::new(1.0, 2.0, 3.0), Vector3f::new(0.0, 0.0, 2.0), 0.0, INFINITY, 0.0, 0);
        assert_eq!(r.at(1.5), Point3f::new(1.0, 2.0, 6.0));
        assert!(!r.has_differentials());
    }

    #[test]
    fn scale_differentials_moves_offsets_towards_main_ray() {
        let mut r = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0), 0.0, INFINITY, 0.0, 0);
        r.differentials = Some(RayDifferential {
            rx_origin: Point3f::new(2.0, 0.0, 0.0),
            ry_origin: Point3f::new(0.0, 2.0, 0.0),
            rx_direction: Vector3f::new(0.0, 0.0, 1.0),
            ry_direction: Vector3f::new(0.0, 0.0, 1.0),
        });
        r.scale_differentials(0.5);
        let diff = r.differentials.unwrap();
        assert_eq!(diff.rx_origin, Point3f::new(1.0, 0.0, 0.0));
        assert_eq!(diff.ry_origin, Point3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn spawn_increments_depth() {
        let parent = Ray::new(Point3f::zero(), Vector3f::new(1.0, 0.0, 0.0), 0.0, 10.0, 0.25, 2);
        let child = Ray::spawn(Point3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, 1.0, 0.0), &parent, 1e-3);
        assert_eq!(child.depth, 3);
        assert_eq!(child.time, 0.25);
        assert_eq!(child.max_t, INFINITY);
    }
}
