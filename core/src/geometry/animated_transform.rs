//! Animated Transformations

use super::*;
use crate::pbrt::*;

/// Number of time steps used to bound the motion of a box.
const MOTION_BOUND_STEPS: usize = 128;

/// Keyframe transformation interpolated between two times by decomposing each
/// keyframe into translation, rotation and scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimatedTransform {
    /// Transform at start time.
    pub start_transform: Transform,

    /// Transform at end time.
    pub end_transform: Transform,

    /// Start time.
    pub start_time: Float,

    /// End time.
    pub end_time: Float,

    /// Whether the keyframes differ.
    pub actually_animated: bool,

    /// Translation components.
    t: [Vector3f; 2],

    /// Rotation components.
    r: [Quaternion; 2],

    /// Scale components.
    s: [Matrix4x4; 2],
}

impl AnimatedTransform {
    /// Create a new animated transform.
    ///
    /// * `start_transform` - Transform at start time.
    /// * `start_time`      - Start time.
    /// * `end_transform`   - Transform at end time.
    /// * `end_time`        - End time.
    pub fn new(start_transform: Transform, start_time: Float, end_transform: Transform, end_time: Float) -> Self {
        let (t0, r0, s0) = Self::decompose(&start_transform.m);
        let (t1, mut r1, s1) = Self::decompose(&end_transform.m);

        // Flip R[1] if needed to select shortest path.
        if r0.dot(&r1) < 0.0 {
            r1 = -r1;
        }

        Self {
            start_transform,
            end_transform,
            start_time,
            end_time,
            actually_animated: start_transform != end_transform,
            t: [t0, t1],
            r: [r0, r1],
            s: [s0, s1],
        }
    }

    /// Create an animated transform that is constant over time.
    ///
    /// * `transform` - The transform.
    pub fn fixed(transform: Transform) -> Self {
        Self::new(transform, 0.0, transform, 1.0)
    }

    /// Polar decomposition of the upper 3x3 of `m` into translation, rotation
    /// and scale.
    ///
    /// * `m` - The matrix.
    fn decompose(m: &Matrix4x4) -> (Vector3f, Quaternion, Matrix4x4) {
        let t = Vector3f::new(m.m[0][3], m.m[1][3], m.m[2][3]);

        // Remove translation.
        let mut mm = *m;
        for i in 0..3 {
            mm.m[i][3] = 0.0;
            mm.m[3][i] = 0.0;
        }
        mm.m[3][3] = 1.0;

        let mut r = mm;
        for _ in 0..100 {
            let rit = match r.transpose().inverse() {
                Ok(rit) => rit,
                Err(_) => break,
            };
            let mut r_next = Matrix4x4::IDENTITY;
            for i in 0..4 {
                for j in 0..4 {
                    r_next.m[i][j] = 0.5 * (r.m[i][j] + rit.m[i][j]);
                }
            }

            let norm = (0..3)
                .map(|i| {
                    abs(r.m[i][0] - r_next.m[i][0])
                        + abs(r.m[i][1] - r_next.m[i][1])
                        + abs(r.m[i][2] - r_next.m[i][2])
                })
                .fold(0.0, max);
            r = r_next;
            if norm <= 0.0001 {
                break;
            }
        }

        let rquat = Quaternion::from(&Transform::with_inverse(r, r.transpose()));
        let s = match r.inverse() {
            Ok(r_inv) => r_inv * mm,
            Err(_) => Matrix4x4::IDENTITY,
        };
        (t, rquat, s)
    }

    /// Returns the interpolated transform at the given time.
    ///
    /// * `time` - The time.
    pub fn interpolate(&self, time: Float) -> Transform {
        if !self.actually_animated || time <= self.start_time {
            return self.start_transform;
        }
        if time >= self.end_time {
            return self.end_transform;
        }

        let dt = (time - self.start_time) / (self.end_time - self.start_time);
        let trans = self.t[0] * (1.0 - dt) + self.t[1] * dt;
        let rotate = Quaternion::slerp(dt, &self.r[0], &self.r[1]);

        let mut scale = Matrix4x4::IDENTITY;
        for i in 0..3 {
            for j in 0..3 {
                scale.m[i][j] = lerp(dt, self.s[0].m[i][j], self.s[1].m[i][j]);
            }
        }
        let scale = match Transform::new(scale) {
            Ok(s) => s,
            Err(err) => {
                warn!("Interpolated scale at time {time} is not invertible: {err}");
                Transform::with_inverse(scale, Matrix4x4::IDENTITY)
            }
        };

        Transform::translate(&trans) * rotate.to_transform() * scale
    }

    /// Transform a ray at the ray's time.
    ///
    /// * `r` - The ray.
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        if !self.actually_animated || r.time <= self.start_time {
            self.start_transform.transform_ray(r)
        } else if r.time >= self.end_time {
            self.end_transform.transform_ray(r)
        } else {
            self.interpolate(r.time).transform_ray(r)
        }
    }

    /// Transform a point at the given time.
    ///
    /// * `time` - The time.
    /// * `p`    - The point.
    pub fn transform_point(&self, time: Float, p: &Point3f) -> Point3f {
        self.interpolate(time).transform_point(p)
    }

    /// Transform a vector at the given time.
    ///
    /// * `time` - The time.
    /// * `v`    - The vector.
    pub fn transform_vector(&self, time: Float, v: &Vector3f) -> Vector3f {
        self.interpolate(time).transform_vector(v)
    }

    /// Returns a box enclosing `b` transformed over the whole time range.
    ///
    /// * `b`           - The bounding box.
    /// * `use_inverse` - Use the inverse of the interpolated transforms.
    pub fn motion_bounds(&self, b: &Bounds3f, use_inverse: bool) -> Bounds3f {
        if !self.actually_animated {
            return if use_inverse {
                self.start_transform.inverse().transform_bounds(b)
            } else {
                self.start_transform.transform_bounds(b)
            };
        }

        (0..MOTION_BOUND_STEPS).fold(Bounds3f::EMPTY, |ret, i| {
            let time = lerp(
                i as Float / (MOTION_BOUND_STEPS - 1) as Float,
                self.start_time,
                self.end_time,
            );
            let t = self.interpolate(time);
            let t = if use_inverse { t.inverse() } else { t };
            ret.union(&t.transform_bounds(b))
        })
    }

    /// Returns true if either keyframe changes handedness.
    pub fn swaps_handedness(&self) -> bool {
        self.start_transform.swaps_handedness() || self.end_transform.swaps_handedness()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
