//! Visibility Tester

use crate::geometry::*;
use crate::pbrt::*;
use crate::renderer::*;
use crate::rng::*;
use crate::sampler::*;
use crate::scene::*;
use crate::spectrum::*;

/// Shadow ray that lets lights return radiance under the assumption that
/// the reference point and the light are mutually visible.
#[derive(Copy, Clone, Debug)]
pub struct VisibilityTester {
    /// The shadow ray.
    pub r: Ray,
}

impl VisibilityTester {
    /// Shadow ray along the segment between two points.
    ///
    /// * `p1`   - Start point.
    /// * `eps1` - Offset at the start point.
    /// * `p2`   - End point.
    /// * `eps2` - Relative offset at the end point.
    /// * `time` - Time value.
    pub fn segment(p1: &Point3f, eps1: Float, p2: &Point3f, eps2: Float, time: Float) -> Self {
        let dist = p1.distance(p2);
        Self {
            r: Ray::new(*p1, (*p2 - *p1) / dist, eps1, dist * (1.0 - eps2), time, 0),
        }
    }

    /// Shadow ray leaving `p` in direction `w`.
    ///
    /// * `p`    - Start point.
    /// * `eps`  - Offset at the start point.
    /// * `w`    - Direction.
    /// * `time` - Time value.
    pub fn ray(p: &Point3f, eps: Float, w: &Vector3f, time: Float) -> Self {
        Self {
            r: Ray::new(*p, *w, eps, INFINITY, time, 0),
        }
    }

    /// Returns true if nothing in the scene blocks the shadow ray.
    ///
    /// * `scene` - The scene.
    pub fn unoccluded(&self, scene: &Scene) -> bool {
        !scene.intersect_p(&self.r)
    }

    /// Returns the fraction of light transmitted along the shadow ray by
    /// participating media.
    ///
    /// * `scene`    - The scene.
    /// * `renderer` - The renderer.
    /// * `sample`   - Optional sampler values.
    /// * `rng`      - Random number generator.
    pub fn transmittance(&self, scene: &Scene, renderer: &dyn Renderer, sample: Option<&Sample>, rng: &mut RNG) -> Spectrum {
        renderer.transmittance(scene, &self.r, sample, rng)
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
    fn segment_stops_short_of_end_point() {
        let vis = VisibilityTester::segment(&Point3f::zero(), 1e-3, &Point3f::new(0.0, 0.0, 4.0), 0.25, 0.5);
        assert_eq!(vis.r.d, Vector3f::new(0.0, 0.0, 1.0));
        assert!(approx_eq!(Float, vis.r.max_t, 3.0, epsilon = 1e-6));
        assert_eq!(vis.r.min_t, 1e-3);
        assert_eq!(vis.r.time, 0.5);
    }

    #[test]
    fn ray_is_unbounded() {
        let vis = VisibilityTester::ray(&Point3f::zero(), 0.1, &Vector3f::new(1.0, 0.0, 0.0), 0.0);
        assert_eq!(vis.r.max_t, INFINITY);
    }
}
