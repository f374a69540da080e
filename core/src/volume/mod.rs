//! Volume Regions

use crate::geometry::*;
use crate::paramset::*;
use crate::pbrt::*;
use crate::spectrum::*;

mod aggregate;
mod homogeneous;

// Re-export
pub use aggregate::*;
pub use homogeneous::*;

/// Region of participating media.
#[derive(Clone, Debug)]
pub enum VolumeRegion {
    /// Box with constant coefficients.
    Homogeneous(HomogeneousVolume),

    /// Several regions treated as one.
    Aggregate(AggregateVolume),
}

impl VolumeRegion {
    /// Returns a bounding box in world space.
    pub fn world_bound(&self) -> Bounds3f {
        match self {
            Self::Homogeneous(v) => v.world_bound(),
            Self::Aggregate(v) => v.world_bound(),
        }
    }

    /// Returns the parametric range of the ray that overlaps the region.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> Option<(Float, Float)> {
        match self {
            Self::Homogeneous(v) => v.intersect_p(ray),
            Self::Aggregate(v) => v.intersect_p(ray),
        }
    }

    /// Returns the absorption coefficient at a point.
    ///
    /// * `p` - The point.
    pub fn sigma_a(&self, p: &Point3f) -> Spectrum {
        match self {
            Self::Homogeneous(v) => v.sigma_a(p),
            Self::Aggregate(v) => v.regions.iter().fold(Spectrum::zero(), |s, r| s + r.sigma_a(p)),
        }
    }

    /// Returns the scattering coefficient at a point.
    ///
    /// * `p` - The point.
    pub fn sigma_s(&self, p: &Point3f) -> Spectrum {
        match self {
            Self::Homogeneous(v) => v.sigma_s(p),
            Self::Aggregate(v) => v.regions.iter().fold(Spectrum::zero(), |s, r| s + r.sigma_s(p)),
        }
    }

    /// Returns the attenuation coefficient at a point.
    ///
    /// * `p` - The point.
    pub fn sigma_t(&self, p: &Point3f) -> Spectrum {
        self.sigma_a(p) + self.sigma_s(p)
    }

    /// Returns the radiance emitted at a point.
    ///
    /// * `p` - The point.
    pub fn lve(&self, p: &Point3f) -> Spectrum {
        match self {
            Self::Homogeneous(v) => v.lve(p),
            Self::Aggregate(v) => v.regions.iter().fold(Spectrum::zero(), |s, r| s + r.lve(p)),
        }
    }

    /// Returns the phase function value for scattering from `w` to `wp`.
    ///
    /// * `p`  - The point.
    /// * `w`  - First direction.
    /// * `wp` - Second direction.
    pub fn p(&self, p: &Point3f, w: &Vector3f, wp: &Vector3f) -> Float {
        match self {
            Self::Homogeneous(v) => v.p(p, w, wp),
            Self::Aggregate(v) => v.regions.iter().map(|r| r.p(p, w, wp)).sum(),
        }
    }

    /// Returns the optical thickness along the ray's parametric range.
    ///
    /// * `ray`    - The ray.
    /// * `step`   - Step size for regions that are integrated numerically.
    /// * `offset` - Offset of the first step as a fraction of `step`.
    pub fn tau(&self, ray: &Ray, step: Float, offset: Float) -> Spectrum {
        match self {
            Self::Homogeneous(v) => v.tau(ray),
            Self::Aggregate(v) => v
                .regions
                .iter()
                .fold(Spectrum::zero(), |s, r| s + r.tau(ray, step, offset)),
        }
    }
}

/// Henyey-Greenstein phase function.
///
/// * `cos_theta` - Cosine of the angle between the two directions.
/// * `g`         - Asymmetry parameter; 0 is isotropic.
pub fn phase_hg(cos_theta: Float, g: Float) -> Float {
    let denom = 1.0 + g * g - 2.0 * g * cos_theta;
    INV_FOUR_PI * (1.0 - g * g) / (denom * denom.sqrt())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn isotropic_phase_is_uniform() {
        assert!(approx_eq!(Float, phase_hg(0.3, 0.0), INV_FOUR_PI, epsilon = 1e-6));
        assert!(approx_eq!(Float, phase_hg(-1.0, 0.0), INV_FOUR_PI, epsilon = 1e-6));
    }

    #[test]
    fn forward_scattering_prefers_forward_directions() {
        assert!(phase_hg(1.0, 0.5) > phase_hg(-1.0, 0.5));
    }
}
