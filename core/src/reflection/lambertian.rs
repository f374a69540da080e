//! Lambertian Reflection

use super::*;

/// BRDF for perfectly diffuse surfaces that scatter incident illumination
/// equally in all directions.
#[derive(Copy, Clone, Debug)]
pub struct Lambertian {
    /// Reflectance spectrum which gives the fraction of incident light that
    /// is scattered.
    pub r: Spectrum,
}

impl Lambertian {
    /// Create a new Lambertian `BxDF`.
    ///
    /// * `r` - Reflectance spectrum.
    pub fn new(r: Spectrum) -> BxDF {
        BxDF::Lambertian(Self { r })
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `_wo` - Outgoing direction.
    /// * `_wi` - Incident direction.
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        self.r * INV_PI
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
