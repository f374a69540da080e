//! Specular Reflection

use super::*;

/// BRDF for perfect mirror reflection scaled by a Fresnel term.
#[derive(Copy, Clone, Debug)]
pub struct SpecularReflection {
    /// Spectrum used to scale the reflected colour.
    pub r: Spectrum,

    /// Fresnel interface.
    pub fresnel: Fresnel,
}

impl SpecularReflection {
    /// Create a new specular reflection `BxDF`.
    ///
    /// * `r`       - Spectrum used to scale the reflected colour.
    /// * `fresnel` - Fresnel interface.
    pub fn new(r: Spectrum, fresnel: Fresnel) -> BxDF {
        BxDF::SpecularReflection(Self { r, fresnel })
    }

    /// Returns the mirror direction of `wo` with pdf 1.
    ///
    /// * `wo`        - Outgoing direction.
    /// * `bxdf_type` - The type to report.
    pub fn sample_f(&self, wo: &Vector3f, bxdf_type: BxDFType) -> BsdfSampleResult {
        let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
        BsdfSampleResult {
            f: self.fresnel.evaluate(cos_theta(wo)) * self.r / abs_cos_theta(&wi),
            wi,
            pdf: 1.0,
            sampled_type: bxdf_type,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
