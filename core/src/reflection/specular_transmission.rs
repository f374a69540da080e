//! Specular Transmission

use super::*;

/// BTDF for perfect specular refraction through a dielectric boundary.
#[derive(Copy, Clone, Debug)]
pub struct SpecularTransmission {
    /// Spectrum used to scale the transmitted colour.
    pub t: Spectrum,

    /// Index of refraction on the side of the surface normal.
    pub eta_i: Float,

    /// Index of refraction on the other side.
    pub eta_t: Float,

    /// Fresnel term of the boundary.
    fresnel: FresnelDielectric,
}

impl SpecularTransmission {
    /// Create a new specular transmission `BxDF`.
    ///
    /// * `t`     - Spectrum used to scale the transmitted colour.
    /// * `eta_i` - Index of refraction on the side of the surface normal.
    /// * `eta_t` - Index of refraction on the other side.
    pub fn new(t: Spectrum, eta_i: Float, eta_t: Float) -> BxDF {
        BxDF::SpecularTransmission(Self {
            t,
            eta_i,
            eta_t,
            fresnel: FresnelDielectric::new(eta_i, eta_t),
        })
    }

    /// Returns the refracted direction of `wo` with pdf 1, or a zero pdf on
    /// total internal reflection.
    ///
    /// * `wo`        - Outgoing direction.
    /// * `bxdf_type` - The type to report.
    pub fn sample_f(&self, wo: &Vector3f, bxdf_type: BxDFType) -> BsdfSampleResult {
        let entering = cos_theta(wo) > 0.0;
        let (ei, et) = if entering {
            (self.eta_i, self.eta_t)
        } else {
            (self.eta_t, self.eta_i)
        };

        let eta = ei / et;
        let sin_t2 = eta * eta * sin_theta2(wo);
        if sin_t2 >= 1.0 {
            return BsdfSampleResult {
                sampled_type: bxdf_type,
                ..Default::default()
            };
        }

        let cos_t = max(0.0, 1.0 - sin_t2).sqrt();
        let cos_t = if entering { -cos_t } else { cos_t };
        let wi = Vector3f::new(-eta * wo.x, -eta * wo.y, cos_t);
        let f = self.fresnel.evaluate(cos_theta(wo));
        BsdfSampleResult {
            f: (Spectrum::one() - f) * self.t / abs_cos_theta(&wi),
            wi,
            pdf: 1.0,
            sampled_type: bxdf_type,
        }
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
    fn normal_incidence_passes_straight_through() {
        let bxdf = SpecularTransmission::new(Spectrum::one(), 1.0, 1.5);
        let s = bxdf.sample_f(&Vector3f::new(0.0, 0.0, 1.0), 0.5, 0.5);
        assert_eq!(s.wi, Vector3f::new(0.0, 0.0, -1.0));
        assert!(approx_eq!(Float, s.f[0], 0.96, epsilon = 1e-5));
    }

    #[test]
    fn refraction_obeys_snell() {
        let bxdf = SpecularTransmission::new(Spectrum::one(), 1.0, 1.5);
        let wo = Vector3f::new(0.5, 0.0, (0.75 as Float).sqrt());
        let s = bxdf.sample_f(&wo, 0.5, 0.5);
        assert!(approx_eq!(Float, sin_theta(&s.wi), 0.5 / 1.5, epsilon = 1e-5));
        assert!(s.wi.z < 0.0);
    }

    #[test]
    fn total_internal_reflection_has_zero_pdf() {
        let bxdf = SpecularTransmission::new(Spectrum::one(), 1.0, 1.5);
        let wo = Vector3f::new(0.9, 0.0, -(0.19 as Float).sqrt());
        assert_eq!(bxdf.sample_f(&wo, 0.5, 0.5).pdf, 0.0);
    }
}
