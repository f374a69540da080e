//! Oren-Nayar Microfacet Model

use super::*;

/// BRDF for the Oren-Nayar model of rough diffuse surfaces.
#[derive(Copy, Clone, Debug)]
pub struct OrenNayar {
    /// Reflectance spectrum which gives the fraction of incident light that
    /// is scattered.
    pub r: Spectrum,

    /// Precomputed parameter `A` where:
    ///               σ^2
    /// A = 1 - ---------------
    ///          2(σ^2 + 0.33)
    a: Float,

    /// Precomputed parameter `B` where:
    ///      0.45 * σ^2
    /// B = ------------
    ///      σ^2 + 0.09
    b: Float,
}

impl OrenNayar {
    /// Create a new Oren-Nayar `BxDF`.
    ///
    /// * `r`     - Reflectance spectrum.
    /// * `sigma` - Standard deviation of the microfacet orientation angle in
    ///             degrees.
    pub fn new(r: Spectrum, sigma: Float) -> BxDF {
        let sigma = radians(sigma);
        let sigma2 = sigma * sigma;
        BxDF::OrenNayar(Self {
            r,
            a: 1.0 - (sigma2 / (2.0 * (sigma2 + 0.33))),
            b: 0.45 * sigma2 / (sigma2 + 0.09),
        })
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        let sin_theta_i = sin_theta(wi);
        let sin_theta_o = sin_theta(wo);

        // Cosine term.
        let max_cos = if sin_theta_i > 1e-4 && sin_theta_o > 1e-4 {
            let d_cos = cos_phi(wi) * cos_phi(wo) + sin_phi(wi) * sin_phi(wo);
            max(0.0, d_cos)
        } else {
            0.0
        };

        // Sine and tangent terms.
        let (sin_alpha, tan_beta) = if abs_cos_theta(wi) > abs_cos_theta(wo) {
            (sin_theta_o, sin_theta_i / abs_cos_theta(wi))
        } else {
            (sin_theta_i, sin_theta_o / abs_cos_theta(wo))
        };

        self.r * (INV_PI * (self.a + self.b * max_cos * sin_alpha * tan_beta))
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
    fn zero_roughness_is_lambertian() {
        let r = Spectrum::new(0.6);
        let bxdf = OrenNayar::new(r, 0.0);
        let wo = Vector3f::new(0.3, 0.1, 0.9).normalize();
        let wi = Vector3f::new(-0.2, 0.4, 0.8).normalize();
        assert!(approx_eq!(Float, bxdf.f(&wo, &wi)[0], 0.6 * INV_PI, epsilon = 1e-6));
    }

    #[test]
    fn rough_surface_reflects_less_than_albedo() {
        let bxdf = OrenNayar::new(Spectrum::new(1.0), 20.0);
        let samples: Vec<Float> = (0..64).flat_map(|i| [(i % 8) as Float / 8.0 + 0.0625, (i / 8) as Float / 8.0 + 0.0625]).collect();
        let rho = bxdf.rho_hd(&Vector3f::new(0.0, 0.0, 1.0), &samples);
        assert!(rho[0] > 0.5 && rho[0] <= 1.0 + 1e-3);
    }
}
