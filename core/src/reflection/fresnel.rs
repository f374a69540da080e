//! Fresnel Reflectance

use super::*;

/// Computes Fresnel reflection coefficients.
#[derive(Copy, Clone, Debug)]
pub enum Fresnel {
    /// Reflects all incident light.
    NoOp,

    /// Dielectric interface.
    Dielectric(FresnelDielectric),
}

impl Fresnel {
    /// Returns the fraction of light reflected by the surface.
    ///
    /// * `cos_theta_i` - Cosine of the angle between the incident direction
    ///                   and the surface normal.
    pub fn evaluate(&self, cos_theta_i: Float) -> Spectrum {
        match self {
            Self::NoOp => Spectrum::one(),
            Self::Dielectric(f) => f.evaluate(cos_theta_i),
        }
    }
}

/// Fresnel reflectance of the boundary between two dielectrics.
#[derive(Copy, Clone, Debug)]
pub struct FresnelDielectric {
    /// Index of refraction on the side of the surface normal.
    pub eta_i: Float,

    /// Index of refraction on the other side.
    pub eta_t: Float,
}

impl FresnelDielectric {
    /// Create a new `FresnelDielectric`.
    ///
    /// * `eta_i` - Index of refraction on the side of the surface normal.
    /// * `eta_t` - Index of refraction on the other side.
    pub fn new(eta_i: Float, eta_t: Float) -> Self {
        Self { eta_i, eta_t }
    }

    /// Returns the fraction of light reflected by the surface.
    ///
    /// * `cos_theta_i` - Cosine of the incident angle; negative values are on
    ///                   the inside of the surface.
    pub fn evaluate(&self, cos_theta_i: Float) -> Spectrum {
        let cos_i = clamp(cos_theta_i, -1.0, 1.0);
        let (ei, et) = if cos_i > 0.0 {
            (self.eta_i, self.eta_t)
        } else {
            (self.eta_t, self.eta_i)
        };

        // Snell's law.
        let sin_t = ei / et * max(0.0, 1.0 - cos_i * cos_i).sqrt();
        if sin_t >= 1.0 {
            // Total internal reflection.
            Spectrum::one()
        } else {
            let cos_t = max(0.0, 1.0 - sin_t * sin_t).sqrt();
            Spectrum::new(fr_dielectric(abs(cos_i), cos_t, ei, et))
        }
    }
}

/// Fresnel reflectance for dielectrics and unpolarized light.
///
/// * `cos_i` - Cosine of the incident angle.
/// * `cos_t` - Cosine of the transmitted angle.
/// * `eta_i` - Index of refraction on the incident side.
/// * `eta_t` - Index of refraction on the transmitted side.
pub fn fr_dielectric(cos_i: Float, cos_t: Float, eta_i: Float, eta_t: Float) -> Float {
    let r_parl = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let r_perp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn normal_incidence_on_glass() {
        let f = FresnelDielectric::new(1.0, 1.5).evaluate(1.0);
        assert!(approx_eq!(Float, f[0], 0.04, epsilon = 1e-6));
    }

    #[test]
    fn total_internal_reflection_from_inside() {
        let f = FresnelDielectric::new(1.0, 1.5).evaluate(-0.1);
        assert_eq!(f, Spectrum::one());
        assert_eq!(Fresnel::NoOp.evaluate(0.3), Spectrum::one());
    }
}
