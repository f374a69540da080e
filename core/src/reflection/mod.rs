//! Reflection and surface scattering models

use crate::geometry::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::spectrum::*;
use std::fmt;

mod bsdf;
mod bsdf_sample;
mod bxdf_type;
mod fresnel;
mod lambertian;
mod oren_nayar;
mod specular_reflection;
mod specular_transmission;

// Re-export
pub use bsdf::*;
pub use bsdf_sample::*;
pub use bxdf_type::*;
pub use fresnel::*;
pub use lambertian::*;
pub use oren_nayar::*;
pub use specular_reflection::*;
pub use specular_transmission::*;

/// BxDF for BRDFs and BTDFs. Directions are in the local shading coordinate
/// system where the normal is the z-axis.
#[derive(Copy, Clone, Debug)]
pub enum BxDF {
    Lambertian(Lambertian),
    OrenNayar(OrenNayar),
    SpecularReflection(SpecularReflection),
    SpecularTransmission(SpecularTransmission),
}

impl BxDF {
    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        match self {
            Self::Lambertian(_) => BxDFType::REFLECTION | BxDFType::DIFFUSE,
            Self::OrenNayar(_) => BxDFType::REFLECTION | BxDFType::DIFFUSE,
            Self::SpecularReflection(_) => BxDFType::REFLECTION | BxDFType::SPECULAR,
            Self::SpecularTransmission(_) => BxDFType::TRANSMISSION | BxDFType::SPECULAR,
        }
    }

    /// Returns true if every flag of this BxDF's type is in `flags`.
    ///
    /// * `flags` - The flags to match.
    pub fn matches_flags(&self, flags: BxDFType) -> bool {
        let t = self.get_type();
        (t & flags) == t
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        match self {
            Self::Lambertian(bxdf) => bxdf.f(wo, wi),
            Self::OrenNayar(bxdf) => bxdf.f(wo, wi),
            Self::SpecularReflection(_) | Self::SpecularTransmission(_) => Spectrum::zero(),
        }
    }

    /// Sample an incident direction for `wo`. The default samples a cosine
    /// weighted hemisphere on the side of `wo`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u1` - First random value.
    /// * `u2` - Second random value.
    pub fn sample_f(&self, wo: &Vector3f, u1: Float, u2: Float) -> BsdfSampleResult {
        match self {
            Self::SpecularReflection(bxdf) => bxdf.sample_f(wo, self.get_type()),
            Self::SpecularTransmission(bxdf) => bxdf.sample_f(wo, self.get_type()),
            _ => {
                let mut wi = cosine_sample_hemisphere(u1, u2);
                if wo.z < 0.0 {
                    wi.z = -wi.z;
                }
                BsdfSampleResult {
                    f: self.f(wo, &wi),
                    wi,
                    pdf: self.pdf(wo, &wi),
                    sampled_type: self.get_type(),
                }
            }
        }
    }

    /// Evaluates the PDF of `sample_f`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            Self::SpecularReflection(_) | Self::SpecularTransmission(_) => 0.0,
            _ => {
                if same_hemisphere(wo, wi) {
                    abs_cos_theta(wi) * INV_PI
                } else {
                    0.0
                }
            }
        }
    }

    /// Computes the hemispherical-directional reflectance ρ_hd.
    ///
    /// * `wo`      - Outgoing direction.
    /// * `samples` - Interleaved 2D samples for the Monte Carlo estimate.
    pub fn rho_hd(&self, wo: &Vector3f, samples: &[Float]) -> Spectrum {
        if let Self::Lambertian(bxdf) = self {
            return bxdf.r;
        }

        let n = samples.len() / 2;
        let mut r = Spectrum::zero();
        for u in samples.chunks_exact(2) {
            let s = self.sample_f(wo, u[0], u[1]);
            if s.pdf > 0.0 {
                r += s.f * abs_cos_theta(&s.wi) / s.pdf;
            }
        }
        r / n as Float
    }

    /// Computes the hemispherical-hemispherical reflectance ρ_hh.
    ///
    /// * `samples1` - Interleaved 2D samples for outgoing directions.
    /// * `samples2` - Interleaved 2D samples for incident directions.
    pub fn rho_hh(&self, samples1: &[Float], samples2: &[Float]) -> Spectrum {
        if let Self::Lambertian(bxdf) = self {
            return bxdf.r;
        }

        debug_assert_eq!(samples1.len(), samples2.len());
        let n = samples1.len() / 2;
        let mut r = Spectrum::zero();
        for (u, v) in samples1.chunks_exact(2).zip(samples2.chunks_exact(2)) {
            let wo = uniform_sample_hemisphere(u[0], u[1]);
            let pdf_o = uniform_hemisphere_pdf();
            let s = self.sample_f(&wo, v[0], v[1]);
            if s.pdf > 0.0 {
                r += s.f * abs_cos_theta(&s.wi) * abs_cos_theta(&wo) / (pdf_o * s.pdf);
            }
        }
        r / (PI * n as Float)
    }
}

impl fmt::Display for BxDF {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lambertian(b) => write!(f, "Lambertian {{ r: {} }}", b.r),
            Self::OrenNayar(b) => write!(f, "OrenNayar {{ r: {} }}", b.r),
            Self::SpecularReflection(b) => write!(f, "SpecularReflection {{ r: {} }}", b.r),
            Self::SpecularTransmission(b) => write!(f, "SpecularTransmission {{ t: {} }}", b.t),
        }
    }
}

/// Returns cos(θ) of a direction in shading space.
///
/// * `w` - The direction.
#[inline]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns |cos(θ)| of a direction in shading space.
///
/// * `w` - The direction.
#[inline]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    abs(w.z)
}

/// Returns sin²(θ) of a direction in shading space.
///
/// * `w` - The direction.
#[inline]
pub fn sin_theta2(w: &Vector3f) -> Float {
    max(0.0, 1.0 - w.z * w.z)
}

/// Returns sin(θ) of a direction in shading space.
///
/// * `w` - The direction.
#[inline]
pub fn sin_theta(w: &Vector3f) -> Float {
    sin_theta2(w).sqrt()
}

/// Returns cos(φ) of a direction in shading space.
///
/// * `w` - The direction.
#[inline]
pub fn cos_phi(w: &Vector3f) -> Float {
    let s = sin_theta(w);
    if s == 0.0 {
        1.0
    } else {
        clamp(w.x / s, -1.0, 1.0)
    }
}

/// Returns sin(φ) of a direction in shading space.
///
/// * `w` - The direction.
#[inline]
pub fn sin_phi(w: &Vector3f) -> Float {
    let s = sin_theta(w);
    if s == 0.0 {
        0.0
    } else {
        clamp(w.y / s, -1.0, 1.0)
    }
}

/// Returns true if both directions lie in the same hemisphere.
///
/// * `w`  - First direction.
/// * `wp` - Second direction.
#[inline]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}
