//! Glass Material

use super::*;
use crate::error::*;
use crate::paramset::*;
use crate::spectrum::*;

/// Clear dielectric with specular reflection and transmission.
#[derive(Clone, Debug)]
pub struct GlassMaterial {
    /// Reflectivity.
    kr: ArcTexture<Spectrum>,

    /// Transmissivity.
    kt: ArcTexture<Spectrum>,

    /// Index of refraction of the interior.
    index: ArcTexture<Float>,

    /// Bump map.
    bump_map: Option<ArcTexture<Float>>,
}

impl GlassMaterial {
    /// Create a new `GlassMaterial`.
    ///
    /// * `kr`       - Reflectivity.
    /// * `kt`       - Transmissivity.
    /// * `index`    - Index of refraction of the interior.
    /// * `bump_map` - Optional bump map.
    pub fn new(
        kr: ArcTexture<Spectrum>,
        kt: ArcTexture<Spectrum>,
        index: ArcTexture<Float>,
        bump_map: Option<ArcTexture<Float>>,
    ) -> Self {
        Self { kr, kt, index, bump_map }
    }

    /// Returns the BSDF for a hit.
    ///
    /// * `dg_geom`    - True geometry at the hit.
    /// * `dg_shading` - Shading geometry at the hit.
    pub fn get_bsdf<'a>(&self, dg_geom: &DifferentialGeometry<'a>, dg_shading: &DifferentialGeometry<'a>) -> BSDF<'a> {
        let dgs = Material::shading_geometry(&self.bump_map, dg_geom, dg_shading);
        let ior = self.index.evaluate(&dgs);
        let mut bsdf = BSDF::new(&dgs, dg_geom.n, ior);

        let r = self.kr.evaluate(&dgs).clamp(0.0, INFINITY);
        let t = self.kt.evaluate(&dgs).clamp(0.0, INFINITY);
        if !r.is_black() {
            bsdf.add(SpecularReflection::new(r, Fresnel::Dielectric(FresnelDielectric::new(1.0, ior))));
        }
        if !t.is_black() {
            bsdf.add(SpecularTransmission::new(t, 1.0, ior));
        }
        bsdf
    }
}

impl TryFrom<&TextureParams<'_>> for GlassMaterial {
    type Error = Error;

    /// Create a glass material from texture parameters.
    ///
    /// * `tp` - Texture parameters.
    fn try_from(tp: &TextureParams<'_>) -> Result<Self> {
        let kr = tp.get_spectrum_texture("Kr", Spectrum::one())?;
        let kt = tp.get_spectrum_texture("Kt", Spectrum::one())?;
        let index = tp.get_float_texture("index", 1.5)?;
        let bump_map = tp.get_float_texture_or_none("bumpmap")?;
        Ok(Self::new(kr, kt, index, bump_map))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
