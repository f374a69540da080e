//! Mirror Material

use super::*;
use crate::error::*;
use crate::paramset::*;
use crate::spectrum::*;

/// Perfect specular reflector.
#[derive(Clone, Debug)]
pub struct MirrorMaterial {
    /// Reflectivity.
    kr: ArcTexture<Spectrum>,

    /// Bump map.
    bump_map: Option<ArcTexture<Float>>,
}

impl MirrorMaterial {
    /// Create a new `MirrorMaterial`.
    ///
    /// * `kr`       - Reflectivity.
    /// * `bump_map` - Optional bump map.
    pub fn new(kr: ArcTexture<Spectrum>, bump_map: Option<ArcTexture<Float>>) -> Self {
        Self { kr, bump_map }
    }

    /// Returns the BSDF for a hit.
    ///
    /// * `dg_geom`    - True geometry at the hit.
    /// * `dg_shading` - Shading geometry at the hit.
    pub fn get_bsdf<'a>(&self, dg_geom: &DifferentialGeometry<'a>, dg_shading: &DifferentialGeometry<'a>) -> BSDF<'a> {
        let dgs = Material::shading_geometry(&self.bump_map, dg_geom, dg_shading);
        let mut bsdf = BSDF::new(&dgs, dg_geom.n, 1.0);
        let r = self.kr.evaluate(&dgs).clamp(0.0, INFINITY);
        if !r.is_black() {
            bsdf.add(SpecularReflection::new(r, Fresnel::NoOp));
        }
        bsdf
    }
}

impl TryFrom<&TextureParams<'_>> for MirrorMaterial {
    type Error = Error;

    /// Create a mirror material from texture parameters.
    ///
    /// * `tp` - Texture parameters.
    fn try_from(tp: &TextureParams<'_>) -> Result<Self> {
        let kr = tp.get_spectrum_texture("Kr", Spectrum::new(0.9))?;
        let bump_map = tp.get_float_texture_or_none("bumpmap")?;
        Ok(Self::new(kr, bump_map))
    }
}
