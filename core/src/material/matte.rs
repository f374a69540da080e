//! Matte Material

use super::*;
use crate::error::*;
use crate::paramset::*;
use crate::spectrum::*;

/// Purely diffuse surfaces; Lambertian when smooth, Oren-Nayar when rough.
#[derive(Clone, Debug)]
pub struct MatteMaterial {
    /// Spectral diffuse reflection.
    kd: ArcTexture<Spectrum>,

    /// Roughness in degrees.
    sigma: ArcTexture<Float>,

    /// Bump map.
    bump_map: Option<ArcTexture<Float>>,
}

impl MatteMaterial {
    /// Create a new `MatteMaterial`.
    ///
    /// * `kd`       - Spectral diffuse reflection.
    /// * `sigma`    - Roughness in degrees.
    /// * `bump_map` - Optional bump map.
    pub fn new(kd: ArcTexture<Spectrum>, sigma: ArcTexture<Float>, bump_map: Option<ArcTexture<Float>>) -> Self {
        Self { kd, sigma, bump_map }
    }

    /// Returns the BSDF for a hit.
    ///
    /// * `dg_geom`    - True geometry at the hit.
    /// * `dg_shading` - Shading geometry at the hit.
    pub fn get_bsdf<'a>(&self, dg_geom: &DifferentialGeometry<'a>, dg_shading: &DifferentialGeometry<'a>) -> BSDF<'a> {
        let dgs = Material::shading_geometry(&self.bump_map, dg_geom, dg_shading);
        let mut bsdf = BSDF::new(&dgs, dg_geom.n, 1.0);

        let r = self.kd.evaluate(&dgs).clamp(0.0, INFINITY);
        let sigma = clamp(self.sigma.evaluate(&dgs), 0.0, 90.0);
        if !r.is_black() {
            if sigma == 0.0 {
                bsdf.add(Lambertian::new(r));
            } else {
                bsdf.add(OrenNayar::new(r, sigma));
            }
        }
        bsdf
    }
}

impl TryFrom<&TextureParams<'_>> for MatteMaterial {
    type Error = Error;

    /// Create a matte material from texture parameters.
    ///
    /// * `tp` - Texture parameters.
    fn try_from(tp: &TextureParams<'_>) -> Result<Self> {
        let kd = tp.get_spectrum_texture("Kd", Spectrum::new(0.5))?;
        let sigma = tp.get_float_texture("sigma", 0.0)?;
        let bump_map = tp.get_float_texture_or_none("bumpmap")?;
        Ok(Self::new(kd, sigma, bump_map))
    }
}
