//! Textures

use crate::interaction::DifferentialGeometry;
use crate::pbrt::Float;
use crate::spectrum::Spectrum;
use std::collections::HashMap;
use std::ops::{Add, Mul};
use std::sync::Arc;

/// Texture evaluated at a surface point.
#[derive(Clone, Debug)]
pub enum Texture<T> {
    /// Returns the same value everywhere.
    Constant(T),

    /// Product of a float texture and another texture.
    Scale(Arc<Texture<Float>>, Arc<Texture<T>>),

    /// Bilinear interpolation of four corner values over the mapped (s, t)
    /// coordinates.
    Bilerp(BilerpTexture<T>),
}

/// Maps surface (u, v) to texture (s, t) by scaling and shifting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UVMapping {
    /// Scale `u`.
    pub su: Float,

    /// Scale `v`.
    pub sv: Float,

    /// Shift `u`.
    pub du: Float,

    /// Shift `v`.
    pub dv: Float,
}

impl UVMapping {
    /// Create a new `UVMapping`.
    ///
    /// * `su` - Scale `u`.
    /// * `sv` - Scale `v`.
    /// * `du` - Shift `u`.
    /// * `dv` - Shift `v`.
    pub fn new(su: Float, sv: Float, du: Float, dv: Float) -> Self {
        Self { su, sv, du, dv }
    }

    /// Returns the (s, t) coordinates of a surface point.
    ///
    /// * `dg` - Differential geometry at the surface point.
    pub fn map(&self, dg: &DifferentialGeometry) -> (Float, Float) {
        (self.su * dg.u + self.du, self.sv * dg.v + self.dv)
    }
}

impl Default for UVMapping {
    fn default() -> Self {
        Self::new(1.0, 1.0, 0.0, 0.0)
    }
}

/// Values at the corners of the unit (s, t) square.
#[derive(Clone, Debug)]
pub struct BilerpTexture<T> {
    /// Value at (0, 0).
    pub v00: T,

    /// Value at (0, 1).
    pub v01: T,

    /// Value at (1, 0).
    pub v10: T,

    /// Value at (1, 1).
    pub v11: T,

    /// (u, v) to (s, t) mapping.
    pub mapping: UVMapping,
}

/// Atomic reference counted `Texture`.
pub type ArcTexture<T> = Arc<Texture<T>>;

/// Map of floating point textures.
pub type FloatTextureMap = HashMap<String, ArcTexture<Float>>;

/// Map of spectrum textures.
pub type SpectrumTextureMap = HashMap<String, ArcTexture<Spectrum>>;

impl<T> Texture<T>
where
    T: Copy + Add<Output = T> + Mul<Float, Output = T>,
{
    /// Evaluate the texture at a surface point.
    ///
    /// * `dg` - Differential geometry at the surface point.
    pub fn evaluate(&self, dg: &DifferentialGeometry) -> T {
        match self {
            Self::Constant(value) => *value,
            Self::Scale(scale, tex) => tex.evaluate(dg) * scale.evaluate(dg),
            Self::Bilerp(b) => {
                let (s, t) = b.mapping.map(dg);
                b.v00 * ((1.0 - s) * (1.0 - t)) + b.v01 * ((1.0 - s) * t) + b.v10 * (s * (1.0 - t)) + b.v11 * (s * t)
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_multiplies_textures() {
        let dg = DifferentialGeometry::default();
        let scale = Arc::new(Texture::Constant(0.5));
        let tex = Texture::Scale(scale, Arc::new(Texture::Constant(Spectrum::from_rgb(1.0, 2.0, 4.0))));
        assert_eq!(tex.evaluate(&dg), Spectrum::from_rgb(0.5, 1.0, 2.0));
        let f = Texture::Scale(Arc::new(Texture::Constant(3.0)), Arc::new(Texture::Constant(2.0)));
        assert_eq!(f.evaluate(&dg), 6.0);
    }

    #[test]
    fn bilerp_interpolates_corners() {
        let tex = Texture::Bilerp(BilerpTexture {
            v00: 0.0,
            v01: 1.0,
            v10: 2.0,
            v11: 5.0,
            mapping: UVMapping::default(),
        });
        let mut dg = DifferentialGeometry::default();
        assert_eq!(tex.evaluate(&dg), 0.0);
        dg.u = 1.0;
        dg.v = 1.0;
        assert_eq!(tex.evaluate(&dg), 5.0);
        dg.u = 0.5;
        dg.v = 0.5;
        assert_eq!(tex.evaluate(&dg), 2.0);

        // Scaled and shifted coordinates.
        let scaled = Texture::Bilerp(BilerpTexture {
            v00: 0.0,
            v01: 0.0,
            v10: 4.0,
            v11: 4.0,
            mapping: UVMapping::new(0.5, 1.0, 0.25, 0.0),
        });
        dg.u = 1.0;
        assert_eq!(scaled.evaluate(&dg), 3.0);
    }
}
