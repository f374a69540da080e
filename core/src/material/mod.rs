//! Materials

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::texture::*;
use std::fmt;
use std::sync::Arc;

mod glass;
mod matte;
mod mirror;

// Re-export
pub use glass::*;
pub use matte::*;
pub use mirror::*;

/// Surface materials.
#[derive(Clone, Debug)]
pub enum Material {
    /// Diffuse surfaces.
    Matte(MatteMaterial),

    /// Perfect mirrors.
    Mirror(MirrorMaterial),

    /// Clear dielectrics that reflect and refract.
    Glass(GlassMaterial),
}

impl Material {
    /// Returns the BSDF for a hit.
    ///
    /// * `dg_geom`    - True geometry at the hit.
    /// * `dg_shading` - Shading geometry at the hit.
    pub fn get_bsdf<'a>(&self, dg_geom: &DifferentialGeometry<'a>, dg_shading: &DifferentialGeometry<'a>) -> BSDF<'a> {
        match self {
            Self::Matte(m) => m.get_bsdf(dg_geom, dg_shading),
            Self::Mirror(m) => m.get_bsdf(dg_geom, dg_shading),
            Self::Glass(m) => m.get_bsdf(dg_geom, dg_shading),
        }
    }

    /// Returns the shading geometry with the optional bump map applied.
    ///
    /// * `bump_map`   - Optional displacement texture.
    /// * `dg_geom`    - True geometry at the hit.
    /// * `dg_shading` - Shading geometry at the hit.
    pub(crate) fn shading_geometry<'a>(
        bump_map: &Option<ArcTexture<Float>>,
        dg_geom: &DifferentialGeometry<'a>,
        dg_shading: &DifferentialGeometry<'a>,
    ) -> DifferentialGeometry<'a> {
        match bump_map {
            Some(d) => bump(d, dg_geom, dg_shading),
            None => *dg_shading,
        }
    }
}

impl fmt::Display for Material {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matte(_) => write!(f, "matte"),
            Self::Mirror(_) => write!(f, "mirror"),
            Self::Glass(_) => write!(f, "glass"),
        }
    }
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<Material>;

/// Perturb the shading geometry by a scalar displacement texture using
/// forward differences in u and v.
///
/// * `d`   - Displacement texture.
/// * `dgg` - True geometry at the hit.
/// * `dgs` - Shading geometry at the hit.
pub fn bump<'a>(
    d: &Texture<Float>,
    dgg: &DifferentialGeometry<'a>,
    dgs: &DifferentialGeometry<'a>,
) -> DifferentialGeometry<'a> {
    let ns = Normal3f::from(dgs.dpdu.cross(&dgs.dpdv));
    let mut dg_eval = *dgs;

    // Shift in the u direction.
    let mut du = 0.5 * (abs(dgs.dudx) + abs(dgs.dudy));
    if du == 0.0 {
        du = 0.01;
    }
    dg_eval.p = dgs.p + dgs.dpdu * du;
    dg_eval.u = dgs.u + du;
    dg_eval.n = (ns + dgs.dndu * du).normalize();
    let u_displace = d.evaluate(&dg_eval);

    // Shift in the v direction.
    let mut dv = 0.5 * (abs(dgs.dvdx) + abs(dgs.dvdy));
    if dv == 0.0 {
        dv = 0.01;
    }
    dg_eval.p = dgs.p + dgs.dpdv * dv;
    dg_eval.u = dgs.u;
    dg_eval.v = dgs.v + dv;
    dg_eval.n = (ns + dgs.dndv * dv).normalize();
    let v_displace = d.evaluate(&dg_eval);
    let displace = d.evaluate(dgs);

    let n = Vector3f::from(dgs.n);
    let mut dg_bump = *dgs;
    dg_bump.dpdu = dgs.dpdu + n * ((u_displace - displace) / du) + Vector3f::from(dgs.dndu) * displace;
    dg_bump.dpdv = dgs.dpdv + n * ((v_displace - displace) / dv) + Vector3f::from(dgs.dndv) * displace;
    dg_bump.n = Normal3f::from(dg_bump.dpdu.cross(&dg_bump.dpdv).normalize());
    if let Some(data) = dgs.shape.map(|s| s.data()) {
        if data.reverse_orientation ^ data.transform_swaps_handedness {
            dg_bump.n = -dg_bump.n;
        }
    }

    // Orient shading normal to match geometric normal.
    dg_bump.n = dg_bump.n.face_forward(&dgg.n);
    dg_bump
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::*;
    use float_cmp::*;

    fn flat_dg<'a>() -> DifferentialGeometry<'a> {
        DifferentialGeometry::new(
            Point3f::zero(),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Normal3f::zero(),
            Normal3f::zero(),
            0.5,
            0.5,
            None,
        )
    }

    #[test]
    fn constant_bump_keeps_normal() {
        let dg = flat_dg();
        let d = Texture::Constant(0.25);
        let bumped = bump(&d, &dg, &dg);
        assert!(approx_eq!(Float, bumped.n.z, 1.0, epsilon = 1e-6));
        assert_eq!(bumped.p, dg.p);
    }

    #[test]
    fn linear_bump_tilts_normal() {
        // d(u, v) = a u + b v, so the bumped normal is (-a, -b, 1) normalized.
        let (a, b): (Float, Float) = (0.5, -0.25);
        let d = Texture::Bilerp(BilerpTexture {
            v00: 0.0,
            v01: b,
            v10: a,
            v11: a + b,
            mapping: UVMapping::default(),
        });
        let len = (1.0 + a * a + b * b).sqrt();

        let mut dg = flat_dg();
        for (dudx, dvdy) in [(0.0, 0.0), (0.2, 0.05)] {
            dg.dudx = dudx;
            dg.dudy = dudx;
            dg.dvdx = dvdy;
            dg.dvdy = dvdy;
            let bumped = bump(&d, &dg, &dg);
            assert!(approx_eq!(Float, bumped.n.x, -a / len, epsilon = 1e-4));
            assert!(approx_eq!(Float, bumped.n.y, -b / len, epsilon = 1e-4));
            assert!(approx_eq!(Float, bumped.n.z, 1.0 / len, epsilon = 1e-4));
            assert!(approx_eq!(Float, bumped.dpdu.z, a, epsilon = 1e-4));
            assert!(approx_eq!(Float, bumped.dpdv.z, b, epsilon = 1e-4));
            assert_eq!(bumped.p, dg.p);
        }
    }

    #[test]
    fn bumped_normal_faces_geometric_normal() {
        let mut dg = flat_dg();
        dg.dpdv = Vector3f::new(0.0, -1.0, 0.0);
        let geom = flat_dg();
        let bumped = bump(&Texture::Constant(0.0), &geom, &dg);
        assert!(bumped.n.z > 0.0);
    }

    #[test]
    fn matte_with_black_kd_has_no_lobes() {
        let dg = flat_dg();
        let m = Material::Matte(MatteMaterial::new(
            Arc::new(Texture::Constant(Spectrum::zero())),
            Arc::new(Texture::Constant(0.0)),
            None,
        ));
        assert_eq!(m.get_bsdf(&dg, &dg).num_components(BxDFType::ALL), 0);
    }
}
