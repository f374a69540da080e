//! BSDF

use super::*;
use crate::interaction::*;
use crate::rng::*;

/// A collection of BRDFs and BTDFs at a surface point, expressed in the
/// shading coordinate system.
///
/// The lifetime specifiers:
/// * `'a` - Shared reference to the shape that was hit.
#[derive(Clone, Debug)]
pub struct BSDF<'a> {
    /// Shading geometry; possibly bump mapped.
    pub dg_shading: DifferentialGeometry<'a>,

    /// Relative index of refraction over the surface boundary.
    pub eta: Float,

    /// Shading normal; the z-axis of the local frame.
    pub nn: Normal3f,

    /// Geometric normal.
    pub ng: Normal3f,

    /// First tangent; the x-axis of the local frame.
    pub sn: Vector3f,

    /// Second tangent; the y-axis of the local frame.
    pub tn: Vector3f,

    /// The lobes.
    bxdfs: Vec<BxDF>,
}

impl<'a> BSDF<'a> {
    /// Creates a new `BSDF`.
    ///
    /// * `dg_shading` - Shading geometry.
    /// * `ng`         - Geometric normal.
    /// * `eta`        - Relative index of refraction; 1 for opaque surfaces.
    pub fn new(dg_shading: &DifferentialGeometry<'a>, ng: Normal3f, eta: Float) -> Self {
        let nn = dg_shading.n;
        let sn = dg_shading.dpdu.normalize();
        Self {
            dg_shading: *dg_shading,
            eta,
            nn,
            ng,
            sn,
            tn: Vector3f::from(nn).cross(&sn),
            bxdfs: Vec::with_capacity(2),
        }
    }

    /// Add a lobe.
    ///
    /// * `bxdf` - The `BxDF`.
    pub fn add(&mut self, bxdf: BxDF) {
        self.bxdfs.push(bxdf);
    }

    /// Returns the lobes.
    pub fn bxdfs(&self) -> &[BxDF] {
        &self.bxdfs
    }

    /// Returns the number of lobes that match `flags`.
    ///
    /// * `flags` - The flags to match.
    pub fn num_components(&self, flags: BxDFType) -> usize {
        self.bxdfs.iter().filter(|b| b.matches_flags(flags)).count()
    }

    /// Transforms a vector from world space to the shading frame.
    ///
    /// * `v` - The vector to transform.
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.sn), v.dot(&self.tn), v.dot(&self.nn))
    }

    /// Transforms a vector from the shading frame to world space.
    ///
    /// * `v` - The vector to transform.
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(
            self.sn.x * v.x + self.tn.x * v.y + self.nn.x * v.z,
            self.sn.y * v.x + self.tn.y * v.y + self.nn.y * v.z,
            self.sn.z * v.x + self.tn.z * v.y + self.nn.z * v.z,
        )
    }

    /// Restrict `flags` to reflection or transmission depending on which side
    /// of the geometric surface the two directions are on.
    fn side_flags(&self, wo_w: &Vector3f, wi_w: &Vector3f, flags: BxDFType) -> BxDFType {
        if wi_w.dot(&self.ng) * wo_w.dot(&self.ng) > 0.0 {
            flags - BxDFType::TRANSMISSION
        } else {
            flags - BxDFType::REFLECTION
        }
    }

    /// Sum of the matching lobes for a pair of local directions.
    fn sum_f(&self, wo: &Vector3f, wi: &Vector3f, flags: BxDFType) -> Spectrum {
        self.bxdfs
            .iter()
            .filter(|b| b.matches_flags(flags))
            .fold(Spectrum::zero(), |acc, b| acc + b.f(wo, wi))
    }

    /// Returns the BSDF evaluated for a pair of world space directions.
    ///
    /// * `wo_w`  - Outgoing direction.
    /// * `wi_w`  - Incident direction.
    /// * `flags` - The lobes to evaluate.
    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f, flags: BxDFType) -> Spectrum {
        let wo = self.world_to_local(wo_w);
        let wi = self.world_to_local(wi_w);
        self.sum_f(&wo, &wi, self.side_flags(wo_w, wi_w, flags))
    }

    /// Sample an incident direction. Returns `None` when no lobe matches or
    /// the sampled density is zero.
    ///
    /// * `wo_w`   - Outgoing direction.
    /// * `sample` - Random values for direction and lobe selection.
    /// * `flags`  - The lobes to sample.
    pub fn sample_f(&self, wo_w: &Vector3f, sample: &BsdfSample, flags: BxDFType) -> Option<BsdfSampleResult> {
        // Choose which lobe to sample.
        let matching = self.num_components(flags);
        if matching == 0 {
            return None;
        }
        let which = min((sample.u_component * matching as Float).floor() as usize, matching - 1);
        let (chosen, bxdf) = self
            .bxdfs
            .iter()
            .enumerate()
            .filter(|(_, b)| b.matches_flags(flags))
            .nth(which)?;

        let wo = self.world_to_local(wo_w);
        let mut result = bxdf.sample_f(&wo, sample.u_dir[0], sample.u_dir[1]);
        if result.pdf == 0.0 {
            return None;
        }
        let wi = result.wi;
        result.wi = self.local_to_world(&wi);

        let specular = result.sampled_type.contains(BxDFType::SPECULAR);
        if !specular && matching > 1 {
            result.pdf += self
                .bxdfs
                .iter()
                .enumerate()
                .filter(|&(i, b)| i != chosen && b.matches_flags(flags))
                .map(|(_, b)| b.pdf(&wo, &wi))
                .sum::<Float>();
        }
        if matching > 1 {
            result.pdf /= matching as Float;
        }

        if !specular {
            result.f = self.sum_f(&wo, &wi, self.side_flags(wo_w, &result.wi, flags));
        }
        Some(result)
    }

    /// Returns the density of sampling `wi_w` with `sample_f`, averaged over
    /// the matching lobes.
    ///
    /// * `wo_w`  - Outgoing direction.
    /// * `wi_w`  - Incident direction.
    /// * `flags` - The lobes to consider.
    pub fn pdf(&self, wo_w: &Vector3f, wi_w: &Vector3f, flags: BxDFType) -> Float {
        let wo = self.world_to_local(wo_w);
        let wi = self.world_to_local(wi_w);
        let (count, pdf) = self
            .bxdfs
            .iter()
            .filter(|b| b.matches_flags(flags))
            .fold((0, 0.0), |(n, p), b| (n + 1, p + b.pdf(&wo, &wi)));
        if count > 0 {
            pdf / count as Float
        } else {
            0.0
        }
    }

    /// Hemispherical-directional reflectance for `wo_w`.
    ///
    /// * `wo_w`         - Outgoing direction.
    /// * `rng`          - Random number generator for the stratified samples.
    /// * `flags`        - The lobes to consider.
    /// * `sqrt_samples` - Square root of the number of samples; 6 is typical.
    pub fn rho_hd(&self, wo_w: &Vector3f, rng: &mut RNG, flags: BxDFType, sqrt_samples: usize) -> Spectrum {
        let n = sqrt_samples * sqrt_samples;
        let mut s1 = vec![0.0; 2 * n];
        stratified_sample_2d(&mut s1, sqrt_samples, sqrt_samples, rng, true);

        let wo = self.world_to_local(wo_w);
        self.bxdfs
            .iter()
            .filter(|b| b.matches_flags(flags))
            .fold(Spectrum::zero(), |acc, b| acc + b.rho_hd(&wo, &s1))
    }

    /// Hemispherical-hemispherical reflectance.
    ///
    /// * `rng`          - Random number generator for the stratified samples.
    /// * `flags`        - The lobes to consider.
    /// * `sqrt_samples` - Square root of the number of samples; 6 is typical.
    pub fn rho_hh(&self, rng: &mut RNG, flags: BxDFType, sqrt_samples: usize) -> Spectrum {
        let n = sqrt_samples * sqrt_samples;
        let mut s1 = vec![0.0; 2 * n];
        stratified_sample_2d(&mut s1, sqrt_samples, sqrt_samples, rng, true);
        let mut s2 = vec![0.0; 2 * n];
        stratified_sample_2d(&mut s2, sqrt_samples, sqrt_samples, rng, true);

        self.bxdfs
            .iter()
            .filter(|b| b.matches_flags(flags))
            .fold(Spectrum::zero(), |acc, b| acc + b.rho_hh(&s1, &s2))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn flat_dg<'a>() -> DifferentialGeometry<'a> {
        DifferentialGeometry::new(
            Point3f::zero(),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Normal3f::zero(),
            Normal3f::zero(),
            0.0,
            0.0,
            None,
        )
    }

    #[test]
    fn lambertian_rho_is_reflectance() {
        let dg = flat_dg();
        let mut bsdf = BSDF::new(&dg, dg.n, 1.0);
        let r = Spectrum::from_rgb(0.25, 0.5, 0.75);
        bsdf.add(Lambertian::new(r));
        let mut rng = RNG::new(0);
        assert_eq!(bsdf.rho_hd(&Vector3f::new(0.0, 0.0, 1.0), &mut rng, BxDFType::ALL, 6), r);
        assert_eq!(bsdf.rho_hh(&mut rng, BxDFType::ALL, 6), r);
    }

    #[test]
    fn f_ignores_transmission_lobes_on_same_side() {
        let dg = flat_dg();
        let mut bsdf = BSDF::new(&dg, dg.n, 1.0);
        bsdf.add(Lambertian::new(Spectrum::one()));
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let above = Vector3f::new(0.0, 0.6, 0.8);
        let below = Vector3f::new(0.0, 0.6, -0.8);
        assert!(approx_eq!(Float, bsdf.f(&wo, &above, BxDFType::ALL)[0], INV_PI, epsilon = 1e-6));
        assert_eq!(bsdf.f(&wo, &below, BxDFType::ALL), Spectrum::zero());
        assert_eq!(bsdf.f(&wo, &above, BxDFType::ALL_TRANSMISSION), Spectrum::zero());
    }

    #[test]
    fn sample_f_without_matching_lobes_is_none() {
        let dg = flat_dg();
        let mut bsdf = BSDF::new(&dg, dg.n, 1.0);
        bsdf.add(Lambertian::new(Spectrum::one()));
        let s = BsdfSample {
            u_dir: [0.3, 0.3],
            u_component: 0.5,
        };
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        assert!(bsdf
            .sample_f(&wo, &s, BxDFType::REFLECTION | BxDFType::SPECULAR)
            .is_none());
        let r = bsdf.sample_f(&wo, &s, BxDFType::ALL).unwrap();
        assert!(r.wi.z > 0.0);
        assert!(approx_eq!(Float, r.pdf, bsdf.pdf(&wo, &r.wi, BxDFType::ALL), epsilon = 1e-6));
    }

    #[test]
    fn mixed_lobes_average_pdf_and_keep_specular_unblended() {
        let dg = flat_dg();
        let mut bsdf = BSDF::new(&dg, dg.n, 1.0);
        bsdf.add(Lambertian::new(Spectrum::new(0.5)));
        bsdf.add(SpecularReflection::new(Spectrum::one(), Fresnel::NoOp));
        let wo = Vector3f::new(0.6, 0.0, 0.8);

        let diffuse = bsdf
            .sample_f(&wo, &BsdfSample { u_dir: [0.2, 0.7], u_component: 0.1 }, BxDFType::ALL)
            .unwrap();
        let expected = abs_cos_theta(&bsdf.world_to_local(&diffuse.wi)) * INV_PI / 2.0;
        assert!(approx_eq!(Float, diffuse.pdf, expected, epsilon = 1e-6));

        let mirror = bsdf
            .sample_f(&wo, &BsdfSample { u_dir: [0.2, 0.7], u_component: 0.9 }, BxDFType::ALL)
            .unwrap();
        assert!(mirror.sampled_type.contains(BxDFType::SPECULAR));
        assert!(approx_eq!(Float, mirror.pdf, 0.5, epsilon = 1e-6));
        assert!(approx_eq!(Float, mirror.f[0], 1.25, epsilon = 1e-5));
    }
}
