//! Common

use super::*;

/// Trace the perfectly specular reflection of `ray` and return the
/// radiance it brings back.
///
/// * `ray`      - The incoming ray.
/// * `bsdf`     - BSDF at the intersection.
/// * `rng`      - Random number generator.
/// * `isect`    - The intersection.
/// * `renderer` - The renderer; traces the child ray.
/// * `scene`    - The scene.
/// * `sample`   - Optional sampler values.
pub fn specular_reflect(
    ray: &Ray,
    bsdf: &BSDF<'_>,
    rng: &mut RNG,
    isect: &Intersection<'_>,
    renderer: &dyn Renderer,
    scene: &Scene,
    sample: Option<&Sample>,
) -> Spectrum {
    let wo = -ray.d;
    let p = bsdf.dg_shading.p;
    let n = bsdf.dg_shading.n;
    let flags = BxDFType::REFLECTION | BxDFType::SPECULAR;
    let Some(BsdfSampleResult { f, wi, pdf, .. }) = bsdf.sample_f(&wo, &BsdfSample::new(rng), flags) else {
        return Spectrum::zero();
    };
    if pdf <= 0.0 || f.is_black() || wi.abs_dot(&n) == 0.0 {
        return Spectrum::zero();
    }

    let mut rd = Ray::spawn(p, wi, ray, isect.ray_epsilon);
    if let Some(diff) = ray.differentials.as_ref() {
        let dgs = &bsdf.dg_shading;
        let dndx = dgs.dndu * dgs.dudx + dgs.dndv * dgs.dvdx;
        let dndy = dgs.dndu * dgs.dudy + dgs.dndv * dgs.dvdy;
        let dwodx = -diff.rx_direction - wo;
        let dwody = -diff.ry_direction - wo;
        let ddndx = dwodx.dot(&n) + wo.dot(&dndx);
        let ddndy = dwody.dot(&n) + wo.dot(&dndy);
        rd.differentials = Some(RayDifferential {
            rx_origin: p + isect.dg.dpdx,
            ry_origin: p + isect.dg.dpdy,
            rx_direction: wi - dwodx + Vector3f::from(dndx * wo.dot(&n) + n * ddndx) * 2.0,
            ry_direction: wi - dwody + Vector3f::from(dndy * wo.dot(&n) + n * ddndy) * 2.0,
        });
    }

    let li = renderer.li(scene, &rd, sample, rng).l;
    f * li * (wi.abs_dot(&n) / pdf)
}

/// Trace the perfectly specular transmission of `ray` and return the
/// radiance it brings back.
///
/// * `ray`      - The incoming ray.
/// * `bsdf`     - BSDF at the intersection.
/// * `rng`      - Random number generator.
/// * `isect`    - The intersection.
/// * `renderer` - The renderer; traces the child ray.
/// * `scene`    - The scene.
/// * `sample`   - Optional sampler values.
pub fn specular_transmit(
    ray: &Ray,
    bsdf: &BSDF<'_>,
    rng: &mut RNG,
    isect: &Intersection<'_>,
    renderer: &dyn Renderer,
    scene: &Scene,
    sample: Option<&Sample>,
) -> Spectrum {
    let wo = -ray.d;
    let p = bsdf.dg_shading.p;
    let n = bsdf.dg_shading.n;
    let flags = BxDFType::TRANSMISSION | BxDFType::SPECULAR;
    let Some(BsdfSampleResult { f, wi, pdf, .. }) = bsdf.sample_f(&wo, &BsdfSample::new(rng), flags) else {
        return Spectrum::zero();
    };
    if pdf <= 0.0 || f.is_black() || wi.abs_dot(&n) == 0.0 {
        return Spectrum::zero();
    }

    let mut rd = Ray::spawn(p, wi, ray, isect.ray_epsilon);
    if let Some(diff) = ray.differentials.as_ref() {
        let dgs = &bsdf.dg_shading;
        let mut eta = bsdf.eta;
        let w = -wo;
        if wo.dot(&n) < 0.0 {
            eta = 1.0 / eta;
        }

        let dndx = dgs.dndu * dgs.dudx + dgs.dndv * dgs.dvdx;
        let dndy = dgs.dndu * dgs.dudy + dgs.dndv * dgs.dvdy;
        let dwodx = -diff.rx_direction - wo;
        let dwody = -diff.ry_direction - wo;
        let ddndx = dwodx.dot(&n) + wo.dot(&dndx);
        let ddndy = dwody.dot(&n) + wo.dot(&dndy);

        let mu = eta * w.dot(&n) - wi.dot(&n);
        let dmu = eta - (eta * eta * w.dot(&n)) / wi.dot(&n);
        let dmudx = dmu * ddndx;
        let dmudy = dmu * ddndy;
        rd.differentials = Some(RayDifferential {
            rx_origin: p + isect.dg.dpdx,
            ry_origin: p + isect.dg.dpdy,
            rx_direction: wi + dwodx * eta - Vector3f::from(dndx * mu + n * dmudx),
            ry_direction: wi + dwody * eta - Vector3f::from(dndy * mu + n * dmudy),
        });
    }

    let li = renderer.li(scene, &rd, sample, rng).l;
    f * li * (wi.abs_dot(&n) / pdf)
}
