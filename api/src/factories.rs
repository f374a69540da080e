//! Factories
//!
//! Map implementation names used by scene description directives to the
//! types that implement them.

use cameras::*;
use filters::*;
use integrators::*;
use lumen_core::accelerators::*;
use lumen_core::camera::*;
use lumen_core::error::*;
use lumen_core::film::*;
use lumen_core::filter::*;
use lumen_core::geometry::*;
use lumen_core::integrator::*;
use lumen_core::light::*;
use lumen_core::material::*;
use lumen_core::paramset::*;
use lumen_core::pbrt::*;
use lumen_core::primitive::*;
use lumen_core::sampler::*;
use lumen_core::shape::*;
use lumen_core::spectrum::*;
use lumen_core::texture::*;
use lumen_core::volume::*;
use samplers::*;
use std::sync::Arc;

/// Creates an aggregate over the given primitives.
///
/// * `name`       - Name.
/// * `params`     - Parameter set.
/// * `primitives` - Primitives.
pub fn make_accelerator(name: &str, params: &ParamSet, primitives: Vec<ArcPrimitive>) -> Result<ArcPrimitive> {
    match name {
        "grid" => {
            let refine_immediately = params.find_one_bool("refineimmediately", false);
            Ok(Arc::new(Primitive::Grid(GridAccel::new(primitives, refine_immediately))))
        }
        _ => Err(Error::unknown("accelerator", name)),
    }
}

/// Creates an area light emitting from the given shape.
///
/// * `name`          - Name.
/// * `_light2world`  - Light to world transformation; the shape carries its own.
/// * `params`        - Parameter set.
/// * `shape`         - The emitting shape.
pub fn make_area_light(name: &str, _light2world: &Transform, params: &ParamSet, shape: Arc<Shape>) -> Result<ArcLight> {
    match name {
        "area" | "diffuse" => Ok(Arc::new(Light::DiffuseArea(DiffuseAreaLight::from((params, shape))))),
        _ => Err(Error::unknown("area light", name)),
    }
}

/// Creates a camera.
///
/// * `name`      - Name.
/// * `params`    - Parameter set.
/// * `cam2world` - Animated camera to world transformation.
/// * `film`      - The film.
pub fn make_camera(name: &str, params: &ParamSet, cam2world: &AnimatedTransform, film: Arc<ImageFilm>) -> Result<ArcCamera> {
    match name {
        "perspective" => Ok(Arc::new(PerspectiveCamera::try_from((params, cam2world, film))?)),
        _ => Err(Error::unknown("camera", name)),
    }
}

/// Creates a film.
///
/// * `name`   - Name.
/// * `params` - Parameter set.
/// * `filter` - Reconstruction filter.
pub fn make_film(name: &str, params: &ParamSet, filter: ArcFilter) -> Result<Arc<ImageFilm>> {
    match name {
        "image" => Ok(Arc::new(ImageFilm::from((params, filter)))),
        _ => Err(Error::unknown("film", name)),
    }
}

/// Creates a reconstruction filter.
///
/// * `name`   - Name.
/// * `params` - Parameter set.
pub fn make_filter(name: &str, params: &ParamSet) -> Result<ArcFilter> {
    match name {
        "box" => Ok(Arc::new(BoxFilter::from(params))),
        "mitchell" => Ok(Arc::new(MitchellFilter::from(params))),
        "triangle" => Ok(Arc::new(TriangleFilter::from(params))),
        _ => Err(Error::unknown("filter", name)),
    }
}

/// Creates a light source.
///
/// * `name`        - Name.
/// * `light2world` - Light to world transformation.
/// * `params`      - Parameter set.
pub fn make_light(name: &str, light2world: &Transform, params: &ParamSet) -> Result<ArcLight> {
    match name {
        "point" => Ok(Arc::new(Light::Point(PointLight::from((params, *light2world))))),
        "distant" => Ok(Arc::new(Light::Distant(DistantLight::from((params, *light2world))))),
        _ => Err(Error::unknown("light", name)),
    }
}

/// Creates a material.
///
/// * `name` - Name.
/// * `tp`   - Texture parameters.
pub fn make_material(name: &str, tp: &TextureParams) -> Result<ArcMaterial> {
    let material = match name {
        "matte" => Material::Matte(MatteMaterial::try_from(tp)?),
        "mirror" => Material::Mirror(MirrorMaterial::try_from(tp)?),
        "glass" => Material::Glass(GlassMaterial::try_from(tp)?),
        _ => return Err(Error::unknown("material", name)),
    };
    Ok(Arc::new(material))
}

/// Creates a sampler over the film's sample extent.
///
/// * `name`          - Name.
/// * `params`        - Parameter set.
/// * `extent`        - Film sample extent.
/// * `shutter_open`  - Time the shutter opens.
/// * `shutter_close` - Time the shutter closes.
pub fn make_sampler(
    name: &str,
    params: &ParamSet,
    extent: &FilmExtent,
    shutter_open: Float,
    shutter_close: Float,
) -> Result<Box<dyn Sampler>> {
    match name {
        "stratified" => Ok(Box::new(StratifiedSampler::from((
            params,
            extent,
            shutter_open,
            shutter_close,
        )))),
        _ => Err(Error::unknown("sampler", name)),
    }
}

/// Creates a shape.
///
/// * `name`                - Name.
/// * `object2world`        - Object to world transformation.
/// * `reverse_orientation` - Reverse surface normal directions.
/// * `params`              - Parameter set.
pub fn make_shape(name: &str, object2world: &Transform, reverse_orientation: bool, params: &ParamSet) -> Result<Arc<Shape>> {
    let p = (params, *object2world, reverse_orientation);
    let shape = match name {
        "sphere" => Shape::Sphere(Sphere::from(p)),
        "disk" => Shape::Disk(Disk::from(p)),
        "cylinder" => Shape::Cylinder(Cylinder::from(p)),
        "trianglemesh" => Shape::TriangleMesh(Arc::new(TriangleMesh::try_from(p)?)),
        _ => return Err(Error::unknown("shape", name)),
    };
    Ok(Arc::new(shape))
}

/// Creates a surface integrator.
///
/// * `name`   - Name.
/// * `params` - Parameter set.
pub fn make_surface_integrator(name: &str, params: &ParamSet) -> Result<Box<dyn SurfaceIntegrator>> {
    match name {
        "whitted" => Ok(Box::new(WhittedIntegrator::from(params))),
        _ => Err(Error::unknown("surface integrator", name)),
    }
}

/// Creates a volume integrator.
///
/// * `name`   - Name.
/// * `params` - Parameter set.
pub fn make_volume_integrator(name: &str, params: &ParamSet) -> Result<Box<dyn VolumeIntegrator>> {
    match name {
        "emission" => Ok(Box::new(EmissionIntegrator::from(params))),
        _ => Err(Error::unknown("volume integrator", name)),
    }
}

/// Creates a volume region.
///
/// * `name`         - Name.
/// * `volume2world` - Volume to world transformation.
/// * `params`       - Parameter set.
pub fn make_volume_region(name: &str, volume2world: &Transform, params: &ParamSet) -> Result<VolumeRegion> {
    match name {
        "homogeneous" => Ok(VolumeRegion::Homogeneous(HomogeneousVolume::from((params, volume2world)))),
        _ => Err(Error::unknown("volume region", name)),
    }
}

/// Creates a float texture.
///
/// * `name` - Name of the texture class.
/// * `tp`   - Texture parameters.
pub fn make_float_texture(name: &str, tp: &TextureParams) -> Result<ArcTexture<Float>> {
    match name {
        "constant" => Ok(Arc::new(Texture::Constant(tp.find_float("value", 1.0)))),
        "scale" => Ok(Arc::new(Texture::Scale(
            tp.get_float_texture("tex1", 1.0)?,
            tp.get_float_texture("tex2", 1.0)?,
        ))),
        "bilerp" => Ok(Arc::new(Texture::Bilerp(BilerpTexture {
            v00: tp.find_float("v00", 0.0),
            v01: tp.find_float("v01", 1.0),
            v10: tp.find_float("v10", 0.0),
            v11: tp.find_float("v11", 1.0),
            mapping: uv_mapping(tp),
        }))),
        _ => Err(Error::unknown("float texture class", name)),
    }
}

/// Creates a spectrum texture.
///
/// * `name` - Name of the texture class.
/// * `tp`   - Texture parameters.
pub fn make_spectrum_texture(name: &str, tp: &TextureParams) -> Result<ArcTexture<Spectrum>> {
    match name {
        "constant" => Ok(Arc::new(Texture::Constant(tp.find_spectrum("value", Spectrum::one())))),
        "scale" => Ok(Arc::new(Texture::Scale(
            tp.get_float_texture("tex1", 1.0)?,
            tp.get_spectrum_texture("tex2", Spectrum::one())?,
        ))),
        "bilerp" => Ok(Arc::new(Texture::Bilerp(BilerpTexture {
            v00: tp.find_spectrum("v00", Spectrum::zero()),
            v01: tp.find_spectrum("v01", Spectrum::one()),
            v10: tp.find_spectrum("v10", Spectrum::zero()),
            v11: tp.find_spectrum("v11", Spectrum::one()),
            mapping: uv_mapping(tp),
        }))),
        _ => Err(Error::unknown("spectrum texture class", name)),
    }
}

/// Reads the (u, v) mapping parameters of a texture.
///
/// * `tp` - Texture parameters.
fn uv_mapping(tp: &TextureParams) -> UVMapping {
    let mapping = tp.find_string("mapping", String::from("uv"));
    if mapping != "uv" {
        warn!("2D texture mapping '{}' unknown, using 'uv'", mapping);
    }
    UVMapping::new(
        tp.find_float("uscale", 1.0),
        tp.find_float("vscale", 1.0),
        tp.find_float("udelta", 0.0),
        tp.find_float("vdelta", 0.0),
    )
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_reported() {
        let ps = ParamSet::new();
        let err = make_filter("gaussian", &ps).err();
        assert_eq!(err, Some(Error::unknown("filter", "gaussian")));
        assert!(make_shape("hyperboloid", &Transform::identity(), false, &ps).is_err());
        assert!(make_light("spot", &Transform::identity(), &ps).is_err());
        assert!(make_accelerator("bvh", &ps, vec![]).is_err());
    }

    #[test]
    fn scale_texture_multiplies_named_textures() {
        let mut floats = FloatTextureMap::new();
        floats.insert(String::from("half"), Arc::new(Texture::Constant(0.5)));
        let spectra = SpectrumTextureMap::new();

        let mut ps = ParamSet::new();
        ps.add_texture("tex1", &[String::from("half")]);
        ps.add_rgb_spectrum("tex2", &[2.0, 4.0, 8.0]);
        let tp = TextureParams::new(&ps, &ps, &floats, &spectra);
        let tex = make_spectrum_texture("scale", &tp).expect("scale texture");
        let dg = lumen_core::interaction::DifferentialGeometry::default();
        assert_eq!(tex.evaluate(&dg), Spectrum::from_rgb(1.0, 2.0, 4.0));
    }

    #[test]
    fn bilerp_texture_reads_corners_and_mapping() {
        let floats = FloatTextureMap::new();
        let spectra = SpectrumTextureMap::new();
        let mut ps = ParamSet::new();
        ps.add_float("v10", &[2.0]);
        ps.add_float("v11", &[2.0]);
        ps.add_float("v01", &[0.0]);
        ps.add_float("uscale", &[0.5]);
        let empty = ParamSet::new();
        let tp = TextureParams::new(&ps, &empty, &floats, &spectra);
        let tex = make_float_texture("bilerp", &tp).expect("bilerp texture");
        let mut dg = lumen_core::interaction::DifferentialGeometry::default();
        dg.u = 1.0;
        assert_eq!(tex.evaluate(&dg), 1.0);
    }

    #[test]
    fn missing_named_texture_is_an_error() {
        let floats = FloatTextureMap::new();
        let spectra = SpectrumTextureMap::new();
        let mut ps = ParamSet::new();
        ps.add_texture("Kd", &[String::from("nowhere")]);
        let tp = TextureParams::new(&ps, &ps, &floats, &spectra);
        assert_eq!(
            make_material("matte", &tp).err(),
            Some(Error::unknown("spectrum texture", "nowhere"))
        );
    }
}
