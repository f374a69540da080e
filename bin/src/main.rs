#[macro_use]
extern crate log;

use api::*;
use clap::Parser;
use lumen_core::geometry::*;
use lumen_core::paramset::*;
use lumen_core::pbrt::*;
use lumen_core::renderer::*;
use std::error::Error;
use std::process::ExitCode;

/// Command line options.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
struct Options {
    /// Number of threads to use for rendering.
    #[clap(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 0,
        help = "Use specified number of threads for rendering; 0 uses all cores."
    )]
    n_threads: usize,

    /// Path to the image file.
    #[clap(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        default_value = "lumen.png",
        help = "Write the final image to the given filename."
    )]
    image_file: String,

    /// Horizontal resolution.
    #[clap(long = "xres", value_name = "NUM", default_value_t = 400)]
    x_resolution: Int,

    /// Vertical resolution.
    #[clap(long = "yres", value_name = "NUM", default_value_t = 400)]
    y_resolution: Int,

    /// Samples per pixel along each axis.
    #[clap(long = "spp", value_name = "NUM", default_value_t = 2)]
    samples_per_axis: Int,

    /// Maximum specular recursion depth.
    #[clap(long = "maxdepth", value_name = "NUM", default_value_t = 5)]
    max_depth: Int,

    /// Suppress all text output other than error messages.
    #[clap(long, help = "Suppress all text output other than error messages.")]
    quiet: bool,
}

fn main() -> ExitCode {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    match render(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Describe the demo scene through the API and render it.
///
/// * `options` - Command line options.
fn render(options: &Options) -> Result<(), Box<dyn Error>> {
    let mut api = Api::new(options.n_threads, options.quiet);
    describe_scene(&mut api, options)?;
    let (scene, renderer) = api.world_end()?;

    info!("Writing image to '{}'", options.image_file);
    renderer.render(&scene, &CancellationToken::new())?;
    Ok(())
}

/// A blue sphere over a floor, lit by a point light.
///
/// * `api`     - The API.
/// * `options` - Command line options.
fn describe_scene(api: &mut Api, options: &Options) -> Result<(), ApiError> {
    let mut filter = ParamSet::new();
    filter.add_float("B", &[1.0 / 3.0]);
    filter.add_float("C", &[1.0 / 3.0]);
    api.pixel_filter("mitchell", &filter)?;

    let mut film = ParamSet::new();
    film.add_int("xresolution", &[options.x_resolution]);
    film.add_int("yresolution", &[options.y_resolution]);
    film.add_string("filename", &[options.image_file.clone()]);
    api.film("image", &film)?;

    let mut sampler = ParamSet::new();
    sampler.add_int("xsamples", &[options.samples_per_axis]);
    sampler.add_int("ysamples", &[options.samples_per_axis]);
    sampler.add_bool("jitter", &[false]);
    api.sampler("stratified", &sampler)?;

    let mut integrator = ParamSet::new();
    integrator.add_int("maxdepth", &[options.max_depth]);
    api.surface_integrator("whitted", &integrator)?;

    api.look_at(
        Point3f::new(15.0, 7.5, -15.0),
        Point3f::zero(),
        Vector3f::new(0.0, 1.0, 0.0),
    )?;
    let mut camera = ParamSet::new();
    camera.add_float("fov", &[60.0]);
    api.camera("perspective", &camera)?;

    api.world_begin()?;

    let mut light = ParamSet::new();
    light.add_point3f("from", &[Point3f::new(0.0, 20.0, -20.0)]);
    light.add_rgb_spectrum("I", &[1200.0, 1200.0, 1200.0]);
    api.light_source("point", &light)?;

    api.attribute_begin()?;
    let mut blue = ParamSet::new();
    blue.add_rgb_spectrum("Kd", &[1.0, 1.5, 3.0]);
    api.material("matte", &blue)?;
    let mut sphere = ParamSet::new();
    sphere.add_float("radius", &[6.0]);
    api.shape("sphere", &sphere)?;
    api.attribute_end()?;

    api.attribute_begin()?;
    api.rotate(-90.0, 1.0, 0.0, 0.0)?;
    let mut floor = ParamSet::new();
    floor.add_float("height", &[-6.0]);
    floor.add_float("radius", &[40.0]);
    api.shape("disk", &floor)?;
    api.attribute_end()
}
