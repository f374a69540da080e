//! Render Options

use crate::factories::*;
use crate::TransformSet;
use lumen_core::camera::*;
use lumen_core::error::*;
use lumen_core::light::*;
use lumen_core::paramset::*;
use lumen_core::pbrt::*;
use lumen_core::primitive::*;
use lumen_core::renderer::*;
use lumen_core::scene::*;
use lumen_core::volume::*;
use std::collections::HashMap;

/// Options set before `WorldBegin` together with the lights, primitives and
/// volumes collected inside the world block.
pub struct RenderOptions {
    /// Time of the first transformation.
    pub transform_start_time: Float,

    /// Time of the second transformation.
    pub transform_end_time: Float,

    /// Reconstruction filter name.
    pub filter_name: String,

    /// Reconstruction filter parameters.
    pub filter_params: ParamSet,

    /// Film name.
    pub film_name: String,

    /// Film parameters.
    pub film_params: ParamSet,

    /// Sampler name.
    pub sampler_name: String,

    /// Sampler parameters.
    pub sampler_params: ParamSet,

    /// Accelerator name.
    pub accelerator_name: String,

    /// Accelerator parameters.
    pub accelerator_params: ParamSet,

    /// Renderer name.
    pub renderer_name: String,

    /// Renderer parameters.
    pub renderer_params: ParamSet,

    /// Surface integrator name.
    pub surface_integrator_name: String,

    /// Surface integrator parameters.
    pub surface_integrator_params: ParamSet,

    /// Volume integrator name.
    pub volume_integrator_name: String,

    /// Volume integrator parameters.
    pub volume_integrator_params: ParamSet,

    /// Camera name.
    pub camera_name: String,

    /// Camera parameters.
    pub camera_params: ParamSet,

    /// Camera to world transformations.
    pub camera_to_world: TransformSet,

    /// Lights.
    pub lights: Vec<ArcLight>,

    /// Primitives.
    pub primitives: Vec<ArcPrimitive>,

    /// Volume regions.
    pub volume_regions: Vec<VolumeRegion>,

    /// Object instances by name.
    pub instances: HashMap<String, Vec<ArcPrimitive>>,

    /// Name of the instance being defined.
    pub current_instance: Option<String>,
}

impl RenderOptions {
    /// Build the scene from the collected primitives, lights and volumes.
    pub fn make_scene(&mut self) -> Result<Scene> {
        let volume_region = match self.volume_regions.len() {
            0 => None,
            1 => self.volume_regions.pop(),
            _ => Some(VolumeRegion::Aggregate(AggregateVolume::new(std::mem::take(
                &mut self.volume_regions,
            )))),
        };

        let primitives = std::mem::take(&mut self.primitives);
        let accelerator = make_accelerator(&self.accelerator_name, &self.accelerator_params, primitives)?;
        self.accelerator_params.report_unused();

        let lights = std::mem::take(&mut self.lights);
        info!("Scene has {} lights", lights.len());
        Ok(Scene::new(accelerator, lights, volume_region))
    }

    /// Build the renderer with its camera, film, sampler and integrators.
    ///
    /// * `n_threads` - Number of worker threads; 0 uses all cores.
    /// * `quiet`     - Hide the progress bar.
    pub fn make_renderer(&self, n_threads: usize, quiet: bool) -> Result<SamplerRenderer> {
        if self.renderer_name != "sampler" {
            return Err(Error::unknown("renderer", &self.renderer_name));
        }

        let filter = make_filter(&self.filter_name, &self.filter_params)?;
        let film = make_film(&self.film_name, &self.film_params, filter)?;
        let cam2world = self
            .camera_to_world
            .animated(self.transform_start_time, self.transform_end_time);
        let camera = make_camera(&self.camera_name, &self.camera_params, &cam2world, film)?;

        let data = camera.data();
        let sampler = make_sampler(
            &self.sampler_name,
            &self.sampler_params,
            &data.film.get_sample_extent(),
            data.shutter_open,
            data.shutter_close,
        )?;
        let surface_integrator = make_surface_integrator(&self.surface_integrator_name, &self.surface_integrator_params)?;
        let volume_integrator = make_volume_integrator(&self.volume_integrator_name, &self.volume_integrator_params)?;

        for params in [
            &self.filter_params,
            &self.film_params,
            &self.camera_params,
            &self.sampler_params,
            &self.surface_integrator_params,
            &self.volume_integrator_params,
            &self.renderer_params,
        ] {
            params.report_unused();
        }

        Ok(SamplerRenderer::new(
            sampler,
            camera,
            surface_integrator,
            volume_integrator,
            n_threads,
            quiet,
        ))
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            transform_start_time: 0.0,
            transform_end_time: 1.0,
            filter_name: String::from("box"),
            filter_params: ParamSet::new(),
            film_name: String::from("image"),
            film_params: ParamSet::new(),
            sampler_name: String::from("stratified"),
            sampler_params: ParamSet::new(),
            accelerator_name: String::from("grid"),
            accelerator_params: ParamSet::new(),
            renderer_name: String::from("sampler"),
            renderer_params: ParamSet::new(),
            surface_integrator_name: String::from("whitted"),
            surface_integrator_params: ParamSet::new(),
            volume_integrator_name: String::from("emission"),
            volume_integrator_params: ParamSet::new(),
            camera_name: String::from("perspective"),
            camera_params: ParamSet::new(),
            camera_to_world: TransformSet::default(),
            lights: vec![],
            primitives: vec![],
            volume_regions: vec![],
            instances: HashMap::new(),
            current_instance: None,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::geometry::*;

    fn unit_volume() -> VolumeRegion {
        make_volume_region("homogeneous", &Transform::identity(), &ParamSet::new()).expect("volume")
    }

    #[test]
    fn volume_regions_are_aggregated() {
        let mut ro = RenderOptions::default();
        assert!(ro.make_scene().expect("scene").volume_region.is_none());

        let mut ro = RenderOptions::default();
        ro.volume_regions.push(unit_volume());
        let scene = ro.make_scene().expect("scene");
        assert!(matches!(scene.volume_region, Some(VolumeRegion::Homogeneous(_))));

        let mut ro = RenderOptions::default();
        ro.volume_regions.push(unit_volume());
        ro.volume_regions.push(unit_volume());
        let scene = ro.make_scene().expect("scene");
        match scene.volume_region {
            Some(VolumeRegion::Aggregate(a)) => assert_eq!(a.regions.len(), 2),
            _ => panic!("expected an aggregate volume"),
        }
    }

    #[test]
    fn unknown_renderer_is_rejected() {
        let ro = RenderOptions {
            renderer_name: String::from("metropolis"),
            ..Default::default()
        };
        assert_eq!(
            ro.make_renderer(1, true).err(),
            Some(Error::unknown("renderer", "metropolis"))
        );
    }

    #[test]
    fn defaults_build_a_renderer() {
        let ro = RenderOptions::default();
        let renderer = ro.make_renderer(2, true).expect("renderer");
        assert_eq!(renderer.camera().film().x_resolution, 640);
        assert_eq!(renderer.camera().film().y_resolution, 480);
    }
}
