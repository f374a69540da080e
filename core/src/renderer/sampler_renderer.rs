//! Sampler Renderer

use super::*;
use crate::camera::*;
use crate::integrator::*;
use crate::pbrt::*;
use std::thread;

/// Renders by splitting the image into tasks, each driven by a sub-sampler
/// of the main sampler.
pub struct SamplerRenderer {
    /// The sampler; only used to create per-task sub-samplers.
    sampler: Box<dyn Sampler>,

    /// The camera and, through it, the film.
    camera: ArcCamera,

    /// Radiance at surfaces.
    surface_integrator: Box<dyn SurfaceIntegrator>,

    /// Effect of participating media.
    volume_integrator: Box<dyn VolumeIntegrator>,

    /// Number of worker threads.
    n_threads: usize,

    /// Hide the progress bar.
    quiet: bool,

    /// Fixed number of tasks, overriding the thread and pixel based count.
    n_tasks: Option<usize>,
}

impl SamplerRenderer {
    /// Create a new `SamplerRenderer`.
    ///
    /// * `sampler`            - The sampler.
    /// * `camera`             - The camera.
    /// * `surface_integrator` - The surface integrator.
    /// * `volume_integrator`  - The volume integrator.
    /// * `n_threads`          - Number of worker threads; 0 uses all cores.
    /// * `quiet`              - Hide the progress bar.
    pub fn new(
        sampler: Box<dyn Sampler>,
        camera: ArcCamera,
        surface_integrator: Box<dyn SurfaceIntegrator>,
        volume_integrator: Box<dyn VolumeIntegrator>,
        n_threads: usize,
        quiet: bool,
    ) -> Self {
        let n_threads = if n_threads == 0 {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        } else {
            n_threads
        };
        Self {
            sampler,
            camera,
            surface_integrator,
            volume_integrator,
            n_threads,
            quiet,
            n_tasks: None,
        }
    }

    /// Split the image into exactly `n_tasks` tasks. A single task renders
    /// the whole sample extent with one sub-sampler.
    ///
    /// * `n_tasks` - Number of tasks; at least 1.
    pub fn with_task_count(mut self, n_tasks: usize) -> Self {
        self.n_tasks = Some(n_tasks.max(1));
        self
    }

    /// Returns the camera.
    pub fn camera(&self) -> &ArcCamera {
        &self.camera
    }

    /// Returns the number of tasks to split the image into.
    pub fn task_count(&self) -> usize {
        if let Some(n_tasks) = self.n_tasks {
            return n_tasks;
        }
        let film = self.camera.film();
        let n_pixels = film.x_resolution * film.y_resolution;
        round_up_pow2(max(32 * self.n_threads, n_pixels / (16 * 16)))
    }

    /// Render one task's region. Stops early when cancelled.
    ///
    /// * `scene`    - The scene.
    /// * `template` - Sample with the integrators' array layout.
    /// * `task`     - Task index; seeds the task's random numbers.
    /// * `sampler`  - Sub-sampler for the task's region.
    /// * `cancel`   - Cancellation token.
    fn run_task(
        &self,
        scene: &Scene,
        template: &Sample,
        task: usize,
        mut sampler: Box<dyn Sampler>,
        cancel: &CancellationToken,
    ) {
        let film = self.camera.film();
        let data = *sampler.data();
        debug!(
            "Starting task {} ({}..{}, {}..{})",
            task, data.x_start, data.x_end, data.y_start, data.y_end
        );

        let mut rng = RNG::new(task as u64);
        let max_samples = sampler.maximum_sample_count();
        let mut samples = template.duplicate(max_samples);
        let mut rays: Vec<Ray> = Vec::with_capacity(max_samples);
        let mut ls: Vec<Spectrum> = Vec::with_capacity(max_samples);
        let inv_sqrt_spp = 1.0 / (data.samples_per_pixel as Float).sqrt();

        while !cancel.is_cancelled() {
            let sample_count = sampler.get_more_samples(&mut samples, &mut rng);
            if sample_count == 0 {
                break;
            }

            rays.clear();
            ls.clear();
            for sample in samples[..sample_count].iter() {
                let (mut ray, ray_weight) = self.camera.generate_ray_differential(&sample.camera);
                ray.scale_differentials(inv_sqrt_spp);

                let mut l = if ray_weight > 0.0 {
                    ray_weight * self.li(scene, &ray, Some(sample), &mut rng).l
                } else {
                    Spectrum::zero()
                };

                // Issue warning if unexpected radiance value returned.
                if l.has_nans() {
                    error!(
                        "Not-a-number radiance value returned for image sample ({}, {}). Setting to black.",
                        sample.camera.image_x, sample.camera.image_y
                    );
                    l = Spectrum::zero();
                } else if l.y() < -1e-5 {
                    error!(
                        "Negative luminance value, {}, returned for image sample ({}, {}). Setting to black.",
                        l.y(),
                        sample.camera.image_x,
                        sample.camera.image_y
                    );
                    l = Spectrum::zero();
                } else if l.y().is_infinite() {
                    error!(
                        "Infinite luminance value returned for image sample ({}, {}). Setting to black.",
                        sample.camera.image_x, sample.camera.image_y
                    );
                    l = Spectrum::zero();
                }

                rays.push(ray);
                ls.push(l);
            }

            // Report sample results to the sampler and add contributions to
            // the image.
            if sampler.report_results(&samples[..sample_count], &rays, &ls) {
                for (sample, l) in samples[..sample_count].iter().zip(ls.iter()) {
                    film.add_sample(&sample.camera, l);
                }
            }
        }

        film.update_display(data.x_start, data.y_start, data.x_end + 1, data.y_end + 1, 1.0);
        debug!("Finished task {}", task);
    }
}

impl Renderer for SamplerRenderer {
    fn render(&self, scene: &Scene, cancel: &CancellationToken) -> Result<(), RenderError> {
        // Allow integrators to do preprocessing for the scene.
        self.surface_integrator.preprocess(scene, self.camera.as_ref(), self);
        self.volume_integrator.preprocess(scene, self.camera.as_ref(), self);

        let template = Sample::new(
            self.sampler.as_ref(),
            Some(self.surface_integrator.as_ref()),
            Some(self.volume_integrator.as_ref()),
            scene,
        );

        let n_tasks = self.task_count();
        info!("Rendering {} tasks on {} threads", n_tasks, self.n_threads);

        let progress = create_progress_reporter(n_tasks as u64 + 1, self.quiet);
        progress.set_message("Rendering scene");

        let panicked = thread::scope(|scope| {
            let (tx, rx) = crossbeam_channel::bounded::<(usize, Box<dyn Sampler>)>(self.n_threads);

            // Spawn worker threads.
            let workers: Vec<_> = (0..self.n_threads)
                .map(|_| {
                    let rxc = rx.clone();
                    let progress = &progress;
                    let template = &template;
                    scope.spawn(move || {
                        for (task, sampler) in rxc.iter() {
                            self.run_task(scene, template, task, sampler, cancel);
                            progress.inc(1);
                        }
                    })
                })
                .collect();
            drop(rx); // Drop extra rx since we've cloned one for each worker.

            // Send work, last task first.
            for task in (0..n_tasks).rev() {
                if cancel.is_cancelled() {
                    break;
                }
                if let Some(sampler) = self.sampler.get_sub_sampler(task, n_tasks) {
                    if tx.send((task, sampler)).is_err() {
                        break;
                    }
                } else {
                    progress.inc(1);
                }
            }
            drop(tx);

            workers.into_iter().map(|w| w.join()).filter(|r| r.is_err()).count()
        });

        if panicked > 0 {
            progress.abandon_with_message("Render failed");
            return Err(RenderError::Failed(format!("{} render worker(s) panicked", panicked)));
        }
        if cancel.is_cancelled() {
            warn!("Render cancelled");
            progress.abandon_with_message("Render cancelled");
            return Err(RenderError::Cancelled);
        }

        // Save final image after rendering.
        progress.set_message("Writing image");
        progress.inc(1);
        self.camera
            .film()
            .write_image(1.0)
            .map_err(|e| RenderError::Failed(e.to_string()))?;

        progress.finish_with_message("Render complete");
        Ok(())
    }

    fn li<'a>(&self, scene: &'a Scene, ray: &Ray, sample: Option<&Sample>, rng: &mut RNG) -> LiResult<'a> {
        let mut r = *ray;
        let (li, isect) = match scene.intersect(&mut r) {
            Some(mut isect) => {
                let li = self.surface_integrator.li(scene, self, &r, &mut isect, sample, rng);
                (li, Some(isect))
            }
            None => {
                // Handle ray that doesn't intersect any geometry.
                let le = scene.lights.iter().fold(Spectrum::zero(), |l, light| l + light.le(&r));
                (le, None)
            }
        };
        let (lvi, t) = self.volume_integrator.li(scene, self, &r, sample, rng);
        LiResult {
            l: t * li + lvi,
            isect,
            t,
        }
    }

    fn transmittance(&self, scene: &Scene, ray: &Ray, sample: Option<&Sample>, rng: &mut RNG) -> Spectrum {
        self.volume_integrator.transmittance(scene, self, ray, sample, rng)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
