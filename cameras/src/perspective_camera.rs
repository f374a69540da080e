//! Perspective Camera

use lumen_core::camera::*;
use lumen_core::error::*;
use lumen_core::film::*;
use lumen_core::geometry::*;
use lumen_core::paramset::*;
use lumen_core::pbrt::*;
use lumen_core::sampler::*;
use lumen_core::sampling::*;
use std::convert::TryFrom;
use std::mem::swap;
use std::sync::Arc;

/// Perspective camera.
pub struct PerspectiveCamera {
    /// Common camera parameters.
    pub data: CameraData,

    /// Projective camera parameters.
    pub proj_data: ProjectiveCameraData,

    /// Differential change in x-coordinate of origin for camera rays.
    pub dx_camera: Vector3f,

    /// Differential change in y-coordinate of origin for camera rays.
    pub dy_camera: Vector3f,
}

impl PerspectiveCamera {
    /// Create a new perspective camera.
    ///
    /// * `camera_to_world` - Animated transformation describing the camera's
    ///                       motion in the scene.
    /// * `screen_window`   - Screen extent as `[x_min, x_max, y_min, y_max]`.
    /// * `shutter_open`    - Time when shutter is open.
    /// * `shutter_close`   - Time when shutter is closed.
    /// * `lens_radius`     - Radius of camera lens.
    /// * `focal_distance`  - Focal distance.
    /// * `fov`             - The field-of-view angle in degrees.
    /// * `film`            - The film to capture the rendered image.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        camera_to_world: AnimatedTransform,
        screen_window: &[Float; 4],
        shutter_open: Float,
        shutter_close: Float,
        lens_radius: Float,
        focal_distance: Float,
        fov: Float,
        film: Arc<ImageFilm>,
    ) -> Result<Self> {
        let proj_data = ProjectiveCameraData::new(
            &film,
            Transform::perspective(fov, 1e-2, 1000.0)?,
            screen_window,
            lens_radius,
            focal_distance,
        )?;
        let data = CameraData::new(camera_to_world, shutter_open, shutter_close, film);

        // Compute differential changes in origin for perspective camera rays.
        let origin = proj_data.raster_to_camera.transform_point(&Point3f::zero());
        let dx_camera = proj_data.raster_to_camera.transform_point(&Point3f::new(1.0, 0.0, 0.0)) - origin;
        let dy_camera = proj_data.raster_to_camera.transform_point(&Point3f::new(0.0, 1.0, 0.0)) - origin;

        Ok(Self {
            data,
            proj_data,
            dx_camera,
            dy_camera,
        })
    }

    /// Returns the camera space position of a sample on the near plane.
    ///
    /// * `sample` - The sample.
    fn camera_point(&self, sample: &CameraSample) -> Point3f {
        let p_ras = Point3f::new(sample.image_x, sample.image_y, 0.0);
        self.proj_data.raster_to_camera.transform_point(&p_ras)
    }

    /// Returns the lens position for a sample; the origin for a pinhole.
    ///
    /// * `sample` - The sample.
    fn lens_point(&self, sample: &CameraSample) -> Point3f {
        let d = concentric_sample_disk(sample.lens_u, sample.lens_v);
        let r = self.proj_data.lens_radius;
        Point3f::new(d.x * r, d.y * r, 0.0)
    }

    /// Bend a camera space direction from the pinhole so it passes through
    /// `p_lens` and meets the original at the plane of focus.
    ///
    /// * `dir`    - Normalized direction from the origin.
    /// * `p_lens` - Point on the lens.
    fn refocus(&self, dir: &Vector3f, p_lens: &Point3f) -> Vector3f {
        let ft = self.proj_data.focal_distance / dir.z;
        let p_focus = Point3f::zero() + *dir * ft;
        (p_focus - *p_lens).normalize()
    }

    /// Returns the camera space ray for a sample.
    ///
    /// * `sample` - The sample.
    fn camera_ray(&self, sample: &CameraSample) -> Ray {
        let p_camera = self.camera_point(sample);
        let time = lerp(sample.time, self.data.shutter_open, self.data.shutter_close);
        let mut ray = Ray::new(
            Point3f::zero(),
            Vector3f::from(p_camera).normalize(),
            0.0,
            INFINITY,
            time,
            0,
        );

        // Modify ray for depth of field.
        if self.proj_data.lens_radius > 0.0 {
            let p_lens = self.lens_point(sample);
            ray.d = self.refocus(&ray.d, &p_lens);
            ray.o = p_lens;
        }
        ray
    }
}

impl Camera for PerspectiveCamera {
    fn data(&self) -> &CameraData {
        &self.data
    }

    /// Returns a world space ray for a sample and its weight.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float) {
        let ray = self.camera_ray(sample);
        (self.data.camera_to_world.transform_ray(&ray), 1.0)
    }

    /// Returns a world space ray with differentials computed from the
    /// precomputed per-pixel offsets.
    ///
    /// * `sample` - The sample.
    fn generate_ray_differential(&self, sample: &CameraSample) -> (Ray, Float) {
        let mut ray = self.camera_ray(sample);
        let p_camera = Vector3f::from(self.camera_point(sample));

        let rd = if self.proj_data.lens_radius > 0.0 {
            let p_lens = self.lens_point(sample);
            let dx = (p_camera + self.dx_camera).normalize();
            let dy = (p_camera + self.dy_camera).normalize();
            RayDifferential {
                rx_origin: p_lens,
                ry_origin: p_lens,
                rx_direction: self.refocus(&dx, &p_lens),
                ry_direction: self.refocus(&dy, &p_lens),
            }
        } else {
            RayDifferential {
                rx_origin: ray.o,
                ry_origin: ray.o,
                rx_direction: (p_camera + self.dx_camera).normalize(),
                ry_direction: (p_camera + self.dy_camera).normalize(),
            }
        };
        ray.differentials = Some(rd);

        (self.data.camera_to_world.transform_ray(&ray), 1.0)
    }
}

impl TryFrom<(&ParamSet, &AnimatedTransform, Arc<ImageFilm>)> for PerspectiveCamera {
    type Error = Error;

    /// Create a `PerspectiveCamera` from given parameter set, animated
    /// transform and film.
    ///
    /// * `p` - A tuple containing parameter set, animated transform and film.
    fn try_from(p: (&ParamSet, &AnimatedTransform, Arc<ImageFilm>)) -> Result<Self> {
        let (params, cam2world, film) = p;

        let mut shutter_open = params.find_one_float("shutteropen", 0.0);
        let mut shutter_close = params.find_one_float("shutterclose", 1.0);
        if shutter_close < shutter_open {
            warn!(
                "Shutter close time [{}] < shutter open [{}]. Swapping them.",
                shutter_close, shutter_open
            );
            swap(&mut shutter_close, &mut shutter_open);
        }

        let lens_radius = params.find_one_float("lensradius", 0.0);
        let focal_distance = params.find_one_float("focaldistance", 1e6);

        let frame = params.find_one_float(
            "frameaspectratio",
            film.x_resolution as Float / film.y_resolution as Float,
        );
        let mut screen = if frame > 1.0 {
            [-frame, frame, -1.0, 1.0]
        } else {
            [-1.0, 1.0, -1.0 / frame, 1.0 / frame]
        };

        let sw = params.find_float("screenwindow");
        if !sw.is_empty() {
            if sw.len() == 4 {
                screen.copy_from_slice(&sw);
            } else {
                error!("'screenwindow' should have four values");
            }
        }

        let mut fov = params.find_one_float("fov", 90.0);
        let half_fov = params.find_one_float("halffov", -1.0);
        if half_fov > 0.0 {
            fov = 2.0 * half_fov;
        }

        Self::new(
            *cam2world,
            &screen,
            shutter_open,
            shutter_close,
            lens_radius,
            focal_distance,
            fov,
            film,
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use filters::BoxFilter;
    use float_cmp::*;

    fn camera(lens_radius: Float, focal_distance: Float) -> PerspectiveCamera {
        let film = Arc::new(ImageFilm::new(
            10,
            10,
            Arc::new(BoxFilter::new(0.5, 0.5)),
            &[0.0, 1.0, 0.0, 1.0],
            "",
        ));
        PerspectiveCamera::new(
            AnimatedTransform::fixed(Transform::identity()),
            &[-1.0, 1.0, -1.0, 1.0],
            0.0,
            1.0,
            lens_radius,
            focal_distance,
            90.0,
            film,
        )
        .unwrap()
    }

    fn center() -> CameraSample {
        CameraSample {
            image_x: 5.0,
            image_y: 5.0,
            lens_u: 0.5,
            lens_v: 0.5,
            time: 0.5,
        }
    }

    #[test]
    fn center_ray_looks_down_z() {
        let (ray, wt) = camera(0.0, 1e6).generate_ray(&center());
        assert_eq!(wt, 1.0);
        assert!(approx_eq!(Float, ray.d.x, 0.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, ray.d.y, 0.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, ray.d.z, 1.0, epsilon = 1e-5));
        assert_eq!(ray.time, 0.5);
        assert_eq!(ray.depth, 0);
        assert!(ray.differentials.is_none());
    }

    #[test]
    fn corner_ray_spans_field_of_view() {
        let mut s = center();
        s.image_x = 10.0;
        let (ray, _) = camera(0.0, 1e6).generate_ray(&s);
        // 90 degree field of view reaches x = z at the right edge.
        assert!(approx_eq!(Float, ray.d.x, ray.d.z, epsilon = 1e-4));
    }

    #[test]
    fn differentials_are_offset_one_pixel() {
        let cam = camera(0.0, 1e6);
        let (ray, wt) = cam.generate_ray_differential(&center());
        assert_eq!(wt, 1.0);
        let rd = ray.differentials.unwrap();
        assert_eq!(rd.rx_origin, ray.o);
        assert!(rd.rx_direction.x > ray.d.x);
        // Raster y grows downwards on screen.
        assert!(rd.ry_direction.y < ray.d.y);

        let mut shifted = center();
        shifted.image_x += 1.0;
        let (rx, _) = cam.generate_ray(&shifted);
        assert!(approx_eq!(Float, rx.d.x, rd.rx_direction.x, epsilon = 1e-5));
    }

    #[test]
    fn lens_rays_converge_at_focal_plane() {
        let cam = camera(0.5, 5.0);
        for (u, v) in [(0.1, 0.2), (0.9, 0.4), (0.3, 0.8)] {
            let mut s = center();
            s.lens_u = u;
            s.lens_v = v;
            let (ray, _) = cam.generate_ray(&s);
            assert!(ray.o.x != 0.0 || ray.o.y != 0.0);
            let p = ray.at((5.0 - ray.o.z) / ray.d.z);
            assert!(approx_eq!(Float, p.x, 0.0, epsilon = 1e-4));
            assert!(approx_eq!(Float, p.y, 0.0, epsilon = 1e-4));
        }
    }

    #[test]
    fn params_build_camera() {
        let film = Arc::new(ImageFilm::new(
            20,
            10,
            Arc::new(BoxFilter::new(0.5, 0.5)),
            &[0.0, 1.0, 0.0, 1.0],
            "",
        ));
        let mut ps = ParamSet::new();
        ps.add_float("fov", &[60.0]);
        ps.add_float("shutteropen", &[1.0]);
        ps.add_float("shutterclose", &[0.0]);
        let cam = PerspectiveCamera::try_from((&ps, &AnimatedTransform::fixed(Transform::identity()), film)).unwrap();
        assert_eq!(cam.data().shutter_open, 0.0);
        assert_eq!(cam.data().shutter_close, 1.0);
    }
}
