//! Camera

use crate::error::*;
use crate::film::*;
use crate::geometry::*;
use crate::pbrt::*;
use crate::sampler::*;
use std::sync::Arc;

/// Data common to all cameras.
#[derive(Clone)]
pub struct CameraData {
    /// Camera motion in the scene.
    pub camera_to_world: AnimatedTransform,

    /// Time the shutter opens.
    pub shutter_open: Float,

    /// Time the shutter closes.
    pub shutter_close: Float,

    /// Film that captures the image.
    pub film: Arc<ImageFilm>,
}

impl CameraData {
    /// Create a new `CameraData`.
    ///
    /// * `camera_to_world` - Camera motion in the scene.
    /// * `shutter_open`    - Time the shutter opens.
    /// * `shutter_close`   - Time the shutter closes.
    /// * `film`            - Film that captures the image.
    pub fn new(camera_to_world: AnimatedTransform, shutter_open: Float, shutter_close: Float, film: Arc<ImageFilm>) -> Self {
        if camera_to_world.start_transform.has_scale() || camera_to_world.end_transform.has_scale() {
            warn!(
                "Scaling detected in world-to-camera transformation! \
                 The system has numerous assumptions, implicit and explicit, \
                 that this transform will have no scale factors in it. \
                 Proceed at your own risk; your image may have errors or \
                 the system may crash as a result of this."
            );
        }
        Self {
            camera_to_world,
            shutter_open,
            shutter_close,
            film,
        }
    }
}

/// Turns image samples into world space rays.
pub trait Camera: Send + Sync {
    /// Returns the common camera data.
    fn data(&self) -> &CameraData;

    /// Returns the film.
    fn film(&self) -> &ImageFilm {
        &self.data().film
    }

    /// Returns a world space ray for a sample and the weight of its radiance
    /// on the film.
    ///
    /// * `sample` - The camera sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float);

    /// Returns a ray with differentials for rays one pixel over in x and y.
    /// The weight is zero if any of the three rays is invalid.
    ///
    /// * `sample` - The camera sample.
    fn generate_ray_differential(&self, sample: &CameraSample) -> (Ray, Float) {
        let (mut rd, wt) = self.generate_ray(sample);

        let mut sshift = *sample;
        sshift.image_x += 1.0;
        let (rx, wtx) = self.generate_ray(&sshift);

        sshift.image_x -= 1.0;
        sshift.image_y += 1.0;
        let (ry, wty) = self.generate_ray(&sshift);

        if wtx == 0.0 || wty == 0.0 {
            return (rd, 0.0);
        }
        rd.differentials = Some(RayDifferential {
            rx_origin: rx.o,
            ry_origin: ry.o,
            rx_direction: rx.d,
            ry_direction: ry.d,
        });
        (rd, wt)
    }
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera>;

/// Transforms shared by cameras that project through a 4x4 matrix.
#[derive(Copy, Clone, Debug)]
pub struct ProjectiveCameraData {
    /// Projection from camera to screen space.
    pub camera_to_screen: Transform,

    /// Screen to raster space.
    pub screen_to_raster: Transform,

    /// Raster to screen space.
    pub raster_to_screen: Transform,

    /// Raster to camera space.
    pub raster_to_camera: Transform,

    /// Lens radius; zero for a pinhole.
    pub lens_radius: Float,

    /// Distance to the plane of focus.
    pub focal_distance: Float,
}

impl ProjectiveCameraData {
    /// Create a new `ProjectiveCameraData`.
    ///
    /// * `film`             - The film; provides the raster resolution.
    /// * `camera_to_screen` - Projection from camera to screen space.
    /// * `screen_window`    - Screen extent as `[x_min, x_max, y_min, y_max]`.
    /// * `lens_radius`      - Lens radius.
    /// * `focal_distance`   - Distance to the plane of focus.
    pub fn new(
        film: &ImageFilm,
        camera_to_screen: Transform,
        screen_window: &[Float; 4],
        lens_radius: Float,
        focal_distance: Float,
    ) -> Result<Self> {
        if screen_window[0] == screen_window[1] || screen_window[2] == screen_window[3] {
            return Err(Error::InvalidParameter(format!("empty screen window {screen_window:?}")));
        }
        let screen_to_raster = Transform::scale(film.x_resolution as Float, film.y_resolution as Float, 1.0)?
            * Transform::scale(
                1.0 / (screen_window[1] - screen_window[0]),
                1.0 / (screen_window[2] - screen_window[3]),
                1.0,
            )?
            * Transform::translate(&Vector3f::new(-screen_window[0], -screen_window[3], 0.0));
        let raster_to_screen = screen_to_raster.inverse();
        let raster_to_camera = camera_to_screen.inverse() * raster_to_screen;
        Ok(Self {
            camera_to_screen,
            screen_to_raster,
            raster_to_screen,
            raster_to_camera,
            lens_radius,
            focal_distance,
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::*;
    use float_cmp::*;

    struct UnitBox;

    impl Filter for UnitBox {
        fn data(&self) -> &FilterData {
            static DATA: std::sync::OnceLock<FilterData> = std::sync::OnceLock::new();
            DATA.get_or_init(|| FilterData::new(0.5, 0.5))
        }

        fn evaluate(&self, _x: Float, _y: Float) -> Float {
            1.0
        }
    }

    #[test]
    fn screen_window_maps_to_raster() {
        let film = ImageFilm::new(40, 20, Arc::new(UnitBox), &[0.0, 1.0, 0.0, 1.0], "");
        let pc = ProjectiveCameraData::new(&film, Transform::identity(), &[-2.0, 2.0, -1.0, 1.0], 0.0, 1e6).unwrap();
        let top_left = pc.screen_to_raster.transform_point(&Point3f::new(-2.0, 1.0, 0.0));
        let bottom_right = pc.screen_to_raster.transform_point(&Point3f::new(2.0, -1.0, 0.0));
        assert!(approx_eq!(Float, top_left.x, 0.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, top_left.y, 0.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, bottom_right.x, 40.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, bottom_right.y, 20.0, epsilon = 1e-4));
    }

    #[test]
    fn degenerate_screen_window_is_an_error() {
        let film = ImageFilm::new(4, 4, Arc::new(UnitBox), &[0.0, 1.0, 0.0, 1.0], "");
        assert!(ProjectiveCameraData::new(&film, Transform::identity(), &[1.0, 1.0, -1.0, 1.0], 0.0, 1.0).is_err());
    }
}
