//! Samples

use super::*;

/// Image, lens and time values that place a camera ray.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CameraSample {
    /// Raster space x coordinate on the film.
    pub image_x: Float,

    /// Raster space y coordinate on the film.
    pub image_y: Float,

    /// Lens u coordinate in [0, 1).
    pub lens_u: Float,

    /// Lens v coordinate in [0, 1).
    pub lens_v: Float,

    /// Time in [0, 1), mapped to the shutter interval by samplers.
    pub time: Float,
}

/// A camera sample plus the sample arrays integrators asked for.
#[derive(Clone, Debug, Default)]
pub struct Sample {
    /// The camera sample.
    pub camera: CameraSample,

    /// Number of values in each 1D array.
    pub n1d: Vec<usize>,

    /// Number of 2D points in each 2D array.
    pub n2d: Vec<usize>,

    /// The 1D arrays.
    pub one_d: Vec<Vec<Float>>,

    /// The 2D arrays stored as interleaved (u, v) pairs.
    pub two_d: Vec<Vec<Float>>,
}

impl Sample {
    /// Create the sample template for a render; integrators request their
    /// arrays here.
    ///
    /// * `sampler`           - The sampler.
    /// * `surface_integrator` - Optional surface integrator.
    /// * `volume_integrator`  - Optional volume integrator.
    /// * `scene`             - The scene.
    pub fn new(
        sampler: &dyn Sampler,
        surface_integrator: Option<&dyn SurfaceIntegrator>,
        volume_integrator: Option<&dyn VolumeIntegrator>,
        scene: &Scene,
    ) -> Self {
        let mut sample = Self::default();
        if let Some(si) = surface_integrator {
            si.request_samples(sampler, &mut sample, scene);
        }
        if let Some(vi) = volume_integrator {
            vi.request_samples(sampler, &mut sample, scene);
        }
        sample
    }

    /// Request a 1D array of `n` values. Returns its index.
    ///
    /// * `n` - Number of values.
    pub fn add_1d(&mut self, n: usize) -> usize {
        self.n1d.push(n);
        self.one_d.push(vec![0.0; n]);
        self.n1d.len() - 1
    }

    /// Request a 2D array of `n` points. Returns its index.
    ///
    /// * `n` - Number of points.
    pub fn add_2d(&mut self, n: usize) -> usize {
        self.n2d.push(n);
        self.two_d.push(vec![0.0; 2 * n]);
        self.n2d.len() - 1
    }

    /// Returns `count` samples with the same array layout and independent
    /// storage.
    ///
    /// * `count` - Number of samples.
    pub fn duplicate(&self, count: usize) -> Vec<Sample> {
        let template = Self {
            camera: CameraSample::default(),
            n1d: self.n1d.clone(),
            n2d: self.n2d.clone(),
            one_d: self.n1d.iter().map(|&n| vec![0.0; n]).collect(),
            two_d: self.n2d.iter().map(|&n| vec![0.0; 2 * n]).collect(),
        };
        vec![template; count]
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_have_requested_sizes() {
        let mut s = Sample::default();
        assert_eq!(s.add_1d(3), 0);
        assert_eq!(s.add_2d(2), 0);
        assert_eq!(s.add_1d(1), 1);
        assert_eq!(s.one_d[0].len(), 3);
        assert_eq!(s.two_d[0].len(), 4);
        assert_eq!(s.n2d, vec![2]);
    }

    #[test]
    fn duplicates_do_not_share_storage() {
        let mut s = Sample::default();
        let _ = s.add_1d(2);
        s.one_d[0][0] = 0.5;
        let mut copies = s.duplicate(2);
        copies[0].one_d[0][1] = 0.25;
        assert_eq!(copies[0].one_d[0], vec![0.0, 0.25]);
        assert_eq!(copies[1].one_d[0], vec![0.0, 0.0]);
        assert_eq!(copies[1].n1d, vec![2]);
    }
}
