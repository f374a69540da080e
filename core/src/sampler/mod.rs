//! Sampler

use crate::geometry::*;
use crate::integrator::*;
use crate::pbrt::*;
use crate::rng::*;
use crate::scene::*;
use crate::spectrum::*;

mod sample;

// Re-export
pub use sample::*;

/// Image extent, sample count and shutter interval shared by all samplers.
#[derive(Copy, Clone, Debug, Default)]
pub struct SamplerData {
    /// First pixel column to sample.
    pub x_start: i32,

    /// One past the last pixel column to sample.
    pub x_end: i32,

    /// First pixel row to sample.
    pub y_start: i32,

    /// One past the last pixel row to sample.
    pub y_end: i32,

    /// Number of samples generated for each pixel.
    pub samples_per_pixel: usize,

    /// Time the shutter opens.
    pub shutter_open: Float,

    /// Time the shutter closes.
    pub shutter_close: Float,
}

impl SamplerData {
    /// Create a new `SamplerData`.
    ///
    /// * `x_start`           - First pixel column.
    /// * `x_end`             - One past the last pixel column.
    /// * `y_start`           - First pixel row.
    /// * `y_end`             - One past the last pixel row.
    /// * `samples_per_pixel` - Number of samples per pixel.
    /// * `shutter_open`      - Time the shutter opens.
    /// * `shutter_close`     - Time the shutter closes.
    pub fn new(
        x_start: i32,
        x_end: i32,
        y_start: i32,
        y_end: i32,
        samples_per_pixel: usize,
        shutter_open: Float,
        shutter_close: Float,
    ) -> Self {
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
            samples_per_pixel,
            shutter_open,
            shutter_close,
        }
    }

    /// Returns the pixel window `(x0, x1, y0, y1)` for tile `num` out of
    /// `count`. Tiles are made as square as the image allows.
    ///
    /// * `num`   - Tile index.
    /// * `count` - Total number of tiles.
    pub fn compute_sub_window(&self, num: usize, count: usize) -> (i32, i32, i32, i32) {
        let dx = (self.x_end - self.x_start) as i64;
        let dy = (self.y_end - self.y_start) as i64;
        let (mut nx, mut ny) = (count as i64, 1_i64);
        while nx & 1 == 0 && 2 * dx * ny < dy * nx {
            nx >>= 1;
            ny <<= 1;
        }
        debug_assert!(nx * ny == count as i64);

        let xo = num as i64 % nx;
        let yo = num as i64 / nx;
        let tx0 = xo as Float / nx as Float;
        let tx1 = (xo + 1) as Float / nx as Float;
        let ty0 = yo as Float / ny as Float;
        let ty1 = (yo + 1) as Float / ny as Float;
        (
            lerp(tx0, self.x_start as Float, self.x_end as Float).floor() as i32,
            lerp(tx1, self.x_start as Float, self.x_end as Float).floor() as i32,
            lerp(ty0, self.y_start as Float, self.y_end as Float).floor() as i32,
            lerp(ty1, self.y_start as Float, self.y_end as Float).floor() as i32,
        )
    }
}

/// Generates the sample batches that drive rendering of one image region.
pub trait Sampler: Send + Sync {
    /// Returns the extent, sample count and shutter interval.
    fn data(&self) -> &SamplerData;

    /// Returns the most samples `get_more_samples()` will ever return.
    fn maximum_sample_count(&self) -> usize;

    /// Fill the next batch of samples. Returns the number of samples filled;
    /// zero once the region is exhausted.
    ///
    /// * `samples` - Samples to fill; at least `maximum_sample_count()` long.
    /// * `rng`     - Random number generator.
    fn get_more_samples(&mut self, samples: &mut [Sample], rng: &mut RNG) -> usize;

    /// Round a requested integrator sample count to one the sampler can
    /// generate well.
    ///
    /// * `size` - Requested count.
    fn round_size(&self, size: usize) -> usize;

    /// Returns a sampler for tile `num` out of `count`, or `None` if the tile
    /// is empty.
    ///
    /// * `num`   - Tile index.
    /// * `count` - Total number of tiles.
    fn get_sub_sampler(&self, num: usize, count: usize) -> Option<Box<dyn Sampler>>;

    /// Inspect the radiance computed for a batch. Returns false if the batch
    /// should be discarded and the samples taken again.
    ///
    /// * `_samples` - The samples.
    /// * `_rays`    - Camera rays generated for the samples.
    /// * `_ls`      - Radiance along the rays.
    fn report_results(&mut self, _samples: &[Sample], _rays: &[Ray], _ls: &[Spectrum]) -> bool {
        true
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_windows_tile_the_image() {
        let data = SamplerData::new(0, 64, 0, 32, 1, 0.0, 1.0);
        let count = 8;
        let mut covered = vec![0; 64 * 32];
        for num in 0..count {
            let (x0, x1, y0, y1) = data.compute_sub_window(num, count);
            for y in y0..y1 {
                for x in x0..x1 {
                    covered[(y * 64 + x) as usize] += 1;
                }
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
    }

    #[test]
    fn sub_windows_are_square_when_possible() {
        let data = SamplerData::new(0, 64, 0, 64, 1, 0.0, 1.0);
        let (x0, x1, y0, y1) = data.compute_sub_window(0, 4);
        assert_eq!((x0, x1, y0, y1), (0, 32, 0, 32));

        let wide = SamplerData::new(0, 128, 0, 8, 1, 0.0, 1.0);
        let (x0, x1, y0, y1) = wide.compute_sub_window(1, 4);
        assert_eq!((x0, x1, y0, y1), (32, 64, 0, 8));
    }
}
