//! Stratified Sampler

use lumen_core::film::*;
use lumen_core::paramset::*;
use lumen_core::pbrt::*;
use lumen_core::rng::*;
use lumen_core::sampler::*;
use lumen_core::sampling::*;

/// Divides each pixel into `x_pixel_samples` by `y_pixel_samples` strata and
/// places one sample in each, visiting pixels in scanline order.
pub struct StratifiedSampler {
    /// The common sampler data.
    pub data: SamplerData,

    /// Number of strata in x per pixel.
    x_pixel_samples: usize,

    /// Number of strata in y per pixel.
    y_pixel_samples: usize,

    /// Jitter samples within their strata.
    jitter: bool,

    /// Current pixel column.
    x_pos: i32,

    /// Current pixel row.
    y_pos: i32,

    /// Scratch space for image, lens and time values.
    sample_buf: Vec<Float>,
}

impl StratifiedSampler {
    /// Create a new `StratifiedSampler`.
    ///
    /// * `x_start`         - First pixel column.
    /// * `x_end`           - One past the last pixel column.
    /// * `y_start`         - First pixel row.
    /// * `y_end`           - One past the last pixel row.
    /// * `x_pixel_samples` - Strata in x per pixel.
    /// * `y_pixel_samples` - Strata in y per pixel.
    /// * `jitter`          - Jitter samples within their strata.
    /// * `shutter_open`    - Time the shutter opens.
    /// * `shutter_close`   - Time the shutter closes.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x_start: i32,
        x_end: i32,
        y_start: i32,
        y_end: i32,
        x_pixel_samples: usize,
        y_pixel_samples: usize,
        jitter: bool,
        shutter_open: Float,
        shutter_close: Float,
    ) -> Self {
        let x_pixel_samples = max(1, x_pixel_samples);
        let y_pixel_samples = max(1, y_pixel_samples);
        let n = x_pixel_samples * y_pixel_samples;
        Self {
            data: SamplerData::new(x_start, x_end, y_start, y_end, n, shutter_open, shutter_close),
            x_pixel_samples,
            y_pixel_samples,
            jitter,
            x_pos: x_start,
            y_pos: y_start,
            sample_buf: vec![0.0; 5 * n],
        }
    }
}

impl Sampler for StratifiedSampler {
    fn data(&self) -> &SamplerData {
        &self.data
    }

    fn maximum_sample_count(&self) -> usize {
        self.x_pixel_samples * self.y_pixel_samples
    }

    /// Fill the samples for the current pixel and advance to the next one.
    ///
    /// * `samples` - Samples to fill.
    /// * `rng`     - Random number generator.
    fn get_more_samples(&mut self, samples: &mut [Sample], rng: &mut RNG) -> usize {
        if self.y_pos >= self.data.y_end || self.x_pos >= self.data.x_end {
            return 0;
        }

        let (nx, ny) = (self.x_pixel_samples, self.y_pixel_samples);
        let n = nx * ny;
        let (image, rest) = self.sample_buf.split_at_mut(2 * n);
        let (lens, time) = rest.split_at_mut(2 * n);

        stratified_sample_2d(image, nx, ny, rng, self.jitter);
        stratified_sample_2d(lens, nx, ny, rng, self.jitter);
        stratified_sample_1d(time, rng, self.jitter);

        // Shift image samples to pixel coordinates.
        for xy in image.chunks_exact_mut(2) {
            xy[0] += self.x_pos as Float;
            xy[1] += self.y_pos as Float;
        }

        // Decorrelate sample dimensions.
        rng.shuffle(lens, n, 2);
        rng.shuffle(time, n, 1);

        let (open, close) = (self.data.shutter_open, self.data.shutter_close);
        for (i, sample) in samples.iter_mut().take(n).enumerate() {
            sample.camera.image_x = image[2 * i];
            sample.camera.image_y = image[2 * i + 1];
            sample.camera.lens_u = lens[2 * i];
            sample.camera.lens_v = lens[2 * i + 1];
            sample.camera.time = lerp(time[i], open, close);

            for (values, &count) in sample.one_d.iter_mut().zip(sample.n1d.iter()) {
                latin_hypercube(values, count, 1, rng);
            }
            for (values, &count) in sample.two_d.iter_mut().zip(sample.n2d.iter()) {
                latin_hypercube(values, count, 2, rng);
            }
        }

        self.x_pos += 1;
        if self.x_pos == self.data.x_end {
            self.x_pos = self.data.x_start;
            self.y_pos += 1;
        }
        n
    }

    fn round_size(&self, size: usize) -> usize {
        size
    }

    fn get_sub_sampler(&self, num: usize, count: usize) -> Option<Box<dyn Sampler>> {
        let (x0, x1, y0, y1) = self.data.compute_sub_window(num, count);
        if x0 == x1 || y0 == y1 {
            return None;
        }
        debug!("Sub-sampler {}/{} covers [{}, {}) x [{}, {})", num, count, x0, x1, y0, y1);
        Some(Box::new(Self::new(
            x0,
            x1,
            y0,
            y1,
            self.x_pixel_samples,
            self.y_pixel_samples,
            self.jitter,
            self.data.shutter_open,
            self.data.shutter_close,
        )))
    }
}

impl From<(&ParamSet, &FilmExtent, Float, Float)> for StratifiedSampler {
    /// Create a `StratifiedSampler` from a parameter set, the film's sample
    /// extent and the camera shutter interval.
    ///
    /// * `p` - Tuple of parameters, sample extent, shutter open and close.
    fn from(p: (&ParamSet, &FilmExtent, Float, Float)) -> Self {
        let (params, extent, shutter_open, shutter_close) = p;
        let jitter = params.find_one_bool("jitter", true);
        let xsamp = params.find_one_int("xsamples", 2);
        let ysamp = params.find_one_int("ysamples", 2);
        if xsamp < 1 || ysamp < 1 {
            warn!("Stratified sampler needs at least one sample per axis; got {}x{}", xsamp, ysamp);
        }
        Self::new(
            extent.x_start,
            extent.x_end,
            extent.y_start,
            extent.y_end,
            max(1, xsamp) as usize,
            max(1, ysamp) as usize,
            jitter,
            shutter_open,
            shutter_close,
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn samples_for(sampler: &StratifiedSampler, n1d: usize, n2d: usize) -> Vec<Sample> {
        let mut template = Sample::default();
        let _ = template.add_1d(n1d);
        let _ = template.add_2d(n2d);
        template.duplicate(sampler.maximum_sample_count())
    }

    #[test]
    fn unjittered_samples_repeat_per_pixel() {
        let mut sampler = StratifiedSampler::new(0, 2, 0, 2, 2, 2, false, 0.0, 1.0);
        let mut samples = samples_for(&sampler, 1, 1);
        let mut rng = RNG::new(0);

        let mut pixels = vec![];
        loop {
            let n = sampler.get_more_samples(&mut samples, &mut rng);
            if n == 0 {
                break;
            }
            let mut offsets: Vec<(Float, Float)> = samples[..n]
                .iter()
                .map(|s| (s.camera.image_x.fract(), s.camera.image_y.fract()))
                .collect();
            offsets.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let px = (samples[0].camera.image_x.floor(), samples[0].camera.image_y.floor());
            pixels.push((px, offsets));
        }

        assert_eq!(pixels.len(), 4);
        let visited: Vec<(Float, Float)> = pixels.iter().map(|p| p.0).collect();
        assert_eq!(visited, vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        for (_, offsets) in &pixels {
            assert_eq!(offsets, &vec![(0.25, 0.25), (0.25, 0.75), (0.75, 0.25), (0.75, 0.75)]);
        }
    }

    #[test]
    fn time_spans_shutter_interval() {
        let mut sampler = StratifiedSampler::new(0, 1, 0, 1, 2, 2, false, 2.0, 4.0);
        let mut samples = samples_for(&sampler, 0, 0);
        let mut rng = RNG::new(1);
        assert_eq!(sampler.get_more_samples(&mut samples, &mut rng), 4);
        let mut times: Vec<Float> = samples.iter().map(|s| s.camera.time).collect();
        times.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (t, expected) in times.iter().zip([2.25, 2.75, 3.25, 3.75]) {
            assert!(approx_eq!(Float, *t, expected, epsilon = 1e-5));
        }
        assert_eq!(sampler.get_more_samples(&mut samples, &mut rng), 0);
    }

    #[test]
    fn integrator_arrays_are_filled() {
        let mut sampler = StratifiedSampler::new(0, 1, 0, 1, 1, 1, true, 0.0, 1.0);
        let mut samples = samples_for(&sampler, 4, 4);
        let mut rng = RNG::new(2);
        assert_eq!(sampler.get_more_samples(&mut samples, &mut rng), 1);
        let mut strata: Vec<usize> = samples[0].one_d[0].iter().map(|&u| (u * 4.0) as usize).collect();
        strata.sort_unstable();
        assert_eq!(strata, vec![0, 1, 2, 3]);
        assert_eq!(samples[0].two_d[0].len(), 8);
        assert!(samples[0].two_d[0].iter().all(|u| (0.0..1.0).contains(u)));
    }

    #[test]
    fn sub_samplers_cover_the_extent() {
        let sampler = StratifiedSampler::new(0, 8, 0, 4, 1, 1, false, 0.0, 1.0);
        let mut rng = RNG::new(3);
        let mut total = 0;
        for num in 0..4 {
            let mut sub = sampler.get_sub_sampler(num, 4).unwrap();
            let mut samples = Sample::default().duplicate(sub.maximum_sample_count());
            loop {
                let n = sub.get_more_samples(&mut samples, &mut rng);
                if n == 0 {
                    break;
                }
                total += n;
            }
        }
        assert_eq!(total, 32);
        assert!(sampler.get_sub_sampler(0, 64).is_none());
    }

    #[test]
    fn params_pick_strata_and_extent() {
        let mut ps = ParamSet::new();
        ps.add_int("xsamples", &[3]);
        ps.add_bool("jitter", &[false]);
        let extent = FilmExtent {
            x_start: 1,
            x_end: 5,
            y_start: 0,
            y_end: 2,
        };
        let sampler = StratifiedSampler::from((&ps, &extent, 0.0, 1.0));
        assert_eq!(sampler.maximum_sample_count(), 6);
        assert_eq!(sampler.data().x_start, 1);
        assert_eq!(sampler.data().samples_per_pixel, 6);
    }
}
