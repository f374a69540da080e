//! Film

use crate::error::*;
use crate::filter::*;
use crate::image_io::*;
use crate::parallel::*;
use crate::paramset::*;
use crate::pbrt::*;
use crate::sampler::*;
use crate::spectrum::*;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

/// Filter table width.
pub const FILTER_TABLE_SIZE: usize = 16;

/// Display gamma used for the 8-bit preview buffer.
const DISPLAY_GAMMA: Float = 1.8;

/// Filtered sums accumulated for one pixel.
#[derive(Debug, Default)]
struct Pixel {
    /// Weighted sum of XYZ radiance.
    lxyz: [AtomicFloat; 3],

    /// Sum of filter weights.
    weight_sum: AtomicFloat,

    /// Unweighted sum of splatted XYZ radiance.
    splat_xyz: [AtomicFloat; 3],
}

/// Pixel region of the film as `(x_start, x_end, y_start, y_end)` with
/// exclusive ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FilmExtent {
    pub x_start: i32,
    pub x_end: i32,
    pub y_start: i32,
    pub y_end: i32,
}

/// Film that reconstructs an image from filtered samples and keeps an 8-bit
/// preview of the regions rendered so far.
pub struct ImageFilm {
    /// Horizontal resolution of the full image.
    pub x_resolution: usize,

    /// Vertical resolution of the full image.
    pub y_resolution: usize,

    /// Output file name; nothing is written when empty.
    pub filename: String,

    /// Reconstruction filter.
    filter: ArcFilter,

    /// First pixel column inside the crop window.
    x_pixel_start: i32,

    /// Number of pixel columns inside the crop window.
    x_pixel_count: i32,

    /// First pixel row inside the crop window.
    y_pixel_start: i32,

    /// Number of pixel rows inside the crop window.
    y_pixel_count: i32,

    /// Filter values tabulated over one quadrant of the support.
    filter_table: Vec<Float>,

    /// Pixel accumulators in row-major order.
    pixels: Vec<Pixel>,

    /// Use atomic read-modify-write updates in `add_sample()`. Needed when
    /// the filter reaches into neighbouring pixels, which other tiles may
    /// write concurrently.
    sync_needed: bool,

    /// Gamma corrected 8-bit RGB preview.
    display: Mutex<Vec<u8>>,
}

impl ImageFilm {
    /// Create a new `ImageFilm`.
    ///
    /// * `x_resolution` - Horizontal resolution.
    /// * `y_resolution` - Vertical resolution.
    /// * `filter`       - Reconstruction filter.
    /// * `crop_window`  - Normalized `[x_min, x_max, y_min, y_max]` region to render.
    /// * `filename`     - Output file name; empty to skip writing.
    pub fn new(x_resolution: usize, y_resolution: usize, filter: ArcFilter, crop_window: &[Float; 4], filename: &str) -> Self {
        let (xres, yres) = (x_resolution as Float, y_resolution as Float);
        let x_pixel_start = (xres * crop_window[0]).ceil() as i32;
        let x_pixel_count = max(1, (xres * crop_window[1]).ceil() as i32 - x_pixel_start);
        let y_pixel_start = (yres * crop_window[2]).ceil() as i32;
        let y_pixel_count = max(1, (yres * crop_window[3]).ceil() as i32 - y_pixel_start);

        let fd = *filter.data();
        let mut filter_table = Vec::with_capacity(FILTER_TABLE_SIZE * FILTER_TABLE_SIZE);
        for y in 0..FILTER_TABLE_SIZE {
            let fy = (y as Float + 0.5) * fd.y_width / FILTER_TABLE_SIZE as Float;
            for x in 0..FILTER_TABLE_SIZE {
                let fx = (x as Float + 0.5) * fd.x_width / FILTER_TABLE_SIZE as Float;
                filter_table.push(filter.evaluate(fx, fy));
            }
        }

        let n_pixels = (x_pixel_count * y_pixel_count) as usize;
        let mut pixels = Vec::with_capacity(n_pixels);
        pixels.resize_with(n_pixels, Pixel::default);

        Self {
            x_resolution,
            y_resolution,
            filename: filename.to_string(),
            filter,
            x_pixel_start,
            x_pixel_count,
            y_pixel_start,
            y_pixel_count,
            filter_table,
            pixels,
            sync_needed: fd.x_width > 0.5 || fd.y_width > 0.5,
            display: Mutex::new(vec![0; 3 * n_pixels]),
        }
    }

    /// Returns the aspect ratio of the full image.
    pub fn aspect_ratio(&self) -> Float {
        self.x_resolution as Float / self.y_resolution as Float
    }

    /// Returns true if `add_sample()` uses atomic updates.
    pub fn sync_needed(&self) -> bool {
        self.sync_needed
    }

    /// Returns the pixel accumulator for film coordinates relative to the
    /// crop window start.
    fn pixel(&self, x: i32, y: i32) -> &Pixel {
        &self.pixels[(y * self.x_pixel_count + x) as usize]
    }

    /// Add a radiance sample, weighted by the reconstruction filter, to all
    /// pixels within the filter support.
    ///
    /// * `sample` - The camera sample.
    /// * `l`      - Radiance along the camera ray.
    pub fn add_sample(&self, sample: &CameraSample, l: &Spectrum) {
        let fd = self.filter.data();

        // Compute the sample's raster extent.
        let dimage_x = sample.image_x - 0.5;
        let dimage_y = sample.image_y - 0.5;
        let (x_lo, y_lo) = if self.sync_needed {
            ((dimage_x - fd.x_width).ceil() as i32, (dimage_y - fd.y_width).ceil() as i32)
        } else {
            // Without atomics a sample must stay inside its own tile: a
            // sample on a pixel's lower edge skips the pixel before it.
            (
                (dimage_x - fd.x_width).floor() as i32 + 1,
                (dimage_y - fd.y_width).floor() as i32 + 1,
            )
        };
        let x0 = max(x_lo, self.x_pixel_start);
        let x1 = min((dimage_x + fd.x_width).floor() as i32, self.x_pixel_start + self.x_pixel_count - 1);
        let y0 = max(y_lo, self.y_pixel_start);
        let y1 = min((dimage_y + fd.y_width).floor() as i32, self.y_pixel_start + self.y_pixel_count - 1);
        if x1 < x0 || y1 < y0 {
            return;
        }

        let xyz = l.to_xyz();
        let table_offset = |d: Float, inv_width: Float| {
            let f = abs(d * inv_width * FILTER_TABLE_SIZE as Float);
            min(f.floor() as usize, FILTER_TABLE_SIZE - 1)
        };
        let ifx: Vec<usize> = (x0..=x1).map(|x| table_offset(x as Float - dimage_x, fd.inv_x_width)).collect();
        let ify: Vec<usize> = (y0..=y1).map(|y| table_offset(y as Float - dimage_y, fd.inv_y_width)).collect();

        for (y, fy) in (y0..=y1).zip(ify.iter()) {
            for (x, fx) in (x0..=x1).zip(ifx.iter()) {
                let filter_wt = self.filter_table[fy * FILTER_TABLE_SIZE + fx];
                let pixel = self.pixel(x - self.x_pixel_start, y - self.y_pixel_start);
                if self.sync_needed {
                    for (acc, v) in pixel.lxyz.iter().zip(xyz.iter()) {
                        acc.add(filter_wt * v);
                    }
                    pixel.weight_sum.add(filter_wt);
                } else {
                    for (acc, v) in pixel.lxyz.iter().zip(xyz.iter()) {
                        acc.add_unsynchronized(filter_wt * v);
                    }
                    pixel.weight_sum.add_unsynchronized(filter_wt);
                }
            }
        }
    }

    /// Add unfiltered radiance to the pixel containing the sample. Splats
    /// are summed rather than averaged.
    ///
    /// * `sample` - The camera sample.
    /// * `l`      - Radiance to add.
    pub fn splat(&self, sample: &CameraSample, l: &Spectrum) {
        let x = sample.image_x.floor() as i32;
        let y = sample.image_y.floor() as i32;
        if x < self.x_pixel_start
            || x - self.x_pixel_start >= self.x_pixel_count
            || y < self.y_pixel_start
            || y - self.y_pixel_start >= self.y_pixel_count
        {
            return;
        }
        let pixel = self.pixel(x - self.x_pixel_start, y - self.y_pixel_start);
        for (acc, v) in pixel.splat_xyz.iter().zip(l.to_xyz().iter()) {
            acc.add(*v);
        }
    }

    /// Returns the range of pixel positions samplers should cover, which
    /// extends past the image by the filter width.
    pub fn get_sample_extent(&self) -> FilmExtent {
        let fd = self.filter.data();
        FilmExtent {
            x_start: (self.x_pixel_start as Float + 0.5 - fd.x_width).floor() as i32,
            x_end: (self.x_pixel_start as Float + 0.5 + self.x_pixel_count as Float + fd.x_width).ceil() as i32,
            y_start: (self.y_pixel_start as Float + 0.5 - fd.y_width).floor() as i32,
            y_end: (self.y_pixel_start as Float + 0.5 + self.y_pixel_count as Float + fd.y_width).ceil() as i32,
        }
    }

    /// Returns the range of pixels in the image.
    pub fn get_pixel_extent(&self) -> FilmExtent {
        FilmExtent {
            x_start: self.x_pixel_start,
            x_end: self.x_pixel_start + self.x_pixel_count,
            y_start: self.y_pixel_start,
            y_end: self.y_pixel_start + self.y_pixel_count,
        }
    }

    /// Returns the final RGB value of a pixel relative to the crop window.
    fn pixel_rgb(&self, x: i32, y: i32, splat_scale: Float) -> [Float; 3] {
        let pixel = self.pixel(x, y);
        let load = |a: &[AtomicFloat; 3]| {
            [
                a[0].load(Ordering::Relaxed),
                a[1].load(Ordering::Relaxed),
                a[2].load(Ordering::Relaxed),
            ]
        };

        let mut rgb = xyz_to_rgb(&load(&pixel.lxyz));
        let weight_sum = pixel.weight_sum.load(Ordering::Relaxed);
        if weight_sum != 0.0 {
            let inv_wt = 1.0 / weight_sum;
            for c in rgb.iter_mut() {
                *c = max(0.0, *c * inv_wt);
            }
        }

        let splat_rgb = xyz_to_rgb(&load(&pixel.splat_xyz));
        for (c, s) in rgb.iter_mut().zip(splat_rgb.iter()) {
            *c += splat_scale * s;
        }
        rgb
    }

    /// Refresh the preview for a region of pixels in raster coordinates.
    /// The region is clipped to the image.
    ///
    /// * `x0`          - First column.
    /// * `y0`          - First row.
    /// * `x1`          - One past the last column.
    /// * `y1`          - One past the last row.
    /// * `splat_scale` - Scale applied to splatted values.
    pub fn update_display(&self, x0: i32, y0: i32, x1: i32, y1: i32, splat_scale: Float) {
        let x0 = clamp(x0 - self.x_pixel_start, 0, self.x_pixel_count);
        let x1 = clamp(x1 - self.x_pixel_start, 0, self.x_pixel_count);
        let y0 = clamp(y0 - self.y_pixel_start, 0, self.y_pixel_count);
        let y1 = clamp(y1 - self.y_pixel_start, 0, self.y_pixel_count);

        let mut display = self.display.lock().unwrap_or_else(|e| e.into_inner());
        for y in y0..y1 {
            for x in x0..x1 {
                let rgb = self.pixel_rgb(x, y, splat_scale);
                let offset = 3 * (y * self.x_pixel_count + x) as usize;
                for (c, v) in rgb.iter().enumerate() {
                    display[offset + c] = clamp(v.powf(1.0 / DISPLAY_GAMMA) * 255.0, 0.0, 255.0) as u8;
                }
            }
        }
    }

    /// Returns a copy of the 8-bit RGB preview in row-major order.
    pub fn display_rgb8(&self) -> Vec<u8> {
        self.display.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Returns the linear RGB image in row-major order.
    ///
    /// * `splat_scale` - Scale applied to splatted values.
    pub fn rgb(&self, splat_scale: Float) -> Vec<Float> {
        let mut rgb = Vec::with_capacity(3 * self.pixels.len());
        for y in 0..self.y_pixel_count {
            for x in 0..self.x_pixel_count {
                rgb.extend_from_slice(&self.pixel_rgb(x, y, splat_scale));
            }
        }
        rgb
    }

    /// Refresh the whole preview and write the image file, if a file name
    /// was given.
    ///
    /// * `splat_scale` - Scale applied to splatted values.
    pub fn write_image(&self, splat_scale: Float) -> Result<()> {
        let ext = self.get_pixel_extent();
        self.update_display(ext.x_start, ext.y_start, ext.x_end, ext.y_end, splat_scale);
        if self.filename.is_empty() {
            return Ok(());
        }
        write_image(
            &self.filename,
            &self.rgb(splat_scale),
            self.x_pixel_count as usize,
            self.y_pixel_count as usize,
        )
    }
}

impl From<(&ParamSet, ArcFilter)> for ImageFilm {
    /// Create an `ImageFilm` from a parameter set and reconstruction filter.
    ///
    /// * `p` - Tuple of parameters and filter.
    fn from(p: (&ParamSet, ArcFilter)) -> Self {
        let (params, filter) = p;
        let filename = params.find_one_string("filename", String::new());
        let xres = max(1, params.find_one_int("xresolution", 640)) as usize;
        let yres = max(1, params.find_one_int("yresolution", 480)) as usize;

        let cr = params.find_float("cropwindow");
        let crop = if cr.len() == 4 {
            [
                clamp(min(cr[0], cr[1]), 0.0, 1.0),
                clamp(max(cr[0], cr[1]), 0.0, 1.0),
                clamp(min(cr[2], cr[3]), 0.0, 1.0),
                clamp(max(cr[2], cr[3]), 0.0, 1.0),
            ]
        } else {
            if !cr.is_empty() {
                warn!("{} values supplied for 'cropwindow'. Expected 4.", cr.len());
            }
            [0.0, 1.0, 0.0, 1.0]
        };

        Self::new(xres, yres, filter, &crop, &filename)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use std::sync::Arc;

    struct TestBox(FilterData);

    impl Filter for TestBox {
        fn data(&self) -> &FilterData {
            &self.0
        }

        fn evaluate(&self, _x: Float, _y: Float) -> Float {
            1.0
        }
    }

    fn film(width: Float, w: usize, h: usize) -> ImageFilm {
        ImageFilm::new(w, h, Arc::new(TestBox(FilterData::new(width, width))), &[0.0, 1.0, 0.0, 1.0], "")
    }

    fn at(x: Float, y: Float) -> CameraSample {
        CameraSample {
            image_x: x,
            image_y: y,
            ..Default::default()
        }
    }

    #[test]
    fn crop_window_selects_pixels() {
        let f = ImageFilm::new(
            10,
            20,
            Arc::new(TestBox(FilterData::new(0.5, 0.5))),
            &[0.2, 0.5, 0.5, 1.0],
            "",
        );
        assert_eq!(
            f.get_pixel_extent(),
            FilmExtent {
                x_start: 2,
                x_end: 5,
                y_start: 10,
                y_end: 20
            }
        );
        assert_eq!(f.get_sample_extent().x_start, 2);
        assert_eq!(f.get_sample_extent().x_end, 6);
    }

    #[test]
    fn narrow_filter_skips_synchronization() {
        assert!(!film(0.5, 2, 2).sync_needed());
        assert!(film(1.5, 2, 2).sync_needed());
    }

    #[test]
    fn box_sample_lands_in_one_pixel() {
        let f = film(0.5, 3, 3);
        f.add_sample(&at(1.5, 1.5), &Spectrum::new(0.5));
        let rgb = f.rgb(1.0);
        let center = 3 * (3 + 1);
        assert!(approx_eq!(Float, rgb[center], 0.5, epsilon = 1e-3));
        assert_eq!(rgb[0], 0.0);
    }

    #[test]
    fn unsynchronized_samples_on_pixel_edges_stay_in_their_pixel() {
        let f = film(0.5, 4, 4);
        f.add_sample(&at(2.0, 2.0), &Spectrum::new(1.0));
        let rgb = f.rgb(1.0);
        let g = |x: usize, y: usize| rgb[3 * (y * 4 + x) + 1];
        assert!(approx_eq!(Float, g(2, 2), 1.0, epsilon = 1e-3));
        assert_eq!(g(1, 2), 0.0);
        assert_eq!(g(2, 1), 0.0);
        assert_eq!(g(1, 1), 0.0);

        // With atomic updates the full support is kept.
        let f = film(1.0, 4, 4);
        f.add_sample(&at(2.0, 2.0), &Spectrum::new(1.0));
        let rgb = f.rgb(1.0);
        assert!(approx_eq!(Float, rgb[3 * (4 + 1) + 1], 1.0, epsilon = 1e-3));
    }

    #[test]
    fn wide_filter_spreads_samples() {
        let f = film(1.0, 3, 3);
        f.add_sample(&at(1.5, 1.5), &Spectrum::new(1.0));
        let rgb = f.rgb(1.0);
        assert!(rgb.chunks(3).all(|p| approx_eq!(Float, p[1], 1.0, epsilon = 1e-3)));
    }

    #[test]
    fn splat_reaches_display() {
        let f = film(0.5, 4, 2);
        f.splat(&at(1.2, 1.7), &Spectrum::new(1.0));
        f.splat(&at(9.0, 1.0), &Spectrum::new(1.0));
        f.update_display(0, 0, 4, 2, 1.0);
        let display = f.display_rgb8();
        let offset = 3 * (4 + 1);
        assert!(display[offset] >= 254);
        assert_eq!(display[0], 0);

        f.update_display(0, 0, 4, 2, 0.25);
        let quarter = (0.25 as Float).powf(1.0 / 1.8) * 255.0;
        assert!(abs(f.display_rgb8()[offset + 1] as Float - quarter) <= 1.0);
    }

    #[test]
    fn update_display_clips_rows_against_height() {
        let f = film(0.5, 8, 2);
        f.splat(&at(0.5, 1.5), &Spectrum::new(1.0));
        f.update_display(-4, -4, 100, 100, 1.0);
        assert_eq!(f.display_rgb8().len(), 8 * 2 * 3);
        assert!(f.display_rgb8()[3 * 8] >= 254);
    }

    #[test]
    fn params_pick_resolution_and_crop() {
        let mut ps = ParamSet::new();
        ps.add_int("xresolution", &[10]);
        ps.add_int("yresolution", &[20]);
        ps.add_float("cropwindow", &[0.5, 0.0, 0.0, 0.5]);
        let f = ImageFilm::from((&ps, Arc::new(TestBox(FilterData::new(0.5, 0.5))) as ArcFilter));
        assert_eq!((f.x_resolution, f.y_resolution), (10, 20));
        let ext = f.get_pixel_extent();
        assert_eq!((ext.x_start, ext.x_end, ext.y_start, ext.y_end), (0, 5, 0, 10));
        assert!(f.filename.is_empty());
    }
}
