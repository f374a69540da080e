//! Image I/O

use crate::error::*;
use crate::pbrt::*;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use image::{ImageBuffer, ImageFormat, Rgb};
use regex::Regex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::OnceLock;

/// Write an RGB image; the format is chosen from the file extension.
///
/// * `path`   - Output file path.
/// * `rgb`    - Linear floating point RGB pixel data in row-major order.
/// * `width`  - Width in pixels.
/// * `height` - Height in pixels.
pub fn write_image(path: &str, rgb: &[Float], width: usize, height: usize) -> Result<()> {
    if rgb.len() != 3 * width * height {
        return Err(Error::Image(format!(
            "{path}: expected {} values for {width}x{height} image, got {}",
            3 * width * height,
            rgb.len()
        )));
    }

    info!("Writing image {path} with resolution {width}x{height}");
    match get_extension_from_filename(path) {
        Some(".exr") => write_exr(path, rgb, width, height),
        Some(".png") => write_8_bit(path, rgb, width, height, ImageFormat::Png),
        Some(".tga") => write_8_bit(path, rgb, width, height, ImageFormat::Tga),
        Some(".pfm") => write_pfm(path, rgb, width, height),
        Some(extension) => Err(Error::Image(format!("extension {extension} is not supported"))),
        None => Err(Error::Image(format!("can't determine file type from suffix of filename {path}"))),
    }
}

/// Returns regular expression for extracting the file extension: the last
/// period followed by no periods or slashes.
fn regex_file_ext() -> Option<&'static Regex> {
    static DATA: OnceLock<Option<Regex>> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"(\.[^./\\]+)$").ok()).as_ref()
}

/// Retrieve the extension from a file path.
///
/// * `path` - The file path.
fn get_extension_from_filename(path: &str) -> Option<&str> {
    regex_file_ext()?.captures(path).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Writes the image in OpenEXR format.
fn write_exr(path: &str, rgb: &[Float], width: usize, height: usize) -> Result<()> {
    use exr::prelude::*;

    let layer = Layer::new(
        Vec2(width, height),
        LayerAttributes::named("render"),
        Encoding::SMALL_LOSSLESS,
        SpecificChannels::rgb(|pos: Vec2<usize>| {
            let offset = 3 * (pos.1 * width + pos.0);
            (rgb[offset], rgb[offset + 1], rgb[offset + 2])
        }),
    );

    let attributes = ImageAttributes::new(IntegerBounds::from_dimensions(Vec2(width, height)));
    Image::empty(attributes)
        .with_layer(layer)
        .write()
        .to_file(path)
        .map_err(|err| crate::error::Error::Image(format!("error saving output image {path}: {err}")))
}

/// Writes the image in an 8-bit format after gamma correction.
fn write_8_bit(path: &str, rgb: &[Float], width: usize, height: usize, format: ImageFormat) -> Result<()> {
    let imgbuf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let offset = 3 * (y as usize * width + x as usize);
        Rgb([
            to_byte(gamma_correct(rgb[offset])),
            to_byte(gamma_correct(rgb[offset + 1])),
            to_byte(gamma_correct(rgb[offset + 2])),
        ])
    });
    imgbuf
        .save_with_format(path, format)
        .map_err(|err| Error::Image(format!("error saving output image {path}: {err}")))
}

/// Writes the image in PFM (Portable FloatMap) format. Rows go bottom to top
/// and a negative scale marks little endian data.
fn write_pfm(path: &str, rgb: &[Float], width: usize, height: usize) -> Result<()> {
    let io_err = |e: std::io::Error| Error::Image(format!("error writing PFM file '{path}': {e}"));
    let big_endian = cfg!(target_endian = "big");

    let mut file = BufWriter::new(File::create(path).map_err(io_err)?);
    let scale = if big_endian { 1.0 } else { -1.0 };
    write!(file, "PF\n{width} {height}\n{scale}\n").map_err(io_err)?;
    for y in (0..height).rev() {
        for &f in &rgb[3 * y * width..3 * (y + 1) * width] {
            if big_endian {
                file.write_f32::<BigEndian>(f).map_err(io_err)?;
            } else {
                file.write_f32::<LittleEndian>(f).map_err(io_err)?;
            }
        }
    }
    file.flush().map_err(io_err)
}

/// Apply the sRGB transfer curve to a linear value.
///
/// * `value` - Linear value.
pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.0031308 {
        12.92 * value
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Map a value in [0, 1] to a byte with rounding and clamping.
///
/// * `v` - The value.
pub fn to_byte(v: Float) -> u8 {
    clamp(255.0 * v + 0.5, 0.0, 255.0) as u8
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
