//! Spectrum

mod rgb_spectrum;

// Re-export
pub use rgb_spectrum::*;

/// Radiance and reflectance are carried as RGB triples.
pub type Spectrum = RGBSpectrum;
