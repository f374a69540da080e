//! BSDF Samples

use super::*;
use crate::rng::*;
use crate::sampler::*;

/// Result of sampling a BxDF or BSDF.
#[derive(Copy, Clone, Debug, Default)]
pub struct BsdfSampleResult {
    /// Value of the distribution function.
    pub f: Spectrum,

    /// The sampled incident direction.
    pub wi: Vector3f,

    /// Density of the sampled direction.
    pub pdf: Float,

    /// Type of the lobe that was sampled.
    pub sampled_type: BxDFType,
}

/// Random values used to sample a BSDF: a 2D direction sample and a 1D lobe
/// selection sample.
#[derive(Copy, Clone, Debug, Default)]
pub struct BsdfSample {
    /// Direction sample.
    pub u_dir: [Float; 2],

    /// Lobe selection sample.
    pub u_component: Float,
}

impl BsdfSample {
    /// Draw a new sample from a random number generator.
    ///
    /// * `rng` - Random number generator.
    pub fn new(rng: &mut RNG) -> Self {
        let u_dir = [rng.uniform_float(), rng.uniform_float()];
        Self {
            u_dir,
            u_component: rng.uniform_float(),
        }
    }

    /// Read the `n`-th sample from the sampler-provided arrays.
    ///
    /// * `sample`  - The sample.
    /// * `offsets` - Where the arrays were requested.
    /// * `n`       - Index within the arrays.
    pub fn from_sample(sample: &Sample, offsets: &BsdfSampleOffsets, n: usize) -> Self {
        debug_assert!(n < sample.n2d[offsets.dir_offset]);
        debug_assert!(n < sample.n1d[offsets.component_offset]);
        let dir = &sample.two_d[offsets.dir_offset];
        Self {
            u_dir: [dir[2 * n], dir[2 * n + 1]],
            u_component: sample.one_d[offsets.component_offset][n],
        }
    }
}

/// Locations of the BSDF sample arrays inside a `Sample`.
#[derive(Copy, Clone, Debug, Default)]
pub struct BsdfSampleOffsets {
    /// Number of samples requested.
    pub n_samples: usize,

    /// Index of the 1D lobe selection array.
    pub component_offset: usize,

    /// Index of the 2D direction array.
    pub dir_offset: usize,
}

impl BsdfSampleOffsets {
    /// Request the arrays needed for `count` BSDF samples.
    ///
    /// * `count`  - Number of samples.
    /// * `sample` - The sample template to add the arrays to.
    pub fn new(count: usize, sample: &mut Sample) -> Self {
        Self {
            n_samples: count,
            component_offset: sample.add_1d(count),
            dir_offset: sample.add_2d(count),
        }
    }
}
