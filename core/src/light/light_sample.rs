//! Light Samples

use super::*;
use crate::rng::*;
use crate::sampler::*;

/// Random values used to sample a light: a 2D position sample and a 1D
/// component sample.
#[derive(Copy, Clone, Debug, Default)]
pub struct LightSample {
    /// Position sample.
    pub u_pos: [Float; 2],

    /// Component selection sample.
    pub u_component: Float,
}

impl LightSample {
    /// Create a light sample from explicit values in [0, 1).
    ///
    /// * `u_pos0`      - First position value.
    /// * `u_pos1`      - Second position value.
    /// * `u_component` - Component value.
    pub fn new(u_pos0: Float, u_pos1: Float, u_component: Float) -> Self {
        debug_assert!((0.0..1.0).contains(&u_pos0));
        debug_assert!((0.0..1.0).contains(&u_pos1));
        debug_assert!((0.0..1.0).contains(&u_component));
        Self {
            u_pos: [u_pos0, u_pos1],
            u_component,
        }
    }

    /// Draw a light sample from a random number generator.
    ///
    /// * `rng` - Random number generator.
    pub fn from_rng(rng: &mut RNG) -> Self {
        let u_pos = [rng.uniform_float(), rng.uniform_float()];
        Self {
            u_pos,
            u_component: rng.uniform_float(),
        }
    }

    /// Read the `n`-th sample from the sampler-provided arrays.
    ///
    /// * `sample`  - The sample.
    /// * `offsets` - Where the arrays were requested.
    /// * `n`       - Index within the arrays.
    pub fn from_sample(sample: &Sample, offsets: &LightSampleOffsets, n: usize) -> Self {
        debug_assert!(n < sample.n2d[offsets.pos_offset]);
        debug_assert!(n < sample.n1d[offsets.component_offset]);
        let pos = &sample.two_d[offsets.pos_offset];
        Self {
            u_pos: [pos[2 * n], pos[2 * n + 1]],
            u_component: sample.one_d[offsets.component_offset][n],
        }
    }
}

/// Locations of the light sample arrays inside a `Sample`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LightSampleOffsets {
    /// Number of samples requested.
    pub n_samples: usize,

    /// Index of the 1D component array.
    pub component_offset: usize,

    /// Index of the 2D position array.
    pub pos_offset: usize,
}

impl LightSampleOffsets {
    /// Request the arrays needed for `count` light samples.
    ///
    /// * `count`  - Number of samples.
    /// * `sample` - The sample template to add the arrays to.
    pub fn new(count: usize, sample: &mut Sample) -> Self {
        Self {
            n_samples: count,
            component_offset: sample.add_1d(count),
            pos_offset: sample.add_2d(count),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_requested_arrays() {
        let mut sample = Sample::default();
        let _ = sample.add_1d(3);
        let offsets = LightSampleOffsets::new(2, &mut sample);
        sample.two_d[offsets.pos_offset].copy_from_slice(&[0.1, 0.2, 0.3, 0.4]);
        sample.one_d[offsets.component_offset].copy_from_slice(&[0.5, 0.6]);

        let ls = LightSample::from_sample(&sample, &offsets, 1);
        assert_eq!(ls.u_pos, [0.3, 0.4]);
        assert_eq!(ls.u_component, 0.6);
        assert_eq!(offsets.component_offset, 1);
    }
}
