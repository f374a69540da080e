//! Random Number Generator.

use crate::pbrt::*;

/// 1 - epsilon for `Float`; the largest value below 1.
pub const ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1");

const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// PCG32 pseudo-random number generator. Each render task owns one, seeded
/// with the task index, so results do not depend on thread scheduling.
#[derive(Clone, Debug)]
pub struct RNG {
    state: u64,
    inc: u64,
}

impl Default for RNG {
    /// Return a new instance of `RNG` with default state and stream.
    fn default() -> Self {
        Self {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl RNG {
    /// Create a new `RNG` seeded with the given sequence.
    ///
    /// * `sequence_index` - The starting sequence to seed with.
    pub fn new(sequence_index: u64) -> Self {
        let mut ret = Self { state: 0, inc: 0 };
        ret.set_sequence(sequence_index);
        ret
    }

    /// Reseed the generator.
    ///
    /// * `init_seq` - The starting sequence to seed with.
    pub fn set_sequence(&mut self, init_seq: u64) {
        self.state = 0;
        self.inc = init_seq.wrapping_shl(1) | 1;
        self.uniform_u32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_u32();
    }

    /// Returns a uniformly distributed u32 value.
    pub fn uniform_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xor_shifted.rotate_right(rot)
    }

    /// Returns a uniformly distributed value in `[lower_bound, upper_bound)`.
    ///
    /// * `lower_bound` - The lower bound.
    /// * `upper_bound` - The upper bound (exclusive).
    pub fn bounded_uniform_u32(&mut self, lower_bound: u32, upper_bound: u32) -> u32 {
        let b = upper_bound - lower_bound;
        debug_assert!(b > 0);
        let threshold = b.wrapping_neg() % b;
        loop {
            let r = self.uniform_u32();
            if r >= threshold {
                return lower_bound + r % b;
            }
        }
    }

    /// Returns a uniformly distributed value over the half open interval [0.0, 1.0).
    pub fn uniform_float(&mut self) -> Float {
        min(self.uniform_u32() as Float * hexf32!("0x1.0p-32"), ONE_MINUS_EPSILON)
    }

    /// Randomly permute `count` groups of `n_dimensions` consecutive values,
    /// keeping each group together.
    ///
    /// * `v`            - The slice to shuffle.
    /// * `count`        - Number of groups.
    /// * `n_dimensions` - Values per group.
    pub fn shuffle<T>(&mut self, v: &mut [T], count: usize, n_dimensions: usize) {
        debug_assert!(count * n_dimensions <= v.len());
        for i in 0..count {
            let other = i + self.bounded_uniform_u32(0, (count - i) as u32) as usize;
            for j in 0..n_dimensions {
                v.swap(n_dimensions * i + j, n_dimensions * other + j);
            }
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
    fn same_seed_gives_same_sequence() {
        let mut a = RNG::new(42);
        let mut b = RNG::new(42);
        let mut c = RNG::new(43);
        let sa: Vec<u32> = (0..8).map(|_| a.uniform_u32()).collect();
        let sb: Vec<u32> = (0..8).map(|_| b.uniform_u32()).collect();
        let sc: Vec<u32> = (0..8).map(|_| c.uniform_u32()).collect();
        assert_eq!(sa, sb);
        assert_ne!(sa, sc);
    }

    #[test]
    fn uniform_float_is_in_unit_interval() {
        let mut rng = RNG::new(1);
        for _ in 0..10_000 {
            let f = rng.uniform_float();
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn shuffle_keeps_groups_together() {
        let mut rng = RNG::new(3);
        let mut v = [0, 10, 1, 11, 2, 12, 3, 13];
        rng.shuffle(&mut v, 4, 2);
        for pair in v.chunks(2) {
            assert_eq!(pair[1], pair[0] + 10);
        }
        let mut firsts: Vec<i32> = v.chunks(2).map(|p| p[0]).collect();
        firsts.sort_unstable();
        assert_eq!(firsts, vec![0, 1, 2, 3]);
    }
}
