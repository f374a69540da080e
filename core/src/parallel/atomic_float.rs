//! AtomicFloat

use crate::pbrt::Float;
use std::sync::atomic::{AtomicU32, Ordering};

/// Atomic floating point value stored as the bits of an `AtomicU32`.
#[derive(Debug, Default)]
pub struct AtomicFloat {
    /// Bit representation of floating point value.
    bits: AtomicU32,
}

impl AtomicFloat {
    /// Create a new `AtomicFloat`.
    ///
    /// * `v` - The value.
    pub fn new(v: Float) -> Self {
        Self {
            bits: AtomicU32::new(v.to_bits()),
        }
    }

    /// Atomically add a floating point value with a compare-and-swap loop.
    ///
    /// * `v` - The value to add.
    pub fn add(&self, v: Float) {
        let mut old_bits = self.bits.load(Ordering::Relaxed);
        loop {
            let new_bits = (Float::from_bits(old_bits) + v).to_bits();
            match self
                .bits
                .compare_exchange_weak(old_bits, new_bits, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(x) => old_bits = x,
            }
        }
    }

    /// Non-atomic read-modify-write add. Only valid when no other thread
    /// writes this value concurrently.
    ///
    /// * `v` - The value to add.
    pub fn add_unsynchronized(&self, v: Float) {
        self.store(self.load(Ordering::Relaxed) + v, Ordering::Relaxed);
    }

    /// Loads the floating point value.
    ///
    /// * `order` - Memory ordering of this operation
    pub fn load(&self, order: Ordering) -> Float {
        Float::from_bits(self.bits.load(order))
    }

    /// Stores the floating point value.
    ///
    /// * `v`     - The value.
    /// * `order` - Memory ordering of this operation
    pub fn store(&self, v: Float, order: Ordering) {
        self.bits.store(v.to_bits(), order);
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        Self::new(self.load(Ordering::SeqCst))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn concurrent_adds_are_not_lost() {
        let f = Arc::new(AtomicFloat::new(0.0));
        std::thread::scope(|s| {
            for _ in 0..4 {
                let f = f.clone();
                s.spawn(move || {
                    for _ in 0..1000 {
                        f.add(1.0);
                    }
                });
            }
        });
        assert_eq!(f.load(Ordering::SeqCst), 4000.0);
    }

    #[test]
    fn unsynchronized_add_accumulates() {
        let f = AtomicFloat::new(1.5);
        f.add_unsynchronized(2.0);
        assert_eq!(f.load(Ordering::Relaxed), 3.5);
    }
}
