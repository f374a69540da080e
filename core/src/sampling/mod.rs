//! Sampling

mod common;

// Re-export
pub use common::*;
