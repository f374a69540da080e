//! Accelerators

mod grid;

// Re-export
pub use grid::*;
