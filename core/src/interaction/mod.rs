//! Interactions

mod differential_geometry;
mod intersection;

// Re-export
pub use differential_geometry::*;
pub use intersection::*;
