//! Integrators

#[macro_use]
extern crate log;

mod emission;
mod whitted;

// Re-export.
pub use emission::*;
pub use whitted::*;
