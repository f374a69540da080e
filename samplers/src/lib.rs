//! Samplers

#[macro_use]
extern crate log;

mod stratified;

// Re-export.
pub use stratified::*;
