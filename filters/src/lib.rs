//! Filters

mod boxf; // box is reserved keyword
mod mitchell;
mod triangle;

// Re-export.
pub use boxf::*;
pub use mitchell::*;
pub use triangle::*;
