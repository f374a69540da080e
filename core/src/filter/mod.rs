//! Filter

use crate::pbrt::*;
use std::sync::Arc;

/// Extent of a reconstruction filter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilterData {
    /// Half width of the support in x.
    pub x_width: Float,

    /// Half width of the support in y.
    pub y_width: Float,

    /// Reciprocal of `x_width`.
    pub inv_x_width: Float,

    /// Reciprocal of `y_width`.
    pub inv_y_width: Float,
}

impl FilterData {
    /// Create a new `FilterData`.
    ///
    /// * `x_width` - Half width of the support in x.
    /// * `y_width` - Half width of the support in y.
    pub fn new(x_width: Float, y_width: Float) -> Self {
        Self {
            x_width,
            y_width,
            inv_x_width: 1.0 / x_width,
            inv_y_width: 1.0 / y_width,
        }
    }
}

/// Pixel reconstruction filter.
pub trait Filter: Send + Sync {
    /// Returns the filter extent.
    fn data(&self) -> &FilterData;

    /// Returns the filter weight at an offset from the filter center. The
    /// offset lies within the filter extent.
    ///
    /// * `x` - Offset in x.
    /// * `y` - Offset in y.
    fn evaluate(&self, x: Float, y: Float) -> Float;
}

/// Atomic reference counted `Filter`.
pub type ArcFilter = Arc<dyn Filter>;
