//! Box Filter

use lumen_core::filter::*;
use lumen_core::paramset::*;
use lumen_core::pbrt::*;

/// Weights every sample within the extent equally.
pub struct BoxFilter {
    /// Filter data.
    pub data: FilterData,
}

impl BoxFilter {
    /// Returns a new instance of `BoxFilter`.
    ///
    /// * `x_width` - Half width in x.
    /// * `y_width` - Half width in y.
    pub fn new(x_width: Float, y_width: Float) -> Self {
        Self {
            data: FilterData::new(x_width, y_width),
        }
    }
}

impl Filter for BoxFilter {
    fn data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, _x: Float, _y: Float) -> Float {
        1.0
    }
}

impl From<&ParamSet> for BoxFilter {
    /// Create a `BoxFilter` from `ParamSet`.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let xw = params.find_one_float("xwidth", 0.5);
        let yw = params.find_one_float("ywidth", 0.5);
        Self::new(xw, yw)
    }
}
