//! Mitchell Filter

use lumen_core::filter::*;
use lumen_core::paramset::*;
use lumen_core::pbrt::*;

/// Mitchell-Netravali filter; a cubic that trades ringing for blurring
/// through its `B` and `C` parameters.
pub struct MitchellFilter {
    /// Filter data.
    pub data: FilterData,

    /// The B parameter.
    pub b: Float,

    /// The C parameter.
    pub c: Float,
}

impl MitchellFilter {
    /// Returns a new instance of `MitchellFilter`.
    ///
    /// * `x_width` - Half width in x.
    /// * `y_width` - Half width in y.
    /// * `b`       - The B parameter.
    /// * `c`       - The C parameter.
    pub fn new(x_width: Float, y_width: Float, b: Float, c: Float) -> Self {
        Self {
            data: FilterData::new(x_width, y_width),
            b,
            c,
        }
    }

    /// Evaluate the 1D filter at `x` in [-1, 1].
    ///
    /// * `x` - The normalized offset.
    fn mitchell_1d(&self, x: Float) -> Float {
        let (b, c) = (self.b, self.c);
        let x = abs(2.0 * x);
        if x > 1.0 {
            ((-b - 6.0 * c) * x * x * x + (6.0 * b + 30.0 * c) * x * x + (-12.0 * b - 48.0 * c) * x + (8.0 * b + 24.0 * c))
                * (1.0 / 6.0)
        } else {
            ((12.0 - 9.0 * b - 6.0 * c) * x * x * x + (-18.0 + 12.0 * b + 6.0 * c) * x * x + (6.0 - 2.0 * b)) * (1.0 / 6.0)
        }
    }
}

impl Filter for MitchellFilter {
    fn data(&self) -> &FilterData {
        &self.data
    }

    /// Returns value of the filter at a given offset.
    ///
    /// * `x` - Offset in x from the filter center.
    /// * `y` - Offset in y from the filter center.
    fn evaluate(&self, x: Float, y: Float) -> Float {
        self.mitchell_1d(x * self.data.inv_x_width) * self.mitchell_1d(y * self.data.inv_y_width)
    }
}

impl From<&ParamSet> for MitchellFilter {
    /// Create a `MitchellFilter` from `ParamSet`.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let xw = params.find_one_float("xwidth", 2.0);
        let yw = params.find_one_float("ywidth", 2.0);
        let b = params.find_one_float("B", 1.0 / 3.0);
        let c = params.find_one_float("C", 1.0 / 3.0);
        Self::new(xw, yw, b, c)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
