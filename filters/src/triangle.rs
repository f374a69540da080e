//! Triangle Filter

use lumen_core::filter::*;
use lumen_core::paramset::*;
use lumen_core::pbrt::*;

/// Implements the triangle filter in which the weight falls off linearly from
/// the filter center over the square extent of the filter.
pub struct TriangleFilter {
    /// Filter data.
    pub data: FilterData,
}

impl TriangleFilter {
    /// Returns a new instance of `TriangleFilter`.
    ///
    /// * `x_width` - Half width in x; beyond this filter is 0.
    /// * `y_width` - Half width in y; beyond this filter is 0.
    pub fn new(x_width: Float, y_width: Float) -> Self {
        Self {
            data: FilterData::new(x_width, y_width),
        }
    }
}

impl Filter for TriangleFilter {
    fn data(&self) -> &FilterData {
        &self.data
    }

    /// Returns value of the filter at a given offset.
    ///
    /// * `x` - Offset in x from the filter center.
    /// * `y` - Offset in y from the filter center.
    fn evaluate(&self, x: Float, y: Float) -> Float {
        max(0.0, self.data.x_width - abs(x)) * max(0.0, self.data.y_width - abs(y))
    }
}

impl From<&ParamSet> for TriangleFilter {
    /// Create a `TriangleFilter` from `ParamSet`.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let xw = params.find_one_float("xwidth", 2.0);
        let yw = params.find_one_float("ywidth", 2.0);
        Self::new(xw, yw)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_off_linearly() {
        let f = TriangleFilter::new(2.0, 1.0);
        assert_eq!(f.evaluate(0.0, 0.0), 2.0);
        assert_eq!(f.evaluate(1.0, 0.5), 0.5);
        assert_eq!(f.evaluate(-1.0, 0.5), 0.5);
        assert_eq!(f.evaluate(2.5, 0.0), 0.0);
    }

    #[test]
    fn widths_come_from_params() {
        let mut ps = ParamSet::new();
        ps.add_float("xwidth", &[3.0]);
        let f = TriangleFilter::from(&ps);
        assert_eq!(f.data().x_width, 3.0);
        assert_eq!(f.data().y_width, 2.0);
    }
}
