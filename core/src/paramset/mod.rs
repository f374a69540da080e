//! Parameter Sets

use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;

mod texture_params;

// Re-export
pub use texture_params::*;

/// A named list of parameter values that remembers whether it was read.
#[derive(Clone, Debug)]
pub struct ParamSetItem<T> {
    /// The values.
    pub values: Vec<T>,

    /// Set once a lookup touched this item.
    looked_up: Cell<bool>,
}

impl<T> ParamSetItem<T> {
    /// Create a new `ParamSetItem`.
    ///
    /// * `values` - The values.
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values,
            looked_up: Cell::new(false),
        }
    }
}

/// A hashmap of parameter sets stored by name.
pub type ParamSetMap<T> = HashMap<String, ParamSetItem<T>>;

/// Stores parameter set items of different types in hashmaps.
#[derive(Clone, Debug, Default)]
pub struct ParamSet {
    pub bools: ParamSetMap<bool>,
    pub ints: ParamSetMap<Int>,
    pub floats: ParamSetMap<Float>,
    pub point3fs: ParamSetMap<Point3f>,
    pub vector3fs: ParamSetMap<Vector3f>,
    pub normal3fs: ParamSetMap<Normal3f>,
    pub spectra: ParamSetMap<Spectrum>,
    pub strings: ParamSetMap<String>,
    pub textures: ParamSetMap<String>,
}

/// Define a macro that can be used to generate a function for adding/replacing
/// parameter set item.
macro_rules! paramset_add {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&mut self, name: &str, values: &[$t]) {
            self.$paramset
                .insert(name.to_string(), ParamSetItem::new(values.to_vec()));
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a single item.
macro_rules! paramset_find_one {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str, default: $t) -> $t {
            match self.$paramset.get(name) {
                Some(param) if param.values.len() == 1 => {
                    param.looked_up.set(true);
                    param.values[0].clone()
                }
                _ => default,
            }
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a list.
macro_rules! paramset_find {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str) -> Vec<$t> {
            match self.$paramset.get(name) {
                Some(param) => {
                    param.looked_up.set(true);
                    param.values.clone()
                }
                None => vec![],
            }
        }
    };
}

/// Define a macro that warns about items nobody looked up.
macro_rules! report_unused {
    ($params: expr, $param_type: literal, $unused: ident) => {
        for (name, param) in $params.iter() {
            if !param.looked_up.get() {
                warn!("Parameter \"{} {}\" not used", $param_type, name);
                $unused += 1;
            }
        }
    };
}

impl ParamSet {
    /// Returns a new `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    paramset_find_one!(find_one_int, Int, ints);
    paramset_find!(find_int, Int, ints);
    paramset_add!(add_int, Int, ints);

    paramset_find_one!(find_one_bool, bool, bools);
    paramset_find!(find_bool, bool, bools);
    paramset_add!(add_bool, bool, bools);

    paramset_find_one!(find_one_float, Float, floats);
    paramset_find!(find_float, Float, floats);
    paramset_add!(add_float, Float, floats);

    paramset_find_one!(find_one_point3f, Point3f, point3fs);
    paramset_find!(find_point3f, Point3f, point3fs);
    paramset_add!(add_point3f, Point3f, point3fs);

    paramset_find_one!(find_one_vector3f, Vector3f, vector3fs);
    paramset_find!(find_vector3f, Vector3f, vector3fs);
    paramset_add!(add_vector3f, Vector3f, vector3fs);

    paramset_find_one!(find_one_normal3f, Normal3f, normal3fs);
    paramset_find!(find_normal3f, Normal3f, normal3fs);
    paramset_add!(add_normal3f, Normal3f, normal3fs);

    paramset_find_one!(find_one_string, String, strings);
    paramset_find!(find_string, String, strings);
    paramset_add!(add_string, String, strings);

    paramset_find_one!(find_one_texture, String, textures);
    paramset_add!(add_texture, String, textures);

    paramset_find_one!(find_one_spectrum, Spectrum, spectra);
    paramset_find!(find_spectrum, Spectrum, spectra);
    paramset_add!(add_spectrum, Spectrum, spectra);

    /// Add/replace an RGB spectrum.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - RGB values in a linear slice; trailing values that do not
    ///              form a full triple are ignored.
    pub fn add_rgb_spectrum(&mut self, name: &str, values: &[Float]) {
        if values.len() % 3 != 0 {
            warn!("Ignoring extra values for RGB spectrum '{}'", name);
        }
        let spectra = values
            .chunks_exact(3)
            .map(|c| Spectrum::from_rgb(c[0], c[1], c[2]))
            .collect();
        self.spectra.insert(name.to_string(), ParamSetItem::new(spectra));
    }

    /// Add/replace an XYZ spectrum.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - XYZ values in a linear slice; trailing values that do not
    ///              form a full triple are ignored.
    pub fn add_xyz_spectrum(&mut self, name: &str, values: &[Float]) {
        if values.len() % 3 != 0 {
            warn!("Ignoring extra values for XYZ spectrum '{}'", name);
        }
        let spectra = values
            .chunks_exact(3)
            .map(|c| Spectrum::from_xyz(&[c[0], c[1], c[2]]))
            .collect();
        self.spectra.insert(name.to_string(), ParamSetItem::new(spectra));
    }

    /// Warn about every parameter that was never looked up and return how
    /// many there were.
    pub fn report_unused(&self) -> usize {
        let mut unused = 0;
        report_unused!(self.bools, "bool", unused);
        report_unused!(self.ints, "integer", unused);
        report_unused!(self.floats, "float", unused);
        report_unused!(self.point3fs, "point", unused);
        report_unused!(self.vector3fs, "vector", unused);
        report_unused!(self.normal3fs, "normal", unused);
        report_unused!(self.spectra, "color", unused);
        report_unused!(self.strings, "string", unused);
        report_unused!(self.textures, "texture", unused);
        unused
    }

    /// Clear all parameter set items.
    pub fn clear(&mut self) {
        self.bools.clear();
        self.ints.clear();
        self.floats.clear();
        self.point3fs.clear();
        self.vector3fs.clear();
        self.normal3fs.clear();
        self.spectra.clear();
        self.strings.clear();
        self.textures.clear();
    }
}

/// Define a macro that can be used to print parameter set items.
macro_rules! display_param {
    ($params: expr, $param_type: literal, $formatter: expr) => {
        for (name, param) in $params.iter() {
            write!($formatter, "\"{} {}\" [", $param_type, name)?;
            for v in param.values.iter() {
                write!($formatter, " {}", v)?;
            }
            writeln!($formatter, " ]")?;
        }
    };
}

impl fmt::Display for ParamSet {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_param!(self.bools, "bool", f);
        display_param!(self.ints, "integer", f);
        display_param!(self.floats, "float", f);
        display_param!(self.point3fs, "point", f);
        display_param!(self.vector3fs, "vector", f);
        display_param!(self.normal3fs, "normal", f);
        display_param!(self.spectra, "color", f);
        display_param!(self.strings, "string", f);
        display_param!(self.textures, "texture", f);
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_one_returns_default_when_missing_or_not_single() {
        let mut ps = ParamSet::new();
        ps.add_float("radius", &[2.0]);
        ps.add_float("pair", &[1.0, 2.0]);
        assert_eq!(ps.find_one_float("radius", 1.0), 2.0);
        assert_eq!(ps.find_one_float("pair", 1.0), 1.0);
        assert_eq!(ps.find_one_float("missing", 1.0), 1.0);
        assert_eq!(ps.find_float("pair"), vec![1.0, 2.0]);
    }

    #[test]
    fn rgb_spectrum_values_are_grouped() {
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("Kd", &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        let s = ps.find_spectrum("Kd");
        assert_eq!(s.len(), 2);
        assert_eq!(s[1], Spectrum::from_rgb(0.4, 0.5, 0.6));
    }

    #[test]
    fn unused_parameters_are_reported() {
        let mut ps = ParamSet::new();
        ps.add_int("used", &[1]);
        ps.add_string("unused", &["x".to_string()]);
        let _ = ps.find_one_int("used", 0);
        assert_eq!(ps.report_unused(), 1);
    }
}
