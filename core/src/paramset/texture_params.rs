//! Texture Parameters

use super::*;
use crate::error::*;
use crate::texture::*;
use std::sync::Arc;

/// Geometry and material parameters together with the named textures they
/// may refer to. Lookups try geometry parameters first, then material
/// parameters, then the default.
pub struct TextureParams<'a> {
    /// Floating point textures.
    float_textures: &'a FloatTextureMap,

    /// Spectrum textures.
    spectrum_textures: &'a SpectrumTextureMap,

    /// Geometry parameters.
    pub geom_params: &'a ParamSet,

    /// Material parameters.
    pub mat_params: &'a ParamSet,
}

/// Define a macro that can be used to generate a function for finding a
/// single value in geometry parameters, then material parameters.
macro_rules! texture_params_find {
    ($func: ident, $t: ty, $paramset_func: ident) => {
        pub fn $func(&self, name: &str, default: $t) -> $t {
            let default = self.mat_params.$paramset_func(name, default);
            self.geom_params.$paramset_func(name, default)
        }
    };
}

/// Define a macro that generates a texture lookup for a value type.
macro_rules! texture_params_get_texture {
    ($func: ident, $t: ty, $textures: ident, $find: ident, $kind: literal) => {
        pub fn $func(&self, name: &str, default: $t) -> Result<ArcTexture<$t>> {
            let mut tex_name = self.geom_params.find_one_texture(name, String::new());
            if tex_name.is_empty() {
                tex_name = self.mat_params.find_one_texture(name, String::new());
            }
            if !tex_name.is_empty() {
                return match self.$textures.get(&tex_name) {
                    Some(tex) => Ok(Arc::clone(tex)),
                    None => Err(Error::unknown($kind, &tex_name)),
                };
            }

            let value = self.mat_params.$find(name, default);
            let value = self.geom_params.$find(name, value);
            Ok(Arc::new(Texture::Constant(value)))
        }
    };
}

impl<'a> TextureParams<'a> {
    /// Create a new `TextureParams`.
    ///
    /// * `geom_params`       - Geometry parameters.
    /// * `mat_params`        - Material parameters.
    /// * `float_textures`    - Floating point textures.
    /// * `spectrum_textures` - Spectrum textures.
    pub fn new(
        geom_params: &'a ParamSet,
        mat_params: &'a ParamSet,
        float_textures: &'a FloatTextureMap,
        spectrum_textures: &'a SpectrumTextureMap,
    ) -> Self {
        Self {
            float_textures,
            spectrum_textures,
            geom_params,
            mat_params,
        }
    }

    texture_params_get_texture!(get_float_texture, Float, float_textures, find_one_float, "float texture");
    texture_params_get_texture!(
        get_spectrum_texture,
        Spectrum,
        spectrum_textures,
        find_one_spectrum,
        "spectrum texture"
    );

    /// Returns a float texture only if one is named or a value is given.
    ///
    /// * `name` - Parameter name.
    pub fn get_float_texture_or_none(&self, name: &str) -> Result<Option<ArcTexture<Float>>> {
        let named = !self.geom_params.find_one_texture(name, String::new()).is_empty()
            || !self.mat_params.find_one_texture(name, String::new()).is_empty();
        let valued = !self.geom_params.find_float(name).is_empty() || !self.mat_params.find_float(name).is_empty();
        if named || valued {
            self.get_float_texture(name, 0.0).map(Some)
        } else {
            Ok(None)
        }
    }

    texture_params_find!(find_float, Float, find_one_float);
    texture_params_find!(find_string, String, find_one_string);
    texture_params_find!(find_int, Int, find_one_int);
    texture_params_find!(find_bool, bool, find_one_bool);
    texture_params_find!(find_spectrum, Spectrum, find_one_spectrum);

    /// Warn about unused parameters in both sets.
    pub fn report_unused(&self) {
        self.geom_params.report_unused();
        self.mat_params.report_unused();
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::DifferentialGeometry;

    #[test]
    fn geometry_params_override_material_params() {
        let mut geom = ParamSet::new();
        let mut mat = ParamSet::new();
        geom.add_float("sigma", &[10.0]);
        mat.add_float("sigma", &[20.0]);
        mat.add_rgb_spectrum("Kd", &[0.1, 0.2, 0.3]);
        let (ft, st) = (FloatTextureMap::new(), SpectrumTextureMap::new());
        let tp = TextureParams::new(&geom, &mat, &ft, &st);
        let dg = DifferentialGeometry::default();

        assert_eq!(tp.find_float("sigma", 0.0), 10.0);
        assert_eq!(tp.get_float_texture("sigma", 0.0).unwrap().evaluate(&dg), 10.0);
        assert_eq!(
            tp.get_spectrum_texture("Kd", Spectrum::new(0.5)).unwrap().evaluate(&dg),
            Spectrum::from_rgb(0.1, 0.2, 0.3)
        );
        assert_eq!(tp.get_float_texture("missing", 0.25).unwrap().evaluate(&dg), 0.25);
        assert!(tp.get_float_texture_or_none("bumpmap").unwrap().is_none());
    }

    #[test]
    fn named_texture_is_used_and_unknown_name_fails() {
        let mut mat = ParamSet::new();
        mat.add_texture("Kd", &["checks".to_string()]);
        mat.add_texture("bumpmap", &["nope".to_string()]);
        let geom = ParamSet::new();
        let ft = FloatTextureMap::new();
        let mut st = SpectrumTextureMap::new();
        st.insert("checks".to_string(), Arc::new(Texture::Constant(Spectrum::new(0.75))));
        let tp = TextureParams::new(&geom, &mat, &ft, &st);

        let dg = DifferentialGeometry::default();
        assert_eq!(
            tp.get_spectrum_texture("Kd", Spectrum::new(0.5)).unwrap().evaluate(&dg),
            Spectrum::new(0.75)
        );
        assert!(tp.get_float_texture_or_none("bumpmap").is_err());
    }
}
