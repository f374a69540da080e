//! Graphics State

use crate::factories::*;
use crate::ApiError;
use lumen_core::material::*;
use lumen_core::paramset::*;
use lumen_core::texture::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Map of named materials.
pub type NamedMaterialMap = HashMap<String, ArcMaterial>;

/// Attributes pushed and popped by `AttributeBegin`/`AttributeEnd`.
#[derive(Clone)]
pub struct GraphicsState {
    /// Stores floating point textures.
    pub float_textures: FloatTextureMap,

    /// Stores spectrum textures.
    pub spectrum_textures: SpectrumTextureMap,

    /// Parameters of the current material.
    pub material_params: ParamSet,

    /// Name of the current material implementation.
    pub material: String,

    /// Stores named materials.
    pub named_materials: NamedMaterialMap,

    /// Selected named material; empty to use `material`.
    pub current_named_material: String,

    /// Current area light parameters.
    pub area_light_params: ParamSet,

    /// Current area light name; empty when shapes do not emit.
    pub area_light: String,

    /// Reverse surface normal direction for current shape/material.
    pub reverse_orientation: bool,
}

impl GraphicsState {
    /// Returns the material for a new shape: the selected named material, or
    /// a new instance of the current material with the shape's parameters
    /// overriding the material parameters.
    ///
    /// * `params` - Shape parameters.
    pub fn create_material(&self, params: &ParamSet) -> Result<ArcMaterial, ApiError> {
        if !self.current_named_material.is_empty() {
            return match self.named_materials.get(&self.current_named_material) {
                Some(material) => Ok(Arc::clone(material)),
                None => Err(ApiError::UnknownNamedMaterial(self.current_named_material.clone())),
            };
        }

        let tp = TextureParams::new(
            params,
            &self.material_params,
            &self.float_textures,
            &self.spectrum_textures,
        );
        Ok(make_material(&self.material, &tp)?)
    }
}

impl Default for GraphicsState {
    /// Returns the initial state; shapes get a default matte material.
    fn default() -> Self {
        Self {
            float_textures: FloatTextureMap::new(),
            spectrum_textures: SpectrumTextureMap::new(),
            material_params: ParamSet::new(),
            material: String::from("matte"),
            named_materials: NamedMaterialMap::new(),
            current_named_material: String::new(),
            area_light_params: ParamSet::new(),
            area_light: String::new(),
            reverse_orientation: false,
        }
    }
}
