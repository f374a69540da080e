//! The API
//!
//! Scene description directives in the order a scene file issues them:
//! rendering options first, then `world_begin()`, the world description and
//! `world_end()`, which returns the scene and the renderer.

#[macro_use]
extern crate log;

mod error;
mod factories;
mod graphics_state;
mod render_options;
mod transform_set;

// Re-export.
pub use error::*;
pub use factories::*;
pub use graphics_state::*;
pub use render_options::*;
pub use transform_set::*;

use lumen_core::geometry::*;
use lumen_core::paramset::*;
use lumen_core::pbrt::*;
use lumen_core::primitive::*;
use lumen_core::renderer::*;
use lumen_core::scene::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Block of the scene description being processed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ApiState {
    /// Before `WorldBegin`; rendering options may be set.
    OptionsBlock,

    /// Between `WorldBegin` and `WorldEnd`; the scene is described.
    WorldBlock,
}

/// State of the scene description API.
pub struct Api {
    /// Current block.
    current_api_state: ApiState,

    /// Current set of transformations.
    current_transforms: TransformSet,

    /// Active transformation (start time, end time or both) to which
    /// new transformations will be applied.
    active_transform_bits: usize,

    /// Stores transformations for named coordinate systems.
    named_coordinate_systems: HashMap<String, TransformSet>,

    /// Render options.
    render_options: RenderOptions,

    /// Graphics state.
    graphics_state: GraphicsState,

    /// Used as a stack for the graphics state.
    pushed_graphics_states: Vec<GraphicsState>,

    /// Used as a stack for the transformations.
    pushed_transforms: Vec<TransformSet>,

    /// Used as a stack for the active transformations.
    pushed_active_transform_bits: Vec<usize>,

    /// Number of render threads; 0 uses all cores.
    n_threads: usize,

    /// Hide the render progress bar.
    quiet: bool,
}

impl Api {
    /// Returns a new API in the options block.
    ///
    /// * `n_threads` - Number of render threads; 0 uses all cores.
    /// * `quiet`     - Hide the render progress bar.
    pub fn new(n_threads: usize, quiet: bool) -> Self {
        Self {
            current_api_state: ApiState::OptionsBlock,
            current_transforms: TransformSet::default(),
            active_transform_bits: ALL_TRANSFORM_BITS,
            named_coordinate_systems: HashMap::new(),
            render_options: RenderOptions::default(),
            graphics_state: GraphicsState::default(),
            pushed_graphics_states: vec![],
            pushed_transforms: vec![],
            pushed_active_transform_bits: vec![],
            n_threads,
            quiet,
        }
    }

    /// Returns the current block.
    pub fn state(&self) -> ApiState {
        self.current_api_state
    }

    /* Transformations */

    /// Set the active transformations to the identity matrix.
    pub fn identity(&mut self) -> Result<(), ApiError> {
        self.current_transforms
            .update(self.active_transform_bits, |_| Transform::identity());
        Ok(())
    }

    /// Apply a translation to the active transformations.
    ///
    /// * `dx` - Translation in x-direction.
    /// * `dy` - Translation in y-direction.
    /// * `dz` - Translation in z-direction.
    pub fn translate(&mut self, dx: Float, dy: Float, dz: Float) -> Result<(), ApiError> {
        let transform = Transform::translate(&Vector3f::new(dx, dy, dz));
        self.concat(transform);
        Ok(())
    }

    /// Apply a scale to the active transformations.
    ///
    /// * `sx` - Scale in x-direction.
    /// * `sy` - Scale in y-direction.
    /// * `sz` - Scale in z-direction.
    pub fn scale(&mut self, sx: Float, sy: Float, sz: Float) -> Result<(), ApiError> {
        let transform = Transform::scale(sx, sy, sz)?;
        self.concat(transform);
        Ok(())
    }

    /// Apply a rotation about an axis to the active transformations.
    ///
    /// * `angle` - Angle in degrees.
    /// * `dx`    - Axis x-component.
    /// * `dy`    - Axis y-component.
    /// * `dz`    - Axis z-component.
    pub fn rotate(&mut self, angle: Float, dx: Float, dy: Float, dz: Float) -> Result<(), ApiError> {
        let transform = Transform::rotate(angle, &Vector3f::new(dx, dy, dz));
        self.concat(transform);
        Ok(())
    }

    /// Apply a viewing transformation to the active transformations.
    ///
    /// * `eye`  - Eye position.
    /// * `look` - Point to look at.
    /// * `up`   - Up vector.
    pub fn look_at(&mut self, eye: Point3f, look: Point3f, up: Vector3f) -> Result<(), ApiError> {
        let transform = Transform::look_at(&eye, &look, &up)?;
        self.concat(transform);
        Ok(())
    }

    /// Concatenate a transformation to the active transformations.
    ///
    /// * `tr` - Transformation matrix in column-major form.
    ///          |0, 4,  8, 12|
    ///          |1, 5,  9, 13|
    ///          |2, 6, 10, 14|
    ///          |3, 7, 11, 15|
    pub fn concat_transform(&mut self, tr: &[Float; 16]) -> Result<(), ApiError> {
        let transform = Transform::new(Matrix4x4::from_slice(tr).transpose())?;
        self.concat(transform);
        Ok(())
    }

    /// Replace the active transformations.
    ///
    /// * `tr` - Transformation matrix in column-major form.
    pub fn transform(&mut self, tr: &[Float; 16]) -> Result<(), ApiError> {
        let transform = Transform::new(Matrix4x4::from_slice(tr).transpose())?;
        self.current_transforms
            .update(self.active_transform_bits, |_| transform);
        Ok(())
    }

    /// Name the current transformations.
    ///
    /// * `name` - Name of the coordinate system.
    pub fn coordinate_system(&mut self, name: &str) -> Result<(), ApiError> {
        self.named_coordinate_systems
            .insert(name.to_string(), self.current_transforms);
        Ok(())
    }

    /// Restore transformations saved with `coordinate_system()`.
    ///
    /// * `name` - Name of the coordinate system.
    pub fn coord_sys_transform(&mut self, name: &str) -> Result<(), ApiError> {
        match self.named_coordinate_systems.get(name) {
            Some(transforms) => {
                self.current_transforms = *transforms;
                Ok(())
            }
            None => Err(ApiError::UnknownCoordinateSystem(name.to_string())),
        }
    }

    /// Apply further transformations at both transform times.
    pub fn active_transform_all(&mut self) -> Result<(), ApiError> {
        self.active_transform_bits = ALL_TRANSFORM_BITS;
        Ok(())
    }

    /// Apply further transformations at the end time only.
    pub fn active_transform_end(&mut self) -> Result<(), ApiError> {
        self.active_transform_bits = END_TRANSFORM_BITS;
        Ok(())
    }

    /// Apply further transformations at the start time only.
    pub fn active_transform_start(&mut self) -> Result<(), ApiError> {
        self.active_transform_bits = START_TRANSFORM_BITS;
        Ok(())
    }

    /// Set the times of the start and end transformations.
    ///
    /// * `start` - Start time.
    /// * `end`   - End time.
    pub fn transform_times(&mut self, start: Float, end: Float) -> Result<(), ApiError> {
        self.verify_options("TransformTimes")?;
        self.render_options.transform_start_time = start;
        self.render_options.transform_end_time = end;
        Ok(())
    }

    /* Rendering options */

    /// Select the reconstruction filter.
    ///
    /// * `name`   - Name.
    /// * `params` - Parameter set.
    pub fn pixel_filter(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_options("PixelFilter")?;
        self.render_options.filter_name = name.to_string();
        self.render_options.filter_params = params.clone();
        Ok(())
    }

    /// Select the film.
    ///
    /// * `name`   - Name.
    /// * `params` - Parameter set.
    pub fn film(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_options("Film")?;
        self.render_options.film_name = name.to_string();
        self.render_options.film_params = params.clone();
        Ok(())
    }

    /// Select the sampler.
    ///
    /// * `name`   - Name.
    /// * `params` - Parameter set.
    pub fn sampler(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_options("Sampler")?;
        self.render_options.sampler_name = name.to_string();
        self.render_options.sampler_params = params.clone();
        Ok(())
    }

    /// Select the accelerator.
    ///
    /// * `name`   - Name.
    /// * `params` - Parameter set.
    pub fn accelerator(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_options("Accelerator")?;
        self.render_options.accelerator_name = name.to_string();
        self.render_options.accelerator_params = params.clone();
        Ok(())
    }

    /// Select the surface integrator.
    ///
    /// * `name`   - Name.
    /// * `params` - Parameter set.
    pub fn surface_integrator(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_options("SurfaceIntegrator")?;
        self.render_options.surface_integrator_name = name.to_string();
        self.render_options.surface_integrator_params = params.clone();
        Ok(())
    }

    /// Select the volume integrator.
    ///
    /// * `name`   - Name.
    /// * `params` - Parameter set.
    pub fn volume_integrator(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_options("VolumeIntegrator")?;
        self.render_options.volume_integrator_name = name.to_string();
        self.render_options.volume_integrator_params = params.clone();
        Ok(())
    }

    /// Select the renderer.
    ///
    /// * `name`   - Name.
    /// * `params` - Parameter set.
    pub fn renderer(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_options("Renderer")?;
        self.render_options.renderer_name = name.to_string();
        self.render_options.renderer_params = params.clone();
        Ok(())
    }

    /// Select the camera. The current transformations map world space to
    /// camera space; their inverse is named "camera".
    ///
    /// * `name`   - Name.
    /// * `params` - Parameter set.
    pub fn camera(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_options("Camera")?;
        self.render_options.camera_name = name.to_string();
        self.render_options.camera_params = params.clone();
        self.render_options.camera_to_world = self.current_transforms.inverse();
        self.named_coordinate_systems
            .insert(String::from("camera"), self.render_options.camera_to_world);
        Ok(())
    }

    /* World description */

    /// Start the world block with identity transformations named "world".
    pub fn world_begin(&mut self) -> Result<(), ApiError> {
        self.verify_options("WorldBegin")?;
        self.current_api_state = ApiState::WorldBlock;
        self.current_transforms = TransformSet::default();
        self.active_transform_bits = ALL_TRANSFORM_BITS;
        self.named_coordinate_systems
            .insert(String::from("world"), self.current_transforms);
        Ok(())
    }

    /// Save the graphics state and transformations.
    pub fn attribute_begin(&mut self) -> Result<(), ApiError> {
        self.verify_world("AttributeBegin")?;
        self.pushed_graphics_states.push(self.graphics_state.clone());
        self.pushed_transforms.push(self.current_transforms);
        self.pushed_active_transform_bits
            .push(self.active_transform_bits);
        Ok(())
    }

    /// Restore the graphics state and transformations.
    pub fn attribute_end(&mut self) -> Result<(), ApiError> {
        self.verify_world("AttributeEnd")?;
        if self.pushed_graphics_states.is_empty() || self.pushed_transforms.is_empty() {
            return Err(ApiError::UnmatchedEnd("AttributeEnd"));
        }
        if let Some(gs) = self.pushed_graphics_states.pop() {
            self.graphics_state = gs;
        }
        self.pop_transforms();
        Ok(())
    }

    /// Save the transformations.
    pub fn transform_begin(&mut self) -> Result<(), ApiError> {
        self.verify_world("TransformBegin")?;
        self.pushed_transforms.push(self.current_transforms);
        self.pushed_active_transform_bits
            .push(self.active_transform_bits);
        Ok(())
    }

    /// Restore the transformations.
    pub fn transform_end(&mut self) -> Result<(), ApiError> {
        self.verify_world("TransformEnd")?;
        if self.pushed_transforms.is_empty() {
            return Err(ApiError::UnmatchedEnd("TransformEnd"));
        }
        self.pop_transforms();
        Ok(())
    }

    /// Define a named texture.
    ///
    /// * `name`   - Texture name.
    /// * `kind`   - Value type: "float", "spectrum" or "color".
    /// * `class`  - Texture implementation.
    /// * `params` - Parameter set.
    pub fn texture(&mut self, name: &str, kind: &str, class: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_world("Texture")?;
        let gs = &mut self.graphics_state;
        match kind {
            "float" => {
                let tex = {
                    let tp = TextureParams::new(params, params, &gs.float_textures, &gs.spectrum_textures);
                    make_float_texture(class, &tp)?
                };
                if gs.float_textures.insert(name.to_string(), tex).is_some() {
                    warn!("Texture '{}' being redefined", name);
                }
            }
            "color" | "spectrum" => {
                let tex = {
                    let tp = TextureParams::new(params, params, &gs.float_textures, &gs.spectrum_textures);
                    make_spectrum_texture(class, &tp)?
                };
                if gs.spectrum_textures.insert(name.to_string(), tex).is_some() {
                    warn!("Texture '{}' being redefined", name);
                }
            }
            _ => {
                return Err(ApiError::UnknownTexture {
                    kind: kind.to_string(),
                    name: name.to_string(),
                })
            }
        }
        params.report_unused();
        Ok(())
    }

    /// Set the current material.
    ///
    /// * `name`   - Material implementation.
    /// * `params` - Parameter set.
    pub fn material(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_world("Material")?;
        self.graphics_state.material = name.to_string();
        self.graphics_state.material_params = params.clone();
        self.graphics_state.current_named_material.clear();
        Ok(())
    }

    /// Define a named material.
    ///
    /// * `name`   - Material name.
    /// * `kind`   - Material implementation.
    /// * `params` - Parameter set.
    pub fn make_named_material(&mut self, name: &str, kind: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_world("MakeNamedMaterial")?;
        let gs = &mut self.graphics_state;
        let material = {
            let tp = TextureParams::new(params, &gs.material_params, &gs.float_textures, &gs.spectrum_textures);
            make_material(kind, &tp)?
        };
        params.report_unused();
        if gs.named_materials.insert(name.to_string(), material).is_some() {
            warn!("Named material '{}' redefined", name);
        }
        Ok(())
    }

    /// Select a named material for subsequent shapes.
    ///
    /// * `name` - Material name.
    pub fn named_material(&mut self, name: &str) -> Result<(), ApiError> {
        self.verify_world("NamedMaterial")?;
        if !self.graphics_state.named_materials.contains_key(name) {
            return Err(ApiError::UnknownNamedMaterial(name.to_string()));
        }
        self.graphics_state.current_named_material = name.to_string();
        Ok(())
    }

    /// Add a light source.
    ///
    /// * `name`   - Light implementation.
    /// * `params` - Parameter set.
    pub fn light_source(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_world("LightSource")?;
        let light = make_light(name, &self.current_transforms[0], params)?;
        params.report_unused();
        self.render_options.lights.push(light);
        Ok(())
    }

    /// Make subsequent shapes emit light.
    ///
    /// * `name`   - Area light implementation.
    /// * `params` - Parameter set.
    pub fn area_light_source(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_world("AreaLightSource")?;
        self.graphics_state.area_light = name.to_string();
        self.graphics_state.area_light_params = params.clone();
        Ok(())
    }

    /// Add a shape with the current material, and area light if one is set.
    ///
    /// * `name`   - Shape implementation.
    /// * `params` - Parameter set.
    pub fn shape(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_world("Shape")?;

        let gs = &self.graphics_state;
        let mut area = None;
        let prim: ArcPrimitive = if !self.current_transforms.is_animated() {
            // Create primitive for static shape.
            let shape = make_shape(name, &self.current_transforms[0], gs.reverse_orientation, params)?;
            let material = gs.create_material(params)?;

            // Possibly create area light for shape.
            if !gs.area_light.is_empty() {
                area = Some(make_area_light(
                    &gs.area_light,
                    &self.current_transforms[0],
                    &gs.area_light_params,
                    Arc::clone(&shape),
                )?);
            }
            Arc::new(Primitive::Geometric(GeometricPrimitive::new(shape, material, area.clone())))
        } else {
            // Create primitive for animated shape.
            if !gs.area_light.is_empty() {
                warn!("Ignoring currently set area light when creating animated shape");
            }
            let shape = make_shape(name, &Transform::identity(), gs.reverse_orientation, params)?;
            let material = gs.create_material(params)?;

            let world_to_object = self.current_transforms.inverse().animated(
                self.render_options.transform_start_time,
                self.render_options.transform_end_time,
            );

            let mut base: ArcPrimitive = Arc::new(Primitive::Geometric(GeometricPrimitive::new(shape, material, None)));
            if !base.can_intersect() {
                // Refine animated shape and create a grid if more than one
                // shape was created.
                let mut refined = Primitive::full_refine(&base);
                base = match refined.len() {
                    0 => return Ok(()),
                    1 => refined.remove(0),
                    _ => Arc::new(Primitive::Grid(lumen_core::accelerators::GridAccel::new(refined, false))),
                };
            }
            Arc::new(Primitive::Transformed(TransformedPrimitive::new(base, world_to_object)))
        };
        params.report_unused();

        // Add primitive to scene or current instance.
        match self.render_options.current_instance.as_ref() {
            Some(instance) => {
                if area.is_some() {
                    warn!("Area lights not supported with object instancing");
                }
                if let Some(prims) = self.render_options.instances.get_mut(instance) {
                    prims.push(prim);
                }
            }
            None => {
                self.render_options.primitives.push(prim);
                if let Some(light) = area {
                    self.render_options.lights.push(light);
                }
            }
        }
        Ok(())
    }

    /// Flip the surface normals of subsequent shapes.
    pub fn reverse_orientation(&mut self) -> Result<(), ApiError> {
        self.verify_world("ReverseOrientation")?;
        self.graphics_state.reverse_orientation = !self.graphics_state.reverse_orientation;
        Ok(())
    }

    /// Add a volume region.
    ///
    /// * `name`   - Volume implementation.
    /// * `params` - Parameter set.
    pub fn volume(&mut self, name: &str, params: &ParamSet) -> Result<(), ApiError> {
        self.verify_world("Volume")?;
        let region = make_volume_region(name, &self.current_transforms[0], params)?;
        params.report_unused();
        self.render_options.volume_regions.push(region);
        Ok(())
    }

    /// Start an instance definition. Shapes are collected into the instance
    /// until `object_end()`.
    ///
    /// * `name` - Instance name.
    pub fn object_begin(&mut self, name: &str) -> Result<(), ApiError> {
        self.verify_world("ObjectBegin")?;
        if self.render_options.current_instance.is_some() {
            return Err(ApiError::NestedInstance("ObjectBegin"));
        }
        self.attribute_begin()?;
        if self
            .render_options
            .instances
            .insert(name.to_string(), vec![])
            .is_some()
        {
            warn!("Object '{}' being redefined", name);
        }
        self.render_options.current_instance = Some(name.to_string());
        Ok(())
    }

    /// End the instance definition.
    pub fn object_end(&mut self) -> Result<(), ApiError> {
        self.verify_world("ObjectEnd")?;
        if self.render_options.current_instance.is_none() {
            return Err(ApiError::InstanceOutsideDefinition);
        }
        self.attribute_end()?;
        self.render_options.current_instance = None;
        Ok(())
    }

    /// Place a defined instance with the current transformations.
    ///
    /// * `name` - Instance name.
    pub fn object_instance(&mut self, name: &str) -> Result<(), ApiError> {
        self.verify_world("ObjectInstance")?;
        if self.render_options.current_instance.is_some() {
            return Err(ApiError::NestedInstance("ObjectInstance"));
        }

        let ro = &mut self.render_options;
        let prims = ro
            .instances
            .get_mut(name)
            .ok_or_else(|| ApiError::UnknownInstance(name.to_string()))?;
        if prims.is_empty() {
            return Ok(());
        }
        if prims.len() > 1 || !prims[0].can_intersect() {
            // Refine instance primitives and create aggregate.
            let accelerator = make_accelerator(&ro.accelerator_name, &ro.accelerator_params, prims.clone())?;
            *prims = vec![accelerator];
        }
        let instance = Arc::clone(&prims[0]);

        let world_to_instance = self
            .current_transforms
            .inverse()
            .animated(ro.transform_start_time, ro.transform_end_time);
        ro.primitives.push(Arc::new(Primitive::Transformed(TransformedPrimitive::new(
            instance,
            world_to_instance,
        ))));
        Ok(())
    }

    /// End the world block. Returns the scene and the renderer configured
    /// by the rendering options, and resets the API to the options block.
    pub fn world_end(&mut self) -> Result<(Scene, SamplerRenderer), ApiError> {
        self.verify_world("WorldEnd")?;
        if self.render_options.current_instance.is_some() {
            return Err(ApiError::UnclosedScopes("ObjectBegin"));
        }
        if !self.pushed_graphics_states.is_empty() {
            return Err(ApiError::UnclosedScopes("AttributeBegin"));
        }
        if !self.pushed_transforms.is_empty() {
            return Err(ApiError::UnclosedScopes("TransformBegin"));
        }

        let mut render_options = std::mem::take(&mut self.render_options);
        self.reset();

        let renderer = render_options.make_renderer(self.n_threads, self.quiet)?;
        let scene = render_options.make_scene()?;
        Ok((scene, renderer))
    }

    /* Helpers */

    /// Right-multiply the active transformations by `transform`.
    ///
    /// * `transform` - The transformation.
    fn concat(&mut self, transform: Transform) {
        self.current_transforms
            .update(self.active_transform_bits, |t| *t * transform);
    }

    /// Pop the transformation stacks.
    fn pop_transforms(&mut self) {
        if let Some(transforms) = self.pushed_transforms.pop() {
            self.current_transforms = transforms;
        }
        if let Some(bits) = self.pushed_active_transform_bits.pop() {
            self.active_transform_bits = bits;
        }
    }

    /// Return to the options block with default state.
    fn reset(&mut self) {
        self.current_api_state = ApiState::OptionsBlock;
        self.current_transforms = TransformSet::default();
        self.active_transform_bits = ALL_TRANSFORM_BITS;
        self.named_coordinate_systems.clear();
        self.graphics_state = GraphicsState::default();
    }

    /// Fails if called inside the world block.
    ///
    /// * `func` - Directive name.
    fn verify_options(&self, func: &str) -> Result<(), ApiError> {
        if self.current_api_state == ApiState::WorldBlock {
            Err(ApiError::inside_world(func))
        } else {
            Ok(())
        }
    }

    /// Fails if called outside the world block.
    ///
    /// * `func` - Directive name.
    fn verify_world(&self, func: &str) -> Result<(), ApiError> {
        if self.current_api_state == ApiState::OptionsBlock {
            Err(ApiError::outside_world(func))
        } else {
            Ok(())
        }
    }
}

impl Default for Api {
    /// Returns an API that renders on all cores with a progress bar.
    fn default() -> Self {
        Self::new(0, false)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use lumen_core::camera::*;

    fn quiet_api() -> Api {
        Api::new(1, true)
    }

    fn small_film(res: Int) -> ParamSet {
        let mut ps = ParamSet::new();
        ps.add_int("xresolution", &[res]);
        ps.add_int("yresolution", &[res]);
        ps
    }

    #[test]
    fn shape_before_world_begin_is_rejected() {
        let mut api = quiet_api();
        let err = api.shape("sphere", &ParamSet::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Scene description must be inside world block; 'Shape' not allowed."
        );
        assert_eq!(api.state(), ApiState::OptionsBlock);
        assert!(api.render_options.primitives.is_empty());
    }

    #[test]
    fn options_inside_world_are_rejected() {
        let mut api = quiet_api();
        api.world_begin().unwrap();
        let err = api.film("image", &small_film(4)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Options cannot be set inside world block; 'Film' not allowed."
        );
        assert_eq!(api.render_options.film_params.find_int("xresolution"), Vec::<Int>::new());
        assert!(api.world_begin().is_err());
        assert!(api.transform_times(0.0, 2.0).is_err());
        assert_eq!(api.render_options.transform_end_time, 1.0);
    }

    #[test]
    fn unmatched_and_unclosed_scopes() {
        let mut api = quiet_api();
        api.world_begin().unwrap();
        assert_eq!(api.attribute_end(), Err(ApiError::UnmatchedEnd("AttributeEnd")));
        assert_eq!(api.transform_end(), Err(ApiError::UnmatchedEnd("TransformEnd")));

        api.transform_begin().unwrap();
        assert!(matches!(api.world_end(), Err(ApiError::UnclosedScopes("TransformBegin"))));
        api.transform_end().unwrap();

        api.attribute_begin().unwrap();
        assert!(matches!(api.world_end(), Err(ApiError::UnclosedScopes("AttributeBegin"))));
        api.attribute_end().unwrap();

        api.object_begin("open").unwrap();
        assert!(matches!(api.world_end(), Err(ApiError::UnclosedScopes("ObjectBegin"))));
        api.object_end().unwrap();
        assert!(api.world_end().is_ok());
        assert_eq!(api.state(), ApiState::OptionsBlock);
    }

    #[test]
    fn attributes_restore_graphics_state_and_transforms() {
        let mut api = quiet_api();
        api.world_begin().unwrap();
        api.attribute_begin().unwrap();
        api.translate(1.0, 2.0, 3.0).unwrap();
        api.reverse_orientation().unwrap();
        api.material("mirror", &ParamSet::new()).unwrap();
        api.attribute_end().unwrap();

        assert_eq!(api.current_transforms, TransformSet::default());
        assert!(!api.graphics_state.reverse_orientation);
        assert_eq!(api.graphics_state.material, "matte");
    }

    #[test]
    fn named_coordinate_systems() {
        let mut api = quiet_api();
        api.translate(0.0, 0.0, 5.0).unwrap();
        api.coordinate_system("shifted").unwrap();
        api.camera("perspective", &ParamSet::new()).unwrap();
        api.world_begin().unwrap();
        assert_eq!(api.current_transforms, TransformSet::default());

        api.coord_sys_transform("shifted").unwrap();
        let p = api.current_transforms[0].transform_point(&Point3f::zero());
        assert!(approx_eq!(Float, p.z, 5.0, epsilon = 1e-6));

        api.coord_sys_transform("camera").unwrap();
        let p = api.current_transforms[0].transform_point(&Point3f::zero());
        assert!(approx_eq!(Float, p.z, -5.0, epsilon = 1e-6));

        assert_eq!(
            api.coord_sys_transform("nowhere"),
            Err(ApiError::UnknownCoordinateSystem(String::from("nowhere")))
        );
    }

    #[test]
    fn active_transform_end_animates_shapes() {
        let mut api = quiet_api();
        api.world_begin().unwrap();
        api.active_transform_end().unwrap();
        api.translate(2.0, 0.0, 0.0).unwrap();
        api.active_transform_all().unwrap();
        assert!(api.current_transforms.is_animated());
        api.shape("sphere", &ParamSet::new()).unwrap();

        let (scene, _) = api.world_end().unwrap();
        let b = scene.world_bound();
        assert!(approx_eq!(Float, b.p_min.x, -1.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, b.p_max.x, 3.0, epsilon = 1e-4));
    }

    #[test]
    fn named_materials_must_exist() {
        let mut api = quiet_api();
        api.world_begin().unwrap();
        assert_eq!(
            api.named_material("chrome"),
            Err(ApiError::UnknownNamedMaterial(String::from("chrome")))
        );

        api.make_named_material("chrome", "mirror", &ParamSet::new()).unwrap();
        api.named_material("chrome").unwrap();
        api.shape("sphere", &ParamSet::new()).unwrap();
        assert_eq!(api.render_options.primitives.len(), 1);

        assert!(api.make_named_material("plastic", "plastic", &ParamSet::new()).is_err());
    }

    #[test]
    fn textures_feed_materials() {
        let mut api = quiet_api();
        api.world_begin().unwrap();

        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("value", &[0.1, 0.2, 0.3]);
        api.texture("tint", "color", "constant", &ps).unwrap();
        assert!(api.graphics_state.spectrum_textures.contains_key("tint"));

        let mut ps = ParamSet::new();
        ps.add_texture("Kd", &[String::from("tint")]);
        api.material("matte", &ps).unwrap();
        api.shape("sphere", &ParamSet::new()).unwrap();

        assert!(matches!(
            api.texture("bad", "normal", "constant", &ParamSet::new()),
            Err(ApiError::UnknownTexture { .. })
        ));
    }

    #[test]
    fn instances_are_placed_with_current_transform() {
        let mut api = quiet_api();
        api.world_begin().unwrap();

        assert!(matches!(api.object_end(), Err(ApiError::InstanceOutsideDefinition)));
        api.object_begin("pair").unwrap();
        assert!(matches!(api.object_begin("inner"), Err(ApiError::NestedInstance("ObjectBegin"))));
        assert!(matches!(api.object_instance("pair"), Err(ApiError::NestedInstance("ObjectInstance"))));
        api.shape("sphere", &ParamSet::new()).unwrap();
        api.translate(0.0, 3.0, 0.0).unwrap();
        api.shape("sphere", &ParamSet::new()).unwrap();
        api.object_end().unwrap();
        assert!(api.render_options.primitives.is_empty());
        assert_eq!(api.current_transforms, TransformSet::default());

        assert_eq!(
            api.object_instance("triple"),
            Err(ApiError::UnknownInstance(String::from("triple")))
        );
        api.translate(10.0, 0.0, 0.0).unwrap();
        api.object_instance("pair").unwrap();

        let (scene, _) = api.world_end().unwrap();
        let b = scene.world_bound();
        assert!(approx_eq!(Float, b.p_min.x, 9.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, b.p_max.x, 11.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, b.p_max.y, 4.0, epsilon = 1e-4));
    }

    #[test]
    fn area_light_shapes_add_lights() {
        let mut api = quiet_api();
        api.world_begin().unwrap();
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("L", &[1.0, 1.0, 1.0]);
        api.attribute_begin().unwrap();
        api.area_light_source("diffuse", &ps).unwrap();
        api.shape("disk", &ParamSet::new()).unwrap();
        api.attribute_end().unwrap();
        api.shape("sphere", &ParamSet::new()).unwrap();

        let (scene, _) = api.world_end().unwrap();
        assert_eq!(scene.lights.len(), 1);
    }

    #[test]
    fn unknown_implementation_surfaces_core_error() {
        let mut api = quiet_api();
        api.world_begin().unwrap();
        let err = api.shape("teapot", &ParamSet::new()).unwrap_err();
        assert_eq!(
            err,
            ApiError::Core(lumen_core::error::Error::unknown("shape", "teapot"))
        );
    }

    #[test]
    fn renders_lit_sphere() {
        let mut api = quiet_api();
        let res = 8;
        api.film("image", &small_film(res)).unwrap();
        let mut sampler = ParamSet::new();
        sampler.add_int("xsamples", &[1]);
        sampler.add_int("ysamples", &[1]);
        sampler.add_bool("jitter", &[false]);
        api.sampler("stratified", &sampler).unwrap();
        api.look_at(
            Point3f::new(0.0, 0.0, -5.0),
            Point3f::zero(),
            Vector3f::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        let mut camera = ParamSet::new();
        camera.add_float("fov", &[30.0]);
        api.camera("perspective", &camera).unwrap();

        api.world_begin().unwrap();
        let mut light = ParamSet::new();
        light.add_point3f("from", &[Point3f::new(0.0, 0.0, -5.0)]);
        light.add_rgb_spectrum("I", &[10.0, 10.0, 10.0]);
        api.light_source("point", &light).unwrap();
        api.shape("sphere", &ParamSet::new()).unwrap();
        let (scene, renderer) = api.world_end().unwrap();

        renderer.render(&scene, &CancellationToken::new()).unwrap();
        let rgb = renderer.camera().film().rgb(1.0);
        let res = res as usize;
        let center = 3 * ((res / 2) * res + res / 2);
        assert!(rgb[center] > 0.0);
        assert!(rgb[0..3].iter().all(|&c| c == 0.0));
    }

    #[test]
    fn cancelled_render_reports_cancellation() {
        let mut api = quiet_api();
        api.film("image", &small_film(4)).unwrap();
        api.world_begin().unwrap();
        api.shape("sphere", &ParamSet::new()).unwrap();
        let (scene, renderer) = api.world_end().unwrap();

        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(renderer.render(&scene, &token), Err(RenderError::Cancelled));
    }
}
