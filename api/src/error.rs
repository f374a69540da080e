//! API Errors

use lumen_core::error::Error;
use thiserror::Error;

/// Errors raised by scene description directives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// A directive was issued in the wrong block.
    #[error("{0}")]
    InvalidState(String),

    /// An end directive has no matching begin.
    #[error("unmatched '{0}' encountered; ignoring it")]
    UnmatchedEnd(&'static str),

    /// `CoordSysTransform` named an unknown coordinate system.
    #[error("could not find named coordinate system '{0}'")]
    UnknownCoordinateSystem(String),

    /// `ObjectInstance` named an unknown instance.
    #[error("unable to find instance named '{0}'")]
    UnknownInstance(String),

    /// A directive is not allowed inside an instance definition.
    #[error("'{0}' can't be called inside instance definition")]
    NestedInstance(&'static str),

    /// `ObjectEnd` was called outside an instance definition.
    #[error("ObjectEnd called outside of instance definition")]
    InstanceOutsideDefinition,

    /// `NamedMaterial` named an unknown material.
    #[error("named material '{0}' not defined")]
    UnknownNamedMaterial(String),

    /// `Texture` used a value type other than float or spectrum.
    #[error("texture type '{kind}' unknown for texture '{name}'")]
    UnknownTexture {
        /// Requested value type.
        kind: String,
        /// Texture name.
        name: String,
    },

    /// `WorldEnd` found open attribute or transform blocks.
    #[error("missing end to {0}")]
    UnclosedScopes(&'static str),

    /// Building a scene object failed.
    #[error(transparent)]
    Core(#[from] Error),
}

impl ApiError {
    /// Returns the error for an options directive inside the world block.
    ///
    /// * `func` - Directive name.
    pub fn inside_world(func: &str) -> Self {
        Self::InvalidState(format!("Options cannot be set inside world block; '{func}' not allowed."))
    }

    /// Returns the error for a world directive outside the world block.
    ///
    /// * `func` - Directive name.
    pub fn outside_world(func: &str) -> Self {
        Self::InvalidState(format!("Scene description must be inside world block; '{func}' not allowed."))
    }
}
