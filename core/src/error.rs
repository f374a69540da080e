//! Errors

use thiserror::Error;

/// Errors raised while building scene objects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A matrix that had to be inverted has no inverse.
    #[error("singular matrix cannot be inverted")]
    SingularMatrix,

    /// A factory was asked for an implementation name it does not know.
    #[error("{kind} '{name}' unknown")]
    UnknownImplementation {
        /// Kind of object (shape, material, ...).
        kind: &'static str,
        /// Requested implementation name.
        name: String,
    },

    /// A parameter value was missing or malformed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The output image could not be written.
    #[error("image error: {0}")]
    Image(String),
}

/// Result type for fallible core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns an `UnknownImplementation` error.
    ///
    /// * `kind` - Kind of object.
    /// * `name` - Requested implementation name.
    pub fn unknown(kind: &'static str, name: &str) -> Self {
        Self::UnknownImplementation {
            kind,
            name: name.to_string(),
        }
    }
}
