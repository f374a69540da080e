//! Renderer

use crate::geometry::*;
use crate::interaction::*;
use crate::rng::*;
use crate::sampler::*;
use crate::scene::*;
use crate::spectrum::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

mod sampler_renderer;

// Re-export
pub use sampler_renderer::*;

/// Why a render stopped before producing an image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The render was cancelled through its `CancellationToken`.
    #[error("render cancelled")]
    Cancelled,

    /// A render task failed or the image could not be written.
    #[error("render failed: {0}")]
    Failed(String),
}

/// Shared flag used to stop a render. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Returns a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns true once `cancel()` was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Radiance along a ray together with what the ray hit.
///
/// The lifetime specifiers:
/// * `'a` - Shared reference to the scene.
pub struct LiResult<'a> {
    /// Incident radiance at the ray origin.
    pub l: Spectrum,

    /// The nearest surface hit, if any.
    pub isect: Option<Intersection<'a>>,

    /// Transmittance of the ray segment.
    pub t: Spectrum,
}

/// Drives image synthesis and answers radiance queries for integrators.
pub trait Renderer: Send + Sync {
    /// Render the scene into the camera's film.
    ///
    /// * `scene`  - The scene.
    /// * `cancel` - Token checked before each new batch of work.
    fn render(&self, scene: &Scene, cancel: &CancellationToken) -> Result<(), RenderError>;

    /// Returns the radiance arriving at the ray origin along the ray.
    ///
    /// * `scene`  - The scene.
    /// * `ray`    - The ray.
    /// * `sample` - Optional sampler values.
    /// * `rng`    - Random number generator.
    fn li<'a>(&self, scene: &'a Scene, ray: &Ray, sample: Option<&Sample>, rng: &mut RNG) -> LiResult<'a>;

    /// Returns the fraction of light transmitted along the ray.
    ///
    /// * `scene`  - The scene.
    /// * `ray`    - The ray.
    /// * `sample` - Optional sampler values.
    /// * `rng`    - Random number generator.
    fn transmittance(&self, scene: &Scene, ray: &Ray, sample: Option<&Sample>, rng: &mut RNG) -> Spectrum;
}

/// Returns a progress bar over `len` units of work; hidden when `quiet`.
///
/// * `len`   - Total amount of work.
/// * `quiet` - Suppress output.
pub fn create_progress_reporter(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let progress = ProgressBar::new(len);
    progress.set_style(style);
    progress
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
