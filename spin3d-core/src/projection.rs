/// Drawing surface dimensions and clip-space helpers
use nalgebra::{Matrix4, Vector4};

use crate::error::{Error, Result};
use crate::transform::Transform;

/// Size of the drawing surface in pixels, as reported by a backend resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A surface with a zero side cannot be projected onto
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Checked [`Transform::projection`] for this surface
    pub fn projection(&self, depth: f32) -> Result<Matrix4<f32>> {
        if self.is_degenerate() {
            return Err(Error::DegenerateViewport {
                width: self.width,
                height: self.height,
            });
        }
        if !(depth.is_finite() && depth > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "projection depth must be positive, got {}",
                depth
            )));
        }

        Ok(Transform::projection(
            self.width as f32,
            self.height as f32,
            depth,
        ))
    }

    /// Map a clip-space position to surface coordinates.
    ///
    /// Returns `(x, y, depth)` with row 0 at the top, or `None` when the
    /// point has no usable w.
    pub fn clip_to_screen(&self, clip: &Vector4<f32>) -> Option<(f32, f32, f32)> {
        // Prevent division by near-zero w
        if clip.w.abs() < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        let screen_x = (ndc_x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
