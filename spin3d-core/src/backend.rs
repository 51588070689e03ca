/// The contract a drawing backend fulfils for the frame scheduler
use nalgebra::Matrix4;

use crate::error::Result;

/// Owns the surface, the compiled program and the static geometry buffers.
///
/// The scheduler calls `resize`, `clear` and `draw` in that order once per
/// frame and never overlaps frames.
///
/// Construction is backend specific. Each backend provides
/// `initialize(surface, &Mesh) -> Result<Self>`, which takes the vertex
/// positions and colors of the mesh once, before the first frame:
/// `TerminalBackend::initialize` with a writer, `WebGlBackend::initialize`
/// with a canvas id. It reports [`crate::Error::Initialization`] on failure.
pub trait RendererBackend {
    /// Match the surface to its display size and return it in pixels
    fn resize(&mut self) -> Result<(u32, u32)>;

    /// Clear color and depth
    fn clear(&mut self) -> Result<()>;

    /// Draw the mesh with the composed model-view-projection matrix
    fn draw(&mut self, matrix: &Matrix4<f32>) -> Result<()>;
}

impl<B: RendererBackend + ?Sized> RendererBackend for Box<B> {
    fn resize(&mut self) -> Result<(u32, u32)> {
        (**self).resize()
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn draw(&mut self, matrix: &Matrix4<f32>) -> Result<()> {
        (**self).draw(matrix)
    }
}
