//! Error types shared by the core and every rendering backend.

use thiserror::Error;

/// Failures surfaced by the transform pipeline and its backends.
#[derive(Error, Debug)]
pub enum Error {
    /// The drawing surface, context or program could not be set up.
    #[error("Renderer initialization failed: {0}")]
    Initialization(String),

    /// A single frame's resize, clear or draw failed.
    #[error("Frame failed: {0}")]
    Frame(String),

    /// The drawing context went away underneath the renderer.
    #[error("Rendering context lost: {0}")]
    ContextLost(String),

    /// A projection was requested for a surface with a zero dimension.
    #[error("Degenerate viewport {width}x{height}")]
    DegenerateViewport { width: u32, height: u32 },

    /// Scene configuration values that cannot produce a finite transform.
    #[error("Invalid scene configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Structural failures after which no further frame can succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Initialization(_) | Error::ContextLost(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
