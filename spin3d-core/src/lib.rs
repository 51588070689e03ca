/// spin3d Core Library - transform pipeline for a spinning extruded letter
///
/// This library provides the 4x4 matrix algebra, the per-frame animation
/// state and the frame scheduler that composes a model-view-projection
/// matrix and hands it to a rendering backend.

pub mod animation;
pub mod backend;
pub mod config;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod schedule;
pub mod transform;

// Re-export commonly used types
pub use animation::AnimationState;
pub use backend::RendererBackend;
pub use config::{deg_to_rad, rad_to_deg, SceneConfig};
pub use error::{Error, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use projection::Viewport;
pub use schedule::{CancellationToken, FrameOutcome, FrameScheduler, FrameTiming, SchedulerState};
pub use transform::Transform;
