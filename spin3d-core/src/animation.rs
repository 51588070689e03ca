/// Per-object transform parameters advanced once per frame
use nalgebra::Vector3;
use std::f64::consts::TAU;

use crate::config::SceneConfig;

/// Translation, rotation (radians per axis) and scale of the animated shape,
/// plus how fast it spins about the y axis.
///
/// Rotation is accumulated in `f64` so a frame's increment still registers
/// after days of spinning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub translation: Vector3<f32>,
    pub rotation: Vector3<f64>,
    pub scale: Vector3<f32>,
    /// Radians per second about the y axis
    pub rotation_speed: f32,
}

impl AnimationState {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            translation: config.translation,
            rotation: config.initial_rotation.cast::<f64>(),
            scale: config.scale,
            rotation_speed: config.rotation_speed,
        }
    }

    /// Spin about y by `rotation_speed * delta_seconds`.
    ///
    /// The angle is never wrapped, so it keeps growing for non-negative
    /// speed and delta.
    pub fn advance(&mut self, delta_seconds: f64) {
        self.rotation.y += f64::from(self.rotation_speed) * delta_seconds;
    }

    /// Rotation reduced to [0, 2π) per axis, narrowed to the matrix precision.
    /// The reduction happens before narrowing, so long runs still feed small,
    /// exact angles to the trig functions.
    pub fn wrapped_rotation(&self) -> Vector3<f32> {
        self.rotation.map(|angle| angle.rem_euclid(TAU) as f32)
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}
