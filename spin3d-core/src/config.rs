//! Scene configuration: the initial transform of the shape, its spin speed
//! and the projection depth.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

pub fn rad_to_deg(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}

/// Fixed starting values for the animated shape.
///
/// Every field is optional when deserializing; missing ones fall back to
/// [`SceneConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SceneConfig {
    /// Pixels from the top-left corner of the surface
    pub translation: Vector3<f32>,
    /// Radians per axis
    pub initial_rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    /// Radians per second about the y axis
    pub rotation_speed: f32,
    /// Depth of the box mapped by the projection
    pub projection_depth: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            translation: Vector3::new(180.0, 150.0, 0.0),
            initial_rotation: Vector3::new(deg_to_rad(40.0), deg_to_rad(25.0), deg_to_rad(325.0)),
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_speed: 1.2,
            projection_depth: 400.0,
        }
    }
}

impl SceneConfig {
    /// Parse a JSON document and validate it
    pub fn from_json(text: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let vectors = [
            ("translation", &self.translation),
            ("initialRotation", &self.initial_rotation),
            ("scale", &self.scale),
        ];
        for (name, v) in vectors {
            if v.iter().any(|c| !c.is_finite()) {
                return Err(Error::InvalidConfig(format!("{name} must be finite, got {v:?}")));
            }
        }

        if !self.rotation_speed.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "rotationSpeed must be finite, got {}",
                self.rotation_speed
            )));
        }

        if !(self.projection_depth.is_finite() && self.projection_depth > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "projectionDepth must be positive, got {}",
                self.projection_depth
            )));
        }

        Ok(())
    }
}
