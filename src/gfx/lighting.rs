//! Scene lighting: one ambient term and one directional light.

use cgmath::{InnerSpace, Vector3};
use serde::{Deserialize, Serialize};

use super::material::Color;

/// Light configuration for the studio scene
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Directional light position; it shines toward the origin
    pub position: [f32; 3],
    pub color: Color,
    /// Directional light intensity
    pub intensity: f32,
    /// Ambient light intensity, using the same color
    pub ambient_intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [5.0, 10.0, 7.5],
            color: Color::WHITE,
            intensity: 0.8,
            ambient_intensity: 0.5,
        }
    }
}

impl LightConfig {
    /// Unit vector pointing from the surface toward the light.
    ///
    /// A light placed at the origin has no direction; it falls back to
    /// straight up.
    pub fn direction(&self) -> Vector3<f32> {
        let to_light = Vector3::from(self.position);
        if to_light.magnitude2() > 0.0 {
            to_light.normalize()
        } else {
            Vector3::unit_y()
        }
    }

    /// Ambient radiance reaching every surface
    pub fn ambient(&self) -> Vector3<f32> {
        Vector3::from(self.color.to_array()) * self.ambient_intensity
    }

    /// Radiance of the directional light
    pub fn radiance(&self) -> Vector3<f32> {
        Vector3::from(self.color.to_array()) * self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_normalized() {
        let light = LightConfig::default();
        assert!((light.direction().magnitude() - 1.0).abs() < 1e-6);
        assert!(light.direction().y > 0.0);

        let centered = LightConfig {
            position: [0.0; 3],
            ..Default::default()
        };
        assert_eq!(centered.direction(), Vector3::unit_y());
    }

    #[test]
    fn test_radiance_scales_color() {
        let light = LightConfig {
            color: Color::rgb(1.0, 0.5, 0.0),
            intensity: 2.0,
            ambient_intensity: 0.5,
            ..Default::default()
        };
        assert_eq!(light.radiance(), Vector3::new(2.0, 1.0, 0.0));
        assert_eq!(light.ambient(), Vector3::new(0.5, 0.25, 0.0));
    }
}
