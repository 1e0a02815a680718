//! Studio configuration
//!
//! Everything the user can adjust lives in one serializable
//! [`StudioConfig`]. Missing fields fall back to the editor defaults, so a
//! partial JSON file such as `{"shape": {"shape": "donut"}}` loads.

use std::{fs, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    export::ExportFormat,
    gfx::{
        camera::{Camera, CameraAngle},
        deform::DeformationParameters,
        geometry::ShapeConfig,
        lighting::LightConfig,
        material::{select_material, Color, MaterialKind, MaterialPreset},
        rendering::{Background, RenderSettings},
    },
};

/// Degrees added per rotation step
pub const ROTATION_STEP_DEGREES: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub shape: ShapeConfig,
    pub deformation: DeformationParameters,
    /// Object rotation in degrees about X, Y and Z, each in `[0, 360)`
    pub rotation: [f32; 3],
    pub material: MaterialKind,
    pub main_color: Color,
    pub shadow_tint: Color,
    pub light: LightConfig,
    pub background: Background,
    pub wireframe_overlay: bool,
    pub camera_angle: CameraAngle,
    /// Edge length of the square preview in pixels
    pub preview_size: u32,
    /// Edge length of the square export in pixels
    pub export_size: u32,
    /// Samples per pixel along each axis for raster output
    pub supersample: u32,
    pub export_format: ExportFormat,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            shape: ShapeConfig::default(),
            deformation: DeformationParameters::default(),
            rotation: [0.0; 3],
            material: MaterialKind::Matte,
            main_color: Color::rgb(0x4a as f32 / 255.0, 0x90 as f32 / 255.0, 0xe2 as f32 / 255.0),
            shadow_tint: Color::rgb(0x1e as f32 / 255.0, 0x3a as f32 / 255.0, 0x5f as f32 / 255.0),
            light: LightConfig::default(),
            background: Background::Transparent,
            wireframe_overlay: false,
            camera_angle: CameraAngle::Front,
            preview_size: 328,
            export_size: 1024,
            supersample: 2,
            export_format: ExportFormat::Png,
        }
    }
}

impl StudioConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        debug!("Loaded studio config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), self.to_json_pretty()?)?;
        debug!("Saved studio config to {}", path.as_ref().display());
        Ok(())
    }

    /// Restores every setting to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn cycle_shape(&mut self) {
        self.shape.shape = self.shape.shape.next();
    }

    pub fn cycle_material(&mut self) {
        self.material = self.material.next();
    }

    /// Rotates by `steps` increments of 5 degrees, wrapping into `[0, 360)`
    pub fn nudge_rotation(&mut self, axis: Axis, steps: i32) {
        let angle = &mut self.rotation[axis.index()];
        *angle = (*angle + steps as f32 * ROTATION_STEP_DEGREES).rem_euclid(360.0);
    }

    pub fn material_preset(&self) -> MaterialPreset {
        select_material(self.material, self.main_color, self.shadow_tint)
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.camera_angle)
    }

    pub fn preview_settings(&self) -> RenderSettings {
        RenderSettings::square(self.preview_size, self.supersample)
    }

    pub fn export_settings(&self) -> RenderSettings {
        RenderSettings::square(self.export_size, self.supersample)
    }
}

/// Editor commands bound to single keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioCommand {
    Export,
    Reset,
    CycleShape,
    CycleMaterial,
    Rotate { axis: Axis, steps: i32 },
}

impl StudioCommand {
    /// Key bindings: Enter exports, `r` resets, `c` and `m` cycle shape
    /// and material, `q`/`a`, `w`/`s` and `e`/`d` rotate about X, Y and Z.
    pub fn from_key(key: &str) -> Option<Self> {
        let rotate = |axis, steps| Some(StudioCommand::Rotate { axis, steps });
        match key.to_lowercase().as_str() {
            "enter" => Some(StudioCommand::Export),
            "r" => Some(StudioCommand::Reset),
            "c" => Some(StudioCommand::CycleShape),
            "m" => Some(StudioCommand::CycleMaterial),
            "q" => rotate(Axis::X, 1),
            "a" => rotate(Axis::X, -1),
            "w" => rotate(Axis::Y, 1),
            "s" => rotate(Axis::Y, -1),
            "e" => rotate(Axis::Z, 1),
            "d" => rotate(Axis::Z, -1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{deform::DeformMode, geometry::Shape};

    #[test]
    fn test_defaults_match_the_editor() {
        let config = StudioConfig::default();
        assert_eq!(config.main_color.to_hex(), "#4a90e2");
        assert_eq!(config.shadow_tint.to_hex(), "#1e3a5f");
        assert_eq!(config.light.position, [5.0, 10.0, 7.5]);
        assert_eq!(config.light.intensity, 0.8);
        assert_eq!(config.light.ambient_intensity, 0.5);
        assert_eq!(config.shape.roundness, 0.1);
        assert_eq!(config.background, Background::Transparent);
        assert_eq!((config.preview_size, config.export_size), (328, 1024));
        assert!(config.deformation.is_neutral());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = StudioConfig::from_json(
            r##"{
                "shape": { "shape": "donut", "donut_tube": 0.2 },
                "deformation": { "twist_degrees": 90, "mode": "inflate" },
                "material": "glass",
                "main_color": "#ff0000",
                "background": { "kind": "solid", "color": "#000", "opacity": 0.5 }
            }"##,
        )
        .unwrap();

        assert_eq!(config.shape.shape, Shape::Donut);
        assert_eq!(config.shape.donut_tube, 0.2);
        assert_eq!(config.shape.knot_p, 2);
        assert_eq!(config.deformation.twist_degrees, 90.0);
        assert_eq!(config.deformation.mode, DeformMode::Inflate);
        assert_eq!(config.deformation.fatten, 1.0);
        assert_eq!(config.material, MaterialKind::Glass);
        assert_eq!(config.main_color, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(
            config.background,
            Background::Solid {
                color: Color::BLACK,
                opacity: 0.5
            }
        );
        assert_eq!(config.export_size, 1024);
    }

    #[test]
    fn test_json_round_trip_and_bad_input() {
        let mut config = StudioConfig::default();
        config.cycle_shape();
        config.nudge_rotation(Axis::Y, 3);
        let json = config.to_json_pretty().unwrap();
        assert_eq!(StudioConfig::from_json(&json).unwrap(), config);

        assert!(StudioConfig::from_json(r#"{"main_color": "teal"}"#).is_err());
        assert!(StudioConfig::from_json(r#"{"shape": {"shape": "blob"}}"#).is_err());
    }

    #[test]
    fn test_save_and_load() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("kiln-config-{}.json", std::process::id()));
        let mut config = StudioConfig::default();
        config.material = MaterialKind::Velvet;
        config.save(&path)?;
        let loaded = StudioConfig::load(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_nudge_rotation_wraps() {
        let mut config = StudioConfig::default();
        config.nudge_rotation(Axis::X, -1);
        assert_eq!(config.rotation, [355.0, 0.0, 0.0]);
        config.nudge_rotation(Axis::X, 2);
        assert_eq!(config.rotation[0], 5.0);
        config.nudge_rotation(Axis::Z, 72);
        assert_eq!(config.rotation[2], 0.0);
    }

    #[test]
    fn test_cycle_and_reset() {
        let mut config = StudioConfig::default();
        config.cycle_material();
        config.cycle_shape();
        assert_eq!(config.material, MaterialKind::Plastic);
        assert_eq!(config.shape.shape, Shape::Sphere);
        config.reset();
        assert_eq!(config, StudioConfig::default());
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(StudioCommand::from_key("Enter"), Some(StudioCommand::Export));
        assert_eq!(StudioCommand::from_key("R"), Some(StudioCommand::Reset));
        assert_eq!(
            StudioCommand::from_key("s"),
            Some(StudioCommand::Rotate {
                axis: Axis::Y,
                steps: -1
            })
        );
        assert_eq!(StudioCommand::from_key("x"), None);
    }
}
