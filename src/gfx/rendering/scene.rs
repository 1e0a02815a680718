//! Everything a single frame needs, borrowed for the duration of a render.

use cgmath::{Deg, Matrix4, SquareMatrix};
use serde::{Deserialize, Serialize};

use crate::gfx::{
    camera::Camera,
    geometry::GeometryData,
    lighting::LightConfig,
    material::{Color, MaterialPreset},
};

/// What shows behind the object
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Background {
    #[default]
    Transparent,
    Solid {
        color: Color,
        opacity: f32,
    },
}

impl Background {
    /// Straight-alpha RGBA the frame is cleared to
    pub fn clear_color(&self) -> [f32; 4] {
        match self {
            Background::Transparent => [0.0; 4],
            Background::Solid { color, opacity } => color.with_alpha(opacity.clamp(0.0, 1.0)),
        }
    }
}

/// A mesh with its material, lights and viewpoint
#[derive(Debug, Clone, Copy)]
pub struct RenderScene<'a> {
    pub mesh: &'a GeometryData,
    pub material: MaterialPreset,
    pub lights: LightConfig,
    pub camera: Camera,
    /// Object-to-world transform; rotation only in practice
    pub model: Matrix4<f32>,
    pub background: Background,
    /// Draw black half-transparent edges over the shaded surface
    pub wireframe_overlay: bool,
}

impl<'a> RenderScene<'a> {
    pub fn new(mesh: &'a GeometryData, material: MaterialPreset) -> Self {
        Self {
            mesh,
            material,
            lights: LightConfig::default(),
            camera: Camera::default(),
            model: Matrix4::identity(),
            background: Background::default(),
            wireframe_overlay: false,
        }
    }

    pub fn with_rotation(mut self, degrees: [f32; 3]) -> Self {
        self.model = rotation_matrix(degrees);
        self
    }
}

/// XYZ Euler rotation, X applied last
pub fn rotation_matrix(degrees: [f32; 3]) -> Matrix4<f32> {
    Matrix4::from_angle_x(Deg(degrees[0]))
        * Matrix4::from_angle_y(Deg(degrees[1]))
        * Matrix4::from_angle_z(Deg(degrees[2]))
}
