//! Perspective camera framing the object at the origin.

use cgmath::{perspective, Deg, EuclideanSpace, Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Preset viewpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraAngle {
    /// Slightly raised front view
    #[default]
    Front,
    IsometricLeft,
    IsometricRight,
    /// Slightly top-down
    TopDown,
}

impl CameraAngle {
    pub fn eye(self) -> Point3<f32> {
        match self {
            CameraAngle::Front => Point3::new(0.0, 1.0, 5.0),
            CameraAngle::IsometricLeft => Point3::new(-5.0, 5.0, 5.0),
            CameraAngle::IsometricRight => Point3::new(5.0, 5.0, 5.0),
            CameraAngle::TopDown => Point3::new(0.0, 7.0, 2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(angle: CameraAngle) -> Self {
        Self {
            eye: angle.eye(),
            target: Point3::origin(),
            up: Vector3::unit_y(),
            fovy: 50.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        perspective(Deg(self.fovy), aspect, self.znear, self.zfar)
    }

    /// Combined view-projection matrix (OpenGL clip conventions, NDC z in `[-1, 1]`)
    pub fn build_view_projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraAngle::default())
    }
}
