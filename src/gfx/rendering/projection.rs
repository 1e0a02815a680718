//! Object space to screen space.

use cgmath::{InnerSpace, Matrix4, Vector3, Vector4};

use super::scene::RenderScene;
use crate::gfx::geometry::GeometryData;

/// Vertices with a clip-space w at or below this sit behind the eye
const W_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedVertex {
    /// Pixel coordinates, origin at the top-left corner
    pub screen: [f32; 2],
    /// NDC depth in `[-1, 1]`, smaller is nearer
    pub depth: f32,
    /// `1 / w`, for perspective-correct interpolation
    pub inv_w: f32,
    pub world_position: Vector3<f32>,
    pub world_normal: Vector3<f32>,
    /// False when the vertex is behind the eye
    pub visible: bool,
}

/// Maps mesh vertices onto a `width` x `height` pixel grid
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    model: Matrix4<f32>,
    view_proj: Matrix4<f32>,
    width: f32,
    height: f32,
}

impl Projector {
    pub fn new(scene: &RenderScene<'_>, width: u32, height: u32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Self {
            model: scene.model,
            view_proj: scene.camera.build_view_projection_matrix(aspect),
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn project(&self, position: [f32; 3], normal: [f32; 3]) -> ProjectedVertex {
        let world = self.model * Vector4::new(position[0], position[1], position[2], 1.0);
        let world_normal = (self.model * Vector3::from(normal).extend(0.0)).truncate();
        let world_normal = if world_normal.magnitude2() > 0.0 {
            world_normal.normalize()
        } else {
            world_normal
        };

        let clip = self.view_proj * world;
        if clip.w <= W_EPSILON {
            return ProjectedVertex {
                screen: [0.0; 2],
                depth: f32::INFINITY,
                inv_w: 0.0,
                world_position: world.truncate(),
                world_normal,
                visible: false,
            };
        }

        let inv_w = 1.0 / clip.w;
        let ndc = clip.truncate() * inv_w;
        ProjectedVertex {
            screen: [
                (ndc.x * 0.5 + 0.5) * self.width,
                (0.5 - ndc.y * 0.5) * self.height,
            ],
            depth: ndc.z,
            inv_w,
            world_position: world.truncate(),
            world_normal,
            visible: true,
        }
    }

    pub fn project_mesh(&self, mesh: &GeometryData) -> Vec<ProjectedVertex> {
        mesh.vertices
            .iter()
            .zip(&mesh.normals)
            .map(|(&p, &n)| self.project(p, n))
            .collect()
    }
}
