//! The geometry provider: named primitive families and the base mesh each
//! one produces.
//!
//! Shape-specific parameters (corner roundness, donut tube radius, knot
//! winding) are consumed here, before deformation; the deformation
//! pipeline never looks at the shape.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    generate_capsule, generate_cone, generate_cylinder, generate_dodecahedron,
    generate_icosahedron, generate_octahedron, generate_rounded_box, generate_sphere,
    generate_tetrahedron, generate_torus, generate_torus_knot, generate_vase, GeometryData,
};

/// Primitive families offered by the studio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Cube,
    Sphere,
    Cylinder,
    Donut,
    Cone,
    TorusKnot,
    Icosahedron,
    Dodecahedron,
    Capsule,
    Octahedron,
    Tetrahedron,
    Vase,
}

impl Shape {
    /// All shapes in picker order
    pub const ALL: [Shape; 12] = [
        Shape::Cube,
        Shape::Sphere,
        Shape::Cylinder,
        Shape::Donut,
        Shape::Cone,
        Shape::TorusKnot,
        Shape::Icosahedron,
        Shape::Dodecahedron,
        Shape::Capsule,
        Shape::Octahedron,
        Shape::Tetrahedron,
        Shape::Vase,
    ];

    /// The next shape in picker order, wrapping around
    pub fn next(self) -> Shape {
        let index = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Cube => "cube",
            Shape::Sphere => "sphere",
            Shape::Cylinder => "cylinder",
            Shape::Donut => "donut",
            Shape::Cone => "cone",
            Shape::TorusKnot => "torus_knot",
            Shape::Icosahedron => "icosahedron",
            Shape::Dodecahedron => "dodecahedron",
            Shape::Capsule => "capsule",
            Shape::Octahedron => "octahedron",
            Shape::Tetrahedron => "tetrahedron",
            Shape::Vase => "vase",
        }
    }
}

/// Everything the geometry provider needs to build a base mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    pub shape: Shape,
    /// Cube corner roundness; the corner radius is `roundness * 10`
    pub roundness: f32,
    /// Donut tube radius
    pub donut_tube: f32,
    /// Torus knot winding around the axis of symmetry
    pub knot_p: u32,
    /// Torus knot winding around the interior circle
    pub knot_q: u32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            shape: Shape::Cube,
            roundness: 0.1,
            donut_tube: 0.4,
            knot_p: 2,
            knot_q: 3,
        }
    }
}

/// Builds the undeformed base mesh for a shape configuration
pub fn build_base_mesh(config: &ShapeConfig) -> GeometryData {
    let mesh = match config.shape {
        Shape::Cube => generate_rounded_box(2.2, 2.2, 2.2, 6, config.roundness * 10.0),
        Shape::Sphere => generate_sphere(1.5, 32, 16),
        Shape::Cylinder => generate_cylinder(0.8, 2.0, 64),
        Shape::Donut => generate_torus(1.0, config.donut_tube, 64, 100),
        Shape::Cone => generate_cone(1.0, 2.0, 64),
        Shape::TorusKnot => generate_torus_knot(0.8, 0.25, 100, 16, config.knot_p, config.knot_q),
        Shape::Icosahedron => generate_icosahedron(1.2),
        Shape::Dodecahedron => generate_dodecahedron(1.2),
        Shape::Capsule => generate_capsule(1.0, 1.0, 4, 8),
        Shape::Octahedron => generate_octahedron(1.5),
        Shape::Tetrahedron => generate_tetrahedron(1.5),
        Shape::Vase => generate_vase(2.0, 48),
    };

    debug!(
        "Built base mesh for {}: {} vertices, {} triangles",
        config.shape.name(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_builds_a_consistent_mesh() {
        for shape in Shape::ALL {
            let config = ShapeConfig {
                shape,
                ..Default::default()
            };
            let mesh = build_base_mesh(&config);
            assert!(mesh.triangle_count() > 0, "{} is empty", shape.name());
            assert_eq!(mesh.vertices.len(), mesh.normals.len());
            assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        }
    }

    #[test]
    fn test_shape_cycle_wraps() {
        let mut shape = Shape::Cube;
        for _ in 0..Shape::ALL.len() {
            shape = shape.next();
        }
        assert_eq!(shape, Shape::Cube);
        assert_eq!(Shape::Tetrahedron.next(), Shape::Vase);
    }

    #[test]
    fn test_shape_parameters_reach_the_provider() {
        let thin = build_base_mesh(&ShapeConfig {
            shape: Shape::Donut,
            donut_tube: 0.1,
            ..Default::default()
        });
        let thick = build_base_mesh(&ShapeConfig {
            shape: Shape::Donut,
            donut_tube: 0.8,
            ..Default::default()
        });
        let max_z = |m: &GeometryData| m.vertices.iter().map(|p| p[2]).fold(f32::MIN, f32::max);
        assert!((max_z(&thin) - 0.1).abs() < 1e-3);
        assert!((max_z(&thick) - 0.8).abs() < 1e-3);
    }

    #[test]
    fn test_shape_serializes_snake_case() {
        let json = serde_json::to_string(&Shape::TorusKnot).unwrap();
        assert_eq!(json, "\"torus_knot\"");
        assert_eq!(json.trim_matches('"'), Shape::TorusKnot.name());
    }
}
