//! Regular polyhedra with flat faces.
//!
//! The base vertices are projected onto a sphere of the requested radius,
//! then every face gets its own three vertices so the recomputed normals
//! stay faceted.

use cgmath::{InnerSpace, Vector3};

use super::GeometryData;

/// Golden ratio
const PHI: f32 = 1.618_034;

fn build_polyhedron(corners: &[[f32; 3]], faces: &[[u32; 3]], radius: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let projected: Vec<[f32; 3]> = corners
        .iter()
        .map(|&c| (Vector3::from(c).normalize() * radius).into())
        .collect();

    for &[a, b, c] in faces {
        let ia = data.push_vertex(projected[a as usize]);
        let ib = data.push_vertex(projected[b as usize]);
        let ic = data.push_vertex(projected[c as usize]);
        data.push_triangle(ia, ib, ic);
    }

    data.compute_vertex_normals();
    data
}

/// Generate a tetrahedron inscribed in a sphere of `radius`
pub fn generate_tetrahedron(radius: f32) -> GeometryData {
    let corners = [
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
    ];
    let faces = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];
    build_polyhedron(&corners, &faces, radius)
}

/// Generate an octahedron inscribed in a sphere of `radius`
pub fn generate_octahedron(radius: f32) -> GeometryData {
    let corners = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    let faces = [
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 2, 5],
        [1, 5, 3],
        [1, 3, 4],
        [1, 4, 2],
    ];
    build_polyhedron(&corners, &faces, radius)
}

/// Generate an icosahedron inscribed in a sphere of `radius`
pub fn generate_icosahedron(radius: f32) -> GeometryData {
    let t = PHI;
    let corners = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    let faces = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    build_polyhedron(&corners, &faces, radius)
}

/// Generate a dodecahedron inscribed in a sphere of `radius`
///
/// Each pentagonal face is split into three triangles that share the
/// face plane, so the recomputed normals are still flat per pentagon.
pub fn generate_dodecahedron(radius: f32) -> GeometryData {
    let t = PHI;
    let r = 1.0 / PHI;
    let corners = [
        // (±1, ±1, ±1)
        [-1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        // (0, ±1/φ, ±φ)
        [0.0, -r, -t],
        [0.0, -r, t],
        [0.0, r, -t],
        [0.0, r, t],
        // (±1/φ, ±φ, 0)
        [-r, -t, 0.0],
        [-r, t, 0.0],
        [r, -t, 0.0],
        [r, t, 0.0],
        // (±φ, 0, ±1/φ)
        [-t, 0.0, -r],
        [t, 0.0, -r],
        [-t, 0.0, r],
        [t, 0.0, r],
    ];
    let faces = [
        [3, 11, 7], [3, 7, 15], [3, 15, 13],
        [7, 19, 17], [7, 17, 6], [7, 6, 15],
        [17, 4, 8], [17, 8, 10], [17, 10, 6],
        [8, 0, 16], [8, 16, 2], [8, 2, 10],
        [0, 12, 1], [0, 1, 18], [0, 18, 16],
        [6, 10, 2], [6, 2, 13], [6, 13, 15],
        [2, 16, 18], [2, 18, 3], [2, 3, 13],
        [18, 1, 9], [18, 9, 11], [18, 11, 3],
        [4, 14, 12], [4, 12, 0], [4, 0, 8],
        [11, 9, 5], [11, 5, 19], [11, 19, 7],
        [19, 5, 14], [19, 14, 4], [19, 4, 17],
        [1, 12, 14], [1, 14, 5], [1, 5, 9],
    ];
    build_polyhedron(&corners, &faces, radius)
}
