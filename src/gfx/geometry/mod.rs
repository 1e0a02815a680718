//! # Procedural Geometry Generation
//!
//! This module provides the mesh type shared by the whole pipeline and the
//! functions that generate the base primitives procedurally, eliminating
//! the need for external model files for the studio's shapes.
//!
//! ## Supported Primitives
//!
//! - **Box / Rounded box**: subdivided box with optional corner radius
//! - **Sphere, Cylinder, Cone, Capsule, Vase**: lathe surfaces
//! - **Torus, Torus knot**: swept tubes
//! - **Platonic solids**: tetrahedron, octahedron, icosahedron, dodecahedron
//!
//! ## Usage
//!
//! ```rust
//! use kiln::gfx::geometry::{generate_box, generate_sphere};
//!
//! // A 2x2x2 box centered at the origin
//! let cube = generate_box(2.0, 2.0, 2.0);
//!
//! // A sphere of radius 1.5 with 32 segments
//! let sphere = generate_sphere(1.5, 32, 16);
//! assert_eq!(sphere.vertices.len(), sphere.normals.len());
//! ```

pub mod polyhedra;
pub mod primitives;
pub mod shape;

use std::{io::BufRead, path::Path};

use cgmath::{InnerSpace, Vector3};
use log::{debug, warn};

pub use polyhedra::*;
pub use primitives::*;
pub use shape::{build_base_mesh, Shape, ShapeConfig};

use crate::error::{KilnError, Result};

/// Squared cross-product magnitude below which a triangle counts as zero-area
const DEGENERATE_AREA2: f32 = 1e-14;

/// Normal assigned to vertices that no non-degenerate triangle touches
pub const FALLBACK_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// A triangle mesh: vertex positions, parallel vertex normals and a
/// triangle index list.
///
/// `normals.len() == vertices.len()` always holds. Triangles wind
/// counter-clockwise when seen from outside, so the face normal is
/// `(v1 - v0) x (v2 - v0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex with a placeholder normal and returns its index
    pub fn push_vertex(&mut self, position: [f32; 3]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(FALLBACK_NORMAL);
        index
    }

    /// Appends triangle `(a, b, c)` unless its area is zero.
    ///
    /// Returns whether the triangle was kept. Poles, apexes and collapsed
    /// corners of the procedural primitives produce zero-area triangles
    /// which would otherwise contribute nothing but noise.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) -> bool {
        let face = face_cross(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        );
        if face.magnitude2() <= DEGENERATE_AREA2 {
            return false;
        }
        self.indices.extend_from_slice(&[a, b, c]);
        true
    }

    /// Iterates over the triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Recomputes smooth per-vertex normals from the current positions.
    ///
    /// Each triangle's normalized face normal is summed into its three
    /// vertices, then every sum is normalized. Zero-area triangles are
    /// skipped; a vertex left with a zero sum gets [`FALLBACK_NORMAL`].
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vector3::new(0.0f32, 0.0, 0.0); self.vertices.len()];

        for [i0, i1, i2] in self.triangles() {
            let face = face_cross(self.vertices[i0], self.vertices[i1], self.vertices[i2]);
            if face.magnitude2() <= DEGENERATE_AREA2 {
                continue;
            }
            let face = face.normalize();
            accum[i0] += face;
            accum[i1] += face;
            accum[i2] += face;
        }

        self.normals = accum
            .into_iter()
            .map(|n| {
                if n.magnitude2() > 0.0 {
                    n.normalize().into()
                } else {
                    FALLBACK_NORMAL
                }
            })
            .collect();
    }

    /// Loads a mesh from an OBJ file, merging all of its models.
    ///
    /// Companion MTL files are ignored; materials come from the studio's
    /// presets.
    pub fn from_obj_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (models, materials) = tobj::load_obj(path.as_ref(), &obj_load_options())?;
        if let Err(err) = materials {
            warn!("Ignoring materials of {}: {}", path.as_ref().display(), err);
        }
        Self::from_obj_models(models)
    }

    /// Loads a mesh from OBJ source text
    pub fn from_obj_reader<R: BufRead>(reader: &mut R) -> Result<Self> {
        let (models, materials) = tobj::load_obj_buf(reader, &obj_load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;
        if let Err(err) = materials {
            warn!("Ignoring referenced material library: {}", err);
        }
        Self::from_obj_models(models)
    }

    fn from_obj_models(models: Vec<tobj::Model>) -> Result<Self> {
        let mut data = GeometryData::new();
        let mut missing_normals = false;

        for model in &models {
            let mesh = &model.mesh;
            let base = data.vertices.len() as u32;

            data.vertices.extend(
                mesh.positions
                    .chunks_exact(3)
                    .map(|p| [p[0], p[1], p[2]]),
            );

            // Use normals from OBJ if available, otherwise calculate them later
            if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
                data.normals
                    .extend(mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]));
            } else {
                missing_normals = true;
                data.normals
                    .extend(std::iter::repeat(FALLBACK_NORMAL).take(mesh.positions.len() / 3));
            }

            data.indices.extend(mesh.indices.iter().map(|i| base + i));
        }

        if data.triangle_count() == 0 {
            return Err(KilnError::EmptyMesh);
        }

        if missing_normals {
            warn!("OBJ mesh has no usable normals, recomputing from topology");
            data.compute_vertex_normals();
        }

        debug!(
            "Loaded OBJ mesh: {} models, {} vertices, {} triangles",
            models.len(),
            data.vertex_count(),
            data.triangle_count()
        );

        Ok(data)
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

fn obj_load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Unnormalized face normal of triangle `(a, b, c)`
pub(crate) fn face_cross(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Vector3<f32> {
    let a = Vector3::from(a);
    let edge1 = Vector3::from(b) - a;
    let edge2 = Vector3::from(c) - a;
    edge1.cross(edge2)
}
