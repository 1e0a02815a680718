//! # Primitive Shape Generation
//!
//! This module contains functions to generate the smooth 3D primitives the
//! studio offers. Every shape is built from a parametric grid of vertices
//! and finishes with [`GeometryData::compute_vertex_normals`], so the
//! normals a primitive ships with are exactly the ones the deformation
//! pipeline would recompute for the undeformed positions.
//!
//! Conventions: Y is up, triangles wind counter-clockwise seen from
//! outside. Segment counts are clamped to the smallest value that still
//! produces a closed surface.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use cgmath::{InnerSpace, Vector3};

use super::GeometryData;

/// Pushes a `(rows + 1) x (cols + 1)` vertex grid and its triangles.
///
/// Quads are split as `(a, b, d), (b, c, d)` with `a = (i, j)`,
/// `b = (i + 1, j)`, `c = (i + 1, j + 1)`, `d = (i, j + 1)`, so the face
/// normal follows `d/di x d/dj` of the parametrization.
fn push_grid<F>(data: &mut GeometryData, rows: u32, cols: u32, point: F)
where
    F: Fn(u32, u32) -> [f32; 3],
{
    let base = data.vertices.len() as u32;
    for i in 0..=rows {
        for j in 0..=cols {
            data.push_vertex(point(i, j));
        }
    }

    let stride = cols + 1;
    for i in 0..rows {
        for j in 0..cols {
            let a = base + i * stride + j;
            let b = a + stride;
            let c = b + 1;
            let d = a + 1;
            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }
}

/// Generate an axis-aligned box centered at the origin
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    generate_rounded_box(width, height, depth, 0, 0.0)
}

/// Generate a box with rounded edges and corners
///
/// # Arguments
/// * `width`, `height`, `depth` - Extents along X, Y and Z
/// * `segments` - Rounding resolution; each face gets `2 * segments + 1`
///   subdivisions per side
/// * `radius` - Corner radius, clamped to half of the smallest extent
pub fn generate_rounded_box(
    width: f32,
    height: f32,
    depth: f32,
    segments: u32,
    radius: f32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let subdivisions = segments * 2 + 1;
    let half = Vector3::new(width * 0.5, height * 0.5, depth * 0.5);
    let radius = radius.clamp(0.0, half.x.min(half.y).min(half.z));
    let inner = half - Vector3::new(radius, radius, radius);

    // (outward normal, row direction, column direction) with row x column = normal
    let faces: [(Vector3<f32>, Vector3<f32>, Vector3<f32>); 6] = [
        (Vector3::unit_x(), Vector3::unit_y(), Vector3::unit_z()),
        (-Vector3::unit_x(), Vector3::unit_y(), -Vector3::unit_z()),
        (Vector3::unit_y(), Vector3::unit_z(), Vector3::unit_x()),
        (-Vector3::unit_y(), Vector3::unit_z(), -Vector3::unit_x()),
        (Vector3::unit_z(), Vector3::unit_x(), Vector3::unit_y()),
        (-Vector3::unit_z(), Vector3::unit_x(), -Vector3::unit_y()),
    ];

    for (normal, row_dir, col_dir) in faces {
        push_grid(&mut data, subdivisions, subdivisions, |i, j| {
            let s = 2.0 * i as f32 / subdivisions as f32 - 1.0;
            let t = 2.0 * j as f32 / subdivisions as f32 - 1.0;
            let unit: Vector3<f32> = normal + row_dir * s + col_dir * t;
            let p = Vector3::new(unit.x * half.x, unit.y * half.y, unit.z * half.z);

            let core = Vector3::new(
                p.x.clamp(-inner.x, inner.x),
                p.y.clamp(-inner.y, inner.y),
                p.z.clamp(-inner.z, inner.z),
            );
            let offset = p - core;
            if offset.magnitude2() > 1e-12 {
                (core + offset.normalize() * radius).into()
            } else {
                p.into()
            }
        });
    }

    data.compute_vertex_normals();
    data
}

/// Generate a plane in the XZ plane (horizontal in the Y-up system)
///
/// Returns a plane centered at the origin with normal pointing up (positive Y).
pub fn generate_plane(
    width: f32,
    depth: f32,
    width_segments: u32,
    depth_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);

    push_grid(&mut data, d_segs, w_segs, |i, j| {
        let x = (j as f32 / w_segs as f32 - 0.5) * width;
        let z = (i as f32 / d_segs as f32 - 0.5) * depth;
        [x, 0.0, z]
    });

    data.compute_vertex_normals();
    data
}

/// Generate a surface of revolution around the Y axis
///
/// # Arguments
/// * `profile` - `(radius, y)` points ordered from top to bottom; a
///   radius of zero closes the surface at that end
/// * `segments` - Number of circular segments
pub fn generate_lathe(profile: &[[f32; 2]], segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    if profile.len() < 2 {
        return data;
    }

    let segs = segments.max(3);
    let rows = profile.len() as u32 - 1;

    push_grid(&mut data, rows, segs, |i, j| {
        let [r, y] = profile[i as usize];
        let phi = j as f32 / segs as f32 * TAU;
        [r * phi.sin(), y, r * phi.cos()]
    });

    data.compute_vertex_normals();
    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of longitude segments
/// * `height_segments` - Number of latitude segments
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let lat_segs = height_segments.max(2);

    let profile: Vec<[f32; 2]> = (0..=lat_segs)
        .map(|k| {
            let theta = k as f32 / lat_segs as f32 * PI;
            // Pin the poles so they close exactly
            let r = if k == 0 || k == lat_segs {
                0.0
            } else {
                radius * theta.sin()
            };
            [r, radius * theta.cos()]
        })
        .collect();

    generate_lathe(&profile, width_segments)
}

/// Generate a capped cylinder centered at the origin along the Y axis
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    let half_height = height * 0.5;

    // Rim points are duplicated so caps and side don't share normals
    let profile = [
        [0.0, half_height],
        [radius, half_height],
        [radius, half_height],
        [radius, -half_height],
        [radius, -half_height],
        [0.0, -half_height],
    ];

    generate_lathe(&profile, segments)
}

/// Generate a cone with its apex up and a capped base
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> GeometryData {
    let half_height = height * 0.5;

    let profile = [
        [0.0, half_height],
        [radius, -half_height],
        [radius, -half_height],
        [0.0, -half_height],
    ];

    generate_lathe(&profile, segments)
}

/// Generate a capsule: a cylinder of `length` with hemispherical ends
pub fn generate_capsule(
    radius: f32,
    length: f32,
    cap_segments: u32,
    radial_segments: u32,
) -> GeometryData {
    let caps = cap_segments.max(1);
    let half_length = length * 0.5;

    let mut profile = Vec::with_capacity(2 * caps as usize + 2);
    for k in 0..=caps {
        let theta = k as f32 / caps as f32 * FRAC_PI_2;
        let r = if k == 0 { 0.0 } else { radius * theta.sin() };
        profile.push([r, half_length + radius * theta.cos()]);
    }
    for k in 0..=caps {
        let theta = FRAC_PI_2 + k as f32 / caps as f32 * FRAC_PI_2;
        let r = if k == caps { 0.0 } else { radius * theta.sin() };
        profile.push([r, -half_length + radius * theta.cos()]);
    }

    generate_lathe(&profile, radial_segments)
}

/// The default vase silhouette: narrow neck, wide belly, flat closed base.
///
/// Points run from the open rim at the top down to the base center.
pub fn vase_profile(height: f32, samples: u32) -> Vec<[f32; 2]> {
    let samples = samples.max(2);
    let half_height = height * 0.5;

    let mut profile: Vec<[f32; 2]> = (0..=samples)
        .map(|k| {
            let t = 1.0 - k as f32 / samples as f32;
            let r = 0.5 + 0.3 * (t * 1.5 * PI).sin();
            [r, (t - 0.5) * height]
        })
        .collect();

    let foot = profile[profile.len() - 1][0];
    profile.push([foot, -half_height]);
    profile.push([0.0, -half_height]);
    profile
}

/// Generate a vase by revolving [`vase_profile`]
pub fn generate_vase(height: f32, segments: u32) -> GeometryData {
    generate_lathe(&vase_profile(height, 32), segments)
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the center to the middle of the tube
/// * `tube` - Tube radius
/// * `radial_segments` - Segments around the tube
/// * `tubular_segments` - Segments around the ring
pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    push_grid(&mut data, tubular, radial, |i, j| {
        let u = i as f32 / tubular as f32 * TAU;
        let v = j as f32 / radial as f32 * TAU;
        let ring = radius + tube * v.cos();
        [ring * u.cos(), ring * u.sin(), tube * v.sin()]
    });

    data.compute_vertex_normals();
    data
}

/// Point on the `(p, q)` torus knot curve at parameter `u`
fn torus_knot_point(u: f32, p: f32, q: f32, radius: f32) -> Vector3<f32> {
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vector3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * qu_over_p.sin() * 0.5,
    )
}

/// Generate a tube swept along a `(p, q)` torus knot
///
/// # Arguments
/// * `radius` - Overall knot radius
/// * `tube` - Tube radius
/// * `tubular_segments` - Segments along the curve
/// * `radial_segments` - Segments around the tube
/// * `p`, `q` - Winding numbers around the axis of symmetry and around
///   the interior circle; both are clamped to at least 1
pub fn generate_torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let p = p.max(1) as f32;
    let q = q.max(1) as f32;

    push_grid(&mut data, tubular, radial, |i, j| {
        let u = i as f32 / tubular as f32 * p * TAU;
        let v = j as f32 / radial as f32 * TAU;

        // Frenet-like frame from two nearby curve samples
        let p1 = torus_knot_point(u, p, q, radius);
        let p2 = torus_knot_point(u + 0.01, p, q, radius);
        let tangent = p2 - p1;
        let mut normal = p2 + p1;
        let binormal = tangent.cross(normal).normalize();
        normal = binormal.cross(tangent).normalize();

        let cx = -tube * v.cos();
        let cy = tube * v.sin();
        (p1 + normal * cx + binormal * cy).into()
    });

    data.compute_vertex_normals();
    data
}
