//! # Procedural Mesh Deformation
//!
//! Applies taper, sinusoidal noise and twist (or the alternate twist and
//! fatten pipeline) to a base mesh, then recomputes smooth vertex normals.
//!
//! Every pass starts from a pristine base mesh: the deformations are not
//! idempotent, so feeding an already deformed mesh back in compounds them.
//! [`deform`] enforces this by never touching its input.
//!
//! ## Per-vertex order
//!
//! 1. `ny`: height within the base mesh's Y extent, in `[0, 1]`
//! 2. taper: `x, z *= 1 - ny * taper`
//! 3. noise: `x, z += sin(2y) * amplitude * 0.2`
//! 4. twist: rotate `(x, z)` by `y * twist` radians
//!
//! The Inflate mode skips 1-3 and scales the whole position by `fatten`
//! after the twist.
//!
//! ```
//! use kiln::gfx::deform::{deform, DeformationParameters};
//! use kiln::gfx::geometry::generate_box;
//!
//! let base = generate_box(2.0, 2.0, 2.0);
//! let params = DeformationParameters { taper: 1.0, ..Default::default() };
//! let pyramid = deform(&base, &params);
//!
//! // The top face collapses onto the vertical axis
//! for p in pyramid.vertices.iter().filter(|p| p[1] == 1.0) {
//!     assert!(p[0].abs() < 1e-6 && p[2].abs() < 1e-6);
//! }
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use super::geometry::GeometryData;

/// Which per-vertex pipeline [`deform`] runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeformMode {
    /// Taper, then noise, then twist. `fatten` is ignored.
    #[default]
    Sculpt,
    /// Twist, then uniform scale by `fatten`. `taper` and noise are ignored.
    Inflate,
}

/// Deformation settings for one pass.
///
/// Every field defaults to its neutral value. Values are never validated
/// or clamped: extreme settings yield odd-looking but finite geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeformationParameters {
    /// Rotation about Y in degrees per unit of height
    pub twist_degrees: f32,
    /// Horizontal shrink at the top of the mesh, typically in `[-1, 1]`
    pub taper: f32,
    /// Sinusoidal horizontal displacement magnitude, typically in `[0, 1]`
    pub noise_amplitude: f32,
    /// Uniform scale applied after the twist in [`DeformMode::Inflate`]
    pub fatten: f32,
    pub mode: DeformMode,
}

impl Default for DeformationParameters {
    fn default() -> Self {
        Self {
            twist_degrees: 0.0,
            taper: 0.0,
            noise_amplitude: 0.0,
            fatten: 1.0,
            mode: DeformMode::Sculpt,
        }
    }
}

impl DeformationParameters {
    /// Whether a pass with these parameters leaves positions unchanged
    pub fn is_neutral(&self) -> bool {
        let shared = self.twist_degrees == 0.0;
        match self.mode {
            DeformMode::Sculpt => shared && self.taper == 0.0 && self.noise_amplitude <= 0.0,
            DeformMode::Inflate => shared && self.fatten == 1.0,
        }
    }
}

/// Vertical extent of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YBounds {
    pub min: f32,
    pub max: f32,
}

impl YBounds {
    /// Computes the Y extent of `mesh`; an empty mesh yields `0..0`
    pub fn of(mesh: &GeometryData) -> Self {
        let mut vertices = mesh.vertices.iter();
        let Some(first) = vertices.next() else {
            return Self { min: 0.0, max: 0.0 };
        };

        vertices.fold(
            Self {
                min: first[1],
                max: first[1],
            },
            |b, p| Self {
                min: b.min.min(p[1]),
                max: b.max.max(p[1]),
            },
        )
    }

    pub fn height(&self) -> f32 {
        self.max - self.min
    }

    /// Maps `y` into `[0, 1]` across the extent; always 0 for a flat extent
    pub fn normalize(&self, y: f32) -> f32 {
        let height = self.height();
        if height > 0.0 {
            (y - self.min) / height
        } else {
            0.0
        }
    }
}

/// Deforms a single position; `bounds` must come from the undeformed mesh
pub fn deform_vertex(
    position: [f32; 3],
    bounds: &YBounds,
    params: &DeformationParameters,
) -> [f32; 3] {
    let [mut x, y, mut z] = position;

    match params.mode {
        DeformMode::Sculpt => {
            let normalized_y = bounds.normalize(y);

            let scale = 1.0 - normalized_y * params.taper;
            x *= scale;
            z *= scale;

            if params.noise_amplitude > 0.0 {
                let noise_angle = y * 2.0;
                let delta = noise_angle.sin() * params.noise_amplitude * 0.2;
                x += delta;
                z += delta;
            }

            let [tx, tz] = twist(x, y, z, params.twist_degrees);
            [tx, y, tz]
        }
        DeformMode::Inflate => {
            let [tx, tz] = twist(x, y, z, params.twist_degrees);
            [tx * params.fatten, y * params.fatten, tz * params.fatten]
        }
    }
}

/// Rotates `(x, z)` about the Y axis by `y * degrees` converted to radians
fn twist(x: f32, y: f32, z: f32, degrees: f32) -> [f32; 2] {
    let theta = y * degrees.to_radians();
    let (sin, cos) = theta.sin_cos();
    [x * cos - z * sin, x * sin + z * cos]
}

/// Deforms `mesh` in place and recomputes its normals.
///
/// The Y bounds are taken before any vertex moves. `mesh` should be a
/// fresh copy of a base mesh; see the module docs.
pub fn deform_in_place(mesh: &mut GeometryData, params: &DeformationParameters) {
    let bounds = YBounds::of(mesh);

    for position in mesh.vertices.iter_mut() {
        *position = deform_vertex(*position, &bounds, params);
    }

    // Normals depend on final neighbor positions: only after all edits
    mesh.compute_vertex_normals();

    debug!(
        "Deformed {} vertices ({:?}, twist {}°, taper {}, noise {}, fatten {})",
        mesh.vertex_count(),
        params.mode,
        params.twist_degrees,
        params.taper,
        params.noise_amplitude,
        params.fatten
    );
}

/// Returns a deformed copy of `base`. The base mesh is never modified,
/// so repeated calls with different parameters never accumulate.
pub fn deform(base: &GeometryData, params: &DeformationParameters) -> GeometryData {
    let mut mesh = base.clone();
    deform_in_place(&mut mesh, params);
    mesh
}
