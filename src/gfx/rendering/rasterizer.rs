//! Deterministic CPU triangle rasterizer.
//!
//! Triangles are scan-converted with edge functions over their pixel
//! bounding box, depth-tested against an NDC depth buffer and shaded per
//! pixel from perspective-correct interpolated positions and normals.
//! There is no back-face culling: deformed meshes can fold through
//! themselves and both sides must render.

use cgmath::Vector3;
use log::debug;

use crate::error::{KilnError, Result};

use super::{
    framebuffer::FrameBuffer,
    projection::{ProjectedVertex, Projector},
    scene::RenderScene,
    shading::shade,
};

/// Edge half-width in output pixels for wireframe drawing
const EDGE_WIDTH: f32 = 0.75;
/// Overlay edges may sit this far behind the stored depth and still draw
const OVERLAY_DEPTH_BIAS: f32 = 1e-4;
const OVERLAY_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
const MIN_SCREEN_AREA: f32 = 1e-9;

/// Largest supersampled target, in samples (4096 x 4096)
pub const MAX_SAMPLES: u64 = 4096 * 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel along each axis
    pub supersample: u32,
}

impl RenderSettings {
    pub fn square(size: u32, supersample: u32) -> Self {
        Self {
            width: size,
            height: size,
            supersample,
        }
    }

    /// Size of the supersampled target, or `None` if it overflows `u32`
    pub fn sample_dimensions(&self) -> Option<(u32, u32)> {
        let factor = self.supersample.max(1);
        Some((self.width.checked_mul(factor)?, self.height.checked_mul(factor)?))
    }

    /// Returns the supersampled target size, rejecting empty frames and
    /// targets above [`MAX_SAMPLES`]
    pub fn validate(&self) -> Result<(u32, u32)> {
        let invalid = || KilnError::InvalidDimensions {
            width: self.width,
            height: self.height,
        };
        if self.width == 0 || self.height == 0 {
            return Err(invalid());
        }
        let (width, height) = self.sample_dimensions().ok_or_else(invalid)?;
        if width as u64 * height as u64 > MAX_SAMPLES {
            return Err(invalid());
        }
        Ok((width, height))
    }
}

#[derive(Debug, Clone, Copy)]
enum Pass {
    /// Shaded, depth-tested surface
    Fill,
    /// Shaded edges only, depth-tested and depth-writing
    Edges { half_width: f32 },
    /// Fixed-color edges drawn over the finished surface
    Overlay { half_width: f32 },
}

#[derive(Debug, Default)]
struct RasterStats {
    drawn: usize,
    skipped: usize,
    fragments: usize,
}

fn edge_function(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt()
}

pub struct Rasterizer {
    settings: RenderSettings,
}

impl Rasterizer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// Renders the scene at the configured size
    pub fn render(&self, scene: &RenderScene<'_>) -> Result<FrameBuffer> {
        let (width, height) = self.settings.validate()?;
        let factor = self.settings.supersample.max(1);
        let half_width = EDGE_WIDTH * factor as f32;

        let mut target = FrameBuffer::new(width, height, scene.background.clear_color());
        let projected = Projector::new(scene, width, height).project_mesh(scene.mesh);
        let mut stats = RasterStats::default();

        let surface = if scene.material.wireframe {
            Pass::Edges { half_width }
        } else {
            Pass::Fill
        };

        for tri in scene.mesh.triangles() {
            let verts = [&projected[tri[0]], &projected[tri[1]], &projected[tri[2]]];
            match self.draw_triangle(&mut target, scene, verts, surface) {
                Some(fragments) => {
                    stats.drawn += 1;
                    stats.fragments += fragments;
                }
                None => stats.skipped += 1,
            }
        }

        if scene.wireframe_overlay {
            for tri in scene.mesh.triangles() {
                let verts = [&projected[tri[0]], &projected[tri[1]], &projected[tri[2]]];
                let _ = self.draw_triangle(&mut target, scene, verts, Pass::Overlay { half_width });
            }
        }

        debug!(
            "Rasterized {} triangles ({} skipped, {} fragments) at {}x{}",
            stats.drawn, stats.skipped, stats.fragments, width, height
        );

        Ok(target.downsample(factor))
    }

    /// Returns the number of fragments written, or `None` when the
    /// triangle crosses behind the eye or has no area on screen
    fn draw_triangle(
        &self,
        target: &mut FrameBuffer,
        scene: &RenderScene<'_>,
        verts: [&ProjectedVertex; 3],
        pass: Pass,
    ) -> Option<usize> {
        if target.width() == 0 || target.height() == 0 || verts.iter().any(|v| !v.visible) {
            return None;
        }

        let [a, b, c] = [verts[0].screen, verts[1].screen, verts[2].screen];
        let area = edge_function(a, b, c);
        if area.abs() < MIN_SCREEN_AREA {
            return None;
        }

        let max_x = (target.width() as f32 - 1.0).max(0.0);
        let max_y = (target.height() as f32 - 1.0).max(0.0);
        let x0 = a[0].min(b[0]).min(c[0]).floor().clamp(0.0, max_x) as u32;
        let x1 = a[0].max(b[0]).max(c[0]).ceil().clamp(0.0, max_x) as u32;
        let y0 = a[1].min(b[1]).min(c[1]).floor().clamp(0.0, max_y) as u32;
        let y1 = a[1].max(b[1]).max(c[1]).ceil().clamp(0.0, max_y) as u32;

        // Edge opposite each vertex
        let edge_lengths = [distance(b, c), distance(c, a), distance(a, b)];
        let mut written = 0;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = [x as f32 + 0.5, y as f32 + 0.5];
                let w = [
                    edge_function(b, c, p) / area,
                    edge_function(c, a, p) / area,
                    edge_function(a, b, p) / area,
                ];
                if w.iter().any(|&wi| wi < 0.0) {
                    continue;
                }

                let depth = w[0] * verts[0].depth + w[1] * verts[1].depth + w[2] * verts[2].depth;
                if !(-1.0..=1.0).contains(&depth) {
                    continue;
                }

                let index = target.index(x, y);
                let stored = target.depth(index);

                let color = match pass {
                    Pass::Fill | Pass::Edges { .. } => {
                        if depth >= stored {
                            continue;
                        }
                        if let Pass::Edges { half_width } = pass {
                            if !near_edge(w, area, edge_lengths, half_width) {
                                continue;
                            }
                        }

                        let (position, normal) = interpolate(verts, w);
                        target.set_depth(index, depth);
                        shade(&scene.material, &scene.lights, &scene.camera, position, normal)
                    }
                    Pass::Overlay { half_width } => {
                        if depth > stored + OVERLAY_DEPTH_BIAS
                            || !near_edge(w, area, edge_lengths, half_width)
                        {
                            continue;
                        }
                        OVERLAY_COLOR
                    }
                };

                target.blend(index, color);
                written += 1;
            }
        }

        Some(written)
    }
}

/// Whether the pixel lies within `half_width` of any triangle edge
fn near_edge(w: [f32; 3], area: f32, edge_lengths: [f32; 3], half_width: f32) -> bool {
    (0..3).any(|i| edge_lengths[i] > 0.0 && (w[i] * area).abs() / edge_lengths[i] <= half_width)
}

/// Perspective-correct world position and normal at screen weights `w`
fn interpolate(verts: [&ProjectedVertex; 3], w: [f32; 3]) -> (Vector3<f32>, Vector3<f32>) {
    let pw = [w[0] * verts[0].inv_w, w[1] * verts[1].inv_w, w[2] * verts[2].inv_w];
    let sum = pw[0] + pw[1] + pw[2];
    let bary = if sum > 0.0 {
        [pw[0] / sum, pw[1] / sum, pw[2] / sum]
    } else {
        w
    };

    let mut position = Vector3::new(0.0, 0.0, 0.0);
    let mut normal = Vector3::new(0.0, 0.0, 0.0);
    for (v, &b) in verts.iter().zip(&bary) {
        position += v.world_position * b;
        normal += v.world_normal * b;
    }
    (position, normal)
}
