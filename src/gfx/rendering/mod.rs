//! Software rendering
//!
//! Turns a deformed mesh plus material, lights and camera into pixels.
//! [`Rasterizer`] produces a [`FrameBuffer`]; the export encoders take it
//! from there.

pub mod framebuffer;
pub mod projection;
pub mod rasterizer;
pub mod scene;
pub mod shading;

pub use framebuffer::FrameBuffer;
pub use projection::{ProjectedVertex, Projector};
pub use rasterizer::{Rasterizer, RenderSettings, MAX_SAMPLES};
pub use scene::{rotation_matrix, Background, RenderScene};
pub use shading::shade;
