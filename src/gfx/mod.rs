//! # Graphics Module
//!
//! Everything between a shape name and a finished frame.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`]) - mesh type, procedural primitives and OBJ loading
//! - **Deformation** ([`deform`]) - taper, noise, twist and fatten passes
//! - **Materials** ([`material`]) - material kinds and their shading presets
//! - **Lighting and camera** ([`lighting`], [`camera`]) - the fixed studio rig
//! - **Rendering** ([`rendering`]) - CPU rasterizer producing RGBA frames
//!
//! ## Usage
//!
//! ```rust
//! use kiln::gfx::{
//!     deform::{deform, DeformationParameters},
//!     geometry::{build_base_mesh, Shape, ShapeConfig},
//!     material::{select_material, Color, MaterialKind},
//!     rendering::{Rasterizer, RenderScene, RenderSettings},
//! };
//!
//! let base = build_base_mesh(&ShapeConfig { shape: Shape::Cone, ..Default::default() });
//! let mesh = deform(&base, &DeformationParameters { twist_degrees: 60.0, ..Default::default() });
//! let material = select_material(MaterialKind::Plastic, Color::WHITE, Color::BLACK);
//!
//! let scene = RenderScene::new(&mesh, material);
//! let frame = Rasterizer::new(RenderSettings::square(32, 1)).render(&scene)?;
//! assert_eq!(frame.width(), 32);
//! # Ok::<(), kiln::KilnError>(())
//! ```

pub mod camera;
pub mod deform;
pub mod geometry;
pub mod lighting;
pub mod material;
pub mod rendering;

// Re-export commonly used types
pub use camera::{Camera, CameraAngle};
pub use deform::{deform, DeformMode, DeformationParameters};
pub use geometry::{GeometryData, Shape, ShapeConfig};
pub use material::{select_material, Color, MaterialKind, MaterialPreset};
pub use rendering::{FrameBuffer, Rasterizer, RenderScene};
