//! # Kiln Prelude
//!
//! Commonly used types in one import.
//!
//! ```rust
//! use kiln::prelude::*;
//!
//! let mut studio = kiln::default();
//! studio.config_mut().shape.shape = Shape::Donut;
//! studio.config_mut().material = MaterialKind::Velvet;
//! studio.config_mut().export_size = 64;
//!
//! let image = studio.export(ExportFormat::Png)?;
//! assert!(image.to_data_url().starts_with("data:image/png;base64,"));
//! # Ok::<(), KilnError>(())
//! ```

// Re-export core application types
pub use crate::app::Studio;
pub use crate::config::{Axis, StudioCommand, StudioConfig};
pub use crate::default;
pub use crate::error::KilnError;

// Export
pub use crate::export::{ExportFormat, ExportedImage, ImageEncoder};

// Graphics
pub use crate::gfx::{
    camera::{Camera, CameraAngle},
    deform::{deform, DeformMode, DeformationParameters},
    geometry::{build_base_mesh, GeometryData, Shape, ShapeConfig},
    lighting::LightConfig,
    material::{select_material, Color, MaterialKind, MaterialPreset},
    rendering::{Background, FrameBuffer, Rasterizer, RenderScene, RenderSettings},
};
