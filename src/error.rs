//! Error type shared by the I/O edges of the crate.
//!
//! Geometry generation, deformation and material selection are total
//! functions and never fail. Parsing (colors, config files, OBJ meshes),
//! sizing a render target and encoding exports can produce a [`KilnError`].

use thiserror::Error;

/// Errors produced while loading inputs or encoding exports
#[derive(Debug, Error)]
pub enum KilnError {
    #[error("invalid color `{0}`: expected #RRGGBB or #RGB")]
    InvalidColor(String),

    #[error("failed to load OBJ mesh: {0}")]
    ObjLoad(#[from] tobj::LoadError),

    #[error("mesh contains no triangles")]
    EmptyMesh,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid studio configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("SVG writing failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid output dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, KilnError>;
