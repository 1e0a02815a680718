//! Kiln
//!
//! A procedural 3D object studio: generate a primitive, deform it, pick a
//! material and export a rendered PNG or SVG.

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod gfx;
pub mod prelude;

// Re-export main types for convenience
pub use app::Studio;
pub use error::{KilnError, Result};

/// Creates a studio with the default configuration
pub fn default() -> Studio {
    Studio::default()
}
