//! Image export
//!
//! Encoders turn a [`RenderScene`] into bytes the host can insert into a
//! document: a rasterized PNG or a flat-shaded vector SVG. Both are
//! wrapped in an [`ExportedImage`], which knows its MIME type and can
//! render itself as a `data:` URL.

mod png;
mod svg;

use std::{fs, path::Path};

use base64::Engine;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    gfx::rendering::{RenderScene, RenderSettings},
};

pub use png::{encode_frame, PngEncoder};
pub use svg::SvgEncoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

/// An encoded image ready to hand to the host document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        let payload = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime_type(), payload)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), &self.bytes)?;
        info!(
            "Wrote {} ({} bytes) to {}",
            self.mime_type(),
            self.bytes.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}

/// Encodes a scene into one image format
pub trait ImageEncoder {
    fn format(&self) -> ExportFormat;

    fn encode(&self, scene: &RenderScene<'_>, settings: RenderSettings) -> Result<ExportedImage>;
}

/// Returns the encoder for `format`
pub fn encoder_for(format: ExportFormat) -> Box<dyn ImageEncoder> {
    match format {
        ExportFormat::Png => Box::new(PngEncoder),
        ExportFormat::Svg => Box::new(SvgEncoder),
    }
}

/// Encodes `scene` as `format`, rejecting empty or oversized outputs
pub fn export(
    scene: &RenderScene<'_>,
    format: ExportFormat,
    settings: RenderSettings,
) -> Result<ExportedImage> {
    settings.validate()?;
    let image = encoder_for(format).encode(scene, settings)?;
    info!(
        "Exported {}x{} {} ({} bytes)",
        image.width,
        image.height,
        format.extension(),
        image.bytes.len()
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::KilnError,
        gfx::{
            geometry::{build_base_mesh, ShapeConfig},
            material::{select_material, Color, MaterialKind},
        },
    };

    #[test]
    fn test_data_url() {
        let image = ExportedImage {
            format: ExportFormat::Png,
            width: 1,
            height: 1,
            bytes: b"kiln".to_vec(),
        };
        assert_eq!(image.to_data_url(), "data:image/png;base64,a2lsbg==");

        let svg = ExportedImage {
            format: ExportFormat::Svg,
            ..image
        };
        assert!(svg.to_data_url().starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mesh = build_base_mesh(&ShapeConfig::default());
        let material = select_material(MaterialKind::Matte, Color::WHITE, Color::BLACK);
        let scene = RenderScene::new(&mesh, material);

        for format in [ExportFormat::Png, ExportFormat::Svg] {
            let settings = RenderSettings {
                width: 0,
                height: 16,
                supersample: 1,
            };
            assert!(matches!(
                export(&scene, format, settings),
                Err(KilnError::InvalidDimensions { width: 0, height: 16 })
            ));
        }
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(encoder_for(ExportFormat::Svg).format(), ExportFormat::Svg);
        assert_eq!(ExportFormat::Png.extension(), "png");
        assert_eq!(serde_json::to_string(&ExportFormat::Svg).unwrap(), "\"svg\"");
    }
}
