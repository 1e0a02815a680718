use std::io::Cursor;

use image::{ImageBuffer, ImageFormat, RgbaImage};

use super::{ExportFormat, ExportedImage, ImageEncoder};
use crate::{
    error::{KilnError, Result},
    gfx::rendering::{FrameBuffer, Rasterizer, RenderScene, RenderSettings},
};

/// Rasterizes the scene and encodes it as an RGBA PNG
#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Png
    }

    fn encode(&self, scene: &RenderScene<'_>, settings: RenderSettings) -> Result<ExportedImage> {
        let frame = Rasterizer::new(settings).render(scene)?;
        Ok(ExportedImage {
            format: ExportFormat::Png,
            width: frame.width(),
            height: frame.height(),
            bytes: encode_frame(&frame)?,
        })
    }
}

/// PNG bytes for a finished frame
pub fn encode_frame(frame: &FrameBuffer) -> Result<Vec<u8>> {
    let invalid = || KilnError::InvalidDimensions {
        width: frame.width(),
        height: frame.height(),
    };
    if frame.width() == 0 || frame.height() == 0 {
        return Err(invalid());
    }

    let img: RgbaImage = ImageBuffer::from_raw(frame.width(), frame.height(), frame.to_rgba8())
        .ok_or_else(invalid)?;

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::{build_base_mesh, Shape, ShapeConfig},
        material::{select_material, Color, MaterialKind},
        rendering::Background,
    };

    #[test]
    fn test_png_decodes_to_the_rendered_frame() {
        let mesh = build_base_mesh(&ShapeConfig {
            shape: Shape::Sphere,
            ..Default::default()
        });
        let material = select_material(MaterialKind::Plastic, Color::WHITE, Color::BLACK);
        let scene = RenderScene::new(&mesh, material);
        let settings = RenderSettings::square(24, 2);

        let image = PngEncoder.encode(&scene, settings).unwrap();
        assert_eq!((image.width, image.height), (24, 24));
        assert_eq!(&image.bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory_with_format(&image.bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        let frame = Rasterizer::new(settings).render(&scene).unwrap();
        assert_eq!(decoded.into_raw(), frame.to_rgba8());
    }

    #[test]
    fn test_transparent_background_survives_encoding() {
        let mesh = build_base_mesh(&ShapeConfig::default());
        let material = select_material(MaterialKind::Matte, Color::WHITE, Color::BLACK);
        let mut scene = RenderScene::new(&mesh, material);
        scene.background = Background::Transparent;

        let image = PngEncoder.encode(&scene, RenderSettings::square(16, 1)).unwrap();
        let decoded = image::load_from_memory(&image.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(decoded.get_pixel(8, 8).0[3], 255);
    }
}
