//! # Export Shapes
//!
//! Renders every primitive with a different material and deformation and
//! writes PNG and SVG files to `target/kiln-demo/` (or the directory given
//! as the first argument). An optional second argument names a studio
//! config JSON file to start from.
//!
//! Run with `RUST_LOG=debug` to see cache and rasterizer activity.

use std::{env, fs, path::PathBuf};

use anyhow::Context;
use kiln::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target/kiln-demo"));
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let config = match args.next() {
        Some(path) => {
            StudioConfig::load(&path).with_context(|| format!("loading config {}", path))?
        }
        None => StudioConfig {
            export_size: 512,
            ..Default::default()
        },
    };

    let mut studio = Studio::new(config);
    for (i, shape) in Shape::ALL.into_iter().enumerate() {
        let settings = studio.config_mut();
        settings.shape.shape = shape;
        settings.material = MaterialKind::ALL[i % MaterialKind::ALL.len()];
        settings.deformation = DeformationParameters {
            twist_degrees: 15.0 * i as f32,
            taper: if i % 2 == 0 { 0.3 } else { 0.0 },
            noise_amplitude: if i % 3 == 0 { 0.4 } else { 0.0 },
            ..Default::default()
        };
        settings.camera_angle = CameraAngle::IsometricRight;
        settings.nudge_rotation(Axis::Y, 3);

        for format in [ExportFormat::Png, ExportFormat::Svg] {
            let image = studio.export(format)?;
            let path = out_dir.join(format!("{}.{}", shape.name(), format.extension()));
            image.save(&path)?;
            println!("{:<14} {:>9} bytes  {}", shape.name(), image.bytes.len(), path.display());
        }
    }

    studio.config().save(out_dir.join("last_config.json"))?;
    Ok(())
}
