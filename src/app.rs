//! The studio: configuration plus the caches that keep re-rendering cheap.
//!
//! Base meshes are rebuilt only when the shape settings change; every
//! deformation pass starts from that pristine template. The last export is
//! kept and handed back while nothing that affects it has changed.

use std::path::Path;

use log::debug;

use crate::{
    config::{StudioCommand, StudioConfig},
    error::{KilnError, Result},
    export::{self, ExportFormat, ExportedImage},
    gfx::{
        deform::deform,
        geometry::{build_base_mesh, GeometryData, ShapeConfig},
        material::MaterialPreset,
        rendering::{FrameBuffer, Rasterizer, RenderScene, RenderSettings},
    },
};

/// Base mesh template cache
///
/// Holds the mesh for the last shape configuration requested and rebuilds
/// it only when that configuration changes.
#[derive(Debug, Default)]
struct BaseMeshCache {
    key: Option<ShapeConfig>,
    mesh: GeometryData,
    rebuilds: usize,
}

impl BaseMeshCache {
    fn needs_update(&self, config: &ShapeConfig) -> bool {
        self.key.as_ref() != Some(config)
    }

    fn get(&mut self, config: &ShapeConfig) -> &GeometryData {
        if self.needs_update(config) {
            debug!("Base mesh cache: rebuilding {}", config.shape.name());
            self.mesh = build_base_mesh(config);
            self.key = Some(*config);
            self.rebuilds += 1;
        }
        &self.mesh
    }
}

/// A user-supplied base mesh replacing the generated primitive
#[derive(Debug)]
struct CustomBase {
    mesh: GeometryData,
}

#[derive(Debug)]
struct CachedExport {
    config: StudioConfig,
    format: ExportFormat,
    revision: u64,
    image: ExportedImage,
}

impl CachedExport {
    fn matches(&self, config: &StudioConfig, format: ExportFormat, revision: u64) -> bool {
        self.format == format && self.revision == revision && &self.config == config
    }
}

pub struct Studio {
    config: StudioConfig,
    base_cache: BaseMeshCache,
    custom_base: Option<CustomBase>,
    /// Bumped whenever the custom base mesh is set or cleared
    custom_revision: u64,
    last_export: Option<CachedExport>,
}

impl Default for Studio {
    fn default() -> Self {
        Self::new(StudioConfig::default())
    }
}

impl Studio {
    pub fn new(config: StudioConfig) -> Self {
        Self {
            config,
            base_cache: BaseMeshCache::default(),
            custom_base: None,
            custom_revision: 0,
            last_export: None,
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut StudioConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: StudioConfig) {
        self.config = config;
    }

    /// Replaces the generated primitive with `mesh`.
    ///
    /// Normals are recomputed when missing or mismatched. Shape settings
    /// are ignored while a custom base is set.
    pub fn set_custom_base(&mut self, mut mesh: GeometryData) -> Result<()> {
        if mesh.triangle_count() == 0 {
            return Err(KilnError::EmptyMesh);
        }
        if mesh.normals.len() != mesh.vertices.len() {
            mesh.compute_vertex_normals();
        }

        debug!(
            "Custom base mesh set: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        self.custom_base = Some(CustomBase { mesh });
        self.custom_revision += 1;
        Ok(())
    }

    pub fn load_custom_base<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let mesh = GeometryData::from_obj_path(path)?;
        self.set_custom_base(mesh)
    }

    pub fn clear_custom_base(&mut self) {
        if self.custom_base.take().is_some() {
            self.custom_revision += 1;
        }
    }

    pub fn has_custom_base(&self) -> bool {
        self.custom_base.is_some()
    }

    /// The undeformed mesh the current settings start from
    pub fn base_mesh(&mut self) -> &GeometryData {
        match &self.custom_base {
            Some(custom) => &custom.mesh,
            None => self.base_cache.get(&self.config.shape),
        }
    }

    /// A fresh deformation of the base mesh with the current parameters
    pub fn deformed_mesh(&mut self) -> GeometryData {
        let params = self.config.deformation;
        deform(self.base_mesh(), &params)
    }

    pub fn material(&self) -> MaterialPreset {
        self.config.material_preset()
    }

    /// Scene for `mesh` with the current material, lights, camera and rotation
    pub fn scene<'a>(&self, mesh: &'a GeometryData) -> RenderScene<'a> {
        RenderScene {
            lights: self.config.light,
            camera: self.config.camera(),
            background: self.config.background,
            wireframe_overlay: self.config.wireframe_overlay,
            ..RenderScene::new(mesh, self.material()).with_rotation(self.config.rotation)
        }
    }

    /// Renders a `size` x `size` frame
    pub fn render(&mut self, size: u32) -> Result<FrameBuffer> {
        self.render_with(RenderSettings::square(size, self.config.supersample))
    }

    pub fn preview(&mut self) -> Result<FrameBuffer> {
        self.render_with(self.config.preview_settings())
    }

    fn render_with(&mut self, settings: RenderSettings) -> Result<FrameBuffer> {
        settings.validate()?;
        let mesh = self.deformed_mesh();
        Rasterizer::new(settings).render(&self.scene(&mesh))
    }

    /// Encodes the current settings at the export size.
    ///
    /// Repeated calls with nothing changed return the previous image.
    pub fn export(&mut self, format: ExportFormat) -> Result<ExportedImage> {
        if let Some(cached) = &self.last_export {
            if cached.matches(&self.config, format, self.custom_revision) {
                debug!("Export cache hit ({})", format.extension());
                return Ok(cached.image.clone());
            }
        }

        let mesh = self.deformed_mesh();
        let image = export::export(&self.scene(&mesh), format, self.config.export_settings())?;

        self.last_export = Some(CachedExport {
            config: self.config.clone(),
            format,
            revision: self.custom_revision,
            image: image.clone(),
        });
        Ok(image)
    }

    /// Applies a key-bound command; `Export` yields the image in the
    /// configured format
    pub fn handle_command(&mut self, command: StudioCommand) -> Result<Option<ExportedImage>> {
        match command {
            StudioCommand::Export => return self.export(self.config.export_format).map(Some),
            StudioCommand::Reset => self.config.reset(),
            StudioCommand::CycleShape => self.config.cycle_shape(),
            StudioCommand::CycleMaterial => self.config.cycle_material(),
            StudioCommand::Rotate { axis, steps } => self.config.nudge_rotation(axis, steps),
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Axis,
        gfx::{
            deform::DeformationParameters,
            geometry::{generate_box, Shape},
            material::MaterialKind,
        },
    };

    fn small_studio() -> Studio {
        let mut config = StudioConfig::default();
        config.export_size = 32;
        config.preview_size = 16;
        config.supersample = 1;
        Studio::new(config)
    }

    #[test]
    fn test_base_mesh_is_cached_per_shape() {
        let mut studio = small_studio();
        let first = studio.base_mesh().clone();
        studio.config_mut().deformation.twist_degrees = 45.0;
        let _ = studio.deformed_mesh();
        let _ = studio.deformed_mesh();
        assert_eq!(studio.base_cache.rebuilds, 1);
        assert_eq!(studio.base_mesh(), &first);

        studio.config_mut().cycle_shape();
        assert_eq!(studio.config().shape.shape, Shape::Sphere);
        assert_ne!(studio.base_mesh(), &first);
        assert_eq!(studio.base_cache.rebuilds, 2);
    }

    #[test]
    fn test_deformation_does_not_compound() {
        let mut studio = small_studio();
        studio.config_mut().deformation = DeformationParameters {
            twist_degrees: 30.0,
            taper: 0.4,
            noise_amplitude: 0.3,
            ..Default::default()
        };
        let a = studio.deformed_mesh();
        let b = studio.deformed_mesh();
        assert_eq!(a, b);

        studio.config_mut().deformation = DeformationParameters::default();
        let neutral = studio.deformed_mesh();
        assert_eq!(&neutral, studio.base_mesh());
    }

    #[test]
    fn test_custom_base_replaces_primitive() {
        let mut studio = small_studio();
        let mut cube = generate_box(1.0, 1.0, 1.0);
        cube.normals.clear();
        studio.set_custom_base(cube.clone()).unwrap();
        cube.compute_vertex_normals();

        assert!(studio.has_custom_base());
        assert_eq!(studio.base_mesh(), &cube);
        studio.config_mut().cycle_shape();
        assert_eq!(studio.base_mesh(), &cube);

        studio.clear_custom_base();
        assert_ne!(studio.base_mesh(), &cube);

        assert!(matches!(
            studio.set_custom_base(GeometryData::new()),
            Err(KilnError::EmptyMesh)
        ));
    }

    #[test]
    fn test_render_sizes() {
        let mut studio = small_studio();
        let preview = studio.preview().unwrap();
        assert_eq!((preview.width(), preview.height()), (16, 16));
        assert!(preview.covered_pixels() > 0);

        assert!(matches!(
            studio.render(0),
            Err(KilnError::InvalidDimensions { width: 0, height: 0 })
        ));
    }

    #[test]
    fn test_oversized_config_is_an_error() {
        let config =
            StudioConfig::from_json(r#"{"preview_size": 65536, "supersample": 65536}"#).unwrap();
        let mut studio = Studio::new(config);
        assert!(matches!(
            studio.preview(),
            Err(KilnError::InvalidDimensions { width: 65536, height: 65536 })
        ));

        studio.config_mut().export_size = 4096;
        studio.config_mut().supersample = 2;
        for format in [ExportFormat::Png, ExportFormat::Svg] {
            assert!(matches!(
                studio.export(format),
                Err(KilnError::InvalidDimensions { width: 4096, height: 4096 })
            ));
        }
    }

    #[test]
    fn test_export_cache_tracks_changes() {
        let mut studio = small_studio();
        let first = studio.export(ExportFormat::Png).unwrap();
        let again = studio.export(ExportFormat::Png).unwrap();
        assert_eq!(first, again);

        let svg = studio.export(ExportFormat::Svg).unwrap();
        assert_eq!(svg.format, ExportFormat::Svg);

        studio.config_mut().material = MaterialKind::Metal;
        let metal = studio.export(ExportFormat::Png).unwrap();
        assert_ne!(metal.bytes, first.bytes);

        studio.set_custom_base(generate_box(0.5, 3.0, 0.5)).unwrap();
        let custom = studio.export(ExportFormat::Png).unwrap();
        assert_ne!(custom.bytes, metal.bytes);
    }

    #[test]
    fn test_commands() {
        let mut studio = small_studio();
        assert_eq!(studio.handle_command(StudioCommand::CycleMaterial).unwrap(), None);
        studio
            .handle_command(StudioCommand::Rotate {
                axis: Axis::Z,
                steps: -2,
            })
            .unwrap();
        assert_eq!(studio.config().material, MaterialKind::Plastic);
        assert_eq!(studio.config().rotation, [0.0, 0.0, 350.0]);

        let image = studio.handle_command(StudioCommand::Export).unwrap().unwrap();
        assert_eq!((image.width, image.height), (32, 32));

        studio.handle_command(StudioCommand::Reset).unwrap();
        assert_eq!(studio.config(), &StudioConfig::default());
    }
}
