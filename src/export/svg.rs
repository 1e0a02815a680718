//! Vector export: one flat-shaded polygon per visible triangle, painted
//! back to front.

use cgmath::{InnerSpace, Vector3};
use quick_xml::{
    events::{BytesEnd, BytesStart, Event},
    Writer,
};

use super::{ExportFormat, ExportedImage, ImageEncoder};
use crate::{
    error::Result,
    gfx::{
        material::Color,
        rendering::{shade, Background, ProjectedVertex, Projector, RenderScene, RenderSettings},
    },
};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
/// Stroke width used to hide hairline seams between adjacent fills
const SEAM_STROKE: f32 = 0.5;
const EDGE_STROKE: f32 = 1.0;
const MIN_SCREEN_AREA: f32 = 1e-6;

#[derive(Debug, Clone, Copy, Default)]
pub struct SvgEncoder;

struct Polygon {
    points: [[f32; 2]; 3],
    depth: f32,
    color: [f32; 4],
}

impl ImageEncoder for SvgEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Svg
    }

    fn encode(&self, scene: &RenderScene<'_>, settings: RenderSettings) -> Result<ExportedImage> {
        settings.validate()?;
        let (width, height) = (settings.width, settings.height);

        let projected = Projector::new(scene, width, height).project_mesh(scene.mesh);
        let mut polygons: Vec<Polygon> = scene
            .mesh
            .triangles()
            .filter_map(|tri| {
                let verts = [&projected[tri[0]], &projected[tri[1]], &projected[tri[2]]];
                flat_polygon(scene, verts)
            })
            .collect();

        // Painter's algorithm: farthest first
        polygons.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        let (w, h) = (width.to_string(), height.to_string());
        let view_box = format!("0 0 {} {}", width, height);

        let mut root = BytesStart::new("svg");
        root.push_attribute(("xmlns", SVG_NAMESPACE));
        root.push_attribute(("width", w.as_str()));
        root.push_attribute(("height", h.as_str()));
        root.push_attribute(("viewBox", view_box.as_str()));
        writer.write_event(Event::Start(root))?;

        if let Background::Solid { color, opacity } = scene.background {
            let mut rect = BytesStart::new("rect");
            rect.push_attribute(("width", "100%"));
            rect.push_attribute(("height", "100%"));
            rect.push_attribute(("fill", color.to_hex().as_str()));
            rect.push_attribute(("fill-opacity", fmt_num(opacity.clamp(0.0, 1.0)).as_str()));
            writer.write_event(Event::Empty(rect))?;
        }

        for polygon in &polygons {
            write_polygon(&mut writer, polygon, scene)?;
        }
        writer.write_event(Event::End(BytesEnd::new("svg")))?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(ExportedImage {
            format: ExportFormat::Svg,
            width,
            height,
            bytes,
        })
    }
}

/// Shades a triangle once at its centroid with its face normal
fn flat_polygon(scene: &RenderScene<'_>, verts: [&ProjectedVertex; 3]) -> Option<Polygon> {
    if verts.iter().any(|v| !v.visible) {
        return None;
    }

    let [a, b, c] = [verts[0].screen, verts[1].screen, verts[2].screen];
    let area = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
    if area.abs() < MIN_SCREEN_AREA {
        return None;
    }

    let depth = (verts[0].depth + verts[1].depth + verts[2].depth) / 3.0;
    if !(-1.0..=1.0).contains(&depth) {
        return None;
    }

    let p = [verts[0].world_position, verts[1].world_position, verts[2].world_position];
    let centroid = (p[0] + p[1] + p[2]) / 3.0;
    let face = (p[1] - p[0]).cross(p[2] - p[0]);
    let normal = if face.magnitude2() > 0.0 {
        face
    } else {
        verts.iter().fold(Vector3::new(0.0, 0.0, 0.0), |acc, v| acc + v.world_normal)
    };

    Some(Polygon {
        points: [a, b, c],
        depth,
        color: shade(&scene.material, &scene.lights, &scene.camera, centroid, normal),
    })
}

/// Writes the filled (or stroked) polygon, then its overlay outline if enabled
fn write_polygon(
    writer: &mut Writer<Vec<u8>>,
    polygon: &Polygon,
    scene: &RenderScene<'_>,
) -> Result<()> {
    let points = polygon
        .points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p[0]), fmt_num(p[1])))
        .collect::<Vec<_>>()
        .join(" ");

    let [r, g, b, alpha] = polygon.color;
    let hex = Color::rgb(r, g, b).to_hex();

    let mut element = BytesStart::new("polygon");
    element.push_attribute(("points", points.as_str()));
    if scene.material.wireframe {
        element.push_attribute(("fill", "none"));
        element.push_attribute(("stroke", hex.as_str()));
        element.push_attribute(("stroke-width", fmt_num(EDGE_STROKE).as_str()));
        element.push_attribute(("stroke-linejoin", "round"));
    } else if alpha < 1.0 {
        element.push_attribute(("fill", hex.as_str()));
        element.push_attribute(("fill-opacity", fmt_num(alpha).as_str()));
    } else {
        element.push_attribute(("fill", hex.as_str()));
        element.push_attribute(("stroke", hex.as_str()));
        element.push_attribute(("stroke-width", fmt_num(SEAM_STROKE).as_str()));
        element.push_attribute(("stroke-linejoin", "round"));
    }
    writer.write_event(Event::Empty(element))?;

    if scene.wireframe_overlay {
        let mut outline = BytesStart::new("polygon");
        outline.push_attribute(("points", points.as_str()));
        outline.push_attribute(("fill", "none"));
        outline.push_attribute(("stroke", "#000000"));
        outline.push_attribute(("stroke-opacity", "0.5"));
        outline.push_attribute(("stroke-width", fmt_num(EDGE_STROKE).as_str()));
        writer.write_event(Event::Empty(outline))?;
    }
    Ok(())
}

/// Two decimals, trailing zeros trimmed
fn fmt_num(v: f32) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::{build_base_mesh, Shape, ShapeConfig},
        material::{select_material, MaterialKind},
    };

    fn encode(kind: MaterialKind, configure: impl FnOnce(&mut RenderScene<'_>)) -> String {
        let mesh = build_base_mesh(&ShapeConfig {
            shape: Shape::Octahedron,
            ..Default::default()
        });
        let material = select_material(kind, Color::WHITE, Color::BLACK);
        let mut scene = RenderScene::new(&mesh, material);
        configure(&mut scene);
        let image = SvgEncoder.encode(&scene, RenderSettings::square(100, 2)).unwrap();
        assert_eq!((image.width, image.height), (100, 100));
        String::from_utf8(image.bytes).unwrap()
    }

    #[test]
    fn test_svg_document_structure() {
        let svg = encode(MaterialKind::Matte, |_| {});
        let root = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100""#;
        assert!(svg.starts_with(root));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(!svg.contains("<rect"));

        // An octahedron has eight faces; at least the four nearest are on screen
        let polygons = svg.matches("<polygon").count();
        assert!((4..=8).contains(&polygons), "{} polygons", polygons);
    }

    #[test]
    fn test_solid_background_and_overlay() {
        let svg = encode(MaterialKind::Matte, |scene| {
            scene.background = Background::Solid {
                color: Color::from_hex("#ff0000").unwrap(),
                opacity: 0.5,
            };
            scene.wireframe_overlay = true;
        });
        let rect = r##"<rect width="100%" height="100%" fill="#ff0000" fill-opacity="0.5"/>"##;
        assert!(svg.contains(rect));
        assert!(svg.contains("stroke-opacity=\"0.5\""));
    }

    #[test]
    fn test_wireframe_and_glass_paint() {
        let wire = encode(MaterialKind::Wireframe, |_| {});
        assert!(wire.contains("fill=\"none\" stroke=\"#ffffff\""));

        let glass = encode(MaterialKind::Glass, |_| {});
        assert!(glass.contains("fill-opacity=\""));
    }

    #[test]
    fn test_output_is_well_formed_xml() {
        let svg = encode(MaterialKind::Glass, |scene| scene.wireframe_overlay = true);
        let mut reader = quick_xml::Reader::from_str(&svg);
        let mut names = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => {
                    names.push(String::from_utf8(e.name().as_ref().to_vec()).unwrap())
                }
                Event::Eof => break,
                _ => {}
            }
        }

        assert_eq!(names[0], "svg");
        assert!(names[1..].iter().all(|n| n == "polygon"));
        // Every face is followed by its overlay outline
        assert!(names.len() > 1);
        assert_eq!((names.len() - 1) % 2, 0);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(12.3456), "12.35");
        assert_eq!(fmt_num(-0.001), "0");
    }
}
