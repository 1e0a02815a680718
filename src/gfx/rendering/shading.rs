//! Per-fragment lighting for each [`ShadingModel`].
//!
//! Lighting is two-sided: the normal is flipped toward the viewer before
//! any term is evaluated, so deformations that turn a surface inside out
//! still read as lit geometry.

use std::f32::consts::PI;

use cgmath::{ElementWise, EuclideanSpace, InnerSpace, Vector3};

use crate::gfx::{
    camera::Camera,
    lighting::LightConfig,
    material::{Color, MaterialPreset, ShadingModel},
};

const MIN_ROUGHNESS: f32 = 0.04;
const MAX_SHININESS: f32 = 2048.0;
/// Reflectance of dielectrics at normal incidence
const DIELECTRIC_F0: f32 = 0.04;

fn color(c: Color) -> Vector3<f32> {
    Vector3::from(c.to_array())
}

fn splat(v: f32) -> Vector3<f32> {
    Vector3::new(v, v, v)
}

fn normalize_or(v: Vector3<f32>, fallback: Vector3<f32>) -> Vector3<f32> {
    if v.magnitude2() > 0.0 {
        v.normalize()
    } else {
        fallback
    }
}

/// Straight-alpha RGBA for a surface point seen from `camera`
pub fn shade(
    material: &MaterialPreset,
    lights: &LightConfig,
    camera: &Camera,
    position: Vector3<f32>,
    normal: Vector3<f32>,
) -> [f32; 4] {
    let view = normalize_or(camera.eye.to_vec() - position, Vector3::unit_z());
    let mut n = normalize_or(normal, Vector3::unit_y());
    if n.dot(view) < 0.0 {
        n = -n;
    }

    let base = color(material.base_color);
    let light_dir = lights.direction();
    let n_dot_l = n.dot(light_dir).max(0.0);
    let ambient = lights.ambient();
    let radiance = lights.radiance();

    let (rgb, alpha) = match material.model {
        ShadingModel::Unlit => (base, 1.0),
        ShadingModel::Normal => {
            let view_normal = (camera.view_matrix() * n.extend(0.0)).truncate();
            (normalize_or(view_normal, Vector3::unit_z()) * 0.5 + splat(0.5), 1.0)
        }
        ShadingModel::Lambert => {
            let light = ambient + radiance * n_dot_l;
            (base.mul_element_wise(light), 1.0)
        }
        ShadingModel::Toon => {
            let tone = if n_dot_l > 0.0 { 1.0 } else { 0.0 };
            let light = ambient + radiance * tone;
            (base.mul_element_wise(light), 1.0)
        }
        ShadingModel::Standard | ShadingModel::Physical => {
            physical(material, base, n, view, light_dir, ambient, radiance)
        }
    };

    [
        rgb.x.clamp(0.0, 1.0),
        rgb.y.clamp(0.0, 1.0),
        rgb.z.clamp(0.0, 1.0),
        alpha.clamp(0.0, 1.0),
    ]
}

/// Metallic-roughness Blinn-Phong with emissive, sheen and transmission
fn physical(
    material: &MaterialPreset,
    base: Vector3<f32>,
    n: Vector3<f32>,
    view: Vector3<f32>,
    light_dir: Vector3<f32>,
    ambient: Vector3<f32>,
    radiance: Vector3<f32>,
) -> (Vector3<f32>, f32) {
    let metalness = material.metalness.clamp(0.0, 1.0);
    let roughness = material.roughness.clamp(MIN_ROUGHNESS, 1.0);
    let transmission = material.transmission.clamp(0.0, 1.0);

    let n_dot_l = n.dot(light_dir).max(0.0);
    let n_dot_v = n.dot(view).max(0.0);
    let half = normalize_or(light_dir + view, n);
    let n_dot_h = n.dot(half).max(0.0);

    let shininess = (2.0 / roughness.powi(4) - 2.0).clamp(1.0, MAX_SHININESS);
    let specular = n_dot_h.powf(shininess) * (shininess + 8.0) / (8.0 * PI);

    let f0 = splat(DIELECTRIC_F0) * (1.0 - metalness) + base * metalness;
    let diffuse = base * ((1.0 - metalness) * (1.0 - 0.5 * transmission));

    let mut rgb = diffuse.mul_element_wise(ambient)
        + (diffuse + f0 * specular).mul_element_wise(radiance) * n_dot_l
        // Rough environment stand-in so polished metal is not black
        + f0.mul_element_wise(ambient) * (1.0 - roughness)
        + color(material.emissive);

    let mut alpha = 1.0;

    if material.model == ShadingModel::Physical {
        if material.sheen > 0.0 {
            let rim = (1.0 - n_dot_v).powf(1.0 / material.sheen_roughness.max(0.1));
            let sheen = color(material.sheen_color) * (material.sheen * rim);
            rgb += sheen.mul_element_wise(ambient + radiance * n_dot_l);
        }

        if transmission > 0.0 {
            let r0 = ((material.ior - 1.0) / (material.ior + 1.0)).powi(2);
            let fresnel = r0 + (1.0 - r0) * (1.0 - n_dot_v).powi(5);
            alpha = (material.opacity() + fresnel * transmission).min(1.0);
        }
    }

    (rgb, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::material::{select_material, MaterialKind};

    fn main_color() -> Color {
        Color::from_hex("#4A90E2").unwrap()
    }

    fn tint() -> Color {
        Color::from_hex("#1E3A5F").unwrap()
    }

    fn shade_kind(kind: MaterialKind, normal: Vector3<f32>) -> [f32; 4] {
        let material = select_material(kind, main_color(), tint());
        shade(
            &material,
            &LightConfig::default(),
            &Camera::default(),
            Vector3::new(0.0, 0.0, 1.0),
            normal,
        )
    }

    fn luminance(c: [f32; 4]) -> f32 {
        c[0] + c[1] + c[2]
    }

    #[test]
    fn test_lit_side_is_brighter() {
        let toward_light = LightConfig::default().direction();
        for kind in [MaterialKind::Matte, MaterialKind::Plastic, MaterialKind::Lambert] {
            let lit = shade_kind(kind, toward_light);
            // Perpendicular to the light but still facing the camera
            let grazing = shade_kind(kind, Vector3::new(1.0, -0.5, 0.0).normalize());
            assert!(luminance(lit) > luminance(grazing), "{:?}", kind);
        }
    }

    #[test]
    fn test_two_sided_lighting() {
        let n = Vector3::new(0.2, 0.5, 1.0).normalize();
        let front = shade_kind(MaterialKind::Matte, n);
        let back = shade_kind(MaterialKind::Matte, -n);
        for i in 0..4 {
            assert!((front[i] - back[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_unlit_and_normal_models() {
        let wire = shade_kind(MaterialKind::Wireframe, Vector3::unit_y());
        assert_eq!(wire, main_color().with_alpha(1.0));

        // Facing the default camera head-on maps to +Z in view space
        let camera = Camera::default();
        let toward_eye = camera.eye.to_vec().normalize();
        let normal = shade_kind(MaterialKind::Normal, toward_eye);
        assert!((normal[2] - 1.0).abs() < 1e-4);
        assert!((normal[0] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_toon_has_two_tones() {
        let toward_light = LightConfig::default().direction();
        let a = shade_kind(MaterialKind::Toon, toward_light);
        let nearby = (toward_light + Vector3::new(0.0, 0.0, 0.3)).normalize();
        let b = shade_kind(MaterialKind::Toon, nearby);
        assert_eq!(a, b);

        let shadowed = shade_kind(MaterialKind::Toon, Vector3::new(1.0, -0.5, 0.0).normalize());
        assert!(luminance(shadowed) < luminance(a));
    }

    #[test]
    fn test_only_transmissive_materials_are_translucent() {
        for kind in MaterialKind::ALL {
            let alpha = shade_kind(kind, Vector3::unit_z())[3];
            match kind {
                MaterialKind::Glass | MaterialKind::Porcelain => assert!(alpha < 1.0, "{:?}", kind),
                _ => assert_eq!(alpha, 1.0, "{:?}", kind),
            }
        }
    }

    #[test]
    fn test_output_is_clamped() {
        let lights = LightConfig {
            intensity: 50.0,
            ..Default::default()
        };
        for kind in MaterialKind::ALL {
            let material = select_material(kind, Color::WHITE, Color::WHITE);
            let camera = Camera::default();
            let c = shade(&material, &lights, &camera, Vector3::unit_z(), Vector3::unit_z());
            assert!(c.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
