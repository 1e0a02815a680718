//! Material system
//!
//! Maps a material kind plus the two user colors (main color and shadow
//! tint) to a fixed preset of shading parameters. The presets are plain
//! data; [`crate::gfx::rendering::shading`] interprets them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::KilnError;

/// An sRGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`
    pub fn from_hex(hex: &str) -> Result<Self, KilnError> {
        let invalid = || KilnError::InvalidColor(hex.to_string());
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };

        let channel = |i: usize| {
            expanded
                .get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .map(|v| v as f32 / 255.0)
                .ok_or_else(invalid)
        };

        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Formats as lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.to_rgba8(1.0);
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Multiplies every channel by `factor`
    pub fn scale(&self, factor: f32) -> Self {
        Self::rgb(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn with_alpha(&self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }

    pub fn to_rgba8(&self, alpha: f32) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(alpha)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = KilnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = KilnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Material kinds offered by the studio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    #[default]
    Matte,
    Plastic,
    Metal,
    Glass,
    Porcelain,
    Velvet,
    Toon,
    Lambert,
    Normal,
    Wireframe,
}

impl MaterialKind {
    /// All kinds in picker order
    pub const ALL: [MaterialKind; 10] = [
        MaterialKind::Matte,
        MaterialKind::Plastic,
        MaterialKind::Metal,
        MaterialKind::Glass,
        MaterialKind::Porcelain,
        MaterialKind::Velvet,
        MaterialKind::Toon,
        MaterialKind::Lambert,
        MaterialKind::Normal,
        MaterialKind::Wireframe,
    ];

    /// The next kind in picker order, wrapping around
    pub fn next(self) -> MaterialKind {
        let index = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Lighting model a preset is shaded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingModel {
    /// Metallic-roughness with emissive
    Standard,
    /// Standard plus transmission and sheen
    Physical,
    /// Two-tone diffuse
    Toon,
    /// Diffuse only
    Lambert,
    /// View-space normal as color
    Normal,
    /// Flat base color, no lighting
    Unlit,
}

/// Renderer-facing material description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialPreset {
    pub kind: MaterialKind,
    pub model: ShadingModel,
    pub base_color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Color,
    /// Fraction of light passing through the surface
    pub transmission: f32,
    pub ior: f32,
    pub thickness: f32,
    pub sheen: f32,
    pub sheen_roughness: f32,
    pub sheen_color: Color,
    /// Draw triangle edges only
    pub wireframe: bool,
}

impl MaterialPreset {
    fn base(kind: MaterialKind, model: ShadingModel, base_color: Color) -> Self {
        Self {
            kind,
            model,
            base_color,
            roughness: 1.0,
            metalness: 0.0,
            emissive: Color::BLACK,
            transmission: 0.0,
            ior: 1.5,
            thickness: 0.0,
            sheen: 0.0,
            sheen_roughness: 1.0,
            sheen_color: Color::BLACK,
            wireframe: false,
        }
    }

    /// Surface opacity once transmission is accounted for
    pub fn opacity(&self) -> f32 {
        1.0 - 0.7 * self.transmission.clamp(0.0, 1.0)
    }
}

/// Looks up the preset for `kind` with the user's colors applied
pub fn select_material(
    kind: MaterialKind,
    main_color: Color,
    shadow_tint: Color,
) -> MaterialPreset {
    use MaterialKind::*;

    match kind {
        Matte => MaterialPreset {
            roughness: 0.9,
            metalness: 0.1,
            emissive: shadow_tint.scale(0.2),
            ..MaterialPreset::base(kind, ShadingModel::Standard, main_color)
        },
        Plastic => MaterialPreset {
            roughness: 0.4,
            metalness: 0.05,
            ..MaterialPreset::base(kind, ShadingModel::Standard, main_color)
        },
        Metal => MaterialPreset {
            roughness: 0.1,
            metalness: 0.9,
            emissive: shadow_tint.scale(0.1),
            ..MaterialPreset::base(kind, ShadingModel::Standard, main_color)
        },
        Glass => MaterialPreset {
            roughness: 0.0,
            metalness: 0.1,
            transmission: 1.0,
            ior: 1.5,
            thickness: 1.0,
            ..MaterialPreset::base(kind, ShadingModel::Physical, main_color)
        },
        Porcelain => MaterialPreset {
            roughness: 0.1,
            metalness: 0.1,
            transmission: 0.2,
            sheen: 0.5,
            sheen_color: shadow_tint,
            ..MaterialPreset::base(kind, ShadingModel::Physical, main_color)
        },
        Velvet => MaterialPreset {
            roughness: 1.0,
            metalness: 0.1,
            sheen: 0.7,
            sheen_roughness: 0.3,
            sheen_color: shadow_tint,
            ..MaterialPreset::base(kind, ShadingModel::Physical, main_color)
        },
        Toon => MaterialPreset::base(kind, ShadingModel::Toon, main_color),
        Lambert => MaterialPreset::base(kind, ShadingModel::Lambert, main_color),
        Normal => MaterialPreset::base(kind, ShadingModel::Normal, Color::WHITE),
        Wireframe => MaterialPreset {
            wireframe: true,
            ..MaterialPreset::base(kind, ShadingModel::Unlit, main_color)
        },
    }
}
