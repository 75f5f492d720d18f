use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Surface material of a piece of furniture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Titanium,
    Bronze,
    Plastic,
    StainlessSteel,
}

impl Material {
    pub const ALL: [Material; 4] = [
        Material::Titanium,
        Material::Bronze,
        Material::Plastic,
        Material::StainlessSteel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Material::Titanium => "titanium",
            Material::Bronze => "bronze",
            Material::Plastic => "plastic",
            Material::StainlessSteel => "stainless_steel",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for names that are not one of the known materials.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown material: {0}")]
pub struct UnknownMaterial(pub String);

impl FromStr for Material {
    type Err = UnknownMaterial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "titanium" => Ok(Material::Titanium),
            "bronze" => Ok(Material::Bronze),
            "plastic" => Ok(Material::Plastic),
            "stainlesssteel" | "steel" => Ok(Material::StainlessSteel),
            _ => Err(UnknownMaterial(s.to_string())),
        }
    }
}

/// An sRGB colour, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Linear components in [0, 1], as renderers expect them.
    pub fn to_unit(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid colour {0:?}: expected #RRGGBB or #RGB")]
pub struct InvalidColor(pub String);

impl FromStr for Rgb {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        let err = || InvalidColor(s.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        match digits.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
                Ok(Rgb::new(
                    channel(0).map_err(|_| err())?,
                    channel(2).map_err(|_| err())?,
                    channel(4).map_err(|_| err())?,
                ))
            }
            3 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|v| v * 17);
                Ok(Rgb::new(
                    channel(0).map_err(|_| err())?,
                    channel(1).map_err(|_| err())?,
                    channel(2).map_err(|_| err())?,
                ))
            }
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}
