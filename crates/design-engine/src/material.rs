use design_types::{Material, Rgb};
use serde::{Deserialize, Serialize};

/// Physically based shading inputs for the render adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialAttributes {
    pub metalness: f32,
    pub roughness: f32,
    pub base_color: Rgb,
    pub env_map_intensity: f32,
}

/// Neutral grey used when a material name is not recognised.
pub const FALLBACK: MaterialAttributes = MaterialAttributes {
    metalness: 0.5,
    roughness: 0.5,
    base_color: Rgb::new(0x80, 0x80, 0x80),
    env_map_intensity: 1.0,
};

/// Shading for a material; `plastic_color` is only read for plastic.
pub fn resolve(material: Material, plastic_color: Rgb) -> MaterialAttributes {
    match material {
        Material::Titanium => MaterialAttributes {
            metalness: 0.9,
            roughness: 0.2,
            base_color: Rgb::new(0xA6, 0xA8, 0xAB),
            env_map_intensity: 1.5,
        },
        Material::Bronze => MaterialAttributes {
            metalness: 0.9,
            roughness: 0.3,
            base_color: Rgb::new(0xCD, 0x7F, 0x32),
            env_map_intensity: 1.2,
        },
        Material::Plastic => MaterialAttributes {
            metalness: 0.0,
            roughness: 0.8,
            base_color: plastic_color,
            env_map_intensity: 0.5,
        },
        Material::StainlessSteel => MaterialAttributes {
            metalness: 1.0,
            roughness: 0.1,
            base_color: Rgb::new(0xE8, 0xE8, 0xE8),
            env_map_intensity: 2.0,
        },
    }
}

/// Name-based lookup for foreign data; unknown names get [`FALLBACK`].
pub fn resolve_by_name(name: &str, plastic_color: Rgb) -> MaterialAttributes {
    match name.parse::<Material>() {
        Ok(material) => resolve(material, plastic_color),
        Err(_) => FALLBACK,
    }
}
