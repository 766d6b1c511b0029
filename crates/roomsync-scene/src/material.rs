//! Category → material lookup.
//!
//! Every room-object box is drawn with a flat, non-metallic material whose
//! colour identifies the object's category. The table is total: a missing,
//! unknown or not-yet-recognised category resolves to the palette's
//! fallback colour.

use roomsync_types::ObjectCategory;
use serde::{Deserialize, Serialize};

/// Roughness shared by every room-object material.
pub const DEFAULT_ROUGHNESS: f32 = 0.27;

/// Linear RGBA colour, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Neutral colour used for objects without a recognised category.
    pub const SYSTEM_YELLOW: Color = Color::rgb(1.0, 0.8, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Color::SYSTEM_YELLOW
    }
}

/// Surface appearance of a rendered room object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
    pub roughness: f32,
    pub metallic: bool,
}

/// Fixed colour for a recognised category; `None` for anything else.
pub fn category_color(category: ObjectCategory) -> Option<Color> {
    let color = match category {
        ObjectCategory::Storage => Color::rgb(0.635, 0.518, 0.369),
        ObjectCategory::Refrigerator => Color::rgb(0.353, 0.784, 0.980),
        ObjectCategory::Stove => Color::rgb(1.0, 0.231, 0.188),
        ObjectCategory::Bed => Color::rgb(0.345, 0.337, 0.839),
        ObjectCategory::Sink => Color::rgb(0.0, 0.478, 1.0),
        ObjectCategory::WasherDryer => Color::rgb(0.686, 0.322, 0.871),
        ObjectCategory::Toilet => Color::rgb(0.188, 0.690, 0.780),
        ObjectCategory::Bathtub => Color::rgb(0.0, 0.780, 0.745),
        ObjectCategory::Oven => Color::rgb(1.0, 0.584, 0.0),
        ObjectCategory::Dishwasher => Color::rgb(0.557, 0.557, 0.576),
        ObjectCategory::Table => Color::rgb(0.204, 0.780, 0.349),
        ObjectCategory::Sofa => Color::rgb(1.0, 0.176, 0.333),
        ObjectCategory::Chair => Color::rgb(0.600, 0.800, 0.200),
        ObjectCategory::Fireplace => Color::rgb(0.800, 0.200, 0.0),
        ObjectCategory::Television => Color::rgb(0.110, 0.110, 0.118),
        ObjectCategory::Stairs => Color::rgb(0.900, 0.900, 0.920),
        _ => return None,
    };
    Some(color)
}

/// Material parameters that are not a function of the category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialPalette {
    pub roughness: f32,
    pub fallback_color: Color,
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self {
            roughness: DEFAULT_ROUGHNESS,
            fallback_color: Color::SYSTEM_YELLOW,
        }
    }
}

impl MaterialPalette {
    /// Resolve the material for an optional category.
    pub fn material_for(&self, category: Option<ObjectCategory>) -> Material {
        let color = category
            .and_then(category_color)
            .unwrap_or(self.fallback_color);
        Material {
            color,
            roughness: self.roughness,
            metallic: false,
        }
    }
}

/// [`MaterialPalette::material_for`] with the default palette.
pub fn material_for(category: Option<ObjectCategory>) -> Material {
    MaterialPalette::default().material_for(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refrigerator_material_is_stable() {
        let first = material_for(Some(ObjectCategory::Refrigerator));
        for _ in 0..10 {
            assert_eq!(material_for(Some(ObjectCategory::Refrigerator)), first);
        }
        assert_ne!(first.color, Color::SYSTEM_YELLOW);
    }

    #[test]
    fn absent_and_unknown_use_fallback() {
        let none = material_for(None);
        let unknown = material_for(Some(ObjectCategory::Unknown));
        assert_eq!(none.color, Color::SYSTEM_YELLOW);
        assert_eq!(unknown, none);
    }

    #[test]
    fn known_categories_have_distinct_colors() {
        let colors: Vec<Color> = ObjectCategory::KNOWN
            .iter()
            .map(|&c| category_color(c).expect("known category has a colour"))
            .collect();
        for (i, a) in colors.iter().enumerate() {
            assert_ne!(*a, Color::SYSTEM_YELLOW);
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn materials_are_flat_and_non_metallic() {
        for category in ObjectCategory::KNOWN {
            let material = material_for(Some(category));
            assert!(!material.metallic);
            assert!((material.roughness - DEFAULT_ROUGHNESS).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn palette_overrides_roughness_and_fallback() {
        let palette = MaterialPalette {
            roughness: 0.9,
            fallback_color: Color::rgb(0.5, 0.5, 0.5),
        };
        let fallback = palette.material_for(None);
        assert_eq!(fallback.color, Color::rgb(0.5, 0.5, 0.5));
        assert!((fallback.roughness - 0.9).abs() < f32::EPSILON);

        let bed = palette.material_for(Some(ObjectCategory::Bed));
        assert_eq!(bed.color, category_color(ObjectCategory::Bed).unwrap());
    }
}
