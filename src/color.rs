use std::collections::BTreeMap;

use eframe::egui::Color32;
use enviro_insights::{Field, Pm25Category};
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: field / category → Color32
// ---------------------------------------------------------------------------

/// One colour per measurement field, shared by every chart.
#[derive(Debug, Clone)]
pub struct FieldColors {
    mapping: BTreeMap<Field, Color32>,
}

impl Default for FieldColors {
    fn default() -> Self {
        let mapping = Field::ALL
            .into_iter()
            .zip(generate_palette(Field::ALL.len()))
            .collect();
        FieldColors { mapping }
    }
}

impl FieldColors {
    pub fn color_for(&self, field: Field) -> Color32 {
        self.mapping.get(&field).copied().unwrap_or(Color32::GRAY)
    }
}

/// Severity colour: green through red to purple, like the AQI scale.
pub fn category_color(category: Pm25Category) -> Color32 {
    let hue = match category {
        Pm25Category::Good => 120.0,
        Pm25Category::Moderate => 55.0,
        Pm25Category::UnhealthyForSensitiveGroups => 30.0,
        Pm25Category::Unhealthy => 0.0,
        Pm25Category::VeryUnhealthy => 285.0,
    };
    hsl_to_color32(hue, 0.8, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn categories_have_distinct_colours() {
        let colours: Vec<Color32> = Pm25Category::ALL.iter().map(|c| category_color(*c)).collect();
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
