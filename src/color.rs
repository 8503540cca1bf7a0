use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues, starting
/// from `hue_offset` degrees.
pub fn generate_palette(n: usize, hue_offset: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (hue_offset + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category → Color32
// ---------------------------------------------------------------------------

/// Stable colours for a fixed set of category labels (launch sites, booster
/// versions). Built once per dataset so a category keeps its colour while
/// the filters change.
#[derive(Debug, Clone, Default)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
}

impl CategoryColors {
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a String>, hue_offset: f32) -> Self {
        let categories: Vec<&String> = categories.into_iter().collect();
        let palette = generate_palette(categories.len(), hue_offset);
        let mapping = categories
            .into_iter()
            .zip(palette)
            .map(|(c, color)| (c.clone(), color))
            .collect();
        CategoryColors { mapping }
    }

    /// Colour for `category`, grey for anything not seen at construction.
    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_colours() {
        let colours = generate_palette(5, 0.0);
        assert_eq!(colours.len(), 5);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0, 0.0).is_empty());
    }

    #[test]
    fn unknown_category_is_grey() {
        let cats = vec!["FT".to_string(), "B5".to_string()];
        let colors = CategoryColors::new(&cats, 0.0);
        assert_ne!(colors.color_for("FT"), colors.color_for("B5"));
        assert_eq!(colors.color_for("v1.0"), Color32::GRAY);
    }
}
