use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Rgb – colour shared by both drawing back-ends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const GRAY: Rgb = Rgb(128, 128, 128);
    pub const STEEL_BLUE: Rgb = Rgb(70, 130, 180);

    /// Parse `#rrggbb` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category → Rgb
// ---------------------------------------------------------------------------

/// Assigns each bar category its own colour.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Rgb>,
    default_color: Rgb,
}

impl CategoryColors {
    /// Colours follow the order of `categories`.
    pub fn new(categories: &[String]) -> Self {
        let palette = generate_palette(categories.len());
        let mapping = categories.iter().cloned().zip(palette).collect();
        CategoryColors {
            mapping,
            default_color: Rgb::GRAY,
        }
    }

    /// Look up the colour for a category.
    pub fn color_for(&self, category: &str) -> Rgb {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }
}
