use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: faction label → Color32
// ---------------------------------------------------------------------------

/// Maps the dataset's faction labels to distinct colours, shared by the map
/// markers, the side-panel swatches and the faction chart.
#[derive(Debug, Clone, Default)]
pub struct FactionColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl FactionColors {
    /// Build a colour map from the dataset's unique faction labels.
    pub fn new(factions: &BTreeSet<String>) -> Self {
        let palette = generate_palette(factions.len());
        let mapping: BTreeMap<String, Color32> = factions
            .iter()
            .zip(palette.into_iter())
            .map(|(label, c): (&String, Color32)| (label.clone(), c))
            .collect();

        FactionColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a faction label.
    pub fn color_for(&self, faction: &str) -> Color32 {
        self.mapping
            .get(faction)
            .copied()
            .unwrap_or(self.default_color)
    }
}
