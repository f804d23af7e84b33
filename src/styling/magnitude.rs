//! Magnitude scale shared by the marker styler and the legend.

use crate::layers::vector::Color;
use serde::{Deserialize, Serialize};

/// The six magnitude colors, darkest for the strongest events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagnitudeColor {
    DeepPurple,
    DarkRed,
    Red,
    Orange,
    Amber,
    PaleYellowGreen,
}

impl MagnitudeColor {
    pub const fn hex(self) -> &'static str {
        match self {
            MagnitudeColor::DeepPurple => "#581845",
            MagnitudeColor::DarkRed => "#900C3F",
            MagnitudeColor::Red => "#C70039",
            MagnitudeColor::Orange => "#FF5733",
            MagnitudeColor::Amber => "#FFC300",
            MagnitudeColor::PaleYellowGreen => "#DAF7A6",
        }
    }

    pub const fn color(self) -> Color {
        match self {
            MagnitudeColor::DeepPurple => Color::rgb(0x58, 0x18, 0x45),
            MagnitudeColor::DarkRed => Color::rgb(0x90, 0x0C, 0x3F),
            MagnitudeColor::Red => Color::rgb(0xC7, 0x00, 0x39),
            MagnitudeColor::Orange => Color::rgb(0xFF, 0x57, 0x33),
            MagnitudeColor::Amber => Color::rgb(0xFF, 0xC3, 0x00),
            MagnitudeColor::PaleYellowGreen => Color::rgb(0xDA, 0xF7, 0xA6),
        }
    }
}

/// One row of the scale: magnitudes strictly above the previous row's bound
/// and up to (and including) `lower_bound + 1` get `color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeBucket {
    /// Inclusive lower bound as shown in the legend
    pub lower_bound: u8,
    pub color: MagnitudeColor,
}

impl MagnitudeBucket {
    /// Legend text: `"2–3"` or `"5+"` for the open-ended last bucket
    pub fn label(&self) -> String {
        if usize::from(self.lower_bound) + 1 == MAGNITUDE_SCALE.len() {
            format!("{}+", self.lower_bound)
        } else {
            format!("{}\u{2013}{}", self.lower_bound, self.lower_bound + 1)
        }
    }
}

/// Ascending scale. Classification walks it from the top.
pub const MAGNITUDE_SCALE: [MagnitudeBucket; 6] = [
    MagnitudeBucket { lower_bound: 0, color: MagnitudeColor::PaleYellowGreen },
    MagnitudeBucket { lower_bound: 1, color: MagnitudeColor::Amber },
    MagnitudeBucket { lower_bound: 2, color: MagnitudeColor::Orange },
    MagnitudeBucket { lower_bound: 3, color: MagnitudeColor::Red },
    MagnitudeBucket { lower_bound: 4, color: MagnitudeColor::DarkRed },
    MagnitudeBucket { lower_bound: 5, color: MagnitudeColor::DeepPurple },
];

/// Bucket a magnitude falls into. Comparisons are strict, so `1.0` lands in
/// the `0–1` bucket; NaN and anything `<= 1` land in the first bucket.
pub fn bucket_for(mag: f64) -> &'static MagnitudeBucket {
    MAGNITUDE_SCALE[1..]
        .iter()
        .rev()
        .find(|bucket| mag > f64::from(bucket.lower_bound))
        .unwrap_or(&MAGNITUDE_SCALE[0])
}

/// Fill color for a magnitude
pub fn magnitude_color(mag: f64) -> MagnitudeColor {
    bucket_for(mag).color
}

/// Marker radius in pixels: 1 for a magnitude of exactly zero, `mag * 3`
/// otherwise. Negative magnitudes give negative radii; drawing clamps them.
pub fn marker_radius(mag: f64) -> f64 {
    if mag == 0.0 {
        1.0
    } else {
        mag * 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_thresholds() {
        assert_eq!(magnitude_color(5.5).hex(), "#581845");
        assert_eq!(magnitude_color(5.0).hex(), "#900C3F");
        assert_eq!(magnitude_color(4.2).hex(), "#900C3F");
        assert_eq!(magnitude_color(3.0001).hex(), "#C70039");
        assert_eq!(magnitude_color(2.5).hex(), "#FF5733");
        assert_eq!(magnitude_color(1.01).hex(), "#FFC300");
        assert_eq!(magnitude_color(1.0).hex(), "#DAF7A6");
        assert_eq!(magnitude_color(0.0).hex(), "#DAF7A6");
        assert_eq!(magnitude_color(-1.5).hex(), "#DAF7A6");
        assert_eq!(magnitude_color(f64::NAN).hex(), "#DAF7A6");
        assert_eq!(magnitude_color(f64::INFINITY).hex(), "#581845");
    }

    #[test]
    fn test_hex_and_color_agree() {
        for bucket in MAGNITUDE_SCALE {
            assert_eq!(bucket.color.color().to_hex(), bucket.color.hex());
        }
    }

    #[test]
    fn test_radius() {
        assert_eq!(marker_radius(0.0), 1.0);
        assert_eq!(marker_radius(-0.0), 1.0);
        assert!((marker_radius(4.5) - 13.5).abs() < 1e-9);
        assert!((marker_radius(0.2) - 0.6).abs() < 1e-9);
        assert!((marker_radius(-1.0) + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<String> = MAGNITUDE_SCALE.iter().map(|b| b.label()).collect();
        assert_eq!(labels, ["0–1", "1–2", "2–3", "3–4", "4–5", "5+"]);
    }

    #[test]
    fn test_bucket_color_matches_upper_edge() {
        for bucket in MAGNITUDE_SCALE {
            let upper = f64::from(bucket.lower_bound) + 1.0;
            assert_eq!(magnitude_color(upper), bucket.color);
            assert_eq!(magnitude_color(upper - 0.5), bucket.color);
        }
    }
}
