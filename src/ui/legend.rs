//! Static magnitude key

use crate::{
    layers::vector::Color,
    styling::magnitude::{MagnitudeBucket, MAGNITUDE_SCALE},
    ui::popup::escape_html,
};

#[cfg(feature = "egui")]
use crate::ui::elements::Position;
#[cfg(feature = "egui")]
use egui::{Align2, Color32, FontId, Rect, Ui, Vec2};

pub const LEGEND_HEADING: &str = "Magnitude";

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

impl From<&MagnitudeBucket> for LegendEntry {
    fn from(bucket: &MagnitudeBucket) -> Self {
        Self {
            label: bucket.label(),
            color: bucket.color.color(),
        }
    }
}

/// Heading plus one swatch row per magnitude bucket, ascending
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub heading: String,
    pub entries: Vec<LegendEntry>,
}

impl Default for Legend {
    fn default() -> Self {
        Self::new()
    }
}

impl Legend {
    /// Builds the key from the same table the marker styler uses
    pub fn new() -> Self {
        Self {
            heading: LEGEND_HEADING.to_string(),
            entries: MAGNITUDE_SCALE.iter().map(LegendEntry::from).collect(),
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = format!("<h4>{}</h4>", escape_html(&self.heading));
        for entry in &self.entries {
            html.push_str(&format!(
                "<i style=\"background: {}\"></i> {}<br>",
                entry.color.to_hex(),
                escape_html(&entry.label)
            ));
        }
        html
    }

    /// Paints the key in the bottom-right corner of `container`
    #[cfg(feature = "egui")]
    pub fn render(&self, ui: &mut Ui, container: Rect) -> Rect {
        const ROW_HEIGHT: f32 = 18.0;
        const SWATCH: f32 = 14.0;
        const PADDING: f32 = 8.0;

        let size = Vec2::new(
            90.0,
            PADDING * 2.0 + ROW_HEIGHT * (self.entries.len() as f32 + 1.0),
        );
        let rect = Position::BottomRight.calculate_rect(container, size, 10.0);
        let painter = ui.painter();
        painter.rect_filled(rect, 4.0, Color32::from_white_alpha(230));

        let mut y = rect.min.y + PADDING;
        painter.text(
            egui::pos2(rect.min.x + PADDING, y),
            Align2::LEFT_TOP,
            &self.heading,
            FontId::proportional(13.0),
            Color32::BLACK,
        );
        for entry in &self.entries {
            y += ROW_HEIGHT;
            let swatch = Rect::from_min_size(egui::pos2(rect.min.x + PADDING, y), Vec2::splat(SWATCH));
            painter.rect_filled(swatch, 0.0, Color32::from(entry.color));
            painter.text(
                egui::pos2(swatch.max.x + 6.0, y),
                Align2::LEFT_TOP,
                &entry.label,
                FontId::proportional(12.0),
                Color32::BLACK,
            );
        }
        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styling::magnitude::magnitude_color;

    #[test]
    fn test_legend_rows() {
        let legend = Legend::new();
        assert_eq!(legend.heading, "Magnitude");
        let labels: Vec<_> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["0–1", "1–2", "2–3", "3–4", "4–5", "5+"]);
    }

    #[test]
    fn test_swatches_match_classifier() {
        let legend = Legend::new();
        for (level, entry) in legend.entries.iter().enumerate() {
            let level = level as f64;
            assert_eq!(entry.color, magnitude_color(level + 1.0).color());
            assert_eq!(entry.color, magnitude_color(level + 0.5).color());
        }
    }

    #[test]
    fn test_html() {
        let html = Legend::new().to_html();
        assert!(html.starts_with("<h4>Magnitude</h4>"));
        assert!(html.contains("<i style=\"background: #DAF7A6\"></i> 0–1<br>"));
        assert!(html.ends_with("<i style=\"background: #581845\"></i> 5+<br>"));
    }
}
