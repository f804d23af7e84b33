use crate::{core::geo::LatLng, data::quake::Earthquake};

#[cfg(feature = "egui")]
use egui::{Color32, FontId, Pos2, Rect, Response, Stroke, Ui, Vec2};

/// Text shown when an earthquake marker is clicked
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub place: String,
    /// Already formatted in the local time zone
    pub time: String,
    pub magnitude: f64,
}

impl PopupContent {
    pub fn new(place: impl Into<String>, time: impl Into<String>, magnitude: f64) -> Self {
        Self {
            place: place.into(),
            time: time.into(),
            magnitude,
        }
    }

    pub fn for_earthquake(quake: &Earthquake) -> Self {
        Self::new(quake.place.clone(), quake.formatted_time(), quake.mag)
    }

    /// Leaflet-style HTML fragment with every value escaped
    pub fn to_html(&self) -> String {
        format!(
            "<h3>Location: {}</h3><hr><p>Date &amp; Time: {}</p><hr><p>Magnitude: {}</p>",
            escape_html(&self.place),
            escape_html(&self.time),
            self.magnitude
        )
    }

    /// Plain-text rows; `None` marks a horizontal rule
    pub fn lines(&self) -> Vec<Option<String>> {
        vec![
            Some(format!("Location: {}", self.place)),
            None,
            Some(format!("Date & Time: {}", self.time)),
            None,
            Some(format!("Magnitude: {}", self.magnitude)),
        ]
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(feature = "egui")]
#[derive(Debug, Clone)]
pub struct PopupStyle {
    pub background_color: Color32,
    pub border_color: Color32,
    pub border_width: f32,
    pub rounding: f32,
    pub padding: f32,
    pub heading_font: FontId,
    pub font_id: FontId,
    pub text_color: Color32,
    pub max_width: f32,
}

#[cfg(feature = "egui")]
impl Default for PopupStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::WHITE,
            border_color: Color32::GRAY,
            border_width: 1.0,
            rounding: 4.0,
            padding: 8.0,
            heading_font: FontId::proportional(14.0),
            font_id: FontId::proportional(12.0),
            text_color: Color32::BLACK,
            max_width: 320.0,
        }
    }
}

/// A popup anchored to a map position
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub position: LatLng,
    pub content: PopupContent,
}

impl Popup {
    pub fn new(position: LatLng, content: PopupContent) -> Self {
        Self { position, content }
    }

    /// Paints the popup with its tip at `anchor`; clicking it reports `clicked()`
    #[cfg(feature = "egui")]
    pub fn render_at_screen_pos(&self, ui: &mut Ui, anchor: Pos2, style: &PopupStyle) -> Response {
        let rows: Vec<Option<(String, FontId, Vec2)>> = self
            .content
            .lines()
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                line.map(|text| {
                    let font = if index == 0 {
                        style.heading_font.clone()
                    } else {
                        style.font_id.clone()
                    };
                    let size = ui
                        .fonts(|f| f.layout_no_wrap(text.clone(), font.clone(), style.text_color))
                        .size();
                    (text, font, size)
                })
            })
            .collect();

        let rule_height = style.padding;
        let width = rows
            .iter()
            .flatten()
            .map(|(_, _, size)| size.x)
            .fold(0.0_f32, f32::max)
            .min(style.max_width);
        let height: f32 = rows
            .iter()
            .map(|row| row.as_ref().map_or(rule_height, |(_, _, size)| size.y))
            .sum();

        let size = Vec2::new(width, height) + Vec2::splat(style.padding * 2.0);
        let min = Pos2::new(anchor.x - size.x / 2.0, anchor.y - size.y - 10.0);
        let rect = Rect::from_min_size(min, size);

        let painter = ui.painter();
        painter.rect_filled(rect, style.rounding, style.background_color);
        painter.rect_stroke(rect, style.rounding, (style.border_width, style.border_color));

        let mut cursor = rect.min + Vec2::splat(style.padding);
        for row in rows {
            match row {
                Some((text, font, row_size)) => {
                    painter.text(cursor, egui::Align2::LEFT_TOP, text, font, style.text_color);
                    cursor.y += row_size.y;
                }
                None => {
                    let y = cursor.y + rule_height / 2.0;
                    painter.hline(
                        rect.min.x + style.padding..=rect.max.x - style.padding,
                        y,
                        Stroke::new(1.0, style.border_color),
                    );
                    cursor.y += rule_height;
                }
            }
        }

        ui.allocate_rect(rect, egui::Sense::click())
    }
}

/// Holds at most one open popup
#[derive(Debug, Default)]
pub struct PopupManager {
    current: Option<Popup>,
}

impl PopupManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `popup`, replacing whichever one was open
    pub fn open(&mut self, popup: Popup) {
        self.current = Some(popup);
    }

    pub fn close(&mut self) -> Option<Popup> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Popup> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }
}
