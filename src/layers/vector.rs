use crate::{
    core::{
        constants::{MIN_DRAW_RADIUS, MIN_HIT_RADIUS},
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    rendering::context::RenderContext,
    ui::popup::PopupContent,
    MapError, Result,
};

#[cfg(feature = "egui")]
use egui::Color32;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// RGBA color that serializes as a `#RRGGBB` (or `#RRGGBBAA`) hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA`; the leading `#` is optional
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || MapError::Parse(format!("invalid hex color '{}'", hex));
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        if !digits.is_ascii() {
            return Err(invalid());
        }
        match digits.len() {
            3 => {
                let expand = |i: usize| byte(&digits[i..i + 1].repeat(2));
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(byte(&digits[0..2])?, byte(&digits[2..4])?, byte(&digits[4..6])?)),
            8 => Ok(Self::new(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Uppercase `#RRGGBB`, with alpha appended only when not opaque
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    #[cfg(feature = "egui")]
    pub fn to_color32(self, opacity: f32) -> Color32 {
        let alpha = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Color32::from_rgba_unmultiplied(self.r, self.g, self.b, alpha)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Color::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "egui")]
impl From<Color> for Color32 {
    fn from(color: Color) -> Self {
        Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
    }
}

/// Leaflet circle-marker path options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMarkerStyle {
    pub opacity: f64,
    pub fill_opacity: f64,
    pub fill_color: Color,
    /// Stroke color
    pub color: Color,
    pub radius: f64,
    pub stroke: bool,
    pub weight: f64,
}

impl Default for CircleMarkerStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            fill_opacity: 1.0,
            fill_color: Color::rgb(0x33, 0x88, 0xFF),
            color: Color::BLACK,
            radius: 10.0,
            stroke: true,
            weight: 1.0,
        }
    }
}

impl CircleMarkerStyle {
    /// Radius used for drawing; zero and negative radii are floored
    pub fn draw_radius(&self) -> f64 {
        if self.radius.is_nan() {
            MIN_DRAW_RADIUS
        } else {
            self.radius.max(MIN_DRAW_RADIUS)
        }
    }
}

/// Style for line features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    pub weight: f64,
    pub opacity: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0x33, 0x88, 0xFF),
            weight: 3.0,
            opacity: 1.0,
        }
    }
}

/// A fixed-pixel-size circle at a geographic position
#[derive(Debug, Clone)]
pub struct CircleMarker {
    pub position: LatLng,
    pub style: CircleMarkerStyle,
    pub popup: Option<PopupContent>,
}

impl CircleMarker {
    pub fn new(position: LatLng, style: CircleMarkerStyle) -> Self {
        Self {
            position,
            style,
            popup: None,
        }
    }

    pub fn with_popup(mut self, popup: PopupContent) -> Self {
        self.popup = Some(popup);
        self
    }

    pub fn render(&self, context: &mut RenderContext, viewport: &Viewport, opacity: f32) -> Result<()> {
        let center = viewport.lat_lng_to_pixel(&self.position);
        context.render_circle(center, self.style.draw_radius(), &self.style, opacity)
    }

    /// Whether a screen point falls on the drawn circle
    pub fn hit_test(&self, screen: &Point, viewport: &Viewport) -> bool {
        let center = viewport.lat_lng_to_pixel(&self.position);
        center.distance_to(screen) <= self.style.draw_radius().max(MIN_HIT_RADIUS)
    }
}

/// One or more connected line strings sharing a style
#[derive(Debug, Clone)]
pub struct Polyline {
    pub lines: Vec<Vec<LatLng>>,
    pub style: LineStyle,
}

impl Polyline {
    pub fn new(lines: Vec<Vec<LatLng>>, style: LineStyle) -> Self {
        Self { lines, style }
    }

    pub fn render(&self, context: &mut RenderContext, viewport: &Viewport, opacity: f32) -> Result<()> {
        for line in &self.lines {
            let points: Vec<Point> = line.iter().map(|p| viewport.lat_lng_to_pixel(p)).collect();
            context.render_line(&points, &self.style, opacity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::context::DrawCommand;

    #[test]
    fn test_color_hex_parsing() {
        assert_eq!(Color::from_hex("#581845").unwrap(), Color::rgb(0x58, 0x18, 0x45));
        assert_eq!(Color::from_hex("ffa500").unwrap(), Color::rgb(255, 165, 0));
        assert_eq!(Color::from_hex("#000").unwrap(), Color::BLACK);
        assert_eq!(Color::from_hex("#FF000080").unwrap(), Color::new(255, 0, 0, 128));
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GGGGGG").is_err());
        assert_eq!(Color::rgb(0xda, 0xf7, 0xa6).to_hex(), "#DAF7A6");
    }

    #[test]
    fn test_circle_style_serializes_with_leaflet_names() {
        let style = CircleMarkerStyle {
            fill_color: Color::from_hex("#C70039").unwrap(),
            radius: 10.5,
            weight: 0.5,
            ..Default::default()
        };
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json["fillColor"], "#C70039");
        assert_eq!(json["fillOpacity"], 1.0);
        assert_eq!(json["color"], "#000000");
        assert_eq!(json["stroke"], true);
        assert_eq!(json["weight"], 0.5);

        let back: CircleMarkerStyle = serde_json::from_value(json).unwrap();
        assert_eq!(back, style);
    }

    #[test]
    fn test_negative_radius_draws_at_minimum() {
        let style = CircleMarkerStyle {
            radius: -3.0,
            ..Default::default()
        };
        assert_eq!(style.draw_radius(), 1.0);

        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(400.0, 400.0));
        let marker = CircleMarker::new(LatLng::new(0.0, 0.0), style);
        let mut ctx = RenderContext::new(400, 400);
        marker.render(&mut ctx, &viewport, 1.0).unwrap();

        match &ctx.get_drawing_queue()[0] {
            DrawCommand::Circle { radius, style, .. } => {
                assert_eq!(*radius, 1.0);
                assert_eq!(style.radius, -3.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_marker_hit_test() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(400.0, 400.0));
        let marker = CircleMarker::new(
            LatLng::new(0.0, 0.0),
            CircleMarkerStyle {
                radius: 12.0,
                ..Default::default()
            },
        );
        assert!(marker.hit_test(&Point::new(210.0, 200.0), &viewport));
        assert!(!marker.hit_test(&Point::new(220.0, 200.0), &viewport));
    }

    #[test]
    fn test_polyline_renders_each_part() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        let polyline = Polyline::new(
            vec![
                vec![LatLng::new(0.0, 0.0), LatLng::new(10.0, 10.0)],
                vec![LatLng::new(-5.0, 20.0), LatLng::new(-6.0, 25.0), LatLng::new(-7.0, 30.0)],
            ],
            LineStyle::default(),
        );
        let mut ctx = RenderContext::new(512, 512);
        polyline.render(&mut ctx, &viewport, 1.0).unwrap();
        assert_eq!(ctx.lines().count(), 2);
    }
}
