//! Small painted controls shared by the map widget

use egui::{Align2, Color32, FontId, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};

/// Anchor of a control inside the map rect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Custom { x: f32, y: f32 },
}

impl Position {
    pub fn calculate_rect(&self, container: Rect, size: Vec2, margin: f32) -> Rect {
        let pos = match self {
            Position::TopLeft => container.min + Vec2::new(margin, margin),
            Position::TopRight => Pos2::new(container.max.x - margin - size.x, container.min.y + margin),
            Position::BottomLeft => Pos2::new(container.min.x + margin, container.max.y - margin - size.y),
            Position::BottomRight => container.max - Vec2::new(margin + size.x, margin + size.y),
            Position::Custom { x, y } => container.min + Vec2::new(*x, *y),
        };
        Rect::from_min_size(pos, size)
    }
}

#[derive(Debug, Clone)]
pub struct ButtonStyle {
    pub background_color: Color32,
    pub hover_color: Color32,
    pub text_color: Color32,
    pub border_stroke: Stroke,
    pub rounding: f32,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgba_unmultiplied(255, 255, 255, 230),
            hover_color: Color32::from_rgb(244, 244, 244),
            text_color: Color32::BLACK,
            border_stroke: Stroke::new(1.0, Color32::from_gray(180)),
            rounding: 4.0,
        }
    }
}

/// Paints a square text button and returns its response
pub fn button(ui: &mut Ui, rect: Rect, text: &str, style: &ButtonStyle) -> Response {
    let response = ui.allocate_rect(rect, Sense::click());
    let fill = if response.hovered() {
        style.hover_color
    } else {
        style.background_color
    };
    ui.painter().rect_filled(rect, style.rounding, fill);
    ui.painter().rect_stroke(rect, style.rounding, style.border_stroke);
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(16.0),
        style.text_color,
    );
    response
}

/// `+`/`-` buttons in the top-left corner
#[derive(Debug, Clone)]
pub struct ZoomControl {
    pub position: Position,
    pub button_size: f32,
    pub style: ButtonStyle,
}

impl Default for ZoomControl {
    fn default() -> Self {
        Self {
            position: Position::TopLeft,
            button_size: 30.0,
            style: ButtonStyle::default(),
        }
    }
}

impl ZoomControl {
    /// Returns the zoom change requested this frame, if any
    pub fn render(&self, ui: &mut Ui, container: Rect) -> Option<f64> {
        let size = Vec2::splat(self.button_size);
        let zoom_in = self.position.calculate_rect(container, size, 10.0);
        let zoom_out = zoom_in.translate(Vec2::new(0.0, self.button_size + 4.0));

        let mut delta = None;
        if button(ui, zoom_in, "+", &self.style).clicked() {
            delta = Some(1.0);
        }
        if button(ui, zoom_out, "\u{2212}", &self.style).clicked() {
            delta = Some(-1.0);
        }
        delta
    }
}

/// Tile provider credit in the bottom-left corner
#[derive(Debug, Clone)]
pub struct Attribution {
    pub text: String,
    pub font_id: FontId,
    pub text_color: Color32,
    pub margin: f32,
}

impl Attribution {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_id: FontId::proportional(10.0),
            text_color: Color32::from_gray(40),
            margin: 4.0,
        }
    }

    pub fn render(&self, ui: &mut Ui, container: Rect) {
        if self.text.is_empty() {
            return;
        }
        let text = self.text.replace("&copy;", "\u{a9}");
        let pos = Pos2::new(container.min.x + self.margin, container.max.y - self.margin);
        ui.painter().text(
            pos,
            Align2::LEFT_BOTTOM,
            text,
            self.font_id.clone(),
            self.text_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_rect_corners() {
        let container = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(800.0, 600.0));
        let size = Vec2::new(100.0, 50.0);

        let top_left = Position::TopLeft.calculate_rect(container, size, 10.0);
        assert_eq!(top_left.min, Pos2::new(10.0, 10.0));

        let top_right = Position::TopRight.calculate_rect(container, size, 10.0);
        assert_eq!(top_right.min, Pos2::new(690.0, 10.0));

        let bottom_right = Position::BottomRight.calculate_rect(container, size, 10.0);
        assert_eq!(bottom_right.max, Pos2::new(790.0, 590.0));

        let bottom_left = Position::BottomLeft.calculate_rect(container, size, 10.0);
        assert_eq!(bottom_left.min, Pos2::new(10.0, 540.0));
    }
}
