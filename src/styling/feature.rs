use crate::{
    core::constants::{PLATE_LINE_COLOR, PLATE_LINE_WEIGHT},
    data::quake::Earthquake,
    layers::vector::{CircleMarkerStyle, Color, LineStyle},
    styling::magnitude::{magnitude_color, marker_radius},
};

/// Circle marker style for an earthquake magnitude
pub fn style_for_magnitude(mag: f64) -> CircleMarkerStyle {
    CircleMarkerStyle {
        opacity: 1.0,
        fill_opacity: 1.0,
        fill_color: magnitude_color(mag).color(),
        color: Color::BLACK,
        radius: marker_radius(mag),
        stroke: true,
        weight: 0.5,
    }
}

/// Circle marker style for an earthquake feature
pub fn style_feature(quake: &Earthquake) -> CircleMarkerStyle {
    style_for_magnitude(quake.mag)
}

/// Orange boundary line
pub fn plate_line_style() -> LineStyle {
    LineStyle {
        color: Color::from_hex(PLATE_LINE_COLOR).unwrap_or(Color::rgb(0xFF, 0xA5, 0x00)),
        weight: PLATE_LINE_WEIGHT,
        opacity: 1.0,
    }
}
