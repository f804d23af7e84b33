//! Interactive egui view over a shared [`Map`]

use crate::{
    core::{geo::Point, map::Map},
    rendering::context::{DrawCommand, RenderContext},
    ui::{
        controls::LayerControl,
        elements::{Attribution, ZoomControl},
        popup::PopupStyle,
    },
};
use egui::{Color32, ColorImage, Pos2, Rect, Response, Sense, Shape, Stroke, TextureHandle, Ui, Vec2};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TEXTURE_CACHE_SIZE: usize = 512;
const SCROLL_ZOOM_SPEED: f64 = 0.01;
const TILE_POLL_INTERVAL: Duration = Duration::from_millis(100);

type TextureKey = usize;

/// Paints the map and routes pan, zoom, click and control input to it.
///
/// The map lock is only ever tried; when the pipeline holds it the frame
/// shows a placeholder and asks for a repaint.
pub struct MapView {
    map: Arc<Mutex<Map>>,
    layer_control: LayerControl,
    zoom_control: ZoomControl,
    popup_style: PopupStyle,
    /// Decoded tiles keyed by the address of their cached bytes. The bytes
    /// are held alongside so the address cannot be reused while cached.
    textures: LruCache<TextureKey, (Arc<Vec<u8>>, Option<TextureHandle>)>,
}

impl MapView {
    pub fn new(map: Arc<Mutex<Map>>) -> Self {
        let capacity = NonZeroUsize::new(TEXTURE_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            map,
            layer_control: LayerControl::new(),
            zoom_control: ZoomControl::default(),
            popup_style: PopupStyle::default(),
            textures: LruCache::new(capacity),
        }
    }

    pub fn map(&self) -> &Arc<Mutex<Map>> {
        &self.map
    }

    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        let map_arc = Arc::clone(&self.map);
        let Ok(mut map) = map_arc.try_lock() else {
            paint_placeholder(ui, rect);
            ui.ctx().request_repaint();
            return response;
        };

        map.set_size(Point::new(rect.width() as f64, rect.height() as f64));
        self.handle_input(ui, rect, &response, &mut map);

        match map.update() {
            Ok(true) => ui.ctx().request_repaint(),
            Ok(false) => {}
            Err(e) => log::warn!("layer update failed: {}", e),
        }
        if tiles_loading(&map) {
            ui.ctx().request_repaint_after(TILE_POLL_INTERVAL);
        }

        let mut context = RenderContext::new(rect.width().max(1.0) as u32, rect.height().max(1.0) as u32);
        if let Err(e) = map.render(&mut context) {
            log::warn!("map render failed: {}", e);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(170, 211, 223));
        for command in context.get_drawing_queue() {
            self.paint_command(ui, &painter, rect, command);
        }

        self.paint_popup(ui, rect, &mut map);

        if let Some(legend) = map.legend() {
            legend.render(ui, rect);
        }
        if let Err(e) = self.layer_control.render(ui, rect, &mut map) {
            log::warn!("layer control: {}", e);
        }
        if let Some(delta) = self.zoom_control.render(ui, rect) {
            let zoom = map.viewport.zoom + delta;
            map.zoom_to(zoom, None);
            ui.ctx().request_repaint();
        }
        if let Some(text) = map.attribution() {
            Attribution::new(text).render(ui, rect);
        }

        response
    }

    fn handle_input(&self, ui: &Ui, rect: Rect, response: &Response, map: &mut Map) {
        if response.dragged() {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                map.pan(Point::new(delta.x as f64, delta.y as f64));
            }
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let focus = ui
                    .input(|i| i.pointer.hover_pos())
                    .map(|pos| to_map_point(rect, pos));
                let zoom = map.viewport.zoom + scroll as f64 * SCROLL_ZOOM_SPEED;
                map.zoom_to(zoom, focus);
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                map.handle_click(&to_map_point(rect, pos));
            }
        }
    }

    fn paint_command(&mut self, ui: &Ui, painter: &egui::Painter, rect: Rect, command: &DrawCommand) {
        match command {
            DrawCommand::Tile {
                data,
                bounds,
                opacity,
                ..
            } => {
                if let Some(texture) = self.texture_for(ui, data) {
                    let tile_rect = Rect::from_two_pos(
                        to_screen(rect, &bounds.0),
                        to_screen(rect, &bounds.1),
                    );
                    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                    painter.image(texture.id(), tile_rect, uv, Color32::WHITE.gamma_multiply(*opacity));
                }
            }
            DrawCommand::Circle {
                center,
                radius,
                style,
                opacity,
            } => {
                let fill = style
                    .fill_color
                    .to_color32(style.fill_opacity as f32 * opacity);
                let stroke = if style.stroke {
                    Stroke::new(
                        style.weight as f32,
                        style.color.to_color32(style.opacity as f32 * opacity),
                    )
                } else {
                    Stroke::NONE
                };
                painter.circle(to_screen(rect, center), *radius as f32, fill, stroke);
            }
            DrawCommand::Line {
                points,
                style,
                opacity,
            } => {
                let points: Vec<Pos2> = points.iter().map(|p| to_screen(rect, p)).collect();
                let color = style.color.to_color32(style.opacity as f32 * opacity);
                painter.add(Shape::line(points, Stroke::new(style.weight as f32, color)));
            }
        }
    }

    fn texture_for(&mut self, ui: &Ui, data: &Arc<Vec<u8>>) -> Option<TextureHandle> {
        let key = Arc::as_ptr(data) as TextureKey;
        if let Some((_, texture)) = self.textures.get(&key) {
            return texture.clone();
        }

        let texture = decode_tile(data).map(|image| {
            ui.ctx()
                .load_texture(format!("tile-{:x}", key), image, egui::TextureOptions::LINEAR)
        });
        if texture.is_none() {
            log::debug!("could not decode tile image ({} bytes)", data.len());
        }
        self.textures.put(key, (Arc::clone(data), texture.clone()));
        texture
    }

    fn paint_popup(&self, ui: &mut Ui, rect: Rect, map: &mut Map) {
        let Some(popup) = map.popups().current().cloned() else {
            return;
        };
        let anchor = to_screen(rect, &map.viewport.lat_lng_to_pixel(&popup.position));
        if !rect.contains(anchor) {
            return;
        }
        if popup.render_at_screen_pos(ui, anchor, &self.popup_style).clicked() {
            map.popups_mut().close();
        }
    }
}

fn tiles_loading(map: &Map) -> bool {
    map.base_layers().iter().any(|base| {
        map.base_tile_layer(&base.label)
            .map(|layer| layer.is_loading())
            .unwrap_or(false)
    })
}

fn decode_tile(bytes: &[u8]) -> Option<ColorImage> {
    let image = image::load_from_memory(bytes).ok()?.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

fn to_screen(rect: Rect, point: &Point) -> Pos2 {
    Pos2::new(rect.min.x + point.x as f32, rect.min.y + point.y as f32)
}

fn to_map_point(rect: Rect, pos: Pos2) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

fn paint_placeholder(ui: &Ui, rect: Rect) {
    ui.painter().rect_filled(rect, 0.0, Color32::from_rgb(230, 230, 230));
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        "Loading map...",
        egui::FontId::proportional(16.0),
        Color32::from_gray(100),
    );
}
