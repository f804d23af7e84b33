//! Base layer / overlay switcher

use crate::{core::map::Map, MapError, Result};

#[cfg(feature = "egui")]
use crate::ui::elements::Position;
#[cfg(feature = "egui")]
use egui::{Rect, Ui, Vec2};

/// Snapshot of one row in the control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerEntry {
    pub label: String,
    pub active: bool,
}

/// Radio buttons for base layers, checkboxes for overlays
#[derive(Debug, Clone)]
pub struct LayerControl {
    pub collapsed: bool,
    #[cfg(feature = "egui")]
    pub position: Position,
}

impl Default for LayerControl {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerControl {
    pub fn new() -> Self {
        Self {
            collapsed: false,
            #[cfg(feature = "egui")]
            position: Position::TopRight,
        }
    }

    pub fn base_entries(map: &Map) -> Vec<LayerEntry> {
        let active = map.active_base_layer();
        map.base_layers()
            .iter()
            .map(|layer| LayerEntry {
                label: layer.label.clone(),
                active: active == Some(layer.label.as_str()),
            })
            .collect()
    }

    pub fn overlay_entries(map: &Map) -> Vec<LayerEntry> {
        map.overlays()
            .iter()
            .map(|layer| LayerEntry {
                label: layer.label.clone(),
                active: map.is_overlay_visible(&layer.label).unwrap_or(false),
            })
            .collect()
    }

    /// Radio-button selection
    pub fn select_base_layer(&self, map: &mut Map, label: &str) -> Result<()> {
        map.set_base_layer(label)
    }

    /// Checkbox toggle; returns the new visibility
    pub fn toggle_overlay(&self, map: &mut Map, label: &str) -> Result<bool> {
        let visible = map
            .is_overlay_visible(label)
            .ok_or_else(|| MapError::Layer(format!("unknown overlay '{}'", label)))?;
        map.set_overlay_visible(label, !visible)?;
        Ok(!visible)
    }

    /// Paints the control and applies any selection made this frame
    #[cfg(feature = "egui")]
    pub fn render(&mut self, ui: &mut Ui, container: Rect, map: &mut Map) -> Result<()> {
        let bases = Self::base_entries(map);
        let overlays = Self::overlay_entries(map);
        let rows = bases.len() + overlays.len() + 1;
        let size = Vec2::new(150.0, 22.0 * rows as f32 + 16.0);
        let rect = self.position.calculate_rect(container, size, 10.0);

        let mut selected_base = None;
        let mut toggled_overlay = None;

        let mut child = ui.child_ui(rect, egui::Layout::top_down(egui::Align::Min));
        egui::Frame::popup(child.style()).show(&mut child, |ui| {
            if ui
                .selectable_label(!self.collapsed, "Layers")
                .clicked()
            {
                self.collapsed = !self.collapsed;
            }
            if self.collapsed {
                return;
            }
            for entry in &bases {
                if ui.radio(entry.active, entry.label.as_str()).clicked() && !entry.active {
                    selected_base = Some(entry.label.clone());
                }
            }
            ui.separator();
            for entry in &overlays {
                let mut checked = entry.active;
                if ui.checkbox(&mut checked, entry.label.as_str()).changed() {
                    toggled_overlay = Some(entry.label.clone());
                }
            }
        });

        if let Some(label) = selected_base {
            self.select_base_layer(map, &label)?;
        }
        if let Some(label) = toggled_overlay {
            self.toggle_overlay(map, &label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{config::AppConfig, geo::Point};

    fn map() -> Map {
        Map::from_config(&AppConfig::default(), Point::new(640.0, 480.0)).unwrap()
    }

    #[test]
    fn test_lists_every_layer() {
        let map = map();
        let bases = LayerControl::base_entries(&map);
        assert_eq!(bases.len(), 3);
        assert_eq!(bases.iter().filter(|e| e.active).count(), 1);
        assert!(bases[0].active);

        let overlays = LayerControl::overlay_entries(&map);
        assert_eq!(
            overlays,
            vec![
                LayerEntry { label: "Earthquakes".into(), active: true },
                LayerEntry { label: "Tectonic plates".into(), active: false },
            ]
        );
    }

    #[test]
    fn test_exactly_one_base_layer_active() {
        let mut map = map();
        let control = LayerControl::new();
        control.select_base_layer(&mut map, "Light").unwrap();

        let active: Vec<_> = LayerControl::base_entries(&map)
            .into_iter()
            .filter(|e| e.active)
            .map(|e| e.label)
            .collect();
        assert_eq!(active, ["Light"]);
    }

    #[test]
    fn test_toggle_overlay() {
        let mut map = map();
        let control = LayerControl::new();
        assert!(!control.toggle_overlay(&mut map, "Earthquakes").unwrap());
        assert!(control.toggle_overlay(&mut map, "Earthquakes").unwrap());
    }

    #[test]
    fn test_unknown_names_are_layer_errors() {
        let mut map = map();
        let control = LayerControl::new();
        assert!(matches!(
            control.select_base_layer(&mut map, "Terrain"),
            Err(MapError::Layer(_))
        ));
        assert!(matches!(
            control.toggle_overlay(&mut map, "Faults"),
            Err(MapError::Layer(_))
        ));
    }
}
