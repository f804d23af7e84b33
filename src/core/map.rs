use crate::{
    core::{
        config::AppConfig,
        constants::{EARTHQUAKES_LAYER_ID, EARTHQUAKES_OVERLAY, PLATES_LAYER_ID, PLATES_OVERLAY},
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    layers::{
        base::LayerTrait,
        group::LayerGroup,
        manager::LayerManager,
        tile::{TileLayer, TileLayerOptions},
        vector::CircleMarker,
    },
    rendering::context::RenderContext,
    ui::{
        legend::Legend,
        popup::{Popup, PopupManager},
    },
    MapError, Result,
};

const BASE_Z_INDEX: i32 = 0;
const OVERLAY_Z_INDEX: i32 = 100;

/// A layer as listed in the layer control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedLayer {
    pub label: String,
    pub layer_id: String,
}

/// Map model: viewport, layers and the controls that sit on top of them.
///
/// Base layers are mutually exclusive; overlays toggle independently.
pub struct Map {
    pub viewport: Viewport,
    layer_manager: LayerManager,
    base_layers: Vec<NamedLayer>,
    overlays: Vec<NamedLayer>,
    active_base_layer: Option<String>,
    legend: Option<Legend>,
    popups: PopupManager,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            viewport: Viewport::new(center, zoom, size),
            layer_manager: LayerManager::new(),
            base_layers: Vec::new(),
            overlays: Vec::new(),
            active_base_layer: None,
            legend: None,
            popups: PopupManager::new(),
        }
    }

    /// Builds the initial map: configured base layers with the default one
    /// active, both overlay groups, and the legend.
    pub fn from_config(config: &AppConfig, size: Point) -> Result<Self> {
        let mut map = Self::new(config.center, config.zoom, size);

        for (index, base) in config.base_layers.iter().enumerate() {
            let options =
                TileLayerOptions::from_config(base, &config.access_token, config.tile_cache_size);
            let layer = TileLayer::new(format!("base-{}", index), base.label.clone(), options);
            map.add_base_layer(&base.label, layer)?;
        }
        map.set_base_layer(&config.default_base_layer)?;

        map.add_overlay(
            EARTHQUAKES_OVERLAY,
            Box::new(LayerGroup::new(EARTHQUAKES_LAYER_ID, EARTHQUAKES_OVERLAY)),
        )?;
        map.add_overlay(
            PLATES_OVERLAY,
            Box::new(LayerGroup::new(PLATES_LAYER_ID, PLATES_OVERLAY)),
        )?;
        // Shown once the boundaries have loaded
        map.set_overlay_visible(PLATES_OVERLAY, false)?;

        map.attach_legend(Legend::new());
        Ok(map)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport.set_center(center);
        self.viewport.set_zoom(zoom);
    }

    /// Drags the map by a screen delta
    pub fn pan(&mut self, delta: Point) {
        self.viewport.pan(delta);
    }

    /// Zooms, keeping `focus_point` (screen coordinates) fixed when given
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        self.viewport.zoom_to(zoom, focus_point);
    }

    pub fn set_size(&mut self, size: Point) {
        self.viewport.set_size(size);
    }

    /// Registers a base layer. The first one becomes active; later ones
    /// start hidden.
    pub fn add_base_layer(&mut self, label: &str, mut layer: TileLayer) -> Result<()> {
        if self.base_layers.iter().any(|l| l.label == label) {
            return Err(MapError::Layer(format!("duplicate base layer '{}'", label)));
        }
        let layer_id = layer.id().to_string();
        let first = self.active_base_layer.is_none();
        layer.set_visible(first);
        layer.set_z_index(BASE_Z_INDEX);
        self.layer_manager.add_layer(Box::new(layer))?;

        if first {
            self.active_base_layer = Some(label.to_string());
        }
        self.base_layers.push(NamedLayer {
            label: label.to_string(),
            layer_id,
        });
        Ok(())
    }

    /// Registers an overlay; overlays keep their own visibility
    pub fn add_overlay(&mut self, label: &str, mut layer: Box<dyn LayerTrait>) -> Result<()> {
        if self.overlays.iter().any(|l| l.label == label) {
            return Err(MapError::Layer(format!("duplicate overlay '{}'", label)));
        }
        let layer_id = layer.id().to_string();
        layer.set_z_index(OVERLAY_Z_INDEX + self.overlays.len() as i32);
        self.layer_manager.add_layer(layer)?;
        self.overlays.push(NamedLayer {
            label: label.to_string(),
            layer_id,
        });
        Ok(())
    }

    pub fn base_layers(&self) -> &[NamedLayer] {
        &self.base_layers
    }

    pub fn overlays(&self) -> &[NamedLayer] {
        &self.overlays
    }

    pub fn active_base_layer(&self) -> Option<&str> {
        self.active_base_layer.as_deref()
    }

    /// Shows `label` and hides every other base layer
    pub fn set_base_layer(&mut self, label: &str) -> Result<()> {
        if !self.base_layers.iter().any(|l| l.label == label) {
            return Err(MapError::Layer(format!("unknown base layer '{}'", label)));
        }
        for base in &self.base_layers {
            let visible = base.label == label;
            self.layer_manager
                .with_layer_mut(&base.layer_id, |layer| layer.set_visible(visible));
        }
        log::debug!("base layer set to {}", label);
        self.active_base_layer = Some(label.to_string());
        Ok(())
    }

    pub fn set_overlay_visible(&mut self, label: &str, visible: bool) -> Result<()> {
        let layer_id = self.overlay_id(label)?.to_string();
        self.layer_manager
            .with_layer_mut(&layer_id, |layer| layer.set_visible(visible));
        Ok(())
    }

    pub fn is_overlay_visible(&self, label: &str) -> Option<bool> {
        let layer_id = self.overlay_id(label).ok()?;
        self.layer_manager.get_layer(layer_id).map(|l| l.is_visible())
    }

    fn overlay_id(&self, label: &str) -> Result<&str> {
        self.overlays
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.layer_id.as_str())
            .ok_or_else(|| MapError::Layer(format!("unknown overlay '{}'", label)))
    }

    pub fn overlay_group(&self, label: &str) -> Option<&LayerGroup> {
        let layer_id = self.overlay_id(label).ok()?;
        self.layer_manager.get_layer_as::<LayerGroup>(layer_id)
    }

    pub fn overlay_group_mut(&mut self, label: &str) -> Option<&mut LayerGroup> {
        let layer_id = self.overlay_id(label).ok()?.to_string();
        self.layer_manager.get_layer_mut_as::<LayerGroup>(&layer_id)
    }

    pub fn base_tile_layer(&self, label: &str) -> Option<&TileLayer> {
        let base = self.base_layers.iter().find(|l| l.label == label)?;
        self.layer_manager.get_layer_as::<TileLayer>(&base.layer_id)
    }

    /// Attribution text of the active base layer
    pub fn attribution(&self) -> Option<&str> {
        let layer = self.base_tile_layer(self.active_base_layer.as_deref()?)?;
        Some(layer.tile_options().attribution.as_str())
    }

    pub fn attach_legend(&mut self, legend: Legend) {
        self.legend = Some(legend);
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn layer_manager(&self) -> &LayerManager {
        &self.layer_manager
    }

    pub fn layer_manager_mut(&mut self) -> &mut LayerManager {
        &mut self.layer_manager
    }

    pub fn popups(&self) -> &PopupManager {
        &self.popups
    }

    pub fn popups_mut(&mut self) -> &mut PopupManager {
        &mut self.popups
    }

    /// Topmost marker on a visible overlay under a screen point
    pub fn marker_at(&self, screen: &Point) -> Option<&CircleMarker> {
        self.overlays.iter().rev().find_map(|overlay| {
            let group = self
                .layer_manager
                .get_layer_as::<LayerGroup>(&overlay.layer_id)?;
            if !group.is_visible() {
                return None;
            }
            group.marker_at(screen, &self.viewport)
        })
    }

    /// Opens the popup of the clicked marker, or closes the open popup when
    /// the click hits nothing with a popup.
    pub fn handle_click(&mut self, screen: &Point) -> Option<&Popup> {
        let popup = self.marker_at(screen).and_then(|marker| {
            let content = marker.popup.clone()?;
            Some(Popup::new(marker.position, content))
        });
        match popup {
            Some(popup) => self.popups.open(popup),
            None => {
                self.popups.close();
            }
        }
        self.popups.current()
    }

    /// Per-frame layer work (tile requests). True if anything changed.
    pub fn update(&mut self) -> Result<bool> {
        self.layer_manager.update(&self.viewport)
    }

    /// Queues draw commands for every visible layer
    pub fn render(&mut self, context: &mut RenderContext) -> Result<()> {
        context.begin_frame();
        self.layer_manager.render(context, &self.viewport)
    }
}
