use crate::{
    core::{geo::Point, viewport::Viewport},
    impl_layer_trait,
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        vector::{CircleMarker, Polyline},
    },
    rendering::context::RenderContext,
    Result,
};

/// Anything a feature group can hold
#[derive(Debug, Clone)]
pub enum GroupItem {
    CircleMarker(CircleMarker),
    Polyline(Polyline),
}

impl From<CircleMarker> for GroupItem {
    fn from(marker: CircleMarker) -> Self {
        GroupItem::CircleMarker(marker)
    }
}

impl From<Polyline> for GroupItem {
    fn from(polyline: Polyline) -> Self {
        GroupItem::Polyline(polyline)
    }
}

/// A toggleable collection of vector items rendered as one overlay
pub struct LayerGroup {
    properties: LayerProperties,
    items: Vec<GroupItem>,
}

impl LayerGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Group),
            items: Vec::new(),
        }
    }

    pub fn add(&mut self, item: impl Into<GroupItem>) {
        self.items.push(item.into());
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[GroupItem] {
        &self.items
    }

    pub fn markers(&self) -> impl Iterator<Item = &CircleMarker> {
        self.items.iter().filter_map(|item| match item {
            GroupItem::CircleMarker(marker) => Some(marker),
            _ => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.items.iter().filter_map(|item| match item {
            GroupItem::Polyline(polyline) => Some(polyline),
            _ => None,
        })
    }

    /// Topmost marker under a screen point (the last one drawn wins)
    pub fn marker_at(&self, screen: &Point, viewport: &Viewport) -> Option<&CircleMarker> {
        self.markers()
            .filter(|marker| marker.hit_test(screen, viewport))
            .last()
    }
}

impl LayerTrait for LayerGroup {
    impl_layer_trait!(LayerGroup, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let opacity = self.opacity();
        for item in &self.items {
            match item {
                GroupItem::CircleMarker(marker) => marker.render(context, viewport, opacity)?,
                GroupItem::Polyline(polyline) => polyline.render(context, viewport, opacity)?,
            }
        }
        Ok(())
    }

}
