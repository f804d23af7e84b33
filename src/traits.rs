//! Shared trait abstractions

use crate::{
    core::viewport::Viewport,
    layers::base::LayerType,
    rendering::context::RenderContext,
    Result,
};

/// Trait for layer-like objects held by the map's layer manager
pub trait LayerOperations: Send + Sync {
    /// Get layer ID
    fn id(&self) -> &str;

    /// Get layer name
    fn name(&self) -> &str;

    /// Get layer type
    fn layer_type(&self) -> LayerType;

    /// Check if layer is visible
    fn is_visible(&self) -> bool;

    /// Set layer visibility
    fn set_visible(&mut self, visible: bool);

    /// Get layer opacity (0.0 to 1.0)
    fn opacity(&self) -> f32;

    /// Set layer opacity
    fn set_opacity(&mut self, opacity: f32);

    /// Get layer z-index for ordering
    fn z_index(&self) -> i32;

    /// Set layer z-index
    fn set_z_index(&mut self, z_index: i32);

    /// Queue draw commands for the current viewport
    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()>;

    /// Per-frame housekeeping (e.g. collecting finished downloads).
    /// Returns true when the layer changed and needs a repaint.
    fn update(&mut self, _viewport: &Viewport) -> Result<bool> {
        Ok(false)
    }

    /// Dynamic casting support
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
