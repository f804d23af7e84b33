//! # quakemap
//!
//! Earthquake and tectonic plate map built on a small Leaflet-style map engine.
//!
//! The crate keeps a headless map model (viewport, layers, draw commands)
//! separate from painting, so the whole fetch → style → render pipeline can
//! run and be inspected without a window. The `egui` feature adds the
//! interactive viewer widget.

pub mod core;
pub mod data;
pub mod layers;
pub mod pipeline;
pub mod prelude;
pub mod rendering;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod styling;
pub mod tiles;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::AppConfig,
    geo::{LatLng, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use layers::{
    base::LayerTrait,
    group::LayerGroup,
    tile::TileLayer,
    vector::{CircleMarker, CircleMarkerStyle, Color, Polyline},
};

pub use data::{
    feed::{FeedSource, HttpFeedSource},
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    quake::{Earthquake, PlateBoundary},
};

pub use pipeline::{AppContext, LayerOutcome, PipelineReport, RenderPipeline};

pub use rendering::context::{DrawCommand, RenderContext};

pub use styling::{
    feature::style_feature,
    magnitude::{magnitude_color, marker_radius, MagnitudeColor, MAGNITUDE_SCALE},
};

pub use ui::{controls::LayerControl, legend::Legend, popup::PopupContent};

#[cfg(feature = "egui")]
pub use ui::widget::MapView;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid feature: {0}")]
    InvalidFeature(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Render error: {0}")]
    Render(String),
}

/// Error type alias for convenience
pub type Error = MapError;
