//! Prelude module for common quakemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use quakemap::prelude::*;`

pub use crate::core::{
    config::{AppConfig, BaseLayerConfig, FetchConfig, FetchStrategy},
    geo::{LatLng, Point, TileCoord},
    map::{Map, NamedLayer},
    viewport::Viewport,
};

pub use crate::layers::{
    base::{LayerProperties, LayerTrait, LayerType},
    group::{GroupItem, LayerGroup},
    manager::LayerManager,
    tile::{TileLayer, TileLayerOptions},
    vector::{CircleMarker, CircleMarkerStyle, Color, LineStyle, Polyline},
};

pub use crate::data::{
    feed::{FeedSource, HttpFeedSource},
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    quake::{Earthquake, PlateBoundary},
};

pub use crate::styling::{
    feature::{plate_line_style, style_feature},
    magnitude::{magnitude_color, marker_radius, MagnitudeBucket, MagnitudeColor, MAGNITUDE_SCALE},
};

pub use crate::pipeline::{AppContext, LayerOutcome, PipelineReport, RenderPipeline};

pub use crate::rendering::context::{DrawCommand, RenderContext};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::spawn;

pub use crate::ui::{
    controls::LayerControl,
    legend::{Legend, LegendEntry},
    popup::{Popup, PopupContent, PopupManager},
};

#[cfg(feature = "egui")]
pub use crate::ui::widget::MapView;

pub use crate::{Error as MapError, Result};

pub use std::{
    future::Future,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
