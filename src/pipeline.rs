//! Fetch → style → render for the two overlays
//!
//! The map lock is taken only to swap finished layer contents in. It is
//! never held across an `.await`.

use crate::{
    core::{
        config::{AppConfig, FetchStrategy},
        constants::{EARTHQUAKES_OVERLAY, PLATES_OVERLAY},
        geo::Point,
        map::Map,
    },
    data::{
        feed::{FeedSource, HttpFeedSource, StaticFeedSource},
        geojson::GeoJson,
        quake::{parse_earthquakes, parse_plates, Parsed},
    },
    layers::vector::{CircleMarker, Polyline},
    styling::feature::{plate_line_style, style_feature},
    ui::popup::PopupContent,
    MapError, Result,
};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Map size used until a view reports its real size
const INITIAL_VIEW_SIZE: (f64, f64) = (1024.0, 768.0);

/// Everything the pipeline needs, built once at startup
pub struct AppContext {
    pub config: AppConfig,
    pub map: Arc<Mutex<Map>>,
    pub earthquakes: Arc<dyn FeedSource>,
    pub plates: Arc<dyn FeedSource>,
}

impl AppContext {
    /// Builds the map and feed sources from `config`
    pub fn new(config: AppConfig) -> Result<Self> {
        let timeout = config.fetch.timeout();
        let earthquakes = feed_source(EARTHQUAKES_OVERLAY, &config.earthquakes_url, timeout)?;
        let plates = feed_source(PLATES_OVERLAY, &config.plates_url, timeout)?;
        Self::with_sources(config, earthquakes, plates)
    }

    pub fn with_sources(
        config: AppConfig,
        earthquakes: Arc<dyn FeedSource>,
        plates: Arc<dyn FeedSource>,
    ) -> Result<Self> {
        let size = Point::new(INITIAL_VIEW_SIZE.0, INITIAL_VIEW_SIZE.1);
        let map = Map::from_config(&config, size)?;
        Ok(Self {
            config,
            map: Arc::new(Mutex::new(map)),
            earthquakes,
            plates,
        })
    }
}

/// `file://` URLs and bare paths read from disk; anything else goes over HTTP
pub fn feed_source(name: &str, url: &str, timeout: Duration) -> Result<Arc<dyn FeedSource>> {
    if let Some(path) = url.strip_prefix("file://") {
        return Ok(Arc::new(StaticFeedSource::from_file(name, path)?));
    }
    if !url.contains("://") {
        return Ok(Arc::new(StaticFeedSource::from_file(name, url)?));
    }
    Ok(Arc::new(HttpFeedSource::new(name, url, timeout)?))
}

/// What happened to one overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerOutcome {
    Rendered { rendered: usize, skipped: usize },
    Failed(String),
    /// Not fetched because an earlier step failed
    NotRequested,
}

impl LayerOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, LayerOutcome::Rendered { .. })
    }
}

impl fmt::Display for LayerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerOutcome::Rendered { rendered, skipped } => {
                write!(f, "{} rendered, {} skipped", rendered, skipped)
            }
            LayerOutcome::Failed(reason) => write!(f, "failed: {}", reason),
            LayerOutcome::NotRequested => f.write_str("not requested"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub earthquakes: LayerOutcome,
    pub plates: LayerOutcome,
}

pub struct RenderPipeline {
    map: Arc<Mutex<Map>>,
    earthquakes: Arc<dyn FeedSource>,
    plates: Arc<dyn FeedSource>,
    strategy: FetchStrategy,
    /// Set once the plates overlay has been shown; later loads keep the
    /// user's checkbox state
    plates_revealed: AtomicBool,
}

impl RenderPipeline {
    pub fn new(context: &AppContext) -> Self {
        Self {
            map: Arc::clone(&context.map),
            earthquakes: Arc::clone(&context.earthquakes),
            plates: Arc::clone(&context.plates),
            strategy: context.config.fetch.strategy,
            plates_revealed: AtomicBool::new(false),
        }
    }

    pub fn with_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Loads both overlays. Failures are logged and reported, never returned.
    pub async fn run(&self) -> PipelineReport {
        log::info!("loading overlays ({:?})", self.strategy);
        let report = match self.strategy {
            FetchStrategy::Sequential => {
                let earthquakes = self.apply_earthquakes(self.earthquakes.fetch().await);
                // Plates wait on a successful earthquake fetch
                let plates = match earthquakes {
                    LayerOutcome::Failed(_) => {
                        log::info!("skipping {} after earthquake feed failure", self.plates.name());
                        LayerOutcome::NotRequested
                    }
                    _ => self.apply_plates(self.plates.fetch().await),
                };
                PipelineReport { earthquakes, plates }
            }
            FetchStrategy::Concurrent => {
                // Each overlay lands as soon as its own feed answers
                let (earthquakes, plates) = futures::join!(
                    async { self.apply_earthquakes(self.earthquakes.fetch().await) },
                    async { self.apply_plates(self.plates.fetch().await) }
                );
                PipelineReport { earthquakes, plates }
            }
        };
        log::info!(
            "earthquakes: {}; plates: {}",
            report.earthquakes,
            report.plates
        );
        report
    }

    fn apply_earthquakes(&self, fetched: Result<GeoJson>) -> LayerOutcome {
        let geojson = match fetched {
            Ok(geojson) => geojson,
            Err(e) => return self.failed(self.earthquakes.name(), e),
        };
        let Parsed { items, skipped } = parse_earthquakes(geojson);
        let markers: Vec<CircleMarker> = items
            .iter()
            .map(|quake| {
                CircleMarker::new(quake.position, style_feature(quake))
                    .with_popup(PopupContent::for_earthquake(quake))
            })
            .collect();
        let rendered = markers.len();

        let result = self.with_map(|map| {
            let group = overlay_group(map, EARTHQUAKES_OVERLAY)?;
            group.clear();
            for marker in markers {
                group.add(marker);
            }
            Ok(())
        });
        match result {
            Ok(()) => LayerOutcome::Rendered { rendered, skipped },
            Err(e) => self.failed(self.earthquakes.name(), e),
        }
    }

    fn apply_plates(&self, fetched: Result<GeoJson>) -> LayerOutcome {
        let geojson = match fetched {
            Ok(geojson) => geojson,
            Err(e) => return self.failed(self.plates.name(), e),
        };
        let Parsed { items, skipped } = parse_plates(geojson);
        let style = plate_line_style();
        let polylines: Vec<Polyline> = items
            .into_iter()
            .map(|plate| Polyline::new(plate.lines, style.clone()))
            .collect();
        let rendered = polylines.len();

        let result = self.with_map(|map| {
            let group = overlay_group(map, PLATES_OVERLAY)?;
            group.clear();
            for polyline in polylines {
                group.add(polyline);
            }
            if self.plates_revealed.swap(true, Ordering::SeqCst) {
                return Ok(());
            }
            map.set_overlay_visible(PLATES_OVERLAY, true)
        });
        match result {
            Ok(()) => LayerOutcome::Rendered { rendered, skipped },
            Err(e) => self.failed(self.plates.name(), e),
        }
    }

    fn with_map<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Map) -> Result<()>,
    {
        let mut map = self
            .map
            .lock()
            .map_err(|_| MapError::Layer("map lock poisoned".into()))?;
        f(&mut map)
    }

    fn failed(&self, feed: &str, error: MapError) -> LayerOutcome {
        log::warn!("{} feed failed: {}", feed, error);
        LayerOutcome::Failed(error.to_string())
    }
}

fn overlay_group<'a>(map: &'a mut Map, label: &str) -> Result<&'a mut crate::layers::group::LayerGroup> {
    map.overlay_group_mut(label)
        .ok_or_else(|| MapError::Layer(format!("overlay '{}' is missing", label)))
}
