use crate::{
    core::{
        config::BaseLayerConfig,
        constants::TILE_SIZE,
        geo::{Point, TileCoord},
        viewport::Viewport,
    },
    impl_layer_trait,
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::RenderContext,
    tiles::{
        cache::TileCache,
        loader::{TileLoader, TileMessage},
        source::{TileSource, UrlTemplateSource},
    },
    Result,
};
use crate::prelude::HashSet;
use serde::{Deserialize, Serialize};
use std::sync::{
    mpsc::{self, Receiver, TryRecvError},
    Mutex,
};

/// Configuration for a tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerOptions {
    /// URL template, e.g. `https://{s}.example.com/{z}/{x}/{y}.png`
    pub url_template: String,
    /// Available subdomains for `{s}`
    pub subdomains: Vec<String>,
    /// Value for `{id}`
    pub id: String,
    /// Value for `{accessToken}`; never serialized
    #[serde(skip_serializing)]
    pub access_token: String,
    pub attribution: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Decoded tiles kept in memory
    pub cache_size: usize,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: String::new(),
            subdomains: Vec::new(),
            id: String::new(),
            access_token: String::new(),
            attribution: String::new(),
            min_zoom: 0,
            max_zoom: 18,
            cache_size: crate::core::constants::DEFAULT_TILE_CACHE_SIZE,
        }
    }
}

impl TileLayerOptions {
    pub fn from_config(config: &BaseLayerConfig, access_token: &str, cache_size: usize) -> Self {
        Self {
            url_template: config.url_template.clone(),
            id: config.id.clone(),
            access_token: access_token.to_string(),
            attribution: config.attribution.clone(),
            max_zoom: config.max_zoom,
            cache_size,
            ..Default::default()
        }
    }

    fn source(&self) -> UrlTemplateSource {
        UrlTemplateSource::new(self.url_template.clone())
            .with_subdomains(self.subdomains.clone())
            .with_id(self.id.clone())
            .with_access_token(self.access_token.clone())
            .with_attribution(self.attribution.clone())
    }
}

/// A tile placed on screen: the wrapped coordinate to fetch and where to draw it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedTile {
    pub coord: TileCoord,
    pub min: Point,
    pub max: Point,
}

/// A tile-based layer that displays map tiles from a tile server
pub struct TileLayer {
    properties: LayerProperties,
    options: TileLayerOptions,
    tile_source: Box<dyn TileSource>,
    tile_loader: TileLoader,
    /// Receiver for completed tile downloads
    tile_rx: Mutex<Receiver<TileMessage>>,
    cache: TileCache,
    /// Tiles requested but not yet received
    loading_tiles: HashSet<TileCoord>,
    /// Tiles that failed once; they are not requested again
    error_tiles: HashSet<TileCoord>,
}

impl TileLayer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, options: TileLayerOptions) -> Self {
        let properties = LayerProperties::new(id, name, LayerType::Tile);
        let (tx, rx) = mpsc::channel();

        Self {
            properties,
            tile_source: Box::new(options.source()),
            tile_loader: TileLoader::new(tx),
            tile_rx: Mutex::new(rx),
            cache: TileCache::new(options.cache_size),
            options,
            loading_tiles: HashSet::default(),
            error_tiles: HashSet::default(),
        }
    }

    /// Tiles covering the viewport. Longitude wraps around the world;
    /// rows beyond the poles are skipped.
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<PlacedTile> {
        let zoom = viewport
            .tile_zoom()
            .clamp(self.options.min_zoom, self.options.max_zoom);
        let tiles_per_axis = TileCoord::tiles_per_axis(zoom) as i64;
        // On-screen size of one tile at the (possibly fractional) view zoom
        let tile_px = TILE_SIZE as f64 * 2_f64.powf(viewport.zoom - zoom as f64);
        let origin = viewport.pixel_origin();

        let min_x = (origin.x / tile_px).floor() as i64;
        let max_x = ((origin.x + viewport.size.x) / tile_px).ceil() as i64 - 1;
        let min_y = ((origin.y / tile_px).floor() as i64).max(0);
        let max_y = (((origin.y + viewport.size.y) / tile_px).ceil() as i64 - 1).min(tiles_per_axis - 1);

        let mut tiles = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let min = Point::new(x as f64 * tile_px - origin.x, y as f64 * tile_px - origin.y);
                tiles.push(PlacedTile {
                    coord: TileCoord::new(x.rem_euclid(tiles_per_axis) as u32, y as u32, zoom),
                    min,
                    max: Point::new(min.x + tile_px, min.y + tile_px),
                });
            }
        }
        tiles
    }

    /// Collects finished downloads and requests missing tiles.
    /// Returns the number of tiles that arrived since the last call.
    pub fn update_tiles(&mut self, viewport: &Viewport) -> usize {
        let received = self.drain_downloads();

        for placed in self.visible_tiles(viewport) {
            let coord = placed.coord;
            if self.cache.contains(&coord)
                || self.loading_tiles.contains(&coord)
                || self.error_tiles.contains(&coord)
            {
                continue;
            }
            self.loading_tiles.insert(coord);
            self.tile_loader.start_download(self.tile_source.as_ref(), coord);
        }

        received
    }

    fn drain_downloads(&mut self) -> usize {
        let Ok(rx) = self.tile_rx.lock() else {
            return 0;
        };
        let mut received = 0;
        loop {
            match rx.try_recv() {
                Ok((coord, Ok(data))) => {
                    self.loading_tiles.remove(&coord);
                    self.cache.insert(coord, data);
                    received += 1;
                }
                Ok((coord, Err(reason))) => {
                    log::debug!("tile {:?} marked failed: {}", coord, reason);
                    self.loading_tiles.remove(&coord);
                    self.error_tiles.insert(coord);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        received
    }

    /// Stores tile bytes directly, bypassing the network
    pub fn insert_tile(&mut self, coord: TileCoord, data: Vec<u8>) {
        self.loading_tiles.remove(&coord);
        self.cache.insert(coord, data);
    }

    pub fn tile_source(&self) -> &dyn TileSource {
        self.tile_source.as_ref()
    }

    pub fn tile_options(&self) -> &TileLayerOptions {
        &self.options
    }

    /// Returns true if there are any tiles currently being downloaded.
    pub fn is_loading(&self) -> bool {
        !self.loading_tiles.is_empty()
    }

    pub fn failed_tiles(&self) -> usize {
        self.error_tiles.len()
    }
}

impl LayerTrait for TileLayer {
    impl_layer_trait!(TileLayer, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let opacity = self.opacity();
        for placed in self.visible_tiles(viewport) {
            if let Some(data) = self.cache.get(&placed.coord) {
                context.render_tile(placed.coord, data, (placed.min, placed.max), opacity)?;
            }
        }
        Ok(())
    }

    fn update(&mut self, viewport: &Viewport) -> Result<bool> {
        Ok(self.update_tiles(viewport) > 0)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn layer() -> TileLayer {
        let config = BaseLayerConfig::new(
            "Light",
            "https://api.mapbox.com/styles/v1/mapbox/{id}/tiles/{z}/{x}/{y}?access_token={accessToken}",
            "light-v10",
        );
        TileLayer::new("light", "Light", TileLayerOptions::from_config(&config, "pk.test", 64))
    }

    #[test]
    fn test_tile_layer_creation() {
        let layer = layer();
        assert_eq!(layer.id(), "light");
        assert_eq!(layer.name(), "Light");
        assert_eq!(layer.layer_type(), LayerType::Tile);
        assert_eq!(
            layer.tile_source().url(TileCoord::new(1, 2, 3)),
            "https://api.mapbox.com/styles/v1/mapbox/light-v10/tiles/3/1/2?access_token=pk.test"
        );
    }

    #[test]
    fn test_visible_tiles_cover_viewport_and_wrap() {
        let layer = layer();
        // Zoom 1 world is 512px wide; an 800px view must wrap horizontally
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(800.0, 512.0));
        let tiles = layer.visible_tiles(&viewport);

        assert!(tiles.iter().all(|t| t.coord.is_valid()));
        assert!(tiles.iter().all(|t| t.coord.z == 1));
        // x in -1..=2 maps onto 1, 0, 1, 0 for both rows
        assert_eq!(tiles.len(), 8);
        assert_eq!(tiles[0].coord, TileCoord::new(1, 0, 1));
        assert!(tiles[0].min.x < 0.0);
    }

    #[test]
    fn test_rows_beyond_poles_are_skipped() {
        let layer = layer();
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 0.0, Point::new(256.0, 1024.0));
        let tiles = layer.visible_tiles(&viewport);
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.coord == TileCoord::new(0, 0, 0)));
    }

    #[test]
    fn test_renders_only_cached_tiles() {
        let mut layer = layer();
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        layer.insert_tile(TileCoord::new(0, 0, 1), vec![1, 2, 3]);

        let mut ctx = RenderContext::new(512, 512);
        layer.render(&mut ctx, &viewport).unwrap();
        assert_eq!(ctx.tiles().count(), 1);
    }

    #[test]
    fn test_failed_tiles_are_not_requested_again() {
        let mut layer = layer();
        let coord = TileCoord::new(0, 0, 0);
        layer.loading_tiles.insert(coord);
        {
            // Simulate the loader reporting a failure
            let (tx, rx) = mpsc::channel();
            tx.send((coord, Err("HTTP 401 Unauthorized".to_string()))).unwrap();
            layer.tile_rx = Mutex::new(rx);
            layer.tile_loader = TileLoader::new(tx);
        }
        assert_eq!(layer.drain_downloads(), 0);
        assert_eq!(layer.failed_tiles(), 1);
        assert!(!layer.is_loading());
    }
}
