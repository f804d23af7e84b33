//! Application configuration
//!
//! Values resolve in three layers: built-in defaults, an optional JSON file,
//! then environment variables. Every struct is `#[serde(default)]` so a file
//! only needs to name the fields it overrides.

use crate::core::constants::{
    DEFAULT_CENTER, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_TILE_CACHE_SIZE, DEFAULT_ZOOM,
    EARTHQUAKES_URL, MAX_ZOOM, MIN_ZOOM, PLATES_URL,
};
use crate::core::geo::LatLng;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming a JSON config file
pub const CONFIG_PATH_ENV: &str = "QUAKEMAP_CONFIG";
pub const EARTHQUAKES_URL_ENV: &str = "QUAKEMAP_EARTHQUAKES_URL";
pub const PLATES_URL_ENV: &str = "QUAKEMAP_PLATES_URL";
/// Token variables, checked in order
pub const ACCESS_TOKEN_ENVS: [&str; 3] = ["QUAKEMAP_ACCESS_TOKEN", "MAPBOX_ACCESS_TOKEN", "API_KEY"];

const MAPBOX_ATTRIBUTION: &str = "Map data &copy; OpenStreetMap contributors, Imagery © Mapbox";
const MAPBOX_V4_URL: &str =
    "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";
const MAPBOX_STYLES_URL: &str =
    "https://api.mapbox.com/styles/v1/mapbox/{id}/tiles/{z}/{x}/{y}?access_token={accessToken}";

/// How the two feeds are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Plates are requested only after the earthquake feed rendered
    #[default]
    Sequential,
    /// Both feeds are requested at once
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub strategy: FetchStrategy,
    pub timeout_secs: u64,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            strategy: FetchStrategy::Sequential,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

/// One selectable background tile style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseLayerConfig {
    /// Name shown in the layer control
    pub label: String,
    pub url_template: String,
    /// Value substituted for `{id}`
    pub id: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl BaseLayerConfig {
    pub fn new(label: &str, url_template: &str, id: &str) -> Self {
        Self {
            label: label.to_string(),
            url_template: url_template.to_string(),
            id: id.to_string(),
            attribution: MAPBOX_ATTRIBUTION.to_string(),
            max_zoom: MAX_ZOOM as u8,
        }
    }
}

impl Default for BaseLayerConfig {
    fn default() -> Self {
        Self::new("Satellite", MAPBOX_V4_URL, "mapbox.satellite")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub earthquakes_url: String,
    pub plates_url: String,
    pub center: LatLng,
    pub zoom: f64,
    /// Opaque token passed through to the tile servers
    pub access_token: String,
    pub base_layers: Vec<BaseLayerConfig>,
    /// Label of the base layer shown at startup
    pub default_base_layer: String,
    pub fetch: FetchConfig,
    /// Decoded tiles kept in memory per base layer
    pub tile_cache_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            earthquakes_url: EARTHQUAKES_URL.to_string(),
            plates_url: PLATES_URL.to_string(),
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            access_token: String::new(),
            base_layers: vec![
                BaseLayerConfig::new("Satellite", MAPBOX_V4_URL, "mapbox.satellite"),
                BaseLayerConfig::new("Light", MAPBOX_STYLES_URL, "light-v10"),
                BaseLayerConfig::new("Street", MAPBOX_STYLES_URL, "streets-v11"),
            ],
            default_base_layer: "Satellite".to_string(),
            fetch: FetchConfig::default(),
            tile_cache_size: DEFAULT_TILE_CACHE_SIZE,
        }
    }
}

impl AppConfig {
    /// Parses a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        log::debug!("loaded config from {}", path.display());
        Self::from_json(&contents)
    }

    /// Defaults, then `path` (or `QUAKEMAP_CONFIG`), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.is_empty());
        let mut config = match (path, env_path) {
            (Some(path), _) => Self::from_file(path)?,
            (None, Some(env_path)) => Self::from_file(env_path)?,
            (None, None) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlays values from an environment lookup. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = get(EARTHQUAKES_URL_ENV) {
            self.earthquakes_url = url;
        }
        if let Some(url) = get(PLATES_URL_ENV) {
            self.plates_url = url;
        }
        if let Some(token) = ACCESS_TOKEN_ENVS.iter().find_map(|key| get(key)) {
            self.access_token = token;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.earthquakes_url.trim().is_empty() {
            return Err(MapError::Config("earthquakes_url is empty".into()));
        }
        if self.plates_url.trim().is_empty() {
            return Err(MapError::Config("plates_url is empty".into()));
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom) {
            return Err(MapError::Config(format!(
                "zoom {} outside {}..={}",
                self.zoom, MIN_ZOOM, MAX_ZOOM
            )));
        }
        if let Some(layer) = self.base_layers.iter().find(|l| l.url_template.trim().is_empty()) {
            return Err(MapError::Config(format!(
                "base layer '{}' has an empty url template",
                layer.label
            )));
        }
        if self.base_layer(&self.default_base_layer).is_none() {
            return Err(MapError::Config(format!(
                "default base layer '{}' is not configured",
                self.default_base_layer
            )));
        }
        if self.tile_cache_size == 0 {
            return Err(MapError::Config("tile_cache_size must be positive".into()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(MapError::Config("fetch.timeout_secs must be positive".into()));
        }
        if self.access_token.is_empty() {
            log::warn!("no access token configured; base layer tiles will fail to load");
        }
        Ok(())
    }

    pub fn base_layer(&self, label: &str) -> Option<&BaseLayerConfig> {
        self.base_layers.iter().find(|layer| layer.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_initial_view() {
        let config = AppConfig::default();
        assert_eq!(config.center, LatLng::new(37.09, -95.71));
        assert_eq!(config.zoom, 2.0);
        assert_eq!(config.default_base_layer, "Satellite");
        let labels: Vec<_> = config.base_layers.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, ["Satellite", "Light", "Street"]);
        assert!(config.base_layers.iter().all(|l| l.max_zoom == 18));
        assert_eq!(config.fetch.strategy, FetchStrategy::Sequential);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(
            r#"{"zoom": 4, "fetch": {"strategy": "concurrent"}, "default_base_layer": "Light"}"#,
        )
        .unwrap();
        assert_eq!(config.zoom, 4.0);
        assert_eq!(config.fetch.strategy, FetchStrategy::Concurrent);
        assert_eq!(config.fetch.timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
        assert_eq!(config.default_base_layer, "Light");
        assert_eq!(config.earthquakes_url, EARTHQUAKES_URL);
    }

    #[test]
    fn test_env_overlay_and_token_precedence() {
        let env: HashMap<&str, &str> = [
            ("QUAKEMAP_PLATES_URL", "http://localhost/plates.json"),
            ("MAPBOX_ACCESS_TOKEN", "pk.mapbox"),
            ("API_KEY", "pk.api"),
            ("QUAKEMAP_EARTHQUAKES_URL", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.plates_url, "http://localhost/plates.json");
        assert_eq!(config.earthquakes_url, EARTHQUAKES_URL);
        assert_eq!(config.access_token, "pk.mapbox");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.earthquakes_url.clear();
        assert!(matches!(config.validate(), Err(MapError::Config(_))));

        let mut config = AppConfig::default();
        config.zoom = 19.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.default_base_layer = "Topo".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.tile_cache_size = 0;
        assert!(config.validate().is_err());

        let config = AppConfig::from_json(r#"{"fetch": {"timeout_secs": 0}}"#).unwrap();
        assert!(matches!(config.validate(), Err(MapError::Config(ref m)) if m.contains("timeout_secs")));
    }
}
