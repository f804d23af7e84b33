//! Typed records extracted from the two feeds

use crate::{
    core::{constants::UNKNOWN_PLACE, geo::LatLng},
    data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    MapError, Result,
};
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Shown when a feature has no usable timestamp
pub const UNKNOWN_TIME: &str = "Unknown";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// One earthquake event from the USGS summary feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earthquake {
    pub id: Option<String>,
    pub place: String,
    /// Milliseconds since the Unix epoch
    pub time_ms: Option<i64>,
    /// May be zero or negative
    pub mag: f64,
    pub position: LatLng,
    /// Third ordinate of the point, when present
    pub depth_km: Option<f64>,
}

impl Earthquake {
    /// Extracts an earthquake; `mag` and a Point geometry are required
    pub fn from_feature(feature: &GeoJsonFeature) -> Result<Self> {
        let id = feature.id_string();
        let describe = || id.clone().unwrap_or_else(|| "<no id>".to_string());

        let coordinates = match &feature.geometry {
            Some(GeoJsonGeometry::Point { coordinates }) => coordinates,
            Some(other) => {
                return Err(MapError::InvalidFeature(format!(
                    "earthquake {}: expected Point geometry, got {}",
                    describe(),
                    other.type_name()
                )))
            }
            None => {
                return Err(MapError::InvalidFeature(format!(
                    "earthquake {}: missing geometry",
                    describe()
                )))
            }
        };
        let position = GeoJsonGeometry::position_to_lat_lng(coordinates)?;

        let mag = feature.f64_property("mag").ok_or_else(|| {
            MapError::InvalidFeature(format!("earthquake {}: missing magnitude", describe()))
        })?;

        let place = feature
            .str_property("place")
            .filter(|place| !place.trim().is_empty())
            .unwrap_or(UNKNOWN_PLACE)
            .to_string();

        Ok(Self {
            place,
            time_ms: feature.i64_property("time"),
            mag,
            position,
            depth_km: coordinates.get(2).copied(),
            id,
        })
    }

    /// `2023-11-14 22:13:20 +00:00` style local timestamp, or `"Unknown"`
    pub fn formatted_time(&self) -> String {
        self.time_ms
            .and_then(|ms| format_timestamp(ms, &Local))
            .unwrap_or_else(|| UNKNOWN_TIME.to_string())
    }
}

/// Formats epoch milliseconds in the given zone
pub fn format_timestamp<Tz>(ms: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    tz.timestamp_millis_opt(ms)
        .single()
        .map(|time| time.format(TIME_FORMAT).to_string())
}

/// One plate boundary from the PB2002 dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateBoundary {
    /// `Name` property, e.g. `"AF-AN"`
    pub name: Option<String>,
    pub lines: Vec<Vec<LatLng>>,
}

impl PlateBoundary {
    pub fn from_feature(feature: &GeoJsonFeature) -> Result<Self> {
        let name = feature.str_property("Name").map(str::to_string);
        let geometry = feature.geometry.as_ref().ok_or_else(|| {
            MapError::InvalidFeature(format!(
                "plate boundary {}: missing geometry",
                name.as_deref().unwrap_or("<unnamed>")
            ))
        })?;

        let lines: Vec<Vec<LatLng>> = geometry
            .to_lines()?
            .into_iter()
            .filter(|line| line.len() >= 2)
            .collect();
        if lines.is_empty() {
            return Err(MapError::InvalidFeature(format!(
                "plate boundary {}: no line with two or more points",
                name.as_deref().unwrap_or("<unnamed>")
            )));
        }

        Ok(Self { name, lines })
    }
}

/// Records extracted from a feed plus how many features were rejected
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

/// Converts every feature with `extract`, logging and counting failures
pub fn extract_features<T, F>(geojson: GeoJson, kind: &str, extract: F) -> Parsed<T>
where
    F: Fn(&GeoJsonFeature) -> Result<T>,
{
    let mut items = Vec::with_capacity(geojson.len());
    let mut skipped = 0;
    for feature in geojson.into_features() {
        match feature.and_then(|f| extract(&f)) {
            Ok(item) => items.push(item),
            Err(err) => {
                log::warn!("skipping {} feature: {}", kind, err);
                skipped += 1;
            }
        }
    }
    Parsed { items, skipped }
}

pub fn parse_earthquakes(geojson: GeoJson) -> Parsed<Earthquake> {
    extract_features(geojson, "earthquake", Earthquake::from_feature)
}

pub fn parse_plates(geojson: GeoJson) -> Parsed<PlateBoundary> {
    extract_features(geojson, "plate", PlateBoundary::from_feature)
}
